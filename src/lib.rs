#![forbid(unsafe_code)]
#![cfg_attr(feature = "strict", deny(warnings))]

pub mod board;
pub mod color;
pub mod coord;
pub mod error;
pub mod event;
pub mod grid;
pub mod participant;
pub mod roster;
pub mod server;
pub mod test_util;
