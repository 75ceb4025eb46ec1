use enum_map::Enum;
use serde::{Deserialize, Serialize};
use strum::EnumIter;


// Black always moves first. The derived order (Black < White) is relied upon when picking the
// first free player slot.
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Enum, EnumIter, Serialize, Deserialize,
)]
pub enum Color {
    Black,
    White,
}

impl Color {
    pub const FIRST_TO_MOVE: Color = Color::Black;

    pub fn opponent(self) -> Color {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }
}
