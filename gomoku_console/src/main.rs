#![forbid(unsafe_code)]
#![cfg_attr(feature = "strict", deny(warnings))]

mod network;
mod server_config;
mod server_main;

use clap::{Command, arg};
use server_config::ServerConfig;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::new()
        .target(env_logger::Target::Stdout)
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let matches = Command::new("Gomoku")
        .version(clap::crate_version!())
        .about("Five-in-a-row game server")
        .subcommand_required(true)
        .subcommand(
            Command::new("server")
                .about("Run as server")
                .arg(
                    arg!(--"config" <config_file> "Path to the configuration file: yaml-serialized ServerConfig.")
                        .required(false),
                )
                .arg(
                    arg!(--"port" <port> "TCP port to listen on. Overrides the configuration file.")
                        .env("PORT")
                        .value_parser(clap::value_parser!(u16)),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("server", sub_matches)) => {
            let config = ServerConfig::load(
                sub_matches.get_one::<String>("config").map(String::as_str),
                sub_matches.get_one::<u16>("port").copied(),
            )?;
            server_main::run(config)
        }
        _ => unreachable!("Exhausted list of subcommands and subcommand_required prevents `None`"),
    }
}
