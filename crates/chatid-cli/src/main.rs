#![doc = include_str!("../README.md")]

mod commands;
mod config;
mod telemetry;

use chatid::IdFactory;
use clap::Parser;
use config::{CliArgs, Config};
use telemetry::init_telemetry;

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = Config::try_from(args)?;

    init_telemetry()?;
    tracing::debug!(?config, "starting");

    let ids = IdFactory::default().with_policy(config.policy);
    let stdout = std::io::stdout();
    commands::run(&config, &ids, &mut stdout.lock())
}
