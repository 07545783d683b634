mod cli;
mod commands;
mod config;

use crate::cli::{Cli, GlobalArgs};
use anyhow::Context;
use clap::Parser;
use stow_logger::Logger;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let _log = init_logger(&cli.global)?;

    let cfg = config::load_config(cli.global.config.as_deref(), cli.global.root.as_deref())
        .context("Critical: Configuration is malformed")?;

    commands::run(cli.command, &cfg)
}

fn init_logger(args: &GlobalArgs) -> anyhow::Result<Logger> {
    let builder = Logger::builder().name(env!("CARGO_BIN_NAME")).level(args.log_level).ansi(false);

    let logger = match &args.log_dir {
        Some(dir) => builder.path(dir).json(args.log_json).init()?,
        None => builder.init()?,
    };
    Ok(logger)
}
