// src/main.rs

mod cli;
mod commands;

use clap::Parser;
use cli::Cli;
use log::warn;
use mlog::config::Config;
use mlog::error::Result;
use mlog::logging::{init_logging, DEFAULT_LEVEL};
use mlog::Session;

fn main() {
    let cli = Cli::parse();

    let level = match (&cli.log_level, cli.verbose) {
        (Some(level), _) => level.as_str(),
        (None, true) => "debug",
        (None, false) => DEFAULT_LEVEL,
    };
    let _logger = match init_logging(level) {
        Ok(handle) => Some(handle),
        Err(err) => {
            eprintln!("mlog: logging disabled: {}", err);
            None
        }
    };

    if let Err(err) = run(cli) {
        eprintln!("mlog: {}", err);
        std::process::exit(err.exit_code());
    }
}

/// Opens one session, runs the command, then commits or rolls back.
fn run(cli: Cli) -> Result<()> {
    let config = Config::resolve(cli.db_path)?;
    let session = Session::open(&config.db_path)?;

    match commands::dispatch(&session, &config, cli.command) {
        Ok(()) => session.commit(),
        Err(err) => {
            if let Err(rollback_err) = session.rollback() {
                warn!("event=db_rollback module=main status=error error={}", rollback_err);
            }
            Err(err)
        }
    }
}
