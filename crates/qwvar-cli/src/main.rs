mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod progress;

use crate::cli::{Cli, Commands};
use crate::error::Result;
use clap::Parser;
use tracing::{debug, error, info};

fn main() {
    if let Err(e) = run_app() {
        error!("Command failed: {e}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::setup(cli.verbose, cli.quiet, cli.log_file.as_deref())?;

    info!("qwvar v{} starting up.", env!("CARGO_PKG_VERSION"));
    debug!("Full CLI arguments parsed: {:?}", &cli);

    let slots = cli.resolve_slots();
    info!(slots, "worker pool size resolved");

    match cli.command {
        Commands::Bind(args) => commands::bind::run(args, slots),
        Commands::Calibrate(args) => commands::calibrate::run(args, slots),
    }
}
