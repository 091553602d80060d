mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use nobetci_core::CityTable;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    init_tracing(cli.global.verbose, cli.global.quiet);

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8, quiet: bool) {
    let filter = if quiet {
        "error"
    } else {
        match verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    // An external dataset replaces the process-wide table for this run.
    if let Some(ref path) = cli.global.cities_file {
        CityTable::install(CityTable::load_from_path(path));
    }

    tracing::debug!(command = ?cli.command, "dispatching command");

    match cli.command {
        Command::Setup(args) => commands::setup::handle(&args, &cli.global).await,
        Command::Entries(cmd) => commands::entries::handle(&cmd, &cli.global),
        Command::Options(args) => commands::options::handle(&args, &cli.global),
        Command::Watch(args) => commands::watch::handle(&args, &cli.global).await,
        Command::Cities(args) => commands::cities::handle(&args),
    }
}
