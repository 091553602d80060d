//! Clap derive structures for the `nobetci` CLI.
//!
//! Defines the command tree, global flags, and per-command arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// nobetci -- duty-pharmacy watcher for CollectAPI
#[derive(Debug, Parser)]
#[command(
    name = "nobetci",
    version,
    about = "Watch Turkish on-duty (nöbetçi) pharmacies from the command line",
    long_about = "Polls the CollectAPI duty-pharmacy endpoint for configured\n\
        city/district targets and renders each listing as a set of read-only\n\
        sensors. Entries are created through a guided setup flow that\n\
        validates the API key against the live service.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Directory holding entries.toml (defaults to the platform config dir)
    #[arg(long, env = "NOBETCI_CONFIG_DIR", global = true)]
    pub config_dir: Option<PathBuf>,

    /// Use an external il-ilce.json dataset instead of the bundled table
    #[arg(long, env = "NOBETCI_CITIES_FILE", global = true)]
    pub cities_file: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add a monitored city/district through the guided setup flow
    Setup(SetupArgs),

    /// List or remove configured entries
    #[command(subcommand, alias = "e")]
    Entries(EntriesCommand),

    /// Change the daily refresh hour of an entry
    Options(OptionsArgs),

    /// Poll all entries and render their sensors
    #[command(alias = "w")]
    Watch(WatchArgs),

    /// Inspect the city/district reference table
    Cities(CitiesArgs),
}

// ── Per-command arguments ────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SetupArgs {
    /// CollectAPI key (skips the prompt; the key is still validated)
    #[arg(long, env = "NOBETCI_API_KEY", hide_env = true)]
    pub api_key: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum EntriesCommand {
    /// List configured entries
    List,

    /// Remove an entry by its unique id (e.g. "Adana_Seyhan")
    Remove {
        /// Unique id shown by `entries list`
        unique_id: String,
    },
}

#[derive(Debug, Args)]
pub struct OptionsArgs {
    /// Unique id shown by `entries list`
    pub unique_id: String,

    /// New refresh hour as "HH:00" (prompts when omitted)
    #[arg(long)]
    pub hour: Option<String>,
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Print one snapshot and exit instead of polling
    #[arg(long)]
    pub once: bool,

    /// Override the polling interval (seconds)
    #[arg(long)]
    pub interval_secs: Option<u64>,
}

#[derive(Debug, Args)]
pub struct CitiesArgs {
    /// Show the districts of one city instead of the city list
    #[arg(long)]
    pub districts: Option<String>,
}
