//! Command-line interface for the Ticketry binary.

use clap::Parser;
use std::path::PathBuf;

/// Discord support bot: per-guild channel reconciliation and ticket threads.
#[derive(Debug, Parser)]
#[command(name = "ticketry", version, about)]
pub struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Re-register the slash command set on startup.
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub sync_commands: bool,
}
