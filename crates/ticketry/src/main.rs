//! Ticketry bot binary.
//!
//! Loads configuration, initializes tracing, and runs the gateway client
//! until the connection ends.

use clap::Parser;
use std::sync::Arc;
use ticketry_core::{LogFormat, TicketryConfig};
use ticketry_discord::{TicketryBot, VersionInfo};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod cli;

/// Environment variable holding the bot token.
const TOKEN_VAR: &str = "TICKETRY_TOKEN";

fn init_tracing(config: &TicketryConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log.level.clone()));
    match config.log.format {
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init(),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let cli = cli::Cli::parse();

    let config = if cli.config.exists() {
        TicketryConfig::from_file(&cli.config)?
    } else {
        TicketryConfig::default()
    };
    init_tracing(&config);
    if !cli.config.exists() {
        info!(path = %cli.config.display(), "No config file found; using defaults");
    }

    let token = std::env::var(TOKEN_VAR)
        .map_err(|_| format!("{TOKEN_VAR} must be set to the bot token"))?;
    let version = VersionInfo {
        version: env!("CARGO_PKG_VERSION").to_string(),
        commit: option_env!("TICKETRY_COMMIT").unwrap_or("unknown").to_string(),
    };

    let mut bot = TicketryBot::new(&token, Arc::new(config), version, cli.sync_commands).await?;
    bot.start().await?;
    Ok(())
}
