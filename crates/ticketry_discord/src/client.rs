//! Gateway client lifecycle.

use crate::handler::{TicketryHandler, VersionInfo};
use serenity::Client;
use std::sync::Arc;
use ticketry_core::TicketryConfig;
use ticketry_error::{ApiError, TicketryResult};
use tracing::info;

/// The Ticketry bot process: a configured serenity client plus the event
/// handler that drives reconciliation.
pub struct TicketryBot {
    client: Client,
}

impl TicketryBot {
    /// Build the gateway client. `sync_commands` controls whether startup
    /// re-registers the slash command set.
    pub async fn new(
        token: &str,
        config: Arc<TicketryConfig>,
        version: VersionInfo,
        sync_commands: bool,
    ) -> TicketryResult<Self> {
        let handler = TicketryHandler::new(config, version, sync_commands);
        let client = Client::builder(token, TicketryHandler::intents())
            .event_handler(handler)
            .await
            .map_err(|e| ApiError::new("build gateway client", e.to_string()))?;
        Ok(Self { client })
    }

    /// Connect and run until the gateway connection ends.
    ///
    /// Serenity reconnects on transient gateway drops; an error here means
    /// the connection is unrecoverable (bad token, missing intents).
    pub async fn start(&mut self) -> TicketryResult<()> {
        info!("Starting gateway connection");
        self.client
            .start()
            .await
            .map_err(|e| ApiError::new("run gateway client", e.to_string()))?;
        Ok(())
    }
}
