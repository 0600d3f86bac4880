//! Help message synchronization.
//!
//! The help message is never tracked by id; every run re-derives it by
//! scanning the channel's recent messages. The cheapest sufficient action
//! wins: nothing when the newest message already matches, an in-place edit
//! when the bot owns the newest message, and only as a last resort a bulk
//! delete and repost.

use crate::api::SupportApi;
use crate::fanout::{FanoutOptions, FanoutTask, join_bounded};
use crate::model::MessageInfo;
use std::sync::Arc;
use ticketry_core::FanoutConfig;
use ticketry_error::TicketryResult;
use tracing::{debug, info, instrument, warn};

/// How many recent messages one sync run inspects.
const SCAN_LIMIT: u8 = 100;

/// Keeps exactly one current help message in a support channel.
#[derive(Clone)]
pub struct MessageSynchronizer {
    api: Arc<dyn SupportApi>,
    fanout: FanoutConfig,
}

impl MessageSynchronizer {
    /// Create a synchronizer over the given API; `fanout` bounds the
    /// deletion fallback.
    pub fn new(api: Arc<dyn SupportApi>, fanout: FanoutConfig) -> Self {
        Self { api, fanout }
    }

    /// Ensure the channel's newest message is a bot-authored message with
    /// exactly `desired` content.
    ///
    /// Foreign messages are never edited or deleted: when someone else
    /// holds the newest slot, a fresh help message is posted over it so the
    /// channel always surfaces current help text.
    #[instrument(skip(self, desired), fields(channel_id))]
    pub async fn sync(&self, channel_id: u64, desired: &str) -> TicketryResult<()> {
        let messages = self.api.recent_messages(channel_id, SCAN_LIMIT).await?;

        // Newest first; an empty channel has no prior state to reconcile.
        let Some(latest) = messages.first() else {
            debug!("Channel is empty; posting help message");
            self.api.post_message(channel_id, desired).await?;
            return Ok(());
        };

        if latest.content == desired {
            info!("Help message already current");
            return Ok(());
        }

        let bot_id = self.api.current_user_id().await?;
        if latest.author_id != bot_id {
            info!("Newest message is foreign; posting fresh help message");
            self.api.post_message(channel_id, desired).await?;
            return Ok(());
        }

        debug!(message_id = latest.id, "Editing stale help message in place");
        if let Err(e) = self.api.edit_message(channel_id, latest.id, desired).await {
            warn!(error = %e, "Edit failed; clearing channel and reposting");
            self.delete_all(channel_id, &messages).await?;
            self.api.post_message(channel_id, desired).await?;
        }
        Ok(())
    }

    /// Delete the fetched messages under bounded concurrency and the
    /// configured deadline.
    async fn delete_all(&self, channel_id: u64, messages: &[MessageInfo]) -> TicketryResult<()> {
        let tasks: Vec<FanoutTask> = messages
            .iter()
            .map(|m| {
                let api = self.api.clone();
                let message_id = m.id;
                FanoutTask::new(message_id, async move {
                    api.delete_message(channel_id, message_id).await
                })
            })
            .collect();
        join_bounded(
            "delete support channel messages",
            tasks,
            &FanoutOptions::from(&self.fanout),
        )
        .await?;
        Ok(())
    }
}
