//! Per-guild reconciliation and the all-guilds fan-out.
//!
//! One guild's reconciliation is channel first, then help message: the
//! message sync needs the channel id the channel step produces. Across
//! guilds there is no ordering at all; each guild is an independent task
//! under the shared concurrency ceiling and deadline.

use crate::api::SupportApi;
use crate::channel::ChannelReconciler;
use crate::fanout::{FanoutOptions, FanoutTask, join_bounded};
use crate::messages::MessageSynchronizer;
use std::sync::Arc;
use ticketry_core::TicketryConfig;
use ticketry_error::{BatchError, TicketryResult};
use tracing::{info, instrument, warn};

/// A guild eligible for reconciliation, as reported by the gateway.
#[derive(Debug, Clone, Copy)]
pub struct GuildTarget {
    /// Guild snowflake
    pub id: u64,
    /// Gateway has not delivered this guild's data yet
    pub unavailable: bool,
}

/// Drives support channel and help message reconciliation for guilds.
#[derive(Clone)]
pub struct GuildReconciler {
    channels: ChannelReconciler,
    messages: MessageSynchronizer,
    config: Arc<TicketryConfig>,
    help_text: String,
}

impl GuildReconciler {
    /// Create a reconciler that converges every guild toward `help_text`
    /// being the newest message in its support channel.
    pub fn new(api: Arc<dyn SupportApi>, config: Arc<TicketryConfig>, help_text: String) -> Self {
        Self {
            channels: ChannelReconciler::new(api.clone(), config.clone()),
            messages: MessageSynchronizer::new(api, config.fanout),
            config,
            help_text,
        }
    }

    /// Reconcile a single guild: support channel first, help message second.
    #[instrument(skip(self), fields(guild_id))]
    pub async fn reconcile_guild(&self, guild_id: u64) -> TicketryResult<()> {
        let channel_id = self.channels.reconcile(guild_id).await?;
        self.messages.sync(channel_id, &self.help_text).await?;
        Ok(())
    }

    /// Reconcile every available guild concurrently.
    ///
    /// Unavailable guilds are skipped; the gateway re-delivers them later.
    /// A guild's failure never stops its siblings, and the aggregate error
    /// names every guild that did not converge.
    #[instrument(skip(self, targets), fields(guild_count = targets.len()))]
    pub async fn reconcile_all(&self, targets: &[GuildTarget]) -> Result<(), BatchError> {
        let tasks: Vec<FanoutTask> = targets
            .iter()
            .filter(|target| {
                if target.unavailable {
                    warn!(guild_id = target.id, "Skipping unavailable guild");
                }
                !target.unavailable
            })
            .map(|target| {
                let reconciler = self.clone();
                let guild_id = target.id;
                FanoutTask::new(guild_id, async move {
                    reconciler.reconcile_guild(guild_id).await
                })
            })
            .collect();
        info!(task_count = tasks.len(), "Reconciling guild support channels");
        join_bounded(
            "reconcile guild support channels",
            tasks,
            &FanoutOptions::from(&self.config.fanout),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::InMemoryApi;

    fn reconciler(api: Arc<InMemoryApi>) -> GuildReconciler {
        GuildReconciler::new(
            api,
            Arc::new(TicketryConfig::default()),
            "help text".to_string(),
        )
    }

    fn available(id: u64) -> GuildTarget {
        GuildTarget {
            id,
            unavailable: false,
        }
    }

    #[tokio::test]
    async fn single_guild_gets_channel_and_help_message() {
        let api = Arc::new(InMemoryApi::new(1));
        api.add_guild(100);
        reconciler(api.clone()).reconcile_guild(100).await.unwrap();
        let channel = api.channel_named(100, "support-tickets").unwrap();
        let messages = api.messages(channel.id);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].content, "help text");
    }

    #[tokio::test]
    async fn failing_guild_does_not_stop_the_rest() {
        let api = Arc::new(InMemoryApi::new(1));
        for guild_id in [100, 200, 300] {
            api.add_guild(guild_id);
        }
        api.fail_guild(200, "create support channel");

        let targets = [available(100), available(200), available(300)];
        let err = reconciler(api.clone())
            .reconcile_all(&targets)
            .await
            .unwrap_err();
        assert!(err.contains(200));
        assert_eq!(err.failures().len(), 1);
        assert_eq!(*err.submitted(), 3);
        assert!(api.channel_named(100, "support-tickets").is_some());
        assert!(api.channel_named(300, "support-tickets").is_some());
        assert!(api.channel_named(200, "support-tickets").is_none());
    }

    #[tokio::test]
    async fn unavailable_guilds_are_skipped() {
        let api = Arc::new(InMemoryApi::new(1));
        api.add_guild(100);
        let targets = [
            available(100),
            GuildTarget {
                id: 999,
                unavailable: true,
            },
        ];
        reconciler(api.clone()).reconcile_all(&targets).await.unwrap();
        assert!(api.channel_named(100, "support-tickets").is_some());
        assert_eq!(api.counts().channel_creates, 1);
    }

    #[tokio::test]
    async fn second_full_run_is_idempotent() {
        let api = Arc::new(InMemoryApi::new(1));
        api.add_guild(100);
        let reconciler = reconciler(api.clone());
        let targets = [available(100)];
        reconciler.reconcile_all(&targets).await.unwrap();
        reconciler.reconcile_all(&targets).await.unwrap();
        let channel = api.channel_named(100, "support-tickets").unwrap();
        assert_eq!(api.messages(channel.id).len(), 1);
        assert_eq!(api.counts().channel_creates, 1);
        assert_eq!(api.counts().posts, 1);
    }
}
