//! Support channel reconciliation.
//!
//! Each run re-derives the channel's state from the remote API: find the
//! first channel matching the configured name, create it if absent, and
//! otherwise overwrite its name, topic and type unconditionally. Permission
//! overwrites are only rewritten when the builder produced a list; a failed
//! role listing leaves the channel's existing restrictions in place.
//! Running twice in a row is a no-op beyond the second update call.

use crate::api::SupportApi;
use crate::model::ChannelInfo;
use crate::overwrites::build_support_overwrites;
use std::sync::Arc;
use ticketry_core::{PermissionTier, TicketryConfig};
use ticketry_error::TicketryResult;
use tracing::{debug, info, instrument};

/// Brings a guild's support channel into the desired state.
///
/// Duplicate channels the reconciler did not create are left alone; only
/// the first name match is acted on. The channel is never deleted.
#[derive(Clone)]
pub struct ChannelReconciler {
    api: Arc<dyn SupportApi>,
    config: Arc<TicketryConfig>,
}

impl ChannelReconciler {
    /// Create a reconciler over the given API and configuration.
    pub fn new(api: Arc<dyn SupportApi>, config: Arc<TicketryConfig>) -> Self {
        Self { api, config }
    }

    /// Read path: the first channel whose name matches the support channel
    /// constant, if any. Performs no writes.
    pub async fn find(&self, guild_id: u64) -> TicketryResult<Option<ChannelInfo>> {
        let channels = self.api.guild_channels(guild_id).await?;
        Ok(channels
            .into_iter()
            .find(|c| c.name == self.config.support.name))
    }

    /// Find-or-create-or-update the support channel; returns its id.
    ///
    /// Any remote failure is a hard failure for this guild only.
    #[instrument(skip(self), fields(guild_id))]
    pub async fn reconcile(&self, guild_id: u64) -> TicketryResult<u64> {
        let existing = self.find(guild_id).await?;
        let overwrites = build_support_overwrites(
            self.api.as_ref(),
            guild_id,
            &[PermissionTier::Moderation],
            &self.config.bot.elevated_role_names,
        )
        .await;

        let support = &self.config.support;
        let channel = match existing {
            Some(channel) => {
                debug!(channel_id = channel.id, "Updating existing support channel");
                // An empty builder result means the role listing failed;
                // the channel's current restrictions must survive it.
                let overwrites = (!overwrites.is_empty()).then_some(overwrites.as_slice());
                self.api
                    .update_text_channel(channel.id, &support.name, &support.topic, overwrites)
                    .await?
            }
            None => {
                info!("Support channel absent; creating");
                self.api
                    .create_text_channel(guild_id, &support.name, &support.topic, &overwrites)
                    .await?
            }
        };
        Ok(channel.id)
    }
}
