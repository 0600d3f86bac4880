//! Ticket creation.
//!
//! A ticket is a private thread under the guild's support channel, holding
//! the requester plus a rendered summary that mentions the roles entitled
//! to handle the chosen category. Creation is a short pipeline with no
//! compensation: if a later step fails, earlier steps are left in place and
//! the error surfaces to the requester.

use crate::api::SupportApi;
use crate::channel::ChannelReconciler;
use crate::model::ThreadInfo;
use crate::permissions::filter_roles_by_tier;
use std::sync::Arc;
use ticketry_core::{
    Category, TicketData, TicketryConfig, determine_role_filter, find_by_description,
    render_ticket,
};
use ticketry_error::{NotFoundError, TicketryResult};
use tracing::{info, instrument, warn};

/// Threads auto-archive after one hour of inactivity.
const AUTO_ARCHIVE_MINUTES: u16 = 60;

/// One submitted ticket, as carried by the slash command.
#[derive(Debug, Clone)]
pub struct TicketRequest {
    /// Guild the ticket was raised in
    pub guild_id: u64,
    /// Requester's user id
    pub user_id: u64,
    /// Requester's username, used in the thread name
    pub username: String,
    /// Chosen category, by description
    pub category: String,
    /// Short subject line
    pub subject: String,
    /// Full problem description
    pub content: String,
    /// First attachment, when the requester supplied one
    pub attachment_url: Option<String>,
}

/// Turns ticket requests into private threads.
#[derive(Clone)]
pub struct TicketOrchestrator {
    api: Arc<dyn SupportApi>,
    channels: ChannelReconciler,
}

impl TicketOrchestrator {
    /// Create an orchestrator over the given API and configuration.
    pub fn new(api: Arc<dyn SupportApi>, config: Arc<TicketryConfig>) -> Self {
        Self {
            channels: ChannelReconciler::new(api.clone(), config),
            api,
        }
    }

    /// Create a ticket thread and post its summary; returns the thread.
    ///
    /// Fails with a not-found error when the category description does not
    /// match any known category or the guild has no support channel.
    #[instrument(skip(self, request), fields(guild_id = request.guild_id, user_id = request.user_id))]
    pub async fn create(&self, request: &TicketRequest) -> TicketryResult<ThreadInfo> {
        let category = find_by_description(&request.category)
            .ok_or_else(|| NotFoundError::category(&request.category))?;
        let channel = self
            .channels
            .find(request.guild_id)
            .await?
            .ok_or_else(|| NotFoundError::support_channel(request.guild_id))?;

        let name = format!(
            "{} - {} | ({})",
            request.username,
            request.subject,
            category.info().description
        );
        let thread = self
            .api
            .create_private_thread(channel.id, &name, AUTO_ARCHIVE_MINUTES)
            .await?;
        self.api
            .add_thread_member(thread.id, request.user_id)
            .await?;

        let body = render_ticket(&TicketData {
            category: category.info().description.to_string(),
            username: request.username.clone(),
            subject: request.subject.clone(),
            content: request.content.clone(),
            moderators: self.handler_role_ids(request.guild_id, category).await,
            attachment_url: request.attachment_url.clone(),
        })?;
        self.api.post_message(thread.id, &body).await?;
        info!(thread_id = thread.id, "Created ticket thread");
        Ok(thread)
    }

    /// Ids of the roles that should be mentioned for this category.
    ///
    /// Role listing failure degrades to an unmentioned ticket rather than a
    /// failed one; the thread is still reachable through the channel.
    async fn handler_role_ids(&self, guild_id: u64, category: Category) -> Vec<String> {
        let roles = match self.api.guild_roles(guild_id).await {
            Ok(roles) => roles,
            Err(e) => {
                warn!(guild_id, error = %e, "Failed to list roles; creating ticket without mentions");
                return Vec::new();
            }
        };
        let tiers = determine_role_filter(category);
        filter_roles_by_tier(&roles, &tiers)
            .into_iter()
            .map(|role| role.id.to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RoleInfo;
    use crate::testing::InMemoryApi;
    use serenity::model::permissions::Permissions;
    use ticketry_error::TicketryErrorKind;

    fn orchestrator(api: Arc<InMemoryApi>) -> TicketOrchestrator {
        TicketOrchestrator::new(api, Arc::new(TicketryConfig::default()))
    }

    fn request(category: &str) -> TicketRequest {
        TicketRequest {
            guild_id: 100,
            user_id: 555,
            username: "helpme".to_string(),
            category: category.to_string(),
            subject: "Cannot join voice".to_string(),
            content: "The join button does nothing.".to_string(),
            attachment_url: None,
        }
    }

    fn guild_with_channel(api: &InMemoryApi) -> u64 {
        api.add_guild(100);
        api.add_channel(100, "support-tickets")
    }

    #[tokio::test]
    async fn creates_thread_with_member_and_summary() {
        let api = Arc::new(InMemoryApi::new(1));
        let channel_id = guild_with_channel(&api);
        api.set_roles(
            100,
            vec![RoleInfo {
                id: 42,
                name: "Mods".to_string(),
                permissions: Permissions::VIEW_AUDIT_LOG | Permissions::MANAGE_MESSAGES,
                managed: false,
            }],
        );

        let thread = orchestrator(api.clone())
            .create(&request("General support questions"))
            .await
            .unwrap();

        assert_eq!(
            thread.name,
            "helpme - Cannot join voice | (General support questions)"
        );
        let threads = api.threads_in(channel_id);
        assert_eq!(threads.len(), 1);
        assert_eq!(api.thread_members(thread.id), vec![555]);
        let messages = api.messages(thread.id);
        assert_eq!(messages.len(), 1);
        assert!(messages[0].content.contains("<@&42>"));
        assert!(messages[0].content.contains("Cannot join voice"));
    }

    #[tokio::test]
    async fn unknown_category_is_rejected() {
        let api = Arc::new(InMemoryApi::new(1));
        guild_with_channel(&api);
        let err = orchestrator(api)
            .create(&request("No such category"))
            .await
            .unwrap_err();
        assert!(matches!(err.kind(), TicketryErrorKind::NotFound(_)));
        assert!(format!("{err}").contains("No such category"));
    }

    #[tokio::test]
    async fn missing_support_channel_is_rejected() {
        let api = Arc::new(InMemoryApi::new(1));
        api.add_guild(100);
        let err = orchestrator(api.clone())
            .create(&request("General support questions"))
            .await
            .unwrap_err();
        assert!(matches!(err.kind(), TicketryErrorKind::NotFound(_)));
        // Nothing was created.
        assert_eq!(api.counts().posts, 0);
    }

    #[tokio::test]
    async fn role_listing_failure_still_creates_ticket() {
        let api = Arc::new(InMemoryApi::new(1));
        let channel_id = guild_with_channel(&api);
        api.fail_guild(100, "get guild roles");

        let thread = orchestrator(api.clone())
            .create(&request("General support questions"))
            .await
            .unwrap();
        assert_eq!(api.threads_in(channel_id).len(), 1);
        let messages = api.messages(thread.id);
        assert_eq!(messages.len(), 1);
        assert!(!messages[0].content.contains("<@&"));
    }

    #[tokio::test]
    async fn owner_category_mentions_admin_roles_only() {
        let api = Arc::new(InMemoryApi::new(1));
        guild_with_channel(&api);
        api.set_roles(
            100,
            vec![
                RoleInfo {
                    id: 42,
                    name: "Mods".to_string(),
                    permissions: Permissions::VIEW_AUDIT_LOG | Permissions::MANAGE_MESSAGES,
                    managed: false,
                },
                RoleInfo {
                    id: 77,
                    name: "Admins".to_string(),
                    permissions: Permissions::ADMINISTRATOR,
                    managed: false,
                },
            ],
        );

        let thread = orchestrator(api.clone())
            .create(&request("Owner support questions"))
            .await
            .unwrap();
        let body = &api.messages(thread.id)[0].content;
        assert!(body.contains("<@&77>"));
        assert!(!body.contains("<@&42>"));
    }
}
