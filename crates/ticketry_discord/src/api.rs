//! The seam between the reconciliation engine and the Discord transport.
//!
//! `SupportApi` names every remote operation the engine performs. The
//! production implementation (`SerenityApi`) forwards to serenity's HTTP
//! client, which already retries on rate limits; tests run the engine
//! against the in-memory implementation in [`crate::testing`].

use crate::model::{ChannelInfo, MessageInfo, Overwrite, RoleInfo, ThreadInfo};
use async_trait::async_trait;
use serenity::builder::{
    CreateChannel, CreateMessage, CreateThread, EditChannel, EditMessage, GetMessages,
};
use serenity::http::Http;
use serenity::model::channel::{
    AutoArchiveDuration, ChannelType, PermissionOverwrite, PermissionOverwriteType,
};
use serenity::model::id::{ChannelId, GuildId, MessageId, RoleId, UserId};
use std::sync::Arc;
use ticketry_error::{ApiError, TicketryResult};
use tracing::{debug, instrument};

/// Remote chat-platform operations the engine depends on.
///
/// Implementations must be safe for concurrent use by many tasks; the engine
/// fans out over guilds and messages without further coordination.
#[async_trait]
pub trait SupportApi: Send + Sync {
    /// List a guild's channels.
    async fn guild_channels(&self, guild_id: u64) -> TicketryResult<Vec<ChannelInfo>>;

    /// List a guild's roles.
    async fn guild_roles(&self, guild_id: u64) -> TicketryResult<Vec<RoleInfo>>;

    /// Create a text channel with the given name, topic and overwrites.
    async fn create_text_channel(
        &self,
        guild_id: u64,
        name: &str,
        topic: &str,
        overwrites: &[Overwrite],
    ) -> TicketryResult<ChannelInfo>;

    /// Update a channel's name, topic and type. `None` for `overwrites`
    /// leaves the channel's existing permission overwrites untouched.
    async fn update_text_channel(
        &self,
        channel_id: u64,
        name: &str,
        topic: &str,
        overwrites: Option<&[Overwrite]>,
    ) -> TicketryResult<ChannelInfo>;

    /// Fetch up to `limit` most recent messages, newest first.
    async fn recent_messages(
        &self,
        channel_id: u64,
        limit: u8,
    ) -> TicketryResult<Vec<MessageInfo>>;

    /// Edit a message's content in place.
    async fn edit_message(
        &self,
        channel_id: u64,
        message_id: u64,
        content: &str,
    ) -> TicketryResult<()>;

    /// Delete a single message.
    async fn delete_message(&self, channel_id: u64, message_id: u64) -> TicketryResult<()>;

    /// Post a new message.
    async fn post_message(&self, channel_id: u64, content: &str) -> TicketryResult<MessageInfo>;

    /// Create a private thread under a channel.
    async fn create_private_thread(
        &self,
        channel_id: u64,
        name: &str,
        auto_archive_minutes: u16,
    ) -> TicketryResult<ThreadInfo>;

    /// Add a member to a thread.
    async fn add_thread_member(&self, thread_id: u64, user_id: u64) -> TicketryResult<()>;

    /// The bot's own user id.
    async fn current_user_id(&self) -> TicketryResult<u64>;
}

/// Production `SupportApi` backed by serenity's HTTP client.
#[derive(Clone)]
pub struct SerenityApi {
    http: Arc<Http>,
}

impl SerenityApi {
    /// Wrap an existing HTTP client.
    ///
    /// Sharing the client with the gateway connection keeps rate-limit
    /// accounting in one place.
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }

    fn overwrites_to_serenity(overwrites: &[Overwrite]) -> Vec<PermissionOverwrite> {
        overwrites
            .iter()
            .map(|o| PermissionOverwrite {
                allow: o.allow,
                deny: o.deny,
                kind: PermissionOverwriteType::Role(RoleId::new(o.subject.role_id())),
            })
            .collect()
    }

    fn archive_duration(minutes: u16) -> AutoArchiveDuration {
        match minutes {
            60 => AutoArchiveDuration::OneHour,
            1440 => AutoArchiveDuration::OneDay,
            4320 => AutoArchiveDuration::ThreeDays,
            10080 => AutoArchiveDuration::OneWeek,
            _ => AutoArchiveDuration::OneHour,
        }
    }
}

#[async_trait]
impl SupportApi for SerenityApi {
    #[instrument(skip(self), fields(guild_id))]
    async fn guild_channels(&self, guild_id: u64) -> TicketryResult<Vec<ChannelInfo>> {
        let channels = self
            .http
            .get_channels(GuildId::new(guild_id))
            .await
            .map_err(|e| ApiError::new("get guild channels", e.to_string()))?;
        debug!(count = channels.len(), "Fetched guild channels");
        Ok(channels.iter().map(ChannelInfo::from).collect())
    }

    #[instrument(skip(self), fields(guild_id))]
    async fn guild_roles(&self, guild_id: u64) -> TicketryResult<Vec<RoleInfo>> {
        let roles = self
            .http
            .get_guild_roles(GuildId::new(guild_id))
            .await
            .map_err(|e| ApiError::new("get guild roles", e.to_string()))?;
        debug!(count = roles.len(), "Fetched guild roles");
        Ok(roles.iter().map(RoleInfo::from).collect())
    }

    #[instrument(skip(self, overwrites), fields(guild_id, name, overwrite_count = overwrites.len()))]
    async fn create_text_channel(
        &self,
        guild_id: u64,
        name: &str,
        topic: &str,
        overwrites: &[Overwrite],
    ) -> TicketryResult<ChannelInfo> {
        let builder = CreateChannel::new(name)
            .kind(ChannelType::Text)
            .topic(topic)
            .permissions(Self::overwrites_to_serenity(overwrites));
        let channel = GuildId::new(guild_id)
            .create_channel(&self.http, builder)
            .await
            .map_err(|e| ApiError::new("create support channel", e.to_string()))?;
        Ok(ChannelInfo::from(&channel))
    }

    #[instrument(skip(self, overwrites), fields(channel_id, name, overwrite_count = overwrites.map_or(0, |o| o.len())))]
    async fn update_text_channel(
        &self,
        channel_id: u64,
        name: &str,
        topic: &str,
        overwrites: Option<&[Overwrite]>,
    ) -> TicketryResult<ChannelInfo> {
        let mut builder = EditChannel::new()
            .name(name)
            .kind(ChannelType::Text)
            .topic(topic);
        if let Some(overwrites) = overwrites {
            builder = builder.permissions(Self::overwrites_to_serenity(overwrites));
        }
        let channel = ChannelId::new(channel_id)
            .edit(&self.http, builder)
            .await
            .map_err(|e| ApiError::new("update support channel", e.to_string()))?;
        Ok(ChannelInfo::from(&channel))
    }

    #[instrument(skip(self), fields(channel_id, limit))]
    async fn recent_messages(
        &self,
        channel_id: u64,
        limit: u8,
    ) -> TicketryResult<Vec<MessageInfo>> {
        let messages = ChannelId::new(channel_id)
            .messages(&self.http, GetMessages::new().limit(limit))
            .await
            .map_err(|e| ApiError::new("get channel messages", e.to_string()))?;
        Ok(messages.iter().map(MessageInfo::from).collect())
    }

    #[instrument(skip(self, content), fields(channel_id, message_id))]
    async fn edit_message(
        &self,
        channel_id: u64,
        message_id: u64,
        content: &str,
    ) -> TicketryResult<()> {
        ChannelId::new(channel_id)
            .edit_message(
                &self.http,
                MessageId::new(message_id),
                EditMessage::new().content(content),
            )
            .await
            .map_err(|e| ApiError::new("update help message", e.to_string()))?;
        Ok(())
    }

    #[instrument(skip(self), fields(channel_id, message_id))]
    async fn delete_message(&self, channel_id: u64, message_id: u64) -> TicketryResult<()> {
        ChannelId::new(channel_id)
            .delete_message(&self.http, MessageId::new(message_id))
            .await
            .map_err(|e| ApiError::new("delete message", e.to_string()))?;
        Ok(())
    }

    #[instrument(skip(self, content), fields(channel_id))]
    async fn post_message(&self, channel_id: u64, content: &str) -> TicketryResult<MessageInfo> {
        let message = ChannelId::new(channel_id)
            .send_message(&self.http, CreateMessage::new().content(content))
            .await
            .map_err(|e| ApiError::new("create message", e.to_string()))?;
        Ok(MessageInfo::from(&message))
    }

    #[instrument(skip(self), fields(channel_id, name))]
    async fn create_private_thread(
        &self,
        channel_id: u64,
        name: &str,
        auto_archive_minutes: u16,
    ) -> TicketryResult<ThreadInfo> {
        let builder = CreateThread::new(name)
            .kind(ChannelType::PrivateThread)
            .auto_archive_duration(Self::archive_duration(auto_archive_minutes));
        let thread = ChannelId::new(channel_id)
            .create_thread(&self.http, builder)
            .await
            .map_err(|e| ApiError::new("create ticket thread", e.to_string()))?;
        Ok(ThreadInfo {
            id: thread.id.get(),
            name: thread.name.clone(),
        })
    }

    #[instrument(skip(self), fields(thread_id, user_id))]
    async fn add_thread_member(&self, thread_id: u64, user_id: u64) -> TicketryResult<()> {
        self.http
            .add_thread_channel_member(ChannelId::new(thread_id), UserId::new(user_id))
            .await
            .map_err(|e| ApiError::new("add thread member", e.to_string()))?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn current_user_id(&self) -> TicketryResult<u64> {
        let user = self
            .http
            .get_current_user()
            .await
            .map_err(|e| ApiError::new("get current user", e.to_string()))?;
        Ok(user.id.get())
    }
}
