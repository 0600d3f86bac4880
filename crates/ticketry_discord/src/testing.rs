//! In-memory `SupportApi` implementation for tests.
//!
//! Models just enough of the remote side for the engine: guilds hold roles
//! and channels, channels (and threads) hold newest-first message lists.
//! Failures are injected by operation name, either one-shot or pinned to a
//! guild, matching the operation strings the engine wraps its errors with.

use crate::api::SupportApi;
use crate::model::{ChannelInfo, MessageInfo, Overwrite, RoleInfo, ThreadInfo};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use ticketry_error::{ApiError, TicketryResult};

/// Write-call counters, for asserting how much work a run performed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    /// Message edits
    pub edits: u64,
    /// Message deletions
    pub deletes: u64,
    /// Message posts
    pub posts: u64,
    /// Channel creations
    pub channel_creates: u64,
    /// Channel updates
    pub channel_updates: u64,
}

#[derive(Default)]
struct State {
    guilds: HashSet<u64>,
    roles: HashMap<u64, Vec<RoleInfo>>,
    channels: HashMap<u64, Vec<ChannelInfo>>,
    /// Channel (or thread) id to messages, newest first.
    messages: HashMap<u64, Vec<MessageInfo>>,
    /// Thread id to (parent channel id, thread).
    threads: HashMap<u64, (u64, ThreadInfo)>,
    thread_members: HashMap<u64, Vec<u64>>,
    /// Last overwrite list applied per channel.
    overwrites: HashMap<u64, Vec<Overwrite>>,
    fail_once: HashSet<String>,
    fail_guild: HashSet<(u64, String)>,
    counts: CallCounts,
    next_id: u64,
}

/// In-process fake of the remote chat platform.
pub struct InMemoryApi {
    bot_user_id: u64,
    state: Mutex<State>,
}

impl InMemoryApi {
    /// Create an empty platform whose bot user has the given id.
    pub fn new(bot_user_id: u64) -> Self {
        Self {
            bot_user_id,
            state: Mutex::new(State {
                next_id: 1000,
                ..State::default()
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().expect("in-memory api state poisoned")
    }

    /// Register a guild with no roles or channels.
    pub fn add_guild(&self, guild_id: u64) {
        self.lock().guilds.insert(guild_id);
    }

    /// Replace a guild's role list.
    pub fn set_roles(&self, guild_id: u64, roles: Vec<RoleInfo>) {
        let mut state = self.lock();
        state.guilds.insert(guild_id);
        state.roles.insert(guild_id, roles);
    }

    /// Add a channel to a guild; returns its id.
    pub fn add_channel(&self, guild_id: u64, name: &str) -> u64 {
        let mut state = self.lock();
        state.guilds.insert(guild_id);
        state.next_id += 1;
        let id = state.next_id;
        state.channels.entry(guild_id).or_default().push(ChannelInfo {
            id,
            name: name.to_string(),
        });
        state.messages.insert(id, Vec::new());
        id
    }

    /// Seed a message as the channel's newest.
    pub fn seed_message(&self, channel_id: u64, author_id: u64, content: &str) {
        let mut state = self.lock();
        state.next_id += 1;
        let id = state.next_id;
        state.messages.entry(channel_id).or_default().insert(
            0,
            MessageInfo {
                id,
                content: content.to_string(),
                author_id,
            },
        );
    }

    /// Fail the next call wrapped with the given operation name.
    pub fn fail_next(&self, operation: &str) {
        self.lock().fail_once.insert(operation.to_string());
    }

    /// Fail every call wrapped with the given operation name against the
    /// given guild.
    pub fn fail_guild(&self, guild_id: u64, operation: &str) {
        self.lock()
            .fail_guild
            .insert((guild_id, operation.to_string()));
    }

    /// Current write-call counters.
    pub fn counts(&self) -> CallCounts {
        self.lock().counts
    }

    /// The first channel with the given name in a guild, if any.
    pub fn channel_named(&self, guild_id: u64, name: &str) -> Option<ChannelInfo> {
        self.lock()
            .channels
            .get(&guild_id)
            .and_then(|channels| channels.iter().find(|c| c.name == name).cloned())
    }

    /// Messages in a channel or thread, newest first.
    pub fn messages(&self, channel_id: u64) -> Vec<MessageInfo> {
        self.lock()
            .messages
            .get(&channel_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Threads created under a channel.
    pub fn threads_in(&self, channel_id: u64) -> Vec<ThreadInfo> {
        self.lock()
            .threads
            .values()
            .filter(|(parent, _)| *parent == channel_id)
            .map(|(_, thread)| thread.clone())
            .collect()
    }

    /// Members added to a thread.
    pub fn thread_members(&self, thread_id: u64) -> Vec<u64> {
        self.lock()
            .thread_members
            .get(&thread_id)
            .cloned()
            .unwrap_or_default()
    }

    /// The overwrite list most recently applied to a channel.
    pub fn last_overwrites(&self, channel_id: u64) -> Vec<Overwrite> {
        self.lock()
            .overwrites
            .get(&channel_id)
            .cloned()
            .unwrap_or_default()
    }

    fn check_fail(
        state: &mut State,
        guild_id: Option<u64>,
        operation: &str,
    ) -> TicketryResult<()> {
        if state.fail_once.remove(operation) {
            return Err(ApiError::new(operation, "injected failure").into());
        }
        if let Some(guild_id) = guild_id {
            if state.fail_guild.contains(&(guild_id, operation.to_string())) {
                return Err(ApiError::new(operation, "injected guild failure").into());
            }
        }
        Ok(())
    }

    fn require_guild(state: &State, guild_id: u64, operation: &str) -> TicketryResult<()> {
        if state.guilds.contains(&guild_id) {
            Ok(())
        } else {
            Err(ApiError::new(operation, format!("unknown guild {guild_id}")).into())
        }
    }
}

#[async_trait]
impl SupportApi for InMemoryApi {
    async fn guild_channels(&self, guild_id: u64) -> TicketryResult<Vec<ChannelInfo>> {
        let mut state = self.lock();
        Self::check_fail(&mut state, Some(guild_id), "get guild channels")?;
        Self::require_guild(&state, guild_id, "get guild channels")?;
        Ok(state.channels.get(&guild_id).cloned().unwrap_or_default())
    }

    async fn guild_roles(&self, guild_id: u64) -> TicketryResult<Vec<RoleInfo>> {
        let mut state = self.lock();
        Self::check_fail(&mut state, Some(guild_id), "get guild roles")?;
        Self::require_guild(&state, guild_id, "get guild roles")?;
        Ok(state.roles.get(&guild_id).cloned().unwrap_or_default())
    }

    async fn create_text_channel(
        &self,
        guild_id: u64,
        name: &str,
        topic: &str,
        overwrites: &[Overwrite],
    ) -> TicketryResult<ChannelInfo> {
        let _ = topic;
        let mut state = self.lock();
        Self::check_fail(&mut state, Some(guild_id), "create support channel")?;
        Self::require_guild(&state, guild_id, "create support channel")?;
        state.next_id += 1;
        let id = state.next_id;
        let channel = ChannelInfo {
            id,
            name: name.to_string(),
        };
        state
            .channels
            .entry(guild_id)
            .or_default()
            .push(channel.clone());
        state.messages.insert(id, Vec::new());
        state.overwrites.insert(id, overwrites.to_vec());
        state.counts.channel_creates += 1;
        Ok(channel)
    }

    async fn update_text_channel(
        &self,
        channel_id: u64,
        name: &str,
        topic: &str,
        overwrites: Option<&[Overwrite]>,
    ) -> TicketryResult<ChannelInfo> {
        let _ = topic;
        let mut state = self.lock();
        Self::check_fail(&mut state, None, "update support channel")?;
        let channel = state
            .channels
            .values_mut()
            .flatten()
            .find(|c| c.id == channel_id)
            .ok_or_else(|| {
                ApiError::new("update support channel", format!("unknown channel {channel_id}"))
            })?;
        channel.name = name.to_string();
        let updated = channel.clone();
        if let Some(overwrites) = overwrites {
            state.overwrites.insert(channel_id, overwrites.to_vec());
        }
        state.counts.channel_updates += 1;
        Ok(updated)
    }

    async fn recent_messages(
        &self,
        channel_id: u64,
        limit: u8,
    ) -> TicketryResult<Vec<MessageInfo>> {
        let mut state = self.lock();
        Self::check_fail(&mut state, None, "get channel messages")?;
        let messages = state.messages.get(&channel_id).ok_or_else(|| {
            ApiError::new("get channel messages", format!("unknown channel {channel_id}"))
        })?;
        Ok(messages.iter().take(limit as usize).cloned().collect())
    }

    async fn edit_message(
        &self,
        channel_id: u64,
        message_id: u64,
        content: &str,
    ) -> TicketryResult<()> {
        let mut state = self.lock();
        Self::check_fail(&mut state, None, "update help message")?;
        let message = state
            .messages
            .get_mut(&channel_id)
            .and_then(|messages| messages.iter_mut().find(|m| m.id == message_id))
            .ok_or_else(|| {
                ApiError::new("update help message", format!("unknown message {message_id}"))
            })?;
        message.content = content.to_string();
        state.counts.edits += 1;
        Ok(())
    }

    async fn delete_message(&self, channel_id: u64, message_id: u64) -> TicketryResult<()> {
        let mut state = self.lock();
        Self::check_fail(&mut state, None, "delete message")?;
        let messages = state.messages.get_mut(&channel_id).ok_or_else(|| {
            ApiError::new("delete message", format!("unknown channel {channel_id}"))
        })?;
        messages.retain(|m| m.id != message_id);
        state.counts.deletes += 1;
        Ok(())
    }

    async fn post_message(&self, channel_id: u64, content: &str) -> TicketryResult<MessageInfo> {
        let mut state = self.lock();
        Self::check_fail(&mut state, None, "create message")?;
        if !state.messages.contains_key(&channel_id) {
            return Err(
                ApiError::new("create message", format!("unknown channel {channel_id}")).into(),
            );
        }
        state.next_id += 1;
        let message = MessageInfo {
            id: state.next_id,
            content: content.to_string(),
            author_id: self.bot_user_id,
        };
        state
            .messages
            .get_mut(&channel_id)
            .expect("checked above")
            .insert(0, message.clone());
        state.counts.posts += 1;
        Ok(message)
    }

    async fn create_private_thread(
        &self,
        channel_id: u64,
        name: &str,
        auto_archive_minutes: u16,
    ) -> TicketryResult<ThreadInfo> {
        let _ = auto_archive_minutes;
        let mut state = self.lock();
        Self::check_fail(&mut state, None, "create ticket thread")?;
        if !state.messages.contains_key(&channel_id) {
            return Err(ApiError::new(
                "create ticket thread",
                format!("unknown channel {channel_id}"),
            )
            .into());
        }
        state.next_id += 1;
        let id = state.next_id;
        let thread = ThreadInfo {
            id,
            name: name.to_string(),
        };
        state.threads.insert(id, (channel_id, thread.clone()));
        state.messages.insert(id, Vec::new());
        Ok(thread)
    }

    async fn add_thread_member(&self, thread_id: u64, user_id: u64) -> TicketryResult<()> {
        let mut state = self.lock();
        Self::check_fail(&mut state, None, "add thread member")?;
        if !state.threads.contains_key(&thread_id) {
            return Err(
                ApiError::new("add thread member", format!("unknown thread {thread_id}")).into(),
            );
        }
        state.thread_members.entry(thread_id).or_default().push(user_id);
        Ok(())
    }

    async fn current_user_id(&self) -> TicketryResult<u64> {
        Ok(self.bot_user_id)
    }
}
