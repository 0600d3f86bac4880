//! Thin data model for the remote resources the engine touches.
//!
//! The engine works on these structs rather than serenity's models so that
//! reconciliation logic stays constructible in tests. Conversions from the
//! serenity types live next to the structs they feed.

use serenity::model::channel::{GuildChannel, Message};
use serenity::model::guild::Role;
use serenity::model::permissions::Permissions;

/// A guild role as seen by the classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleInfo {
    /// Role snowflake
    pub id: u64,
    /// Display name
    pub name: String,
    /// Granted capability set
    pub permissions: Permissions,
    /// Platform-owned roles are excluded from name-based matching
    pub managed: bool,
}

impl From<&Role> for RoleInfo {
    fn from(role: &Role) -> Self {
        Self {
            id: role.id.get(),
            name: role.name.clone(),
            permissions: role.permissions,
            managed: role.managed,
        }
    }
}

/// A guild channel, reduced to what the reconciler matches on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelInfo {
    /// Channel snowflake
    pub id: u64,
    /// Channel name
    pub name: String,
}

impl From<&GuildChannel> for ChannelInfo {
    fn from(channel: &GuildChannel) -> Self {
        Self {
            id: channel.id.get(),
            name: channel.name.clone(),
        }
    }
}

/// A channel message, reduced to what the synchronizer inspects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageInfo {
    /// Message snowflake
    pub id: u64,
    /// Message content
    pub content: String,
    /// Author snowflake
    pub author_id: u64,
}

impl From<&Message> for MessageInfo {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id.get(),
            content: message.content.clone(),
            author_id: message.author.id.get(),
        }
    }
}

/// A private thread created for one ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadInfo {
    /// Thread snowflake
    pub id: u64,
    /// Thread name
    pub name: String,
}

/// The subject an overwrite applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverwriteSubject {
    /// A specific role.
    Role(u64),
    /// The guild-default (everyone) rule; carries the guild id, which
    /// doubles as the everyone role id on the wire.
    Everyone(u64),
}

impl OverwriteSubject {
    /// The role id this subject resolves to on the wire.
    pub fn role_id(self) -> u64 {
        match self {
            OverwriteSubject::Role(id) => id,
            OverwriteSubject::Everyone(guild_id) => guild_id,
        }
    }
}

/// A per-subject allow/deny permission delta applied to a channel or thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overwrite {
    /// Role or guild-default this entry applies to
    pub subject: OverwriteSubject,
    /// Capabilities granted
    pub allow: Permissions,
    /// Capabilities denied
    pub deny: Permissions,
}

impl Overwrite {
    /// Allow-only overwrite for a role.
    pub fn allow_role(role_id: u64, allow: Permissions) -> Self {
        Self {
            subject: OverwriteSubject::Role(role_id),
            allow,
            deny: Permissions::empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn everyone_subject_resolves_to_guild_id() {
        assert_eq!(OverwriteSubject::Everyone(42).role_id(), 42);
        assert_eq!(OverwriteSubject::Role(7).role_id(), 7);
    }

    #[test]
    fn allow_role_denies_nothing() {
        let o = Overwrite::allow_role(7, Permissions::SEND_MESSAGES);
        assert_eq!(o.deny, Permissions::empty());
        assert_eq!(o.subject, OverwriteSubject::Role(7));
    }
}
