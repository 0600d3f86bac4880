//! Recoverable not-found conditions.

use derive_getters::Getters;

/// Not-found variants.
///
/// These are recoverable conditions the caller surfaces to the user rather
/// than crash states: a guild that has never been reconciled simply has no
/// support channel yet, and a free-typed category string may match nothing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum NotFoundErrorKind {
    /// No support channel exists in the guild.
    #[display("support channel not found in guild {_0}")]
    SupportChannel(u64),

    /// No ticket category matches the submitted description.
    #[display("no ticket category matches {_0:?}")]
    Category(String),
}

/// Not-found error with source location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error, Getters)]
#[display("Not Found: {} at line {} in {}", kind, line, file)]
pub struct NotFoundError {
    kind: NotFoundErrorKind,
    line: u32,
    file: &'static str,
}

impl NotFoundError {
    /// Create a new NotFoundError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: NotFoundErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Missing support channel in the given guild.
    #[track_caller]
    pub fn support_channel(guild_id: u64) -> Self {
        Self::new(NotFoundErrorKind::SupportChannel(guild_id))
    }

    /// Unmatched ticket category description.
    #[track_caller]
    pub fn category(description: impl Into<String>) -> Self {
        Self::new(NotFoundErrorKind::Category(description.into()))
    }
}
