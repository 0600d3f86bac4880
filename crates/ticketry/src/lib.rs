//! Ticketry - Discord support bot.
//!
//! Ticketry keeps a well-known support channel converged in every guild it
//! serves and opens private ticket threads on demand. All remote state is
//! re-derived on each run; the bot holds no persistence of its own.
//!
//! # Architecture
//!
//! The workspace is organized as focused crates:
//!
//! - `ticketry_error` - Error types
//! - `ticketry_core` - Platform-free domain logic: categories, tiers,
//!   templates, configuration
//! - `ticketry_discord` - Reconciliation engine and serenity integration
//!
//! This crate (`ticketry`) re-exports everything and ships the binary.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub use ticketry_core::{
    BotSettings, Category, CategoryChoice, CategoryInfo, FanoutConfig, HelpData, LogConfig,
    LogFormat, PermissionTier, SupportChannelConfig, TicketData, TicketLimits, TicketryConfig,
    determine_role_filter, filter_choices, find_by_description, render_ephemeral_help,
    render_help, render_ticket,
};
pub use ticketry_discord::{
    ChannelInfo, ChannelReconciler, GuildReconciler, GuildTarget, MessageInfo,
    MessageSynchronizer, Overwrite, OverwriteSubject, RoleInfo, SerenityApi, SupportApi,
    ThreadInfo, TicketOrchestrator, TicketRequest, TicketryBot, TicketryHandler, VersionInfo,
};
pub use ticketry_error::{
    ApiError, BatchError, ConfigError, NotFoundError, NotFoundErrorKind, TaskFailure,
    TemplateError, TicketryError, TicketryErrorKind, TicketryResult,
};
