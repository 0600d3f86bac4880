//! Platform-free domain logic for the Ticketry support bot.
//!
//! This crate holds everything that does not touch the chat platform:
//! permission tiers, the ticket category registry, message templates, and
//! process configuration. The `ticketry_discord` crate consumes these to
//! drive reconciliation against the remote API.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod category;
mod config;
mod template;
mod tier;

pub use category::{
    Category, CategoryChoice, CategoryInfo, determine_role_filter, filter_choices,
    find_by_description,
};
pub use config::{
    BotSettings, FanoutConfig, LogConfig, LogFormat, SupportChannelConfig, TicketLimits,
    TicketryConfig,
};
pub use template::{HelpData, TicketData, render_ephemeral_help, render_help, render_ticket};
pub use tier::PermissionTier;
