//! Discord reconciliation and ticket lifecycle engine for Ticketry.
//!
//! This crate brings each guild's support channel into a desired state and
//! manages ticket threads inside it, against the Discord REST API. Every run
//! re-derives current state from the remote side; there is no local
//! persistence.
//!
//! # Architecture
//!
//! ## Engine layer (API-agnostic, tested against an in-memory fake)
//! - **model**: thin data model for the remote resources the engine touches
//! - **api**: the `SupportApi` seam between engine and transport
//! - **permissions** / **overwrites**: role classification and permission
//!   overwrite construction
//! - **channel** / **messages**: support channel reconciliation and help
//!   message synchronization
//! - **ticket**: ticket thread creation
//! - **fanout** / **reconcile**: bounded concurrent orchestration
//!
//! ## Integration layer (serenity)
//! - **client**: gateway client setup and lifecycle
//! - **handler**: event handler wiring gateway events to the engine
//! - **commands**: slash command definitions and registration
//!
//! The **testing** module ships the in-memory `SupportApi` used by the test
//! suites.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod api;
mod channel;
mod client;
pub mod commands;
mod fanout;
mod handler;
mod messages;
mod model;
mod overwrites;
mod permissions;
mod reconcile;
pub mod testing;
mod ticket;

pub use api::{SerenityApi, SupportApi};
pub use channel::ChannelReconciler;
pub use client::TicketryBot;
pub use fanout::{FanoutOptions, FanoutTask, join_bounded};
pub use handler::{TicketryHandler, VersionInfo};
pub use messages::MessageSynchronizer;
pub use model::{
    ChannelInfo, MessageInfo, Overwrite, OverwriteSubject, RoleInfo, ThreadInfo,
};
pub use overwrites::{assemble_overwrites, build_support_overwrites, everyone_overwrite};
pub use permissions::{classify, filter_roles_by_name, filter_roles_by_tier, required_capabilities};
pub use reconcile::{GuildReconciler, GuildTarget};
pub use ticket::{TicketOrchestrator, TicketRequest};
