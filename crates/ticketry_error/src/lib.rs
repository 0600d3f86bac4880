//! Error types for the Ticketry support bot.
//!
//! This crate provides the foundation error types used throughout the
//! Ticketry workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the dedicated-struct pattern with a top-level wrapper:
//! - focused error structs (`ApiError`, `ConfigError`, ...) describe one
//!   failure domain each
//! - `TicketryError` wraps any of them behind `TicketryErrorKind`
//! - location-bearing errors use `#[track_caller]` for automatic capture
//!
//! # Examples
//!
//! ```
//! use ticketry_error::{ApiError, TicketryResult};
//!
//! fn fetch_channels() -> TicketryResult<Vec<String>> {
//!     Err(ApiError::new("get guild channels", "connection refused"))?
//! }
//!
//! match fetch_channels() {
//!     Ok(channels) => println!("Got {} channels", channels.len()),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod api;
mod batch;
mod config;
mod error;
mod not_found;
mod template;

pub use api::ApiError;
pub use batch::{BatchError, TaskFailure};
pub use config::ConfigError;
pub use error::{TicketryError, TicketryErrorKind, TicketryResult};
pub use not_found::{NotFoundError, NotFoundErrorKind};
pub use template::TemplateError;
