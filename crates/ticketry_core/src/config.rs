//! Process configuration.
//!
//! One immutable `TicketryConfig` value is loaded at startup and passed into
//! each component at construction. Nothing here is process-global.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use ticketry_error::{ConfigError, TicketryResult};

/// Configuration for the Ticketry bot process.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TicketryConfig {
    /// Support channel identity
    #[serde(default)]
    pub support: SupportChannelConfig,
    /// Bot identity and registration targets
    #[serde(default)]
    pub bot: BotSettings,
    /// Ticket field length bounds
    #[serde(default)]
    pub limits: TicketLimits,
    /// Fan-out concurrency and deadlines
    #[serde(default)]
    pub fanout: FanoutConfig,
    /// Log output settings
    #[serde(default)]
    pub log: LogConfig,
}

impl TicketryConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> TicketryResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(content: &str) -> TicketryResult<Self> {
        toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)).into())
    }
}

/// Identity of the per-guild support channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupportChannelConfig {
    /// Well-known channel name the reconciler matches on
    pub name: String,
    /// Channel topic applied on create and update
    pub topic: String,
}

impl Default for SupportChannelConfig {
    fn default() -> Self {
        Self {
            name: "support-tickets".to_string(),
            topic: "Support tickets & suggestions".to_string(),
        }
    }
}

/// Bot identity and command registration targets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotSettings {
    /// Role names granted blanket channel and thread access
    pub elevated_role_names: Vec<String>,
    /// Guilds that receive command registrations directly during development
    pub dev_guilds: Vec<u64>,
}

impl Default for BotSettings {
    fn default() -> Self {
        Self {
            elevated_role_names: vec!["Ticketry".to_string()],
            dev_guilds: Vec::new(),
        }
    }
}

/// Length bounds on ticket fields, enforced in the command definition.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TicketLimits {
    /// Minimum subject length
    pub subject_min: u16,
    /// Maximum subject length
    pub subject_max: u16,
    /// Minimum content length
    pub content_min: u16,
    /// Maximum content length
    pub content_max: u16,
}

impl Default for TicketLimits {
    fn default() -> Self {
        Self {
            subject_min: 5,
            subject_max: 100,
            content_min: 5,
            content_max: 1000,
        }
    }
}

/// Concurrency ceiling and batch deadline shared by the guild fan-out and
/// the message-deletion fan-out.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FanoutConfig {
    /// Maximum in-flight tasks per batch
    pub max_concurrent: usize,
    /// Whole-batch deadline in seconds
    pub deadline_secs: u64,
}

impl FanoutConfig {
    /// Batch deadline as a `Duration`.
    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.deadline_secs)
    }
}

impl Default for FanoutConfig {
    fn default() -> Self {
        Self {
            max_concurrent: 10,
            deadline_secs: 20,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text output
    Text,
    /// Structured JSON output
    Json,
}

/// Log output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Default filter directive (e.g. "info", "ticketry=debug")
    pub level: String,
    /// Output format
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}
