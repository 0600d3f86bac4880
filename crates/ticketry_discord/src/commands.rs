//! Slash command definitions and registration.
//!
//! Field length bounds live in the command definition itself so the
//! platform rejects out-of-range input before it ever reaches the handler.

use serenity::builder::{CreateCommand, CreateCommandOption};
use serenity::http::Http;
use serenity::model::application::{Command, CommandOptionType};
use serenity::model::id::GuildId;
use ticketry_core::TicketryConfig;
use tracing::{info, instrument, warn};

/// Name of the ticket command.
pub const TICKET: &str = "ticket";
/// Name of the help command.
pub const HELP: &str = "help";
/// Name of the version command.
pub const VERSION: &str = "version";

/// The `/ticket` command: category (autocompleted), subject, content, and
/// an optional attachment.
pub fn ticket_command(config: &TicketryConfig) -> CreateCommand {
    let limits = &config.limits;
    CreateCommand::new(TICKET)
        .description("Open a support ticket")
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::String,
                "category",
                "What kind of ticket this is",
            )
            .required(true)
            .set_autocomplete(true),
        )
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::String,
                "subject",
                "Short summary of the issue",
            )
            .required(true)
            .min_length(limits.subject_min)
            .max_length(limits.subject_max),
        )
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::String,
                "content",
                "Full description of the issue",
            )
            .required(true)
            .min_length(limits.content_min)
            .max_length(limits.content_max),
        )
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::Attachment,
                "attachment",
                "Screenshot or log file",
            )
            .required(false),
        )
}

/// The `/help` command.
pub fn help_command() -> CreateCommand {
    CreateCommand::new(HELP).description("How to use the support channel")
}

/// The `/version` command.
pub fn version_command() -> CreateCommand {
    CreateCommand::new(VERSION).description("Show the running bot version")
}

fn all_commands(config: &TicketryConfig) -> Vec<CreateCommand> {
    vec![ticket_command(config), help_command(), version_command()]
}

/// Register the command set.
///
/// With dev guilds configured, commands go to those guilds directly, where
/// they appear immediately. Otherwise they are registered globally and
/// propagate on the platform's schedule. Registration failure is logged and
/// does not stop startup; already-registered commands keep working.
#[instrument(skip(http, config))]
pub async fn sync_commands(http: &Http, config: &TicketryConfig) {
    let commands = all_commands(config);
    if config.bot.dev_guilds.is_empty() {
        match Command::set_global_commands(http, commands).await {
            Ok(registered) => info!(count = registered.len(), "Registered global commands"),
            Err(e) => warn!(error = %e, "Failed to register global commands"),
        }
        return;
    }
    for guild_id in &config.bot.dev_guilds {
        match GuildId::new(*guild_id)
            .set_commands(http, all_commands(config))
            .await
        {
            Ok(registered) => {
                info!(guild_id, count = registered.len(), "Registered guild commands");
            }
            Err(e) => warn!(guild_id, error = %e, "Failed to register guild commands"),
        }
    }
}
