//! Gateway event handling.
//!
//! The handler owns no engine state: each event builds the engine it needs
//! from the context's HTTP client and the shared configuration, so every
//! reconciliation works from freshly fetched remote state.

use crate::api::SerenityApi;
use crate::commands;
use crate::reconcile::{GuildReconciler, GuildTarget};
use crate::ticket::{TicketOrchestrator, TicketRequest};
use serenity::async_trait;
use serenity::builder::{
    CreateAutocompleteResponse, CreateInteractionResponse, CreateInteractionResponseMessage,
    EditInteractionResponse,
};
use serenity::gateway::ActivityData;
use serenity::model::application::{CommandInteraction, Interaction, ResolvedValue};
use serenity::model::gateway::Ready;
use serenity::model::guild::Guild;
use serenity::model::user::OnlineStatus;
use serenity::prelude::{Context, EventHandler, GatewayIntents};
use std::sync::Arc;
use ticketry_core::{HelpData, TicketryConfig, filter_choices, render_ephemeral_help, render_help};
use ticketry_error::{TicketryErrorKind, TicketryResult};
use tracing::{error, info, instrument, warn};

/// The platform accepts at most this many autocomplete choices per reply.
const MAX_CHOICES: usize = 25;

/// Build-time identity reported by `/version` and the help footer.
#[derive(Debug, Clone)]
pub struct VersionInfo {
    /// Semantic version of the running binary
    pub version: String,
    /// Short commit hash the binary was built from
    pub commit: String,
}

impl VersionInfo {
    /// One-line rendering, e.g. `v0.1.0 (4f2a91c)`.
    pub fn describe(&self) -> String {
        format!("v{} ({})", self.version, self.commit)
    }
}

/// Serenity event handler wiring gateway events into the engine.
pub struct TicketryHandler {
    config: Arc<TicketryConfig>,
    version: VersionInfo,
    sync_commands: bool,
}

impl TicketryHandler {
    /// Create a handler. `sync_commands` controls whether startup re-registers
    /// the slash command set.
    pub fn new(config: Arc<TicketryConfig>, version: VersionInfo, sync_commands: bool) -> Self {
        Self {
            config,
            version,
            sync_commands,
        }
    }

    /// Gateway intents the handler needs.
    pub fn intents() -> GatewayIntents {
        GatewayIntents::GUILDS | GatewayIntents::GUILD_MESSAGES | GatewayIntents::MESSAGE_CONTENT
    }

    fn help_data(&self) -> HelpData {
        HelpData {
            command_name: commands::TICKET.to_string(),
            version: self.version.describe(),
        }
    }

    fn reconciler(&self, ctx: &Context) -> TicketryResult<GuildReconciler> {
        let help_text = render_help(&self.help_data())?;
        Ok(GuildReconciler::new(
            Arc::new(SerenityApi::new(ctx.http.clone())),
            self.config.clone(),
            help_text,
        ))
    }

    fn orchestrator(&self, ctx: &Context) -> TicketOrchestrator {
        TicketOrchestrator::new(
            Arc::new(SerenityApi::new(ctx.http.clone())),
            self.config.clone(),
        )
    }

    async fn handle_ticket(&self, ctx: &Context, command: &CommandInteraction) {
        // Thread creation can outlast the initial response window; defer
        // first and edit the response when the outcome is known.
        let defer = CreateInteractionResponse::Defer(
            CreateInteractionResponseMessage::new().ephemeral(true),
        );
        if let Err(e) = command.create_response(&ctx.http, defer).await {
            warn!(error = %e, "Failed to defer ticket response");
            return;
        }

        let content = match ticket_request(command) {
            None => "Tickets can only be opened from within a server.".to_string(),
            Some(request) => self.create_ticket(ctx, &request).await,
        };
        if let Err(e) = command
            .edit_response(&ctx.http, EditInteractionResponse::new().content(content))
            .await
        {
            warn!(error = %e, "Failed to deliver ticket response");
        }
    }

    /// Reconcile the guild, then create the ticket against the converged
    /// channel. Returns the user-facing reply either way.
    async fn create_ticket(&self, ctx: &Context, request: &TicketRequest) -> String {
        match self.reconciler(ctx) {
            Ok(reconciler) => {
                if let Err(e) = reconciler.reconcile_guild(request.guild_id).await {
                    warn!(guild_id = request.guild_id, error = %e, "Pre-ticket reconciliation failed");
                }
            }
            Err(e) => error!(error = %e, "Failed to render help message"),
        }
        match self.orchestrator(ctx).create(request).await {
            Ok(thread) => format!("Created ticket: <#{}>", thread.id),
            Err(e) => match e.kind() {
                TicketryErrorKind::NotFound(not_found) => {
                    warn!(error = %not_found, "Rejecting ticket request");
                    format!("Could not open a ticket: {}.", not_found.kind())
                }
                _ => {
                    error!(error = %e, "Ticket creation failed");
                    "Sorry, something went wrong while creating your ticket. Please try again."
                        .to_string()
                }
            },
        }
    }

    async fn respond_ephemeral(&self, ctx: &Context, command: &CommandInteraction, content: String) {
        let response = CreateInteractionResponse::Message(
            CreateInteractionResponseMessage::new()
                .content(content)
                .ephemeral(true),
        );
        if let Err(e) = command.create_response(&ctx.http, response).await {
            warn!(command = %command.data.name, error = %e, "Failed to respond to command");
        }
    }

    async fn handle_autocomplete(&self, ctx: &Context, command: &CommandInteraction) {
        let partial = command
            .data
            .autocomplete()
            .filter(|option| option.name == "category")
            .map(|option| option.value)
            .unwrap_or_default();
        let mut response = CreateAutocompleteResponse::new();
        for choice in filter_choices(partial).into_iter().take(MAX_CHOICES) {
            response = response.add_string_choice(choice.name, choice.value);
        }
        if let Err(e) = command
            .create_response(&ctx.http, CreateInteractionResponse::Autocomplete(response))
            .await
        {
            warn!(error = %e, "Failed to respond to autocomplete");
        }
    }
}

/// Pull a ticket request out of the command's resolved options.
///
/// Returns `None` outside a guild; missing required options also yield
/// `None`, though the platform enforces them before delivery.
fn ticket_request(command: &CommandInteraction) -> Option<TicketRequest> {
    let guild_id = command.guild_id?.get();
    let mut category = None;
    let mut subject = None;
    let mut content = None;
    let mut attachment_url = None;
    for option in command.data.options() {
        match (option.name, option.value) {
            ("category", ResolvedValue::String(v)) => category = Some(v.to_string()),
            ("subject", ResolvedValue::String(v)) => subject = Some(v.to_string()),
            ("content", ResolvedValue::String(v)) => content = Some(v.to_string()),
            ("attachment", ResolvedValue::Attachment(a)) => attachment_url = Some(a.url.clone()),
            _ => {}
        }
    }
    Some(TicketRequest {
        guild_id,
        user_id: command.user.id.get(),
        username: command.user.name.clone(),
        category: category?,
        subject: subject?,
        content: content?,
        attachment_url,
    })
}

#[async_trait]
impl EventHandler for TicketryHandler {
    #[instrument(skip(self, ctx, ready), fields(guild_count = ready.guilds.len()))]
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!(user = %ready.user.name, "Gateway session ready");
        ctx.set_presence(Some(ActivityData::listening("you")), OnlineStatus::Online);

        if self.sync_commands {
            commands::sync_commands(&ctx.http, &self.config).await;
        }

        let targets: Vec<GuildTarget> = ready
            .guilds
            .iter()
            .map(|guild| GuildTarget {
                id: guild.id.get(),
                unavailable: guild.unavailable,
            })
            .collect();
        match self.reconciler(&ctx) {
            Ok(reconciler) => {
                if let Err(e) = reconciler.reconcile_all(&targets).await {
                    error!(error = %e, "Startup reconciliation left guilds unconverged");
                }
            }
            Err(e) => error!(error = %e, "Failed to render help message"),
        }
    }

    async fn guild_create(&self, ctx: Context, guild: Guild, is_new: Option<bool>) {
        // Joins only; the gateway also replays known guilds on reconnect.
        if is_new != Some(true) {
            return;
        }
        info!(guild_id = guild.id.get(), "Joined new guild");
        match self.reconciler(&ctx) {
            Ok(reconciler) => {
                if let Err(e) = reconciler.reconcile_guild(guild.id.get()).await {
                    error!(guild_id = guild.id.get(), error = %e, "Failed to reconcile new guild");
                }
            }
            Err(e) => error!(error = %e, "Failed to render help message"),
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        match interaction {
            Interaction::Command(command) => match command.data.name.as_str() {
                commands::TICKET => self.handle_ticket(&ctx, &command).await,
                commands::HELP => {
                    let content = render_ephemeral_help(&self.help_data())
                        .unwrap_or_else(|e| {
                            error!(error = %e, "Failed to render ephemeral help");
                            format!("Use /{} to open a support ticket.", commands::TICKET)
                        });
                    self.respond_ephemeral(&ctx, &command, content).await;
                }
                commands::VERSION => {
                    self.respond_ephemeral(&ctx, &command, self.version.describe())
                        .await;
                }
                other => warn!(command = other, "Ignoring unknown command"),
            },
            Interaction::Autocomplete(command) => {
                if command.data.name == commands::TICKET {
                    self.handle_autocomplete(&ctx, &command).await;
                }
            }
            _ => {}
        }
    }
}
