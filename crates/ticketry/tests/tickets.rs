//! End-to-end ticket creation scenarios against the in-memory platform.

use serenity::model::permissions::Permissions;
use std::sync::Arc;
use ticketry::{
    GuildReconciler, RoleInfo, TicketOrchestrator, TicketRequest, TicketryConfig,
};
use ticketry_discord::testing::InMemoryApi;

const BOT_ID: u64 = 1;
const GUILD: u64 = 100;

fn roles() -> Vec<RoleInfo> {
    vec![
        RoleInfo {
            id: 42,
            name: "Mods".to_string(),
            permissions: Permissions::VIEW_AUDIT_LOG | Permissions::MANAGE_MESSAGES,
            managed: false,
        },
        RoleInfo {
            id: 77,
            name: "Admins".to_string(),
            permissions: Permissions::ADMINISTRATOR,
            managed: false,
        },
    ]
}

fn request(category: &str, subject: &str) -> TicketRequest {
    TicketRequest {
        guild_id: GUILD,
        user_id: 555,
        username: "helpme".to_string(),
        category: category.to_string(),
        subject: subject.to_string(),
        content: "Something is broken and I cannot fix it.".to_string(),
        attachment_url: None,
    }
}

async fn converged_guild(api: &Arc<InMemoryApi>) {
    api.set_roles(GUILD, roles());
    GuildReconciler::new(
        api.clone(),
        Arc::new(TicketryConfig::default()),
        "help".to_string(),
    )
    .reconcile_guild(GUILD)
    .await
    .unwrap();
}

#[tokio::test]
async fn ticket_lands_in_reconciled_channel() {
    let api = Arc::new(InMemoryApi::new(BOT_ID));
    converged_guild(&api).await;

    let orchestrator =
        TicketOrchestrator::new(api.clone(), Arc::new(TicketryConfig::default()));
    let thread = orchestrator
        .create(&request("General support questions", "Cannot join voice"))
        .await
        .unwrap();

    let channel = api.channel_named(GUILD, "support-tickets").unwrap();
    assert_eq!(api.threads_in(channel.id).len(), 1);
    assert_eq!(
        thread.name,
        "helpme - Cannot join voice | (General support questions)"
    );
    assert_eq!(api.thread_members(thread.id), vec![555]);

    let body = &api.messages(thread.id)[0].content;
    assert!(body.contains("<@&42>"));
    assert!(!body.contains("<@&77>"));
    assert!(body.contains("Cannot join voice"));
}

#[tokio::test]
async fn admin_category_routes_past_moderators() {
    let api = Arc::new(InMemoryApi::new(BOT_ID));
    converged_guild(&api).await;

    let orchestrator =
        TicketOrchestrator::new(api.clone(), Arc::new(TicketryConfig::default()));
    let thread = orchestrator
        .create(&request("Admin support questions", "Role audit"))
        .await
        .unwrap();

    let body = &api.messages(thread.id)[0].content;
    assert!(body.contains("<@&77>"));
    assert!(!body.contains("<@&42>"));
}

#[tokio::test]
async fn two_tickets_make_two_independent_threads() {
    let api = Arc::new(InMemoryApi::new(BOT_ID));
    converged_guild(&api).await;

    let orchestrator =
        TicketOrchestrator::new(api.clone(), Arc::new(TicketryConfig::default()));
    let first = orchestrator
        .create(&request("General support questions", "First issue"))
        .await
        .unwrap();
    let second = orchestrator
        .create(&request("General suggestion", "Second idea"))
        .await
        .unwrap();

    assert_ne!(first.id, second.id);
    let channel = api.channel_named(GUILD, "support-tickets").unwrap();
    assert_eq!(api.threads_in(channel.id).len(), 2);
    // The help message is untouched by ticket traffic.
    let messages = api.messages(channel.id);
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].content, "help");
}
