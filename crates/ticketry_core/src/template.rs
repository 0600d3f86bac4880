//! Help and ticket body rendering.
//!
//! Templates are embedded at compile time and rendered through a shared
//! minijinja environment. Rendering is pure: the same data always produces
//! the same text, which the message synchronizer relies on when comparing
//! the expected help message against what is already in the channel.

use minijinja::Environment;
use serde::Serialize;
use std::sync::OnceLock;
use ticketry_error::{TemplateError, TicketryResult};

const HELP_TEMPLATE: &str = include_str!("../templates/help.md");
const HELP_EPHEMERAL_TEMPLATE: &str = include_str!("../templates/help_ephemeral.md");
const TICKET_TEMPLATE: &str = include_str!("../templates/ticket.md");

/// Data for the help message shown in the support channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HelpData {
    /// Name of the ticket command to advertise.
    pub command_name: String,
    /// Version tag appended to the message footer.
    pub version: String,
}

/// Data for the first message posted into a ticket thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TicketData {
    /// Submitted category description.
    pub category: String,
    /// Requester's username.
    pub username: String,
    /// Ticket subject line.
    pub subject: String,
    /// Full ticket body.
    pub content: String,
    /// Role ids to mention, rendered as role mentions.
    pub moderators: Vec<String>,
    /// Optional attachment URL.
    pub attachment_url: Option<String>,
}

fn environment() -> &'static Environment<'static> {
    static ENV: OnceLock<Environment<'static>> = OnceLock::new();
    ENV.get_or_init(|| {
        let mut env = Environment::new();
        // Embedded templates are validated by the test suite; registration
        // cannot fail at runtime for well-formed sources.
        env.add_template("help", HELP_TEMPLATE)
            .unwrap_or_else(|e| panic!("invalid embedded help template: {e}"));
        env.add_template("help_ephemeral", HELP_EPHEMERAL_TEMPLATE)
            .unwrap_or_else(|e| panic!("invalid embedded ephemeral help template: {e}"));
        env.add_template("ticket", TICKET_TEMPLATE)
            .unwrap_or_else(|e| panic!("invalid embedded ticket template: {e}"));
        env
    })
}

fn render(name: &str, data: impl Serialize) -> TicketryResult<String> {
    let template = environment()
        .get_template(name)
        .map_err(|e| TemplateError::new(name, e.to_string()))?;
    let rendered = template
        .render(data)
        .map_err(|e| TemplateError::new(name, e.to_string()))?;
    Ok(rendered.trim_end().to_string())
}

/// Render the pinned-style help message for the support channel.
pub fn render_help(data: &HelpData) -> TicketryResult<String> {
    render("help", data)
}

/// Render the short ephemeral help variant used in interaction replies.
pub fn render_ephemeral_help(data: &HelpData) -> TicketryResult<String> {
    render("help_ephemeral", data)
}

/// Render the ticket body posted as a thread's first message.
pub fn render_ticket(data: &TicketData) -> TicketryResult<String> {
    render("ticket", data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn help_data() -> HelpData {
        HelpData {
            command_name: "ticket".to_string(),
            version: "v1.2.3".to_string(),
        }
    }

    #[test]
    fn help_mentions_command_and_version() {
        let text = render_help(&help_data()).unwrap();
        assert!(text.contains("/ticket"));
        assert!(text.contains("v1.2.3"));
    }

    #[test]
    fn help_rendering_is_deterministic() {
        let first = render_help(&help_data()).unwrap();
        let second = render_help(&help_data()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn ephemeral_help_is_shorter_than_channel_help() {
        let channel = render_help(&help_data()).unwrap();
        let ephemeral = render_ephemeral_help(&help_data()).unwrap();
        assert!(ephemeral.len() < channel.len());
        assert!(ephemeral.contains("/ticket"));
    }

    #[test]
    fn ticket_includes_moderator_mentions() {
        let data = TicketData {
            category: "General support questions".to_string(),
            username: "helpme".to_string(),
            subject: "Cannot join voice".to_string(),
            content: "The join button does nothing.".to_string(),
            moderators: vec!["111".to_string(), "222".to_string()],
            attachment_url: None,
        };
        let text = render_ticket(&data).unwrap();
        assert!(text.contains("<@&111>"));
        assert!(text.contains("<@&222>"));
        assert!(text.contains("Cannot join voice"));
        assert!(!text.contains("Attachment:"));
    }

    #[test]
    fn ticket_includes_attachment_when_present() {
        let data = TicketData {
            category: "General support questions".to_string(),
            username: "helpme".to_string(),
            subject: "Broken emoji".to_string(),
            content: "See the screenshot.".to_string(),
            moderators: vec![],
            attachment_url: Some("https://cdn.example/shot.png".to_string()),
        };
        let text = render_ticket(&data).unwrap();
        assert!(text.contains("https://cdn.example/shot.png"));
    }
}
