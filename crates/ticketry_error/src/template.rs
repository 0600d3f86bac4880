//! Template rendering error types.

/// Failure while rendering a help or ticket body template.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Template Error: {}: {} at line {} in {}", template, message, line, file)]
pub struct TemplateError {
    /// Name of the template being rendered
    pub template: String,
    /// Error message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl TemplateError {
    /// Create a new TemplateError at the current location.
    #[track_caller]
    pub fn new(template: impl Into<String>, message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            template: template.into(),
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
