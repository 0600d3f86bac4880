//! Remote API error types.

use derive_getters::Getters;

/// A failed remote API call, wrapped with the operation's intent.
///
/// Every call against the chat platform carries the name of the operation
/// being attempted so that a failure deep inside a reconciliation run still
/// reads as "failed to create support channel" rather than a bare HTTP error.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error, Getters)]
#[display("API Error: failed to {}: {} at line {} in {}", operation, message, line, file)]
pub struct ApiError {
    operation: String,
    message: String,
    line: u32,
    file: &'static str,
}

impl ApiError {
    /// Create a new ApiError with automatic location tracking.
    ///
    /// # Examples
    ///
    /// ```
    /// use ticketry_error::ApiError;
    ///
    /// let err = ApiError::new("get guild roles", "503 Service Unavailable");
    /// assert_eq!(err.operation(), "get guild roles");
    /// ```
    #[track_caller]
    pub fn new(operation: impl Into<String>, message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            operation: operation.into(),
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
