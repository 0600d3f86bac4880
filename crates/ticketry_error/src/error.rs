//! Top-level error wrapper types.

use crate::{ApiError, BatchError, ConfigError, NotFoundError, TemplateError};

/// The foundation error enum for the Ticketry workspace.
///
/// # Examples
///
/// ```
/// use ticketry_error::{ApiError, TicketryError};
///
/// let api_err = ApiError::new("create thread", "403 Forbidden");
/// let err: TicketryError = api_err.into();
/// assert!(format!("{}", err).contains("create thread"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum TicketryErrorKind {
    /// Remote API call failure
    #[from(ApiError)]
    Api(ApiError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Template rendering failure
    #[from(TemplateError)]
    Template(TemplateError),
    /// Recoverable not-found condition
    #[from(NotFoundError)]
    NotFound(NotFoundError),
    /// Partial batch failure during a fan-out
    #[from(BatchError)]
    Batch(BatchError),
}

/// Ticketry error with kind discrimination.
///
/// # Examples
///
/// ```
/// use ticketry_error::{NotFoundError, TicketryResult};
///
/// fn resolve_channel() -> TicketryResult<u64> {
///     Err(NotFoundError::support_channel(42))?
/// }
///
/// assert!(resolve_channel().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Ticketry Error: {}", _0)]
pub struct TicketryError(Box<TicketryErrorKind>);

impl TicketryError {
    /// Create a new error from a kind.
    pub fn new(kind: TicketryErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &TicketryErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to TicketryErrorKind
impl<T> From<T> for TicketryError
where
    T: Into<TicketryErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Ticketry operations.
pub type TicketryResult<T> = std::result::Result<T, TicketryError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TaskFailure;

    #[test]
    fn api_error_carries_operation() {
        let err: TicketryError = ApiError::new("update channel", "timeout").into();
        let rendered = format!("{err}");
        assert!(rendered.contains("failed to update channel"));
        assert!(rendered.contains("timeout"));
    }

    #[test]
    fn not_found_is_discriminable() {
        let err: TicketryError = NotFoundError::support_channel(7).into();
        assert!(matches!(err.kind(), TicketryErrorKind::NotFound(_)));
    }

    #[test]
    fn batch_error_lists_failed_ids() {
        let failures = vec![
            TaskFailure::new(3, "channel create failed"),
            TaskFailure::new(9, "deadline exceeded"),
        ];
        let err = BatchError::new("reconcile guilds", failures, 15);
        assert!(err.contains(3));
        assert!(err.contains(9));
        assert!(!err.contains(4));
        let rendered = format!("{err}");
        assert!(rendered.contains("2 of 15"));
        assert!(rendered.contains("task 3"));
    }
}
