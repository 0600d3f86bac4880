//! Aggregate fan-out failure types.

use derive_getters::Getters;

/// One failed unit of work inside a fan-out batch.
///
/// The `id` identifies the remote resource the task owned (a guild for the
/// reconciliation fan-out, a message for the deletion fan-out).
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
#[display("task {id}: {message}")]
pub struct TaskFailure {
    /// Identifier of the resource the failed task owned
    pub id: u64,
    /// Rendered failure message
    pub message: String,
}

impl TaskFailure {
    /// Create a new task failure record.
    pub fn new(id: u64, message: impl Into<String>) -> Self {
        Self {
            id,
            message: message.into(),
        }
    }
}

/// Aggregate error for a partially failed batch.
///
/// Individual task errors are logged with resource context at the point of
/// occurrence; this error only summarizes the batch outcome for the caller.
/// Unaffected tasks keep their successful state.
#[derive(Debug, Clone, derive_more::Error, Getters)]
pub struct BatchError {
    /// What the batch as a whole was trying to do
    operation: String,
    /// Failures collected across the batch
    failures: Vec<TaskFailure>,
    /// Total number of submitted tasks
    submitted: usize,
}

impl BatchError {
    /// Create a new BatchError from collected task failures.
    pub fn new(
        operation: impl Into<String>,
        failures: Vec<TaskFailure>,
        submitted: usize,
    ) -> Self {
        Self {
            operation: operation.into(),
            failures,
            submitted,
        }
    }

    /// True if the batch contains the given resource id among its failures.
    pub fn contains(&self, id: u64) -> bool {
        self.failures.iter().any(|f| f.id == id)
    }
}

impl std::fmt::Display for BatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Batch Error: failed to {} for {} of {} tasks: [",
            self.operation,
            self.failures.len(),
            self.submitted
        )?;
        for (i, failure) in self.failures.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{failure}")?;
        }
        write!(f, "]")
    }
}
