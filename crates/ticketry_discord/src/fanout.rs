//! Bounded concurrent fan-out over independent remote resources.
//!
//! A batch of tasks runs under one shared deadline with a fixed ceiling on
//! in-flight work. Each task owns a disjoint remote resource, so failures
//! are isolated: a failing task never cancels its siblings, and the batch
//! reports an aggregate error only once everything has settled.

use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use ticketry_core::FanoutConfig;
use ticketry_error::{BatchError, TaskFailure, TicketryResult};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, instrument, warn};

/// Concurrency ceiling and deadline for one batch.
#[derive(Debug, Clone, Copy)]
pub struct FanoutOptions {
    /// Maximum in-flight tasks
    pub max_concurrent: usize,
    /// Whole-batch deadline
    pub deadline: Duration,
}

impl From<&FanoutConfig> for FanoutOptions {
    fn from(config: &FanoutConfig) -> Self {
        Self {
            max_concurrent: config.max_concurrent,
            deadline: config.deadline(),
        }
    }
}

/// One unit of work, tagged with the id of the remote resource it owns.
pub struct FanoutTask {
    id: u64,
    fut: Pin<Box<dyn Future<Output = TicketryResult<()>> + Send + 'static>>,
}

impl FanoutTask {
    /// Wrap a future as a fan-out task.
    pub fn new(id: u64, fut: impl Future<Output = TicketryResult<()>> + Send + 'static) -> Self {
        Self {
            id,
            fut: Box::pin(fut),
        }
    }
}

/// Run all tasks under the ceiling and deadline, waiting for every
/// submitted task to settle.
///
/// Per-task failures are collected, not propagated mid-flight. Tasks still
/// pending when the deadline expires are abandoned and reported as
/// failures; remote mutations they already committed are not rolled back,
/// which is acceptable because every caller is idempotent on the next run.
#[instrument(skip(tasks, options), fields(operation, task_count = tasks.len()))]
pub async fn join_bounded(
    operation: &str,
    tasks: Vec<FanoutTask>,
    options: &FanoutOptions,
) -> Result<(), BatchError> {
    let submitted = tasks.len();
    if submitted == 0 {
        return Ok(());
    }

    let semaphore = Arc::new(Semaphore::new(options.max_concurrent.max(1)));
    let mut pending: HashSet<u64> = tasks.iter().map(|t| t.id).collect();
    let mut set: JoinSet<(u64, TicketryResult<()>)> = JoinSet::new();
    for task in tasks {
        let semaphore = semaphore.clone();
        let id = task.id;
        let fut = task.fut;
        set.spawn(async move {
            // Closing never happens while the batch is alive; a failed
            // acquire would only follow an external close.
            let _permit = semaphore.acquire_owned().await;
            (id, fut.await)
        });
    }

    let mut failures: Vec<TaskFailure> = Vec::new();
    let deadline = tokio::time::sleep(options.deadline);
    tokio::pin!(deadline);
    loop {
        tokio::select! {
            joined = set.join_next() => match joined {
                None => break,
                Some(Ok((id, Ok(())))) => {
                    pending.remove(&id);
                }
                Some(Ok((id, Err(e)))) => {
                    pending.remove(&id);
                    error!(task_id = id, error = %e, "Fan-out task failed");
                    failures.push(TaskFailure::new(id, e.to_string()));
                }
                Some(Err(e)) => {
                    error!(error = %e, "Fan-out task panicked");
                }
            },
            _ = &mut deadline => {
                warn!(
                    remaining = pending.len(),
                    "Fan-out deadline expired; abandoning in-flight tasks"
                );
                set.abort_all();
                for id in pending.drain() {
                    failures.push(TaskFailure::new(id, "deadline exceeded"));
                }
                break;
            }
        }
    }
    // Panicked tasks never reported an id through join_next.
    for id in pending.drain() {
        failures.push(TaskFailure::new(id, "task panicked"));
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(BatchError::new(operation, failures, submitted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use ticketry_error::ApiError;

    fn options(max_concurrent: usize, deadline: Duration) -> FanoutOptions {
        FanoutOptions {
            max_concurrent,
            deadline,
        }
    }

    #[tokio::test]
    async fn empty_batch_succeeds() {
        let result = join_bounded("noop", Vec::new(), &options(10, Duration::from_secs(1))).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn failures_do_not_cancel_siblings() {
        let completed = Arc::new(AtomicUsize::new(0));
        let mut tasks = Vec::new();
        for id in 0..15u64 {
            let completed = completed.clone();
            tasks.push(FanoutTask::new(id, async move {
                if id == 7 {
                    Err(ApiError::new("create support channel", "injected").into())
                } else {
                    completed.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
            }));
        }
        let err = join_bounded("reconcile guilds", tasks, &options(10, Duration::from_secs(5)))
            .await
            .unwrap_err();
        assert_eq!(completed.load(Ordering::SeqCst), 14);
        assert!(err.contains(7));
        assert_eq!(err.failures().len(), 1);
        assert_eq!(*err.submitted(), 15);
    }

    #[tokio::test]
    async fn ceiling_bounds_in_flight_tasks() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let mut tasks = Vec::new();
        for id in 0..30u64 {
            let in_flight = in_flight.clone();
            let peak = peak.clone();
            tasks.push(FanoutTask::new(id, async move {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(5)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
                Ok(())
            }));
        }
        join_bounded("bounded", tasks, &options(10, Duration::from_secs(5)))
            .await
            .unwrap();
        assert!(peak.load(Ordering::SeqCst) <= 10);
    }

    #[tokio::test]
    async fn deadline_reports_stuck_tasks() {
        let tasks = vec![
            FanoutTask::new(1, async { Ok(()) }),
            FanoutTask::new(2, async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(())
            }),
        ];
        let err = join_bounded("stuck", tasks, &options(10, Duration::from_millis(50)))
            .await
            .unwrap_err();
        assert!(err.contains(2));
        assert!(!err.contains(1));
        assert!(format!("{err}").contains("deadline exceeded"));
    }
}
