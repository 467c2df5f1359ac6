//! Timed polling of background processing jobs.

use std::time::Duration;

use thiserror::Error;
use tokio::sync::watch;

use crate::api::{ApiError, RouteApi, TaskState, TaskStatus};
use crate::storage::config::PollingSettings;

/// Polling cadence and ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        PollConfig::from(&PollingSettings::default())
    }
}

impl From<&PollingSettings> for PollConfig {
    fn from(settings: &PollingSettings) -> Self {
        Self {
            interval: settings.interval(),
            max_attempts: settings.max_attempts.max(1),
        }
    }
}

/// Why polling stopped without a result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PollError {
    #[error("Error checking status: {0}")]
    Api(#[from] ApiError),

    #[error("Error during processing: {0}")]
    Failed(String),

    #[error("Processing is still running after {attempts} checks. Check the website later.")]
    Exhausted { attempts: u32 },

    #[error("Cancelled")]
    Cancelled,
}

/// Owner side of a poll's cancel signal.
#[derive(Debug)]
pub struct CancelHandle(watch::Sender<bool>);

impl CancelHandle {
    /// Create a handle and the receiver to pass to `poll_task`.
    pub fn new() -> (Self, watch::Receiver<bool>) {
        let (tx, rx) = watch::channel(false);
        (Self(tx), rx)
    }

    pub fn cancel(&self) {
        // Receiver already gone means the poll has finished
        let _ = self.0.send(true);
    }
}

/// Resolves once cancellation is requested. Never resolves if the handle is
/// dropped without cancelling.
async fn cancelled(rx: &mut watch::Receiver<bool>) {
    loop {
        if *rx.borrow_and_update() {
            return;
        }
        if rx.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Poll `task_id` until it finishes, fails, is cancelled or runs out of attempts.
///
/// Waits one interval before the first check. `on_progress` sees every
/// non-terminal status.
pub async fn poll_task<A, F>(
    api: &A,
    task_id: &str,
    config: PollConfig,
    mut cancel: watch::Receiver<bool>,
    mut on_progress: F,
) -> Result<TaskStatus, PollError>
where
    A: RouteApi,
    F: FnMut(&TaskStatus) + Send,
{
    for attempt in 1..=config.max_attempts {
        tokio::select! {
            _ = tokio::time::sleep(config.interval) => {}
            _ = cancelled(&mut cancel) => {
                tracing::info!("Polling of task {} cancelled", task_id);
                return Err(PollError::Cancelled);
            }
        }

        let status = api.task_status(task_id).await?;
        tracing::debug!("Task {} attempt {}: {:?}", task_id, attempt, status.state);

        match status.state {
            TaskState::Success => return Ok(status),
            TaskState::Failure => {
                return Err(PollError::Failed(
                    status
                        .status
                        .unwrap_or_else(|| "Processing failed.".to_string()),
                ))
            }
            TaskState::Revoked => {
                return Err(PollError::Failed(
                    "The task was cancelled on the server.".to_string(),
                ))
            }
            _ => on_progress(&status),
        }
    }

    tracing::warn!(
        "Task {} still running after {} attempts",
        task_id,
        config.max_attempts
    );
    Err(PollError::Exhausted {
        attempts: config.max_attempts,
    })
}
