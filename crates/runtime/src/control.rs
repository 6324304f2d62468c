use crate::task::TaskState;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::info;
use waypoint_core::{TaskOutput, TaskStatus};

/// A loop-level failure, published on the supervisor-wide error channel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TaskFailure {
    pub task_id: String,
    pub message: String,
}

/// Handle for steering a running task.
///
/// Requests only flip the status field; the loop observes them at its next
/// check point.
#[derive(Clone)]
pub struct TaskControl {
    task: Arc<TaskState>,
    errors: broadcast::Sender<TaskFailure>,
}

impl TaskControl {
    pub(crate) fn new(task: Arc<TaskState>, errors: broadcast::Sender<TaskFailure>) -> Self {
        Self { task, errors }
    }

    pub fn task_id(&self) -> &str {
        self.task.id()
    }

    pub fn status(&self) -> TaskStatus {
        self.task.status()
    }

    pub fn pause(&self) -> TaskStatus {
        let status = self.task.pause();
        info!("Pause requested for task {}: now {}", self.task.id(), status);
        status
    }

    pub fn resume(&self) -> TaskStatus {
        let status = self.task.resume();
        info!("Resume requested for task {}: now {}", self.task.id(), status);
        status
    }

    /// Request cancellation and return the resulting status.
    ///
    /// Pending, running and paused tasks become cancelled. Terminal statuses
    /// are sticky: a completed or failed task keeps its status and outcome.
    pub fn cancel(&self) -> TaskStatus {
        let status = self.task.cancel();
        info!("Cancel requested for task {}: now {}", self.task.id(), status);
        status
    }

    /// Failures of every task run by the owning supervisor.
    pub fn subscribe_errors(&self) -> broadcast::Receiver<TaskFailure> {
        self.errors.subscribe()
    }

    pub fn steps_recorded(&self) -> usize {
        self.task.step_count()
    }

    /// Wait for the final output. A fatal error is reported in `TaskOutput::error`.
    pub async fn wait(&self) -> TaskOutput {
        self.task.wait().await
    }
}
