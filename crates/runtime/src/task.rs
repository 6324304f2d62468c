//! Per-task state shared between the supervisor, the loop and control handles.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use waypoint_core::{AgentStep, AutomationHandle, TaskOutput, TaskStatus};

/// Read-only summary of a task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskInfo {
    pub id: String,
    pub description: String,
    pub status: TaskStatus,
    pub step_count: usize,
    pub output: Option<String>,
    pub error: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

pub struct TaskState {
    id: String,
    description: String,
    status: Mutex<TaskStatus>,
    steps: Mutex<Vec<AgentStep>>,
    output: Mutex<Option<String>>,
    error: Mutex<Option<String>>,
    handle: Arc<dyn AutomationHandle>,
    created_at: i64,
    updated_at: AtomicI64,
    finished: watch::Sender<Option<TaskOutput>>,
}

impl TaskState {
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        handle: Arc<dyn AutomationHandle>,
    ) -> Self {
        let now = chrono::Utc::now().timestamp();
        let (finished, _) = watch::channel(None);
        Self {
            id: id.into(),
            description: description.into(),
            status: Mutex::new(TaskStatus::Pending),
            steps: Mutex::new(Vec::new()),
            output: Mutex::new(None),
            error: Mutex::new(None),
            handle,
            created_at: now,
            updated_at: AtomicI64::new(now),
            finished,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn handle(&self) -> Arc<dyn AutomationHandle> {
        self.handle.clone()
    }

    pub fn status(&self) -> TaskStatus {
        *self.status.lock()
    }

    /// Apply `next` to the current status unless it is terminal.
    fn update(&self, next: impl FnOnce(TaskStatus) -> Option<TaskStatus>) -> TaskStatus {
        let mut status = self.status.lock();
        if status.is_terminal() {
            return *status;
        }
        if let Some(new_status) = next(*status) {
            *status = new_status;
            self.touch();
        }
        *status
    }

    fn touch(&self) {
        self.updated_at
            .store(chrono::Utc::now().timestamp(), Ordering::Relaxed);
    }

    pub(crate) fn start(&self) -> TaskStatus {
        self.update(|s| (s == TaskStatus::Pending).then_some(TaskStatus::Running))
    }

    pub fn pause(&self) -> TaskStatus {
        self.update(|s| (s == TaskStatus::Running).then_some(TaskStatus::Paused))
    }

    pub fn resume(&self) -> TaskStatus {
        self.update(|s| (s == TaskStatus::Paused).then_some(TaskStatus::Running))
    }

    /// Cancel any non-terminal task. Completed, failed and cancelled tasks
    /// keep their status; a failed task is never relabelled as cancelled.
    pub fn cancel(&self) -> TaskStatus {
        self.update(|_| Some(TaskStatus::Cancelled))
    }

    /// Returns true when the task is completed after the call.
    pub(crate) fn complete(&self) -> bool {
        self.update(|_| Some(TaskStatus::Completed)) == TaskStatus::Completed
    }

    /// Record a fatal error. The status becomes FAILED unless already terminal.
    pub(crate) fn fail(&self, message: impl Into<String>) -> TaskStatus {
        *self.error.lock() = Some(message.into());
        self.touch();
        self.update(|_| Some(TaskStatus::Failed))
    }

    pub(crate) fn push_step(&self, step: AgentStep) {
        self.steps.lock().push(step);
        self.touch();
    }

    pub fn steps(&self) -> Vec<AgentStep> {
        self.steps.lock().clone()
    }

    pub fn step_count(&self) -> usize {
        self.steps.lock().len()
    }

    pub(crate) fn set_output(&self, output: String) {
        *self.output.lock() = Some(output);
    }

    pub fn error(&self) -> Option<String> {
        self.error.lock().clone()
    }

    pub fn info(&self) -> TaskInfo {
        TaskInfo {
            id: self.id.clone(),
            description: self.description.clone(),
            status: self.status(),
            step_count: self.step_count(),
            output: self.output.lock().clone(),
            error: self.error(),
            created_at: self.created_at,
            updated_at: self.updated_at.load(Ordering::Relaxed),
        }
    }

    /// Current contents as a [`TaskOutput`]; output is empty until completion.
    pub fn to_output(&self) -> TaskOutput {
        TaskOutput {
            task_id: self.id.clone(),
            status: self.status(),
            steps: self.steps(),
            output: self.output.lock().clone().unwrap_or_default(),
            error: self.error(),
        }
    }

    pub(crate) fn finish(&self, output: TaskOutput) {
        self.finished.send_replace(Some(output));
    }

    pub fn is_finished(&self) -> bool {
        self.finished.borrow().is_some()
    }

    /// Wait until the execution loop has produced its final output.
    pub async fn wait(&self) -> TaskOutput {
        let mut receiver = self.finished.subscribe();
        let result = receiver
            .wait_for(Option::is_some)
            .await
            .ok()
            .and_then(|output| output.clone());
        result.unwrap_or_else(|| self.to_output())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::test_support::NoopHandle;

    fn task() -> TaskState {
        TaskState::new("t-1", "find flights", Arc::new(NoopHandle))
    }

    #[test]
    fn test_pause_resume_only_from_matching_status() {
        let task = task();
        assert_eq!(task.pause(), TaskStatus::Pending);
        assert_eq!(task.resume(), TaskStatus::Pending);

        task.start();
        assert_eq!(task.resume(), TaskStatus::Running);
        assert_eq!(task.pause(), TaskStatus::Paused);
        assert_eq!(task.pause(), TaskStatus::Paused);
        assert_eq!(task.resume(), TaskStatus::Running);
    }

    #[test]
    fn test_terminal_statuses_are_sticky() {
        let task = task();
        task.start();
        assert!(task.complete());
        assert_eq!(task.cancel(), TaskStatus::Completed);
        assert_eq!(task.fail("late"), TaskStatus::Completed);
        assert_eq!(task.error().as_deref(), Some("late"));

        let cancelled = self::task();
        assert_eq!(cancelled.cancel(), TaskStatus::Cancelled);
        assert_eq!(cancelled.cancel(), TaskStatus::Cancelled);
        assert!(!cancelled.complete());
        assert_eq!(cancelled.resume(), TaskStatus::Cancelled);
    }

    #[test]
    fn test_cancel_keeps_failed_status() {
        let task = task();
        task.start();
        assert_eq!(task.fail("provider gone"), TaskStatus::Failed);
        assert_eq!(task.cancel(), TaskStatus::Failed);
        assert_eq!(task.error().as_deref(), Some("provider gone"));
    }

    #[test]
    fn test_cancel_from_paused() {
        let task = task();
        task.start();
        task.pause();
        assert_eq!(task.cancel(), TaskStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_wait_returns_finished_output() {
        let task = Arc::new(task());
        let waiter = {
            let task = task.clone();
            tokio::spawn(async move { task.wait().await })
        };
        assert!(!task.is_finished());
        task.cancel();
        task.finish(task.to_output());

        let output = waiter.await.unwrap();
        assert_eq!(output.status, TaskStatus::Cancelled);
        assert_eq!(output.task_id, "t-1");
    }
}
