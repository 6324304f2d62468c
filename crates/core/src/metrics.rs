use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Process-wide engine counters.
#[derive(Default)]
pub struct Metrics {
    tasks_submitted: AtomicU64,
    steps_recorded: AtomicU64,
    reasoning_requests: AtomicU64,
    reasoning_failures: AtomicU64,
    perception_failures: AtomicU64,
    actions_dispatched: AtomicU64,
    action_failures: AtomicU64,
}

impl Metrics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn inc_tasks_submitted(&self) {
        self.tasks_submitted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_steps_recorded(&self) {
        self.steps_recorded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_reasoning_requests(&self) {
        self.reasoning_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_reasoning_failures(&self) {
        self.reasoning_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_perception_failures(&self) {
        self.perception_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_actions_dispatched(&self) {
        self.actions_dispatched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_action_failures(&self) {
        self.action_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            tasks_submitted: self.tasks_submitted.load(Ordering::Relaxed),
            steps_recorded: self.steps_recorded.load(Ordering::Relaxed),
            reasoning_requests: self.reasoning_requests.load(Ordering::Relaxed),
            reasoning_failures: self.reasoning_failures.load(Ordering::Relaxed),
            perception_failures: self.perception_failures.load(Ordering::Relaxed),
            actions_dispatched: self.actions_dispatched.load(Ordering::Relaxed),
            action_failures: self.action_failures.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub tasks_submitted: u64,
    pub steps_recorded: u64,
    pub reasoning_requests: u64,
    pub reasoning_failures: u64,
    pub perception_failures: u64,
    pub actions_dispatched: u64,
    pub action_failures: u64,
}

impl MetricsSnapshot {
    pub fn reasoning_success_rate(&self) -> f64 {
        if self.reasoning_requests == 0 {
            return 1.0;
        }
        1.0 - (self.reasoning_failures as f64 / self.reasoning_requests as f64)
    }

    pub fn action_success_rate(&self) -> f64 {
        if self.actions_dispatched == 0 {
            return 1.0;
        }
        1.0 - (self.action_failures as f64 / self.actions_dispatched as f64)
    }
}
