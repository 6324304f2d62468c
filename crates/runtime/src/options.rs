use crate::recorder::StepEvent;
use async_trait::async_trait;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use waypoint_core::{Decision, TaskOutput};

/// Hooks invoked by the execution loop. Every method defaults to a no-op.
#[async_trait]
pub trait TaskObserver: Send + Sync {
    /// Called with the raw decision before any of its actions run.
    async fn on_decision(&self, _decision: &Decision) {}

    async fn on_step(&self, _event: &StepEvent) {}

    /// Not called when the task ends with a fatal error.
    async fn on_complete(&self, _output: &TaskOutput) {}
}

/// Per-submission parameters.
#[derive(Clone, Default)]
pub struct TaskOptions {
    /// Step budget. `None` and `Some(0)` both mean unlimited.
    pub max_steps: Option<usize>,
    /// Switches the task to the structured `complete` variant.
    pub output_schema: Option<serde_json::Value>,
    pub observer: Option<Arc<dyn TaskObserver>>,
    /// Overrides `<config.debug_dir>/<task id>`.
    pub debug_dir: Option<PathBuf>,
}

impl TaskOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = Some(max_steps);
        self
    }

    /// Effective step budget, if any.
    pub fn step_budget(&self) -> Option<usize> {
        self.max_steps.filter(|&max_steps| max_steps > 0)
    }

    pub fn with_output_schema(mut self, schema: serde_json::Value) -> Self {
        self.output_schema = Some(schema);
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn TaskObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn with_debug_dir(mut self, debug_dir: impl Into<PathBuf>) -> Self {
        self.debug_dir = Some(debug_dir.into());
        self
    }
}

impl fmt::Debug for TaskOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskOptions")
            .field("max_steps", &self.max_steps)
            .field("output_schema", &self.output_schema)
            .field("observer", &self.observer.is_some())
            .field("debug_dir", &self.debug_dir)
            .finish()
    }
}
