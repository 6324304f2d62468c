use std::path::PathBuf;
use std::sync::Arc;
use waypoint_core::{AutomationHandle, PerceptionSnapshot, Variable};

/// Everything a handler may touch while running one action.
#[derive(Clone)]
pub struct ActionContext {
    pub task_id: String,
    pub perception: Arc<PerceptionSnapshot>,
    pub handle: Arc<dyn AutomationHandle>,
    pub variables: Arc<Vec<Variable>>,
    pub token_limit: usize,
    pub debug_dir: Option<PathBuf>,
}

impl ActionContext {
    pub fn new(
        task_id: impl Into<String>,
        perception: Arc<PerceptionSnapshot>,
        handle: Arc<dyn AutomationHandle>,
    ) -> Self {
        Self {
            task_id: task_id.into(),
            perception,
            handle,
            variables: Arc::new(Vec::new()),
            token_limit: 128_000,
            debug_dir: None,
        }
    }

    pub fn with_variables(mut self, variables: Arc<Vec<Variable>>) -> Self {
        self.variables = variables;
        self
    }

    pub fn with_token_limit(mut self, token_limit: usize) -> Self {
        self.token_limit = token_limit;
        self
    }

    pub fn with_debug_dir(mut self, debug_dir: Option<PathBuf>) -> Self {
        self.debug_dir = debug_dir;
        self
    }
}
