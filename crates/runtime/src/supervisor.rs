//! Task supervisor: owns the task table and starts one execution loop per task.

use crate::config::RuntimeConfig;
use crate::control::{TaskControl, TaskFailure};
use crate::error::RuntimeError;
use crate::execution::ExecutionLoop;
use crate::options::TaskOptions;
use crate::task::{TaskInfo, TaskState};
use parking_lot::RwLock as SyncRwLock;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;
use tracing::{info, warn};
use waypoint_actions::{
    default_registry, ActionDefinition, ActionDispatcher, ActionRegistry, CompletionVariant,
};
use waypoint_core::{
    AutomationHandle, Metrics, MetricsSnapshot, PerceptionProvider, ProposedAction,
    ReasoningProvider, TaskOutput, Variable,
};

const ERROR_CHANNEL_CAPACITY: usize = 64;
const EXTRACT_MAX_STEPS: usize = 2;

/// Builder for [`Supervisor`]. Both providers are required.
#[derive(Default)]
pub struct SupervisorBuilder {
    perception: Option<Arc<dyn PerceptionProvider>>,
    reasoning: Option<Arc<dyn ReasoningProvider>>,
    config: RuntimeConfig,
    actions: Vec<Arc<dyn ActionDefinition>>,
}

impl SupervisorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn perception(mut self, provider: Arc<dyn PerceptionProvider>) -> Self {
        self.perception = Some(provider);
        self
    }

    pub fn reasoning(mut self, provider: Arc<dyn ReasoningProvider>) -> Self {
        self.reasoning = Some(provider);
        self
    }

    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Custom action registered alongside the built-in set.
    pub fn action(mut self, action: Arc<dyn ActionDefinition>) -> Self {
        self.actions.push(action);
        self
    }

    pub fn build(self) -> Result<Supervisor, RuntimeError> {
        let reasoning = self.reasoning.ok_or_else(|| {
            RuntimeError::Configuration("No reasoning provider configured".to_string())
        })?;
        let perception = self.perception.ok_or_else(|| {
            RuntimeError::Configuration("No perception provider configured".to_string())
        })?;
        self.config.validate()?;

        let mut registry = default_registry(&self.config.capabilities);
        for action in self.actions {
            registry.register(action)?;
        }
        info!(
            "Supervisor ready with {} actions via {}",
            registry.count(),
            reasoning.name()
        );

        let (errors, _) = broadcast::channel(ERROR_CHANNEL_CAPACITY);
        Ok(Supervisor {
            perception,
            reasoning,
            config: Arc::new(self.config),
            registry: SyncRwLock::new(registry),
            variables: SyncRwLock::new(BTreeMap::new()),
            tasks: Arc::new(RwLock::new(HashMap::new())),
            metrics: Metrics::new(),
            errors,
        })
    }
}

pub struct Supervisor {
    perception: Arc<dyn PerceptionProvider>,
    reasoning: Arc<dyn ReasoningProvider>,
    config: Arc<RuntimeConfig>,
    registry: SyncRwLock<ActionRegistry>,
    variables: SyncRwLock<BTreeMap<String, Variable>>,
    tasks: Arc<RwLock<HashMap<String, Arc<TaskState>>>>,
    metrics: Arc<Metrics>,
    errors: broadcast::Sender<TaskFailure>,
}

impl Supervisor {
    pub fn builder() -> SupervisorBuilder {
        SupervisorBuilder::new()
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Fails if the kind is `complete` or already registered.
    pub fn register_action(&self, action: Arc<dyn ActionDefinition>) -> Result<(), RuntimeError> {
        let kind = action.kind().to_string();
        self.registry.write().register(action)?;
        info!("Registered action: {}", kind);
        Ok(())
    }

    pub fn action_kinds(&self) -> Vec<String> {
        self.registry.read().kinds()
    }

    pub fn pprint_action(&self, action: &ProposedAction) -> Option<String> {
        self.registry.read().pprint(action)
    }

    /// Add or replace a variable. Running tasks keep the set they started with.
    pub fn add_variable(&self, variable: Variable) {
        self.variables.write().insert(variable.key.clone(), variable);
    }

    pub fn variable(&self, key: &str) -> Option<Variable> {
        self.variables.read().get(key).cloned()
    }

    pub fn variables(&self) -> Vec<Variable> {
        self.variables.read().values().cloned().collect()
    }

    pub fn remove_variable(&self, key: &str) -> Option<Variable> {
        self.variables.write().remove(key)
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Failures of every task run by this supervisor.
    pub fn subscribe_errors(&self) -> broadcast::Receiver<TaskFailure> {
        self.errors.subscribe()
    }

    fn prepare(
        &self,
        description: &str,
        options: TaskOptions,
        handle: Arc<dyn AutomationHandle>,
    ) -> (Arc<TaskState>, ExecutionLoop) {
        let task_id = uuid::Uuid::new_v4().to_string();
        let state = Arc::new(TaskState::new(task_id, description, handle));

        let variant = CompletionVariant::from_output_schema(options.output_schema.clone());
        let registry = self.registry.read().with_completion(&variant);
        let dispatcher = ActionDispatcher::new(Arc::new(registry), self.config.action_timeout_ms);
        let variables = Arc::new(self.variables());

        self.metrics.inc_tasks_submitted();
        let execution = ExecutionLoop {
            task: state.clone(),
            perception: self.perception.clone(),
            reasoning: self.reasoning.clone(),
            dispatcher,
            config: self.config.clone(),
            options,
            variables,
            metrics: self.metrics.clone(),
            errors: self.errors.clone(),
        };
        (state, execution)
    }

    /// Spawn the loop. The returned handle always yields the final output,
    /// even if a collaborator panics inside the loop.
    fn spawn(&self, state: Arc<TaskState>, execution: ExecutionLoop) -> JoinHandle<TaskOutput> {
        let errors = self.errors.clone();
        let inner = tokio::spawn(execution.run());
        tokio::spawn(async move {
            let output = match inner.await {
                Ok(output) => output,
                Err(e) => {
                    let message = format!("Execution loop aborted: {}", e);
                    warn!("Task {}: {}", state.id(), message);
                    state.fail(message.clone());
                    if errors
                        .send(TaskFailure {
                            task_id: state.id().to_string(),
                            message,
                        })
                        .is_err()
                    {
                        info!("No subscribers for task failure of {}", state.id());
                    }
                    state.to_output()
                }
            };
            state.finish(output.clone());
            output
        })
    }

    /// Run a task to completion.
    ///
    /// # Errors
    /// Returns `Fatal` when the loop hit a fatal error; the task is left FAILED.
    pub async fn submit(
        &self,
        description: &str,
        options: TaskOptions,
        handle: Arc<dyn AutomationHandle>,
    ) -> Result<TaskOutput, RuntimeError> {
        let (state, execution) = self.prepare(description, options, handle);
        let task_id = state.id().to_string();
        self.tasks
            .write()
            .await
            .insert(task_id.clone(), state.clone());

        let output = match self.spawn(state.clone(), execution).await {
            Ok(output) => output,
            Err(e) => {
                return Err(RuntimeError::fatal(&task_id, e.to_string()));
            }
        };
        match &output.error {
            Some(message) => Err(RuntimeError::fatal(&task_id, message.clone())),
            None => Ok(output),
        }
    }

    /// Start a task and return immediately. Never fails: loop errors surface on
    /// the error channel and in the output returned by [`TaskControl::wait`].
    pub async fn submit_async(
        &self,
        description: &str,
        options: TaskOptions,
        handle: Arc<dyn AutomationHandle>,
    ) -> TaskControl {
        let (state, execution) = self.prepare(description, options, handle);
        self.tasks
            .write()
            .await
            .insert(state.id().to_string(), state.clone());
        // Detached; completion is observed through the task state.
        let _ = self.spawn(state.clone(), execution);
        TaskControl::new(state, self.errors.clone())
    }

    pub async fn control(&self, task_id: &str) -> Result<TaskControl, RuntimeError> {
        let tasks = self.tasks.read().await;
        let state = tasks
            .get(task_id)
            .ok_or_else(|| RuntimeError::NotFound(task_id.to_string()))?;
        Ok(TaskControl::new(state.clone(), self.errors.clone()))
    }

    pub async fn task_info(&self, task_id: &str) -> Result<TaskInfo, RuntimeError> {
        let tasks = self.tasks.read().await;
        tasks
            .get(task_id)
            .map(|state| state.info())
            .ok_or_else(|| RuntimeError::NotFound(task_id.to_string()))
    }

    pub async fn list_tasks(&self) -> Vec<TaskInfo> {
        let tasks = self.tasks.read().await;
        let mut result: Vec<TaskInfo> = tasks.values().map(|state| state.info()).collect();
        result.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        result
    }

    /// Run a short extraction task against `handle`.
    ///
    /// With an output schema the result is the parsed JSON object; otherwise it
    /// is the completion text as a JSON string.
    pub async fn extract(
        &self,
        handle: Arc<dyn AutomationHandle>,
        instruction: Option<&str>,
        output_schema: Option<serde_json::Value>,
    ) -> Result<serde_json::Value, RuntimeError> {
        let description = match (instruction, &output_schema) {
            (None, None) => {
                return Err(RuntimeError::Configuration(
                    "No extraction instruction or output schema specified".to_string(),
                ))
            }
            (Some(instruction), _) => format!(
                "Perform an extraction on the current page according to this instruction: {}. \
                 Make sure your final response only contains the extracted content",
                instruction
            ),
            (None, Some(_)) => "Perform a data extraction on the current page. \
                 Make sure your final response only contains the extracted content"
                .to_string(),
        };

        let structured = output_schema.is_some();
        let mut options = TaskOptions::new().with_max_steps(EXTRACT_MAX_STEPS);
        options.output_schema = output_schema;

        let output = self.submit(&description, options, handle).await?;
        if structured {
            Ok(serde_json::from_str(&output.output)?)
        } else {
            Ok(serde_json::Value::String(output.output))
        }
    }

    /// Cancel every unfinished task, wait for the loops to stop and close every
    /// distinct automation handle once.
    ///
    /// Tasks are taken out of the table before they are cancelled, and the
    /// table is drained again until it stays empty, so a task submitted while
    /// teardown is in progress is cancelled too.
    pub async fn teardown(&self) {
        let mut closed: Vec<Arc<dyn AutomationHandle>> = Vec::new();

        loop {
            let states: Vec<Arc<TaskState>> = {
                let mut tasks = self.tasks.write().await;
                std::mem::take(&mut *tasks).into_values().collect()
            };
            if states.is_empty() {
                break;
            }
            info!("Tearing down {} tasks", states.len());

            for state in &states {
                if !state.status().is_terminal() {
                    let status = state.cancel();
                    info!("Task {} cancelled by teardown ({})", state.id(), status);
                }
            }
            for state in &states {
                state.wait().await;
            }

            for state in &states {
                let handle = state.handle();
                let seen = closed
                    .iter()
                    .any(|h| Arc::as_ptr(h) as *const () == Arc::as_ptr(&handle) as *const ());
                if seen {
                    continue;
                }
                closed.push(handle.clone());
                if let Err(e) = handle.close().await {
                    warn!("Failed to close automation handle: {}", e);
                }
            }
        }

        info!("Teardown complete");
    }

    /// Number of tasks in the table that have not reached a terminal status.
    pub async fn active_tasks(&self) -> usize {
        let tasks = self.tasks.read().await;
        tasks
            .values()
            .filter(|state| !state.status().is_terminal())
            .count()
    }
}

impl Drop for Supervisor {
    fn drop(&mut self) {
        if let Ok(tasks) = self.tasks.try_read() {
            for state in tasks.values() {
                state.cancel();
            }
        }
    }
}
