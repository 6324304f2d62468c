//! The perceive → decide → act loop for a single task.

use crate::config::RuntimeConfig;
use crate::control::TaskFailure;
use crate::debug::DebugWriter;
use crate::error::RuntimeError;
use crate::messages::build_request;
use crate::metrics::{
    increment_task_finished, MetricTimer, ACTION_LATENCY, PERCEPTION_LATENCY, REASONING_LATENCY,
    TASK_DURATION,
};
use crate::options::TaskOptions;
use crate::recorder::StepRecorder;
use crate::retry::RetryPolicy;
use crate::task::TaskState;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};
use waypoint_actions::{ActionContext, ActionDispatcher};
use waypoint_core::{
    ActionOutput, Decision, Metrics, PerceptionProvider, PerceptionSnapshot, ProposedAction,
    ProviderError, ReasoningProvider, ReasoningRequest, ReasoningResponse, TaskOutput, TaskStatus,
    Variable, COMPLETE_ACTION,
};

const NO_COMPLETE_OUTPUT: &str = "No complete action found";

enum Checkpoint {
    Proceed,
    Paused,
    Exit,
}

pub(crate) struct ExecutionLoop {
    pub(crate) task: Arc<TaskState>,
    pub(crate) perception: Arc<dyn PerceptionProvider>,
    pub(crate) reasoning: Arc<dyn ReasoningProvider>,
    pub(crate) dispatcher: ActionDispatcher,
    pub(crate) config: Arc<RuntimeConfig>,
    pub(crate) options: TaskOptions,
    pub(crate) variables: Arc<Vec<Variable>>,
    pub(crate) metrics: Arc<Metrics>,
    pub(crate) errors: broadcast::Sender<TaskFailure>,
}

impl ExecutionLoop {
    /// Drive the task to a terminal status. Fatal errors are recorded on the
    /// task and published, never returned.
    pub(crate) async fn run(self) -> TaskOutput {
        let _timer = MetricTimer::new(TASK_DURATION);
        self.task.start();
        info!("Starting task {}: {}", self.task.id(), self.task.description());

        let writer = self.debug_dir().map(DebugWriter::new);
        if let Some(writer) = &writer {
            let root = writer.root().display().to_string();
            info!("Debugging task {} in {}", self.task.id(), root);
        }

        let mut result = self.drive(writer.as_ref()).await;
        if result.is_ok() {
            if let Some(writer) = &writer {
                result = writer.write_task_output(&self.task.to_output()).await;
            }
        }

        let output = match result {
            Ok(()) => {
                let output = self.task.to_output();
                info!(
                    "Task {} finished with status {} after {} steps",
                    output.task_id,
                    output.status,
                    output.steps.len()
                );
                if let Some(observer) = &self.options.observer {
                    observer.on_complete(&output).await;
                }
                output
            }
            Err(e) => {
                self.fail(&e);
                self.task.to_output()
            }
        };
        increment_task_finished(&output.status.to_string());
        output
    }

    fn fail(&self, e: &RuntimeError) {
        let message = e.task_message();
        error!("Task {} failed: {}", self.task.id(), message);
        self.task.fail(message.clone());
        let failure = TaskFailure {
            task_id: self.task.id().to_string(),
            message,
        };
        if self.errors.send(failure).is_err() {
            debug!("No subscribers for task failure of {}", self.task.id());
        }
    }

    fn debug_dir(&self) -> Option<PathBuf> {
        if !self.config.debug {
            return None;
        }
        Some(
            self.options
                .debug_dir
                .clone()
                .unwrap_or_else(|| self.config.debug_dir.join(self.task.id())),
        )
    }

    async fn checkpoint(&self) -> Checkpoint {
        match self.task.status() {
            TaskStatus::Paused => {
                sleep(self.config.pause_poll_interval()).await;
                Checkpoint::Paused
            }
            status if status.is_terminal() => Checkpoint::Exit,
            _ => Checkpoint::Proceed,
        }
    }

    async fn drive(&self, writer: Option<&DebugWriter>) -> Result<(), RuntimeError> {
        let mut recorder = StepRecorder::new(self.task.clone(), self.metrics.clone());
        let schema = self.dispatcher.registry().decision_schema();
        let mut consecutive_failures = 0u32;

        loop {
            match self.checkpoint().await {
                Checkpoint::Exit => break,
                Checkpoint::Paused => continue,
                Checkpoint::Proceed => {}
            }

            let idx = recorder.next_idx();
            if let Some(max_steps) = self.options.step_budget() {
                if idx >= max_steps {
                    info!("Task {} reached its budget of {} steps", self.task.id(), max_steps);
                    self.task.cancel();
                    break;
                }
            }

            let perception = match self.perceive().await {
                Ok(perception) => Arc::new(perception),
                Err(e) => {
                    consecutive_failures += 1;
                    self.check_failures(consecutive_failures, &e)?;
                    warn!(
                        "No perception for task {}, waiting {}ms",
                        self.task.id(),
                        self.config.perception_backoff_ms
                    );
                    sleep(self.config.perception_backoff()).await;
                    continue;
                }
            };
            if let Some(writer) = writer {
                writer.write_perception(idx, &perception).await?;
            }

            let request = build_request(
                self.task.description(),
                &self.task.steps(),
                &perception,
                &self.variables,
                schema.clone(),
            )?;
            if let Some(writer) = writer {
                writer.write_messages(idx, &request.messages).await?;
            }

            let response = match self.decide(&request).await {
                Ok(response) => response,
                Err(e) => {
                    consecutive_failures += 1;
                    self.check_failures(consecutive_failures, &e)?;
                    continue;
                }
            };
            if let Some(observer) = &self.options.observer {
                observer.on_decision(&response.decision).await;
            }

            match self.checkpoint().await {
                Checkpoint::Exit => break,
                Checkpoint::Paused => continue,
                Checkpoint::Proceed => {}
            }

            let outputs = self.act(&response.decision, perception).await?;
            let event = recorder.record(response.decision, outputs, response.usage);
            consecutive_failures = 0;
            info!("Task {} completed step {}", self.task.id(), event.step.idx);

            if let Some(observer) = &self.options.observer {
                observer.on_step(&event).await;
            }
            if let Some(writer) = writer {
                writer.write_step(&event.step).await?;
            }
        }
        Ok(())
    }

    fn check_failures(&self, failures: u32, last: &ProviderError) -> Result<(), RuntimeError> {
        let ceiling = self.config.max_consecutive_failures;
        if ceiling > 0 && failures > ceiling {
            return Err(RuntimeError::fatal(
                self.task.id(),
                format!("{} consecutive provider failures, last: {}", failures, last),
            ));
        }
        Ok(())
    }

    async fn perceive(&self) -> Result<PerceptionSnapshot, ProviderError> {
        let _timer = MetricTimer::new(PERCEPTION_LATENCY);
        let handle = self.task.handle();
        let handle = handle.as_ref();
        let provider = &self.perception;
        let policy = RetryPolicy::new(self.config.perception_retries, self.config.retry_base_delay_ms);
        policy
            .run("Perception capture", move || provider.capture(handle))
            .await
            .map_err(|e| {
                self.metrics.inc_perception_failures();
                e
            })
    }

    async fn decide(&self, request: &ReasoningRequest) -> Result<ReasoningResponse, ProviderError> {
        let policy = RetryPolicy::new(self.config.reasoning_retries, self.config.retry_base_delay_ms);
        policy
            .run("Reasoning call", move || async move {
                self.metrics.inc_reasoning_requests();
                let _timer = MetricTimer::new(REASONING_LATENCY);
                self.reasoning.decide(request).await.map_err(|e| {
                    self.metrics.inc_reasoning_failures();
                    e
                })
            })
            .await
    }

    async fn act(
        &self,
        decision: &Decision,
        perception: Arc<PerceptionSnapshot>,
    ) -> Result<Vec<ActionOutput>, RuntimeError> {
        let mut outputs = Vec::with_capacity(decision.actions.len());
        for action in &decision.actions {
            if action.is_complete() {
                let output = self.resolve_completion(action)?;
                if self.task.complete() {
                    info!("Task {} marked complete", self.task.id());
                    self.task.set_output(output);
                }
            }

            let ctx = ActionContext::new(self.task.id(), perception.clone(), self.task.handle())
                .with_variables(self.variables.clone())
                .with_token_limit(self.config.token_limit)
                .with_debug_dir(self.debug_dir());
            let output = {
                let _timer = MetricTimer::new(ACTION_LATENCY);
                self.dispatcher.dispatch(action, ctx).await
            };
            self.metrics.inc_actions_dispatched();
            if !output.success {
                self.metrics.inc_action_failures();
            }
            outputs.push(output);

            sleep(self.config.settle_delay()).await;
        }
        Ok(outputs)
    }

    fn resolve_completion(&self, action: &ProposedAction) -> Result<String, RuntimeError> {
        let formatted = self
            .dispatcher
            .registry()
            .get(COMPLETE_ACTION)
            .and_then(|definition| definition.complete(&action.params));
        match formatted {
            Some(Ok(output)) => Ok(output),
            Some(Err(e)) => Err(RuntimeError::fatal(
                self.task.id(),
                format!("Could not format task output: {}", e),
            )),
            None => Ok(NO_COMPLETE_OUTPUT.to_string()),
        }
    }
}
