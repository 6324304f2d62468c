use crate::task::TaskState;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;
use waypoint_core::{ActionOutput, AgentStep, Decision, Metrics, TokenUsage};

/// Telemetry handed to the step observer after each recorded step.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StepEvent {
    pub step: AgentStep,
    pub cumulative_usage: TokenUsage,
}

/// Appends immutable step records to a task and keeps running token totals.
pub struct StepRecorder {
    task: Arc<TaskState>,
    metrics: Arc<Metrics>,
    next_idx: usize,
    cumulative: TokenUsage,
}

impl StepRecorder {
    pub fn new(task: Arc<TaskState>, metrics: Arc<Metrics>) -> Self {
        let next_idx = task.step_count();
        Self {
            task,
            metrics,
            next_idx,
            cumulative: TokenUsage::default(),
        }
    }

    /// Index the next recorded step will carry.
    pub fn next_idx(&self) -> usize {
        self.next_idx
    }

    pub fn cumulative_usage(&self) -> TokenUsage {
        self.cumulative
    }

    pub fn record(
        &mut self,
        decision: Decision,
        action_outputs: Vec<ActionOutput>,
        token_usage: Option<TokenUsage>,
    ) -> StepEvent {
        if let Some(usage) = token_usage {
            self.cumulative += usage;
        }
        let step = AgentStep {
            idx: self.next_idx,
            decision,
            action_outputs,
            token_usage,
        };
        debug!(
            "Recording step {} for task {} ({} actions)",
            step.idx,
            self.task.id(),
            step.action_outputs.len()
        );
        self.task.push_step(step.clone());
        self.metrics.inc_steps_recorded();
        self.next_idx += 1;

        StepEvent {
            step,
            cumulative_usage: self.cumulative,
        }
    }
}
