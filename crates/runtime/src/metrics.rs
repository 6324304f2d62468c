//! Latency histograms for engine observability.

use std::time::Instant;

pub const PERCEPTION_LATENCY: &str = "perception_latency";
pub const REASONING_LATENCY: &str = "reasoning_latency";
pub const ACTION_LATENCY: &str = "action_latency";
pub const TASK_DURATION: &str = "task_duration";

/// Record perception capture latency.
pub fn record_perception_latency(duration_ms: f64) {
    metrics::histogram!("perception_latency", duration_ms);
}

/// Record reasoning call latency.
pub fn record_reasoning_latency(duration_ms: f64) {
    metrics::histogram!("reasoning_latency", duration_ms);
}

/// Record action dispatch latency.
pub fn record_action_latency(duration_ms: f64) {
    metrics::histogram!("action_latency", duration_ms);
}

/// Record task duration.
pub fn record_task_duration(duration_ms: f64) {
    metrics::histogram!("task_duration", duration_ms);
}

/// Increment the counter for tasks that ended with the given status.
pub fn increment_task_finished(status: &str) {
    metrics::counter!("tasks_finished", 1, "status" => status.to_string());
}

/// RAII timer for automatic metric recording.
pub struct MetricTimer {
    start: Instant,
    metric_name: &'static str,
}

impl MetricTimer {
    pub fn new(metric_name: &'static str) -> Self {
        Self {
            start: Instant::now(),
            metric_name,
        }
    }
}

impl Drop for MetricTimer {
    fn drop(&mut self) {
        let duration_ms = self.start.elapsed().as_secs_f64() * 1000.0;
        match self.metric_name {
            PERCEPTION_LATENCY => record_perception_latency(duration_ms),
            REASONING_LATENCY => record_reasoning_latency(duration_ms),
            ACTION_LATENCY => record_action_latency(duration_ms),
            TASK_DURATION => record_task_duration(duration_ms),
            _ => {}
        }
    }
}
