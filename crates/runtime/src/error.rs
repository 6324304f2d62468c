//! Runtime error types.

use thiserror::Error;
use waypoint_actions::RegistryError;

#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Task {0} not found")]
    NotFound(String),

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Task {task_id} failed: {message}")]
    Fatal { task_id: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RuntimeError {
    pub(crate) fn fatal(task_id: &str, message: impl Into<String>) -> Self {
        RuntimeError::Fatal {
            task_id: task_id.to_string(),
            message: message.into(),
        }
    }

    /// Message recorded on the task when this error ends its loop.
    pub(crate) fn task_message(&self) -> String {
        match self {
            RuntimeError::Fatal { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}
