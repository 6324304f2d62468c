use thiserror::Error;
use waypoint_core::ProviderError;

#[derive(Error, Debug)]
pub enum ActionError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Automation failed: {0}")]
    Automation(#[from] ProviderError),

    #[error("Execution failed: {0}")]
    ExecutionFailed(String),

    #[error("Operation timed out")]
    Timeout,

    #[error("Internal error")]
    Internal,
}

impl ActionError {
    pub(crate) fn invalid_params(err: serde_json::Error) -> Self {
        ActionError::ValidationError(err.to_string())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Could not register an action with the name '{0}'. It is a reserved action")]
    Reserved(String),

    #[error("Could not register action of type {0}. Action with the same name is already registered")]
    Duplicate(String),

    #[error("Action type \"{0}\" not found in the action registry")]
    NotFound(String),
}
