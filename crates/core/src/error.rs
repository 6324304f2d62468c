use thiserror::Error;

/// Failures reported by external collaborators.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Perception error: {0}")]
    Perception(String),
    #[error("Reasoning error: {0}")]
    Reasoning(String),
    #[error("Automation error: {0}")]
    Automation(String),
    #[error("Unsupported primitive: {0}")]
    Unsupported(String),
}
