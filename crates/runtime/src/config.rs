//! Runtime configuration loader.

use crate::error::RuntimeError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use waypoint_actions::Capabilities;

/// Engine tuning knobs. Every field has a default so a partial YAML file is valid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RuntimeConfig {
    pub token_limit: usize,
    pub perception_retries: u32,
    pub reasoning_retries: u32,
    pub retry_base_delay_ms: u64,
    /// Provider failures in a row (across restarted iterations) before the task
    /// fails. A recorded step resets the count. `0` disables the ceiling, so an
    /// outage only ever restarts the iteration.
    pub max_consecutive_failures: u32,
    pub pause_poll_interval_ms: u64,
    pub perception_backoff_ms: u64,
    pub settle_delay_ms: u64,
    pub action_timeout_ms: u64,
    pub debug: bool,
    pub debug_dir: PathBuf,
    pub capabilities: Capabilities,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            token_limit: 128_000,
            perception_retries: 3,
            reasoning_retries: 3,
            retry_base_delay_ms: 250,
            max_consecutive_failures: 10,
            pause_poll_interval_ms: 100,
            perception_backoff_ms: 1000,
            settle_delay_ms: 2000,
            action_timeout_ms: 30_000,
            debug: false,
            debug_dir: PathBuf::from("debug"),
            capabilities: Capabilities::default(),
        }
    }
}

impl RuntimeConfig {
    pub fn validate(&self) -> Result<(), RuntimeError> {
        if self.token_limit == 0 {
            return Err(RuntimeError::Configuration(
                "token_limit must be greater than zero".to_string(),
            ));
        }
        if self.action_timeout_ms == 0 {
            return Err(RuntimeError::Configuration(
                "action_timeout_ms must be greater than zero".to_string(),
            ));
        }
        if self.pause_poll_interval_ms == 0 {
            return Err(RuntimeError::Configuration(
                "pause_poll_interval_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn pause_poll_interval(&self) -> Duration {
        Duration::from_millis(self.pause_poll_interval_ms)
    }

    pub fn perception_backoff(&self) -> Duration {
        Duration::from_millis(self.perception_backoff_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

/// Load runtime configuration from a YAML file.
///
/// # Errors
/// Returns `Configuration` if the file is missing, empty, malformed or fails validation.
pub fn load_runtime_config(config_path: impl AsRef<Path>) -> Result<RuntimeConfig, RuntimeError> {
    let config_file = config_path.as_ref();

    if !config_file.exists() {
        return Err(RuntimeError::Configuration(format!(
            "Config file not found: {}",
            config_file.display()
        )));
    }

    let content = std::fs::read_to_string(config_file)?;

    if content.trim().is_empty() {
        return Err(RuntimeError::Configuration("Config file is empty".to_string()));
    }

    let config: RuntimeConfig = serde_yaml::from_str(&content)
        .map_err(|e| RuntimeError::Configuration(format!("Invalid YAML: {}", e)))?;

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("runtime.yaml");
        fs::write(
            &config_file,
            "settle_delay_ms: 0\ndebug: true\ncapabilities:\n  document_reader: true\n",
        )
        .unwrap();

        let config = load_runtime_config(&config_file).unwrap();
        assert_eq!(config.settle_delay_ms, 0);
        assert!(config.debug);
        assert!(config.capabilities.document_reader);
        assert_eq!(config.token_limit, 128_000);
        assert_eq!(config.reasoning_retries, 3);
        assert_eq!(config.debug_dir, PathBuf::from("debug"));
    }

    #[test]
    fn test_missing_file() {
        let result = load_runtime_config("/nonexistent/runtime.yaml");
        assert!(matches!(result, Err(RuntimeError::Configuration(_))));
    }

    #[test]
    fn test_empty_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("runtime.yaml");
        fs::write(&config_file, "   \n").unwrap();

        let result = load_runtime_config(&config_file);
        assert!(matches!(result, Err(RuntimeError::Configuration(_))));
    }

    #[test]
    fn test_invalid_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("runtime.yaml");
        fs::write(&config_file, "token_limit: [not a number\n").unwrap();

        let result = load_runtime_config(&config_file);
        assert!(matches!(result, Err(RuntimeError::Configuration(_))));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("runtime.yaml");
        fs::write(&config_file, "action_timeout_ms: 0\n").unwrap();

        let err = load_runtime_config(&config_file).unwrap_err();
        assert!(err.to_string().contains("action_timeout_ms"));
    }
}
