use crate::context::ActionContext;
use crate::definition::ActionDefinition;
use crate::error::ActionError;
use crate::registry::ActionRegistry;
use crate::variables::substitute;
use serde_json::json;
use std::sync::Arc;
use tokio::time::{timeout, Duration};
use tracing::{error, info, warn};
use waypoint_core::{ActionOutput, ProposedAction};

const MAX_PARAMS_BYTES: usize = 1_000_000;

/// Runs proposed actions against a registry.
///
/// Nothing escapes this boundary as an error: unknown kinds, invalid params,
/// handler failures, panics and timeouts all come back as a non-success
/// [`ActionOutput`].
pub struct ActionDispatcher {
    registry: Arc<ActionRegistry>,
    timeout_ms: u64,
}

impl ActionDispatcher {
    pub fn new(registry: Arc<ActionRegistry>, timeout_ms: u64) -> Self {
        Self {
            registry,
            timeout_ms,
        }
    }

    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    pub async fn dispatch(&self, action: &ProposedAction, ctx: ActionContext) -> ActionOutput {
        info!("Dispatching action: {} for task: {}", action.kind, ctx.task_id);

        let definition = match self.registry.resolve(&action.kind) {
            Ok(definition) => definition,
            Err(e) => {
                warn!("{}", e);
                return ActionOutput::failure(format!("Unknown action type: {}", action.kind));
            }
        };

        let params = match Self::validate_params(&action.params) {
            Ok(params) => substitute(&params, &ctx.variables),
            Err(e) => return ActionOutput::failure(format!("Action {} failed: {}", action.kind, e)),
        };

        match self.execute_with_protection(definition, ctx, params).await {
            Ok(output) => output,
            Err(e) => {
                warn!("Action {} failed: {}", action.kind, e);
                ActionOutput::failure(format!("Action {} failed: {}", action.kind, e))
            }
        }
    }

    fn validate_params(params: &serde_json::Value) -> Result<serde_json::Value, ActionError> {
        let params = if params.is_null() {
            json!({})
        } else {
            params.clone()
        };

        if !params.is_object() {
            return Err(ActionError::ValidationError(
                "params must be a JSON object".to_string(),
            ));
        }

        if let Ok(serialized) = serde_json::to_string(&params) {
            if serialized.len() > MAX_PARAMS_BYTES {
                return Err(ActionError::ValidationError("params too large".to_string()));
            }
        }

        Ok(params)
    }

    async fn execute_with_protection(
        &self,
        definition: Arc<dyn ActionDefinition>,
        ctx: ActionContext,
        params: serde_json::Value,
    ) -> Result<ActionOutput, ActionError> {
        // Spawned so a panicking handler cannot take the loop down with it.
        let handle = tokio::spawn(async move { definition.run(ctx, params).await });
        let abort = handle.abort_handle();

        match timeout(Duration::from_millis(self.timeout_ms), handle).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_err)) => {
                if join_err.is_panic() {
                    error!("Action handler panicked");
                } else {
                    error!("Action handler cancelled");
                }
                Err(ActionError::Internal)
            }
            Err(_) => {
                warn!("Action timed out after {}ms", self.timeout_ms);
                abort.abort();
                Err(ActionError::Timeout)
            }
        }
    }
}
