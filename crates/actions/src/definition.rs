use crate::context::ActionContext;
use crate::error::ActionError;
use async_trait::async_trait;
use waypoint_core::ActionOutput;

/// A capability the reasoning provider can invoke by kind.
#[async_trait]
pub trait ActionDefinition: Send + Sync {
    fn kind(&self) -> &str;

    fn description(&self) -> &str;

    /// JSON schema for the `params` object.
    fn params_schema(&self) -> serde_json::Value;

    async fn run(
        &self,
        ctx: ActionContext,
        params: serde_json::Value,
    ) -> Result<ActionOutput, ActionError>;

    /// Formats the task output. Only consulted for the `complete` kind.
    fn complete(&self, _params: &serde_json::Value) -> Option<Result<String, ActionError>> {
        None
    }

    fn pprint(&self, _params: &serde_json::Value) -> Option<String> {
        None
    }
}
