use crate::context::ActionContext;
use crate::definition::ActionDefinition;
use crate::error::ActionError;
use async_trait::async_trait;
use serde_json::json;
use waypoint_core::{ActionOutput, COMPLETE_ACTION};

/// Default terminal action: the `text` param becomes the task output.
pub struct CompleteAction;

#[async_trait]
impl ActionDefinition for CompleteAction {
    fn kind(&self) -> &str {
        COMPLETE_ACTION
    }

    fn description(&self) -> &str {
        "Complete the task. This must be the final action in the sequence"
    }

    fn params_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "text": {"type": "string", "description": "The text to complete the task with, make this answer the ultimate goal of the task"}
            },
            "required": ["text"]
        })
    }

    async fn run(
        &self,
        _ctx: ActionContext,
        _params: serde_json::Value,
    ) -> Result<ActionOutput, ActionError> {
        Ok(ActionOutput::success("Completed task"))
    }

    fn complete(&self, params: &serde_json::Value) -> Option<Result<String, ActionError>> {
        Some(
            params["text"]
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| ActionError::ValidationError("Missing 'text' field".to_string())),
        )
    }

    fn pprint(&self, params: &serde_json::Value) -> Option<String> {
        Some(format!("Complete task with text \"{}\"", params["text"].as_str().unwrap_or_default()))
    }
}

/// Terminal action whose `output` param follows a caller-supplied schema.
pub struct StructuredCompleteAction {
    output_schema: serde_json::Value,
}

impl StructuredCompleteAction {
    pub fn new(output_schema: serde_json::Value) -> Self {
        Self { output_schema }
    }
}

#[async_trait]
impl ActionDefinition for StructuredCompleteAction {
    fn kind(&self) -> &str {
        COMPLETE_ACTION
    }

    fn description(&self) -> &str {
        "Complete the task with structured output. This must be the final action in the sequence"
    }

    fn params_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "output": self.output_schema
            },
            "required": ["output"]
        })
    }

    async fn run(
        &self,
        _ctx: ActionContext,
        params: serde_json::Value,
    ) -> Result<ActionOutput, ActionError> {
        Ok(ActionOutput::success("Completed task").with_extract(params["output"].clone()))
    }

    fn complete(&self, params: &serde_json::Value) -> Option<Result<String, ActionError>> {
        let output = match params.get("output") {
            Some(output) => output,
            None => {
                return Some(Err(ActionError::ValidationError(
                    "Missing 'output' field".to_string(),
                )))
            }
        };
        Some(serde_json::to_string(output).map_err(|e| ActionError::ExecutionFailed(e.to_string())))
    }

    fn pprint(&self, params: &serde_json::Value) -> Option<String> {
        Some(format!("Complete task with output {}", params["output"]))
    }
}
