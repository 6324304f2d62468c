use super::string_param;
use crate::context::ActionContext;
use crate::definition::ActionDefinition;
use crate::error::ActionError;
use async_trait::async_trait;
use serde_json::json;
use waypoint_core::ActionOutput;

pub struct KeyPressAction;

#[async_trait]
impl ActionDefinition for KeyPressAction {
    fn kind(&self) -> &str {
        "keyPress"
    }

    fn description(&self) -> &str {
        "Press a key or key combination on the focused element"
    }

    fn params_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "key": {"type": "string", "description": "Key to press, e.g. Enter, Tab, Control+A"}
            },
            "required": ["key"]
        })
    }

    async fn run(
        &self,
        ctx: ActionContext,
        params: serde_json::Value,
    ) -> Result<ActionOutput, ActionError> {
        let key = string_param(&params, "key")?;
        if key.trim().is_empty() {
            return Err(ActionError::ValidationError("Key cannot be empty".to_string()));
        }
        ctx.handle.key_press(key).await?;
        Ok(ActionOutput::success(format!("Pressed key \"{}\"", key)))
    }

    fn pprint(&self, params: &serde_json::Value) -> Option<String> {
        Some(format!("Press key \"{}\"", params["key"].as_str().unwrap_or_default()))
    }
}
