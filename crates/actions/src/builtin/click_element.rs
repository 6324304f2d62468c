use super::index_param;
use crate::context::ActionContext;
use crate::definition::ActionDefinition;
use crate::error::ActionError;
use async_trait::async_trait;
use serde_json::json;
use waypoint_core::ActionOutput;

pub struct ClickElementAction;

#[async_trait]
impl ActionDefinition for ClickElementAction {
    fn kind(&self) -> &str {
        "clickElement"
    }

    fn description(&self) -> &str {
        "Click on an interactive element"
    }

    fn params_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "index": {"type": "integer", "description": "The numeric index of the element to click."}
            },
            "required": ["index"]
        })
    }

    async fn run(
        &self,
        ctx: ActionContext,
        params: serde_json::Value,
    ) -> Result<ActionOutput, ActionError> {
        let index = index_param(&params)?;
        if !ctx.perception.has_element(index) {
            return Ok(ActionOutput::failure("Element not found"));
        }
        ctx.handle.click(index).await?;
        Ok(ActionOutput::success(format!("Clicked element with index {}", index)))
    }

    fn pprint(&self, params: &serde_json::Value) -> Option<String> {
        Some(format!("Click element at index {}", params["index"]))
    }
}
