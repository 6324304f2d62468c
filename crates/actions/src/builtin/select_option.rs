use super::{index_param, string_param};
use crate::context::ActionContext;
use crate::definition::ActionDefinition;
use crate::error::ActionError;
use async_trait::async_trait;
use serde_json::json;
use waypoint_core::ActionOutput;

pub struct SelectOptionAction;

#[async_trait]
impl ActionDefinition for SelectOptionAction {
    fn kind(&self) -> &str {
        "selectOption"
    }

    fn description(&self) -> &str {
        "Select an option from a dropdown element"
    }

    fn params_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "index": {"type": "integer", "description": "The numeric index of the dropdown element."},
                "text": {"type": "string", "description": "The visible text of the option to select."}
            },
            "required": ["index", "text"]
        })
    }

    async fn run(
        &self,
        ctx: ActionContext,
        params: serde_json::Value,
    ) -> Result<ActionOutput, ActionError> {
        let index = index_param(&params)?;
        let text = string_param(&params, "text")?;
        if !ctx.perception.has_element(index) {
            return Ok(ActionOutput::failure("Element not found"));
        }
        ctx.handle.select_option(index, text).await?;
        Ok(ActionOutput::success(format!(
            "Selected option \"{}\" in element with index {}",
            text, index
        )))
    }

    fn pprint(&self, params: &serde_json::Value) -> Option<String> {
        Some(format!(
            "Select option \"{}\" in element at index {}",
            params["text"].as_str().unwrap_or_default(),
            params["index"]
        ))
    }
}
