use crate::context::ActionContext;
use crate::definition::ActionDefinition;
use crate::error::ActionError;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use waypoint_core::ActionOutput;

#[derive(Debug, Deserialize)]
struct InputTextParams {
    index: u32,
    text: String,
}

pub struct InputTextAction;

#[async_trait]
impl ActionDefinition for InputTextAction {
    fn kind(&self) -> &str {
        "inputText"
    }

    fn description(&self) -> &str {
        "Input text into a input interactive element"
    }

    fn params_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "index": {"type": "integer", "description": "The numeric index of the element to input text."},
                "text": {"type": "string", "description": "The text to input."}
            },
            "required": ["index", "text"]
        })
    }

    async fn run(
        &self,
        ctx: ActionContext,
        params: serde_json::Value,
    ) -> Result<ActionOutput, ActionError> {
        let InputTextParams { index, text } =
            serde_json::from_value(params).map_err(ActionError::invalid_params)?;
        if !ctx.perception.has_element(index) {
            return Ok(ActionOutput::failure("Element not found"));
        }
        ctx.handle.input_text(index, &text).await?;
        Ok(ActionOutput::success(format!(
            "Inputted text \"{}\" into element with index {}",
            text, index
        )))
    }

    fn pprint(&self, params: &serde_json::Value) -> Option<String> {
        Some(format!(
            "Input text \"{}\" into element at index {}",
            params["text"].as_str().unwrap_or_default(),
            params["index"]
        ))
    }
}
