use crate::context::ActionContext;
use crate::definition::ActionDefinition;
use crate::error::ActionError;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use waypoint_core::{ActionOutput, ScrollDirection};

#[derive(Debug, Deserialize)]
struct ScrollParams {
    direction: ScrollDirection,
    #[serde(default)]
    index: Option<u32>,
}

pub struct ScrollAction;

#[async_trait]
impl ActionDefinition for ScrollAction {
    fn kind(&self) -> &str {
        "scroll"
    }

    fn description(&self) -> &str {
        "Scroll the page or a scrollable element up or down"
    }

    fn params_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "direction": {"type": "string", "enum": ["up", "down"]},
                "index": {
                    "type": "integer",
                    "description": "Index of a scrollable element. Omit to scroll the page."
                }
            },
            "required": ["direction"]
        })
    }

    async fn run(
        &self,
        ctx: ActionContext,
        params: serde_json::Value,
    ) -> Result<ActionOutput, ActionError> {
        let ScrollParams { direction, index } =
            serde_json::from_value(params).map_err(ActionError::invalid_params)?;
        if let Some(index) = index {
            if !ctx.perception.has_element(index) {
                return Ok(ActionOutput::failure("Element not found"));
            }
        }
        ctx.handle.scroll(direction, index).await?;
        let direction = match direction {
            ScrollDirection::Up => "up",
            ScrollDirection::Down => "down",
        };
        let message = match index {
            Some(index) => format!("Scrolled {} in element with index {}", direction, index),
            None => format!("Scrolled {} the page", direction),
        };
        Ok(ActionOutput::success(message))
    }

    fn pprint(&self, params: &serde_json::Value) -> Option<String> {
        Some(format!("Scroll {}", params["direction"].as_str().unwrap_or("down")))
    }
}
