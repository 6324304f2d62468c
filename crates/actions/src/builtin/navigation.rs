use super::string_param;
use crate::context::ActionContext;
use crate::definition::ActionDefinition;
use crate::error::ActionError;
use async_trait::async_trait;
use serde_json::json;
use waypoint_core::ActionOutput;

pub struct GoToUrlAction;

#[async_trait]
impl ActionDefinition for GoToUrlAction {
    fn kind(&self) -> &str {
        "goToUrl"
    }

    fn description(&self) -> &str {
        "Navigate to a specific URL"
    }

    fn params_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "url": {"type": "string", "description": "The URL to navigate to"}
            },
            "required": ["url"]
        })
    }

    async fn run(
        &self,
        ctx: ActionContext,
        params: serde_json::Value,
    ) -> Result<ActionOutput, ActionError> {
        let url = string_param(&params, "url")?;
        ctx.handle.navigate(url).await?;
        Ok(ActionOutput::success(format!("Navigated to {}", url)))
    }

    fn pprint(&self, params: &serde_json::Value) -> Option<String> {
        Some(format!("Navigate to {}", params["url"].as_str().unwrap_or("?")))
    }
}

pub struct PageBackAction;

#[async_trait]
impl ActionDefinition for PageBackAction {
    fn kind(&self) -> &str {
        "pageBack"
    }

    fn description(&self) -> &str {
        "Navigate back in browser history"
    }

    fn params_schema(&self) -> serde_json::Value {
        json!({"type": "object", "properties": {}})
    }

    async fn run(
        &self,
        ctx: ActionContext,
        _params: serde_json::Value,
    ) -> Result<ActionOutput, ActionError> {
        ctx.handle.go_back().await?;
        Ok(ActionOutput::success("Navigated back to the previous page"))
    }

    fn pprint(&self, _params: &serde_json::Value) -> Option<String> {
        Some("Navigate back to previous page".to_string())
    }
}

pub struct PageForwardAction;

#[async_trait]
impl ActionDefinition for PageForwardAction {
    fn kind(&self) -> &str {
        "pageForward"
    }

    fn description(&self) -> &str {
        "Navigate forward in browser history"
    }

    fn params_schema(&self) -> serde_json::Value {
        json!({"type": "object", "properties": {}})
    }

    async fn run(
        &self,
        ctx: ActionContext,
        _params: serde_json::Value,
    ) -> Result<ActionOutput, ActionError> {
        ctx.handle.go_forward().await?;
        Ok(ActionOutput::success("Navigated forward to the next page"))
    }

    fn pprint(&self, _params: &serde_json::Value) -> Option<String> {
        Some("Navigate forward to next page".to_string())
    }
}

pub struct RefreshPageAction;

#[async_trait]
impl ActionDefinition for RefreshPageAction {
    fn kind(&self) -> &str {
        "refreshPage"
    }

    fn description(&self) -> &str {
        "Refresh the current page"
    }

    fn params_schema(&self) -> serde_json::Value {
        json!({"type": "object", "properties": {}})
    }

    async fn run(
        &self,
        ctx: ActionContext,
        _params: serde_json::Value,
    ) -> Result<ActionOutput, ActionError> {
        ctx.handle.refresh().await?;
        Ok(ActionOutput::success("Refreshed the current page"))
    }

    fn pprint(&self, _params: &serde_json::Value) -> Option<String> {
        Some("Refresh the page".to_string())
    }
}
