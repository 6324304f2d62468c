use super::string_param;
use crate::context::ActionContext;
use crate::definition::ActionDefinition;
use crate::error::ActionError;
use async_trait::async_trait;
use serde_json::json;
use waypoint_core::ActionOutput;

/// Only registered when the surface advertises the document-reader capability.
pub struct ReadDocumentAction;

#[async_trait]
impl ActionDefinition for ReadDocumentAction {
    fn kind(&self) -> &str {
        "readDocument"
    }

    fn description(&self) -> &str {
        "Read a linked document (e.g. a PDF) and answer a question about it"
    }

    fn params_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "url": {"type": "string", "description": "URL of the document"},
                "question": {"type": "string", "description": "What to find out from the document"}
            },
            "required": ["url", "question"]
        })
    }

    async fn run(
        &self,
        ctx: ActionContext,
        params: serde_json::Value,
    ) -> Result<ActionOutput, ActionError> {
        let url = string_param(&params, "url")?;
        let question = string_param(&params, "question")?;
        let answer = ctx.handle.read_document(url, question).await?;
        Ok(ActionOutput::success(format!("Read document {}", url))
            .with_extract(json!({ "answer": answer })))
    }

    fn pprint(&self, params: &serde_json::Value) -> Option<String> {
        Some(format!("Read document {}", params["url"].as_str().unwrap_or("?")))
    }
}
