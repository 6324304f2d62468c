use crate::error::ProviderError;
use crate::types::{Decision, TokenUsage};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Message role in a reasoning request.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Message {
    pub role: Role,
    /// Plain string, or an array of content parts when an image is attached.
    pub content: serde_json::Value,
}

impl Message {
    pub fn new(role: Role, content: serde_json::Value) -> Self {
        Self { role, content }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReasoningRequest {
    pub messages: Vec<Message>,
    /// JSON schema the returned decision must satisfy.
    pub schema: serde_json::Value,
}

#[derive(Debug, Clone)]
pub struct ReasoningResponse {
    pub decision: Decision,
    /// `None` when the provider does not report usage.
    pub usage: Option<TokenUsage>,
}

#[async_trait]
pub trait ReasoningProvider: Send + Sync {
    async fn decide(&self, request: &ReasoningRequest) -> Result<ReasoningResponse, ProviderError>;

    fn name(&self) -> &str {
        "reasoning"
    }
}
