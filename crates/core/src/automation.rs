use crate::error::ProviderError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ScrollDirection {
    Up,
    Down,
}

/// Primitives executed against the interactive surface.
///
/// Element-addressed primitives take the numeric index exposed by the most
/// recent [`PerceptionSnapshot`](crate::PerceptionSnapshot).
#[async_trait]
pub trait AutomationHandle: Send + Sync {
    async fn navigate(&self, url: &str) -> Result<(), ProviderError>;

    async fn click(&self, index: u32) -> Result<(), ProviderError>;

    async fn input_text(&self, index: u32, text: &str) -> Result<(), ProviderError>;

    async fn select_option(&self, index: u32, text: &str) -> Result<(), ProviderError>;

    /// Scroll the page, or the element at `index` when given.
    async fn scroll(
        &self,
        direction: ScrollDirection,
        index: Option<u32>,
    ) -> Result<(), ProviderError>;

    async fn key_press(&self, key: &str) -> Result<(), ProviderError>;

    async fn go_back(&self) -> Result<(), ProviderError>;

    async fn go_forward(&self) -> Result<(), ProviderError>;

    async fn refresh(&self) -> Result<(), ProviderError>;

    /// Capability-gated: read a document at `url` and answer `question` about it.
    async fn read_document(&self, url: &str, question: &str) -> Result<String, ProviderError> {
        let _ = (url, question);
        Err(ProviderError::Unsupported("read_document".to_string()))
    }

    /// Release the underlying surface.
    async fn close(&self) -> Result<(), ProviderError> {
        Ok(())
    }
}
