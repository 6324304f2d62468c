use crate::automation::AutomationHandle;
use crate::error::ProviderError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Serialized surface state plus a visual capture.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerceptionSnapshot {
    pub serialized_state: String,
    /// Base64 PNG, with or without a `data:` prefix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visual_snapshot: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub element_indices: BTreeSet<u32>,
}

impl PerceptionSnapshot {
    pub fn new(serialized_state: impl Into<String>) -> Self {
        Self {
            serialized_state: serialized_state.into(),
            ..Self::default()
        }
    }

    pub fn with_elements(mut self, indices: impl IntoIterator<Item = u32>) -> Self {
        self.element_indices.extend(indices);
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_visual(mut self, visual: impl Into<String>) -> Self {
        self.visual_snapshot = Some(visual.into());
        self
    }

    pub fn has_element(&self, index: u32) -> bool {
        self.element_indices.contains(&index)
    }

    /// Visual snapshot with any `data:image/png;base64,` prefix stripped.
    pub fn visual_base64(&self) -> Option<&str> {
        self.visual_snapshot
            .as_deref()
            .map(|s| s.strip_prefix("data:image/png;base64,").unwrap_or(s))
    }
}

#[async_trait]
pub trait PerceptionProvider: Send + Sync {
    async fn capture(
        &self,
        handle: &dyn AutomationHandle,
    ) -> Result<PerceptionSnapshot, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visual_prefix_stripped() {
        let snapshot = PerceptionSnapshot::new("state").with_visual("data:image/png;base64,AAAA");
        assert_eq!(snapshot.visual_base64(), Some("AAAA"));

        let raw = PerceptionSnapshot::new("state").with_visual("BBBB");
        assert_eq!(raw.visual_base64(), Some("BBBB"));
    }

    #[test]
    fn test_element_lookup() {
        let snapshot = PerceptionSnapshot::new("state").with_elements([1, 4]);
        assert!(snapshot.has_element(4));
        assert!(!snapshot.has_element(2));
    }
}
