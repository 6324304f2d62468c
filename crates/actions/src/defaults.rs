use crate::builtin::*;
use crate::definition::ActionDefinition;
use crate::registry::ActionRegistry;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Optional surface capabilities that unlock extra built-in actions.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Capabilities {
    pub document_reader: bool,
}

fn builtin_actions(capabilities: &Capabilities) -> Vec<Arc<dyn ActionDefinition>> {
    let mut actions: Vec<Arc<dyn ActionDefinition>> = vec![
        Arc::new(GoToUrlAction),
        Arc::new(PageBackAction),
        Arc::new(PageForwardAction),
        Arc::new(RefreshPageAction),
        Arc::new(ClickElementAction),
        Arc::new(SelectOptionAction),
        Arc::new(ScrollAction),
        Arc::new(InputTextAction),
        Arc::new(KeyPressAction),
    ];
    if capabilities.document_reader {
        actions.push(Arc::new(ReadDocumentAction));
    }
    actions
}

/// Registry seeded with the built-in action set.
pub fn default_registry(capabilities: &Capabilities) -> ActionRegistry {
    let mut registry = ActionRegistry::new();
    for action in builtin_actions(capabilities) {
        // Built-in kinds are distinct and never "complete".
        if let Err(e) = registry.register(action) {
            debug!("Skipping built-in action: {}", e);
        }
    }
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_set() {
        let registry = default_registry(&Capabilities::default());
        assert_eq!(registry.count(), 9);
        assert!(!registry.contains("readDocument"));
        assert!(!registry.contains("complete"));
    }

    #[test]
    fn test_document_reader_gated() {
        let registry = default_registry(&Capabilities {
            document_reader: true,
        });
        assert_eq!(registry.count(), 10);
        assert!(registry.contains("readDocument"));
    }
}
