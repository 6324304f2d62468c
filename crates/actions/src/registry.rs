use crate::builtin::complete::{CompleteAction, StructuredCompleteAction};
use crate::definition::ActionDefinition;
use crate::error::RegistryError;
use crate::schema;
use std::collections::HashMap;
use std::sync::Arc;
use waypoint_core::{ProposedAction, COMPLETE_ACTION};

/// Which `complete` action a task exposes.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CompletionVariant {
    /// `{text}`; the text becomes the task output.
    #[default]
    Text,
    /// `{output}` constrained by a caller schema; the JSON becomes the task output.
    Structured(serde_json::Value),
}

impl CompletionVariant {
    pub fn from_output_schema(schema: Option<serde_json::Value>) -> Self {
        match schema {
            Some(schema) => CompletionVariant::Structured(schema),
            None => CompletionVariant::Text,
        }
    }
}

/// Ordered set of action definitions keyed by kind.
#[derive(Clone, Default)]
pub struct ActionRegistry {
    actions: Vec<Arc<dyn ActionDefinition>>,
    index: HashMap<String, usize>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        action: Arc<dyn ActionDefinition>,
    ) -> Result<&mut Self, RegistryError> {
        let kind = action.kind().to_string();
        if kind == COMPLETE_ACTION {
            return Err(RegistryError::Reserved(kind));
        }
        if self.index.contains_key(&kind) {
            return Err(RegistryError::Duplicate(kind));
        }
        self.insert(kind, action);
        Ok(self)
    }

    fn insert(&mut self, kind: String, action: Arc<dyn ActionDefinition>) {
        match self.index.get(&kind) {
            Some(&position) => self.actions[position] = action,
            None => {
                self.index.insert(kind, self.actions.len());
                self.actions.push(action);
            }
        }
    }

    pub fn resolve(&self, kind: &str) -> Result<Arc<dyn ActionDefinition>, RegistryError> {
        self.get(kind)
            .ok_or_else(|| RegistryError::NotFound(kind.to_string()))
    }

    pub fn get(&self, kind: &str) -> Option<Arc<dyn ActionDefinition>> {
        self.index.get(kind).map(|&i| self.actions[i].clone())
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.index.contains_key(kind)
    }

    /// Kinds in registration order.
    pub fn kinds(&self) -> Vec<String> {
        self.actions.iter().map(|a| a.kind().to_string()).collect()
    }

    pub fn count(&self) -> usize {
        self.actions.len()
    }

    pub fn definitions(&self) -> &[Arc<dyn ActionDefinition>] {
        &self.actions
    }

    /// Copy of this registry with the given `complete` variant installed.
    pub fn with_completion(&self, variant: &CompletionVariant) -> ActionRegistry {
        let complete: Arc<dyn ActionDefinition> = match variant {
            CompletionVariant::Text => Arc::new(CompleteAction),
            CompletionVariant::Structured(schema) => {
                Arc::new(StructuredCompleteAction::new(schema.clone()))
            }
        };
        let mut registry = self.clone();
        registry.insert(COMPLETE_ACTION.to_string(), complete);
        registry
    }

    pub fn decision_schema(&self) -> serde_json::Value {
        schema::decision_schema(&self.actions)
    }

    pub fn pprint(&self, action: &ProposedAction) -> Option<String> {
        self.get(&action.kind)
            .and_then(|definition| definition.pprint(&action.params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::{ClickElementAction, GoToUrlAction};
    use serde_json::json;

    #[test]
    fn test_register_preserves_order() {
        let mut registry = ActionRegistry::new();
        registry
            .register(Arc::new(GoToUrlAction))
            .unwrap()
            .register(Arc::new(ClickElementAction))
            .unwrap();
        assert_eq!(registry.kinds(), vec!["goToUrl", "clickElement"]);
    }

    #[test]
    fn test_completion_replaces_previous_variant() {
        let registry = ActionRegistry::new();
        let text = registry.with_completion(&CompletionVariant::Text);
        let structured = text.with_completion(&CompletionVariant::Structured(json!({"type": "object"})));
        assert_eq!(structured.count(), 1);
        assert_eq!(registry.count(), 0);
        let params = structured.resolve(COMPLETE_ACTION).unwrap().params_schema();
        assert!(params["properties"].get("output").is_some());
    }

    #[test]
    fn test_schema_enumerates_active_kinds() {
        let mut registry = ActionRegistry::new();
        registry.register(Arc::new(GoToUrlAction)).unwrap();
        let active = registry.with_completion(&CompletionVariant::Text);
        let schema = active.decision_schema();
        let variants = schema["properties"]["actions"]["items"]["anyOf"]
            .as_array()
            .unwrap();
        let kinds: Vec<&str> = variants
            .iter()
            .map(|v| v["properties"]["type"]["enum"][0].as_str().unwrap())
            .collect();
        assert_eq!(kinds, vec!["goToUrl", "complete"]);
    }
}
