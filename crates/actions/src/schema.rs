use crate::definition::ActionDefinition;
use serde_json::{json, Value};
use std::sync::Arc;

const ACTION_DESCRIPTION_HINT: &str =
    "Describe why you are performing this action and what you aim to perform with this action.";

/// Schema for one entry of the decision's `actions` array.
pub fn action_variant(definition: &dyn ActionDefinition) -> Value {
    json!({
        "type": "object",
        "description": definition.description(),
        "properties": {
            "type": {"type": "string", "enum": [definition.kind()]},
            "params": definition.params_schema(),
            "actionDescription": {"type": "string", "description": ACTION_DESCRIPTION_HINT}
        },
        "required": ["type", "params", "actionDescription"]
    })
}

/// Schema the reasoning provider must honor, one variant per active kind.
pub fn decision_schema(definitions: &[Arc<dyn ActionDefinition>]) -> Value {
    let variants: Vec<Value> = definitions
        .iter()
        .map(|definition| action_variant(definition.as_ref()))
        .collect();

    json!({
        "type": "object",
        "properties": {
            "thoughts": {
                "type": "string",
                "description": "Your reasoning about the current state and what to do next."
            },
            "nextGoal": {
                "type": "string",
                "description": "The immediate goal of the actions below."
            },
            "actions": {
                "type": "array",
                "items": {"anyOf": variants}
            }
        },
        "required": ["thoughts", "nextGoal", "actions"]
    })
}
