//! Reasoning request assembly.

use crate::error::RuntimeError;
use serde_json::json;
use waypoint_core::{AgentStep, Message, PerceptionSnapshot, ReasoningRequest, Role, Variable};

const SYSTEM_INSTRUCTIONS: &str = "You are an agent that completes tasks by interacting with a user interface.
Work towards the final goal in small steps using only the provided actions.

# Input
Each turn you receive the task, the current location, the interactive elements of the
surface (each prefixed with a numeric index) and, when available, a screenshot.
Previous turns show the actions you chose and their results.

# Output
Respond with your thoughts, the next goal, and an ordered list of actions.
- Actions are executed in the given order.
- Do not chain actions after one that changes the page entirely; you will see the new state next turn.
- Address elements only by the indices shown in the current state.
- Refer to variables as <<key>>; their values are filled in when the action runs.

# Completion
Only use the \"complete\" action once every part of the task is done, and make it the
last action in the list. Put the full result in its parameters.";

fn system_message() -> Message {
    let today = chrono::Local::now().format("%A, %m/%d/%Y");
    Message::new(
        Role::System,
        json!(format!(
            "{}\n\n# World State\nThe current date is {}.",
            SYSTEM_INSTRUCTIONS, today
        )),
    )
}

fn step_messages(step: &AgentStep) -> Result<[Message; 2], RuntimeError> {
    let decision = serde_json::to_string(&step.decision)?;
    let results: Vec<String> = step
        .decision
        .actions
        .iter()
        .zip(&step.action_outputs)
        .enumerate()
        .map(|(i, (action, output))| {
            let outcome = if output.success { "ok" } else { "failed" };
            format!("{}. {} [{}]: {}", i + 1, action.kind, outcome, output.message)
        })
        .collect();

    Ok([
        Message::new(Role::Assistant, json!(decision)),
        Message::new(
            Role::User,
            json!(format!("Action results for step {}:\n{}", step.idx, results.join("\n"))),
        ),
    ])
}

fn state_message(task: &str, perception: &PerceptionSnapshot, variables: &[Variable]) -> Message {
    let mut text = format!("# Task\n{}\n\n", task);
    if let Some(location) = &perception.location {
        text.push_str(&format!("# Current location\n{}\n\n", location));
    }
    text.push_str(&format!(
        "# Interactive elements\n{}\n",
        perception.serialized_state
    ));
    if !variables.is_empty() {
        text.push_str("\n# Variables\n");
        for variable in variables {
            if variable.description.is_empty() {
                text.push_str(&format!("- <<{}>>\n", variable.key));
            } else {
                text.push_str(&format!("- <<{}>>: {}\n", variable.key, variable.description));
            }
        }
    }

    match perception.visual_base64() {
        Some(image) => Message::new(
            Role::User,
            json!([
                {"type": "text", "text": text},
                {"type": "image_url", "image_url": {"url": format!("data:image/png;base64,{}", image)}}
            ]),
        ),
        None => Message::new(Role::User, json!(text)),
    }
}

/// Build one reasoning request: instructions, full step history, then the current state.
///
/// Only variable keys and descriptions are sent, never their values.
pub fn build_request(
    task: &str,
    history: &[AgentStep],
    perception: &PerceptionSnapshot,
    variables: &[Variable],
    schema: serde_json::Value,
) -> Result<ReasoningRequest, RuntimeError> {
    let mut messages = Vec::with_capacity(2 + history.len() * 2);
    messages.push(system_message());
    for step in history {
        messages.extend(step_messages(step)?);
    }
    messages.push(state_message(task, perception, variables));

    Ok(ReasoningRequest { messages, schema })
}
