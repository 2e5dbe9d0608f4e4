// SPDX-License-Identifier: Apache-2.0
//!
//! HITL Handler (C5): builds the human-in-the-loop approval prompt for
//! pending tool calls, and extracts the human's decision from their reply.

use actl_a2a::{meta_keys, A2aMessage, Metadata, Part, Role, TaskState, TaskStatus, TaskStatusUpdateEvent};
use chrono::Utc;
use serde_json::{json, Value};

use crate::event_converter::TaskIdentity;

#[derive(Debug, Clone)]
pub struct ActionRequest {
    pub name: String,
    pub args: Value,
    pub id: Option<String>,
}

fn escape_backticks(s: &str) -> String {
    s.replace('`', "\\`")
}

fn render_action_markdown(action: &ActionRequest) -> String {
    let mut lines = vec![format!("**Tool:** `{}`", escape_backticks(&action.name))];
    if let Some(obj) = action.args.as_object() {
        if !obj.is_empty() {
            lines.push("**Arguments:**".to_string());
            for (key, value) in obj {
                let rendered_value = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                lines.push(format!(
                    "- `{}`: `{}`",
                    escape_backticks(key),
                    escape_backticks(&rendered_value)
                ));
            }
        }
    }
    lines.join("\n")
}

/// Build a non-final `INPUT_REQUIRED` event describing `actions` awaiting
/// approval.
pub fn handle_tool_approval(actions: &[ActionRequest], task: &TaskIdentity, app_name: &str) -> TaskStatusUpdateEvent {
    let mut parts: Vec<Part> = actions.iter().map(|a| Part::text(render_action_markdown(a))).collect();

    let action_requests: Vec<Value> = actions
        .iter()
        .map(|a| {
            let mut obj = serde_json::Map::new();
            obj.insert("name".to_string(), Value::String(a.name.clone()));
            obj.insert("args".to_string(), a.args.clone());
            if let Some(id) = &a.id {
                obj.insert("id".to_string(), Value::String(id.clone()));
            }
            Value::Object(obj)
        })
        .collect();

    let mut data = serde_json::Map::new();
    data.insert(
        meta_keys::INTERRUPT_TYPE.to_string(),
        Value::String("tool_approval".to_string()),
    );
    data.insert("action_requests".to_string(), Value::Array(action_requests));
    let mut data_metadata = Metadata::new();
    data_metadata.insert(
        meta_keys::INTERRUPT_TYPE.to_string(),
        Value::String("tool_approval".to_string()),
    );
    parts.push(Part::Data {
        data: Value::Object(data),
        metadata: data_metadata,
    });

    let mut metadata = Metadata::new();
    metadata.insert(
        meta_keys::INTERRUPT_TYPE.to_string(),
        Value::String("tool_approval".to_string()),
    );
    metadata.insert(meta_keys::APP_NAME.to_string(), Value::String(app_name.to_string()));

    TaskStatusUpdateEvent {
        task_id: task.task_id.clone(),
        context_id: task.context_id.clone(),
        status: TaskStatus {
            state: TaskState::InputRequired,
            message: Some(A2aMessage::new(Role::Agent, parts)),
            timestamp: Utc::now(),
        },
        is_final: false,
        metadata,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Deny,
    Reject,
    None,
}

const DENY_KEYWORDS: &[&str] = &["denied", "deny", "reject", "no", "cancel", "stop"];
const APPROVE_KEYWORDS: &[&str] = &["approved", "approve", "proceed", "yes", "continue"];

fn decision_from_type(data_part_type: &str) -> Option<Decision> {
    match data_part_type {
        "approve" => Some(Decision::Approve),
        "deny" => Some(Decision::Deny),
        "reject" => Some(Decision::Reject),
        _ => None,
    }
}

/// Extract the human's decision from their reply to a [`handle_tool_approval`]
/// prompt.
pub fn extract_decision(message: &A2aMessage) -> Decision {
    for part in &message.parts {
        if let Part::Data { metadata, .. } = part {
            if let Some(dt) = metadata.get(meta_keys::DECISION_TYPE).and_then(Value::as_str) {
                if let Some(decision) = decision_from_type(dt) {
                    return decision;
                }
            }
        }
    }

    for part in &message.parts {
        if let Some(text) = part.as_text() {
            let lower = text.to_lowercase();
            if DENY_KEYWORDS.iter().any(|k| lower.contains(k)) {
                return Decision::Deny;
            }
        }
    }

    for part in &message.parts {
        if let Some(text) = part.as_text() {
            let lower = text.to_lowercase();
            if APPROVE_KEYWORDS.iter().any(|k| lower.contains(k)) {
                return Decision::Approve;
            }
        }
    }

    Decision::None
}

// ─── Unit tests ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn task() -> TaskIdentity {
        TaskIdentity {
            task_id: "t1".into(),
            context_id: "c1".into(),
        }
    }

    #[test]
    fn handle_tool_approval_produces_input_required() {
        let actions = vec![ActionRequest {
            name: "delete_file".into(),
            args: json!({"path": "/tmp/x"}),
            id: Some("fc1".into()),
        }];
        let event = handle_tool_approval(&actions, &task(), "myapp");
        assert_eq!(event.status.state, TaskState::InputRequired);
        assert!(!event.is_final);
    }

    #[test]
    fn handle_tool_approval_escapes_backticks_in_markdown() {
        let actions = vec![ActionRequest {
            name: "run`cmd".into(),
            args: json!({"arg": "a`b"}),
            id: None,
        }];
        let event = handle_tool_approval(&actions, &task(), "myapp");
        let text = event.status.message.unwrap().parts[0].as_text().unwrap().to_string();
        assert!(text.contains("run\\`cmd"));
        assert!(text.contains("a\\`b"));
    }

    #[test]
    fn handle_tool_approval_includes_structured_data_part() {
        let actions = vec![ActionRequest {
            name: "t".into(),
            args: json!({}),
            id: Some("fc1".into()),
        }];
        let event = handle_tool_approval(&actions, &task(), "myapp");
        let message = event.status.message.unwrap();
        let data_part = message.parts.iter().find(|p| matches!(p, Part::Data { .. })).unwrap();
        if let Part::Data { data, .. } = data_part {
            assert_eq!(data["interrupt_type"], json!("tool_approval"));
            assert_eq!(data["action_requests"][0]["name"], json!("t"));
        } else {
            panic!("expected data part");
        }
    }

    #[test]
    fn empty_message_has_no_decision() {
        let message = A2aMessage::new(Role::User, vec![]);
        assert_eq!(extract_decision(&message), Decision::None);
    }

    #[test]
    fn data_part_decision_type_wins_over_text() {
        let mut metadata = Metadata::new();
        metadata.insert(meta_keys::DECISION_TYPE.to_string(), Value::String("approve".into()));
        let message = A2aMessage::new(
            Role::User,
            vec![
                Part::text("I deny this"),
                Part::Data {
                    data: json!({}),
                    metadata,
                },
            ],
        );
        assert_eq!(extract_decision(&message), Decision::Approve);
    }

    #[test]
    fn deny_keyword_beats_approve_keyword_across_whole_message() {
        let message = A2aMessage::new(Role::User, vec![Part::text("no, I approve nothing")]);
        assert_eq!(extract_decision(&message), Decision::Deny);
    }

    #[test]
    fn approve_keyword_without_deny_keyword_approves() {
        let message = A2aMessage::new(Role::User, vec![Part::text("yes, proceed please")]);
        assert_eq!(extract_decision(&message), Decision::Approve);
    }

    #[test]
    fn text_with_neither_keyword_list_has_no_decision() {
        let message = A2aMessage::new(Role::User, vec![Part::text("what does this tool do?")]);
        assert_eq!(extract_decision(&message), Decision::None);
    }
}
