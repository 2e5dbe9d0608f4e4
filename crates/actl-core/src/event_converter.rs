// SPDX-License-Identifier: Apache-2.0
//!
//! Event Converter (C2): maps one runner event to zero-or-one A2A
//! `TaskStatusUpdateEvent`, classifying long-running tool calls into the
//! HITL pause states.

use actl_a2a::{data_part_type, meta_keys, A2aMessage, Role, TaskState, TaskStatus, TaskStatusUpdateEvent};
use chrono::Utc;
use serde_json::Value;

use crate::model_content::{ModelContent, ModelRole};
use crate::part_converter::{self, PartConvertError};

/// The literal long-running function-call name that escalates a pause state
/// to `AUTH_REQUIRED` rather than `INPUT_REQUIRED`.
pub const AUTH_REQUIRED_FUNCTION_NAME: &str = "request_euc";

#[derive(Debug, Clone)]
pub struct RunnerEvent {
    pub content: Option<ModelContent>,
    pub long_running_ids: Vec<String>,
    pub is_partial: bool,
}

impl RunnerEvent {
    pub fn empty() -> Self {
        Self {
            content: None,
            long_running_ids: Vec::new(),
            is_partial: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TaskIdentity {
    pub task_id: String,
    pub context_id: String,
}

#[derive(Debug, Clone)]
pub struct SessionTriple {
    pub app_name: String,
    pub user_id: String,
    pub session_id: String,
}

fn tag_kagent_metadata(event: &mut TaskStatusUpdateEvent, session: &SessionTriple) {
    event.metadata.insert(
        meta_keys::KAGENT_APP_NAME.to_string(),
        Value::String(session.app_name.clone()),
    );
    event.metadata.insert(
        meta_keys::KAGENT_USER_ID.to_string(),
        Value::String(session.user_id.clone()),
    );
    event.metadata.insert(
        meta_keys::KAGENT_SESSION_ID.to_string(),
        Value::String(session.session_id.clone()),
    );
}

/// Convert one runner event into zero or one A2A status update.
pub fn convert_event(
    event: &RunnerEvent,
    task: &TaskIdentity,
    session: &SessionTriple,
) -> Option<TaskStatusUpdateEvent> {
    let content = event.content.as_ref()?;
    if content.parts.is_empty() {
        return None;
    }

    let role = match content.role {
        ModelRole::Model => Role::Agent,
        ModelRole::User => Role::User,
    };

    let mut a2a_parts = Vec::new();
    for part in &content.parts {
        match part_converter::to_a2a(part) {
            Ok(mut a2a_part) => {
                if let Some(id) = a2a_part.function_call_id() {
                    if event.long_running_ids.iter().any(|lr| lr == id) {
                        a2a_part.mark_long_running();
                    }
                }
                a2a_parts.push(a2a_part);
            }
            Err(PartConvertError::UnsupportedPart) => continue,
        }
    }
    if a2a_parts.is_empty() {
        return None;
    }

    let state = select_state(&a2a_parts);

    let message = A2aMessage::new(role, a2a_parts);
    let mut update = TaskStatusUpdateEvent {
        task_id: task.task_id.clone(),
        context_id: task.context_id.clone(),
        status: TaskStatus {
            state,
            message: Some(message),
            timestamp: Utc::now(),
        },
        is_final: false,
        metadata: actl_a2a::Metadata::new(),
    };
    if event.is_partial {
        update.metadata.insert(meta_keys::IS_PARTIAL.to_string(), Value::Bool(true));
    }
    tag_kagent_metadata(&mut update, session);
    Some(update)
}

fn select_state(parts: &[actl_a2a::Part]) -> TaskState {
    let mut any_long_running = false;
    for part in parts {
        if !part.is_long_running() {
            continue;
        }
        if part.data_part_type() == Some(data_part_type::FUNCTION_CALL)
            && part.function_call_name() == Some(AUTH_REQUIRED_FUNCTION_NAME)
        {
            return TaskState::AuthRequired;
        }
        any_long_running = true;
    }
    if any_long_running {
        TaskState::InputRequired
    } else {
        TaskState::Working
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
