// SPDX-License-Identifier: Apache-2.0
//!
//! `actl-a2a` — wire types for the Agent-to-Agent (A2A) request/response protocol.
//!
//! # Shape
//!
//! ```text
//! A2aMessage { role, parts: [Part], metadata }
//!         │
//!         ▼  (per runner event)
//! A2aEvent::Status(TaskStatusUpdateEvent { task_id, context_id, status, final, metadata })
//! A2aEvent::Artifact(TaskArtifactUpdateEvent { task_id, context_id, artifact, last_chunk })
//! ```
//!
//! Metadata on every part/event is an open `map<string, any>` (modeled as a
//! `serde_json::Map`); [`meta_keys`] and [`data_part_type`] hold the closed
//! set of keys this system reads and writes. The wire format stays open for
//! forward compatibility even though every producer in this crate only ever
//! emits the documented keys.

pub mod meta_keys {
    pub const TYPE: &str = "type";
    pub const IS_LONG_RUNNING: &str = "is_long_running";
    pub const KAGENT_APP_NAME: &str = "kagent_app_name";
    pub const KAGENT_USER_ID: &str = "kagent_user_id";
    pub const KAGENT_SESSION_ID: &str = "kagent_session_id";
    pub const KAGENT_ERROR_CODE: &str = "kagent_error_code";
    pub const KAGENT_INVOCATION_ID: &str = "kagent_invocation_id";
    pub const KAGENT_AUTHOR: &str = "kagent_author";
    pub const INTERRUPT_TYPE: &str = "interrupt_type";
    pub const APP_NAME: &str = "app_name";
    pub const IS_PARTIAL: &str = "is_partial";
    pub const DECISION_TYPE: &str = "decision_type";
}

pub mod data_part_type {
    pub const FUNCTION_CALL: &str = "function_call";
    pub const FUNCTION_RESPONSE: &str = "function_response";
    pub const CODE_EXECUTION_RESULT: &str = "code_execution_result";
    pub const EXECUTABLE_CODE: &str = "executable_code";
}

use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Open key/value bag carried on parts and events.
pub type Metadata = serde_json::Map<String, Value>;

// ── Role / Part ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Agent,
}

/// Either a remote URI or inline base64 bytes, mirroring the A2A `FilePart`
/// union. `mime_type` is optional in both variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FileContent {
    Uri {
        uri: String,
        mime_type: Option<String>,
    },
    Bytes {
        /// base64-encoded payload.
        bytes: String,
        mime_type: Option<String>,
    },
}

/// A single typed message fragment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "part_type", rename_all = "snake_case")]
pub enum Part {
    Text {
        text: String,
        #[serde(default)]
        metadata: Metadata,
    },
    File {
        file: FileContent,
        #[serde(default)]
        metadata: Metadata,
    },
    Data {
        data: Value,
        #[serde(default)]
        metadata: Metadata,
    },
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text {
            text: text.into(),
            metadata: Metadata::new(),
        }
    }

    pub fn file_uri(uri: impl Into<String>, mime_type: Option<String>) -> Self {
        Part::File {
            file: FileContent::Uri {
                uri: uri.into(),
                mime_type,
            },
            metadata: Metadata::new(),
        }
    }

    /// Base64-encode raw bytes into an inline file part.
    pub fn file_bytes(bytes: &[u8], mime_type: Option<String>) -> Self {
        Part::File {
            file: FileContent::Bytes {
                bytes: base64::engine::general_purpose::STANDARD.encode(bytes),
                mime_type,
            },
            metadata: Metadata::new(),
        }
    }

    pub fn function_call(name: impl Into<String>, args: Value, id: Option<String>) -> Self {
        let mut metadata = Metadata::new();
        metadata.insert(
            meta_keys::TYPE.to_string(),
            Value::String(data_part_type::FUNCTION_CALL.to_string()),
        );
        let mut data = serde_json::Map::new();
        data.insert("name".to_string(), Value::String(name.into()));
        data.insert("args".to_string(), args);
        if let Some(id) = id {
            data.insert("id".to_string(), Value::String(id));
        }
        Part::Data {
            data: Value::Object(data),
            metadata,
        }
    }

    pub fn function_response(name: impl Into<String>, response: Value) -> Self {
        let mut metadata = Metadata::new();
        metadata.insert(
            meta_keys::TYPE.to_string(),
            Value::String(data_part_type::FUNCTION_RESPONSE.to_string()),
        );
        let mut data = serde_json::Map::new();
        data.insert("name".to_string(), Value::String(name.into()));
        data.insert("response".to_string(), response);
        Part::Data {
            data: Value::Object(data),
            metadata,
        }
    }

    pub fn code_execution_result(payload: Value) -> Self {
        let mut metadata = Metadata::new();
        metadata.insert(
            meta_keys::TYPE.to_string(),
            Value::String(data_part_type::CODE_EXECUTION_RESULT.to_string()),
        );
        Part::Data {
            data: payload,
            metadata,
        }
    }

    pub fn executable_code(payload: Value) -> Self {
        let mut metadata = Metadata::new();
        metadata.insert(
            meta_keys::TYPE.to_string(),
            Value::String(data_part_type::EXECUTABLE_CODE.to_string()),
        );
        Part::Data {
            data: payload,
            metadata,
        }
    }

    pub fn metadata(&self) -> &Metadata {
        match self {
            Part::Text { metadata, .. } => metadata,
            Part::File { metadata, .. } => metadata,
            Part::Data { metadata, .. } => metadata,
        }
    }

    pub fn metadata_mut(&mut self) -> &mut Metadata {
        match self {
            Part::Text { metadata, .. } => metadata,
            Part::File { metadata, .. } => metadata,
            Part::Data { metadata, .. } => metadata,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Part::Text { text, .. } => Some(text.as_str()),
            _ => None,
        }
    }

    /// `type` metadata value, if this is a data-part.
    pub fn data_part_type(&self) -> Option<&str> {
        self.metadata()
            .get(meta_keys::TYPE)
            .and_then(Value::as_str)
    }

    pub fn mark_long_running(&mut self) {
        self.metadata_mut().insert(
            meta_keys::IS_LONG_RUNNING.to_string(),
            Value::Bool(true),
        );
    }

    pub fn is_long_running(&self) -> bool {
        self.metadata()
            .get(meta_keys::IS_LONG_RUNNING)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// The function-call id carried by this part, if it is a `function_call`
    /// data-part and the call included one.
    pub fn function_call_id(&self) -> Option<&str> {
        if self.data_part_type() != Some(data_part_type::FUNCTION_CALL) {
            return None;
        }
        match self {
            Part::Data { data, .. } => data.get("id").and_then(Value::as_str),
            _ => None,
        }
    }

    /// The function-call name carried by this part, if any.
    pub fn function_call_name(&self) -> Option<&str> {
        if self.data_part_type() != Some(data_part_type::FUNCTION_CALL) {
            return None;
        }
        match self {
            Part::Data { data, .. } => data.get("name").and_then(Value::as_str),
            _ => None,
        }
    }
}

// ── Message ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct A2aMessage {
    pub role: Role,
    pub parts: Vec<Part>,
    #[serde(default)]
    pub metadata: Metadata,
}

impl A2aMessage {
    pub fn new(role: Role, parts: Vec<Part>) -> Self {
        Self {
            role,
            parts,
            metadata: Metadata::new(),
        }
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// The concatenation of all text parts, in order; `None` if there are none.
    pub fn text(&self) -> Option<String> {
        let joined: Vec<&str> = self.parts.iter().filter_map(Part::as_text).collect();
        if joined.is_empty() {
            None
        } else {
            Some(joined.join(""))
        }
    }

    /// First non-empty text part, if any.
    pub fn first_nonempty_text(&self) -> Option<&str> {
        self.parts
            .iter()
            .filter_map(Part::as_text)
            .find(|t| !t.is_empty())
    }
}

// ── Task state & events ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    Submitted,
    Working,
    Completed,
    Failed,
    Canceled,
    InputRequired,
    AuthRequired,
}

impl TaskState {
    /// A task in one of these states will not transition further.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskState::Completed
                | TaskState::Failed
                | TaskState::Canceled
                | TaskState::InputRequired
                | TaskState::AuthRequired
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskStatus {
    pub state: TaskState,
    pub message: Option<A2aMessage>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskStatusUpdateEvent {
    pub task_id: String,
    pub context_id: String,
    pub status: TaskStatus,
    #[serde(rename = "final")]
    pub is_final: bool,
    #[serde(default)]
    pub metadata: Metadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artifact {
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskArtifactUpdateEvent {
    pub task_id: String,
    pub context_id: String,
    pub artifact: Artifact,
    pub last_chunk: bool,
}

/// Anything the executor writes to the caller's output queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum A2aEvent {
    Status(TaskStatusUpdateEvent),
    Artifact(TaskArtifactUpdateEvent),
}

impl A2aEvent {
    pub fn is_final(&self) -> bool {
        match self {
            A2aEvent::Status(e) => e.is_final,
            A2aEvent::Artifact(_) => false,
        }
    }

    pub fn status(&self) -> Option<&TaskStatusUpdateEvent> {
        match self {
            A2aEvent::Status(e) => Some(e),
            A2aEvent::Artifact(_) => None,
        }
    }
}

/// Transient per-request task state, owned by the executor (never persisted
/// directly — the A2A events derived from it are what the Store retains).
#[derive(Debug, Clone)]
pub struct Task {
    pub task_id: String,
    pub context_id: String,
    pub state: TaskState,
    pub accumulated_parts: Vec<Part>,
    pub is_final: bool,
}

impl Task {
    pub fn new(task_id: impl Into<String>, context_id: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            context_id: context_id.into(),
            state: TaskState::Submitted,
            accumulated_parts: Vec::new(),
            is_final: false,
        }
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ── Part constructors ────────────────────────────────────────────────────

    #[test]
    fn text_part_round_trips_through_json() {
        let p = Part::text("hello");
        let json = serde_json::to_string(&p).unwrap();
        let back: Part = serde_json::from_str(&json).unwrap();
        assert_eq!(back.as_text(), Some("hello"));
    }

    #[test]
    fn file_bytes_encodes_base64_and_decodes_back() {
        let p = Part::file_bytes(b"abc", Some("text/plain".into()));
        if let Part::File {
            file: FileContent::Bytes { bytes, .. },
            ..
        } = &p
        {
            let decoded = base64::engine::general_purpose::STANDARD
                .decode(bytes)
                .unwrap();
            assert_eq!(decoded, b"abc");
        } else {
            panic!("expected File/Bytes variant");
        }
    }

    #[test]
    fn function_call_sets_type_metadata() {
        let p = Part::function_call("get_weather", json!({"city": "NYC"}), Some("fc1".into()));
        assert_eq!(p.data_part_type(), Some(data_part_type::FUNCTION_CALL));
        assert_eq!(p.function_call_name(), Some("get_weather"));
        assert_eq!(p.function_call_id(), Some("fc1"));
    }

    #[test]
    fn function_call_without_id_has_no_id() {
        let p = Part::function_call("f", json!({}), None);
        assert_eq!(p.function_call_id(), None);
    }

    #[test]
    fn function_response_sets_type_metadata() {
        let p = Part::function_response("f", json!({"result": 1}));
        assert_eq!(p.data_part_type(), Some(data_part_type::FUNCTION_RESPONSE));
    }

    #[test]
    fn mark_long_running_sets_flag() {
        let mut p = Part::function_call("f", json!({}), Some("id".into()));
        assert!(!p.is_long_running());
        p.mark_long_running();
        assert!(p.is_long_running());
    }

    #[test]
    fn non_data_part_has_no_data_part_type() {
        let p = Part::text("hi");
        assert_eq!(p.data_part_type(), None);
    }

    // ── Message ───────────────────────────────────────────────────────────────

    #[test]
    fn message_text_joins_all_text_parts() {
        let m = A2aMessage::new(Role::User, vec![Part::text("a"), Part::text("b")]);
        assert_eq!(m.text(), Some("ab".to_string()));
    }

    #[test]
    fn message_text_none_when_no_text_parts() {
        let m = A2aMessage::new(Role::User, vec![Part::function_call("f", json!({}), None)]);
        assert_eq!(m.text(), None);
    }

    #[test]
    fn first_nonempty_text_skips_empty_parts() {
        let m = A2aMessage::new(
            Role::User,
            vec![Part::text(""), Part::text("second")],
        );
        assert_eq!(m.first_nonempty_text(), Some("second"));
    }

    // ── TaskState ─────────────────────────────────────────────────────────────

    #[test]
    fn working_and_submitted_are_not_terminal() {
        assert!(!TaskState::Working.is_terminal());
        assert!(!TaskState::Submitted.is_terminal());
    }

    #[test]
    fn completed_failed_canceled_are_terminal() {
        assert!(TaskState::Completed.is_terminal());
        assert!(TaskState::Failed.is_terminal());
        assert!(TaskState::Canceled.is_terminal());
    }

    #[test]
    fn input_required_and_auth_required_are_terminal() {
        // Per the executor's own final-flag decision (§9 design notes), these
        // states are reached only as the terminal per-request state even
        // though individual events carrying them may be non-final.
        assert!(TaskState::InputRequired.is_terminal());
        assert!(TaskState::AuthRequired.is_terminal());
    }

    #[test]
    fn task_state_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&TaskState::InputRequired).unwrap(),
            "\"input_required\""
        );
        assert_eq!(
            serde_json::to_string(&TaskState::AuthRequired).unwrap(),
            "\"auth_required\""
        );
    }

    // ── Events ────────────────────────────────────────────────────────────────

    #[test]
    fn status_event_final_flag_matches_is_final() {
        let ev = A2aEvent::Status(TaskStatusUpdateEvent {
            task_id: "t".into(),
            context_id: "c".into(),
            status: TaskStatus {
                state: TaskState::Completed,
                message: None,
                timestamp: Utc::now(),
            },
            is_final: true,
            metadata: Metadata::new(),
        });
        assert!(ev.is_final());
    }

    #[test]
    fn artifact_event_is_never_final() {
        let ev = A2aEvent::Artifact(TaskArtifactUpdateEvent {
            task_id: "t".into(),
            context_id: "c".into(),
            artifact: Artifact { parts: vec![] },
            last_chunk: true,
        });
        assert!(!ev.is_final());
    }

    #[test]
    fn status_field_serializes_as_final_not_is_final() {
        let ev = TaskStatusUpdateEvent {
            task_id: "t".into(),
            context_id: "c".into(),
            status: TaskStatus {
                state: TaskState::Working,
                message: None,
                timestamp: Utc::now(),
            },
            is_final: false,
            metadata: Metadata::new(),
        };
        let json = serde_json::to_value(&ev).unwrap();
        assert_eq!(json["final"], serde_json::json!(false));
    }

    #[test]
    fn new_task_starts_submitted_and_not_final() {
        let t = Task::new("t1", "c1");
        assert_eq!(t.state, TaskState::Submitted);
        assert!(!t.is_final);
        assert!(t.accumulated_parts.is_empty());
    }
}
