// SPDX-License-Identifier: Apache-2.0
//!
//! Error Classifier (C4): best-effort, case-insensitive substring match from
//! a raw error message to a closed error code plus a templated user-facing
//! message. Never fails — anything unmatched becomes `RUNNER_ERROR`.

use actl_a2a::{A2aMessage, Part, Role, TaskState, TaskStatus, TaskStatusUpdateEvent};
use chrono::Utc;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    McpConnectionError,
    McpDnsError,
    McpConnectionRefused,
    RunnerError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::McpConnectionError => "MCP_CONNECTION_ERROR",
            ErrorCode::McpDnsError => "MCP_DNS_ERROR",
            ErrorCode::McpConnectionRefused => "MCP_CONNECTION_REFUSED",
            ErrorCode::RunnerError => "RUNNER_ERROR",
        }
    }
}

const MCP_CONNECTION_ERROR_SUBSTRINGS: &[&str] = &[
    "failed to extract tools",
    "failed to get mcp session",
    "failed to init mcp session",
    "connection failed",
    "context deadline exceeded",
    "client.timeout exceeded",
];

const MCP_DNS_ERROR_SUBSTRINGS: &[&str] = &["name or service not known", "no such host", "dns"];

const MCP_CONNECTION_REFUSED_SUBSTRINGS: &[&str] =
    &["connection refused", "connect: connection refused", "econnrefused"];

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

/// Classify a raw error message into a code and a templated user-facing
/// message that includes the original text.
pub fn classify(raw_message: &str) -> (ErrorCode, String) {
    let lower = raw_message.to_lowercase();
    let code = if contains_any(&lower, MCP_CONNECTION_ERROR_SUBSTRINGS) {
        ErrorCode::McpConnectionError
    } else if contains_any(&lower, MCP_DNS_ERROR_SUBSTRINGS) {
        ErrorCode::McpDnsError
    } else if contains_any(&lower, MCP_CONNECTION_REFUSED_SUBSTRINGS) {
        ErrorCode::McpConnectionRefused
    } else {
        ErrorCode::RunnerError
    };

    let message = match code {
        ErrorCode::McpConnectionError => {
            format!("Could not reach an MCP tool server: {raw_message}")
        }
        ErrorCode::McpDnsError => format!("Could not resolve an MCP tool server's address: {raw_message}"),
        ErrorCode::McpConnectionRefused => {
            format!("An MCP tool server refused the connection: {raw_message}")
        }
        ErrorCode::RunnerError => format!("The agent runner reported an error: {raw_message}"),
    };

    (code, message)
}

/// Build a terminal `FAILED` event from a raw runner-stream error, tagging
/// the classified error code in metadata.
pub fn build_failed_event(task_id: &str, context_id: &str, raw_message: &str) -> TaskStatusUpdateEvent {
    let (code, message) = classify(raw_message);
    let mut metadata = actl_a2a::Metadata::new();
    metadata.insert(
        actl_a2a::meta_keys::KAGENT_ERROR_CODE.to_string(),
        serde_json::Value::String(code.as_str().to_string()),
    );
    TaskStatusUpdateEvent {
        task_id: task_id.to_string(),
        context_id: context_id.to_string(),
        status: TaskStatus {
            state: TaskState::Failed,
            message: Some(A2aMessage::new(Role::Agent, vec![Part::text(message)])),
            timestamp: Utc::now(),
        },
        is_final: false,
        metadata,
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_mcp_connection_error() {
        let (code, _) = classify("failed to extract tools from server");
        assert_eq!(code, ErrorCode::McpConnectionError);
    }

    #[test]
    fn classifies_case_insensitively() {
        let (code, _) = classify("CONNECTION FAILED while dialing");
        assert_eq!(code, ErrorCode::McpConnectionError);
    }

    #[test]
    fn classifies_dns_error() {
        let (code, _) = classify("dial tcp: lookup mcp.local: no such host");
        assert_eq!(code, ErrorCode::McpDnsError);
    }

    #[test]
    fn classifies_connection_refused() {
        let (code, _) = classify("dial tcp 127.0.0.1:9000: connect: connection refused");
        assert_eq!(code, ErrorCode::McpConnectionRefused);
    }

    #[test]
    fn unmatched_message_is_runner_error() {
        let (code, _) = classify("the model returned an invalid function call");
        assert_eq!(code, ErrorCode::RunnerError);
    }

    #[test]
    fn message_includes_original_text() {
        let (_, message) = classify("boom");
        assert!(message.contains("boom"));
    }

    #[test]
    fn connection_error_precedes_dns_when_both_could_match() {
        // "context deadline exceeded" contains no DNS substrings, this just
        // asserts row-ordering for the ambiguous case where a message could
        // plausibly mention both failure kinds.
        let (code, _) = classify("connection failed: context deadline exceeded, dns lookup pending");
        assert_eq!(code, ErrorCode::McpConnectionError);
    }

    #[test]
    fn failed_event_tags_error_code_metadata() {
        let event = build_failed_event("t", "c", "connection refused");
        assert_eq!(event.status.state, TaskState::Failed);
        assert_eq!(
            event.metadata.get(actl_a2a::meta_keys::KAGENT_ERROR_CODE),
            Some(&serde_json::Value::String("MCP_CONNECTION_REFUSED".to_string()))
        );
    }
}
