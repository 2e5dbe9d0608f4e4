// SPDX-License-Identifier: Apache-2.0
//!
//! Result Aggregator (C3): folds the per-event states of a single request
//! into the one final event (plus an optional preceding artifact) the
//! caller actually sees.

use actl_a2a::{
    A2aEvent, A2aMessage, Artifact, Metadata, Part, Role, TaskArtifactUpdateEvent, TaskState,
    TaskStatus, TaskStatusUpdateEvent,
};
use chrono::Utc;

const UNEXPECTED_END_MESSAGE: &str = "The agent finished execution unexpectedly without a final response.";

fn dominance_rank(state: TaskState) -> Option<u8> {
    match state {
        TaskState::Working => Some(0),
        TaskState::InputRequired => Some(1),
        TaskState::AuthRequired => Some(2),
        _ => None,
    }
}

/// Accumulates per-event states for one request. Call [`Self::observe`] for
/// every non-partial event the executor produces, then [`Self::finish`] once
/// the runner's stream ends.
#[derive(Debug, Clone)]
pub struct ResultAggregator {
    state: TaskState,
    accumulated: Vec<Part>,
    last_message: Option<A2aMessage>,
}

impl Default for ResultAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self {
            state: TaskState::Submitted,
            accumulated: Vec::new(),
            last_message: None,
        }
    }

    /// Fold in a `FAILED` status built by the Error Classifier (C4) for a
    /// runner-stream error item.
    pub fn observe_failure(&mut self, message: A2aMessage) {
        self.state = TaskState::Failed;
        self.last_message = Some(message);
    }

    pub fn observe(&mut self, event: &TaskStatusUpdateEvent) {
        if self.state == TaskState::Failed {
            return; // sticky
        }
        let incoming = event.status.state;
        if incoming == TaskState::Failed {
            self.state = TaskState::Failed;
            self.last_message = event.status.message.clone();
            return;
        }

        let Some(incoming_rank) = dominance_rank(incoming) else {
            return;
        };
        let current_rank = dominance_rank(self.state).unwrap_or(0);
        if incoming_rank >= current_rank {
            self.state = incoming;
        }

        if incoming == TaskState::Working {
            if let Some(message) = &event.status.message {
                self.accumulated.extend(message.parts.clone());
            }
        }
        if let Some(message) = &event.status.message {
            self.last_message = Some(message.clone());
        }
    }

    /// Apply the terminal rule and produce the final event the caller sees,
    /// optionally preceded by an artifact event.
    pub fn finish(self, task_id: &str, context_id: &str) -> (Option<A2aEvent>, A2aEvent) {
        match self.state {
            TaskState::Working | TaskState::Submitted if !self.accumulated.is_empty() => {
                let artifact = A2aEvent::Artifact(TaskArtifactUpdateEvent {
                    task_id: task_id.to_string(),
                    context_id: context_id.to_string(),
                    artifact: Artifact {
                        parts: self.accumulated,
                    },
                    last_chunk: true,
                });
                let completed = A2aEvent::Status(TaskStatusUpdateEvent {
                    task_id: task_id.to_string(),
                    context_id: context_id.to_string(),
                    status: TaskStatus {
                        state: TaskState::Completed,
                        message: None,
                        timestamp: Utc::now(),
                    },
                    is_final: true,
                    metadata: Metadata::new(),
                });
                (Some(artifact), completed)
            }
            TaskState::Working | TaskState::Submitted => {
                let message = A2aMessage::new(Role::Agent, vec![Part::text(UNEXPECTED_END_MESSAGE)]);
                let failed = A2aEvent::Status(TaskStatusUpdateEvent {
                    task_id: task_id.to_string(),
                    context_id: context_id.to_string(),
                    status: TaskStatus {
                        state: TaskState::Failed,
                        message: Some(message),
                        timestamp: Utc::now(),
                    },
                    is_final: true,
                    metadata: Metadata::new(),
                });
                (None, failed)
            }
            other => {
                let final_event = A2aEvent::Status(TaskStatusUpdateEvent {
                    task_id: task_id.to_string(),
                    context_id: context_id.to_string(),
                    status: TaskStatus {
                        state: other,
                        message: self.last_message,
                        timestamp: Utc::now(),
                    },
                    is_final: true,
                    metadata: Metadata::new(),
                });
                (None, final_event)
            }
        }
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
