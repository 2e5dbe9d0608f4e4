// SPDX-License-Identifier: Apache-2.0
//!
//! A2A Executor (C7): the per-request state machine. Drives the runner's
//! event stream, converting and aggregating as it goes, and writes every
//! event the caller observes to an output queue.

use std::sync::Arc;
use std::time::Duration;

use actl_a2a::{meta_keys, A2aEvent, A2aMessage, Metadata, Part, TaskState, TaskStatus, TaskStatusUpdateEvent};
use actl_core::{
    append_first_system_event, build_failed_event, convert_event, from_a2a, prepare_session, Runner,
    ResultAggregator, RunnerConfig, SessionTriple, TaskIdentity,
};
use actl_store::Store;
use chrono::Utc;
use futures::StreamExt;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

const UNCONVERTIBLE_MESSAGE: &str = "The incoming message could not be converted for the agent runner.";
const TIMEOUT_MESSAGE: &str = "The agent did not finish within the configured execution timeout.";

#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("request has no message")]
    MissingMessage,
    #[error("output queue closed")]
    QueueClosed,
}

/// Inputs for one request the executor drives to completion.
pub struct ExecutorRequest {
    pub message: Option<A2aMessage>,
    pub task_id: String,
    pub context_id: String,
    pub agent_id: String,
    /// Whether a task already existed for this (task_id, context_id) prior
    /// to this call — suppresses the initial `SUBMITTED` event when true.
    pub stored_task_exists: bool,
}

pub struct A2aExecutor {
    runner: Arc<dyn Runner>,
    store: Arc<dyn Store>,
    app_name: String,
    streaming: bool,
    execution_timeout: Duration,
}

impl A2aExecutor {
    pub fn new(runner: Arc<dyn Runner>, store: Arc<dyn Store>, app_name: impl Into<String>, streaming: bool, execution_timeout: Duration) -> Self {
        Self {
            runner,
            store,
            app_name: app_name.into(),
            streaming,
            execution_timeout,
        }
    }

    /// Drive `request` to completion, writing every A2A event to `queue`.
    /// `cancel` is the **outer** request context: when it fires, the
    /// per-iteration check returns early, but the runner's own stream keeps
    /// running undisturbed (detached cancellation).
    pub async fn execute(
        &self,
        request: ExecutorRequest,
        queue: mpsc::Sender<A2aEvent>,
        mut cancel: oneshot::Receiver<()>,
    ) -> Result<(), ExecutorError> {
        let message = request.message.ok_or(ExecutorError::MissingMessage)?;

        let user_id = format!("A2A_USER_{}", request.context_id);
        let session_id = request.context_id.clone();
        let task = TaskIdentity {
            task_id: request.task_id.clone(),
            context_id: request.context_id.clone(),
        };
        tracing::info!(task_id = %task.task_id, context_id = %task.context_id, "executor request started");

        if !request.stored_task_exists {
            self.send(&queue, A2aEvent::Status(status_event(&task, TaskState::Submitted, Some(message.clone()), false)))
                .await?;
        }

        let session = prepare_session(self.store.as_ref(), &self.app_name, &user_id, &request.agent_id, &session_id, &message).await;
        if let Err(err) = append_first_system_event(self.store.as_ref(), &session).await {
            tracing::warn!(%err, "append-first-system-event failed; continuing best-effort");
        }

        let triple = SessionTriple {
            app_name: self.app_name.clone(),
            user_id: user_id.clone(),
            session_id: session_id.clone(),
        };

        let mut working_metadata = Metadata::new();
        working_metadata.insert(
            meta_keys::KAGENT_APP_NAME.to_string(),
            serde_json::Value::String(self.app_name.clone()),
        );
        working_metadata.insert(
            meta_keys::KAGENT_USER_ID.to_string(),
            serde_json::Value::String(user_id.clone()),
        );
        working_metadata.insert(
            meta_keys::KAGENT_SESSION_ID.to_string(),
            serde_json::Value::String(session_id.clone()),
        );
        self.send(
            &queue,
            A2aEvent::Status(TaskStatusUpdateEvent {
                task_id: task.task_id.clone(),
                context_id: task.context_id.clone(),
                status: TaskStatus {
                    state: TaskState::Working,
                    message: None,
                    timestamp: Utc::now(),
                },
                is_final: false,
                metadata: working_metadata,
            }),
        )
        .await?;

        let content = from_a2a(&message);
        if content.parts.is_empty() {
            self.send(
                &queue,
                A2aEvent::Status(status_event(
                    &task,
                    TaskState::Failed,
                    Some(A2aMessage::new(actl_a2a::Role::Agent, vec![Part::text(UNCONVERTIBLE_MESSAGE)])),
                    true,
                )),
            )
            .await?;
            return Ok(());
        }

        let runner_config = RunnerConfig {
            streaming: self.streaming,
            timeout_secs: self.execution_timeout.as_secs(),
        };
        let mut stream = self.runner.run(content, runner_config).await;

        let mut aggregator = ResultAggregator::new();
        let deadline = tokio::time::sleep(self.execution_timeout);
        tokio::pin!(deadline);

        loop {
            tokio::select! {
                _ = &mut cancel => {
                    tracing::info!(task_id = %task.task_id, "executor request cancelled by caller");
                    return Ok(());
                }
                () = &mut deadline => {
                    tracing::warn!(task_id = %task.task_id, "execution timeout elapsed");
                    aggregator.observe_failure(A2aMessage::new(actl_a2a::Role::Agent, vec![Part::text(TIMEOUT_MESSAGE)]));
                    break;
                }
                item = stream.next() => {
                    match item {
                        None => break,
                        Some(Err(raw_error)) => {
                            tracing::debug!(%raw_error, "runner stream error item");
                            let failed = build_failed_event(&task.task_id, &task.context_id, &raw_error);
                            aggregator.observe(&failed);
                            self.send(&queue, A2aEvent::Status(failed)).await?;
                        }
                        Some(Ok(runner_event)) => {
                            if let Some(update) = convert_event(&runner_event, &task, &triple) {
                                tracing::debug!(task_id = %task.task_id, state = ?update.status.state, "runner event converted");
                                if !runner_event.is_partial {
                                    aggregator.observe(&update);
                                }
                                let mut wire_update = update;
                                wire_update.status.state = TaskState::Working;
                                self.send(&queue, A2aEvent::Status(wire_update)).await?;
                            }
                        }
                    }
                }
            }
        }

        let (artifact, final_event) = aggregator.finish(&task.task_id, &task.context_id);
        if let Some(artifact) = artifact {
            self.send(&queue, artifact).await?;
        }
        self.send(&queue, final_event).await?;
        tracing::info!(task_id = %task.task_id, "executor request finished");
        Ok(())
    }

    /// Emit a single final `CANCELED` status update for `task`.
    pub async fn cancel(&self, task: &TaskIdentity, queue: mpsc::Sender<A2aEvent>) -> Result<(), ExecutorError> {
        self.send(&queue, A2aEvent::Status(status_event(task, TaskState::Canceled, None, true))).await
    }

    async fn send(&self, queue: &mpsc::Sender<A2aEvent>, event: A2aEvent) -> Result<(), ExecutorError> {
        queue.send(event).await.map_err(|_| ExecutorError::QueueClosed)
    }
}

fn status_event(task: &TaskIdentity, state: TaskState, message: Option<A2aMessage>, is_final: bool) -> TaskStatusUpdateEvent {
    TaskStatusUpdateEvent {
        task_id: task.task_id.clone(),
        context_id: task.context_id.clone(),
        status: TaskStatus {
            state,
            message,
            timestamp: Utc::now(),
        },
        is_final,
        metadata: Metadata::new(),
    }
}
