// SPDX-License-Identifier: Apache-2.0

mod executor;

pub use executor::{A2aExecutor, ExecutorError, ExecutorRequest};

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use actl_a2a::{A2aEvent, A2aMessage, Part, Role, TaskState};
    use actl_core::{ModelContent, ModelPart, ModelRole, Runner, RunnerConfig, RunnerEvent, RunnerStream};
    use actl_store::InMemoryStore;
    use async_trait::async_trait;
    use futures::stream;
    use tokio::sync::{mpsc, oneshot};

    use crate::{A2aExecutor, ExecutorRequest};

    struct ScriptedRunner {
        items: Vec<Result<RunnerEvent, String>>,
    }

    #[async_trait]
    impl Runner for ScriptedRunner {
        async fn run(&self, _content: ModelContent, _config: RunnerConfig) -> RunnerStream {
            Box::pin(stream::iter(self.items.clone()))
        }
    }

    fn text_event(text: &str) -> RunnerEvent {
        RunnerEvent {
            content: Some(ModelContent::new(ModelRole::Model, vec![ModelPart::Text(text.to_string())])),
            long_running_ids: vec![],
            is_partial: false,
        }
    }

    fn long_running_event(name: &str, id: &str) -> RunnerEvent {
        RunnerEvent {
            content: Some(ModelContent::new(
                ModelRole::Model,
                vec![ModelPart::FunctionCall {
                    name: name.to_string(),
                    args: serde_json::json!({}),
                    id: Some(id.to_string()),
                }],
            )),
            long_running_ids: vec![id.to_string()],
            is_partial: false,
        }
    }

    async fn run_request(runner_items: Vec<Result<RunnerEvent, String>>) -> Vec<A2aEvent> {
        let runner = Arc::new(ScriptedRunner { items: runner_items });
        let store = Arc::new(InMemoryStore::new());
        let executor = A2aExecutor::new(runner, store, "testapp", false, Duration::from_secs(5));

        let (tx, mut rx) = mpsc::channel(32);
        let (_cancel_tx, cancel_rx) = oneshot::channel();
        let request = ExecutorRequest {
            message: Some(A2aMessage::new(Role::User, vec![Part::text("hi")])),
            task_id: "t1".into(),
            context_id: "c1".into(),
            agent_id: "agent-1".into(),
            stored_task_exists: false,
        };
        executor.execute(request, tx, cancel_rx).await.unwrap();

        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn plain_completion_ends_with_artifact_then_completed() {
        let events = run_request(vec![Ok(text_event("hello"))]).await;
        let last = events.last().unwrap();
        match last {
            A2aEvent::Status(e) => {
                assert_eq!(e.status.state, TaskState::Completed);
                assert!(e.is_final);
            }
            _ => panic!("expected status event"),
        }
        assert!(events.iter().any(|e| matches!(e, A2aEvent::Artifact(_))));
    }

    #[tokio::test]
    async fn first_event_is_submitted_when_no_stored_task() {
        let events = run_request(vec![Ok(text_event("hello"))]).await;
        match &events[0] {
            A2aEvent::Status(e) => assert_eq!(e.status.state, TaskState::Submitted),
            _ => panic!("expected status event"),
        }
    }

    #[tokio::test]
    async fn intermediate_events_are_rewritten_to_working_on_the_wire() {
        let events = run_request(vec![Ok(long_running_event("some_tool", "fc1"))]).await;
        let intermediate = events
            .iter()
            .find(|e| matches!(e, A2aEvent::Status(s) if !s.is_final && s.status.message.is_some()))
            .unwrap();
        match intermediate {
            A2aEvent::Status(e) => assert_eq!(e.status.state, TaskState::Working),
            _ => panic!("expected status event"),
        }
    }

    #[tokio::test]
    async fn long_running_tool_call_ends_in_input_required() {
        let events = run_request(vec![Ok(long_running_event("some_tool", "fc1"))]).await;
        let last = events.last().unwrap();
        match last {
            A2aEvent::Status(e) => {
                assert_eq!(e.status.state, TaskState::InputRequired);
                assert!(e.is_final);
            }
            _ => panic!("expected status event"),
        }
        assert!(!events.iter().any(|e| matches!(e, A2aEvent::Artifact(_))));
    }

    #[tokio::test]
    async fn request_euc_ends_in_auth_required() {
        let events = run_request(vec![Ok(long_running_event("request_euc", "fc1"))]).await;
        let last = events.last().unwrap();
        match last {
            A2aEvent::Status(e) => assert_eq!(e.status.state, TaskState::AuthRequired),
            _ => panic!("expected status event"),
        }
    }

    #[tokio::test]
    async fn classified_runner_error_surfaces_failed_with_code() {
        let events = run_request(vec![Err("connect: connection refused".to_string())]).await;
        let failed_mid_stream = events
            .iter()
            .find(|e| matches!(e, A2aEvent::Status(s) if s.status.state == TaskState::Failed))
            .unwrap();
        match failed_mid_stream {
            A2aEvent::Status(e) => {
                assert_eq!(
                    e.metadata.get(actl_a2a::meta_keys::KAGENT_ERROR_CODE),
                    Some(&serde_json::Value::String("MCP_CONNECTION_REFUSED".to_string()))
                );
            }
            _ => panic!("expected status event"),
        }
        let last = events.last().unwrap();
        match last {
            A2aEvent::Status(e) => assert_eq!(e.status.state, TaskState::Failed),
            _ => panic!("expected status event"),
        }
    }

    #[tokio::test]
    async fn cancel_emits_single_final_canceled_event() {
        let runner = Arc::new(ScriptedRunner { items: vec![] });
        let store = Arc::new(InMemoryStore::new());
        let executor = A2aExecutor::new(runner, store, "testapp", false, Duration::from_secs(5));
        let (tx, mut rx) = mpsc::channel(4);
        let task = actl_core::TaskIdentity {
            task_id: "t1".into(),
            context_id: "c1".into(),
        };
        executor.cancel(&task, tx).await.unwrap();
        let event = rx.try_recv().unwrap();
        match event {
            A2aEvent::Status(e) => {
                assert_eq!(e.status.state, TaskState::Canceled);
                assert!(e.is_final);
            }
            _ => panic!("expected status event"),
        }
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn missing_message_is_rejected() {
        let runner = Arc::new(ScriptedRunner { items: vec![] });
        let store = Arc::new(InMemoryStore::new());
        let executor = A2aExecutor::new(runner, store, "testapp", false, Duration::from_secs(5));
        let (tx, _rx) = mpsc::channel(4);
        let (_cancel_tx, cancel_rx) = oneshot::channel();
        let request = ExecutorRequest {
            message: None,
            task_id: "t1".into(),
            context_id: "c1".into(),
            agent_id: "agent-1".into(),
            stored_task_exists: false,
        };
        assert!(executor.execute(request, tx, cancel_rx).await.is_err());
    }
}
