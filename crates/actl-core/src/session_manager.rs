// SPDX-License-Identifier: Apache-2.0
//!
//! Session Manager (C6): get-or-create the conversation session for a
//! (user, context) pair, and best-effort append the first system event.

use actl_a2a::{meta_keys, A2aMessage, Metadata, Role};
use actl_store::{Event, Session, SessionKey, Store};
use serde_json::Value;

const SESSION_NAME_MAX_CHARS: usize = 20;

fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{truncated}…")
    }
}

/// Derive a human-readable session name from the first non-empty text part,
/// truncated to 20 characters with an ellipsis suffix if longer.
pub fn derive_session_name(message: &A2aMessage) -> String {
    let first_text = message
        .parts
        .iter()
        .filter_map(|p| p.as_text())
        .find(|t| !t.trim().is_empty())
        .unwrap_or("");
    truncate_with_ellipsis(first_text, SESSION_NAME_MAX_CHARS)
}

/// Return the existing session for (app, user, context), or create one
/// named from `message`'s first non-empty text part.
pub async fn prepare_session(
    store: &dyn Store,
    app_name: &str,
    user_id: &str,
    agent_id: &str,
    context_id: &str,
    message: &A2aMessage,
) -> Session {
    let key = SessionKey::new(user_id, context_id);
    if let Some(existing) = store.get_session(&key).await {
        return existing;
    }
    let name = derive_session_name(message);
    store.get_or_create_session(key, app_name, agent_id, &name).await
}

/// Append the first system event for a freshly-prepared session. Best
/// effort: callers should log and continue on error rather than abort the
/// request.
pub async fn append_first_system_event(store: &dyn Store, session: &Session) -> anyhow::Result<Event> {
    let mut metadata = Metadata::new();
    metadata.insert(meta_keys::KAGENT_AUTHOR.to_string(), Value::String("system".to_string()));
    let message = A2aMessage::new(Role::Agent, vec![]).with_metadata(metadata);
    store
        .append_event(message, session.key.clone())
        .await
        .map_err(Into::into)
}

// ─── Unit tests ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use actl_a2a::Part;
    use actl_store::InMemoryStore;

    #[test]
    fn short_text_is_kept_verbatim() {
        let message = A2aMessage::new(Role::User, vec![Part::text("hi there")]);
        assert_eq!(derive_session_name(&message), "hi there");
    }

    #[test]
    fn long_text_is_truncated_with_ellipsis() {
        let message = A2aMessage::new(Role::User, vec![Part::text("this is a much longer message than twenty chars")]);
        let name = derive_session_name(&message);
        assert_eq!(name.chars().count(), SESSION_NAME_MAX_CHARS + 1);
        assert!(name.ends_with('…'));
    }

    #[test]
    fn empty_message_derives_empty_name() {
        let message = A2aMessage::new(Role::User, vec![]);
        assert_eq!(derive_session_name(&message), "");
    }

    #[test]
    fn skips_blank_text_parts_to_find_first_nonempty() {
        let message = A2aMessage::new(Role::User, vec![Part::text("   "), Part::text("real content")]);
        assert_eq!(derive_session_name(&message), "real content");
    }

    #[tokio::test]
    async fn prepare_session_creates_once_and_reuses() {
        let store = InMemoryStore::new();
        let message = A2aMessage::new(Role::User, vec![Part::text("hello world")]);
        let s1 = prepare_session(&store, "app", "user-1", "agent-1", "ctx-1", &message).await;
        let s2 = prepare_session(&store, "app", "user-1", "agent-1", "ctx-1", &message).await;
        assert_eq!(s1.name, "hello world");
        assert_eq!(s1.created_at, s2.created_at);
    }

    #[tokio::test]
    async fn append_first_system_event_succeeds_for_prepared_session() {
        let store = InMemoryStore::new();
        let message = A2aMessage::new(Role::User, vec![Part::text("hi")]);
        let session = prepare_session(&store, "app", "user-1", "agent-1", "ctx-1", &message).await;
        let event = append_first_system_event(&store, &session).await.unwrap();
        assert_eq!(event.ordinal, 0);
    }
}
