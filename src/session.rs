//! Per-chat session storage
//!
//! One `ChatState` per chat id, created lazily and replaced wholesale on
//! every routed event. Entries are never evicted; a long-lived process
//! with a modest user count carries them until restart.

use crate::state_machine::{ChatId, ChatState};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Concurrency-safe map from chat id to conversation state
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<ChatId, ChatState>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state for a chat; unknown chats start at `Idle`.
    pub async fn get(&self, chat: ChatId) -> ChatState {
        self.inner
            .read()
            .await
            .get(&chat)
            .cloned()
            .unwrap_or_default()
    }

    /// Replace a chat's state outright
    pub async fn set(&self, chat: ChatId, state: ChatState) {
        self.inner.write().await.insert(chat, state);
    }

    /// Reset a chat to `Idle`
    #[allow(dead_code)] // API completeness
    pub async fn clear(&self, chat: ChatId) {
        self.set(chat, ChatState::Idle).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unknown_chat_defaults_to_idle() {
        let sessions = SessionStore::new();
        assert_eq!(sessions.get(1).await, ChatState::Idle);
    }

    #[tokio::test]
    async fn test_set_replaces_wholesale() {
        let sessions = SessionStore::new();

        sessions
            .set(
                1,
                ChatState::AwaitingNoteFile {
                    lesson_id: 3,
                    title: "Chapter 1".to_string(),
                },
            )
            .await;
        sessions.set(1, ChatState::AwaitingLessonName).await;

        assert_eq!(sessions.get(1).await, ChatState::AwaitingLessonName);
    }

    #[tokio::test]
    async fn test_chats_are_independent() {
        let sessions = SessionStore::new();

        sessions.set(1, ChatState::AwaitingLessonName).await;
        assert_eq!(sessions.get(2).await, ChatState::Idle);

        sessions.clear(1).await;
        assert_eq!(sessions.get(1).await, ChatState::Idle);
    }
}
