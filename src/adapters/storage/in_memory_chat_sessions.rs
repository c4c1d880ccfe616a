//! In-Memory Chat Session Repository
//!
//! Keeps every session's messages in memory, in append order.
//! Useful for testing and the development binary.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::conversation::{ConversationHistory, ConversationTurn, Role};
use crate::domain::foundation::SessionId;
use crate::ports::{ChatSessionRepository, RepositoryError, StoredChatMessage, StoredExchange};

/// In-memory chat message store
#[derive(Debug, Clone, Default)]
pub struct InMemoryChatSessionRepository {
    sessions: Arc<RwLock<HashMap<SessionId, Vec<StoredChatMessage>>>>,
}

impl InMemoryChatSessionRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored messages of a session (empty for unknown sessions)
    pub async fn messages(&self, session_id: SessionId) -> Vec<StoredChatMessage> {
        self.sessions
            .read()
            .await
            .get(&session_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Get the number of sessions
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl ChatSessionRepository for InMemoryChatSessionRepository {
    async fn append_exchange(
        &self,
        session_id: SessionId,
        user_content: &str,
        assistant_content: &str,
    ) -> Result<StoredExchange, RepositoryError> {
        let exchange = StoredExchange {
            user: StoredChatMessage::new(session_id, Role::User, user_content),
            assistant: StoredChatMessage::new(session_id, Role::Assistant, assistant_content),
        };

        let mut sessions = self.sessions.write().await;
        let messages = sessions.entry(session_id).or_default();
        messages.push(exchange.user.clone());
        messages.push(exchange.assistant.clone());
        Ok(exchange)
    }

    async fn get_history(
        &self,
        session_id: SessionId,
    ) -> Result<ConversationHistory, RepositoryError> {
        let sessions = self.sessions.read().await;
        let mut history = ConversationHistory::new();

        for message in sessions.get(&session_id).into_iter().flatten() {
            let turn = match message.role {
                Role::User => ConversationTurn::user(message.content.clone()),
                Role::Assistant => ConversationTurn::assistant(message.content.clone()),
            };
            history.push(turn);
        }

        Ok(history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::conversation::ContentKind;

    #[tokio::test]
    async fn unknown_session_has_empty_history() {
        let repo = InMemoryChatSessionRepository::new();

        let history = repo.get_history(SessionId::new()).await.unwrap();

        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn history_preserves_append_order_and_roles() {
        let repo = InMemoryChatSessionRepository::new();
        let session = SessionId::new();

        let exchange = repo.append_exchange(session, "Hi", "Hello!").await.unwrap();
        assert_ne!(exchange.user.id, exchange.assistant.id);

        let history = repo.get_history(session).await.unwrap();
        let turns: Vec<_> = history.turns().collect();

        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].role(), Role::User);
        assert!(turns[0].has_kind(ContentKind::InputText));
        assert_eq!(turns[1].text(), "Hello!");
        assert!(turns[1].has_kind(ContentKind::OutputText));
    }

    #[tokio::test]
    async fn sessions_are_isolated() {
        let repo = InMemoryChatSessionRepository::new();
        let a = SessionId::new();
        let b = SessionId::new();

        repo.append_exchange(a, "for a", "reply for a").await.unwrap();

        assert!(repo.get_history(b).await.unwrap().is_empty());
        assert_eq!(repo.messages(a).await.len(), 2);
        assert_eq!(repo.session_count().await, 1);
    }
}
