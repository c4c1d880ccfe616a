//! Chat Session Repository Port - append-only message store per chat session.
//!
//! The chat handler reads the prior history before running the workflow and
//! appends the user message and the reply afterwards, as one exchange.
//! Messages are never edited or removed.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::conversation::{ConversationHistory, Role};
use crate::domain::foundation::{MessageId, SessionId, Timestamp};

/// Port for persisting chat messages.
#[async_trait]
pub trait ChatSessionRepository: Send + Sync {
    /// Appends a user message and its reply to the session, creating the
    /// session if needed.
    ///
    /// Both messages are stored or neither is.
    async fn append_exchange(
        &self,
        session_id: SessionId,
        user_content: &str,
        assistant_content: &str,
    ) -> Result<StoredExchange, RepositoryError>;

    /// Returns the session history in append order.
    ///
    /// Unknown sessions yield an empty history.
    async fn get_history(
        &self,
        session_id: SessionId,
    ) -> Result<ConversationHistory, RepositoryError>;
}

/// A message as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredChatMessage {
    pub id: MessageId,
    pub session_id: SessionId,
    pub role: Role,
    pub content: String,
    pub created_at: Timestamp,
}

impl StoredChatMessage {
    /// A new message stamped with the current time.
    pub fn new(session_id: SessionId, role: Role, content: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            session_id,
            role,
            content: content.into(),
            created_at: Timestamp::now(),
        }
    }
}

/// The two messages of one stored turn.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredExchange {
    pub user: StoredChatMessage,
    pub assistant: StoredChatMessage,
}

/// Storage errors.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("serialization failed: {0}")]
    Serialization(String),
}
