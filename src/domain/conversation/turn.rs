//! A single user or assistant message.

use serde::{Deserialize, Serialize};

use super::content::{ContentKind, ContentPart};
use crate::domain::foundation::ValidationError;

/// Role of a message sender in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// End-user input.
    User,
    /// Model response.
    Assistant,
}

/// One message exchanged in the dialog.
///
/// # Invariants
///
/// - `content` is never empty; [`ConversationTurn::new`] and deserialization
///   reject an empty part list
/// - Redaction rewrites part text in place; part count and kinds never change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TurnRecord")]
pub struct ConversationTurn {
    role: Role,
    content: Vec<ContentPart>,
}

#[derive(Deserialize)]
struct TurnRecord {
    role: Role,
    content: Vec<ContentPart>,
}

impl TryFrom<TurnRecord> for ConversationTurn {
    type Error = ValidationError;

    fn try_from(record: TurnRecord) -> Result<Self, Self::Error> {
        Self::new(record.role, record.content)
    }
}

impl ConversationTurn {
    /// Creates a turn from explicit parts.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyField` when `content` has no parts.
    pub fn new(role: Role, content: Vec<ContentPart>) -> Result<Self, ValidationError> {
        if content.is_empty() {
            return Err(ValidationError::empty_field("content"));
        }
        Ok(Self { role, content })
    }

    /// Creates a user turn with a single `input_text` part.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: vec![ContentPart::input_text(text)],
        }
    }

    /// Creates an assistant turn with a single `output_text` part.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: vec![ContentPart::output_text(text)],
        }
    }

    /// Returns the role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns the content parts in order.
    pub fn content(&self) -> &[ContentPart] {
        &self.content
    }

    /// Returns the content parts for in-place rewriting.
    pub fn content_mut(&mut self) -> &mut [ContentPart] {
        &mut self.content
    }

    /// Concatenates the text of every text-bearing part.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter(|part| part.kind().is_text_bearing())
            .map(ContentPart::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Returns true if any part is of the given kind.
    pub fn has_kind(&self, kind: ContentKind) -> bool {
        self.content.iter().any(|part| part.kind() == kind)
    }
}
