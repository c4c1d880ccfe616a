//! Append-only conversation history.

use serde::{Deserialize, Serialize};

use super::tools::ToolCall;
use super::turn::ConversationTurn;

/// One item emitted into conversation history.
///
/// Messages carry content parts; tool calls and their outputs are recorded
/// as separate items so that an agent run can be replayed verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HistoryItem {
    /// A user or assistant message.
    Message(ConversationTurn),
    /// A tool invocation requested by a model.
    FunctionCall(ToolCall),
    /// The output returned to the model for a tool invocation.
    FunctionCallOutput { call_id: String, output: String },
}

impl HistoryItem {
    /// Returns the message turn, if this item is one.
    pub fn as_turn(&self) -> Option<&ConversationTurn> {
        match self {
            Self::Message(turn) => Some(turn),
            _ => None,
        }
    }
}

impl From<ConversationTurn> for HistoryItem {
    fn from(turn: ConversationTurn) -> Self {
        Self::Message(turn)
    }
}

/// Ordered, append-only sequence of history items.
///
/// One instance is owned by a single workflow invocation. Stages receive it
/// by reference; nothing may remove or reorder items, only append them or
/// rewrite message text in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationHistory {
    items: Vec<HistoryItem>,
}

impl ConversationHistory {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a history from previously persisted items.
    pub fn from_items(items: Vec<HistoryItem>) -> Self {
        Self { items }
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if no items have been recorded.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// All items, oldest first.
    pub fn items(&self) -> &[HistoryItem] {
        &self.items
    }

    /// Items appended after the first `offset` items.
    pub fn items_since(&self, offset: usize) -> &[HistoryItem] {
        self.items.get(offset..).unwrap_or(&[])
    }

    /// Appends one item.
    pub fn push(&mut self, item: impl Into<HistoryItem>) {
        self.items.push(item.into());
    }

    /// Appends items in order.
    pub fn extend(&mut self, items: impl IntoIterator<Item = HistoryItem>) {
        self.items.extend(items);
    }

    /// Message turns, oldest first.
    pub fn turns(&self) -> impl Iterator<Item = &ConversationTurn> {
        self.items.iter().filter_map(HistoryItem::as_turn)
    }

    /// Message turns for in-place rewriting, oldest first.
    pub fn turns_mut(&mut self) -> impl Iterator<Item = &mut ConversationTurn> {
        self.items.iter_mut().filter_map(|item| match item {
            HistoryItem::Message(turn) => Some(turn),
            _ => None,
        })
    }

    /// Consumes the history, returning its items.
    pub fn into_items(self) -> Vec<HistoryItem> {
        self.items
    }
}
