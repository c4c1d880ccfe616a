//! Conversation module - the history threaded through the chat workflow.
//!
//! A conversation is an ordered, append-only list of [`HistoryItem`]s. Message
//! items carry typed [`ContentPart`]s rather than bare strings so that the
//! redactor can rewrite text without knowing what a turn means.
//!
//! ## Key Types
//!
//! - [`ContentPart`] - One typed text span (`input_text`, `output_text`, `text`)
//! - [`ConversationTurn`] - A user or assistant message
//! - [`HistoryItem`] - A message, tool call or tool output emitted into history
//! - [`ConversationHistory`] - The working history for one workflow invocation

mod content;
mod history;
pub mod tools;
mod turn;

pub use content::{ContentKind, ContentPart};
pub use history::{ConversationHistory, HistoryItem};
pub use turn::{ConversationTurn, Role};
