//! Application handlers.
//!
//! Command handlers that sit between a transport and the chat workflow.

pub mod chat;

pub use chat::{
    ChatReply, ReplyOutcome, SendChatMessageCommand, SendChatMessageError,
    SendChatMessageHandler,
};
