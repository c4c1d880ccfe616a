//! Chat command handlers.

mod send_message;

pub use send_message::{
    ChatReply, ReplyOutcome, SendChatMessageCommand, SendChatMessageError,
    SendChatMessageHandler, DEFAULT_FAILURE_MESSAGE, DEFAULT_GUARDRAIL_NOTICE,
};
