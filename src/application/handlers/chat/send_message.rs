//! SendChatMessage command handler.
//!
//! The calling layer around [`ChatWorkflow`]: loads the session history, runs
//! one turn, and persists the user message and the reply. Workflow errors
//! never reach the caller; they collapse into a fixed failure message.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use crate::application::workflow::{ChatWorkflow, WorkflowInput, WorkflowResult};
use crate::domain::foundation::{MessageId, SessionId};
use crate::ports::{ChatSessionRepository, RepositoryError};

pub const DEFAULT_FAILURE_MESSAGE: &str =
    "Sorry, something went wrong while handling your message. Please try again later.";

pub const DEFAULT_GUARDRAIL_NOTICE: &str =
    "Sorry, I can't help with that request. Please rephrase your message.";

/// Command to send a chat message.
#[derive(Debug, Clone)]
pub struct SendChatMessageCommand {
    pub session_id: SessionId,
    pub content: String,
}

impl SendChatMessageCommand {
    pub fn new(session_id: SessionId, content: impl Into<String>) -> Self {
        Self {
            session_id,
            content: content.into(),
        }
    }
}

/// How the turn ended, from the user's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyOutcome {
    /// The workflow produced a reply.
    Answered,
    /// A guardrail rejected the message.
    Blocked,
    /// The workflow failed; the reply is the generic failure message.
    Failed,
}

/// Reply to a chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub text: String,
    pub outcome: ReplyOutcome,
    pub user_message_id: MessageId,
    pub assistant_message_id: MessageId,
}

/// Errors that can occur when sending a chat message.
#[derive(Debug, Error)]
pub enum SendChatMessageError {
    /// Message content is empty or whitespace only.
    #[error("Validation error: message content cannot be empty")]
    EmptyContent,

    /// Repository error during load or persistence.
    #[error("Repository error: {0}")]
    Repository(String),
}

impl From<RepositoryError> for SendChatMessageError {
    fn from(err: RepositoryError) -> Self {
        SendChatMessageError::Repository(err.to_string())
    }
}

/// Handler for SendChatMessage commands.
pub struct SendChatMessageHandler {
    repository: Arc<dyn ChatSessionRepository>,
    workflow: Arc<ChatWorkflow>,
    failure_message: String,
    guardrail_notice: String,
}

impl SendChatMessageHandler {
    pub fn new(repository: Arc<dyn ChatSessionRepository>, workflow: Arc<ChatWorkflow>) -> Self {
        Self {
            repository,
            workflow,
            failure_message: DEFAULT_FAILURE_MESSAGE.to_string(),
            guardrail_notice: DEFAULT_GUARDRAIL_NOTICE.to_string(),
        }
    }

    pub fn with_failure_message(mut self, message: impl Into<String>) -> Self {
        self.failure_message = message.into();
        self
    }

    pub fn with_guardrail_notice(mut self, message: impl Into<String>) -> Self {
        self.guardrail_notice = message.into();
        self
    }

    /// Handles a send chat message command.
    pub async fn handle(
        &self,
        cmd: SendChatMessageCommand,
    ) -> Result<ChatReply, SendChatMessageError> {
        let content = cmd.content.trim();
        if content.is_empty() {
            return Err(SendChatMessageError::EmptyContent);
        }

        let history = self.repository.get_history(cmd.session_id).await?;

        let mut input = WorkflowInput::new(content);
        let (text, outcome) = match self.workflow.run(&mut input, &history).await {
            Ok(run) => match run.result {
                WorkflowResult::Success { output_text } => (output_text, ReplyOutcome::Answered),
                WorkflowResult::GuardrailFailure(report) => {
                    tracing::info!(
                        session_id = %cmd.session_id,
                        failed = ?report.failed_sections(),
                        "Message blocked by guardrails"
                    );
                    (self.guardrail_notice.clone(), ReplyOutcome::Blocked)
                }
            },
            Err(err) => {
                tracing::error!(
                    session_id = %cmd.session_id,
                    error = %err,
                    "Chat workflow failed"
                );
                (self.failure_message.clone(), ReplyOutcome::Failed)
            }
        };

        let exchange = self
            .repository
            .append_exchange(cmd.session_id, content, &text)
            .await?;

        Ok(ChatReply {
            text,
            outcome,
            user_message_id: exchange.user.id,
            assistant_message_id: exchange.assistant.id,
        })
    }
}
