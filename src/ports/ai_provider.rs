//! AI Provider Port - Interface for LLM provider integrations.
//!
//! This port abstracts all chat-completion calls made by the classifier, the
//! specialist agents and the model-judged guardrail checks, so none of them
//! couple to a specific vendor API.
//!
//! # Design
//!
//! - Requests carry the full history as [`HistoryItem`]s, not flattened strings
//! - Optional tool definitions; responses may ask for tool calls instead of text
//! - Optional JSON-schema output constraint for structured answers
//! - Error types for common failure modes (rate limits, missing credential, etc.)
//!
//! # Example
//!
//! ```ignore
//! use async_trait::async_trait;
//!
//! struct EchoProvider;
//!
//! #[async_trait]
//! impl AIProvider for EchoProvider {
//!     async fn complete(
//!         &self,
//!         request: CompletionRequest,
//!     ) -> Result<CompletionResponse, AIError> {
//!         Ok(CompletionResponse::text("Hello!", "echo"))
//!     }
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::agents::OutputSchema;
use crate::domain::conversation::tools::{ToolCall, ToolDefinition};
use crate::domain::conversation::{ConversationTurn, HistoryItem};

/// Port for AI/LLM provider interactions.
///
/// Implementations connect to external AI services and translate between
/// the provider-specific API and our domain types.
#[async_trait]
pub trait AIProvider: Send + Sync {
    /// Generate a single completion.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError>;
}

/// Request for AI completion.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Model override; the provider's default model is used when absent.
    pub model: Option<String>,
    /// Conversation items (history + anything emitted during this run).
    pub items: Vec<HistoryItem>,
    /// System prompt to guide model behavior.
    pub system_prompt: Option<String>,
    /// Temperature for response randomness.
    pub temperature: Option<f32>,
    /// Tools the model may call.
    pub tools: Vec<ToolDefinition>,
    /// JSON schema the final answer must satisfy.
    pub output_schema: Option<OutputSchema>,
    /// Request metadata for tracing.
    pub metadata: RequestMetadata,
}

impl CompletionRequest {
    /// Creates a new completion request with required metadata.
    pub fn new(metadata: RequestMetadata) -> Self {
        Self {
            model: None,
            items: Vec::new(),
            system_prompt: None,
            temperature: None,
            tools: Vec::new(),
            output_schema: None,
            metadata,
        }
    }

    /// Sets the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Appends a history item.
    pub fn with_item(mut self, item: impl Into<HistoryItem>) -> Self {
        self.items.push(item.into());
        self
    }

    /// Appends several history items.
    pub fn with_items(mut self, items: impl IntoIterator<Item = HistoryItem>) -> Self {
        self.items.extend(items);
        self
    }

    /// Adds a user message.
    pub fn with_user_message(self, text: impl Into<String>) -> Self {
        self.with_item(ConversationTurn::user(text))
    }

    /// Sets the system prompt.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Sets the temperature.
    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    /// Sets the callable tools.
    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = tools;
        self
    }

    /// Constrains the answer to a JSON schema.
    pub fn with_output_schema(mut self, schema: OutputSchema) -> Self {
        self.output_schema = Some(schema);
        self
    }
}

/// Request metadata for tracing.
#[derive(Debug, Clone)]
pub struct RequestMetadata {
    /// Trace ID shared by every call of one workflow run.
    pub trace_id: String,
    /// Agent or check that issued the request.
    pub caller: String,
}

impl RequestMetadata {
    /// Creates new request metadata.
    pub fn new(trace_id: impl Into<String>, caller: impl Into<String>) -> Self {
        Self {
            trace_id: trace_id.into(),
            caller: caller.into(),
        }
    }
}

/// Response from AI completion.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Generated text; empty when the model only requested tool calls.
    pub content: String,
    /// Tool calls requested by the model, in order.
    pub tool_calls: Vec<ToolCall>,
    /// Token usage.
    pub usage: TokenUsage,
    /// Model that generated the response.
    pub model: String,
}

impl CompletionResponse {
    /// Creates a plain text response.
    pub fn text(content: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            tool_calls: Vec::new(),
            usage: TokenUsage::default(),
            model: model.into(),
        }
    }

    /// Returns true if the model asked for tools instead of finishing.
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

/// Token usage information.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Tokens in the prompt.
    pub prompt_tokens: u32,
    /// Tokens in the completion.
    pub completion_tokens: u32,
    /// Total tokens (prompt + completion).
    pub total_tokens: u32,
}

impl TokenUsage {
    /// Creates new token usage.
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }

    /// Accumulates another call's usage into this one.
    pub fn add(&mut self, other: &TokenUsage) {
        self.prompt_tokens += other.prompt_tokens;
        self.completion_tokens += other.completion_tokens;
        self.total_tokens += other.total_tokens;
    }
}

/// AI provider errors.
#[derive(Debug, thiserror::Error)]
pub enum AIError {
    /// Rate limited by provider.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds until retry is allowed.
        retry_after_secs: u32,
    },

    /// Context (prompt + history) exceeds model limit.
    #[error("context too long: {tokens} tokens exceeds {max} limit")]
    ContextTooLong {
        /// Actual token count.
        tokens: u32,
        /// Maximum allowed.
        max: u32,
    },

    /// Content was filtered for safety.
    #[error("content filtered: {reason}")]
    ContentFiltered {
        /// Reason for filtering.
        reason: String,
    },

    /// Provider is unavailable.
    #[error("provider unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// No API key was configured; raised before any network call.
    #[error("API key is not configured")]
    MissingApiKey,

    /// API key was rejected.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Failed to parse provider response.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid request configuration.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u32,
    },
}

impl AIError {
    /// Creates a rate limited error.
    pub fn rate_limited(retry_after_secs: u32) -> Self {
        Self::RateLimited { retry_after_secs }
    }

    /// Creates a context too long error.
    pub fn context_too_long(tokens: u32, max: u32) -> Self {
        Self::ContextTooLong { tokens, max }
    }

    /// Creates a content filtered error.
    pub fn content_filtered(reason: impl Into<String>) -> Self {
        Self::ContentFiltered {
            reason: reason.into(),
        }
    }

    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Returns true if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AIError::RateLimited { .. }
                | AIError::Unavailable { .. }
                | AIError::Network(_)
                | AIError::Timeout { .. }
        )
    }

    /// Returns true if the credential is absent.
    pub fn is_missing_credential(&self) -> bool {
        matches!(self, AIError::MissingApiKey)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::conversation::tools::ToolDefinition;

    fn test_metadata() -> RequestMetadata {
        RequestMetadata::new("trace-123", "information_agent")
    }

    #[test]
    fn completion_request_builder_works() {
        let request = CompletionRequest::new(test_metadata())
            .with_model("gpt-4.1-mini")
            .with_user_message("Hello")
            .with_system_prompt("Be helpful")
            .with_temperature(0.7)
            .with_tools(vec![ToolDefinition::new(
                "submit_project_brief",
                "Record a brief",
                serde_json::json!({"type": "object"}),
            )]);

        assert_eq!(request.model.as_deref(), Some("gpt-4.1-mini"));
        assert_eq!(request.items.len(), 1);
        assert_eq!(request.items[0].as_turn().unwrap().text(), "Hello");
        assert_eq!(request.system_prompt, Some("Be helpful".to_string()));
        assert_eq!(request.temperature, Some(0.7));
        assert_eq!(request.tools.len(), 1);
        assert!(request.output_schema.is_none());
        assert_eq!(request.metadata.caller, "information_agent");
    }

    #[test]
    fn text_response_has_no_tool_calls() {
        let response = CompletionResponse::text("Hi", "mock");

        assert!(!response.has_tool_calls());
        assert_eq!(response.model, "mock");
    }

    #[test]
    fn token_usage_calculates_total() {
        let usage = TokenUsage::new(100, 50);
        assert_eq!(usage.total_tokens, 150);
    }

    #[test]
    fn ai_error_retryable_classification() {
        assert!(AIError::rate_limited(30).is_retryable());
        assert!(AIError::unavailable("down").is_retryable());
        assert!(AIError::network("reset").is_retryable());
        assert!(AIError::Timeout { timeout_secs: 30 }.is_retryable());

        assert!(!AIError::MissingApiKey.is_retryable());
        assert!(!AIError::AuthenticationFailed.is_retryable());
        assert!(!AIError::context_too_long(100, 50).is_retryable());
        assert!(!AIError::content_filtered("bad").is_retryable());
    }

    #[test]
    fn only_missing_key_is_a_missing_credential() {
        assert!(AIError::MissingApiKey.is_missing_credential());
        assert!(!AIError::AuthenticationFailed.is_missing_credential());
    }

    #[test]
    fn ai_error_displays_correctly() {
        assert_eq!(AIError::rate_limited(30).to_string(), "rate limited: retry after 30s");
        assert_eq!(AIError::MissingApiKey.to_string(), "API key is not configured");
    }
}
