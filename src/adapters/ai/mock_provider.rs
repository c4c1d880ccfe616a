//! Mock AI Provider for testing.
//!
//! Provides a configurable mock implementation of the AIProvider port,
//! allowing tests to run without calling real AI APIs.
//!
//! # Features
//!
//! - Pre-configured responses, either shared or routed by caller name
//! - Scripted tool calls for exercising the agent tool loop
//! - Error injection for resilience testing
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let provider = MockAIProvider::new()
//!     .with_response_for(
//!         "intent_classifier",
//!         r#"{"intent":"get_information","language":"English"}"#,
//!     )
//!     .with_response_for("information_agent", "We have offices in Amsterdam.");
//!
//! let response = provider.complete(request).await?;
//! assert_eq!(provider.calls_for("information_agent"), 1);
//! ```

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use crate::domain::conversation::tools::ToolCall;
use crate::ports::{AIError, AIProvider, CompletionRequest, CompletionResponse, TokenUsage};

/// Model name reported on every mock completion.
pub const MOCK_MODEL: &str = "mock-model-1";

/// Mock AI provider for testing.
///
/// Responses routed to a caller (the `RequestMetadata::caller` of the request)
/// take precedence over the shared queue.
#[derive(Debug, Clone)]
pub struct MockAIProvider {
    /// Shared responses (consumed in order).
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    /// Responses reserved for a specific caller.
    routed: Arc<Mutex<HashMap<String, VecDeque<MockResponse>>>>,
    /// Call history for verification.
    calls: Arc<Mutex<Vec<CompletionRequest>>>,
}

/// A configured mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return a successful completion.
    Success {
        content: String,
        tool_calls: Vec<ToolCall>,
        usage: TokenUsage,
    },
    /// Return an error.
    Error(MockError),
}

impl MockResponse {
    /// A plain text answer.
    pub fn text(content: impl Into<String>) -> Self {
        MockResponse::Success {
            content: content.into(),
            tool_calls: Vec::new(),
            usage: TokenUsage::new(10, 20),
        }
    }

    /// A turn that only requests tool calls.
    pub fn tool_calls(calls: Vec<ToolCall>) -> Self {
        MockResponse::Success {
            content: String::new(),
            tool_calls: calls,
            usage: TokenUsage::new(10, 5),
        }
    }
}

/// Mock error types for testing error handling.
#[derive(Debug, Clone)]
pub enum MockError {
    /// Simulate rate limiting.
    RateLimited { retry_after_secs: u32 },
    /// Simulate context too long.
    ContextTooLong { tokens: u32, max: u32 },
    /// Simulate content filtering.
    ContentFiltered { reason: String },
    /// Simulate provider unavailable.
    Unavailable { message: String },
    /// Simulate an unconfigured credential.
    MissingApiKey,
    /// Simulate authentication failure.
    AuthenticationFailed,
    /// Simulate network error.
    Network { message: String },
    /// Simulate an unreadable response.
    Parse { message: String },
    /// Simulate timeout.
    Timeout { timeout_secs: u32 },
}

impl From<MockError> for AIError {
    fn from(err: MockError) -> Self {
        match err {
            MockError::RateLimited { retry_after_secs } => AIError::rate_limited(retry_after_secs),
            MockError::ContextTooLong { tokens, max } => AIError::context_too_long(tokens, max),
            MockError::ContentFiltered { reason } => AIError::content_filtered(reason),
            MockError::Unavailable { message } => AIError::unavailable(message),
            MockError::MissingApiKey => AIError::MissingApiKey,
            MockError::AuthenticationFailed => AIError::AuthenticationFailed,
            MockError::Network { message } => AIError::network(message),
            MockError::Parse { message } => AIError::parse(message),
            MockError::Timeout { timeout_secs } => AIError::Timeout { timeout_secs },
        }
    }
}

impl Default for MockAIProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAIProvider {
    /// Creates a new mock provider with default settings.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            routed: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Adds a successful response to the shared queue.
    pub fn with_response(self, content: impl Into<String>) -> Self {
        self.push(MockResponse::text(content))
    }

    /// Adds a tool-call turn to the shared queue.
    pub fn with_tool_calls(self, calls: Vec<ToolCall>) -> Self {
        self.push(MockResponse::tool_calls(calls))
    }

    /// Adds an error response to the shared queue.
    pub fn with_error(self, error: MockError) -> Self {
        self.push(MockResponse::Error(error))
    }

    /// Adds a successful response for one caller.
    pub fn with_response_for(self, caller: &str, content: impl Into<String>) -> Self {
        self.push_for(caller, MockResponse::text(content))
    }

    /// Adds a tool-call turn for one caller.
    pub fn with_tool_calls_for(self, caller: &str, calls: Vec<ToolCall>) -> Self {
        self.push_for(caller, MockResponse::tool_calls(calls))
    }

    /// Adds an error response for one caller.
    pub fn with_error_for(self, caller: &str, error: MockError) -> Self {
        self.push_for(caller, MockResponse::Error(error))
    }

    fn push(self, response: MockResponse) -> Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    fn push_for(self, caller: &str, response: MockResponse) -> Self {
        self.routed
            .lock()
            .unwrap()
            .entry(caller.to_string())
            .or_default()
            .push_back(response);
        self
    }

    /// Returns the number of calls made to this provider.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Returns the number of calls issued by `caller`.
    pub fn calls_for(&self, caller: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.metadata.caller == caller)
            .count()
    }

    /// Returns all recorded calls.
    pub fn get_calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().unwrap().clone()
    }

    /// Clears the call history.
    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Gets the next response for `caller`, the next shared one, or a default.
    fn next_response(&self, caller: &str) -> MockResponse {
        if let Some(response) = self
            .routed
            .lock()
            .unwrap()
            .get_mut(caller)
            .and_then(VecDeque::pop_front)
        {
            return response;
        }

        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| MockResponse::text("Mock response"))
    }
}

#[async_trait]
impl AIProvider for MockAIProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let caller = request.metadata.caller.clone();
        self.calls.lock().unwrap().push(request);

        match self.next_response(&caller) {
            MockResponse::Success {
                content,
                tool_calls,
                usage,
            } => Ok(CompletionResponse {
                content,
                tool_calls,
                usage,
                model: MOCK_MODEL.to_string(),
            }),
            MockResponse::Error(err) => Err(err.into()),
        }
    }
}
