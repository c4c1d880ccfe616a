//! OpenAI Provider - Implementation of AIProvider for OpenAI's chat completions API.
//!
//! Supports tool calling and JSON-schema constrained output, which the agents
//! and the intent classifier rely on.
//!
//! # Configuration
//!
//! ```ignore
//! let config = OpenAIConfig::new(api_key)
//!     .with_model("gpt-4.1-mini")
//!     .with_base_url("https://api.openai.com/v1");
//!
//! let provider = OpenAIProvider::new(config);
//! ```
//!
//! # History mapping
//!
//! Message items become `user`/`assistant` messages, consecutive function calls
//! are folded into one assistant message with `tool_calls`, and function call
//! outputs become `tool` messages keyed by `tool_call_id`.

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::conversation::tools::ToolCall;
use crate::domain::conversation::{HistoryItem, Role};
use crate::ports::{AIError, AIProvider, CompletionRequest, CompletionResponse, TokenUsage};

/// Default API root.
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Largest exponent used for backoff, capping the wait at 64 seconds.
const MAX_BACKOFF_SHIFT: u32 = 6;

/// Configuration for the OpenAI provider.
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Default model when a request does not name one.
    pub model: String,
    /// Base URL for the API (default: https://api.openai.com/v1).
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Maximum retries on transient failures.
    pub max_retries: u32,
}

impl OpenAIConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::from_secret(Secret::new(api_key.into()))
    }

    /// Creates a configuration from an already wrapped key.
    pub fn from_secret(api_key: Secret<String>) -> Self {
        Self {
            api_key,
            model: "gpt-4.1-mini".to_string(),
            base_url: OPENAI_BASE_URL.to_string(),
            timeout: Duration::from_secs(60),
            max_retries: 0,
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the maximum retry count.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Exposes the API key (for making requests).
    pub(crate) fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    /// Returns true when no usable key is configured.
    pub fn has_api_key(&self) -> bool {
        !self.api_key().trim().is_empty()
    }
}

/// Builds the shared HTTP client.
pub(crate) fn http_client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Maps a transport failure to a provider error.
pub(crate) fn map_send_error(err: reqwest::Error, timeout: Duration) -> AIError {
    if err.is_timeout() {
        AIError::Timeout {
            timeout_secs: timeout.as_secs() as u32,
        }
    } else if err.is_connect() {
        AIError::network(format!("Connection failed: {}", err))
    } else {
        AIError::network(err.to_string())
    }
}

/// Parses the API response status and handles errors.
pub(crate) async fn handle_response_status(response: Response) -> Result<Response, AIError> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let error_body = response.text().await.unwrap_or_default();

    match status.as_u16() {
        401 => Err(AIError::AuthenticationFailed),
        429 => Err(AIError::rate_limited(parse_retry_after(&error_body))),
        400 => {
            if error_body.contains("maximum context length")
                || error_body.contains("context_length_exceeded")
            {
                Err(AIError::context_too_long(0, 0))
            } else {
                Err(AIError::InvalidRequest(error_body))
            }
        }
        500..=599 => Err(AIError::unavailable(format!(
            "Server error {}: {}",
            status, error_body
        ))),
        _ => Err(AIError::network(format!(
            "Unexpected status {}: {}",
            status, error_body
        ))),
    }
}

/// Parses retry-after from an error body, defaulting to 30 seconds.
fn parse_retry_after(error_body: &str) -> u32 {
    serde_json::from_str::<serde_json::Value>(error_body)
        .ok()
        .and_then(|parsed| {
            let msg = parsed.get("error")?.get("message")?.as_str()?.to_string();
            let idx = msg.find("try again in ")?;
            let rest = &msg[idx + 13..];
            let num_end = rest.find(|c: char| !c.is_ascii_digit())?;
            rest[..num_end].parse::<u32>().ok()
        })
        .unwrap_or(30)
}

/// OpenAI API provider implementation.
pub struct OpenAIProvider {
    config: OpenAIConfig,
    client: Client,
}

impl OpenAIProvider {
    /// Creates a new OpenAI provider with the given configuration.
    pub fn new(config: OpenAIConfig) -> Self {
        let client = http_client(config.timeout);
        Self { config, client }
    }

    /// Builds the chat completions endpoint URL.
    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }

    /// Converts our request to OpenAI's format.
    fn to_openai_request(&self, request: &CompletionRequest) -> OpenAIRequest {
        let mut messages = Vec::new();

        if let Some(ref prompt) = request.system_prompt {
            messages.push(OpenAIMessage::text("system", prompt.clone()));
        }

        messages.extend(history_to_messages(&request.items));

        let tools: Vec<serde_json::Value> =
            request.tools.iter().map(|t| t.to_openai_format()).collect();

        let response_format = request.output_schema.as_ref().map(|schema| {
            serde_json::json!({
                "type": "json_schema",
                "json_schema": {
                    "name": schema.name,
                    "schema": schema.schema,
                    "strict": true
                }
            })
        });

        OpenAIRequest {
            model: request
                .model
                .clone()
                .unwrap_or_else(|| self.config.model.clone()),
            messages,
            temperature: request.temperature,
            tools: if tools.is_empty() { None } else { Some(tools) },
            response_format,
        }
    }

    /// Sends a request and handles the response.
    async fn send_request(&self, request: &CompletionRequest) -> Result<Response, AIError> {
        let openai_request = self.to_openai_request(request);

        self.client
            .post(self.completions_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .header("Content-Type", "application/json")
            .json(&openai_request)
            .send()
            .await
            .map_err(|e| map_send_error(e, self.config.timeout))
    }

    /// Parses a non-streaming response.
    async fn parse_response(&self, response: Response) -> Result<CompletionResponse, AIError> {
        let response = handle_response_status(response).await?;

        let openai_response: OpenAIResponse = response
            .json()
            .await
            .map_err(|e| AIError::parse(format!("Failed to parse response: {}", e)))?;

        into_completion(openai_response)
    }
}

#[async_trait]
impl AIProvider for OpenAIProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        if !self.config.has_api_key() {
            return Err(AIError::MissingApiKey);
        }

        let mut retry_count = 0;

        loop {
            let attempt = match self.send_request(&request).await {
                Ok(response) => self.parse_response(response).await,
                Err(err) => Err(err),
            };

            let err = match attempt {
                Ok(completion) => return Ok(completion),
                Err(err) => err,
            };

            if !err.is_retryable() || retry_count >= self.config.max_retries {
                return Err(err);
            }

            let delay = retry_delay(&err, retry_count);
            tracing::warn!(
                error = %err,
                attempt = retry_count + 1,
                delay_secs = delay.as_secs(),
                caller = %request.metadata.caller,
                "Retrying OpenAI completion"
            );
            sleep(delay).await;
            retry_count += 1;
        }
    }
}

/// Wait before the next attempt: the provider's `retry_after` for rate limits,
/// otherwise 1s, 2s, 4s, ... capped at `2^MAX_BACKOFF_SHIFT` seconds.
fn retry_delay(err: &AIError, retry_count: u32) -> Duration {
    match err {
        AIError::RateLimited { retry_after_secs } => {
            Duration::from_secs(u64::from(*retry_after_secs))
        }
        _ => Duration::from_secs(1u64 << retry_count.min(MAX_BACKOFF_SHIFT)),
    }
}

/// Maps history items to chat messages.
fn history_to_messages(items: &[HistoryItem]) -> Vec<OpenAIMessage> {
    let mut messages: Vec<OpenAIMessage> = Vec::new();

    for item in items {
        match item {
            HistoryItem::Message(turn) => {
                let role = match turn.role() {
                    Role::User => "user",
                    Role::Assistant => "assistant",
                };
                messages.push(OpenAIMessage::text(role, turn.text()));
            }
            HistoryItem::FunctionCall(call) => {
                let wire = OpenAIToolCall::from_call(call);
                let open_batch = messages
                    .last_mut()
                    .filter(|last| last.role == "assistant")
                    .and_then(|last| last.tool_calls.as_mut());
                if let Some(calls) = open_batch {
                    calls.push(wire);
                } else {
                    messages.push(OpenAIMessage {
                        role: "assistant".to_string(),
                        content: None,
                        tool_calls: Some(vec![wire]),
                        tool_call_id: None,
                    });
                }
            }
            HistoryItem::FunctionCallOutput { call_id, output } => {
                messages.push(OpenAIMessage {
                    role: "tool".to_string(),
                    content: Some(output.clone()),
                    tool_calls: None,
                    tool_call_id: Some(call_id.clone()),
                });
            }
        }
    }

    messages
}

fn into_completion(openai_response: OpenAIResponse) -> Result<CompletionResponse, AIError> {
    let choice = openai_response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| AIError::parse("No choices in response"))?;

    if choice.finish_reason.as_deref() == Some("content_filter") {
        return Err(AIError::content_filtered(
            "completion stopped by the provider's content filter",
        ));
    }

    let tool_calls = choice
        .message
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .map(OpenAIToolCall::into_call)
        .collect::<Result<Vec<_>, _>>()?;

    let usage = openai_response
        .usage
        .map(|u| TokenUsage::new(u.prompt_tokens, u.completion_tokens))
        .unwrap_or_default();

    Ok(CompletionResponse {
        content: choice.message.content.unwrap_or_default(),
        tool_calls,
        usage,
        model: openai_response.model,
    })
}

// ----- OpenAI API Types -----

#[derive(Debug, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<serde_json::Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<serde_json::Value>,
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAIMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<OpenAIToolCall>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

impl OpenAIMessage {
    fn text(role: &str, content: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAIToolCall {
    id: String,
    #[serde(rename = "type", default = "function_type")]
    kind: String,
    function: OpenAIFunction,
}

fn function_type() -> String {
    "function".to_string()
}

impl OpenAIToolCall {
    fn from_call(call: &ToolCall) -> Self {
        Self {
            id: call.id().to_string(),
            kind: function_type(),
            function: OpenAIFunction {
                name: call.name().to_string(),
                arguments: call.parameters().to_string(),
            },
        }
    }

    fn into_call(self) -> Result<ToolCall, AIError> {
        let parameters = if self.function.arguments.trim().is_empty() {
            serde_json::json!({})
        } else {
            serde_json::from_str(&self.function.arguments).map_err(|e| {
                AIError::parse(format!(
                    "Invalid arguments for tool {}: {}",
                    self.function.name, e
                ))
            })?
        };
        Ok(ToolCall::new(self.id, self.function.name, parameters))
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAIFunction {
    name: String,
    /// JSON-encoded arguments.
    arguments: String,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    model: String,
    choices: Vec<OpenAIChoice>,
    usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}
