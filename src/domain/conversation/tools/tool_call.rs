//! Tool call and response types.
//!
//! These are the request/response value objects for tool execution.

use serde::{Deserialize, Serialize};

/// A request to invoke a tool.
///
/// Parameters are passed as JSON to support the varying schemas of
/// different tools. The call id links the call to its output item.
///
/// # Examples
///
/// ```ignore
/// use agency_assistant::domain::conversation::tools::ToolCall;
///
/// let call = ToolCall::new(
///     "call_abc123",
///     "submit_project_brief",
///     serde_json::json!({
///         "project_type": "website",
///         "summary": "Marketing site for a bakery"
///     }),
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Provider-assigned id of this call
    #[serde(rename = "call_id")]
    id: String,

    /// Name of the tool to invoke
    name: String,

    /// Parameters for the tool (JSON object)
    #[serde(rename = "arguments")]
    parameters: serde_json::Value,
}

impl ToolCall {
    /// Creates a new tool call.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        parameters: serde_json::Value,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            parameters,
        }
    }

    /// Returns the call id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the tool name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the parameters.
    pub fn parameters(&self) -> &serde_json::Value {
        &self.parameters
    }
}

/// Response from executing a tool.
///
/// # Examples
///
/// ```ignore
/// use agency_assistant::domain::conversation::tools::ToolResponse;
///
/// // Success response
/// let response = ToolResponse::success(serde_json::json!({ "brief_id": "b-123" }));
///
/// // Error response
/// let response = ToolResponse::error("summary is required");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResponse {
    /// Whether the tool executed successfully
    success: bool,

    /// Data returned by the tool (if successful)
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<serde_json::Value>,

    /// Error message (if failed)
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ToolResponse {
    /// Creates a successful response with data.
    pub fn success(data: serde_json::Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Creates an error response.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }

    /// Returns whether the tool succeeded.
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Returns the response data (if any).
    pub fn data(&self) -> Option<&serde_json::Value> {
        self.data.as_ref()
    }

    /// Returns the error message (if any).
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Renders the response as the output string handed back to the model.
    pub fn to_output(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            serde_json::json!({ "success": false, "error": "unserializable tool output" })
                .to_string()
        })
    }
}
