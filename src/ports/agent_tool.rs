//! Agent Tool Port - Interface for tools an agent may call mid-run.
//!
//! The agent runner offers each tool's [`ToolDefinition`] to the model and
//! routes any matching [`ToolCall`] back to [`AgentTool::execute`].
//!
//! # Example
//!
//! ```ignore
//! struct Clock;
//!
//! #[async_trait]
//! impl AgentTool for Clock {
//!     fn definition(&self) -> ToolDefinition {
//!         ToolDefinition::new("current_time", "Returns the time", json!({"type": "object"}))
//!     }
//!
//!     async fn execute(&self, _call: &ToolCall) -> Result<ToolResponse, ToolExecutionError> {
//!         Ok(ToolResponse::success(json!({"now": Utc::now()})))
//!     }
//! }
//! ```

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::conversation::tools::{ToolCall, ToolDefinition, ToolResponse};
use crate::domain::foundation::ValidationError;

/// Port for a single callable tool.
#[async_trait]
pub trait AgentTool: Send + Sync {
    /// Definition offered to the model.
    fn definition(&self) -> ToolDefinition;

    /// Execute a tool call and return the result.
    ///
    /// Validation problems should be reported as errors; the runner turns
    /// them into an error [`ToolResponse`] the model can read.
    async fn execute(&self, call: &ToolCall) -> Result<ToolResponse, ToolExecutionError>;
}

/// Errors that can occur during tool execution.
#[derive(Debug, Error)]
pub enum ToolExecutionError {
    /// Tool parameter validation failed.
    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),

    /// Unexpected system error.
    #[error("System error: {0}")]
    SystemError(String),
}

impl ToolExecutionError {
    /// Creates a system error.
    pub fn system(message: impl Into<String>) -> Self {
        Self::SystemError(message.into())
    }

    /// Converts the error into a response the model can see.
    pub fn into_response(self) -> ToolResponse {
        ToolResponse::error(self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_convert_via_from() {
        let err: ToolExecutionError = ValidationError::empty_field("summary").into();
        assert!(matches!(err, ToolExecutionError::ValidationFailed(_)));
    }

    #[test]
    fn into_response_is_an_error_response() {
        let response = ToolExecutionError::system("disk full").into_response();
        assert!(!response.is_success());
        assert_eq!(response.error_message(), Some("System error: disk full"));
    }
}
