//! Tool types for tool-augmented agents.
//!
//! An agent may ask the model runtime to invoke declared tools before it
//! produces its final answer. These are the value objects that travel
//! between the model, the runner and the tool implementations.
//!
//! ## Key Types
//!
//! - [`ToolDefinition`] - Name, description and parameter schema of a tool
//! - [`ToolCall`] - A model's request to invoke a tool
//! - [`ToolResponse`] - Result returned to the model

mod tool_call;
mod tool_definition;

pub use tool_call::{ToolCall, ToolResponse};
pub use tool_definition::ToolDefinition;
