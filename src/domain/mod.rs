//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, validation errors)
//! - `conversation` - Conversation history, turns, content parts and tool calls
//! - `guardrails` - Guardrail configuration, verdicts, failure reports, PII/URL logic
//! - `agents` - Agent descriptors, instruction payloads and intent classification

pub mod agents;
pub mod conversation;
pub mod foundation;
pub mod guardrails;
