//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - OpenAI chat and moderation clients, plus mocks
//! - `guardrails` - Guardrail detectors
//! - `storage` - Chat session persistence
//! - `tools` - Tools the agents can call

pub mod ai;
pub mod guardrails;
pub mod storage;
pub mod tools;
