//! Foundation module - Shared domain primitives.
//!
//! Identifiers, timestamps and validation errors used across the
//! conversation, guardrail and agent modules.

mod errors;
mod ids;
mod timestamp;

pub use errors::ValidationError;
pub use ids::{MessageId, SessionId};
pub use timestamp::Timestamp;
