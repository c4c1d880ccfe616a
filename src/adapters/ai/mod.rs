//! AI Provider Adapters.
//!
//! Implementations of the AIProvider and ModerationProvider ports.
//!
//! ## Available Adapters
//!
//! - `OpenAIProvider` - OpenAI chat completions (tools, JSON-schema output)
//! - `OpenAIModerationProvider` - OpenAI moderation endpoint
//! - `MockAIProvider` / `MockModerationProvider` - Configurable mocks for testing

mod mock_moderation;
mod mock_provider;
mod openai_moderation;
mod openai_provider;

pub use mock_moderation::MockModerationProvider;
pub use mock_provider::{MockAIProvider, MockError, MockResponse};
pub use openai_moderation::OpenAIModerationProvider;
pub use openai_provider::{OpenAIConfig, OpenAIProvider, OPENAI_BASE_URL};
