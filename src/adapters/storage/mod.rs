//! Storage Adapters
//!
//! Implementations of the ChatSessionRepository and ProjectBriefRepository ports.
//!
//! ## Available Adapters
//!
//! - **InMemoryChatSessionRepository** - Stores chat messages in memory (testing/development)
//! - **InMemoryProjectBriefRepository** - Stores submitted briefs in memory (testing/development)

mod in_memory_chat_sessions;
mod in_memory_project_briefs;

pub use in_memory_chat_sessions::InMemoryChatSessionRepository;
pub use in_memory_project_briefs::InMemoryProjectBriefRepository;
