//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Model Ports
//!
//! - `AIProvider` - Chat completions (agents, classifier, LLM-judged checks)
//! - `ModerationProvider` - Hosted moderation classifier
//!
//! ## Workflow Ports
//!
//! - `GuardrailDetector` - Runs one guardrail check kind
//! - `AgentTool` - A tool an agent may call mid-run
//! - `ChatSessionRepository` - Append-only chat history store
//! - `ProjectBriefRepository` - Hand-off store for submitted project briefs

mod agent_tool;
mod ai_provider;
mod chat_session_repository;
mod guardrail_detector;
mod moderation_provider;
mod project_brief_repository;

pub use agent_tool::{AgentTool, ToolExecutionError};
pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, RequestMetadata, TokenUsage,
};
pub use chat_session_repository::{
    ChatSessionRepository, RepositoryError, StoredChatMessage, StoredExchange,
};
pub use guardrail_detector::{DetectorError, GuardrailDetector};
pub use moderation_provider::{ModerationOutcome, ModerationProvider};
pub use project_brief_repository::{ProjectBrief, ProjectBriefRepository};
