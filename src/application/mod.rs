//! Application layer - services and handlers composing the ports.
//!
//! The chat turn pipeline lives here: guardrail evaluation, PII redaction,
//! intent classification, agent runs and the orchestrating workflow, plus the
//! command handler that persists each turn.

pub mod agent_runner;
pub mod bootstrap;
pub mod guardrail_evaluator;
pub mod handlers;
pub mod history_redactor;
pub mod intent_classifier;
pub mod workflow;

pub use agent_runner::{AgentError, AgentRun, AgentRunner, DEFAULT_MAX_TURNS};
pub use bootstrap::{build_handler, build_workflow, build_workflow_with};
pub use guardrail_evaluator::{GuardrailError, GuardrailEvaluator};
pub use handlers::{
    ChatReply, ReplyOutcome, SendChatMessageCommand, SendChatMessageError,
    SendChatMessageHandler,
};
pub use history_redactor::{HistoryRedactor, RedactionReport};
pub use intent_classifier::{Classification, IntentClassifier};
pub use workflow::{
    ChatWorkflow, WorkflowAgents, WorkflowError, WorkflowInput, WorkflowResult, WorkflowRun,
};
