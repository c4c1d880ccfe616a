//! Agent Runner - executes one agent against a conversation history.
//!
//! Each step sends the agent's instructions, tools and the history so far to
//! the provider. Tool calls are executed and their outputs appended before the
//! next step; a step without tool calls ends the run with its text as the
//! final output. The run is bounded by `max_turns` provider calls.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::agents::{Agent, RunContext};
use crate::domain::conversation::tools::{ToolCall, ToolResponse};
use crate::domain::conversation::{ConversationHistory, ConversationTurn, HistoryItem};
use crate::ports::{AIError, AIProvider, CompletionRequest, RequestMetadata, TokenUsage};

/// Default bound on provider calls per agent run.
pub const DEFAULT_MAX_TURNS: u32 = 8;

/// Errors from a single agent run.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("agent '{agent}' provider call failed: {source}")]
    Provider {
        agent: String,
        #[source]
        source: AIError,
    },

    #[error("agent '{agent}' produced no final output")]
    EmptyResult { agent: String },

    #[error("agent '{agent}' exceeded {max_turns} turns")]
    MaxTurnsExceeded { agent: String, max_turns: u32 },
}

impl AgentError {
    /// Name of the agent that failed.
    pub fn agent(&self) -> &str {
        match self {
            AgentError::Provider { agent, .. }
            | AgentError::EmptyResult { agent }
            | AgentError::MaxTurnsExceeded { agent, .. } => agent,
        }
    }
}

/// Outcome of a completed agent run.
#[derive(Debug, Clone)]
pub struct AgentRun {
    /// Text of the final assistant message.
    pub final_output: String,
    /// Items the run emitted, in order: tool calls, tool outputs, final message.
    pub new_items: Vec<HistoryItem>,
    /// Token usage summed over every provider call.
    pub usage: TokenUsage,
}

/// Runs agents through an [`AIProvider`].
#[derive(Clone)]
pub struct AgentRunner {
    provider: Arc<dyn AIProvider>,
    max_turns: u32,
}

impl AgentRunner {
    pub fn new(provider: Arc<dyn AIProvider>) -> Self {
        Self {
            provider,
            max_turns: DEFAULT_MAX_TURNS,
        }
    }

    /// Sets the bound on provider calls; zero is treated as one.
    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns.max(1);
        self
    }

    pub fn max_turns(&self) -> u32 {
        self.max_turns
    }

    /// Runs `agent` over `history` and returns the items it produced.
    ///
    /// `history` is not modified; the caller appends `new_items`.
    pub async fn run(
        &self,
        agent: &Agent,
        history: &ConversationHistory,
        context: &RunContext,
        trace_id: &str,
    ) -> Result<AgentRun, AgentError> {
        let instructions = agent.instructions().resolve(context);
        let tools = agent.tool_definitions();
        let mut new_items: Vec<HistoryItem> = Vec::new();
        let mut usage = TokenUsage::default();

        for step in 0..self.max_turns {
            let mut request = CompletionRequest::new(RequestMetadata::new(trace_id, agent.name()))
                .with_model(agent.model())
                .with_system_prompt(instructions.clone())
                .with_items(history.items().iter().cloned())
                .with_items(new_items.iter().cloned())
                .with_tools(tools.clone());
            if let Some(schema) = agent.output_schema() {
                request = request.with_output_schema(schema.clone());
            }

            let response = self
                .provider
                .complete(request)
                .await
                .map_err(|source| AgentError::Provider {
                    agent: agent.name().to_string(),
                    source,
                })?;
            usage.add(&response.usage);

            if !response.has_tool_calls() {
                let text = response.content.trim();
                if text.is_empty() {
                    return Err(AgentError::EmptyResult {
                        agent: agent.name().to_string(),
                    });
                }

                tracing::debug!(
                    agent = agent.name(),
                    steps = step + 1,
                    total_tokens = usage.total_tokens,
                    "Agent run finished"
                );

                new_items.push(ConversationTurn::assistant(text).into());
                return Ok(AgentRun {
                    final_output: text.to_string(),
                    new_items,
                    usage,
                });
            }

            for call in response.tool_calls {
                let output = self.execute_tool(agent, &call).await;
                let call_id = call.id().to_string();
                new_items.push(HistoryItem::FunctionCall(call));
                new_items.push(HistoryItem::FunctionCallOutput {
                    call_id,
                    output: output.to_output(),
                });
            }
        }

        Err(AgentError::MaxTurnsExceeded {
            agent: agent.name().to_string(),
            max_turns: self.max_turns,
        })
    }

    async fn execute_tool(&self, agent: &Agent, call: &ToolCall) -> ToolResponse {
        let Some(tool) = agent.find_tool(call.name()) else {
            tracing::warn!(
                agent = agent.name(),
                tool = call.name(),
                "Model called an unknown tool"
            );
            return ToolResponse::error(format!("unknown tool: {}", call.name()));
        };

        match tool.execute(call).await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(
                    agent = agent.name(),
                    tool = call.name(),
                    error = %err,
                    "Tool call failed"
                );
                err.into_response()
            }
        }
    }
}
