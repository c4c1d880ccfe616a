//! Intent Classifier - decides which specialist agent handles a turn.

use serde::Deserialize;

use crate::domain::agents::{catalog, Agent, ClassificationResult, Intent, RunContext};
use crate::domain::conversation::{ConversationHistory, HistoryItem};

use super::agent_runner::{AgentError, AgentRunner};

/// Classifier output plus the items it emitted into history.
#[derive(Debug, Clone)]
pub struct Classification {
    pub result: ClassificationResult,
    /// The classifier's answer verbatim, used as the reply when the intent is
    /// not one the workflow routes.
    pub raw_output: String,
    pub new_items: Vec<HistoryItem>,
}

#[derive(Debug, Deserialize)]
struct RawClassification {
    intent: Intent,
    #[serde(default)]
    language: String,
}

/// Runs the classifier agent and parses its structured answer.
#[derive(Clone)]
pub struct IntentClassifier {
    agent: Agent,
    runner: AgentRunner,
}

impl IntentClassifier {
    pub fn new(agent: Agent, runner: AgentRunner) -> Self {
        Self { agent, runner }
    }

    /// Uses the stock classifier agent.
    pub fn with_model(model: impl Into<String>, runner: AgentRunner) -> Self {
        Self::new(catalog::classifier_agent(model), runner)
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    /// Classifies the latest turn of `history`.
    ///
    /// An answer that is not a `{intent, language}` object is an
    /// [`AgentError::EmptyResult`]; an intent outside the known set parses to
    /// [`Intent::Unrecognized`].
    pub async fn classify(
        &self,
        history: &ConversationHistory,
        trace_id: &str,
    ) -> Result<Classification, AgentError> {
        let run = self
            .runner
            .run(&self.agent, history, &RunContext::new(), trace_id)
            .await?;

        let parsed: RawClassification = serde_json::from_str(&run.final_output).map_err(|err| {
            tracing::warn!(
                agent = self.agent.name(),
                error = %err,
                "Classifier returned unparseable output"
            );
            AgentError::EmptyResult {
                agent: self.agent.name().to_string(),
            }
        })?;

        tracing::info!(
            intent = parsed.intent.as_str(),
            language = %parsed.language,
            "Intent classified"
        );

        Ok(Classification {
            result: ClassificationResult::new(parsed.intent, parsed.language),
            raw_output: run.final_output,
            new_items: run.new_items,
        })
    }
}
