//! Chat Workflow - the per-turn orchestration pipeline.
//!
//! ```text
//! Start -> GuardrailCheck -> { Rejected | Redact } -> Classify -> Dispatch
//!                                                      |
//!                          { ProjectAgent | InformationAgent | Fallback }
//! ```
//!
//! Stages run strictly in sequence over one working history owned by the
//! invocation. `Rejected` is the only early exit; every other path ends in a
//! success result or a [`WorkflowError`].

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::Instrument;
use uuid::Uuid;

use crate::domain::agents::{Agent, ClassificationResult, Intent, RunContext};
use crate::domain::conversation::{ConversationHistory, ConversationTurn, HistoryItem};
use crate::domain::guardrails::{any_tripped, GuardrailConfig, GuardrailFailureReport};
use crate::ports::AIError;

use super::agent_runner::{AgentError, AgentRunner};
use super::guardrail_evaluator::{GuardrailError, GuardrailEvaluator};
use super::history_redactor::HistoryRedactor;
use super::intent_classifier::IntentClassifier;

/// Input of one workflow invocation.
///
/// Both fields are rewritten in place when PII masking is active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowInput {
    pub input_as_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_text: Option<String>,
}

impl WorkflowInput {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            input_as_text: text.into(),
            input_text: None,
        }
    }

    /// The raw input fields that the redactor rewrites.
    pub fn raw_fields_mut(&mut self) -> Vec<&mut String> {
        let mut fields = vec![&mut self.input_as_text];
        if let Some(text) = self.input_text.as_mut() {
            fields.push(text);
        }
        fields
    }
}

/// Outcome of a workflow invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorkflowResult {
    /// The input was rejected by a gating guardrail.
    GuardrailFailure(GuardrailFailureReport),
    /// A reply was produced.
    Success { output_text: String },
}

impl WorkflowResult {
    pub fn is_success(&self) -> bool {
        matches!(self, WorkflowResult::Success { .. })
    }

    pub fn output_text(&self) -> Option<&str> {
        match self {
            WorkflowResult::Success { output_text } => Some(output_text),
            WorkflowResult::GuardrailFailure(_) => None,
        }
    }
}

/// A finished invocation with its extended history.
#[derive(Debug, Clone)]
pub struct WorkflowRun {
    pub result: WorkflowResult,
    /// The working history: prior items (possibly redacted) plus every item
    /// this invocation appended.
    pub history: ConversationHistory,
    /// Number of items that came from the caller.
    pub prior_len: usize,
    /// Present once the Classify stage has run.
    pub classification: Option<ClassificationResult>,
}

impl WorkflowRun {
    /// Items appended by this invocation, in order.
    pub fn new_items(&self) -> &[HistoryItem] {
        self.history.items_since(self.prior_len)
    }
}

/// Fatal errors of a workflow invocation.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// A required credential is missing; nothing can run.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The classifier or an agent produced no usable output.
    #[error("{stage} produced no usable output")]
    EmptyResult { stage: String },

    #[error("{stage} failed: {source}")]
    Provider {
        stage: String,
        #[source]
        source: AIError,
    },

    #[error("{stage} exceeded {max_turns} model calls")]
    MaxTurnsExceeded { stage: String, max_turns: u32 },
}

impl From<GuardrailError> for WorkflowError {
    fn from(err: GuardrailError) -> Self {
        match err {
            GuardrailError::Configuration { .. } => WorkflowError::Configuration(err.to_string()),
        }
    }
}

impl From<AgentError> for WorkflowError {
    fn from(err: AgentError) -> Self {
        match err {
            AgentError::Provider { agent, source } if source.is_missing_credential() => {
                WorkflowError::Configuration(format!("{agent}: {source}"))
            }
            AgentError::Provider { agent, source } => WorkflowError::Provider {
                stage: agent,
                source,
            },
            AgentError::EmptyResult { agent } => WorkflowError::EmptyResult { stage: agent },
            AgentError::MaxTurnsExceeded { agent, max_turns } => {
                WorkflowError::MaxTurnsExceeded {
                    stage: agent,
                    max_turns,
                }
            }
        }
    }
}

/// The specialist agents a workflow dispatches to.
#[derive(Clone)]
pub struct WorkflowAgents {
    pub classifier: Agent,
    pub information: Agent,
    pub project: Agent,
}

/// Orchestrates guardrails, redaction, classification and dispatch.
pub struct ChatWorkflow {
    name: String,
    evaluator: Arc<GuardrailEvaluator>,
    redactor: HistoryRedactor,
    guardrails: GuardrailConfig,
    classifier: IntentClassifier,
    runner: AgentRunner,
    information_agent: Agent,
    project_agent: Agent,
}

impl ChatWorkflow {
    pub fn new(
        name: impl Into<String>,
        evaluator: Arc<GuardrailEvaluator>,
        guardrails: GuardrailConfig,
        runner: AgentRunner,
        agents: WorkflowAgents,
    ) -> Self {
        Self {
            name: name.into(),
            redactor: HistoryRedactor::new(evaluator.clone()),
            evaluator,
            guardrails,
            classifier: IntentClassifier::new(agents.classifier, runner.clone()),
            runner,
            information_agent: agents.information,
            project_agent: agents.project,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn guardrails(&self) -> &GuardrailConfig {
        &self.guardrails
    }

    /// Runs one turn.
    ///
    /// `prior` is left untouched; the extended working history is returned
    /// in the [`WorkflowRun`]. `input` fields are masked in place when a
    /// masking-mode PII check is configured.
    pub async fn run(
        &self,
        input: &mut WorkflowInput,
        prior: &ConversationHistory,
    ) -> Result<WorkflowRun, WorkflowError> {
        let trace_id = Uuid::new_v4().to_string();
        let span = tracing::info_span!(
            "chat_workflow",
            workflow_name = %self.name,
            trace_id = %trace_id
        );

        self.run_stages(input, prior, &trace_id).instrument(span).await
    }

    async fn run_stages(
        &self,
        input: &mut WorkflowInput,
        prior: &ConversationHistory,
        trace_id: &str,
    ) -> Result<WorkflowRun, WorkflowError> {
        let prior_len = prior.len();
        let mut history = prior.clone();
        history.push(ConversationTurn::user(input.input_as_text.clone()));
        tracing::debug!(prior_len, "Stage: start");

        let gating = self.guardrails.gating_checks();
        let verdicts = self.evaluator.evaluate(&input.input_as_text, &gating).await?;
        if any_tripped(&verdicts) {
            let report = GuardrailFailureReport::from_verdicts(&verdicts);
            tracing::info!(failed = ?report.failed_sections(), "Stage: rejected by guardrails");
            return Ok(WorkflowRun {
                result: WorkflowResult::GuardrailFailure(report),
                history,
                prior_len,
                classification: None,
            });
        }
        tracing::debug!(checks = verdicts.len(), "Stage: guardrails passed");

        if let Some(pii_config) = self.guardrails.pii_masking_checks() {
            let report = self
                .redactor
                .redact(&mut history, input.raw_fields_mut(), &pii_config)
                .await?;
            tracing::debug!(
                parts = report.parts_redacted,
                inputs = report.inputs_redacted,
                "Stage: redacted"
            );
        }

        let classification = self.classifier.classify(&history, trace_id).await?;
        history.extend(classification.new_items);
        let result = classification.result;
        tracing::debug!(intent = result.intent.as_str(), "Stage: classified");

        let output_text = match &result.intent {
            Intent::StartProject => {
                let context = RunContext::with_language(result.language.clone());
                self.dispatch(&self.project_agent, &mut history, &context, trace_id)
                    .await?
            }
            Intent::GetInformation => {
                self.dispatch(&self.information_agent, &mut history, &RunContext::new(), trace_id)
                    .await?
            }
            Intent::Unrecognized(raw) => {
                tracing::warn!(
                    intent = %raw,
                    "Classifier returned an unrecognized intent, replying with its raw output"
                );
                classification.raw_output
            }
        };

        Ok(WorkflowRun {
            result: WorkflowResult::Success { output_text },
            history,
            prior_len,
            classification: Some(result),
        })
    }

    async fn dispatch(
        &self,
        agent: &Agent,
        history: &mut ConversationHistory,
        context: &RunContext,
        trace_id: &str,
    ) -> Result<String, WorkflowError> {
        tracing::debug!(agent = agent.name(), "Stage: dispatch");
        let run = self.runner.run(agent, history, context, trace_id).await?;
        history.extend(run.new_items);
        Ok(run.final_output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError};
    use crate::adapters::guardrails::{LlmCheckDetector, PiiDetector};
    use crate::adapters::storage::InMemoryProjectBriefRepository;
    use crate::adapters::tools::SubmitProjectBriefTool;
    use crate::domain::agents::catalog;
    use crate::domain::guardrails::{CheckDescriptor, FailurePolicy, GuardrailCheck, PiiEntity};

    const CLEAN: &str = r#"{"flagged": false, "confidence": 0.02, "reason": ""}"#;

    fn workflow(provider: &MockAIProvider, guardrails: GuardrailConfig) -> ChatWorkflow {
        let ai: Arc<MockAIProvider> = Arc::new(provider.clone());
        let evaluator = GuardrailEvaluator::new(FailurePolicy::FailOpen)
            .with_detector(Arc::new(PiiDetector::new()))
            .with_detector(Arc::new(LlmCheckDetector::new(
                GuardrailCheck::Jailbreak,
                ai.clone(),
                "gpt-4.1-mini",
            )));
        let brief_tool =
            SubmitProjectBriefTool::new(Arc::new(InMemoryProjectBriefRepository::new()));
        let agents = WorkflowAgents {
            classifier: catalog::classifier_agent("gpt-4.1-mini"),
            information: catalog::information_agent("gpt-4.1"),
            project: catalog::project_agent("gpt-4.1", Arc::new(brief_tool)),
        };

        ChatWorkflow::new(
            "test-workflow",
            Arc::new(evaluator),
            guardrails,
            AgentRunner::new(ai),
            agents,
        )
    }

    fn jailbreak_and_masking() -> GuardrailConfig {
        GuardrailConfig::new(
            "chat input",
            vec![
                CheckDescriptor::jailbreak("", 0.7),
                CheckDescriptor::pii(false, &PiiEntity::all()),
            ],
        )
    }

    #[tokio::test]
    async fn start_project_runs_project_agent_with_language() {
        let provider = MockAIProvider::new()
            .with_response_for("Jailbreak", CLEAN)
            .with_response_for(
                catalog::CLASSIFIER_AGENT_NAME,
                r#"{"intent": "start_project", "language": "German"}"#,
            )
            .with_response_for(catalog::PROJECT_AGENT_NAME, "Erzählen Sie mir mehr!");
        let workflow = workflow(&provider, jailbreak_and_masking());
        let mut input = WorkflowInput::new("Wir brauchen eine App");

        let run = workflow
            .run(&mut input, &ConversationHistory::new())
            .await
            .unwrap();

        assert_eq!(run.result.output_text(), Some("Erzählen Sie mir mehr!"));
        assert_eq!(provider.calls_for(catalog::PROJECT_AGENT_NAME), 1);
        assert_eq!(provider.calls_for(catalog::INFORMATION_AGENT_NAME), 0);
        let project_call = provider
            .get_calls()
            .into_iter()
            .find(|c| c.metadata.caller == catalog::PROJECT_AGENT_NAME)
            .unwrap();
        assert!(project_call
            .system_prompt
            .unwrap_or_default()
            .contains("Always reply in German"));
    }

    #[tokio::test]
    async fn unrecognized_intent_returns_raw_output_without_agents() {
        let raw = r#"{"intent": "small_talk", "language": "English"}"#;
        let provider = MockAIProvider::new()
            .with_response_for("Jailbreak", CLEAN)
            .with_response_for(catalog::CLASSIFIER_AGENT_NAME, raw);
        let workflow = workflow(&provider, jailbreak_and_masking());

        let run = workflow
            .run(&mut WorkflowInput::new("hey"), &ConversationHistory::new())
            .await
            .unwrap();

        assert_eq!(run.result.output_text(), Some(raw));
        assert_eq!(provider.calls_for(catalog::PROJECT_AGENT_NAME), 0);
        assert_eq!(provider.calls_for(catalog::INFORMATION_AGENT_NAME), 0);
        assert_eq!(
            run.classification.map(|c| c.intent),
            Some(Intent::Unrecognized("small_talk".to_string()))
        );
    }

    #[tokio::test]
    async fn raw_input_fields_are_masked_in_place() {
        let provider = MockAIProvider::new()
            .with_response_for("Jailbreak", CLEAN)
            .with_response_for(
                catalog::CLASSIFIER_AGENT_NAME,
                r#"{"intent": "get_information", "language": "English"}"#,
            )
            .with_response_for(catalog::INFORMATION_AGENT_NAME, "We will reach out.");
        let workflow = workflow(&provider, jailbreak_and_masking());
        let mut input = WorkflowInput {
            input_as_text: "Reach me at joe@example.com".to_string(),
            input_text: Some("joe@example.com".to_string()),
        };

        let run = workflow
            .run(&mut input, &ConversationHistory::new())
            .await
            .unwrap();

        assert_eq!(input.input_as_text, "Reach me at <EMAIL_ADDRESS>");
        assert_eq!(input.input_text.as_deref(), Some("<EMAIL_ADDRESS>"));
        let user_turn = run.new_items()[0].as_turn().unwrap();
        assert_eq!(user_turn.text(), "Reach me at <EMAIL_ADDRESS>");
        let classifier_call = provider
            .get_calls()
            .into_iter()
            .find(|c| c.metadata.caller == catalog::CLASSIFIER_AGENT_NAME)
            .unwrap();
        let seen = serde_json::to_string(&classifier_call.items).unwrap();
        assert!(!seen.contains("joe@example.com"));
    }

    #[tokio::test]
    async fn prior_history_is_not_modified() {
        let provider = MockAIProvider::new()
            .with_response_for("Jailbreak", CLEAN)
            .with_response_for(
                catalog::CLASSIFIER_AGENT_NAME,
                r#"{"intent": "get_information", "language": "English"}"#,
            );
        let workflow = workflow(&provider, jailbreak_and_masking());
        let mut prior = ConversationHistory::new();
        prior.push(ConversationTurn::user("My email is jane@example.com"));
        let snapshot = prior.clone();

        let run = workflow
            .run(&mut WorkflowInput::new("And your offices?"), &prior)
            .await
            .unwrap();

        assert_eq!(prior, snapshot);
        assert_eq!(run.prior_len, 1);
        assert!(!run.history.turns().next().unwrap().text().contains("jane@example.com"));
    }

    #[tokio::test]
    async fn missing_agent_credential_is_configuration_error() {
        let provider = MockAIProvider::new()
            .with_response_for("Jailbreak", CLEAN)
            .with_error_for(catalog::CLASSIFIER_AGENT_NAME, MockError::MissingApiKey);
        let workflow = workflow(&provider, jailbreak_and_masking());

        let err = workflow
            .run(&mut WorkflowInput::new("hi"), &ConversationHistory::new())
            .await
            .unwrap_err();

        assert!(matches!(err, WorkflowError::Configuration(_)));
    }

    #[tokio::test]
    async fn provider_outage_in_agent_is_fatal() {
        let provider = MockAIProvider::new()
            .with_response_for("Jailbreak", CLEAN)
            .with_response_for(
                catalog::CLASSIFIER_AGENT_NAME,
                r#"{"intent": "get_information", "language": "English"}"#,
            )
            .with_error_for(
                catalog::INFORMATION_AGENT_NAME,
                MockError::Unavailable {
                    message: "503".to_string(),
                },
            );
        let workflow = workflow(&provider, jailbreak_and_masking());

        let err = workflow
            .run(&mut WorkflowInput::new("hi"), &ConversationHistory::new())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            WorkflowError::Provider { ref stage, .. } if stage == catalog::INFORMATION_AGENT_NAME
        ));
    }

    #[test]
    fn results_serialize_with_type_tag() {
        let success = WorkflowResult::Success {
            output_text: "hi".to_string(),
        };
        let json = serde_json::to_value(&success).unwrap();
        assert_eq!(json["type"], "success");
        assert_eq!(json["output_text"], "hi");

        let failure = WorkflowResult::GuardrailFailure(GuardrailFailureReport::default());
        let json = serde_json::to_value(&failure).unwrap();
        assert_eq!(json["type"], "guardrail_failure");
        assert_eq!(json["jailbreak"]["failed"], false);
    }
}
