//! Wires the chat workflow and its handler from configuration.

use std::sync::Arc;

use crate::adapters::ai::{OpenAIConfig, OpenAIModerationProvider, OpenAIProvider};
use crate::adapters::guardrails::{
    LlmCheckDetector, ModerationDetector, PiiDetector, UrlFilterDetector,
};
use crate::adapters::tools::SubmitProjectBriefTool;
use crate::config::AppConfig;
use crate::domain::agents::catalog;
use crate::ports::{AIProvider, ChatSessionRepository, ModerationProvider, ProjectBriefRepository};

use super::agent_runner::AgentRunner;
use super::guardrail_evaluator::GuardrailEvaluator;
use super::handlers::SendChatMessageHandler;
use super::workflow::{ChatWorkflow, WorkflowAgents};

/// Builds the workflow against the OpenAI backends named in `config`.
///
/// Submitted project briefs go to `briefs`.
pub fn build_workflow(
    config: &AppConfig,
    briefs: Arc<dyn ProjectBriefRepository>,
) -> ChatWorkflow {
    let openai = OpenAIConfig::from_secret(config.ai.api_key())
        .with_base_url(config.ai.base_url.clone())
        .with_timeout(config.ai.timeout())
        .with_max_retries(config.ai.max_retries);

    let provider = Arc::new(OpenAIProvider::new(
        openai.clone().with_model(config.ai.agent_model.clone()),
    ));
    let moderation = Arc::new(OpenAIModerationProvider::new(
        openai.with_model(config.ai.moderation_model.clone()),
    ));

    build_workflow_with(provider, moderation, briefs, config)
}

/// Builds the workflow against caller-supplied backends.
///
/// Every known detector is registered; which ones run is decided by the
/// guardrail settings.
pub fn build_workflow_with(
    provider: Arc<dyn AIProvider>,
    moderation: Arc<dyn ModerationProvider>,
    briefs: Arc<dyn ProjectBriefRepository>,
    config: &AppConfig,
) -> ChatWorkflow {
    let mut evaluator = GuardrailEvaluator::new(config.guardrails.failure_policy)
        .with_detector(Arc::new(PiiDetector::new()))
        .with_detector(Arc::new(UrlFilterDetector::new()))
        .with_detector(Arc::new(ModerationDetector::new(moderation)));
    for check in LlmCheckDetector::SUPPORTED {
        evaluator = evaluator.with_detector(Arc::new(LlmCheckDetector::new(
            check,
            provider.clone(),
            config.ai.guardrail_model.clone(),
        )));
    }

    let agents = WorkflowAgents {
        classifier: catalog::classifier_agent(config.ai.classifier_model.clone()),
        information: catalog::information_agent(config.ai.agent_model.clone()),
        project: catalog::project_agent(
            config.ai.agent_model.clone(),
            Arc::new(SubmitProjectBriefTool::new(briefs)),
        ),
    };

    let runner = AgentRunner::new(provider).with_max_turns(config.workflow.max_agent_turns);

    tracing::info!(
        workflow = %config.workflow.workflow_name,
        checks = config.guardrail_config().checks().len(),
        policy = ?config.guardrails.failure_policy,
        "Chat workflow assembled"
    );

    ChatWorkflow::new(
        config.workflow.workflow_name.clone(),
        Arc::new(evaluator),
        config.guardrail_config(),
        runner,
        agents,
    )
}

/// Builds the calling-layer handler with the configured reply texts.
pub fn build_handler(
    workflow: ChatWorkflow,
    repository: Arc<dyn ChatSessionRepository>,
    config: &AppConfig,
) -> SendChatMessageHandler {
    SendChatMessageHandler::new(repository, Arc::new(workflow))
        .with_failure_message(config.workflow.generic_failure_message.clone())
        .with_guardrail_notice(config.workflow.guardrail_notice_message.clone())
}
