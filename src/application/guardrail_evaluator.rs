//! Guardrail Evaluator - runs a guardrail config against a piece of text.
//!
//! Every check in the config runs concurrently; verdicts come back in config
//! order. A check that cannot run (unknown name, bad parameters, backend
//! failure) yields an [`VerdictInfo::ExecutionFailed`] verdict whose `tripped`
//! flag follows the [`FailurePolicy`]. A missing credential is never subject
//! to the policy: it aborts the evaluation with [`GuardrailError::Configuration`].

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;
use thiserror::Error;

use crate::domain::guardrails::{
    CheckDescriptor, FailurePolicy, GuardrailConfig, GuardrailVerdict, VerdictInfo,
};
use crate::ports::{DetectorError, GuardrailDetector};

/// Evaluator-level errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GuardrailError {
    /// A check needs a credential that is not configured.
    #[error("guardrail check '{check}' cannot run: {message}")]
    Configuration { check: String, message: String },
}

/// Runs guardrail configs through registered detectors.
pub struct GuardrailEvaluator {
    detectors: HashMap<String, Arc<dyn GuardrailDetector>>,
    policy: FailurePolicy,
}

impl GuardrailEvaluator {
    pub fn new(policy: FailurePolicy) -> Self {
        Self {
            detectors: HashMap::new(),
            policy,
        }
    }

    /// Registers a detector under its check name, replacing any previous one.
    pub fn with_detector(mut self, detector: Arc<dyn GuardrailDetector>) -> Self {
        self.detectors.insert(detector.name().to_string(), detector);
        self
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    pub fn has_detector(&self, check_name: &str) -> bool {
        self.detectors.contains_key(check_name)
    }

    /// Evaluates `text` against every check in `config`.
    ///
    /// An empty config yields an empty verdict list.
    pub async fn evaluate(
        &self,
        text: &str,
        config: &GuardrailConfig,
    ) -> Result<Vec<GuardrailVerdict>, GuardrailError> {
        let outcomes = join_all(
            config
                .checks()
                .iter()
                .map(|descriptor| self.run_check(text, descriptor)),
        )
        .await;

        let mut verdicts = Vec::with_capacity(outcomes.len());
        for (descriptor, outcome) in config.checks().iter().zip(outcomes) {
            match outcome {
                Ok(verdict) => verdicts.push(verdict),
                Err(err) if err.is_missing_credential() => {
                    return Err(GuardrailError::Configuration {
                        check: descriptor.name().to_string(),
                        message: err.to_string(),
                    });
                }
                Err(err) => verdicts.push(self.failed_verdict(descriptor, err)),
            }
        }

        tracing::debug!(
            config = config.name(),
            checks = verdicts.len(),
            tripped = verdicts.iter().filter(|v| v.is_tripped()).count(),
            "Guardrails evaluated"
        );

        Ok(verdicts)
    }

    async fn run_check(
        &self,
        text: &str,
        descriptor: &CheckDescriptor,
    ) -> Result<GuardrailVerdict, DetectorError> {
        match self.detectors.get(descriptor.name()) {
            Some(detector) => detector.run(text, descriptor).await,
            None => Err(DetectorError::UnknownCheck(descriptor.name().to_string())),
        }
    }

    fn failed_verdict(&self, descriptor: &CheckDescriptor, err: DetectorError) -> GuardrailVerdict {
        let tripped = self.policy == FailurePolicy::FailClosed;

        tracing::warn!(
            check = descriptor.name(),
            error = %err,
            policy = ?self.policy,
            tripped,
            "Guardrail check failed to run"
        );

        GuardrailVerdict::new(
            descriptor.name(),
            tripped,
            VerdictInfo::ExecutionFailed {
                error: err.to_string(),
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError};
    use crate::adapters::guardrails::{LlmCheckDetector, PiiDetector, UrlFilterDetector};
    use crate::domain::guardrails::{any_tripped, GuardrailCheck, PiiEntity};
    use serde_json::json;

    fn jailbreak_detector(provider: &MockAIProvider) -> Arc<dyn GuardrailDetector> {
        Arc::new(LlmCheckDetector::new(
            GuardrailCheck::Jailbreak,
            Arc::new(provider.clone()),
            "gpt-4.1-mini",
        ))
    }

    fn evaluator(policy: FailurePolicy, provider: &MockAIProvider) -> GuardrailEvaluator {
        GuardrailEvaluator::new(policy)
            .with_detector(jailbreak_detector(provider))
            .with_detector(Arc::new(PiiDetector::new()))
            .with_detector(Arc::new(UrlFilterDetector::new()))
    }

    #[tokio::test]
    async fn empty_config_yields_no_verdicts() {
        let evaluator = evaluator(FailurePolicy::FailOpen, &MockAIProvider::new());

        let verdicts = evaluator
            .evaluate("anything", &GuardrailConfig::new("empty", vec![]))
            .await
            .unwrap();

        assert!(verdicts.is_empty());
        assert!(!any_tripped(&verdicts));
    }

    #[tokio::test]
    async fn verdicts_follow_config_order() {
        let provider = MockAIProvider::new()
            .with_response(r#"{"flagged": false, "confidence": 0.05, "reason": ""}"#);
        let config = GuardrailConfig::new(
            "all",
            vec![
                CheckDescriptor::url_filter(&[]),
                CheckDescriptor::pii(false, &PiiEntity::all()),
                CheckDescriptor::jailbreak("", 0.7),
            ],
        );

        let verdicts = evaluator(FailurePolicy::FailOpen, &provider)
            .evaluate("hello", &config)
            .await
            .unwrap();

        let names: Vec<&str> = verdicts.iter().map(|v| v.check_name()).collect();
        assert_eq!(names, vec!["URL Filter", "Contains PII", "Jailbreak"]);
    }

    #[tokio::test]
    async fn unknown_check_fails_open_by_default() {
        let config = GuardrailConfig::new(
            "h",
            vec![CheckDescriptor::new("Hallucination Detection", json!({}))],
        );

        let verdicts = evaluator(FailurePolicy::FailOpen, &MockAIProvider::new())
            .evaluate("text", &config)
            .await
            .unwrap();

        assert_eq!(verdicts.len(), 1);
        assert!(!verdicts[0].is_tripped());
        assert!(matches!(verdicts[0].info(), VerdictInfo::ExecutionFailed { .. }));
    }

    #[tokio::test]
    async fn backend_error_trips_when_fail_closed() {
        let provider = MockAIProvider::new().with_error(MockError::Unavailable {
            message: "down".to_string(),
        });
        let config = GuardrailConfig::new("j", vec![CheckDescriptor::jailbreak("", 0.7)]);

        let verdicts = evaluator(FailurePolicy::FailClosed, &provider)
            .evaluate("text", &config)
            .await
            .unwrap();

        assert!(verdicts[0].is_tripped());
        assert!(any_tripped(&verdicts));
    }

    #[tokio::test]
    async fn missing_credential_aborts_regardless_of_policy() {
        let provider = MockAIProvider::new().with_error(MockError::MissingApiKey);
        let config = GuardrailConfig::new("j", vec![CheckDescriptor::jailbreak("", 0.7)]);

        let result = evaluator(FailurePolicy::FailOpen, &provider)
            .evaluate("text", &config)
            .await;

        assert!(matches!(
            result,
            Err(GuardrailError::Configuration { ref check, .. }) if check == "Jailbreak"
        ));
    }

    #[tokio::test]
    async fn evaluation_does_not_touch_config() {
        let config =
            GuardrailConfig::new("p", vec![CheckDescriptor::pii(false, &PiiEntity::all())]);
        let before = config.clone();

        evaluator(FailurePolicy::FailOpen, &MockAIProvider::new())
            .evaluate("mail jane@example.com", &config)
            .await
            .unwrap();

        assert_eq!(config, before);
    }

    #[test]
    fn later_registration_replaces_detector() {
        let evaluator = GuardrailEvaluator::new(FailurePolicy::FailOpen)
            .with_detector(Arc::new(PiiDetector::new()))
            .with_detector(Arc::new(PiiDetector::new()));

        assert!(evaluator.has_detector("Contains PII"));
        assert!(!evaluator.has_detector("Moderation"));
        assert_eq!(evaluator.detectors.len(), 1);
    }
}
