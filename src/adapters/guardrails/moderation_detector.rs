//! `Moderation` detector backed by a [`ModerationProvider`].

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::guardrails::{
    CheckDescriptor, GuardrailCheck, GuardrailVerdict, ModerationParams, VerdictInfo,
};
use crate::ports::{DetectorError, GuardrailDetector, ModerationProvider};

/// Trips when the provider flags the text for a watched category.
pub struct ModerationDetector {
    provider: Arc<dyn ModerationProvider>,
}

impl ModerationDetector {
    pub fn new(provider: Arc<dyn ModerationProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl GuardrailDetector for ModerationDetector {
    fn name(&self) -> &str {
        GuardrailCheck::Moderation.name()
    }

    async fn run(
        &self,
        text: &str,
        descriptor: &CheckDescriptor,
    ) -> Result<GuardrailVerdict, DetectorError> {
        let params: ModerationParams = descriptor
            .params()
            .map_err(|e| DetectorError::invalid_parameters(descriptor.name(), e.to_string()))?;

        let outcome = self
            .provider
            .moderate(text)
            .await
            .map_err(|e| DetectorError::from_ai(descriptor.name(), e))?;

        let flagged_categories: Vec<String> =
            outcome.matching(&params.categories).cloned().collect();

        Ok(GuardrailVerdict::new(
            descriptor.name(),
            !flagged_categories.is_empty(),
            VerdictInfo::Moderation { flagged_categories },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockError, MockModerationProvider};

    fn detector(provider: MockModerationProvider) -> ModerationDetector {
        ModerationDetector::new(Arc::new(provider))
    }

    #[tokio::test]
    async fn trips_on_watched_category() {
        let descriptor = CheckDescriptor::moderation(&["violence".to_string()]);
        let provider = MockModerationProvider::new().with_flagged(&["violence", "hate"]);

        let verdict = detector(provider).run("text", &descriptor).await.unwrap();

        assert!(verdict.is_tripped());
        assert_eq!(
            verdict.info(),
            &VerdictInfo::Moderation {
                flagged_categories: vec!["violence".to_string()]
            }
        );
    }

    #[tokio::test]
    async fn ignores_unwatched_category() {
        let descriptor = CheckDescriptor::moderation(&["sexual".to_string()]);
        let provider = MockModerationProvider::new().with_flagged(&["violence"]);

        let verdict = detector(provider).run("text", &descriptor).await.unwrap();

        assert!(!verdict.is_tripped());
    }

    #[tokio::test]
    async fn empty_category_list_watches_everything() {
        let descriptor = CheckDescriptor::moderation(&[]);
        let provider = MockModerationProvider::new().with_flagged(&["harassment"]);

        let verdict = detector(provider).run("text", &descriptor).await.unwrap();

        assert!(verdict.is_tripped());
    }

    #[tokio::test]
    async fn missing_key_surfaces_as_missing_credential() {
        let descriptor = CheckDescriptor::moderation(&[]);
        let provider = MockModerationProvider::new().with_error(MockError::MissingApiKey);

        let err = detector(provider).run("text", &descriptor).await.unwrap_err();

        assert!(err.is_missing_credential());
    }
}
