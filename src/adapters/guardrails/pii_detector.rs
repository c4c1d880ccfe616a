//! `Contains PII` detector backed by the local entity patterns.

use async_trait::async_trait;

use crate::domain::guardrails::{
    pii, CheckDescriptor, GuardrailCheck, GuardrailVerdict, PiiParams, VerdictInfo,
};
use crate::ports::{DetectorError, GuardrailDetector};

/// Detects PII without any network call.
///
/// In masking mode (`block: false`) it never trips; the masked text travels in
/// the verdict info for the redactor to pick up.
#[derive(Debug, Clone, Copy, Default)]
pub struct PiiDetector;

impl PiiDetector {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl GuardrailDetector for PiiDetector {
    fn name(&self) -> &str {
        GuardrailCheck::ContainsPii.name()
    }

    async fn run(
        &self,
        text: &str,
        descriptor: &CheckDescriptor,
    ) -> Result<GuardrailVerdict, DetectorError> {
        let params: PiiParams = descriptor
            .params()
            .map_err(|e| DetectorError::invalid_parameters(descriptor.name(), e.to_string()))?;

        let scan = pii::scan(text, &params.entities);
        let tripped = params.block && scan.found_any();

        if scan.found_any() {
            tracing::debug!(
                entities = ?scan.detected.keys().collect::<Vec<_>>(),
                block = params.block,
                "PII detected"
            );
        }

        Ok(GuardrailVerdict::new(
            descriptor.name(),
            tripped,
            VerdictInfo::Pii {
                detected_entities: scan.detected,
                checked_text: scan.masked_text,
                blocked: tripped,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::guardrails::PiiEntity;
    use serde_json::json;

    #[tokio::test]
    async fn masking_mode_never_trips_but_masks() {
        let descriptor = CheckDescriptor::pii(false, &PiiEntity::all());

        let verdict = PiiDetector::new()
            .run("My email is jane@example.com", &descriptor)
            .await
            .unwrap();

        assert!(!verdict.is_tripped());
        assert_eq!(
            verdict.info().checked_text(),
            Some("My email is <EMAIL_ADDRESS>")
        );
    }

    #[tokio::test]
    async fn blocking_mode_trips_on_detection() {
        let descriptor = CheckDescriptor::pii(true, &[PiiEntity::EmailAddress]);

        let verdict = PiiDetector::new()
            .run("reach me at jane@example.com", &descriptor)
            .await
            .unwrap();

        assert!(verdict.is_tripped());
        match verdict.info() {
            VerdictInfo::Pii { blocked, detected_entities, .. } => {
                assert!(*blocked);
                assert_eq!(detected_entities["EMAIL_ADDRESS"], vec!["jane@example.com"]);
            }
            other => panic!("unexpected info: {:?}", other),
        }
    }

    #[tokio::test]
    async fn blocking_mode_passes_clean_text() {
        let descriptor = CheckDescriptor::pii(true, &PiiEntity::all());

        let verdict = PiiDetector::new()
            .run("What are your office locations?", &descriptor)
            .await
            .unwrap();

        assert!(!verdict.is_tripped());
    }

    #[tokio::test]
    async fn unknown_entity_is_invalid_parameters() {
        let descriptor = CheckDescriptor::new("Contains PII", json!({"entities": ["SHOE_SIZE"]}));

        let result = PiiDetector::new().run("x", &descriptor).await;

        assert!(matches!(result, Err(DetectorError::InvalidParameters { .. })));
    }
}
