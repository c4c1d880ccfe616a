//! `URL Filter` detector.

use async_trait::async_trait;

use crate::domain::guardrails::{
    url_filter, CheckDescriptor, GuardrailCheck, GuardrailVerdict, UrlFilterParams, VerdictInfo,
};
use crate::ports::{DetectorError, GuardrailDetector};

/// Trips when the text links to a host outside the allow list.
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlFilterDetector;

impl UrlFilterDetector {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl GuardrailDetector for UrlFilterDetector {
    fn name(&self) -> &str {
        GuardrailCheck::UrlFilter.name()
    }

    async fn run(
        &self,
        text: &str,
        descriptor: &CheckDescriptor,
    ) -> Result<GuardrailVerdict, DetectorError> {
        let params: UrlFilterParams = descriptor
            .params()
            .map_err(|e| DetectorError::invalid_parameters(descriptor.name(), e.to_string()))?;

        let scan = url_filter::scan(text, &params.url_allow_list);

        Ok(GuardrailVerdict::new(
            descriptor.name(),
            scan.has_blocked(),
            VerdictInfo::UrlFilter {
                blocked: scan.blocked,
                allowed: scan.allowed,
            },
        ))
    }
}
