//! Guardrail configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::guardrails::{
    CheckDescriptor, FailurePolicy, GuardrailConfig, PiiEntity, DEFAULT_CONFIDENCE_THRESHOLD,
};

/// Which guardrail checks run, and how.
#[derive(Debug, Clone, Deserialize)]
pub struct GuardrailSettings {
    /// Model-judged jailbreak gate
    #[serde(default = "enabled")]
    pub jailbreak_enabled: bool,

    #[serde(default = "default_threshold")]
    pub jailbreak_confidence_threshold: f64,

    /// PII detection
    #[serde(default = "enabled")]
    pub pii_enabled: bool,

    /// Block on PII instead of masking it
    #[serde(default)]
    pub pii_block: bool,

    #[serde(default = "PiiEntity::all")]
    pub pii_entities: Vec<PiiEntity>,

    /// Hosted moderation gate
    #[serde(default)]
    pub moderation_enabled: bool,

    /// Watched moderation categories (all when empty)
    #[serde(default)]
    pub moderation_categories: Vec<String>,

    /// URL allow-list gate
    #[serde(default)]
    pub url_filter_enabled: bool,

    #[serde(default)]
    pub url_allow_list: Vec<String>,

    /// Treatment of checks that fail to run
    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

impl GuardrailSettings {
    /// Validate guardrail configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(0.0..=1.0).contains(&self.jailbreak_confidence_threshold) {
            return Err(ValidationError::InvalidThreshold(
                "jailbreak_confidence_threshold",
            ));
        }
        Ok(())
    }

    /// The active guardrail config, in evaluation order.
    pub fn to_guardrail_config(&self, guardrail_model: &str) -> GuardrailConfig {
        let mut checks = Vec::new();

        if self.jailbreak_enabled {
            checks.push(CheckDescriptor::jailbreak(
                guardrail_model,
                self.jailbreak_confidence_threshold,
            ));
        }
        if self.moderation_enabled {
            checks.push(CheckDescriptor::moderation(&self.moderation_categories));
        }
        if self.url_filter_enabled {
            checks.push(CheckDescriptor::url_filter(&self.url_allow_list));
        }
        if self.pii_enabled {
            checks.push(CheckDescriptor::pii(self.pii_block, &self.pii_entities));
        }

        GuardrailConfig::new("chat input", checks)
    }
}

impl Default for GuardrailSettings {
    fn default() -> Self {
        Self {
            jailbreak_enabled: true,
            jailbreak_confidence_threshold: default_threshold(),
            pii_enabled: true,
            pii_block: false,
            pii_entities: PiiEntity::all(),
            moderation_enabled: false,
            moderation_categories: Vec::new(),
            url_filter_enabled: false,
            url_allow_list: Vec::new(),
            failure_policy: FailurePolicy::default(),
        }
    }
}

fn enabled() -> bool {
    true
}

fn default_threshold() -> f64 {
    DEFAULT_CONFIDENCE_THRESHOLD
}
