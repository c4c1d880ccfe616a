//! AI provider configuration

use secrecy::Secret;
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Upper bound for `max_retries`.
pub const MAX_RETRIES_LIMIT: u32 = 10;

/// AI provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// OpenAI API key (the one required credential)
    pub openai_api_key: Option<String>,

    /// API root
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model for the intent classifier
    #[serde(default = "default_classifier_model")]
    pub classifier_model: String,

    /// Model for the specialist agents
    #[serde(default = "default_agent_model")]
    pub agent_model: String,

    /// Model for model-judged guardrail checks
    #[serde(default = "default_guardrail_model")]
    pub guardrail_model: String,

    /// Moderation endpoint model
    #[serde(default = "default_moderation_model")]
    pub moderation_model: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum retries on transient failures
    #[serde(default)]
    pub max_retries: u32,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if OpenAI is configured
    pub fn has_openai(&self) -> bool {
        self.openai_api_key
            .as_ref()
            .is_some_and(|k| !k.trim().is_empty())
    }

    /// The key wrapped for handing to adapters; empty when absent.
    pub fn api_key(&self) -> Secret<String> {
        Secret::new(self.openai_api_key.clone().unwrap_or_default())
    }

    /// Validate AI configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.has_openai() {
            return Err(ValidationError::MissingRequired("OPENAI_API_KEY"));
        }

        if !(self.base_url.starts_with("https://") || self.base_url.starts_with("http://")) {
            return Err(ValidationError::InvalidBaseUrl);
        }

        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }

        if self.max_retries > MAX_RETRIES_LIMIT {
            return Err(ValidationError::TooManyRetries(MAX_RETRIES_LIMIT));
        }

        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            base_url: default_base_url(),
            classifier_model: default_classifier_model(),
            agent_model: default_agent_model(),
            guardrail_model: default_guardrail_model(),
            moderation_model: default_moderation_model(),
            timeout_secs: default_timeout(),
            max_retries: 0,
        }
    }
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_classifier_model() -> String {
    "gpt-4.1-mini".to_string()
}

fn default_agent_model() -> String {
    "gpt-4.1".to_string()
}

fn default_guardrail_model() -> String {
    "gpt-4.1-mini".to_string()
}

fn default_moderation_model() -> String {
    "omni-moderation-latest".to_string()
}

fn default_timeout() -> u64 {
    60
}
