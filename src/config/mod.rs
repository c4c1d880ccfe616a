//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `AGENCY_ASSISTANT` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use agency_assistant::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Classifier model: {}", config.ai.classifier_model);
//! ```

mod ai;
mod error;
mod guardrails;
mod workflow;

pub use ai::AiConfig;
pub use error::{ConfigError, ValidationError};
pub use guardrails::GuardrailSettings;
pub use workflow::WorkflowSettings;

use serde::Deserialize;

use crate::domain::guardrails::GuardrailConfig;

/// Plain environment variable accepted for the credential.
const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// AI provider configuration (OpenAI)
    #[serde(default)]
    pub ai: AiConfig,

    /// Guardrail checks
    #[serde(default)]
    pub guardrails: GuardrailSettings,

    /// Workflow and reply settings
    #[serde(default)]
    pub workflow: WorkflowSettings,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `AGENCY_ASSISTANT` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Falls back to `OPENAI_API_KEY` for the credential
    ///
    /// # Environment Variable Format
    ///
    /// - `AGENCY_ASSISTANT__AI__AGENT_MODEL=gpt-4.1` -> `ai.agent_model = "gpt-4.1"`
    /// - `AGENCY_ASSISTANT__GUARDRAILS__URL_ALLOW_LIST=a.com,b.com` -> list of two hosts
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    /// A missing credential is reported by [`AppConfig::validate`], not here.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let mut config: AppConfig = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("AGENCY_ASSISTANT")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("guardrails.pii_entities")
                    .with_list_parse_key("guardrails.moderation_categories")
                    .with_list_parse_key("guardrails.url_allow_list"),
            )
            .build()?
            .try_deserialize()?;

        if !config.ai.has_openai() {
            config.ai.openai_api_key = std::env::var(OPENAI_API_KEY_VAR).ok();
        }

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the credential is missing, a threshold is
    /// outside `[0, 1]`, or the agent turn bound is zero.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.ai.validate()?;
        self.guardrails.validate()?;
        self.workflow.validate()?;
        Ok(())
    }

    /// The active guardrail config.
    pub fn guardrail_config(&self) -> GuardrailConfig {
        self.guardrails
            .to_guardrail_config(&self.ai.guardrail_model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::guardrails::{FailurePolicy, PiiEntity};
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: [&str; 7] = [
        "AGENCY_ASSISTANT__AI__OPENAI_API_KEY",
        "AGENCY_ASSISTANT__AI__AGENT_MODEL",
        "AGENCY_ASSISTANT__GUARDRAILS__PII_BLOCK",
        "AGENCY_ASSISTANT__GUARDRAILS__URL_ALLOW_LIST",
        "AGENCY_ASSISTANT__GUARDRAILS__FAILURE_POLICY",
        "AGENCY_ASSISTANT__WORKFLOW__MAX_AGENT_TURNS",
        "OPENAI_API_KEY",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("AGENCY_ASSISTANT__AI__OPENAI_API_KEY", "sk-test");
        env::set_var("AGENCY_ASSISTANT__AI__AGENT_MODEL", "gpt-4o");
        env::set_var("AGENCY_ASSISTANT__WORKFLOW__MAX_AGENT_TURNS", "4");
        let result = AppConfig::load();
        clear_env();

        let config = result.expect("config loads");
        assert_eq!(config.ai.openai_api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.ai.agent_model, "gpt-4o");
        assert_eq!(config.workflow.max_agent_turns, 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_guardrail_settings_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("AGENCY_ASSISTANT__GUARDRAILS__PII_BLOCK", "true");
        env::set_var(
            "AGENCY_ASSISTANT__GUARDRAILS__URL_ALLOW_LIST",
            "brightline.example,docs.example",
        );
        env::set_var("AGENCY_ASSISTANT__GUARDRAILS__FAILURE_POLICY", "fail_closed");
        let result = AppConfig::load();
        clear_env();

        let config = result.expect("config loads");
        assert!(config.guardrails.pii_block);
        assert_eq!(
            config.guardrails.url_allow_list,
            vec!["brightline.example", "docs.example"]
        );
        assert_eq!(config.guardrails.failure_policy, FailurePolicy::FailClosed);
    }

    #[test]
    fn test_plain_openai_key_is_accepted() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("OPENAI_API_KEY", "sk-plain");
        let result = AppConfig::load();
        clear_env();

        assert_eq!(result.unwrap().ai.openai_api_key.as_deref(), Some("sk-plain"));
    }

    #[test]
    fn test_missing_key_fails_validation() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        let config = result.expect("loading never requires the key");
        assert!(matches!(
            config.validate(),
            Err(ValidationError::MissingRequired("OPENAI_API_KEY"))
        ));
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert!(config.guardrails.jailbreak_enabled);
        assert!(!config.guardrails.pii_block);
        assert_eq!(config.guardrails.pii_entities, PiiEntity::all());
        assert_eq!(config.guardrail_config().checks().len(), 2);
    }
}
