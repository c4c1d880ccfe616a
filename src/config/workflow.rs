//! Workflow configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Settings of the chat workflow and its calling layer
#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowSettings {
    /// Name attached to the workflow tracing span
    #[serde(default = "default_workflow_name")]
    pub workflow_name: String,

    /// Model calls an agent may make in one run
    #[serde(default = "default_max_agent_turns")]
    pub max_agent_turns: u32,

    /// Reply shown when a turn fails for any internal reason
    #[serde(default = "default_generic_failure_message")]
    pub generic_failure_message: String,

    /// Reply shown when a guardrail rejects the message
    #[serde(default = "default_guardrail_notice_message")]
    pub guardrail_notice_message: String,
}

impl WorkflowSettings {
    /// Validate workflow configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_agent_turns == 0 {
            return Err(ValidationError::InvalidMaxTurns);
        }
        if self.generic_failure_message.trim().is_empty() {
            return Err(ValidationError::MissingRequired("GENERIC_FAILURE_MESSAGE"));
        }
        if self.guardrail_notice_message.trim().is_empty() {
            return Err(ValidationError::MissingRequired("GUARDRAIL_NOTICE_MESSAGE"));
        }
        Ok(())
    }
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            workflow_name: default_workflow_name(),
            max_agent_turns: default_max_agent_turns(),
            generic_failure_message: default_generic_failure_message(),
            guardrail_notice_message: default_guardrail_notice_message(),
        }
    }
}

fn default_workflow_name() -> String {
    "agency-chat".to_string()
}

fn default_max_agent_turns() -> u32 {
    8
}

fn default_generic_failure_message() -> String {
    "Sorry, something went wrong while handling your message. Please try again in a moment."
        .to_string()
}

fn default_guardrail_notice_message() -> String {
    "Sorry, I can't help with that request. Please rephrase your message and try again."
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workflow_defaults() {
        let settings = WorkflowSettings::default();
        assert_eq!(settings.max_agent_turns, 8);
        assert_eq!(settings.workflow_name, "agency-chat");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_zero_turns_is_invalid() {
        let settings = WorkflowSettings {
            max_agent_turns: 0,
            ..Default::default()
        };
        assert!(matches!(settings.validate(), Err(ValidationError::InvalidMaxTurns)));
    }
}
