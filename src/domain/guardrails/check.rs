//! Known guardrail check names.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A guardrail check this system knows how to name and report on.
///
/// Configs refer to checks by their display name (`"Contains PII"`), which is
/// what [`GuardrailCheck::name`] returns and [`GuardrailCheck::from_name`] accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GuardrailCheck {
    #[serde(rename = "Jailbreak")]
    Jailbreak,
    #[serde(rename = "Contains PII")]
    ContainsPii,
    #[serde(rename = "Moderation")]
    Moderation,
    #[serde(rename = "URL Filter")]
    UrlFilter,
    #[serde(rename = "NSFW Text")]
    NsfwText,
    #[serde(rename = "Custom Prompt Check")]
    CustomPromptCheck,
    #[serde(rename = "Prompt Injection Detection")]
    PromptInjectionDetection,
    #[serde(rename = "Hallucination Detection")]
    HallucinationDetection,
}

impl GuardrailCheck {
    /// Every known check.
    pub const ALL: [GuardrailCheck; 8] = [
        GuardrailCheck::Jailbreak,
        GuardrailCheck::ContainsPii,
        GuardrailCheck::Moderation,
        GuardrailCheck::UrlFilter,
        GuardrailCheck::NsfwText,
        GuardrailCheck::CustomPromptCheck,
        GuardrailCheck::PromptInjectionDetection,
        GuardrailCheck::HallucinationDetection,
    ];

    /// The name used in guardrail configs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Jailbreak => "Jailbreak",
            Self::ContainsPii => "Contains PII",
            Self::Moderation => "Moderation",
            Self::UrlFilter => "URL Filter",
            Self::NsfwText => "NSFW Text",
            Self::CustomPromptCheck => "Custom Prompt Check",
            Self::PromptInjectionDetection => "Prompt Injection Detection",
            Self::HallucinationDetection => "Hallucination Detection",
        }
    }

    /// Looks up a check by its config name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|check| check.name() == name)
    }
}

impl fmt::Display for GuardrailCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_name_round_trips_every_check() {
        for check in GuardrailCheck::ALL {
            assert_eq!(GuardrailCheck::from_name(check.name()), Some(check));
        }
    }

    #[test]
    fn from_name_is_case_sensitive() {
        assert_eq!(GuardrailCheck::from_name("jailbreak"), None);
        assert_eq!(GuardrailCheck::from_name("Toxicity"), None);
    }

    #[test]
    fn serializes_as_config_name() {
        let json = serde_json::to_string(&GuardrailCheck::ContainsPii).unwrap();
        assert_eq!(json, "\"Contains PII\"");
    }
}
