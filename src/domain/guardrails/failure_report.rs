//! Structured payload returned when the input guardrail rejects a turn.

use serde::{Deserialize, Serialize};

use super::check::GuardrailCheck;
use super::verdict::{GuardrailVerdict, VerdictInfo};

/// Outcome of a check that reports nothing beyond pass/fail.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckReport {
    pub failed: bool,
}

/// PII section: counts per entity, e.g. `"EMAIL_ADDRESS:2"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PiiReport {
    pub failed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detected_counts: Option<Vec<String>>,
}

/// Moderation section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModerationReport {
    pub failed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flagged_categories: Option<Vec<String>>,
}

/// Hallucination section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HallucinationReport {
    pub failed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

/// Per-check summary of a rejected turn.
///
/// Every known check has a section; checks that did not run report
/// `failed: false`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardrailFailureReport {
    pub pii: PiiReport,
    pub moderation: ModerationReport,
    pub jailbreak: CheckReport,
    pub hallucination: HallucinationReport,
    pub nsfw: CheckReport,
    pub url_filter: CheckReport,
    pub custom_prompt_check: CheckReport,
    pub prompt_injection: CheckReport,
}

impl GuardrailFailureReport {
    /// Builds the report from the verdicts of a guardrail run.
    pub fn from_verdicts(verdicts: &[GuardrailVerdict]) -> Self {
        let find = |check: GuardrailCheck| {
            verdicts
                .iter()
                .find(|verdict| verdict.check_name() == check.name())
        };
        let tripped = |check: GuardrailCheck| find(check).is_some_and(GuardrailVerdict::is_tripped);

        let info = |check: GuardrailCheck| find(check).map(GuardrailVerdict::info);

        let pii_counts: Vec<String> = match info(GuardrailCheck::ContainsPii) {
            Some(VerdictInfo::Pii {
                detected_entities, ..
            }) => detected_entities
                .iter()
                .filter(|(_, spans)| !spans.is_empty())
                .map(|(entity, spans)| format!("{}:{}", entity, spans.len()))
                .collect(),
            _ => Vec::new(),
        };

        let flagged_categories = match info(GuardrailCheck::Moderation) {
            Some(VerdictInfo::Moderation { flagged_categories }) => {
                Some(flagged_categories.clone())
            }
            _ => None,
        };

        let hallucination_reasoning = match info(GuardrailCheck::HallucinationDetection) {
            Some(VerdictInfo::LlmJudgement { reason, .. }) => reason.clone(),
            _ => None,
        };

        Self {
            pii: PiiReport {
                failed: !pii_counts.is_empty() || tripped(GuardrailCheck::ContainsPii),
                detected_counts: (!pii_counts.is_empty()).then_some(pii_counts),
            },
            moderation: ModerationReport {
                failed: tripped(GuardrailCheck::Moderation)
                    || flagged_categories.as_ref().is_some_and(|c| !c.is_empty()),
                flagged_categories,
            },
            jailbreak: CheckReport {
                failed: tripped(GuardrailCheck::Jailbreak),
            },
            hallucination: HallucinationReport {
                failed: tripped(GuardrailCheck::HallucinationDetection),
                reasoning: hallucination_reasoning,
            },
            nsfw: CheckReport {
                failed: tripped(GuardrailCheck::NsfwText),
            },
            url_filter: CheckReport {
                failed: tripped(GuardrailCheck::UrlFilter),
            },
            custom_prompt_check: CheckReport {
                failed: tripped(GuardrailCheck::CustomPromptCheck),
            },
            prompt_injection: CheckReport {
                failed: tripped(GuardrailCheck::PromptInjectionDetection),
            },
        }
    }

    /// Names of the sections that failed, for logging.
    pub fn failed_sections(&self) -> Vec<&'static str> {
        [
            ("pii", self.pii.failed),
            ("moderation", self.moderation.failed),
            ("jailbreak", self.jailbreak.failed),
            ("hallucination", self.hallucination.failed),
            ("nsfw", self.nsfw.failed),
            ("url_filter", self.url_filter.failed),
            ("custom_prompt_check", self.custom_prompt_check.failed),
            ("prompt_injection", self.prompt_injection.failed),
        ]
        .into_iter()
        .filter_map(|(name, failed)| failed.then_some(name))
        .collect()
    }
}
