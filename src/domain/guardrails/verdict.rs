//! Guardrail verdicts and the helpers that read them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Check-specific detail attached to a verdict.
///
/// Known detectors get their own shape; anything else lands in `Opaque`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VerdictInfo {
    /// PII detection. `checked_text` is the input with detected spans masked.
    Pii {
        detected_entities: BTreeMap<String, Vec<String>>,
        checked_text: String,
        blocked: bool,
    },
    /// Moderation backend result.
    Moderation { flagged_categories: Vec<String> },
    /// A model-judged check (jailbreak, NSFW, prompt injection, custom prompt).
    LlmJudgement {
        flagged: bool,
        confidence: f64,
        threshold: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
    /// URL allow-list filtering.
    UrlFilter {
        blocked: Vec<String>,
        allowed: Vec<String>,
    },
    /// The check could not run; the failure policy decided `tripped`.
    ExecutionFailed { error: String },
    /// Detail from a detector without a dedicated shape.
    Opaque(Map<String, Value>),
}

impl VerdictInfo {
    /// The rewritten text, for checks that produce one.
    pub fn checked_text(&self) -> Option<&str> {
        match self {
            Self::Pii { checked_text, .. } => Some(checked_text),
            Self::Opaque(map) => map.get("checked_text").and_then(Value::as_str),
            _ => None,
        }
    }
}

/// The result of running one check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuardrailVerdict {
    check_name: String,
    tripped: bool,
    info: VerdictInfo,
}

impl GuardrailVerdict {
    /// Creates a verdict.
    pub fn new(check_name: impl Into<String>, tripped: bool, info: VerdictInfo) -> Self {
        Self {
            check_name: check_name.into(),
            tripped,
            info,
        }
    }

    /// Creates a verdict that did not trip.
    pub fn passed(check_name: impl Into<String>, info: VerdictInfo) -> Self {
        Self::new(check_name, false, info)
    }

    /// Creates a verdict that tripped.
    pub fn tripped(check_name: impl Into<String>, info: VerdictInfo) -> Self {
        Self::new(check_name, true, info)
    }

    /// The config name of the check that produced this verdict.
    pub fn check_name(&self) -> &str {
        &self.check_name
    }

    /// Whether the check's tripwire fired.
    pub fn is_tripped(&self) -> bool {
        self.tripped
    }

    /// Check-specific detail.
    pub fn info(&self) -> &VerdictInfo {
        &self.info
    }
}

/// True if any verdict tripped. An empty list never trips.
pub fn any_tripped(verdicts: &[GuardrailVerdict]) -> bool {
    verdicts.iter().any(GuardrailVerdict::is_tripped)
}

/// The first rewritten text exposed by a verdict, or `fallback` unchanged.
pub fn extract_safe_text(verdicts: &[GuardrailVerdict], fallback: &str) -> String {
    verdicts
        .iter()
        .find_map(|verdict| verdict.info().checked_text())
        .unwrap_or(fallback)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn pii_verdict(checked: &str) -> GuardrailVerdict {
        GuardrailVerdict::passed(
            "Contains PII",
            VerdictInfo::Pii {
                detected_entities: BTreeMap::new(),
                checked_text: checked.to_string(),
                blocked: false,
            },
        )
    }

    fn judgement(tripped: bool) -> GuardrailVerdict {
        GuardrailVerdict::new(
            "Jailbreak",
            tripped,
            VerdictInfo::LlmJudgement {
                flagged: tripped,
                confidence: 0.9,
                threshold: 0.7,
                reason: None,
            },
        )
    }

    #[test]
    fn empty_verdicts_never_trip() {
        assert!(!any_tripped(&[]));
    }

    #[test]
    fn one_tripped_verdict_trips_all() {
        assert!(any_tripped(&[judgement(false), judgement(true)]));
        assert!(!any_tripped(&[judgement(false), pii_verdict("x")]));
    }

    #[test]
    fn safe_text_falls_back_without_rewrites() {
        assert_eq!(extract_safe_text(&[judgement(false)], "original"), "original");
        assert_eq!(extract_safe_text(&[], "original"), "original");
    }

    #[test]
    fn safe_text_takes_first_rewrite() {
        let verdicts = vec![judgement(false), pii_verdict("first"), pii_verdict("second")];
        assert_eq!(extract_safe_text(&verdicts, "original"), "first");
    }

    #[test]
    fn opaque_info_can_expose_checked_text() {
        let mut map = Map::new();
        map.insert("checked_text".to_string(), Value::String("masked".to_string()));
        let verdict = GuardrailVerdict::passed("Future Check", VerdictInfo::Opaque(map));

        assert_eq!(extract_safe_text(&[verdict], "raw"), "masked");
    }

    #[test]
    fn info_serializes_with_kind_tag() {
        let json = serde_json::to_value(judgement(true).info()).unwrap();

        assert_eq!(json["kind"], "llm_judgement");
        assert_eq!(json["flagged"], true);
        assert!(json.get("reason").is_none());
    }

    fn arb_verdict() -> impl Strategy<Value = GuardrailVerdict> {
        (any::<bool>(), prop::option::of("[a-z ]{0,12}")).prop_map(|(tripped, checked)| {
            match checked {
                Some(text) => GuardrailVerdict::new(
                    "Contains PII",
                    tripped,
                    VerdictInfo::Pii {
                        detected_entities: BTreeMap::new(),
                        checked_text: text,
                        blocked: tripped,
                    },
                ),
                None => GuardrailVerdict::new(
                    "Moderation",
                    tripped,
                    VerdictInfo::Moderation {
                        flagged_categories: Vec::new(),
                    },
                ),
            }
        })
    }

    proptest! {
        #[test]
        fn any_tripped_is_logical_or(verdicts in prop::collection::vec(arb_verdict(), 0..8)) {
            let expected = verdicts.iter().filter(|v| v.is_tripped()).count() > 0;
            prop_assert_eq!(any_tripped(&verdicts), expected);
        }

        #[test]
        fn safe_text_is_deterministic(
            verdicts in prop::collection::vec(arb_verdict(), 0..8),
            fallback in "[a-z]{0,10}",
        ) {
            let first = extract_safe_text(&verdicts, &fallback);
            let second = extract_safe_text(&verdicts, &fallback);
            prop_assert_eq!(first, second);
        }
    }
}
