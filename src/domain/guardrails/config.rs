//! Guardrail configuration: which checks to run and with what parameters.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::check::GuardrailCheck;
use super::pii::PiiEntity;

/// Confidence a model-judged check must reach before it trips.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.7;

/// One check to run: its config name plus free-form parameters.
///
/// Parameters stay loosely typed here so that configs can name checks this
/// build has no detector for; each detector parses the subset it understands
/// through [`CheckDescriptor::params`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckDescriptor {
    name: String,
    #[serde(default)]
    parameters: Map<String, Value>,
}

impl CheckDescriptor {
    /// Creates a descriptor from a name and a parameter object.
    ///
    /// Non-object parameter values are treated as "no parameters".
    pub fn new(name: impl Into<String>, parameters: Value) -> Self {
        let parameters = match parameters {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            name: name.into(),
            parameters,
        }
    }

    /// Jailbreak detection judged by `model`.
    pub fn jailbreak(model: impl Into<String>, confidence_threshold: f64) -> Self {
        Self::new(
            GuardrailCheck::Jailbreak.name(),
            serde_json::json!({
                "model": model.into(),
                "confidence_threshold": confidence_threshold,
            }),
        )
    }

    /// PII detection over `entities`; masks when `block` is false.
    pub fn pii(block: bool, entities: &[PiiEntity]) -> Self {
        Self::new(
            GuardrailCheck::ContainsPii.name(),
            serde_json::json!({ "block": block, "entities": entities }),
        )
    }

    /// Moderation restricted to `categories` (all categories when empty).
    pub fn moderation(categories: &[String]) -> Self {
        Self::new(
            GuardrailCheck::Moderation.name(),
            serde_json::json!({ "categories": categories }),
        )
    }

    /// URL filter allowing only hosts in `allow_list`.
    pub fn url_filter(allow_list: &[String]) -> Self {
        Self::new(
            GuardrailCheck::UrlFilter.name(),
            serde_json::json!({ "url_allow_list": allow_list }),
        )
    }

    /// Returns the config name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the raw parameters.
    pub fn parameters(&self) -> &Map<String, Value> {
        &self.parameters
    }

    /// Returns the known check this descriptor names, if any.
    pub fn check(&self) -> Option<GuardrailCheck> {
        GuardrailCheck::from_name(&self.name)
    }

    /// Parses the parameters into a detector-specific type.
    pub fn params<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(Value::Object(self.parameters.clone()))
    }

    /// True for a PII check whose parameters explicitly set `block: false`.
    ///
    /// A PII check without a `block` parameter stays in the gate and never
    /// turns on redaction.
    pub fn is_masking_pii(&self) -> bool {
        self.check() == Some(GuardrailCheck::ContainsPii)
            && self.parameters.get("block") == Some(&Value::Bool(false))
    }
}

/// A named, ordered list of checks. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuardrailConfig {
    name: String,
    checks: Vec<CheckDescriptor>,
}

impl GuardrailConfig {
    /// Creates a config.
    pub fn new(name: impl Into<String>, checks: Vec<CheckDescriptor>) -> Self {
        Self {
            name: name.into(),
            checks,
        }
    }

    /// Returns the config name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the checks in evaluation order.
    pub fn checks(&self) -> &[CheckDescriptor] {
        &self.checks
    }

    /// Returns true if the config has no checks.
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// The checks that gate a turn: everything except masking-mode PII.
    pub fn gating_checks(&self) -> GuardrailConfig {
        GuardrailConfig::new(
            format!("{} (gate)", self.name),
            self.checks
                .iter()
                .filter(|check| !check.is_masking_pii())
                .cloned()
                .collect(),
        )
    }

    /// The masking-mode PII checks, or `None` if the config has none.
    pub fn pii_masking_checks(&self) -> Option<GuardrailConfig> {
        let checks: Vec<CheckDescriptor> = self
            .checks
            .iter()
            .filter(|check| check.is_masking_pii())
            .cloned()
            .collect();

        if checks.is_empty() {
            None
        } else {
            Some(GuardrailConfig::new(format!("{} (pii)", self.name), checks))
        }
    }
}

/// What to do when a single check cannot run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Record the failure and treat the check as not tripped.
    #[default]
    FailOpen,
    /// Record the failure and treat the check as tripped.
    FailClosed,
}

/// Parameters of the `Contains PII` check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PiiParams {
    #[serde(default)]
    pub block: bool,
    #[serde(default = "PiiEntity::all")]
    pub entities: Vec<PiiEntity>,
}

/// Parameters of the model-judged checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmCheckParams {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f64,
    #[serde(default)]
    pub system_prompt_details: Option<String>,
}

/// Parameters of the `Moderation` check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModerationParams {
    #[serde(default)]
    pub categories: Vec<String>,
}

/// Parameters of the `URL Filter` check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlFilterParams {
    #[serde(default)]
    pub url_allow_list: Vec<String>,
}

fn default_confidence_threshold() -> f64 {
    DEFAULT_CONFIDENCE_THRESHOLD
}
