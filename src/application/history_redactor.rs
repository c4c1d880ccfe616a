//! History Redactor - masks PII across the working history and raw inputs.
//!
//! Runs the masking-mode PII config over every text-bearing content part,
//! oldest turn first, then over the raw input fields of the current turn.
//! Only `text` values change; turn count, part count and part kinds are kept.

use std::sync::Arc;

use crate::domain::conversation::ConversationHistory;
use crate::domain::guardrails::{extract_safe_text, GuardrailConfig};

use super::guardrail_evaluator::{GuardrailError, GuardrailEvaluator};

/// Counts of rewritten spans.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RedactionReport {
    /// Content parts whose text changed.
    pub parts_redacted: usize,
    /// Raw input fields whose text changed.
    pub inputs_redacted: usize,
}

impl RedactionReport {
    pub fn changed_anything(&self) -> bool {
        self.parts_redacted + self.inputs_redacted > 0
    }
}

/// Applies PII masking in place.
#[derive(Clone)]
pub struct HistoryRedactor {
    evaluator: Arc<GuardrailEvaluator>,
}

impl HistoryRedactor {
    pub fn new(evaluator: Arc<GuardrailEvaluator>) -> Self {
        Self { evaluator }
    }

    /// Masks PII in `history` and in each of `raw_inputs`.
    ///
    /// `pii_config` is expected to hold only masking-mode PII checks.
    pub async fn redact(
        &self,
        history: &mut ConversationHistory,
        raw_inputs: Vec<&mut String>,
        pii_config: &GuardrailConfig,
    ) -> Result<RedactionReport, GuardrailError> {
        let mut report = RedactionReport::default();

        for turn in history.turns_mut() {
            for part in turn.content_mut() {
                if !part.kind().is_text_bearing() {
                    continue;
                }
                if let Some(masked) = self.masked(part.text(), pii_config).await? {
                    part.replace_text(masked);
                    report.parts_redacted += 1;
                }
            }
        }

        for field in raw_inputs {
            if let Some(masked) = self.masked(field, pii_config).await? {
                *field = masked;
                report.inputs_redacted += 1;
            }
        }

        if report.changed_anything() {
            tracing::debug!(
                parts = report.parts_redacted,
                inputs = report.inputs_redacted,
                "PII redacted from history"
            );
        }

        Ok(report)
    }

    /// The masked text, or `None` when nothing changed.
    async fn masked(
        &self,
        text: &str,
        pii_config: &GuardrailConfig,
    ) -> Result<Option<String>, GuardrailError> {
        let verdicts = self.evaluator.evaluate(text, pii_config).await?;
        let safe = extract_safe_text(&verdicts, text);
        Ok((safe != text).then_some(safe))
    }
}
