//! Guardrails domain module.
//!
//! Content-safety configuration, verdicts and the pure text logic behind the
//! local checks. Running checks against a backend is the job of the
//! `GuardrailEvaluator` in the application layer; everything here is
//! deterministic and side-effect free.
//!
//! ## Key Types
//!
//! - [`GuardrailCheck`] - The closed set of known check names
//! - [`CheckDescriptor`] / [`GuardrailConfig`] - What to run, with parameters
//! - [`GuardrailVerdict`] / [`VerdictInfo`] - One result per check
//! - [`GuardrailFailureReport`] - Structured payload for a rejected turn

mod check;
mod config;
mod failure_report;
pub mod pii;
pub mod url_filter;
mod verdict;

pub use check::GuardrailCheck;
pub use config::{
    CheckDescriptor, FailurePolicy, GuardrailConfig, LlmCheckParams, ModerationParams, PiiParams,
    UrlFilterParams, DEFAULT_CONFIDENCE_THRESHOLD,
};
pub use failure_report::{
    CheckReport, GuardrailFailureReport, HallucinationReport, ModerationReport, PiiReport,
};
pub use pii::PiiEntity;
pub use verdict::{any_tripped, extract_safe_text, GuardrailVerdict, VerdictInfo};
