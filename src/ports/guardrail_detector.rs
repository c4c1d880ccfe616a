//! Guardrail Detector Port - Interface for a single kind of guardrail check.
//!
//! Each detector knows how to run one check kind (PII, moderation, an
//! LLM-judged check, ...) against a piece of text, driven by the
//! parameters of a [`CheckDescriptor`].
//!
//! # Example
//!
//! ```ignore
//! struct AlwaysPass;
//!
//! #[async_trait]
//! impl GuardrailDetector for AlwaysPass {
//!     fn name(&self) -> &str { "Jailbreak" }
//!
//!     async fn run(&self, _text: &str, descriptor: &CheckDescriptor)
//!         -> Result<GuardrailVerdict, DetectorError>
//!     {
//!         Ok(GuardrailVerdict::passed(descriptor.name(), VerdictInfo::Opaque(Default::default())))
//!     }
//! }
//! ```

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::guardrails::{CheckDescriptor, GuardrailVerdict};
use crate::ports::AIError;

/// Port for running one guardrail check kind.
#[async_trait]
pub trait GuardrailDetector: Send + Sync {
    /// Check name this detector serves (e.g. "Contains PII").
    fn name(&self) -> &str;

    /// Runs the check against `text`.
    async fn run(
        &self,
        text: &str,
        descriptor: &CheckDescriptor,
    ) -> Result<GuardrailVerdict, DetectorError>;
}

/// Errors raised while running a detector.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DetectorError {
    /// No detector is registered for the check name.
    #[error("unknown guardrail check: {0}")]
    UnknownCheck(String),

    /// The descriptor's parameters could not be interpreted.
    #[error("invalid parameters for {check}: {reason}")]
    InvalidParameters {
        /// Check name.
        check: String,
        /// What was wrong.
        reason: String,
    },

    /// The backend credential is absent.
    #[error("{check} requires a configured API key")]
    MissingCredential {
        /// Check name.
        check: String,
    },

    /// The backend failed or answered with something unusable.
    #[error("{check} backend failed: {message}")]
    Backend {
        /// Check name.
        check: String,
        /// Backend error message.
        message: String,
    },
}

impl DetectorError {
    /// Creates an invalid parameters error.
    pub fn invalid_parameters(check: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameters {
            check: check.into(),
            reason: reason.into(),
        }
    }

    /// Wraps a provider error raised while running `check`.
    pub fn from_ai(check: impl Into<String>, err: AIError) -> Self {
        let check = check.into();
        if err.is_missing_credential() {
            Self::MissingCredential { check }
        } else {
            Self::Backend {
                check,
                message: err.to_string(),
            }
        }
    }

    /// Returns true if the failure is a missing credential.
    pub fn is_missing_credential(&self) -> bool {
        matches!(self, Self::MissingCredential { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_api_key_becomes_missing_credential() {
        let err = DetectorError::from_ai("Jailbreak", AIError::MissingApiKey);
        assert!(err.is_missing_credential());
        assert_eq!(err.to_string(), "Jailbreak requires a configured API key");
    }

    #[test]
    fn other_provider_errors_become_backend_failures() {
        let err = DetectorError::from_ai("Moderation", AIError::network("reset"));
        assert_eq!(
            err,
            DetectorError::Backend {
                check: "Moderation".to_string(),
                message: "network error: reset".to_string(),
            }
        );
        assert!(!err.is_missing_credential());
    }
}
