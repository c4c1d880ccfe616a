//! Guardrail detector adapters.
//!
//! - `PiiDetector` - Local regex entity detection and masking
//! - `UrlFilterDetector` - Local URL allow-list filtering
//! - `ModerationDetector` - Hosted moderation classifier
//! - `LlmCheckDetector` - Model-judged checks (jailbreak, NSFW, prompt injection, custom)

mod llm_check_detector;
mod moderation_detector;
mod pii_detector;
mod url_filter_detector;

pub use llm_check_detector::LlmCheckDetector;
pub use moderation_detector::ModerationDetector;
pub use pii_detector::PiiDetector;
pub use url_filter_detector::UrlFilterDetector;
