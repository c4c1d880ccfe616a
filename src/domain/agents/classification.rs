//! Intent classification result.

use serde::{Deserialize, Serialize};

/// The routing decision produced by the classifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Intent {
    /// Questions about the agency itself.
    GetInformation,
    /// The user wants to start a project.
    StartProject,
    /// Anything outside the known set; kept verbatim.
    Unrecognized(String),
}

impl Intent {
    pub const GET_INFORMATION: &'static str = "get_information";
    pub const START_PROJECT: &'static str = "start_project";

    /// Parses the wire value. Unknown values are preserved, not rejected.
    pub fn parse(raw: &str) -> Self {
        match raw {
            Self::GET_INFORMATION => Intent::GetInformation,
            Self::START_PROJECT => Intent::StartProject,
            other => Intent::Unrecognized(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Intent::GetInformation => Self::GET_INFORMATION,
            Intent::StartProject => Self::START_PROJECT,
            Intent::Unrecognized(raw) => raw,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Intent::Unrecognized(_))
    }
}

impl Serialize for Intent {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Intent {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Intent::parse(&raw))
    }
}

/// Structured classifier output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub intent: Intent,
    pub language: String,
}

impl ClassificationResult {
    pub fn new(intent: Intent, language: impl Into<String>) -> Self {
        Self {
            intent,
            language: language.into(),
        }
    }
}
