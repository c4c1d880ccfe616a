//! Moderation Provider Port - content classification against harm categories.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::ports::AIError;

/// Port for a hosted moderation classifier.
#[async_trait]
pub trait ModerationProvider: Send + Sync {
    /// Classifies `text`, returning every category it was flagged for.
    async fn moderate(&self, text: &str) -> Result<ModerationOutcome, AIError>;
}

/// Result of a moderation call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModerationOutcome {
    /// Whether the provider flagged the text at all.
    pub flagged: bool,
    /// Categories the text was flagged for (e.g. "hate", "violence").
    pub categories: Vec<String>,
}

impl ModerationOutcome {
    /// An outcome with nothing flagged.
    pub fn clean() -> Self {
        Self::default()
    }

    /// An outcome flagged for the given categories.
    pub fn flagged_for(categories: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            flagged: true,
            categories: categories.into_iter().map(Into::into).collect(),
        }
    }

    /// Flagged categories that appear in `watched`.
    ///
    /// An empty watch list watches every category.
    pub fn matching<'a>(&'a self, watched: &'a [String]) -> impl Iterator<Item = &'a String> + 'a {
        self.categories
            .iter()
            .filter(move |c| watched.is_empty() || watched.iter().any(|w| w == *c))
    }
}
