//! Mock moderation provider for testing.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use super::mock_provider::MockError;
use crate::ports::{AIError, ModerationOutcome, ModerationProvider};

/// Scripted moderation results; clean once the script runs out.
#[derive(Debug, Clone, Default)]
pub struct MockModerationProvider {
    outcomes: Arc<Mutex<VecDeque<Result<ModerationOutcome, MockError>>>>,
    inputs: Arc<Mutex<Vec<String>>>,
}

impl MockModerationProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues an outcome flagged for `categories`.
    pub fn with_flagged(self, categories: &[&str]) -> Self {
        self.outcomes
            .lock()
            .unwrap()
            .push_back(Ok(ModerationOutcome::flagged_for(categories.iter().copied())));
        self
    }

    /// Queues an error.
    pub fn with_error(self, error: MockError) -> Self {
        self.outcomes.lock().unwrap().push_back(Err(error));
        self
    }

    /// Texts submitted so far.
    pub fn inputs(&self) -> Vec<String> {
        self.inputs.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.inputs.lock().unwrap().len()
    }
}

#[async_trait]
impl ModerationProvider for MockModerationProvider {
    async fn moderate(&self, text: &str) -> Result<ModerationOutcome, AIError> {
        self.inputs.lock().unwrap().push(text.to_string());

        match self.outcomes.lock().unwrap().pop_front() {
            Some(Ok(outcome)) => Ok(outcome),
            Some(Err(err)) => Err(err.into()),
            None => Ok(ModerationOutcome::clean()),
        }
    }
}
