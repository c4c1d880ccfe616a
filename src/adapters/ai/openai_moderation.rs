//! OpenAI Moderation - Implementation of ModerationProvider over `/moderations`.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::openai_provider::{handle_response_status, http_client, map_send_error, OpenAIConfig};
use crate::ports::{AIError, ModerationOutcome, ModerationProvider};

/// Moderation client sharing the chat provider's configuration.
pub struct OpenAIModerationProvider {
    config: OpenAIConfig,
    client: Client,
}

impl OpenAIModerationProvider {
    /// `config.model` names the moderation model (e.g. "omni-moderation-latest").
    pub fn new(config: OpenAIConfig) -> Self {
        let client = http_client(config.timeout);
        Self { config, client }
    }

    fn moderations_url(&self) -> String {
        format!("{}/moderations", self.config.base_url)
    }
}

#[async_trait]
impl ModerationProvider for OpenAIModerationProvider {
    async fn moderate(&self, text: &str) -> Result<ModerationOutcome, AIError> {
        if !self.config.has_api_key() {
            return Err(AIError::MissingApiKey);
        }

        let body = ModerationRequest {
            model: &self.config.model,
            input: text,
        };

        let response = self
            .client
            .post(self.moderations_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .json(&body)
            .send()
            .await
            .map_err(|e| map_send_error(e, self.config.timeout))?;

        let parsed: ModerationResponse = handle_response_status(response)
            .await?
            .json()
            .await
            .map_err(|e| AIError::parse(format!("Failed to parse moderation response: {}", e)))?;

        into_outcome(parsed)
    }
}

fn into_outcome(response: ModerationResponse) -> Result<ModerationOutcome, AIError> {
    let result = response
        .results
        .into_iter()
        .next()
        .ok_or_else(|| AIError::parse("No results in moderation response"))?;

    Ok(ModerationOutcome {
        flagged: result.flagged,
        categories: result
            .categories
            .into_iter()
            .filter_map(|(name, hit)| hit.then_some(name))
            .collect(),
    })
}

#[derive(Debug, Serialize)]
struct ModerationRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct ModerationResponse {
    results: Vec<ModerationResult>,
}

#[derive(Debug, Deserialize)]
struct ModerationResult {
    flagged: bool,
    #[serde(default)]
    categories: BTreeMap<String, bool>,
}
