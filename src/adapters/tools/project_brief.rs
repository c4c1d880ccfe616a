//! Project Brief Tool - lets the project agent hand a collected brief to the team.
//!
//! Validated briefs go to a [`ProjectBriefRepository`]; only the reference is
//! logged. The returned reference is what the agent quotes back to the user.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::conversation::tools::{ToolCall, ToolDefinition, ToolResponse};
use crate::domain::foundation::{Timestamp, ValidationError};
use crate::ports::{AgentTool, ProjectBrief, ProjectBriefRepository, ToolExecutionError};

/// Name the model calls the tool by.
pub const SUBMIT_PROJECT_BRIEF: &str = "submit_project_brief";

// ═══════════════════════════════════════════════════════════════════════════
// Tool Parameters
// ═══════════════════════════════════════════════════════════════════════════

/// Parameters for submitting a project brief.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitProjectBriefParams {
    /// Kind of project (website, web shop, mobile app, ...)
    pub project_type: String,
    /// What should be built and for whom
    pub summary: String,
    /// Budget range in the user's words
    #[serde(default)]
    pub budget: Option<String>,
    /// Desired timeline or launch date
    #[serde(default)]
    pub timeline: Option<String>,
    /// Where the team can follow up
    #[serde(default)]
    pub contact_email: Option<String>,
}

impl SubmitProjectBriefParams {
    /// Checks required fields and the email shape.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.project_type.trim().is_empty() {
            return Err(ValidationError::empty_field("project_type"));
        }
        if self.summary.trim().is_empty() {
            return Err(ValidationError::empty_field("summary"));
        }
        if let Some(email) = self.contact_email.as_deref().map(str::trim) {
            let valid = email
                .split_once('@')
                .map(|(local, domain)| !local.is_empty() && domain.contains('.'))
                .unwrap_or(false);
            if !valid {
                return Err(ValidationError::invalid_format(
                    "contact_email",
                    "expected an address like name@example.com",
                ));
            }
        }
        Ok(())
    }

    /// Turns validated parameters into a brief under `reference`.
    pub fn into_brief(self, reference: String) -> ProjectBrief {
        ProjectBrief {
            reference,
            project_type: self.project_type,
            summary: self.summary,
            budget: self.budget,
            timeline: self.timeline,
            contact_email: self.contact_email,
            submitted_at: Timestamp::now(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Tool Results
// ═══════════════════════════════════════════════════════════════════════════

/// Result of submitting a brief.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitProjectBriefResult {
    /// Reference to quote back to the user
    pub brief_reference: String,
    /// Always "received"
    pub status: String,
}

// ═══════════════════════════════════════════════════════════════════════════
// Tool Definition
// ═══════════════════════════════════════════════════════════════════════════

/// Creates the submit_project_brief tool definition.
pub fn submit_project_brief_tool() -> ToolDefinition {
    ToolDefinition::new(
        SUBMIT_PROJECT_BRIEF,
        "Submit a project brief to the Brightline Digital team once the project type and a usable description are known.",
        serde_json::json!({
            "type": "object",
            "required": ["project_type", "summary"],
            "properties": {
                "project_type": {
                    "type": "string",
                    "description": "Type of project (e.g., 'website', 'web shop', 'mobile app', 'branding')"
                },
                "summary": {
                    "type": "string",
                    "description": "What should be built, for whom, and any must-have features"
                },
                "budget": {
                    "type": "string",
                    "description": "Budget range as stated by the user"
                },
                "timeline": {
                    "type": "string",
                    "description": "Desired timeline or launch date"
                },
                "contact_email": {
                    "type": "string",
                    "description": "Email address for follow-up"
                }
            }
        }),
    )
}

// ═══════════════════════════════════════════════════════════════════════════
// Executor
// ═══════════════════════════════════════════════════════════════════════════

/// Hands briefs submitted by the project agent to the brief repository.
#[derive(Clone)]
pub struct SubmitProjectBriefTool {
    repository: Arc<dyn ProjectBriefRepository>,
}

impl SubmitProjectBriefTool {
    pub fn new(repository: Arc<dyn ProjectBriefRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl AgentTool for SubmitProjectBriefTool {
    fn definition(&self) -> ToolDefinition {
        submit_project_brief_tool()
    }

    async fn execute(&self, call: &ToolCall) -> Result<ToolResponse, ToolExecutionError> {
        let params: SubmitProjectBriefParams = serde_json::from_value(call.parameters().clone())
            .map_err(|e| ValidationError::invalid_format("arguments", e.to_string()))?;
        params.validate()?;

        let reference = format!("BRIEF-{}", Uuid::new_v4().simple());

        self.repository
            .save(params.into_brief(reference.clone()))
            .await
            .map_err(|e| ToolExecutionError::system(e.to_string()))?;

        tracing::info!(brief_reference = %reference, "Project brief submitted");

        let result = SubmitProjectBriefResult {
            brief_reference: reference,
            status: "received".to_string(),
        };
        let data = serde_json::to_value(result)
            .map_err(|e| ToolExecutionError::system(e.to_string()))?;

        Ok(ToolResponse::success(data))
    }
}
