//! Project Brief Repository Port - where submitted project briefs are handed off.
//!
//! The project agent's brief tool validates what the model collected and
//! passes it here; the sales team reads briefs from whatever store backs
//! this port.

use async_trait::async_trait;

use crate::domain::foundation::Timestamp;

use super::chat_session_repository::RepositoryError;

/// Port for persisting project briefs.
#[async_trait]
pub trait ProjectBriefRepository: Send + Sync {
    /// Stores one brief. The reference is already assigned.
    async fn save(&self, brief: ProjectBrief) -> Result<(), RepositoryError>;
}

/// A validated brief, ready for the sales team.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectBrief {
    pub reference: String,
    pub project_type: String,
    pub summary: String,
    pub budget: Option<String>,
    pub timeline: Option<String>,
    pub contact_email: Option<String>,
    pub submitted_at: Timestamp,
}
