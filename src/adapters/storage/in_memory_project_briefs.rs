//! In-Memory Project Brief Repository
//!
//! Holds submitted briefs in memory for tests and the development binary.
//! Nothing is ever evicted, so it is not meant for a long-running deployment.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::ports::{ProjectBrief, ProjectBriefRepository, RepositoryError};

/// In-memory brief store
#[derive(Debug, Clone, Default)]
pub struct InMemoryProjectBriefRepository {
    briefs: Arc<RwLock<Vec<ProjectBrief>>>,
}

impl InMemoryProjectBriefRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Briefs received so far, oldest first
    pub async fn briefs(&self) -> Vec<ProjectBrief> {
        self.briefs.read().await.clone()
    }
}

#[async_trait]
impl ProjectBriefRepository for InMemoryProjectBriefRepository {
    async fn save(&self, brief: ProjectBrief) -> Result<(), RepositoryError> {
        self.briefs.write().await.push(brief);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Timestamp;

    fn brief(reference: &str) -> ProjectBrief {
        ProjectBrief {
            reference: reference.to_string(),
            project_type: "website".to_string(),
            summary: "Portfolio for a photographer".to_string(),
            budget: None,
            timeline: None,
            contact_email: None,
            submitted_at: Timestamp::now(),
        }
    }

    #[tokio::test]
    async fn saved_briefs_are_listed_in_order() {
        let repo = InMemoryProjectBriefRepository::new();

        repo.save(brief("BRIEF-1")).await.unwrap();
        repo.save(brief("BRIEF-2")).await.unwrap();

        let refs: Vec<String> = repo.briefs().await.into_iter().map(|b| b.reference).collect();
        assert_eq!(refs, vec!["BRIEF-1", "BRIEF-2"]);
    }

    #[tokio::test]
    async fn clones_share_storage() {
        let repo = InMemoryProjectBriefRepository::new();
        let handle = repo.clone();

        handle.save(brief("BRIEF-9")).await.unwrap();

        assert_eq!(repo.briefs().await.len(), 1);
    }
}
