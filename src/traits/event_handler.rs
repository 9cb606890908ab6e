use async_trait::async_trait;

use crate::models::ProfileSnapshot;

/// Handler for profile state changes
#[async_trait]
pub trait ProfileEventHandler: Send + Sync {
    /// Handle a newly published snapshot
    async fn handle_profile_change(&self, snapshot: ProfileSnapshot);

    /// Handle a collaborator failure
    async fn handle_error(&self, error: &anyhow::Error);
}
