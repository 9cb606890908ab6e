use async_trait::async_trait;

use crate::models::AccountProfile;

/// Maps a chain address to its public identity profile
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Resolve the profile for `address`. An account without a profile
    /// resolves to an empty one.
    async fn resolve(&self, address: &str) -> anyhow::Result<AccountProfile>;
}
