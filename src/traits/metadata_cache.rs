use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::errors::FetchError;
use crate::models::{ChainId, PublishedAssetsPage};

/// Off-chain asset metadata cache
#[async_trait]
pub trait MetadataCache: Send + Sync {
    /// Assets published by `address`. Returns `FetchError::Cancelled`
    /// once `cancel` fires.
    async fn published_assets(
        &self,
        address: &str,
        chain_ids: &[ChainId],
        cancel: &CancellationToken,
    ) -> Result<PublishedAssetsPage, FetchError>;

    /// Whether a cache endpoint is configured at all
    fn is_configured(&self) -> bool {
        true
    }
}
