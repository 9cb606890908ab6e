use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::errors::FetchError;
use crate::models::{ChainId, DownloadRecord, TokenOrder};

/// Purchase history of an account
#[async_trait]
pub trait OrderHistory: Send + Sync {
    /// Token purchase orders placed by `address`
    async fn token_orders(&self, address: &str, chain_ids: &[ChainId]) -> anyhow::Result<Vec<TokenOrder>>;

    /// Resolve `orders` into downloadable assets. `datatokens` holds the
    /// distinct datatoken addresses referenced by the orders.
    async fn resolve_downloads(
        &self,
        datatokens: &[String],
        orders: &[TokenOrder],
        chain_ids: &[ChainId],
        cancel: &CancellationToken,
    ) -> Result<Vec<DownloadRecord>, FetchError>;
}
