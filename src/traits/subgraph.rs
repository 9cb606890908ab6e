use async_trait::async_trait;

use crate::models::{ChainId, PoolShareEntry};

/// Queries answered by the per-chain subgraphs
#[async_trait]
pub trait SubgraphQuery: Send + Sync {
    /// Pool positions held by `address` across `chain_ids`
    async fn pool_shares(&self, address: &str, chain_ids: &[ChainId]) -> anyhow::Result<Vec<PoolShareEntry>>;

    /// Number of sales made by `address` across `chain_ids`
    async fn sales_count(&self, address: &str, chain_ids: &[ChainId]) -> anyhow::Result<u64>;
}
