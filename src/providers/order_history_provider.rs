use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::errors::FetchError;
use crate::models::{Asset, ChainId, DownloadRecord, TokenOrder};
use crate::traits::order_history::OrderHistory;

use super::aquarius_provider::AquariusProvider;
use super::subgraph_provider::SubgraphProvider;

/// Order history backed by the subgraphs (orders) and the metadata
/// cache (assets behind the ordered datatokens)
pub struct MarketOrderHistory {
    subgraph: Arc<SubgraphProvider>,
    metadata_cache: Arc<AquariusProvider>,
}

impl MarketOrderHistory {
    pub fn new(subgraph: Arc<SubgraphProvider>, metadata_cache: Arc<AquariusProvider>) -> Self {
        Self {
            subgraph,
            metadata_cache,
        }
    }
}

/// Pair each order with the asset owning its datatoken, newest first.
/// Orders whose asset is unknown to the cache are dropped.
pub fn match_orders_to_assets(orders: &[TokenOrder], assets: &[Asset]) -> Vec<DownloadRecord> {
    let mut records: Vec<DownloadRecord> = orders
        .iter()
        .filter_map(|order| {
            assets
                .iter()
                .find(|asset| asset.has_datatoken(&order.datatoken.address))
                .map(|asset| DownloadRecord::from_order(order, asset.clone()))
        })
        .collect();

    records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    records
}

#[async_trait]
impl OrderHistory for MarketOrderHistory {
    async fn token_orders(&self, address: &str, chain_ids: &[ChainId]) -> anyhow::Result<Vec<TokenOrder>> {
        self.subgraph.token_orders(address, chain_ids).await
    }

    async fn resolve_downloads(
        &self,
        datatokens: &[String],
        orders: &[TokenOrder],
        chain_ids: &[ChainId],
        cancel: &CancellationToken,
    ) -> Result<Vec<DownloadRecord>, FetchError> {
        if datatokens.is_empty() {
            return Ok(Vec::new());
        }

        let assets = self
            .metadata_cache
            .assets_by_datatokens(datatokens, chain_ids, cancel)
            .await?;
        debug!("Resolved {} datatokens to {} assets", datatokens.len(), assets.len());

        Ok(match_orders_to_assets(orders, &assets))
    }
}
