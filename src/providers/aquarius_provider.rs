use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::errors::FetchError;
use crate::models::{Asset, ChainId, PublishedAssetsPage};
use crate::traits::metadata_cache::MetadataCache;

/// Default number of published assets per page
pub const DEFAULT_PAGE_SIZE: u32 = 9;

/// Upper bound when looking up assets by datatoken
const MAX_DATATOKEN_RESULTS: usize = 1000;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: SearchHits,
}

#[derive(Debug, Deserialize)]
struct SearchHits {
    total: SearchTotal,
    hits: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchTotal {
    value: u64,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(rename = "_source")]
    source: Asset,
}

impl SearchResponse {
    fn into_page(self) -> PublishedAssetsPage {
        let items = self.hits.hits.into_iter().map(|hit| hit.source).collect();
        PublishedAssetsPage::new(items, self.hits.total.value)
    }
}

fn published_assets_query(address: &str, chain_ids: &[ChainId], page_size: u32) -> serde_json::Value {
    json!({
        "from": 0,
        "size": page_size,
        "query": {
            "bool": {
                "filter": [
                    { "terms": { "chainId": chain_ids } },
                    { "term": { "nft.owner.keyword": address.to_lowercase() } }
                ]
            }
        },
        "sort": { "nft.created": "desc" }
    })
}

fn datatokens_query(datatokens: &[String], chain_ids: &[ChainId]) -> serde_json::Value {
    let addresses: Vec<String> = datatokens.iter().map(|dt| dt.to_lowercase()).collect();
    json!({
        "from": 0,
        "size": MAX_DATATOKEN_RESULTS.min(addresses.len().max(1)),
        "query": {
            "bool": {
                "filter": [
                    { "terms": { "chainId": chain_ids } },
                    { "terms": { "datatokens.address.keyword": addresses } }
                ]
            }
        }
    })
}

/// Client for the Aquarius metadata cache
pub struct AquariusProvider {
    client: Client,
    base_uri: Option<String>,
    page_size: u32,
}

impl AquariusProvider {
    /// Create a provider. Without a `base_uri` every lookup returns nothing.
    pub fn new(base_uri: Option<String>, page_size: u32) -> Self {
        Self {
            client: Client::new(),
            base_uri: base_uri.map(|uri| uri.trim_end_matches('/').to_string()),
            page_size,
        }
    }

    async fn search(&self, body: serde_json::Value) -> anyhow::Result<SearchResponse> {
        let base_uri = self
            .base_uri
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("metadata cache URI not configured"))?;
        let url = format!("{}/api/aquarius/assets/query", base_uri);

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("metadata cache request to {} failed", url))?
            .error_for_status()?;

        Ok(response.json().await?)
    }

    /// Assets on `chain_ids` owning any of `datatokens`
    pub async fn assets_by_datatokens(
        &self,
        datatokens: &[String],
        chain_ids: &[ChainId],
        cancel: &CancellationToken,
    ) -> Result<Vec<Asset>, FetchError> {
        if datatokens.is_empty() || chain_ids.is_empty() {
            return Ok(Vec::new());
        }

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(FetchError::Cancelled),
            response = self.search(datatokens_query(datatokens, chain_ids)) => response?,
        };

        Ok(response.into_page().items)
    }
}

#[async_trait]
impl MetadataCache for AquariusProvider {
    async fn published_assets(
        &self,
        address: &str,
        chain_ids: &[ChainId],
        cancel: &CancellationToken,
    ) -> Result<PublishedAssetsPage, FetchError> {
        if chain_ids.is_empty() {
            return Ok(PublishedAssetsPage::default());
        }

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(FetchError::Cancelled),
            response = self.search(published_assets_query(address, chain_ids, self.page_size)) => response?,
        };

        let page = response.into_page();
        debug!("Metadata cache returned {} of {} assets", page.items.len(), page.total_count);
        Ok(page)
    }

    fn is_configured(&self) -> bool {
        self.base_uri.is_some()
    }
}
