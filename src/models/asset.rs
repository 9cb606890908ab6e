use serde::{Deserialize, Serialize};

use super::ChainId;

/// Datatoken attached to a published asset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetDatatoken {
    pub address: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub service_id: Option<String>,
}

/// Asset document as served by the metadata cache.
///
/// Only the fields the aggregator needs are typed; the rest of the
/// document stays in `metadata` untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,
    #[serde(default)]
    pub chain_id: ChainId,
    #[serde(default)]
    pub nft_address: String,
    #[serde(default)]
    pub datatokens: Vec<AssetDatatoken>,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl Asset {
    /// Asset title from its metadata, if any
    pub fn name(&self) -> Option<&str> {
        self.metadata.get("name")?.as_str()
    }

    /// Check if `address` is one of this asset's datatokens
    pub fn has_datatoken(&self, address: &str) -> bool {
        self.datatokens
            .iter()
            .any(|dt| dt.address.eq_ignore_ascii_case(address))
    }
}

/// One page of assets published by an account
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PublishedAssetsPage {
    pub items: Vec<Asset>,
    pub total_count: u64,
}

impl PublishedAssetsPage {
    pub fn new(items: Vec<Asset>, total_count: u64) -> Self {
        Self { items, total_count }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
