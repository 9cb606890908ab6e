use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::asset::Asset;
use super::ChainId;

/// Datatoken referenced by a purchase order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDatatoken {
    pub address: String,
    pub symbol: Option<String>,
}

/// Token purchase order placed by an account
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenOrder {
    pub id: String,
    pub datatoken: OrderDatatoken,
    pub tx: String,
    /// Unix seconds
    pub created_timestamp: i64,
    pub chain_id: ChainId,
}

/// Purchase order resolved to the asset it grants access to
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadRecord {
    pub datatoken_address: String,
    pub datatoken_symbol: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub chain_id: ChainId,
    pub order_tx: String,
    pub asset: Asset,
}

impl DownloadRecord {
    /// Build a record from an order and the asset owning its datatoken
    pub fn from_order(order: &TokenOrder, asset: Asset) -> Self {
        Self {
            datatoken_address: order.datatoken.address.clone(),
            datatoken_symbol: order.datatoken.symbol.clone(),
            timestamp: DateTime::from_timestamp(order.created_timestamp, 0).unwrap_or_default(),
            chain_id: asset.chain_id,
            order_tx: order.tx.clone(),
            asset,
        }
    }
}
