use serde::{Deserialize, Serialize};

use super::ChainId;

/// Liquidity position held by an account in a pool
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolShareEntry {
    pub pool_address: String,
    /// Decimal string, as reported by the subgraph
    pub shares: String,
    pub datatoken_address: Option<String>,
    pub base_token_address: Option<String>,
    pub chain_id: ChainId,
}
