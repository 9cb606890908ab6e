use std::collections::HashMap;

use anyhow::Context;
use async_trait::async_trait;
use futures::future::try_join_all;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::models::{ChainId, OrderDatatoken, PoolShareEntry, TokenOrder};
use crate::traits::subgraph::SubgraphQuery;

/// Positions smaller than this are dust and not reported
const MIN_POOL_SHARES: &str = "0.001";

const POOL_SHARES_QUERY: &str = r#"
query PoolShares($user: String, $shares: String) {
  poolShares(where: { user: $user, shares_gt: $shares }, first: 1000) {
    id
    shares
    pool {
      id
      datatoken { address }
      baseToken { address }
    }
  }
}"#;

const USER_SALES_QUERY: &str = r#"
query UserSales($user: String) {
  users(where: { id: $user }) {
    id
    totalSales
  }
}"#;

const TOKEN_ORDERS_QUERY: &str = r#"
query OrdersData($user: String!) {
  tokenOrders(orderBy: createdTimestamp, orderDirection: desc, where: { consumer: $user }) {
    id
    datatoken { id address symbol }
    tx
    createdTimestamp
  }
}"#;

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PoolSharesData {
    pool_shares: Vec<PoolShareRow>,
}

#[derive(Debug, Deserialize)]
struct PoolShareRow {
    shares: String,
    pool: PoolRow,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PoolRow {
    id: String,
    datatoken: Option<AddressRow>,
    base_token: Option<AddressRow>,
}

#[derive(Debug, Deserialize)]
struct AddressRow {
    address: String,
}

#[derive(Debug, Deserialize)]
struct UserSalesData {
    users: Vec<UserRow>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserRow {
    total_sales: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenOrdersData {
    token_orders: Vec<TokenOrderRow>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenOrderRow {
    id: String,
    datatoken: OrderDatatokenRow,
    tx: String,
    created_timestamp: i64,
}

#[derive(Debug, Deserialize)]
struct OrderDatatokenRow {
    address: String,
    symbol: Option<String>,
}

impl PoolShareRow {
    fn into_entry(self, chain_id: ChainId) -> PoolShareEntry {
        PoolShareEntry {
            pool_address: self.pool.id,
            shares: self.shares,
            datatoken_address: self.pool.datatoken.map(|dt| dt.address),
            base_token_address: self.pool.base_token.map(|bt| bt.address),
            chain_id,
        }
    }
}

impl TokenOrderRow {
    fn into_order(self, chain_id: ChainId) -> TokenOrder {
        TokenOrder {
            id: self.id,
            datatoken: OrderDatatoken {
                address: self.datatoken.address,
                symbol: self.datatoken.symbol,
            },
            tx: self.tx,
            created_timestamp: self.created_timestamp,
            chain_id,
        }
    }
}

fn unwrap_response<T>(response: GraphQlResponse<T>) -> anyhow::Result<T> {
    if let Some(error) = response.errors.first() {
        anyhow::bail!("subgraph query failed: {}", error.message);
    }
    response
        .data
        .ok_or_else(|| anyhow::anyhow!("subgraph returned no data"))
}

/// Subgraph client fanning queries out to one endpoint per chain
pub struct SubgraphProvider {
    client: Client,
    endpoints: HashMap<ChainId, String>,
}

impl SubgraphProvider {
    /// Create a provider from chain id to GraphQL endpoint mappings
    pub fn new(endpoints: HashMap<ChainId, String>) -> Self {
        Self {
            client: Client::new(),
            endpoints,
        }
    }

    /// Endpoints for the chains we know about; unknown chains are skipped
    fn endpoints_for<'a>(&'a self, chain_ids: &[ChainId]) -> Vec<(ChainId, &'a str)> {
        chain_ids
            .iter()
            .filter_map(|chain_id| match self.endpoints.get(chain_id) {
                Some(uri) => Some((*chain_id, uri.as_str())),
                None => {
                    warn!("No subgraph configured for chain {}", chain_id);
                    None
                }
            })
            .collect()
    }

    async fn query<T: DeserializeOwned>(
        &self,
        uri: &str,
        query: &str,
        variables: serde_json::Value,
    ) -> anyhow::Result<T> {
        let response = self
            .client
            .post(uri)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await
            .with_context(|| format!("subgraph request to {} failed", uri))?
            .error_for_status()?;

        let body: GraphQlResponse<T> = response.json().await?;
        unwrap_response(body)
    }

    /// Run `query` on every selected chain
    async fn query_all<T: DeserializeOwned>(
        &self,
        chain_ids: &[ChainId],
        query: &str,
        variables: serde_json::Value,
    ) -> anyhow::Result<Vec<(ChainId, T)>> {
        let requests = self.endpoints_for(chain_ids).into_iter().map(|(chain_id, uri)| {
            let variables = variables.clone();
            async move {
                let data = self.query::<T>(uri, query, variables).await?;
                Ok::<_, anyhow::Error>((chain_id, data))
            }
        });

        try_join_all(requests).await
    }

    /// Purchase orders placed by `address` on the selected chains
    pub async fn token_orders(&self, address: &str, chain_ids: &[ChainId]) -> anyhow::Result<Vec<TokenOrder>> {
        let variables = json!({ "user": address.to_lowercase() });
        let results = self
            .query_all::<TokenOrdersData>(chain_ids, TOKEN_ORDERS_QUERY, variables)
            .await?;

        let orders: Vec<TokenOrder> = results
            .into_iter()
            .flat_map(|(chain_id, data)| {
                data.token_orders
                    .into_iter()
                    .map(move |row| row.into_order(chain_id))
            })
            .collect();

        debug!("Found {} token orders for {}", orders.len(), address);
        Ok(orders)
    }
}

#[async_trait]
impl SubgraphQuery for SubgraphProvider {
    async fn pool_shares(&self, address: &str, chain_ids: &[ChainId]) -> anyhow::Result<Vec<PoolShareEntry>> {
        let variables = json!({ "user": address.to_lowercase(), "shares": MIN_POOL_SHARES });
        let results = self
            .query_all::<PoolSharesData>(chain_ids, POOL_SHARES_QUERY, variables)
            .await?;

        Ok(results
            .into_iter()
            .flat_map(|(chain_id, data)| {
                data.pool_shares
                    .into_iter()
                    .map(move |row| row.into_entry(chain_id))
            })
            .collect())
    }

    async fn sales_count(&self, address: &str, chain_ids: &[ChainId]) -> anyhow::Result<u64> {
        let variables = json!({ "user": address.to_lowercase() });
        let results = self
            .query_all::<UserSalesData>(chain_ids, USER_SALES_QUERY, variables)
            .await?;

        let mut total = 0u64;
        for (chain_id, data) in results {
            for user in data.users {
                let sales: u64 = user
                    .total_sales
                    .parse()
                    .with_context(|| format!("invalid totalSales on chain {}", chain_id))?;
                total += sales;
            }
        }
        Ok(total)
    }
}
