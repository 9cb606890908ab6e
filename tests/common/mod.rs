#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use profile_tracker::models::{AssetDatatoken, OrderDatatoken};
use profile_tracker::{
    AccountProfile, Asset, ChainId, Collaborators, DownloadRecord, FetchError, IdentityResolver,
    MetadataCache, OrderHistory, PoolShareEntry, ProfileAggregator, ProfileEventHandler,
    ProfileSnapshot, PublishedAssetsPage, SubgraphQuery, TokenOrder, REFRESH_INTERVAL,
};

pub const ACCOUNT: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";
pub const OTHER_ACCOUNT: &str = "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359";

/// Let spawned tasks run until they block on a timer
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}

async fn delay(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}

pub fn asset(id: &str) -> Asset {
    Asset {
        id: id.to_string(),
        chain_id: 1,
        ..Asset::default()
    }
}

pub fn order(datatoken: &str) -> TokenOrder {
    TokenOrder {
        id: format!("order-{}", datatoken),
        datatoken: OrderDatatoken {
            address: datatoken.to_string(),
            symbol: None,
        },
        tx: "0xtx".to_string(),
        created_timestamp: 1_650_000_000,
        chain_id: 1,
    }
}

pub struct SpyIdentity {
    pub calls: AtomicUsize,
    pub profile: Mutex<AccountProfile>,
    pub fail: AtomicBool,
    pub delay: Mutex<Duration>,
}

impl SpyIdentity {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            profile: Mutex::new(AccountProfile::default()),
            fail: AtomicBool::new(false),
            delay: Mutex::new(Duration::ZERO),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityResolver for SpyIdentity {
    async fn resolve(&self, _address: &str) -> anyhow::Result<AccountProfile> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let wait = *self.delay.lock().unwrap();
        delay(wait).await;

        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("identity service unavailable");
        }
        Ok(self.profile.lock().unwrap().clone())
    }
}

pub struct SpySubgraph {
    pub pool_share_calls: Mutex<Vec<Vec<ChainId>>>,
    pub pool_shares_delay: Mutex<Duration>,
    pub sales_calls: AtomicUsize,
    pub sales: Mutex<Result<u64, String>>,
    pub sales_delay: Mutex<Duration>,
}

impl SpySubgraph {
    pub fn new() -> Self {
        Self {
            pool_share_calls: Mutex::new(Vec::new()),
            pool_shares_delay: Mutex::new(Duration::ZERO),
            sales_calls: AtomicUsize::new(0),
            sales: Mutex::new(Ok(0)),
            sales_delay: Mutex::new(Duration::ZERO),
        }
    }

    pub fn pool_share_calls(&self) -> usize {
        self.pool_share_calls.lock().unwrap().len()
    }

    pub fn sales_calls(&self) -> usize {
        self.sales_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SubgraphQuery for SpySubgraph {
    async fn pool_shares(&self, _address: &str, chain_ids: &[ChainId]) -> anyhow::Result<Vec<PoolShareEntry>> {
        self.pool_share_calls.lock().unwrap().push(chain_ids.to_vec());
        let wait = *self.pool_shares_delay.lock().unwrap();
        delay(wait).await;

        Ok(chain_ids
            .iter()
            .map(|chain_id| PoolShareEntry {
                pool_address: format!("pool-{}", chain_id),
                shares: "1.0".to_string(),
                chain_id: *chain_id,
                ..PoolShareEntry::default()
            })
            .collect())
    }

    async fn sales_count(&self, _address: &str, _chain_ids: &[ChainId]) -> anyhow::Result<u64> {
        self.sales_calls.fetch_add(1, Ordering::SeqCst);
        let sales = self.sales.lock().unwrap().clone();
        let wait = *self.sales_delay.lock().unwrap();
        delay(wait).await;

        sales.map_err(|msg| anyhow::anyhow!(msg))
    }
}

pub struct SpyMetadataCache {
    pub configured: AtomicBool,
    pub calls: Mutex<Vec<String>>,
    pub tokens: Mutex<Vec<CancellationToken>>,
    pub delay: Mutex<Duration>,
    pub pages: Mutex<HashMap<String, PublishedAssetsPage>>,
}

impl SpyMetadataCache {
    pub fn new() -> Self {
        Self {
            configured: AtomicBool::new(true),
            calls: Mutex::new(Vec::new()),
            tokens: Mutex::new(Vec::new()),
            delay: Mutex::new(Duration::ZERO),
            pages: Mutex::new(HashMap::new()),
        }
    }

    pub fn set_page(&self, account: &str, page: PublishedAssetsPage) {
        self.pages.lock().unwrap().insert(account.to_string(), page);
    }

    pub fn calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn token(&self, index: usize) -> CancellationToken {
        self.tokens.lock().unwrap()[index].clone()
    }
}

#[async_trait]
impl MetadataCache for SpyMetadataCache {
    async fn published_assets(
        &self,
        address: &str,
        _chain_ids: &[ChainId],
        cancel: &CancellationToken,
    ) -> Result<PublishedAssetsPage, FetchError> {
        self.calls.lock().unwrap().push(address.to_string());
        self.tokens.lock().unwrap().push(cancel.clone());

        // Resolves late even when cancelled
        let wait = *self.delay.lock().unwrap();
        delay(wait).await;

        Ok(self.pages.lock().unwrap().get(address).cloned().unwrap_or_default())
    }

    fn is_configured(&self) -> bool {
        self.configured.load(Ordering::SeqCst)
    }
}

pub struct SpyOrderHistory {
    pub orders: Mutex<Vec<TokenOrder>>,
    pub order_calls: AtomicUsize,
    pub resolve_calls: Mutex<Vec<Vec<String>>>,
    pub resolve_tokens: Mutex<Vec<CancellationToken>>,
    pub resolve_delay: Mutex<Duration>,
}

impl SpyOrderHistory {
    pub fn new() -> Self {
        Self {
            orders: Mutex::new(Vec::new()),
            order_calls: AtomicUsize::new(0),
            resolve_calls: Mutex::new(Vec::new()),
            resolve_tokens: Mutex::new(Vec::new()),
            resolve_delay: Mutex::new(Duration::ZERO),
        }
    }

    pub fn order_calls(&self) -> usize {
        self.order_calls.load(Ordering::SeqCst)
    }

    pub fn resolve_token(&self, index: usize) -> CancellationToken {
        self.resolve_tokens.lock().unwrap()[index].clone()
    }
}

#[async_trait]
impl OrderHistory for SpyOrderHistory {
    async fn token_orders(&self, _address: &str, _chain_ids: &[ChainId]) -> anyhow::Result<Vec<TokenOrder>> {
        self.order_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.orders.lock().unwrap().clone())
    }

    async fn resolve_downloads(
        &self,
        datatokens: &[String],
        orders: &[TokenOrder],
        _chain_ids: &[ChainId],
        cancel: &CancellationToken,
    ) -> Result<Vec<DownloadRecord>, FetchError> {
        self.resolve_calls.lock().unwrap().push(datatokens.to_vec());
        self.resolve_tokens.lock().unwrap().push(cancel.clone());

        // Resolves late even when cancelled
        let wait = *self.resolve_delay.lock().unwrap();
        delay(wait).await;

        Ok(orders
            .iter()
            .map(|order| {
                let asset = Asset {
                    id: format!("did:{}", order.datatoken.address),
                    datatokens: vec![AssetDatatoken {
                        address: order.datatoken.address.clone(),
                        ..AssetDatatoken::default()
                    }],
                    ..asset("")
                };
                DownloadRecord::from_order(order, asset)
            })
            .collect())
    }
}

pub struct RecordingHandler {
    pub snapshots: Mutex<Vec<ProfileSnapshot>>,
    pub errors: Mutex<Vec<String>>,
}

impl RecordingHandler {
    pub fn new() -> Self {
        Self {
            snapshots: Mutex::new(Vec::new()),
            errors: Mutex::new(Vec::new()),
        }
    }

    pub fn snapshots(&self) -> Vec<ProfileSnapshot> {
        self.snapshots.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProfileEventHandler for RecordingHandler {
    async fn handle_profile_change(&self, snapshot: ProfileSnapshot) {
        self.snapshots.lock().unwrap().push(snapshot);
    }

    async fn handle_error(&self, error: &anyhow::Error) {
        self.errors.lock().unwrap().push(format!("{:#}", error));
    }
}

/// Spy collaborators plus a recording handler
pub struct Harness {
    pub identity: Arc<SpyIdentity>,
    pub subgraph: Arc<SpySubgraph>,
    pub metadata_cache: Arc<SpyMetadataCache>,
    pub order_history: Arc<SpyOrderHistory>,
    pub handler: Arc<RecordingHandler>,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            identity: Arc::new(SpyIdentity::new()),
            subgraph: Arc::new(SpySubgraph::new()),
            metadata_cache: Arc::new(SpyMetadataCache::new()),
            order_history: Arc::new(SpyOrderHistory::new()),
            handler: Arc::new(RecordingHandler::new()),
        }
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            identity: self.identity.clone(),
            subgraph: self.subgraph.clone(),
            metadata_cache: self.metadata_cache.clone(),
            order_history: self.order_history.clone(),
        }
    }

    /// Aggregator with the default refresh interval, reporting to `handler`
    pub fn aggregator(&self) -> ProfileAggregator {
        ProfileAggregator::with_event_handler(self.collaborators(), REFRESH_INTERVAL, self.handler.clone())
    }
}
