use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::errors::FetchError;
use crate::models::{ChainId, DownloadRecord, ProfileInputs, ProfileSnapshot};
use crate::notifications::NotificationQueue;
use crate::traits::{
    event_handler::ProfileEventHandler,
    identity::IdentityResolver,
    metadata_cache::MetadataCache,
    order_history::OrderHistory,
    subgraph::SubgraphQuery,
};
use crate::utils::helper::is_valid_address;

use super::downloads::distinct_datatokens;

/// Delay between two fetches of a polling stream
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(10);

/// External services the aggregator reads from
#[derive(Clone)]
pub struct Collaborators {
    pub identity: Arc<dyn IdentityResolver>,
    pub subgraph: Arc<dyn SubgraphQuery>,
    pub metadata_cache: Arc<dyn MetadataCache>,
    pub order_history: Arc<dyn OrderHistory>,
}

#[derive(Debug, Clone, Copy)]
enum PollingStream {
    PoolShares,
    Downloads,
}

impl PollingStream {
    fn name(self) -> &'static str {
        match self {
            PollingStream::PoolShares => "pool shares",
            PollingStream::Downloads => "downloads",
        }
    }
}

/// Inputs a stream was started under. Results are applied only while
/// `generation` is still the aggregator's current one.
#[derive(Clone)]
struct StreamContext {
    account: String,
    chain_ids: Vec<ChainId>,
    generation: u64,
    cancel: CancellationToken,
}

impl StreamContext {
    /// Same inputs, cancelled by `cancel` instead of the session token
    fn with_cancel(&self, cancel: CancellationToken) -> Self {
        Self {
            cancel,
            ..self.clone()
        }
    }
}

struct Session {
    inputs: ProfileInputs,
    context: StreamContext,
    /// Child of `context.cancel`, replaced whenever the name hint changes
    identity: CancellationToken,
}

struct Shared {
    collaborators: Collaborators,
    refresh_interval: Duration,
    state: watch::Sender<ProfileSnapshot>,
    generation: AtomicU64,
    notifications: Option<NotificationQueue>,
}

/// Aggregates everything a profile page shows about one account.
///
/// Every call to [`set_inputs`](Self::set_inputs) with a new account or
/// chain set tears down the running streams and starts a fresh session:
/// identity, published assets and sales count are fetched once, pool
/// shares and downloads are polled every `refresh_interval`. Failures
/// are logged and leave the last good value in place.
pub struct ProfileAggregator {
    shared: Arc<Shared>,
    session: Mutex<Option<Session>>,
}

impl ProfileAggregator {
    /// Create an aggregator with no active account
    pub fn new(collaborators: Collaborators, refresh_interval: Duration) -> Self {
        Self::build(collaborators, refresh_interval, None)
    }

    /// Create an aggregator forwarding snapshots and errors to `handler`.
    /// Must be called from within a Tokio runtime.
    pub fn with_event_handler(
        collaborators: Collaborators,
        refresh_interval: Duration,
        handler: Arc<dyn ProfileEventHandler>,
    ) -> Self {
        Self::build(collaborators, refresh_interval, Some(NotificationQueue::new(handler)))
    }

    fn build(
        collaborators: Collaborators,
        refresh_interval: Duration,
        notifications: Option<NotificationQueue>,
    ) -> Self {
        let refresh_interval = if refresh_interval.is_zero() {
            warn!("Zero refresh interval requested, using {}s", REFRESH_INTERVAL.as_secs());
            REFRESH_INTERVAL
        } else {
            refresh_interval
        };

        let (state, _) = watch::channel(ProfileSnapshot::default());

        Self {
            shared: Arc::new(Shared {
                collaborators,
                refresh_interval,
                state,
                generation: AtomicU64::new(0),
                notifications,
            }),
            session: Mutex::new(None),
        }
    }

    /// Current read model
    pub fn snapshot(&self) -> ProfileSnapshot {
        self.shared.state.borrow().clone()
    }

    /// Receiver notified on every snapshot change
    pub fn subscribe(&self) -> watch::Receiver<ProfileSnapshot> {
        self.shared.state.subscribe()
    }

    /// Inputs of the running session, if any
    pub fn inputs(&self) -> Option<ProfileInputs> {
        self.session.lock().as_ref().map(|session| session.inputs.clone())
    }

    /// Point the aggregator at an account and chain set.
    ///
    /// Setting the same account and chains again keeps the running streams
    /// and their timers; only a changed name hint is applied.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    pub fn set_inputs(&self, inputs: ProfileInputs) {
        let mut session = self.session.lock();

        if let Some(current) = session.as_mut() {
            if current.inputs == inputs {
                debug!(account = %inputs.account_id, "Profile inputs unchanged");
                return;
            }
            if current.inputs.same_key(&inputs) {
                self.update_name_hint(current, inputs.account_name_hint.clone());
                current.inputs = inputs;
                return;
            }
        }

        if let Some(previous) = session.take() {
            debug!(account = %previous.context.account, "Tearing down profile streams");
            previous.context.cancel.cancel();
        }

        // Bump before resetting so late completions of the old session fail the guard
        let generation = self.shared.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let is_valid = is_valid_address(&inputs.account_id);

        self.shared.replace(ProfileSnapshot::for_account(
            is_valid,
            inputs.account_name_hint.as_deref(),
        ));

        let context = StreamContext {
            account: inputs.account_id.clone(),
            chain_ids: inputs.chain_list(),
            generation,
            cancel: CancellationToken::new(),
        };
        let identity = context.cancel.child_token();

        if is_valid {
            self.start_streams(&context, &identity, inputs.account_name_hint.as_deref());
        } else if !inputs.account_id.is_empty() {
            debug!(account = %inputs.account_id, "Not a valid chain address, profile cleared");
        }

        *session = Some(Session {
            inputs,
            context,
            identity,
        });
    }

    /// Switch to another account, keeping the selected chains
    pub fn set_account(&self, account_id: impl Into<String>, account_name_hint: Option<String>) {
        let chain_ids = self.inputs().map(|inputs| inputs.chain_ids).unwrap_or_default();
        self.set_inputs(ProfileInputs::new(account_id, account_name_hint, chain_ids));
    }

    /// Change the selected chains, keeping the account
    pub fn set_chain_ids(&self, chain_ids: impl IntoIterator<Item = ChainId>) {
        let current = self.inputs().unwrap_or_default();
        self.set_inputs(ProfileInputs::new(
            current.account_id,
            current.account_name_hint,
            chain_ids,
        ));
    }

    /// Stop all streams. The last snapshot stays readable with its loading
    /// flags cleared, and no further updates are applied until new inputs
    /// are set.
    pub fn dispose(&self) {
        let mut session = self.session.lock();
        self.shared.generation.fetch_add(1, Ordering::SeqCst);

        if let Some(previous) = session.take() {
            previous.context.cancel.cancel();
            info!(account = %previous.context.account, "Profile aggregator disposed");
        }

        self.shared.clear_loading();
    }

    /// Apply a changed name hint without restarting the session. Any identity
    /// lookup still in flight is cancelled so it cannot overwrite the hint.
    fn update_name_hint(&self, session: &mut Session, name_hint: Option<String>) {
        session.identity.cancel();
        session.identity = session.context.cancel.child_token();

        let context = &session.context;
        if !is_valid_address(&context.account) {
            return;
        }

        match name_hint {
            Some(name) => {
                info!(account = %context.account, name = %name, "Name found");
                self.shared.apply(context, |snapshot| {
                    snapshot.profile.name = Some(name);
                });
            }
            None => {
                let identity = context.with_cancel(session.identity.clone());
                tokio::spawn(self.shared.clone().resolve_identity(identity));
            }
        }
    }

    fn start_streams(&self, context: &StreamContext, identity: &CancellationToken, name_hint: Option<&str>) {
        let shared = &self.shared;
        info!(
            account = %context.account,
            chains = ?context.chain_ids,
            "Starting profile streams"
        );

        match name_hint {
            Some(name) => info!(account = %context.account, name = %name, "Name found"),
            None => {
                tokio::spawn(shared.clone().resolve_identity(context.with_cancel(identity.clone())));
            }
        }

        if context.chain_ids.is_empty() {
            debug!(account = %context.account, "No chains selected, skipping pool shares and sales");
        } else {
            tokio::spawn(shared.clone().poll(context.clone(), PollingStream::PoolShares));
            tokio::spawn(shared.clone().fetch_sales_count(context.clone()));
        }

        tokio::spawn(shared.clone().fetch_published_assets(context.clone()));

        if shared.collaborators.metadata_cache.is_configured() {
            tokio::spawn(shared.clone().poll(context.clone(), PollingStream::Downloads));
        } else {
            debug!("Metadata cache not configured, skipping downloads");
        }
    }
}

impl Drop for ProfileAggregator {
    fn drop(&mut self) {
        self.dispose();
        if let Some(notifications) = &self.shared.notifications {
            notifications.shutdown();
        }
    }
}

impl Shared {
    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    fn replace(&self, snapshot: ProfileSnapshot) {
        self.state.send_replace(snapshot.clone());
        self.publish(snapshot);
    }

    /// Apply `update` if `context` is neither stale nor cancelled. Returns
    /// whether the snapshot changed.
    fn apply<F>(&self, context: &StreamContext, update: F) -> bool
    where
        F: FnOnce(&mut ProfileSnapshot),
    {
        let applied = self.state.send_if_modified(|snapshot| {
            if !self.is_current(context.generation) || context.cancel.is_cancelled() {
                return false;
            }
            update(snapshot);
            true
        });

        if applied {
            self.publish(self.state.borrow().clone());
        }
        applied
    }

    fn clear_loading(&self) {
        let cleared = self.state.send_if_modified(|snapshot| {
            let was_loading = snapshot.is_pool_shares_loading || snapshot.is_downloads_loading;
            snapshot.is_pool_shares_loading = false;
            snapshot.is_downloads_loading = false;
            was_loading
        });

        if cleared {
            self.publish(self.state.borrow().clone());
        }
    }

    fn publish(&self, snapshot: ProfileSnapshot) {
        if let Some(notifications) = &self.notifications {
            notifications.notify_profile_change(snapshot);
        }
    }

    fn report_failure(&self, operation: &str, context: &StreamContext, error: anyhow::Error) {
        if !self.is_current(context.generation) || context.cancel.is_cancelled() {
            debug!(account = %context.account, "Ignoring {} failure from a stale session", operation);
            return;
        }

        error!(account = %context.account, "Error fetching {}: {:#}", operation, error);
        if let Some(notifications) = &self.notifications {
            notifications.notify_error(&error.context(format!("{} for {}", operation, context.account)));
        }
    }

    async fn resolve_identity(self: Arc<Self>, context: StreamContext) {
        let result = tokio::select! {
            biased;
            _ = context.cancel.cancelled() => return,
            result = self.collaborators.identity.resolve(&context.account) => result,
        };

        match result {
            Ok(profile) => {
                debug!("Identity profile for {}: {:?}", context.account, profile);
                self.apply(&context, |snapshot| snapshot.profile = profile);
            }
            Err(e) => self.report_failure("identity profile", &context, e),
        }
    }

    async fn poll(self: Arc<Self>, context: StreamContext, stream: PollingStream) {
        let mut ticker = interval(self.refresh_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut first = true;

        loop {
            tokio::select! {
                biased;
                _ = context.cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }

            if !first {
                debug!(
                    "Re-fetching {} after {}s",
                    stream.name(),
                    self.refresh_interval.as_secs_f64()
                );
            }
            first = false;

            match stream {
                PollingStream::PoolShares => self.refresh_pool_shares(&context).await,
                PollingStream::Downloads => self.refresh_downloads(&context).await,
            }
        }

        debug!(account = %context.account, "Stopped polling {}", stream.name());
    }

    async fn refresh_pool_shares(&self, context: &StreamContext) {
        if !self.apply(context, |snapshot| snapshot.is_pool_shares_loading = true) {
            return;
        }

        let result = tokio::select! {
            biased;
            _ = context.cancel.cancelled() => return,
            result = self.collaborators.subgraph.pool_shares(&context.account, &context.chain_ids) => result,
        };

        match result {
            Ok(pool_shares) => {
                let count = pool_shares.len();
                if self.apply(context, |snapshot| {
                    snapshot.pool_shares = Some(pool_shares);
                    snapshot.is_pool_shares_loading = false;
                }) {
                    debug!("Fetched {} pool shares for {}", count, context.account);
                }
            }
            Err(e) => {
                self.report_failure("pool shares", context, e);
                self.apply(context, |snapshot| snapshot.is_pool_shares_loading = false);
            }
        }
    }

    async fn refresh_downloads(&self, context: &StreamContext) {
        if !self.apply(context, |snapshot| snapshot.is_downloads_loading = true) {
            return;
        }

        let result = tokio::select! {
            biased;
            _ = context.cancel.cancelled() => return,
            result = self.fetch_downloads(context) => result,
        };

        match result {
            Ok(downloads) => {
                let count = downloads.len();
                if self.apply(context, |snapshot| {
                    snapshot.downloads_total = count as u64;
                    snapshot.downloads = Some(downloads);
                    snapshot.is_downloads_loading = false;
                }) {
                    debug!("Fetched {} download orders for {}", count, context.account);
                }
            }
            Err(FetchError::Cancelled) => {
                debug!(account = %context.account, "Downloads request cancelled");
            }
            Err(FetchError::Request(e)) => {
                self.report_failure("downloads", context, e);
                self.apply(context, |snapshot| snapshot.is_downloads_loading = false);
            }
        }
    }

    async fn fetch_downloads(&self, context: &StreamContext) -> Result<Vec<DownloadRecord>, FetchError> {
        let history = &self.collaborators.order_history;

        let orders = history.token_orders(&context.account, &context.chain_ids).await?;
        let datatokens = distinct_datatokens(&orders);

        history
            .resolve_downloads(&datatokens, &orders, &context.chain_ids, &context.cancel)
            .await
    }

    async fn fetch_published_assets(self: Arc<Self>, context: StreamContext) {
        let result = tokio::select! {
            biased;
            _ = context.cancel.cancelled() => return,
            result = self.collaborators.metadata_cache.published_assets(
                &context.account,
                &context.chain_ids,
                &context.cancel,
            ) => result,
        };

        match result {
            Ok(page) => {
                let total = page.total_count;
                if self.apply(&context, |snapshot| {
                    snapshot.assets = Some(page.items);
                    snapshot.assets_total = page.total_count;
                }) {
                    debug!("Fetched {} assets for {}", total, context.account);
                }
            }
            Err(FetchError::Cancelled) => {
                debug!(account = %context.account, "Published assets request cancelled");
            }
            Err(FetchError::Request(e)) => self.report_failure("published assets", &context, e),
        }
    }

    async fn fetch_sales_count(self: Arc<Self>, context: StreamContext) {
        let result = tokio::select! {
            biased;
            _ = context.cancel.cancelled() => return,
            result = self.collaborators.subgraph.sales_count(&context.account, &context.chain_ids) => result,
        };

        match result {
            Ok(sales) => {
                if self.apply(&context, |snapshot| snapshot.sales_count = sales) {
                    debug!("Fetched sales number for {}: {}", context.account, sales);
                }
            }
            Err(e) => self.report_failure("sales count", &context, e),
        }
    }
}

