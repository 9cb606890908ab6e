use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::trace;

use crate::models::ProfileSnapshot;
use crate::traits::event_handler::ProfileEventHandler;

/// Fans profile events out to every registered handler.
///
/// A snapshot equal to the last one delivered is dropped, so handlers only
/// see actual profile changes. Errors are always forwarded.
#[derive(Default)]
pub struct CompositeEventHandler {
    handlers: Vec<Arc<dyn ProfileEventHandler>>,
    last_delivered: Mutex<Option<ProfileSnapshot>>,
}

impl CompositeEventHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_handler(mut self, handler: Arc<dyn ProfileEventHandler>) -> Self {
        self.handlers.push(handler);
        self
    }

    /// Record `snapshot` as delivered unless it repeats the previous one
    fn is_new(&self, snapshot: &ProfileSnapshot) -> bool {
        let mut last = self.last_delivered.lock();
        if last.as_ref() == Some(snapshot) {
            return false;
        }
        *last = Some(snapshot.clone());
        true
    }
}

#[async_trait]
impl ProfileEventHandler for CompositeEventHandler {
    async fn handle_profile_change(&self, snapshot: ProfileSnapshot) {
        if !self.is_new(&snapshot) {
            trace!("Profile snapshot unchanged, not forwarded");
            return;
        }

        for handler in &self.handlers {
            handler.handle_profile_change(snapshot.clone()).await;
        }
    }

    async fn handle_error(&self, error: &anyhow::Error) {
        for handler in &self.handlers {
            handler.handle_error(error).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counting {
        changes: AtomicUsize,
        errors: AtomicUsize,
    }

    #[async_trait]
    impl ProfileEventHandler for Counting {
        async fn handle_profile_change(&self, _snapshot: ProfileSnapshot) {
            self.changes.fetch_add(1, Ordering::SeqCst);
        }

        async fn handle_error(&self, _error: &anyhow::Error) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn repeated_snapshot_is_forwarded_once() {
        let first = Arc::new(Counting::default());
        let second = Arc::new(Counting::default());
        let composite = CompositeEventHandler::new()
            .with_handler(first.clone())
            .with_handler(second.clone());

        let loading = ProfileSnapshot {
            is_valid_address: true,
            is_pool_shares_loading: true,
            ..ProfileSnapshot::default()
        };
        composite.handle_profile_change(loading.clone()).await;
        composite.handle_profile_change(loading.clone()).await;
        composite.handle_profile_change(ProfileSnapshot::default()).await;
        composite.handle_profile_change(loading).await;

        assert_eq!(first.changes.load(Ordering::SeqCst), 3);
        assert_eq!(second.changes.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn errors_always_reach_every_handler() {
        let handler = Arc::new(Counting::default());
        let composite = CompositeEventHandler::new().with_handler(handler.clone());

        let error = anyhow::anyhow!("subgraph down");
        composite.handle_error(&error).await;
        composite.handle_error(&error).await;

        assert_eq!(handler.errors.load(Ordering::SeqCst), 2);
    }
}
