use async_trait::async_trait;
use tracing::{info, warn};

use crate::models::ProfileSnapshot;
use crate::traits::event_handler::ProfileEventHandler;
use crate::utils::helper::sales_label;

/// Console logging event handler
pub struct ConsoleEventHandler {
    account_id: String,
}

impl ConsoleEventHandler {
    /// Create a console handler labelling output with `account_id`
    pub fn new(account_id: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
        }
    }

    fn format_snapshot(&self, snapshot: &ProfileSnapshot) -> Vec<String> {
        let mut lines = Vec::new();

        lines.push(format!("Account: {}", snapshot.profile.display_name(&self.account_id)));
        if !snapshot.is_valid_address {
            lines.push("  (not a valid chain address)".to_string());
            return lines;
        }

        if let Some(description) = &snapshot.profile.description {
            lines.push(format!("  Bio: {}", description));
        }

        let pool_shares = match &snapshot.pool_shares {
            Some(shares) => shares.len().to_string(),
            None => "-".to_string(),
        };
        lines.push(format!(
            "  Pool shares: {}{}",
            pool_shares,
            if snapshot.is_pool_shares_loading { " (loading)" } else { "" }
        ));
        lines.push(format!("  Published assets: {}", snapshot.assets_total));
        lines.push(format!(
            "  Downloads: {}{}",
            snapshot.downloads_total,
            if snapshot.is_downloads_loading { " (loading)" } else { "" }
        ));
        lines.push(format!("  {}", sales_label(snapshot.sales_count)));

        lines
    }
}

#[async_trait]
impl ProfileEventHandler for ConsoleEventHandler {
    async fn handle_profile_change(&self, snapshot: ProfileSnapshot) {
        info!("{}", "-".repeat(60));
        for line in self.format_snapshot(&snapshot) {
            info!("{}", line);
        }
    }

    async fn handle_error(&self, error: &anyhow::Error) {
        warn!("Profile aggregator error for {}: {}", self.account_id, error);
    }
}
