use super::asset::Asset;
use super::order::DownloadRecord;
use super::pool::PoolShareEntry;
use super::profile::AccountProfile;

/// Read model published to profile views
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileSnapshot {
    pub profile: AccountProfile,
    pub pool_shares: Option<Vec<PoolShareEntry>>,
    pub is_pool_shares_loading: bool,
    pub assets: Option<Vec<Asset>>,
    pub assets_total: u64,
    pub is_valid_address: bool,
    pub downloads: Option<Vec<DownloadRecord>>,
    pub downloads_total: u64,
    pub is_downloads_loading: bool,
    pub sales_count: u64,
}

impl ProfileSnapshot {
    /// Fresh state for a newly selected account
    pub fn for_account(is_valid_address: bool, name_hint: Option<&str>) -> Self {
        let profile = match name_hint {
            Some(name) if is_valid_address => AccountProfile::with_name(name),
            _ => AccountProfile::cleared(),
        };

        Self {
            profile,
            is_valid_address,
            ..Self::default()
        }
    }

    /// Check if any polling stream is currently fetching
    pub fn is_loading(&self) -> bool {
        self.is_pool_shares_loading || self.is_downloads_loading
    }
}
