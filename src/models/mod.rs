//! Data models for the profile aggregator

pub mod asset;
pub mod inputs;
pub mod order;
pub mod pool;
pub mod profile;
pub mod snapshot;

/// Network identifier (EIP-155 chain id)
pub type ChainId = u64;

// Re-export for convenience
pub use asset::{Asset, AssetDatatoken, PublishedAssetsPage};
pub use inputs::ProfileInputs;
pub use order::{DownloadRecord, OrderDatatoken, TokenOrder};
pub use pool::PoolShareEntry;
pub use profile::AccountProfile;
pub use snapshot::ProfileSnapshot;
