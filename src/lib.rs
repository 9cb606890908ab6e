//! Profile Tracker Library
//!
//! Aggregates everything a marketplace profile page shows about an account
//! (identity, pool shares, published assets, downloads, sales) from the
//! chain subgraphs and the metadata cache, keeping it fresh by polling.

// Public modules - these are the API surface
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod notifications;
pub mod providers;
pub mod tracker;
pub mod traits;
pub mod utils;

// Re-export commonly used items for easier access
pub use config::ProfileConfig;
pub use errors::FetchError;
pub use handlers::{CompositeEventHandler, ConsoleEventHandler};
pub use models::{
    AccountProfile, Asset, ChainId, DownloadRecord, PoolShareEntry, ProfileInputs,
    ProfileSnapshot, PublishedAssetsPage, TokenOrder,
};
pub use providers::{AquariusProvider, EnsProfileProvider, MarketOrderHistory, SubgraphProvider};
pub use tracker::{Collaborators, ProfileAggregator, REFRESH_INTERVAL};
pub use traits::{IdentityResolver, MetadataCache, OrderHistory, ProfileEventHandler, SubgraphQuery};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result type alias for library functions
pub type Result<T> = std::result::Result<T, anyhow::Error>;
