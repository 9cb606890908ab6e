//! Collaborator contracts for the profile aggregator

pub mod event_handler;
pub mod identity;
pub mod metadata_cache;
pub mod order_history;
pub mod subgraph;

// Re-export for convenience
pub use event_handler::ProfileEventHandler;
pub use identity::IdentityResolver;
pub use metadata_cache::MetadataCache;
pub use order_history::OrderHistory;
pub use subgraph::SubgraphQuery;
