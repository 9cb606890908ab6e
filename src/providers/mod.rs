//! Collaborator implementations backed by HTTP services

pub mod aquarius_provider;
pub mod ens_provider;
pub mod order_history_provider;
pub mod subgraph_provider;

// Re-export for convenience
pub use aquarius_provider::AquariusProvider;
pub use ens_provider::EnsProfileProvider;
pub use order_history_provider::MarketOrderHistory;
pub use subgraph_provider::SubgraphProvider;
