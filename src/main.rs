use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use profile_tracker::{
    AquariusProvider, Collaborators, CompositeEventHandler, ConsoleEventHandler,
    EnsProfileProvider, MarketOrderHistory, ProfileAggregator, ProfileConfig, SubgraphProvider,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_level(true)
        .with_target(false)
        .init();

    let config = ProfileConfig::from_env()?;

    info!("Initializing profile tracker v{}...", profile_tracker::VERSION);
    info!("Account: {}", config.account_id);
    info!("Chains: {:?}", config.chain_ids);
    info!("Refresh interval: {:?}", config.refresh_interval);

    if config.metadata_cache_uri.is_none() {
        warn!("METADATA_CACHE_URI not set, published assets and downloads are disabled");
    }
    if config.subgraph_uris.is_empty() {
        warn!("SUBGRAPH_URIS not set, pool shares and sales will fail");
    }

    let subgraph = Arc::new(SubgraphProvider::new(config.subgraph_uris.clone()));
    let metadata_cache = Arc::new(AquariusProvider::new(
        config.metadata_cache_uri.clone(),
        config.assets_page_size,
    ));

    let collaborators = Collaborators {
        identity: Arc::new(EnsProfileProvider::new(config.ens_api_uri.clone())),
        subgraph: subgraph.clone(),
        metadata_cache: metadata_cache.clone(),
        order_history: Arc::new(MarketOrderHistory::new(subgraph, metadata_cache)),
    };

    let handler = CompositeEventHandler::new()
        .with_handler(Arc::new(ConsoleEventHandler::new(config.account_id.clone())));

    let aggregator = ProfileAggregator::with_event_handler(
        collaborators,
        config.refresh_interval,
        Arc::new(handler),
    );
    aggregator.set_inputs(config.inputs());

    tokio::signal::ctrl_c().await?;
    info!("Shutting down");
    aggregator.dispose();

    Ok(())
}
