use std::collections::HashMap;
use std::time::Duration;

use anyhow::Context;

use crate::models::{ChainId, ProfileInputs};
use crate::providers::aquarius_provider::DEFAULT_PAGE_SIZE;
use crate::tracker::REFRESH_INTERVAL;

/// Runtime configuration, read from the environment
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileConfig {
    pub account_id: String,
    pub account_name_hint: Option<String>,
    pub chain_ids: Vec<ChainId>,
    pub metadata_cache_uri: Option<String>,
    pub subgraph_uris: HashMap<ChainId, String>,
    pub ens_api_uri: Option<String>,
    pub refresh_interval: Duration,
    pub assets_page_size: u32,
}

impl ProfileConfig {
    /// Load from process environment (after `.env`, if present)
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` to read variables
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let chain_ids = match var("CHAIN_IDS") {
            Some(raw) => parse_chain_ids(&raw).context("invalid CHAIN_IDS")?,
            None => vec![1],
        };

        let subgraph_uris = match var("SUBGRAPH_URIS") {
            Some(raw) => parse_subgraph_uris(&raw).context("invalid SUBGRAPH_URIS")?,
            None => HashMap::new(),
        };

        let refresh_interval = match var("REFRESH_INTERVAL_MS") {
            Some(raw) => {
                let ms: u64 = raw.parse().context("invalid REFRESH_INTERVAL_MS")?;
                if ms == 0 {
                    anyhow::bail!("REFRESH_INTERVAL_MS must be greater than zero");
                }
                Duration::from_millis(ms)
            }
            None => REFRESH_INTERVAL,
        };

        let assets_page_size = match var("ASSETS_PAGE_SIZE") {
            Some(raw) => raw.parse().context("invalid ASSETS_PAGE_SIZE")?,
            None => DEFAULT_PAGE_SIZE,
        };

        Ok(Self {
            account_id: var("ACCOUNT_ID").unwrap_or_default(),
            account_name_hint: var("ACCOUNT_ENS"),
            chain_ids,
            metadata_cache_uri: var("METADATA_CACHE_URI"),
            subgraph_uris,
            ens_api_uri: var("ENS_API_URI"),
            refresh_interval,
            assets_page_size,
        })
    }

    /// Aggregator inputs described by this config
    pub fn inputs(&self) -> ProfileInputs {
        ProfileInputs::new(
            self.account_id.clone(),
            self.account_name_hint.clone(),
            self.chain_ids.iter().copied(),
        )
    }
}

/// Parse a comma separated chain id list, e.g. `1, 137`
pub fn parse_chain_ids(raw: &str) -> anyhow::Result<Vec<ChainId>> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<ChainId>()
                .with_context(|| format!("'{}' is not a chain id", part))
        })
        .collect()
}

/// Parse `chain=url` pairs, e.g. `1=https://a,137=https://b`
pub fn parse_subgraph_uris(raw: &str) -> anyhow::Result<HashMap<ChainId, String>> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            let (chain, uri) = part
                .split_once('=')
                .with_context(|| format!("'{}' is not a chain=url pair", part))?;
            let chain_id = chain
                .trim()
                .parse::<ChainId>()
                .with_context(|| format!("'{}' is not a chain id", chain))?;
            Ok((chain_id, uri.trim().to_string()))
        })
        .collect()
}
