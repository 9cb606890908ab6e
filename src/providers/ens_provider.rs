use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use dashmap::DashMap;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::models::AccountProfile;
use crate::traits::identity::IdentityResolver;

#[derive(Debug, Deserialize)]
struct ProfileResponse {
    profile: Option<EnsProfile>,
}

#[derive(Debug, Default, Deserialize)]
struct EnsProfile {
    name: Option<String>,
    avatar: Option<String>,
    url: Option<String>,
    description: Option<String>,
    #[serde(default)]
    links: Vec<EnsLink>,
}

#[derive(Debug, Deserialize)]
struct EnsLink {
    value: String,
}

impl From<EnsProfile> for AccountProfile {
    fn from(profile: EnsProfile) -> Self {
        let links: Vec<String> = profile.links.into_iter().map(|link| link.value).collect();
        AccountProfile {
            name: profile.name,
            avatar: profile.avatar,
            url: profile.url,
            description: profile.description,
            links: if links.is_empty() { None } else { Some(links) },
        }
    }
}

/// Identity resolver backed by an ENS profile API, with per-address caching
pub struct EnsProfileProvider {
    client: Client,
    base_uri: Option<String>,
    profile_cache: Arc<DashMap<String, AccountProfile>>,
}

impl EnsProfileProvider {
    /// Create a provider. Without a `base_uri` every account resolves to an empty profile.
    pub fn new(base_uri: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_uri: base_uri.map(|uri| uri.trim_end_matches('/').to_string()),
            profile_cache: Arc::new(DashMap::new()),
        }
    }

    async fn fetch_profile(&self, base_uri: &str, address: &str) -> anyhow::Result<AccountProfile> {
        let url = format!("{}/api/profile", base_uri);
        let response = self
            .client
            .get(&url)
            .query(&[("address", address)])
            .send()
            .await
            .with_context(|| format!("identity request to {} failed", url))?
            .error_for_status()?;

        let body: ProfileResponse = response.json().await?;
        Ok(body.profile.map(AccountProfile::from).unwrap_or_default())
    }
}

#[async_trait]
impl IdentityResolver for EnsProfileProvider {
    async fn resolve(&self, address: &str) -> anyhow::Result<AccountProfile> {
        let key = address.to_lowercase();

        // Check cache first
        if let Some(profile) = self.profile_cache.get(&key) {
            return Ok(profile.clone());
        }

        let Some(base_uri) = self.base_uri.as_deref() else {
            return Ok(AccountProfile::cleared());
        };

        let profile = self.fetch_profile(base_uri, address).await?;
        debug!("Fetched identity profile for {}", address);
        self.profile_cache.insert(key, profile.clone());

        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_profile_links_to_values() {
        let body = serde_json::json!({
            "profile": {
                "name": "alice.eth",
                "avatar": "https://img.example/alice.png",
                "links": [
                    { "key": "com.twitter", "value": "https://twitter.com/alice" },
                    { "key": "com.github", "value": "https://github.com/alice" }
                ]
            }
        });

        let response: ProfileResponse = serde_json::from_value(body).unwrap();
        let profile = AccountProfile::from(response.profile.unwrap());
        assert_eq!(profile.name.as_deref(), Some("alice.eth"));
        assert_eq!(profile.links.unwrap().len(), 2);
        assert_eq!(profile.description, None);
    }

    #[test]
    fn missing_links_stay_empty() {
        let profile = AccountProfile::from(EnsProfile::default());
        assert!(profile.is_empty());
    }

    #[tokio::test]
    async fn unconfigured_provider_resolves_empty_profile() {
        let provider = EnsProfileProvider::new(None);
        let profile = provider.resolve("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").await.unwrap();
        assert!(profile.is_empty());
    }
}
