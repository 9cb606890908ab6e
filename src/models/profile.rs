use serde::{Deserialize, Serialize};

use crate::utils::helper::account_truncate;

/// Identity profile attached to an account
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountProfile {
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub links: Option<Vec<String>>,
}

impl AccountProfile {
    /// Profile with every field empty
    pub fn cleared() -> Self {
        Self::default()
    }

    /// Profile carrying only a display name
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Check if no field is set
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.avatar.is_none()
            && self.url.is_none()
            && self.description.is_none()
            && self.links.is_none()
    }

    /// Name to show for `account`, falling back to the truncated address
    pub fn display_name(&self, account: &str) -> String {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => account_truncate(account),
        }
    }
}
