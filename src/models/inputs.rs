use std::collections::BTreeSet;

use super::ChainId;

/// Account and network selection driving the aggregator
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileInputs {
    pub account_id: String,
    /// Name already known to the caller, e.g. from a reverse name lookup
    pub account_name_hint: Option<String>,
    pub chain_ids: BTreeSet<ChainId>,
}

impl ProfileInputs {
    /// Create inputs, dropping an empty name hint
    pub fn new(
        account_id: impl Into<String>,
        account_name_hint: Option<String>,
        chain_ids: impl IntoIterator<Item = ChainId>,
    ) -> Self {
        Self {
            account_id: account_id.into().trim().to_string(),
            account_name_hint: account_name_hint.filter(|name| !name.trim().is_empty()),
            chain_ids: chain_ids.into_iter().collect(),
        }
    }

    /// Selected chains in ascending order
    pub fn chain_list(&self) -> Vec<ChainId> {
        self.chain_ids.iter().copied().collect()
    }

    /// Check if `other` targets the same account and chain set.
    /// The name hint is not part of the key.
    pub fn same_key(&self, other: &Self) -> bool {
        self.account_id == other.account_id && self.chain_ids == other.chain_ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_ids_are_normalized() {
        let inputs = ProfileInputs::new("0xabc", None, [137, 1, 137]);
        assert_eq!(inputs.chain_list(), vec![1, 137]);
        assert_eq!(inputs, ProfileInputs::new("0xabc", None, [1, 137]));
    }

    #[test]
    fn empty_hint_is_dropped() {
        let inputs = ProfileInputs::new("0xabc", Some("  ".into()), [1]);
        assert_eq!(inputs.account_name_hint, None);
    }

    #[test]
    fn hint_is_not_part_of_the_key() {
        let a = ProfileInputs::new("0xabc", Some("alice.eth".into()), [1]);
        let b = ProfileInputs::new("0xabc", None, [1]);
        assert!(a.same_key(&b));
        assert_ne!(a, b);
        assert!(!a.same_key(&ProfileInputs::new("0xabc", None, [1, 10])));
    }
}
