use std::collections::HashSet;

use crate::models::TokenOrder;

/// Distinct datatoken addresses referenced by `orders`, in order of first
/// occurrence. Addresses differing only in case count as one.
pub fn distinct_datatokens(orders: &[TokenOrder]) -> Vec<String> {
    let mut seen = HashSet::new();
    orders
        .iter()
        .map(|order| &order.datatoken.address)
        .filter(|address| seen.insert(address.to_ascii_lowercase()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OrderDatatoken;

    fn order(address: &str) -> TokenOrder {
        TokenOrder {
            datatoken: OrderDatatoken {
                address: address.to_string(),
                symbol: None,
            },
            ..TokenOrder::default()
        }
    }

    #[test]
    fn keeps_first_occurrence_order() {
        let orders = vec![order("0xA"), order("0xB"), order("0xA")];
        assert_eq!(distinct_datatokens(&orders), vec!["0xA", "0xB"]);
    }

    #[test]
    fn ignores_case_when_deduplicating() {
        let orders = vec![order("0xAbC"), order("0xabc"), order("0xDEF")];
        assert_eq!(distinct_datatokens(&orders), vec!["0xAbC", "0xDEF"]);
    }

    #[test]
    fn empty_orders_give_empty_list() {
        assert!(distinct_datatokens(&[]).is_empty());
    }
}
