use sha3::{Digest, Keccak256};

/// Check if `address` is a well-formed chain address.
///
/// Accepts an optional `0x` prefix followed by 40 hex digits. All-lowercase
/// and all-uppercase forms are accepted as is; mixed case must carry a valid
/// EIP-55 checksum.
pub fn is_valid_address(address: &str) -> bool {
    let hex = address
        .strip_prefix("0x")
        .or_else(|| address.strip_prefix("0X"))
        .unwrap_or(address);

    if hex.len() != 40 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return false;
    }

    if hex == hex.to_ascii_lowercase() || hex == hex.to_ascii_uppercase() {
        return true;
    }

    has_valid_checksum(hex)
}

fn has_valid_checksum(hex: &str) -> bool {
    let hash = Keccak256::digest(hex.to_ascii_lowercase().as_bytes());

    hex.chars().enumerate().all(|(i, c)| {
        if !c.is_ascii_alphabetic() {
            return true;
        }
        let byte = hash[i / 2];
        let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };
        (nibble > 7) == c.is_ascii_uppercase()
    })
}

/// Shorten an address for display: `0x1234…abcd`
pub fn account_truncate(account: &str) -> String {
    let chars: Vec<char> = account.chars().collect();
    if chars.len() <= 10 {
        return account.to_string();
    }

    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}…{}", head, tail)
}

/// Human label for a sales count
pub fn sales_label(count: u64) -> String {
    if count == 1 {
        "1 sale".to_string()
    } else {
        format!("{} sales", count)
    }
}
