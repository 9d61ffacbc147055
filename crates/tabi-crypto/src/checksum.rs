//! EIP-55 checksum addresses and ICAP address strings

use tabi_primitives::{Address, AddressError, BigNumber};

use crate::hash::keccak256;

/// Digits folded per step of the mod-97 reduction
const SAFE_DIGITS: usize = 15;

/// Mixed-case checksum form of an address
///
/// Hex digit `i` is upper-cased when nibble `i` of the Keccak-256 hash of
/// the lower-case digits is 8 or more.
pub fn to_checksum_address(address: &Address) -> String {
    let lower = hex::encode(address.as_bytes());
    let hash = keccak256(lower.as_bytes());
    let hash = hash.as_bytes();

    let mut result = String::with_capacity(42);
    result.push_str("0x");
    for (i, c) in lower.chars().enumerate() {
        let byte = hash[i / 2];
        let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };
        if nibble >= 8 {
            result.push(c.to_ascii_uppercase());
        } else {
            result.push(c);
        }
    }
    result
}

/// Validate a hex or ICAP address and return its checksummed hex form
///
/// All-lower and all-upper hex is accepted as is. Mixed case must already
/// be the checksum form.
pub fn get_address(text: &str) -> Result<String, AddressError> {
    if let Some(digits) = hex_address_digits(text) {
        let address = Address::from_hex(digits)?;
        let checksummed = to_checksum_address(&address);
        if is_mixed_case(digits) && checksummed[2..] != *digits {
            return Err(AddressError::BadChecksum(text.to_string()));
        }
        return Ok(checksummed);
    }

    if is_icap(text) {
        if text[2..4] != iban_checksum(text) {
            return Err(AddressError::BadIcapChecksum(text.to_string()));
        }
        let value = BigNumber::from_str_radix(&text[4..], 36)
            .map_err(|_| AddressError::Invalid(text.to_string()))?;
        let address = Address::from_u256(value.magnitude())
            .map_err(|_| AddressError::Invalid(text.to_string()))?;
        return Ok(to_checksum_address(&address));
    }

    Err(AddressError::Invalid(text.to_string()))
}

/// ICAP form of an address: `XE`, two check digits, then the base-36 value
/// left-padded to 30 characters
pub fn get_icap_address(text: &str) -> Result<String, AddressError> {
    let checksummed = get_address(text)?;
    let address = Address::from_hex(&checksummed)?;
    let base36 = BigNumber::from(address.to_u256())
        .to_str_radix(36)
        .map_err(|_| AddressError::Invalid(text.to_string()))?
        .to_ascii_uppercase();
    let payload = format!("{:0>30}", base36);
    let check = iban_checksum(&format!("XE00{}", payload));
    Ok(format!("XE{}{}", check, payload))
}

/// Digits of `^(0x)?[0-9a-fA-F]{40}$`
fn hex_address_digits(text: &str) -> Option<&str> {
    let digits = text.strip_prefix("0x").unwrap_or(text);
    (digits.len() == 40 && digits.bytes().all(|b| b.is_ascii_hexdigit())).then_some(digits)
}

fn is_mixed_case(digits: &str) -> bool {
    let upper = digits.bytes().any(|b| (b'A'..=b'F').contains(&b));
    let lower = digits.bytes().any(|b| (b'a'..=b'f').contains(&b));
    upper && lower
}

/// `^XE[0-9]{2}[0-9A-Za-z]{30,31}$`
fn is_icap(text: &str) -> bool {
    let bytes = text.as_bytes();
    text.starts_with("XE")
        && (34..=35).contains(&bytes.len())
        && bytes[2..4].iter().all(u8::is_ascii_digit)
        && bytes[4..].iter().all(u8::is_ascii_alphanumeric)
}

/// Two-digit IBAN check for an `XE..` string; its own check digits are ignored
fn iban_checksum(text: &str) -> String {
    let upper = text.to_ascii_uppercase();
    let rotated = format!("{}{}00", &upper[4..], &upper[..2]);

    // letters expand to 10..35
    let expanded: String = rotated
        .chars()
        .filter_map(|c| c.to_digit(36))
        .map(|d| d.to_string())
        .collect();

    let mut remainder = 0u64;
    for chunk in expanded.as_bytes().chunks(SAFE_DIGITS) {
        for digit in chunk {
            remainder = remainder * 10 + u64::from(digit - b'0');
        }
        remainder %= 97;
    }

    format!("{:02}", 98 - remainder)
}
