//! Hex string and byte buffer helpers

use thiserror::Error;

use crate::bignumber::MAX_SAFE_INTEGER;

/// Byte/hex conversion error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BytesError {
    /// Not a hex string
    #[error("invalid hexidecimal string: {0:?}")]
    InvalidHex(String),
    /// Hex string without the 0x prefix
    #[error("hex string must have 0x prefix: {0:?}")]
    MissingPrefix(String),
    /// Odd number of hex digits where whole bytes are required
    #[error("hex data length must be even: {0:?}")]
    OddLength(String),
    /// Data longer than the requested padded length
    #[error("cannot pad {len} bytes to {target}")]
    CannotPad {
        /// Data length
        len: usize,
        /// Requested length
        target: usize,
    },
    /// Negative numbers have no hex form
    #[error("cannot hexlify negative value: {0}")]
    Negative(i64),
    /// Number at or beyond the safe integer limit
    #[error("out-of-range: {0}")]
    OutOfSafeRange(i64),
}

/// Check for a `0x`-prefixed hex string, optionally of exactly `length` bytes
pub fn is_hex_string(value: &str, length: Option<usize>) -> bool {
    let Some(digits) = value.strip_prefix("0x") else {
        return false;
    };
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return false;
    }
    match length {
        Some(len) => digits.len() == 2 * len,
        None => true,
    }
}

/// Convert a `0x`-prefixed hex string to bytes; odd lengths get a leading zero nibble
pub fn arrayify(value: &str) -> Result<Vec<u8>, BytesError> {
    let (prefixed, digits) = match value.strip_prefix("0x") {
        Some(digits) => (true, digits),
        None => (false, value),
    };
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(BytesError::InvalidHex(value.to_string()));
    }
    if !prefixed {
        return Err(BytesError::MissingPrefix(value.to_string()));
    }

    if digits.len() % 2 == 1 {
        hex::decode(format!("0{}", digits))
    } else {
        hex::decode(digits)
    }
    .map_err(|_| BytesError::InvalidHex(value.to_string()))
}

/// Lower-case `0x`-prefixed hex of the given bytes
pub fn hexlify(data: &[u8]) -> String {
    format!("0x{}", hex::encode(data))
}

/// Hex form of a non-negative integer below `MAX_SAFE_INTEGER`
pub fn hexlify_number(value: i64) -> Result<String, BytesError> {
    if value < 0 {
        return Err(BytesError::Negative(value));
    }
    if value as u64 >= MAX_SAFE_INTEGER {
        return Err(BytesError::OutOfSafeRange(value));
    }
    if value == 0 {
        return Ok("0x00".to_string());
    }
    let digits = format!("{:x}", value);
    if digits.len() % 2 == 1 {
        Ok(format!("0x0{}", digits))
    } else {
        Ok(format!("0x{}", digits))
    }
}

/// Left-pad with zero bytes to exactly `length`
pub fn pad_zeros(data: &[u8], length: usize) -> Result<Vec<u8>, BytesError> {
    if length < data.len() {
        return Err(BytesError::CannotPad {
            len: data.len(),
            target: length,
        });
    }
    let mut result = vec![0u8; length];
    result[length - data.len()..].copy_from_slice(data);
    Ok(result)
}

/// Concatenate byte slices
pub fn concat<T: AsRef<[u8]>>(parts: &[T]) -> Vec<u8> {
    let total = parts.iter().map(|p| p.as_ref().len()).sum();
    let mut result = Vec::with_capacity(total);
    for part in parts {
        result.extend_from_slice(part.as_ref());
    }
    result
}

/// Drop leading zero bytes
pub fn strip_zeros(data: &[u8]) -> &[u8] {
    let start = data.iter().position(|&b| b != 0).unwrap_or(data.len());
    &data[start..]
}

/// Number of bytes in an even-length hex string
pub fn hex_data_length(value: &str) -> Option<usize> {
    if !is_hex_string(value, None) || value.len() % 2 != 0 {
        return None;
    }
    Some((value.len() - 2) / 2)
}

/// Byte-offset slice of an even-length hex string
pub fn hex_data_slice(value: &str, offset: usize, end: Option<usize>) -> Result<String, BytesError> {
    if !is_hex_string(value, None) {
        return Err(BytesError::InvalidHex(value.to_string()));
    }
    if value.len() % 2 != 0 {
        return Err(BytesError::OddLength(value.to_string()));
    }
    let start = (2 + 2 * offset).min(value.len());
    let stop = end.map_or(value.len(), |e| (2 + 2 * e).min(value.len())).max(start);
    Ok(format!("0x{}", &value[start..stop]))
}

/// Remove leading zero nibbles, keeping at least one digit
pub fn hex_strip_zeros(value: &str) -> Result<String, BytesError> {
    if !is_hex_string(value, None) {
        return Err(BytesError::InvalidHex(value.to_string()));
    }
    let digits = value[2..].trim_start_matches('0');
    if digits.is_empty() && value.len() > 2 {
        Ok("0x0".to_string())
    } else {
        Ok(format!("0x{}", digits))
    }
}

/// Left-pad a hex string with zero nibbles to `length` bytes
pub fn hex_zero_pad(value: &str, length: usize) -> Result<String, BytesError> {
    if !is_hex_string(value, None) {
        return Err(BytesError::InvalidHex(value.to_string()));
    }
    let digits = &value[2..];
    let width = 2 * length;
    if digits.len() >= width {
        return Ok(value.to_string());
    }
    Ok(format!("0x{}{}", "0".repeat(width - digits.len()), digits))
}
