//! 20-byte account address

use std::fmt;

use primitive_types::U256;
use thiserror::Error;

/// Address parsing error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// Invalid hex string
    #[error("invalid hex string: {0}")]
    InvalidHex(String),
    /// Invalid length
    #[error("invalid address length: expected 20 bytes, got {0}")]
    InvalidLength(usize),
    /// Text is neither a hex nor an ICAP address
    #[error("invalid address")]
    Invalid(String),
    /// Mixed-case address that does not match its checksum
    #[error("bad address checksum")]
    BadChecksum(String),
    /// ICAP address whose mod-97 check digits do not match
    #[error("bad icap checksum")]
    BadIcapChecksum(String),
}

impl AddressError {
    /// The text that failed to parse, when known
    pub fn input(&self) -> Option<&str> {
        match self {
            AddressError::Invalid(s) | AddressError::BadChecksum(s) | AddressError::BadIcapChecksum(s) => {
                Some(s)
            }
            _ => None,
        }
    }
}

/// 20-byte address
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Address([u8; 20]);

impl Address {
    /// Size of address in bytes
    pub const LEN: usize = 20;

    /// Zero address (0x0000...0000)
    pub const ZERO: Address = Address([0u8; 20]);

    /// Create address from bytes
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Address(bytes)
    }

    /// Create address from slice
    pub fn from_slice(slice: &[u8]) -> Result<Self, AddressError> {
        if slice.len() != 20 {
            return Err(AddressError::InvalidLength(slice.len()));
        }
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(slice);
        Ok(Address(bytes))
    }

    /// Parse address from hex string (with or without 0x prefix), ignoring case
    pub fn from_hex(s: &str) -> Result<Self, AddressError> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s).map_err(|e| AddressError::InvalidHex(e.to_string()))?;
        Self::from_slice(&bytes)
    }

    /// Take the low 20 bytes of a 32-byte ABI word
    pub fn from_word(word: &[u8; 32]) -> Self {
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&word[12..]);
        Address(bytes)
    }

    /// Right-align into a 32-byte ABI word
    pub fn to_word(&self) -> [u8; 32] {
        let mut word = [0u8; 32];
        word[12..].copy_from_slice(&self.0);
        word
    }

    /// Address as a 160-bit integer
    pub fn to_u256(&self) -> U256 {
        U256::from_big_endian(&self.0)
    }

    /// Address from an integer that fits in 160 bits
    pub fn from_u256(value: U256) -> Result<Self, AddressError> {
        if value.bits() > 160 {
            return Err(AddressError::InvalidLength(value.bits().div_ceil(8)));
        }
        let mut word = [0u8; 32];
        value.to_big_endian(&mut word);
        Ok(Self::from_word(&word))
    }

    /// Get as byte slice
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Check if this is the zero address
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// Convert to lower-case hex string with 0x prefix
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Tron presentation form: `41` followed by the lower-case hex digits
    pub fn to_tron_hex(&self) -> String {
        format!("41{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_hex())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Address(bytes)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
