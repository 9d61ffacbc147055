//! Keccak-256 hashing

use sha3::{Digest, Keccak256};
use tabi_primitives::H256;

/// Compute Keccak-256 hash of the input data
pub fn keccak256(data: &[u8]) -> H256 {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    let result = hasher.finalize();
    H256::from_bytes(result.into())
}

/// Keccak-256 of the UTF-8 bytes of `text`
pub fn id(text: &str) -> H256 {
    keccak256(text.as_bytes())
}
