//! Keccak-256 digest of a signature

use std::fmt;

/// 32-byte digest; events are identified by it, functions by its first four bytes
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct H256([u8; 32]);

impl H256 {
    /// Wrap a digest
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        H256(bytes)
    }

    /// Digest bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// First four bytes, the function selector of a signature hash
    pub fn selector(&self) -> [u8; 4] {
        [self.0[0], self.0[1], self.0[2], self.0[3]]
    }

    /// `0x` + lower-case hex, the topic form
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for H256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "H256({})", self.to_hex())
    }
}

impl fmt::Display for H256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
