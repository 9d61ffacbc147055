//! # tabi-crypto
//!
//! Hashing and address encodings for the tabi ABI codec.
//!
//! - Keccak-256 hashing
//! - EIP-55 mixed-case checksum addresses
//! - ICAP (IBAN-style) addresses

#![warn(missing_docs)]
#![warn(clippy::all)]

mod checksum;
mod hash;

pub use checksum::{get_address, get_icap_address, to_checksum_address};
pub use hash::{id, keccak256};
