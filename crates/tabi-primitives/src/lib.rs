//! # tabi-primitives
//!
//! Primitive types for the tabi ABI codec.
//!
//! This crate provides the value types the coders are built on: a signed
//! 256-bit integer, addresses, hashes, hex/byte helpers and strict UTF-8.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod address;
mod bignumber;
pub mod bytes;
mod error;
mod hash;
pub mod utf8;

pub use address::{Address, AddressError};
pub use bignumber::{low_mask, BigNumber, NumberError, MAX_SAFE_INTEGER};
pub use bytes::BytesError;
pub use error::PrimitiveError;
pub use hash::H256;
pub use utf8::{NormalizationForm, Utf8Error};

// Re-export primitive-types for U256
pub use primitive_types::U256;
