//! Common error types for primitives

use thiserror::Error;

use crate::address::AddressError;
use crate::bignumber::NumberError;
use crate::bytes::BytesError;
use crate::utf8::Utf8Error;

/// Primitive operation error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrimitiveError {
    /// Address error
    #[error("address error: {0}")]
    Address(#[from] AddressError),

    /// Number error
    #[error("number error: {0}")]
    Number(#[from] NumberError),

    /// Hex/bytes error
    #[error("bytes error: {0}")]
    Bytes(#[from] BytesError),

    /// UTF-8 error
    #[error("utf8 error: {0}")]
    Utf8(#[from] Utf8Error),
}
