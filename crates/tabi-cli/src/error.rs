//! CLI error types

use tabi_abi::AbiError;
use tabi_primitives::{AddressError, BytesError};
use thiserror::Error;

/// CLI error type
#[derive(Debug, Error)]
pub enum CliError {
    /// Encode, decode or signature failure
    #[error("{0}")]
    Abi(#[from] AbiError),

    /// Invalid address text
    #[error("Invalid address: {0}")]
    InvalidAddress(#[from] AddressError),

    /// Invalid hex string
    #[error("Invalid hex: {0}")]
    InvalidHex(#[from] BytesError),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Config error
    #[error("Config error: {0}")]
    Config(String),
}

impl CliError {
    /// Error category code for JSON output
    pub fn code(&self) -> &'static str {
        match self {
            CliError::Abi(e) => e.kind().code(),
            CliError::InvalidAddress(_) | CliError::InvalidHex(_) | CliError::InvalidInput(_) => {
                "INVALID_ARGUMENT"
            }
            CliError::Io(_) | CliError::Json(_) | CliError::Config(_) => "CLI_ERROR",
        }
    }
}
