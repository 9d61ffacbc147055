//! ABI error types

use std::fmt;

use serde::Serialize;
use tabi_primitives::{AddressError, BytesError, NumberError, PrimitiveError, Utf8Error};
use thiserror::Error;

/// Error category code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Malformed input: type string, value, data or signature
    InvalidArgument,
    /// Fewer values than required
    MissingArgument,
    /// More values than allowed
    UnexpectedArgument,
    /// Number outside the safe integer range
    NumericFault,
    /// Operation the platform cannot perform
    UnsupportedOperation,
    /// Details withheld
    Unknown,
}

impl ErrorKind {
    /// Stable upper-case code
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::InvalidArgument => "INVALID_ARGUMENT",
            ErrorKind::MissingArgument => "MISSING_ARGUMENT",
            ErrorKind::UnexpectedArgument => "UNEXPECTED_ARGUMENT",
            ErrorKind::NumericFault => "NUMERIC_FAULT",
            ErrorKind::UnsupportedOperation => "UNSUPPORTED_OPERATION",
            ErrorKind::Unknown => "UNKNOWN_ERROR",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Where an argument failure happened
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// Parameter name
    pub arg: Option<String>,
    /// Coder that rejected the value
    pub coder_type: Option<String>,
    /// Offending value, rendered
    pub value: Option<String>,
}

impl ErrorContext {
    /// Empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the parameter name; empty names are dropped
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        let arg = arg.into();
        if !arg.is_empty() {
            self.arg = Some(arg);
        }
        self
    }

    /// Set the coder type
    pub fn coder_type(mut self, coder_type: impl Into<String>) -> Self {
        self.coder_type = Some(coder_type.into());
        self
    }

    /// Set the rendered value
    pub fn value(mut self, value: impl fmt::Display) -> Self {
        self.value = Some(value.to_string());
        self
    }

    fn is_empty(&self) -> bool {
        self.arg.is_none() && self.coder_type.is_none() && self.value.is_none()
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return Ok(());
        }
        let fields = [
            ("arg", &self.arg),
            ("coderType", &self.coder_type),
            ("value", &self.value),
        ];
        let details: Vec<String> = fields
            .iter()
            .filter_map(|(key, value)| value.as_ref().map(|v| format!("{}={:?}", key, v)))
            .collect();
        write!(f, " ({})", details.join(", "))
    }
}

/// ABI encode/decode/parse error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbiError {
    /// Value, type or data rejected
    #[error("{reason}{context}")]
    InvalidArgument {
        /// Short description
        reason: String,
        /// Parameter, coder and value involved
        context: ErrorContext,
    },

    /// Character not allowed at this point of a type string
    #[error("unexpected character \"{character}\" at position {position} in \"{text}\"")]
    Syntax {
        /// The character
        character: char,
        /// Character index into `text`
        position: usize,
        /// The full type string
        text: String,
    },

    /// Malformed function or event signature
    #[error("{0}")]
    InvalidSignature(String),

    /// Too few values
    #[error("missing argument{suffix} (count={count}, expectedCount={expected})")]
    MissingArgument {
        /// Where the count was checked
        suffix: String,
        /// Values given
        count: usize,
        /// Values required
        expected: usize,
    },

    /// Too many values
    #[error("too many arguments{suffix} (count={count}, expectedCount={expected})")]
    UnexpectedArgument {
        /// Where the count was checked
        suffix: String,
        /// Values given
        count: usize,
        /// Values allowed
        expected: usize,
    },

    /// Number outside the safe integer range
    #[error("{0}")]
    NumericFault(String),

    /// Operation not supported
    #[error("{0}")]
    UnsupportedOperation(String),

    /// Error details withheld by configuration
    #[error("unknown error")]
    Censored,
}

impl AbiError {
    /// Argument error with context
    pub fn invalid(reason: impl Into<String>, context: ErrorContext) -> Self {
        AbiError::InvalidArgument {
            reason: reason.into(),
            context,
        }
    }

    /// Compare a value count against the required count
    pub fn check_count(count: usize, expected: usize, suffix: &str) -> Result<(), AbiError> {
        if count < expected {
            return Err(AbiError::MissingArgument {
                suffix: suffix.to_string(),
                count,
                expected,
            });
        }
        if count > expected {
            return Err(AbiError::UnexpectedArgument {
                suffix: suffix.to_string(),
                count,
                expected,
            });
        }
        Ok(())
    }

    /// Error category
    pub fn kind(&self) -> ErrorKind {
        match self {
            AbiError::InvalidArgument { .. }
            | AbiError::Syntax { .. }
            | AbiError::InvalidSignature(_) => ErrorKind::InvalidArgument,
            AbiError::MissingArgument { .. } => ErrorKind::MissingArgument,
            AbiError::UnexpectedArgument { .. } => ErrorKind::UnexpectedArgument,
            AbiError::NumericFault(_) => ErrorKind::NumericFault,
            AbiError::UnsupportedOperation(_) => ErrorKind::UnsupportedOperation,
            AbiError::Censored => ErrorKind::Unknown,
        }
    }

    /// Message without the context details
    pub fn reason(&self) -> String {
        match self {
            AbiError::InvalidArgument { reason, .. } => reason.clone(),
            AbiError::MissingArgument { suffix, .. } => format!("missing argument{}", suffix),
            AbiError::UnexpectedArgument { suffix, .. } => format!("too many arguments{}", suffix),
            other => other.to_string(),
        }
    }

    /// Context of an argument error
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            AbiError::InvalidArgument { context, .. } => Some(context),
            _ => None,
        }
    }

    /// Replace the reason and coder type of an argument error, keeping the rest
    pub(crate) fn relabel(self, reason: &str, coder_type: &str) -> Self {
        match self {
            AbiError::InvalidArgument { mut context, .. } => {
                context.coder_type = Some(coder_type.to_string());
                AbiError::InvalidArgument {
                    reason: reason.to_string(),
                    context,
                }
            }
            other => other,
        }
    }
}

impl From<PrimitiveError> for AbiError {
    fn from(e: PrimitiveError) -> Self {
        match e {
            PrimitiveError::Bytes(BytesError::OutOfSafeRange(v)) => {
                AbiError::NumericFault(format!("out-of-range: {}", v))
            }
            PrimitiveError::Number(NumberError::OutOfSafeRange(v)) => {
                AbiError::NumericFault(format!("out-of-range: {}", v))
            }
            PrimitiveError::Utf8(e @ Utf8Error::UnsupportedNormalization(_)) => {
                AbiError::UnsupportedOperation(e.to_string())
            }
            PrimitiveError::Address(e) => {
                let context = ErrorContext::new().arg("address");
                let context = match e.input() {
                    Some(input) => context.value(input),
                    None => context,
                };
                AbiError::invalid(e.to_string(), context)
            }
            PrimitiveError::Bytes(e) => AbiError::invalid(e.to_string(), ErrorContext::new()),
            PrimitiveError::Number(e) => AbiError::invalid(e.to_string(), ErrorContext::new()),
            PrimitiveError::Utf8(e) => AbiError::invalid(e.to_string(), ErrorContext::new()),
        }
    }
}

impl From<AddressError> for AbiError {
    fn from(e: AddressError) -> Self {
        PrimitiveError::from(e).into()
    }
}

impl From<BytesError> for AbiError {
    fn from(e: BytesError) -> Self {
        PrimitiveError::from(e).into()
    }
}

impl From<NumberError> for AbiError {
    fn from(e: NumberError) -> Self {
        PrimitiveError::from(e).into()
    }
}

impl From<Utf8Error> for AbiError {
    fn from(e: Utf8Error) -> Self {
        PrimitiveError::from(e).into()
    }
}

impl From<serde_json::Error> for AbiError {
    fn from(e: serde_json::Error) -> Self {
        AbiError::invalid(format!("invalid json: {}", e), ErrorContext::new())
    }
}
