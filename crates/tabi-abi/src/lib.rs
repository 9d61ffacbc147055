//! # tabi-abi
//!
//! Contract ABI encoding and decoding.
//!
//! ## Features
//!
//! - **Signatures**: human-readable function/event signature parser and formatter
//! - **AbiCoder**: encode values to ABI data and decode them back
//! - **Contract**: selector dispatch for call data built from signatures
//! - **Coercion**: pluggable post-processing of decoded values
//!
//! ## Quick Start
//!
//! ```rust
//! use tabi_abi::{AbiCoder, Value};
//!
//! let coder = AbiCoder::new();
//! let data = coder
//!     .encode(&["address", "uint256[]"], &[
//!         Value::from("0x8ba1f109551bd432803012645ac136ddd64dba72"),
//!         Value::from(vec![Value::from(1), Value::from(2)]),
//!     ])
//!     .unwrap();
//!
//! let values = coder.decode_hex(&["address", "uint256[]"], &data).unwrap();
//! assert_eq!(values[0], Value::Address("0x8ba1f109551bD432803012645Ac136ddd64DBA72".into()));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod abi_coder;
pub mod codec;
mod coerce;
mod config;
mod contract;
mod error;
mod signature;
mod types;
mod value;

pub use abi_coder::AbiCoder;
pub use codec::{Coder, CoderKind, Decoded};
pub use coerce::{Coerce, DefaultCoerce, RawCoerce};
pub use config::AbiConfig;
pub use contract::{
    event_topic, function_selector, Contract, DecodedCall, EventDef, FunctionDef, SELECTOR_LEN,
};
pub use error::{AbiError, ErrorContext, ErrorKind};
pub use signature::{
    canonical_signature, format_param_type, format_signature, parse_param_type, parse_signature,
    split_nesting,
};
pub use types::{
    AsParamType, EventFragment, Fragment, FunctionFragment, FunctionKind, ParamType,
    StateMutability,
};
pub use value::{Value, Values};

pub use tabi_crypto::{get_address, get_icap_address, to_checksum_address};
