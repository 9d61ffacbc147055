//! Encode/decode entry point

use std::fmt;
use std::sync::Arc;

use tabi_primitives::bytes::{arrayify, hexlify};
use tracing::debug;

use crate::codec::{Coder, CoderKind};
use crate::coerce::{Coerce, DefaultCoerce, RawCoerce};
use crate::config::AbiConfig;
use crate::error::{AbiError, ErrorContext};
use crate::types::AsParamType;
use crate::value::{Value, Values};

/// Encodes value lists and decodes ABI data for a list of types
///
/// Types may be given as strings (`"uint256"`, `"tuple(address,bool)"`) or
/// as [`ParamType`](crate::ParamType)s.
///
/// ```
/// use tabi_abi::{AbiCoder, Value};
///
/// let coder = AbiCoder::new();
/// let hex = coder.encode(&["uint8", "string"], &[Value::from(7), Value::from("hi")]).unwrap();
/// let values = coder.decode_hex(&["uint8", "string"], &hex).unwrap();
/// assert_eq!(values[0], Value::from(7));
/// assert_eq!(values[1], Value::from("hi"));
/// ```
#[derive(Clone)]
pub struct AbiCoder {
    config: AbiConfig,
    coerce: Arc<dyn Coerce>,
}

impl AbiCoder {
    /// Coder with the default configuration
    pub fn new() -> Self {
        Self::with_config(AbiConfig::default())
    }

    /// Coder with the given configuration
    pub fn with_config(config: AbiConfig) -> Self {
        let coerce: Arc<dyn Coerce> = if config.coerce_small_integers {
            Arc::new(DefaultCoerce)
        } else {
            Arc::new(RawCoerce)
        };
        Self { config, coerce }
    }

    /// Replace the coercion hook
    pub fn with_coerce(mut self, coerce: impl Coerce + 'static) -> Self {
        self.coerce = Arc::new(coerce);
        self
    }

    /// Active configuration
    pub fn config(&self) -> &AbiConfig {
        &self.config
    }

    /// Encode values as lower-case `0x` hex
    pub fn encode<T: AsParamType>(&self, types: &[T], values: &[Value]) -> Result<String, AbiError> {
        self.encode_bytes(types, values).map(|data| hexlify(&data))
    }

    /// Encode values as bytes
    pub fn encode_bytes<T: AsParamType>(
        &self,
        types: &[T],
        values: &[Value],
    ) -> Result<Vec<u8>, AbiError> {
        let result = check_lengths(types.len(), values.len())
            .and_then(|_| root_coder(types))
            .and_then(|root| root.encode(&Value::List(values.iter().cloned().collect())));

        match &result {
            Ok(data) => debug!(types = types.len(), bytes = data.len(), "encoded values"),
            Err(e) => debug!(error = %e, "encode failed"),
        }
        self.censor(result)
    }

    /// Decode bytes into positional values (named members are also aliased)
    pub fn decode<T: AsParamType>(&self, types: &[T], data: &[u8]) -> Result<Values, AbiError> {
        let result = root_coder(types)
            .and_then(|root| root.decode(data, 0, self.coerce.as_ref()))
            .map(|decoded| match decoded.value {
                Value::List(values) => values,
                other => Values::from(vec![other]),
            });

        match &result {
            Ok(values) => debug!(types = types.len(), bytes = data.len(), values = values.len(), "decoded values"),
            Err(e) => debug!(error = %e, "decode failed"),
        }
        self.censor(result)
    }

    /// Decode `0x` hex
    pub fn decode_hex<T: AsParamType>(&self, types: &[T], data: &str) -> Result<Values, AbiError> {
        let bytes = match arrayify(data) {
            Ok(bytes) => bytes,
            Err(e) => return self.censor(Err(e.into())),
        };
        self.decode(types, &bytes)
    }

    fn censor<R>(&self, result: Result<R, AbiError>) -> Result<R, AbiError> {
        if self.config.censor_errors {
            result.map_err(|_| AbiError::Censored)
        } else {
            result
        }
    }
}

impl Default for AbiCoder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AbiCoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AbiCoder")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn check_lengths(types: usize, values: usize) -> Result<(), AbiError> {
    if types == values {
        return Ok(());
    }
    Err(AbiError::invalid(
        "types/values length mismatch",
        ErrorContext::new().value(format!("{} types, {} values", types, values)),
    ))
}

/// Tuple coder named `_` over all the types
pub(crate) fn root_coder<T: AsParamType>(types: &[T]) -> Result<Coder, AbiError> {
    let coders = types
        .iter()
        .map(|ty| Coder::from_param(&ty.to_param_type()?))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Coder::new(CoderKind::Tuple(coders), "_"))
}
