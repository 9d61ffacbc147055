//! Coders: one per ABI type, compiled from a [`ParamType`]
//!
//! Every coder encodes a [`Value`] into its 32-byte-aligned part and decodes
//! a value back from a buffer at a given offset. Composite coders lay out
//! their members with [`pack`] and [`unpack`].

mod leaf;
mod pack;

use tracing::trace;

use crate::coerce::Coerce;
use crate::error::{AbiError, ErrorContext};
use crate::types::ParamType;
use crate::value::Value;

pub(crate) use pack::{pack, tuple_values, unpack};

/// Size of an ABI word
pub const WORD: usize = 32;

/// Round up to a whole number of words
pub(crate) fn align_word(len: usize) -> usize {
    len.div_ceil(WORD) * WORD
}

/// A decoded value and the number of bytes it used at its offset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    /// The value, after coercion
    pub value: Value,
    /// Bytes consumed at the decode offset
    pub consumed: usize,
}

/// Coder variants
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoderKind {
    /// Empty type; encodes nothing
    Null,
    /// `uintN`/`intN`, `size` in bytes
    Number {
        /// Width in bytes, 1..=32
        size: usize,
        /// Two's complement
        signed: bool,
    },
    /// `bool`
    Boolean,
    /// `bytesN`, N in 1..=32
    FixedBytes(usize),
    /// `address`
    Address,
    /// `bytes`
    DynamicBytes,
    /// `string`
    String,
    /// `T[n]` or `T[]` (`length` is `None`)
    Array {
        /// Element coder
        element: Box<Coder>,
        /// Fixed length, if any
        length: Option<usize>,
    },
    /// `tuple(...)`
    Tuple(Vec<Coder>),
}

/// A compiled coder with its parameter name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coder {
    /// Variant
    pub kind: CoderKind,
    /// Name of the parameter this coder was compiled from
    pub local_name: String,
}

impl Coder {
    /// Coder with a name
    pub fn new(kind: CoderKind, local_name: impl Into<String>) -> Self {
        Self {
            kind,
            local_name: local_name.into(),
        }
    }

    /// The `uint256` coder used for offsets, counts and booleans
    pub(crate) fn uint256(local_name: &str) -> Self {
        Self::new(
            CoderKind::Number {
                size: WORD,
                signed: false,
            },
            local_name,
        )
    }

    /// Select the coder for a parameter
    ///
    /// ```
    /// use tabi_abi::{Coder, ParamType};
    ///
    /// let coder = Coder::from_param(&ParamType::new("uint8[]")).unwrap();
    /// assert_eq!(coder.type_name(), "uint8[]");
    /// assert!(coder.is_dynamic());
    /// ```
    pub fn from_param(param: &ParamType) -> Result<Coder, AbiError> {
        let ty = param.ty.as_str();
        let kind = match ty {
            "address" => CoderKind::Address,
            "bool" => CoderKind::Boolean,
            "string" => CoderKind::String,
            "bytes" => CoderKind::DynamicBytes,
            _ => compile_kind(param)?,
        };
        let coder = Coder::new(kind, param.name.clone());
        trace!(ty, compiled = %coder.type_name(), "compiled coder");
        Ok(coder)
    }

    /// Name passed to the coercion hook
    pub fn name(&self) -> String {
        match &self.kind {
            CoderKind::Null => "null".to_string(),
            _ => self.type_name(),
        }
    }

    /// Full type string; tuples print as `tuple(a,b)`
    pub fn type_name(&self) -> String {
        match &self.kind {
            CoderKind::Null => String::new(),
            CoderKind::Number { size, signed } => {
                format!("{}int{}", if *signed { "" } else { "u" }, size * 8)
            }
            CoderKind::Boolean => "bool".to_string(),
            CoderKind::FixedBytes(size) => format!("bytes{}", size),
            CoderKind::Address => "address".to_string(),
            CoderKind::DynamicBytes => "bytes".to_string(),
            CoderKind::String => "string".to_string(),
            CoderKind::Array { element, length } => {
                format!("{}[{}]", element.type_name(), length_suffix(*length))
            }
            CoderKind::Tuple(coders) => {
                let members: Vec<String> = coders.iter().map(Coder::type_name).collect();
                format!("tuple({})", members.join(","))
            }
        }
    }

    /// Type string used in selectors; tuples print as `(a,b)`
    pub fn canonical_type(&self) -> String {
        match &self.kind {
            CoderKind::Array { element, length } => {
                format!("{}[{}]", element.canonical_type(), length_suffix(*length))
            }
            CoderKind::Tuple(coders) => {
                let members: Vec<String> = coders.iter().map(Coder::canonical_type).collect();
                format!("({})", members.join(","))
            }
            _ => self.type_name(),
        }
    }

    /// Encoded through an offset in the enclosing head
    pub fn is_dynamic(&self) -> bool {
        match &self.kind {
            CoderKind::DynamicBytes | CoderKind::String => true,
            CoderKind::Array { element, length } => length.is_none() || element.is_dynamic(),
            CoderKind::Tuple(coders) => coders.iter().any(Coder::is_dynamic),
            _ => false,
        }
    }

    /// Encode a value into this coder's part
    pub fn encode(&self, value: &Value) -> Result<Vec<u8>, AbiError> {
        match &self.kind {
            CoderKind::Null => Ok(Vec::new()),
            CoderKind::Number { size, signed } => {
                leaf::encode_number(self, *size, *signed, value).map(Vec::from)
            }
            CoderKind::Boolean => leaf::encode_boolean(self, value).map(Vec::from),
            CoderKind::FixedBytes(size) => leaf::encode_fixed_bytes(self, *size, value).map(Vec::from),
            CoderKind::Address => leaf::encode_address(self, value).map(Vec::from),
            CoderKind::DynamicBytes => leaf::encode_dynamic_bytes(self, value),
            CoderKind::String => leaf::encode_string(self, value),
            CoderKind::Array { element, length } => self.encode_array(element, *length, value),
            CoderKind::Tuple(coders) => {
                let values = tuple_values(coders, value)?;
                pack(coders.iter().zip(values))
            }
        }
    }

    /// Decode a value at `offset`
    pub fn decode(&self, data: &[u8], offset: usize, coerce: &dyn Coerce) -> Result<Decoded, AbiError> {
        match &self.kind {
            CoderKind::Null => leaf::decode_null(data, offset, coerce),
            CoderKind::Number { size, signed } => {
                leaf::decode_number(self, *size, *signed, data, offset, coerce)
            }
            CoderKind::Boolean => leaf::decode_boolean(self, data, offset, coerce),
            CoderKind::FixedBytes(size) => leaf::decode_fixed_bytes(self, *size, data, offset, coerce),
            CoderKind::Address => leaf::decode_address(self, data, offset, coerce),
            CoderKind::DynamicBytes => leaf::decode_dynamic_bytes(self, data, offset, coerce),
            CoderKind::String => leaf::decode_string(self, data, offset, coerce),
            CoderKind::Array { element, length } => {
                self.decode_array(element, *length, data, offset, coerce)
            }
            CoderKind::Tuple(coders) => {
                let (values, consumed) = unpack(coders.iter(), data, offset, coerce)?;
                Ok(Decoded {
                    value: coerce.coerce(&self.type_name(), Value::List(values)),
                    consumed,
                })
            }
        }
    }

    fn encode_array(
        &self,
        element: &Coder,
        length: Option<usize>,
        value: &Value,
    ) -> Result<Vec<u8>, AbiError> {
        let values = value.as_list().ok_or_else(|| {
            AbiError::invalid(
                "expected array value",
                ErrorContext::new()
                    .arg(&self.local_name)
                    .coder_type("array")
                    .value(value),
            )
        })?;

        let mut encoded = Vec::new();
        let expected = match length {
            Some(n) => n,
            None => {
                encoded.extend_from_slice(&leaf::usize_word(values.len()));
                values.len()
            }
        };
        AbiError::check_count(
            values.len(),
            expected,
            &format!(" in coder array {}", self.local_name),
        )?;

        encoded.extend(pack(std::iter::repeat(element).zip(values.iter()))?);
        Ok(encoded)
    }

    fn decode_array(
        &self,
        element: &Coder,
        length: Option<usize>,
        data: &[u8],
        offset: usize,
        coerce: &dyn Coerce,
    ) -> Result<Decoded, AbiError> {
        let (count, header) = match length {
            Some(n) => (n, 0),
            None => {
                let context = || {
                    ErrorContext::new()
                        .arg(&self.local_name)
                        .coder_type("array")
                };
                let word = leaf::read_word(data, offset).ok_or_else(|| {
                    AbiError::invalid("insufficient data for dynamic array length", context())
                })?;
                let count = usize::try_from(word)
                    .ok()
                    .filter(|&n| n as u64 <= tabi_primitives::MAX_SAFE_INTEGER && n <= data.len())
                    .ok_or_else(|| {
                        AbiError::invalid("array count too large", context().value(word))
                    })?;
                (count, WORD)
            }
        };

        let elements = std::iter::repeat(element).take(count);
        let (values, consumed) = unpack(elements, data, offset + header, coerce)?;
        Ok(Decoded {
            value: coerce.coerce(&self.type_name(), Value::List(values)),
            consumed: header + consumed,
        })
    }
}

fn length_suffix(length: Option<usize>) -> String {
    length.map(|n| n.to_string()).unwrap_or_default()
}

/// Steps 2-6 of coder selection: sized integers, sized bytes, arrays,
/// tuples and the empty type
fn compile_kind(param: &ParamType) -> Result<CoderKind, AbiError> {
    let ty = param.ty.as_str();

    if let Some((prefix, digits)) = integer_parts(ty) {
        let size = if digits.is_empty() {
            Some(256)
        } else {
            digits.parse::<usize>().ok()
        };
        return match size {
            Some(bits) if bits != 0 && bits <= 256 && bits % 8 == 0 => Ok(CoderKind::Number {
                size: bits / 8,
                signed: prefix == "int",
            }),
            _ => Err(AbiError::invalid(
                format!("invalid {} bit length", prefix),
                ErrorContext::new().arg("param").value(ty),
            )),
        };
    }

    if let Some(digits) = ty.strip_prefix("bytes") {
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            return match digits.parse::<usize>() {
                Ok(size) if (1..=WORD).contains(&size) => Ok(CoderKind::FixedBytes(size)),
                _ => Err(AbiError::invalid(
                    "invalid bytes length",
                    ErrorContext::new().arg("param").value(ty),
                )),
            };
        }
    }

    if let Some((prefix, digits)) = array_parts(ty) {
        let length = if digits.is_empty() {
            None
        } else {
            Some(digits.parse::<usize>().map_err(|_| {
                AbiError::invalid(
                    "invalid array length",
                    ErrorContext::new().arg("param").value(ty),
                )
            })?)
        };
        // elements are anonymous; the array keeps the name
        let element = ParamType {
            ty: prefix.to_string(),
            name: String::new(),
            ..param.clone()
        };
        return Ok(CoderKind::Array {
            element: Box::new(Coder::from_param(&element)?),
            length,
        });
    }

    if ty.starts_with("tuple") {
        let coders = param
            .components
            .iter()
            .flatten()
            .map(Coder::from_param)
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(CoderKind::Tuple(coders));
    }

    if ty.is_empty() {
        return Ok(CoderKind::Null);
    }

    Err(AbiError::invalid(
        "invalid type",
        ErrorContext::new().arg("type").value(ty),
    ))
}

/// `^(u?int)([0-9]*)$`
fn integer_parts(ty: &str) -> Option<(&'static str, &str)> {
    let (prefix, digits) = if let Some(rest) = ty.strip_prefix("uint") {
        ("uint", rest)
    } else {
        ("int", ty.strip_prefix("int")?)
    };
    digits.bytes().all(|b| b.is_ascii_digit()).then_some((prefix, digits))
}

/// `^(.*)\[([0-9]*)\]$`, splitting at the last `[`
fn array_parts(ty: &str) -> Option<(&str, &str)> {
    let body = ty.strip_suffix(']')?;
    let open = body.rfind('[')?;
    let digits = &body[open + 1..];
    digits
        .bytes()
        .all(|b| b.is_ascii_digit())
        .then_some((&body[..open], digits))
}
