//! Post-processing of decoded values

use crate::value::Value;

/// Hook applied to every decoded value, with the coder's type name
///
/// Any `Fn(&str, Value) -> Value + Send + Sync` closure is a `Coerce`.
pub trait Coerce: Send + Sync {
    /// Transform one decoded value
    fn coerce(&self, type_name: &str, value: Value) -> Value;
}

impl<F> Coerce for F
where
    F: Fn(&str, Value) -> Value + Send + Sync,
{
    fn coerce(&self, type_name: &str, value: Value) -> Value {
        self(type_name, value)
    }
}

/// Integers of at most 48 bits become `Value::Number`; everything else is
/// left as decoded
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultCoerce;

impl Coerce for DefaultCoerce {
    fn coerce(&self, type_name: &str, value: Value) -> Value {
        if !is_small_integer(type_name) {
            return value;
        }
        match value {
            Value::Int(n) => match n.to_safe_i64() {
                Ok(small) => Value::Number(small),
                Err(_) => Value::Int(n),
            },
            other => other,
        }
    }
}

/// Leaves every value as decoded
#[derive(Debug, Clone, Copy, Default)]
pub struct RawCoerce;

impl Coerce for RawCoerce {
    fn coerce(&self, _type_name: &str, value: Value) -> Value {
        value
    }
}

/// `^(u?int)([0-9]+)$` with a width of 48 or less
fn is_small_integer(type_name: &str) -> bool {
    let digits = type_name
        .strip_prefix("uint")
        .or_else(|| type_name.strip_prefix("int"));
    match digits {
        Some(d) if !d.is_empty() && d.bytes().all(|b| b.is_ascii_digit()) => {
            d.parse::<u32>().map_or(false, |bits| bits <= 48)
        }
        _ => false,
    }
}
