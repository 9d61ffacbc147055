//! Dynamic values accepted by the encoders and produced by the decoders

use std::collections::BTreeMap;
use std::fmt;
use std::ops::Index;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use tabi_primitives::{bytes::hexlify, Address, BigNumber, U256};

use crate::error::{AbiError, ErrorContext};

/// A value passed to or returned from a coder
///
/// `Number` and `Int` compare by numeric value, so a decoded `uint256`
/// equals the `Number` it was encoded from.
#[derive(Debug, Clone)]
pub enum Value {
    /// Absent value
    Null,
    /// Boolean
    Bool(bool),
    /// Integer in the machine range
    Number(i64),
    /// Integer up to 256 bits of magnitude
    Int(BigNumber),
    /// Address text (hex or ICAP on input, checksummed hex on output)
    Address(String),
    /// Raw bytes
    Bytes(Vec<u8>),
    /// Text
    String(String),
    /// Array or tuple members
    List(Values),
    /// Tuple members keyed by name
    Record(BTreeMap<String, Value>),
}

impl Value {
    /// Check for `Null`
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Truthiness used when a non-boolean is given for a `bool`
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0,
            Value::Int(n) => !n.is_zero(),
            Value::Address(s) | Value::String(s) => !s.is_empty(),
            Value::Bytes(_) | Value::List(_) | Value::Record(_) => true,
        }
    }

    /// Boolean content
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Integer content of `Number` or `Int`
    pub fn as_big_number(&self) -> Option<BigNumber> {
        match self {
            Value::Number(n) => Some(BigNumber::from_i64(*n)),
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Integer content when it fits the safe range
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Int(n) => n.to_safe_i64().ok(),
            _ => None,
        }
    }

    /// Text of `String` or `Address`
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) | Value::Address(s) => Some(s),
            _ => None,
        }
    }

    /// Raw bytes
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Members of `List`
    pub fn as_list(&self) -> Option<&Values> {
        match self {
            Value::List(values) => Some(values),
            _ => None,
        }
    }

    /// Convert JSON input: integers become `Number` (or `Int` above `i64`),
    /// arrays become `List` and objects become `Record`
    pub fn from_json(json: serde_json::Value) -> Result<Value, AbiError> {
        Ok(match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Number(i)
                } else if let Some(u) = n.as_u64() {
                    Value::Int(BigNumber::from_u64(u))
                } else {
                    return Err(AbiError::invalid(
                        "invalid number value",
                        ErrorContext::new().value(n),
                    ));
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => Value::List(
                items
                    .into_iter()
                    .map(Value::from_json)
                    .collect::<Result<Values, _>>()?,
            ),
            serde_json::Value::Object(map) => Value::Record(
                map.into_iter()
                    .map(|(k, v)| Ok((k, Value::from_json(v)?)))
                    .collect::<Result<_, AbiError>>()?,
            ),
        })
    }

    /// JSON form: big integers as decimal strings, bytes as hex
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => serde_json::Value::from(*n),
            Value::Int(n) => serde_json::Value::String(n.to_string()),
            Value::Address(s) | Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Bytes(b) => serde_json::Value::String(hexlify(b)),
            Value::List(values) => {
                serde_json::Value::Array(values.iter().map(Value::to_json).collect())
            }
            Value::Record(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Address(a), Value::Address(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Record(a), Value::Record(b)) => a == b,
            (a, b) => match (a.as_big_number(), b.as_big_number()) {
                (Some(x), Some(y)) => x == y,
                _ => false,
            },
        }
    }
}

impl Eq for Value {}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::Int(n) => write!(f, "{}", n),
            Value::Address(s) | Value::String(s) => f.write_str(s),
            Value::Bytes(b) => f.write_str(&hexlify(b)),
            Value::List(_) | Value::Record(_) => write!(f, "{}", self.to_json()),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => serializer.serialize_i64(*n),
            Value::Int(n) => serializer.collect_str(n),
            Value::Address(s) | Value::String(s) => serializer.serialize_str(s),
            Value::Bytes(b) => serializer.serialize_str(&hexlify(b)),
            Value::List(values) => values.serialize(serializer),
            Value::Record(map) => {
                let mut state = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    state.serialize_entry(k, v)?;
                }
                state.end()
            }
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(value.into())
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::Int(BigNumber::from_u64(value))
    }
}

impl From<BigNumber> for Value {
    fn from(value: BigNumber) -> Self {
        Value::Int(value)
    }
}

impl From<U256> for Value {
    fn from(value: U256) -> Self {
        Value::Int(value.into())
    }
}

impl From<Address> for Value {
    fn from(value: Address) -> Self {
        Value::Address(value.to_hex())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Bytes(value)
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Value::Bytes(value.to_vec())
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::List(value.into())
    }
}

impl From<Values> for Value {
    fn from(value: Values) -> Self {
        Value::List(value)
    }
}

/// Positional values with optional name aliases
///
/// Equality looks at positions only.
#[derive(Debug, Clone, Default)]
pub struct Values {
    items: Vec<Value>,
    aliases: Vec<(String, usize)>,
}

impl Values {
    /// Empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of positional values
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append a value, returning its index
    pub fn push(&mut self, value: Value) -> usize {
        self.items.push(value);
        self.items.len() - 1
    }

    /// Alias `name` to position `index`; an existing alias of the same name wins
    pub fn set_alias(&mut self, name: impl Into<String>, index: usize) -> bool {
        let name = name.into();
        if index >= self.items.len() || self.aliases.iter().any(|(n, _)| *n == name) {
            return false;
        }
        self.aliases.push((name, index));
        true
    }

    /// Value at a position
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    /// Value by alias
    pub fn get_named(&self, name: &str) -> Option<&Value> {
        self.aliases
            .iter()
            .find(|(n, _)| n == name)
            .and_then(|(_, index)| self.items.get(*index))
    }

    /// Aliases in the order they were set
    pub fn aliases(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.aliases
            .iter()
            .filter_map(|(name, index)| self.items.get(*index).map(|v| (name.as_str(), v)))
    }

    /// Iterate positional values
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }

    /// Positional values as a slice
    pub fn as_slice(&self) -> &[Value] {
        &self.items
    }

    /// Take the positional values
    pub fn into_vec(self) -> Vec<Value> {
        self.items
    }

    /// Replace each positional value, keeping the aliases
    pub fn map<F: FnMut(usize, Value) -> Value>(self, mut f: F) -> Self {
        Self {
            items: self
                .items
                .into_iter()
                .enumerate()
                .map(|(i, v)| f(i, v))
                .collect(),
            aliases: self.aliases,
        }
    }
}

impl PartialEq for Values {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl Eq for Values {}

impl Index<usize> for Values {
    type Output = Value;

    fn index(&self, index: usize) -> &Value {
        &self.items[index]
    }
}

impl Index<&str> for Values {
    type Output = Value;

    /// Panics when no alias has this name
    fn index(&self, name: &str) -> &Value {
        match self.get_named(name) {
            Some(value) => value,
            None => panic!("no value named {:?}", name),
        }
    }
}

impl From<Vec<Value>> for Values {
    fn from(items: Vec<Value>) -> Self {
        Self {
            items,
            aliases: Vec::new(),
        }
    }
}

impl FromIterator<Value> for Values {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Vec::from_iter(iter).into()
    }
}

impl IntoIterator for Values {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a Values {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl Serialize for Values {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.items.len()))?;
        for item in &self.items {
            seq.serialize_element(item)?;
        }
        seq.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Equality ====================

    #[test]
    fn test_numeric_equality() {
        assert_eq!(Value::Number(7), Value::Int(BigNumber::from_u64(7)));
        assert_ne!(Value::Number(7), Value::String("7".into()));
        assert_ne!(Value::Null, Value::Bool(false));
    }

    #[test]
    fn test_values_equality_ignores_aliases() {
        let mut a: Values = vec![Value::from(1), Value::from("x")].into();
        let b: Values = vec![Value::from(1), Value::from("x")].into();
        assert!(a.set_alias("n", 0));
        assert_eq!(a, b);
    }

    // ==================== Aliases ====================

    #[test]
    fn test_alias_first_wins() {
        let mut values: Values = vec![Value::from(1), Value::from(2)].into();
        assert!(values.set_alias("a", 0));
        assert!(!values.set_alias("a", 1));
        assert!(!values.set_alias("b", 5));
        assert_eq!(values["a"], Value::from(1));
        assert_eq!(values.get_named("b"), None);
        assert_eq!(values.aliases().count(), 1);
    }

    // ==================== JSON ====================

    #[test]
    fn test_from_json() {
        let json: serde_json::Value =
            serde_json::from_str(r#"[1, "0x12", true, [2, 3], {"a": null}, 18446744073709551615]"#)
                .unwrap();
        let value = Value::from_json(json).unwrap();
        let list = value.as_list().unwrap();
        assert_eq!(list[0], Value::Number(1));
        assert_eq!(list[1], Value::String("0x12".into()));
        assert_eq!(list[2], Value::Bool(true));
        assert_eq!(list[3], Value::from(vec![Value::from(2), Value::from(3)]));
        assert!(matches!(list[4], Value::Record(_)));
        assert_eq!(list[5], Value::Int(BigNumber::from_u64(u64::MAX)));

        let float: serde_json::Value = serde_json::from_str("1.5").unwrap();
        assert!(Value::from_json(float).is_err());
    }

    #[test]
    fn test_to_json() {
        let value = Value::from(vec![
            Value::Int(BigNumber::parse("1000000000000000000000").unwrap()),
            Value::Bytes(vec![0xab, 0xcd]),
            Value::Null,
        ]);
        assert_eq!(
            value.to_json().to_string(),
            r#"["1000000000000000000000","0xabcd",null]"#
        );
        assert_eq!(serde_json::to_value(&value).unwrap(), value.to_json());
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Bytes(vec![1, 2]).to_string(), "0x0102");
        assert_eq!(Value::String("hi".into()).to_string(), "hi");
        assert_eq!(Value::from(vec![Value::from(1), Value::from("a")]).to_string(), r#"[1,"a"]"#);
    }

    #[test]
    fn test_truthiness() {
        assert!(!Value::Null.is_truthy());
        assert!(!Value::Number(0).is_truthy());
        assert!(Value::Int(BigNumber::from_u64(2)).is_truthy());
        assert!(!Value::String(String::new()).is_truthy());
    }
}
