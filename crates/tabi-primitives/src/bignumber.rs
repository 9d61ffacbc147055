//! Signed integer with a 256-bit magnitude
//!
//! ABI values range over `int256` and `uint256`, so a sign flag plus a
//! `U256` magnitude covers every representable input exactly. Arithmetic is
//! checked: anything that would need more than 256 bits of magnitude is
//! reported instead of wrapping.

use std::cmp::Ordering;
use std::fmt;
use std::ops::Neg;
use std::str::FromStr;

use primitive_types::U256;
use thiserror::Error;

/// Largest integer that counts, offsets and coerced numbers may hold (2^53 - 1)
pub const MAX_SAFE_INTEGER: u64 = 0x001f_ffff_ffff_ffff;

/// Number parsing/conversion error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NumberError {
    /// Text is not a decimal or 0x-prefixed hex integer
    #[error("invalid number: {0:?}")]
    Invalid(String),
    /// Magnitude does not fit in 256 bits
    #[error("number overflow")]
    Overflow,
    /// Value outside the safe integer range
    #[error("out of safe range: {0}")]
    OutOfSafeRange(String),
    /// Bit width outside 1..=256
    #[error("invalid bit width: {0}")]
    InvalidWidth(usize),
    /// Radix outside 2..=36
    #[error("invalid radix: {0}")]
    InvalidRadix(u32),
}

/// Mask with the lowest `bits` bits set
pub fn low_mask(bits: usize) -> U256 {
    if bits >= 256 {
        U256::MAX
    } else {
        (U256::one() << bits) - U256::one()
    }
}

/// Signed integer in `[-(2^256 - 1), 2^256 - 1]`
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BigNumber {
    negative: bool,
    magnitude: U256,
}

impl BigNumber {
    /// Zero
    pub const ZERO: BigNumber = BigNumber {
        negative: false,
        magnitude: U256::zero(),
    };

    /// Create from magnitude and sign; zero is never negative
    pub fn new(magnitude: U256, negative: bool) -> Self {
        Self {
            negative: negative && !magnitude.is_zero(),
            magnitude,
        }
    }

    /// Create from i64
    pub fn from_i64(value: i64) -> Self {
        Self::new(U256::from(value.unsigned_abs()), value < 0)
    }

    /// Create from u64
    pub fn from_u64(value: u64) -> Self {
        Self::new(U256::from(value), false)
    }

    /// Parse a decimal or `0x` hex string, optionally prefixed with `-`
    pub fn parse(text: &str) -> Result<Self, NumberError> {
        let (negative, body) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text),
        };

        let magnitude = if let Some(digits) = body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(NumberError::Invalid(text.to_string()));
            }
            parse_radix(digits, 16).ok_or(NumberError::Overflow)?
        } else {
            if body.is_empty() || !body.bytes().all(|b| b.is_ascii_digit()) {
                return Err(NumberError::Invalid(text.to_string()));
            }
            parse_radix(body, 10).ok_or(NumberError::Overflow)?
        };

        Ok(Self::new(magnitude, negative))
    }

    /// Parse digits in the given radix (2..=36, case-insensitive)
    pub fn from_str_radix(digits: &str, radix: u32) -> Result<Self, NumberError> {
        if !(2..=36).contains(&radix) {
            return Err(NumberError::InvalidRadix(radix));
        }
        if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
            return Err(NumberError::Invalid(digits.to_string()));
        }
        let magnitude = parse_radix(digits, radix).ok_or(NumberError::Overflow)?;
        Ok(Self::new(magnitude, false))
    }

    /// Check if negative
    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// Check if zero
    pub fn is_zero(&self) -> bool {
        self.magnitude.is_zero()
    }

    /// Absolute value
    pub fn magnitude(&self) -> U256 {
        self.magnitude
    }

    /// Checked addition
    pub fn checked_add(&self, other: &Self) -> Option<Self> {
        if self.negative == other.negative {
            self.magnitude
                .checked_add(other.magnitude)
                .map(|m| Self::new(m, self.negative))
        } else if self.magnitude >= other.magnitude {
            Some(Self::new(self.magnitude - other.magnitude, self.negative))
        } else {
            Some(Self::new(other.magnitude - self.magnitude, other.negative))
        }
    }

    /// Checked subtraction
    pub fn checked_sub(&self, other: &Self) -> Option<Self> {
        self.checked_add(&-*other)
    }

    /// Checked multiplication
    pub fn checked_mul(&self, other: &Self) -> Option<Self> {
        self.magnitude
            .checked_mul(other.magnitude)
            .map(|m| Self::new(m, self.negative != other.negative))
    }

    /// Keep only the lowest `bits` bits of the magnitude
    pub fn mask(&self, bits: usize) -> Self {
        Self::new(self.magnitude & low_mask(bits), self.negative)
    }

    /// Two's complement representation `bits` wide
    pub fn to_twos(&self, bits: usize) -> Result<U256, NumberError> {
        if bits == 0 || bits > 256 {
            return Err(NumberError::InvalidWidth(bits));
        }
        let word = if self.negative {
            (!self.magnitude).overflowing_add(U256::one()).0
        } else {
            self.magnitude
        };
        Ok(word & low_mask(bits))
    }

    /// Interpret the lowest `bits` bits of `word` as a two's complement value
    pub fn from_twos(word: U256, bits: usize) -> Result<Self, NumberError> {
        if bits == 0 || bits > 256 {
            return Err(NumberError::InvalidWidth(bits));
        }
        let mask = low_mask(bits);
        let value = word & mask;
        if value.bit(bits - 1) {
            let magnitude = (!value).overflowing_add(U256::one()).0 & mask;
            Ok(Self::new(magnitude, true))
        } else {
            Ok(Self::new(value, false))
        }
    }

    /// Convert to i64 if within `±MAX_SAFE_INTEGER`
    pub fn to_safe_i64(&self) -> Result<i64, NumberError> {
        if self.magnitude > U256::from(MAX_SAFE_INTEGER) {
            return Err(NumberError::OutOfSafeRange(self.to_string()));
        }
        let value = self.magnitude.low_u64() as i64;
        Ok(if self.negative { -value } else { value })
    }

    /// Convert to usize if non-negative and within `MAX_SAFE_INTEGER`
    pub fn to_safe_usize(&self) -> Result<usize, NumberError> {
        if self.negative || self.magnitude > U256::from(MAX_SAFE_INTEGER) {
            return Err(NumberError::OutOfSafeRange(self.to_string()));
        }
        usize::try_from(self.magnitude.low_u64())
            .map_err(|_| NumberError::OutOfSafeRange(self.to_string()))
    }

    /// Format in the given radix (2..=36, lower-case digits)
    pub fn to_str_radix(&self, radix: u32) -> Result<String, NumberError> {
        if !(2..=36).contains(&radix) {
            return Err(NumberError::InvalidRadix(radix));
        }
        let mut digits = Vec::new();
        let mut rest = self.magnitude;
        let base = U256::from(radix);
        while !rest.is_zero() {
            let (quotient, remainder) = rest.div_mod(base);
            // remainder < radix <= 36
            digits.push(std::char::from_digit(remainder.low_u32(), radix).unwrap_or('0'));
            rest = quotient;
        }
        if digits.is_empty() {
            digits.push('0');
        }
        if self.negative {
            digits.push('-');
        }
        Ok(digits.into_iter().rev().collect())
    }

    /// `0x`-prefixed lower-case hex, with a leading `-` for negatives
    pub fn to_hex_string(&self) -> String {
        let sign = if self.negative { "-" } else { "" };
        format!("{}0x{:x}", sign, self.magnitude)
    }
}

fn parse_radix(digits: &str, radix: u32) -> Option<U256> {
    let base = U256::from(radix);
    let mut acc = U256::zero();
    for c in digits.chars() {
        let digit = c.to_digit(radix)?;
        acc = acc.checked_mul(base)?.checked_add(U256::from(digit))?;
    }
    Some(acc)
}

impl Ord for BigNumber {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.negative, other.negative) {
            (false, false) => self.magnitude.cmp(&other.magnitude),
            (true, true) => other.magnitude.cmp(&self.magnitude),
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
        }
    }
}

impl PartialOrd for BigNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Neg for BigNumber {
    type Output = BigNumber;

    fn neg(self) -> Self::Output {
        Self::new(self.magnitude, !self.negative)
    }
}

impl FromStr for BigNumber {
    type Err = NumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<U256> for BigNumber {
    fn from(value: U256) -> Self {
        Self::new(value, false)
    }
}

impl From<i64> for BigNumber {
    fn from(value: i64) -> Self {
        Self::from_i64(value)
    }
}

impl From<u64> for BigNumber {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

impl From<i128> for BigNumber {
    fn from(value: i128) -> Self {
        Self::new(U256::from(value.unsigned_abs()), value < 0)
    }
}

impl From<u128> for BigNumber {
    fn from(value: u128) -> Self {
        Self::new(U256::from(value), false)
    }
}

impl fmt::Display for BigNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            write!(f, "-{}", self.magnitude)
        } else {
            write!(f, "{}", self.magnitude)
        }
    }
}

impl fmt::Debug for BigNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BigNumber({})", self)
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::*;
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

    impl Serialize for BigNumber {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_str(&self.to_string())
        }
    }

    impl<'de> Deserialize<'de> for BigNumber {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let text = String::deserialize(deserializer)?;
            BigNumber::parse(&text).map_err(de::Error::custom)
        }
    }
}
