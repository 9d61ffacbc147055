//! Leaf coders: numbers, booleans, fixed bytes, addresses, bytes, strings, null

use tabi_crypto::{get_address, to_checksum_address};
use tabi_primitives::bytes::{arrayify, hexlify};
use tabi_primitives::utf8::{to_utf8_bytes, to_utf8_string};
use tabi_primitives::{low_mask, Address, BigNumber, MAX_SAFE_INTEGER, U256};

use super::{align_word, Coder, Decoded, WORD};
use crate::coerce::Coerce;
use crate::error::{AbiError, ErrorContext};
use crate::value::Value;

type Word = [u8; WORD];

/// Read the big-endian word at `offset`, if the buffer holds one
pub(crate) fn read_word(data: &[u8], offset: usize) -> Option<U256> {
    let end = offset.checked_add(WORD)?;
    data.get(offset..end).map(U256::from_big_endian)
}

fn u256_word(value: U256) -> Word {
    let mut word = [0u8; WORD];
    value.to_big_endian(&mut word);
    word
}

pub(crate) fn usize_word(value: usize) -> Word {
    u256_word(U256::from(value))
}

fn remaining_hex(data: &[u8], offset: usize) -> String {
    hexlify(data.get(offset..).unwrap_or_default())
}

fn insufficient(coder: &Coder, type_label: &str, coder_type: &str, data: &[u8], offset: usize) -> AbiError {
    AbiError::invalid(
        format!("insufficient data for {} type", type_label),
        ErrorContext::new()
            .arg(&coder.local_name)
            .coder_type(coder_type)
            .value(remaining_hex(data, offset)),
    )
}

// ==================== Numbers ====================

fn number_input(value: &Value) -> Option<BigNumber> {
    match value {
        Value::Number(_) | Value::Int(_) => value.as_big_number(),
        Value::String(text) => BigNumber::parse(text).ok(),
        _ => None,
    }
}

/// Inclusive range check for a `bits` wide integer
fn in_range(n: &BigNumber, bits: usize, signed: bool) -> bool {
    let magnitude = n.magnitude();
    if !signed {
        return !n.is_negative() && magnitude <= low_mask(bits);
    }
    let half = U256::one() << (bits - 1);
    if n.is_negative() {
        magnitude <= half
    } else {
        magnitude < half
    }
}

pub(crate) fn encode_number(
    coder: &Coder,
    size: usize,
    signed: bool,
    value: &Value,
) -> Result<Word, AbiError> {
    let invalid = || {
        AbiError::invalid(
            "invalid number value",
            ErrorContext::new()
                .arg(&coder.local_name)
                .coder_type(coder.type_name())
                .value(value),
        )
    };

    let n = number_input(value).ok_or_else(invalid)?;
    if !in_range(&n, size * 8, signed) {
        return Err(invalid());
    }

    let word = if signed {
        n.to_twos(256)?
    } else {
        n.magnitude()
    };
    Ok(u256_word(word))
}

pub(crate) fn decode_number(
    coder: &Coder,
    size: usize,
    signed: bool,
    data: &[u8],
    offset: usize,
    coerce: &dyn Coerce,
) -> Result<Decoded, AbiError> {
    let name = coder.type_name();
    let word = read_word(data, offset).ok_or_else(|| insufficient(coder, &name, &name, data, offset))?;

    let bits = size * 8;
    let n = if signed {
        BigNumber::from_twos(word, bits)?
    } else {
        BigNumber::from(word & low_mask(bits))
    };

    Ok(Decoded {
        value: coerce.coerce(&name, Value::Int(n)),
        consumed: WORD,
    })
}

// ==================== Booleans ====================

pub(crate) fn encode_boolean(coder: &Coder, value: &Value) -> Result<Word, AbiError> {
    let n = Value::Number(i64::from(value.is_truthy()));
    encode_number(&Coder::uint256(&coder.local_name), WORD, false, &n)
}

pub(crate) fn decode_boolean(
    coder: &Coder,
    data: &[u8],
    offset: usize,
    coerce: &dyn Coerce,
) -> Result<Decoded, AbiError> {
    let word = decode_number(
        &Coder::uint256(&coder.local_name),
        WORD,
        false,
        data,
        offset,
        &crate::coerce::RawCoerce,
    )
    .map_err(|e| e.relabel("insufficient data for boolean type", "boolean"))?;

    let truthy = word.value.as_big_number().is_some_and(|n| !n.is_zero());
    Ok(Decoded {
        value: coerce.coerce("bool", Value::Bool(truthy)),
        consumed: word.consumed,
    })
}

// ==================== Bytes ====================

/// `Bytes` as is, `String` as 0x hex
fn bytes_input(value: &Value) -> Option<Vec<u8>> {
    match value {
        Value::Bytes(bytes) => Some(bytes.clone()),
        Value::String(text) => arrayify(text).ok(),
        _ => None,
    }
}

pub(crate) fn encode_fixed_bytes(coder: &Coder, size: usize, value: &Value) -> Result<Word, AbiError> {
    let name = coder.type_name();
    let bytes = bytes_input(value)
        .filter(|bytes| bytes.len() == size)
        .ok_or_else(|| {
            AbiError::invalid(
                format!("invalid {} value", name),
                ErrorContext::new()
                    .arg(&coder.local_name)
                    .coder_type(name.as_str())
                    .value(value),
            )
        })?;

    let mut word = [0u8; WORD];
    word[..size].copy_from_slice(&bytes);
    Ok(word)
}

pub(crate) fn decode_fixed_bytes(
    coder: &Coder,
    size: usize,
    data: &[u8],
    offset: usize,
    coerce: &dyn Coerce,
) -> Result<Decoded, AbiError> {
    let name = coder.type_name();
    let end = offset.checked_add(WORD).filter(|&end| end <= data.len());
    if end.is_none() {
        return Err(insufficient(coder, &name, &name, data, offset));
    }

    let bytes = data[offset..offset + size].to_vec();
    Ok(Decoded {
        value: coerce.coerce(&name, Value::Bytes(bytes)),
        consumed: WORD,
    })
}

/// Length word followed by the payload padded to whole words
fn encode_payload(payload: &[u8]) -> Vec<u8> {
    let mut encoded = vec![0u8; WORD + align_word(payload.len())];
    encoded[..WORD].copy_from_slice(&usize_word(payload.len()));
    encoded[WORD..WORD + payload.len()].copy_from_slice(payload);
    encoded
}

fn decode_payload(coder: &Coder, data: &[u8], offset: usize) -> Result<(Vec<u8>, usize), AbiError> {
    let context = || {
        ErrorContext::new()
            .arg(&coder.local_name)
            .coder_type("dynamicBytes")
    };

    let length = read_word(data, offset).ok_or_else(|| {
        AbiError::invalid(
            "insufficient data for dynamicBytes length",
            context().value(remaining_hex(data, offset)),
        )
    })?;

    let length = usize::try_from(length)
        .ok()
        .filter(|&n| n as u64 <= MAX_SAFE_INTEGER)
        .ok_or_else(|| AbiError::invalid("dynamic bytes count too large", context().value(length)))?;

    let start = offset + WORD;
    let payload = start
        .checked_add(length)
        .and_then(|end| data.get(start..end))
        .ok_or_else(|| {
            AbiError::invalid(
                "insufficient data for dynamicBytes type",
                context().value(remaining_hex(data, start)),
            )
        })?;

    Ok((payload.to_vec(), WORD + align_word(length)))
}

pub(crate) fn encode_dynamic_bytes(coder: &Coder, value: &Value) -> Result<Vec<u8>, AbiError> {
    let payload = bytes_input(value).ok_or_else(|| {
        AbiError::invalid(
            "invalid bytes value",
            ErrorContext::new()
                .arg(&coder.local_name)
                .coder_type("bytes")
                .value(value),
        )
    })?;
    Ok(encode_payload(&payload))
}

pub(crate) fn decode_dynamic_bytes(
    coder: &Coder,
    data: &[u8],
    offset: usize,
    coerce: &dyn Coerce,
) -> Result<Decoded, AbiError> {
    let (payload, consumed) = decode_payload(coder, data, offset)?;
    Ok(Decoded {
        value: coerce.coerce("bytes", Value::Bytes(payload)),
        consumed,
    })
}

// ==================== Strings ====================

pub(crate) fn encode_string(coder: &Coder, value: &Value) -> Result<Vec<u8>, AbiError> {
    match value {
        Value::String(text) => Ok(encode_payload(&to_utf8_bytes(text))),
        other => Err(AbiError::invalid(
            "invalid string value",
            ErrorContext::new()
                .arg(&coder.local_name)
                .coder_type("string")
                .value(other),
        )),
    }
}

pub(crate) fn decode_string(
    coder: &Coder,
    data: &[u8],
    offset: usize,
    coerce: &dyn Coerce,
) -> Result<Decoded, AbiError> {
    let (payload, consumed) = decode_payload(coder, data, offset)?;
    let text = to_utf8_string(&payload, false)?;
    Ok(Decoded {
        value: coerce.coerce("string", Value::String(text)),
        consumed,
    })
}

// ==================== Addresses ====================

pub(crate) fn encode_address(coder: &Coder, value: &Value) -> Result<Word, AbiError> {
    let address = value
        .as_str()
        .and_then(|text| get_address(text).ok())
        .and_then(|checksummed| Address::from_hex(&checksummed).ok())
        .ok_or_else(|| {
            AbiError::invalid(
                "invalid address",
                ErrorContext::new()
                    .arg(&coder.local_name)
                    .coder_type("address")
                    .value(value),
            )
        })?;
    Ok(address.to_word())
}

pub(crate) fn decode_address(
    coder: &Coder,
    data: &[u8],
    offset: usize,
    coerce: &dyn Coerce,
) -> Result<Decoded, AbiError> {
    let word = offset
        .checked_add(WORD)
        .and_then(|end| data.get(offset..end))
        .and_then(|slice| <&Word>::try_from(slice).ok())
        .ok_or_else(|| insufficient(coder, "address", "address", data, offset))?;

    let address = Address::from_word(word);
    Ok(Decoded {
        value: coerce.coerce("address", Value::Address(to_checksum_address(&address))),
        consumed: WORD,
    })
}

// ==================== Null ====================

pub(crate) fn decode_null(data: &[u8], offset: usize, coerce: &dyn Coerce) -> Result<Decoded, AbiError> {
    if offset > data.len() {
        return Err(AbiError::invalid(
            "invalid null",
            ErrorContext::new().coder_type("null").value(offset),
        ));
    }
    Ok(Decoded {
        value: coerce.coerce("null", Value::Null),
        consumed: 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::CoderKind;
    use crate::coerce::{DefaultCoerce, RawCoerce};
    use crate::types::ParamType;

    fn coder(ty: &str) -> Coder {
        Coder::from_param(&ParamType::named(ty, "x")).unwrap()
    }

    fn hex_word(word: &[u8]) -> String {
        hex::encode(word)
    }

    // ==================== Numbers ====================

    #[test]
    fn test_uint8_bounds() {
        let c = coder("uint8");
        assert!(c.encode(&Value::from(255)).is_ok());
        let err = c.encode(&Value::from(256)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid number value (arg=\"x\", coderType=\"uint8\", value=\"256\")"
        );
        assert!(c.encode(&Value::from(-1)).is_err());
    }

    #[test]
    fn test_int8_bounds() {
        let c = coder("int8");
        assert!(c.encode(&Value::from(127)).is_ok());
        assert!(c.encode(&Value::from(-128)).is_ok());
        assert!(c.encode(&Value::from(128)).is_err());
        assert_eq!(
            c.encode(&Value::from(-129)).unwrap_err().reason(),
            "invalid number value"
        );
    }

    #[test]
    fn test_int256_extremes() {
        let c = coder("int256");
        let min = -BigNumber::from(U256::one() << 255);
        let encoded = c.encode(&Value::Int(min)).unwrap();
        assert_eq!(encoded[0], 0x80);
        assert!(encoded[1..].iter().all(|&b| b == 0));
        let decoded = c.decode(&encoded, 0, &DefaultCoerce).unwrap();
        assert_eq!(decoded.value, Value::Int(min));

        let too_small = min.checked_sub(&BigNumber::from_u64(1)).unwrap();
        assert!(c.encode(&Value::Int(too_small)).is_err());

        let max = U256::MAX;
        assert!(coder("uint256").encode(&Value::from(max)).is_ok());
    }

    #[test]
    fn test_negative_sign_extends() {
        let encoded = coder("int16").encode(&Value::from(-1)).unwrap();
        assert_eq!(encoded, vec![0xff; 32]);
        let decoded = coder("int16").decode(&encoded, 0, &RawCoerce).unwrap();
        assert_eq!(decoded.value, Value::Number(-1));
    }

    #[test]
    fn test_number_string_inputs() {
        let c = coder("uint256");
        let from_hex = c.encode(&Value::from("0xff")).unwrap();
        let from_dec = c.encode(&Value::from("255")).unwrap();
        assert_eq!(from_hex, from_dec);
        assert!(c.encode(&Value::from("twelve")).is_err());
        assert!(c.encode(&Value::Bool(true)).is_err());
    }

    #[test]
    fn test_number_decode_ignores_high_bytes() {
        let mut word = [0xffu8; 32];
        word[31] = 0x07;
        let decoded = coder("uint8").decode(&word, 0, &DefaultCoerce).unwrap();
        assert_eq!(decoded.value, Value::Number(7));
        assert_eq!(decoded.consumed, 32);
    }

    #[test]
    fn test_number_coercion() {
        let encoded = coder("uint64").encode(&Value::from(5)).unwrap();
        let decoded = coder("uint64").decode(&encoded, 0, &DefaultCoerce).unwrap();
        assert!(matches!(decoded.value, Value::Int(_)));
        let decoded = coder("uint48").decode(&encoded, 0, &DefaultCoerce).unwrap();
        assert!(matches!(decoded.value, Value::Number(5)));
    }

    #[test]
    fn test_number_insufficient_data() {
        let err = coder("uint256").decode(&[0u8; 31], 0, &DefaultCoerce).unwrap_err();
        assert_eq!(err.reason(), "insufficient data for uint256 type");
        assert_eq!(err.context().and_then(|c| c.arg.as_deref()), Some("x"));
    }

    // ==================== Booleans ====================

    #[test]
    fn test_boolean() {
        let c = coder("bool");
        let encoded = c.encode(&Value::Bool(true)).unwrap();
        assert_eq!(encoded[31], 1);
        assert_eq!(c.encode(&Value::from(0)).unwrap(), vec![0u8; 32]);

        let decoded = c.decode(&encoded, 0, &DefaultCoerce).unwrap();
        assert_eq!(decoded.value, Value::Bool(true));

        let err = c.decode(&[0u8; 8], 0, &DefaultCoerce).unwrap_err();
        assert_eq!(err.reason(), "insufficient data for boolean type");
        assert_eq!(
            err.context().and_then(|c| c.coder_type.as_deref()),
            Some("boolean")
        );
    }

    // ==================== Bytes ====================

    #[test]
    fn test_fixed_bytes() {
        let c = coder("bytes4");
        let encoded = c.encode(&Value::from("0xa9059cbb")).unwrap();
        assert_eq!(
            hex_word(&encoded),
            "a9059cbb00000000000000000000000000000000000000000000000000000000"
        );
        let decoded = c.decode(&encoded, 0, &DefaultCoerce).unwrap();
        assert_eq!(decoded.value, Value::Bytes(vec![0xa9, 0x05, 0x9c, 0xbb]));

        let err = c.encode(&Value::Bytes(vec![1, 2, 3])).unwrap_err();
        assert_eq!(err.reason(), "invalid bytes4 value");
    }

    #[test]
    fn test_dynamic_bytes() {
        let c = coder("bytes");
        let encoded = c.encode(&Value::Bytes(vec![0xde, 0xad])).unwrap();
        assert_eq!(encoded.len(), 64);
        assert_eq!(encoded[31], 2);
        assert_eq!(&encoded[32..34], &[0xde, 0xad]);

        let decoded = c.decode(&encoded, 0, &DefaultCoerce).unwrap();
        assert_eq!(decoded.value, Value::Bytes(vec![0xde, 0xad]));
        assert_eq!(decoded.consumed, 64);

        let empty = c.encode(&Value::Bytes(vec![])).unwrap();
        assert_eq!(empty, vec![0u8; 32]);
    }

    #[test]
    fn test_dynamic_bytes_errors() {
        let c = coder("bytes");
        let err = c.decode(&[0u8; 10], 0, &DefaultCoerce).unwrap_err();
        assert_eq!(err.reason(), "insufficient data for dynamicBytes length");

        let mut data = vec![0u8; 64];
        data[31] = 40;
        let err = c.decode(&data, 0, &DefaultCoerce).unwrap_err();
        assert_eq!(err.reason(), "insufficient data for dynamicBytes type");

        let mut data = vec![0u8; 64];
        data[0] = 1;
        let err = c.decode(&data, 0, &DefaultCoerce).unwrap_err();
        assert_eq!(err.reason(), "dynamic bytes count too large");

        let err = c.encode(&Value::from(3)).unwrap_err();
        assert_eq!(err.reason(), "invalid bytes value");
    }

    // ==================== Strings ====================

    #[test]
    fn test_string() {
        let c = coder("string");
        let encoded = c.encode(&Value::from("hi")).unwrap();
        assert_eq!(encoded[31], 2);
        assert_eq!(&encoded[32..34], b"hi");
        let decoded = c.decode(&encoded, 0, &DefaultCoerce).unwrap();
        assert_eq!(decoded.value, Value::from("hi"));

        let err = c.encode(&Value::Bytes(b"hi".to_vec())).unwrap_err();
        assert_eq!(err.reason(), "invalid string value");
    }

    #[test]
    fn test_string_rejects_bad_utf8() {
        let encoded = coder("bytes").encode(&Value::Bytes(vec![0xff, 0xfe])).unwrap();
        assert!(coder("string").decode(&encoded, 0, &DefaultCoerce).is_err());
    }

    // ==================== Addresses ====================

    #[test]
    fn test_address() {
        let c = coder("address");
        let input = "0x8ba1f109551bd432803012645ac136ddd64dba72";
        let encoded = c.encode(&Value::from(input)).unwrap();
        assert!(encoded[..12].iter().all(|&b| b == 0));
        assert_eq!(encoded[12], 0x8b);

        let decoded = c.decode(&encoded, 0, &DefaultCoerce).unwrap();
        assert_eq!(
            decoded.value,
            Value::Address("0x8ba1f109551bD432803012645Ac136ddd64DBA72".to_string())
        );

        let icap = c.encode(&Value::from("XE65GB6LDNXYOFTX0NSV3FUWKOWIXAMJK36")).unwrap();
        assert_eq!(icap, encoded);
    }

    #[test]
    fn test_address_errors() {
        let c = coder("address");
        let err = c
            .encode(&Value::from("0x8ba1f109551bD432803012645Ac136ddd64DBa72"))
            .unwrap_err();
        assert_eq!(err.reason(), "invalid address");
        assert!(c.encode(&Value::from(1)).is_err());
        let err = c.decode(&[0u8; 20], 0, &DefaultCoerce).unwrap_err();
        assert_eq!(err.reason(), "insufficient data for address type");
    }

    // ==================== Null ====================

    #[test]
    fn test_null() {
        let c = Coder::new(CoderKind::Null, "");
        assert!(c.encode(&Value::from(1)).unwrap().is_empty());
        let decoded = c.decode(&[0u8; 4], 4, &DefaultCoerce).unwrap();
        assert_eq!(decoded, Decoded { value: Value::Null, consumed: 0 });
        assert_eq!(c.decode(&[0u8; 4], 5, &DefaultCoerce).unwrap_err().reason(), "invalid null");
    }
}
