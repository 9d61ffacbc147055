//! Head/tail layout of tuple and array members

use std::collections::HashSet;

use tabi_primitives::MAX_SAFE_INTEGER;

use super::leaf::{read_word, usize_word};
use super::{Coder, WORD};
use crate::coerce::Coerce;
use crate::error::{AbiError, ErrorContext};
use crate::value::{Value, Values};

static NULL: Value = Value::Null;

/// Member values of a tuple, given as a list or as a record keyed by name
pub(crate) fn tuple_values<'v>(coders: &[Coder], value: &'v Value) -> Result<Vec<&'v Value>, AbiError> {
    let values: Vec<&Value> = match value {
        Value::List(list) => list.iter().collect(),
        Value::Record(record) => {
            let mut seen = HashSet::new();
            let mut values = Vec::with_capacity(coders.len());
            for coder in coders {
                let name = coder.local_name.as_str();
                if name.is_empty() {
                    return Err(AbiError::invalid(
                        "cannot encode object for signature with missing names",
                        ErrorContext::new().coder_type("tuple").value(value),
                    ));
                }
                if !seen.insert(name) {
                    return Err(AbiError::invalid(
                        "cannot encode object for signature with duplicate names",
                        ErrorContext::new().arg(name).coder_type("tuple").value(value),
                    ));
                }
                values.push(record.get(name).unwrap_or(&NULL));
            }
            values
        }
        other => {
            return Err(AbiError::invalid(
                "invalid tuple value",
                ErrorContext::new().coder_type("tuple").value(other),
            ))
        }
    };

    if values.len() != coders.len() {
        return Err(AbiError::invalid(
            "types/value length mismatch",
            ErrorContext::new().coder_type("tuple").value(value),
        ));
    }
    Ok(values)
}

/// Encode members into one buffer: static parts and offsets in the head,
/// dynamic parts in the tail
pub(crate) fn pack<'c, 'v>(
    members: impl IntoIterator<Item = (&'c Coder, &'v Value)>,
) -> Result<Vec<u8>, AbiError> {
    let parts = members
        .into_iter()
        .map(|(coder, value)| Ok((coder.is_dynamic(), coder.encode(value)?)))
        .collect::<Result<Vec<_>, AbiError>>()?;

    let static_size: usize = parts
        .iter()
        .map(|(dynamic, part)| if *dynamic { WORD } else { part.len() })
        .sum();
    let dynamic_size: usize = parts
        .iter()
        .filter(|(dynamic, _)| *dynamic)
        .map(|(_, part)| part.len())
        .sum();

    let mut data = vec![0u8; static_size + dynamic_size];
    let mut head = 0;
    let mut tail = static_size;

    for (dynamic, part) in &parts {
        if *dynamic {
            data[head..head + WORD].copy_from_slice(&usize_word(tail));
            head += WORD;
            data[tail..tail + part.len()].copy_from_slice(part);
            tail += part.len();
        } else {
            data[head..head + part.len()].copy_from_slice(part);
            head += part.len();
        }
    }

    Ok(data)
}

/// Decode members laid out by [`pack`] starting at `offset`
///
/// Returns the values and the size of the head. `Null` members are left out
/// of the positional list; named members also get an alias.
pub(crate) fn unpack<'c>(
    coders: impl IntoIterator<Item = &'c Coder>,
    data: &[u8],
    offset: usize,
    coerce: &dyn Coerce,
) -> Result<(Values, usize), AbiError> {
    let mut values = Values::new();
    let mut cursor = offset;

    for coder in coders {
        let value = if coder.is_dynamic() {
            let pointer = read_word(data, cursor).ok_or_else(|| {
                AbiError::invalid(
                    "insufficient data for uint256 type",
                    ErrorContext::new()
                        .arg(&coder.local_name)
                        .coder_type("uint256")
                        .value(tabi_primitives::bytes::hexlify(data.get(cursor..).unwrap_or_default())),
                )
            })?;
            let target = usize::try_from(pointer)
                .ok()
                .filter(|&p| p as u64 <= MAX_SAFE_INTEGER)
                .and_then(|p| offset.checked_add(p))
                .ok_or_else(|| {
                    AbiError::invalid(
                        "dynamic offset too large",
                        ErrorContext::new().arg(&coder.local_name).value(pointer),
                    )
                })?;
            let decoded = coder.decode(data, target, coerce)?;
            cursor += WORD;
            decoded.value
        } else {
            let decoded = coder.decode(data, cursor, coerce)?;
            cursor += decoded.consumed;
            decoded.value
        };

        if value.is_null() {
            continue;
        }
        let index = values.push(value);

        if !coder.local_name.is_empty() {
            let alias = match coder.local_name.as_str() {
                "length" => "_length",
                name => name,
            };
            values.set_alias(alias, index);
        }
    }

    Ok((values, cursor - offset))
}
