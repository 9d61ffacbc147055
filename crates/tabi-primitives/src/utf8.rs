//! Strict UTF-8 conversion and bytes32 string helpers

use thiserror::Error;

/// UTF-8 conversion error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Utf8Error {
    /// Malformed byte sequence
    #[error("invalid utf8 byte sequence; {0}")]
    InvalidSequence(&'static str),
    /// Unicode normalization is not available in this build
    #[error("platform missing unicode normalization: {0:?}")]
    UnsupportedNormalization(NormalizationForm),
    /// Text does not fit a bytes32 value
    #[error("bytes32 string must be less than 32 bytes")]
    TooLong,
    /// bytes32 value is malformed
    #[error("invalid bytes32 string: {0}")]
    InvalidBytes32(&'static str),
}

/// Unicode normalization applied before encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NormalizationForm {
    /// Leave the text as it is
    #[default]
    Current,
    /// Canonical composition
    Nfc,
    /// Canonical decomposition
    Nfd,
    /// Compatibility composition
    Nfkc,
    /// Compatibility decomposition
    Nfkd,
}

/// UTF-8 bytes of `text`
pub fn to_utf8_bytes(text: &str) -> Vec<u8> {
    text.as_bytes().to_vec()
}

/// UTF-8 bytes of `text` after normalization
///
/// Only [`NormalizationForm::Current`] is supported; other forms report
/// [`Utf8Error::UnsupportedNormalization`].
pub fn to_utf8_bytes_normalized(text: &str, form: NormalizationForm) -> Result<Vec<u8>, Utf8Error> {
    match form {
        NormalizationForm::Current => Ok(to_utf8_bytes(text)),
        other => Err(Utf8Error::UnsupportedNormalization(other)),
    }
}

/// Decode UTF-8, failing on any malformed sequence unless `ignore_errors`,
/// in which case malformed runs are skipped.
pub fn to_utf8_string(data: &[u8], ignore_errors: bool) -> Result<String, Utf8Error> {
    let mut result = String::with_capacity(data.len());
    let mut rest = data;

    loop {
        match std::str::from_utf8(rest) {
            Ok(valid) => {
                result.push_str(valid);
                return Ok(result);
            }
            Err(e) => {
                let (valid, after) = rest.split_at(e.valid_up_to());
                // valid_up_to marks a verified prefix
                if let Ok(text) = std::str::from_utf8(valid) {
                    result.push_str(text);
                }
                if !ignore_errors {
                    return Err(Utf8Error::InvalidSequence(describe(after)));
                }
                let skip = e.error_len().unwrap_or(after.len());
                rest = &after[skip..];
            }
        }
    }
}

fn describe(bad: &[u8]) -> &'static str {
    let lead = bad.first().copied().unwrap_or(0);
    let extra = match lead {
        b if b & 0xe0 == 0xc0 => 1,
        b if b & 0xf0 == 0xe0 => 2,
        b if b & 0xf8 == 0xf0 => 3,
        b if b & 0xc0 == 0x80 => return "unexpected continuation byte",
        _ => return "invalid prefix",
    };
    if bad.len() < 1 + extra {
        return "too short";
    }
    if bad[1..=extra].iter().any(|b| b & 0xc0 != 0x80) {
        return "invalid continuation byte";
    }
    let mut code = u32::from(lead) & ((1 << (7 - extra)) - 1);
    for b in &bad[1..=extra] {
        code = (code << 6) | u32::from(b & 0x3f);
    }
    let overlong = match extra {
        1 => 0x7f,
        2 => 0x7ff,
        _ => 0xffff,
    };
    if code <= overlong {
        "overlong"
    } else if code > 0x10ffff {
        "out-of-range"
    } else if (0xd800..=0xdfff).contains(&code) {
        "utf-16 surrogate"
    } else {
        "invalid sequence"
    }
}

/// Encode text as a zero-terminated bytes32 value
pub fn format_bytes32_string(text: &str) -> Result<[u8; 32], Utf8Error> {
    let bytes = to_utf8_bytes(text);
    if bytes.len() > 31 {
        return Err(Utf8Error::TooLong);
    }
    let mut result = [0u8; 32];
    result[..bytes.len()].copy_from_slice(&bytes);
    Ok(result)
}

/// Decode a zero-terminated bytes32 value
pub fn parse_bytes32_string(data: &[u8]) -> Result<String, Utf8Error> {
    if data.len() != 32 {
        return Err(Utf8Error::InvalidBytes32("not 32 bytes long"));
    }
    if data[31] != 0 {
        return Err(Utf8Error::InvalidBytes32("no null terminator"));
    }
    let length = data[..31].iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    to_utf8_string(&data[..length], false)
}
