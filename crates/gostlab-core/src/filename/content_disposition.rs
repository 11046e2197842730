//! Content-Disposition parameter extraction (`filename*` and `filename`).

use thiserror::Error;

/// Failure while percent-decoding an RFC 5987 value.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PercentDecodeError {
    /// `%` not followed by two hex digits.
    #[error("invalid percent escape at byte {offset}")]
    InvalidEscape { offset: usize },
    /// Escapes decoded to bytes that are not UTF-8.
    #[error("decoded bytes are not UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

/// Extracts the RFC 5987 `filename*=` value.
///
/// The `UTF-8''` prefix (any case) and all `"` characters are removed, then
/// the rest is percent-decoded. When decoding fails the undecoded string is
/// returned as-is.
pub fn extended_filename(header_value: &str) -> Option<String> {
    let raw = param_value(header_value, "filename*=")?.trim();
    let without_prefix = strip_prefix_ignore_case(raw, "UTF-8''").unwrap_or(raw);
    let unquoted: String = without_prefix.chars().filter(|&c| c != '"').collect();

    match percent_decode(&unquoted) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            tracing::debug!(value = %unquoted, "filename* not decodable ({}), using raw value", e);
            Some(unquoted)
        }
    }
}

/// Extracts the plain `filename=` value with quotes stripped and whitespace trimmed.
pub fn plain_filename(header_value: &str) -> Option<String> {
    let raw = param_value(header_value, "filename=")?;
    let unquoted: String = raw.chars().filter(|&c| c != '"').collect();
    Some(unquoted.trim().to_string())
}

/// Returns the text following the first case-insensitive occurrence of `key`
/// up to the next `;`. Occurrences with nothing before the `;` are skipped.
fn param_value<'a>(header_value: &'a str, key: &str) -> Option<&'a str> {
    // ASCII lowercasing keeps byte offsets aligned with the original.
    let lowered = header_value.to_ascii_lowercase();
    let key = key.to_ascii_lowercase();
    let mut from = 0;

    while let Some(pos) = lowered[from..].find(&key) {
        let start = from + pos + key.len();
        let rest = &header_value[start..];
        let end = rest.find(';').unwrap_or(rest.len());
        if end > 0 {
            return Some(&rest[..end]);
        }
        from = start;
    }
    None
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(&s[prefix.len()..])
    } else {
        None
    }
}

/// Strict percent-decode: every `%` must start a two-digit hex escape and the
/// decoded bytes must form valid UTF-8. `+` is left alone.
pub(crate) fn percent_decode(input: &str) -> Result<String, PercentDecodeError> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let high = bytes.get(i + 1).copied().and_then(hex_digit);
            let low = bytes.get(i + 2).copied().and_then(hex_digit);
            match (high, low) {
                (Some(h), Some(l)) => {
                    out.push(h << 4 | l);
                    i += 3;
                }
                _ => return Err(PercentDecodeError::InvalidEscape { offset: i }),
            }
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    Ok(String::from_utf8(out)?)
}

pub(crate) fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}
