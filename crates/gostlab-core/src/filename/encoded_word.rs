//! RFC 2047 encoded words (`=?UTF-8?B?...?=` / `=?UTF-8?Q?...?=`).
//!
//! Only the UTF-8 charset is recognized. Decoding never fails: a payload that
//! cannot be decoded is handed back in its best-effort form.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;

use super::content_disposition::hex_digit;

const PREFIX: &str = "=?utf-8?";

/// Padding is optional and stray trailing bits are ignored, matching the
/// leniency browsers apply to base64 text.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Encoding tag of an encoded word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// `B`: base64.
    Base64,
    /// `Q`: quoted-printable variant with `_` for space.
    Quoted,
}

impl Encoding {
    fn from_tag(tag: u8) -> Option<Self> {
        match tag.to_ascii_lowercase() {
            b'b' => Some(Encoding::Base64),
            b'q' => Some(Encoding::Quoted),
            _ => None,
        }
    }
}

/// An encoded word located inside a header value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodedWord<'a> {
    pub encoding: Encoding,
    /// Text between the encoding tag and the closing `?=`.
    pub payload: &'a str,
}

/// Finds the leftmost `=?UTF-8?(B|Q)?payload?=` in `header_value`, ignoring case.
/// The payload must be non-empty and contain no `?`.
pub fn find_encoded_word(header_value: &str) -> Option<EncodedWord<'_>> {
    let lowered = header_value.to_ascii_lowercase();
    let bytes = header_value.as_bytes();
    let mut from = 0;

    while let Some(pos) = lowered[from..].find(PREFIX) {
        let start = from + pos;
        from = start + 1;

        let tag_at = start + PREFIX.len();
        let Some(encoding) = bytes.get(tag_at).copied().and_then(Encoding::from_tag) else {
            continue;
        };
        if bytes.get(tag_at + 1) != Some(&b'?') {
            continue;
        }

        let payload_start = tag_at + 2;
        let rest = &header_value[payload_start..];
        let Some(len) = rest.find('?') else {
            continue;
        };
        if len == 0 || !rest[len..].starts_with("?=") {
            continue;
        }

        return Some(EncodedWord {
            encoding,
            payload: &rest[..len],
        });
    }
    None
}

impl EncodedWord<'_> {
    /// Decodes the payload; never fails.
    pub fn decode(&self) -> String {
        match self.encoding {
            Encoding::Base64 => decode_base64(self.payload),
            Encoding::Quoted => decode_quoted(self.payload),
        }
    }
}

/// Finds and decodes the first encoded word, if any.
pub fn decode_encoded_word(header_value: &str) -> Option<String> {
    find_encoded_word(header_value).map(|word| word.decode())
}

/// Base64 payload to text. Decoded bytes are read as UTF-8; bytes that are
/// not UTF-8 map one-to-one onto Latin-1 characters. Only a payload that is
/// not base64 at all comes back unchanged.
fn decode_base64(payload: &str) -> String {
    let compact: String = payload
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    let bytes = match LENIENT_BASE64.decode(compact.as_bytes()) {
        Ok(b) => b,
        Err(e) => {
            tracing::debug!(payload, "B-encoded word is not base64 ({}), using raw payload", e);
            return payload.to_string();
        }
    };
    match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => e.into_bytes().into_iter().map(char::from).collect(),
    }
}

/// `_` becomes a space, `=XX` becomes the byte 0xXX, every other character
/// contributes its code point truncated to one byte. Non-ASCII characters
/// that were not `=XX` escaped are therefore lossy.
fn decode_quoted(payload: &str) -> String {
    let text = payload.replace('_', " ");
    let chars: Vec<char> = text.chars().collect();
    let mut bytes = Vec::with_capacity(chars.len());

    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c == '=' && i + 2 < chars.len() {
            if let (Some(h), Some(l)) = (char_hex(chars[i + 1]), char_hex(chars[i + 2])) {
                bytes.push(h << 4 | l);
                i += 3;
                continue;
            }
        }
        bytes.push(c as u8);
        i += 1;
    }

    match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            tracing::debug!(payload, "Q-encoded word is not UTF-8 ({}), using substituted text", e);
            text
        }
    }
}

fn char_hex(c: char) -> Option<u8> {
    if c.is_ascii() {
        hex_digit(c as u8)
    } else {
        None
    }
}
