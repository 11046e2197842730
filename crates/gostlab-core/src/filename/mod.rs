//! Filename resolution for downloaded results.
//!
//! Picks the name a returned blob is saved under, trying progressively weaker
//! sources: the response's `Content-Disposition` header, the name the user
//! asked for, and finally the uploaded file's own name.

mod content_disposition;
mod encoded_word;
mod sanitize;
mod source;

pub use content_disposition::{extended_filename, plain_filename, PercentDecodeError};
pub use encoded_word::{decode_encoded_word, find_encoded_word, EncodedWord, Encoding};
pub use sanitize::sanitize_filename;
pub(crate) use sanitize::{truncate_bytes, NAME_MAX};
pub use source::derive_from_source;

/// Last-resort filename when every other source is empty.
pub const DEFAULT_FILENAME: &str = "result.bin";

/// Inputs available when a download response completes.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilenameInputs<'a> {
    /// Raw `Content-Disposition` header value, if the response had one.
    pub content_disposition: Option<&'a str>,
    /// Output name entered by the user.
    pub output_name: Option<&'a str>,
    /// Name of the file that was uploaded.
    pub source_name: Option<&'a str>,
}

struct Stage {
    name: &'static str,
    candidate: fn(&FilenameInputs<'_>) -> Option<String>,
}

/// Resolution order; the first stage producing a non-empty name wins.
const STAGES: &[Stage] = &[
    Stage {
        name: "filename*",
        candidate: from_extended_param,
    },
    Stage {
        name: "filename",
        candidate: from_plain_param,
    },
    Stage {
        name: "encoded-word",
        candidate: from_encoded_word,
    },
    Stage {
        name: "output-name",
        candidate: from_output_name,
    },
    Stage {
        name: "source-name",
        candidate: from_source_name,
    },
];

/// Resolves the filename to save a downloaded blob under. Never empty.
///
/// # Examples
///
/// - header `attachment; filename*=UTF-8''result%20file.bin` → `"result file.bin"`
/// - no header, source `document.gost` → `"document"`
/// - no header, source `.gost` → `"result.bin"`
pub fn resolve_filename(inputs: &FilenameInputs<'_>) -> String {
    for stage in STAGES {
        if let Some(name) = (stage.candidate)(inputs).filter(|n| !n.is_empty()) {
            tracing::debug!(source = stage.name, filename = %name, "resolved output filename");
            return name;
        }
    }
    tracing::debug!("no filename candidate, using {}", DEFAULT_FILENAME);
    DEFAULT_FILENAME.to_string()
}

fn from_extended_param(inputs: &FilenameInputs<'_>) -> Option<String> {
    inputs.content_disposition.and_then(extended_filename)
}

fn from_plain_param(inputs: &FilenameInputs<'_>) -> Option<String> {
    inputs.content_disposition.and_then(plain_filename)
}

fn from_encoded_word(inputs: &FilenameInputs<'_>) -> Option<String> {
    inputs.content_disposition.and_then(decode_encoded_word)
}

fn from_output_name(inputs: &FilenameInputs<'_>) -> Option<String> {
    inputs.output_name.map(|n| n.trim().to_string())
}

fn from_source_name(inputs: &FilenameInputs<'_>) -> Option<String> {
    inputs.source_name.and_then(derive_from_source)
}
