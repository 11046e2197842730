//! `POST /cipher`: Magma counter-mode encryption/decryption of an uploaded file.
//!
//! The service answers with the processed bytes and a `Content-Disposition`
//! header; the name the result is saved under comes from [`resolve_filename`].

use super::{check_input_file, endpoint, json_error_message, server_error};
use crate::error::ClientError;
use crate::filename::{resolve_filename, FilenameInputs};
use crate::upload::{post_multipart, FormPart, TransportOptions, UploadProgress, UploadRequest, UploadResponse};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

const FALLBACK_MESSAGE: &str = "could not process file";
const UNREADABLE_MESSAGE: &str = "could not read server response";
const NON_JSON_MESSAGE: &str = "server error";

/// Direction of the cipher operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CipherMode {
    Encrypt,
    Decrypt,
}

impl CipherMode {
    /// Value of the `mode` form field.
    pub fn as_str(&self) -> &'static str {
        match self {
            CipherMode::Encrypt => "encrypt",
            CipherMode::Decrypt => "decrypt",
        }
    }
}

impl fmt::Display for CipherMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid mode {0:?}: use encrypt or decrypt")]
pub struct ParseModeError(String);

impl FromStr for CipherMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "encrypt" => Ok(CipherMode::Encrypt),
            "decrypt" => Ok(CipherMode::Decrypt),
            _ => Err(ParseModeError(s.to_string())),
        }
    }
}

/// Where the 256-bit key comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySource {
    /// 64 hex characters typed by the user.
    Hex(String),
    /// File with the key, either 32 raw bytes or hex text; interpreted by the server.
    File(PathBuf),
}

/// A cipher request as entered by the user.
#[derive(Debug, Clone)]
pub struct CipherRequest {
    /// File to encrypt or decrypt.
    pub input: PathBuf,
    pub key: KeySource,
    /// Initial counter value, up to 16 hex characters.
    pub counter: String,
    pub mode: CipherMode,
    /// Name the user wants for the result; also sent to the server.
    pub output_name: Option<String>,
}

/// Processed bytes plus the name to save them under.
#[derive(Debug, Clone)]
pub struct CipherOutput {
    pub filename: String,
    pub data: Vec<u8>,
}

impl CipherRequest {
    /// Local checks done before uploading anything.
    pub fn validate(&self, min_size: u64) -> Result<(), ClientError> {
        check_input_file(&self.input, min_size)?;
        match &self.key {
            KeySource::Hex(hex) if hex.trim().is_empty() => {
                return Err(ClientError::validation(
                    "set a 256-bit key as hex or provide a key file",
                ));
            }
            KeySource::File(path) if !path.is_file() => {
                return Err(ClientError::validation(format!(
                    "key file {} not found",
                    path.display()
                )));
            }
            _ => {}
        }
        if self.counter.trim().is_empty() {
            return Err(ClientError::validation(
                "enter the initial counter value (64-bit hex)",
            ));
        }
        Ok(())
    }

    fn form_parts(&self) -> Vec<FormPart> {
        let mut parts = vec![FormPart::file("file", &self.input)];
        match &self.key {
            KeySource::Hex(hex) => parts.push(FormPart::text("keyHex", hex.trim())),
            KeySource::File(path) => parts.push(FormPart::file("keyFile", path)),
        }
        parts.push(FormPart::text("counter", self.counter.trim()));
        parts.push(FormPart::text("mode", self.mode.as_str()));
        if let Some(name) = self.requested_name() {
            parts.push(FormPart::text("outputName", name));
        }
        parts
    }

    fn requested_name(&self) -> Option<&str> {
        self.output_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
    }

    fn source_name(&self) -> Option<&str> {
        self.input.file_name().and_then(|n| n.to_str())
    }
}

/// Validates `request`, uploads it to `{server_url}/cipher` and returns the
/// processed bytes with their resolved filename.
pub fn request_cipher(
    server_url: &str,
    request: &CipherRequest,
    min_size: u64,
    opts: &TransportOptions,
    on_progress: &mut dyn FnMut(UploadProgress),
) -> Result<CipherOutput, ClientError> {
    request.validate(min_size)?;
    let upload = UploadRequest {
        url: endpoint(server_url, "cipher")?,
        parts: request.form_parts(),
    };
    tracing::info!(file = %request.input.display(), mode = %request.mode, "requesting cipher");

    let response = post_multipart(&upload, opts, on_progress)?;
    interpret_response(request, response)
}

fn interpret_response(
    request: &CipherRequest,
    response: UploadResponse,
) -> Result<CipherOutput, ClientError> {
    if !response.is_success() {
        return Err(server_error(&response, error_message(&response)));
    }

    let filename = resolve_filename(&FilenameInputs {
        content_disposition: response.headers.content_disposition.as_deref(),
        output_name: request.output_name.as_deref(),
        source_name: request.source_name(),
    });
    Ok(CipherOutput {
        filename,
        data: response.body,
    })
}

fn error_message(response: &UploadResponse) -> String {
    if !response.is_json() {
        return NON_JSON_MESSAGE.to_string();
    }
    match json_error_message(&response.body) {
        Ok(Some(message)) => message,
        Ok(None) => FALLBACK_MESSAGE.to_string(),
        Err(()) => UNREADABLE_MESSAGE.to_string(),
    }
}
