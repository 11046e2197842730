//! Requests against the hash and cipher endpoints of the service.

pub mod cipher;
pub mod hash;

use crate::error::ClientError;
use crate::upload::UploadResponse;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Joins `path` onto the service base URL. A base without a trailing slash is
/// treated as a directory so `http://host/lab` + `hash` gives `http://host/lab/hash`.
pub fn endpoint(server_url: &str, path: &str) -> Result<String, ClientError> {
    let mut base = server_url.trim().to_string();
    if !base.ends_with('/') {
        base.push('/');
    }
    let base = url::Url::parse(&base)
        .map_err(|e| ClientError::validation(format!("invalid server URL {:?}: {}", server_url, e)))?;
    let joined = base
        .join(path)
        .map_err(|e| ClientError::validation(format!("invalid endpoint {:?}: {}", path, e)))?;
    Ok(joined.to_string())
}

/// Checks that `path` is a regular file of at least `min_size` bytes; returns its size.
pub fn check_input_file(path: &Path, min_size: u64) -> Result<u64, ClientError> {
    let meta = match fs::metadata(path) {
        Ok(m) if m.is_file() => m,
        Ok(_) => {
            return Err(ClientError::validation(format!(
                "{} is not a regular file",
                path.display()
            )))
        }
        Err(e) => {
            return Err(ClientError::validation(format!(
                "cannot open {}: {}",
                path.display(),
                e
            )))
        }
    };
    if meta.len() < min_size {
        return Err(ClientError::validation(format!(
            "file must be at least {} bytes ({} has {})",
            min_size,
            path.display(),
            meta.len()
        )));
    }
    Ok(meta.len())
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

/// Message of a JSON `{"error": "..."}` body.
///
/// `Err(())` when the body is not JSON at all; `Ok(None)` when it is JSON
/// without a usable `error` field.
fn json_error_message(body: &[u8]) -> Result<Option<String>, ()> {
    match serde_json::from_slice::<ErrorBody>(body) {
        Ok(parsed) => Ok(parsed.error.filter(|m| !m.trim().is_empty())),
        Err(e) => {
            tracing::debug!("error body is not JSON: {}", e);
            Err(())
        }
    }
}

fn server_error(response: &UploadResponse, message: String) -> ClientError {
    tracing::warn!(status = response.status, "server rejected request: {}", message);
    ClientError::Server {
        status: response.status,
        message,
    }
}
