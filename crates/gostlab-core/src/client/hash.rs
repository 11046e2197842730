//! `POST /hash`: upload a file, get its hash back as JSON.

use super::{check_input_file, endpoint, json_error_message, server_error};
use crate::error::ClientError;
use crate::upload::{post_multipart, FormPart, TransportOptions, UploadProgress, UploadRequest, UploadResponse};
use serde::Deserialize;
use std::path::Path;

const FALLBACK_MESSAGE: &str = "could not compute hash, try again later";

#[derive(Debug, Deserialize)]
struct HashBody {
    #[serde(default)]
    hash: Option<String>,
}

/// Uploads `input` to `{server_url}/hash` and returns the hex hash.
///
/// The file is checked against `min_size` before anything is sent.
pub fn request_hash(
    server_url: &str,
    input: &Path,
    min_size: u64,
    opts: &TransportOptions,
    on_progress: &mut dyn FnMut(UploadProgress),
) -> Result<String, ClientError> {
    let size = check_input_file(input, min_size)?;
    let request = UploadRequest {
        url: endpoint(server_url, "hash")?,
        parts: vec![FormPart::file("file", input)],
    };
    tracing::info!(file = %input.display(), size, "requesting hash");

    let response = post_multipart(&request, opts, on_progress)?;
    interpret_response(&response)
}

fn interpret_response(response: &UploadResponse) -> Result<String, ClientError> {
    if !response.is_success() {
        let message = json_error_message(&response.body)
            .ok()
            .flatten()
            .unwrap_or_else(|| FALLBACK_MESSAGE.to_string());
        return Err(server_error(response, message));
    }

    match serde_json::from_slice::<HashBody>(&response.body) {
        Ok(HashBody { hash: Some(hash) }) if !hash.is_empty() => Ok(hash),
        Ok(_) => Err(ClientError::MalformedResponse(
            "response has no hash field".to_string(),
        )),
        Err(e) => Err(ClientError::MalformedResponse(format!(
            "response is not JSON: {}",
            e
        ))),
    }
}
