//! Multipart form uploads.
//!
//! Uses the curl crate (libcurl) to POST a `multipart/form-data` body, report
//! upload progress, and collect the response status, relevant headers and body.

mod parse;
mod progress;

pub use parse::ResponseHeaders;
pub use progress::UploadProgress;

use crate::error::ClientError;
use progress::ProgressTracker;
use std::path::PathBuf;
use std::time::Duration;

/// Timeouts applied to one upload.
#[derive(Debug, Clone, Copy)]
pub struct TransportOptions {
    pub connect_timeout: Duration,
    pub timeout: Duration,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(15),
            timeout: Duration::from_secs(300),
        }
    }
}

/// One field of a multipart form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPart {
    /// Plain text field.
    Text { name: String, value: String },
    /// File field; libcurl sends the file's base name as the part filename.
    File { name: String, path: PathBuf },
}

impl FormPart {
    pub fn text(name: &str, value: impl Into<String>) -> Self {
        FormPart::Text {
            name: name.to_string(),
            value: value.into(),
        }
    }

    pub fn file(name: &str, path: impl Into<PathBuf>) -> Self {
        FormPart::File {
            name: name.to_string(),
            path: path.into(),
        }
    }
}

/// A multipart POST to send.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub url: String,
    pub parts: Vec<FormPart>,
}

/// What came back from the server.
#[derive(Debug, Clone)]
pub struct UploadResponse {
    /// HTTP status of the final response.
    pub status: u32,
    pub headers: ResponseHeaders,
    pub body: Vec<u8>,
}

impl UploadResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// True if `Content-Type` mentions `application/json`.
    pub fn is_json(&self) -> bool {
        self.headers
            .content_type
            .as_deref()
            .map(|ct| ct.to_ascii_lowercase().contains("application/json"))
            .unwrap_or(false)
    }
}

/// Performs the multipart POST and returns the response, whatever its status.
///
/// `on_progress` is called on the current thread whenever the upload
/// percentage changes. Runs in the current thread; call from
/// `spawn_blocking` if used from async code.
pub fn post_multipart(
    request: &UploadRequest,
    opts: &TransportOptions,
    on_progress: &mut dyn FnMut(UploadProgress),
) -> Result<UploadResponse, ClientError> {
    let mut form = curl::easy::Form::new();
    for part in &request.parts {
        match part {
            FormPart::Text { name, value } => {
                form.part(name).contents(value.as_bytes()).add()?;
            }
            FormPart::File { name, path } => {
                form.part(name).file(path).add()?;
            }
        }
    }

    let mut headers: Vec<String> = Vec::new();
    let mut body: Vec<u8> = Vec::new();
    let mut tracker = ProgressTracker::default();

    let mut easy = curl::easy::Easy::new();
    easy.url(&request.url)?;
    easy.httppost(form)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.connect_timeout(opts.connect_timeout)?;
    easy.timeout(opts.timeout)?;
    easy.progress(true)?;

    tracing::debug!(url = %request.url, parts = request.parts.len(), "starting upload");

    {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            headers.push(parse::decode_header_line(data).trim_end().to_string());
            true
        })?;
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.progress_function(|_dltotal, _dlnow, ultotal, ulnow| {
            if let Some(p) = tracker.update(ulnow, ultotal) {
                on_progress(p);
            }
            true
        })?;
        transfer.perform()?;
    }

    let status = easy.response_code()?;
    let headers = parse::parse_headers(&headers);
    tracing::debug!(
        url = %request.url,
        status,
        bytes = body.len(),
        "upload finished"
    );

    Ok(UploadResponse {
        status,
        headers,
        body,
    })
}
