//! Error type for requests against the hash/cipher service.

use thiserror::Error;

/// Failure of a hash or cipher request.
///
/// `Validation` errors are raised before anything is sent; the rest come from
/// the transfer or the server's answer.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Input rejected locally (missing file, file too small, no key, ...).
    #[error("{0}")]
    Validation(String),
    /// Server answered with a non-2xx status.
    #[error("server returned HTTP {status}: {message}")]
    Server { status: u32, message: String },
    /// Connection, timeout, or other libcurl failure.
    #[error("request failed: {0}")]
    Transport(#[from] curl::Error),
    /// Building the multipart form failed (e.g. unreadable part).
    #[error("multipart form: {0}")]
    Form(#[from] curl::FormError),
    /// Local file could not be read or written.
    #[error("i/o: {0}")]
    Io(#[from] std::io::Error),
    /// 2xx response without the expected payload.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl ClientError {
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        ClientError::Validation(msg.into())
    }

    /// True when the request never left the machine because the input was rejected.
    pub fn is_validation(&self) -> bool {
        matches!(self, ClientError::Validation(_))
    }
}
