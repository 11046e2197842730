//! Parse HTTP response header lines into the fields an upload needs.

/// Headers of interest from an upload response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHeaders {
    /// `Content-Type` value, if present.
    pub content_type: Option<String>,
    /// `Content-Disposition` value, if present (filename hint).
    pub content_disposition: Option<String>,
}

/// Header bytes as text: UTF-8 when valid, otherwise each byte is read as
/// a Latin-1 character so a non-UTF-8 filename still reaches the resolver.
pub(crate) fn decode_header_line(data: &[u8]) -> String {
    match std::str::from_utf8(data) {
        Ok(s) => s.to_string(),
        Err(_) => data.iter().map(|&b| b as char).collect(),
    }
}

/// Parse collected header lines.
///
/// libcurl reports the headers of every response it sees while following
/// redirects; a status line starts a new block so only the final response counts.
pub(crate) fn parse_headers(lines: &[String]) -> ResponseHeaders {
    let mut parsed = ResponseHeaders::default();

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("HTTP/") {
            parsed = ResponseHeaders::default();
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            let value = value.trim();
            if name.eq_ignore_ascii_case("content-type") {
                parsed.content_type = Some(value.to_string());
            }
            if name.eq_ignore_ascii_case("content-disposition") {
                parsed.content_disposition = Some(value.to_string());
            }
        }
    }

    parsed
}
