//! Minimal HTTP/1.1 server that accepts multipart POSTs for integration tests.
//!
//! Answers every request with one canned response and records the raw request
//! (head and body) so tests can check which form fields were sent.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// Response the server sends for every request.
#[derive(Debug, Clone)]
pub struct CannedResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    /// Extra header lines written verbatim (CRLF-terminated), for non-UTF-8 values.
    pub raw_headers: Vec<u8>,
    pub body: Vec<u8>,
}

impl CannedResponse {
    pub fn json(status: u16, body: &str) -> Self {
        Self {
            status,
            headers: vec![("Content-Type".into(), "application/json".into())],
            raw_headers: Vec::new(),
            body: body.as_bytes().to_vec(),
        }
    }

    pub fn binary(body: &[u8], content_disposition: Option<&str>) -> Self {
        let mut headers = vec![("Content-Type".into(), "application/octet-stream".into())];
        if let Some(cd) = content_disposition {
            headers.push(("Content-Disposition".into(), cd.into()));
        }
        Self {
            status: 200,
            headers,
            raw_headers: Vec::new(),
            body: body.to_vec(),
        }
    }
}

/// Handle to a running server.
pub struct FormServer {
    /// Base URL, e.g. "http://127.0.0.1:12345/".
    pub url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl FormServer {
    /// Requests received so far, lossily decoded as text.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

/// Starts a server in a background thread. It runs until the process exits.
pub fn start(response: CannedResponse) -> FormServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&requests);
    let response = Arc::new(response);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let recorded = Arc::clone(&recorded);
            let response = Arc::clone(&response);
            thread::spawn(move || handle(stream, &response, &recorded));
        }
    });
    FormServer {
        url: format!("http://127.0.0.1:{}/", port),
        requests,
    }
}

fn handle(mut stream: TcpStream, response: &CannedResponse, recorded: &Mutex<Vec<String>>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(5)));

    let mut data = Vec::new();
    let mut buf = [0u8; 8192];
    let head_end = loop {
        if let Some(pos) = find(&data, b"\r\n\r\n") {
            break pos + 4;
        }
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => return,
            Ok(n) => data.extend_from_slice(&buf[..n]),
        }
    };

    let head = String::from_utf8_lossy(&data[..head_end]).to_string();
    let content_length = header(&head, "content-length")
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(0);
    if header(&head, "expect").map_or(false, |v| v.eq_ignore_ascii_case("100-continue")) {
        let _ = stream.write_all(b"HTTP/1.1 100 Continue\r\n\r\n");
    }

    while data.len() < head_end + content_length {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => break,
            Ok(n) => data.extend_from_slice(&buf[..n]),
        }
    }
    recorded
        .lock()
        .unwrap()
        .push(String::from_utf8_lossy(&data).to_string());

    let reason = if response.status < 400 { "OK" } else { "Error" };
    let mut out = format!("HTTP/1.1 {} {}\r\n", response.status, reason);
    for (k, v) in &response.headers {
        out.push_str(&format!("{}: {}\r\n", k, v));
    }
    let _ = stream.write_all(out.as_bytes());
    let _ = stream.write_all(&response.raw_headers);
    let tail = format!(
        "Content-Length: {}\r\nConnection: close\r\n\r\n",
        response.body.len()
    );
    let _ = stream.write_all(tail.as_bytes());
    let _ = stream.write_all(&response.body);
    let _ = stream.flush();
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn header<'a>(head: &'a str, name: &str) -> Option<&'a str> {
    head.lines().find_map(|line| {
        let (k, v) = line.split_once(':')?;
        if k.trim().eq_ignore_ascii_case(name) {
            Some(v.trim())
        } else {
            None
        }
    })
}
