//! Client upgrade request.
//!
//! From [RFC-6455 Section 4.1](https://datatracker.ietf.org/doc/html/rfc6455#section-4.1):
//!
//! Once a connection to the server has been established (including a
//! connection via a proxy or over a TLS-encrypted tunnel), the client
//! MUST send an opening handshake to the server.  The handshake consists
//! of an HTTP Upgrade request, along with a list of required and
//! optional header fields.
//!
//! Example:
//!
//! ```text
//! GET /ws HTTP/1.1
//! Host: 192.168.1.22
//! Upgrade: websocket
//! Connection: Upgrade
//! Origin: http://192.168.1.22
//! Sec-WebSocket-Key: dGhlIHNhbXBsZSBub25jZQ==
//! Sec-WebSocket-Version: 13
//! Sec-WebSocket-Protocol: ro1
//! ```
//!
//! Headers are recognized line by line with case-sensitive substring
//! matches, so their order and any surrounding text do not matter.

use super::static_headers::*;
use super::{HTTP_METHOD, HTTP_LINE_BREAK};

use crate::config::Config;
use crate::error::{Error, HandshakeError};
use crate::transport::{Deadline, Transport, read_byte};

/// What a successful request carries forward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Path from the request line, if one could be parsed.
    pub path: Option<String>,
    pub sec_key: String,
}

/// Required headers seen so far.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Checklist {
    pub upgrade: bool,
    pub connection: bool,
    pub origin: bool,
    pub host: bool,
    pub sec_key: Option<String>,
    pub version: bool,
    pub protocol: bool,
}

impl Checklist {
    #[inline]
    pub fn new() -> Self { Self::default() }

    /// Classify a single header line. A line sets at most one entry,
    /// the first one in order that is still missing and matches.
    pub fn inspect(&mut self, line: &str, protocol: &str) {
        if !self.upgrade && line.contains(UPGRADE) {
            self.upgrade = true;
        } else if !self.connection && line.contains(CONNECTION) {
            self.connection = true;
        } else if !self.origin && line.contains(ORIGIN) {
            self.origin = true;
        } else if !self.host && line.contains(HOST) {
            self.host = true;
        } else if self.sec_key.is_none() && line.contains(SEC_WEBSOCKET_KEY) {
            // the key is the second space separated token
            self.sec_key = line.split(' ').filter(|s| !s.is_empty()).nth(1).map(String::from);
        } else if !self.version
            && line.contains(SEC_WEBSOCKET_VERSION)
            && line.contains(SEC_WEBSOCKET_VERSION_VALUE)
        {
            self.version = true;
        } else if !self.protocol && line.contains(SEC_WEBSOCKET_PROTOCOL) && line.contains(protocol)
        {
            self.protocol = true;
        }
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.upgrade
            && self.connection
            && self.origin
            && self.host
            && self.sec_key.is_some()
            && self.version
            && self.protocol
    }

    /// Return the key if every required header is present,
    /// otherwise the first missing one.
    pub fn finish(self) -> Result<String, HandshakeError> {
        macro_rules! require {
            ($($flag: expr => $e: expr;)+) => {
                $(
                    if !$flag {
                        return Err($e);
                    }
                )+
            };
        }

        require! {
            self.upgrade => HandshakeError::Upgrade;
            self.connection => HandshakeError::Connection;
            self.origin => HandshakeError::Origin;
            self.host => HandshakeError::Host;
        }

        let sec_key = self.sec_key.ok_or(HandshakeError::SecWebSocketKey)?;

        require! {
            self.version => HandshakeError::SecWebSocketVersion;
            self.protocol => HandshakeError::SecWebSocketProtocol;
        }

        Ok(sec_key)
    }
}

/// Parse `GET {path} HTTP/1.1`, return the path.
pub fn parse_request_line(line: &[u8]) -> Result<String, HandshakeError> {
    // an empty header block completes the request
    let mut buf = Vec::with_capacity(line.len() + 4);
    buf.extend_from_slice(line);
    buf.extend_from_slice(HTTP_LINE_BREAK);
    buf.extend_from_slice(HTTP_LINE_BREAK);

    let mut headers = [httparse::EMPTY_HEADER; 0];
    let mut request = httparse::Request::new(&mut headers);

    if request.parse(&buf)?.is_partial() {
        return Err(HandshakeError::Path);
    }

    match request.method {
        Some(m) if m.as_bytes() == HTTP_METHOD => {}
        _ => return Err(HandshakeError::HttpMethod),
    }

    // ref: https://docs.rs/httparse/latest/src/httparse/lib.rs.html#581-596
    if request.version != Some(1) {
        return Err(HandshakeError::HttpVersion);
    }

    request
        .path
        .map(String::from)
        .ok_or(HandshakeError::Path)
}

/// Read header lines until a blank line or the end of stream,
/// then check that the request is acceptable.
///
/// This function blocks on reading, each read bounded by the time
/// left until `deadline`.
pub fn read_request<T: Transport + ?Sized>(
    io: &mut T,
    config: &Config,
    deadline: &Deadline,
) -> Result<Request, Error> {
    let mut checklist = Checklist::new();
    let mut path: Option<Result<String, HandshakeError>> = None;
    let mut line = Vec::with_capacity(128);

    loop {
        let b = read_byte(io, deadline)?;

        match b {
            Some(b'\n') | None => {}
            Some(b) => {
                if line.len() < config.max_line_len {
                    line.push(b);
                }
                continue;
            }
        }

        if line.last() == Some(&b'\r') {
            line.pop();
        }

        // blank line, or nothing left
        if line.is_empty() {
            break;
        }

        if path.is_none() {
            path = Some(parse_request_line(&line));
        }

        let text = String::from_utf8_lossy(&line);
        log::trace!("handshake: got header: {}", text);
        checklist.inspect(&text, &config.protocol);

        if b.is_none() {
            break;
        }
        line.clear();
    }

    let path = match (&config.path_prefix, path) {
        (Some(prefix), Some(path)) => {
            let path = path?;
            if !path.starts_with(prefix.as_str()) {
                return Err(HandshakeError::Path.into());
            }
            Some(path)
        }
        (Some(_), None) => return Err(HandshakeError::Path.into()),
        (None, path) => path.and_then(Result::ok),
    };

    let sec_key = checklist.finish()?;

    Ok(Request { path, sec_key })
}

#[cfg(test)]
mod test {
    use super::*;
    use super::super::test::{make_headers, TEMPLATE_HEADERS};
    use crate::transport::test::LimitReadWriter;

    fn request_of(data: &str, config: &Config) -> Result<Request, Error> {
        let mut rw = LimitReadWriter::new(data.as_bytes(), 7);
        read_request(&mut rw, config, &Deadline::NEVER)
    }

    #[test]
    fn server_handshake() {
        let config = Config::default();
        for i in 0..64 {
            let data = format!("GET /ws HTTP/1.1\r\n{}\r\n", make_headers(i, 48, TEMPLATE_HEADERS));
            let request = request_of(&data, &config).unwrap();

            assert_eq!(request.path.as_deref(), Some("/ws"));
            assert_eq!(request.sec_key, "dGhlIHNhbXBsZSBub25jZQ==");
        }
    }

    #[test]
    fn headers_without_request_line() {
        // the stream may simply end instead of a blank line
        let data = format!("{}\r\n", TEMPLATE_HEADERS);
        let request = request_of(&data, &Config::default()).unwrap();
        assert_eq!(request.path, None);
        assert_eq!(request.sec_key, "dGhlIHNhbXBsZSBub25jZQ==");
    }

    #[test]
    fn missing_any_header() {
        let lines: Vec<&str> = TEMPLATE_HEADERS.split("\r\n").collect();
        assert_eq!(lines.len(), 7);

        for skip in 0..lines.len() {
            let data: String = lines
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != skip)
                .map(|(_, l)| format!("{}\r\n", l))
                .collect();
            let data = format!("GET / HTTP/1.1\r\n{}\r\n", data);

            let e = request_of(&data, &Config::default()).unwrap_err();
            let expect = match skip {
                0 => matches!(e, Error::Handshake(HandshakeError::Host)),
                1 => matches!(e, Error::Handshake(HandshakeError::Upgrade)),
                2 => matches!(e, Error::Handshake(HandshakeError::Connection)),
                3 => matches!(e, Error::Handshake(HandshakeError::Origin)),
                4 => matches!(e, Error::Handshake(HandshakeError::SecWebSocketKey)),
                5 => matches!(e, Error::Handshake(HandshakeError::SecWebSocketVersion)),
                6 => matches!(e, Error::Handshake(HandshakeError::SecWebSocketProtocol)),
                _ => unreachable!(),
            };
            assert!(expect, "skip {}: {:?}", skip, e);
        }
    }

    #[test]
    fn wrong_version_or_protocol() {
        let data = TEMPLATE_HEADERS.replace("Version: 13", "Version: 8");
        let e = request_of(&data, &Config::default()).unwrap_err();
        assert!(matches!(e, Error::Handshake(HandshakeError::SecWebSocketVersion)));

        let data = TEMPLATE_HEADERS.replace("Protocol: ro1", "Protocol: chat");
        let e = request_of(&data, &Config::default()).unwrap_err();
        assert!(matches!(e, Error::Handshake(HandshakeError::SecWebSocketProtocol)));

        let config = Config::default().with_protocol("chat");
        assert!(request_of(&data, &config).is_ok());
    }

    #[test]
    fn header_names_are_case_sensitive() {
        let data = TEMPLATE_HEADERS.replace("Upgrade: websocket", "upgrade: websocket");
        let e = request_of(&data, &Config::default()).unwrap_err();
        assert!(matches!(e, Error::Handshake(HandshakeError::Upgrade)));
    }

    #[test]
    fn first_match_wins() {
        let mut checklist = Checklist::new();
        // one line only counts once
        checklist.inspect("Upgrade: websocket, Connection: Upgrade", "ro1");
        assert!(checklist.upgrade);
        assert!(!checklist.connection);

        checklist.inspect("Sec-WebSocket-Key:   abc==  trailing", "ro1");
        assert_eq!(checklist.sec_key.as_deref(), Some("abc=="));

        checklist.inspect("Sec-WebSocket-Protocol: ro1, ro2", "ro1");
        assert!(checklist.protocol);
        assert!(!checklist.is_complete());
    }

    #[test]
    fn long_lines_are_truncated() {
        let long = format!("User-Agent: {}\r\n", "x".repeat(4096));
        let data = format!("GET / HTTP/1.1\r\n{}{}\r\n\r\n", long, TEMPLATE_HEADERS);
        let config = Config::default().with_max_line_len(64);
        assert!(request_of(&data, &config).is_ok());
    }

    #[test]
    fn path_prefix() {
        let config = Config::default().with_path_prefix("/robot");

        let data = format!("GET /robot/ws HTTP/1.1\r\n{}\r\n\r\n", TEMPLATE_HEADERS);
        let request = request_of(&data, &config).unwrap();
        assert_eq!(request.path.as_deref(), Some("/robot/ws"));

        let data = format!("GET /other HTTP/1.1\r\n{}\r\n\r\n", TEMPLATE_HEADERS);
        let e = request_of(&data, &config).unwrap_err();
        assert!(matches!(e, Error::Handshake(HandshakeError::Path)));

        let data = format!("POST /robot HTTP/1.1\r\n{}\r\n\r\n", TEMPLATE_HEADERS);
        let e = request_of(&data, &config).unwrap_err();
        assert!(matches!(e, Error::Handshake(HandshakeError::HttpMethod)));

        let data = format!("GET /robot HTTP/1.0\r\n{}\r\n\r\n", TEMPLATE_HEADERS);
        let e = request_of(&data, &config).unwrap_err();
        assert!(matches!(e, Error::Handshake(HandshakeError::HttpVersion)));

        let data = format!("{}\r\n\r\n", TEMPLATE_HEADERS);
        assert!(request_of(&data, &config).is_err());
    }

    #[test]
    fn request_line() {
        assert_eq!(parse_request_line(b"GET /ws HTTP/1.1").unwrap(), "/ws");
        assert!(matches!(
            parse_request_line(b"Host: example.com"),
            Err(HandshakeError::Httparse(_))
        ));
    }
}
