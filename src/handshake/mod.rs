//! Websocket handshake.

pub mod key;
pub mod request;
pub mod response;

pub use request::{Checklist, Request, read_request};
pub use response::Response;
pub use key::derive_accept_key;

use std::io::Write;

use crate::config::Config;
use crate::error::Error;
use crate::transport::{Deadline, Transport};

/// 258EAFA5-E914-47DA-95CA-C5AB0DC85B11
pub const GUID: &[u8] = b"258EAFA5-E914-47DA-95CA-C5AB0DC85B11";

/// GET
pub const HTTP_METHOD: &[u8] = b"GET";

/// CRLF
pub const HTTP_LINE_BREAK: &[u8] = b"\r\n";

/// A colon + one SP
pub const HTTP_HEADER_SP: &[u8] = b": ";

/// HTTP/1.1 101 Switching Protocols
pub const HTTP_STATUS_LINE: &[u8] = b"HTTP/1.1 101 Switching Protocols";

/// Large enough for the response with a protocol token of 300 bytes.
const RESPONSE_BUF_LEN: usize = 512;

/// Static http headers
#[allow(unused)]
pub mod static_headers {
    // request tokens, matched as substrings
    pub const UPGRADE: &str = "Upgrade:";
    pub const CONNECTION: &str = "Connection: ";
    pub const ORIGIN: &str = "Origin:";
    pub const HOST: &str = "Host: ";
    pub const SEC_WEBSOCKET_KEY: &str = "Sec-WebSocket-Key: ";
    pub const SEC_WEBSOCKET_VERSION: &str = "Sec-WebSocket-Version: ";
    pub const SEC_WEBSOCKET_VERSION_VALUE: &str = "13";
    pub const SEC_WEBSOCKET_PROTOCOL: &str = "Sec-WebSocket-Protocol: ";

    // response headers
    pub const UPGRADE_NAME: &[u8] = b"Upgrade";
    pub const UPGRADE_VALUE: &[u8] = b"websocket";
    pub const CONNECTION_NAME: &[u8] = b"Connection";
    pub const CONNECTION_VALUE: &[u8] = b"Upgrade";
    pub const SEC_WEBSOCKET_ACCEPT_NAME: &[u8] = b"Sec-WebSocket-Accept";
    pub const SEC_WEBSOCKET_PROTOCOL_NAME: &[u8] = b"Sec-WebSocket-Protocol";
}

/// Perform a server handshake: receive the request, and answer with
/// `101 Switching Protocols` if it is acceptable.
///
/// This function blocks until the request ends or `config.handshake_timeout`
/// expires. Nothing is written if the request is rejected.
pub fn accept<IO: Transport + ?Sized>(io: &mut IO, config: &Config) -> Result<Request, Error> {
    let deadline = Deadline::after(config.handshake_timeout);
    let request = read_request(io, config, &deadline)?;

    let sec_accept = derive_accept_key(request.sec_key.as_bytes());
    let response = Response {
        sec_accept: &sec_accept,
        protocol: config.echo_protocol.then(|| config.protocol.as_bytes()),
    };

    let mut buf = [0_u8; RESPONSE_BUF_LEN];
    let n = response.encode(&mut buf)?;
    io.write_all(&buf[..n])?;
    io.flush()?;

    Ok(request)
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;
    use crate::error::HandshakeError;
    use crate::transport::test::LimitReadWriter;
    use rand::prelude::*;

    pub const TEMPLATE_HEADERS: &str = "\
        Host: 192.168.1.22\r\n\
        Upgrade: websocket\r\n\
        Connection: Upgrade\r\n\
        Origin: http://192.168.1.22\r\n\
        Sec-WebSocket-Key: dGhlIHNhbXBsZSBub25jZQ==\r\n\
        Sec-WebSocket-Version: 13\r\n\
        Sec-WebSocket-Protocol: ro1";

    pub const REQUEST: &str = "\
        GET /ws HTTP/1.1\r\n\
        Host: 192.168.1.22\r\n\
        Upgrade: websocket\r\n\
        Connection: Upgrade\r\n\
        Origin: http://192.168.1.22\r\n\
        Sec-WebSocket-Key: dGhlIHNhbXBsZSBub25jZQ==\r\n\
        Sec-WebSocket-Version: 13\r\n\
        Sec-WebSocket-Protocol: ro1\r\n\r\n";

    pub fn make_headers(count: usize, max_len: usize, headers: &str) -> String {
        fn rand_ascii() -> char {
            let x: u8 = thread_rng().gen_range(1..=3);
            let ch: u8 = match x {
                1 => thread_rng().gen_range(b'0'..=b'9'),
                2 => thread_rng().gen_range(b'a'..=b'z'),
                3 => b'-',
                _ => unreachable!(),
            };
            ch as char
        }

        fn rand_str(len: usize) -> String { (0..len).map(|_| rand_ascii()).collect() }

        fn make_header(max_len: usize) -> String {
            let name_len: usize = thread_rng().gen_range(1..=max_len);
            let value_len: usize = thread_rng().gen_range(1..=max_len);
            format!("x-{}: {}\r\n", rand_str(name_len), rand_str(value_len))
        }

        let mut s = Vec::<String>::with_capacity(256);
        for hdr in headers.split("\r\n") {
            s.push(format!("{}\r\n", hdr));
        }
        for _ in 0..count {
            s.push(make_header(max_len));
        }
        s.shuffle(&mut thread_rng());
        s.concat()
    }

    #[test]
    fn accept_writes_response() {
        let config = Config::default().with_echo_protocol(false);
        for limit in 1..=64 {
            let mut rw = LimitReadWriter::new(REQUEST.as_bytes(), limit);
            let request = accept(&mut rw, &config).unwrap();

            assert_eq!(request.path.as_deref(), Some("/ws"));
            assert_eq!(rw.cursor, REQUEST.len());
            assert_eq!(
                &rw.wbuf.borrow()[..],
                b"HTTP/1.1 101 Switching Protocols\r\n\
                Upgrade: websocket\r\n\
                Connection: Upgrade\r\n\
                Sec-WebSocket-Accept: s3pPLMBiTxaQ9kYGzzhZRbK+xOo=\r\n\r\n"
            );
        }
    }

    #[test]
    fn accept_echoes_protocol() {
        let mut rw = LimitReadWriter::new(REQUEST.as_bytes(), 16);
        accept(&mut rw, &Config::default()).unwrap();
        let wbuf = rw.wbuf.borrow();
        let text = std::str::from_utf8(&wbuf).unwrap();
        assert!(text.contains("Sec-WebSocket-Protocol: ro1\r\n"));
    }

    #[test]
    fn reject_writes_nothing() {
        let data = REQUEST.replace("Origin: http://192.168.1.22\r\n", "");
        let mut rw = LimitReadWriter::new(data.as_bytes(), 16);
        let e = accept(&mut rw, &Config::default()).unwrap_err();
        assert!(matches!(e, Error::Handshake(HandshakeError::Origin)));
        assert!(rw.wbuf.borrow().is_empty());
    }

    #[test]
    fn expired_handshake() {
        let config = Config::default().with_handshake_timeout(Some(std::time::Duration::ZERO));
        let mut rw = LimitReadWriter::new(REQUEST.as_bytes(), 16);
        let e = accept(&mut rw, &config).unwrap_err();
        assert!(matches!(e, Error::Io(ref e) if e.kind() == std::io::ErrorKind::TimedOut));
        assert!(rw.wbuf.borrow().is_empty());
    }
}
