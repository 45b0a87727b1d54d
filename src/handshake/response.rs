//! Server upgrade response.
//!
//! From [RFC-6455 Section 4.2](https://datatracker.ietf.org/doc/html/rfc6455#section-4.2):
//!
//! If the server chooses to accept the incoming connection, it MUST
//! reply with a valid HTTP response.
//!
//! Example:
//!
//! ```text
//! HTTP/1.1 101 Switching Protocols
//! Upgrade: websocket
//! Connection: Upgrade
//! Sec-WebSocket-Accept: s3pPLMBiTxaQ9kYGzzhZRbK+xOo=
//! Sec-WebSocket-Protocol: ro1
//! ```
//!

use std::io::Write;

use super::static_headers::*;
use super::{HTTP_STATUS_LINE, HTTP_LINE_BREAK, HTTP_HEADER_SP};

use crate::error::HandshakeError;

/// Http response presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Response<'b> {
    pub sec_accept: &'b [u8],
    /// Echoed `sec-websocket-protocol`, if any.
    pub protocol: Option<&'b [u8]>,
}

impl<'b> Response<'b> {
    /// Constructor, without a protocol header.
    #[inline]
    pub const fn new(sec_accept: &'b [u8]) -> Self {
        Self {
            sec_accept,
            protocol: None,
        }
    }

    /// Encode to a provided buffer, return the number of written bytes.
    ///
    /// Caller should make sure the buffer is large enough,
    /// otherwise a [`HandshakeError::NotEnoughCapacity`] error will be returned.
    pub fn encode(&self, buf: &mut [u8]) -> Result<usize, HandshakeError> {
        let total = buf.len();
        let mut w = &mut buf[..];

        macro_rules! write_header {
            ($name: expr, $value: expr) => {
                for part in [$name, HTTP_HEADER_SP, $value, HTTP_LINE_BREAK] {
                    w.write_all(part)
                        .map_err(|_| HandshakeError::NotEnoughCapacity)?;
                }
            };
        }

        // HTTP/1.1 101 Switching Protocols
        w.write_all(HTTP_STATUS_LINE)
            .and_then(|_| w.write_all(HTTP_LINE_BREAK))
            .map_err(|_| HandshakeError::NotEnoughCapacity)?;

        write_header!(UPGRADE_NAME, UPGRADE_VALUE);
        write_header!(CONNECTION_NAME, CONNECTION_VALUE);
        write_header!(SEC_WEBSOCKET_ACCEPT_NAME, self.sec_accept);

        if let Some(protocol) = self.protocol {
            write_header!(SEC_WEBSOCKET_PROTOCOL_NAME, protocol);
        }

        // finish with CRLF
        w.write_all(HTTP_LINE_BREAK)
            .map_err(|_| HandshakeError::NotEnoughCapacity)?;

        Ok(total - w.len())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const RESPONSE: &[u8] = b"\
        HTTP/1.1 101 Switching Protocols\r\n\
        Upgrade: websocket\r\n\
        Connection: Upgrade\r\n\
        Sec-WebSocket-Accept: s3pPLMBiTxaQ9kYGzzhZRbK+xOo=\r\n\r\n";

    #[test]
    fn encode_response() {
        let mut buf = vec![0_u8; 1024];
        let response = Response::new(b"s3pPLMBiTxaQ9kYGzzhZRbK+xOo=");
        let n = response.encode(&mut buf).unwrap();
        assert_eq!(&buf[..n], RESPONSE);
    }

    #[test]
    fn encode_with_protocol() {
        let mut buf = vec![0_u8; 1024];
        let response = Response {
            sec_accept: b"s3pPLMBiTxaQ9kYGzzhZRbK+xOo=",
            protocol: Some(b"ro1"),
        };
        let n = response.encode(&mut buf).unwrap();
        let text = std::str::from_utf8(&buf[..n]).unwrap();
        assert!(text.ends_with("Sec-WebSocket-Protocol: ro1\r\n\r\n"));
        assert_eq!(n, RESPONSE.len() + "Sec-WebSocket-Protocol: ro1\r\n".len());
    }

    #[test]
    fn not_enough_capacity() {
        let response = Response::new(b"s3pPLMBiTxaQ9kYGzzhZRbK+xOo=");
        for len in [0, 16, RESPONSE.len() - 1] {
            let mut buf = vec![0_u8; len];
            assert!(matches!(
                response.encode(&mut buf),
                Err(HandshakeError::NotEnoughCapacity)
            ));
        }
        let mut buf = vec![0_u8; RESPONSE.len()];
        assert_eq!(response.encode(&mut buf).unwrap(), RESPONSE.len());
    }
}
