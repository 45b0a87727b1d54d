use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum HandshakeError {
    // request line
    HttpMethod,

    HttpVersion,

    Path,

    // websocket error
    Upgrade,

    Connection,

    Origin,

    Host,

    SecWebSocketKey,

    SecWebSocketVersion,

    SecWebSocketProtocol,

    // write
    NotEnoughCapacity,

    Httparse(httparse::Error),
}

impl Display for HandshakeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        use HandshakeError::*;
        match self {
            HttpMethod => write!(f, "Illegal http method"),

            HttpVersion => write!(f, "Illegal http version"),

            Path => write!(f, "Missing or unexpected request path"),

            Upgrade => write!(f, "Missing upgrade header"),

            Connection => write!(f, "Missing connection header"),

            Origin => write!(f, "Missing origin header"),

            Host => write!(f, "Missing host header"),

            SecWebSocketKey => write!(f, "Missing sec-websocket-key header"),

            SecWebSocketVersion => {
                write!(f, "Missing or unsupported sec-websocket-version")
            }

            SecWebSocketProtocol => {
                write!(f, "Missing or unexpected sec-websocket-protocol")
            }

            NotEnoughCapacity => write!(f, "Not enough space to write to"),

            Httparse(e) => write!(f, "Http parse error: {}", e),
        }
    }
}

impl From<httparse::Error> for HandshakeError {
    fn from(e: httparse::Error) -> Self { HandshakeError::Httparse(e) }
}

impl std::error::Error for HandshakeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        if let HandshakeError::Httparse(e) = self {
            Some(e)
        } else {
            None
        }
    }
}
