//! Server configuration.

use std::time::Duration;

/// ro1
pub const DEFAULT_PROTOCOL: &str = "ro1";

/// 1024
pub const DEFAULT_MAX_LINE_LEN: usize = 1024;

/// Handshake and framing options.
///
/// ```
/// use std::time::Duration;
/// use pollws::Config;
///
/// let config = Config::default()
///     .with_protocol("ro1")
///     .with_path_prefix("/ws")
///     .with_frame_timeout(Some(Duration::from_millis(500)));
/// assert_eq!(config.path_prefix.as_deref(), Some("/ws"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Required in `Sec-WebSocket-Protocol`.
    pub protocol: String,
    /// Required prefix of the request path. If unset the request line is not checked.
    pub path_prefix: Option<String>,
    /// Echo the protocol back in the upgrade response.
    pub echo_protocol: bool,
    /// Longer header lines are truncated before matching.
    pub max_line_len: usize,
    /// Bound on reading a whole upgrade request.
    pub handshake_timeout: Option<Duration>,
    /// Bound on reading a whole frame once its first byte is available.
    pub frame_timeout: Option<Duration>,
    /// Pause after each sent frame.
    pub write_delay: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            protocol: DEFAULT_PROTOCOL.to_string(),
            path_prefix: None,
            echo_protocol: true,
            max_line_len: DEFAULT_MAX_LINE_LEN,
            handshake_timeout: Some(Duration::from_secs(5)),
            frame_timeout: Some(Duration::from_secs(2)),
            write_delay: Duration::ZERO,
        }
    }
}

impl Config {
    #[inline]
    pub fn with_protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = protocol.into();
        self
    }

    #[inline]
    pub fn with_path_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.path_prefix = Some(prefix.into());
        self
    }

    #[inline]
    pub fn with_echo_protocol(mut self, echo: bool) -> Self {
        self.echo_protocol = echo;
        self
    }

    #[inline]
    pub fn with_max_line_len(mut self, len: usize) -> Self {
        self.max_line_len = len;
        self
    }

    #[inline]
    pub fn with_handshake_timeout(mut self, dur: Option<Duration>) -> Self {
        self.handshake_timeout = dur;
        self
    }

    #[inline]
    pub fn with_frame_timeout(mut self, dur: Option<Duration>) -> Self {
        self.frame_timeout = dur;
        self
    }

    #[inline]
    pub fn with_write_delay(mut self, delay: Duration) -> Self {
        self.write_delay = delay;
        self
    }
}
