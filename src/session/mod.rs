//! Polling websocket server.
//!
//! A [`Session`] serves one client at a time. Each call to
//! [`poll`](Session::poll) performs at most one unit of work:
//!
//! - while disconnected, accept a pending client and run the handshake;
//! - while connected, decode one frame if any data is available.
//!
//! ```text
//!                  handshake ok
//!  Disconnected ----------------> Connected ---+
//!       ^    |                       |         | data / ignored frame
//!       |    +--+ handshake failed   |  <------+
//!       |    <--+                    |
//!       +----------------------------+
//!        bad frame, close frame, io error
//! ```
//!
//! Callbacks run synchronously inside `poll`, see [`Handler`].

mod handler;
mod link;

pub use handler::{Handler, Callbacks};
pub use link::Link;

use std::io::{self, Write};
use std::net::{TcpListener, ToSocketAddrs};

use crate::config::Config;
use crate::error::Error;
use crate::frame::{Frame, OpCode, Received, DEFAULT_CAPACITY};
use crate::handshake;
use crate::transport::{self, Deadline, Listen, Transport};

/// Connection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Disconnected,
    Connected,
}

/// Outcome of a single [`poll`](Session::poll).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    /// Nothing to do.
    Idle,
    /// A client completed the handshake.
    Connected,
    /// A client failed the handshake and was dropped.
    Rejected,
    /// A frame was decoded and handled.
    Received(Received),
    /// The client was disconnected.
    Disconnected,
}

/// Single-client websocket server.
///
/// `N` is the payload capacity of incoming frames.
pub struct Session<L: Listen, H, const N: usize = DEFAULT_CAPACITY> {
    listener: L,
    config: Config,
    link: Link<L::Io>,
    frame: Frame<N>,
    handler: H,
}

impl<H: Handler<std::net::TcpStream>, const N: usize> Session<TcpListener, H, N> {
    /// Listen on a TCP address.
    pub fn bind<A: ToSocketAddrs>(addr: A, config: Config, handler: H) -> io::Result<Self> {
        let listener = transport::tcp::bind(addr)?;
        Ok(Self::new(listener, config, handler))
    }
}

impl<L: Listen, H: Handler<L::Io>, const N: usize> Session<L, H, N> {
    /// Constructor, starts disconnected.
    pub fn new(listener: L, config: Config, handler: H) -> Self {
        Self {
            listener,
            link: Link::new(config.write_delay),
            config,
            frame: Frame::new(),
            handler,
        }
    }

    #[inline]
    pub fn state(&self) -> State { self.link.state() }

    #[inline]
    pub fn is_connected(&self) -> bool { self.link.is_connected() }

    #[inline]
    pub fn config(&self) -> &Config { &self.config }

    #[inline]
    pub fn listener(&self) -> &L { &self.listener }

    #[inline]
    pub fn handler(&self) -> &H { &self.handler }

    #[inline]
    pub fn handler_mut(&mut self) -> &mut H { &mut self.handler }

    /// See [`Link::send_text`].
    #[inline]
    pub fn send_text(&mut self, text: &str) -> Result<(), Error> { self.link.send_text(text) }

    /// See [`Link::send_binary`].
    #[inline]
    pub fn send_binary(&mut self, data: &[u8]) -> Result<(), Error> {
        self.link.send_binary(data)
    }

    /// Close the current client, if any, and fire the disconnect callback.
    pub fn disconnect(&mut self) -> bool {
        if self.link.is_connected() {
            self.drop_client();
            true
        } else {
            false
        }
    }

    /// Drive the server once.
    ///
    /// Only a failing listener is reported as an error. Anything that goes
    /// wrong with a client ends in [`Activity::Rejected`] or
    /// [`Activity::Disconnected`].
    pub fn poll(&mut self) -> Result<Activity, Error> {
        match self.link.state() {
            State::Disconnected => self.poll_accept(),
            State::Connected => Ok(self.poll_frame()),
        }
    }

    fn poll_accept(&mut self) -> Result<Activity, Error> {
        let mut io = match self.listener.accept_pending()? {
            Some(io) => io,
            None => return Ok(Activity::Idle),
        };

        match handshake::accept(&mut io, &self.config) {
            Ok(request) => {
                log::debug!("websocket accepted, path: {:?}", request.path);
                self.link.attach(io);
                self.handler.on_connect(&mut self.link);
                Ok(Activity::Connected)
            }
            Err(e) => {
                log::debug!("handshake failed: {}", e);
                if let Err(e) = io.close() {
                    log::debug!("failed to close connection: {}", e);
                }
                Ok(Activity::Rejected)
            }
        }
    }

    fn poll_frame(&mut self) -> Activity {
        let io = match self.link.io_mut() {
            Some(io) => io,
            None => return Activity::Idle,
        };

        match io.available() {
            Ok(true) => {}
            Ok(false) => return Activity::Idle,
            Err(e) => {
                log::debug!("connection lost: {}", e);
                return self.drop_client();
            }
        }

        let deadline = Deadline::after(self.config.frame_timeout);

        match self.frame.read_from(io, &deadline) {
            Ok(Received::Data(opcode)) => {
                log::trace!("{:?} frame, {} bytes", opcode, self.frame.payload().len());
                self.handler
                    .on_data(&mut self.link, opcode, self.frame.payload());
                Activity::Received(Received::Data(opcode))
            }
            Ok(Received::Ignored) => {
                log::trace!("unhandled frame ignored: {:?}", self.frame.head());
                Activity::Received(Received::Ignored)
            }
            Ok(Received::Close) => {
                log::debug!("close frame received, closing in answer");
                if let Err(e) = io.write_all(&[OpCode::Close as u8]) {
                    log::debug!("failed to answer close: {}", e);
                }
                self.drop_client()
            }
            Err(e) => {
                log::debug!("bad frame: {}", e);
                self.drop_client()
            }
        }
    }

    fn drop_client(&mut self) -> Activity {
        self.link.shutdown();
        self.handler.on_disconnect(&mut self.link);
        Activity::Disconnected
    }
}

impl<L: Listen, H, const N: usize> std::fmt::Debug for Session<L, H, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("link", &self.link)
            .field("frame", self.frame.head())
            .finish()
    }
}
