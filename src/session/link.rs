use std::io::Write;
use std::time::Duration;

use super::State;
use crate::error::Error;
use crate::frame::{FrameHead, OpCode, CLOSE_NORMAL};
use crate::transport::Transport;

/// The client half of a session.
///
/// Holds the accepted connection, if any. Callbacks get a `&mut Link`
/// to send replies.
pub struct Link<IO> {
    io: Option<IO>,
    write_delay: Duration,
}

impl<IO> Link<IO> {
    #[inline]
    pub(crate) const fn new(write_delay: Duration) -> Self {
        Self {
            io: None,
            write_delay,
        }
    }

    #[inline]
    pub fn state(&self) -> State {
        if self.io.is_some() {
            State::Connected
        } else {
            State::Disconnected
        }
    }

    #[inline]
    pub fn is_connected(&self) -> bool { self.io.is_some() }

    #[inline]
    pub(crate) fn attach(&mut self, io: IO) { self.io = Some(io) }

    #[inline]
    pub(crate) fn io_mut(&mut self) -> Option<&mut IO> { self.io.as_mut() }
}

impl<IO: Transport> Link<IO> {
    /// Send a final text frame.
    #[inline]
    pub fn send_text(&mut self, text: &str) -> Result<(), Error> {
        self.send(OpCode::Text, text.as_bytes())
    }

    /// Send a final binary frame.
    #[inline]
    pub fn send_binary(&mut self, data: &[u8]) -> Result<(), Error> {
        self.send(OpCode::Binary, data)
    }

    /// Send an unmasked final frame. Nothing is written unless connected,
    /// or if the payload does not fit a single length byte.
    pub fn send(&mut self, opcode: OpCode, data: &[u8]) -> Result<(), Error> {
        let io = match self.io.as_mut() {
            Some(io) => io,
            None => {
                log::debug!("no connection to client, no data sent");
                return Err(Error::NotConnected);
            }
        };

        let mut head = [0_u8; 2];
        let n = FrameHead::for_payload(opcode, data.len())?.encode(&mut head)?;

        io.write_all(&head[..n])?;
        io.write_all(data)?;
        io.flush()?;

        if !self.write_delay.is_zero() {
            std::thread::sleep(self.write_delay);
        }
        Ok(())
    }

    /// Send a normal close frame and tear the connection down.
    /// Failures are logged, the client is gone either way.
    pub(crate) fn shutdown(&mut self) {
        let mut io = match self.io.take() {
            Some(io) => io,
            None => return,
        };

        log::debug!("disconnecting");

        if let Err(e) = io.write_all(&CLOSE_NORMAL).and_then(|_| io.flush()) {
            log::debug!("failed to send close frame: {}", e);
        }

        if let Err(e) = io.close() {
            log::debug!("failed to close connection: {}", e);
        }
    }
}

impl<IO> std::fmt::Debug for Link<IO> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Link")
            .field("state", &self.state())
            .field("write_delay", &self.write_delay)
            .finish()
    }
}
