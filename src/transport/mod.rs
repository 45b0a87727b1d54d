//! Transport adapter.
//!
//! The server never touches sockets directly. It talks to a [`Listen`]
//! implementation which hands out at most one [`Transport`] at a time.
//! Implementations for [`std::net`] live in [`tcp`].

pub mod tcp;

use std::io::{self, Read, Write};
use std::time::{Duration, Instant};

/// A byte stream to a single client.
pub trait Transport: Read + Write {
    /// Whether a read would make progress right now,
    /// either with data or an end of stream.
    fn available(&mut self) -> io::Result<bool>;

    /// Bound every blocking read, `None` blocks forever.
    fn set_timeout(&mut self, _dur: Option<Duration>) -> io::Result<()> { Ok(()) }

    /// Tear down the connection.
    fn close(&mut self) -> io::Result<()>;
}

/// Source of client connections.
pub trait Listen {
    type Io: Transport;

    /// Return a pending client if there is one, without blocking.
    fn accept_pending(&mut self) -> io::Result<Option<Self::Io>>;
}

/// Upper bound on how long a single unit of work may block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline(Option<Instant>);

impl Deadline {
    /// Never expires.
    pub const NEVER: Deadline = Deadline(None);

    /// Expires `dur` from now, or never if `dur` is `None`.
    #[inline]
    pub fn after(dur: Option<Duration>) -> Self { Deadline(dur.map(|d| Instant::now() + d)) }

    #[inline]
    pub fn is_expired(&self) -> bool { matches!(self.0, Some(t) if Instant::now() >= t) }

    /// Fail with [`io::ErrorKind::TimedOut`] once expired.
    #[inline]
    pub fn check(&self) -> io::Result<()> {
        if self.is_expired() {
            Err(timed_out())
        } else {
            Ok(())
        }
    }

    /// Time left, `None` if it never expires. Never zero, the
    /// smallest value is one millisecond.
    #[inline]
    pub fn remaining(&self) -> Option<Duration> {
        self.0.map(|t| {
            t.saturating_duration_since(Instant::now())
                .max(Duration::from_millis(1))
        })
    }

    /// Check the deadline, then bound the next blocking read by the time left.
    #[inline]
    pub fn arm<T: Transport + ?Sized>(&self, io: &mut T) -> io::Result<()> {
        self.check()?;
        io.set_timeout(self.remaining())
    }
}

#[inline]
fn timed_out() -> io::Error { io::Error::new(io::ErrorKind::TimedOut, "deadline expired") }

/// Read a single byte, `Ok(None)` at end of stream.
///
/// Each call is one `read` on the transport, plus a timeout update, so a
/// handshake costs a few syscalls per header byte on a raw socket. That is
/// fine for requests of a few hundred bytes; a `Transport` that buffers
/// internally brings it down to one read per packet.
pub fn read_byte<T: Transport + ?Sized>(io: &mut T, deadline: &Deadline) -> io::Result<Option<u8>> {
    let mut b = [0_u8; 1];
    loop {
        deadline.arm(io)?;
        match io.read(&mut b) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(b[0])),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            // socket read timeout
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => return Err(timed_out()),
            Err(e) => return Err(e),
        }
    }
}

/// Fill the whole buffer, returns the number of bytes read
/// which is less than `buf.len()` only at end of stream.
pub fn read_full<T: Transport + ?Sized>(
    io: &mut T,
    buf: &mut [u8],
    deadline: &Deadline,
) -> io::Result<usize> {
    let mut n = 0;
    while n < buf.len() {
        deadline.arm(io)?;
        match io.read(&mut buf[n..]) {
            Ok(0) => break,
            Ok(x) => n += x,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => return Err(timed_out()),
            Err(e) => return Err(e),
        }
    }
    Ok(n)
}
