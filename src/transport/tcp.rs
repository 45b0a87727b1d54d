//! Adapters for [`std::net`].

use std::io;
use std::net::{Shutdown, TcpListener, TcpStream};
use std::time::Duration;

use super::{Listen, Transport};

impl Transport for TcpStream {
    fn available(&mut self) -> io::Result<bool> {
        let mut b = [0_u8; 1];
        self.set_nonblocking(true)?;
        let ret = self.peek(&mut b);
        self.set_nonblocking(false)?;

        match ret {
            // data, or EOF which the next read reports
            Ok(_) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(false),
            Err(e) => Err(e),
        }
    }

    #[inline]
    fn set_timeout(&mut self, dur: Option<Duration>) -> io::Result<()> {
        self.set_read_timeout(dur)
    }

    fn close(&mut self) -> io::Result<()> {
        match self.shutdown(Shutdown::Both) {
            Err(e) if e.kind() != io::ErrorKind::NotConnected => Err(e),
            _ => Ok(()),
        }
    }
}

impl Listen for TcpListener {
    type Io = TcpStream;

    /// The listener must be in nonblocking mode, see [`bind`].
    fn accept_pending(&mut self) -> io::Result<Option<TcpStream>> {
        match self.accept() {
            Ok((stream, addr)) => {
                log::debug!("tcp accepted: {}", addr);
                // accepted sockets may inherit nonblocking mode
                stream.set_nonblocking(false)?;
                stream.set_nodelay(true)?;
                Ok(Some(stream))
            }
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// Bind a nonblocking listener.
pub fn bind<A: std::net::ToSocketAddrs>(addr: A) -> io::Result<TcpListener> {
    let lis = TcpListener::bind(addr)?;
    lis.set_nonblocking(true)?;
    Ok(lis)
}
