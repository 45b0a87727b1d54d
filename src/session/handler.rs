//! Event callbacks.

use super::Link;
use crate::frame::OpCode;

/// Hooks invoked synchronously from [`Session::poll`](super::Session::poll).
///
/// Every hook receives the [`Link`], so replies can be sent from
/// inside the callback. All hooks default to doing nothing.
pub trait Handler<IO> {
    /// A client completed the handshake.
    fn on_connect(&mut self, _link: &mut Link<IO>) {}

    /// A text or binary frame arrived.
    fn on_data(&mut self, _link: &mut Link<IO>, _opcode: OpCode, _payload: &[u8]) {}

    /// The client is gone, for whatever reason. The link is already
    /// disconnected when this is called.
    fn on_disconnect(&mut self, _link: &mut Link<IO>) {}
}

impl<IO> Handler<IO> for () {}

type Callback<IO> = Box<dyn FnMut(&mut Link<IO>)>;

type DataCallback<IO> = Box<dyn FnMut(&mut Link<IO>, OpCode, &[u8])>;

/// Closure based [`Handler`], each hook is optional.
///
/// ```
/// use pollws::session::Callbacks;
/// use std::net::TcpStream;
///
/// let callbacks = Callbacks::<TcpStream>::new()
///     .on_connect(|_| println!("connected"))
///     .on_data(|link, _, payload| {
///         let _ = link.send_binary(payload);
///     });
/// ```
pub struct Callbacks<IO> {
    connect: Option<Callback<IO>>,
    data: Option<DataCallback<IO>>,
    disconnect: Option<Callback<IO>>,
}

impl<IO> Callbacks<IO> {
    #[inline]
    pub fn new() -> Self {
        Self {
            connect: None,
            data: None,
            disconnect: None,
        }
    }

    /// Register the connect callback, replacing any previous one.
    pub fn on_connect<F>(mut self, f: F) -> Self
    where
        F: FnMut(&mut Link<IO>) + 'static,
    {
        self.connect = Some(Box::new(f));
        self
    }

    /// Register the data callback, replacing any previous one.
    pub fn on_data<F>(mut self, f: F) -> Self
    where
        F: FnMut(&mut Link<IO>, OpCode, &[u8]) + 'static,
    {
        self.data = Some(Box::new(f));
        self
    }

    /// Register the disconnect callback, replacing any previous one.
    pub fn on_disconnect<F>(mut self, f: F) -> Self
    where
        F: FnMut(&mut Link<IO>) + 'static,
    {
        self.disconnect = Some(Box::new(f));
        self
    }
}

impl<IO> Default for Callbacks<IO> {
    fn default() -> Self { Self::new() }
}

impl<IO> std::fmt::Debug for Callbacks<IO> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Callbacks")
            .field("connect", &self.connect.is_some())
            .field("data", &self.data.is_some())
            .field("disconnect", &self.disconnect.is_some())
            .finish()
    }
}

impl<IO> Handler<IO> for Callbacks<IO> {
    fn on_connect(&mut self, link: &mut Link<IO>) {
        if let Some(f) = self.connect.as_mut() {
            f(link)
        }
    }

    fn on_data(&mut self, link: &mut Link<IO>, opcode: OpCode, payload: &[u8]) {
        if let Some(f) = self.data.as_mut() {
            f(link, opcode, payload)
        }
    }

    fn on_disconnect(&mut self, link: &mut Link<IO>) {
        if let Some(f) = self.disconnect.as_mut() {
            f(link)
        }
    }
}
