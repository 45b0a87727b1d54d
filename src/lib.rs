//! Single-client polling websocket server for embedded controllers.
//!
//! ## Features
//! - One client at a time, driven by an explicit [`poll`](session::Session::poll).
//! - No heap allocation while framing, payloads live in a fixed buffer.
//! - Blocking reads bounded by deadlines instead of hanging forever.
//!
//! ## High-level API
//!
//! - [`session`]
//! - [`config`]
//!
//! ```no_run
//! use pollws::{Config, Session};
//! use pollws::session::Callbacks;
//!
//! let callbacks = Callbacks::new()
//!     .on_connect(|_| println!("connected"))
//!     .on_data(|link, _, payload| {
//!         // echo
//!         let _ = link.send_binary(payload);
//!     })
//!     .on_disconnect(|_| println!("disconnected"));
//!
//! let mut session: Session<_, _> = Session::bind("0.0.0.0:80", Config::default(), callbacks)?;
//! loop {
//!     session.poll()?;
//!     std::thread::sleep(std::time::Duration::from_millis(1));
//! }
//! # Ok::<(), pollws::error::Error>(())
//! ```
//!
//! ## Low-level API
//!
//! - [`frame`]
//! - [`handshake`]
//! - [`transport`]
//!
//! Frame:
//!
//! ```ignore
//! {
//!     // decode one frame from a reader
//!     let mut frame = Frame::<80>::new();
//!     let received = frame.read_from(&mut io, &Deadline::NEVER)?;
//!
//!     // encode a frame head
//!     let n = FrameHead::for_payload(OpCode::Text, 5)?.encode(&mut buf)?;
//! }
//! ```
//!
//! Handshake:
//!
//! ```ignore
//! {
//!     // read the request and answer with 101 Switching Protocols
//!     let request = handshake::accept(&mut io, &config)?;
//! }
//! ```

pub mod config;
pub mod error;
pub mod frame;
pub mod handshake;
pub mod session;
pub mod transport;

pub use config::Config;
pub use error::Error;
pub use session::{Session, State, Activity};
