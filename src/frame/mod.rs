//! Websocket data frame.
//!
//! [RFC-6455 Section5](https://datatracker.ietf.org/doc/html/rfc6455#section-5)
//!
//! ```text
//! 0                   1                   2                   3
//! 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-------+-+-------------+-------------------------------+
//! |F|R|R|R| opcode|M| Payload len |    Extended payload length    |
//! |I|S|S|S|  (4)  |A|     (7)     |             (16/64)           |
//! |N|V|V|V|       |S|             |   (if payload len==126/127)   |
//! | |1|2|3|       |K|             |                               |
//! +-+-+-+-+-------+-+-------------+ - - - - - - - - - - - - - - - +
//! |     Extended payload length continued, if payload len == 127  |
//! + - - - - - - - - - - - - - - - +-------------------------------+
//! |                               |Masking-key, if MASK set to 1  |
//! +-------------------------------+-------------------------------+
//! | Masking-key (continued)       |          Payload Data         |
//! +-------------------------------- - - - - - - - - - - - - - - - +
//! :                     Payload Data continued ...                :
//! + - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - +
//! |                     Payload Data continued ...                |
//! +---------------------------------------------------------------+
//! ```
//!
//! Only the 7-bit length form is understood. A length of 126 or 127
//! announces an extended length and is always larger than the payload
//! capacity, so such frames are rejected before the extension is read.
//! Fragmented messages are rejected as well.

pub mod flag;
pub mod mask;

pub use flag::{Fin, OpCode};
pub use mask::{Mask, apply_mask};

use crate::error::{Error, FrameError};
use crate::transport::{Deadline, Transport, read_byte, read_full};

/// 80
pub const DEFAULT_CAPACITY: usize = 80;

/// 125, the largest length a single length byte can carry.
pub const MAX_SHORT_LEN: usize = 125;

/// Close frame with status code 1000.
pub const CLOSE_NORMAL: [u8; 4] = [0x88, 0x02, 0x03, 0xe8];

/// Websocket frame head.
///
/// The opcode is kept as the raw 4-bit value so that reserved
/// opcodes survive decoding, see [`opcode`](Self::opcode).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHead {
    pub fin: Fin,
    pub opcode: u8,
    pub mask: Mask,
    pub length: u8,
}

impl FrameHead {
    /// Constructor.
    #[inline]
    pub const fn new(fin: Fin, opcode: OpCode, mask: Mask, length: u8) -> Self {
        Self {
            fin,
            opcode: opcode as u8,
            mask,
            length,
        }
    }

    /// Head of an unmasked final frame, as sent by a server.
    pub fn for_payload(opcode: OpCode, len: usize) -> Result<Self, FrameError> {
        if len > MAX_SHORT_LEN {
            return Err(FrameError::PayloadTooLarge {
                len,
                capacity: MAX_SHORT_LEN,
            });
        }
        Ok(Self::new(Fin::Y, opcode, Mask::None, len as u8))
    }

    /// Known opcode, `None` if reserved.
    #[inline]
    pub const fn opcode(&self) -> Option<OpCode> { OpCode::from_flag(self.opcode) }

    /// Encode to provided buffer, returns the count of written bytes.
    /// The caller should ensure the buffer is large enough,
    /// otherwise a [`FrameError::NotEnoughCapacity`] error will be returned.
    pub fn encode(&self, buf: &mut [u8]) -> Result<usize, FrameError> {
        let n = match self.mask {
            Mask::Key(_) | Mask::Skip => 6,
            Mask::None => 2,
        };

        if buf.len() < n {
            return Err(FrameError::NotEnoughCapacity);
        }

        // fin, opcode
        buf[0] = self.fin as u8 | self.opcode;

        // mask, payload length
        buf[1] = self.mask.to_flag() | self.length;

        // mask key
        match &self.mask {
            Mask::Key(k) => buf[2..6].copy_from_slice(k),
            Mask::Skip => buf[2..6].fill(0),
            Mask::None => {}
        };

        Ok(n)
    }

    /// Read a frame head from the IO source, rejecting any length
    /// over `capacity` before the mask key is read.
    pub fn read_from<T: Transport + ?Sized>(
        io: &mut T,
        capacity: usize,
        deadline: &Deadline,
    ) -> Result<Self, Error> {
        macro_rules! next {
            () => {
                match read_byte(io, deadline)? {
                    Some(b) => b,
                    None => return Err(FrameError::NotEnoughData.into()),
                }
            };
        }

        // fin, opcode
        let b1 = next!();

        // mask, payload length
        let b2 = next!();

        let length = b2 & 0x7f;
        if length as usize > capacity {
            return Err(FrameError::PayloadTooLarge {
                len: length as usize,
                capacity,
            }
            .into());
        }

        let mask = if Mask::is_set(b2) {
            Mask::from_key([next!(), next!(), next!(), next!()])
        } else {
            Mask::None
        };

        Ok(FrameHead {
            fin: Fin::from_flag(b1),
            opcode: b1 & 0x0f,
            mask,
            length,
        })
    }
}

/// What a decoded frame asks the session to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Received {
    /// Text or binary payload for the data callback.
    Data(OpCode),
    /// Peer wants to close.
    Close,
    /// Continuation, ping, pong or a reserved opcode.
    Ignored,
}

/// Reusable decode record with a fixed payload buffer.
#[derive(Debug, Clone)]
pub struct Frame<const N: usize = DEFAULT_CAPACITY> {
    head: FrameHead,
    payload: [u8; N],
}

impl<const N: usize> Frame<N> {
    const CAPACITY_CHECK: () = assert!(N <= MAX_SHORT_LEN, "payload capacity over 125");

    /// Constructor, with an empty payload.
    #[inline]
    pub const fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::CAPACITY_CHECK;
        Self {
            head: FrameHead::new(Fin::Y, OpCode::Continue, Mask::None, 0),
            payload: [0; N],
        }
    }

    /// Payload capacity.
    #[inline]
    pub const fn capacity(&self) -> usize { N }

    /// Head of the last decoded frame.
    #[inline]
    pub const fn head(&self) -> &FrameHead { &self.head }

    /// Unmasked payload of the last decoded frame.
    #[inline]
    pub fn payload(&self) -> &[u8] { &self.payload[..self.head.length as usize] }

    /// Decode exactly one frame, overwriting the previous one.
    ///
    /// Any error is fatal to the connection: an oversized length, a
    /// non-final frame, or a stream that ends before the frame does.
    /// The payload of a non-final frame is consumed before it is rejected.
    pub fn read_from<T: Transport + ?Sized>(
        &mut self,
        io: &mut T,
        deadline: &Deadline,
    ) -> Result<Received, Error> {
        let head = FrameHead::read_from(io, N, deadline)?;
        let len = head.length as usize;

        let buf = &mut self.payload[..len];
        if read_full(io, buf, deadline)? < len {
            return Err(FrameError::NotEnoughData.into());
        }

        // unmask if client sends a non-zero key
        if let Mask::Key(key) = head.mask {
            apply_mask(key, buf);
        }

        self.head = head;

        if head.fin == Fin::N {
            return Err(FrameError::Fragmented.into());
        }

        let received = match head.opcode() {
            Some(opcode) if opcode.is_data() => Received::Data(opcode),
            Some(OpCode::Close) => Received::Close,
            _ => Received::Ignored,
        };

        Ok(received)
    }
}

impl<const N: usize> Default for Frame<N> {
    fn default() -> Self { Self::new() }
}
