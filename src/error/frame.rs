use std::fmt::{Display, Formatter};

#[derive(Debug, PartialEq, Eq)]
pub enum FrameError {
    Fragmented,

    PayloadTooLarge { len: usize, capacity: usize },

    NotEnoughData,

    NotEnoughCapacity,
}

impl Display for FrameError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        use FrameError::*;
        match self {
            Fragmented => write!(f, "Fragmented frames are not supported"),
            PayloadTooLarge { len, capacity } => {
                write!(f, "Payload length {} exceeds capacity {}", len, capacity)
            }
            NotEnoughData => write!(f, "Not enough data to parse"),
            NotEnoughCapacity => write!(f, "Not enough space to write to"),
        }
    }
}

// use default impl
impl std::error::Error for FrameError {}
