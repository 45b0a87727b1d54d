//! Fin flag and opcode.

/// Fin flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fin {
    /// a byte with its leading bit set
    Y = 0x80,

    /// a byte with its leading bit clear
    N = 0x00,
}

/// Frame opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpCode {
    /// denotes a continuation frame, 0x00
    Continue = 0x00,
    /// denotes a text frame, 0x01
    Text = 0x01,
    /// denotes a binary frame, 0x02
    Binary = 0x02,

    /// denotes a connection close, 0x08
    Close = 0x08,
    /// denotes a ping, 0x09
    Ping = 0x09,
    /// denotes a pong, 0x0a
    Pong = 0x0a,
}

impl Fin {
    /// Parse from byte. Reserved bits are ignored.
    #[inline]
    pub const fn from_flag(b: u8) -> Self {
        if b & 0x80 == 0x80 {
            Fin::Y
        } else {
            Fin::N
        }
    }
}

impl OpCode {
    /// Parse from byte, `None` for reserved opcodes.
    #[inline]
    pub const fn from_flag(b: u8) -> Option<Self> {
        use OpCode::*;
        let opcode = match b & 0x0f {
            0x00 => Continue,
            0x01 => Text,
            0x02 => Binary,
            0x08 => Close,
            0x09 => Ping,
            0x0a => Pong,
            _ => return None,
        };
        Some(opcode)
    }

    /// Whether the frame carries application data.
    #[inline]
    pub const fn is_data(&self) -> bool { matches!(self, OpCode::Text | OpCode::Binary) }
}

#[cfg(test)]
mod test {
    use super::*;

    macro_rules!  enc_dec {
        ($class: ident $(, $v: expr )+ ) => {
            $(
                let v = $class::from_flag($v).unwrap();
                assert_eq!(v as u8, $v);
            )+
        };
    }

    #[test]
    fn fin() {
        assert_eq!(Fin::from_flag(0x81), Fin::Y);
        assert_eq!(Fin::from_flag(0xc1), Fin::Y);
        assert_eq!(Fin::from_flag(0x01), Fin::N);
    }

    #[test]
    fn opcode() {
        enc_dec!(OpCode, 0x00, 0x01, 0x02, 0x08, 0x09, 0x0a);

        for reserved in [0x03, 0x07, 0x0b, 0x0f] {
            assert_eq!(OpCode::from_flag(reserved), None);
        }
        assert_eq!(OpCode::from_flag(0x82), Some(OpCode::Binary));
    }
}
