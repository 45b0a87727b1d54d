//!  Mask flag and key.

/// Payload mask with a 32-bit key.
///
/// `Mask::Skip` is used to skip unmask
/// if mask key equals 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mask {
    Key([u8; 4]),
    Skip,
    None,
}

impl Mask {
    /// Read the flag which indicates whether mask is used.
    /// The key itself follows the length byte.
    #[inline]
    pub const fn is_set(b: u8) -> bool { b & 0x80 == 0x80 }

    /// Classify a received key.
    #[inline]
    pub fn from_key(key: [u8; 4]) -> Self {
        if key.iter().all(|b| *b == 0) {
            Mask::Skip
        } else {
            Mask::Key(key)
        }
    }

    /// Get the flag byte.
    #[inline]
    pub const fn to_flag(&self) -> u8 {
        use Mask::*;
        match self {
            Key(_) | Skip => 0x80,
            None => 0x00,
        }
    }
}

/// Mask the buffer, byte by byte.
#[inline]
pub fn apply_mask(key: [u8; 4], buf: &mut [u8]) {
    for (i, b) in buf.iter_mut().enumerate() {
        *b ^= key[i & 0x03];
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn mask_flag() {
        assert!(Mask::is_set(0x85));
        assert!(!Mask::is_set(0x05));
        assert_eq!(Mask::from_key([0; 4]), Mask::Skip);
        assert_eq!(Mask::from_key([1, 0, 0, 0]).to_flag(), 0x80);
        assert_eq!(Mask::None.to_flag(), 0x00);
    }

    #[test]
    fn mask_byte() {
        for i in 0..256 {
            let key: [u8; 4] = rand::random();
            let buf: Vec<u8> = (0..i).map(|_| rand::random::<u8>()).collect();

            let mut buf2 = buf.clone();
            apply_mask(key, &mut buf2);
            apply_mask(key, &mut buf2);

            assert_eq!(buf, buf2);
        }
    }
}
