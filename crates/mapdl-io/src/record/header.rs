use mapdl_model::NumericType;

use crate::error::{DecodeError, Result};

/// Bytes of the record preamble: buffer size word plus flag word.
pub const HEADER_BYTES: usize = 8;
/// Words preceding the payload.
pub const HEADER_WORDS: usize = 2;
/// Trailing word after the payload, not interpreted here.
pub const FOOTER_WORDS: usize = 1;

const BITMASK_BIT: u8 = 3;
const WINDOWED_BIT: u8 = 4;
const RESERVED_BIT: u8 = 5;
const NARROW_BIT: u8 = 6;
const INTEGER_BIT: u8 = 7;

/// Compression scheme selected by a record header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    Bitmask,
    Windowed,
    /// No sparse flag: the payload is copied verbatim.
    Dense,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    /// Payload length in 4-byte words, header and footer excluded.
    pub buffer_size: i32,
    pub is_bitmask_sparse: bool,
    pub is_windowed_sparse: bool,
    pub reserved_flag: bool,
    pub is_narrow_precision: bool,
    pub is_integer_type: bool,
}

impl RecordHeader {
    pub fn from_bytes(raw: [u8; HEADER_BYTES]) -> Self {
        let flags = raw[7];
        let bit = |n: u8| (flags >> n) & 1 == 1;
        Self {
            buffer_size: i32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]),
            is_bitmask_sparse: bit(BITMASK_BIT),
            is_windowed_sparse: bit(WINDOWED_BIT),
            reserved_flag: bit(RESERVED_BIT),
            is_narrow_precision: bit(NARROW_BIT),
            is_integer_type: bit(INTEGER_BIT),
        }
    }

    /// Parses the preamble at the start of `bytes`.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_BYTES {
            return Err(DecodeError::truncated(
                "record header",
                HEADER_BYTES,
                bytes.len(),
            ));
        }
        let mut raw = [0u8; HEADER_BYTES];
        raw.copy_from_slice(&bytes[..HEADER_BYTES]);
        Ok(Self::from_bytes(raw))
    }

    pub fn numeric_type(&self) -> NumericType {
        NumericType::from_flags(self.is_integer_type, self.is_narrow_precision)
    }

    /// Bitmask wins when both sparse flags are set.
    pub fn compression(&self) -> Compression {
        if self.is_bitmask_sparse {
            Compression::Bitmask
        } else if self.is_windowed_sparse {
            Compression::Windowed
        } else {
            Compression::Dense
        }
    }

    /// Payload words, with a non-positive size read as an empty record.
    pub fn payload_words(&self) -> usize {
        self.buffer_size.max(0) as usize
    }

    pub fn payload_bytes(&self) -> usize {
        self.payload_words() * 4
    }

    /// Words from this header to the next one.
    ///
    /// A negative `buffer_size` counts as zero payload words, so the result
    /// is never below the three framing words and a record walk always moves
    /// forward.
    pub fn word_count(&self) -> usize {
        HEADER_WORDS + self.payload_words() + FOOTER_WORDS
    }

    /// Inverse of [`RecordHeader::from_bytes`].
    pub fn to_bytes(&self) -> [u8; HEADER_BYTES] {
        let mut raw = [0u8; HEADER_BYTES];
        raw[..4].copy_from_slice(&self.buffer_size.to_le_bytes());
        let flag = |set: bool, n: u8| if set { 1u8 << n } else { 0 };
        raw[7] = flag(self.is_bitmask_sparse, BITMASK_BIT)
            | flag(self.is_windowed_sparse, WINDOWED_BIT)
            | flag(self.reserved_flag, RESERVED_BIT)
            | flag(self.is_narrow_precision, NARROW_BIT)
            | flag(self.is_integer_type, INTEGER_BIT);
        raw
    }
}
