//! Little-endian scalar decoding and a bounds-checked payload cursor.

use mapdl_model::{DecodedRecord, NumericType};

use crate::error::{DecodeError, Result};

/// A scalar that can appear in a record payload.
///
/// Values are always decoded from little-endian bytes, whatever the host.
pub trait WireScalar: Copy + Default + PartialEq + Send + Sync + 'static {
    const TYPE: NumericType;

    /// Decodes from the first `TYPE.byte_width()` bytes of `bytes`.
    ///
    /// # Panics
    ///
    /// Panics if `bytes` is shorter than `TYPE.byte_width()`. The decoders
    /// in this crate check lengths before calling it.
    fn from_le_slice(bytes: &[u8]) -> Self;

    fn into_record(values: Vec<Self>) -> DecodedRecord;
}

macro_rules! wire_scalar {
    ($ty:ty, $variant:ident, $width:expr) => {
        impl WireScalar for $ty {
            const TYPE: NumericType = NumericType::$variant;

            fn from_le_slice(bytes: &[u8]) -> Self {
                let mut raw = [0u8; $width];
                raw.copy_from_slice(&bytes[..$width]);
                <$ty>::from_le_bytes(raw)
            }

            fn into_record(values: Vec<Self>) -> DecodedRecord {
                DecodedRecord::$variant(values)
            }
        }
    };
}

wire_scalar!(i16, Int16, 2);
wire_scalar!(i32, Int32, 4);
wire_scalar!(f32, Float32, 4);
wire_scalar!(f64, Float64, 8);

/// Forward-only cursor over one record payload.
pub(crate) struct Payload<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Payload<'a> {
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    pub(crate) fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    pub(crate) fn take(&mut self, len: usize, context: &'static str) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(DecodeError::truncated(context, len, self.remaining()));
        }
        let chunk = &self.bytes[self.pos..self.pos + len];
        self.pos += len;
        Ok(chunk)
    }

    pub(crate) fn read_i32(&mut self, context: &'static str) -> Result<i32> {
        self.take(4, context).map(i32::from_le_slice)
    }

    /// Reads a value packed at its natural width.
    pub(crate) fn read_packed<T: WireScalar>(&mut self, context: &'static str) -> Result<T> {
        self.take(T::TYPE.byte_width(), context)
            .map(T::from_le_slice)
    }

    /// Reads a value occupying whole words, narrow values in the low half.
    pub(crate) fn read_word_aligned<T: WireScalar>(&mut self, context: &'static str) -> Result<T> {
        self.take(T::TYPE.word_stride() * 4, context)
            .map(T::from_le_slice)
    }
}
