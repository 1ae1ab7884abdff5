//! Record dispatch: header, payload, then the decoder chosen by the flags.

use log::debug;
use mapdl_model::{DecodedRecord, NumericType};

use super::bitmask::{decode_bitmask, decode_bitmask_into};
use super::header::{Compression, HEADER_BYTES, RecordHeader};
use super::wire::WireScalar;
use super::windowed::{decode_windowed, decode_windowed_into};
use crate::error::{DecodeError, Result};

/// Bookkeeping returned alongside every decoded record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordInfo {
    pub header: RecordHeader,
    /// Logical number of decoded values.
    pub len: usize,
    /// Header, payload and footer words; add to the record's word offset to
    /// reach the next record.
    pub word_count: usize,
}

/// Splits a dense payload into whole values; a ragged tail is an error.
fn dense_chunks<T: WireScalar>(payload: &[u8]) -> Result<std::slice::ChunksExact<'_, u8>> {
    let width = T::TYPE.byte_width();
    if payload.len() % width != 0 {
        return Err(DecodeError::Malformed(format!(
            "dense {} payload of {} bytes is not a whole number of values",
            T::TYPE,
            payload.len()
        )));
    }
    Ok(payload.chunks_exact(width))
}

fn decode_typed<T: WireScalar>(compression: Compression, payload: &[u8]) -> Result<Vec<T>> {
    match compression {
        Compression::Bitmask => decode_bitmask(payload),
        Compression::Windowed => decode_windowed(payload),
        Compression::Dense => Ok(dense_chunks::<T>(payload)?.map(T::from_le_slice).collect()),
    }
}

fn decode_typed_into<T: WireScalar>(
    compression: Compression,
    payload: &[u8],
    dest: &mut [T],
) -> Result<usize> {
    match compression {
        Compression::Bitmask => decode_bitmask_into(payload, dest),
        Compression::Windowed => decode_windowed_into(payload, dest),
        Compression::Dense => {
            let chunks = dense_chunks::<T>(payload)?;
            let len = chunks.len();
            if dest.len() < len {
                return Err(DecodeError::IndexOutOfRange {
                    index: len - 1,
                    len: dest.len(),
                });
            }
            for (slot, chunk) in dest.iter_mut().zip(chunks) {
                *slot = T::from_le_slice(chunk);
            }
            Ok(len)
        }
    }
}

/// Decodes a payload already separated from its header.
pub fn decode_payload(header: &RecordHeader, payload: &[u8]) -> Result<DecodedRecord> {
    let compression = header.compression();
    Ok(match header.numeric_type() {
        NumericType::Int16 => i16::into_record(decode_typed(compression, payload)?),
        NumericType::Int32 => i32::into_record(decode_typed(compression, payload)?),
        NumericType::Float32 => f32::into_record(decode_typed(compression, payload)?),
        NumericType::Float64 => f64::into_record(decode_typed(compression, payload)?),
    })
}

/// Decodes a payload into `dest`, whose element type must match the header.
pub fn decode_payload_into<T: WireScalar>(
    header: &RecordHeader,
    payload: &[u8],
    dest: &mut [T],
) -> Result<usize> {
    let found = header.numeric_type();
    if found != T::TYPE {
        return Err(DecodeError::TypeMismatch {
            expected: T::TYPE,
            found,
        });
    }
    if header.buffer_size <= 0 {
        return Ok(0);
    }
    decode_typed_into(header.compression(), payload, dest)
}

/// Decoding context over an in-memory result file.
///
/// Record positions are word offsets, as stored in the file's pointer
/// tables. The reader only borrows the buffer, so independent records can
/// be decoded from several threads at once.
#[derive(Debug, Clone, Copy)]
pub struct RecordReader<'a> {
    bytes: &'a [u8],
}

impl<'a> RecordReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    fn tail(&self, word_offset: usize) -> Result<&'a [u8]> {
        let start = word_offset * 4;
        self.bytes.get(start..).ok_or_else(|| {
            DecodeError::truncated("record position", start, self.bytes.len())
        })
    }

    pub fn header_at(&self, word_offset: usize) -> Result<RecordHeader> {
        RecordHeader::parse(self.tail(word_offset)?)
    }

    fn payload_at(&self, word_offset: usize) -> Result<(RecordHeader, &'a [u8])> {
        let tail = self.tail(word_offset)?;
        let header = RecordHeader::parse(tail)?;
        let body = &tail[HEADER_BYTES..];
        let len = header.payload_bytes();
        if len > body.len() {
            return Err(DecodeError::truncated("record payload", len, body.len()));
        }
        Ok((header, &body[..len]))
    }

    /// Allocates and decodes the record at `word_offset`.
    pub fn read_record(&self, word_offset: usize) -> Result<(DecodedRecord, RecordInfo)> {
        let (header, payload) = self.payload_at(word_offset)?;
        debug!(
            "record at word {word_offset}: {} words, {:?}, {}",
            header.buffer_size,
            header.compression(),
            header.numeric_type()
        );
        let record = decode_payload(&header, payload)?;
        let info = RecordInfo {
            header,
            len: record.len(),
            word_count: header.word_count(),
        };
        Ok((record, info))
    }

    /// Decodes the record at `word_offset` into a caller-sized buffer.
    pub fn read_record_into<T: WireScalar>(
        &self,
        word_offset: usize,
        dest: &mut [T],
    ) -> Result<RecordInfo> {
        let (header, payload) = self.payload_at(word_offset)?;
        let len = decode_payload_into(&header, payload, dest)?;
        Ok(RecordInfo {
            header,
            len,
            word_count: header.word_count(),
        })
    }

    /// Walks consecutive records starting at `word_offset`.
    pub fn records_from(&self, word_offset: usize) -> RecordIter<'a> {
        RecordIter {
            reader: *self,
            next_word: word_offset,
            failed: false,
        }
    }
}

/// Iterator over back-to-back records, yielding each record's word offset
/// with its decoded contents. Stops at the end of the buffer or after the
/// first error.
pub struct RecordIter<'a> {
    reader: RecordReader<'a>,
    next_word: usize,
    failed: bool,
}

impl Iterator for RecordIter<'_> {
    type Item = Result<(usize, DecodedRecord, RecordInfo)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.next_word * 4 >= self.reader.bytes.len() {
            return None;
        }
        let offset = self.next_word;
        match self.reader.read_record(offset) {
            Ok((record, info)) => {
                self.next_word += info.word_count;
                Some(Ok((offset, record, info)))
            }
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}
