//! Record decoding from a seekable byte stream such as an open result file.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use mapdl_model::DecodedRecord;

use super::dispatch::{RecordInfo, decode_payload, decode_payload_into};
use super::header::{FOOTER_WORDS, HEADER_BYTES, RecordHeader};
use super::wire::WireScalar;
use crate::error::{DecodeError, Result};

/// Stream decoding context: the reader plus a scratch buffer reused across
/// records. One context per stream; nothing is shared between contexts.
pub struct RecordStream<R> {
    inner: R,
    scratch: Vec<u8>,
}

impl RecordStream<BufReader<File>> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(BufReader::new(File::open(path)?)))
    }
}

impl<R: Read + Seek> RecordStream<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            scratch: Vec::new(),
        }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    fn read_exact_counted(&mut self, len: usize, context: &'static str) -> Result<()> {
        self.scratch.clear();
        let got = (&mut self.inner)
            .take(len as u64)
            .read_to_end(&mut self.scratch)?;
        if got < len {
            return Err(DecodeError::truncated(context, len, got));
        }
        Ok(())
    }

    /// Positions at `word_offset` when given, then reads header and payload
    /// and steps over the footer so the stream rests on the next record.
    fn load(&mut self, word_offset: Option<u64>) -> Result<RecordHeader> {
        if let Some(word) = word_offset {
            self.inner.seek(SeekFrom::Start(word * 4))?;
        }
        self.read_exact_counted(HEADER_BYTES, "record header")?;
        let header = RecordHeader::parse(&self.scratch)?;
        self.read_exact_counted(header.payload_bytes(), "record payload")?;
        self.inner
            .seek(SeekFrom::Current(FOOTER_WORDS as i64 * 4))?;
        Ok(header)
    }

    /// Allocates and decodes one record. `None` continues from the current
    /// stream position.
    pub fn read_record(&mut self, word_offset: Option<u64>) -> Result<(DecodedRecord, RecordInfo)> {
        let header = self.load(word_offset)?;
        let record = decode_payload(&header, &self.scratch)?;
        let info = RecordInfo {
            header,
            len: record.len(),
            word_count: header.word_count(),
        };
        Ok((record, info))
    }

    /// Decodes one record into `dest`; an empty record leaves `dest` as is.
    pub fn read_record_into<T: WireScalar>(
        &mut self,
        word_offset: Option<u64>,
        dest: &mut [T],
    ) -> Result<RecordInfo> {
        let header = self.load(word_offset)?;
        let len = decode_payload_into(&header, &self.scratch, dest)?;
        Ok(RecordInfo {
            header,
            len,
            word_count: header.word_count(),
        })
    }
}
