//! Binary record codec for MAPDL result files.
//!
//! A record is `[buffer_size, flags]`, `buffer_size` payload words and one
//! footer word. Flags select dense, bitmask-sparse or windowed-sparse
//! storage and one of four scalar types.

pub mod bitmask;
pub mod dispatch;
pub mod header;
pub mod stream;
pub mod windowed;
mod wire;

pub use bitmask::{MAX_BITMASK_ENTRIES, decode_bitmask, decode_bitmask_into};
pub use dispatch::{RecordInfo, RecordIter, RecordReader, decode_payload, decode_payload_into};
pub use header::{Compression, FOOTER_WORDS, HEADER_BYTES, HEADER_WORDS, RecordHeader};
pub use stream::RecordStream;
pub use windowed::{SparseWindow, WindowReader, decode_windowed, decode_windowed_into};
pub use wire::WireScalar;

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use mapdl_model::{DecodedRecord, NumericType};

    use super::*;
    use crate::error::DecodeError;

    fn record(header: RecordHeader, payload: &[u8]) -> Vec<u8> {
        let mut out = header.to_bytes().to_vec();
        out.extend_from_slice(payload);
        out.extend_from_slice(&0i32.to_le_bytes());
        out
    }

    fn header(words: usize, bitmask: bool, windowed: bool, int: bool, narrow: bool) -> RecordHeader {
        RecordHeader {
            buffer_size: words as i32,
            is_bitmask_sparse: bitmask,
            is_windowed_sparse: windowed,
            reserved_flag: false,
            is_narrow_precision: narrow,
            is_integer_type: int,
        }
    }

    fn words(values: &[i32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    #[test]
    fn dense_doubles_are_copied_verbatim() {
        let payload: Vec<u8> = [1.0f64, -2.0, 3.5]
            .iter()
            .flat_map(|v| v.to_le_bytes())
            .collect();
        let bytes = record(header(6, false, false, false, false), &payload);
        let (rec, info) = RecordReader::new(&bytes).read_record(0).expect("decode");
        assert_eq!(rec, DecodedRecord::Float64(vec![1.0, -2.0, 3.5]));
        assert_eq!(info.len, 3);
        assert_eq!(info.word_count, 9);
    }

    #[test]
    fn bitmask_record_at_word_offset() {
        let mut bytes = vec![0u8; 12];
        bytes.extend(record(
            header(4, true, false, true, false),
            &words(&[4, 0b0101, 7, 9]),
        ));
        let (rec, info) = RecordReader::new(&bytes).read_record(3).expect("decode");
        assert_eq!(rec, DecodedRecord::Int32(vec![7, 0, 9, 0]));
        assert_eq!(info.len, 4);
        assert_eq!(info.word_count, 7);
    }

    #[test]
    fn windowed_float_record() {
        let mut payload = words(&[3, 1, -1, 2]);
        payload.extend_from_slice(&0.5f32.to_le_bytes());
        payload.extend_from_slice(&0.25f32.to_le_bytes());
        let bytes = record(header(6, false, true, false, true), &payload);
        let (rec, _) = RecordReader::new(&bytes).read_record(0).expect("decode");
        assert_eq!(rec, DecodedRecord::Float32(vec![0.0, 0.5, 0.25]));
    }

    #[test]
    fn fill_in_place_checks_element_type() {
        let bytes = record(header(2, false, false, true, false), &words(&[1, 2]));
        let reader = RecordReader::new(&bytes);
        let mut wrong = [0.0f64; 2];
        let err = reader.read_record_into(0, &mut wrong).expect_err("int record");
        assert!(matches!(
            err,
            DecodeError::TypeMismatch {
                expected: NumericType::Float64,
                found: NumericType::Int32
            }
        ));

        let mut dest = [0i32; 4];
        let info = reader.read_record_into(0, &mut dest).expect("decode");
        assert_eq!(info.len, 2);
        assert_eq!(dest, [1, 2, 0, 0]);
    }

    #[test]
    fn empty_record_is_a_no_op_fill() {
        let bytes = record(header(0, true, false, false, false), &[]);
        let mut dest = [4.0f64; 2];
        let info = RecordReader::new(&bytes)
            .read_record_into(0, &mut dest)
            .expect("empty record");
        assert_eq!(info.len, 0);
        assert_eq!(info.word_count, 3);
        assert_eq!(dest, [4.0, 4.0]);
    }

    #[test]
    fn payload_shorter_than_declared_is_truncated() {
        let mut bytes = header(5, false, false, true, false).to_bytes().to_vec();
        bytes.extend(words(&[1, 2]));
        let err = RecordReader::new(&bytes).read_record(0).expect_err("short payload");
        assert!(err.is_truncated());
    }

    #[test]
    fn iterator_walks_consecutive_records() {
        let mut bytes = record(header(1, false, false, true, false), &words(&[11]));
        bytes.extend(record(header(2, false, false, true, false), &words(&[12, 13])));
        let offsets: Vec<usize> = RecordReader::new(&bytes)
            .records_from(0)
            .map(|r| r.expect("record").0)
            .collect();
        assert_eq!(offsets, vec![0, 4]);
    }

    #[test]
    fn ragged_dense_payload_is_malformed() {
        let mut payload = 1.5f64.to_le_bytes().to_vec();
        payload.extend(words(&[7]));
        let bytes = record(header(3, false, false, false, false), &payload);
        let reader = RecordReader::new(&bytes);
        let err = reader.read_record(0).expect_err("half a double left over");
        assert!(matches!(err, DecodeError::Malformed(_)));

        let mut dest = [0.0f64; 2];
        let err = reader.read_record_into(0, &mut dest).expect_err("same in place");
        assert!(matches!(err, DecodeError::Malformed(_)));
    }

    #[test]
    fn negative_size_record_spans_only_its_framing() {
        let negative = RecordHeader {
            buffer_size: -1,
            ..header(0, false, false, true, false)
        };
        let mut bytes = negative.to_bytes().to_vec();
        bytes.extend(words(&[0]));
        bytes.extend(record(header(1, false, false, true, false), &words(&[42])));
        let walked: Vec<(usize, DecodedRecord)> = RecordReader::new(&bytes)
            .records_from(0)
            .map(|r| r.map(|(offset, rec, _)| (offset, rec)).expect("record"))
            .collect();
        assert_eq!(
            walked,
            vec![
                (0, DecodedRecord::Int32(vec![])),
                (3, DecodedRecord::Int32(vec![42])),
            ]
        );
    }

    #[test]
    fn stream_reads_sequentially_and_by_offset() {
        let mut bytes = record(header(1, false, false, true, false), &words(&[11]));
        bytes.extend(record(
            header(4, true, false, true, false),
            &words(&[3, 0b100, 42, 0]),
        ));
        let mut stream = RecordStream::new(Cursor::new(bytes));

        let (first, info) = stream.read_record(Some(0)).expect("first");
        assert_eq!(first, DecodedRecord::Int32(vec![11]));
        assert_eq!(info.word_count, 4);

        let mut dest = [0i32; 3];
        let info = stream.read_record_into(None, &mut dest).expect("second");
        assert_eq!(info.len, 3);
        assert_eq!(dest, [0, 0, 42]);

        let (again, _) = stream.read_record(Some(0)).expect("rewind");
        assert_eq!(again, first);

        let err = stream.read_record(Some(100)).expect_err("past end");
        assert!(err.is_truncated());
    }
}
