//! Bulk decoding of records whose word offsets are already known.

use log::debug;
use mapdl_model::{DOF_COUNT, DecodedRecord, NodeRecord};
use rayon::prelude::*;

use crate::error::{DecodeError, Result};
use crate::record::{RecordInfo, RecordReader};

/// Decodes every record listed in `offsets` in parallel.
///
/// Results come back in `offsets` order, one per offset, so a bad record
/// does not hide the others.
pub fn decode_records_parallel(
    bytes: &[u8],
    offsets: &[usize],
) -> Vec<Result<(DecodedRecord, RecordInfo)>> {
    let reader = RecordReader::new(bytes);
    debug!("decoding {} records in parallel", offsets.len());
    offsets
        .par_iter()
        .map(|&offset| reader.read_record(offset))
        .collect()
}

/// Like [`decode_records_parallel`], failing on the first bad record.
pub fn decode_all(bytes: &[u8], offsets: &[usize]) -> Result<Vec<DecodedRecord>> {
    let reader = RecordReader::new(bytes);
    offsets
        .par_iter()
        .map(|&offset| reader.read_record(offset).map(|(record, _)| record))
        .collect()
}

/// Reads `count` consecutive node records starting at `word_offset`.
///
/// Each record holds the node number in slot 0 followed by up to six DOF
/// values; bitmask-sparse records leave absent values at zero.
pub fn read_node_records(
    bytes: &[u8],
    word_offset: usize,
    count: usize,
) -> Result<Vec<NodeRecord>> {
    let reader = RecordReader::new(bytes);
    let mut nodes = Vec::with_capacity(count);
    for item in reader.records_from(word_offset).take(count) {
        let (offset, record, _) = item?;
        let values = record.to_f64_vec();
        let Some((&number, dof_values)) = values.split_first() else {
            return Err(DecodeError::Malformed(format!(
                "node record at word {offset} is empty"
            )));
        };
        let mut dof = [0.0; DOF_COUNT];
        for (slot, &v) in dof.iter_mut().zip(dof_values) {
            *slot = v;
        }
        nodes.push(NodeRecord {
            number: number as i32,
            dof,
        });
    }
    if nodes.len() < count {
        return Err(DecodeError::truncated(
            "node records",
            count,
            nodes.len(),
        ));
    }
    Ok(nodes)
}
