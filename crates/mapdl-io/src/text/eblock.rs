//! EBLOCK (solid layout): per element eleven integer attribute fields
//! followed by the element's node ids, wrapped across lines as needed.
//!
//! Attribute order on disk: material, type, real constant, section,
//! coordinate system, birth/death, solid model reference, shape key, node
//! count, an unused field, element number.

use log::{debug, trace, warn};
use mapdl_model::{ElementBlock, FormatDescriptor, MAX_NODES};

use super::tokenizer::{TextCursor, parse_fixed_int, probe_negative};
use crate::error::{DecodeError, Result};

/// Quadratic elements with fewer written nodes than this range covers had
/// their trailing zero midside nodes dropped.
const DROPPED_MIDSIDE: std::ops::RangeInclusive<usize> = 11..=19;

fn next_int(buf: &[u8], cursor: &mut TextCursor, format: &FormatDescriptor) -> Result<i32> {
    cursor.skip_line_ends(buf, format.line_ending);
    parse_fixed_int(buf, cursor, format.int_width)
}

/// Parses up to `count` elements starting at `cursor`.
///
/// Each element lands in `elem` as ten header fields (see
/// [`mapdl_model::ElementRecord`]) followed by its node ids. A `-` in the
/// first field ends the block early, leaving the cursor on the terminator.
pub fn decode_eblock(
    buf: &[u8],
    cursor: &mut TextCursor,
    count: usize,
    format: &FormatDescriptor,
) -> Result<ElementBlock> {
    let mut elem = Vec::with_capacity(count.min(1 << 20) * 18);
    let mut elem_offsets = Vec::with_capacity(count.min(1 << 20) + 1);

    for i in 0..count {
        cursor.skip_line_ends(buf, format.line_ending);
        if cursor.is_at_end(buf) {
            return Err(DecodeError::truncated(
                "EBLOCK element",
                format.int_width,
                0,
            ));
        }
        if probe_negative(buf, cursor, format.int_width) {
            warn!("EBLOCK terminated after {i} of {count} elements");
            break;
        }
        elem_offsets.push(elem.len());

        let mut attributes = [0i32; 8];
        for field in attributes.iter_mut() {
            *field = next_int(buf, cursor, format)?;
        }
        let node_count = next_int(buf, cursor, format)?;
        let _unused = next_int(buf, cursor, format)?;
        let element_number = next_int(buf, cursor, format)?;

        let node_count = usize::try_from(node_count)
            .ok()
            .filter(|&n| n <= MAX_NODES)
            .ok_or_else(|| {
                DecodeError::Malformed(format!(
                    "element {element_number} declares {node_count} nodes, expected 0..={MAX_NODES}"
                ))
            })?;

        elem.extend_from_slice(&attributes);
        elem.push(element_number);
        elem.push(0);

        for _ in 0..node_count {
            elem.push(next_int(buf, cursor, format)?);
        }
        if DROPPED_MIDSIDE.contains(&node_count) {
            elem.resize(elem.len() + MAX_NODES - node_count, 0);
        }
        trace!("element {element_number}: {node_count} nodes");
    }
    elem_offsets.push(elem.len());

    debug!(
        "EBLOCK: {} elements, {} values, cursor at {}",
        elem_offsets.len() - 1,
        elem.len(),
        cursor.position
    );
    Ok(ElementBlock {
        requested: count,
        elem,
        elem_offsets,
    })
}

/// Convenience form taking and returning a plain byte offset.
pub fn read_eblock(
    buf: &[u8],
    start: usize,
    count: usize,
    format: &FormatDescriptor,
) -> Result<(ElementBlock, usize)> {
    let mut cursor = TextCursor::new(start);
    let block = decode_eblock(buf, &mut cursor, count, format)?;
    Ok((block, cursor.position))
}

#[cfg(test)]
mod tests {
    use mapdl_model::{HEADER_FIELDS, NODE_SENTINEL};

    use super::*;

    fn line(fields: &[i32]) -> String {
        fields.iter().map(|f| format!("{f:>9}")).collect()
    }

    fn attrs(nodes: i32, number: i32) -> Vec<i32> {
        vec![1, 2, 3, 4, 0, 0, 0, 0, nodes, 0, number]
    }

    #[test]
    fn linear_hex_leaves_sentinels() {
        let mut fields = attrs(8, 42);
        fields.extend(1..=8);
        let text = line(&fields) + "\n";
        let (block, end) =
            read_eblock(text.as_bytes(), 0, 1, &FormatDescriptor::integers(9)).expect("decode");
        assert_eq!(end, text.len() - 1);
        assert_eq!(block.elem_offsets, vec![0, HEADER_FIELDS + 8]);

        let rec = block.record(0).expect("element");
        assert_eq!((rec.material, rec.etype, rec.real_const, rec.section), (1, 2, 3, 4));
        assert_eq!(rec.element_number, 42);
        assert_eq!(rec.unused_slot, 0);
        assert_eq!(&rec.node_ids[..8], &[1, 2, 3, 4, 5, 6, 7, 8]);
        assert!(rec.node_ids[8..].iter().all(|&id| id == NODE_SENTINEL));
    }

    #[test]
    fn wrapped_node_list_matches_single_line() {
        let mut fields = attrs(20, 7);
        fields.extend(101..=120);
        let one_line = line(&fields) + "\n";
        let wrapped = format!("{}\n{}\n", line(&fields[..19]), line(&fields[19..]));
        let fmt = FormatDescriptor::integers(9);
        let (a, _) = read_eblock(one_line.as_bytes(), 0, 1, &fmt).expect("single line");
        let (b, _) = read_eblock(wrapped.as_bytes(), 0, 1, &fmt).expect("wrapped");
        assert_eq!(a, b);
        assert_eq!(b.node_ids(0).map(<[i32]>::len), Some(20));
    }

    #[test]
    fn quadratic_with_dropped_midside_nodes_is_zero_padded() {
        let mut fields = attrs(13, 3);
        fields.extend(1..=13);
        let text = format!("{}\n{}\n", line(&fields[..19]), line(&fields[19..]));
        let (block, _) =
            read_eblock(text.as_bytes(), 0, 1, &FormatDescriptor::integers(9)).expect("decode");
        let nodes = block.node_ids(0).expect("element");
        assert_eq!(nodes.len(), 20);
        assert_eq!(&nodes[..13], (1..=13).collect::<Vec<_>>().as_slice());
        assert!(nodes[13..].iter().all(|&id| id == 0));
    }

    #[test]
    fn terminator_reports_actual_count_and_offsets() {
        let mut first = attrs(4, 1);
        first.extend([1, 2, 3, 4]);
        let mut second = attrs(3, 2);
        second.extend([5, 6, 7]);
        let text = format!("{}\r\n{}\r\n{:>9}\r\n", line(&first), line(&second), -1);
        let (block, end) =
            read_eblock(text.as_bytes(), 0, 10, &FormatDescriptor::integers(9)).expect("decode");
        assert_eq!(block.len(), 2);
        assert!(block.is_short());
        assert_eq!(block.elem_offsets, vec![0, 14, 27]);
        assert_eq!(block.elem.len(), 27);
        assert!(text[end..].trim_start().starts_with("-1"));
    }

    #[test]
    fn more_than_twenty_nodes_is_malformed() {
        let text = line(&attrs(21, 1)) + "\n";
        let err = read_eblock(text.as_bytes(), 0, 1, &FormatDescriptor::integers(9))
            .expect_err("21 nodes");
        assert!(matches!(err, DecodeError::Malformed(_)));
    }

    #[test]
    fn missing_nodes_are_truncated() {
        let mut fields = attrs(8, 1);
        fields.extend(1..=5);
        let text = line(&fields);
        let err = read_eblock(text.as_bytes(), 0, 1, &FormatDescriptor::integers(9))
            .expect_err("three nodes missing");
        assert!(err.is_truncated());
    }
}
