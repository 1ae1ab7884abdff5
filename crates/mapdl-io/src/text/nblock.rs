//! NBLOCK: one node per line, `[node][skip][skip][float]x(0..6)`.

use log::{debug, warn};
use mapdl_model::{DOF_COUNT, FormatDescriptor, NodeBlock, NodeRecord};

use super::tokenizer::{FloatField, TextCursor, parse_fixed_float, parse_fixed_int, probe_negative};
use crate::error::{DecodeError, Result};

/// MAPDL closes a short block with a command line such as
/// `N,R5.3,LOC,       -1,` whose first field carries no `-`.
fn starts_command(buf: &[u8], cursor: &TextCursor) -> bool {
    cursor.peek(buf).is_some_and(|b| b.is_ascii_alphabetic())
}

/// Parses up to `count` node lines starting at `cursor`.
///
/// A line whose first field holds a `-` ends the block early; the cursor is
/// left on that line and the block reports how many nodes were read.
/// Omitted trailing DOF fields read as zero.
pub fn decode_nblock(
    buf: &[u8],
    cursor: &mut TextCursor,
    count: usize,
    format: &FormatDescriptor,
) -> Result<NodeBlock> {
    let dof_fields = format.dof_fields.min(DOF_COUNT);
    let [skip_a, skip_b] = format.skip_field_widths();
    let mut records = Vec::with_capacity(count.min(1 << 20));

    while records.len() < count {
        if cursor.is_at_end(buf) {
            return Err(DecodeError::truncated(
                "NBLOCK node line",
                format.int_width,
                0,
            ));
        }
        if probe_negative(buf, cursor, format.int_width) || starts_command(buf, cursor) {
            warn!(
                "NBLOCK terminated after {} of {count} nodes",
                records.len()
            );
            break;
        }

        let number = parse_fixed_int(buf, cursor, format.int_width)?;
        cursor.skip_field(buf, skip_a)?;
        cursor.skip_field(buf, skip_b)?;

        let mut dof = [0.0; DOF_COUNT];
        for slot in dof.iter_mut().take(dof_fields) {
            match parse_fixed_float(buf, cursor, format.float_width, format.exponent_digits)? {
                FloatField::Value(v) => *slot = v,
                FloatField::EndOfLine => break,
            }
        }

        if dof_fields < DOF_COUNT {
            // Columns past the declared field count are not part of the block.
            cursor.skip_line(buf);
        } else {
            // Some pre-processors pad lines with blanks before the terminator.
            cursor.skip_blanks(buf);
            cursor.skip_line_ends(buf, format.line_ending);
        }
        records.push(NodeRecord { number, dof });
    }

    debug!("NBLOCK: {} nodes, cursor at {}", records.len(), cursor.position);
    Ok(NodeBlock {
        requested: count,
        records,
    })
}

/// Convenience form taking and returning a plain byte offset.
pub fn read_nblock(
    buf: &[u8],
    start: usize,
    count: usize,
    format: &FormatDescriptor,
) -> Result<(NodeBlock, usize)> {
    let mut cursor = TextCursor::new(start);
    let block = decode_nblock(buf, &mut cursor, count, format)?;
    Ok((block, cursor.position))
}
