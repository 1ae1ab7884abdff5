//! Node listings written by the `NWRITE` command: a node number followed by
//! X, Y and Z on each line, with nothing else in the file.

use std::path::Path;

use log::debug;
use mapdl_model::{FormatDescriptor, NodeBlock};

use super::nblock::decode_nblock;
use super::tokenizer::TextCursor;
use crate::error::Result;

/// `(1i9,3e21.13)` with no skipped integer columns.
pub fn nwrite_format() -> FormatDescriptor {
    FormatDescriptor::new(9, 21, 3)
        .with_skip_widths(0, 0)
        .with_dof_fields(3)
}

fn count_lines(buf: &[u8]) -> usize {
    buf.split(|&b| b == b'\n')
        .filter(|line| line.iter().any(|b| !b.is_ascii_whitespace()))
        .count()
}

/// Decodes every node line in `buf`. Omitted trailing coordinates read as
/// zero.
pub fn read_nwrite(buf: &[u8]) -> Result<NodeBlock> {
    let count = count_lines(buf);
    let mut cursor = TextCursor::default();
    let block = decode_nblock(buf, &mut cursor, count, &nwrite_format())?;
    debug!("NWRITE listing: {} nodes", block.len());
    Ok(block)
}

pub fn read_nwrite_file(path: impl AsRef<Path>) -> Result<NodeBlock> {
    let buf = std::fs::read(path)?;
    read_nwrite(&buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_with_omitted_trailing_fields() {
        let text = concat!(
            "        1 1.0000000000000E+000 2.0000000000000E+000 3.0000000000000E+000\n",
            "        2 4.0000000000000E+000\n",
            "        3\n",
            "\n",
        );
        let block = read_nwrite(text.as_bytes()).expect("decode");
        assert_eq!(block.numbers(), vec![1, 2, 3]);
        assert_eq!(block.records[0].coordinates(), [1.0, 2.0, 3.0]);
        assert_eq!(block.records[1].coordinates(), [4.0, 0.0, 0.0]);
        assert_eq!(block.records[2].coordinates(), [0.0, 0.0, 0.0]);
        assert!(!block.is_short());
    }

    #[test]
    fn fields_start_at_fixed_columns() {
        let text = "        1-1.0000000000000E+000-2.0000000000000E+000-3.0000000000000E+000\n";
        assert_eq!(text.find("-2."), Some(30));
        assert_eq!(text.find("-3."), Some(51));
        let block = read_nwrite(text.as_bytes()).expect("decode");
        assert_eq!(block.records[0].coordinates(), [-1.0, -2.0, -3.0]);
    }

    #[test]
    fn rotation_columns_are_ignored() {
        let text = "        7 1.0000000000000E+000 1.0000000000000E+000 1.0000000000000E+000 9.0000000000000E+001\r\n";
        let block = read_nwrite(text.as_bytes()).expect("decode");
        assert_eq!(block.records[0].rotations(), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn reads_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nodes.node");
        std::fs::write(&path, "        5 2.5000000000000E+000\n").expect("write");
        let block = read_nwrite_file(&path).expect("decode");
        assert_eq!(block.records[0].number, 5);
        assert_eq!(block.records[0].dof[0], 2.5);
    }
}
