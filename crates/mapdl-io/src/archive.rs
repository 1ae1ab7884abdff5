//! Locates NBLOCK and EBLOCK sections in an archive (`.cdb`) text buffer.
//!
//! Each block is a header line such as `NBLOCK,6,SOLID,  40,  40`, a format
//! directive line, then the fixed-width data decoded by [`crate::text`].

use std::path::Path;

use log::{debug, warn};
use mapdl_model::{ElementBlock, FormatDescriptor, LineEnding, NodeBlock};

use crate::config::DecodeConfig;
use crate::error::{DecodeError, Result};
use crate::text::{TextCursor, decode_eblock, decode_nblock, eblock_format, nblock_format};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockKind {
    Nodes,
    Elements,
}

impl BlockKind {
    fn keyword(self) -> &'static str {
        match self {
            BlockKind::Nodes => "NBLOCK",
            BlockKind::Elements => "EBLOCK",
        }
    }

    fn from_header(line: &str) -> Option<Self> {
        let command = line.split(',').next()?.trim();
        if command.eq_ignore_ascii_case("NBLOCK") {
            Some(BlockKind::Nodes)
        } else if command.eq_ignore_ascii_case("EBLOCK") {
            Some(BlockKind::Elements)
        } else {
            None
        }
    }
}

/// Declared record count: the last comma field of the header, when numeric.
fn declared_count(header: &str) -> Option<usize> {
    let mut fields = header.split(',');
    fields.next()?;
    fields.next_back()?.trim().parse().ok()
}

/// Returns the current line without its terminator and moves past it.
fn take_line<'a>(buf: &'a [u8], cursor: &mut TextCursor) -> &'a [u8] {
    let start = cursor.position;
    let end = cursor.line_end(buf);
    cursor.skip_line(buf);
    &buf[start..end]
}

fn resolve_format(
    configured: Option<FormatDescriptor>,
    directive: &str,
    parse: fn(&str) -> Result<FormatDescriptor>,
    data: &[u8],
    line_ending: Option<LineEnding>,
) -> Result<FormatDescriptor> {
    let format = match configured {
        Some(format) => format,
        None => parse(directive)?.with_line_ending(LineEnding::detect(data)),
    };
    Ok(match line_ending {
        Some(policy) => format.with_line_ending(policy),
        None => format,
    })
}

/// Node and element blocks decoded from one archive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Archive {
    pub nodes: Option<NodeBlock>,
    pub elements: Option<ElementBlock>,
}

impl Archive {
    pub fn parse(buf: &[u8]) -> Result<Self> {
        Self::parse_with(buf, &DecodeConfig::default())
    }

    /// Scans `buf` for the first NBLOCK and EBLOCK and decodes both.
    ///
    /// A header without a count decodes until the block's `-1` terminator.
    pub fn parse_with(buf: &[u8], config: &DecodeConfig) -> Result<Self> {
        let mut archive = Archive::default();
        let mut cursor = TextCursor::default();

        while !cursor.is_at_end(buf) {
            let line_start = cursor.position;
            let line = take_line(buf, &mut cursor);
            let Ok(header) = std::str::from_utf8(line) else {
                continue;
            };
            let Some(kind) = BlockKind::from_header(header) else {
                continue;
            };
            let already_read = match kind {
                BlockKind::Nodes => archive.nodes.is_some(),
                BlockKind::Elements => archive.elements.is_some(),
            };
            if already_read {
                warn!("ignoring additional {} at byte {line_start}", kind.keyword());
                continue;
            }

            let directive_line = take_line(buf, &mut cursor);
            let directive = std::str::from_utf8(directive_line).map_err(|_| {
                DecodeError::Malformed(format!(
                    "{} directive at byte {line_start} is not text",
                    kind.keyword()
                ))
            })?;
            let data = &buf[cursor.position..];
            let declared = declared_count(header);
            let count = declared.unwrap_or(usize::MAX);
            debug!(
                "{} at byte {line_start}: declared {declared:?}, directive {:?}",
                kind.keyword(),
                directive.trim()
            );

            match kind {
                BlockKind::Nodes => {
                    let format = resolve_format(
                        config.nblock,
                        directive,
                        nblock_format,
                        data,
                        config.line_ending,
                    )?;
                    let mut block = decode_nblock(buf, &mut cursor, count, &format)?;
                    if declared.is_none() {
                        block.requested = block.len();
                    }
                    archive.nodes = Some(block);
                }
                BlockKind::Elements => {
                    let format = resolve_format(
                        config.eblock,
                        directive,
                        eblock_format,
                        data,
                        config.line_ending,
                    )?;
                    let mut block = decode_eblock(buf, &mut cursor, count, &format)?;
                    if declared.is_none() {
                        block.requested = block.len();
                    }
                    archive.elements = Some(block);
                }
            }
            if archive.nodes.is_some() && archive.elements.is_some() {
                break;
            }
        }
        Ok(archive)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_file_with(path, &DecodeConfig::default())
    }

    pub fn from_file_with(path: impl AsRef<Path>, config: &DecodeConfig) -> Result<Self> {
        let buf = std::fs::read(path)?;
        Self::parse_with(&buf, config)
    }
}
