use serde::{Deserialize, Serialize};

use crate::node::DOF_COUNT;

/// Line terminator accepted between records of a text block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    Lf,
    CrLf,
    /// Any run of `\r` and `\n` bytes.
    #[default]
    Any,
}

impl LineEnding {
    /// Width of one terminator in bytes, `None` for `Any`.
    pub fn width(self) -> Option<usize> {
        match self {
            LineEnding::Lf => Some(1),
            LineEnding::CrLf => Some(2),
            LineEnding::Any => None,
        }
    }

    /// Looks at the first terminator in `buf`.
    pub fn detect(buf: &[u8]) -> Self {
        match buf.iter().position(|&b| b == b'\n') {
            Some(i) if i > 0 && buf[i - 1] == b'\r' => LineEnding::CrLf,
            Some(_) => LineEnding::Lf,
            None => LineEnding::Any,
        }
    }
}

/// Field layout of one text block, normally derived from the block's own
/// directive line such as `(3i9,6e21.13e3)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatDescriptor {
    pub int_width: usize,
    pub float_width: usize,
    pub exponent_digits: usize,
    /// Widths of the two integer fields following the node number in an
    /// NBLOCK line. They equal `int_width` in every directive ANSYS writes.
    #[serde(default)]
    pub skip_widths: Option<[usize; 2]>,
    #[serde(default = "default_dof_fields")]
    pub dof_fields: usize,
    #[serde(default)]
    pub line_ending: LineEnding,
}

fn default_dof_fields() -> usize {
    DOF_COUNT
}

impl FormatDescriptor {
    pub fn new(int_width: usize, float_width: usize, exponent_digits: usize) -> Self {
        Self {
            int_width,
            float_width,
            exponent_digits,
            skip_widths: None,
            dof_fields: DOF_COUNT,
            line_ending: LineEnding::Any,
        }
    }

    /// Integer-only layout used by EBLOCK.
    pub fn integers(int_width: usize) -> Self {
        Self::new(int_width, 0, 0)
    }

    pub fn with_skip_widths(mut self, first: usize, second: usize) -> Self {
        self.skip_widths = Some([first, second]);
        self
    }

    pub fn with_dof_fields(mut self, dof_fields: usize) -> Self {
        self.dof_fields = dof_fields;
        self
    }

    pub fn with_line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = line_ending;
        self
    }

    pub fn skip_field_widths(&self) -> [usize; 2] {
        self.skip_widths.unwrap_or([self.int_width, self.int_width])
    }
}

impl Default for FormatDescriptor {
    /// `(3i9,6e21.13e3)`, the layout written by current MAPDL releases.
    fn default() -> Self {
        Self::new(9, 21, 3)
    }
}
