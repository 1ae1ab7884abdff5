//! Fixed-width text blocks of MAPDL archive (`.cdb`) files.

pub mod directive;
pub mod eblock;
pub mod nblock;
pub mod nwrite;
pub mod tokenizer;

pub use directive::{FieldKind, FieldSpec, eblock_format, nblock_format, parse_directive};
pub use eblock::{decode_eblock, read_eblock};
pub use nblock::{decode_nblock, read_nblock};
pub use nwrite::{nwrite_format, read_nwrite, read_nwrite_file};
pub use tokenizer::{
    FloatField, TextCursor, parse_fixed_float, parse_fixed_int, probe_negative,
};
