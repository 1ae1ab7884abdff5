//! Decoders for raw MAPDL data.
//!
//! This crate provides:
//! - **Binary record codec** for result files: header flags, dense,
//!   bitmask-sparse and windowed-sparse payloads in four scalar types
//! - **Record streams** over any `Read + Seek` source, plus parallel batch
//!   decoding of records at known offsets
//! - **Fixed-width text decoders** for archive NBLOCK/EBLOCK sections and
//!   `NWRITE` node listings
//! - **Archive block locator** driven by each block's format directive
//! - **JSON decode configuration** for overriding block layouts
//!
//! The library logs through the `log` facade and never installs a logger.

pub mod archive;
pub mod batch;
pub mod bits;
pub mod config;
pub mod error;
pub mod record;
pub mod text;

pub use archive::Archive;
pub use batch::{decode_all, decode_records_parallel, read_node_records};
pub use config::{DecodeConfig, load_config, save_config};
pub use error::{DecodeError, Result};
pub use record::{
    Compression, RecordHeader, RecordInfo, RecordReader, RecordStream, WireScalar, decode_payload,
    decode_payload_into,
};
pub use text::{TextCursor, read_eblock, read_nblock, read_nwrite};

pub use mapdl_model::{
    DecodedRecord, ElementBlock, ElementRecord, FormatDescriptor, LineEnding, NodeBlock,
    NodeRecord, NumericType,
};
