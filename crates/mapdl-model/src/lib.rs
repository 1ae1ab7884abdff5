//! Plain data model shared by the MAPDL record and archive decoders.

mod element;
mod format;
mod node;
mod vector;

pub use element::{ElementBlock, ElementRecord, HEADER_FIELDS, MAX_NODES, NODE_SENTINEL};
pub use format::{FormatDescriptor, LineEnding};
pub use node::{DOF_COUNT, NodeBlock, NodeRecord};
pub use vector::{DecodedRecord, NumericType};
