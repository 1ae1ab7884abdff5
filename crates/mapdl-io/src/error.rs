//! Error types for mapdl-io

use mapdl_model::NumericType;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DecodeError>;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Truncated {context}: needed {needed} bytes, {available} available")]
    Truncated {
        context: &'static str,
        needed: usize,
        available: usize,
    },

    #[error("Malformed input: {0}")]
    Malformed(String),

    #[error("Index {index} out of range for vector of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Type mismatch: record holds {found}, destination expects {expected}")]
    TypeMismatch {
        expected: NumericType,
        found: NumericType,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DecodeError {
    pub(crate) fn truncated(context: &'static str, needed: usize, available: usize) -> Self {
        DecodeError::Truncated {
            context,
            needed,
            available,
        }
    }

    pub fn is_truncated(&self) -> bool {
        matches!(self, DecodeError::Truncated { .. })
    }
}
