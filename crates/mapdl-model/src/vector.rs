use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Scalar type carried by a binary record.
///
/// The record header selects the family with its integer flag and the width
/// within that family with its precision flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumericType {
    Int16,
    Int32,
    Float32,
    Float64,
}

impl NumericType {
    pub fn from_flags(is_integer: bool, is_narrow: bool) -> Self {
        match (is_integer, is_narrow) {
            (true, true) => NumericType::Int16,
            (true, false) => NumericType::Int32,
            (false, true) => NumericType::Float32,
            (false, false) => NumericType::Float64,
        }
    }

    /// Size of one value in bytes.
    pub fn byte_width(self) -> usize {
        match self {
            NumericType::Int16 => 2,
            NumericType::Int32 | NumericType::Float32 => 4,
            NumericType::Float64 => 8,
        }
    }

    /// Number of 4-byte words one value occupies in a windowed payload.
    pub fn word_stride(self) -> usize {
        self.byte_width().div_ceil(4)
    }
}

impl Display for NumericType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            NumericType::Int16 => "int16",
            NumericType::Int32 => "int32",
            NumericType::Float32 => "float32",
            NumericType::Float64 => "float64",
        };
        f.write_str(name)
    }
}

/// Dense vector produced by decoding exactly one record.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedRecord {
    Int16(Vec<i16>),
    Int32(Vec<i32>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
}

impl DecodedRecord {
    pub fn numeric_type(&self) -> NumericType {
        match self {
            DecodedRecord::Int16(_) => NumericType::Int16,
            DecodedRecord::Int32(_) => NumericType::Int32,
            DecodedRecord::Float32(_) => NumericType::Float32,
            DecodedRecord::Float64(_) => NumericType::Float64,
        }
    }

    pub fn empty(numeric_type: NumericType) -> Self {
        match numeric_type {
            NumericType::Int16 => DecodedRecord::Int16(Vec::new()),
            NumericType::Int32 => DecodedRecord::Int32(Vec::new()),
            NumericType::Float32 => DecodedRecord::Float32(Vec::new()),
            NumericType::Float64 => DecodedRecord::Float64(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            DecodedRecord::Int16(v) => v.len(),
            DecodedRecord::Int32(v) => v.len(),
            DecodedRecord::Float32(v) => v.len(),
            DecodedRecord::Float64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Widens every value to `f64`, mostly useful for inspection and tests.
    pub fn to_f64_vec(&self) -> Vec<f64> {
        match self {
            DecodedRecord::Int16(v) => v.iter().map(|&x| f64::from(x)).collect(),
            DecodedRecord::Int32(v) => v.iter().map(|&x| f64::from(x)).collect(),
            DecodedRecord::Float32(v) => v.iter().map(|&x| f64::from(x)).collect(),
            DecodedRecord::Float64(v) => v.clone(),
        }
    }

    pub fn as_f64(&self) -> Option<&[f64]> {
        match self {
            DecodedRecord::Float64(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<&[i32]> {
        match self {
            DecodedRecord::Int32(v) => Some(v),
            _ => None,
        }
    }
}
