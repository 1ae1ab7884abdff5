//! Bitmask-sparse records.
//!
//! Layout: `size: i32`, `bitcode: i32`, then one packed value per set bit of
//! `bitcode`, lowest bit first. A single 32-bit mask covers at most 32
//! entries; longer vectors are split across consecutive records.

use log::trace;
use mapdl_model::NumericType;

use super::wire::{Payload, WireScalar};
use crate::bits::{is_set, popcount};
use crate::error::{DecodeError, Result};

/// Entries addressable by one occupancy mask.
pub const MAX_BITMASK_ENTRIES: usize = 32;

fn read_prefix(payload: &mut Payload<'_>) -> Result<(usize, u32)> {
    let size = payload.read_i32("bitmask size")?;
    let bitcode = payload.read_i32("bitmask occupancy mask")? as u32;
    if !(0..=MAX_BITMASK_ENTRIES as i32).contains(&size) {
        return Err(DecodeError::Malformed(format!(
            "bitmask record declares {size} entries, expected 0..={MAX_BITMASK_ENTRIES}"
        )));
    }
    Ok((size as usize, bitcode))
}

/// Bytes of packed data that must follow the prefix.
///
/// Narrow values pack two per word; an odd count leaves a padding half-word
/// before the next word boundary, which is counted here but never read.
fn packed_len(numeric_type: NumericType, set_bits: usize) -> usize {
    match numeric_type {
        NumericType::Int16 => set_bits.next_multiple_of(2) * 2,
        other => set_bits * other.byte_width(),
    }
}

fn expand<T: WireScalar>(payload: &[u8], dest: Option<&mut [T]>) -> Result<(usize, Vec<T>)> {
    let mut cursor = Payload::new(payload);
    let (size, bitcode) = read_prefix(&mut cursor)?;

    let in_range = if size == MAX_BITMASK_ENTRIES {
        bitcode
    } else {
        bitcode & ((1u32 << size) - 1)
    };
    let set_bits = popcount(in_range) as usize;
    let needed = packed_len(T::TYPE, set_bits);
    if needed > cursor.remaining() {
        return Err(DecodeError::truncated(
            "bitmask packed values",
            needed,
            cursor.remaining(),
        ));
    }
    trace!("bitmask record: {size} entries, {set_bits} stored, {}", T::TYPE);

    let mut owned = Vec::new();
    let out: &mut [T] = match dest {
        Some(dest) => {
            if dest.len() < size {
                return Err(DecodeError::IndexOutOfRange {
                    index: size - 1,
                    len: dest.len(),
                });
            }
            &mut dest[..size]
        }
        None => {
            owned.resize(size, T::default());
            owned.as_mut_slice()
        }
    };

    for (iloc, slot) in out.iter_mut().enumerate() {
        *slot = if is_set(bitcode, iloc) {
            cursor.read_packed("bitmask packed values")?
        } else {
            T::default()
        };
    }
    Ok((size, owned))
}

/// Expands a bitmask payload into a newly allocated dense vector.
pub fn decode_bitmask<T: WireScalar>(payload: &[u8]) -> Result<Vec<T>> {
    expand::<T>(payload, None).map(|(_, values)| values)
}

/// Expands a bitmask payload into `dest`, returning the logical length.
pub fn decode_bitmask_into<T: WireScalar>(payload: &[u8], dest: &mut [T]) -> Result<usize> {
    expand(payload, Some(dest)).map(|(size, _)| size)
}
