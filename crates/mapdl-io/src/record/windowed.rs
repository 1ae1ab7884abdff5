//! Windowed-sparse records.
//!
//! Layout: `size: i32`, `window_count: i32`, then `window_count` windows.
//! Each window starts with `loc: i32`:
//!
//! - `loc > 0`: one value at index `loc`
//! - `loc <= 0`: a window starting at `-loc`, followed by `len: i32`;
//!   `len > 0` stores `len` values, otherwise one value repeated `-len` times
//!
//! Every value occupies `ceil(size_of::<T>() / 4)` words.

use std::ops::Range;

use log::trace;

use super::wire::{Payload, WireScalar};
use crate::error::{DecodeError, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum SparseWindow<T> {
    Isolated { index: usize, value: T },
    Run { start: usize, values: Vec<T> },
    ConstantRun { start: usize, value: T, length: usize },
}

impl<T: WireScalar> SparseWindow<T> {
    /// Output indices written by this window.
    pub fn span(&self) -> Range<usize> {
        match self {
            SparseWindow::Isolated { index, .. } => *index..index + 1,
            SparseWindow::Run { start, values } => *start..start + values.len(),
            SparseWindow::ConstantRun { start, length, .. } => *start..start + length,
        }
    }

    /// Writes the window into `dest`, failing if any index falls outside it.
    pub fn apply(&self, dest: &mut [T]) -> Result<()> {
        let span = self.span();
        if span.end > dest.len() {
            return Err(DecodeError::IndexOutOfRange {
                index: span.end - 1,
                len: dest.len(),
            });
        }
        match self {
            SparseWindow::Isolated { index, value } => dest[*index] = *value,
            SparseWindow::Run { values, .. } => dest[span].copy_from_slice(values),
            SparseWindow::ConstantRun { value, .. } => dest[span].fill(*value),
        }
        Ok(())
    }
}

/// Sequential reader over the windows of one payload.
pub struct WindowReader<'a, T> {
    payload: Payload<'a>,
    size: usize,
    remaining: usize,
    _marker: std::marker::PhantomData<T>,
}

impl<'a, T: WireScalar> WindowReader<'a, T> {
    pub fn new(payload: &'a [u8]) -> Result<Self> {
        let mut payload = Payload::new(payload);
        let size = payload.read_i32("windowed size")?;
        let window_count = payload.read_i32("windowed window count")?;
        if size < 0 {
            return Err(DecodeError::Malformed(format!(
                "windowed record declares negative size {size}"
            )));
        }
        Ok(Self {
            payload,
            size: size as usize,
            remaining: window_count.max(0) as usize,
            _marker: std::marker::PhantomData,
        })
    }

    /// Logical length of the decoded vector.
    pub fn size(&self) -> usize {
        self.size
    }

    fn read_window(&mut self) -> Result<SparseWindow<T>> {
        let loc = self.payload.read_i32("window location")?;
        if loc > 0 {
            let value = self.payload.read_word_aligned("isolated value")?;
            return Ok(SparseWindow::Isolated {
                index: loc as usize,
                value,
            });
        }

        let start = loc.unsigned_abs() as usize;
        let len = self.payload.read_i32("window length")?;
        if len > 0 {
            let len = len as usize;
            let needed = len * T::TYPE.word_stride() * 4;
            if needed > self.payload.remaining() {
                return Err(DecodeError::truncated(
                    "window run values",
                    needed,
                    self.payload.remaining(),
                ));
            }
            let values = (0..len)
                .map(|_| self.payload.read_word_aligned("window run values"))
                .collect::<Result<Vec<T>>>()?;
            Ok(SparseWindow::Run { start, values })
        } else {
            // A zero length still stores its value and writes it once.
            let value = self.payload.read_word_aligned("constant window value")?;
            Ok(SparseWindow::ConstantRun {
                start,
                value,
                length: (len.unsigned_abs() as usize).max(1),
            })
        }
    }
}

impl<T: WireScalar> Iterator for WindowReader<'_, T> {
    type Item = Result<SparseWindow<T>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let window = self.read_window();
        if window.is_err() {
            self.remaining = 0;
        }
        Some(window)
    }
}

fn fill_windows<T: WireScalar>(reader: WindowReader<'_, T>, out: &mut [T]) -> Result<()> {
    out.fill(T::default());
    for window in reader {
        let window = window?;
        trace!("window {:?} ({})", window.span(), T::TYPE);
        window.apply(out)?;
    }
    Ok(())
}

/// Expands a windowed payload into a newly allocated, zero-initialized vector.
pub fn decode_windowed<T: WireScalar>(payload: &[u8]) -> Result<Vec<T>> {
    let reader = WindowReader::<T>::new(payload)?;
    let mut out = vec![T::default(); reader.size()];
    fill_windows(reader, &mut out)?;
    Ok(out)
}

/// Expands a windowed payload into the first `size` slots of `dest`.
pub fn decode_windowed_into<T: WireScalar>(payload: &[u8], dest: &mut [T]) -> Result<usize> {
    let reader = WindowReader::<T>::new(payload)?;
    let size = reader.size();
    if dest.len() < size {
        return Err(DecodeError::IndexOutOfRange {
            index: size - 1,
            len: dest.len(),
        });
    }
    fill_windows(reader, &mut dest[..size])?;
    Ok(size)
}
