//! Occupancy bitmap codec
//!
//! One bit per account slot, least-significant bit first within each byte.
//! A set bit marks the slot as in use.

use crate::error::{PercolatorSdkError, Result};

/// Number of bitmap bytes needed for `capacity` slots.
pub const fn bitmap_len(capacity: usize) -> usize {
    capacity.div_ceil(8)
}

/// Returns whether bit `index` is set. Indices past the end read as clear.
pub fn is_set(bytes: &[u8], index: usize) -> bool {
    bytes
        .get(index / 8)
        .is_some_and(|byte| (byte >> (index % 8)) & 1 == 1)
}

/// Lazily decode the set bits of `bytes` as ascending slot indices below `capacity`.
///
/// The returned iterator is `Clone`; clone it to walk the set again.
pub fn decode_bitmap(bytes: &[u8], capacity: usize) -> Result<UsedIndices<'_>> {
    let needed = bitmap_len(capacity);
    if bytes.len() < needed {
        return Err(PercolatorSdkError::TruncatedBuffer {
            needed,
            actual: bytes.len(),
        });
    }
    let bytes = &bytes[..needed];
    Ok(UsedIndices {
        bytes,
        capacity,
        byte_idx: 0,
        pending: bytes.first().copied().unwrap_or(0),
    })
}

/// Encode a set of slot indices as a bitmap of `bitmap_len(capacity)` bytes.
///
/// Duplicate indices are harmless.
pub fn encode_bitmap<I>(capacity: usize, indices: I) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = usize>,
{
    let mut bytes = vec![0u8; bitmap_len(capacity)];
    for index in indices {
        if index >= capacity {
            return Err(PercolatorSdkError::IndexOutOfRange { index, capacity });
        }
        bytes[index / 8] |= 1 << (index % 8);
    }
    Ok(bytes)
}

/// Iterator over occupied slot indices
#[derive(Debug, Clone)]
pub struct UsedIndices<'a> {
    bytes: &'a [u8],
    capacity: usize,
    byte_idx: usize,
    /// Unvisited bits of `bytes[byte_idx]`
    pending: u8,
}

impl Iterator for UsedIndices<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        loop {
            if self.pending != 0 {
                let bit = self.pending.trailing_zeros() as usize;
                self.pending &= self.pending - 1;
                let index = self.byte_idx * 8 + bit;
                if index >= self.capacity {
                    // Stray bits past capacity in the final byte.
                    self.pending = 0;
                    continue;
                }
                return Some(index);
            }

            self.byte_idx += 1;
            self.pending = *self.bytes.get(self.byte_idx)?;
        }
    }
}
