//! Slab memory layout
//!
//! Layout: Header (72B) + OracleConfig (64B) + used bitmap + account records.
//! The `Raw*` structs mirror the on-chain bytes exactly. Every multi-byte
//! integer in them holds little-endian bytes and must go through
//! `from_le`/`to_le` before use.

use bytemuck::{Pod, Zeroable};
use core::mem::{offset_of, size_of};

use crate::bitmap::bitmap_len;
use crate::error::{PercolatorSdkError, Result};

// ============================================================================
// RAW RECORDS
// ============================================================================

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct RawSlabHeader {
    pub magic: u64,
    pub version: u32,
    pub bump: u8,
    /// bit 0: resolved, bit 1: paused
    pub flags: u8,
    pub _padding: [u8; 2],
    pub admin: [u8; 32],
    pub _reserved: [u8; 24],
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct RawOracleConfig {
    /// All zeros = no authority
    pub oracle_authority: [u8; 32],
    pub authority_price_e6: u64,
    pub authority_timestamp: u64,
    pub max_staleness_slots: u64,
    pub _reserved: [u8; 8],
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct RawAccount {
    pub kind: u8,
    pub _padding: [u8; 7],
    pub account_id: u64,
    pub owner: [u8; 32],
    pub position_size: i64,
    pub entry_price_e6: u64,
    /// E9 fixed point
    pub capital: i64,
    /// E9 fixed point
    pub pnl: i64,
    pub funding_index: i64,
    /// LP only; zero for users
    pub matcher_program: [u8; 32],
    /// LP only; zero for users
    pub matcher_context: [u8; 32],
    pub last_fee_slot: u64,
}

pub const HEADER_LEN: usize = size_of::<RawSlabHeader>();
pub const CONFIG_OFF: usize = HEADER_LEN;
pub const CONFIG_LEN: usize = size_of::<RawOracleConfig>();
pub const BITMAP_OFF: usize = CONFIG_OFF + CONFIG_LEN;
pub const ACCOUNT_LEN: usize = size_of::<RawAccount>();

/// Production account capacity
pub const MAX_ACCOUNTS: usize = 4096;

const _: [(); 72] = [(); HEADER_LEN];
const _: [(); 64] = [(); CONFIG_LEN];
const _: [(); 160] = [(); ACCOUNT_LEN];
const _: [(); 48] = [(); offset_of!(RawAccount, position_size)];
const _: [(); 56] = [(); offset_of!(RawAccount, entry_price_e6)];
const _: [(); 64] = [(); offset_of!(RawAccount, capital)];
const _: [(); 72] = [(); offset_of!(RawAccount, pnl)];
const _: [(); 104] = [(); CONFIG_OFF + offset_of!(RawOracleConfig, authority_price_e6)];

// ============================================================================
// LAYOUT
// ============================================================================

/// Byte layout of a slab with a given account capacity.
///
/// All offsets are computed in `const` context from the capacity, so a
/// layout is built once and never recomputed per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlabLayout {
    pub capacity: usize,
    pub bitmap_off: usize,
    pub bitmap_len: usize,
    pub accounts_off: usize,
    pub slab_len: usize,
}

impl SlabLayout {
    /// Layout of deployed slabs
    pub const PRODUCTION: SlabLayout = SlabLayout::new(MAX_ACCOUNTS);

    pub const fn new(capacity: usize) -> Self {
        let bitmap_len = bitmap_len(capacity);
        let accounts_off = BITMAP_OFF + bitmap_len;
        Self {
            capacity,
            bitmap_off: BITMAP_OFF,
            bitmap_len,
            accounts_off,
            slab_len: accounts_off + capacity * ACCOUNT_LEN,
        }
    }

    /// Minimum length for header and config to be readable
    pub const fn min_header_len(&self) -> usize {
        CONFIG_OFF + CONFIG_LEN
    }

    /// Byte offset of the record for `index`
    pub fn record_offset(&self, index: usize) -> Result<usize> {
        if index >= self.capacity {
            return Err(PercolatorSdkError::IndexOutOfRange {
                index,
                capacity: self.capacity,
            });
        }
        Ok(self.accounts_off + index * ACCOUNT_LEN)
    }

    pub fn bitmap<'a>(&self, data: &'a [u8]) -> Result<&'a [u8]> {
        region(data, self.bitmap_off, self.bitmap_len)
    }
}

impl Default for SlabLayout {
    fn default() -> Self {
        Self::PRODUCTION
    }
}

/// Borrow `len` bytes at `offset`, or fail with `TruncatedBuffer`.
pub(crate) fn region(data: &[u8], offset: usize, len: usize) -> Result<&[u8]> {
    let end = offset + len;
    data.get(offset..end)
        .ok_or(PercolatorSdkError::TruncatedBuffer {
            needed: end,
            actual: data.len(),
        })
}

/// Copy a `Pod` record out of `data` at `offset`.
pub(crate) fn read_raw<T: Pod>(data: &[u8], offset: usize) -> Result<T> {
    region(data, offset, size_of::<T>()).map(bytemuck::pod_read_unaligned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_layout() {
        let layout = SlabLayout::PRODUCTION;
        assert_eq!(layout.bitmap_off, 136);
        assert_eq!(layout.bitmap_len, 512);
        assert_eq!(layout.accounts_off, 648);
        assert_eq!(layout.slab_len, 648 + 4096 * 160);
    }

    #[test]
    fn test_record_offset_monotonic() {
        let layout = SlabLayout::new(64);
        let mut prev = layout.record_offset(0).unwrap();
        assert!(prev >= layout.bitmap_off + layout.bitmap_len);
        for i in 1..64 {
            let off = layout.record_offset(i).unwrap();
            assert_eq!(off - prev, ACCOUNT_LEN);
            prev = off;
        }
        assert_eq!(prev + ACCOUNT_LEN, layout.slab_len);
    }

    #[test]
    fn test_record_offset_out_of_range() {
        let layout = SlabLayout::new(8);
        assert!(matches!(
            layout.record_offset(8),
            Err(PercolatorSdkError::IndexOutOfRange { index: 8, capacity: 8 })
        ));
    }

    #[test]
    fn test_odd_capacity_rounds_bitmap_up() {
        let layout = SlabLayout::new(9);
        assert_eq!(layout.bitmap_len, 2);
        assert_eq!(layout.accounts_off, BITMAP_OFF + 2);
    }

    #[test]
    fn test_region_truncated() {
        let data = [0u8; 10];
        assert!(matches!(
            region(&data, 8, 4),
            Err(PercolatorSdkError::TruncatedBuffer { needed: 12, actual: 10 })
        ));
    }
}
