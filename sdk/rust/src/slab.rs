//! Slab decoding
//!
//! Free functions decode against [`SlabLayout::PRODUCTION`]. The same
//! operations are available as `SlabLayout` methods for other capacities.
//! Nothing here mutates or keeps a borrow of the input buffer.

use log::{debug, trace};

use crate::bitmap::{decode_bitmap, is_set, UsedIndices};
use crate::error::Result;
use crate::layout::{read_raw, RawAccount, RawOracleConfig, RawSlabHeader, SlabLayout, CONFIG_OFF};
use crate::types::{Account, OracleConfig, SlabHeader, SlabSnapshot};

impl SlabLayout {
    /// Decode and validate the slab header.
    pub fn parse_header(&self, data: &[u8]) -> Result<SlabHeader> {
        SlabHeader::from_raw(&read_raw::<RawSlabHeader>(data, 0)?)
    }

    /// Decode the oracle configuration.
    pub fn parse_config(&self, data: &[u8]) -> Result<OracleConfig> {
        let raw = read_raw::<RawOracleConfig>(data, CONFIG_OFF)?;
        Ok(OracleConfig::from_raw(&raw))
    }

    /// Ascending indices of occupied records.
    pub fn parse_used_indices<'a>(&self, data: &'a [u8]) -> Result<UsedIndices<'a>> {
        decode_bitmap(self.bitmap(data)?, self.capacity)
    }

    /// Whether the record at `index` is occupied.
    pub fn is_used(&self, data: &[u8], index: usize) -> Result<bool> {
        self.record_offset(index)?;
        Ok(is_set(self.bitmap(data)?, index))
    }

    /// Decode the record at `index`, or `None` if the slot is free.
    pub fn parse_account(&self, data: &[u8], index: usize) -> Result<Option<Account>> {
        if !self.is_used(data, index)? {
            trace!("slot {} is free", index);
            return Ok(None);
        }
        let raw = read_raw::<RawAccount>(data, self.record_offset(index)?)?;
        Account::decode(index, &raw).map(Some)
    }

    /// Decode every occupied record, ascending by index.
    pub fn parse_accounts(&self, data: &[u8]) -> Result<Vec<(usize, Account)>> {
        let mut accounts = Vec::new();
        for index in self.parse_used_indices(data)? {
            if let Some(account) = self.parse_account(data, index)? {
                accounts.push((index, account));
            }
        }
        Ok(accounts)
    }

    /// Decode header, config and all occupied records.
    pub fn parse_slab(&self, data: &[u8]) -> Result<SlabSnapshot> {
        let header = self.parse_header(data)?;
        let config = self.parse_config(data)?;
        let accounts = self.parse_accounts(data)?;
        debug!(
            "decoded slab v{}: {} of {} slots used",
            header.version,
            accounts.len(),
            self.capacity
        );
        Ok(SlabSnapshot {
            header,
            config,
            accounts,
        })
    }
}

pub fn parse_header(data: &[u8]) -> Result<SlabHeader> {
    SlabLayout::PRODUCTION.parse_header(data)
}

pub fn parse_config(data: &[u8]) -> Result<OracleConfig> {
    SlabLayout::PRODUCTION.parse_config(data)
}

pub fn parse_used_indices(data: &[u8]) -> Result<UsedIndices<'_>> {
    SlabLayout::PRODUCTION.parse_used_indices(data)
}

pub fn record_offset(index: usize) -> Result<usize> {
    SlabLayout::PRODUCTION.record_offset(index)
}

pub fn parse_account(data: &[u8], index: usize) -> Result<Option<Account>> {
    SlabLayout::PRODUCTION.parse_account(data, index)
}

pub fn parse_slab(data: &[u8]) -> Result<SlabSnapshot> {
    SlabLayout::PRODUCTION.parse_slab(data)
}
