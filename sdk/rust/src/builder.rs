//! Slab writer
//!
//! Produces slab bytes in the exact layout the decoder reads. Used for
//! fixtures and for seeding localnet accounts.

use bytemuck::Zeroable;
use solana_sdk::pubkey::Pubkey;

use crate::bitmap::encode_bitmap;
use crate::constants::{SLAB_MAGIC, SLAB_VERSION};
use crate::error::Result;
use crate::layout::{RawAccount, RawOracleConfig, RawSlabHeader, SlabLayout, CONFIG_OFF};
use crate::types::{AccountKind, Position, SlabHeader};

fn pubkey_bytes(key: Option<Pubkey>) -> [u8; 32] {
    key.map(|k| k.to_bytes()).unwrap_or_default()
}

/// Builder for slab buffers
#[derive(Debug, Clone)]
pub struct SlabBuilder {
    layout: SlabLayout,
    header: RawSlabHeader,
    config: RawOracleConfig,
    accounts: Vec<(usize, RawAccount)>,
}

impl SlabBuilder {
    pub fn new(layout: SlabLayout) -> Self {
        Self {
            layout,
            header: RawSlabHeader {
                magic: SLAB_MAGIC.to_le(),
                version: SLAB_VERSION.to_le(),
                ..RawSlabHeader::zeroed()
            },
            config: RawOracleConfig::zeroed(),
            accounts: Vec::new(),
        }
    }

    pub fn admin(mut self, admin: Pubkey) -> Self {
        self.header.admin = admin.to_bytes();
        self
    }

    pub fn paused(mut self, paused: bool) -> Self {
        if paused {
            self.header.flags |= SlabHeader::FLAG_PAUSED;
        } else {
            self.header.flags &= !SlabHeader::FLAG_PAUSED;
        }
        self
    }

    /// Raw oracle fields; `None` writes the all-zero authority.
    pub fn oracle(
        mut self,
        authority: Option<Pubkey>,
        price_e6: u64,
        timestamp: u64,
        max_staleness_slots: u64,
    ) -> Self {
        self.config = RawOracleConfig {
            oracle_authority: pubkey_bytes(authority),
            authority_price_e6: price_e6.to_le(),
            authority_timestamp: timestamp.to_le(),
            max_staleness_slots: max_staleness_slots.to_le(),
            ..RawOracleConfig::zeroed()
        };
        self
    }

    pub fn user(self, index: usize, position: Position) -> Self {
        self.record(index, raw_account(AccountKind::User, &position))
    }

    pub fn lp(
        self,
        index: usize,
        position: Position,
        matcher_program: Option<Pubkey>,
        matcher_context: Option<Pubkey>,
    ) -> Self {
        let mut raw = raw_account(AccountKind::Lp, &position);
        raw.matcher_program = pubkey_bytes(matcher_program);
        raw.matcher_context = pubkey_bytes(matcher_context);
        self.record(index, raw)
    }

    fn record(mut self, index: usize, raw: RawAccount) -> Self {
        self.accounts.retain(|(i, _)| *i != index);
        self.accounts.push((index, raw));
        self
    }

    /// Write the slab. Fails with `IndexOutOfRange` for a record past capacity.
    pub fn build(self) -> Result<Vec<u8>> {
        let layout = self.layout;
        let mut data = vec![0u8; layout.slab_len];

        data[..CONFIG_OFF].copy_from_slice(bytemuck::bytes_of(&self.header));
        data[CONFIG_OFF..layout.bitmap_off].copy_from_slice(bytemuck::bytes_of(&self.config));

        let bitmap = encode_bitmap(layout.capacity, self.accounts.iter().map(|(i, _)| *i))?;
        data[layout.bitmap_off..layout.accounts_off].copy_from_slice(&bitmap);

        for (index, raw) in &self.accounts {
            let off = layout.record_offset(*index)?;
            let bytes = bytemuck::bytes_of(raw);
            data[off..off + bytes.len()].copy_from_slice(bytes);
        }
        Ok(data)
    }
}

fn raw_account(kind: AccountKind, position: &Position) -> RawAccount {
    RawAccount {
        kind: kind as u8,
        account_id: position.account_id.to_le(),
        owner: position.owner.to_bytes(),
        position_size: position.position_size.to_le(),
        entry_price_e6: position.entry_price_e6.to_le(),
        capital: position.capital.to_le(),
        pnl: position.pnl.to_le(),
        funding_index: position.funding_index.to_le(),
        last_fee_slot: position.last_fee_slot.to_le(),
        ..RawAccount::zeroed()
    }
}
