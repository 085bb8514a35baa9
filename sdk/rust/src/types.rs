//! Decoded slab types
//!
//! Everything here is an owned copy of slab bytes. All-zero addresses on
//! the wire become `None` in this module and nowhere else.

use solana_sdk::pubkey::Pubkey;

use crate::constants::*;
use crate::error::{PercolatorSdkError, Result};
use crate::layout::{RawAccount, RawOracleConfig, RawSlabHeader};

// ============================================================================
// SENTINELS
// ============================================================================

/// All-zero address means "unset".
pub(crate) fn optional_pubkey(bytes: [u8; 32]) -> Option<Pubkey> {
    (bytes != [0u8; 32]).then(|| Pubkey::new_from_array(bytes))
}

// ============================================================================
// HEADER
// ============================================================================

/// Slab header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlabHeader {
    pub version: u32,
    pub bump: u8,
    pub resolved: bool,
    pub paused: bool,
    pub admin: Option<Pubkey>,
}

impl SlabHeader {
    pub const FLAG_RESOLVED: u8 = 1 << 0;
    pub const FLAG_PAUSED: u8 = 1 << 1;

    pub(crate) fn from_raw(raw: &RawSlabHeader) -> Result<Self> {
        let magic = u64::from_le(raw.magic);
        if magic != SLAB_MAGIC {
            return Err(PercolatorSdkError::InvalidMagic { found: magic });
        }
        Ok(Self {
            version: u32::from_le(raw.version),
            bump: raw.bump,
            resolved: raw.flags & Self::FLAG_RESOLVED != 0,
            paused: raw.flags & Self::FLAG_PAUSED != 0,
            admin: optional_pubkey(raw.admin),
        })
    }
}

// ============================================================================
// ORACLE CONFIG
// ============================================================================

/// Oracle authority configuration.
///
/// When `oracle_authority` is `None` the three dependent fields are `None`
/// as well, whatever the raw bytes say.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OracleConfig {
    pub oracle_authority: Option<Pubkey>,
    /// Last pushed price (E6)
    pub authority_price_e6: Option<u64>,
    /// Slot/timestamp of the last push
    pub authority_timestamp: Option<u64>,
    /// Upper bound on oracle age in slots
    pub max_staleness_slots: Option<u64>,
}

impl OracleConfig {
    pub(crate) fn from_raw(raw: &RawOracleConfig) -> Self {
        match optional_pubkey(raw.oracle_authority) {
            None => Self::default(),
            Some(authority) => Self {
                oracle_authority: Some(authority),
                authority_price_e6: Some(u64::from_le(raw.authority_price_e6)),
                authority_timestamp: Some(u64::from_le(raw.authority_timestamp)),
                max_staleness_slots: Some(u64::from_le(raw.max_staleness_slots)),
            },
        }
    }
}

// ============================================================================
// ACCOUNTS
// ============================================================================

/// Account record discriminant
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountKind {
    User = 0,
    Lp = 1,
}

impl AccountKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountKind::User => "USER",
            AccountKind::Lp => "LP",
        }
    }
}

impl TryFrom<u8> for AccountKind {
    type Error = u8;

    fn try_from(tag: u8) -> std::result::Result<Self, u8> {
        match tag {
            0 => Ok(AccountKind::User),
            1 => Ok(AccountKind::Lp),
            other => Err(other),
        }
    }
}

impl std::fmt::Display for AccountKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields common to user and LP records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Position {
    pub account_id: u64,
    pub owner: Pubkey,
    /// Signed quantity (positive = long, negative = short)
    pub position_size: i64,
    /// Entry price (E6)
    pub entry_price_e6: u64,
    /// Capital (E9)
    pub capital: i64,
    /// Realized PnL (E9)
    pub pnl: i64,
    pub funding_index: i64,
    pub last_fee_slot: u64,
}

impl Position {
    fn from_raw(raw: &RawAccount) -> Self {
        Self {
            account_id: u64::from_le(raw.account_id),
            owner: Pubkey::new_from_array(raw.owner),
            position_size: i64::from_le(raw.position_size),
            entry_price_e6: u64::from_le(raw.entry_price_e6),
            capital: i64::from_le(raw.capital),
            pnl: i64::from_le(raw.pnl),
            funding_index: i64::from_le(raw.funding_index),
            last_fee_slot: u64::from_le(raw.last_fee_slot),
        }
    }

    pub fn is_long(&self) -> bool {
        self.position_size > 0
    }

    pub fn is_short(&self) -> bool {
        self.position_size < 0
    }
}

/// Liquidity provider record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LpAccount {
    pub position: Position,
    /// Matching engine program
    pub matcher_program: Option<Pubkey>,
    /// Matching engine context account
    pub matcher_context: Option<Pubkey>,
}

/// Decoded account record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Account {
    Lp(LpAccount),
    User(Position),
}

impl Account {
    /// Build an account from its raw record. `index` is only used for errors.
    pub fn decode(index: usize, raw: &RawAccount) -> Result<Self> {
        let kind = AccountKind::try_from(raw.kind)
            .map_err(|tag| PercolatorSdkError::UnknownAccountKind { index, tag })?;
        let position = Position::from_raw(raw);
        Ok(match kind {
            AccountKind::User => Account::User(position),
            AccountKind::Lp => Account::Lp(LpAccount {
                position,
                matcher_program: optional_pubkey(raw.matcher_program),
                matcher_context: optional_pubkey(raw.matcher_context),
            }),
        })
    }

    pub fn kind(&self) -> AccountKind {
        match self {
            Account::Lp(_) => AccountKind::Lp,
            Account::User(_) => AccountKind::User,
        }
    }

    pub fn position(&self) -> &Position {
        match self {
            Account::Lp(lp) => &lp.position,
            Account::User(position) => position,
        }
    }

    pub fn is_lp(&self) -> bool {
        matches!(self, Account::Lp(_))
    }
}

/// Full decode of a slab
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlabSnapshot {
    pub header: SlabHeader,
    pub config: OracleConfig,
    /// Occupied records as `(index, account)`, ascending by index
    pub accounts: Vec<(usize, Account)>,
}
