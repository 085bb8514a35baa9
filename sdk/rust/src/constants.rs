//! Protocol constants and instruction tags

// ============================================================================
// SLAB IDENTIFICATION
// ============================================================================

/// Slab magic ("PERCOLAT" as little-endian u64)
pub const SLAB_MAGIC: u64 = 0x504552434f4c4154;

/// Slab layout version this SDK decodes
pub const SLAB_VERSION: u32 = 1;

// ============================================================================
// SCALING FACTORS
// ============================================================================

/// Decimal places of E6 prices
pub const PRICE_DECIMALS: u32 = 6;

/// Decimal places of E9 capital and PnL
pub const CAPITAL_DECIMALS: u32 = 9;

/// Places shown when displaying capital and PnL
pub const CAPITAL_DISPLAY_PLACES: u32 = 6;

// ============================================================================
// INSTRUCTION DISCRIMINATORS
// ============================================================================

/// Slab program instruction tags
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlabInstruction {
    KeeperCrank = 5,
    SetOracleAuthority = 16,
    PushOraclePrice = 17,
}

impl TryFrom<u8> for SlabInstruction {
    type Error = crate::error::PercolatorSdkError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            5 => Ok(SlabInstruction::KeeperCrank),
            16 => Ok(SlabInstruction::SetOracleAuthority),
            17 => Ok(SlabInstruction::PushOraclePrice),
            _ => Err(crate::error::PercolatorSdkError::UnknownInstruction { tag }),
        }
    }
}

// ============================================================================
// SENTINELS
// ============================================================================

/// Caller index meaning "no caller account" (permissionless crank)
pub const CRANK_NO_CALLER: u16 = u16::MAX;
