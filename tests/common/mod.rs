//! Common test utilities for integration tests
//!
//! Slab fixtures built with `SlabBuilder` so every test reads the same
//! byte layout the decoder expects.

#![allow(dead_code)]

use percolator_sdk::{Position, SlabBuilder, SlabLayout};
use solana_sdk::pubkey::Pubkey;

/// Small layout used by most fixtures
pub const TEST_LAYOUT: SlabLayout = SlabLayout::new(8);

/// Position with the given size and entry price, everything else zero
pub fn position(position_size: i64, entry_price_e6: u64) -> Position {
    Position {
        position_size,
        entry_price_e6,
        ..Default::default()
    }
}

/// Slab with one LP at index 1 and two users at 0 and 5
pub fn mixed_slab(layout: SlabLayout) -> Vec<u8> {
    SlabBuilder::new(layout)
        .oracle(Some(Pubkey::new_unique()), 2_500_000, 1_700_000_000, 150)
        .user(0, Position {
            owner: Pubkey::new_unique(),
            capital: 5_000_000_000,
            ..position(1_000, 2_400_000)
        })
        .lp(
            1,
            Position {
                owner: Pubkey::new_unique(),
                capital: 100_000_000_000,
                pnl: -1_250_000_000,
                ..position(-500_000, 2_500_000)
            },
            Some(Pubkey::new_unique()),
            Some(Pubkey::new_unique()),
        )
        .user(5, position(-25, 2_600_000))
        .build()
        .unwrap()
}
