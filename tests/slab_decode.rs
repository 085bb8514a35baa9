//! Slab decoding integration tests
//!
//! Run with: cargo test --test slab_decode

mod common;

use common::*;
use percolator_sdk::{
    parse_account, parse_config, parse_slab, parse_used_indices, record_offset, Account,
    AccountKind, OracleConfig, PercolatorSdkError, SlabBuilder, SlabLayout,
};
use solana_sdk::pubkey::Pubkey;

// ============================================================================
// ORACLE CONFIG
// ============================================================================

#[test]
fn test_zero_authority_hides_dependent_fields() {
    let data = SlabBuilder::new(TEST_LAYOUT)
        .oracle(None, 2_500_000, 1_700_000_000, 150)
        .build()
        .unwrap();
    let config = TEST_LAYOUT.parse_config(&data).unwrap();
    assert_eq!(config, OracleConfig::default());
    assert!(config.oracle_authority.is_none());
    assert!(config.authority_price_e6.is_none());
    assert!(config.authority_timestamp.is_none());
    assert!(config.max_staleness_slots.is_none());
}

#[test]
fn test_config_with_authority() {
    let authority = Pubkey::new_unique();
    let data = SlabBuilder::new(SlabLayout::PRODUCTION)
        .oracle(Some(authority), 2_500_000, 1_700_000_000, 150)
        .build()
        .unwrap();
    let config = parse_config(&data).unwrap();
    assert_eq!(config.oracle_authority, Some(authority));
    assert_eq!(config.authority_price_e6, Some(2_500_000));
    assert_eq!(config.authority_timestamp, Some(1_700_000_000));
    assert_eq!(config.max_staleness_slots, Some(150));
}

#[test]
fn test_zero_staleness_is_a_bound() {
    let authority = Pubkey::new_unique();
    let data = SlabBuilder::new(TEST_LAYOUT)
        .oracle(Some(authority), 2_500_000, 0, 0)
        .build()
        .unwrap();
    let config = TEST_LAYOUT.parse_config(&data).unwrap();
    assert_eq!(config.oracle_authority, Some(authority));
    assert_eq!(config.authority_price_e6, Some(2_500_000));
    assert_eq!(config.authority_timestamp, Some(0));
    assert_eq!(config.max_staleness_slots, Some(0));
}

#[test]
fn test_short_buffer_is_truncated_not_zeroed() {
    for len in [0, 1, 71, 72, 135] {
        let data = vec![0u8; len];
        match parse_config(&data) {
            Err(PercolatorSdkError::TruncatedBuffer { needed, actual }) => {
                assert_eq!(needed, SlabLayout::PRODUCTION.min_header_len());
                assert_eq!(actual, len);
            }
            other => panic!("expected TruncatedBuffer for len {}, got {:?}", len, other),
        }
    }
}

// ============================================================================
// BITMAP AND RECORDS
// ============================================================================

#[test]
fn test_used_indices_from_bitmap_byte() {
    let mut data = SlabBuilder::new(TEST_LAYOUT).build().unwrap();
    data[TEST_LAYOUT.bitmap_off] = 0b0000_0101;
    let indices: Vec<usize> = TEST_LAYOUT.parse_used_indices(&data).unwrap().collect();
    assert_eq!(indices, vec![0, 2]);
}

#[test]
fn test_empty_bitmap_means_no_accounts() {
    let data = SlabBuilder::new(TEST_LAYOUT).build().unwrap();
    assert_eq!(TEST_LAYOUT.parse_used_indices(&data).unwrap().count(), 0);
    for index in 0..TEST_LAYOUT.capacity {
        assert_eq!(TEST_LAYOUT.parse_account(&data, index).unwrap(), None);
    }
}

#[test]
fn test_lp_record_decodes() {
    let data = SlabBuilder::new(SlabLayout::PRODUCTION)
        .lp(42, position(-500_000, 2_500_000), None, None)
        .build()
        .unwrap();
    let account = parse_account(&data, 42).unwrap().unwrap();
    assert_eq!(account.kind(), AccountKind::Lp);
    assert_eq!(account.position().position_size, -500_000);
    assert_eq!(account.position().entry_price_e6, 2_500_000);
    match account {
        Account::Lp(lp) => {
            assert_eq!(lp.matcher_program, None);
            assert_eq!(lp.matcher_context, None);
        }
        Account::User(_) => panic!("expected LP"),
    }
}

#[test]
fn test_mixed_slab_snapshot() {
    let data = mixed_slab(TEST_LAYOUT);
    let snapshot = TEST_LAYOUT.parse_slab(&data).unwrap();

    let kinds: Vec<(usize, AccountKind)> = snapshot
        .accounts
        .iter()
        .map(|(i, a)| (*i, a.kind()))
        .collect();
    assert_eq!(
        kinds,
        vec![
            (0, AccountKind::User),
            (1, AccountKind::Lp),
            (5, AccountKind::User)
        ]
    );

    let lp = snapshot.accounts[1].1.position();
    assert_eq!(lp.capital, 100_000_000_000);
    assert_eq!(lp.pnl, -1_250_000_000);
    assert!(lp.is_short());
    assert!(snapshot.accounts[0].1.position().is_long());
    assert!(snapshot.config.oracle_authority.is_some());
}

#[test]
fn test_production_slab() {
    let data = mixed_slab(SlabLayout::PRODUCTION);
    assert_eq!(data.len(), SlabLayout::PRODUCTION.slab_len);

    let indices: Vec<usize> = parse_used_indices(&data).unwrap().collect();
    assert_eq!(indices, vec![0, 1, 5]);
    let snapshot = parse_slab(&data).unwrap();
    assert_eq!(snapshot.accounts.len(), 3);
    assert!(!snapshot.header.paused);
}

#[test]
fn test_unknown_kind_is_error() {
    let mut data = mixed_slab(TEST_LAYOUT);
    let off = TEST_LAYOUT.record_offset(5).unwrap();
    data[off] = 7;
    assert!(matches!(
        TEST_LAYOUT.parse_account(&data, 5),
        Err(PercolatorSdkError::UnknownAccountKind { index: 5, tag: 7 })
    ));
    assert!(TEST_LAYOUT.parse_slab(&data).is_err());
}

#[test]
fn test_record_offset_bounds() {
    let last = SlabLayout::PRODUCTION.capacity - 1;
    assert_eq!(record_offset(0).unwrap(), SlabLayout::PRODUCTION.accounts_off);
    assert!(record_offset(last).is_ok());
    assert!(matches!(
        record_offset(last + 1),
        Err(PercolatorSdkError::IndexOutOfRange { .. })
    ));
}

#[test]
fn test_decoding_does_not_mutate_input() {
    let data = mixed_slab(TEST_LAYOUT);
    let before = data.clone();
    let _ = TEST_LAYOUT.parse_slab(&data).unwrap();
    assert_eq!(data, before);
}
