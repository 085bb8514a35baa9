//! Instruction builders
//!
//! Payloads are `[tag u8][borsh args]`. Borsh writes integers little-endian
//! and `bool` as a single 0x00/0x01 byte, which is exactly the on-chain
//! instruction layout.

use borsh::{BorshDeserialize, BorshSerialize};
use log::debug;
use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
    sysvar,
};

use crate::constants::*;
use crate::error::{PercolatorSdkError, Result};
use crate::fixed::parse_signed;

// ============================================================================
// ARGUMENTS
// ============================================================================

/// Who is cranking
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CrankCaller {
    /// No caller account required
    #[default]
    Permissionless,
    /// Account index of the caller in the slab
    Index(u16),
}

impl CrankCaller {
    pub fn from_raw(raw: u16) -> Self {
        match raw {
            CRANK_NO_CALLER => CrankCaller::Permissionless,
            idx => CrankCaller::Index(idx),
        }
    }

    pub fn to_raw(self) -> u16 {
        match self {
            CrankCaller::Permissionless => CRANK_NO_CALLER,
            CrankCaller::Index(idx) => idx,
        }
    }

    /// Caller from a user-supplied index. 65535 is accepted and means permissionless.
    pub fn from_index(index: u64) -> Result<Self> {
        u16::try_from(index)
            .map(Self::from_raw)
            .map_err(|_| PercolatorSdkError::ValueOutOfRange {
                value: index.to_string(),
                target: "u16",
            })
    }
}

/// Keeper crank parameters as they arrive from the command line
#[derive(Debug, Clone, Default)]
pub struct KeeperCrankParams {
    pub caller: CrankCaller,
    /// Signed decimal integer, bps per slot
    pub funding_rate_bps_per_slot: String,
    pub allow_panic: bool,
}

/// Keeper crank wire arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct KeeperCrankArgs {
    pub caller_idx: u16,
    pub funding_rate_bps_per_slot: i64,
    pub allow_panic: bool,
}

impl KeeperCrankArgs {
    pub const LEN: usize = 2 + 8 + 1;

    pub fn caller(&self) -> CrankCaller {
        CrankCaller::from_raw(self.caller_idx)
    }
}

impl TryFrom<&KeeperCrankParams> for KeeperCrankArgs {
    type Error = PercolatorSdkError;

    fn try_from(params: &KeeperCrankParams) -> Result<Self> {
        Ok(Self {
            caller_idx: params.caller.to_raw(),
            funding_rate_bps_per_slot: parse_signed(&params.funding_rate_bps_per_slot, 0)?,
            allow_panic: params.allow_panic,
        })
    }
}

/// Push oracle price wire arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct PushOraclePriceArgs {
    pub price_e6: u64,
    pub timestamp: i64,
}

impl PushOraclePriceArgs {
    pub const LEN: usize = 8 + 8;
}

/// Set oracle authority wire arguments. All zeros disables the authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct SetOracleAuthorityArgs {
    pub new_authority: [u8; 32],
}

impl SetOracleAuthorityArgs {
    pub const LEN: usize = 32;

    pub fn new(new_authority: Option<Pubkey>) -> Self {
        Self {
            new_authority: new_authority.map(|k| k.to_bytes()).unwrap_or_default(),
        }
    }

    pub fn authority(&self) -> Option<Pubkey> {
        crate::types::optional_pubkey(self.new_authority)
    }
}

// ============================================================================
// ACCOUNT ROLES
// ============================================================================

/// Role of an account in an instruction's account list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountRole {
    Caller,
    Slab,
    Clock,
    Oracle,
    Authority,
    Admin,
}

/// Positional account expectation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountSpec {
    pub role: AccountRole,
    pub signer: bool,
    pub writable: bool,
}

impl AccountSpec {
    const fn new(role: AccountRole, signer: bool, writable: bool) -> Self {
        Self {
            role,
            signer,
            writable,
        }
    }
}

/// KeeperCrank accounts. Order is part of the wire contract.
pub const ACCOUNTS_KEEPER_CRANK: &[AccountSpec] = &[
    AccountSpec::new(AccountRole::Caller, true, false),
    AccountSpec::new(AccountRole::Slab, false, true),
    AccountSpec::new(AccountRole::Clock, false, false),
    AccountSpec::new(AccountRole::Oracle, false, false),
];

pub const ACCOUNTS_PUSH_ORACLE_PRICE: &[AccountSpec] = &[
    AccountSpec::new(AccountRole::Authority, true, false),
    AccountSpec::new(AccountRole::Slab, false, true),
];

pub const ACCOUNTS_SET_ORACLE_AUTHORITY: &[AccountSpec] = &[
    AccountSpec::new(AccountRole::Admin, true, false),
    AccountSpec::new(AccountRole::Slab, false, true),
];

/// Bind `keys` to `specs` by position.
pub fn build_account_metas(specs: &[AccountSpec], keys: &[Pubkey]) -> Result<Vec<AccountMeta>> {
    if specs.len() != keys.len() {
        return Err(PercolatorSdkError::InvalidInput(format!(
            "expected {} accounts, got {}",
            specs.len(),
            keys.len()
        )));
    }
    Ok(specs
        .iter()
        .zip(keys)
        .map(|(spec, key)| AccountMeta {
            pubkey: *key,
            is_signer: spec.signer,
            is_writable: spec.writable,
        })
        .collect())
}

// ============================================================================
// PAYLOAD CODEC
// ============================================================================

fn encode<T: BorshSerialize>(tag: SlabInstruction, args: &T) -> Result<Vec<u8>> {
    let mut data = vec![tag as u8];
    borsh::to_writer(&mut data, args)?;
    Ok(data)
}

fn decode<T: BorshDeserialize>(expected: SlabInstruction, len: usize, data: &[u8]) -> Result<T> {
    let (&tag, rest) = data
        .split_first()
        .ok_or(PercolatorSdkError::TruncatedBuffer {
            needed: 1 + len,
            actual: 0,
        })?;
    if SlabInstruction::try_from(tag)? != expected {
        return Err(PercolatorSdkError::UnknownInstruction { tag });
    }
    if rest.len() < len {
        return Err(PercolatorSdkError::TruncatedBuffer {
            needed: 1 + len,
            actual: data.len(),
        });
    }
    borsh::from_slice(rest).map_err(|e| PercolatorSdkError::InvalidInstructionData(e.to_string()))
}

/// Encode a keeper crank payload:
/// `[tag][caller_idx u16][funding_rate_bps_per_slot i64][allow_panic u8]`.
pub fn encode_keeper_crank(params: &KeeperCrankParams) -> Result<Vec<u8>> {
    encode_keeper_crank_args(&KeeperCrankArgs::try_from(params)?)
}

pub fn encode_keeper_crank_args(args: &KeeperCrankArgs) -> Result<Vec<u8>> {
    encode(SlabInstruction::KeeperCrank, args)
}

pub fn decode_keeper_crank(data: &[u8]) -> Result<KeeperCrankArgs> {
    decode(SlabInstruction::KeeperCrank, KeeperCrankArgs::LEN, data)
}

pub fn encode_push_oracle_price(price_e6: u64, timestamp: i64) -> Result<Vec<u8>> {
    encode(
        SlabInstruction::PushOraclePrice,
        &PushOraclePriceArgs {
            price_e6,
            timestamp,
        },
    )
}

pub fn decode_push_oracle_price(data: &[u8]) -> Result<PushOraclePriceArgs> {
    decode(SlabInstruction::PushOraclePrice, PushOraclePriceArgs::LEN, data)
}

pub fn encode_set_oracle_authority(new_authority: Option<Pubkey>) -> Result<Vec<u8>> {
    encode(
        SlabInstruction::SetOracleAuthority,
        &SetOracleAuthorityArgs::new(new_authority),
    )
}

pub fn decode_set_oracle_authority(data: &[u8]) -> Result<SetOracleAuthorityArgs> {
    decode(SlabInstruction::SetOracleAuthority, SetOracleAuthorityArgs::LEN, data)
}

// ============================================================================
// SLAB INSTRUCTIONS
// ============================================================================

/// Create keeper crank instruction
pub fn create_keeper_crank_instruction(
    program_id: &Pubkey,
    caller: &Pubkey,
    slab: &Pubkey,
    oracle: &Pubkey,
    params: &KeeperCrankParams,
) -> Result<Instruction> {
    let data = encode_keeper_crank(params)?;
    let accounts = build_account_metas(
        ACCOUNTS_KEEPER_CRANK,
        &[*caller, *slab, sysvar::clock::ID, *oracle],
    )?;
    debug!(
        "keeper crank: caller={:?} rate={} allow_panic={}",
        params.caller, params.funding_rate_bps_per_slot, params.allow_panic
    );
    Ok(Instruction::new_with_bytes(*program_id, &data, accounts))
}

/// Create push oracle price instruction
pub fn create_push_oracle_price_instruction(
    program_id: &Pubkey,
    authority: &Pubkey,
    slab: &Pubkey,
    price_e6: u64,
    timestamp: i64,
) -> Result<Instruction> {
    let data = encode_push_oracle_price(price_e6, timestamp)?;
    let accounts = build_account_metas(ACCOUNTS_PUSH_ORACLE_PRICE, &[*authority, *slab])?;
    Ok(Instruction::new_with_bytes(*program_id, &data, accounts))
}

/// Create set oracle authority instruction
pub fn create_set_oracle_authority_instruction(
    program_id: &Pubkey,
    admin: &Pubkey,
    slab: &Pubkey,
    new_authority: Option<Pubkey>,
) -> Result<Instruction> {
    let data = encode_set_oracle_authority(new_authority)?;
    let accounts = build_account_metas(ACCOUNTS_SET_ORACLE_AUTHORITY, &[*admin, *slab])?;
    Ok(Instruction::new_with_bytes(*program_id, &data, accounts))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(caller: CrankCaller, rate: &str, allow_panic: bool) -> KeeperCrankParams {
        KeeperCrankParams {
            caller,
            funding_rate_bps_per_slot: rate.to_string(),
            allow_panic,
        }
    }

    #[test]
    fn test_keeper_crank_layout() {
        let data = encode_keeper_crank(&params(CrankCaller::Index(3), "-150", true)).unwrap();

        let mut expected = vec![SlabInstruction::KeeperCrank as u8, 0x03, 0x00];
        expected.extend_from_slice(&(-150i64).to_le_bytes());
        expected.push(0x01);
        assert_eq!(data, expected);
        assert_eq!(data.len(), 1 + KeeperCrankArgs::LEN);
    }

    #[test]
    fn test_keeper_crank_permissionless_sentinel() {
        let data = encode_keeper_crank(&params(CrankCaller::Permissionless, "0", false)).unwrap();
        assert_eq!(&data[1..3], &[0xFF, 0xFF]);

        let args = decode_keeper_crank(&data).unwrap();
        assert_eq!(args.caller_idx, 65535);
        assert_eq!(args.caller(), CrankCaller::Permissionless);
        assert!(!args.allow_panic);
    }

    #[test]
    fn test_caller_from_index() {
        assert_eq!(CrankCaller::from_index(7).unwrap(), CrankCaller::Index(7));
        assert_eq!(CrankCaller::from_index(65535).unwrap(), CrankCaller::Permissionless);
        assert!(matches!(
            CrankCaller::from_index(65536),
            Err(PercolatorSdkError::ValueOutOfRange { target: "u16", .. })
        ));
    }

    #[test]
    fn test_keeper_crank_rate_out_of_range() {
        let err = encode_keeper_crank(&params(
            CrankCaller::Permissionless,
            "9223372036854775808",
            false,
        ))
        .unwrap_err();
        assert!(matches!(err, PercolatorSdkError::ValueOutOfRange { .. }));
    }

    #[test]
    fn test_keeper_crank_rate_extremes() {
        for (text, value) in [("-9223372036854775808", i64::MIN), ("9223372036854775807", i64::MAX)] {
            let data = encode_keeper_crank(&params(CrankCaller::Index(0), text, false)).unwrap();
            assert_eq!(decode_keeper_crank(&data).unwrap().funding_rate_bps_per_slot, value);
        }
    }

    #[test]
    fn test_decode_keeper_crank_rejects_bad_input() {
        let data = encode_keeper_crank(&params(CrankCaller::Index(1), "5", true)).unwrap();

        assert!(matches!(
            decode_keeper_crank(&data[..5]),
            Err(PercolatorSdkError::TruncatedBuffer { needed: 12, actual: 5 })
        ));
        assert!(matches!(
            decode_keeper_crank(&[]),
            Err(PercolatorSdkError::TruncatedBuffer { .. })
        ));

        let mut wrong_tag = data.clone();
        wrong_tag[0] = SlabInstruction::PushOraclePrice as u8;
        assert!(matches!(
            decode_keeper_crank(&wrong_tag),
            Err(PercolatorSdkError::UnknownInstruction { tag: 17 })
        ));

        let mut bad_flag = data.clone();
        bad_flag[11] = 2;
        assert!(matches!(
            decode_keeper_crank(&bad_flag),
            Err(PercolatorSdkError::InvalidInstructionData(_))
        ));

        let mut trailing = data;
        trailing.push(0);
        assert!(matches!(
            decode_keeper_crank(&trailing),
            Err(PercolatorSdkError::InvalidInstructionData(_))
        ));
    }

    #[test]
    fn test_keeper_crank_instruction_accounts() {
        let program_id = Pubkey::new_unique();
        let caller = Pubkey::new_unique();
        let slab = Pubkey::new_unique();
        let oracle = Pubkey::new_unique();

        let ix = create_keeper_crank_instruction(
            &program_id,
            &caller,
            &slab,
            &oracle,
            &params(CrankCaller::Permissionless, "1", false),
        )
        .unwrap();

        assert_eq!(ix.program_id, program_id);
        assert_eq!(ix.data[0], SlabInstruction::KeeperCrank as u8);
        let keys: Vec<Pubkey> = ix.accounts.iter().map(|m| m.pubkey).collect();
        assert_eq!(keys, vec![caller, slab, sysvar::clock::ID, oracle]);
        assert!(ix.accounts[0].is_signer);
        assert!(ix.accounts[1].is_writable);
        assert!(!ix.accounts[2].is_writable);
        assert!(!ix.accounts[3].is_signer);
    }

    #[test]
    fn test_build_account_metas_count_mismatch() {
        let err = build_account_metas(ACCOUNTS_KEEPER_CRANK, &[Pubkey::new_unique()]).unwrap_err();
        assert!(matches!(err, PercolatorSdkError::InvalidInput(_)));
    }

    #[test]
    fn test_push_oracle_price() {
        let data = encode_push_oracle_price(2_500_000, -1).unwrap();
        assert_eq!(data[0], 17);
        assert_eq!(&data[1..9], &2_500_000u64.to_le_bytes());
        assert_eq!(&data[9..17], &(-1i64).to_le_bytes());
        assert_eq!(
            decode_push_oracle_price(&data).unwrap(),
            PushOraclePriceArgs {
                price_e6: 2_500_000,
                timestamp: -1
            }
        );
    }

    #[test]
    fn test_set_oracle_authority_sentinel() {
        let data = encode_set_oracle_authority(None).unwrap();
        assert_eq!(data.len(), 33);
        assert!(data[1..].iter().all(|b| *b == 0));
        assert_eq!(decode_set_oracle_authority(&data).unwrap().authority(), None);

        let key = Pubkey::new_unique();
        let data = encode_set_oracle_authority(Some(key)).unwrap();
        assert_eq!(&data[1..], key.as_ref());
        assert_eq!(decode_set_oracle_authority(&data).unwrap().authority(), Some(key));
    }

    #[test]
    fn test_push_oracle_price_instruction_accounts() {
        let program_id = Pubkey::new_unique();
        let authority = Pubkey::new_unique();
        let slab = Pubkey::new_unique();

        let ix =
            create_push_oracle_price_instruction(&program_id, &authority, &slab, 2_500_000, 1_700)
                .unwrap();

        assert_eq!(ix.program_id, program_id);
        assert_eq!(decode_push_oracle_price(&ix.data).unwrap().timestamp, 1_700);
        let keys: Vec<Pubkey> = ix.accounts.iter().map(|m| m.pubkey).collect();
        assert_eq!(keys, vec![authority, slab]);
        assert!(ix.accounts[0].is_signer && !ix.accounts[0].is_writable);
        assert!(!ix.accounts[1].is_signer && ix.accounts[1].is_writable);
    }

    #[test]
    fn test_set_oracle_authority_instruction_accounts() {
        let program_id = Pubkey::new_unique();
        let admin = Pubkey::new_unique();
        let slab = Pubkey::new_unique();
        let new_authority = Pubkey::new_unique();

        let ix = create_set_oracle_authority_instruction(
            &program_id,
            &admin,
            &slab,
            Some(new_authority),
        )
        .unwrap();

        assert_eq!(ix.data[0], SlabInstruction::SetOracleAuthority as u8);
        assert_eq!(
            decode_set_oracle_authority(&ix.data).unwrap().authority(),
            Some(new_authority)
        );
        let keys: Vec<Pubkey> = ix.accounts.iter().map(|m| m.pubkey).collect();
        assert_eq!(keys, vec![admin, slab]);
        assert!(ix.accounts[0].is_signer && !ix.accounts[0].is_writable);
        assert!(!ix.accounts[1].is_signer && ix.accounts[1].is_writable);
    }
}
