//! Percolator RPC client
//!
//! Thin shell over `RpcClient`: fetch raw slab bytes, decode them, and
//! submit or simulate instructions built by [`crate::instructions`].

use log::{debug, info};
use solana_client::rpc_client::RpcClient;
use solana_sdk::{
    commitment_config::CommitmentConfig,
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    transaction::Transaction,
};
use std::sync::Arc;

use crate::error::{PercolatorSdkError, Result};
use crate::instructions::*;
use crate::layout::SlabLayout;
use crate::types::*;

/// Percolator client configuration
pub struct PercolatorClientConfig {
    /// RPC endpoint URL
    pub rpc_url: String,
    /// Slab program ID
    pub program_id: Pubkey,
    /// Commitment level
    pub commitment: CommitmentConfig,
    /// Layout of slabs owned by the program
    pub layout: SlabLayout,
}

impl Default for PercolatorClientConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://api.devnet.solana.com".to_string(),
            program_id: Pubkey::default(),
            commitment: CommitmentConfig::confirmed(),
            layout: SlabLayout::PRODUCTION,
        }
    }
}

/// Outcome of a simulated transaction
#[derive(Debug, Clone, Default)]
pub struct SimulationReport {
    pub logs: Vec<String>,
    pub units_consumed: Option<u64>,
}

/// Main client for interacting with Percolator slabs
pub struct PercolatorClient {
    rpc: Arc<RpcClient>,
    config: PercolatorClientConfig,
}

impl PercolatorClient {
    /// Create a new client with the given RPC URL and program ID
    pub fn new(rpc_url: &str, program_id: Pubkey) -> Result<Self> {
        let config = PercolatorClientConfig {
            rpc_url: rpc_url.to_string(),
            program_id,
            ..Default::default()
        };
        Self::with_config(config)
    }

    /// Create a new client with full configuration
    pub fn with_config(config: PercolatorClientConfig) -> Result<Self> {
        let rpc = RpcClient::new_with_commitment(config.rpc_url.clone(), config.commitment);
        Ok(Self {
            rpc: Arc::new(rpc),
            config,
        })
    }

    pub fn program_id(&self) -> &Pubkey {
        &self.config.program_id
    }

    pub fn layout(&self) -> &SlabLayout {
        &self.config.layout
    }

    // ==========================================================================
    // ACCOUNT FETCHING
    // ==========================================================================

    /// Fetch raw slab bytes
    pub fn fetch_slab(&self, slab: &Pubkey) -> Result<Vec<u8>> {
        let account = self
            .rpc
            .get_account_with_commitment(slab, self.config.commitment)
            .map_err(|e| PercolatorSdkError::RpcError(e.to_string()))?
            .value
            .ok_or_else(|| PercolatorSdkError::AccountNotFound(slab.to_string()))?;

        debug!("fetched slab {} ({} bytes)", slab, account.data.len());
        Ok(account.data)
    }

    /// Fetch and decode a slab
    pub fn get_slab(&self, slab: &Pubkey) -> Result<SlabSnapshot> {
        let data = self.fetch_slab(slab)?;
        self.config.layout.parse_slab(&data)
    }

    /// Fetch a slab and decode its oracle config
    pub fn get_oracle_config(&self, slab: &Pubkey) -> Result<OracleConfig> {
        let data = self.fetch_slab(slab)?;
        self.config.layout.parse_config(&data)
    }

    // ==========================================================================
    // TRANSACTION BUILDERS
    // ==========================================================================

    /// Build keeper crank instruction
    pub fn build_keeper_crank(
        &self,
        caller: &Pubkey,
        slab: &Pubkey,
        oracle: &Pubkey,
        params: &KeeperCrankParams,
    ) -> Result<Instruction> {
        create_keeper_crank_instruction(&self.config.program_id, caller, slab, oracle, params)
    }

    // ==========================================================================
    // TRANSACTION SENDING
    // ==========================================================================

    /// Send and confirm a transaction
    pub fn send_transaction(
        &self,
        instructions: &[Instruction],
        signers: &[&Keypair],
        payer: &Pubkey,
    ) -> Result<Signature> {
        let transaction = self.signed_transaction(instructions, signers, payer)?;

        let signature = self
            .rpc
            .send_and_confirm_transaction(&transaction)
            .map_err(|e| PercolatorSdkError::TransactionFailed(e.to_string()))?;

        info!("confirmed {}", signature);
        Ok(signature)
    }

    /// Simulate a transaction without submitting it
    pub fn simulate_transaction(
        &self,
        instructions: &[Instruction],
        signers: &[&Keypair],
        payer: &Pubkey,
    ) -> Result<SimulationReport> {
        let transaction = self.signed_transaction(instructions, signers, payer)?;

        let result = self
            .rpc
            .simulate_transaction(&transaction)
            .map_err(|e| PercolatorSdkError::RpcError(e.to_string()))?
            .value;

        let logs = result.logs.unwrap_or_default();
        if let Some(err) = result.err {
            return Err(PercolatorSdkError::TransactionFailed(format!(
                "{:?}\n{}",
                err,
                logs.join("\n")
            )));
        }

        Ok(SimulationReport {
            logs,
            units_consumed: result.units_consumed,
        })
    }

    fn signed_transaction(
        &self,
        instructions: &[Instruction],
        signers: &[&Keypair],
        payer: &Pubkey,
    ) -> Result<Transaction> {
        let recent_blockhash = self
            .rpc
            .get_latest_blockhash()
            .map_err(|e| PercolatorSdkError::RpcError(e.to_string()))?;

        let mut transaction = Transaction::new_with_payer(instructions, Some(payer));
        transaction
            .try_sign(signers, recent_blockhash)
            .map_err(|e| PercolatorSdkError::TransactionFailed(e.to_string()))?;
        Ok(transaction)
    }
}
