//! CLI Command Handlers

use anyhow::{anyhow, Result};
use console::style;
use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use solana_sdk::{
    pubkey::Pubkey,
    signature::{read_keypair_file, Keypair},
    signer::Signer,
};
use std::str::FromStr;
use std::time::Duration;

use percolator_sdk::{
    decode_keeper_crank, AccountKind, CrankCaller, KeeperCrankParams, PercolatorClient,
};

use crate::config::{Config, OutputFormat, Settings};
use crate::output::*;
use crate::{ConfigCommands, SlabCommands};

/// Arguments of the `keeper-crank` command
pub struct KeeperCrankOptions {
    pub slab: String,
    pub oracle: String,
    pub caller_idx: Option<u64>,
    pub funding_rate_bps_per_slot: String,
    pub allow_panic: bool,
    pub simulate: bool,
    pub yes: bool,
}

impl KeeperCrankOptions {
    fn params(&self) -> Result<KeeperCrankParams> {
        let caller = match self.caller_idx {
            Some(idx) => CrankCaller::from_index(idx)?,
            None => CrankCaller::Permissionless,
        };
        Ok(KeeperCrankParams {
            caller,
            funding_rate_bps_per_slot: self.funding_rate_bps_per_slot.clone(),
            allow_panic: self.allow_panic,
        })
    }
}

// ============================================================================
// HELPERS
// ============================================================================

fn get_keypair(keypair_path: Option<&str>) -> Result<Keypair> {
    let path = keypair_path
        .ok_or_else(|| anyhow!("No keypair specified. Use --keypair or set KEYPAIR_PATH"))?;

    read_keypair_file(path).map_err(|e| anyhow!("Failed to read keypair: {}", e))
}

fn spinner(msg: &str, format: OutputFormat) -> ProgressBar {
    if format == OutputFormat::Json {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(template) = ProgressStyle::default_spinner()
        .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
        .template("{spinner:.blue} {msg}")
    {
        pb.set_style(template);
    }
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn parse_pubkey(s: &str) -> Result<Pubkey> {
    Pubkey::from_str(s).map_err(|e| anyhow!("Invalid pubkey: {}", e))
}

// ============================================================================
// KEEPER COMMANDS
// ============================================================================

pub async fn handle_keeper_crank(settings: &Settings, options: KeeperCrankOptions) -> Result<()> {
    let slab = parse_pubkey(&options.slab)?;
    let oracle = parse_pubkey(&options.oracle)?;
    let params = options.params()?;
    let program_id = settings.require_program_id()?;
    let keypair = get_keypair(settings.keypair_path.as_deref())?;

    let client = PercolatorClient::new(&settings.rpc_url, program_id)?;
    let ix = client.build_keeper_crank(&keypair.pubkey(), &slab, &oracle, &params)?;
    let args = decode_keeper_crank(&ix.data)?;
    debug!("keeper crank data: {:02x?}", ix.data);

    if settings.output == OutputFormat::Text {
        print_crank_summary(&slab, &oracle, &args);
    }

    if options.simulate {
        let spinner = spinner("Simulating keeper crank...", settings.output);
        let report = client.simulate_transaction(&[ix], &[&keypair], &keypair.pubkey());
        spinner.finish_and_clear();
        return print_simulation(&report?, settings.output);
    }

    if !options.yes {
        let confirmed = Confirm::new()
            .with_prompt("Send keeper crank transaction?")
            .default(false)
            .interact()?;
        if !confirmed {
            println!("{}", style("Aborted").yellow());
            return Ok(());
        }
    }

    let spinner = spinner("Sending keeper crank...", settings.output);
    let result = client.send_transaction(&[ix], &[&keypair], &keypair.pubkey());
    match result {
        Ok(sig) => {
            spinner.finish_with_message("Keeper crank confirmed!");
            info!("keeper crank on {} confirmed: {}", slab, sig);
            print_signature(&sig, settings.output)
        }
        Err(e) => {
            spinner.finish_and_clear();
            Err(e.into())
        }
    }
}

// ============================================================================
// SLAB COMMANDS
// ============================================================================

pub async fn handle_slab_command(settings: &Settings, command: SlabCommands) -> Result<()> {
    let client = PercolatorClient::new(&settings.rpc_url, settings.program_id_or_default()?)?;

    match command {
        SlabCommands::Header { address } => {
            let slab = parse_pubkey(&address)?;
            let spinner = spinner("Fetching slab...", settings.output);
            let data = client.fetch_slab(&slab);
            spinner.finish_and_clear();

            let header = client.layout().parse_header(&data?)?;
            print_header(&slab, &header, settings.output)?;
        }

        SlabCommands::Config { address } => {
            let slab = parse_pubkey(&address)?;
            let spinner = spinner("Fetching oracle config...", settings.output);
            let config = client.get_oracle_config(&slab);
            spinner.finish_and_clear();

            print_oracle_config(&slab, &config?, settings.output)?;
        }

        SlabCommands::Accounts { address, lps, users } => {
            let slab = parse_pubkey(&address)?;
            let spinner = spinner("Fetching accounts...", settings.output);
            let snapshot = client.get_slab(&slab);
            spinner.finish_and_clear();

            let kind = match (lps, users) {
                (true, _) => Some(AccountKind::Lp),
                (_, true) => Some(AccountKind::User),
                _ => None,
            };
            let accounts: Vec<_> = snapshot?
                .accounts
                .into_iter()
                .filter(|(_, account)| kind.map_or(true, |k| account.kind() == k))
                .collect();
            print_accounts(&accounts, settings.output)?;
        }
    }

    Ok(())
}

// ============================================================================
// CONFIG COMMANDS
// ============================================================================

pub async fn handle_config_command(command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show => {
            let config = Config::load()?;
            print_config(&config);
        }

        ConfigCommands::SetRpc { url } => {
            let mut config = Config::load()?;
            config.rpc_url = url.clone();
            config.save()?;
            println!("{}", style(format!("RPC URL set to: {}", url)).green());
        }

        ConfigCommands::SetKeypair { path } => {
            if !std::path::Path::new(&path).exists() {
                return Err(anyhow!("Keypair file not found: {}", path));
            }
            let mut config = Config::load()?;
            config.keypair_path = Some(path.clone());
            config.save()?;
            println!("{}", style(format!("Keypair path set to: {}", path)).green());
        }

        ConfigCommands::SetProgram { program_id } => {
            let id = parse_pubkey(&program_id)?;
            let mut config = Config::load()?;
            config.program_id = Some(id.to_string());
            config.save()?;
            println!("{}", style(format!("Program ID set to: {}", id)).green());
        }

        ConfigCommands::Init => {
            let config = Config::default();
            config.save()?;
            println!("{}", style("Configuration file created!").green());
            println!("Location: {}", Config::config_path().display());
        }
    }

    Ok(())
}
