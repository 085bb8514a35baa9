//! Output formatting utilities

use anyhow::Result;
use console::style;
use serde::Serialize;
use solana_sdk::{pubkey::Pubkey, signature::Signature};
use tabled::{settings::Style, Table, Tabled};

use percolator_sdk::{
    format_signed_truncated, format_unsigned, Account, KeeperCrankArgs, OracleConfig,
    SimulationReport, SlabHeader, CAPITAL_DECIMALS, CAPITAL_DISPLAY_PLACES, PRICE_DECIMALS,
};

use crate::config::{Config, OutputFormat};

// ============================================================================
// SLAB OUTPUT
// ============================================================================

#[derive(Serialize)]
struct HeaderView {
    version: u32,
    bump: u8,
    resolved: bool,
    paused: bool,
    admin: Option<String>,
}

pub fn print_header(slab: &Pubkey, header: &SlabHeader, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(&HeaderView {
            version: header.version,
            bump: header.bump,
            resolved: header.resolved,
            paused: header.paused,
            admin: header.admin.map(|a| a.to_string()),
        });
    }

    println!("\n{}", style("═══ Slab Header ═══").bold().cyan());
    println!();
    println!("{:<20} {}", "Slab:", slab);
    println!("{:<20} {}", "Version:", header.version);
    println!("{:<20} {}", "Bump:", header.bump);
    println!("{:<20} {}", "Admin:", format_optional_pubkey(header.admin));
    println!("{:<20} {}", "Resolved:", format_flag(header.resolved));
    println!("{:<20} {}", "Paused:", format_flag(header.paused));
    println!();
    Ok(())
}

#[derive(Serialize)]
struct OracleConfigView {
    oracle_authority: Option<String>,
    authority_price_e6: Option<u64>,
    authority_price: Option<String>,
    authority_timestamp: Option<u64>,
    max_staleness_slots: Option<u64>,
}

pub fn print_oracle_config(slab: &Pubkey, config: &OracleConfig, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(&OracleConfigView {
            oracle_authority: config.oracle_authority.map(|a| a.to_string()),
            authority_price_e6: config.authority_price_e6,
            authority_price: config.authority_price_e6.map(format_price),
            authority_timestamp: config.authority_timestamp,
            max_staleness_slots: config.max_staleness_slots,
        });
    }

    println!("\n{}", style("═══ Oracle Config ═══").bold().cyan());
    println!();
    println!("{:<22} {}", "Slab:", slab);
    println!("{:<22} {}", "Oracle Authority:", format_optional_pubkey(config.oracle_authority));
    println!(
        "{:<22} {}",
        "Authority Price:",
        config
            .authority_price_e6
            .map(format_price)
            .unwrap_or_else(not_set)
    );
    println!(
        "{:<22} {}",
        "Authority Timestamp:",
        config
            .authority_timestamp
            .map(format_timestamp)
            .unwrap_or_else(not_set)
    );
    println!(
        "{:<22} {}",
        "Max Staleness:",
        config
            .max_staleness_slots
            .map(|s| format!("{} slots", s))
            .unwrap_or_else(not_set)
    );
    println!();
    Ok(())
}

#[derive(Serialize, Tabled)]
pub struct AccountRow {
    #[tabled(rename = "Idx")]
    pub index: usize,
    #[tabled(rename = "Kind")]
    pub kind: String,
    #[tabled(rename = "Owner")]
    pub owner: String,
    #[tabled(rename = "Position")]
    pub position_size: i64,
    #[tabled(rename = "Entry Price")]
    pub entry_price: String,
    #[tabled(rename = "Capital")]
    pub capital: String,
    #[tabled(rename = "PnL")]
    pub pnl: String,
}

impl AccountRow {
    pub fn new(index: usize, account: &Account) -> Self {
        let position = account.position();
        Self {
            index,
            kind: account.kind().to_string(),
            owner: position.owner.to_string(),
            position_size: position.position_size,
            entry_price: format_price(position.entry_price_e6),
            capital: format_capital(position.capital),
            pnl: format_capital(position.pnl),
        }
    }
}

pub fn print_accounts(accounts: &[(usize, Account)], format: OutputFormat) -> Result<()> {
    let rows: Vec<AccountRow> = accounts
        .iter()
        .map(|(index, account)| AccountRow::new(*index, account))
        .collect();

    if format == OutputFormat::Json {
        return print_json(&rows);
    }

    println!("\n{}", style("═══ Accounts ═══").bold().cyan());
    println!();
    if rows.is_empty() {
        println!("{}", style("No occupied accounts").dim());
        return Ok(());
    }

    let rows: Vec<AccountRow> = rows
        .into_iter()
        .map(|row| AccountRow {
            owner: shorten(&row.owner),
            ..row
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}", table);
    println!();
    Ok(())
}

// ============================================================================
// KEEPER OUTPUT
// ============================================================================

pub fn print_crank_summary(slab: &Pubkey, oracle: &Pubkey, args: &KeeperCrankArgs) {
    println!("\n{}", style("Keeper Crank:").bold());
    println!("  Slab: {}", slab);
    println!("  Oracle: {}", oracle);
    println!("  Caller: {:?}", args.caller());
    println!("  Funding Rate: {} bps/slot", args.funding_rate_bps_per_slot);
    println!("  Allow Panic: {}", args.allow_panic);
    println!();
}

#[derive(Serialize)]
struct SignatureView {
    signature: String,
}

pub fn print_signature(signature: &Signature, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(&SignatureView {
            signature: signature.to_string(),
        });
    }
    println!("{}", style(format!("Transaction: {}", signature)).green());
    Ok(())
}

#[derive(Serialize)]
struct SimulationView<'a> {
    units_consumed: Option<u64>,
    logs: &'a [String],
}

pub fn print_simulation(report: &SimulationReport, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(&SimulationView {
            units_consumed: report.units_consumed,
            logs: &report.logs,
        });
    }

    println!("\n{}", style("═══ Simulation ═══").bold().cyan());
    println!();
    if let Some(units) = report.units_consumed {
        println!("{:<20} {}", "Compute Units:", units);
    }
    println!("{}", style("─── Logs ───").dim());
    for line in &report.logs {
        println!("  {}", line);
    }
    println!();
    Ok(())
}

// ============================================================================
// CONFIG OUTPUT
// ============================================================================

pub fn print_config(config: &Config) {
    println!("{}", style("Current Configuration:").bold());
    println!("  RPC URL: {}", config.rpc_url);
    match &config.keypair_path {
        Some(path) => println!("  Keypair: {}", path),
        None => println!("  Keypair: {}", style("(not set)").dim()),
    }
    match &config.program_id {
        Some(id) => println!("  Program ID: {}", id),
        None => println!("  Program ID: {}", style("(not set)").dim()),
    }
    println!("  Output: {:?}", config.output_format);
}

// ============================================================================
// FORMATTING HELPERS
// ============================================================================

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn format_price(raw_e6: u64) -> String {
    format_unsigned(raw_e6, PRICE_DECIMALS)
}

pub fn format_capital(raw_e9: i64) -> String {
    format_signed_truncated(raw_e9, CAPITAL_DECIMALS, CAPITAL_DISPLAY_PLACES)
}

fn format_optional_pubkey(pubkey: Option<Pubkey>) -> String {
    match pubkey {
        Some(pk) => pk.to_string(),
        None => not_set(),
    }
}

fn format_flag(flag: bool) -> String {
    if flag {
        style("yes").yellow().to_string()
    } else {
        "no".to_string()
    }
}

fn not_set() -> String {
    style("(not set)").dim().to_string()
}

fn shorten(s: &str) -> String {
    if s.len() > 12 {
        format!("{}...{}", &s[..6], &s[s.len() - 4..])
    } else {
        s.to_string()
    }
}

fn format_timestamp(ts: u64) -> String {
    use chrono::{DateTime, Utc};
    match i64::try_from(ts)
        .ok()
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
    {
        Some(dt) => format!("{} ({} UTC)", ts, dt.format("%Y-%m-%d %H:%M:%S")),
        None => ts.to_string(),
    }
}
