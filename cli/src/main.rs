//! Percolator Slab CLI
//!
//! Command-line interface for slab inspection and keeper operations.

mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use console::style;

use commands::*;
use config::{Config, OutputFormat, Settings};

/// Percolator Slab CLI
#[derive(Parser)]
#[command(name = "percolator")]
#[command(author = "Percolator Protocol")]
#[command(version = "0.1.0")]
#[command(about = "CLI tools for Percolator slab inspection and keeper operations", long_about = None)]
struct Cli {
    /// RPC endpoint URL (overrides config file)
    #[arg(short, long, env = "SOLANA_RPC_URL")]
    rpc_url: Option<String>,

    /// Path to keypair file (overrides config file)
    #[arg(short, long, env = "KEYPAIR_PATH")]
    keypair: Option<String>,

    /// Slab program ID (overrides config file)
    #[arg(short, long, env = "PERCOLATOR_PROGRAM_ID")]
    program_id: Option<String>,

    /// Output format
    #[arg(short, long, value_enum)]
    output: Option<OutputFormat>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute keeper crank operation (permissionless by default)
    KeeperCrank {
        /// Slab account public key
        #[arg(long)]
        slab: String,
        /// Price oracle account
        #[arg(long)]
        oracle: String,
        /// Caller account index (default: 65535 for permissionless)
        #[arg(long)]
        caller_idx: Option<u64>,
        /// Funding rate (bps per slot, signed)
        #[arg(long, allow_hyphen_values = true)]
        funding_rate_bps_per_slot: String,
        /// Allow panic mode
        #[arg(long)]
        allow_panic: bool,
        /// Simulate instead of sending
        #[arg(long)]
        simulate: bool,
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Slab inspection commands
    Slab {
        #[command(subcommand)]
        command: SlabCommands,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum SlabCommands {
    /// Show slab header
    Header {
        /// Slab address
        address: String,
    },
    /// Show oracle configuration
    Config {
        /// Slab address
        address: String,
    },
    /// List occupied accounts with position, entry price, capital and PnL
    Accounts {
        /// Slab address
        address: String,
        /// Only show LP accounts
        #[arg(long, conflicts_with = "users")]
        lps: bool,
        /// Only show user accounts
        #[arg(long)]
        users: bool,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set RPC endpoint
    SetRpc {
        /// RPC URL
        url: String,
    },
    /// Set keypair path
    SetKeypair {
        /// Keypair file path
        path: String,
    },
    /// Set slab program ID
    SetProgram {
        /// Program ID
        program_id: String,
    },
    /// Initialize configuration file
    Init,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

async fn run(settings: &Settings, command: Commands) -> Result<()> {
    if settings.output == OutputFormat::Text {
        println!(
            "{} {}",
            style("Percolator Slab CLI").bold().cyan(),
            style("v0.1.0").dim()
        );
    }
    match command {
        Commands::KeeperCrank {
            slab,
            oracle,
            caller_idx,
            funding_rate_bps_per_slot,
            allow_panic,
            simulate,
            yes,
        } => {
            let options = KeeperCrankOptions {
                slab,
                oracle,
                caller_idx,
                funding_rate_bps_per_slot,
                allow_panic,
                simulate,
                yes,
            };
            handle_keeper_crank(settings, options).await
        }
        Commands::Slab { command } => handle_slab_command(settings, command).await,
        Commands::Config { command } => handle_config_command(command).await,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Config { command } => handle_config_command(command).await,
        command => match Config::load() {
            Err(e) => Err(e),
            Ok(config) => {
                let settings =
                    Settings::resolve(config, cli.rpc_url, cli.keypair, cli.program_id, cli.output);
                run(&settings, command).await
            }
        },
    };

    if let Err(e) = result {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_init_parses_without_settings() {
        let cli = Cli::try_parse_from(["percolator", "config", "init"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Config {
                command: ConfigCommands::Init
            }
        ));
    }

    #[test]
    fn test_negative_funding_rate() {
        let cli = Cli::try_parse_from([
            "percolator",
            "keeper-crank",
            "--slab",
            "11111111111111111111111111111111",
            "--oracle",
            "11111111111111111111111111111111",
            "--funding-rate-bps-per-slot",
            "-150",
        ])
        .unwrap();
        match cli.command {
            Commands::KeeperCrank {
                caller_idx,
                funding_rate_bps_per_slot,
                ..
            } => {
                assert_eq!(caller_idx, None);
                assert_eq!(funding_rate_bps_per_slot, "-150");
            }
            _ => panic!("expected keeper-crank"),
        }
    }
}
