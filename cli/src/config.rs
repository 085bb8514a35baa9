//! CLI Configuration

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Output format for command results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// CLI configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// RPC endpoint URL
    pub rpc_url: String,
    /// Path to keypair file
    pub keypair_path: Option<String>,
    /// Slab program ID
    pub program_id: Option<String>,
    /// Default output format
    pub output_format: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: "https://api.devnet.solana.com".to_string(),
            keypair_path: None,
            program_id: None,
            output_format: OutputFormat::Text,
        }
    }
}

impl Config {
    /// Get config directory path
    fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("percolator")
    }

    /// Get config file path
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.json")
    }

    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from `path`, falling back to defaults if absent
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents)
            .map_err(|e| anyhow!("Invalid config file {}: {}", path.display(), e))?;
        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }
}

/// Effective settings for one invocation: config file overridden by flags
#[derive(Debug, Clone)]
pub struct Settings {
    pub rpc_url: String,
    pub keypair_path: Option<String>,
    pub program_id: Option<String>,
    pub output: OutputFormat,
}

impl Settings {
    pub fn resolve(
        config: Config,
        rpc_url: Option<String>,
        keypair_path: Option<String>,
        program_id: Option<String>,
        output: Option<OutputFormat>,
    ) -> Self {
        Self {
            rpc_url: rpc_url.unwrap_or(config.rpc_url),
            keypair_path: keypair_path.or(config.keypair_path),
            program_id: program_id.or(config.program_id),
            output: output.unwrap_or(config.output_format),
        }
    }

    /// Program ID, required for commands that submit instructions
    pub fn require_program_id(&self) -> Result<Pubkey> {
        let id = self.program_id.as_deref().ok_or_else(|| {
            anyhow!("No program ID specified. Use --program-id or 'percolator config set-program'")
        })?;
        Pubkey::from_str(id).map_err(|e| anyhow!("Invalid program ID: {}", e))
    }

    /// Program ID if configured, default otherwise; reads do not need it
    pub fn program_id_or_default(&self) -> Result<Pubkey> {
        match self.program_id {
            Some(_) => self.require_program_id(),
            None => Ok(Pubkey::default()),
        }
    }
}

/// Get home directory for config
mod dirs {
    use std::path::PathBuf;

    pub fn config_dir() -> Option<PathBuf> {
        std::env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join(".config"))
    }
}
