//! Keeper configuration

use anyhow::{Context, Result};
use crescendo_common::{Address, Amount};
use crescendo_curve::FIXED_ONE;
use serde::{Deserialize, Serialize};

/// One vesting grant seeded at startup. Token amounts are whole tokens;
/// TOML integers cannot carry fixed units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrantSeed {
    /// Beneficiary address, hex
    pub beneficiary: String,

    /// Grant size in whole tokens
    pub amount_tokens: u64,

    /// Schedule start, unix seconds
    pub start: u64,

    /// Schedule end, unix seconds
    pub end: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Treasury address the ledgers spend from, hex
    pub treasury: String,

    /// Treasury funding at startup, whole tokens
    pub treasury_tokens: u64,

    /// Polling interval in seconds
    pub poll_interval_secs: u64,

    /// Maximum claims per sweep
    pub max_claims_per_batch: usize,

    /// Smallest claimable amount worth sweeping, whole tokens
    pub dust_threshold_tokens: u64,

    /// JSON-lines event export path
    pub export_path: String,

    /// Grants seeded at startup
    pub grants: Vec<GrantSeed>,
}

impl Config {
    /// Load configuration from TOML file
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("CRESCENDO_KEEPER_CONFIG")
            .unwrap_or_else(|_| "keeper-config.toml".to_string());

        let config_str = std::fs::read_to_string(&config_path)
            .context(format!("Failed to read config file: {}", config_path))?;

        let config: Config = toml::from_str(&config_str)
            .context("Failed to parse config TOML")?;

        Ok(config)
    }

    /// Create default configuration
    pub fn default_local() -> Self {
        Self {
            treasury: "0x00000000000000000000000000000000000000ff".to_string(),
            treasury_tokens: 100_000_000,
            poll_interval_secs: 1,
            max_claims_per_batch: 5,
            dust_threshold_tokens: 100,
            export_path: "~/.crescendo/events.jsonl".to_string(),
            grants: vec![GrantSeed {
                beneficiary: "0x0000000000000000000000000000000000000001".to_string(),
                amount_tokens: 10_000,
                start: 0,
                end: 86_400,
            }],
        }
    }

    /// Write default config to file
    pub fn write_default(path: &str) -> Result<()> {
        let config = Self::default_local();
        let toml_str = toml::to_string_pretty(&config)
            .context("Failed to serialize config")?;

        std::fs::write(path, toml_str)
            .context(format!("Failed to write config to {}", path))?;

        log::info!("Created default config at {}", path);
        Ok(())
    }
}

/// Parse a hex address, with or without the 0x prefix
pub fn parse_address(s: &str) -> Result<Address> {
    let bytes = hex::decode(s.trim_start_matches("0x"))
        .context(format!("Invalid hex address: {}", s))?;
    let addr: Address = bytes
        .as_slice()
        .try_into()
        .map_err(|_| anyhow::anyhow!("Address must be 20 bytes: {}", s))?;
    Ok(addr)
}

/// Scale whole tokens into fixed units
pub fn tokens_to_fixed(tokens: u64) -> Amount {
    tokens as Amount * FIXED_ONE
}
