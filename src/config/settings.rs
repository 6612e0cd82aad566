use crate::core::block::{DEFAULT_DIFFICULTY_BITS, HEADER_VERSION};
use crate::core::monetary::{Amount, DEFAULT_BLOCK_REWARD};
use crate::error::{BlockchainError, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

const BLOCK_REWARD_KEY: &str = "BLOCK_REWARD";
const MAX_TXNS_KEY: &str = "MAX_TXNS_PER_BLOCK";
const DIFFICULTY_BITS_KEY: &str = "DIFFICULTY_BITS";
const MINER_ADDRESS_KEY: &str = "MINER_ADDRESS";
const TIMESTAMP_POLICY_KEY: &str = "TIMESTAMP_POLICY";
const MAX_NONCE_KEY: &str = "MAX_NONCE";

/// Coinbase recipient label used when none is configured
pub const DEFAULT_MINER_ADDRESS: &str = "miner's address";

/// Transactions per block, coinbase included
pub const DEFAULT_MAX_TRANSACTIONS_PER_BLOCK: usize = 10;

/// How the header timestamp behaves while searching for a nonce
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimestampPolicy {
    /// Capture the time once per mining attempt and keep it for every nonce
    #[default]
    Fixed,
    /// Capture the time again on every nonce increment
    Recapture,
}

impl FromStr for TimestampPolicy {
    type Err = BlockchainError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "fixed" => Ok(TimestampPolicy::Fixed),
            "recapture" => Ok(TimestampPolicy::Recapture),
            _ => Err(BlockchainError::Config(format!(
                "Invalid timestamp policy: {s}. Valid options: fixed, recapture"
            ))),
        }
    }
}

impl fmt::Display for TimestampPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimestampPolicy::Fixed => write!(f, "fixed"),
            TimestampPolicy::Recapture => write!(f, "recapture"),
        }
    }
}

/// Miner settings. Every field has a default, so a TOML file only needs the
/// keys it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinerConfig {
    pub block_reward: Amount,
    pub max_transactions_per_block: usize,
    pub difficulty_bits: u32,
    pub version: u32,
    pub miner_address: String,
    pub timestamp_policy: TimestampPolicy,
    /// Highest nonce tried before giving up; `None` searches forever
    pub max_nonce: Option<u64>,
}

impl Default for MinerConfig {
    fn default() -> Self {
        MinerConfig {
            block_reward: DEFAULT_BLOCK_REWARD,
            max_transactions_per_block: DEFAULT_MAX_TRANSACTIONS_PER_BLOCK,
            difficulty_bits: DEFAULT_DIFFICULTY_BITS,
            version: HEADER_VERSION,
            miner_address: DEFAULT_MINER_ADDRESS.to_string(),
            timestamp_policy: TimestampPolicy::default(),
            max_nonce: None,
        }
    }
}

impl MinerConfig {
    pub fn from_toml_str(contents: &str) -> Result<MinerConfig> {
        let config: MinerConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<MinerConfig> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        info!("Loaded miner configuration from {}", path.display());
        Self::from_toml_str(&contents)
    }

    /// Override fields from environment variables, when set
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(reward) = env::var(BLOCK_REWARD_KEY) {
            self.block_reward = parse_var(BLOCK_REWARD_KEY, &reward)?;
        }
        if let Ok(max_txns) = env::var(MAX_TXNS_KEY) {
            self.max_transactions_per_block = parse_var(MAX_TXNS_KEY, &max_txns)?;
        }
        if let Ok(bits) = env::var(DIFFICULTY_BITS_KEY) {
            self.difficulty_bits = parse_bits(&bits)?;
        }
        if let Ok(address) = env::var(MINER_ADDRESS_KEY) {
            self.miner_address = address;
        }
        if let Ok(policy) = env::var(TIMESTAMP_POLICY_KEY) {
            self.timestamp_policy = policy.parse()?;
        }
        if let Ok(max_nonce) = env::var(MAX_NONCE_KEY) {
            self.max_nonce = Some(parse_var(MAX_NONCE_KEY, &max_nonce)?);
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<()> {
        // One slot is always taken by the coinbase
        if self.max_transactions_per_block < 2 {
            return Err(BlockchainError::Config(format!(
                "max_transactions_per_block must be at least 2, got {}",
                self.max_transactions_per_block
            )));
        }
        if !self.block_reward.is_finite() || self.block_reward < 0.0 {
            return Err(BlockchainError::Config(format!(
                "block_reward must be a non-negative number, got {}",
                self.block_reward
            )));
        }
        Ok(())
    }
}

fn parse_var<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| BlockchainError::Config(format!("Invalid value for {key}: {value}")))
}

/// Accepts decimal or `0x`-prefixed hex
fn parse_bits(value: &str) -> Result<u32> {
    let value = value.trim();
    let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => value.parse(),
    };
    parsed.map_err(|_| {
        BlockchainError::Config(format!("Invalid value for {DIFFICULTY_BITS_KEY}: {value}"))
    })
}
