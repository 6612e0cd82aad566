//! Configuration management
//!
//! This module handles the miner settings: block reward, per-block
//! transaction cap, difficulty bits, and the nonce-search policy.
//! Settings come from defaults, an optional TOML file, and environment
//! variables, and are handed to the miner explicitly.

pub mod settings;

pub use settings::{MinerConfig, TimestampPolicy};
