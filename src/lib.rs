//! # Megalonia Chain - A Single-Node Proof-of-Work Ledger
//!
//! Candidate transactions go into a FIFO pool; the miner drains the pool in
//! batches, pays itself a coinbase, computes a Merkle root, searches for a
//! nonce whose header hash falls below the difficulty target, and appends the
//! block to an in-memory chain anchored at a genesis block.
//!
//! ## How the Code Is Organized
//! - `core/`: transactions, headers and blocks, Merkle roots, proof-of-work,
//!   the chain, and the miner
//! - `storage/`: the pending-transaction pool
//! - `config/`: miner settings from defaults, TOML, and environment
//! - `utils/`: hash primitives, timestamps, and serialization helpers
//! - `cli/`: argument parsing for the demo binary
//!
//! ## Hashing
//! Transaction and block hashes are a double SHA-256 where the second round
//! hashes the *hex string* of the first digest. Merkle nodes use a
//! conventional raw-bytes double SHA-256 over byte-reversed children.
//!
//! There is no networking, persistence, signature checking, or fork
//! handling: one trusted miner works one chain in memory.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod storage;
pub mod utils;

#[cfg(test)]
pub mod testnet;

// Re-export commonly used types for convenience
pub use cli::{Command, Opt};
pub use config::{MinerConfig, TimestampPolicy};
pub use core::{
    Block, Blockchain, FeeCalculator, Header, MerkleTree, MinedBlock, Miner, ProofOfWork,
    SharedMiner, TXInputs, TXOutput, Transaction,
};
pub use error::{BlockchainError, Result};
pub use storage::MempoolQueue;
pub use utils::{current_timestamp, endian_flip, merkle_node_hash, sha256_digest, text_hash};
