//! Core ledger functionality
//!
//! This module contains the chain-construction and mining engine:
//! transactions, headers and blocks, the Merkle accumulator,
//! proof-of-work, the chain itself, and the miner that ties them together.

pub mod block;
pub mod blockchain;
pub mod fees;
pub mod merkle;
pub mod miner;
pub mod monetary;
pub mod proof_of_work;
pub mod transaction;

pub use block::{Block, Header};
pub use blockchain::Blockchain;
pub use fees::FeeCalculator;
pub use merkle::MerkleTree;
pub use miner::{MinedBlock, Miner, SharedMiner};
pub use monetary::{Amount, DEFAULT_BLOCK_REWARD, GENESIS_SENTINEL_HASH, SUBUNITS_PER_COIN};
pub use proof_of_work::ProofOfWork;
pub use transaction::{TXInputs, TXOutput, Transaction};
