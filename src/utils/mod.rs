//! Utility functions and helpers
//!
//! This module contains the hash primitives, timestamps, and
//! serialization helpers used throughout the ledger.

pub mod crypto;
pub mod serialization;

pub use crypto::{current_timestamp, endian_flip, merkle_node_hash, sha256_digest, text_hash};

pub use serialization::{canonical_preimage, deserialize, serialize};
