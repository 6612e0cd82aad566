//! Error handling for the ledger
//!
//! This module provides the error type shared by every ledger operation.
//! Lookups that find nothing return `None` instead of an error.

use std::fmt;

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, BlockchainError>;

/// Error types for ledger operations
#[derive(Debug, Clone, PartialEq)]
pub enum BlockchainError {
    /// More transactions were requested from the pool than it holds
    InsufficientPool { requested: usize, available: usize },
    /// A digest string that is not valid hex
    InvalidHash(String),
    /// Block or chain structure errors
    InvalidBlock(String),
    /// Mining errors (only raised when a nonce cap is configured)
    Mining(String),
    /// Configuration errors
    Config(String),
    /// Serialization/deserialization errors
    Serialization(String),
    /// File I/O errors
    Io(String),
    /// A shared handle's lock was poisoned
    Lock(String),
    /// System clock errors
    Clock(String),
}

impl fmt::Display for BlockchainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockchainError::InsufficientPool {
                requested,
                available,
            } => {
                write!(
                    f,
                    "Insufficient pool: requested {requested} transactions, available {available}"
                )
            }
            BlockchainError::InvalidHash(msg) => write!(f, "Invalid hash: {msg}"),
            BlockchainError::InvalidBlock(msg) => write!(f, "Invalid block: {msg}"),
            BlockchainError::Mining(msg) => write!(f, "Mining error: {msg}"),
            BlockchainError::Config(msg) => write!(f, "Configuration error: {msg}"),
            BlockchainError::Serialization(msg) => write!(f, "Serialization error: {msg}"),
            BlockchainError::Io(msg) => write!(f, "I/O error: {msg}"),
            BlockchainError::Lock(msg) => write!(f, "Lock error: {msg}"),
            BlockchainError::Clock(msg) => write!(f, "Clock error: {msg}"),
        }
    }
}

impl std::error::Error for BlockchainError {}

impl From<std::io::Error> for BlockchainError {
    fn from(err: std::io::Error) -> Self {
        BlockchainError::Io(err.to_string())
    }
}

impl From<toml::de::Error> for BlockchainError {
    fn from(err: toml::de::Error) -> Self {
        BlockchainError::Config(err.to_string())
    }
}

impl From<bincode::error::EncodeError> for BlockchainError {
    fn from(err: bincode::error::EncodeError) -> Self {
        BlockchainError::Serialization(err.to_string())
    }
}

impl From<bincode::error::DecodeError> for BlockchainError {
    fn from(err: bincode::error::DecodeError) -> Self {
        BlockchainError::Serialization(err.to_string())
    }
}
