//! In-memory storage
//!
//! The ledger keeps nothing on disk; this module holds the queue of
//! transactions waiting to be mined.

pub mod memory_pool;

pub use memory_pool::MempoolQueue;
