use crate::core::monetary::{GENESIS_SENTINEL_HASH, MAGIC_NUMBER};
use crate::core::{MerkleTree, Transaction};
use crate::error::Result;
use crate::utils::{canonical_preimage, current_timestamp, deserialize, serialize, text_hash};
use serde::{Deserialize, Serialize};

/// Default header version
pub const HEADER_VERSION: u32 = 1;

/// Compact difficulty bits used unless configured otherwise
pub const DEFAULT_DIFFICULTY_BITS: u32 = 0x207f_ffff;

/// Block header. The block hash is derived from the header on demand and
/// never stored on it, so changing the nonce changes the hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, bincode::Encode, bincode::Decode)]
pub struct Header {
    prev_block_hash: String,
    merkle_root: String,
    version: u32,
    timestamp: u64,
    bits: u32,
    nonce: u64,
}

impl Header {
    /// Build a header stamped with the current time
    pub fn new(prev_block_hash: &str, merkle_root: &str, nonce: u64, bits: u32) -> Result<Header> {
        Ok(Self::with_timestamp(
            prev_block_hash,
            merkle_root,
            nonce,
            bits,
            current_timestamp()?,
        ))
    }

    pub fn with_timestamp(
        prev_block_hash: &str,
        merkle_root: &str,
        nonce: u64,
        bits: u32,
        timestamp: u64,
    ) -> Header {
        Header {
            prev_block_hash: prev_block_hash.to_string(),
            merkle_root: merkle_root.to_string(),
            version: HEADER_VERSION,
            timestamp,
            bits,
            nonce,
        }
    }

    /// Same header with another nonce; the timestamp is kept
    pub fn with_nonce(&self, nonce: u64) -> Header {
        Header {
            nonce,
            ..self.clone()
        }
    }

    /// Same header with another nonce and a fresh timestamp
    pub fn with_nonce_at(&self, nonce: u64, timestamp: u64) -> Header {
        Header {
            nonce,
            timestamp,
            ..self.clone()
        }
    }

    pub fn set_version(&mut self, version: u32) {
        self.version = version;
    }

    /// Derive the block hash from timestamp, Merkle root, bits, nonce and
    /// previous hash, in that order
    pub fn block_hash(&self) -> String {
        let preimage = canonical_preimage(&[
            self.timestamp.to_string(),
            self.merkle_root.clone(),
            self.bits.to_string(),
            self.nonce.to_string(),
            self.prev_block_hash.clone(),
        ]);
        text_hash(&preimage)
    }

    pub fn get_prev_block_hash(&self) -> &str {
        self.prev_block_hash.as_str()
    }

    pub fn get_merkle_root(&self) -> &str {
        self.merkle_root.as_str()
    }

    pub fn get_version(&self) -> u32 {
        self.version
    }

    pub fn get_timestamp(&self) -> u64 {
        self.timestamp
    }

    pub fn get_bits(&self) -> u32 {
        self.bits
    }

    pub fn get_nonce(&self) -> u64 {
        self.nonce
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, bincode::Encode, bincode::Decode)]
pub struct Block {
    magic_number: u32,
    index: usize,
    header: Header,
    transaction_count: usize,
    transactions: Vec<Transaction>,
    block_hash: String,
}

impl Block {
    pub fn new(
        index: usize,
        header: Header,
        transactions: Vec<Transaction>,
        block_hash: String,
    ) -> Block {
        Block {
            magic_number: MAGIC_NUMBER,
            index,
            header,
            transaction_count: transactions.len(),
            transactions,
            block_hash,
        }
    }

    /// Block 0: sentinel previous hash and Merkle root, nonce 0, one
    /// zero-value coinbase. It is not subject to proof-of-work.
    pub fn generate_genesis_block(bits: u32, version: u32) -> Result<Block> {
        let mut header = Header::new(GENESIS_SENTINEL_HASH, GENESIS_SENTINEL_HASH, 0, bits)?;
        header.set_version(version);
        let block_hash = header.block_hash();
        let coinbase = Transaction::new_genesis_coinbase(version);
        Ok(Block::new(0, header, vec![coinbase], block_hash))
    }

    pub fn deserialize(bytes: &[u8]) -> Result<Block> {
        deserialize::<Block>(bytes)
    }

    pub fn serialize(&self) -> Result<Vec<u8>> {
        serialize(self)
    }

    /// Serialized size in bytes
    pub fn size(&self) -> Result<usize> {
        Ok(self.serialize()?.len())
    }

    pub fn get_index(&self) -> usize {
        self.index
    }

    pub fn get_header(&self) -> &Header {
        &self.header
    }

    pub fn get_transactions(&self) -> &[Transaction] {
        self.transactions.as_slice()
    }

    pub fn get_transaction_count(&self) -> usize {
        self.transaction_count
    }

    pub fn get_hash(&self) -> &str {
        self.block_hash.as_str()
    }

    pub fn get_pre_block_hash(&self) -> &str {
        self.header.get_prev_block_hash()
    }

    pub fn get_magic_number(&self) -> u32 {
        self.magic_number
    }

    pub fn get_nonce(&self) -> u64 {
        self.header.get_nonce()
    }

    pub fn is_genesis(&self) -> bool {
        self.index == 0 && self.header.get_prev_block_hash() == GENESIS_SENTINEL_HASH
    }

    /// Verify that the block's Merkle root matches its transactions
    pub fn verify_merkle_root(&self) -> Result<bool> {
        MerkleTree::verify_transactions(&self.transactions, self.header.get_merkle_root())
    }
}
