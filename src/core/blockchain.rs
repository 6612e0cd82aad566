// The in-memory chain: an ordered list of blocks starting at genesis.
// Blocks are appended by the miner, which guarantees linkage; the chain
// itself only stores and answers queries.

use crate::core::{Block, ProofOfWork, Transaction};
use crate::error::{BlockchainError, Result};
use log::info;

pub struct Blockchain {
    blocks: Vec<Block>,
}

impl Blockchain {
    /// A fresh chain holding only the genesis block
    pub fn new_blockchain(bits: u32, version: u32) -> Result<Blockchain> {
        let genesis = Block::generate_genesis_block(bits, version)?;
        info!("Created genesis block: {}", genesis.get_hash());
        Ok(Blockchain {
            blocks: vec![genesis],
        })
    }

    /// Add a block to the tail. Linkage is the caller's responsibility and is
    /// not re-checked here; see [`Blockchain::verify_chain`].
    pub fn add_block(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// First block whose height equals `height` or whose hash equals `hash`
    pub fn get_block(&self, height: Option<usize>, hash: Option<&str>) -> Option<&Block> {
        self.blocks
            .iter()
            .find(|block| height == Some(block.get_index()) || hash == Some(block.get_hash()))
    }

    pub fn get_block_by_height(&self, height: usize) -> Option<&Block> {
        self.get_block(Some(height), None)
    }

    pub fn get_block_by_hash(&self, hash: &str) -> Option<&Block> {
        self.get_block(None, Some(hash))
    }

    /// First transaction with this hash, scanning from genesis
    pub fn find_transaction(&self, hash: &str) -> Option<&Transaction> {
        self.blocks
            .iter()
            .flat_map(|block| block.get_transactions())
            .find(|tx| tx.get_hash() == hash)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Never true: a chain always holds its genesis block
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn last_block(&self) -> &Block {
        // The genesis block is created with the chain and never removed
        &self.blocks[self.blocks.len() - 1]
    }

    pub fn get_tip_hash(&self) -> &str {
        self.last_block().get_hash()
    }

    pub fn get_best_height(&self) -> usize {
        self.last_block().get_index()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Block> {
        self.blocks.iter()
    }

    pub fn get_block_hashes(&self) -> Vec<String> {
        self.blocks
            .iter()
            .map(|block| block.get_hash().to_string())
            .collect()
    }

    /// Walk the whole chain and check every invariant the miner is meant to
    /// uphold: heights, previous-hash links, stored vs derived hashes,
    /// proof-of-work and Merkle roots.
    pub fn verify_chain(&self) -> Result<()> {
        let genesis = self.blocks.first().ok_or_else(|| {
            BlockchainError::InvalidBlock("Chain has no genesis block".to_string())
        })?;
        if !genesis.is_genesis() {
            return Err(BlockchainError::InvalidBlock(
                "First block is not a genesis block".to_string(),
            ));
        }
        if genesis.get_header().block_hash() != genesis.get_hash() {
            return Err(BlockchainError::InvalidBlock(
                "Genesis hash does not match its header".to_string(),
            ));
        }

        for pair in self.blocks.windows(2) {
            let (prev, block) = (&pair[0], &pair[1]);
            let height = block.get_index();

            if height != prev.get_index() + 1 {
                return Err(BlockchainError::InvalidBlock(format!(
                    "Block {height} follows block {}",
                    prev.get_index()
                )));
            }
            if block.get_pre_block_hash() != prev.get_hash() {
                return Err(BlockchainError::InvalidBlock(format!(
                    "Block {height} does not link to block {}",
                    prev.get_index()
                )));
            }
            if !ProofOfWork::validate(block) {
                return Err(BlockchainError::InvalidBlock(format!(
                    "Block {height} fails proof-of-work"
                )));
            }
            if !block.verify_merkle_root()? {
                return Err(BlockchainError::InvalidBlock(format!(
                    "Block {height} has a wrong Merkle root"
                )));
            }
        }
        Ok(())
    }
}
