use crate::core::Transaction;
use crate::error::{BlockchainError, Result};
use crate::utils::{endian_flip, merkle_node_hash};

/// Merkle root accumulator over hex transaction hashes
///
/// Each round pairs consecutive hashes, duplicating the last one when the
/// round has an odd count. Both members of a pair are byte-reversed before
/// they are concatenated and double hashed, and rounds repeat until a single
/// hash remains. A lone leaf is still paired with itself, so the root never
/// equals a raw leaf hash.
pub struct MerkleTree;

impl MerkleTree {
    /// Calculate the Merkle root from an ordered list of hex leaf hashes
    pub fn calculate_merkle_root<S: AsRef<str>>(leaf_hashes: &[S]) -> Result<String> {
        if leaf_hashes.is_empty() {
            return Err(BlockchainError::InvalidBlock(
                "Cannot calculate Merkle root from empty transaction list".to_string(),
            ));
        }

        let mut current_level: Vec<String> = leaf_hashes
            .iter()
            .map(|hash| hash.as_ref().to_string())
            .collect();

        loop {
            let next_level = current_level
                .chunks(2)
                .map(|pair| {
                    let left = &pair[0];
                    let right = pair.get(1).unwrap_or(left);
                    Self::hash_pair(left, right)
                })
                .collect::<Result<Vec<String>>>()?;

            if let [root] = next_level.as_slice() {
                return Ok(root.clone());
            }
            current_level = next_level;
        }
    }

    /// Merkle root of a block's transactions, in block order
    pub fn from_transactions(transactions: &[Transaction]) -> Result<String> {
        let hashes: Vec<&str> = transactions.iter().map(|tx| tx.get_hash()).collect();
        Self::calculate_merkle_root(&hashes)
    }

    /// Verify that a list of transactions produces the expected Merkle root
    pub fn verify_transactions(transactions: &[Transaction], expected_root: &str) -> Result<bool> {
        Ok(Self::from_transactions(transactions)? == expected_root)
    }

    /// Parent hash of two sibling nodes
    pub fn hash_pair(left: &str, right: &str) -> Result<String> {
        let mut node = endian_flip(left)?;
        node.extend(endian_flip(right)?);
        Ok(merkle_node_hash(&node))
    }
}
