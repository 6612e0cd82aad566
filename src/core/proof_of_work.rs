use crate::config::TimestampPolicy;
use crate::core::block::{Block, Header};
use crate::error::{BlockchainError, Result};
use crate::utils::current_timestamp;
use data_encoding::HEXLOWER_PERMISSIVE;
use log::{debug, info};
use num_bigint::{BigInt, Sign};

/// Nonce search against a fixed difficulty target.
///
/// The search has no bound unless a cap is passed to [`ProofOfWork::run`]:
/// with an unreachable target it spins forever on the calling thread.
pub struct ProofOfWork {
    target: BigInt,
    bits: u32,
}

impl ProofOfWork {
    pub fn new_proof_of_work(bits: u32) -> ProofOfWork {
        ProofOfWork {
            target: Self::target_from_compact(bits),
            bits,
        }
    }

    /// Expand compact bits into the full target:
    /// `mantissa * 256^(exponent - 3)`, so `0x207fffff` becomes
    /// `0x7fffff * 2^(8 * (0x20 - 3))`.
    pub fn target_from_compact(bits: u32) -> BigInt {
        let exponent = (bits >> 24) as usize;
        let mantissa = BigInt::from(bits & 0x007f_ffff);
        if exponent <= 3 {
            mantissa >> (8 * (3 - exponent))
        } else {
            mantissa << (8 * (exponent - 3))
        }
    }

    pub fn get_target(&self) -> &BigInt {
        &self.target
    }

    pub fn get_bits(&self) -> u32 {
        self.bits
    }

    /// Interpret a hex digest as a big unsigned integer
    pub fn hash_to_int(hash: &str) -> Result<BigInt> {
        let bytes = HEXLOWER_PERMISSIVE
            .decode(hash.as_bytes())
            .map_err(|e| BlockchainError::InvalidHash(format!("{hash}: {e}")))?;
        Ok(BigInt::from_bytes_be(Sign::Plus, &bytes))
    }

    /// A hash meets the target when it is strictly below it
    pub fn meets_target(&self, hash: &str) -> Result<bool> {
        Ok(Self::hash_to_int(hash)? < self.target)
    }

    /// Search nonces upward from the header's nonce until the derived hash is
    /// below target. Returns the winning header and its hash.
    ///
    /// With `max_nonce` set, gives up with [`BlockchainError::Mining`] once
    /// that nonce has been tried.
    pub fn run(
        &self,
        header: Header,
        policy: TimestampPolicy,
        max_nonce: Option<u64>,
    ) -> Result<(Header, String)> {
        let mut header = header;
        loop {
            let hash = header.block_hash();
            if self.meets_target(&hash)? {
                debug!("Found hash {hash} at nonce {}", header.get_nonce());
                return Ok((header, hash));
            }

            let nonce = header.get_nonce();
            if max_nonce.is_some_and(|max| nonce >= max) {
                info!("Giving up nonce search after nonce {nonce}");
                return Err(BlockchainError::Mining(format!(
                    "No hash below target up to nonce {nonce}"
                )));
            }
            let next = nonce
                .checked_add(1)
                .ok_or_else(|| BlockchainError::Mining("Nonce space exhausted".to_string()))?;

            header = match policy {
                TimestampPolicy::Fixed => header.with_nonce(next),
                TimestampPolicy::Recapture => header.with_nonce_at(next, current_timestamp()?),
            };
        }
    }

    /// Validate proof-of-work for a block: the stored hash must be the
    /// header's derived hash and lie below the header's target
    pub fn validate(block: &Block) -> bool {
        let header = block.get_header();
        let derived = header.block_hash();
        if derived != block.get_hash() {
            return false;
        }
        let pow = ProofOfWork::new_proof_of_work(header.get_bits());
        pow.meets_target(&derived).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::block::DEFAULT_DIFFICULTY_BITS;
    use crate::core::transaction::TRANSACTION_VERSION;
    use crate::core::{MerkleTree, Transaction};

    // Exponent 1 shifts the mantissa to zero, so nothing is ever below target
    const UNREACHABLE_BITS: u32 = 0x0100_0001;

    fn template(bits: u32) -> Header {
        let txs = vec![Transaction::new_coinbase("miner", 50.0, TRANSACTION_VERSION)];
        let root = MerkleTree::from_transactions(&txs).unwrap();
        Header::with_timestamp("prev", &root, 0, bits, 1_532_584_390)
    }

    #[test]
    fn test_default_target() {
        let expected = BigInt::from(0x7f_ffff) * BigInt::from(2).pow(8 * (0x20 - 0x3));
        let pow = ProofOfWork::new_proof_of_work(DEFAULT_DIFFICULTY_BITS);
        assert_eq!(pow.get_target(), &expected);
        assert_eq!(pow.get_bits(), DEFAULT_DIFFICULTY_BITS);
    }

    #[test]
    fn test_small_exponent_shifts_right() {
        assert_eq!(ProofOfWork::target_from_compact(0x0300_1234), BigInt::from(0x1234));
        assert_eq!(ProofOfWork::target_from_compact(0x0200_1234), BigInt::from(0x12));
        assert_eq!(ProofOfWork::target_from_compact(UNREACHABLE_BITS), BigInt::from(0));
    }

    #[test]
    fn test_harder_bits_give_smaller_target() {
        let easy = ProofOfWork::new_proof_of_work(DEFAULT_DIFFICULTY_BITS);
        let hard = ProofOfWork::new_proof_of_work(0x2000_ffff);
        assert!(hard.get_target() < easy.get_target());
    }

    #[test]
    fn test_hash_to_int() {
        assert_eq!(ProofOfWork::hash_to_int("00ff").unwrap(), BigInt::from(255));
        assert!(ProofOfWork::hash_to_int("zz").is_err());
    }

    #[test]
    fn test_run_finds_hash_below_target() {
        let pow = ProofOfWork::new_proof_of_work(DEFAULT_DIFFICULTY_BITS);
        let (header, hash) = pow
            .run(template(DEFAULT_DIFFICULTY_BITS), TimestampPolicy::Fixed, None)
            .unwrap();

        assert_eq!(header.block_hash(), hash);
        assert!(ProofOfWork::hash_to_int(&hash).unwrap() < *pow.get_target());
        assert_eq!(header.get_timestamp(), 1_532_584_390);
    }

    #[test]
    fn test_run_is_deterministic_with_fixed_timestamp() {
        let pow = ProofOfWork::new_proof_of_work(0x2000_ffff);
        let first = pow
            .run(template(0x2000_ffff), TimestampPolicy::Fixed, None)
            .unwrap();
        let second = pow
            .run(template(0x2000_ffff), TimestampPolicy::Fixed, None)
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_run_gives_up_at_max_nonce() {
        let pow = ProofOfWork::new_proof_of_work(UNREACHABLE_BITS);
        let result = pow.run(template(UNREACHABLE_BITS), TimestampPolicy::Recapture, Some(5));
        assert!(matches!(result, Err(BlockchainError::Mining(_))));
    }

    #[test]
    fn test_validate() {
        let pow = ProofOfWork::new_proof_of_work(DEFAULT_DIFFICULTY_BITS);
        let (header, hash) = pow
            .run(template(DEFAULT_DIFFICULTY_BITS), TimestampPolicy::Fixed, None)
            .unwrap();
        let txs = vec![Transaction::new_coinbase("miner", 50.0, TRANSACTION_VERSION)];

        let valid = Block::new(1, header.clone(), txs.clone(), hash);
        assert!(ProofOfWork::validate(&valid));

        let wrong_hash = Block::new(1, header, txs, "00".repeat(32));
        assert!(!ProofOfWork::validate(&wrong_hash));
    }
}
