//! Test utilities for ledger testing

use crate::config::MinerConfig;
use crate::core::Miner;

/// Names the sample transfers are drawn from
pub const TEST_NAMES: [&str; 6] = [
    "Spongebob",
    "Patrick",
    "Squidward",
    "Plankton",
    "Sandy",
    "Gary",
];

/// A miner with default settings over a fresh chain
pub fn create_test_miner() -> Miner {
    create_test_miner_with(MinerConfig::default())
}

pub fn create_test_miner_with(config: MinerConfig) -> Miner {
    Miner::new(config).expect("test miner should build")
}

/// Submit `count` distinct transfers with a fee of 1 each and return their
/// hashes in submission order
pub fn submit_transfers(miner: &mut Miner, count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            let sender = TEST_NAMES[i % TEST_NAMES.len()];
            let recipient = TEST_NAMES[(i + 1) % TEST_NAMES.len()];
            let amount = (i + 2) as f64;
            miner.submit_transaction(sender, recipient, amount, amount - 1.0)
        })
        .collect()
}
