//! Blockchain integration tests
//!
//! Drives the miner through its public API only: submit, mine, query, and
//! check that what lands on the chain hangs together.

use megalonia_chain::core::GENESIS_SENTINEL_HASH;
use megalonia_chain::{
    text_hash, Block, BlockchainError, MerkleTree, Miner, MinerConfig, ProofOfWork, SharedMiner,
    TimestampPolicy,
};
use std::io::Write;
use tempfile::NamedTempFile;

fn default_miner() -> Miner {
    Miner::new(MinerConfig::default()).unwrap()
}

#[test]
fn test_mine_three_transfers() {
    let mut miner = default_miner();
    assert_eq!(miner.get_chain_length(), 1);
    let genesis_hash = miner.get_last_block().get_hash().to_string();

    let submitted = vec![
        miner.submit_transaction("Goku", "Vegeta", 10.0, 9.0),
        miner.submit_transaction("Vegeta", "Piccolo", 20.0, 18.0),
        miner.submit_transaction("Piccolo", "Goku", 30.0, 27.0),
    ];

    let reports = miner.mine().unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(miner.get_chain_length(), 2);
    assert_eq!(miner.pending_count(), 0);

    let block = miner.get_block(Some(1), None).unwrap();
    assert_eq!(block.get_transaction_count(), 4);
    assert_eq!(block.get_pre_block_hash(), genesis_hash);
    assert!(block.get_transactions()[0].is_coinbase());

    let mined: Vec<&str> = block.get_transactions()[1..]
        .iter()
        .map(|tx| tx.get_hash())
        .collect();
    assert_eq!(mined, submitted);

    // The stored hash is the header hash and sits below the target
    let pow = ProofOfWork::new_proof_of_work(block.get_header().get_bits());
    let value = ProofOfWork::hash_to_int(block.get_hash()).unwrap();
    assert!(&value < pow.get_target());
    assert_eq!(block.get_header().block_hash(), block.get_hash());
    assert!(ProofOfWork::validate(block));
    assert!(block.verify_merkle_root().unwrap());
}

#[test]
fn test_coinbase_collects_reward_and_fees() {
    let mut miner = default_miner();
    miner.submit_transaction("Sandy", "Patrick", 100.0, 95.0);
    miner.submit_transaction("Gary", "Plankton", 20.0, 18.0);

    let reports = miner.mine().unwrap();
    assert_eq!(reports[0].total_fees, 7.0);

    let coinbase = &miner.get_last_block().get_transactions()[0];
    assert_eq!(coinbase.get_inputs().get_recipient(), Some("miner's address"));
    assert_eq!(coinbase.get_inputs().get_output_amount(), 57.0);
    assert!((coinbase.get_output().get_value() - 0.057).abs() < 1e-12);
}

#[test]
fn test_many_blocks_link_up() {
    let mut miner = default_miner();
    for i in 0..40u32 {
        let amount = f64::from(i + 2);
        miner.submit_transaction("Goku", "Frieza", amount, amount - 1.0);
    }

    let reports = miner.mine().unwrap();
    let counts: Vec<usize> = reports.iter().map(|r| r.transaction_count).collect();
    assert_eq!(counts, vec![10, 10, 10, 10, 5]);

    let chain = miner.get_chain();
    assert_eq!(chain.get_best_height(), 5);
    chain.verify_chain().unwrap();

    let blocks: Vec<&Block> = chain.iter().collect();
    for pair in blocks.windows(2) {
        assert_eq!(pair[1].get_pre_block_hash(), pair[0].get_hash());
        assert_eq!(pair[1].get_index(), pair[0].get_index() + 1);
    }
    assert_eq!(blocks[0].get_pre_block_hash(), GENESIS_SENTINEL_HASH);
}

#[test]
fn test_transactions_are_findable_after_mining() {
    let mut miner = default_miner();
    let hash = miner.submit_transaction("Kami", "Beerus", 12.0, 11.5);
    assert!(miner.get_transaction(&hash).is_none());

    miner.mine().unwrap();

    let tx = miner.get_transaction(&hash).unwrap();
    assert_eq!(tx.get_inputs().get_sender(), Some("Kami"));
    assert_eq!(tx.get_fee(), 0.5);
    assert!(tx.verify_hash());

    let tip_hash = miner.get_last_block().get_hash().to_string();
    let by_hash = miner.get_block(None, Some(&tip_hash)).unwrap();
    assert_eq!(by_hash.get_index(), 1);
}

#[test]
fn test_block_roundtrips_through_bincode() {
    let mut miner = default_miner();
    miner.submit_transaction("Squidward", "Spongebob", 5.0, 4.0);
    miner.mine().unwrap();

    let block = miner.get_last_block();
    let bytes = block.serialize().unwrap();
    assert_eq!(bytes.len(), block.size().unwrap());

    let decoded = Block::deserialize(&bytes).unwrap();
    assert_eq!(&decoded, block);
    assert!(ProofOfWork::validate(&decoded));
}

#[test]
fn test_merkle_root_of_block_matches_transactions() {
    let mut miner = default_miner();
    for i in 0..4u32 {
        miner.submit_transaction("Vegeta", "Goku", f64::from(i + 1), 0.5);
    }
    miner.mine().unwrap();

    let block = miner.get_last_block();
    let root = MerkleTree::from_transactions(block.get_transactions()).unwrap();
    assert_eq!(root, block.get_header().get_merkle_root());
}

#[test]
fn test_miner_from_config_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
block_reward = 25.0
max_transactions_per_block = 3
difficulty_bits = 0x207fffff
miner_address = "Beerus"
timestamp_policy = "recapture"
"#
    )
    .unwrap();

    let config = MinerConfig::load(file.path()).unwrap();
    assert_eq!(config.timestamp_policy, TimestampPolicy::Recapture);

    let mut miner = Miner::new(config).unwrap();
    for _ in 0..5 {
        miner.submit_transaction("Goku", "Vegeta", 2.0, 1.0);
    }
    let counts: Vec<usize> = miner
        .mine()
        .unwrap()
        .iter()
        .map(|r| r.transaction_count)
        .collect();
    assert_eq!(counts, vec![3, 3, 2]);

    let coinbase = &miner.get_last_block().get_transactions()[0];
    assert_eq!(coinbase.get_inputs().get_recipient(), Some("Beerus"));
    assert_eq!(coinbase.get_inputs().get_output_amount(), 26.0);
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = MinerConfig {
        max_transactions_per_block: 1,
        ..MinerConfig::default()
    };
    assert!(matches!(Miner::new(config), Err(BlockchainError::Config(_))));
}

#[test]
fn test_shared_miner_across_threads() {
    let shared = SharedMiner::new(default_miner());
    let handles: Vec<_> = (0..3u32)
        .map(|t| {
            let miner = shared.clone();
            std::thread::spawn(move || {
                for i in 0..5u32 {
                    let amount = f64::from(t * 10 + i + 2);
                    miner
                        .submit_transaction("Frieza", "Piccolo", amount, amount - 1.0)
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(shared.pending_count().unwrap(), 15);
    shared.mine().unwrap();
    assert_eq!(shared.pending_count().unwrap(), 0);
    assert_eq!(shared.get_chain_length().unwrap(), 3);
}

#[test]
fn test_text_hash_is_hash_of_hex() {
    // sha256("abc") in hex, hashed again as text
    let first = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";
    assert_eq!(text_hash("abc"), text_hash_of_hex(first));
}

fn text_hash_of_hex(hex: &str) -> String {
    use megalonia_chain::sha256_digest;
    data_encoding::HEXLOWER.encode(&sha256_digest(hex.as_bytes()))
}
