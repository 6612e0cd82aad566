// The miner owns the chain and the pending pool. It drains the pool in
// batches, pays itself a coinbase, finds a nonce for each batch and appends
// the resulting block.

use crate::config::MinerConfig;
use crate::core::block::Header;
use crate::core::monetary::Amount;
use crate::core::{Block, Blockchain, FeeCalculator, MerkleTree, ProofOfWork, Transaction};
use crate::error::{BlockchainError, Result};
use crate::storage::MempoolQueue;
use log::{error, info, warn};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};

/// What `mine` reports for each block it appends
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MinedBlock {
    pub height: usize,
    pub nonce: u64,
    pub hash: String,
    pub transaction_count: usize,
    pub total_fees: Amount,
}

pub struct Miner {
    chain: Blockchain,
    pool: MempoolQueue,
    config: MinerConfig,
    pow: ProofOfWork,
    fees: FeeCalculator,
}

impl Miner {
    /// A miner over a fresh chain holding only the genesis block
    pub fn new(config: MinerConfig) -> Result<Miner> {
        config.validate()?;
        let chain = Blockchain::new_blockchain(config.difficulty_bits, config.version)?;
        Ok(Miner {
            chain,
            pool: MempoolQueue::new(),
            pow: ProofOfWork::new_proof_of_work(config.difficulty_bits),
            fees: FeeCalculator::new(config.block_reward),
            config,
        })
    }

    /// Queue a transfer for the next block and return its hash.
    /// No balance or signature checks are made.
    pub fn submit_transaction(
        &mut self,
        sender: &str,
        recipient: &str,
        amount: Amount,
        output_amount: Amount,
    ) -> String {
        let tx = Transaction::new_transfer(
            sender,
            recipient,
            amount,
            output_amount,
            self.config.version,
        );
        let hash = tx.get_hash().to_string();
        self.pool.push(tx);
        hash
    }

    /// Drain the pool into as many blocks as it takes.
    ///
    /// Without a `max_nonce` in the config every nonce search runs until it
    /// succeeds, however long that takes. With one, a failed search returns
    /// [`BlockchainError::Mining`] and puts that batch back at the head of
    /// the pool; blocks mined before it stay on the chain.
    pub fn mine(&mut self) -> Result<Vec<MinedBlock>> {
        let mut mined = Vec::new();
        while !self.pool.is_empty() {
            let batch = self.select_batch()?;
            mined.push(self.mine_batch(batch)?);
        }
        Ok(mined)
    }

    // A full block leaves one slot for the coinbase
    fn select_batch(&mut self) -> Result<Vec<Transaction>> {
        let max = self.config.max_transactions_per_block;
        let available = self.pool.len();
        let take = if available >= max { max - 1 } else { available };
        info!("Selected {take} of {available} pending transactions");
        self.pool.pop_front(take)
    }

    fn mine_batch(&mut self, batch: Vec<Transaction>) -> Result<MinedBlock> {
        let total_fees = FeeCalculator::calculate_total_fees(&batch);
        let reward = self.fees.calculate_coinbase_reward(total_fees);
        let coinbase =
            Transaction::new_coinbase(&self.config.miner_address, reward, self.config.version);

        let mut transactions = Vec::with_capacity(batch.len() + 1);
        transactions.push(coinbase);
        transactions.extend(batch);

        let (header, hash) = match self.solve(&transactions) {
            Ok(solution) => solution,
            Err(e) => {
                warn!("Returning {} transactions to the pool: {e}", transactions.len() - 1);
                transactions.remove(0);
                self.pool.requeue_front(transactions);
                return Err(e);
            }
        };

        let height = self.chain.len();
        let nonce = header.get_nonce();
        let block = Block::new(height, header, transactions, hash.clone());
        let transaction_count = block.get_transaction_count();
        self.chain.add_block(block);
        info!("Mined block at height {height} with nonce {nonce}: {hash} (fees: {total_fees})");

        Ok(MinedBlock {
            height,
            nonce,
            hash,
            transaction_count,
            total_fees,
        })
    }

    fn solve(&self, transactions: &[Transaction]) -> Result<(Header, String)> {
        let merkle_root = MerkleTree::from_transactions(transactions)?;
        let mut header = Header::new(
            self.chain.get_tip_hash(),
            &merkle_root,
            0,
            self.config.difficulty_bits,
        )?;
        header.set_version(self.config.version);
        self.pow
            .run(header, self.config.timestamp_policy, self.config.max_nonce)
    }

    pub fn get_chain_length(&self) -> usize {
        self.chain.len()
    }

    pub fn get_last_block(&self) -> &Block {
        self.chain.last_block()
    }

    pub fn get_block(&self, height: Option<usize>, hash: Option<&str>) -> Option<&Block> {
        self.chain.get_block(height, hash)
    }

    pub fn get_transaction(&self, hash: &str) -> Option<&Transaction> {
        self.chain.find_transaction(hash)
    }

    pub fn pending_count(&self) -> usize {
        self.pool.len()
    }

    pub fn get_chain(&self) -> &Blockchain {
        &self.chain
    }

    pub fn get_pool(&self) -> &MempoolQueue {
        &self.pool
    }

    pub fn get_config(&self) -> &MinerConfig {
        &self.config
    }
}

/// A miner shared between callers. Every operation takes the one lock, so
/// submissions and appends are serialized and FIFO order holds.
#[derive(Clone)]
pub struct SharedMiner {
    inner: Arc<Mutex<Miner>>,
}

impl SharedMiner {
    pub fn new(miner: Miner) -> SharedMiner {
        SharedMiner {
            inner: Arc::new(Mutex::new(miner)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Miner>> {
        self.inner.lock().map_err(|_| {
            error!("Failed to acquire lock on miner");
            BlockchainError::Lock("miner lock poisoned".to_string())
        })
    }

    pub fn submit_transaction(
        &self,
        sender: &str,
        recipient: &str,
        amount: Amount,
        output_amount: Amount,
    ) -> Result<String> {
        Ok(self
            .lock()?
            .submit_transaction(sender, recipient, amount, output_amount))
    }

    pub fn mine(&self) -> Result<Vec<MinedBlock>> {
        self.lock()?.mine()
    }

    pub fn get_chain_length(&self) -> Result<usize> {
        Ok(self.lock()?.get_chain_length())
    }

    pub fn get_last_block(&self) -> Result<Block> {
        Ok(self.lock()?.get_last_block().clone())
    }

    pub fn get_block(&self, height: Option<usize>, hash: Option<&str>) -> Result<Option<Block>> {
        Ok(self.lock()?.get_block(height, hash).cloned())
    }

    pub fn get_transaction(&self, hash: &str) -> Result<Option<Transaction>> {
        Ok(self.lock()?.get_transaction(hash).cloned())
    }

    pub fn pending_count(&self) -> Result<usize> {
        Ok(self.lock()?.pending_count())
    }
}
