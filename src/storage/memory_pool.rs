use crate::core::Transaction;
use crate::error::{BlockchainError, Result};
use std::collections::VecDeque;

/// FIFO of submitted transactions waiting for a block
#[derive(Debug, Default)]
pub struct MempoolQueue {
    inner: VecDeque<Transaction>,
}

impl MempoolQueue {
    pub fn new() -> MempoolQueue {
        MempoolQueue {
            inner: VecDeque::new(),
        }
    }

    pub fn push(&mut self, tx: Transaction) {
        self.inner.push_back(tx);
    }

    /// Remove and return the first `n` transactions in submission order.
    /// Asking for more than the pool holds is an error; nothing is removed.
    pub fn pop_front(&mut self, n: usize) -> Result<Vec<Transaction>> {
        if n > self.inner.len() {
            return Err(BlockchainError::InsufficientPool {
                requested: n,
                available: self.inner.len(),
            });
        }
        Ok(self.inner.drain(..n).collect())
    }

    /// Put a batch back at the head of the queue, keeping its order
    pub fn requeue_front(&mut self, batch: Vec<Transaction>) {
        for tx in batch.into_iter().rev() {
            self.inner.push_front(tx);
        }
    }

    pub fn peek(&self) -> Option<&Transaction> {
        self.inner.front()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transaction> {
        self.inner.iter()
    }
}
