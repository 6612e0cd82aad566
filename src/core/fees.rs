use crate::core::monetary::Amount;
use crate::core::Transaction;
use log::debug;

/// Fee accounting for a mined batch: every transaction's fee goes to the
/// miner on top of a fixed block reward.
#[derive(Debug, Clone)]
pub struct FeeCalculator {
    /// Base coinbase reward in raw units
    pub block_reward: Amount,
}

impl FeeCalculator {
    pub fn new(block_reward: Amount) -> Self {
        Self { block_reward }
    }

    /// Sum of `input_amount - output_amount` over the batch
    pub fn calculate_total_fees<'a, I>(transactions: I) -> Amount
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let total: Amount = transactions.into_iter().map(Transaction::get_fee).sum();
        debug!("Collected {total} in fees");
        total
    }

    /// Calculate coinbase reward with collected fees
    pub fn calculate_coinbase_reward(&self, collected_fees: Amount) -> Amount {
        self.block_reward + collected_fees
    }
}
