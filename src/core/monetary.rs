/// Ledger monetary system
///
/// One coin subdivides into one thousand subunits. Amounts submitted to the
/// ledger are raw subunit counts; outputs store them in display units.
///
/// Amounts are `f64` because fees may be fractional subunits.
pub type Amount = f64;

/// Number of subunits in one coin
pub const SUBUNITS_PER_COIN: u64 = 1_000;

/// Default block reward (raw units) paid by each coinbase
pub const DEFAULT_BLOCK_REWARD: Amount = 50.0;

/// Fixed marker carried by every block
pub const MAGIC_NUMBER: u32 = 0xD9B4_BEF9;

/// Previous-hash and Merkle-root sentinel of the genesis header
pub const GENESIS_SENTINEL_HASH: &str = "0000000000000000";

/// Utility functions for monetary conversions
pub mod conversions {
    use super::*;

    /// Convert raw subunits to display units
    pub fn subunits_to_coins(subunits: Amount) -> Amount {
        subunits / SUBUNITS_PER_COIN as Amount
    }

    /// Convert display units to raw subunits
    pub fn coins_to_subunits(coins: Amount) -> Amount {
        coins * SUBUNITS_PER_COIN as Amount
    }

    /// Format raw subunits as a human-readable string
    pub fn format_subunits(subunits: Amount) -> String {
        format!("{:.6} coins", subunits_to_coins(subunits))
    }
}
