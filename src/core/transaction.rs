// Transactions are immutable once built and addressed by a hash computed at
// construction time. The ledger does no balance or signature checks, so a
// transaction is just the amounts and labels the caller submitted.

use crate::core::monetary::{conversions::subunits_to_coins, Amount};
use crate::utils::{canonical_preimage, text_hash};
use data_encoding::HEXLOWER;
use serde::{Deserialize, Serialize};

/// Script attached to every output; the ledger never interprets it
pub const DEFAULT_SCRIPT: &[u8] = b"pay-to-recipient";

/// Default transaction version
pub const TRANSACTION_VERSION: u32 = 1;

// The single output of a transaction. `value` is in display units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, bincode::Encode, bincode::Decode)]
pub struct TXOutput {
    value: Amount,
    index: u32,
    script: Vec<u8>,
}

impl TXOutput {
    /// `raw_value` is in subunits and is stored divided by 1000
    pub fn new(raw_value: Amount, index: u32, script: &[u8]) -> TXOutput {
        TXOutput {
            value: subunits_to_coins(raw_value),
            index,
            script: script.to_vec(),
        }
    }

    pub fn get_value(&self) -> Amount {
        self.value
    }

    pub fn get_index(&self) -> u32 {
        self.index
    }

    pub fn get_script(&self) -> &[u8] {
        self.script.as_slice()
    }

    fn preimage(&self) -> String {
        canonical_preimage(&[
            self.value.to_string(),
            self.index.to_string(),
            HEXLOWER.encode(&self.script),
        ])
    }
}

// The input side of a transaction: who pays whom and how much.
// A coinbase has no sender and no input amount.
#[derive(
    Debug, Clone, Default, PartialEq, Serialize, Deserialize, bincode::Encode, bincode::Decode,
)]
pub struct TXInputs {
    sender: Option<String>,
    recipient: Option<String>,
    input_amount: Option<Amount>,
    output_amount: Amount,
}

impl TXInputs {
    pub fn transfer(
        sender: &str,
        recipient: &str,
        input_amount: Amount,
        output_amount: Amount,
    ) -> TXInputs {
        TXInputs {
            sender: Some(sender.to_string()),
            recipient: Some(recipient.to_string()),
            input_amount: Some(input_amount),
            output_amount,
        }
    }

    pub fn reward(recipient: &str, output_amount: Amount) -> TXInputs {
        TXInputs {
            recipient: Some(recipient.to_string()),
            output_amount,
            ..Default::default()
        }
    }

    pub fn get_sender(&self) -> Option<&str> {
        self.sender.as_deref()
    }

    pub fn get_recipient(&self) -> Option<&str> {
        self.recipient.as_deref()
    }

    pub fn get_input_amount(&self) -> Option<Amount> {
        self.input_amount
    }

    pub fn get_output_amount(&self) -> Amount {
        self.output_amount
    }

    // Present fields only, each tagged with its key so that a missing
    // sender cannot be confused with a missing recipient.
    fn preimage(&self) -> String {
        let mut fields = Vec::new();
        if let Some(sender) = &self.sender {
            fields.push("sender".to_string());
            fields.push(sender.clone());
        }
        if let Some(recipient) = &self.recipient {
            fields.push("recipient".to_string());
            fields.push(recipient.clone());
        }
        if let Some(amount) = self.input_amount {
            fields.push("input_amount".to_string());
            fields.push(amount.to_string());
        }
        fields.push("output_amount".to_string());
        fields.push(self.output_amount.to_string());
        canonical_preimage(fields.as_slice())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, bincode::Encode, bincode::Decode)]
pub struct Transaction {
    version: u32,
    inputs: TXInputs,
    output: TXOutput,
    in_counter: u32,
    out_counter: u32,
    hash: String,
}

impl Transaction {
    pub fn new(inputs: TXInputs, in_counter: u32, version: u32) -> Transaction {
        let output = TXOutput::new(inputs.get_output_amount(), 1, DEFAULT_SCRIPT);
        let mut tx = Transaction {
            version,
            inputs,
            output,
            in_counter,
            out_counter: 1,
            hash: String::new(),
        };
        tx.hash = tx.calculate_hash();
        tx
    }

    /// A transfer between two parties; `input_amount - output_amount` is the fee
    pub fn new_transfer(
        sender: &str,
        recipient: &str,
        input_amount: Amount,
        output_amount: Amount,
        version: u32,
    ) -> Transaction {
        let inputs = TXInputs::transfer(sender, recipient, input_amount, output_amount);
        Self::new(inputs, 1, version)
    }

    /// The reward transaction placed first in every mined block
    pub fn new_coinbase(recipient: &str, reward: Amount, version: u32) -> Transaction {
        Self::new(TXInputs::reward(recipient, reward), 1, version)
    }

    /// The zero-value coinbase of block 0
    pub fn new_genesis_coinbase(version: u32) -> Transaction {
        let inputs = TXInputs {
            output_amount: 0.0,
            ..Default::default()
        };
        Self::new(inputs, 1, version)
    }

    fn calculate_hash(&self) -> String {
        let preimage = canonical_preimage(&[
            self.version.to_string(),
            self.inputs.preimage(),
            self.output.preimage(),
            self.in_counter.to_string(),
            self.out_counter.to_string(),
        ]);
        text_hash(&preimage)
    }

    pub fn get_hash(&self) -> &str {
        self.hash.as_str()
    }

    pub fn get_version(&self) -> u32 {
        self.version
    }

    pub fn get_inputs(&self) -> &TXInputs {
        &self.inputs
    }

    pub fn get_output(&self) -> &TXOutput {
        &self.output
    }

    pub fn get_in_counter(&self) -> u32 {
        self.in_counter
    }

    pub fn get_out_counter(&self) -> u32 {
        self.out_counter
    }

    pub fn is_coinbase(&self) -> bool {
        self.inputs.sender.is_none() && self.inputs.input_amount.is_none()
    }

    /// Raw-unit fee; zero for a coinbase
    pub fn get_fee(&self) -> Amount {
        match self.inputs.input_amount {
            Some(input) => input - self.inputs.output_amount,
            None => 0.0,
        }
    }

    /// Recompute the hash from the fields and compare with the stored one
    pub fn verify_hash(&self) -> bool {
        self.calculate_hash() == self.hash
    }
}
