//! Fluent construction of a [`TransactionEssence`].
//!
//! The builder only collects parts. Nothing is checked until `build()`,
//! which hands everything to [`TransactionEssence::assemble`], so a built
//! essence is always syntactically valid.

use super::essence::TransactionEssence;
use crate::config::ProtocolParameters;
use crate::error::Result;
use crate::input::{Input, TransactionId, UtxoInput};
use crate::output::Output;
use crate::payload::{Payload, TaggedData};

/// Collects inputs, outputs and an optional payload for an essence.
#[derive(Debug, Clone, Default)]
pub struct TransactionEssenceBuilder {
    inputs: Vec<Input>,
    outputs: Vec<Output>,
    payload: Option<Payload>,
}

impl TransactionEssenceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_input(mut self, input: impl Into<Input>) -> Self {
        self.inputs.push(input.into());
        self
    }

    /// Shorthand for consuming output `index` of `transaction_id`.
    pub fn add_utxo(self, transaction_id: TransactionId, index: u16) -> Self {
        self.add_input(UtxoInput::new(transaction_id, index))
    }

    pub fn add_output(mut self, output: impl Into<Output>) -> Self {
        self.outputs.push(output.into());
        self
    }

    /// Replaces any payload set earlier.
    pub fn with_payload(mut self, payload: impl Into<Payload>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    pub fn with_tagged_data(self, tag: impl Into<Vec<u8>>, data: impl Into<Vec<u8>>) -> Self {
        self.with_payload(TaggedData::new(tag, data))
    }

    /// Assembles under the default protocol parameters.
    pub fn build(self) -> Result<TransactionEssence> {
        self.build_with(&ProtocolParameters::default())
    }

    pub fn build_with(self, params: &ProtocolParameters) -> Result<TransactionEssence> {
        TransactionEssence::assemble(self.inputs, self.outputs, self.payload, params)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
