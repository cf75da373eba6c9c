//! Syntactic validation of a transaction essence.
//!
//! Everything that can be decided by looking at the essence alone, without
//! ledger state. The checks run from cheapest to most expensive and the
//! first failure is returned.

use tracing::{debug, warn};

use super::essence::{check_payload_kind, TransactionEssence, INPUTS_RULES, OUTPUTS_RULES};
use crate::config::{ProtocolParameters, MAX_NATIVE_TOKENS_PER_ESSENCE, MAX_OUTPUT_INDEX};
use crate::error::{DepositViolation, Error, Result};
use crate::input::Input;
use crate::output::Output;
use crate::payload::Payload;

impl TransactionEssence {
    /// Runs every syntactic rule over the essence.
    ///
    /// 1. Input count, kinds and UTXO uniqueness.
    /// 2. Output count and kinds.
    /// 3. The payload, if any, is well-formed tagged data.
    /// 4. Every UTXO input index is at most 126.
    /// 5. Per output, in order: array structure, deposits against supply
    ///    and rent, native token amounts and the per-essence token limit,
    ///    then the output kind's own legality rules.
    pub fn syntactic_validate(&self, params: &ProtocolParameters) -> Result<()> {
        let result = self.run_syntactic_checks(params);
        match &result {
            Ok(()) => debug!(
                inputs = self.inputs().len(),
                outputs = self.outputs().len(),
                "essence passed syntactic validation"
            ),
            Err(e) => warn!(error = %e, "essence failed syntactic validation"),
        }
        result
    }

    fn run_syntactic_checks(&self, params: &ProtocolParameters) -> Result<()> {
        // 1. Inputs.
        INPUTS_RULES.validate(self.inputs())?;

        // 2. Outputs.
        OUTPUTS_RULES.validate(self.outputs())?;

        // 3. Payload.
        if let Some(payload) = self.payload() {
            check_payload_kind(payload)?;
            if let Payload::TaggedData(tagged) = payload {
                tagged.validate()?;
            }
        }

        // 4. Input indices.
        for (position, input) in self.inputs().iter().enumerate() {
            if let Input::Utxo(utxo) = input {
                if utxo.index() > MAX_OUTPUT_INDEX {
                    return Err(Error::OutputIndexOutOfBounds {
                        position,
                        index: utxo.index(),
                        max: MAX_OUTPUT_INDEX,
                    });
                }
            }
        }

        // 5. Outputs, one by one.
        let mut deposits = DepositTally::new(params);
        let mut native_token_count = 0usize;
        for (position, output) in self.outputs().iter().enumerate() {
            output.check_structure()?;
            deposits.check(position, output)?;

            for token in output.native_tokens() {
                if token.amount.is_zero() {
                    return Err(DepositViolation::ZeroNativeTokenAmount { output: position }.into());
                }
            }
            native_token_count += output.native_tokens().len();
            if native_token_count > MAX_NATIVE_TOKENS_PER_ESSENCE {
                return Err(Error::CountOutOfBounds {
                    context: "essence native tokens",
                    count: native_token_count,
                    min: 0,
                    max: MAX_NATIVE_TOKENS_PER_ESSENCE,
                });
            }

            output.validate(position)?;
        }

        Ok(())
    }
}

/// Running sum of output deposits, checked against supply and rent.
struct DepositTally<'a> {
    params: &'a ProtocolParameters,
    min_dust: u64,
    sum: u128,
}

impl<'a> DepositTally<'a> {
    fn new(params: &'a ProtocolParameters) -> Self {
        Self {
            params,
            min_dust: params.rent_structure.min_dust_deposit(),
            sum: 0,
        }
    }

    fn check(&mut self, position: usize, output: &Output) -> Result<()> {
        let amount = output.amount();
        let supply = self.params.token_supply;

        if amount == 0 {
            return Err(DepositViolation::ZeroAmount { output: position }.into());
        }
        if amount > supply {
            return Err(DepositViolation::ExceedsTotalSupply { output: position, amount }.into());
        }

        self.sum += amount as u128;
        if self.sum > supply as u128 {
            return Err(DepositViolation::SumExceedsTotalSupply { sum: self.sum, supply }.into());
        }

        let rent = self.params.rent_structure.rent_cost(output)?;
        if amount < rent {
            return Err(DepositViolation::BelowRent {
                output: position,
                amount,
                required: rent,
            }
            .into());
        }

        if let Some(returned) = output.dust_deposit_return() {
            if returned < self.min_dust {
                return Err(DepositViolation::ReturnBelowMinDust {
                    output: position,
                    amount: returned,
                    min: self.min_dust,
                }
                .into());
            }
            if returned > rent {
                return Err(DepositViolation::ReturnAboveRent {
                    output: position,
                    amount: returned,
                    max: rent,
                }
                .into());
            }
        }

        Ok(())
    }
}
