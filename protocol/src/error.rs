//! Error types for decoding, validation and signing.
//!
//! Every failure in this crate is a local data error: the bytes were bad,
//! the JSON was bad, or the value breaks a ledger rule. None of them are
//! transient, so nothing here is worth retrying. Callers decide whether to
//! ask the node again.

use thiserror::Error;

use crate::registry::Category;
use crate::signer::SignerError;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the codec, the array rule engine and syntactic
/// validation.
///
/// Malformed input (`Truncated`, `Malformed`, `TrailingBytes`, `TooLong`,
/// `InvalidJson`) is kept apart from well-formed-but-illegal values
/// (`SupplyOrDepositInvariantViolated`, `CyclicAddress`, ...), so callers can
/// tell a broken node response from a rejected transaction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A type discriminant that no registry entry claims.
    #[error("unknown {category} type code {code}")]
    UnknownTypeCode { category: Category, code: u32 },

    /// The buffer ended before the field was complete.
    #[error("truncated {context}: needed {needed} bytes, {remaining} remaining")]
    Truncated {
        context: &'static str,
        needed: usize,
        remaining: usize,
    },

    /// The bytes are present but not a canonical encoding.
    #[error("malformed {context}: {reason}")]
    Malformed {
        context: &'static str,
        reason: String,
    },

    /// A top-level decode finished with unread bytes left over.
    #[error("{0} trailing bytes after decoding")]
    TrailingBytes(usize),

    /// A variable-length field exceeds its limit (or its length prefix).
    #[error("{context} is too long: {len} > {max}")]
    TooLong {
        context: &'static str,
        len: usize,
        max: usize,
    },

    /// JSON that does not fit the expected shadow shape.
    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    /// An address string that is not valid Bech32 or carries a bad payload.
    #[error("invalid bech32 address: {0}")]
    InvalidBech32(String),

    /// A variant appeared where a different one is required.
    #[error("type mismatch in {context}: got type code {actual}")]
    TypeMismatch { context: &'static str, actual: u32 },

    /// A sequence is shorter or longer than its rules allow.
    #[error("{context} count {count} outside bounds [{min}, {max}]")]
    CountOutOfBounds {
        context: &'static str,
        count: usize,
        min: usize,
        max: usize,
    },

    /// Two elements of a sequence are equivalent under its uniqueness rule.
    #[error("duplicate {context} at position {position}")]
    DuplicateReference {
        context: &'static str,
        position: usize,
    },

    /// Elements of a sequence are not in strictly ascending type order.
    #[error("{context} at position {position} breaks ascending type order")]
    OrderViolation {
        context: &'static str,
        position: usize,
    },

    /// A UTXO input references an output index outside the allowed range.
    #[error("input {position} references output index {index}, max is {max}")]
    OutputIndexOutOfBounds { position: usize, index: u16, max: u16 },

    /// Amount, supply or deposit arithmetic does not add up.
    #[error("supply or deposit invariant violated: {0}")]
    SupplyOrDepositInvariantViolated(DepositViolation),

    /// An output's governing address is derived from the output's own id.
    #[error("{kind} output {output} is controlled by the address derived from its own id")]
    CyclicAddress { kind: &'static str, output: usize },

    /// An alias output with a zeroed id carries state.
    #[error("alias output {output} has a zeroed alias id but non-empty state")]
    NonEmptyAliasState { output: usize },

    /// An output lacks an unlock condition its kind requires.
    #[error("output {output} is missing its {condition} unlock condition")]
    MissingUnlockCondition {
        output: usize,
        condition: &'static str,
    },

    /// A feature block carries a value that can never be satisfied.
    #[error("invalid feature block in output {output}: {reason}")]
    InvalidFeatureBlock {
        output: usize,
        reason: &'static str,
    },

    /// Signing or signature verification failed.
    #[error(transparent)]
    Signer(#[from] SignerError),
}

/// The specific arithmetic rule an output set broke.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DepositViolation {
    #[error("output {output} deposits zero")]
    ZeroAmount { output: usize },

    #[error("output {output} deposits {amount}, more than the total supply")]
    ExceedsTotalSupply { output: usize, amount: u64 },

    #[error("outputs deposit {sum} in total, more than the total supply {supply}")]
    SumExceedsTotalSupply { sum: u128, supply: u64 },

    #[error("output {output} deposits {amount}, below its rent of {required}")]
    BelowRent {
        output: usize,
        amount: u64,
        required: u64,
    },

    #[error("output {output} returns {amount}, below the minimum dust deposit {min}")]
    ReturnBelowMinDust { output: usize, amount: u64, min: u64 },

    #[error("output {output} returns {amount}, above its rent of {max}")]
    ReturnAboveRent { output: usize, amount: u64, max: u64 },

    #[error("output {output} carries a native token with zero amount")]
    ZeroNativeTokenAmount { output: usize },

    #[error("foundry output {output} has a zero maximum supply")]
    ZeroMaximumSupply { output: usize },

    #[error("foundry output {output} circulates more than its maximum supply")]
    CirculatingExceedsMaximum { output: usize },
}

impl From<DepositViolation> for Error {
    fn from(v: DepositViolation) -> Self {
        Error::SupplyOrDepositInvariantViolated(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_carries_context() {
        let e = Error::UnknownTypeCode {
            category: Category::Output,
            code: 42,
        };
        assert_eq!(e.to_string(), "unknown output type code 42");

        let e = Error::CountOutOfBounds {
            context: "essence inputs",
            count: 0,
            min: 1,
            max: 127,
        };
        assert!(e.to_string().contains("[1, 127]"));
    }

    #[test]
    fn deposit_violation_converts() {
        let e: Error = DepositViolation::ZeroAmount { output: 3 }.into();
        assert!(matches!(
            e,
            Error::SupplyOrDepositInvariantViolated(DepositViolation::ZeroAmount { output: 3 })
        ));
        assert!(e.to_string().contains("output 3 deposits zero"));
    }

    #[test]
    fn signer_error_is_transparent() {
        let e: Error = SignerError::UnsupportedSignatureScheme.into();
        assert_eq!(e.to_string(), SignerError::UnsupportedSignatureScheme.to_string());
    }
}
