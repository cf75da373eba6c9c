//! The basic output: tokens locked to an address, with optional extras.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::feature_block::FeatureBlock;
use super::native_token::{NativeToken, NATIVE_TOKENS_RULES};
use super::unlock_condition::UnlockCondition;
use crate::codec::array::{decode_array, encode_array};
use crate::codec::json::{self, JsonCodec};
use crate::codec::{Codec, Reader, ValidationMode, Writer};
use crate::error::{Error, Result};
use crate::registry::{FeatureBlockType, OutputType, UnlockConditionType};

restricted_array_rules! {
    pub UNLOCK_CONDITION_RULES: UnlockCondition / UnlockConditionType,
    "basic output unlock conditions",
    min = 1,
    [Address, DustDepositReturn]
}

restricted_array_rules! {
    pub FEATURE_BLOCK_RULES: FeatureBlock / FeatureBlockType,
    "basic output feature blocks",
    min = 0,
    [
        Sender,
        Metadata,
        TimelockMilestoneIndex,
        TimelockUnix,
        ExpirationMilestoneIndex,
        ExpirationUnix,
        Tag,
    ]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicOutput {
    pub amount: u64,
    pub native_tokens: Vec<NativeToken>,
    pub unlock_conditions: Vec<UnlockCondition>,
    pub feature_blocks: Vec<FeatureBlock>,
}

impl BasicOutput {
    pub fn new(
        amount: u64,
        native_tokens: Vec<NativeToken>,
        unlock_conditions: Vec<UnlockCondition>,
        feature_blocks: Vec<FeatureBlock>,
    ) -> Self {
        Self {
            amount,
            native_tokens,
            unlock_conditions,
            feature_blocks,
        }
    }

    pub fn check_structure(&self) -> Result<()> {
        NATIVE_TOKENS_RULES.validate(&self.native_tokens)?;
        UNLOCK_CONDITION_RULES.validate(&self.unlock_conditions)?;
        FEATURE_BLOCK_RULES.validate(&self.feature_blocks)
    }

    /// The address unlock condition is mandatory.
    pub fn validate(&self, position: usize) -> Result<()> {
        if UnlockCondition::find(&self.unlock_conditions, UnlockConditionType::Address).is_none() {
            return Err(Error::MissingUnlockCondition {
                output: position,
                condition: "address",
            });
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BasicOutputJson {
    #[serde(rename = "type")]
    kind: u32,
    amount: u64,
    native_tokens: Vec<Value>,
    unlock_conditions: Vec<Value>,
    feature_blocks: Vec<Value>,
}

impl Codec for BasicOutput {
    fn encode_into(&self, writer: &mut Writer, mode: ValidationMode) -> Result<()> {
        writer.write_u8(OutputType::Basic.code());
        writer.write_u64(self.amount);
        encode_array(writer, &self.native_tokens, &NATIVE_TOKENS_RULES, mode)?;
        encode_array(writer, &self.unlock_conditions, &UNLOCK_CONDITION_RULES, mode)?;
        encode_array(writer, &self.feature_blocks, &FEATURE_BLOCK_RULES, mode)
    }

    fn decode_from(reader: &mut Reader<'_>, mode: ValidationMode) -> Result<Self> {
        reader.expect_type(OutputType::Basic.code(), mode, "basic output")?;
        Ok(Self {
            amount: reader.read_u64("basic output amount")?,
            native_tokens: decode_array(reader, &NATIVE_TOKENS_RULES, mode)?,
            unlock_conditions: decode_array(reader, &UNLOCK_CONDITION_RULES, mode)?,
            feature_blocks: decode_array(reader, &FEATURE_BLOCK_RULES, mode)?,
        })
    }
}

impl JsonCodec for BasicOutput {
    fn to_json(&self) -> Result<Value> {
        json::to_shadow(&BasicOutputJson {
            kind: OutputType::Basic.code() as u32,
            amount: self.amount,
            native_tokens: json::array_to_json(&self.native_tokens)?,
            unlock_conditions: json::array_to_json(&self.unlock_conditions)?,
            feature_blocks: json::array_to_json(&self.feature_blocks)?,
        })
    }

    fn from_json(value: &Value) -> Result<Self> {
        json::expect_type(value, OutputType::Basic.code() as u32, "basic output")?;
        let shadow: BasicOutputJson = json::from_shadow(value)?;
        Ok(Self {
            amount: shadow.amount,
            native_tokens: json::array_from_json(&shadow.native_tokens)?,
            unlock_conditions: json::array_from_json(&shadow.unlock_conditions)?,
            feature_blocks: json::array_from_json(&shadow.feature_blocks)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::{Address, AliasId, Ed25519Address};

    fn owner() -> Address {
        Address::Ed25519(Ed25519Address::new([0xEE; 32]))
    }

    fn output(
        unlock_conditions: Vec<UnlockCondition>,
        feature_blocks: Vec<FeatureBlock>,
    ) -> BasicOutput {
        BasicOutput::new(1_000_000, vec![], unlock_conditions, feature_blocks)
    }

    #[test]
    fn test_minimal_output_is_49_bytes() {
        let out = output(vec![UnlockCondition::Address(owner())], vec![]);
        assert_eq!(out.encode(ValidationMode::Perform).unwrap().len(), 49);
    }

    #[test]
    fn test_roundtrip_with_extras() {
        let out = output(
            vec![
                UnlockCondition::Address(owner()),
                UnlockCondition::DustDepositReturn {
                    return_address: owner(),
                    amount: 500,
                },
            ],
            vec![
                FeatureBlock::Sender(owner()),
                FeatureBlock::TimelockMilestoneIndex(100),
                FeatureBlock::Tag(b"tag".to_vec()),
            ],
        );
        let bytes = out.encode(ValidationMode::Perform).unwrap();
        assert_eq!(BasicOutput::decode_exact(&bytes, ValidationMode::Perform).unwrap(), out);
        assert_eq!(BasicOutput::from_json(&out.to_json().unwrap()).unwrap(), out);
    }

    #[test]
    fn test_rejects_foreign_unlock_condition() {
        let out = output(
            vec![
                UnlockCondition::Address(owner()),
                UnlockCondition::GovernorAddress(owner()),
            ],
            vec![],
        );
        assert!(matches!(out.check_structure(), Err(Error::TypeMismatch { actual: 3, .. })));
        assert!(out.encode(ValidationMode::Perform).is_err());

        // Skip mode writes it anyway; Perform refuses to read it back.
        let bytes = out.encode(ValidationMode::Skip).unwrap();
        assert!(BasicOutput::decode_exact(&bytes, ValidationMode::Perform).is_err());
        assert_eq!(BasicOutput::decode_exact(&bytes, ValidationMode::Skip).unwrap(), out);
    }

    #[test]
    fn test_rejects_issuer_and_disorder() {
        let issuer = output(
            vec![UnlockCondition::Address(owner())],
            vec![FeatureBlock::Issuer(owner())],
        );
        assert!(matches!(issuer.check_structure(), Err(Error::TypeMismatch { actual: 1, .. })));

        let unordered = output(
            vec![UnlockCondition::Address(owner())],
            vec![FeatureBlock::Tag(b"t".to_vec()), FeatureBlock::Sender(owner())],
        );
        assert!(matches!(
            unordered.check_structure(),
            Err(Error::OrderViolation { position: 1, .. })
        ));

        let duplicated = output(
            vec![UnlockCondition::Address(owner())],
            vec![FeatureBlock::Metadata(vec![1]), FeatureBlock::Metadata(vec![2])],
        );
        assert!(matches!(
            duplicated.check_structure(),
            Err(Error::DuplicateReference { position: 1, .. })
        ));
    }

    #[test]
    fn test_address_condition_required() {
        let out = output(
            vec![UnlockCondition::DustDepositReturn {
                return_address: owner(),
                amount: 1,
            }],
            vec![],
        );
        assert!(out.check_structure().is_ok());
        assert!(matches!(
            out.validate(2),
            Err(Error::MissingUnlockCondition { output: 2, .. })
        ));

        let alias_address = AliasId::new([1; 20]).to_address();
        let alias_owned = output(vec![UnlockCondition::Address(alias_address)], vec![]);
        assert!(alias_owned.validate(0).is_ok());
    }

    #[test]
    fn test_unlock_conditions_cannot_be_empty() {
        let out = output(vec![], vec![]);
        assert!(matches!(
            out.check_structure(),
            Err(Error::CountOutOfBounds { count: 0, min: 1, .. })
        ));
    }
}
