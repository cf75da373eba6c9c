//! The foundry output: controls the supply of one native token.
//!
//! A foundry is always owned by an alias (its immutable alias address
//! unlock condition). The foundry id is
//! `alias address (21) || serial number LE (4) || token scheme (1)` and the
//! id of the token it mints is `foundry id || token tag`.

use primitive_types::U256;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::feature_block::FeatureBlock;
use super::native_token::{NativeToken, TokenId, NATIVE_TOKENS_RULES};
use super::unlock_condition::UnlockCondition;
use crate::address::{AliasAddress, AliasId};
use crate::codec::array::{decode_array, encode_array};
use crate::codec::json::{self, JsonCodec};
use crate::codec::{Codec, Reader, ValidationMode, Writer};
use crate::config::{FOUNDRY_ID_LENGTH, TOKEN_ID_LENGTH, TOKEN_TAG_LENGTH};
use crate::error::{DepositViolation, Error, Result};
use crate::registry::{FeatureBlockType, OutputType, UnlockConditionType};

restricted_array_rules! {
    pub UNLOCK_CONDITION_RULES: UnlockCondition / UnlockConditionType,
    "foundry output unlock conditions",
    min = 1,
    [ImmutableAliasAddress]
}

restricted_array_rules! {
    pub FEATURE_BLOCK_RULES: FeatureBlock / FeatureBlockType,
    "foundry output feature blocks",
    min = 0,
    [Metadata]
}

restricted_array_rules! {
    pub IMMUTABLE_FEATURE_BLOCK_RULES: FeatureBlock / FeatureBlockType,
    "foundry output immutable feature blocks",
    min = 0,
    [Metadata]
}

/// How a foundry's supply may change. Only the simple scheme exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum TokenScheme {
    #[default]
    Simple = 0,
}

impl TokenScheme {
    pub fn from_code(code: u8) -> Result<Self> {
        match code {
            0 => Ok(Self::Simple),
            other => Err(Error::Malformed {
                context: "foundry token scheme",
                reason: format!("unknown token scheme {}", other),
            }),
        }
    }

    pub const fn code(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundryOutput {
    pub amount: u64,
    pub native_tokens: Vec<NativeToken>,
    pub serial_number: u32,
    pub token_tag: [u8; TOKEN_TAG_LENGTH],
    pub circulating_supply: U256,
    pub maximum_supply: U256,
    pub token_scheme: TokenScheme,
    pub unlock_conditions: Vec<UnlockCondition>,
    pub feature_blocks: Vec<FeatureBlock>,
    pub immutable_feature_blocks: Vec<FeatureBlock>,
}

impl FoundryOutput {
    /// A foundry owned by `alias` with nothing minted yet.
    pub fn new(
        amount: u64,
        alias: AliasId,
        serial_number: u32,
        token_tag: [u8; TOKEN_TAG_LENGTH],
        maximum_supply: U256,
    ) -> Self {
        Self {
            amount,
            native_tokens: vec![],
            serial_number,
            token_tag,
            circulating_supply: U256::zero(),
            maximum_supply,
            token_scheme: TokenScheme::Simple,
            unlock_conditions: vec![UnlockCondition::ImmutableAliasAddress(
                AliasAddress::new(alias),
            )],
            feature_blocks: vec![],
            immutable_feature_blocks: vec![],
        }
    }

    pub fn alias_address(&self) -> Option<AliasAddress> {
        self.unlock_conditions.iter().find_map(|uc| match uc {
            UnlockCondition::ImmutableAliasAddress(a) => Some(*a),
            _ => None,
        })
    }

    /// `None` when the owning alias is missing.
    pub fn foundry_id(&self) -> Option<[u8; FOUNDRY_ID_LENGTH]> {
        let alias = self.alias_address()?;
        let mut id = [0u8; FOUNDRY_ID_LENGTH];
        id[0] = crate::registry::AddressType::Alias.code();
        id[1..21].copy_from_slice(alias.alias_id().as_bytes());
        id[21..25].copy_from_slice(&self.serial_number.to_le_bytes());
        id[25] = self.token_scheme.code();
        Some(id)
    }

    /// Id of the native token this foundry mints.
    pub fn token_id(&self) -> Option<TokenId> {
        let foundry_id = self.foundry_id()?;
        let mut id = [0u8; TOKEN_ID_LENGTH];
        id[..FOUNDRY_ID_LENGTH].copy_from_slice(&foundry_id);
        id[FOUNDRY_ID_LENGTH..].copy_from_slice(&self.token_tag);
        Some(TokenId::new(id))
    }

    pub fn check_structure(&self) -> Result<()> {
        NATIVE_TOKENS_RULES.validate(&self.native_tokens)?;
        UNLOCK_CONDITION_RULES.validate(&self.unlock_conditions)?;
        FEATURE_BLOCK_RULES.validate(&self.feature_blocks)?;
        IMMUTABLE_FEATURE_BLOCK_RULES.validate(&self.immutable_feature_blocks)
    }

    pub fn validate(&self, position: usize) -> Result<()> {
        if self.alias_address().is_none() {
            return Err(Error::MissingUnlockCondition {
                output: position,
                condition: "immutable alias address",
            });
        }
        if self.maximum_supply.is_zero() {
            return Err(DepositViolation::ZeroMaximumSupply { output: position }.into());
        }
        if self.circulating_supply > self.maximum_supply {
            return Err(DepositViolation::CirculatingExceedsMaximum { output: position }.into());
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FoundryOutputJson {
    #[serde(rename = "type")]
    kind: u32,
    amount: u64,
    native_tokens: Vec<Value>,
    serial_number: u32,
    token_tag: String,
    circulating_supply: String,
    maximum_supply: String,
    token_scheme: u8,
    unlock_conditions: Vec<Value>,
    feature_blocks: Vec<Value>,
    immutable_feature_blocks: Vec<Value>,
}

impl Codec for FoundryOutput {
    fn encode_into(&self, writer: &mut Writer, mode: ValidationMode) -> Result<()> {
        writer.write_u8(OutputType::Foundry.code());
        writer.write_u64(self.amount);
        encode_array(writer, &self.native_tokens, &NATIVE_TOKENS_RULES, mode)?;
        writer.write_u32(self.serial_number);
        writer.write_bytes(&self.token_tag);
        writer.write_u256(&self.circulating_supply);
        writer.write_u256(&self.maximum_supply);
        writer.write_u8(self.token_scheme.code());
        encode_array(writer, &self.unlock_conditions, &UNLOCK_CONDITION_RULES, mode)?;
        encode_array(writer, &self.feature_blocks, &FEATURE_BLOCK_RULES, mode)?;
        encode_array(writer, &self.immutable_feature_blocks, &IMMUTABLE_FEATURE_BLOCK_RULES, mode)
    }

    fn decode_from(reader: &mut Reader<'_>, mode: ValidationMode) -> Result<Self> {
        reader.expect_type(OutputType::Foundry.code(), mode, "foundry output")?;
        Ok(Self {
            amount: reader.read_u64("foundry output amount")?,
            native_tokens: decode_array(reader, &NATIVE_TOKENS_RULES, mode)?,
            serial_number: reader.read_u32("foundry serial number")?,
            token_tag: reader.read_array("foundry token tag")?,
            circulating_supply: reader.read_u256("foundry circulating supply")?,
            maximum_supply: reader.read_u256("foundry maximum supply")?,
            token_scheme: TokenScheme::from_code(reader.read_u8("foundry token scheme")?)?,
            unlock_conditions: decode_array(reader, &UNLOCK_CONDITION_RULES, mode)?,
            feature_blocks: decode_array(reader, &FEATURE_BLOCK_RULES, mode)?,
            immutable_feature_blocks: decode_array(reader, &IMMUTABLE_FEATURE_BLOCK_RULES, mode)?,
        })
    }
}

impl JsonCodec for FoundryOutput {
    fn to_json(&self) -> Result<Value> {
        json::to_shadow(&FoundryOutputJson {
            kind: OutputType::Foundry.code() as u32,
            amount: self.amount,
            native_tokens: json::array_to_json(&self.native_tokens)?,
            serial_number: self.serial_number,
            token_tag: json::encode_hex(&self.token_tag),
            circulating_supply: json::encode_u256(&self.circulating_supply),
            maximum_supply: json::encode_u256(&self.maximum_supply),
            token_scheme: self.token_scheme.code(),
            unlock_conditions: json::array_to_json(&self.unlock_conditions)?,
            feature_blocks: json::array_to_json(&self.feature_blocks)?,
            immutable_feature_blocks: json::array_to_json(&self.immutable_feature_blocks)?,
        })
    }

    fn from_json(value: &Value) -> Result<Self> {
        json::expect_type(value, OutputType::Foundry.code() as u32, "foundry output")?;
        let shadow: FoundryOutputJson = json::from_shadow(value)?;
        Ok(Self {
            amount: shadow.amount,
            native_tokens: json::array_from_json(&shadow.native_tokens)?,
            serial_number: shadow.serial_number,
            token_tag: json::decode_hex_array(&shadow.token_tag, "tokenTag")?,
            circulating_supply: json::decode_u256(&shadow.circulating_supply, "circulatingSupply")?,
            maximum_supply: json::decode_u256(&shadow.maximum_supply, "maximumSupply")?,
            token_scheme: TokenScheme::from_code(shadow.token_scheme)?,
            unlock_conditions: json::array_from_json(&shadow.unlock_conditions)?,
            feature_blocks: json::array_from_json(&shadow.feature_blocks)?,
            immutable_feature_blocks: json::array_from_json(&shadow.immutable_feature_blocks)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn foundry(max: u64) -> FoundryOutput {
        FoundryOutput::new(1_000_000, AliasId::new([1; 20]), 7, [0xAB; 12], U256::from(max))
    }

    #[test]
    fn test_roundtrip() {
        let mut f = foundry(1_000);
        f.circulating_supply = U256::from(10);
        f.immutable_feature_blocks = vec![FeatureBlock::Metadata(b"token".to_vec())];
        let bytes = f.encode(ValidationMode::Perform).unwrap();
        assert_eq!(bytes[0], 5);
        assert_eq!(FoundryOutput::decode_exact(&bytes, ValidationMode::Perform).unwrap(), f);
        assert_eq!(FoundryOutput::from_json(&f.to_json().unwrap()).unwrap(), f);
    }

    #[test]
    fn test_supply_rules() {
        assert!(foundry(1).validate(0).is_ok());

        assert_eq!(
            foundry(0).validate(2),
            Err(Error::SupplyOrDepositInvariantViolated(
                DepositViolation::ZeroMaximumSupply { output: 2 }
            ))
        );

        let mut f = foundry(100);
        f.circulating_supply = U256::from(100);
        assert!(f.validate(0).is_ok());
        f.circulating_supply = U256::from(101);
        assert!(matches!(
            f.validate(0),
            Err(Error::SupplyOrDepositInvariantViolated(
                DepositViolation::CirculatingExceedsMaximum { .. }
            ))
        ));
    }

    #[test]
    fn test_token_id_layout() {
        let f = foundry(1);
        let id = f.token_id().unwrap();
        let bytes = id.as_bytes();
        assert_eq!(bytes[0], 8);
        assert_eq!(&bytes[1..21], &[1; 20]);
        assert_eq!(&bytes[21..25], &7u32.to_le_bytes());
        assert_eq!(bytes[25], 0);
        assert_eq!(&bytes[26..], &[0xAB; 12]);
    }

    #[test]
    fn test_unknown_token_scheme() {
        let mut bytes = foundry(1).encode(ValidationMode::Perform).unwrap();
        // type + amount + native token count + serial + tag + two supplies
        let scheme_at = 1 + 8 + 2 + 4 + 12 + 32 + 32;
        bytes[scheme_at] = 1;
        assert!(matches!(
            FoundryOutput::decode_exact(&bytes, ValidationMode::Skip),
            Err(Error::Malformed { .. })
        ));
    }

    #[test]
    fn test_owner_required() {
        let mut f = foundry(1);
        f.unlock_conditions.clear();
        assert!(f.token_id().is_none());
        assert!(matches!(f.validate(0), Err(Error::MissingUnlockCondition { .. })));
    }
}
