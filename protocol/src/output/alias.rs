//! The alias output: an account-like object with a state controller (who
//! advances its state) and a governor (who may replace the controller).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::feature_block::FeatureBlock;
use super::native_token::{NativeToken, NATIVE_TOKENS_RULES};
use super::unlock_condition::UnlockCondition;
use crate::address::{Address, AliasId};
use crate::codec::array::{decode_array, encode_array};
use crate::codec::json::{self, JsonCodec};
use crate::codec::{Codec, Reader, ValidationMode, Writer};
use crate::config::MAX_STATE_METADATA_LENGTH;
use crate::error::{Error, Result};
use crate::input::OutputId;
use crate::registry::{FeatureBlockType, OutputType, UnlockConditionType};

restricted_array_rules! {
    pub UNLOCK_CONDITION_RULES: UnlockCondition / UnlockConditionType,
    "alias output unlock conditions",
    min = 2,
    [StateControllerAddress, GovernorAddress]
}

restricted_array_rules! {
    pub FEATURE_BLOCK_RULES: FeatureBlock / FeatureBlockType,
    "alias output feature blocks",
    min = 0,
    [Sender, Metadata]
}

restricted_array_rules! {
    pub IMMUTABLE_FEATURE_BLOCK_RULES: FeatureBlock / FeatureBlockType,
    "alias output immutable feature blocks",
    min = 0,
    [Issuer, Metadata]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasOutput {
    pub amount: u64,
    pub native_tokens: Vec<NativeToken>,
    /// Zeroed when the alias is created; see [`AliasOutput::resolved_alias_id`].
    pub alias_id: AliasId,
    /// Incremented on every state transition.
    pub state_index: u32,
    pub state_metadata: Vec<u8>,
    /// Number of foundries this alias has created.
    pub foundry_counter: u32,
    pub unlock_conditions: Vec<UnlockCondition>,
    pub feature_blocks: Vec<FeatureBlock>,
    pub immutable_feature_blocks: Vec<FeatureBlock>,
}

impl AliasOutput {
    /// A fresh alias with zeroed id and empty state.
    pub fn new(amount: u64, state_controller: Address, governor: Address) -> Self {
        Self {
            amount,
            native_tokens: vec![],
            alias_id: AliasId::null(),
            state_index: 0,
            state_metadata: vec![],
            foundry_counter: 0,
            unlock_conditions: vec![
                UnlockCondition::StateControllerAddress(state_controller),
                UnlockCondition::GovernorAddress(governor),
            ],
            feature_blocks: vec![],
            immutable_feature_blocks: vec![],
        }
    }

    /// The alias id, deriving it from `output_id` while it is still zeroed.
    pub fn resolved_alias_id(&self, output_id: &OutputId) -> AliasId {
        if self.alias_id.is_null() {
            AliasId::from_output_id(output_id)
        } else {
            self.alias_id
        }
    }

    pub fn state_controller(&self) -> Option<Address> {
        UnlockCondition::find(&self.unlock_conditions, UnlockConditionType::StateControllerAddress)
            .map(|uc| uc.address())
    }

    pub fn governor(&self) -> Option<Address> {
        UnlockCondition::find(&self.unlock_conditions, UnlockConditionType::GovernorAddress)
            .map(|uc| uc.address())
    }

    pub fn check_structure(&self) -> Result<()> {
        NATIVE_TOKENS_RULES.validate(&self.native_tokens)?;
        UNLOCK_CONDITION_RULES.validate(&self.unlock_conditions)?;
        FEATURE_BLOCK_RULES.validate(&self.feature_blocks)?;
        IMMUTABLE_FEATURE_BLOCK_RULES.validate(&self.immutable_feature_blocks)
    }

    pub fn validate(&self, position: usize) -> Result<()> {
        let own = self.alias_id.to_address();
        let state_controller = self.state_controller().ok_or(Error::MissingUnlockCondition {
            output: position,
            condition: "state controller address",
        })?;
        let governor = self.governor().ok_or(Error::MissingUnlockCondition {
            output: position,
            condition: "governor address",
        })?;

        if state_controller == own || governor == own {
            return Err(Error::CyclicAddress {
                kind: "alias",
                output: position,
            });
        }

        if self.alias_id.is_null() && (self.state_index != 0 || self.foundry_counter != 0) {
            return Err(Error::NonEmptyAliasState { output: position });
        }

        if self.state_metadata.len() > MAX_STATE_METADATA_LENGTH {
            return Err(Error::TooLong {
                context: "alias state metadata",
                len: self.state_metadata.len(),
                max: MAX_STATE_METADATA_LENGTH,
            });
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AliasOutputJson {
    #[serde(rename = "type")]
    kind: u32,
    amount: u64,
    native_tokens: Vec<Value>,
    alias_id: String,
    state_index: u32,
    state_metadata: String,
    foundry_counter: u32,
    unlock_conditions: Vec<Value>,
    feature_blocks: Vec<Value>,
    immutable_feature_blocks: Vec<Value>,
}

impl Codec for AliasOutput {
    fn encode_into(&self, writer: &mut Writer, mode: ValidationMode) -> Result<()> {
        writer.write_u8(OutputType::Alias.code());
        writer.write_u64(self.amount);
        encode_array(writer, &self.native_tokens, &NATIVE_TOKENS_RULES, mode)?;
        writer.write_bytes(self.alias_id.as_bytes());
        writer.write_u32(self.state_index);
        writer.write_prefixed_u16(
            &self.state_metadata,
            MAX_STATE_METADATA_LENGTH,
            mode,
            "alias state metadata",
        )?;
        writer.write_u32(self.foundry_counter);
        encode_array(writer, &self.unlock_conditions, &UNLOCK_CONDITION_RULES, mode)?;
        encode_array(writer, &self.feature_blocks, &FEATURE_BLOCK_RULES, mode)?;
        encode_array(writer, &self.immutable_feature_blocks, &IMMUTABLE_FEATURE_BLOCK_RULES, mode)
    }

    fn decode_from(reader: &mut Reader<'_>, mode: ValidationMode) -> Result<Self> {
        reader.expect_type(OutputType::Alias.code(), mode, "alias output")?;
        Ok(Self {
            amount: reader.read_u64("alias output amount")?,
            native_tokens: decode_array(reader, &NATIVE_TOKENS_RULES, mode)?,
            alias_id: AliasId::new(reader.read_array("alias id")?),
            state_index: reader.read_u32("alias state index")?,
            state_metadata: reader.read_prefixed_u16(
                MAX_STATE_METADATA_LENGTH,
                mode,
                "alias state metadata",
            )?,
            foundry_counter: reader.read_u32("alias foundry counter")?,
            unlock_conditions: decode_array(reader, &UNLOCK_CONDITION_RULES, mode)?,
            feature_blocks: decode_array(reader, &FEATURE_BLOCK_RULES, mode)?,
            immutable_feature_blocks: decode_array(reader, &IMMUTABLE_FEATURE_BLOCK_RULES, mode)?,
        })
    }
}

impl JsonCodec for AliasOutput {
    fn to_json(&self) -> Result<Value> {
        json::to_shadow(&AliasOutputJson {
            kind: OutputType::Alias.code() as u32,
            amount: self.amount,
            native_tokens: json::array_to_json(&self.native_tokens)?,
            alias_id: json::encode_hex(self.alias_id.as_bytes()),
            state_index: self.state_index,
            state_metadata: json::encode_hex(&self.state_metadata),
            foundry_counter: self.foundry_counter,
            unlock_conditions: json::array_to_json(&self.unlock_conditions)?,
            feature_blocks: json::array_to_json(&self.feature_blocks)?,
            immutable_feature_blocks: json::array_to_json(&self.immutable_feature_blocks)?,
        })
    }

    fn from_json(value: &Value) -> Result<Self> {
        json::expect_type(value, OutputType::Alias.code() as u32, "alias output")?;
        let shadow: AliasOutputJson = json::from_shadow(value)?;
        Ok(Self {
            amount: shadow.amount,
            native_tokens: json::array_from_json(&shadow.native_tokens)?,
            alias_id: AliasId::new(json::decode_hex_array(&shadow.alias_id, "aliasId")?),
            state_index: shadow.state_index,
            state_metadata: json::decode_hex(&shadow.state_metadata, "stateMetadata")?,
            foundry_counter: shadow.foundry_counter,
            unlock_conditions: json::array_from_json(&shadow.unlock_conditions)?,
            feature_blocks: json::array_from_json(&shadow.feature_blocks)?,
            immutable_feature_blocks: json::array_from_json(&shadow.immutable_feature_blocks)?,
        })
    }
}
