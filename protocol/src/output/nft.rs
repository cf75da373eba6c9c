//! The NFT output: a unique, non-fungible object with immutable data.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::feature_block::FeatureBlock;
use super::native_token::{NativeToken, NATIVE_TOKENS_RULES};
use super::unlock_condition::UnlockCondition;
use crate::address::{Address, NftId};
use crate::codec::array::{decode_array, encode_array};
use crate::codec::json::{self, JsonCodec};
use crate::codec::{Codec, Reader, ValidationMode, Writer};
use crate::config::MAX_IMMUTABLE_DATA_LENGTH;
use crate::error::{Error, Result};
use crate::input::OutputId;
use crate::registry::{FeatureBlockType, OutputType, UnlockConditionType};

restricted_array_rules! {
    pub UNLOCK_CONDITION_RULES: UnlockCondition / UnlockConditionType,
    "nft output unlock conditions",
    min = 1,
    [Address, DustDepositReturn]
}

restricted_array_rules! {
    pub FEATURE_BLOCK_RULES: FeatureBlock / FeatureBlockType, "nft output feature blocks", min = 0,
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

restricted_array_rules! {
    pub IMMUTABLE_FEATURE_BLOCK_RULES: FeatureBlock / FeatureBlockType,
    "nft output immutable feature blocks",
    min = 0,
    [Issuer, Metadata]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NftOutput {
    pub amount: u64,
    pub native_tokens: Vec<NativeToken>,
    /// Zeroed when minted; derived from the minting output id afterwards.
    pub nft_id: NftId,
    pub immutable_data: Vec<u8>,
    pub unlock_conditions: Vec<UnlockCondition>,
    pub feature_blocks: Vec<FeatureBlock>,
    pub immutable_feature_blocks: Vec<FeatureBlock>,
}

impl NftOutput {
    /// A freshly minted NFT owned by `owner`.
    pub fn new(amount: u64, owner: Address, immutable_data: Vec<u8>) -> Self {
        Self {
            amount,
            native_tokens: vec![],
            nft_id: NftId::null(),
            immutable_data,
            unlock_conditions: vec![UnlockCondition::Address(owner)],
            feature_blocks: vec![],
            immutable_feature_blocks: vec![],
        }
    }

    pub fn resolved_nft_id(&self, output_id: &OutputId) -> NftId {
        if self.nft_id.is_null() {
            NftId::from_output_id(output_id)
        } else {
            self.nft_id
        }
    }

    pub fn owner(&self) -> Option<Address> {
        UnlockCondition::find(&self.unlock_conditions, UnlockConditionType::Address)
            .map(|uc| uc.address())
    }

    pub fn check_structure(&self) -> Result<()> {
        NATIVE_TOKENS_RULES.validate(&self.native_tokens)?;
        UNLOCK_CONDITION_RULES.validate(&self.unlock_conditions)?;
        FEATURE_BLOCK_RULES.validate(&self.feature_blocks)?;
        IMMUTABLE_FEATURE_BLOCK_RULES.validate(&self.immutable_feature_blocks)
    }

    pub fn validate(&self, position: usize) -> Result<()> {
        let owner = self.owner().ok_or(Error::MissingUnlockCondition {
            output: position,
            condition: "address",
        })?;
        if owner == self.nft_id.to_address() {
            return Err(Error::CyclicAddress {
                kind: "nft",
                output: position,
            });
        }
        if self.immutable_data.len() > MAX_IMMUTABLE_DATA_LENGTH {
            return Err(Error::TooLong {
                context: "nft immutable data",
                len: self.immutable_data.len(),
                max: MAX_IMMUTABLE_DATA_LENGTH,
            });
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NftOutputJson {
    #[serde(rename = "type")]
    kind: u32,
    amount: u64,
    native_tokens: Vec<Value>,
    nft_id: String,
    immutable_data: String,
    unlock_conditions: Vec<Value>,
    feature_blocks: Vec<Value>,
    immutable_feature_blocks: Vec<Value>,
}

impl Codec for NftOutput {
    fn encode_into(&self, writer: &mut Writer, mode: ValidationMode) -> Result<()> {
        writer.write_u8(OutputType::Nft.code());
        writer.write_u64(self.amount);
        encode_array(writer, &self.native_tokens, &NATIVE_TOKENS_RULES, mode)?;
        writer.write_bytes(self.nft_id.as_bytes());
        writer.write_prefixed_u16(
            &self.immutable_data,
            MAX_IMMUTABLE_DATA_LENGTH,
            mode,
            "nft immutable data",
        )?;
        encode_array(writer, &self.unlock_conditions, &UNLOCK_CONDITION_RULES, mode)?;
        encode_array(writer, &self.feature_blocks, &FEATURE_BLOCK_RULES, mode)?;
        encode_array(writer, &self.immutable_feature_blocks, &IMMUTABLE_FEATURE_BLOCK_RULES, mode)
    }

    fn decode_from(reader: &mut Reader<'_>, mode: ValidationMode) -> Result<Self> {
        reader.expect_type(OutputType::Nft.code(), mode, "nft output")?;
        Ok(Self {
            amount: reader.read_u64("nft output amount")?,
            native_tokens: decode_array(reader, &NATIVE_TOKENS_RULES, mode)?,
            nft_id: NftId::new(reader.read_array("nft id")?),
            immutable_data: reader.read_prefixed_u16(
                MAX_IMMUTABLE_DATA_LENGTH,
                mode,
                "nft immutable data",
            )?,
            unlock_conditions: decode_array(reader, &UNLOCK_CONDITION_RULES, mode)?,
            feature_blocks: decode_array(reader, &FEATURE_BLOCK_RULES, mode)?,
            immutable_feature_blocks: decode_array(reader, &IMMUTABLE_FEATURE_BLOCK_RULES, mode)?,
        })
    }
}

impl JsonCodec for NftOutput {
    fn to_json(&self) -> Result<Value> {
        json::to_shadow(&NftOutputJson {
            kind: OutputType::Nft.code() as u32,
            amount: self.amount,
            native_tokens: json::array_to_json(&self.native_tokens)?,
            nft_id: json::encode_hex(self.nft_id.as_bytes()),
            immutable_data: json::encode_hex(&self.immutable_data),
            unlock_conditions: json::array_to_json(&self.unlock_conditions)?,
            feature_blocks: json::array_to_json(&self.feature_blocks)?,
            immutable_feature_blocks: json::array_to_json(&self.immutable_feature_blocks)?,
        })
    }

    fn from_json(value: &Value) -> Result<Self> {
        json::expect_type(value, OutputType::Nft.code() as u32, "nft output")?;
        let shadow: NftOutputJson = json::from_shadow(value)?;
        Ok(Self {
            amount: shadow.amount,
            native_tokens: json::array_from_json(&shadow.native_tokens)?,
            nft_id: NftId::new(json::decode_hex_array(&shadow.nft_id, "nftId")?),
            immutable_data: json::decode_hex(&shadow.immutable_data, "immutableData")?,
            unlock_conditions: json::array_from_json(&shadow.unlock_conditions)?,
            feature_blocks: json::array_from_json(&shadow.feature_blocks)?,
            immutable_feature_blocks: json::array_from_json(&shadow.immutable_feature_blocks)?,
        })
    }
}
