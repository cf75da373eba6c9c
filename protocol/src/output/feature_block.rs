//! Feature blocks: optional extras an output carries.
//!
//! Timelocks keep an output locked until a milestone index or a unix time
//! has been reached; expirations hand it back to the sender after one.
//! Like unlock conditions, feature blocks appear in strictly ascending type
//! order with no repeats, from a per-output-kind allowed set.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::address::Address;
use crate::codec::json::{self, JsonCodec};
use crate::codec::{Codec, Reader, ValidationMode, Writer};
use crate::config::{MAX_METADATA_LENGTH, MAX_TAG_LENGTH};
use crate::error::{Error, Result};
use crate::registry::FeatureBlockType;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FeatureBlock {
    /// The address that created the output. Must be unlocked in the same
    /// transaction.
    Sender(Address),
    /// The address that minted an alias or NFT. Immutable features only.
    Issuer(Address),
    /// Arbitrary bytes, 1..=8192 of them.
    Metadata(Vec<u8>),
    /// The output cannot be consumed before this milestone index.
    TimelockMilestoneIndex(u32),
    /// The output cannot be consumed before this unix time (seconds).
    TimelockUnix(u32),
    /// From this milestone index on, only the sender may consume the output.
    ExpirationMilestoneIndex(u32),
    /// From this unix time on, only the sender may consume the output.
    ExpirationUnix(u32),
    /// An indexation tag, 1..=64 bytes.
    Tag(Vec<u8>),
}

impl FeatureBlock {
    pub fn kind(&self) -> FeatureBlockType {
        match self {
            Self::Sender(_) => FeatureBlockType::Sender,
            Self::Issuer(_) => FeatureBlockType::Issuer,
            Self::Metadata(_) => FeatureBlockType::Metadata,
            Self::TimelockMilestoneIndex(_) => FeatureBlockType::TimelockMilestoneIndex,
            Self::TimelockUnix(_) => FeatureBlockType::TimelockUnix,
            Self::ExpirationMilestoneIndex(_) => FeatureBlockType::ExpirationMilestoneIndex,
            Self::ExpirationUnix(_) => FeatureBlockType::ExpirationUnix,
            Self::Tag(_) => FeatureBlockType::Tag,
        }
    }

    pub fn type_key(&self) -> u32 {
        self.kind().code() as u32
    }

    pub(crate) fn check_allowed(
        code: u32,
        allowed: &[FeatureBlockType],
        context: &'static str,
    ) -> Result<()> {
        let kind = FeatureBlockType::select(code)?;
        if !allowed.contains(&kind) {
            return Err(Error::TypeMismatch { context, actual: code });
        }
        Ok(())
    }

    /// Value-level legality, checked during syntactic validation of the
    /// output at position `output`.
    pub fn validate(&self, output: usize) -> Result<()> {
        let reason = match self {
            Self::Metadata(data) if data.is_empty() => "metadata must not be empty",
            Self::Metadata(data) if data.len() > MAX_METADATA_LENGTH => "metadata is too long",
            Self::Tag(tag) if tag.is_empty() => "tag must not be empty",
            Self::Tag(tag) if tag.len() > MAX_TAG_LENGTH => "tag is too long",
            Self::TimelockMilestoneIndex(0) => "timelock milestone index must be non-zero",
            Self::TimelockUnix(0) => "timelock unix time must be non-zero",
            Self::ExpirationMilestoneIndex(0) => "expiration milestone index must be non-zero",
            Self::ExpirationUnix(0) => "expiration unix time must be non-zero",
            _ => return Ok(()),
        };
        Err(Error::InvalidFeatureBlock { output, reason })
    }
}

#[derive(Serialize, Deserialize)]
struct AddressBlockJson {
    #[serde(rename = "type")]
    kind: u32,
    address: Value,
}

#[derive(Serialize, Deserialize)]
struct MetadataBlockJson {
    #[serde(rename = "type")]
    kind: u32,
    data: String,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MilestoneIndexBlockJson {
    #[serde(rename = "type")]
    kind: u32,
    milestone_index: u32,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UnixTimeBlockJson {
    #[serde(rename = "type")]
    kind: u32,
    unix_time: u32,
}

#[derive(Serialize, Deserialize)]
struct TagBlockJson {
    #[serde(rename = "type")]
    kind: u32,
    tag: String,
}

impl Codec for FeatureBlock {
    fn encode_into(&self, writer: &mut Writer, mode: ValidationMode) -> Result<()> {
        writer.write_u8(self.kind().code());
        match self {
            Self::Sender(a) | Self::Issuer(a) => a.encode_into(writer, mode),
            Self::Metadata(data) => {
                writer.write_prefixed_u16(data, MAX_METADATA_LENGTH, mode, "metadata feature block")
            }
            Self::TimelockMilestoneIndex(v)
            | Self::TimelockUnix(v)
            | Self::ExpirationMilestoneIndex(v)
            | Self::ExpirationUnix(v) => {
                writer.write_u32(*v);
                Ok(())
            }
            Self::Tag(tag) => {
                writer.write_prefixed_u8(tag, MAX_TAG_LENGTH, mode, "tag feature block")
            }
        }
    }

    fn decode_from(reader: &mut Reader<'_>, mode: ValidationMode) -> Result<Self> {
        let kind = FeatureBlockType::select(reader.read_u8("feature block")? as u32)?;
        Ok(match kind {
            FeatureBlockType::Sender => Self::Sender(Address::decode_from(reader, mode)?),
            FeatureBlockType::Issuer => Self::Issuer(Address::decode_from(reader, mode)?),
            FeatureBlockType::Metadata => {
                let data =
                    reader.read_prefixed_u16(MAX_METADATA_LENGTH, mode, "metadata feature block")?;
                Self::Metadata(data)
            }
            FeatureBlockType::TimelockMilestoneIndex => {
                Self::TimelockMilestoneIndex(reader.read_u32("milestone index")?)
            }
            FeatureBlockType::TimelockUnix => Self::TimelockUnix(reader.read_u32("unix time")?),
            FeatureBlockType::ExpirationMilestoneIndex => {
                Self::ExpirationMilestoneIndex(reader.read_u32("milestone index")?)
            }
            FeatureBlockType::ExpirationUnix => Self::ExpirationUnix(reader.read_u32("unix time")?),
            FeatureBlockType::Tag => {
                Self::Tag(reader.read_prefixed_u8(MAX_TAG_LENGTH, mode, "tag feature block")?)
            }
        })
    }
}

impl JsonCodec for FeatureBlock {
    fn to_json(&self) -> Result<Value> {
        let kind = self.kind().code() as u32;
        match self {
            Self::Sender(a) | Self::Issuer(a) => json::to_shadow(&AddressBlockJson {
                kind,
                address: a.to_json()?,
            }),
            Self::Metadata(data) => json::to_shadow(&MetadataBlockJson {
                kind,
                data: json::encode_hex(data),
            }),
            Self::TimelockMilestoneIndex(v) | Self::ExpirationMilestoneIndex(v) => {
                json::to_shadow(&MilestoneIndexBlockJson {
                    kind,
                    milestone_index: *v,
                })
            }
            Self::TimelockUnix(v) | Self::ExpirationUnix(v) => json::to_shadow(&UnixTimeBlockJson {
                kind,
                unix_time: *v,
            }),
            Self::Tag(tag) => json::to_shadow(&TagBlockJson {
                kind,
                tag: json::encode_hex(tag),
            }),
        }
    }

    fn from_json(value: &Value) -> Result<Self> {
        let address = || -> Result<Address> {
            Address::from_json(&json::from_shadow::<AddressBlockJson>(value)?.address)
        };
        let milestone = || -> Result<u32> {
            Ok(json::from_shadow::<MilestoneIndexBlockJson>(value)?.milestone_index)
        };
        let unix =
            || -> Result<u32> { Ok(json::from_shadow::<UnixTimeBlockJson>(value)?.unix_time) };

        Ok(match FeatureBlockType::select(json::type_code(value)?)? {
            FeatureBlockType::Sender => Self::Sender(address()?),
            FeatureBlockType::Issuer => Self::Issuer(address()?),
            FeatureBlockType::Metadata => {
                let shadow: MetadataBlockJson = json::from_shadow(value)?;
                Self::Metadata(json::decode_hex(&shadow.data, "metadata")?)
            }
            FeatureBlockType::TimelockMilestoneIndex => Self::TimelockMilestoneIndex(milestone()?),
            FeatureBlockType::TimelockUnix => Self::TimelockUnix(unix()?),
            FeatureBlockType::ExpirationMilestoneIndex => {
                Self::ExpirationMilestoneIndex(milestone()?)
            }
            FeatureBlockType::ExpirationUnix => Self::ExpirationUnix(unix()?),
            FeatureBlockType::Tag => {
                let shadow: TagBlockJson = json::from_shadow(value)?;
                Self::Tag(json::decode_hex(&shadow.tag, "tag")?)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::Ed25519Address;

    #[test]
    fn test_timelock_milestone_index_layout() {
        let block = FeatureBlock::TimelockMilestoneIndex(1337);
        let bytes = block.encode(ValidationMode::Perform).unwrap();
        assert_eq!(bytes, vec![3, 0x39, 0x05, 0, 0]);
        assert_eq!(FeatureBlock::decode_exact(&bytes, ValidationMode::Perform).unwrap(), block);

        let value = block.to_json().unwrap();
        assert_eq!(value, serde_json::json!({ "type": 3, "milestoneIndex": 1337 }));
    }

    #[test]
    fn test_zero_timelock_is_invalid() {
        assert!(FeatureBlock::TimelockMilestoneIndex(1).validate(0).is_ok());
        match FeatureBlock::TimelockMilestoneIndex(0).validate(4) {
            Err(Error::InvalidFeatureBlock { output: 4, .. }) => {}
            other => panic!("expected InvalidFeatureBlock, got {:?}", other),
        }
        assert!(FeatureBlock::ExpirationUnix(0).validate(0).is_err());
    }

    #[test]
    fn test_tag_and_metadata_lengths() {
        assert!(FeatureBlock::Tag(vec![]).validate(0).is_err());
        assert!(FeatureBlock::Tag(vec![1; 64]).validate(0).is_ok());
        assert!(FeatureBlock::Metadata(vec![1; MAX_METADATA_LENGTH + 1]).validate(0).is_err());

        // Over-long tags can't be written (or read) under Perform.
        let tag = FeatureBlock::Tag(vec![1; 65]);
        assert!(matches!(
            tag.encode(ValidationMode::Perform),
            Err(Error::TooLong { len: 65, max: 64, .. })
        ));
        let bytes = tag.encode(ValidationMode::Skip).unwrap();
        assert!(FeatureBlock::decode_exact(&bytes, ValidationMode::Perform).is_err());
    }

    #[test]
    fn test_json_roundtrip_all_kinds() {
        let sender = Address::Ed25519(Ed25519Address::new([8; 32]));
        let blocks = vec![
            FeatureBlock::Sender(sender),
            FeatureBlock::Issuer(sender),
            FeatureBlock::Metadata(b"hello".to_vec()),
            FeatureBlock::TimelockMilestoneIndex(10),
            FeatureBlock::TimelockUnix(1_700_000_000),
            FeatureBlock::ExpirationMilestoneIndex(20),
            FeatureBlock::ExpirationUnix(1_800_000_000),
            FeatureBlock::Tag(b"wallet".to_vec()),
        ];
        for block in blocks {
            let json = block.to_json_string().unwrap();
            assert_eq!(FeatureBlock::from_json_str(&json).unwrap(), block);
            let bytes = block.encode(ValidationMode::Perform).unwrap();
            assert_eq!(FeatureBlock::decode_exact(&bytes, ValidationMode::Perform).unwrap(), block);
        }
    }
}
