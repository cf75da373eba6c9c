//! # Payloads
//!
//! Payload type codes are 32 bits wide, unlike every other type code. The
//! only payload an essence may embed is tagged data; treasury transactions
//! travel on their own inside milestones.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::codec::json::{self, JsonCodec};
use crate::codec::{Codec, Reader, ValidationMode, Writer};
use crate::config::{MAX_TAGGED_DATA_LENGTH, MAX_TAG_LENGTH};
use crate::error::{Error, Result};
use crate::input::TreasuryInput;
use crate::output::TreasuryOutput;
use crate::registry::PayloadType;

fn expect_payload_type(
    reader: &mut Reader<'_>,
    expected: PayloadType,
    mode: ValidationMode,
    context: &'static str,
) -> Result<()> {
    let actual = reader.read_u32(context)?;
    if mode.validates() && actual != expected.code() {
        return Err(Error::TypeMismatch { context, actual });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// TaggedData
// ---------------------------------------------------------------------------

/// Arbitrary data under an optional tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct TaggedData {
    pub tag: Vec<u8>,
    pub data: Vec<u8>,
}

impl TaggedData {
    pub fn new(tag: impl Into<Vec<u8>>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            tag: tag.into(),
            data: data.into(),
        }
    }

    /// Length limits; the codec only enforces them under `Perform`.
    pub fn validate(&self) -> Result<()> {
        if self.tag.len() > MAX_TAG_LENGTH {
            return Err(Error::TooLong {
                context: "tagged data tag",
                len: self.tag.len(),
                max: MAX_TAG_LENGTH,
            });
        }
        if self.data.len() > MAX_TAGGED_DATA_LENGTH {
            return Err(Error::TooLong {
                context: "tagged data",
                len: self.data.len(),
                max: MAX_TAGGED_DATA_LENGTH,
            });
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
struct TaggedDataJson {
    #[serde(rename = "type")]
    kind: u32,
    tag: String,
    data: String,
}

impl Codec for TaggedData {
    fn encode_into(&self, writer: &mut Writer, mode: ValidationMode) -> Result<()> {
        writer.write_u32(PayloadType::TaggedData.code());
        writer.write_prefixed_u8(&self.tag, MAX_TAG_LENGTH, mode, "tagged data tag")?;
        writer.write_prefixed_u32(&self.data, MAX_TAGGED_DATA_LENGTH, mode, "tagged data")
    }

    fn decode_from(reader: &mut Reader<'_>, mode: ValidationMode) -> Result<Self> {
        expect_payload_type(reader, PayloadType::TaggedData, mode, "tagged data payload")?;
        Ok(Self {
            tag: reader.read_prefixed_u8(MAX_TAG_LENGTH, mode, "tagged data tag")?,
            data: reader.read_prefixed_u32(MAX_TAGGED_DATA_LENGTH, mode, "tagged data")?,
        })
    }
}

impl JsonCodec for TaggedData {
    fn to_json(&self) -> Result<Value> {
        json::to_shadow(&TaggedDataJson {
            kind: PayloadType::TaggedData.code(),
            tag: json::encode_hex(&self.tag),
            data: json::encode_hex(&self.data),
        })
    }

    fn from_json(value: &Value) -> Result<Self> {
        json::expect_type(value, PayloadType::TaggedData.code(), "tagged data payload")?;
        let shadow: TaggedDataJson = json::from_shadow(value)?;
        Ok(Self {
            tag: json::decode_hex(&shadow.tag, "tag")?,
            data: json::decode_hex(&shadow.data, "data")?,
        })
    }
}

// ---------------------------------------------------------------------------
// TreasuryTransaction
// ---------------------------------------------------------------------------

/// Moves the treasury from one milestone's output to a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TreasuryTransaction {
    pub input: TreasuryInput,
    pub output: TreasuryOutput,
}

impl TreasuryTransaction {
    pub fn new(input: TreasuryInput, output: TreasuryOutput) -> Self {
        Self { input, output }
    }
}

#[derive(Serialize, Deserialize)]
struct TreasuryTransactionJson {
    #[serde(rename = "type")]
    kind: u32,
    input: Value,
    output: Value,
}

impl Codec for TreasuryTransaction {
    fn encode_into(&self, writer: &mut Writer, mode: ValidationMode) -> Result<()> {
        writer.write_u32(PayloadType::TreasuryTransaction.code());
        self.input.encode_into(writer, mode)?;
        self.output.encode_into(writer, mode)
    }

    fn decode_from(reader: &mut Reader<'_>, mode: ValidationMode) -> Result<Self> {
        expect_payload_type(
            reader,
            PayloadType::TreasuryTransaction,
            mode,
            "treasury transaction payload",
        )?;
        Ok(Self {
            input: TreasuryInput::decode_from(reader, mode)?,
            output: TreasuryOutput::decode_from(reader, mode)?,
        })
    }
}

impl JsonCodec for TreasuryTransaction {
    fn to_json(&self) -> Result<Value> {
        json::to_shadow(&TreasuryTransactionJson {
            kind: PayloadType::TreasuryTransaction.code(),
            input: self.input.to_json()?,
            output: self.output.to_json()?,
        })
    }

    fn from_json(value: &Value) -> Result<Self> {
        json::expect_type(
            value,
            PayloadType::TreasuryTransaction.code(),
            "treasury transaction payload",
        )?;
        let shadow: TreasuryTransactionJson = json::from_shadow(value)?;
        Ok(Self {
            input: TreasuryInput::from_json(&shadow.input)?,
            output: TreasuryOutput::from_json(&shadow.output)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Payload
// ---------------------------------------------------------------------------

/// Any payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Payload {
    TreasuryTransaction(TreasuryTransaction),
    TaggedData(TaggedData),
}

impl Payload {
    pub fn kind(&self) -> PayloadType {
        match self {
            Self::TreasuryTransaction(_) => PayloadType::TreasuryTransaction,
            Self::TaggedData(_) => PayloadType::TaggedData,
        }
    }
}

impl From<TaggedData> for Payload {
    fn from(p: TaggedData) -> Self {
        Self::TaggedData(p)
    }
}

impl Codec for Payload {
    fn encode_into(&self, writer: &mut Writer, mode: ValidationMode) -> Result<()> {
        match self {
            Self::TreasuryTransaction(p) => p.encode_into(writer, mode),
            Self::TaggedData(p) => p.encode_into(writer, mode),
        }
    }

    fn decode_from(reader: &mut Reader<'_>, mode: ValidationMode) -> Result<Self> {
        Ok(match PayloadType::select(reader.peek_u32("payload")?)? {
            PayloadType::TreasuryTransaction => {
                Self::TreasuryTransaction(TreasuryTransaction::decode_from(reader, mode)?)
            }
            PayloadType::TaggedData => Self::TaggedData(TaggedData::decode_from(reader, mode)?),
        })
    }
}

impl JsonCodec for Payload {
    fn to_json(&self) -> Result<Value> {
        match self {
            Self::TreasuryTransaction(p) => p.to_json(),
            Self::TaggedData(p) => p.to_json(),
        }
    }

    fn from_json(value: &Value) -> Result<Self> {
        Ok(match PayloadType::select(json::type_code(value)?)? {
            PayloadType::TreasuryTransaction => {
                Self::TreasuryTransaction(TreasuryTransaction::from_json(value)?)
            }
            PayloadType::TaggedData => Self::TaggedData(TaggedData::from_json(value)?),
        })
    }
}
