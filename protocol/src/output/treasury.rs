//! The treasury output: the protocol treasury's balance. Only legal inside
//! a treasury transaction payload.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::codec::json::{self, JsonCodec};
use crate::codec::{Codec, Reader, ValidationMode, Writer};
use crate::error::Result;
use crate::registry::OutputType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TreasuryOutput {
    pub amount: u64,
}

impl TreasuryOutput {
    pub fn new(amount: u64) -> Self {
        Self { amount }
    }
}

#[derive(Serialize, Deserialize)]
struct TreasuryOutputJson {
    #[serde(rename = "type")]
    kind: u32,
    amount: u64,
}

impl Codec for TreasuryOutput {
    fn encode_into(&self, writer: &mut Writer, _mode: ValidationMode) -> Result<()> {
        writer.write_u8(OutputType::Treasury.code());
        writer.write_u64(self.amount);
        Ok(())
    }

    fn decode_from(reader: &mut Reader<'_>, mode: ValidationMode) -> Result<Self> {
        reader.expect_type(OutputType::Treasury.code(), mode, "treasury output")?;
        Ok(Self {
            amount: reader.read_u64("treasury output amount")?,
        })
    }
}

impl JsonCodec for TreasuryOutput {
    fn to_json(&self) -> Result<Value> {
        json::to_shadow(&TreasuryOutputJson {
            kind: OutputType::Treasury.code() as u32,
            amount: self.amount,
        })
    }

    fn from_json(value: &Value) -> Result<Self> {
        json::expect_type(value, OutputType::Treasury.code() as u32, "treasury output")?;
        let shadow: TreasuryOutputJson = json::from_shadow(value)?;
        Ok(Self { amount: shadow.amount })
    }
}
