//! Native tokens: user-defined tokens minted by foundries and carried by
//! outputs next to the base token amount.

use primitive_types::U256;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::codec::array::{ArrayMode, ArrayRules};
use crate::codec::json::{self, JsonCodec};
use crate::codec::{Codec, Reader, ValidationMode, Writer};
use crate::config::{MAX_NATIVE_TOKENS_PER_OUTPUT, TOKEN_ID_LENGTH};
use crate::error::Result;

/// Foundry id followed by the foundry's token tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenId([u8; TOKEN_ID_LENGTH]);

impl TokenId {
    pub const fn new(bytes: [u8; TOKEN_ID_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; TOKEN_ID_LENGTH] {
        &self.0
    }
}

/// An amount of one native token. Has no type code on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeToken {
    pub token_id: TokenId,
    pub amount: U256,
}

impl NativeToken {
    pub fn new(token_id: TokenId, amount: U256) -> Self {
        Self { token_id, amount }
    }

    fn same_token(a: &NativeToken, b: &NativeToken) -> bool {
        a.token_id == b.token_id
    }
}

/// Rules for the native tokens of a single output.
pub const NATIVE_TOKENS_RULES: ArrayRules<NativeToken> = ArrayRules {
    context: "native tokens",
    min: 0,
    max: MAX_NATIVE_TOKENS_PER_OUTPUT,
    guard: None,
    mode: ArrayMode::Unique(NativeToken::same_token),
};

#[derive(Serialize, Deserialize)]
struct NativeTokenJson {
    id: String,
    amount: String,
}

impl Codec for NativeToken {
    fn encode_into(&self, writer: &mut Writer, _mode: ValidationMode) -> Result<()> {
        writer.write_bytes(&self.token_id.0);
        writer.write_u256(&self.amount);
        Ok(())
    }

    fn decode_from(reader: &mut Reader<'_>, _mode: ValidationMode) -> Result<Self> {
        Ok(Self {
            token_id: TokenId(reader.read_array("native token id")?),
            amount: reader.read_u256("native token amount")?,
        })
    }
}

impl JsonCodec for NativeToken {
    fn to_json(&self) -> Result<Value> {
        json::to_shadow(&NativeTokenJson {
            id: json::encode_hex(&self.token_id.0),
            amount: json::encode_u256(&self.amount),
        })
    }

    fn from_json(value: &Value) -> Result<Self> {
        let shadow: NativeTokenJson = json::from_shadow(value)?;
        Ok(Self {
            token_id: TokenId(json::decode_hex_array(&shadow.id, "native token id")?),
            amount: json::decode_u256(&shadow.amount, "native token amount")?,
        })
    }
}
