//! # Inputs
//!
//! An input names what a transaction consumes. Ordinary transactions
//! consume UTXOs by `(transaction id, output index)`; the treasury input,
//! which names a milestone, only appears inside treasury payloads.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::codec::json::{self, JsonCodec};
use crate::codec::{Codec, Reader, ValidationMode, Writer};
use crate::config::{MILESTONE_ID_LENGTH, OUTPUT_ID_LENGTH, TRANSACTION_ID_LENGTH};
use crate::error::Result;
use crate::registry::InputType;

/// Identifier of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransactionId([u8; TRANSACTION_ID_LENGTH]);

impl TransactionId {
    pub const fn new(bytes: [u8; TRANSACTION_ID_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; TRANSACTION_ID_LENGTH] {
        &self.0
    }
}

/// Transaction id plus output index: the name of one UTXO.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OutputId {
    transaction_id: TransactionId,
    index: u16,
}

impl OutputId {
    pub const fn new(transaction_id: TransactionId, index: u16) -> Self {
        Self { transaction_id, index }
    }

    pub fn transaction_id(&self) -> &TransactionId {
        &self.transaction_id
    }

    pub fn index(&self) -> u16 {
        self.index
    }

    /// `transaction id || index (LE)`, the form alias and NFT ids hash.
    pub fn to_bytes(&self) -> [u8; OUTPUT_ID_LENGTH] {
        let mut out = [0u8; OUTPUT_ID_LENGTH];
        out[..TRANSACTION_ID_LENGTH].copy_from_slice(&self.transaction_id.0);
        out[TRANSACTION_ID_LENGTH..].copy_from_slice(&self.index.to_le_bytes());
        out
    }
}

impl fmt::Display for OutputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", json::encode_hex(&self.to_bytes()))
    }
}

// ---------------------------------------------------------------------------
// UtxoInput
// ---------------------------------------------------------------------------

/// Consumes the output `index` of transaction `transaction_id`.
///
/// The index range (`0..=126`) is a syntactic rule checked during essence
/// validation, not at construction or decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UtxoInput(OutputId);

impl UtxoInput {
    pub const fn new(transaction_id: TransactionId, index: u16) -> Self {
        Self(OutputId::new(transaction_id, index))
    }

    pub fn output_id(&self) -> &OutputId {
        &self.0
    }

    pub fn transaction_id(&self) -> &TransactionId {
        &self.0.transaction_id
    }

    pub fn index(&self) -> u16 {
        self.0.index
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UtxoInputJson {
    #[serde(rename = "type")]
    kind: u32,
    transaction_id: String,
    transaction_output_index: u16,
}

impl Codec for UtxoInput {
    fn encode_into(&self, writer: &mut Writer, _mode: ValidationMode) -> Result<()> {
        writer.write_u8(InputType::Utxo.code());
        writer.write_bytes(self.transaction_id().as_bytes());
        writer.write_u16(self.index());
        Ok(())
    }

    fn decode_from(reader: &mut Reader<'_>, mode: ValidationMode) -> Result<Self> {
        reader.expect_type(InputType::Utxo.code(), mode, "utxo input")?;
        let transaction_id = TransactionId(reader.read_array("utxo input transaction id")?);
        let index = reader.read_u16("utxo input index")?;
        Ok(Self::new(transaction_id, index))
    }
}

impl JsonCodec for UtxoInput {
    fn to_json(&self) -> Result<Value> {
        json::to_shadow(&UtxoInputJson {
            kind: InputType::Utxo.code() as u32,
            transaction_id: json::encode_hex(self.transaction_id().as_bytes()),
            transaction_output_index: self.index(),
        })
    }

    fn from_json(value: &Value) -> Result<Self> {
        json::expect_type(value, InputType::Utxo.code() as u32, "utxo input")?;
        let shadow: UtxoInputJson = json::from_shadow(value)?;
        Ok(Self::new(
            TransactionId(json::decode_hex_array(&shadow.transaction_id, "transactionId")?),
            shadow.transaction_output_index,
        ))
    }
}

// ---------------------------------------------------------------------------
// TreasuryInput
// ---------------------------------------------------------------------------

/// Consumes the treasury as left by the named milestone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TreasuryInput([u8; MILESTONE_ID_LENGTH]);

impl TreasuryInput {
    pub const fn new(milestone_id: [u8; MILESTONE_ID_LENGTH]) -> Self {
        Self(milestone_id)
    }

    pub fn milestone_id(&self) -> &[u8; MILESTONE_ID_LENGTH] {
        &self.0
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TreasuryInputJson {
    #[serde(rename = "type")]
    kind: u32,
    milestone_id: String,
}

impl Codec for TreasuryInput {
    fn encode_into(&self, writer: &mut Writer, _mode: ValidationMode) -> Result<()> {
        writer.write_u8(InputType::Treasury.code());
        writer.write_bytes(&self.0);
        Ok(())
    }

    fn decode_from(reader: &mut Reader<'_>, mode: ValidationMode) -> Result<Self> {
        reader.expect_type(InputType::Treasury.code(), mode, "treasury input")?;
        Ok(Self(reader.read_array("treasury input milestone id")?))
    }
}

impl JsonCodec for TreasuryInput {
    fn to_json(&self) -> Result<Value> {
        json::to_shadow(&TreasuryInputJson {
            kind: InputType::Treasury.code() as u32,
            milestone_id: json::encode_hex(&self.0),
        })
    }

    fn from_json(value: &Value) -> Result<Self> {
        json::expect_type(value, InputType::Treasury.code() as u32, "treasury input")?;
        let shadow: TreasuryInputJson = json::from_shadow(value)?;
        Ok(Self(json::decode_hex_array(&shadow.milestone_id, "milestoneId")?))
    }
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Any input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Input {
    Utxo(UtxoInput),
    Treasury(TreasuryInput),
}

impl Input {
    pub fn kind(&self) -> InputType {
        match self {
            Self::Utxo(_) => InputType::Utxo,
            Self::Treasury(_) => InputType::Treasury,
        }
    }

    /// Two inputs are the same UTXO iff both are UTXO inputs with equal
    /// transaction id and index.
    pub fn same_utxo(a: &Input, b: &Input) -> bool {
        match (a, b) {
            (Input::Utxo(a), Input::Utxo(b)) => a.output_id() == b.output_id(),
            _ => false,
        }
    }
}

impl From<UtxoInput> for Input {
    fn from(i: UtxoInput) -> Self {
        Self::Utxo(i)
    }
}

impl Codec for Input {
    fn encode_into(&self, writer: &mut Writer, mode: ValidationMode) -> Result<()> {
        match self {
            Self::Utxo(i) => i.encode_into(writer, mode),
            Self::Treasury(i) => i.encode_into(writer, mode),
        }
    }

    fn decode_from(reader: &mut Reader<'_>, mode: ValidationMode) -> Result<Self> {
        Ok(match InputType::select(reader.peek_u8("input")? as u32)? {
            InputType::Utxo => Self::Utxo(UtxoInput::decode_from(reader, mode)?),
            InputType::Treasury => Self::Treasury(TreasuryInput::decode_from(reader, mode)?),
        })
    }
}

impl JsonCodec for Input {
    fn to_json(&self) -> Result<Value> {
        match self {
            Self::Utxo(i) => i.to_json(),
            Self::Treasury(i) => i.to_json(),
        }
    }

    fn from_json(value: &Value) -> Result<Self> {
        Ok(match InputType::select(json::type_code(value)?)? {
            InputType::Utxo => Self::Utxo(UtxoInput::from_json(value)?),
            InputType::Treasury => Self::Treasury(TreasuryInput::from_json(value)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn utxo(fill: u8, index: u16) -> Input {
        Input::Utxo(UtxoInput::new(TransactionId::new([fill; 32]), index))
    }

    #[test]
    fn test_utxo_binary_layout() {
        let bytes = utxo(0xAA, 0x0102).encode(ValidationMode::Perform).unwrap();
        assert_eq!(bytes.len(), 35);
        assert_eq!(bytes[0], 0);
        assert_eq!(&bytes[33..], &[0x02, 0x01]);
    }

    #[test]
    fn test_decode_is_exact() {
        let bytes = utxo(1, 3).encode(ValidationMode::Perform).unwrap();
        assert_eq!(Input::decode_exact(&bytes, ValidationMode::Perform).unwrap(), utxo(1, 3));

        let mut long = bytes.clone();
        long.push(0);
        assert_eq!(
            Input::decode_exact(&long, ValidationMode::Perform),
            Err(Error::TrailingBytes(1))
        );

        assert!(matches!(
            Input::decode_exact(&bytes[..20], ValidationMode::Perform),
            Err(Error::Truncated { .. })
        ));
    }

    #[test]
    fn test_same_utxo() {
        assert!(Input::same_utxo(&utxo(1, 0), &utxo(1, 0)));
        assert!(!Input::same_utxo(&utxo(1, 0), &utxo(1, 1)));
        assert!(!Input::same_utxo(&utxo(1, 0), &utxo(2, 0)));

        let treasury = Input::Treasury(TreasuryInput::new([1; 32]));
        assert!(!Input::same_utxo(&treasury, &treasury));
    }

    #[test]
    fn test_json_shape() {
        let value = utxo(0xFF, 7).to_json().unwrap();
        assert_eq!(value["type"], 0);
        assert_eq!(value["transactionOutputIndex"], 7);
        assert_eq!(Input::from_json(&value).unwrap(), utxo(0xFF, 7));

        let treasury = Input::Treasury(TreasuryInput::new([2; 32]));
        assert_eq!(Input::from_json(&treasury.to_json().unwrap()).unwrap(), treasury);
    }

    #[test]
    fn test_output_id_bytes() {
        let id = OutputId::new(TransactionId::new([9; 32]), 0x0201);
        let bytes = id.to_bytes();
        assert_eq!(&bytes[..32], &[9; 32]);
        assert_eq!(&bytes[32..], &[0x01, 0x02]);
    }
}
