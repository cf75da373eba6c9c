//! The transaction essence: inputs, outputs and an optional payload.
//!
//! The essence is the part of a transaction that gets signed. Its binary
//! encoding is canonical, so the signing message is simply the BLAKE2b-256
//! of that encoding.
//!
//! Layout: `[type u8 = 0][inputs][outputs][payload length u32][payload]`,
//! with a payload length of zero meaning "no payload".

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::codec::array::{decode_array, encode_array, ArrayMode, ArrayRules, ElementGuard};
use crate::codec::json::{self, JsonCodec};
use crate::codec::{Codec, Reader, ValidationMode, Writer};
use crate::config::{
    ProtocolParameters, HASH_OUTPUT_LENGTH, MAX_INPUT_COUNT, MAX_OUTPUT_COUNT, MIN_INPUT_COUNT,
    MIN_OUTPUT_COUNT,
};
use crate::crypto::blake2b_256;
use crate::error::{Error, Result};
use crate::input::Input;
use crate::output::Output;
use crate::payload::Payload;
use crate::registry::{InputType, OutputType, PayloadType, TransactionEssenceType};

// ---------------------------------------------------------------------------
// Array rules
// ---------------------------------------------------------------------------

fn input_read(code: u32) -> Result<()> {
    match InputType::select(code)? {
        InputType::Utxo => Ok(()),
        InputType::Treasury => Err(Error::TypeMismatch {
            context: "essence inputs",
            actual: code,
        }),
    }
}

fn input_write(input: &Input) -> Result<()> {
    input_read(input.kind().code() as u32)
}

fn output_read(code: u32) -> Result<()> {
    match OutputType::select(code)? {
        OutputType::Basic | OutputType::Alias | OutputType::Foundry | OutputType::Nft => Ok(()),
        OutputType::Treasury => Err(Error::TypeMismatch {
            context: "essence outputs",
            actual: code,
        }),
    }
}

fn output_write(output: &Output) -> Result<()> {
    output_read(output.kind().code() as u32)
}

/// 1..=127 UTXO inputs, each UTXO referenced at most once.
pub const INPUTS_RULES: ArrayRules<Input> = ArrayRules {
    context: "essence inputs",
    min: MIN_INPUT_COUNT,
    max: MAX_INPUT_COUNT,
    guard: Some(ElementGuard {
        read: input_read,
        write: input_write,
    }),
    mode: ArrayMode::Unique(Input::same_utxo),
};

/// 1..=127 outputs of any kind but treasury.
pub const OUTPUTS_RULES: ArrayRules<Output> = ArrayRules {
    context: "essence outputs",
    min: MIN_OUTPUT_COUNT,
    max: MAX_OUTPUT_COUNT,
    guard: Some(ElementGuard {
        read: output_read,
        write: output_write,
    }),
    mode: ArrayMode::None,
};

/// Only tagged data may ride along in an essence.
pub(crate) fn check_payload_kind(payload: &Payload) -> Result<()> {
    match payload.kind() {
        PayloadType::TaggedData => Ok(()),
        other => Err(Error::TypeMismatch {
            context: "essence payload",
            actual: other.code(),
        }),
    }
}

// ---------------------------------------------------------------------------
// TransactionEssence
// ---------------------------------------------------------------------------

/// A normal transaction essence.
///
/// Built through [`TransactionEssence::assemble`] (or the builder), which
/// refuses anything syntactically illegal, or decoded from bytes/JSON,
/// after which [`TransactionEssence::syntactic_validate`] should be run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionEssence {
    inputs: Vec<Input>,
    outputs: Vec<Output>,
    payload: Option<Payload>,
}

impl TransactionEssence {
    /// Puts an essence together and runs full syntactic validation on it.
    pub fn assemble(
        inputs: Vec<Input>,
        outputs: Vec<Output>,
        payload: Option<Payload>,
        params: &ProtocolParameters,
    ) -> Result<Self> {
        let essence = Self {
            inputs,
            outputs,
            payload,
        };
        essence.syntactic_validate(params)?;
        debug!(
            inputs = essence.inputs.len(),
            outputs = essence.outputs.len(),
            has_payload = essence.payload.is_some(),
            "assembled transaction essence"
        );
        Ok(essence)
    }

    /// Skips validation entirely.
    #[cfg(test)]
    pub(crate) fn unchecked(
        inputs: Vec<Input>,
        outputs: Vec<Output>,
        payload: Option<Payload>,
    ) -> Self {
        Self {
            inputs,
            outputs,
            payload,
        }
    }

    pub fn inputs(&self) -> &[Input] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[Output] {
        &self.outputs
    }

    pub fn payload(&self) -> Option<&Payload> {
        self.payload.as_ref()
    }

    /// BLAKE2b-256 of the skip-mode encoding. This is what every input's
    /// owner signs.
    pub fn signing_message(&self) -> Result<[u8; HASH_OUTPUT_LENGTH]> {
        let bytes = self.encode(ValidationMode::Skip)?;
        Ok(blake2b_256(&bytes))
    }
}

#[derive(Serialize, Deserialize)]
struct TransactionEssenceJson {
    #[serde(rename = "type")]
    kind: u32,
    inputs: Vec<Value>,
    outputs: Vec<Value>,
    #[serde(default)]
    payload: Option<Value>,
}

impl Codec for TransactionEssence {
    fn encode_into(&self, writer: &mut Writer, mode: ValidationMode) -> Result<()> {
        writer.write_u8(TransactionEssenceType::Normal.code());
        encode_array(writer, &self.inputs, &INPUTS_RULES, mode)?;
        encode_array(writer, &self.outputs, &OUTPUTS_RULES, mode)?;

        match &self.payload {
            None => writer.write_u32(0),
            Some(payload) => {
                if mode.validates() {
                    check_payload_kind(payload)?;
                }
                let bytes = payload.encode(mode)?;
                let len = u32::try_from(bytes.len()).map_err(|_| Error::TooLong {
                    context: "essence payload",
                    len: bytes.len(),
                    max: u32::MAX as usize,
                })?;
                writer.write_u32(len);
                writer.write_bytes(&bytes);
            }
        }
        Ok(())
    }

    fn decode_from(reader: &mut Reader<'_>, mode: ValidationMode) -> Result<Self> {
        let code = reader.read_u8("transaction essence")?;
        TransactionEssenceType::select(code as u32)?;

        let inputs = decode_array(reader, &INPUTS_RULES, mode)?;
        let outputs = decode_array(reader, &OUTPUTS_RULES, mode)?;

        let payload_len = reader.read_u32("essence payload length")? as usize;
        let payload = if payload_len == 0 {
            None
        } else {
            let bytes = reader.read_bytes(payload_len, "essence payload")?;
            let payload = Payload::decode_exact(bytes, mode)?;
            if mode.validates() {
                check_payload_kind(&payload)?;
            }
            Some(payload)
        };

        Ok(Self {
            inputs,
            outputs,
            payload,
        })
    }
}

impl JsonCodec for TransactionEssence {
    fn to_json(&self) -> Result<Value> {
        json::to_shadow(&TransactionEssenceJson {
            kind: TransactionEssenceType::Normal.code() as u32,
            inputs: json::array_to_json(&self.inputs)?,
            outputs: json::array_to_json(&self.outputs)?,
            payload: self.payload.as_ref().map(|p| p.to_json()).transpose()?,
        })
    }

    fn from_json(value: &Value) -> Result<Self> {
        TransactionEssenceType::select(json::type_code(value)?)?;
        let shadow: TransactionEssenceJson = json::from_shadow(value)?;

        let payload = match shadow.payload {
            None | Some(Value::Null) => None,
            Some(value) => {
                let payload = Payload::from_json(&value)?;
                check_payload_kind(&payload)?;
                Some(payload)
            }
        };

        Ok(Self {
            inputs: json::array_from_json(&shadow.inputs)?,
            outputs: json::array_from_json(&shadow.outputs)?,
            payload,
        })
    }
}
