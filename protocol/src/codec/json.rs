//! JSON shape of the records.
//!
//! Each variant converts through a private "shadow" struct that only exists
//! for serde: an integer `type` plus hex strings and numbers. The domain
//! types themselves stay free of serde attributes, and the conversion in
//! each direction is written out per variant.
//!
//! Conventions: fixed and variable-length bytes are `0x`-prefixed lowercase
//! hex (the prefix is optional when parsing), `u16`/`u32`/`u64` are plain
//! JSON numbers, `U256` is a `0x` hex string.

use primitive_types::U256;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{Error, Result};

/// JSON encoding contract, mirroring [`super::Codec`].
pub trait JsonCodec: Sized {
    fn to_json(&self) -> Result<Value>;

    fn from_json(value: &Value) -> Result<Self>;

    fn to_json_string(&self) -> Result<String> {
        serde_json::to_string(&self.to_json()?).map_err(|e| Error::InvalidJson(e.to_string()))
    }

    fn from_json_str(s: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(s).map_err(|e| Error::InvalidJson(e.to_string()))?;
        Self::from_json(&value)
    }
}

/// Reads the integer `type` field of an object.
pub fn type_code(value: &Value) -> Result<u32> {
    let raw = value
        .get("type")
        .ok_or_else(|| Error::InvalidJson("missing \"type\" field".into()))?;
    raw.as_u64()
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| {
            Error::InvalidJson(format!("\"type\" must be a 32-bit unsigned integer, got {}", raw))
        })
}

/// Fails with `TypeMismatch` unless the object's `type` field is `expected`.
pub fn expect_type(value: &Value, expected: u32, context: &'static str) -> Result<()> {
    let actual = type_code(value)?;
    if actual != expected {
        return Err(Error::TypeMismatch { context, actual });
    }
    Ok(())
}

/// Deserializes a shadow struct from a JSON value.
pub fn from_shadow<T: DeserializeOwned>(value: &Value) -> Result<T> {
    T::deserialize(value).map_err(|e| Error::InvalidJson(e.to_string()))
}

/// Serializes a shadow struct into a JSON value.
pub fn to_shadow<T: Serialize>(shadow: &T) -> Result<Value> {
    serde_json::to_value(shadow).map_err(|e| Error::InvalidJson(e.to_string()))
}

pub fn encode_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

pub fn decode_hex(s: &str, context: &'static str) -> Result<Vec<u8>> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    hex::decode(digits).map_err(|e| Error::InvalidJson(format!("{}: {}", context, e)))
}

pub fn decode_hex_array<const N: usize>(s: &str, context: &'static str) -> Result<[u8; N]> {
    let bytes = decode_hex(s, context)?;
    bytes.try_into().map_err(|v: Vec<u8>| {
        Error::InvalidJson(format!("{}: expected {} bytes, got {}", context, N, v.len()))
    })
}

pub fn encode_u256(v: &U256) -> String {
    format!("0x{:x}", v)
}

pub fn decode_u256(s: &str, context: &'static str) -> Result<U256> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    if digits.is_empty() {
        return Err(Error::InvalidJson(format!("{}: empty number", context)));
    }
    U256::from_str_radix(digits, 16)
        .map_err(|e| Error::InvalidJson(format!("{}: {:?}", context, e)))
}

pub fn array_to_json<T: JsonCodec>(items: &[T]) -> Result<Vec<Value>> {
    items.iter().map(JsonCodec::to_json).collect()
}

pub fn array_from_json<T: JsonCodec>(values: &[Value]) -> Result<Vec<T>> {
    values.iter().map(T::from_json).collect()
}
