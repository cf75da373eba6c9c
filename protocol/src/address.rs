//! # Addresses
//!
//! An address names who may unlock an output. Four schemes exist on the
//! wire:
//!
//! | type | scheme   | body                                    |
//! |------|----------|-----------------------------------------|
//! | 0    | Ed25519  | BLAKE2b-256 of the Ed25519 public key   |
//! | 1    | WOTS     | 49-byte legacy digest (cannot be signed) |
//! | 8    | Alias    | 20-byte alias id                        |
//! | 16   | NFT      | 20-byte NFT id                          |
//!
//! Addresses are plain values: equality, hashing and ordering all come from
//! the bytes, so an `Address` works as a `HashMap` key in the signer.
//!
//! Human-facing strings are Bech32 with payload `type byte || body`.

use bech32::{Bech32, Hrp};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::codec::json::{self, JsonCodec};
use crate::codec::{Codec, Reader, ValidationMode, Writer};
use crate::config::{ALIAS_ID_LENGTH, ED25519_ADDRESS_LENGTH, NFT_ID_LENGTH, WOTS_ADDRESS_LENGTH};
use crate::crypto::{blake2b_160, blake2b_256};
use crate::error::{Error, Result};
use crate::input::OutputId;
use crate::registry::AddressType;

// ---------------------------------------------------------------------------
// Ed25519Address
// ---------------------------------------------------------------------------

/// BLAKE2b-256 hash of an Ed25519 public key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ed25519Address([u8; ED25519_ADDRESS_LENGTH]);

impl Ed25519Address {
    pub const fn new(hash: [u8; ED25519_ADDRESS_LENGTH]) -> Self {
        Self(hash)
    }

    /// Derives the address controlled by `public_key`.
    pub fn from_public_key(public_key: &[u8; 32]) -> Self {
        Self(blake2b_256(public_key))
    }

    pub fn as_bytes(&self) -> &[u8; ED25519_ADDRESS_LENGTH] {
        &self.0
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Ed25519AddressJson {
    #[serde(rename = "type")]
    kind: u32,
    pub_key_hash: String,
}

impl Codec for Ed25519Address {
    fn encode_into(&self, writer: &mut Writer, _mode: ValidationMode) -> Result<()> {
        writer.write_u8(AddressType::Ed25519.code());
        writer.write_bytes(&self.0);
        Ok(())
    }

    fn decode_from(reader: &mut Reader<'_>, mode: ValidationMode) -> Result<Self> {
        reader.expect_type(AddressType::Ed25519.code(), mode, "ed25519 address")?;
        Ok(Self(reader.read_array("ed25519 address")?))
    }
}

impl JsonCodec for Ed25519Address {
    fn to_json(&self) -> Result<Value> {
        json::to_shadow(&Ed25519AddressJson {
            kind: AddressType::Ed25519.code() as u32,
            pub_key_hash: json::encode_hex(&self.0),
        })
    }

    fn from_json(value: &Value) -> Result<Self> {
        json::expect_type(value, AddressType::Ed25519.code() as u32, "ed25519 address")?;
        let shadow: Ed25519AddressJson = json::from_shadow(value)?;
        Ok(Self(json::decode_hex_array(&shadow.pub_key_hash, "pubKeyHash")?))
    }
}

// ---------------------------------------------------------------------------
// WotsAddress
// ---------------------------------------------------------------------------

/// Legacy Winternitz one-time-signature address. It can be encoded and
/// decoded, but nothing in this crate can sign for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WotsAddress([u8; WOTS_ADDRESS_LENGTH]);

impl WotsAddress {
    pub const fn new(digest: [u8; WOTS_ADDRESS_LENGTH]) -> Self {
        Self(digest)
    }

    pub fn as_bytes(&self) -> &[u8; WOTS_ADDRESS_LENGTH] {
        &self.0
    }
}

#[derive(Serialize, Deserialize)]
struct WotsAddressJson {
    #[serde(rename = "type")]
    kind: u32,
    digest: String,
}

impl Codec for WotsAddress {
    fn encode_into(&self, writer: &mut Writer, _mode: ValidationMode) -> Result<()> {
        writer.write_u8(AddressType::Wots.code());
        writer.write_bytes(&self.0);
        Ok(())
    }

    fn decode_from(reader: &mut Reader<'_>, mode: ValidationMode) -> Result<Self> {
        reader.expect_type(AddressType::Wots.code(), mode, "wots address")?;
        Ok(Self(reader.read_array("wots address")?))
    }
}

impl JsonCodec for WotsAddress {
    fn to_json(&self) -> Result<Value> {
        json::to_shadow(&WotsAddressJson {
            kind: AddressType::Wots.code() as u32,
            digest: json::encode_hex(&self.0),
        })
    }

    fn from_json(value: &Value) -> Result<Self> {
        json::expect_type(value, AddressType::Wots.code() as u32, "wots address")?;
        let shadow: WotsAddressJson = json::from_shadow(value)?;
        Ok(Self(json::decode_hex_array(&shadow.digest, "digest")?))
    }
}

// ---------------------------------------------------------------------------
// Alias / NFT ids and addresses
// ---------------------------------------------------------------------------

/// Identifier of an alias output. All zeroes while the alias is being
/// created; the real id is derived from the creating output's id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct AliasId([u8; ALIAS_ID_LENGTH]);

/// Identifier of an NFT output. Same zero-then-derived lifecycle as
/// [`AliasId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct NftId([u8; NFT_ID_LENGTH]);

impl AliasId {
    pub const fn new(bytes: [u8; ALIAS_ID_LENGTH]) -> Self {
        Self(bytes)
    }

    /// The zeroed id a freshly created alias carries.
    pub const fn null() -> Self {
        Self([0u8; ALIAS_ID_LENGTH])
    }

    pub fn is_null(&self) -> bool {
        self.0 == [0u8; ALIAS_ID_LENGTH]
    }

    /// BLAKE2b-160 of the id of the output that created the alias.
    pub fn from_output_id(output_id: &OutputId) -> Self {
        Self(blake2b_160(&output_id.to_bytes()))
    }

    pub fn as_bytes(&self) -> &[u8; ALIAS_ID_LENGTH] {
        &self.0
    }

    pub fn to_address(self) -> Address {
        Address::Alias(AliasAddress(self))
    }
}

impl NftId {
    pub const fn new(bytes: [u8; NFT_ID_LENGTH]) -> Self {
        Self(bytes)
    }

    pub const fn null() -> Self {
        Self([0u8; NFT_ID_LENGTH])
    }

    pub fn is_null(&self) -> bool {
        self.0 == [0u8; NFT_ID_LENGTH]
    }

    pub fn from_output_id(output_id: &OutputId) -> Self {
        Self(blake2b_160(&output_id.to_bytes()))
    }

    pub fn as_bytes(&self) -> &[u8; NFT_ID_LENGTH] {
        &self.0
    }

    pub fn to_address(self) -> Address {
        Address::Nft(NftAddress(self))
    }
}

/// Address controlled by whoever controls the alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AliasAddress(AliasId);

/// Address controlled by whoever holds the NFT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NftAddress(NftId);

impl AliasAddress {
    pub const fn new(id: AliasId) -> Self {
        Self(id)
    }

    pub fn alias_id(&self) -> &AliasId {
        &self.0
    }
}

impl NftAddress {
    pub const fn new(id: NftId) -> Self {
        Self(id)
    }

    pub fn nft_id(&self) -> &NftId {
        &self.0
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AliasAddressJson {
    #[serde(rename = "type")]
    kind: u32,
    alias_id: String,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NftAddressJson {
    #[serde(rename = "type")]
    kind: u32,
    nft_id: String,
}

impl Codec for AliasAddress {
    fn encode_into(&self, writer: &mut Writer, _mode: ValidationMode) -> Result<()> {
        writer.write_u8(AddressType::Alias.code());
        writer.write_bytes(self.0.as_bytes());
        Ok(())
    }

    fn decode_from(reader: &mut Reader<'_>, mode: ValidationMode) -> Result<Self> {
        reader.expect_type(AddressType::Alias.code(), mode, "alias address")?;
        Ok(Self(AliasId(reader.read_array("alias address")?)))
    }
}

impl JsonCodec for AliasAddress {
    fn to_json(&self) -> Result<Value> {
        json::to_shadow(&AliasAddressJson {
            kind: AddressType::Alias.code() as u32,
            alias_id: json::encode_hex(self.0.as_bytes()),
        })
    }

    fn from_json(value: &Value) -> Result<Self> {
        json::expect_type(value, AddressType::Alias.code() as u32, "alias address")?;
        let shadow: AliasAddressJson = json::from_shadow(value)?;
        Ok(Self(AliasId(json::decode_hex_array(&shadow.alias_id, "aliasId")?)))
    }
}

impl Codec for NftAddress {
    fn encode_into(&self, writer: &mut Writer, _mode: ValidationMode) -> Result<()> {
        writer.write_u8(AddressType::Nft.code());
        writer.write_bytes(self.0.as_bytes());
        Ok(())
    }

    fn decode_from(reader: &mut Reader<'_>, mode: ValidationMode) -> Result<Self> {
        reader.expect_type(AddressType::Nft.code(), mode, "nft address")?;
        Ok(Self(NftId(reader.read_array("nft address")?)))
    }
}

impl JsonCodec for NftAddress {
    fn to_json(&self) -> Result<Value> {
        json::to_shadow(&NftAddressJson {
            kind: AddressType::Nft.code() as u32,
            nft_id: json::encode_hex(self.0.as_bytes()),
        })
    }

    fn from_json(value: &Value) -> Result<Self> {
        json::expect_type(value, AddressType::Nft.code() as u32, "nft address")?;
        let shadow: NftAddressJson = json::from_shadow(value)?;
        Ok(Self(NftId(json::decode_hex_array(&shadow.nft_id, "nftId")?)))
    }
}

// ---------------------------------------------------------------------------
// Address
// ---------------------------------------------------------------------------

/// Any address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Address {
    Ed25519(Ed25519Address),
    Wots(WotsAddress),
    Alias(AliasAddress),
    Nft(NftAddress),
}

impl Address {
    pub fn kind(&self) -> AddressType {
        match self {
            Self::Ed25519(_) => AddressType::Ed25519,
            Self::Wots(_) => AddressType::Wots,
            Self::Alias(_) => AddressType::Alias,
            Self::Nft(_) => AddressType::Nft,
        }
    }

    /// Renders the address as Bech32 under `hrp`.
    pub fn to_bech32(&self, hrp: &str) -> Result<String> {
        let hrp = Hrp::parse(hrp).map_err(|e| Error::InvalidBech32(e.to_string()))?;
        let payload = self.encode(ValidationMode::Skip)?;
        bech32::encode::<Bech32>(hrp, &payload).map_err(|e| Error::InvalidBech32(e.to_string()))
    }

    /// Parses a Bech32 address, returning its HRP and the address.
    ///
    /// The payload must be exactly one well-formed address.
    pub fn from_bech32(s: &str) -> Result<(String, Self)> {
        let (hrp, payload) = bech32::decode(s).map_err(|e| Error::InvalidBech32(e.to_string()))?;
        let address = Self::decode_exact(&payload, ValidationMode::Perform)
            .map_err(|e| Error::InvalidBech32(e.to_string()))?;
        Ok((hrp.to_string(), address))
    }
}

impl From<Ed25519Address> for Address {
    fn from(a: Ed25519Address) -> Self {
        Self::Ed25519(a)
    }
}

impl From<AliasAddress> for Address {
    fn from(a: AliasAddress) -> Self {
        Self::Alias(a)
    }
}

impl From<NftAddress> for Address {
    fn from(a: NftAddress) -> Self {
        Self::Nft(a)
    }
}

impl fmt::Display for Address {
    /// `<scheme>:0x<hex body>`, for logs. Use [`Address::to_bech32`] for
    /// anything a user will see.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ed25519(a) => write!(f, "ed25519:{}", json::encode_hex(a.as_bytes())),
            Self::Wots(a) => write!(f, "wots:{}", json::encode_hex(a.as_bytes())),
            Self::Alias(a) => write!(f, "alias:{}", json::encode_hex(a.alias_id().as_bytes())),
            Self::Nft(a) => write!(f, "nft:{}", json::encode_hex(a.nft_id().as_bytes())),
        }
    }
}

impl Codec for Address {
    fn encode_into(&self, writer: &mut Writer, mode: ValidationMode) -> Result<()> {
        match self {
            Self::Ed25519(a) => a.encode_into(writer, mode),
            Self::Wots(a) => a.encode_into(writer, mode),
            Self::Alias(a) => a.encode_into(writer, mode),
            Self::Nft(a) => a.encode_into(writer, mode),
        }
    }

    fn decode_from(reader: &mut Reader<'_>, mode: ValidationMode) -> Result<Self> {
        let kind = AddressType::select(reader.peek_u8("address")? as u32)?;
        Ok(match kind {
            AddressType::Ed25519 => Self::Ed25519(Ed25519Address::decode_from(reader, mode)?),
            AddressType::Wots => Self::Wots(WotsAddress::decode_from(reader, mode)?),
            AddressType::Alias => Self::Alias(AliasAddress::decode_from(reader, mode)?),
            AddressType::Nft => Self::Nft(NftAddress::decode_from(reader, mode)?),
        })
    }
}

impl JsonCodec for Address {
    fn to_json(&self) -> Result<Value> {
        match self {
            Self::Ed25519(a) => a.to_json(),
            Self::Wots(a) => a.to_json(),
            Self::Alias(a) => a.to_json(),
            Self::Nft(a) => a.to_json(),
        }
    }

    fn from_json(value: &Value) -> Result<Self> {
        Ok(match AddressType::select(json::type_code(value)?)? {
            AddressType::Ed25519 => Self::Ed25519(Ed25519Address::from_json(value)?),
            AddressType::Wots => Self::Wots(WotsAddress::from_json(value)?),
            AddressType::Alias => Self::Alias(AliasAddress::from_json(value)?),
            AddressType::Nft => Self::Nft(NftAddress::from_json(value)?),
        })
    }
}
