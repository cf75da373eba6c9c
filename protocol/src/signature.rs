//! # Signatures
//!
//! Signatures as they travel on the wire. Only Ed25519 can be produced and
//! verified here; BLS signatures are carried as opaque 96-byte blobs so
//! that documents containing them still decode.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::address::{Address, Ed25519Address};
use crate::codec::json::{self, JsonCodec};
use crate::codec::{Codec, Reader, ValidationMode, Writer};
use crate::config::{BLS_SIGNATURE_LENGTH, ED25519_PUBLIC_KEY_LENGTH, ED25519_SIGNATURE_LENGTH};
use crate::crypto;
use crate::error::Result;
use crate::registry::SignatureType;
use crate::signer::SignerError;

/// An Ed25519 signature together with the public key that made it. The key
/// is needed because addresses only carry its hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ed25519Signature {
    public_key: [u8; ED25519_PUBLIC_KEY_LENGTH],
    signature: [u8; ED25519_SIGNATURE_LENGTH],
}

impl Ed25519Signature {
    pub const fn new(
        public_key: [u8; ED25519_PUBLIC_KEY_LENGTH],
        signature: [u8; ED25519_SIGNATURE_LENGTH],
    ) -> Self {
        Self { public_key, signature }
    }

    pub fn public_key(&self) -> &[u8; ED25519_PUBLIC_KEY_LENGTH] {
        &self.public_key
    }

    pub fn signature(&self) -> &[u8; ED25519_SIGNATURE_LENGTH] {
        &self.signature
    }

    /// Checks that the public key hashes to `address` and that the
    /// signature over `message` verifies under it.
    pub fn verify(
        &self,
        message: &[u8],
        address: &Ed25519Address,
    ) -> std::result::Result<(), SignerError> {
        if Ed25519Address::from_public_key(&self.public_key) != *address {
            return Err(SignerError::InvalidSignature);
        }
        crypto::verify_ed25519(&self.public_key, message, &self.signature)
            .map_err(|_| SignerError::InvalidSignature)
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Ed25519SignatureJson {
    #[serde(rename = "type")]
    kind: u32,
    public_key: String,
    signature: String,
}

impl Codec for Ed25519Signature {
    fn encode_into(&self, writer: &mut Writer, _mode: ValidationMode) -> Result<()> {
        writer.write_u8(SignatureType::Ed25519.code());
        writer.write_bytes(&self.public_key);
        writer.write_bytes(&self.signature);
        Ok(())
    }

    fn decode_from(reader: &mut Reader<'_>, mode: ValidationMode) -> Result<Self> {
        reader.expect_type(SignatureType::Ed25519.code(), mode, "ed25519 signature")?;
        Ok(Self {
            public_key: reader.read_array("ed25519 public key")?,
            signature: reader.read_array("ed25519 signature")?,
        })
    }
}

impl JsonCodec for Ed25519Signature {
    fn to_json(&self) -> Result<Value> {
        json::to_shadow(&Ed25519SignatureJson {
            kind: SignatureType::Ed25519.code() as u32,
            public_key: json::encode_hex(&self.public_key),
            signature: json::encode_hex(&self.signature),
        })
    }

    fn from_json(value: &Value) -> Result<Self> {
        json::expect_type(value, SignatureType::Ed25519.code() as u32, "ed25519 signature")?;
        let shadow: Ed25519SignatureJson = json::from_shadow(value)?;
        Ok(Self {
            public_key: json::decode_hex_array(&shadow.public_key, "publicKey")?,
            signature: json::decode_hex_array(&shadow.signature, "signature")?,
        })
    }
}

/// A BLS signature, carried but never verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlsSignature([u8; BLS_SIGNATURE_LENGTH]);

impl BlsSignature {
    pub const fn new(bytes: [u8; BLS_SIGNATURE_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; BLS_SIGNATURE_LENGTH] {
        &self.0
    }
}

#[derive(Serialize, Deserialize)]
struct BlsSignatureJson {
    #[serde(rename = "type")]
    kind: u32,
    signature: String,
}

impl Codec for BlsSignature {
    fn encode_into(&self, writer: &mut Writer, _mode: ValidationMode) -> Result<()> {
        writer.write_u8(SignatureType::Bls.code());
        writer.write_bytes(&self.0);
        Ok(())
    }

    fn decode_from(reader: &mut Reader<'_>, mode: ValidationMode) -> Result<Self> {
        reader.expect_type(SignatureType::Bls.code(), mode, "bls signature")?;
        Ok(Self(reader.read_array("bls signature")?))
    }
}

impl JsonCodec for BlsSignature {
    fn to_json(&self) -> Result<Value> {
        json::to_shadow(&BlsSignatureJson {
            kind: SignatureType::Bls.code() as u32,
            signature: json::encode_hex(&self.0),
        })
    }

    fn from_json(value: &Value) -> Result<Self> {
        json::expect_type(value, SignatureType::Bls.code() as u32, "bls signature")?;
        let shadow: BlsSignatureJson = json::from_shadow(value)?;
        Ok(Self(json::decode_hex_array(&shadow.signature, "signature")?))
    }
}

/// Any signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signature {
    Ed25519(Ed25519Signature),
    Bls(BlsSignature),
}

impl Signature {
    pub fn kind(&self) -> SignatureType {
        match self {
            Self::Ed25519(_) => SignatureType::Ed25519,
            Self::Bls(_) => SignatureType::Bls,
        }
    }

    /// Verifies the signature over `message` for `address`.
    ///
    /// Only an Ed25519 signature for an Ed25519 address can pass. BLS is
    /// rejected as unsupported; any other pairing is an invalid signature.
    pub fn verify(
        &self,
        message: &[u8],
        address: &Address,
    ) -> std::result::Result<(), SignerError> {
        match (self, address) {
            (Self::Ed25519(sig), Address::Ed25519(addr)) => sig.verify(message, addr),
            (Self::Bls(_), _) => Err(SignerError::UnsupportedSignatureScheme),
            (Self::Ed25519(_), _) => Err(SignerError::InvalidSignature),
        }
    }
}

impl From<Ed25519Signature> for Signature {
    fn from(s: Ed25519Signature) -> Self {
        Self::Ed25519(s)
    }
}

impl Codec for Signature {
    fn encode_into(&self, writer: &mut Writer, mode: ValidationMode) -> Result<()> {
        match self {
            Self::Ed25519(s) => s.encode_into(writer, mode),
            Self::Bls(s) => s.encode_into(writer, mode),
        }
    }

    fn decode_from(reader: &mut Reader<'_>, mode: ValidationMode) -> Result<Self> {
        Ok(match SignatureType::select(reader.peek_u8("signature")? as u32)? {
            SignatureType::Ed25519 => Self::Ed25519(Ed25519Signature::decode_from(reader, mode)?),
            SignatureType::Bls => Self::Bls(BlsSignature::decode_from(reader, mode)?),
        })
    }
}

impl JsonCodec for Signature {
    fn to_json(&self) -> Result<Value> {
        match self {
            Self::Ed25519(s) => s.to_json(),
            Self::Bls(s) => s.to_json(),
        }
    }

    fn from_json(value: &Value) -> Result<Self> {
        Ok(match SignatureType::select(json::type_code(value)?)? {
            SignatureType::Ed25519 => Self::Ed25519(Ed25519Signature::from_json(value)?),
            SignatureType::Bls => Self::Bls(BlsSignature::from_json(value)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{generate_ed25519_key, sign_ed25519};
    use crate::error::Error;

    fn signed(message: &[u8]) -> (Ed25519Signature, Ed25519Address) {
        let key = generate_ed25519_key();
        let (pk, sig) = sign_ed25519(&key, message);
        (Ed25519Signature::new(pk, sig), Ed25519Address::from_public_key(&pk))
    }

    #[test]
    fn test_verify_accepts_valid_signature() {
        let (sig, addr) = signed(b"message");
        assert!(sig.verify(b"message", &addr).is_ok());
        assert!(Signature::from(sig).verify(b"message", &Address::Ed25519(addr)).is_ok());
    }

    #[test]
    fn test_verify_rejects_wrong_address() {
        let (sig, _) = signed(b"message");
        let other = Ed25519Address::new([0u8; 32]);
        assert_eq!(sig.verify(b"message", &other), Err(SignerError::InvalidSignature));
    }

    #[test]
    fn test_verify_rejects_single_bit_flip() {
        let (sig, addr) = signed(b"message");
        let mut bytes = *sig.signature();
        bytes[0] ^= 1;
        let tampered = Ed25519Signature::new(*sig.public_key(), bytes);
        assert_eq!(tampered.verify(b"message", &addr), Err(SignerError::InvalidSignature));
    }

    #[test]
    fn test_verify_rejects_public_key_bit_flip() {
        let (sig, addr) = signed(b"message");
        let mut public_key = *sig.public_key();
        public_key[31] ^= 1;
        let tampered = Ed25519Signature::new(public_key, *sig.signature());
        assert_eq!(tampered.verify(b"message", &addr), Err(SignerError::InvalidSignature));
    }

    #[test]
    fn test_verify_rejects_message_bit_flip() {
        let message = *b"message";
        let (sig, addr) = signed(&message);
        let mut flipped = message;
        flipped[3] ^= 1;
        assert_eq!(sig.verify(&flipped, &addr), Err(SignerError::InvalidSignature));
        assert!(sig.verify(&message, &addr).is_ok());
    }

    #[test]
    fn test_bls_is_unsupported_for_verification() {
        let bls = Signature::Bls(BlsSignature::new([1; 96]));
        let addr = Address::Ed25519(Ed25519Address::new([0; 32]));
        assert_eq!(bls.verify(b"m", &addr), Err(SignerError::UnsupportedSignatureScheme));
    }

    #[test]
    fn test_binary_sizes() {
        let (sig, _) = signed(b"m");
        assert_eq!(Signature::from(sig).encode(ValidationMode::Perform).unwrap().len(), 97);
        let bls = Signature::Bls(BlsSignature::new([1; 96]));
        let bytes = bls.encode(ValidationMode::Perform).unwrap();
        assert_eq!(bytes.len(), 97);
        assert_eq!(Signature::decode_exact(&bytes, ValidationMode::Perform).unwrap(), bls);
    }

    #[test]
    fn test_json_roundtrip_and_shape() {
        let (sig, _) = signed(b"m");
        let sig = Signature::from(sig);
        let value = sig.to_json().unwrap();
        assert_eq!(value["type"], 0);
        assert!(value["publicKey"].as_str().unwrap().starts_with("0x"));
        assert_eq!(Signature::from_json(&value).unwrap(), sig);
    }

    #[test]
    fn test_unknown_signature_type() {
        assert!(matches!(
            Signature::decode(&[7u8; 97], ValidationMode::Perform),
            Err(Error::UnknownTypeCode { code: 7, .. })
        ));
    }
}
