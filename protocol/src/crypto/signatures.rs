//! # Digital Signatures
//!
//! Ed25519 over raw byte components: the public key and signature arrive as
//! arrays straight out of a decoded `Ed25519Signature`, so that is the shape
//! these functions take.
//!
//! Verification is strict (`verify_strict`): small-order public keys and
//! non-canonical signatures are rejected.

use ed25519_dalek::{Signature as DalekSignature, Signer, SigningKey, VerifyingKey};
use thiserror::Error;

/// Errors during signature operations.
///
/// Callers map both to an invalid signature.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("signature verification failed")]
    VerificationFailed,

    #[error("invalid public key")]
    InvalidPublicKey,
}

/// Signs `message`, returning the public key alongside the signature.
///
/// Ed25519 is deterministic: the same key and message always give the same
/// signature.
pub fn sign_ed25519(key: &SigningKey, message: &[u8]) -> ([u8; 32], [u8; 64]) {
    let signature = key.sign(message);
    (key.verifying_key().to_bytes(), signature.to_bytes())
}

/// Verifies an Ed25519 signature given as raw bytes.
pub fn verify_ed25519(
    public_key: &[u8; 32],
    message: &[u8],
    signature: &[u8; 64],
) -> Result<(), SignatureError> {
    let verifying_key =
        VerifyingKey::from_bytes(public_key).map_err(|_| SignatureError::InvalidPublicKey)?;
    let signature = DalekSignature::from_bytes(signature);
    verifying_key
        .verify_strict(message, &signature)
        .map_err(|_| SignatureError::VerificationFailed)
}
