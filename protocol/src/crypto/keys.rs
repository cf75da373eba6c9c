//! # Key Material
//!
//! Secret keys held by a signer, one variant per signature scheme.
//!
//! Key bytes are never logged. `Debug` prints the scheme and nothing else.

use std::fmt;

use ed25519_dalek::SigningKey;
use rand::rngs::OsRng;

/// Secret material bound to an address.
#[derive(Clone)]
pub enum KeyMaterial {
    /// An Ed25519 signing key. The public key is derived on demand.
    Ed25519(SigningKey),
    /// Bytes for a scheme this crate cannot sign with (e.g. WOTS seeds).
    /// Carried so a keystore can hold them; signing with them always fails.
    Opaque(Vec<u8>),
}

impl KeyMaterial {
    /// Builds Ed25519 material from a 32-byte seed.
    pub fn ed25519_from_seed(seed: &[u8; 32]) -> Self {
        Self::Ed25519(SigningKey::from_bytes(seed))
    }

    /// The Ed25519 public key, if this is Ed25519 material.
    pub fn ed25519_public_key(&self) -> Option<[u8; 32]> {
        match self {
            Self::Ed25519(key) => Some(key.verifying_key().to_bytes()),
            Self::Opaque(_) => None,
        }
    }

    pub fn scheme(&self) -> &'static str {
        match self {
            Self::Ed25519(_) => "ed25519",
            Self::Opaque(_) => "opaque",
        }
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyMaterial::{}([REDACTED])", self.scheme())
    }
}

/// Generates a fresh Ed25519 signing key from the OS RNG.
pub fn generate_ed25519_key() -> SigningKey {
    SigningKey::generate(&mut OsRng)
}
