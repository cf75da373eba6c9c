//! # Cryptographic Primitives
//!
//! Thin wrappers over audited implementations. The ledger needs exactly
//! three things from cryptography:
//!
//! - **BLAKE2b-256** for signing messages and Ed25519 address derivation.
//! - **BLAKE2b-160** for alias and NFT ids derived from output ids.
//! - **Ed25519** for signing and verifying essences.
//!
//! Nothing here logs key bytes, and `KeyMaterial`'s `Debug` output is
//! redacted. Keep it that way.

pub mod hash;
pub mod keys;
pub mod signatures;

pub use hash::{blake2b_160, blake2b_256};
pub use keys::{generate_ed25519_key, KeyMaterial};
pub use signatures::{sign_ed25519, verify_ed25519, SignatureError};
