//! # Address Signer
//!
//! Produces a signature for a message on behalf of an address. The essence
//! signing pipeline only ever asks "sign this digest for that address", so
//! the signer is a one-method trait: plug in an in-memory keystore, a
//! hardware wallet bridge, or a closure in tests.
//!
//! ## What can be signed
//!
//! | address | outcome                                   |
//! |---------|-------------------------------------------|
//! | Ed25519 | Ed25519 signature, if an Ed25519 key is held |
//! | WOTS    | `UnsupportedSignatureScheme`, always       |
//! | Alias / NFT | `UnknownAddressType` (unlocked by reference, never signed) |

use std::collections::HashMap;

use ed25519_dalek::SigningKey;
use thiserror::Error;
use tracing::trace;

use crate::address::{Address, Ed25519Address};
use crate::crypto::{self, generate_ed25519_key};
use crate::signature::{Ed25519Signature, Signature};

pub use crate::crypto::KeyMaterial;

/// Why a signature could not be produced or checked.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignerError {
    /// WOTS addresses can be decoded but never signed for.
    #[error("signature scheme not supported")]
    UnsupportedSignatureScheme,

    /// No key is held for the address, or the key is for another scheme.
    #[error("signing keys for address missing")]
    MissingSigningKeys,

    /// The address kind is not one a signature can unlock.
    #[error("address type cannot be signed for")]
    UnknownAddressType,

    #[error("invalid signature")]
    InvalidSignature,
}

/// Signs `message` for `address`.
pub trait AddressSigner {
    fn sign(&self, address: &Address, message: &[u8]) -> Result<Signature, SignerError>;
}

impl<F> AddressSigner for F
where
    F: Fn(&Address, &[u8]) -> Result<Signature, SignerError>,
{
    fn sign(&self, address: &Address, message: &[u8]) -> Result<Signature, SignerError> {
        self(address, message)
    }
}

/// An address together with the key material that controls it.
#[derive(Debug, Clone)]
pub struct AddressKeys {
    pub address: Address,
    pub keys: KeyMaterial,
}

impl AddressKeys {
    pub fn new(address: Address, keys: KeyMaterial) -> Self {
        Self { address, keys }
    }

    /// Pairs an Ed25519 key with the address derived from its public key.
    pub fn from_ed25519(key: SigningKey) -> Self {
        let public_key = key.verifying_key().to_bytes();
        let address = Address::Ed25519(Ed25519Address::from_public_key(&public_key));
        Self {
            address,
            keys: KeyMaterial::Ed25519(key),
        }
    }

    /// A fresh random Ed25519 key and its address.
    pub fn generate_ed25519() -> Self {
        Self::from_ed25519(generate_ed25519_key())
    }
}

/// Keys held in a map, built once and never changed.
///
/// If the same address is given twice, the later keys win.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAddressSigner {
    keys: HashMap<Address, KeyMaterial>,
}

impl InMemoryAddressSigner {
    pub fn new(address_keys: impl IntoIterator<Item = AddressKeys>) -> Self {
        let keys = address_keys.into_iter().map(|ak| (ak.address, ak.keys)).collect();
        Self { keys }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl AddressSigner for InMemoryAddressSigner {
    fn sign(&self, address: &Address, message: &[u8]) -> Result<Signature, SignerError> {
        match address {
            Address::Ed25519(_) => {
                let key = match self.keys.get(address) {
                    Some(KeyMaterial::Ed25519(key)) => key,
                    Some(other) => {
                        trace!(%address, scheme = other.scheme(), "held keys are not ed25519");
                        return Err(SignerError::MissingSigningKeys);
                    }
                    None => {
                        trace!(%address, "no keys held for address");
                        return Err(SignerError::MissingSigningKeys);
                    }
                };
                let (public_key, signature) = crypto::sign_ed25519(key, message);
                trace!(%address, "produced ed25519 signature");
                Ok(Signature::Ed25519(Ed25519Signature::new(public_key, signature)))
            }
            Address::Wots(_) => Err(SignerError::UnsupportedSignatureScheme),
            Address::Alias(_) | Address::Nft(_) => Err(SignerError::UnknownAddressType),
        }
    }
}
