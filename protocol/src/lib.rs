//! # Tangle Protocol: Object Model & Codec Core
//!
//! The data layer a client needs to talk to a UTXO ledger node: typed
//! records, their byte-exact binary encoding, their JSON shape, the local
//! ("syntactic") legality rules, and the signing pipeline for transaction
//! essences.
//!
//! Nothing in this crate talks to the network or touches the disk. A node
//! client feeds it bytes or JSON and gets typed, validated values back; a
//! wallet feeds it inputs, outputs and keys and gets signatures back.
//!
//! ## Architecture
//!
//! - **codec**: `Reader`/`Writer`, the [`Codec`] trait, JSON helpers and the
//!   array rule engine every nested sequence goes through.
//! - **registry**: the closed mapping from wire type codes to variants.
//! - **address**, **signature**, **input**, **output**, **payload**: the
//!   domain records.
//! - **transaction**: essence assembly, syntactic validation and signing.
//! - **signer**: the [`AddressSigner`] abstraction and its in-memory keystore.
//! - **crypto**: BLAKE2b hashing, Ed25519 keys and verification.
//! - **config**: protocol constants, rent structure, network parameters.
//! - **logging**: `tracing` subscriber setup for binaries and tests.
//!
//! ## Ground rules
//!
//! 1. Encoding is the canonical form. Equal values always produce equal bytes.
//! 2. Decoding never coerces: malformed bytes and illegal values are
//!    different errors.
//! 3. Validation is fail-fast. The first broken rule is the one reported.
//! 4. Signing is all-or-nothing.

pub mod address;
pub mod codec;
pub mod config;
pub mod crypto;
pub mod error;
pub mod input;
pub mod logging;
pub mod output;
pub mod payload;
pub mod registry;
pub mod signature;
pub mod signer;
pub mod transaction;

pub use address::{Address, AliasAddress, AliasId, Ed25519Address, NftAddress, NftId, WotsAddress};
pub use codec::{Codec, JsonCodec, ValidationMode};
pub use config::{ProtocolParameters, RentStructure};
pub use error::{Error, Result};
pub use input::{Input, OutputId, TransactionId, TreasuryInput, UtxoInput};
pub use output::{
    AliasOutput, BasicOutput, FeatureBlock, FoundryOutput, NativeToken, NftOutput, Output,
    TokenId, TreasuryOutput, UnlockCondition,
};
pub use payload::{Payload, TaggedData, TreasuryTransaction};
pub use signature::{BlsSignature, Ed25519Signature, Signature};
pub use signer::{AddressKeys, AddressSigner, InMemoryAddressSigner, SignerError};
pub use transaction::{TransactionEssence, TransactionEssenceBuilder};
