//! # Protocol Configuration & Constants
//!
//! Every limit the ledger enforces lives here: lengths, counts, the total
//! token supply, and the rent parameters that turn an output's size into
//! its minimum deposit. If you find a bare `127` somewhere else in the
//! crate, it should be pointing back at this file.
//!
//! Constants are fixed by the wire format and never change at runtime.
//! [`ProtocolParameters`] is the part that does vary per network (HRP,
//! supply, rent) and is loaded from JSON.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::address::{Address, Ed25519Address};
use crate::codec::Codec;
use crate::error::Result;
use crate::output::{BasicOutput, Output, UnlockCondition};

// ---------------------------------------------------------------------------
// Supply
// ---------------------------------------------------------------------------

/// Total number of base tokens that can ever exist. No single output, and
/// no sum of outputs in one essence, may exceed this.
pub const TOKEN_SUPPLY: u64 = 2_779_530_283_277_761;

// ---------------------------------------------------------------------------
// Cryptographic Parameters
// ---------------------------------------------------------------------------

/// The hash behind signing messages, Ed25519 addresses and derived ids.
pub const SIGNING_HASH_FUNCTION: &str = "BLAKE2b-256";

/// BLAKE2b-256 digest length.
pub const HASH_OUTPUT_LENGTH: usize = 32;

/// Ed25519 public key length in bytes.
pub const ED25519_PUBLIC_KEY_LENGTH: usize = 32;

/// Ed25519 signature length. Always 64 bytes.
pub const ED25519_SIGNATURE_LENGTH: usize = 64;

/// BLS signatures are carried as opaque blobs of this size.
pub const BLS_SIGNATURE_LENGTH: usize = 96;

// ---------------------------------------------------------------------------
// Identifier Lengths
// ---------------------------------------------------------------------------

pub const TRANSACTION_ID_LENGTH: usize = 32;

/// Transaction id plus a `u16` output index.
pub const OUTPUT_ID_LENGTH: usize = TRANSACTION_ID_LENGTH + 2;

pub const MILESTONE_ID_LENGTH: usize = 32;

pub const ED25519_ADDRESS_LENGTH: usize = 32;

/// Legacy WOTS address digest length.
pub const WOTS_ADDRESS_LENGTH: usize = 49;

/// Alias ids and NFT ids are BLAKE2b-160 digests of an output id.
pub const ALIAS_ID_LENGTH: usize = 20;
pub const NFT_ID_LENGTH: usize = 20;

pub const TOKEN_TAG_LENGTH: usize = 12;

/// Alias address (type byte + id), serial number, token scheme.
pub const FOUNDRY_ID_LENGTH: usize = 1 + ALIAS_ID_LENGTH + 4 + 1;

/// Foundry id followed by the token tag.
pub const TOKEN_ID_LENGTH: usize = FOUNDRY_ID_LENGTH + TOKEN_TAG_LENGTH;

// ---------------------------------------------------------------------------
// Transaction Limits
// ---------------------------------------------------------------------------

pub const MIN_INPUT_COUNT: usize = 1;
pub const MAX_INPUT_COUNT: usize = 127;

pub const MIN_OUTPUT_COUNT: usize = 1;
pub const MAX_OUTPUT_COUNT: usize = 127;

/// Highest output index a UTXO input may reference. Follows from the output
/// count limit: indices run 0..127.
pub const MAX_OUTPUT_INDEX: u16 = (MAX_OUTPUT_COUNT - 1) as u16;

/// Distinct native tokens one output may hold.
pub const MAX_NATIVE_TOKENS_PER_OUTPUT: usize = 64;

/// Native token entries over all outputs of an essence.
pub const MAX_NATIVE_TOKENS_PER_ESSENCE: usize = 256;

// ---------------------------------------------------------------------------
// Byte Field Limits
// ---------------------------------------------------------------------------

pub const MAX_METADATA_LENGTH: usize = 8192;
pub const MAX_STATE_METADATA_LENGTH: usize = 8192;
pub const MAX_IMMUTABLE_DATA_LENGTH: usize = 8192;

/// Applies to both the tag feature block and the tagged-data payload tag.
pub const MAX_TAG_LENGTH: usize = 64;

/// Tagged data cannot be larger than the message that carries it.
pub const MAX_TAGGED_DATA_LENGTH: usize = 32_768;

// ---------------------------------------------------------------------------
// Rent
// ---------------------------------------------------------------------------

/// Weighted "key" bytes every output costs: its output id.
pub const RENT_KEY_OFFSET: u64 = OUTPUT_ID_LENGTH as u64;

/// Weighted "data" bytes every output costs on top of its own encoding:
/// the id of the message that booked it plus booking milestone index and
/// timestamp.
pub const RENT_DATA_OFFSET: u64 = 32 + 4 + 4;

pub const DEFAULT_V_BYTE_COST: u64 = 500;
pub const DEFAULT_V_BYTE_FACTOR_DATA: u64 = 1;
pub const DEFAULT_V_BYTE_FACTOR_KEY: u64 = 10;

// ---------------------------------------------------------------------------
// Network Defaults
// ---------------------------------------------------------------------------

pub const DEFAULT_NETWORK_NAME: &str = "testnet";

/// Bech32 human-readable part used when nothing else is configured.
pub const DEFAULT_BECH32_HRP: &str = "tgl";

/// Errors from loading or checking [`ProtocolParameters`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse protocol parameters: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("token supply must be non-zero")]
    ZeroTokenSupply,

    #[error("invalid bech32 human-readable part {0:?}")]
    InvalidHrp(String),

    #[error("virtual byte cost must be non-zero")]
    ZeroByteCost,
}

// ---------------------------------------------------------------------------
// RentStructure
// ---------------------------------------------------------------------------

/// Turns an output's byte size into its minimum deposit.
///
/// `rent = v_byte_cost * (factor_key * 34 + factor_data * (40 + len))`
/// where `len` is the output's binary encoding length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentStructure {
    pub v_byte_cost: u64,
    pub v_byte_factor_data: u64,
    pub v_byte_factor_key: u64,
}

impl Default for RentStructure {
    fn default() -> Self {
        Self {
            v_byte_cost: DEFAULT_V_BYTE_COST,
            v_byte_factor_data: DEFAULT_V_BYTE_FACTOR_DATA,
            v_byte_factor_key: DEFAULT_V_BYTE_FACTOR_KEY,
        }
    }
}

impl RentStructure {
    /// A structure under which every output is free. Handy in tests that
    /// are about something other than deposits.
    pub const fn zero() -> Self {
        Self {
            v_byte_cost: 0,
            v_byte_factor_data: 0,
            v_byte_factor_key: 0,
        }
    }

    /// Rent for an output of `encoded_len` bytes. Saturates instead of
    /// wrapping, so absurd parameters still yield an unpayable rent.
    pub fn rent_for_len(&self, encoded_len: usize) -> u64 {
        let key = self.v_byte_factor_key.saturating_mul(RENT_KEY_OFFSET);
        let data = self
            .v_byte_factor_data
            .saturating_mul(RENT_DATA_OFFSET.saturating_add(encoded_len as u64));
        self.v_byte_cost.saturating_mul(key.saturating_add(data))
    }

    /// Minimum deposit of `output`.
    pub fn rent_cost(&self, output: &Output) -> Result<u64> {
        Ok(self.rent_for_len(output.encoded_len()?))
    }

    /// Rent of the smallest legal output: a basic output locked to an
    /// Ed25519 address, with no tokens and no feature blocks.
    pub fn min_dust_deposit(&self) -> u64 {
        let minimal = Output::Basic(BasicOutput::new(
            0,
            vec![],
            vec![UnlockCondition::Address(Address::Ed25519(Ed25519Address::new([0u8; 32])))],
            vec![],
        ));
        let len = minimal
            .encoded_len()
            .expect("skip-mode encoding of a basic output never fails");
        self.rent_for_len(len)
    }
}

/// Encoded length of the output [`RentStructure::min_dust_deposit`] prices.
pub const MIN_BASIC_OUTPUT_LENGTH: usize = 1 + 8 + 2 + 2 + 1 + 1 + ED25519_ADDRESS_LENGTH + 2;

// ---------------------------------------------------------------------------
// ProtocolParameters
// ---------------------------------------------------------------------------

/// Per-network parameters the validation rules depend on.
///
/// Loaded from the same camelCase JSON a node reports; missing fields fall
/// back to the defaults above.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProtocolParameters {
    pub network_name: String,
    pub bech32_hrp: String,
    pub token_supply: u64,
    pub rent_structure: RentStructure,
}

impl Default for ProtocolParameters {
    fn default() -> Self {
        Self {
            network_name: DEFAULT_NETWORK_NAME.to_string(),
            bech32_hrp: DEFAULT_BECH32_HRP.to_string(),
            token_supply: TOKEN_SUPPLY,
            rent_structure: RentStructure::default(),
        }
    }
}

impl ProtocolParameters {
    /// Parses and validates parameters from JSON.
    pub fn from_json_str(s: &str) -> std::result::Result<Self, ConfigError> {
        let params: Self = serde_json::from_str(s)?;
        params.validate()?;
        Ok(params)
    }

    /// Rejects parameter sets no network could run with.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.token_supply == 0 {
            return Err(ConfigError::ZeroTokenSupply);
        }
        if bech32::Hrp::parse(&self.bech32_hrp).is_err() {
            return Err(ConfigError::InvalidHrp(self.bech32_hrp.clone()));
        }
        // A zero cost is only legal together with zero factors (rent off).
        if self.rent_structure.v_byte_cost == 0 && self.rent_structure != RentStructure::zero() {
            return Err(ConfigError::ZeroByteCost);
        }
        Ok(())
    }

    /// Same parameters with rent switched off.
    pub fn without_rent(mut self) -> Self {
        self.rent_structure = RentStructure::zero();
        self
    }
}
