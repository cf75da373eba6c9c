//! # Outputs
//!
//! An output is a deposit of base tokens (and optionally native tokens)
//! together with the conditions under which it may be consumed.
//!
//! | type | kind     | carries                                                   |
//! |------|----------|-----------------------------------------------------------|
//! | 2    | Treasury | amount only, lives in treasury payloads                   |
//! | 3    | Basic    | tokens, unlock conditions, feature blocks                 |
//! | 4    | Alias    | + alias id, state index/metadata, foundry counter         |
//! | 5    | Foundry  | + serial number, token tag, supplies, token scheme        |
//! | 6    | NFT      | + NFT id, immutable data                                  |
//!
//! Every kind except Treasury declares which unlock conditions and feature
//! blocks it accepts as `ArrayRules` consts in its own module. Decoding under
//! `Perform` enforces them; essence assembly enforces them unconditionally.

use serde_json::Value;

use crate::codec::json::{self, JsonCodec};
use crate::codec::{Codec, Reader, ValidationMode, Writer};
use crate::error::Result;
use crate::registry::OutputType;

/// Declares the `ArrayRules` for a sequence of unlock conditions or feature
/// blocks restricted to `allowed` kinds, in ascending type order.
macro_rules! restricted_array_rules {
    (
        $(#[$meta:meta])*
        $vis:vis $name:ident: $elem:ident / $kind:ident, $context:literal, min = $min:expr,
        [$($allowed:ident),+ $(,)?]
    ) => {
        $(#[$meta])*
        $vis const $name: $crate::codec::array::ArrayRules<$elem> = {
            const ALLOWED: &[$kind] = &[$($kind::$allowed),+];

            fn read(code: u32) -> $crate::error::Result<()> {
                $elem::check_allowed(code, ALLOWED, $context)
            }

            fn write(item: &$elem) -> $crate::error::Result<()> {
                read(item.type_key())
            }

            $crate::codec::array::ArrayRules {
                context: $context,
                min: $min,
                max: ALLOWED.len(),
                guard: Some($crate::codec::array::ElementGuard { read, write }),
                mode: $crate::codec::array::ArrayMode::Ascending($elem::type_key),
            }
        };
    };
}

pub mod alias;
pub mod basic;
pub mod feature_block;
pub mod foundry;
pub mod native_token;
pub mod nft;
pub mod treasury;
pub mod unlock_condition;

pub use alias::AliasOutput;
pub use basic::BasicOutput;
pub use feature_block::FeatureBlock;
pub use foundry::{FoundryOutput, TokenScheme};
pub use native_token::{NativeToken, TokenId, NATIVE_TOKENS_RULES};
pub use nft::NftOutput;
pub use treasury::TreasuryOutput;
pub use unlock_condition::UnlockCondition;

/// Any output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    Treasury(TreasuryOutput),
    Basic(BasicOutput),
    Alias(AliasOutput),
    Foundry(FoundryOutput),
    Nft(NftOutput),
}

impl Output {
    pub fn kind(&self) -> OutputType {
        match self {
            Self::Treasury(_) => OutputType::Treasury,
            Self::Basic(_) => OutputType::Basic,
            Self::Alias(_) => OutputType::Alias,
            Self::Foundry(_) => OutputType::Foundry,
            Self::Nft(_) => OutputType::Nft,
        }
    }

    /// Base token deposit.
    pub fn amount(&self) -> u64 {
        match self {
            Self::Treasury(o) => o.amount,
            Self::Basic(o) => o.amount,
            Self::Alias(o) => o.amount,
            Self::Foundry(o) => o.amount,
            Self::Nft(o) => o.amount,
        }
    }

    pub fn native_tokens(&self) -> &[NativeToken] {
        match self {
            Self::Treasury(_) => &[],
            Self::Basic(o) => &o.native_tokens,
            Self::Alias(o) => &o.native_tokens,
            Self::Foundry(o) => &o.native_tokens,
            Self::Nft(o) => &o.native_tokens,
        }
    }

    pub fn unlock_conditions(&self) -> &[UnlockCondition] {
        match self {
            Self::Treasury(_) => &[],
            Self::Basic(o) => &o.unlock_conditions,
            Self::Alias(o) => &o.unlock_conditions,
            Self::Foundry(o) => &o.unlock_conditions,
            Self::Nft(o) => &o.unlock_conditions,
        }
    }

    pub fn feature_blocks(&self) -> &[FeatureBlock] {
        match self {
            Self::Treasury(_) => &[],
            Self::Basic(o) => &o.feature_blocks,
            Self::Alias(o) => &o.feature_blocks,
            Self::Foundry(o) => &o.feature_blocks,
            Self::Nft(o) => &o.feature_blocks,
        }
    }

    pub fn immutable_feature_blocks(&self) -> &[FeatureBlock] {
        match self {
            Self::Treasury(_) | Self::Basic(_) => &[],
            Self::Alias(o) => &o.immutable_feature_blocks,
            Self::Foundry(o) => &o.immutable_feature_blocks,
            Self::Nft(o) => &o.immutable_feature_blocks,
        }
    }

    /// Amount the consumer must send back, if the output carries a dust
    /// deposit return condition.
    pub fn dust_deposit_return(&self) -> Option<u64> {
        self.unlock_conditions().iter().find_map(|uc| match uc {
            UnlockCondition::DustDepositReturn { amount, .. } => Some(*amount),
            _ => None,
        })
    }

    /// Applies the output kind's array rules to its nested sequences.
    pub fn check_structure(&self) -> Result<()> {
        match self {
            Self::Treasury(_) => Ok(()),
            Self::Basic(o) => o.check_structure(),
            Self::Alias(o) => o.check_structure(),
            Self::Foundry(o) => o.check_structure(),
            Self::Nft(o) => o.check_structure(),
        }
    }

    /// Kind-specific legality: required unlock conditions, cyclic
    /// addresses, supply rules, feature block values. `position` is the
    /// output's index in its essence, used in errors.
    pub fn validate(&self, position: usize) -> Result<()> {
        for block in self.feature_blocks().iter().chain(self.immutable_feature_blocks()) {
            block.validate(position)?;
        }
        match self {
            Self::Treasury(_) => Ok(()),
            Self::Basic(o) => o.validate(position),
            Self::Alias(o) => o.validate(position),
            Self::Foundry(o) => o.validate(position),
            Self::Nft(o) => o.validate(position),
        }
    }
}

macro_rules! output_from {
    ($($variant:ident($ty:ty)),+ $(,)?) => {
        $(
            impl From<$ty> for Output {
                fn from(o: $ty) -> Self {
                    Self::$variant(o)
                }
            }
        )+
    };
}

output_from!(
    Treasury(TreasuryOutput),
    Basic(BasicOutput),
    Alias(AliasOutput),
    Foundry(FoundryOutput),
    Nft(NftOutput),
);

impl Codec for Output {
    fn encode_into(&self, writer: &mut Writer, mode: ValidationMode) -> Result<()> {
        match self {
            Self::Treasury(o) => o.encode_into(writer, mode),
            Self::Basic(o) => o.encode_into(writer, mode),
            Self::Alias(o) => o.encode_into(writer, mode),
            Self::Foundry(o) => o.encode_into(writer, mode),
            Self::Nft(o) => o.encode_into(writer, mode),
        }
    }

    fn decode_from(reader: &mut Reader<'_>, mode: ValidationMode) -> Result<Self> {
        Ok(match OutputType::select(reader.peek_u8("output")? as u32)? {
            OutputType::Treasury => Self::Treasury(TreasuryOutput::decode_from(reader, mode)?),
            OutputType::Basic => Self::Basic(BasicOutput::decode_from(reader, mode)?),
            OutputType::Alias => Self::Alias(AliasOutput::decode_from(reader, mode)?),
            OutputType::Foundry => Self::Foundry(FoundryOutput::decode_from(reader, mode)?),
            OutputType::Nft => Self::Nft(NftOutput::decode_from(reader, mode)?),
        })
    }
}

impl JsonCodec for Output {
    fn to_json(&self) -> Result<Value> {
        match self {
            Self::Treasury(o) => o.to_json(),
            Self::Basic(o) => o.to_json(),
            Self::Alias(o) => o.to_json(),
            Self::Foundry(o) => o.to_json(),
            Self::Nft(o) => o.to_json(),
        }
    }

    fn from_json(value: &Value) -> Result<Self> {
        Ok(match OutputType::select(json::type_code(value)?)? {
            OutputType::Treasury => Self::Treasury(TreasuryOutput::from_json(value)?),
            OutputType::Basic => Self::Basic(BasicOutput::from_json(value)?),
            OutputType::Alias => Self::Alias(AliasOutput::from_json(value)?),
            OutputType::Foundry => Self::Foundry(FoundryOutput::from_json(value)?),
            OutputType::Nft => Self::Nft(NftOutput::from_json(value)?),
        })
    }
}
