//! Type registry: the closed mapping from wire discriminants to variants.
//!
//! Every polymorphic category gets one selector enum. Binary decoding peeks
//! the type code and asks the selector; JSON decoding reads the `type` field
//! and asks the same selector. The set of legal variants is therefore written
//! down exactly once, here.
//!
//! Adding a variant means adding a line to the right `type_registry!` block
//! and a match arm where the category is decoded. The compiler points at
//! every match that needs the new arm.

use std::fmt;

use crate::error::{Error, Result};

/// The polymorphic record categories of the wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Address,
    Signature,
    Input,
    Output,
    UnlockCondition,
    FeatureBlock,
    Payload,
    TransactionEssence,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Address => "address",
            Self::Signature => "signature",
            Self::Input => "input",
            Self::Output => "output",
            Self::UnlockCondition => "unlock condition",
            Self::FeatureBlock => "feature block",
            Self::Payload => "payload",
            Self::TransactionEssence => "transaction essence",
        };
        f.write_str(name)
    }
}

macro_rules! type_registry {
    (
        $(#[$meta:meta])*
        $name:ident : $repr:ty => $category:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $code:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr($repr)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $code ),+
        }

        impl $name {
            /// Every registered variant, in ascending type-code order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Resolves a wire type code, failing with `UnknownTypeCode`.
            pub fn select(code: u32) -> Result<Self> {
                match code {
                    $( $code => Ok($name::$variant), )+
                    _ => Err(Error::UnknownTypeCode {
                        category: Category::$category,
                        code,
                    }),
                }
            }

            /// The wire type code.
            pub const fn code(self) -> $repr {
                self as $repr
            }
        }
    };
}

type_registry! {
    /// Address schemes.
    AddressType: u8 => Address {
        Ed25519 = 0,
        Wots = 1,
        Alias = 8,
        Nft = 16,
    }
}

type_registry! {
    /// Signature schemes.
    SignatureType: u8 => Signature {
        Ed25519 = 0,
        Bls = 1,
    }
}

type_registry! {
    /// Input kinds.
    InputType: u8 => Input {
        Utxo = 0,
        Treasury = 1,
    }
}

type_registry! {
    /// Output kinds.
    OutputType: u8 => Output {
        Treasury = 2,
        Basic = 3,
        Alias = 4,
        Foundry = 5,
        Nft = 6,
    }
}

type_registry! {
    /// Unlock condition kinds.
    UnlockConditionType: u8 => UnlockCondition {
        Address = 0,
        DustDepositReturn = 1,
        StateControllerAddress = 2,
        GovernorAddress = 3,
        ImmutableAliasAddress = 4,
    }
}

type_registry! {
    /// Feature block kinds.
    FeatureBlockType: u8 => FeatureBlock {
        Sender = 0,
        Issuer = 1,
        Metadata = 2,
        TimelockMilestoneIndex = 3,
        TimelockUnix = 4,
        ExpirationMilestoneIndex = 5,
        ExpirationUnix = 6,
        Tag = 7,
    }
}

type_registry! {
    /// Payload kinds. Payload type codes are 32 bits wide on the wire.
    PayloadType: u32 => Payload {
        TreasuryTransaction = 4,
        TaggedData = 5,
    }
}

type_registry! {
    /// Transaction essence kinds.
    TransactionEssenceType: u8 => TransactionEssence {
        Normal = 0,
    }
}
