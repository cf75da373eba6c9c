//! Unlock conditions: who may unlock an output, and on what terms.
//!
//! Each output kind accepts its own subset of conditions, in strictly
//! ascending type order, at most one of each. The subsets are enforced by
//! the array rules each output module declares.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::address::{Address, AliasAddress};
use crate::codec::json::{self, JsonCodec};
use crate::codec::{Codec, Reader, ValidationMode, Writer};
use crate::error::{Error, Result};
use crate::registry::UnlockConditionType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnlockCondition {
    /// The address that may unlock the output.
    Address(Address),
    /// Whoever unlocks the output must send `amount` back to
    /// `return_address`, reclaiming the storage deposit for the sender.
    DustDepositReturn { return_address: Address, amount: u64 },
    /// The alias state controller.
    StateControllerAddress(Address),
    /// The alias governor.
    GovernorAddress(Address),
    /// The alias that controls a foundry. Can never change.
    ImmutableAliasAddress(AliasAddress),
}

impl UnlockCondition {
    pub fn kind(&self) -> UnlockConditionType {
        match self {
            Self::Address(_) => UnlockConditionType::Address,
            Self::DustDepositReturn { .. } => UnlockConditionType::DustDepositReturn,
            Self::StateControllerAddress(_) => UnlockConditionType::StateControllerAddress,
            Self::GovernorAddress(_) => UnlockConditionType::GovernorAddress,
            Self::ImmutableAliasAddress(_) => UnlockConditionType::ImmutableAliasAddress,
        }
    }

    /// Ordering key for the ascending-type rule.
    pub fn type_key(&self) -> u32 {
        self.kind().code() as u32
    }

    /// The address this condition names, if any.
    pub fn address(&self) -> Address {
        match self {
            Self::Address(a) | Self::StateControllerAddress(a) | Self::GovernorAddress(a) => *a,
            Self::DustDepositReturn { return_address, .. } => *return_address,
            Self::ImmutableAliasAddress(a) => Address::Alias(*a),
        }
    }

    /// Read guard body: `code` must be registered and in `allowed`.
    pub(crate) fn check_allowed(
        code: u32,
        allowed: &[UnlockConditionType],
        context: &'static str,
    ) -> Result<()> {
        let kind = UnlockConditionType::select(code)?;
        if !allowed.contains(&kind) {
            return Err(Error::TypeMismatch { context, actual: code });
        }
        Ok(())
    }

    /// Finds the condition of `kind` in a list.
    pub fn find(
        conditions: &[UnlockCondition],
        kind: UnlockConditionType,
    ) -> Option<&UnlockCondition> {
        conditions.iter().find(|c| c.kind() == kind)
    }
}

#[derive(Serialize, Deserialize)]
struct AddressConditionJson {
    #[serde(rename = "type")]
    kind: u32,
    address: Value,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DustDepositReturnJson {
    #[serde(rename = "type")]
    kind: u32,
    return_address: Value,
    amount: u64,
}

impl Codec for UnlockCondition {
    fn encode_into(&self, writer: &mut Writer, mode: ValidationMode) -> Result<()> {
        writer.write_u8(self.kind().code());
        match self {
            Self::Address(a) | Self::StateControllerAddress(a) | Self::GovernorAddress(a) => {
                a.encode_into(writer, mode)
            }
            Self::DustDepositReturn { return_address, amount } => {
                return_address.encode_into(writer, mode)?;
                writer.write_u64(*amount);
                Ok(())
            }
            Self::ImmutableAliasAddress(a) => a.encode_into(writer, mode),
        }
    }

    fn decode_from(reader: &mut Reader<'_>, mode: ValidationMode) -> Result<Self> {
        let kind = UnlockConditionType::select(reader.read_u8("unlock condition")? as u32)?;
        Ok(match kind {
            UnlockConditionType::Address => Self::Address(Address::decode_from(reader, mode)?),
            UnlockConditionType::DustDepositReturn => Self::DustDepositReturn {
                return_address: Address::decode_from(reader, mode)?,
                amount: reader.read_u64("dust deposit return amount")?,
            },
            UnlockConditionType::StateControllerAddress => {
                Self::StateControllerAddress(Address::decode_from(reader, mode)?)
            }
            UnlockConditionType::GovernorAddress => {
                Self::GovernorAddress(Address::decode_from(reader, mode)?)
            }
            UnlockConditionType::ImmutableAliasAddress => {
                Self::ImmutableAliasAddress(AliasAddress::decode_from(reader, mode)?)
            }
        })
    }
}

impl JsonCodec for UnlockCondition {
    fn to_json(&self) -> Result<Value> {
        let kind = self.kind().code() as u32;
        match self {
            Self::DustDepositReturn {
                return_address,
                amount,
            } => json::to_shadow(&DustDepositReturnJson {
                kind,
                return_address: return_address.to_json()?,
                amount: *amount,
            }),
            other => json::to_shadow(&AddressConditionJson {
                kind,
                address: other.address().to_json()?,
            }),
        }
    }

    fn from_json(value: &Value) -> Result<Self> {
        let address =
            || -> Result<Value> { Ok(json::from_shadow::<AddressConditionJson>(value)?.address) };
        Ok(match UnlockConditionType::select(json::type_code(value)?)? {
            UnlockConditionType::Address => Self::Address(Address::from_json(&address()?)?),
            UnlockConditionType::DustDepositReturn => {
                let shadow: DustDepositReturnJson = json::from_shadow(value)?;
                Self::DustDepositReturn {
                    return_address: Address::from_json(&shadow.return_address)?,
                    amount: shadow.amount,
                }
            }
            UnlockConditionType::StateControllerAddress => {
                Self::StateControllerAddress(Address::from_json(&address()?)?)
            }
            UnlockConditionType::GovernorAddress => {
                Self::GovernorAddress(Address::from_json(&address()?)?)
            }
            UnlockConditionType::ImmutableAliasAddress => {
                Self::ImmutableAliasAddress(AliasAddress::from_json(&address()?)?)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::{AliasId, Ed25519Address};

    fn ed() -> Address {
        Address::Ed25519(Ed25519Address::new([3; 32]))
    }

    #[test]
    fn test_dust_return_layout() {
        let uc = UnlockCondition::DustDepositReturn {
            return_address: ed(),
            amount: 1_000_000,
        };
        let bytes = uc.encode(ValidationMode::Perform).unwrap();
        assert_eq!(bytes[0], 1);
        assert_eq!(bytes.len(), 1 + 33 + 8);
        assert_eq!(UnlockCondition::decode_exact(&bytes, ValidationMode::Perform).unwrap(), uc);
    }

    #[test]
    fn test_immutable_alias_requires_alias_address() {
        let bytes = UnlockCondition::GovernorAddress(ed()).encode(ValidationMode::Skip).unwrap();
        let mut tampered = bytes.clone();
        tampered[0] = UnlockConditionType::ImmutableAliasAddress.code();
        assert!(matches!(
            UnlockCondition::decode(&tampered, ValidationMode::Perform),
            Err(Error::TypeMismatch { actual: 0, .. })
        ));
    }

    #[test]
    fn test_check_allowed() {
        let allowed = [UnlockConditionType::Address, UnlockConditionType::DustDepositReturn];
        assert!(UnlockCondition::check_allowed(0, &allowed, "basic").is_ok());
        assert!(matches!(
            UnlockCondition::check_allowed(2, &allowed, "basic"),
            Err(Error::TypeMismatch { actual: 2, .. })
        ));
        assert!(matches!(
            UnlockCondition::check_allowed(9, &allowed, "basic"),
            Err(Error::UnknownTypeCode { code: 9, .. })
        ));
    }

    #[test]
    fn test_json_roundtrip() {
        let conditions = [
            UnlockCondition::Address(ed()),
            UnlockCondition::DustDepositReturn {
                return_address: ed(),
                amount: 42,
            },
            UnlockCondition::StateControllerAddress(ed()),
            UnlockCondition::GovernorAddress(ed()),
            UnlockCondition::ImmutableAliasAddress(AliasAddress::new(AliasId::new([1; 20]))),
        ];
        for uc in conditions {
            let value = uc.to_json().unwrap();
            assert_eq!(value["type"], uc.type_key());
            assert_eq!(UnlockCondition::from_json(&value).unwrap(), uc);
        }
    }

    #[test]
    fn test_dust_return_json_shape() {
        let uc = UnlockCondition::DustDepositReturn {
            return_address: ed(),
            amount: 7,
        };
        let value = uc.to_json().unwrap();
        assert_eq!(value["amount"], 7);
        assert_eq!(value["returnAddress"]["type"], 0);
    }
}
