//! Signing a transaction essence.
//!
//! Every signature covers the same 32-byte message, the essence's
//! [`signing_message`](TransactionEssence::signing_message), so it is
//! derived once and then handed to the signer for each address in turn.

use tracing::debug;

use super::essence::TransactionEssence;
use crate::address::Address;
use crate::config::SIGNING_HASH_FUNCTION;
use crate::error::Result;
use crate::signature::Signature;
use crate::signer::{AddressKeys, AddressSigner, InMemoryAddressSigner};

impl TransactionEssence {
    /// Signs the essence once for each entry of `address_keys`, in order.
    ///
    /// The keys are loaded into an [`InMemoryAddressSigner`] first. Signing
    /// stops at the first address that cannot be signed for, and no partial
    /// list is returned.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use tangle_protocol::{
    ///     AddressKeys, BasicOutput, Output, TransactionEssenceBuilder, UnlockCondition,
    /// };
    /// use tangle_protocol::input::TransactionId;
    ///
    /// let owner = AddressKeys::generate_ed25519();
    /// let essence = TransactionEssenceBuilder::new()
    ///     .add_utxo(TransactionId::new([0; 32]), 0)
    ///     .add_output(Output::Basic(BasicOutput::new(
    ///         1_000_000,
    ///         vec![],
    ///         vec![UnlockCondition::Address(owner.address)],
    ///         vec![],
    ///     )))
    ///     .build()
    ///     .unwrap();
    ///
    /// let signatures = essence.sign(&[owner]).unwrap();
    /// assert_eq!(signatures.len(), 1);
    /// ```
    pub fn sign(&self, address_keys: &[AddressKeys]) -> Result<Vec<Signature>> {
        let signer = InMemoryAddressSigner::new(address_keys.iter().cloned());
        let addresses: Vec<Address> = address_keys.iter().map(|ak| ak.address).collect();
        self.sign_with(&signer, &addresses)
    }

    /// Asks `signer` for a signature for each of `addresses`, in order.
    pub fn sign_with(
        &self,
        signer: &impl AddressSigner,
        addresses: &[Address],
    ) -> Result<Vec<Signature>> {
        let message = self.signing_message()?;

        let signatures = addresses
            .iter()
            .map(|address| signer.sign(address, &message))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        debug!(
            signatures = signatures.len(),
            message_hash = SIGNING_HASH_FUNCTION,
            "signed transaction essence"
        );
        Ok(signatures)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
