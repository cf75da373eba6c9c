//! # Transaction Module
//!
//! Assembly, syntactic validation and signing of transaction essences. An
//! essence lists the UTXOs a transaction consumes, the outputs it creates
//! and an optional tagged-data payload; the owners of the consumed UTXOs
//! sign its hash.
//!
//! ## Architecture
//!
//! ```text
//! essence.rs    TransactionEssence, its array rules and wire/JSON forms
//! syntactic.rs  stateless validation: counts, uniqueness, supply, rent
//! builder.rs    fluent TransactionEssenceBuilder
//! signing.rs    signing message derivation and per-address signing
//! ```
//!
//! ## Transaction Lifecycle
//!
//! 1. **Build**: Collect parts with [`TransactionEssenceBuilder`].
//! 2. **Assemble**: `build()` calls [`TransactionEssence::assemble`], which
//!    runs syntactic validation and refuses anything illegal.
//! 3. **Sign**: [`TransactionEssence::sign`] produces one signature per
//!    owning address over the essence's signing message.
//! 4. **Ship**: Encode the essence to bytes or JSON.
//!
//! ## Design Decisions
//!
//! - The signing message is BLAKE2b-256 over the skip-mode encoding, so
//!   signing never re-validates and the bytes signed are exactly the bytes
//!   sent.
//! - Amounts are summed in `u128`; no intermediate sum can wrap before it
//!   is compared with the token supply.
//! - Decoding applies the array rules but not the full syntactic rule set.
//!   Run [`TransactionEssence::syntactic_validate`] on decoded essences.

pub mod builder;
pub mod essence;
pub mod signing;
pub mod syntactic;

pub use builder::TransactionEssenceBuilder;
pub use essence::{TransactionEssence, INPUTS_RULES, OUTPUTS_RULES};
