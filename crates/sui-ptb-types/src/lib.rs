//! Shared types for the sui-ptb-builder workspace.
//!
//! This crate holds the ledger-side vocabulary that both the builder core and the
//! CLI need without depending on each other:
//!
//! - [`transaction`] - the concrete programmable-transaction shape (inputs table plus
//!   command list) recorded by the bundled ledger implementation
//! - [`pure`] - inference of a pure (BCS-encodable) value from a free-form JSON literal
//! - [`address`] - address and object id normalization
//! - [`network`] - the Sui networks a transaction can target
//! - [`env_utils`] - typed environment-variable parsing used by configuration

pub mod address;
pub mod encoding;
pub mod env_utils;
pub mod network;
pub mod pure;
pub mod transaction;

pub use address::{is_canonical_id, normalize_address, ADDRESS_PREFIX, CANONICAL_ID_LENGTH};
pub use network::Network;
pub use pure::{PureType, PureValue};
pub use transaction::{ProgrammableTransaction, PtbArgument, PtbCommand, TransactionInput};
