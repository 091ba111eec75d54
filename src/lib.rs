//! Sui PTB Builder
//!
//! Build, validate and export Sui Programmable Transaction Blocks:
//!
//! - **Command model**: an editable, ordered list of commands with symbolic arguments
//! - **Validation**: structural, reference and unused-result checks before submission
//! - **Execution**: replay a block into any [`LedgerTransaction`](sui_ptb_core::LedgerTransaction)
//! - **Code generation**: emit an equivalent TypeScript SDK program
//!
//! The heavy lifting lives in [`sui_ptb_core`]; ledger-side types are in
//! [`sui_ptb_types`]. This crate adds environment configuration and the `sui-ptb` CLI.

pub mod config;

pub use sui_ptb_core;
pub use sui_ptb_types;

pub use config::BuilderConfig;
