//! Ledger-side programmable transaction shape.
//!
//! This is what a Sui programmable transaction looks like once the builder's
//! symbolic arguments have been resolved: a table of inputs (pure BCS values and
//! object references) and a list of commands whose arguments can only point at an
//! input slot, an earlier command's result, or the gas coin.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::address::normalize_address;
use crate::encoding::{base64_bytes, base64_vec};

/// Argument reference in a PTB command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PtbArgument {
    /// Reference to a transaction input
    Input { index: u16 },

    /// Reference to a previous command result
    Result { index: u16 },

    /// Gas coin (special input)
    GasCoin,
}

/// A command in a Programmable Transaction Block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PtbCommand {
    /// Move function call
    MoveCall {
        package: String,
        module: String,
        function: String,
        type_arguments: Vec<String>,
        arguments: Vec<PtbArgument>,
    },

    /// Split coins
    SplitCoins {
        coin: PtbArgument,
        amounts: Vec<PtbArgument>,
    },

    /// Merge coins
    MergeCoins {
        destination: PtbArgument,
        sources: Vec<PtbArgument>,
    },

    /// Transfer objects
    TransferObjects {
        objects: Vec<PtbArgument>,
        address: PtbArgument,
    },

    /// Make move vector
    MakeMoveVec {
        type_arg: Option<String>,
        elements: Vec<PtbArgument>,
    },

    /// Publish new package
    Publish {
        #[serde(with = "base64_vec")]
        modules: Vec<Vec<u8>>,
        dependencies: Vec<String>,
    },
}

/// Transaction input: a pure BCS value or an object the ledger will resolve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TransactionInput {
    /// Pure BCS-encoded value
    Pure {
        #[serde(with = "base64_bytes")]
        bytes: Vec<u8>,
        /// Move type the bytes were encoded as (informational)
        #[serde(default, skip_serializing_if = "Option::is_none")]
        move_type: Option<String>,
    },

    /// Object referenced by id; version and ownership are resolved by the ledger client
    Object { object_id: String },
}

/// A programmable transaction under construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgrammableTransaction {
    pub inputs: Vec<TransactionInput>,
    pub commands: Vec<PtbCommand>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_budget: Option<u64>,
}

impl ProgrammableTransaction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pure input and return its argument reference.
    pub fn add_pure(&mut self, bytes: Vec<u8>, move_type: Option<String>) -> Result<PtbArgument> {
        let index = slot_index(self.inputs.len(), "input")?;
        self.inputs.push(TransactionInput::Pure { bytes, move_type });
        Ok(PtbArgument::Input { index })
    }

    /// Add an object input and return its argument reference.
    ///
    /// An object may appear only once in the inputs table, so a second reference
    /// to the same id (in any address form) reuses the existing slot.
    pub fn add_object(&mut self, object_id: &str) -> Result<PtbArgument> {
        let normalized = normalize_address(object_id);
        let existing = self.inputs.iter().position(|input| match input {
            TransactionInput::Object { object_id } => *object_id == normalized,
            TransactionInput::Pure { .. } => false,
        });
        let index = match existing {
            Some(position) => slot_index(position, "input")?,
            None => {
                let index = slot_index(self.inputs.len(), "input")?;
                self.inputs.push(TransactionInput::Object {
                    object_id: normalized,
                });
                index
            }
        };
        Ok(PtbArgument::Input { index })
    }

    /// Append a command and return a reference to its result.
    pub fn push_command(&mut self, command: PtbCommand) -> Result<PtbArgument> {
        let index = slot_index(self.commands.len(), "command")?;
        self.commands.push(command);
        Ok(PtbArgument::Result { index })
    }
}

/// Arguments address inputs and results with a `u16`.
fn slot_index(position: usize, table: &str) -> Result<u16> {
    u16::try_from(position)
        .map_err(|_| anyhow!("Too many {}s: slot {} does not fit a u16 index", table, position))
}
