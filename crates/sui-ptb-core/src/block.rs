//! # Command model
//!
//! A [`PtbBlock`] is the editable form of a Programmable Transaction Block: an
//! ordered list of [`Command`]s whose arguments are symbolic ([`Argument`]).
//!
//! Positions are never stored. A command's position is its index in the block at
//! the moment a consumer (validator, builder, emitter) walks it, so removing or
//! moving commands can leave `Result` references pointing at a different command
//! than they were written against. Those references are re-validated, never
//! rewritten.
//!
//! ## Example
//!
//! ```
//! use sui_ptb_core::block::{Argument, PtbBlock};
//!
//! let mut block = PtbBlock::new();
//! block.add_split_coins(Argument::Gas, vec![Argument::input(1_000_000)]).unwrap();
//! block.add_transfer_objects(
//!     vec![Argument::Result(0)],
//!     Argument::input(format!("0x{}", "ab".repeat(32))),
//! ).unwrap();
//! assert_eq!(block.len(), 2);
//! ```

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use sui_ptb_types::encoding::{base64_vec, base64_vec_opt};
use tracing::trace;

/// Opaque, stable command identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandId(pub u64);

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cmd-{}", self.0)
    }
}

/// Where a command's input value comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Argument {
    /// A literal supplied directly by the caller.
    Input(Value),
    /// The transaction's gas coin.
    Gas,
    /// An on-ledger object by id.
    Object(String),
    /// Output of the command at this position.
    Result(u16),
}

impl Argument {
    pub fn input(value: impl Into<Value>) -> Self {
        Argument::Input(value.into())
    }

    pub fn object(object_id: impl Into<String>) -> Self {
        Argument::Object(object_id.into())
    }
}

/// A parsed `package::module::function` target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveTarget {
    pub package: String,
    pub module: String,
    pub function: String,
}

impl MoveTarget {
    /// Parse a target of exactly three non-empty `::`-separated segments.
    pub fn parse(target: &str) -> Option<Self> {
        let parts: Vec<&str> = target.trim().split("::").collect();
        if parts.len() != 3 || parts.iter().any(|p| p.is_empty() || p.contains(':')) {
            return None;
        }
        Some(Self {
            package: parts[0].to_string(),
            module: parts[1].to_string(),
            function: parts[2].to_string(),
        })
    }
}

impl fmt::Display for MoveTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}::{}", self.package, self.module, self.function)
    }
}

/// The operation a command performs, with its argument slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CommandKind {
    /// Call a Move function
    MoveCall {
        target: String,
        arguments: Vec<Argument>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        type_arguments: Vec<String>,
    },

    /// Transfer objects to an address
    TransferObjects {
        objects: Vec<Argument>,
        recipient: Argument,
    },

    /// Split a coin into coins of the given amounts
    SplitCoins {
        coin: Argument,
        amounts: Vec<Argument>,
    },

    /// Merge source coins into the destination coin
    MergeCoins {
        destination: Argument,
        sources: Vec<Argument>,
    },

    /// Build a vector of `element_type` from objects or values
    MakeMoveVec {
        element_type: String,
        objects: Vec<Argument>,
    },

    /// Publish compiled modules
    Publish {
        #[serde(with = "base64_vec")]
        modules: Vec<Vec<u8>>,
        #[serde(default)]
        dependencies: Vec<String>,
    },
}

impl CommandKind {
    /// Variant name, as shown in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            CommandKind::MoveCall { .. } => "MoveCall",
            CommandKind::TransferObjects { .. } => "TransferObjects",
            CommandKind::SplitCoins { .. } => "SplitCoins",
            CommandKind::MergeCoins { .. } => "MergeCoins",
            CommandKind::MakeMoveVec { .. } => "MakeMoveVec",
            CommandKind::Publish { .. } => "Publish",
        }
    }
}

/// One operation in a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub id: CommandId,
    #[serde(flatten)]
    pub kind: CommandKind,
}

/// Partial field update for an existing command.
///
/// The patch variant must match the command's variant; `None` fields are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CommandPatch {
    MoveCall {
        #[serde(default)]
        target: Option<String>,
        #[serde(default)]
        arguments: Option<Vec<Argument>>,
        #[serde(default)]
        type_arguments: Option<Vec<String>>,
    },
    TransferObjects {
        #[serde(default)]
        objects: Option<Vec<Argument>>,
        #[serde(default)]
        recipient: Option<Argument>,
    },
    SplitCoins {
        #[serde(default)]
        coin: Option<Argument>,
        #[serde(default)]
        amounts: Option<Vec<Argument>>,
    },
    MergeCoins {
        #[serde(default)]
        destination: Option<Argument>,
        #[serde(default)]
        sources: Option<Vec<Argument>>,
    },
    MakeMoveVec {
        #[serde(default)]
        element_type: Option<String>,
        #[serde(default)]
        objects: Option<Vec<Argument>>,
    },
    Publish {
        #[serde(default, with = "base64_vec_opt")]
        modules: Option<Vec<Vec<u8>>>,
        #[serde(default)]
        dependencies: Option<Vec<String>>,
    },
}

impl CommandPatch {
    pub fn name(&self) -> &'static str {
        match self {
            CommandPatch::MoveCall { .. } => "MoveCall",
            CommandPatch::TransferObjects { .. } => "TransferObjects",
            CommandPatch::SplitCoins { .. } => "SplitCoins",
            CommandPatch::MergeCoins { .. } => "MergeCoins",
            CommandPatch::MakeMoveVec { .. } => "MakeMoveVec",
            CommandPatch::Publish { .. } => "Publish",
        }
    }

    /// Merge the patch into `kind`. On a variant mismatch `kind` is untouched.
    fn apply(self, id: CommandId, kind: &mut CommandKind) -> BlockResult<()> {
        fn merge<T>(slot: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *slot = value;
            }
        }

        match (kind, self) {
            (
                CommandKind::MoveCall {
                    target,
                    arguments,
                    type_arguments,
                },
                CommandPatch::MoveCall {
                    target: new_target,
                    arguments: new_arguments,
                    type_arguments: new_type_arguments,
                },
            ) => {
                merge(target, new_target);
                merge(arguments, new_arguments);
                merge(type_arguments, new_type_arguments);
            }
            (
                CommandKind::TransferObjects { objects, recipient },
                CommandPatch::TransferObjects {
                    objects: new_objects,
                    recipient: new_recipient,
                },
            ) => {
                merge(objects, new_objects);
                merge(recipient, new_recipient);
            }
            (
                CommandKind::SplitCoins { coin, amounts },
                CommandPatch::SplitCoins {
                    coin: new_coin,
                    amounts: new_amounts,
                },
            ) => {
                merge(coin, new_coin);
                merge(amounts, new_amounts);
            }
            (
                CommandKind::MergeCoins {
                    destination,
                    sources,
                },
                CommandPatch::MergeCoins {
                    destination: new_destination,
                    sources: new_sources,
                },
            ) => {
                merge(destination, new_destination);
                merge(sources, new_sources);
            }
            (
                CommandKind::MakeMoveVec {
                    element_type,
                    objects,
                },
                CommandPatch::MakeMoveVec {
                    element_type: new_element_type,
                    objects: new_objects,
                },
            ) => {
                merge(element_type, new_element_type);
                merge(objects, new_objects);
            }
            (
                CommandKind::Publish {
                    modules,
                    dependencies,
                },
                CommandPatch::Publish {
                    modules: new_modules,
                    dependencies: new_dependencies,
                },
            ) => {
                merge(modules, new_modules);
                merge(dependencies, new_dependencies);
            }
            (kind, patch) => {
                return Err(BlockError::VariantMismatch {
                    id,
                    expected: kind.name(),
                    found: patch.name(),
                })
            }
        }
        Ok(())
    }
}

/// Rejected block mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockError {
    /// No command with this id exists in the block.
    UnknownCommand(CommandId),
    /// An update tried to change a command's variant.
    VariantMismatch {
        id: CommandId,
        expected: &'static str,
        found: &'static str,
    },
    /// Two commands in a restored command list share an id.
    DuplicateCommandId(CommandId),
    /// No id is left above the largest one in use.
    IdSpaceExhausted,
}

impl fmt::Display for BlockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockError::UnknownCommand(id) => write!(f, "Unknown command {}", id),
            BlockError::VariantMismatch {
                id,
                expected,
                found,
            } => write!(
                f,
                "Cannot update {} ({}) with a {} patch: a command's type cannot change",
                id, expected, found
            ),
            BlockError::DuplicateCommandId(id) => {
                write!(f, "Command id {} appears more than once", id)
            }
            BlockError::IdSpaceExhausted => write!(f, "No command ids left to assign"),
        }
    }
}

impl std::error::Error for BlockError {}

pub type BlockResult<T> = std::result::Result<T, BlockError>;

/// An ordered, editable list of commands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PtbBlock {
    commands: Vec<Command>,
    next_id: u64,
}

impl PtbBlock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore a block from a saved command list.
    ///
    /// The id counter resumes past the largest restored id. A list holding
    /// `u64::MAX` is rejected since no id could follow it.
    pub fn from_commands(commands: Vec<Command>) -> BlockResult<Self> {
        let mut seen = std::collections::HashSet::new();
        let mut next_id = 0;
        for command in &commands {
            if !seen.insert(command.id) {
                return Err(BlockError::DuplicateCommandId(command.id));
            }
            let Some(after) = command.id.0.checked_add(1) else {
                return Err(BlockError::IdSpaceExhausted);
            };
            next_id = next_id.max(after);
        }
        Ok(Self { commands, next_id })
    }

    /// Append a command and return a copy of it.
    ///
    /// Fails only once every id has been handed out.
    pub fn add(&mut self, kind: CommandKind) -> BlockResult<Command> {
        let id = CommandId(self.next_id);
        self.next_id = self
            .next_id
            .checked_add(1)
            .ok_or(BlockError::IdSpaceExhausted)?;
        let command = Command { id, kind };
        trace!(
            id = %id,
            kind = command.kind.name(),
            position = self.commands.len(),
            "append command"
        );
        self.commands.push(command.clone());
        Ok(command)
    }

    pub fn add_move_call(
        &mut self,
        target: impl Into<String>,
        arguments: Vec<Argument>,
        type_arguments: Vec<String>,
    ) -> BlockResult<Command> {
        self.add(CommandKind::MoveCall {
            target: target.into(),
            arguments,
            type_arguments,
        })
    }

    pub fn add_transfer_objects(
        &mut self,
        objects: Vec<Argument>,
        recipient: Argument,
    ) -> BlockResult<Command> {
        self.add(CommandKind::TransferObjects { objects, recipient })
    }

    pub fn add_split_coins(
        &mut self,
        coin: Argument,
        amounts: Vec<Argument>,
    ) -> BlockResult<Command> {
        self.add(CommandKind::SplitCoins { coin, amounts })
    }

    pub fn add_merge_coins(
        &mut self,
        destination: Argument,
        sources: Vec<Argument>,
    ) -> BlockResult<Command> {
        self.add(CommandKind::MergeCoins {
            destination,
            sources,
        })
    }

    pub fn add_make_move_vec(
        &mut self,
        element_type: impl Into<String>,
        objects: Vec<Argument>,
    ) -> BlockResult<Command> {
        self.add(CommandKind::MakeMoveVec {
            element_type: element_type.into(),
            objects,
        })
    }

    pub fn add_publish(
        &mut self,
        modules: Vec<Vec<u8>>,
        dependencies: Vec<String>,
    ) -> BlockResult<Command> {
        self.add(CommandKind::Publish {
            modules,
            dependencies,
        })
    }

    /// Remove the command with `id`. Later commands shift down one position.
    pub fn remove(&mut self, id: CommandId) -> Option<Command> {
        let position = self.position_of(id)?;
        trace!(id = %id, position, "remove command");
        Some(self.commands.remove(position))
    }

    /// Relocate the command at `from` so it ends up at `to`.
    ///
    /// Returns `false` and changes nothing if either index is out of bounds.
    pub fn move_command(&mut self, from: usize, to: usize) -> bool {
        if from >= self.commands.len() || to >= self.commands.len() {
            return false;
        }
        if from != to {
            let command = self.commands.remove(from);
            self.commands.insert(to, command);
        }
        trace!(from, to, "move command");
        true
    }

    /// Merge `patch` into the command with `id`, keeping its position.
    pub fn update(
        &mut self,
        id: CommandId,
        patch: CommandPatch,
    ) -> BlockResult<Command> {
        let position = self.position_of(id).ok_or(BlockError::UnknownCommand(id))?;
        let command = &mut self.commands[position];
        patch.apply(id, &mut command.kind)?;
        Ok(command.clone())
    }

    /// Snapshot of the command list; changes to it do not affect the block.
    pub fn get_commands(&self) -> Vec<Command> {
        self.commands.clone()
    }

    /// Borrowing iterator for read-only traversals.
    pub fn iter(&self) -> std::slice::Iter<'_, Command> {
        self.commands.iter()
    }

    pub fn get(&self, id: CommandId) -> Option<&Command> {
        self.commands.iter().find(|c| c.id == id)
    }

    pub fn position_of(&self, id: CommandId) -> Option<usize> {
        self.commands.iter().position(|c| c.id == id)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Detached copy for traversals that outlive the current borrow.
    pub fn snapshot(&self) -> PtbBlock {
        self.clone()
    }

    /// JSON command list for display.
    pub fn to_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(&self.commands)?)
    }
}
