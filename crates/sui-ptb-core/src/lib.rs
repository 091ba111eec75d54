//! Programmable Transaction Block builder.
//!
//! A [`PtbBlock`] is edited as an ordered list of commands whose arguments refer to
//! literals, objects, the gas coin, or earlier commands' results. Before submission
//! the block is checked by the [`validator`]; a valid block is then either replayed
//! into a ledger transaction by the [`builder`] or rendered as an SDK program by
//! [`codegen`]. All three consumers resolve arguments through [`resolver`], so they
//! agree on which references are legal and how literals are encoded.
//!
//! ```
//! use sui_ptb_core::{build, emit, validate, Argument, ProgrammableLedger, PtbBlock};
//!
//! let recipient = format!("0x{}", "ab".repeat(32));
//! let mut block = PtbBlock::new();
//! block.add_split_coins(Argument::Gas, vec![Argument::input(1_000_000)]).unwrap();
//! block.add_transfer_objects(vec![Argument::Result(0)], Argument::input(recipient)).unwrap();
//!
//! let report = validate(&block);
//! assert!(report.is_valid() && report.warnings.is_empty());
//!
//! let built = build(&block, ProgrammableLedger::new()).unwrap();
//! assert_eq!(built.results().len(), 2);
//!
//! assert!(emit(&block).contains("const result_1 = tx.transferObjects([result_0]"));
//! ```

pub mod block;
pub mod builder;
pub mod codegen;
pub mod interface;
pub mod programmable;
pub mod resolver;
pub mod template;
pub mod validator;

pub use block::{
    Argument, BlockError, BlockResult, Command, CommandId, CommandKind, CommandPatch, MoveTarget,
    PtbBlock,
};
pub use builder::{build, ExecutableTransaction, LedgerTransaction};
pub use codegen::{emit, emit_with, EmitOptions};
pub use interface::{FunctionSignature, InterfaceLookup, ModuleInterfaceCache, PackageInterface};
pub use programmable::ProgrammableLedger;
pub use resolver::{ArgumentRole, ReferenceError};
pub use template::Template;
pub use validator::{validate, Diagnostic, Severity, ValidationResult, Validator};
