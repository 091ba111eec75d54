//! Argument reference resolution shared by the validator, builder and emitter.
//!
//! An [`Argument`] is symbolic until a consumer walks the block. Every consumer goes
//! through this module, so the legality of a `Result` reference and the encoding of
//! an `Input` literal are decided in exactly one place:
//!
//! - [`describe`] yields a structural [`ArgumentDescriptor`] for validation.
//! - [`resolve`] yields a [`ResolvedValue`] carrying a consumer-specific handle `H`
//!   (a ledger handle for the builder, a variable name for the emitter).
//!
//! Both are side-effect free and report bad references as [`ReferenceError`].

use serde_json::Value;
use std::fmt;
use sui_ptb_types::PureValue;

use crate::block::{Argument, CommandKind};

/// How an argument slot interprets an `Input` literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentRole {
    /// Generic Move argument; the literal's type is inferred.
    Argument,
    /// Coin amount; numbers and numeric strings coerce to an unsigned integer.
    Amount,
    /// Transfer recipient; the literal must be an address.
    Recipient,
}

impl ArgumentRole {
    /// Pure value an `Input` literal becomes in this role.
    pub fn pure_value(&self, literal: &Value) -> PureValue {
        match self {
            ArgumentRole::Argument => PureValue::infer(literal),
            ArgumentRole::Amount => PureValue::amount(literal),
            ArgumentRole::Recipient => PureValue::recipient(literal),
        }
    }
}

/// A `Result` argument that does not point at an earlier command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceError {
    /// The command references its own output.
    SelfReference { position: usize, index: usize },
    /// The command references a command that runs after it.
    ForwardReference { position: usize, index: usize },
    /// The referenced position does not exist in the block.
    OutOfRange {
        position: usize,
        index: usize,
        command_count: usize,
    },
}

impl ReferenceError {
    /// Position of the command holding the bad reference.
    pub fn position(&self) -> usize {
        match self {
            ReferenceError::SelfReference { position, .. }
            | ReferenceError::ForwardReference { position, .. }
            | ReferenceError::OutOfRange { position, .. } => *position,
        }
    }

    /// The offending result index.
    pub fn index(&self) -> usize {
        match self {
            ReferenceError::SelfReference { index, .. }
            | ReferenceError::ForwardReference { index, .. }
            | ReferenceError::OutOfRange { index, .. } => *index,
        }
    }

    /// Description of the reference without the command prefix.
    pub fn detail(&self) -> String {
        match self {
            ReferenceError::SelfReference { index, .. } => {
                format!("Result({}) refers to the command itself", index)
            }
            ReferenceError::ForwardReference { index, .. } => {
                format!("Result({}) refers to a later command", index)
            }
            ReferenceError::OutOfRange {
                index,
                command_count,
                ..
            } => format!(
                "Result({}) is out of range (block has {} commands)",
                index, command_count
            ),
        }
    }
}

impl fmt::Display for ReferenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Command {}: invalid reference: {}",
            self.position(),
            self.detail()
        )
    }
}

impl std::error::Error for ReferenceError {}

/// Check that `index` names a command strictly before `position`.
pub fn check_result_reference(
    index: usize,
    position: usize,
    command_count: usize,
) -> Result<usize, ReferenceError> {
    if index >= command_count {
        Err(ReferenceError::OutOfRange {
            position,
            index,
            command_count,
        })
    } else if index == position {
        Err(ReferenceError::SelfReference { position, index })
    } else if index > position {
        Err(ReferenceError::ForwardReference { position, index })
    } else {
        Ok(index)
    }
}

/// Validation-time view of an argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentDescriptor<'a> {
    Gas,
    Literal(&'a Value),
    Object(&'a str),
    Result(usize),
}

/// Describe `argument` as seen from the command at `position`.
pub fn describe(
    argument: &Argument,
    position: usize,
    command_count: usize,
) -> Result<ArgumentDescriptor<'_>, ReferenceError> {
    match argument {
        Argument::Gas => Ok(ArgumentDescriptor::Gas),
        Argument::Input(value) => Ok(ArgumentDescriptor::Literal(value)),
        Argument::Object(id) => Ok(ArgumentDescriptor::Object(id)),
        Argument::Result(index) => {
            check_result_reference(*index as usize, position, command_count)
                .map(ArgumentDescriptor::Result)
        }
    }
}

/// Context for resolving the arguments of one command.
#[derive(Debug)]
pub struct ResolutionScope<'s, H> {
    /// Position of the command being resolved.
    pub position: usize,
    pub command_count: usize,
    /// Handles of every command before `position`, in order.
    pub results: &'s [H],
    pub gas: &'s H,
}

/// Execution-time value of an argument.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedValue<'a, H> {
    /// Gas coin or a prior command's output.
    Handle(H),
    /// Literal with its encoding decided by the slot's role.
    Pure(PureValue),
    Object(&'a str),
}

/// Resolve `argument` in `role` against the handles produced so far.
pub fn resolve<'a, H: Clone>(
    argument: &'a Argument,
    role: ArgumentRole,
    scope: &ResolutionScope<'_, H>,
) -> Result<ResolvedValue<'a, H>, ReferenceError> {
    match describe(argument, scope.position, scope.command_count)? {
        ArgumentDescriptor::Gas => Ok(ResolvedValue::Handle(scope.gas.clone())),
        ArgumentDescriptor::Literal(value) => Ok(ResolvedValue::Pure(role.pure_value(value))),
        ArgumentDescriptor::Object(id) => Ok(ResolvedValue::Object(id)),
        ArgumentDescriptor::Result(index) => scope
            .results
            .get(index)
            .cloned()
            .map(ResolvedValue::Handle)
            .ok_or(ReferenceError::ForwardReference {
                position: scope.position,
                index,
            }),
    }
}

/// Every argument slot of a command with its role, in resolution order.
pub fn command_arguments(kind: &CommandKind) -> Vec<(ArgumentRole, &Argument)> {
    fn with_role(
        role: ArgumentRole,
        args: &[Argument],
    ) -> impl Iterator<Item = (ArgumentRole, &Argument)> {
        args.iter().map(move |a| (role, a))
    }

    match kind {
        CommandKind::MoveCall { arguments, .. } => {
            with_role(ArgumentRole::Argument, arguments).collect()
        }
        CommandKind::TransferObjects { objects, recipient } => {
            with_role(ArgumentRole::Argument, objects)
                .chain(std::iter::once((ArgumentRole::Recipient, recipient)))
                .collect()
        }
        CommandKind::SplitCoins { coin, amounts } => std::iter::once((ArgumentRole::Argument, coin))
            .chain(with_role(ArgumentRole::Amount, amounts))
            .collect(),
        CommandKind::MergeCoins {
            destination,
            sources,
        } => std::iter::once((ArgumentRole::Argument, destination))
            .chain(with_role(ArgumentRole::Argument, sources))
            .collect(),
        CommandKind::MakeMoveVec { objects, .. } => {
            with_role(ArgumentRole::Argument, objects).collect()
        }
        CommandKind::Publish { .. } => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reference_precedence() {
        assert_eq!(check_result_reference(0, 1, 2), Ok(0));
        assert_eq!(
            check_result_reference(1, 1, 2),
            Err(ReferenceError::SelfReference {
                position: 1,
                index: 1
            })
        );
        assert_eq!(
            check_result_reference(2, 1, 3),
            Err(ReferenceError::ForwardReference {
                position: 1,
                index: 2
            })
        );
        // out of range wins over self and forward
        assert!(matches!(
            check_result_reference(5, 5, 3),
            Err(ReferenceError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_reference_error_display() {
        let err = ReferenceError::ForwardReference {
            position: 0,
            index: 1,
        };
        assert_eq!(
            err.to_string(),
            "Command 0: invalid reference: Result(1) refers to a later command"
        );
    }

    #[test]
    fn test_describe() {
        let literal = Argument::input(5);
        assert_eq!(
            describe(&literal, 0, 1),
            Ok(ArgumentDescriptor::Literal(&json!(5)))
        );
        assert_eq!(describe(&Argument::Gas, 0, 1), Ok(ArgumentDescriptor::Gas));
        assert!(describe(&Argument::Result(0), 0, 1).is_err());
    }

    #[test]
    fn test_resolve_with_handles() {
        let results = vec!["h0".to_string(), "h1".to_string()];
        let gas = "gas".to_string();
        let scope = ResolutionScope {
            position: 2,
            command_count: 3,
            results: &results,
            gas: &gas,
        };

        assert_eq!(
            resolve(&Argument::Result(1), ArgumentRole::Argument, &scope),
            Ok(ResolvedValue::Handle("h1".to_string()))
        );
        assert_eq!(
            resolve(&Argument::Gas, ArgumentRole::Argument, &scope),
            Ok(ResolvedValue::Handle("gas".to_string()))
        );
        assert_eq!(
            resolve(&Argument::input("7"), ArgumentRole::Amount, &scope),
            Ok(ResolvedValue::Pure(PureValue::U64(7)))
        );
        assert_eq!(
            resolve(&Argument::input("7"), ArgumentRole::Argument, &scope),
            Ok(ResolvedValue::Pure(PureValue::String("7".into())))
        );
        assert!(resolve(&Argument::Result(2), ArgumentRole::Argument, &scope).is_err());
    }

    #[test]
    fn test_command_arguments_order() {
        let kind = CommandKind::TransferObjects {
            objects: vec![Argument::Result(0), Argument::Result(1)],
            recipient: Argument::input("0x1"),
        };
        let roles: Vec<ArgumentRole> = command_arguments(&kind)
            .into_iter()
            .map(|(role, _)| role)
            .collect();
        assert_eq!(
            roles,
            vec![
                ArgumentRole::Argument,
                ArgumentRole::Argument,
                ArgumentRole::Recipient
            ]
        );

        let split = CommandKind::SplitCoins {
            coin: Argument::Gas,
            amounts: vec![Argument::input(1)],
        };
        let args = command_arguments(&split);
        assert_eq!(args[0], (ArgumentRole::Argument, &Argument::Gas));
        assert_eq!(args[1].0, ArgumentRole::Amount);
    }
}
