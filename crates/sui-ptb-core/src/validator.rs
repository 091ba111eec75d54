//! Graph validation for a [`PtbBlock`].
//!
//! Validation runs three passes over the block in order:
//!
//! 1. Structural checks on each command in isolation (target format, required
//!    argument lists, positive amounts).
//! 2. Argument checks: every `Result` must point at an earlier command, object ids
//!    should be canonical, literals must be non-empty and encodable.
//! 3. Unused results: commands whose output nothing consumes.
//!
//! Errors forbid submission; warnings are advisory. Findings are ordered by pass,
//! then by command position, so the same block always yields the same result.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sui_ptb_types::{is_canonical_id, ADDRESS_PREFIX, CANONICAL_ID_LENGTH};
use tracing::debug;

use crate::block::{Argument, Command, CommandId, CommandKind, MoveTarget, PtbBlock};
use crate::interface::InterfaceLookup;
use crate::resolver::{command_arguments, describe, ArgumentDescriptor, ArgumentRole};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// One validation finding, attached to the command it concerns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub command_index: usize,
    pub command_id: CommandId,
    pub message: String,
}

/// Result of validating a block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    /// Structured form of `errors` followed by `warnings`.
    #[serde(skip)]
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationResult {
    fn from_diagnostics(diagnostics: Vec<Diagnostic>) -> Self {
        let (errors, warnings): (Vec<Diagnostic>, Vec<Diagnostic>) = diagnostics
            .into_iter()
            .partition(|d| d.severity == Severity::Error);
        Self {
            errors: errors.iter().map(|d| d.message.clone()).collect(),
            warnings: warnings.iter().map(|d| d.message.clone()).collect(),
            diagnostics: errors.into_iter().chain(warnings).collect(),
        }
    }

    /// No errors. Warnings do not block submission.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Findings for one command, for inline display.
    pub fn for_command(&self, id: CommandId) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.command_id == id)
    }
}

/// Validate `block` with the default rule set.
pub fn validate(block: &PtbBlock) -> ValidationResult {
    Validator::new().validate(block)
}

/// Block validator, optionally aware of published function signatures.
#[derive(Default, Clone, Copy)]
pub struct Validator<'a> {
    interfaces: Option<&'a dyn InterfaceLookup>,
}

impl<'a> Validator<'a> {
    pub fn new() -> Self {
        Self { interfaces: None }
    }

    /// Also warn when a Move call's arity disagrees with a known signature.
    pub fn with_interfaces(interfaces: &'a dyn InterfaceLookup) -> Self {
        Self {
            interfaces: Some(interfaces),
        }
    }

    pub fn validate(&self, block: &PtbBlock) -> ValidationResult {
        let commands: Vec<&Command> = block.iter().collect();
        let mut findings = Findings::default();

        for (position, command) in commands.iter().enumerate() {
            self.check_structure(position, command, &mut findings);
        }
        for (position, command) in commands.iter().enumerate() {
            check_arguments(position, command, commands.len(), &mut findings);
        }
        check_unused_results(&commands, &mut findings);

        let result = ValidationResult::from_diagnostics(findings.0);
        debug!(
            commands = commands.len(),
            errors = result.errors.len(),
            warnings = result.warnings.len(),
            "validated block"
        );
        result
    }

    fn check_structure(&self, position: usize, command: &Command, findings: &mut Findings) {
        let mut at = findings.at(position, command);
        match &command.kind {
            CommandKind::MoveCall {
                target,
                arguments,
                type_arguments,
            } => {
                match MoveTarget::parse(target) {
                    None => at.error(format!(
                        "Invalid target format '{}', expected package::module::function",
                        target
                    )),
                    Some(parsed) => {
                        if let Some(lookup) = self.interfaces {
                            check_signature(&parsed, arguments, type_arguments, lookup, &mut at);
                        }
                    }
                }
                if arguments.is_empty() {
                    at.warning(
                        "No arguments supplied; verify the function truly takes no parameters",
                    );
                }
            }
            CommandKind::TransferObjects { objects, recipient } => {
                if objects.is_empty() {
                    at.error("At least one object is required");
                }
                if let Argument::Input(value) = recipient {
                    if !starts_with_prefix(value) {
                        at.warning(format!(
                            "Recipient {} should be an address starting with {}",
                            value, ADDRESS_PREFIX
                        ));
                    }
                }
            }
            CommandKind::SplitCoins { amounts, .. } => {
                if amounts.is_empty() {
                    at.error("At least one amount is required");
                }
                for (slot, amount) in amounts.iter().enumerate() {
                    if let Argument::Input(value) = amount {
                        if is_non_positive(value) {
                            at.error(format!(
                                "Amount {} ({}) must be greater than zero",
                                slot, value
                            ));
                        }
                    }
                }
            }
            CommandKind::MergeCoins { sources, .. } => {
                if sources.is_empty() {
                    at.error("At least one source coin is required");
                }
            }
            CommandKind::MakeMoveVec {
                element_type,
                objects,
            } => {
                if element_type.trim().is_empty() {
                    at.error("Element type is required");
                }
                if objects.is_empty() {
                    at.warning("No elements supplied; the vector will be empty");
                }
            }
            CommandKind::Publish { modules, .. } => {
                if modules.is_empty() {
                    at.error("At least one module is required");
                }
            }
        }
    }
}

fn check_signature(
    target: &MoveTarget,
    arguments: &[Argument],
    type_arguments: &[String],
    lookup: &dyn InterfaceLookup,
    at: &mut CommandFindings<'_>,
) {
    let Some(signature) = lookup.function(&target.package, &target.module, &target.function)
    else {
        return;
    };
    if arguments.len() != signature.parameters.len() {
        at.warning(format!(
            "{} expects {} arguments but {} were supplied",
            target,
            signature.parameters.len(),
            arguments.len()
        ));
    }
    if type_arguments.len() != signature.type_parameters {
        at.warning(format!(
            "{} expects {} type arguments but {} were supplied",
            target,
            signature.type_parameters,
            type_arguments.len()
        ));
    }
}

fn check_arguments(
    position: usize,
    command: &Command,
    command_count: usize,
    findings: &mut Findings,
) {
    let mut at = findings.at(position, command);
    for (role, argument) in command_arguments(&command.kind) {
        match describe(argument, position, command_count) {
            Err(err) => at.error(format!("invalid reference: {}", err.detail())),
            Ok(ArgumentDescriptor::Object(id)) => {
                if !is_canonical_id(id) {
                    at.warning(format!(
                        "Object id '{}' is not {} characters; use the full 0x-prefixed id",
                        id, CANONICAL_ID_LENGTH
                    ));
                }
            }
            Ok(ArgumentDescriptor::Literal(value)) => {
                if is_empty_literal(value) {
                    at.error("Input value is empty");
                } else if !reported_in_structure(role, value)
                    && !role.pure_value(value).is_supported()
                {
                    at.warning(format!(
                        "Input {} cannot be encoded as {}",
                        value,
                        role_description(role)
                    ));
                }
            }
            Ok(ArgumentDescriptor::Gas) | Ok(ArgumentDescriptor::Result(_)) => {}
        }
    }
}

fn check_unused_results(commands: &[&Command], findings: &mut Findings) {
    let mut used = vec![false; commands.len()];
    for command in commands {
        for (_, argument) in command_arguments(&command.kind) {
            if let Argument::Result(index) = argument {
                if let Some(slot) = used.get_mut(*index as usize) {
                    *slot = true;
                }
            }
        }
    }

    // the last command's output is the transaction's return
    let last = commands.len().saturating_sub(1);
    for (position, command) in commands.iter().enumerate() {
        if used[position] || position == last || !produces_result(&command.kind) {
            continue;
        }
        findings
            .at(position, command)
            .warning("Result is never used by a later command");
    }
}

fn produces_result(kind: &CommandKind) -> bool {
    match kind {
        CommandKind::MoveCall { .. }
        | CommandKind::SplitCoins { .. }
        | CommandKind::MakeMoveVec { .. }
        | CommandKind::Publish { .. } => true,
        CommandKind::TransferObjects { .. } | CommandKind::MergeCoins { .. } => false,
    }
}

fn starts_with_prefix(value: &Value) -> bool {
    matches!(value, Value::String(s) if s.starts_with(ADDRESS_PREFIX))
}

fn is_empty_literal(value: &Value) -> bool {
    matches!(value, Value::String(s) if s.trim().is_empty())
}

/// Numeric reading of an amount literal; an empty string reads as zero.
fn numeric_amount(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if s.trim().is_empty() => Some(0.0),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn is_non_positive(value: &Value) -> bool {
    numeric_amount(value).is_some_and(|n| n <= 0.0)
}

/// Literals pass 1 already flagged are not reported again as unencodable.
fn reported_in_structure(role: ArgumentRole, value: &Value) -> bool {
    match role {
        ArgumentRole::Amount => is_non_positive(value),
        ArgumentRole::Recipient => !starts_with_prefix(value),
        ArgumentRole::Argument => false,
    }
}

fn role_description(role: ArgumentRole) -> &'static str {
    match role {
        ArgumentRole::Argument => {
            "a pure value (bool, unsigned integer, address, string or vector)"
        }
        ArgumentRole::Amount => "an unsigned coin amount",
        ArgumentRole::Recipient => "a recipient address",
    }
}

#[derive(Default)]
struct Findings(Vec<Diagnostic>);

impl Findings {
    fn at<'f>(&'f mut self, position: usize, command: &Command) -> CommandFindings<'f> {
        CommandFindings {
            findings: self,
            position,
            id: command.id,
            kind: command.kind.name(),
        }
    }
}

/// Findings sink for one command; prefixes every message with the command.
struct CommandFindings<'f> {
    findings: &'f mut Findings,
    position: usize,
    id: CommandId,
    kind: &'static str,
}

impl CommandFindings<'_> {
    fn push(&mut self, severity: Severity, message: impl AsRef<str>) {
        self.findings.0.push(Diagnostic {
            severity,
            command_index: self.position,
            command_id: self.id,
            message: format!("Command {} ({}): {}", self.position, self.kind, message.as_ref()),
        });
    }

    fn error(&mut self, message: impl AsRef<str>) {
        self.push(Severity::Error, message);
    }

    fn warning(&mut self, message: impl AsRef<str>) {
        self.push(Severity::Warning, message);
    }
}
