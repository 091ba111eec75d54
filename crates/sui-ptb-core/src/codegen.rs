//! Procedural code emitter.
//!
//! Renders a block as a TypeScript program for the Sui SDK (`@mysten/sui`) that
//! reproduces the same transaction. Arguments are resolved through the same
//! resolver the execution builder uses, with variable names as handles: the output
//! of the command at position `i` is bound to `result_<i>` and the gas coin is
//! `tx.gas`.
//!
//! Emission never fails. A reference that would make [`build`](crate::builder::build)
//! fail is rendered as `undefined` with an explanatory comment, so the program
//! still shows the user where the block is broken.

use serde_json::Value;
use sui_ptb_types::encoding::base64_encode;
use sui_ptb_types::{Network, PureValue};

use crate::block::{Argument, CommandKind, PtbBlock};
use crate::resolver::{command_arguments, resolve, ArgumentRole, ResolutionScope, ResolvedValue};

const GAS_HANDLE: &str = "tx.gas";

/// Largest integer a JavaScript number holds exactly.
const MAX_SAFE_INTEGER: u64 = (1 << 53) - 1;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmitOptions {
    pub network: Network,
    pub gas_budget: Option<u64>,
}

/// Variable bound to the output of the command at `position`.
pub fn result_variable(position: usize) -> String {
    format!("result_{}", position)
}

/// Emit with default options (testnet, no explicit gas budget).
pub fn emit(block: &PtbBlock) -> String {
    emit_with(block, &EmitOptions::default())
}

pub fn emit_with(block: &PtbBlock, options: &EmitOptions) -> String {
    let mut out = String::new();
    out.push_str("import { SuiClient, getFullnodeUrl } from '@mysten/sui/client';\n");
    out.push_str("import { Transaction } from '@mysten/sui/transactions';\n");
    out.push_str("import type { Keypair } from '@mysten/sui/cryptography';\n\n");
    out.push_str("export async function run(keypair: Keypair) {\n");
    out.push_str(&format!(
        "  const client = new SuiClient({{ url: getFullnodeUrl('{}') }});\n",
        options.network
    ));
    out.push_str("  const tx = new Transaction();\n");
    if let Some(budget) = options.gas_budget {
        out.push_str(&format!("  tx.setGasBudget({});\n", budget));
    }
    if !block.is_empty() {
        out.push('\n');
    }

    let command_count = block.len();
    let gas = GAS_HANDLE.to_string();
    let mut results: Vec<String> = Vec::with_capacity(command_count);

    for (position, command) in block.iter().enumerate() {
        let scope = ResolutionScope {
            position,
            command_count,
            results: &results,
            gas: &gas,
        };
        let mut rendered: Vec<String> = command_arguments(&command.kind)
            .into_iter()
            .map(|(role, argument)| render_argument(argument, role, &scope))
            .collect();
        let expression = render_command(&command.kind, &mut rendered);
        let variable = result_variable(position);
        out.push_str(&format!("  const {} = {};\n", variable, expression));
        results.push(variable);
    }

    out.push_str(
        "\n  return client.signAndExecuteTransaction({ signer: keypair, transaction: tx });\n",
    );
    out.push_str("}\n");
    out
}

fn render_argument(
    argument: &Argument,
    role: ArgumentRole,
    scope: &ResolutionScope<'_, String>,
) -> String {
    match resolve(argument, role, scope) {
        Ok(ResolvedValue::Handle(handle)) => handle,
        Ok(ResolvedValue::Pure(value)) => render_pure(&value),
        Ok(ResolvedValue::Object(id)) => format!("tx.object({})", js_string(id)),
        Err(err) => format!(
            "undefined /* invalid reference: {} */",
            comment_safe(&err.detail())
        ),
    }
}

/// `tx.pure.<type>(...)` for a literal input.
fn render_pure(value: &PureValue) -> String {
    match value {
        PureValue::Vector { element, items } => format!(
            "tx.pure.vector('{}', [{}])",
            element.sdk_name(),
            items.iter().map(js_value).collect::<Vec<_>>().join(", ")
        ),
        PureValue::Unsupported(literal) => format!(
            "undefined /* unsupported literal: {} */",
            comment_safe(&literal.to_string())
        ),
        scalar => match scalar.scalar_type() {
            Some(ty) => format!("tx.pure.{}({})", ty.sdk_name(), js_value(scalar)),
            None => "undefined".to_string(),
        },
    }
}

/// Plain JavaScript literal for a scalar value.
fn js_value(value: &PureValue) -> String {
    match value {
        PureValue::Bool(b) => b.to_string(),
        PureValue::U64(n) if *n <= MAX_SAFE_INTEGER => n.to_string(),
        PureValue::U64(n) => js_string(&n.to_string()),
        PureValue::Address(s) | PureValue::String(s) => js_string(s),
        PureValue::Vector { items, .. } => format!(
            "[{}]",
            items.iter().map(js_value).collect::<Vec<_>>().join(", ")
        ),
        PureValue::Unsupported(_) => "undefined".to_string(),
    }
}

fn js_string(s: &str) -> String {
    Value::String(s.to_string()).to_string()
}

fn comment_safe(text: &str) -> String {
    text.replace("*/", "* /")
}

fn js_list(items: &[String]) -> String {
    format!("[{}]", items.join(", "))
}

/// The SDK call for a command, given its arguments rendered in resolution order.
fn render_command(kind: &CommandKind, args: &mut Vec<String>) -> String {
    match kind {
        CommandKind::MoveCall {
            target,
            type_arguments,
            ..
        } => {
            let mut fields = vec![format!("target: {}", js_string(target))];
            if !type_arguments.is_empty() {
                let types: Vec<String> = type_arguments.iter().map(|t| js_string(t)).collect();
                fields.push(format!("typeArguments: {}", js_list(&types)));
            }
            fields.push(format!("arguments: {}", js_list(args)));
            format!("tx.moveCall({{ {} }})", fields.join(", "))
        }
        CommandKind::TransferObjects { .. } => {
            let recipient = args.pop().unwrap_or_else(|| "undefined".to_string());
            format!("tx.transferObjects({}, {})", js_list(args), recipient)
        }
        CommandKind::SplitCoins { .. } => {
            let coin = split_first(args);
            format!("tx.splitCoins({}, {})", coin, js_list(args))
        }
        CommandKind::MergeCoins { .. } => {
            let destination = split_first(args);
            format!("tx.mergeCoins({}, {})", destination, js_list(args))
        }
        CommandKind::MakeMoveVec { element_type, .. } => {
            let mut fields = Vec::new();
            if !element_type.trim().is_empty() {
                fields.push(format!("type: {}", js_string(element_type.trim())));
            }
            fields.push(format!("elements: {}", js_list(args)));
            format!("tx.makeMoveVec({{ {} }})", fields.join(", "))
        }
        CommandKind::Publish {
            modules,
            dependencies,
        } => {
            let modules: Vec<String> = modules
                .iter()
                .map(|m| js_string(&base64_encode(m)))
                .collect();
            let dependencies: Vec<String> = dependencies.iter().map(|d| js_string(d)).collect();
            format!(
                "tx.publish({{ modules: {}, dependencies: {} }})",
                js_list(&modules),
                js_list(&dependencies)
            )
        }
    }
}

fn split_first(args: &mut Vec<String>) -> String {
    if args.is_empty() {
        "undefined".to_string()
    } else {
        args.remove(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn statements(code: &str) -> Vec<&str> {
        code.lines()
            .map(str::trim)
            .filter(|l| l.starts_with("const result_"))
            .collect()
    }

    #[test]
    fn test_split_and_transfer() {
        let recipient = format!("0x{}", "ab".repeat(32));
        let mut block = PtbBlock::new();
        block
            .add_split_coins(Argument::Gas, vec![Argument::input(1_000_000)])
            .unwrap();
        block
            .add_transfer_objects(vec![Argument::Result(0)], Argument::input(recipient.clone()))
            .unwrap();

        let code = emit(&block);
        assert_eq!(
            statements(&code),
            vec![
                "const result_0 = tx.splitCoins(tx.gas, [tx.pure.u64(1000000)]);".to_string(),
                format!(
                    "const result_1 = tx.transferObjects([result_0], tx.pure.address(\"{}\"));",
                    recipient
                ),
            ]
        );
        assert!(code.contains("getFullnodeUrl('testnet')"));
        assert!(code.contains("signAndExecuteTransaction"));
        assert!(!code.contains("setGasBudget"));
    }

    #[test]
    fn test_options() {
        let block = PtbBlock::new();
        let code = emit_with(
            &block,
            &EmitOptions {
                network: Network::Mainnet,
                gas_budget: Some(5_000_000),
            },
        );
        assert!(code.contains("getFullnodeUrl('mainnet')"));
        assert!(code.contains("tx.setGasBudget(5000000);"));
    }

    #[test]
    fn test_move_call_rendering() {
        let mut block = PtbBlock::new();
        block
            .add_move_call(
                "0x2::coin::split",
                vec![
                    Argument::object("0x6"),
                    Argument::input(true),
                    Argument::input("hello"),
                    Argument::input(serde_json::json!([1, 2])),
                ],
                vec!["0x2::sui::SUI".into()],
            )
            .unwrap();
        let code = emit(&block);
        assert!(code.contains(
            "tx.moveCall({ target: \"0x2::coin::split\", typeArguments: [\"0x2::sui::SUI\"], \
             arguments: [tx.object(\"0x6\"), tx.pure.bool(true), tx.pure.string(\"hello\"), \
             tx.pure.vector('u64', [1, 2])] })"
        ));
    }

    #[test]
    fn test_large_integers_are_quoted() {
        let mut block = PtbBlock::new();
        block
            .add_split_coins(
                Argument::Gas,
                vec![
                    Argument::input(MAX_SAFE_INTEGER),
                    Argument::input(u64::MAX),
                    Argument::input("18446744073709551616"),
                ],
            )
            .unwrap();
        let code = emit(&block);
        assert!(code.contains("tx.pure.u64(9007199254740991)"));
        assert!(code.contains("tx.pure.u64(\"18446744073709551615\")"));
        assert!(code.contains("undefined /* unsupported literal: \"18446744073709551616\" */"));
    }

    #[test]
    fn test_invalid_reference_is_marked() {
        let mut block = PtbBlock::new();
        block
            .add_merge_coins(Argument::Gas, vec![Argument::Result(3)])
            .unwrap();
        let code = emit(&block);
        assert!(code.contains(
            "tx.mergeCoins(tx.gas, [undefined /* invalid reference: Result(3) is out of range"
        ));
    }

    #[test]
    fn test_make_move_vec_and_publish() {
        let mut block = PtbBlock::new();
        block
            .add_make_move_vec("u64", vec![Argument::input(1)])
            .unwrap();
        block
            .add_publish(vec![vec![1, 2, 3]], vec!["0x1".into()])
            .unwrap();
        let code = emit(&block);
        let lines = statements(&code);
        assert_eq!(
            lines[0],
            "const result_0 = tx.makeMoveVec({ type: \"u64\", elements: [tx.pure.u64(1)] });"
        );
        assert_eq!(
            lines[1],
            "const result_1 = tx.publish({ modules: [\"AQID\"], dependencies: [\"0x1\"] });"
        );
    }

    #[test]
    fn test_strings_are_escaped() {
        let mut block = PtbBlock::new();
        block
            .add_move_call("0x2::m::f", vec![Argument::input("say \"hi\"")], vec![])
            .unwrap();
        let code = emit(&block);
        assert!(code.contains(r#"tx.pure.string("say \"hi\"")"#));
    }
}
