//! [`LedgerTransaction`] that records a [`ProgrammableTransaction`].
//!
//! This is the shape a fullnode accepts for a programmable transaction: pure values
//! are BCS-encoded into the inputs table, object ids are deduplicated, and command
//! arguments point at input slots or earlier results. The CLI uses it for `build`;
//! hosts can hand the recorded transaction to their own signing client.

use anyhow::{Context, Result};
use sui_ptb_types::address::address_bytes;
use sui_ptb_types::{
    normalize_address, ProgrammableTransaction, PtbArgument, PtbCommand, PureValue,
};

use crate::block::MoveTarget;
use crate::builder::LedgerTransaction;

#[derive(Debug, Clone, Default)]
pub struct ProgrammableLedger {
    transaction: ProgrammableTransaction,
}

impl ProgrammableLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_gas_budget(mut self, gas_budget: Option<u64>) -> Self {
        self.transaction.gas_budget = gas_budget;
        self
    }

    pub fn transaction(&self) -> &ProgrammableTransaction {
        &self.transaction
    }

    pub fn into_transaction(self) -> ProgrammableTransaction {
        self.transaction
    }
}

impl LedgerTransaction for ProgrammableLedger {
    type Handle = PtbArgument;

    fn gas(&mut self) -> Result<PtbArgument> {
        Ok(PtbArgument::GasCoin)
    }

    fn pure(&mut self, value: &PureValue) -> Result<PtbArgument> {
        let bytes = value.to_bcs()?;
        self.transaction.add_pure(bytes, value.move_type())
    }

    fn object(&mut self, object_id: &str) -> Result<PtbArgument> {
        self.transaction.add_object(object_id)
    }

    fn move_call(
        &mut self,
        target: &MoveTarget,
        arguments: Vec<PtbArgument>,
        type_arguments: &[String],
    ) -> Result<PtbArgument> {
        self.transaction.push_command(PtbCommand::MoveCall {
            package: normalize_address(&target.package),
            module: target.module.clone(),
            function: target.function.clone(),
            type_arguments: type_arguments.to_vec(),
            arguments,
        })
    }

    fn split_coins(&mut self, coin: PtbArgument, amounts: Vec<PtbArgument>) -> Result<PtbArgument> {
        self.transaction
            .push_command(PtbCommand::SplitCoins { coin, amounts })
    }

    fn transfer_objects(
        &mut self,
        objects: Vec<PtbArgument>,
        recipient: PtbArgument,
    ) -> Result<PtbArgument> {
        self.transaction.push_command(PtbCommand::TransferObjects {
            objects,
            address: recipient,
        })
    }

    fn merge_coins(
        &mut self,
        destination: PtbArgument,
        sources: Vec<PtbArgument>,
    ) -> Result<PtbArgument> {
        self.transaction.push_command(PtbCommand::MergeCoins {
            destination,
            sources,
        })
    }

    fn make_move_vec(
        &mut self,
        element_type: &str,
        elements: Vec<PtbArgument>,
    ) -> Result<PtbArgument> {
        let type_arg = Some(element_type.trim().to_string()).filter(|t| !t.is_empty());
        self.transaction
            .push_command(PtbCommand::MakeMoveVec { type_arg, elements })
    }

    fn publish(&mut self, modules: &[Vec<u8>], dependencies: &[String]) -> Result<PtbArgument> {
        if modules.is_empty() {
            anyhow::bail!("Publish requires at least one compiled module");
        }
        let dependencies = dependencies
            .iter()
            .map(|d| {
                address_bytes(d)
                    .with_context(|| format!("Invalid publish dependency '{}'", d))
                    .map(|_| normalize_address(d))
            })
            .collect::<Result<Vec<_>>>()?;
        self.transaction.push_command(PtbCommand::Publish {
            modules: modules.to_vec(),
            dependencies,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{Argument, PtbBlock};
    use crate::builder::build;
    use sui_ptb_types::TransactionInput;

    #[test]
    fn test_split_and_transfer_transaction() {
        let recipient = format!("0x{}", "ab".repeat(32));
        let mut block = PtbBlock::new();
        block
            .add_split_coins(Argument::Gas, vec![Argument::input(1_000_000)])
            .unwrap();
        block
            .add_transfer_objects(vec![Argument::Result(0)], Argument::input(recipient.clone()))
            .unwrap();

        let ledger = ProgrammableLedger::new().with_gas_budget(Some(10_000_000));
        let built = build(&block, ledger).unwrap();
        assert_eq!(
            built.results(),
            &[PtbArgument::Result { index: 0 }, PtbArgument::Result { index: 1 }]
        );
        let tx = built.into_transaction().into_transaction();

        assert_eq!(tx.gas_budget, Some(10_000_000));
        assert_eq!(tx.inputs.len(), 2);
        assert_eq!(
            tx.inputs[0],
            TransactionInput::Pure {
                bytes: 1_000_000u64.to_le_bytes().to_vec(),
                move_type: Some("u64".into()),
            }
        );
        assert_eq!(
            tx.commands[0],
            PtbCommand::SplitCoins {
                coin: PtbArgument::GasCoin,
                amounts: vec![PtbArgument::Input { index: 0 }],
            }
        );
        assert_eq!(
            tx.commands[1],
            PtbCommand::TransferObjects {
                objects: vec![PtbArgument::Result { index: 0 }],
                address: PtbArgument::Input { index: 1 },
            }
        );
    }

    #[test]
    fn test_repeated_objects_share_an_input() {
        let mut block = PtbBlock::new();
        block
            .add_move_call(
                "0x2::m::f",
                vec![Argument::object("0x6"), Argument::object("0x6")],
                vec![],
            )
            .unwrap();
        let tx = build(&block, ProgrammableLedger::new())
            .unwrap()
            .into_transaction()
            .into_transaction();
        assert_eq!(tx.inputs.len(), 1);
        match &tx.commands[0] {
            PtbCommand::MoveCall { package, arguments, .. } => {
                assert_eq!(package, &normalize_address("0x2"));
                assert_eq!(arguments[0], arguments[1]);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_unsupported_literal_is_refused() {
        let mut block = PtbBlock::new();
        block
            .add_move_call("0x2::m::f", vec![Argument::input(-1)], vec![])
            .unwrap();
        assert!(build(&block, ProgrammableLedger::new()).is_err());
    }

    #[test]
    fn test_publish_dependencies_are_normalized() {
        let mut block = PtbBlock::new();
        block
            .add_publish(vec![vec![0xa1, 0x1c]], vec!["0x1".into(), "0x2".into()])
            .unwrap();
        let tx = build(&block, ProgrammableLedger::new())
            .unwrap()
            .into_transaction()
            .into_transaction();
        assert!(matches!(
            &tx.commands[0],
            PtbCommand::Publish { dependencies, .. } if dependencies[1] == normalize_address("0x2")
        ));

        let mut bad = PtbBlock::new();
        bad.add_publish(vec![vec![0]], vec!["sui".into()]).unwrap();
        let err = build(&bad, ProgrammableLedger::new()).unwrap_err();
        assert!(err.to_string().contains("Invalid publish dependency"));
    }
}
