//! Execution builder: replays a block against a ledger transaction.

use anyhow::Result;
use sui_ptb_types::PureValue;
use tracing::{debug, trace};

use crate::block::{Argument, CommandKind, MoveTarget, PtbBlock};
use crate::resolver::{command_arguments, resolve, ArgumentRole, ResolutionScope, ResolvedValue};

/// A transaction object supplied by the ledger client.
///
/// Each primitive records one operation (or one input) and returns an opaque handle
/// that later primitives accept as an argument.
pub trait LedgerTransaction {
    type Handle: Clone;

    /// Handle to the gas coin.
    fn gas(&mut self) -> Result<Self::Handle>;

    /// Register a pure input.
    fn pure(&mut self, value: &PureValue) -> Result<Self::Handle>;

    /// Register an object input by id.
    fn object(&mut self, object_id: &str) -> Result<Self::Handle>;

    fn move_call(
        &mut self,
        target: &MoveTarget,
        arguments: Vec<Self::Handle>,
        type_arguments: &[String],
    ) -> Result<Self::Handle>;

    fn split_coins(
        &mut self,
        coin: Self::Handle,
        amounts: Vec<Self::Handle>,
    ) -> Result<Self::Handle>;

    fn transfer_objects(
        &mut self,
        objects: Vec<Self::Handle>,
        recipient: Self::Handle,
    ) -> Result<Self::Handle>;

    fn merge_coins(
        &mut self,
        destination: Self::Handle,
        sources: Vec<Self::Handle>,
    ) -> Result<Self::Handle>;

    fn make_move_vec(
        &mut self,
        element_type: &str,
        elements: Vec<Self::Handle>,
    ) -> Result<Self::Handle>;

    fn publish(&mut self, modules: &[Vec<u8>], dependencies: &[String]) -> Result<Self::Handle>;
}

/// A transaction with every command of a block replayed into it.
#[derive(Debug)]
pub struct ExecutableTransaction<T: LedgerTransaction> {
    transaction: T,
    results: Vec<T::Handle>,
}

impl<T: LedgerTransaction> ExecutableTransaction<T> {
    pub fn transaction(&self) -> &T {
        &self.transaction
    }

    /// Handle produced by each command, indexed by position.
    pub fn results(&self) -> &[T::Handle] {
        &self.results
    }

    pub fn into_transaction(self) -> T {
        self.transaction
    }
}

/// Replay `block` into `transaction` in command order.
///
/// A reference that does not point at an earlier command fails with a
/// [`ReferenceError`](crate::resolver::ReferenceError) (recoverable through
/// `downcast_ref`); errors from the ledger primitives are returned unchanged.
pub fn build<T: LedgerTransaction>(
    block: &PtbBlock,
    mut transaction: T,
) -> Result<ExecutableTransaction<T>> {
    let command_count = block.len();
    let gas = transaction.gas()?;
    let mut results: Vec<T::Handle> = Vec::with_capacity(command_count);

    for (position, command) in block.iter().enumerate() {
        trace!(position, id = %command.id, kind = command.kind.name(), "replay command");

        let mut handles = {
            let scope = ResolutionScope {
                position,
                command_count,
                results: &results,
                gas: &gas,
            };
            let mut handles = Vec::new();
            for (role, argument) in command_arguments(&command.kind) {
                handles.push(materialize(&mut transaction, argument, role, &scope)?);
            }
            handles
        };

        let handle = match &command.kind {
            CommandKind::MoveCall {
                target,
                type_arguments,
                ..
            } => {
                let parsed = MoveTarget::parse(target)
                    .ok_or_else(|| anyhow::anyhow!("Invalid target format '{}'", target))?;
                transaction.move_call(&parsed, handles, type_arguments)?
            }
            CommandKind::TransferObjects { .. } => {
                let recipient = pop_last(&mut handles)?;
                transaction.transfer_objects(handles, recipient)?
            }
            CommandKind::SplitCoins { .. } => {
                let coin = take_first(&mut handles)?;
                transaction.split_coins(coin, handles)?
            }
            CommandKind::MergeCoins { .. } => {
                let destination = take_first(&mut handles)?;
                transaction.merge_coins(destination, handles)?
            }
            CommandKind::MakeMoveVec { element_type, .. } => {
                transaction.make_move_vec(element_type, handles)?
            }
            CommandKind::Publish {
                modules,
                dependencies,
            } => transaction.publish(modules, dependencies)?,
        };
        results.push(handle);
    }

    debug!(commands = command_count, "built transaction");
    Ok(ExecutableTransaction {
        transaction,
        results,
    })
}

fn materialize<T: LedgerTransaction>(
    transaction: &mut T,
    argument: &Argument,
    role: ArgumentRole,
    scope: &ResolutionScope<'_, T::Handle>,
) -> Result<T::Handle> {
    match resolve(argument, role, scope)? {
        ResolvedValue::Handle(handle) => Ok(handle),
        ResolvedValue::Pure(value) => transaction.pure(&value),
        ResolvedValue::Object(id) => transaction.object(id),
    }
}

fn take_first<H>(handles: &mut Vec<H>) -> Result<H> {
    if handles.is_empty() {
        anyhow::bail!("Command has no arguments to resolve");
    }
    Ok(handles.remove(0))
}

fn pop_last<H>(handles: &mut Vec<H>) -> Result<H> {
    handles
        .pop()
        .ok_or_else(|| anyhow::anyhow!("Command has no arguments to resolve"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::ReferenceError;

    /// Records every primitive as a line of text.
    #[derive(Debug, Default)]
    struct Recorder {
        log: Vec<String>,
        fail_on_publish: bool,
    }

    impl Recorder {
        fn record(&mut self, line: String) -> Result<String> {
            let handle = format!("h{}", self.log.len());
            self.log.push(format!("{} = {}", handle, line));
            Ok(handle)
        }
    }

    impl LedgerTransaction for Recorder {
        type Handle = String;

        fn gas(&mut self) -> Result<String> {
            Ok("gas".into())
        }

        fn pure(&mut self, value: &PureValue) -> Result<String> {
            self.record(format!("pure {:?}", value))
        }

        fn object(&mut self, object_id: &str) -> Result<String> {
            self.record(format!("object {}", object_id))
        }

        fn move_call(
            &mut self,
            target: &MoveTarget,
            arguments: Vec<String>,
            _: &[String],
        ) -> Result<String> {
            self.record(format!("call {}({})", target, arguments.join(", ")))
        }

        fn split_coins(&mut self, coin: String, amounts: Vec<String>) -> Result<String> {
            self.record(format!("split {} [{}]", coin, amounts.join(", ")))
        }

        fn transfer_objects(&mut self, objects: Vec<String>, recipient: String) -> Result<String> {
            self.record(format!("transfer [{}] -> {}", objects.join(", "), recipient))
        }

        fn merge_coins(&mut self, destination: String, sources: Vec<String>) -> Result<String> {
            self.record(format!("merge {} <- [{}]", destination, sources.join(", ")))
        }

        fn make_move_vec(&mut self, element_type: &str, elements: Vec<String>) -> Result<String> {
            self.record(format!("vec<{}> [{}]", element_type, elements.join(", ")))
        }

        fn publish(&mut self, modules: &[Vec<u8>], _: &[String]) -> Result<String> {
            if self.fail_on_publish {
                anyhow::bail!("ledger rejected publish");
            }
            self.record(format!("publish {} modules", modules.len()))
        }
    }

    #[test]
    fn test_results_flow_into_later_commands() {
        let mut block = PtbBlock::new();
        block
            .add_split_coins(Argument::Gas, vec![Argument::input(1_000_000)])
            .unwrap();
        block
            .add_transfer_objects(vec![Argument::Result(0)], Argument::input("0xab"))
            .unwrap();

        let built = build(&block, Recorder::default()).unwrap();
        assert_eq!(built.results().len(), 2);
        let log = &built.transaction().log;
        assert_eq!(log[0], "h0 = pure U64(1000000)");
        assert_eq!(log[1], "h1 = split gas [h0]");
        assert_eq!(log[2], "h2 = pure Address(\"0xab\")");
        assert_eq!(log[3], "h3 = transfer [h1] -> h2");
        assert_eq!(built.results()[0], "h1");
    }

    #[test]
    fn test_merge_and_move_call() {
        let mut block = PtbBlock::new();
        block
            .add_merge_coins(Argument::object("0x5"), vec![Argument::object("0x6")])
            .unwrap();
        block
            .add_move_call("0x2::m::f", vec![Argument::Gas, Argument::input(true)], vec![])
            .unwrap();

        let built = build(&block, Recorder::default()).unwrap();
        let log = built.into_transaction().log;
        assert_eq!(log[2], "h2 = merge h0 <- [h1]");
        assert_eq!(log[4], "h4 = call 0x2::m::f(gas, h3)");
    }

    #[test]
    fn test_forward_reference_fails_with_reference_error() {
        let mut block = PtbBlock::new();
        block
            .add_move_call("0x2::m::f", vec![Argument::Result(1)], vec![])
            .unwrap();
        block.add_move_call("0x2::m::g", vec![], vec![]).unwrap();

        let err = build(&block, Recorder::default()).unwrap_err();
        let reference = err.downcast_ref::<ReferenceError>().unwrap();
        assert_eq!(
            *reference,
            ReferenceError::ForwardReference {
                position: 0,
                index: 1
            }
        );
    }

    #[test]
    fn test_ledger_errors_propagate() {
        let mut block = PtbBlock::new();
        block.add_publish(vec![vec![1]], vec![]).unwrap();
        let recorder = Recorder {
            fail_on_publish: true,
            ..Default::default()
        };
        let err = build(&block, recorder).unwrap_err();
        assert_eq!(err.to_string(), "ledger rejected publish");
    }

    #[test]
    fn test_build_does_not_mutate_block() {
        let mut block = PtbBlock::new();
        block
            .add_split_coins(Argument::Gas, vec![Argument::input(3)])
            .unwrap();
        let before = block.get_commands();
        build(&block, Recorder::default()).unwrap();
        assert_eq!(block.get_commands(), before);
    }
}
