//! `build` - record a block as a programmable transaction.

use anyhow::{anyhow, Result};
use clap::Parser;
use std::path::PathBuf;
use sui_ptb_builder::sui_ptb_core::{build, validate, ProgrammableLedger};
use sui_ptb_builder::BuilderConfig;

use super::load_block;
use super::output::format_validation;

#[derive(Parser, Debug)]
pub struct BuildCmd {
    /// Template or command-list JSON file
    pub template: PathBuf,

    /// Gas budget in MIST recorded on the transaction
    #[arg(long)]
    pub gas_budget: Option<u64>,
}

impl BuildCmd {
    pub fn execute(&self, config: BuilderConfig, json_output: bool) -> Result<()> {
        let config = config.with_overrides(None, self.gas_budget);
        let block = load_block(&self.template)?;

        let result = validate(&block);
        if !result.is_valid() {
            eprint!("{}", format_validation(&result, block.len()));
            return Err(anyhow!(
                "Refusing to build a block with {} validation error(s)",
                result.errors.len()
            ));
        }

        let ledger = ProgrammableLedger::new().with_gas_budget(config.gas_budget);
        let built = build(&block, ledger)?;
        let transaction = built.into_transaction().into_transaction();

        // stdout stays pure JSON; warnings go to stderr in human mode
        println!("{}", serde_json::to_string_pretty(&transaction)?);
        if !json_output {
            for warning in &result.warnings {
                eprintln!("warning: {}", warning);
            }
        }
        Ok(())
    }
}
