//! `emit` - render a block as a TypeScript SDK program.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use sui_ptb_builder::sui_ptb_core::{emit_with, validate};
use sui_ptb_builder::BuilderConfig;

use super::output::format_validation;
use super::{load_block, parse_network};

#[derive(Parser, Debug)]
pub struct EmitCmd {
    /// Template or command-list JSON file
    pub template: PathBuf,

    /// Network for the generated client (default: SUI_PTB_NETWORK or testnet)
    #[arg(long)]
    pub network: Option<String>,

    /// Gas budget in MIST written into the program
    #[arg(long)]
    pub gas_budget: Option<u64>,

    /// Write the program here instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Emit even if the block has validation errors
    #[arg(long)]
    pub force: bool,
}

impl EmitCmd {
    pub fn execute(&self, config: BuilderConfig, json_output: bool) -> Result<()> {
        let config =
            config.with_overrides(parse_network(self.network.as_deref())?, self.gas_budget);
        let block = load_block(&self.template)?;

        let result = validate(&block);
        if !result.is_valid() && !self.force {
            eprint!("{}", format_validation(&result, block.len()));
            return Err(anyhow!(
                "Refusing to emit a block with {} validation error(s); pass --force to override",
                result.errors.len()
            ));
        }

        let code = emit_with(&block, &config.emit_options());
        match &self.output {
            Some(path) => {
                std::fs::write(path, &code)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                if json_output {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&serde_json::json!({
                            "output": path.display().to_string(),
                            "network": config.network,
                            "commands": block.len(),
                            "warnings": result.warnings,
                        }))?
                    );
                } else {
                    println!("Wrote {} commands to {}", block.len(), path.display());
                }
            }
            None => print!("{}", code),
        }
        Ok(())
    }
}
