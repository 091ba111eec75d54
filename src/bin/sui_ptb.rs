//! sui-ptb: validate, export and build Programmable Transaction Blocks
//!
//! Works on block files saved by the editor (templates) or on bare JSON command
//! lists.
//!
//! ## Features
//!
//! - **validate**: run the structural, reference and unused-result checks
//! - **emit**: generate an equivalent `@mysten/sui` TypeScript program
//! - **build**: record the block as a programmable transaction (inputs + commands)
//!
//! ## Example Usage
//!
//! ```bash
//! # Check a saved block, machine-readable
//! sui-ptb validate transfer.json --json
//!
//! # Generate a mainnet script with an explicit budget
//! sui-ptb emit transfer.json --network mainnet --gas-budget 10000000 -o transfer.ts
//!
//! # Dump the resolved transaction
//! sui-ptb build transfer.json
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use sui_ptb_builder::BuilderConfig;

mod ptb_cli;

use ptb_cli::{build::BuildCmd, emit::EmitCmd, validate::ValidateCmd};

#[derive(Parser)]
#[command(
    name = "sui-ptb",
    author,
    version,
    about = "Sui Programmable Transaction Block builder",
    long_about = "Validate, export and build Sui Programmable Transaction Blocks.\n\n\
                  Configuration is read from SUI_PTB_* environment variables; flags override them."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON instead of human-readable format
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a block and report errors and warnings
    Validate(ValidateCmd),

    /// Emit a TypeScript SDK program reproducing the block
    Emit(EmitCmd),

    /// Build the block into a programmable transaction and print it as JSON
    Build(BuildCmd),
}

fn main() -> Result<()> {
    let Cli { command, json } = Cli::parse();
    let config = BuilderConfig::from_env()?;

    match command {
        Commands::Validate(cmd) => cmd.execute(config, json),
        Commands::Emit(cmd) => cmd.execute(config, json),
        Commands::Build(cmd) => cmd.execute(config, json),
    }
}
