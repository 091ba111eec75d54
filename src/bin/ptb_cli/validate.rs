//! `validate` - check a block before submission.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use sui_ptb_builder::sui_ptb_core::{PackageInterface, PtbBlock, ValidationResult, Validator};
use sui_ptb_builder::BuilderConfig;
use tracing::debug;

use super::output::{format_validation, ValidationReport};
use super::{load_block, parse_network};

#[derive(Parser, Debug)]
pub struct ValidateCmd {
    /// Template or command-list JSON file
    pub template: PathBuf,

    /// Package interfaces JSON ({"<package id>": {"modules": ...}}) for arity checks
    #[arg(long)]
    pub interfaces: Option<PathBuf>,

    /// Network the interfaces were fetched from (default: SUI_PTB_NETWORK or testnet)
    #[arg(long)]
    pub network: Option<String>,

    /// Fail on warnings as well as errors
    #[arg(long)]
    pub strict: bool,
}

impl ValidateCmd {
    pub fn execute(&self, config: BuilderConfig, json_output: bool) -> Result<()> {
        let config = config.with_overrides(parse_network(self.network.as_deref())?, None);
        let block = load_block(&self.template)?;
        let result = self.run(&block, &config)?;

        if json_output {
            let report = ValidationReport::new(&result, block.len());
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            print!("{}", format_validation(&result, block.len()));
        }

        if !result.is_valid() {
            return Err(anyhow!(
                "Validation failed with {} error(s)",
                result.errors.len()
            ));
        }
        if (self.strict || config.strict) && !result.warnings.is_empty() {
            return Err(anyhow!(
                "Validation produced {} warning(s) in strict mode",
                result.warnings.len()
            ));
        }
        Ok(())
    }

    fn run(&self, block: &PtbBlock, config: &BuilderConfig) -> Result<ValidationResult> {
        let Some(path) = &self.interfaces else {
            return Ok(Validator::new().validate(block));
        };

        let mut cache = config.interface_cache();
        for (package, interface) in load_interfaces(path)? {
            cache.insert(&package, config.network, interface);
        }
        debug!(packages = cache.len(), network = %config.network, "loaded package interfaces");
        let view = cache.view(config.network);
        Ok(Validator::with_interfaces(&view).validate(block))
    }
}

fn load_interfaces(path: &Path) -> Result<BTreeMap<String, PackageInterface>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid package interfaces in {}", path.display()))
}
