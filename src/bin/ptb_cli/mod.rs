//! CLI subcommand implementations for sui-ptb

pub mod build;
pub mod emit;
pub mod output;
pub mod validate;

use anyhow::{anyhow, Context, Result};
use std::path::Path;
use sui_ptb_builder::sui_ptb_core::{Command, PtbBlock, Template};
use sui_ptb_builder::sui_ptb_types::Network;

/// Read a block file: a saved template, or a bare JSON array of commands.
pub fn load_template(path: &Path) -> Result<Template> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {} as JSON", path.display()))?;

    if value.is_array() {
        let commands: Vec<Command> = serde_json::from_value(value)
            .with_context(|| format!("Invalid command list in {}", path.display()))?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "block".to_string());
        return Ok(Template::new(name, "", commands));
    }

    serde_json::from_value(value).with_context(|| format!("Invalid template in {}", path.display()))
}

pub fn load_block(path: &Path) -> Result<PtbBlock> {
    let template = load_template(path)?;
    PtbBlock::from_template(&template).map_err(|e| anyhow!("{}: {}", path.display(), e))
}

pub fn parse_network(name: Option<&str>) -> Result<Option<Network>> {
    name.map(str::parse::<Network>).transpose()
}
