use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A Sui network a transaction can be built for.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    #[default]
    Testnet,
    Devnet,
    Localnet,
}

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
            Network::Devnet => "devnet",
            Network::Localnet => "localnet",
        }
    }

    /// Infer the network from an endpoint URL.
    pub fn infer_from_url(url: &str) -> Option<Self> {
        let lower = url.to_lowercase();
        if lower.contains("testnet") {
            Some(Network::Testnet)
        } else if lower.contains("devnet") {
            Some(Network::Devnet)
        } else if lower.contains("mainnet") {
            Some(Network::Mainnet)
        } else if lower.contains("127.0.0.1") || lower.contains("localhost") {
            Some(Network::Localnet)
        } else {
            None
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "mainnet" => Ok(Network::Mainnet),
            "testnet" => Ok(Network::Testnet),
            "devnet" => Ok(Network::Devnet),
            "localnet" | "local" => Ok(Network::Localnet),
            other => Err(anyhow!(
                "Unknown network '{}'. Expected mainnet, testnet, devnet or localnet",
                other
            )),
        }
    }
}
