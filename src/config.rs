//! Builder configuration from environment variables.
//!
//! | Variable | Default | |
//! |---|---|---|
//! | `SUI_PTB_NETWORK` | inferred from `SUI_PTB_RPC_URL`, else `testnet` | target network |
//! | `SUI_PTB_RPC_URL` | unset | fullnode URL, only used to infer the network |
//! | `SUI_PTB_GAS_BUDGET` | unset | gas budget in MIST |
//! | `SUI_PTB_INTERFACE_CACHE_TTL_SECS` | `300` | module interface cache TTL |
//! | `SUI_PTB_STRICT` | `false` | treat validation warnings as failures |
//!
//! CLI flags override every value.

use anyhow::{Context, Result};
use std::time::Duration;
use sui_ptb_core::{EmitOptions, ModuleInterfaceCache};
use sui_ptb_types::env_utils::{env_bool, env_var, env_var_or};
use sui_ptb_types::Network;

pub const NETWORK_ENV: &str = "SUI_PTB_NETWORK";
pub const RPC_URL_ENV: &str = "SUI_PTB_RPC_URL";
pub const GAS_BUDGET_ENV: &str = "SUI_PTB_GAS_BUDGET";
pub const INTERFACE_CACHE_TTL_ENV: &str = "SUI_PTB_INTERFACE_CACHE_TTL_SECS";
pub const STRICT_ENV: &str = "SUI_PTB_STRICT";

/// Default interface cache TTL (5 minutes)
pub const DEFAULT_INTERFACE_CACHE_TTL_SECS: u64 = 300;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuilderConfig {
    pub network: Network,
    pub gas_budget: Option<u64>,
    pub interface_cache_ttl: Duration,
    pub strict: bool,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            network: Network::default(),
            gas_budget: None,
            interface_cache_ttl: Duration::from_secs(DEFAULT_INTERFACE_CACHE_TTL_SECS),
            strict: false,
        }
    }
}

impl BuilderConfig {
    /// Load the configuration from the environment.
    ///
    /// An unrecognised `SUI_PTB_NETWORK` is an error rather than a silent default.
    pub fn from_env() -> Result<Self> {
        let network = match env_var::<String>(NETWORK_ENV) {
            Some(name) => name
                .parse::<Network>()
                .with_context(|| format!("Invalid {}", NETWORK_ENV))?,
            None => env_var::<String>(RPC_URL_ENV)
                .and_then(|url| Network::infer_from_url(&url))
                .unwrap_or_default(),
        };
        Ok(Self {
            network,
            gas_budget: env_var(GAS_BUDGET_ENV),
            interface_cache_ttl: Duration::from_secs(env_var_or(
                INTERFACE_CACHE_TTL_ENV,
                DEFAULT_INTERFACE_CACHE_TTL_SECS,
            )),
            strict: env_bool(STRICT_ENV),
        })
    }

    /// Apply command-line overrides; `None` keeps the current value.
    pub fn with_overrides(mut self, network: Option<Network>, gas_budget: Option<u64>) -> Self {
        if let Some(network) = network {
            self.network = network;
        }
        if gas_budget.is_some() {
            self.gas_budget = gas_budget;
        }
        self
    }

    pub fn emit_options(&self) -> EmitOptions {
        EmitOptions {
            network: self.network,
            gas_budget: self.gas_budget,
        }
    }

    pub fn interface_cache(&self) -> ModuleInterfaceCache {
        ModuleInterfaceCache::new(self.interface_cache_ttl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BuilderConfig::default();
        assert_eq!(config.network, Network::Testnet);
        assert_eq!(config.gas_budget, None);
        assert_eq!(config.interface_cache_ttl, Duration::from_secs(300));
        assert!(!config.strict);
    }

    #[test]
    fn test_overrides() {
        let config = BuilderConfig {
            gas_budget: Some(1),
            ..Default::default()
        }
        .with_overrides(Some(Network::Devnet), None);
        assert_eq!(config.network, Network::Devnet);
        assert_eq!(config.gas_budget, Some(1));

        let options = config.with_overrides(None, Some(9)).emit_options();
        assert_eq!(options.gas_budget, Some(9));
        assert_eq!(options.network, Network::Devnet);
    }

    // Only this test touches the SUI_PTB_* variables.
    #[test]
    fn test_from_env() {
        std::env::set_var(NETWORK_ENV, "mainnet");
        std::env::set_var(GAS_BUDGET_ENV, "5000000");
        std::env::set_var(INTERFACE_CACHE_TTL_ENV, "30");
        let config = BuilderConfig::from_env().unwrap();
        assert_eq!(config.network, Network::Mainnet);
        assert_eq!(config.gas_budget, Some(5_000_000));
        assert_eq!(config.interface_cache().ttl(), Duration::from_secs(30));

        std::env::remove_var(NETWORK_ENV);
        std::env::set_var(RPC_URL_ENV, "http://127.0.0.1:9000");
        assert_eq!(BuilderConfig::from_env().unwrap().network, Network::Localnet);

        std::env::set_var(NETWORK_ENV, "moonnet");
        assert!(BuilderConfig::from_env().is_err());

        for key in [NETWORK_ENV, RPC_URL_ENV, GAS_BUDGET_ENV, INTERFACE_CACHE_TTL_ENV] {
            std::env::remove_var(key);
        }
    }
}
