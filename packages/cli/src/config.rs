use alloy_primitives::Address;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use taiko_bindings::Fork;
use taiko_contracts_client::config::{ChainConfig, ConfigExt, ContractAddresses};

/// The fully parsed and validated config struct we use in the application
/// this is built up from the ConfigBuilder which can load from multiple sources (in order of preference):
///
/// 1. cli args
/// 2. environment variables
/// 3. config file
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    /// The log-level to use, in the format of [tracing directives](https://docs.rs/tracing-subscriber/latest/tracing_subscriber/filter/struct.EnvFilter.html#directives).
    /// Default is `["info"]`
    pub log_level: Vec<String>,

    /// Endpoint and event settings
    #[serde(flatten)]
    pub chain: ChainConfig,

    /// Deployed contracts, used when a command gets no explicit address
    pub contracts: ContractAddresses,

    /// Default is unset, i.e. the most recent fork declaring a contract
    pub fork: Option<Fork>,
}

impl ConfigExt for Config {
    fn log_levels(&self) -> impl Iterator<Item = &str> {
        self.log_level.iter().map(|s| s.as_str())
    }
}

/// Default values for the config struct
/// these are only used to fill in holes after all the parsing and loading is done
impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: vec!["info".to_string()],
            chain: ChainConfig::default(),
            contracts: ContractAddresses::default(),
            fork: None,
        }
    }
}

impl Config {
    /// The explicit address if given, otherwise the configured one for `contract`
    pub fn contract_address(
        &self,
        contract: &'static str,
        explicit: Option<&str>,
    ) -> Result<Address> {
        match explicit {
            Some(address) => address
                .parse()
                .with_context(|| format!("invalid address for {contract}: {address}")),
            None => Ok(self.contracts.require(contract)?),
        }
    }

    /// Same as [`Config::contract_address`] for a contract only known by name at runtime
    pub fn named_contract_address(
        &self,
        contract: &str,
        explicit: Option<&str>,
    ) -> Result<Address> {
        match explicit {
            Some(address) => address
                .parse()
                .with_context(|| format!("invalid address for {contract}: {address}")),
            None => self.contracts.get(contract).with_context(|| {
                format!("no address configured for {contract}, pass --address")
            }),
        }
    }
}
