use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use taiko_bindings::Fork;
use taiko_contracts_client::{config::CliEnvExt, serde::deserialize_vec_string};

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub args: CliArgs,

    /// Print results as JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// This struct is used for both args and environment variables
/// the basic idea is that every env var can be overriden by a cli arg
/// and these override the config file
/// env vars follow the pattern of TAIKO_BINDINGS_{UPPERCASE_ARG_NAME}
#[derive(Debug, Clone, Args, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CliArgs {
    /// The home directory of the application, where the taiko-bindings.toml configuration file is stored
    /// if not provided, a series of default directories will be tried
    #[arg(long, global = true)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home: Option<PathBuf>,

    /// The path to an optional dotenv file to try and load
    /// if not set, will be the current working directory's .env
    #[arg(long, global = true)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dotenv: Option<PathBuf>,

    /// Log level, in the format of tracing directives
    #[arg(long, global = true)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(deserialize_with = "deserialize_vec_string")]
    pub log_level: Vec<String>,

    /// L1 endpoint, `ws://` and `wss://` subscribe to logs, `http://` and `https://` poll
    #[arg(long, global = true)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub l1_endpoint: Option<String>,

    /// Poll interval in milliseconds for log watches
    #[arg(long, global = true)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poll_interval_ms: Option<u64>,

    /// Blocks per `eth_getLogs` request when replaying past events
    #[arg(long, global = true)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backfill_chunk_size: Option<u64>,

    /// Restrict ABI lookups to one fork, the most recent one wins otherwise
    #[arg(long, global = true)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fork: Option<Fork>,
}

impl CliEnvExt for CliArgs {
    const ENV_VAR_PREFIX: &'static str = "TAIKO_BINDINGS";
    const TOML_IDENTIFIER: &'static str = "cli";

    fn home_dir(&self) -> Option<PathBuf> {
        self.home.clone()
    }

    fn dotenv_path(&self) -> Option<PathBuf> {
        self.dotenv.clone()
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List the contracts with bundled ABIs
    Contracts,

    /// Show the functions, events and errors of a contract with their selectors
    Abi {
        #[arg(long)]
        contract: String,
    },

    /// Decode revert data into a contract error, `Error(string)` or `Panic(uint256)`
    DecodeError {
        /// Hex encoded revert data, selector included
        data: String,
    },

    /// Decode the calldata of a call to any known function
    DecodeCalldata {
        /// Hex encoded calldata, selector included
        data: String,
    },

    /// Execute a read-only call and decode its output
    Call {
        #[arg(long)]
        contract: String,

        /// Deployed address, defaults to the configured address of the contract
        #[arg(long)]
        address: Option<String>,

        /// Function name, or full signature for overloaded functions
        #[arg(long)]
        function: String,

        /// Block number to call at, latest if unset
        #[arg(long)]
        block: Option<u64>,

        /// Arguments, e.g. `0x..` for addresses and bytes, `[1,2]` for arrays, `(a,b)` for tuples
        args: Vec<String>,
    },

    /// Print events of a contract as they are emitted, until interrupted
    Watch {
        #[arg(long)]
        contract: String,

        #[arg(long)]
        address: Option<String>,

        /// Event name
        #[arg(long)]
        event: String,

        /// Replay past events from this block first
        #[arg(long)]
        from_block: Option<u64>,
    },

    /// Operators and sequencers of the preconfirmation whitelist
    Whitelist {
        #[arg(long)]
        address: Option<String>,
    },

    /// State of the forced inclusion queue
    ForcedInclusions {
        #[arg(long)]
        address: Option<String>,

        /// Also list the entries stored since this block
        #[arg(long)]
        history_from: Option<u64>,
    },

    /// Which fork implementation the router sends a call to
    ForkRoute {
        #[arg(long)]
        address: Option<String>,

        /// Four byte selector, or a function signature such as `proposeBatch(bytes,bytes)`
        #[arg(long)]
        selector: String,
    },
}

#[cfg(test)]
mod tests;
