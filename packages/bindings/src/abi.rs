use std::{fmt, str::FromStr, sync::OnceLock};

use alloy_json_abi::{Error as ErrorItem, Event, Function, JsonAbi};
use alloy_primitives::{Selector, B256};
use alloy_sol_types::SolInterface;
use serde::{Deserialize, Serialize};

use crate::error::AbiError;

/// The protocol fork a contract ABI belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fork {
    Pacaya,
    Shasta,
}

impl Fork {
    pub const ALL: [Fork; 2] = [Fork::Pacaya, Fork::Shasta];

    pub fn as_str(&self) -> &'static str {
        match self {
            Fork::Pacaya => "pacaya",
            Fork::Shasta => "shasta",
        }
    }
}

impl fmt::Display for Fork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Fork {
    type Err = AbiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pacaya" => Ok(Fork::Pacaya),
            "shasta" => Ok(Fork::Shasta),
            other => Err(AbiError::UnknownFork(other.to_string())),
        }
    }
}

/// A contract interface as shipped in `abi/<fork>/<Name>.json`.
///
/// The JSON is embedded at compile time and parsed lazily on first use, the parsed
/// [`JsonAbi`] is then cached for the lifetime of the process.
pub struct ContractAbi {
    name: &'static str,
    fork: Fork,
    json: &'static str,
    parsed: OnceLock<JsonAbi>,
}

impl ContractAbi {
    pub const fn new(name: &'static str, fork: Fork, json: &'static str) -> Self {
        Self {
            name,
            fork,
            json,
            parsed: OnceLock::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn fork(&self) -> Fork {
        self.fork
    }

    /// The raw ABI JSON, exactly as stored on disk
    pub fn json(&self) -> &'static str {
        self.json
    }

    pub fn abi(&self) -> Result<&JsonAbi, AbiError> {
        if let Some(abi) = self.parsed.get() {
            return Ok(abi);
        }

        let abi = serde_json::from_str::<JsonAbi>(self.json).map_err(|source| AbiError::Parse {
            contract: self.name,
            source,
        })?;

        Ok(self.parsed.get_or_init(|| abi))
    }

    /// All overloads of the function `name`.
    pub fn functions(&self, name: &str) -> Result<&[Function], AbiError> {
        self.abi()?
            .function(name)
            .map(Vec::as_slice)
            .ok_or_else(|| AbiError::UnknownFunction {
                contract: self.name.to_string(),
                name: name.to_string(),
            })
    }

    /// Resolves a function by bare name or by full signature, e.g. `removeOperator(uint256)`.
    ///
    /// A bare name that matches several overloads is ambiguous and rejected.
    pub fn function(&self, name_or_signature: &str) -> Result<&Function, AbiError> {
        let name = name_or_signature
            .split_once('(')
            .map(|(name, _)| name)
            .unwrap_or(name_or_signature);
        let overloads = self.functions(name)?;

        if name_or_signature.contains('(') {
            return overloads
                .iter()
                .find(|f| f.signature() == name_or_signature)
                .ok_or_else(|| AbiError::UnknownFunction {
                    contract: self.name.to_string(),
                    name: name_or_signature.to_string(),
                });
        }

        match overloads {
            [function] => Ok(function),
            _ => Err(AbiError::AmbiguousFunction {
                contract: self.name.to_string(),
                name: name.to_string(),
                candidates: overloads.iter().map(|f| f.signature()).collect(),
            }),
        }
    }

    pub fn event(&self, name: &str) -> Result<&Event, AbiError> {
        self.abi()?
            .event(name)
            .and_then(|events| events.first())
            .ok_or_else(|| AbiError::UnknownEvent {
                contract: self.name.to_string(),
                name: name.to_string(),
            })
    }

    pub fn error(&self, name: &str) -> Result<&ErrorItem, AbiError> {
        self.abi()?
            .error(name)
            .and_then(|errors| errors.first())
            .ok_or_else(|| AbiError::UnknownError {
                contract: self.name.to_string(),
                name: name.to_string(),
            })
    }

    /// Every function as `(canonical signature, selector)`
    pub fn selectors(&self) -> Result<Vec<(String, Selector)>, AbiError> {
        Ok(self
            .abi()?
            .functions()
            .map(|f| (f.signature(), f.selector()))
            .collect())
    }

    /// Every event as `(canonical signature, topic0)`
    pub fn topics(&self) -> Result<Vec<(String, B256)>, AbiError> {
        Ok(self
            .abi()?
            .events()
            .map(|e| (e.signature(), e.selector()))
            .collect())
    }

    pub fn error_selectors(&self) -> Result<Vec<(String, Selector)>, AbiError> {
        Ok(self
            .abi()?
            .errors()
            .map(|e| (e.signature(), e.selector()))
            .collect())
    }
}

impl fmt::Debug for ContractAbi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractAbi")
            .field("name", &self.name)
            .field("fork", &self.fork)
            .finish()
    }
}

/// Ties a generated binding to its ABI data.
///
/// Implemented by one marker type per contract, e.g.
/// [`crate::pacaya::ForcedInclusionStoreContract`]. Generic client code is parameterized over
/// this trait instead of over each generated type.
pub trait ContractDescriptor: Send + Sync + 'static {
    /// The custom errors the contract may revert with
    type Errors: SolInterface + fmt::Debug + Send + Sync;

    fn abi() -> &'static ContractAbi;

    fn name() -> &'static str {
        Self::abi().name()
    }

    fn fork() -> Fork {
        Self::abi().fork()
    }
}

// declares the static ABI and the descriptor marker for one generated contract
macro_rules! descriptor {
    ($marker:ident, $static_name:ident, $name:literal, $fork:expr, $path:literal, $errors:ty) => {
        pub static $static_name: $crate::abi::ContractAbi = $crate::abi::ContractAbi::new(
            $name,
            $fork,
            include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/", $path)),
        );

        #[doc = concat!("Descriptor for the `", $name, "` contract")]
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $marker;

        impl $crate::abi::ContractDescriptor for $marker {
            type Errors = $errors;

            fn abi() -> &'static $crate::abi::ContractAbi {
                &$static_name
            }
        }
    };
}

pub(crate) use descriptor;
