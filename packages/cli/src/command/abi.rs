use alloy_primitives::hex;
use anyhow::Result;
use serde::Serialize;
use taiko_bindings::{
    registry::{DecodedCall, DecodedError},
    AbiRegistry, Fork,
};

use super::parse_hex;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractSummary {
    pub name: String,
    pub fork: Fork,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AbiEntry {
    pub signature: String,
    /// Four byte selector for functions and errors, topic0 for events
    pub selector: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AbiSummary {
    pub contract: String,
    pub fork: Fork,
    pub functions: Vec<AbiEntry>,
    pub events: Vec<AbiEntry>,
    pub errors: Vec<AbiEntry>,
}

pub fn contracts(registry: &AbiRegistry) -> Vec<ContractSummary> {
    registry
        .contracts()
        .iter()
        .map(|contract| ContractSummary {
            name: contract.name().to_string(),
            fork: contract.fork(),
        })
        .collect()
}

pub fn abi(registry: &AbiRegistry, contract: &str, fork: Option<Fork>) -> Result<AbiSummary> {
    let contract = registry.contract(contract, fork)?;

    fn entries<T: AsRef<[u8]>>(items: Vec<(String, T)>) -> Vec<AbiEntry> {
        let mut entries: Vec<AbiEntry> = items
            .into_iter()
            .map(|(signature, selector)| AbiEntry {
                signature,
                selector: hex::encode_prefixed(selector),
            })
            .collect();
        entries.sort_by(|a, b| a.signature.cmp(&b.signature));
        entries
    }

    Ok(AbiSummary {
        contract: contract.name().to_string(),
        fork: contract.fork(),
        functions: entries(contract.selectors()?),
        events: entries(contract.topics()?),
        errors: entries(contract.error_selectors()?),
    })
}

pub fn decode_error(registry: &AbiRegistry, data: &str) -> Result<DecodedError> {
    Ok(registry.decode_revert(&parse_hex(data)?)?)
}

pub fn decode_calldata(registry: &AbiRegistry, data: &str) -> Result<DecodedCall> {
    Ok(registry.decode_calldata(&parse_hex(data)?)?)
}
