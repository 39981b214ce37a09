use std::collections::HashMap;

use alloy_dyn_abi::{DynSolType, DynSolValue, Specifier};
use alloy_json_abi::{Error as ErrorItem, Event, Function, Param};
use alloy_primitives::{Selector, B256};
use alloy_sol_types::{Panic, Revert, SolError};
use serde::Serialize;

use crate::{
    abi::{ContractAbi, Fork},
    dynamic::{decode_params, named_args, DecodedArg},
    error::AbiError,
    pacaya, shasta,
};

/// An ABI item together with the contract that declares it
#[derive(Debug, Clone, Copy)]
pub struct AbiMatch<T: 'static> {
    pub contract: &'static ContractAbi,
    pub item: &'static T,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedCall {
    pub contract: String,
    pub fork: Fork,
    pub name: String,
    pub signature: String,
    pub args: Vec<DecodedArg>,
}

/// A decoded revert reason.
///
/// `contract` and `fork` are empty for the builtin `Error(string)` and `Panic(uint256)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedError {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fork: Option<Fork>,
    pub name: String,
    pub signature: String,
    pub args: Vec<DecodedArg>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedLog {
    pub contract: String,
    pub fork: Fork,
    pub name: String,
    pub signature: String,
    pub args: Vec<DecodedArg>,
}

/// Index of every function, event and error of a set of contracts, keyed by selector or topic.
///
/// Several contracts share items (ownership, pausing, upgrades, common errors), so every lookup
/// returns all matches in registration order.
#[derive(Debug)]
pub struct AbiRegistry {
    contracts: Vec<&'static ContractAbi>,
    functions: HashMap<Selector, Vec<AbiMatch<Function>>>,
    events: HashMap<B256, Vec<AbiMatch<Event>>>,
    errors: HashMap<Selector, Vec<AbiMatch<ErrorItem>>>,
}

impl AbiRegistry {
    /// All contracts of all forks
    pub fn load() -> Result<Self, AbiError> {
        Self::from_contracts(crate::all_contracts())
    }

    pub fn for_fork(fork: Fork) -> Result<Self, AbiError> {
        match fork {
            Fork::Pacaya => Self::from_contracts(pacaya::ALL.iter().copied()),
            Fork::Shasta => Self::from_contracts(shasta::ALL.iter().copied()),
        }
    }

    pub fn from_contracts(
        contracts: impl IntoIterator<Item = &'static ContractAbi>,
    ) -> Result<Self, AbiError> {
        let mut registry = Self {
            contracts: Vec::new(),
            functions: HashMap::new(),
            events: HashMap::new(),
            errors: HashMap::new(),
        };

        for contract in contracts {
            let abi = contract.abi()?;

            for item in abi.functions() {
                registry
                    .functions
                    .entry(item.selector())
                    .or_default()
                    .push(AbiMatch { contract, item });
            }
            for item in abi.events().filter(|e| !e.anonymous) {
                registry
                    .events
                    .entry(item.selector())
                    .or_default()
                    .push(AbiMatch { contract, item });
            }
            for item in abi.errors() {
                registry
                    .errors
                    .entry(item.selector())
                    .or_default()
                    .push(AbiMatch { contract, item });
            }

            registry.contracts.push(contract);
        }

        tracing::debug!(
            "Indexed {} contracts: {} selectors, {} topics, {} errors",
            registry.contracts.len(),
            registry.functions.len(),
            registry.events.len(),
            registry.errors.len()
        );

        Ok(registry)
    }

    pub fn contracts(&self) -> &[&'static ContractAbi] {
        &self.contracts
    }

    /// Looks a contract up by case-insensitive name.
    ///
    /// Without a fork, the most recent fork declaring the contract wins.
    pub fn contract(
        &self,
        name: &str,
        fork: Option<Fork>,
    ) -> Result<&'static ContractAbi, AbiError> {
        self.contracts
            .iter()
            .filter(|c| c.name().eq_ignore_ascii_case(name))
            .filter(|c| fork.is_none_or(|fork| c.fork() == fork))
            .max_by_key(|c| c.fork())
            .copied()
            .ok_or_else(|| match fork {
                Some(fork) => AbiError::UnknownContract(format!("{name} ({fork})")),
                None => AbiError::UnknownContract(name.to_string()),
            })
    }

    pub fn find_function(&self, selector: Selector) -> &[AbiMatch<Function>] {
        self.functions
            .get(&selector)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn find_event(&self, topic: B256) -> &[AbiMatch<Event>] {
        self.events
            .get(&topic)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn find_error(&self, selector: Selector) -> &[AbiMatch<ErrorItem>] {
        self.errors
            .get(&selector)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Decodes revert data into the custom error it encodes.
    ///
    /// The builtin `Error(string)` and `Panic(uint256)` are recognized as well.
    pub fn decode_revert(&self, data: &[u8]) -> Result<DecodedError, AbiError> {
        let selector = split_selector(data)?;
        let args = &data[4..];

        if selector == Revert::SELECTOR {
            return decode_builtin(Revert::SIGNATURE, "Error", "reason", DynSolType::String, args);
        }
        if selector == Panic::SELECTOR {
            return decode_builtin(Panic::SIGNATURE, "Panic", "code", DynSolType::Uint(256), args);
        }

        let mut last_err = None;
        for AbiMatch { contract, item } in self.find_error(selector) {
            match decode_params(&item.inputs, args) {
                Ok(values) => {
                    return Ok(DecodedError {
                        contract: Some(contract.name().to_string()),
                        fork: Some(contract.fork()),
                        name: item.name.clone(),
                        signature: item.signature(),
                        args: named_args(&item.inputs, &values),
                    })
                }
                Err(err) => last_err = Some(err),
            }
        }

        Err(last_err.unwrap_or_else(|| AbiError::UnknownSelector(selector.to_string())))
    }

    /// Decodes transaction input into the function call it encodes
    pub fn decode_calldata(&self, data: &[u8]) -> Result<DecodedCall, AbiError> {
        let selector = split_selector(data)?;

        let mut last_err = None;
        for AbiMatch { contract, item } in self.find_function(selector) {
            match decode_params(&item.inputs, &data[4..]) {
                Ok(values) => {
                    return Ok(DecodedCall {
                        contract: contract.name().to_string(),
                        fork: contract.fork(),
                        name: item.name.clone(),
                        signature: item.signature(),
                        args: named_args(&item.inputs, &values),
                    })
                }
                Err(err) => last_err = Some(err),
            }
        }

        Err(last_err.unwrap_or_else(|| AbiError::UnknownSelector(selector.to_string())))
    }

    /// Decodes a log by its first topic.
    ///
    /// Indexed arguments of dynamic types (strings, bytes, arrays, structs) only exist as their
    /// keccak hash on chain, they are reported as that hash.
    pub fn decode_log(&self, topics: &[B256], data: &[u8]) -> Result<DecodedLog, AbiError> {
        let (topic0, indexed_topics) = topics.split_first().ok_or(AbiError::MissingTopics)?;

        let mut last_err = None;
        for AbiMatch { contract, item } in self.find_event(*topic0) {
            match decode_event(item, indexed_topics, data) {
                Ok(args) => {
                    return Ok(DecodedLog {
                        contract: contract.name().to_string(),
                        fork: contract.fork(),
                        name: item.name.clone(),
                        signature: item.signature(),
                        args,
                    })
                }
                Err(err) => last_err = Some(err),
            }
        }

        Err(last_err.unwrap_or_else(|| AbiError::UnknownSelector(topic0.to_string())))
    }
}

fn split_selector(data: &[u8]) -> Result<Selector, AbiError> {
    data.get(..4)
        .map(Selector::from_slice)
        .ok_or(AbiError::DataTooShort(data.len()))
}

fn decode_builtin(
    signature: &str,
    name: &str,
    arg: &str,
    ty: DynSolType,
    data: &[u8],
) -> Result<DecodedError, AbiError> {
    let kind = ty.sol_type_name().into_owned();
    let value = ty
        .abi_decode_params(data)
        .map_err(|source| AbiError::Decode {
            what: signature.to_string(),
            source,
        })?;

    Ok(DecodedError {
        contract: None,
        fork: None,
        name: name.to_string(),
        signature: signature.to_string(),
        args: vec![DecodedArg::new(0, arg, kind, &value)],
    })
}

fn decode_event(event: &Event, topics: &[B256], data: &[u8]) -> Result<Vec<DecodedArg>, AbiError> {
    let indexed_count = event.inputs.iter().filter(|p| p.indexed).count();
    if topics.len() != indexed_count {
        return Err(AbiError::ArgumentCount {
            signature: event.signature(),
            expected: indexed_count + 1,
            actual: topics.len() + 1,
        });
    }

    let body = event
        .inputs
        .iter()
        .filter(|p| !p.indexed)
        .map(|p| Param {
            ty: p.ty.clone(),
            name: p.name.clone(),
            components: p.components.clone(),
            internal_type: p.internal_type.clone(),
        })
        .collect::<Vec<_>>();
    let mut body_values = decode_params(&body, data)?.into_iter();
    let mut topics = topics.iter();

    let mut args = Vec::with_capacity(event.inputs.len());
    for (index, param) in event.inputs.iter().enumerate() {
        let ty = param.resolve().map_err(|source| AbiError::ResolveType {
            param: param.name.clone(),
            source,
        })?;

        let (value, indexed) = if param.indexed {
            let Some(topic) = topics.next() else {
                return Err(AbiError::MissingTopics);
            };
            let value = if is_word_type(&ty) {
                ty.abi_decode(topic.as_slice())
                    .map_err(|source| AbiError::Decode {
                        what: format!("topic of {}", param.name),
                        source,
                    })?
            } else {
                DynSolValue::FixedBytes(*topic, 32)
            };
            (value, true)
        } else {
            let Some(value) = body_values.next() else {
                return Err(AbiError::MissingTopics);
            };
            (value, false)
        };

        let mut arg = DecodedArg::new(index, &param.name, param.selector_type(), &value);
        arg.indexed = indexed;
        args.push(arg);
    }

    Ok(args)
}

// types that fit a single topic word as-is, everything else is hashed when indexed
fn is_word_type(ty: &DynSolType) -> bool {
    matches!(
        ty,
        DynSolType::Address
            | DynSolType::Bool
            | DynSolType::Int(_)
            | DynSolType::Uint(_)
            | DynSolType::FixedBytes(_)
            | DynSolType::Function
    )
}

#[cfg(test)]
mod test {
    use alloy_primitives::{address, keccak256, U256};
    use alloy_sol_types::{SolCall, SolError, SolEvent};

    use super::*;
    use crate::pacaya::{ForcedInclusion, ForcedInclusionStore, PreconfWhitelist};

    #[test]
    fn contract_lookup_prefers_latest_fork() {
        let registry = AbiRegistry::load().unwrap();

        let compose = registry.contract("composeverifier", None).unwrap();
        assert_eq!(compose.fork(), Fork::Shasta);

        let compose = registry
            .contract("ComposeVerifier", Some(Fork::Pacaya))
            .unwrap();
        assert_eq!(compose.fork(), Fork::Pacaya);

        assert!(matches!(
            registry.contract("Inbox", Some(Fork::Pacaya)),
            Err(AbiError::UnknownContract(_))
        ));
    }

    #[test]
    fn builtin_reverts() {
        let registry = AbiRegistry::load().unwrap();

        let data = Revert {
            reason: "not allowed".to_string(),
        }
        .abi_encode();
        let decoded = registry.decode_revert(&data).unwrap();
        assert_eq!(decoded.name, "Error");
        assert_eq!(decoded.contract, None);
        assert_eq!(decoded.args[0].value, r#""not allowed""#);

        let data = Panic {
            code: U256::from(0x11),
        }
        .abi_encode();
        let decoded = registry.decode_revert(&data).unwrap();
        assert_eq!(decoded.name, "Panic");
        assert_eq!(decoded.args[0].value, "17");
    }

    #[test]
    fn custom_revert() {
        let registry = AbiRegistry::for_fork(Fork::Pacaya).unwrap();

        let data = ForcedInclusionStore::IncorrectFee {}.abi_encode();
        let decoded = registry.decode_revert(&data).unwrap();

        assert_eq!(decoded.name, "IncorrectFee");
        assert_eq!(decoded.signature, "IncorrectFee()");
        assert_eq!(decoded.fork, Some(Fork::Pacaya));
        assert!(decoded.args.is_empty());
    }

    #[test]
    fn unknown_and_short_reverts() {
        let registry = AbiRegistry::load().unwrap();

        assert!(matches!(
            registry.decode_revert(&[0xde, 0xad]),
            Err(AbiError::DataTooShort(2))
        ));
        assert!(matches!(
            registry.decode_revert(&[0xde, 0xad, 0xbe, 0xef]),
            Err(AbiError::UnknownSelector(_))
        ));
    }

    #[test]
    fn calldata_of_typed_call() {
        let registry = AbiRegistry::load().unwrap();
        let call = ForcedInclusionStore::storeForcedInclusionCall {
            blobIndex: 1,
            blobByteOffset: 64,
            blobByteSize: 4096,
        };

        let decoded = registry.decode_calldata(&call.abi_encode()).unwrap();

        assert_eq!(decoded.contract, "ForcedInclusionStore");
        assert_eq!(decoded.signature, "storeForcedInclusion(uint8,uint32,uint32)");
        let values: Vec<_> = decoded.args.iter().map(|a| a.value.as_str()).collect();
        assert_eq!(values, ["1", "64", "4096"]);
    }

    #[test]
    fn indexed_and_body_log_args() {
        let registry = AbiRegistry::load().unwrap();
        let proposer = address!("0x00000000000000000000000000000000000000aa");
        let sequencer = address!("0x00000000000000000000000000000000000000bb");
        let event = PreconfWhitelist::OperatorAdded {
            proposer,
            sequencer,
            activeSince: U256::from(1_700_000_000u64),
        };

        let topics = event.encode_topics();
        let topics: Vec<B256> = topics.iter().map(|t| B256::from(t.0)).collect();
        let data = event.encode_data();

        let decoded = registry.decode_log(&topics, &data).unwrap();

        assert_eq!(decoded.name, "OperatorAdded");
        assert_eq!(decoded.args.len(), 3);
        assert!(decoded.args[0].indexed);
        assert_eq!(decoded.args[0].value, proposer.to_checksum(None));
        assert_eq!(decoded.args[1].value, sequencer.to_checksum(None));
        assert!(!decoded.args[2].indexed);
        assert_eq!(decoded.args[2].value, "1700000000");
    }

    #[test]
    fn tuple_log_body() {
        let registry = AbiRegistry::load().unwrap();
        let event = ForcedInclusionStore::ForcedInclusionStored {
            forcedInclusion: ForcedInclusion {
                blobHash: keccak256("blob"),
                feeInGwei: 10,
                createdAtBatchId: 7,
                blobByteOffset: 0,
                blobByteSize: 128,
                blobCreatedIn: 99,
            },
        };

        let decoded = registry
            .decode_log(
                &[ForcedInclusionStore::ForcedInclusionStored::SIGNATURE_HASH],
                &event.encode_data(),
            )
            .unwrap();

        assert_eq!(decoded.args.len(), 1);
        assert_eq!(decoded.args[0].name, "forcedInclusion");
        assert!(decoded.args[0].value.ends_with(", 10, 7, 0, 128, 99)"));
    }

    #[test]
    fn log_without_topics() {
        let registry = AbiRegistry::load().unwrap();

        assert!(matches!(
            registry.decode_log(&[], &[]),
            Err(AbiError::MissingTopics)
        ));
    }
}
