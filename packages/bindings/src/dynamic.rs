//! Runtime ABI encoding and decoding for when the contract is only known by name.
//!
//! The typed `sol!` bindings cover everything known at compile time, this module is the
//! fallback used by the registry and by the command line, driven by the parsed [`JsonAbi`]
//! items instead.
//!
//! [`JsonAbi`]: alloy_json_abi::JsonAbi

use alloy_dyn_abi::{DynSolType, DynSolValue, Specifier};
use alloy_json_abi::{Function, Param};
use alloy_primitives::Bytes;
use serde::Serialize;

use crate::error::AbiError;

/// A decoded parameter, rendered for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedArg {
    pub name: String,
    pub kind: String,
    pub value: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub indexed: bool,
}

impl DecodedArg {
    pub fn new(index: usize, param_name: &str, kind: impl ToString, value: &DynSolValue) -> Self {
        let name = if param_name.trim().is_empty() {
            format!("arg{index}")
        } else {
            param_name.to_string()
        };

        Self {
            name,
            kind: kind.to_string(),
            value: format_value(value),
            indexed: false,
        }
    }
}

pub fn resolve_types(params: &[Param]) -> Result<Vec<DynSolType>, AbiError> {
    params
        .iter()
        .map(|param| {
            param.resolve().map_err(|source| AbiError::ResolveType {
                param: describe_param(param),
                source,
            })
        })
        .collect()
}

/// Coerces the string arguments to the input types of `function` and encodes the calldata,
/// selector included.
///
/// Arguments use the usual human notation: decimal or `0x` numbers, `0x` addresses and bytes,
/// `true`/`false`, `[a,b]` for arrays and `(a,b)` for tuples.
pub fn encode_call(function: &Function, args: &[&str]) -> Result<Bytes, AbiError> {
    if args.len() != function.inputs.len() {
        return Err(AbiError::ArgumentCount {
            signature: function.signature(),
            expected: function.inputs.len(),
            actual: args.len(),
        });
    }

    let types = resolve_types(&function.inputs)?;
    let values = types
        .iter()
        .zip(args)
        .enumerate()
        .map(|(index, (ty, arg))| {
            ty.coerce_str(arg).map_err(|source| AbiError::Coerce {
                index,
                ty: ty.sol_type_name().into_owned(),
                source,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut calldata = function.selector().to_vec();
    calldata.extend(DynSolValue::Tuple(values).abi_encode_params());

    Ok(calldata.into())
}

/// Decodes ABI-encoded parameters (no selector) against `params`
pub fn decode_params(params: &[Param], data: &[u8]) -> Result<Vec<DynSolValue>, AbiError> {
    let types = resolve_types(params)?;
    if types.is_empty() {
        return Ok(Vec::new());
    }

    let what = params
        .iter()
        .map(|p| p.ty.as_str())
        .collect::<Vec<_>>()
        .join(",");

    match DynSolType::Tuple(types).abi_decode_params(data) {
        Ok(DynSolValue::Tuple(values)) => Ok(values),
        Ok(other) => Ok(vec![other]),
        Err(source) => Err(AbiError::Decode {
            what: format!("({what})"),
            source,
        }),
    }
}

/// Decodes the return data of an `eth_call` to `function`
pub fn decode_output(function: &Function, data: &[u8]) -> Result<Vec<DecodedArg>, AbiError> {
    let values = decode_params(&function.outputs, data)?;

    Ok(named_args(&function.outputs, &values))
}

pub fn named_args(params: &[Param], values: &[DynSolValue]) -> Vec<DecodedArg> {
    params
        .iter()
        .zip(values)
        .enumerate()
        .map(|(index, (param, value))| {
            DecodedArg::new(index, &param.name, param.selector_type(), value)
        })
        .collect()
}

/// Renders a value for humans: checksummed addresses, `0x` bytes, recursive arrays and tuples
pub fn format_value(value: &DynSolValue) -> String {
    match value {
        DynSolValue::Bool(b) => b.to_string(),
        DynSolValue::Int(i, _) => i.to_string(),
        DynSolValue::Uint(u, _) => u.to_string(),
        DynSolValue::FixedBytes(word, size) => const_hex::encode_prefixed(&word[..(*size).min(32)]),
        DynSolValue::Address(addr) => addr.to_checksum(None),
        DynSolValue::Function(func) => const_hex::encode_prefixed(func.as_slice()),
        DynSolValue::Bytes(bytes) => const_hex::encode_prefixed(bytes),
        DynSolValue::String(s) => format!("{s:?}"),
        DynSolValue::Array(items) | DynSolValue::FixedArray(items) => {
            let items: Vec<String> = items.iter().map(format_value).collect();
            format!("[{}]", items.join(", "))
        }
        DynSolValue::Tuple(fields) => {
            let fields: Vec<String> = fields.iter().map(format_value).collect();
            format!("({})", fields.join(", "))
        }
        #[allow(unreachable_patterns)]
        other => format!("{other:?}"),
    }
}

fn describe_param(param: &Param) -> String {
    if param.name.is_empty() {
        param.ty.clone()
    } else {
        format!("{} {}", param.ty, param.name)
    }
}
