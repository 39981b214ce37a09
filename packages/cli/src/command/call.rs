use alloy_network::TransactionBuilder;
use alloy_primitives::Address;
use alloy_provider::{DynProvider, Provider};
use alloy_rpc_types_eth::{BlockId, TransactionRequest};
use anyhow::{bail, Context, Result};
use serde::Serialize;
use taiko_bindings::{
    dynamic::{decode_output, encode_call, DecodedArg},
    AbiRegistry, ContractAbi,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallOutput {
    pub contract: String,
    pub address: Address,
    pub signature: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block: Option<u64>,
    pub outputs: Vec<DecodedArg>,
}

/// Encodes `args` for `function`, executes it with `eth_call` and decodes the output.
///
/// A revert is decoded against `registry` and reported as the error.
pub async fn call(
    provider: &DynProvider,
    registry: &AbiRegistry,
    contract: &'static ContractAbi,
    address: Address,
    function: &str,
    args: &[String],
    block: Option<u64>,
) -> Result<CallOutput> {
    let function = contract.function(function)?;
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    let calldata = encode_call(function, &args)?;

    tracing::debug!(
        "Calling {} on {} at {}",
        function.signature(),
        contract.name(),
        address
    );

    let tx = TransactionRequest::default()
        .with_to(address)
        .with_input(calldata);

    let mut request = provider.call(tx);
    if let Some(block) = block {
        request = request.block(BlockId::number(block));
    }

    let output = match request.await {
        Ok(output) => output,
        Err(err) => {
            let revert = err.as_error_resp().and_then(|payload| payload.as_revert_data());
            match revert {
                Some(data) => match registry.decode_revert(&data) {
                    Ok(decoded) => bail!(
                        "{} reverted with {}",
                        function.signature(),
                        crate::display::format_error(&decoded)
                    ),
                    Err(_) => bail!("{} reverted with unknown data {}", function.signature(), data),
                },
                None => {
                    return Err(err).with_context(|| format!("eth_call to {} failed", address))
                }
            }
        }
    };

    Ok(CallOutput {
        contract: contract.name().to_string(),
        address,
        signature: function.signature(),
        block,
        outputs: decode_output(function, &output)?,
    })
}
