use alloy_network::TransactionBuilder;
use alloy_primitives::{Address, Bytes};
use alloy_provider::Provider;
use alloy_rpc_types_eth::{BlockId, TransactionRequest};
use alloy_sol_types::SolCall;
use taiko_bindings::ContractDescriptor;

use super::ContractBinding;
use crate::error::BindingError;

/// Options of a read-only call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallOpts {
    /// Sender of the call, `msg.sender` in the contract
    pub from: Option<Address>,
    /// Block to execute against, latest if unset
    pub block: Option<BlockId>,
}

impl CallOpts {
    pub fn at_block(block: impl Into<BlockId>) -> Self {
        Self {
            block: Some(block.into()),
            ..Default::default()
        }
    }
}

/// Read-only facet: encodes a typed call, executes it with `eth_call` and decodes the result
pub struct Caller<'a, D, P> {
    binding: &'a ContractBinding<D, P>,
}

impl<'a, D, P> Caller<'a, D, P>
where
    D: ContractDescriptor,
    P: Provider + Clone + 'static,
{
    pub(super) fn new(binding: &'a ContractBinding<D, P>) -> Self {
        Self { binding }
    }

    pub async fn call<C: SolCall>(&self, call: &C) -> Result<C::Return, BindingError> {
        self.call_with(call, CallOpts::default()).await
    }

    pub async fn call_with<C: SolCall>(
        &self,
        call: &C,
        opts: CallOpts,
    ) -> Result<C::Return, BindingError> {
        let data = self.call_raw(call.abi_encode().into(), opts).await?;

        C::abi_decode_returns(&data).map_err(|source| BindingError::DecodeReturn {
            function: C::SIGNATURE,
            source,
        })
    }

    /// Executes already-encoded calldata and returns the raw output
    pub async fn call_raw(&self, calldata: Bytes, opts: CallOpts) -> Result<Bytes, BindingError> {
        let mut tx = TransactionRequest::default()
            .with_to(self.binding.address)
            .with_input(calldata);
        if let Some(from) = opts.from {
            tx = tx.with_from(from);
        }

        let mut call = self.binding.provider.call(tx);
        if let Some(block) = opts.block {
            call = call.block(block);
        }

        call.await.map_err(BindingError::Call)
    }
}
