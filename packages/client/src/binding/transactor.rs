use alloy_network::{Ethereum, TransactionBuilder};
use alloy_primitives::{Address, Bytes, U256};
use alloy_provider::{PendingTransactionBuilder, Provider};
use alloy_rpc_types_eth::{TransactionReceipt, TransactionRequest};
use alloy_sol_types::SolCall;
use taiko_bindings::ContractDescriptor;

use super::ContractBinding;
use crate::error::BindingError;

/// EIP-1559 has a default 30m gas limit per block without override, anything higher fails with
/// `intrinsic gas too high`
pub const MAX_GAS_LIMIT: u64 = 30_000_000;

/// Options of a state-changing transaction.
///
/// Unset fields are filled by the provider, except the gas limit which is estimated and padded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactOpts {
    pub from: Option<Address>,
    /// Wei sent along with the transaction
    pub value: Option<U256>,
    pub gas_limit: Option<u64>,
    pub nonce: Option<u64>,
    /// Overrides the binding's gas estimate multiplier
    pub gas_estimate_multiplier: Option<f32>,
}

impl TransactOpts {
    pub fn with_value(value: U256) -> Self {
        Self {
            value: Some(value),
            ..Default::default()
        }
    }
}

/// State-changing facet: encodes a typed call and sends it as a transaction
pub struct Transactor<'a, D, P> {
    binding: &'a ContractBinding<D, P>,
}

impl<'a, D, P> Transactor<'a, D, P>
where
    D: ContractDescriptor,
    P: Provider + Clone + 'static,
{
    pub(super) fn new(binding: &'a ContractBinding<D, P>) -> Self {
        Self { binding }
    }

    pub async fn transact<C: SolCall>(
        &self,
        call: &C,
        opts: TransactOpts,
    ) -> Result<PendingTransactionBuilder<Ethereum>, BindingError> {
        self.raw_transact(call.abi_encode().into(), opts).await
    }

    /// Sends plain value to the contract, invoking its receive or fallback function
    pub async fn transfer(
        &self,
        opts: TransactOpts,
    ) -> Result<PendingTransactionBuilder<Ethereum>, BindingError> {
        self.raw_transact(Bytes::new(), opts).await
    }

    pub async fn raw_transact(
        &self,
        calldata: Bytes,
        opts: TransactOpts,
    ) -> Result<PendingTransactionBuilder<Ethereum>, BindingError> {
        let mut tx = TransactionRequest::default()
            .with_to(self.binding.address)
            .with_input(calldata);
        if let Some(from) = opts.from {
            tx = tx.with_from(from);
        }
        if let Some(value) = opts.value {
            tx = tx.with_value(value);
        }
        if let Some(nonce) = opts.nonce {
            tx = tx.with_nonce(nonce);
        }

        let gas = match opts.gas_limit {
            Some(gas) => gas.min(MAX_GAS_LIMIT),
            None => {
                let estimate = self
                    .binding
                    .provider
                    .estimate_gas(tx.clone())
                    .await
                    .map_err(BindingError::EstimateGas)?;

                let multiplier = opts
                    .gas_estimate_multiplier
                    .unwrap_or(self.binding.settings.gas_estimate_multiplier);

                pad_gas_estimate(estimate, multiplier)
            }
        };

        let pending = self
            .binding
            .provider
            .send_transaction(tx.with_gas_limit(gas))
            .await
            .map_err(BindingError::SendTransaction)?;

        tracing::debug!(
            "Sent transaction {} to {} at {} (gas limit {})",
            pending.tx_hash(),
            D::name(),
            self.binding.address,
            gas
        );

        Ok(pending)
    }

    /// Sends the transaction and waits for its receipt, failing if it reverted
    pub async fn transact_and_confirm<C: SolCall>(
        &self,
        call: &C,
        opts: TransactOpts,
    ) -> Result<TransactionReceipt, BindingError> {
        let receipt = self.transact(call, opts).await?.get_receipt().await?;

        tracing::info!(
            "Submitted {} to {} at {} with hash {}",
            C::SIGNATURE,
            D::name(),
            self.binding.address,
            receipt.transaction_hash
        );

        ensure_success(receipt)
    }
}

pub(crate) fn ensure_success(
    receipt: TransactionReceipt,
) -> Result<TransactionReceipt, BindingError> {
    match receipt.status() {
        true => Ok(receipt),
        false => Err(BindingError::Reverted(Box::new(receipt))),
    }
}

// pad it with a multiplier to account for gas fluctuations
pub(crate) fn pad_gas_estimate(estimate: u64, multiplier: f32) -> u64 {
    (((estimate as f64) * (multiplier as f64)) as u64).min(MAX_GAS_LIMIT)
}
