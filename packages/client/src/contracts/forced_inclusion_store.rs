use alloy_primitives::{Address, U256};
use alloy_provider::{DynProvider, Provider};
use alloy_rpc_types_eth::TransactionReceipt;
use serde::Serialize;
use taiko_bindings::pacaya::{ForcedInclusion, ForcedInclusionStore, ForcedInclusionStoreContract};

use crate::{
    binding::{CallOpts, ContractBinding, FilterOpts, TopicFilter, TransactOpts},
    error::BindingError,
    events::EventIterator,
};

const GWEI: u64 = 1_000_000_000;

/// Positions of the forced inclusion queue, `head` is the oldest pending entry and `tail`
/// the slot the next one is stored at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QueueBounds {
    pub head: u64,
    pub tail: u64,
}

impl QueueBounds {
    pub fn len(&self) -> u64 {
        self.tail.saturating_sub(self.head)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone)]
pub struct ForcedInclusionStoreClient<P = DynProvider> {
    binding: ContractBinding<ForcedInclusionStoreContract, P>,
}

impl<P: Provider + Clone + 'static> ForcedInclusionStoreClient<P> {
    pub fn new(address: Address, provider: P) -> Self {
        Self::from_binding(ContractBinding::new(address, provider))
    }

    pub fn from_binding(binding: ContractBinding<ForcedInclusionStoreContract, P>) -> Self {
        Self { binding }
    }

    pub fn binding(&self) -> &ContractBinding<ForcedInclusionStoreContract, P> {
        &self.binding
    }

    /// Head and tail, both read at the latest block
    pub async fn queue_bounds(&self) -> Result<QueueBounds, BindingError> {
        let block = self
            .binding
            .provider()
            .get_block_number()
            .await
            .map_err(BindingError::BlockNumber)?;

        self.queue_bounds_at(CallOpts::at_block(block)).await
    }

    pub async fn pending_count(&self) -> Result<u64, BindingError> {
        Ok(self.queue_bounds().await?.len())
    }

    /// The entry at the head of the queue, `None` when nothing is pending
    pub async fn oldest_forced_inclusion(&self) -> Result<Option<ForcedInclusion>, BindingError> {
        let block = self
            .binding
            .provider()
            .get_block_number()
            .await
            .map_err(BindingError::BlockNumber)?;
        let opts = CallOpts::at_block(block);

        let bounds = self.queue_bounds_at(opts).await?;
        if bounds.is_empty() {
            return Ok(None);
        }

        self.binding
            .caller()
            .call_with(
                &ForcedInclusionStore::getForcedInclusionCall {
                    index: U256::from(bounds.head),
                },
                opts,
            )
            .await
            .map(Some)
    }

    pub async fn forced_inclusion(&self, index: u64) -> Result<ForcedInclusion, BindingError> {
        self.binding
            .caller()
            .call(&ForcedInclusionStore::getForcedInclusionCall {
                index: U256::from(index),
            })
            .await
    }

    /// Whether the oldest entry has waited long enough that the next batch must include it
    pub async fn is_oldest_due(&self) -> Result<bool, BindingError> {
        self.binding
            .caller()
            .call(&ForcedInclusionStore::isOldestForcedInclusionDueCall {})
            .await
    }

    /// Batch id by which the oldest entry must be included
    pub async fn oldest_deadline(&self) -> Result<U256, BindingError> {
        self.binding
            .caller()
            .call(&ForcedInclusionStore::getOldestForcedInclusionDeadlineCall {})
            .await
    }

    /// The fee to attach to [`Self::store_forced_inclusion`], in wei
    pub async fn fee_wei(&self) -> Result<U256, BindingError> {
        let gwei = self
            .binding
            .caller()
            .call(&ForcedInclusionStore::feeInGweiCall {})
            .await?;

        Ok(U256::from(gwei) * U256::from(GWEI))
    }

    /// Number of batches an entry waits before it's due
    pub async fn inclusion_delay(&self) -> Result<u8, BindingError> {
        self.binding
            .caller()
            .call(&ForcedInclusionStore::inclusionDelayCall {})
            .await
    }

    /// Queues a blob slice of the sending transaction, paying the current fee.
    ///
    /// Needs a binding backed by a signing provider.
    pub async fn store_forced_inclusion(
        &self,
        blob_index: u8,
        blob_byte_offset: u32,
        blob_byte_size: u32,
    ) -> Result<TransactionReceipt, BindingError> {
        let fee = self.fee_wei().await?;

        self.binding
            .transactor()
            .transact_and_confirm(
                &ForcedInclusionStore::storeForcedInclusionCall {
                    blobIndex: blob_index,
                    blobByteOffset: blob_byte_offset,
                    blobByteSize: blob_byte_size,
                },
                TransactOpts::with_value(fee),
            )
            .await
    }

    pub fn stored_inclusions(
        &self,
        opts: FilterOpts,
    ) -> EventIterator<ForcedInclusionStore::ForcedInclusionStored> {
        self.binding.filterer().filter_logs(opts, &TopicFilter::new())
    }

    pub fn consumed_inclusions(
        &self,
        opts: FilterOpts,
    ) -> EventIterator<ForcedInclusionStore::ForcedInclusionConsumed> {
        self.binding.filterer().filter_logs(opts, &TopicFilter::new())
    }

    async fn queue_bounds_at(&self, opts: CallOpts) -> Result<QueueBounds, BindingError> {
        let caller = self.binding.caller();
        let (head, tail) = tokio::try_join!(
            caller.call_with(&ForcedInclusionStore::headCall {}, opts),
            caller.call_with(&ForcedInclusionStore::tailCall {}, opts),
        )?;

        Ok(QueueBounds { head, tail })
    }
}
