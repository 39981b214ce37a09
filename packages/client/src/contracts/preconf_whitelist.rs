use alloy_primitives::{Address, U256};
use alloy_provider::{DynProvider, Provider};
use alloy_rpc_types_eth::BlockId;
use futures::{stream, Stream, StreamExt};
use serde::Serialize;
use taiko_bindings::pacaya::{PreconfWhitelist, PreconfWhitelistContract};
use tokio_util::sync::CancellationToken;

use crate::{
    binding::{CallOpts, ContractBinding, TopicFilter, WatchOpts},
    error::BindingError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EpochSelector {
    Current,
    Next,
}

/// Registration of a whitelisted proposer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OperatorInfo {
    pub active_since: u32,
    /// Zero while the operator is active
    pub inactive_since: u32,
    pub index: u8,
    pub sequencer: Address,
}

impl From<PreconfWhitelist::operatorsReturn> for OperatorInfo {
    fn from(ret: PreconfWhitelist::operatorsReturn) -> Self {
        Self {
            active_since: ret.activeSince,
            inactive_since: ret.inactiveSince,
            index: ret.index,
            sequencer: ret.sequencerAddress,
        }
    }
}

/// The sequencers allowed to preconfirm now and in the next epoch, read at one block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WhitelistSequencers {
    pub current: Address,
    pub next: Address,
}

impl WhitelistSequencers {
    pub fn contains(&self, sequencer: Address) -> bool {
        self.current == sequencer || self.next == sequencer
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperatorChange {
    Added {
        proposer: Address,
        sequencer: Address,
        active_since: U256,
        block_number: Option<u64>,
    },
    Removed {
        proposer: Address,
        sequencer: Address,
        inactive_since: U256,
        block_number: Option<u64>,
    },
}

#[derive(Debug, Clone)]
pub struct PreconfWhitelistClient<P = DynProvider> {
    binding: ContractBinding<PreconfWhitelistContract, P>,
}

impl<P: Provider + Clone + 'static> PreconfWhitelistClient<P> {
    pub fn new(address: Address, provider: P) -> Self {
        Self::from_binding(ContractBinding::new(address, provider))
    }

    pub fn from_binding(binding: ContractBinding<PreconfWhitelistContract, P>) -> Self {
        Self { binding }
    }

    pub fn binding(&self) -> &ContractBinding<PreconfWhitelistContract, P> {
        &self.binding
    }

    pub async fn operator_for_current_epoch(&self) -> Result<Address, BindingError> {
        self.operator(EpochSelector::Current, CallOpts::default()).await
    }

    pub async fn operator_for_next_epoch(&self) -> Result<Address, BindingError> {
        self.operator(EpochSelector::Next, CallOpts::default()).await
    }

    pub async fn operator_info(&self, proposer: Address) -> Result<OperatorInfo, BindingError> {
        self.operator_info_with(proposer, CallOpts::default()).await
    }

    /// The sequencer of the current epoch's operator, which must be set
    pub async fn sequencer_for_current_epoch(&self) -> Result<Address, BindingError> {
        self.sequencer(EpochSelector::Current, CallOpts::default()).await
    }

    pub async fn sequencer_for_next_epoch(&self) -> Result<Address, BindingError> {
        self.sequencer(EpochSelector::Next, CallOpts::default()).await
    }

    /// Current and next sequencers, both read at the same block (latest if unset)
    pub async fn sequencers(
        &self,
        block: Option<BlockId>,
    ) -> Result<WhitelistSequencers, BindingError> {
        let block = match block {
            Some(block) => block,
            None => self
                .binding
                .provider()
                .get_block_number()
                .await
                .map_err(BindingError::BlockNumber)?
                .into(),
        };
        let opts = CallOpts::at_block(block);

        let (current, next) = tokio::try_join!(
            self.sequencer(EpochSelector::Current, opts),
            self.sequencer(EpochSelector::Next, opts),
        )?;

        Ok(WhitelistSequencers { current, next })
    }

    /// Proposers eligible to be picked as operator for the epoch
    pub async fn operator_candidates(
        &self,
        epoch: EpochSelector,
    ) -> Result<Vec<Address>, BindingError> {
        let caller = self.binding.caller();
        match epoch {
            EpochSelector::Current => {
                caller
                    .call(&PreconfWhitelist::getOperatorCandidatesForCurrentEpochCall {})
                    .await
            }
            EpochSelector::Next => {
                caller
                    .call(&PreconfWhitelist::getOperatorCandidatesForNextEpochCall {})
                    .await
            }
        }
    }

    pub async fn operator_count(&self) -> Result<u8, BindingError> {
        self.binding
            .caller()
            .call(&PreconfWhitelist::operatorCountCall {})
            .await
    }

    /// Additions and removals of operators, interleaved as the node delivers them.
    ///
    /// Ends right after the first failure of either underlying watch, which stops both. Also
    /// ends when `cancel` fires.
    pub fn watch_operator_changes(
        &self,
        opts: WatchOpts,
        cancel: CancellationToken,
    ) -> impl Stream<Item = Result<OperatorChange, BindingError>> + Send + 'static {
        let filterer = self.binding.filterer();
        let topics = TopicFilter::new();
        let stop = cancel.child_token();

        let added = filterer
            .subscribe::<PreconfWhitelist::OperatorAdded>(opts, &topics, stop.clone())
            .map(|event| {
                event.map(|added| OperatorChange::Added {
                    proposer: added.event.proposer,
                    sequencer: added.event.sequencer,
                    active_since: added.event.activeSince,
                    block_number: added.block_number(),
                })
            });
        let removed = filterer
            .subscribe::<PreconfWhitelist::OperatorRemoved>(opts, &topics, stop.clone())
            .map(|event| {
                event.map(|removed| OperatorChange::Removed {
                    proposer: removed.event.proposer,
                    sequencer: removed.event.sequencer,
                    inactive_since: removed.event.inactiveSince,
                    block_number: removed.block_number(),
                })
            });

        let on_error = stop.clone();
        stream::select(added, removed)
            .inspect(move |change| {
                if change.is_err() {
                    on_error.cancel();
                }
            })
            .take_until(stop.cancelled_owned())
    }

    async fn operator(
        &self,
        epoch: EpochSelector,
        opts: CallOpts,
    ) -> Result<Address, BindingError> {
        let caller = self.binding.caller();
        match epoch {
            EpochSelector::Current => {
                caller
                    .call_with(&PreconfWhitelist::getOperatorForCurrentEpochCall {}, opts)
                    .await
            }
            EpochSelector::Next => {
                caller
                    .call_with(&PreconfWhitelist::getOperatorForNextEpochCall {}, opts)
                    .await
            }
        }
    }

    async fn operator_info_with(
        &self,
        proposer: Address,
        opts: CallOpts,
    ) -> Result<OperatorInfo, BindingError> {
        self.binding
            .caller()
            .call_with(&PreconfWhitelist::operatorsCall { proposer }, opts)
            .await
            .map(OperatorInfo::from)
    }

    async fn sequencer(
        &self,
        epoch: EpochSelector,
        opts: CallOpts,
    ) -> Result<Address, BindingError> {
        let proposer = self.operator(epoch, opts).await?;
        let sequencer = self.operator_info_with(proposer, opts).await?.sequencer;

        if sequencer == Address::ZERO {
            return Err(BindingError::ZeroAddress {
                contract: "PreconfWhitelist",
                address: self.binding.address(),
                what: match epoch {
                    EpochSelector::Current => "current epoch sequencer",
                    EpochSelector::Next => "next epoch sequencer",
                },
            });
        }

        Ok(sequencer)
    }
}
