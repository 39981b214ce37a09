//! One generic binding for every contract.
//!
//! A [`ContractBinding`] pairs a deployed address with a [`ContractDescriptor`] and exposes
//! three facets over it: [`Caller`] for read-only calls, [`Transactor`] for state-changing
//! transactions and [`Filterer`] for past and live events. The facets take the `sol!`
//! generated call and event types, so requests and responses stay fully typed.

mod caller;
mod filterer;
mod transactor;

use std::marker::PhantomData;

use alloy_primitives::Address;
use alloy_provider::{DynProvider, Provider};
use alloy_sol_types::SolInterface;
use taiko_bindings::{ContractAbi, ContractDescriptor};

use crate::error::BindingError;

pub use caller::{CallOpts, Caller};
pub use filterer::{FilterOpts, Filterer, TopicFilter, WatchOpts};
pub use transactor::{TransactOpts, Transactor, MAX_GAS_LIMIT};

/// Tuning knobs shared by every facet of a binding
#[derive(Debug, Clone, PartialEq)]
pub struct BindingSettings {
    /// Capacity of the queue between an event producer and its consumer
    pub event_buffer: usize,
    /// Number of blocks per `eth_getLogs` request when filtering past events
    pub backfill_chunk_size: u64,
    /// Padding applied to gas estimates
    pub gas_estimate_multiplier: f32,
}

impl Default for BindingSettings {
    fn default() -> Self {
        Self {
            event_buffer: 1024,
            backfill_chunk_size: crate::events::DEFAULT_CHUNK_SIZE,
            gas_estimate_multiplier: 1.25,
        }
    }
}

pub struct ContractBinding<D, P = DynProvider> {
    address: Address,
    provider: P,
    settings: BindingSettings,
    _descriptor: PhantomData<fn() -> D>,
}

impl<D, P: Clone> Clone for ContractBinding<D, P> {
    fn clone(&self) -> Self {
        Self {
            address: self.address,
            provider: self.provider.clone(),
            settings: self.settings.clone(),
            _descriptor: PhantomData,
        }
    }
}

impl<D: ContractDescriptor, P> std::fmt::Debug for ContractBinding<D, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContractBinding")
            .field("contract", &D::name())
            .field("fork", &D::fork())
            .field("address", &self.address)
            .finish()
    }
}

impl<D, P> ContractBinding<D, P>
where
    D: ContractDescriptor,
    P: Provider + Clone + 'static,
{
    pub fn new(address: Address, provider: P) -> Self {
        Self {
            address,
            provider,
            settings: BindingSettings::default(),
            _descriptor: PhantomData,
        }
    }

    pub fn with_settings(mut self, settings: BindingSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn settings(&self) -> &BindingSettings {
        &self.settings
    }

    pub fn abi(&self) -> &'static ContractAbi {
        D::abi()
    }

    pub fn caller(&self) -> Caller<'_, D, P> {
        Caller::new(self)
    }

    pub fn transactor(&self) -> Transactor<'_, D, P> {
        Transactor::new(self)
    }

    pub fn filterer(&self) -> Filterer<'_, D, P> {
        Filterer::new(self)
    }

    /// Decodes the revert data carried by `err` into one of the contract's custom errors.
    ///
    /// Returns `None` when the error carries no revert data, or data the contract doesn't declare.
    pub fn decode_error(err: &BindingError) -> Option<D::Errors> {
        let data = err.revert_data()?;
        <D::Errors as SolInterface>::abi_decode(&data).ok()
    }
}
