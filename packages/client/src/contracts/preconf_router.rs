use alloy_primitives::{Address, U256};
use alloy_provider::{DynProvider, Provider};
use taiko_bindings::pacaya::{PreconfRouter, PreconfRouterContract};

use crate::{binding::ContractBinding, error::BindingError};

#[derive(Debug, Clone)]
pub struct PreconfRouterClient<P = DynProvider> {
    binding: ContractBinding<PreconfRouterContract, P>,
}

impl<P: Provider + Clone + 'static> PreconfRouterClient<P> {
    pub fn new(address: Address, provider: P) -> Self {
        Self::from_binding(ContractBinding::new(address, provider))
    }

    pub fn from_binding(binding: ContractBinding<PreconfRouterContract, P>) -> Self {
        Self { binding }
    }

    pub fn binding(&self) -> &ContractBinding<PreconfRouterContract, P> {
        &self.binding
    }

    /// Proposer allowed when no whitelisted operator is active, zero if unset
    pub async fn fallback_preconfer(&self) -> Result<Address, BindingError> {
        self.binding
            .caller()
            .call(&PreconfRouter::fallbackPreconferCall {})
            .await
    }

    pub async fn whitelist(&self) -> Result<Address, BindingError> {
        self.binding
            .caller()
            .call(&PreconfRouter::preconfWhitelistCall {})
            .await
    }

    /// Slots at the end of an epoch during which the next operator may already propose
    pub async fn hand_over_slots(&self) -> Result<U256, BindingError> {
        self.binding
            .caller()
            .call(&PreconfRouter::getConfigCall {})
            .await
            .map(|config| config.handOverSlots)
    }
}
