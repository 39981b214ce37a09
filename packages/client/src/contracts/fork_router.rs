use alloy_primitives::{Address, Selector};
use alloy_provider::{DynProvider, Provider};
use serde::Serialize;
use taiko_bindings::pacaya::{ForkRouter, ForkRouterContract};

use crate::{binding::ContractBinding, error::BindingError};

/// Where the router forwards a call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "fork", content = "address", rename_all = "lowercase")]
pub enum ForkRoute {
    Old(Address),
    New(Address),
}

impl ForkRoute {
    pub fn address(&self) -> Address {
        match self {
            ForkRoute::Old(address) | ForkRoute::New(address) => *address,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ForkRouterClient<P = DynProvider> {
    binding: ContractBinding<ForkRouterContract, P>,
}

impl<P: Provider + Clone + 'static> ForkRouterClient<P> {
    pub fn new(address: Address, provider: P) -> Self {
        Self::from_binding(ContractBinding::new(address, provider))
    }

    pub fn from_binding(binding: ContractBinding<ForkRouterContract, P>) -> Self {
        Self { binding }
    }

    pub fn binding(&self) -> &ContractBinding<ForkRouterContract, P> {
        &self.binding
    }

    /// `(old, new)` fork implementations
    pub async fn forks(&self) -> Result<(Address, Address), BindingError> {
        let caller = self.binding.caller();

        tokio::try_join!(
            caller.call(&ForkRouter::oldForkCall {}),
            caller.call(&ForkRouter::newForkCall {}),
        )
    }

    /// The implementation a call with `selector` ends up at
    pub async fn route_for(&self, selector: Selector) -> Result<ForkRoute, BindingError> {
        let caller = self.binding.caller();
        let to_old = caller
            .call(&ForkRouter::shouldRouteToOldForkCall(selector))
            .await?;

        match to_old {
            true => caller.call(&ForkRouter::oldForkCall {}).await.map(ForkRoute::Old),
            false => caller.call(&ForkRouter::newForkCall {}).await.map(ForkRoute::New),
        }
    }
}
