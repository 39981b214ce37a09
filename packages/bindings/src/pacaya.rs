//! Bindings for the Pacaya fork contracts.
//!
//! Each contract is generated from `abi/pacaya/<Name>.json` and paired with a
//! [`ContractDescriptor`](crate::abi::ContractDescriptor) marker.

use alloy_provider::DynProvider;

use crate::abi::{descriptor, ContractAbi, Fork};

/// `ComposeVerifier.sol` L1 contract bindings, the verifier that composes several sub-verifiers
///
/// Ref: <https://github.com/taikoxyz/taiko-mono/blob/main/packages/protocol/contracts/layer1/verifiers/compose/ComposeVerifier.sol>
pub mod compose_verifier {
    alloy_sol_macro::sol!(
        #[allow(missing_docs)]
        #[sol(rpc)]
        #[derive(Debug, PartialEq, Eq)]
        ComposeVerifier,
        "abi/pacaya/ComposeVerifier.json"
    );
}

/// `ForcedInclusionStore.sol` L1 contract bindings, the queue of forced inclusion requests
///
/// Ref: <https://github.com/taikoxyz/taiko-mono/blob/main/packages/protocol/contracts/layer1/forced-inclusion/ForcedInclusionStore.sol>
pub mod forced_inclusion_store {
    alloy_sol_macro::sol!(
        #[allow(missing_docs)]
        #[sol(rpc)]
        #[derive(Debug, PartialEq, Eq)]
        ForcedInclusionStore,
        "abi/pacaya/ForcedInclusionStore.json"
    );
}

/// `ForkRouter.sol` L1 contract bindings, the router dispatching calls to the old or new fork
///
/// Ref: <https://github.com/taikoxyz/taiko-mono/blob/main/packages/protocol/contracts/layer1/fork-router/ForkRouter.sol>
pub mod fork_router {
    alloy_sol_macro::sol!(
        #[allow(missing_docs)]
        #[sol(rpc)]
        #[derive(Debug, PartialEq, Eq)]
        ForkRouter,
        "abi/pacaya/ForkRouter.json"
    );
}

/// `PreconfRouter.sol` L1 contract bindings, the entrypoint restricting batch proposals to the
/// current preconfer
///
/// Ref: <https://github.com/taikoxyz/taiko-mono/blob/main/packages/protocol/contracts/layer1/preconf/impl/PreconfRouter.sol>
pub mod preconf_router {
    alloy_sol_macro::sol!(
        #[allow(missing_docs)]
        #[sol(rpc)]
        #[derive(Debug, PartialEq, Eq)]
        PreconfRouter,
        "abi/pacaya/PreconfRouter.json"
    );
}

/// `PreconfWhitelist.sol` L1 contract bindings, the registry of whitelisted preconfirmation
/// operators
///
/// Ref: <https://github.com/taikoxyz/taiko-mono/blob/main/packages/protocol/contracts/layer1/preconf/impl/PreconfWhitelist.sol>
pub mod preconf_whitelist {
    alloy_sol_macro::sol!(
        #[allow(missing_docs)]
        #[sol(rpc)]
        #[derive(Debug, PartialEq, Eq)]
        PreconfWhitelist,
        "abi/pacaya/PreconfWhitelist.json"
    );
}

/// `ResolverBase.sol` shared address resolver bindings
///
/// Ref: <https://github.com/taikoxyz/taiko-mono/blob/main/packages/protocol/contracts/shared/common/ResolverBase.sol>
pub mod resolver_base {
    alloy_sol_macro::sol!(
        #[allow(missing_docs)]
        #[sol(rpc)]
        #[derive(Debug, PartialEq, Eq)]
        ResolverBase,
        "abi/pacaya/ResolverBase.json"
    );
}

/// `SurgeProposerWrapper.sol` L1 contract bindings, the proposer wrapper used by Surge deployments
pub mod surge_proposer_wrapper {
    alloy_sol_macro::sol!(
        #[allow(missing_docs)]
        #[sol(rpc)]
        #[derive(Debug, PartialEq, Eq)]
        SurgeProposerWrapper,
        "abi/pacaya/SurgeProposerWrapper.json"
    );
}

/// `SurgeVerifier.sol` L1 contract bindings, the verifier used by Surge deployments
pub mod surge_verifier {
    alloy_sol_macro::sol!(
        #[allow(missing_docs)]
        #[sol(rpc)]
        #[derive(Debug, PartialEq, Eq)]
        SurgeVerifier,
        "abi/pacaya/SurgeVerifier.json"
    );
}

/// `TaikoAnchor.sol` L2 contract bindings, the anchor contract
///
/// Ref: <https://github.com/taikoxyz/taiko-mono/blob/main/packages/protocol/contracts/layer2/based/TaikoAnchor.sol>
pub mod taiko_anchor {
    alloy_sol_macro::sol!(
        #[allow(missing_docs)]
        #[sol(rpc)]
        #[derive(Debug, PartialEq, Eq)]
        TaikoAnchor,
        "abi/pacaya/TaikoAnchor.json"
    );
}

/// `TaikoInbox.sol` L1 contract bindings, the inbox
///
/// Ref: <https://github.com/taikoxyz/taiko-mono/blob/main/packages/protocol/contracts/layer1/based/TaikoInbox.sol>
pub mod taiko_inbox {
    alloy_sol_macro::sol!(
        #[allow(missing_docs)]
        #[sol(rpc)]
        #[derive(Debug, PartialEq, Eq)]
        TaikoInbox,
        "abi/pacaya/TaikoInbox.json"
    );
}

/// `TaikoWrapper.sol` L1 contract bindings, the wrapper enforcing forced inclusions
///
/// Ref: <https://github.com/taikoxyz/taiko-mono/blob/main/packages/protocol/contracts/layer1/forced-inclusion/TaikoWrapper.sol>
pub mod taiko_wrapper {
    alloy_sol_macro::sol!(
        #[allow(missing_docs)]
        #[sol(rpc)]
        #[derive(Debug, PartialEq, Eq)]
        TaikoWrapper,
        "abi/pacaya/TaikoWrapper.json"
    );
}

pub use self::{
    compose_verifier::ComposeVerifier,
    forced_inclusion_store::ForcedInclusionStore,
    fork_router::ForkRouter,
    preconf_router::PreconfRouter,
    preconf_whitelist::PreconfWhitelist,
    resolver_base::ResolverBase,
    surge_proposer_wrapper::SurgeProposerWrapper,
    surge_verifier::SurgeVerifier,
    taiko_anchor::TaikoAnchor,
    taiko_inbox::TaikoInbox,
    taiko_wrapper::TaikoWrapper,
};

descriptor!(
    ComposeVerifierContract,
    COMPOSE_VERIFIER_ABI,
    "ComposeVerifier",
    Fork::Pacaya,
    "abi/pacaya/ComposeVerifier.json",
    ComposeVerifier::ComposeVerifierErrors
);

descriptor!(
    ForcedInclusionStoreContract,
    FORCED_INCLUSION_STORE_ABI,
    "ForcedInclusionStore",
    Fork::Pacaya,
    "abi/pacaya/ForcedInclusionStore.json",
    ForcedInclusionStore::ForcedInclusionStoreErrors
);

descriptor!(
    ForkRouterContract,
    FORK_ROUTER_ABI,
    "ForkRouter",
    Fork::Pacaya,
    "abi/pacaya/ForkRouter.json",
    ForkRouter::ForkRouterErrors
);

descriptor!(
    PreconfRouterContract,
    PRECONF_ROUTER_ABI,
    "PreconfRouter",
    Fork::Pacaya,
    "abi/pacaya/PreconfRouter.json",
    PreconfRouter::PreconfRouterErrors
);

descriptor!(
    PreconfWhitelistContract,
    PRECONF_WHITELIST_ABI,
    "PreconfWhitelist",
    Fork::Pacaya,
    "abi/pacaya/PreconfWhitelist.json",
    PreconfWhitelist::PreconfWhitelistErrors
);

descriptor!(
    ResolverBaseContract,
    RESOLVER_BASE_ABI,
    "ResolverBase",
    Fork::Pacaya,
    "abi/pacaya/ResolverBase.json",
    ResolverBase::ResolverBaseErrors
);

descriptor!(
    SurgeProposerWrapperContract,
    SURGE_PROPOSER_WRAPPER_ABI,
    "SurgeProposerWrapper",
    Fork::Pacaya,
    "abi/pacaya/SurgeProposerWrapper.json",
    SurgeProposerWrapper::SurgeProposerWrapperErrors
);

descriptor!(
    SurgeVerifierContract,
    SURGE_VERIFIER_ABI,
    "SurgeVerifier",
    Fork::Pacaya,
    "abi/pacaya/SurgeVerifier.json",
    SurgeVerifier::SurgeVerifierErrors
);

descriptor!(
    TaikoAnchorContract,
    TAIKO_ANCHOR_ABI,
    "TaikoAnchor",
    Fork::Pacaya,
    "abi/pacaya/TaikoAnchor.json",
    TaikoAnchor::TaikoAnchorErrors
);

descriptor!(
    TaikoInboxContract,
    TAIKO_INBOX_ABI,
    "TaikoInbox",
    Fork::Pacaya,
    "abi/pacaya/TaikoInbox.json",
    TaikoInbox::TaikoInboxErrors
);

descriptor!(
    TaikoWrapperContract,
    TAIKO_WRAPPER_ABI,
    "TaikoWrapper",
    Fork::Pacaya,
    "abi/pacaya/TaikoWrapper.json",
    TaikoWrapper::TaikoWrapperErrors
);

/// Every contract of this fork, in alphabetical order
pub static ALL: &[&ContractAbi] = &[
    &COMPOSE_VERIFIER_ABI,
    &FORCED_INCLUSION_STORE_ABI,
    &FORK_ROUTER_ABI,
    &PRECONF_ROUTER_ABI,
    &PRECONF_WHITELIST_ABI,
    &RESOLVER_BASE_ABI,
    &SURGE_PROPOSER_WRAPPER_ABI,
    &SURGE_VERIFIER_ABI,
    &TAIKO_ANCHOR_ABI,
    &TAIKO_INBOX_ABI,
    &TAIKO_WRAPPER_ABI,
];

pub type ForcedInclusionStoreT = ForcedInclusionStore::ForcedInclusionStoreInstance<DynProvider>;

pub type ForkRouterT = ForkRouter::ForkRouterInstance<DynProvider>;

pub type PreconfRouterT = PreconfRouter::PreconfRouterInstance<DynProvider>;

pub type PreconfWhitelistT = PreconfWhitelist::PreconfWhitelistInstance<DynProvider>;

pub type TaikoInboxT = TaikoInbox::TaikoInboxInstance<DynProvider>;

pub type TaikoWrapperT = TaikoWrapper::TaikoWrapperInstance<DynProvider>;

// the struct shared by the store and the wrapper, as seen from the store
pub use forced_inclusion_store::IForcedInclusionStore::ForcedInclusion;
