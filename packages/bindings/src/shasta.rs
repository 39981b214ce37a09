//! Bindings for the Shasta fork contracts.
//!
//! Each contract is generated from `abi/shasta/<Name>.json` and paired with a
//! [`ContractDescriptor`](crate::abi::ContractDescriptor) marker.

use alloy_provider::DynProvider;

use crate::abi::{descriptor, ContractAbi, Fork};

/// `Anchor.sol` L2 contract bindings, the anchor contract
///
/// Ref: <https://github.com/taikoxyz/taiko-mono/blob/main/packages/protocol/contracts/layer2/core/Anchor.sol>
pub mod anchor {
    alloy_sol_macro::sol!(
        #[allow(missing_docs)]
        #[sol(rpc)]
        #[derive(Debug, PartialEq, Eq)]
        Anchor,
        "abi/shasta/Anchor.json"
    );
}

/// `BondManager.sol` L2 contract bindings, the bond manager
///
/// Ref: <https://github.com/taikoxyz/taiko-mono/blob/main/packages/protocol/contracts/layer2/core/BondManager.sol>
pub mod bond_manager {
    alloy_sol_macro::sol!(
        #[allow(missing_docs)]
        #[sol(rpc)]
        #[derive(Debug, PartialEq, Eq)]
        BondManager,
        "abi/shasta/BondManager.json"
    );
}

/// `CodecOptimized.sol` L1 contract bindings, the inbox payload codec
///
/// Ref: <https://github.com/taikoxyz/taiko-mono/blob/main/packages/protocol/contracts/layer1/core/impl/CodecOptimized.sol>
pub mod codec_optimized {
    alloy_sol_macro::sol!(
        #[allow(missing_docs)]
        #[sol(rpc)]
        #[derive(Debug, PartialEq, Eq)]
        CodecOptimized,
        "abi/shasta/CodecOptimized.json"
    );
}

/// `ComposeVerifier.sol` L1 contract bindings, the verifier that composes several sub-verifiers
///
/// Ref: <https://github.com/taikoxyz/taiko-mono/blob/main/packages/protocol/contracts/layer1/verifiers/compose/ComposeVerifier.sol>
pub mod compose_verifier {
    alloy_sol_macro::sol!(
        #[allow(missing_docs)]
        #[sol(rpc)]
        #[derive(Debug, PartialEq, Eq)]
        ComposeVerifier,
        "abi/shasta/ComposeVerifier.json"
    );
}

/// `Inbox.sol` L1 contract bindings, the inbox
///
/// Ref: <https://github.com/taikoxyz/taiko-mono/blob/main/packages/protocol/contracts/layer1/core/impl/Inbox.sol>
pub mod inbox {
    alloy_sol_macro::sol!(
        #[allow(missing_docs)]
        #[sol(rpc)]
        #[derive(Debug, PartialEq, Eq)]
        Inbox,
        "abi/shasta/Inbox.json"
    );
}

/// `InboxHelper.sol` L1 contract bindings, the inbox read helper
///
/// Ref: <https://github.com/taikoxyz/taiko-mono/blob/main/packages/protocol/contracts/layer1/core/impl/InboxHelper.sol>
pub mod inbox_helper {
    alloy_sol_macro::sol!(
        #[allow(missing_docs)]
        #[sol(rpc)]
        #[derive(Debug, PartialEq, Eq)]
        InboxHelper,
        "abi/shasta/InboxHelper.json"
    );
}

pub use self::{
    anchor::Anchor,
    bond_manager::BondManager,
    codec_optimized::CodecOptimized,
    compose_verifier::ComposeVerifier,
    inbox::Inbox,
    inbox_helper::InboxHelper,
};

descriptor!(
    AnchorContract,
    ANCHOR_ABI,
    "Anchor",
    Fork::Shasta,
    "abi/shasta/Anchor.json",
    Anchor::AnchorErrors
);

descriptor!(
    BondManagerContract,
    BOND_MANAGER_ABI,
    "BondManager",
    Fork::Shasta,
    "abi/shasta/BondManager.json",
    BondManager::BondManagerErrors
);

descriptor!(
    CodecOptimizedContract,
    CODEC_OPTIMIZED_ABI,
    "CodecOptimized",
    Fork::Shasta,
    "abi/shasta/CodecOptimized.json",
    CodecOptimized::CodecOptimizedErrors
);

descriptor!(
    ComposeVerifierContract,
    COMPOSE_VERIFIER_ABI,
    "ComposeVerifier",
    Fork::Shasta,
    "abi/shasta/ComposeVerifier.json",
    ComposeVerifier::ComposeVerifierErrors
);

descriptor!(
    InboxContract,
    INBOX_ABI,
    "Inbox",
    Fork::Shasta,
    "abi/shasta/Inbox.json",
    Inbox::InboxErrors
);

descriptor!(
    InboxHelperContract,
    INBOX_HELPER_ABI,
    "InboxHelper",
    Fork::Shasta,
    "abi/shasta/InboxHelper.json",
    InboxHelper::InboxHelperErrors
);

/// Every contract of this fork, in alphabetical order
pub static ALL: &[&ContractAbi] = &[
    &ANCHOR_ABI,
    &BOND_MANAGER_ABI,
    &CODEC_OPTIMIZED_ABI,
    &COMPOSE_VERIFIER_ABI,
    &INBOX_ABI,
    &INBOX_HELPER_ABI,
];

pub type InboxT = Inbox::InboxInstance<DynProvider>;

pub type AnchorT = Anchor::AnchorInstance<DynProvider>;

pub type BondManagerT = BondManager::BondManagerInstance<DynProvider>;
