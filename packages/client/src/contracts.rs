//! Typed clients for the contracts off-chain services talk to the most.
//!
//! Each client is a thin layer over a [`ContractBinding`](crate::binding::ContractBinding)
//! that names the calls in domain terms and checks results the contract can't express in
//! its types, like the zero address standing in for "no operator".

mod forced_inclusion_store;
mod fork_router;
mod preconf_router;
mod preconf_whitelist;

pub use forced_inclusion_store::{ForcedInclusionStoreClient, QueueBounds};
pub use fork_router::{ForkRoute, ForkRouterClient};
pub use preconf_router::PreconfRouterClient;
pub use preconf_whitelist::{
    EpochSelector, OperatorChange, OperatorInfo, PreconfWhitelistClient, WhitelistSequencers,
};
