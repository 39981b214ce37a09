//! Typed bindings and ABI data for the Taiko protocol contracts.
//!
//! The ABI of every contract is shipped as JSON under `abi/<fork>/`, and is both compiled into
//! typed `sol!` bindings ([`pacaya`], [`shasta`]) and available at runtime through
//! [`ContractAbi`] and [`AbiRegistry`] for tooling that only knows contracts by name.

// must come first, the fork modules use its macro
pub mod abi;
pub mod dynamic;
pub mod error;
pub mod pacaya;
pub mod registry;
pub mod shasta;

pub use abi::{ContractAbi, ContractDescriptor, Fork};
pub use error::AbiError;
pub use registry::AbiRegistry;

/// Every contract of every fork
pub fn all_contracts() -> impl Iterator<Item = &'static ContractAbi> {
    pacaya::ALL.iter().chain(shasta::ALL.iter()).copied()
}
