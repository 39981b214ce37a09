//! The work behind each subcommand, returning plain data for [`crate::display`] to print.

pub mod abi;
pub mod call;
pub mod protocol;
pub mod watch;

use anyhow::{Context, Result};
use taiko_bindings::{AbiRegistry, Fork};

/// The registry of one fork, or of every fork when unset
pub fn registry(fork: Option<Fork>) -> Result<AbiRegistry> {
    let registry = match fork {
        Some(fork) => AbiRegistry::for_fork(fork)?,
        None => AbiRegistry::load()?,
    };

    Ok(registry)
}

/// Accepts hex with or without `0x`, surrounding whitespace ignored
pub fn parse_hex(data: &str) -> Result<Vec<u8>> {
    const_hex::decode(data.trim()).with_context(|| format!("invalid hex: {data}"))
}
