#![allow(clippy::uninlined_format_args)]
//! Clients over the Taiko protocol contract bindings.
//!
//! [`binding::ContractBinding`] gives typed calls, transactions and event streams for any
//! contract in `taiko-bindings`, [`contracts`] wraps the ones off-chain services use the most
//! and [`evm_client`] builds providers from endpoints and credentials.

pub mod binding;
pub mod config;
pub mod contracts;
pub mod credential;
pub mod error;
pub mod events;
pub mod evm_client;
pub mod serde;

// the test version of init_tracing does not take a config
// since config itself is tested and modified from different parallel tests
#[cfg(debug_assertions)]
pub fn init_tracing_tests() {
    use std::sync::LazyLock;

    // tests run on many threads, only the first one may install the subscriber
    static INIT: LazyLock<std::sync::Mutex<bool>> = LazyLock::new(|| std::sync::Mutex::new(false));

    let mut init = match INIT.lock() {
        Ok(init) => init,
        Err(poisoned) => poisoned.into_inner(),
    };

    if !*init {
        *init = true;

        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .init();
        tracing::debug!("Tracing initialized for tests");
    }
}
