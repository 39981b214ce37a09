use alloy_primitives::{Address, Bytes};
use alloy_rpc_types_eth::TransactionReceipt;
use alloy_transport::TransportError;
use taiko_bindings::AbiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EvmClientError {
    #[error("HD index must be zero when using a private key (use mnemonic instead)")]
    DerivationWithPrivateKey,

    #[error("Unable to parse private key: {0}")]
    PrivateKey(anyhow::Error),

    #[error("Unable to derive key from mnemonic: {0}")]
    Mnemonic(anyhow::Error),

    #[error("Unable to parse endpoint: {0}")]
    ParseEndpoint(String),

    #[error("Unable to create web socket provider: {0:#?}")]
    WebSocketProvider(anyhow::Error),

    #[error("No signing credential configured")]
    MissingCredential,

    #[error("No address configured for {0}")]
    MissingContract(&'static str),
}

/// Failures of the binding layer.
///
/// Transport errors are kept as-is so revert data can still be extracted, see
/// [`BindingError::revert_data`].
#[derive(Debug, Error)]
pub enum BindingError {
    #[error(transparent)]
    Abi(#[from] AbiError),

    #[error("eth_call failed: {0}")]
    Call(#[source] TransportError),

    #[error("Unable to estimate gas: {0}")]
    EstimateGas(#[source] TransportError),

    #[error("Send Transaction Error: {0}")]
    SendTransaction(#[source] TransportError),

    #[error("No Transaction Receipt: {0}")]
    PendingTransaction(#[from] alloy_provider::PendingTransactionError),

    #[error("Transaction reverted: {:?}", .0.transaction_hash)]
    Reverted(Box<TransactionReceipt>),

    #[error("Unable to decode return data of {function}: {source}")]
    DecodeReturn {
        function: &'static str,
        #[source]
        source: alloy_sol_types::Error,
    },

    #[error("Unable to decode log as {event}: {source}")]
    DecodeLog {
        event: &'static str,
        #[source]
        source: alloy_sol_types::Error,
    },

    #[error("Unable to query logs: {0}")]
    Logs(#[source] TransportError),

    #[error("Unable to get block height: {0}")]
    BlockNumber(#[source] TransportError),

    #[error("Unable to subscribe to logs: {0}")]
    Subscribe(#[source] TransportError),

    #[error("Log subscription closed by the node")]
    SubscriptionClosed,

    #[error("Event task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("{contract} at {address} returned the zero address for {what}")]
    ZeroAddress {
        contract: &'static str,
        address: Address,
        what: &'static str,
    },
}

impl BindingError {
    /// The data a reverted call or gas estimation carried, if any
    pub fn revert_data(&self) -> Option<Bytes> {
        match self {
            BindingError::Call(err)
            | BindingError::EstimateGas(err)
            | BindingError::SendTransaction(err) => {
                err.as_error_resp().and_then(|payload| payload.as_revert_data())
            }
            _ => None,
        }
    }
}
