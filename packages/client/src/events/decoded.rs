use alloy_primitives::{BlockNumber, TxHash};
use alloy_rpc_types_eth::Log;
use alloy_sol_types::SolEvent;

use crate::error::BindingError;

/// A typed event together with the raw log it was decoded from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedEvent<E> {
    pub event: E,
    pub raw: Log,
}

impl<E> DecodedEvent<E> {
    pub fn block_number(&self) -> Option<BlockNumber> {
        self.raw.block_number
    }

    pub fn transaction_hash(&self) -> Option<TxHash> {
        self.raw.transaction_hash
    }

    /// Set on logs the node retracted because of a reorg
    pub fn removed(&self) -> bool {
        self.raw.removed
    }
}

pub fn decode_event<E: SolEvent>(log: Log) -> Result<DecodedEvent<E>, BindingError> {
    let decoded = E::decode_log(&log.inner).map_err(|source| BindingError::DecodeLog {
        event: E::SIGNATURE,
        source,
    })?;

    Ok(DecodedEvent {
        event: decoded.data,
        raw: log,
    })
}
