use alloy_primitives::{Address, TxHash};
use alloy_provider::DynProvider;
use alloy_rpc_types_eth::{Filter, Log};
use anyhow::{bail, Result};
use futures::StreamExt;
use serde::Serialize;
use taiko_bindings::{registry::DecodedLog, AbiRegistry, ContractAbi};
use taiko_contracts_client::{binding::WatchOpts, events::live_logs};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WatchedEvent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<TxHash>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub removed: bool,
    #[serde(flatten)]
    pub log: DecodedLog,
}

/// Hands every `event` emitted by `contract` at `address` to `on_event` until `cancel` fires.
///
/// Logs that fail to decode are skipped with a warning, a failing or closed log source ends
/// the watch with an error.
#[allow(clippy::too_many_arguments)]
pub async fn watch(
    provider: DynProvider,
    contract: &'static ContractAbi,
    address: Address,
    event: &str,
    opts: WatchOpts,
    chunk_size: u64,
    cancel: CancellationToken,
    mut on_event: impl FnMut(WatchedEvent),
) -> Result<()> {
    let event = contract.event(event)?;
    let registry = AbiRegistry::from_contracts([contract])?;

    let filter = Filter::new()
        .address(address)
        .event_signature(event.selector());

    tracing::info!(
        "Watching {} on {} at {}",
        event.signature(),
        contract.name(),
        address
    );

    let logs = live_logs(provider, filter, opts, chunk_size);
    futures::pin_mut!(logs);

    loop {
        let log = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Ok(()),
            log = logs.next() => log,
        };

        match log {
            Some(Ok(log)) => match decode(&registry, &log) {
                Ok(watched) => on_event(watched),
                Err(err) => {
                    tracing::warn!("Skipping undecodable log {:?}: {}", log.transaction_hash, err)
                }
            },
            Some(Err(err)) => return Err(err.into()),
            None => bail!("log source for {} closed", event.signature()),
        }
    }
}

fn decode(registry: &AbiRegistry, log: &Log) -> Result<WatchedEvent> {
    let decoded = registry.decode_log(log.topics(), &log.data().data)?;

    Ok(WatchedEvent {
        block_number: log.block_number,
        transaction_hash: log.transaction_hash,
        removed: log.removed,
        log: decoded,
    })
}

#[cfg(test)]
mod test {
    use alloy_primitives::{LogData, B256, U256};

    use super::*;

    #[test]
    fn decodes_watched_log() {
        let abi = &taiko_bindings::pacaya::PRECONF_WHITELIST_ABI;
        let registry = AbiRegistry::from_contracts([abi]).unwrap();
        let event = abi.event("OperatorAdded").unwrap();

        let proposer = Address::repeat_byte(0xaa);
        let sequencer = Address::repeat_byte(0xbb);
        let log = Log {
            inner: alloy_primitives::Log {
                address: Address::repeat_byte(0x01),
                data: LogData::new_unchecked(
                    vec![event.selector(), proposer.into_word(), sequencer.into_word()],
                    B256::from(U256::from(42)).to_vec().into(),
                ),
            },
            block_number: Some(9),
            ..Default::default()
        };

        let watched = decode(&registry, &log).unwrap();

        assert_eq!(watched.block_number, Some(9));
        assert!(!watched.removed);
        assert_eq!(watched.log.name, "OperatorAdded");
        assert_eq!(watched.log.args[0].value, proposer.to_checksum(None));
        assert_eq!(watched.log.args[2].value, "42");
    }
}
