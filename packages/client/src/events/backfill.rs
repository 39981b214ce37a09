use alloy_provider::Provider;
use alloy_rpc_types_eth::Filter;
use futures::Stream;

use super::LogResult;
use crate::error::BindingError;

/// Chunk size to avoid provider limits on `eth_getLogs` ranges
pub const DEFAULT_CHUNK_SIZE: u64 = 2_000;

/// Streams the logs matching `filter` over `[start, end]`, in block order.
///
/// An open `end` is resolved to the latest block once, when the stream starts. The range is
/// queried in chunks of `chunk_size` blocks; the first failing query ends the stream with its
/// error.
pub fn backfill_logs<P>(
    provider: P,
    filter: Filter,
    start: u64,
    end: Option<u64>,
    chunk_size: u64,
) -> impl Stream<Item = LogResult> + Send + 'static
where
    P: Provider + Clone + 'static,
{
    let chunk_size = chunk_size.max(1);

    async_stream::try_stream! {
        // snapshot latest at start
        let range_end = match end {
            Some(end) => end,
            None => provider
                .get_block_number()
                .await
                .map_err(BindingError::BlockNumber)?,
        };

        let mut chunk_start = start;
        while chunk_start <= range_end {
            let chunk_end = chunk_start
                .saturating_add(chunk_size - 1)
                .min(range_end);
            let chunk_filter = filter.clone().from_block(chunk_start).to_block(chunk_end);

            tracing::debug!("Querying logs in blocks [{}..={}]", chunk_start, chunk_end);
            let logs = provider
                .get_logs(&chunk_filter)
                .await
                .map_err(BindingError::Logs)?;

            for log in logs {
                yield log;
            }

            if chunk_end == u64::MAX {
                break;
            }
            chunk_start = chunk_end + 1;
        }
    }
}
