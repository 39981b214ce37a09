//! Event delivery between a log producer and its consumer.
//!
//! Producers run as tokio tasks pushing logs into a bounded queue, consumers either pull from an
//! [`EventIterator`], receive pushes through [`forward_events`] (the loop behind every
//! [`WatchHandle`]) or poll an [`EventStream`]. Every producer stops on its
//! [`CancellationToken`](tokio_util::sync::CancellationToken).

mod backfill;
mod decoded;
mod iterator;
mod watch;

pub use backfill::{backfill_logs, DEFAULT_CHUNK_SIZE};
pub use decoded::{decode_event, DecodedEvent};
pub use iterator::EventIterator;
pub use watch::{forward_events, live_logs, EventStream, WatchHandle};

use futures::{Stream, StreamExt};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::error::BindingError;

pub(crate) type LogResult = Result<alloy_rpc_types_eth::Log, BindingError>;

// moves items from a producer stream into the queue until the stream ends, fails,
// the consumer goes away or the token is cancelled
pub(crate) async fn pump<S>(upstream: S, tx: mpsc::Sender<LogResult>, cancel: CancellationToken)
where
    S: Stream<Item = LogResult>,
{
    futures::pin_mut!(upstream);

    loop {
        let item = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            item = upstream.next() => item,
        };

        let Some(item) = item else {
            break;
        };
        let failed = item.is_err();

        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            sent = tx.send(item) => {
                if sent.is_err() || failed {
                    break;
                }
            }
        }
    }
}
