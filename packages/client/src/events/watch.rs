use std::{
    future::Future,
    marker::PhantomData,
    pin::Pin,
    task::{ready, Context, Poll},
};

use alloy_provider::Provider;
use alloy_rpc_types_eth::{Filter, Log};
use alloy_sol_types::SolEvent;
use futures::{Stream, StreamExt};
use tokio::{sync::mpsc, task::JoinHandle};
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;

use super::{backfill_logs, decode_event, DecodedEvent, LogResult};
use crate::{binding::WatchOpts, error::BindingError};

/// The logs matching `filter` as they are produced, optionally preceded by the past logs
/// from `opts.start`.
///
/// Live logs come from an `eth_subscribe` subscription, or from polling an `eth_newFilter`
/// filter when `opts.poll_interval` is set. The live source is opened before the latest block
/// is read for the backfill, so every block is covered by one or the other; live logs at or
/// below that block are skipped. The stream ends when the node closes the live source.
pub fn live_logs<P>(
    provider: P,
    filter: Filter,
    opts: WatchOpts,
    chunk_size: u64,
) -> impl Stream<Item = LogResult> + Send + 'static
where
    P: Provider + Clone + 'static,
{
    async_stream::try_stream! {
        let mut live: Pin<Box<dyn Stream<Item = Vec<Log>> + Send>> = match opts.poll_interval {
            Some(interval) => {
                let poller = provider
                    .watch_logs(&filter)
                    .await
                    .map_err(BindingError::Subscribe)?;
                tracing::info!("Polling logs every {:?} with filter: {:?}", interval, filter);
                Box::pin(poller.with_poll_interval(interval).into_stream())
            }
            None => {
                let sub = provider
                    .subscribe_logs(&filter)
                    .await
                    .map_err(BindingError::Subscribe)?;
                tracing::info!("Subscribed to logs with filter: {:?}", filter);
                Box::pin(sub.into_stream().map(|log| vec![log]))
            }
        };

        let mut backfill_end = None;
        if let Some(start) = opts.start {
            let end = provider
                .get_block_number()
                .await
                .map_err(BindingError::BlockNumber)?;
            backfill_end = Some(end);

            let past =
                backfill_logs(provider.clone(), filter.clone(), start, Some(end), chunk_size);
            futures::pin_mut!(past);
            while let Some(log) = past.next().await {
                yield log?;
            }
        }

        while let Some(logs) = live.next().await {
            for log in logs {
                let replayed = log
                    .block_number
                    .zip(backfill_end)
                    .is_some_and(|(block, end)| block <= end);
                if !replayed {
                    yield log;
                }
            }
        }
    }
}

/// Decodes logs from `upstream` and pushes them into `sink` until cancelled.
///
/// The cancellation token is checked before every log and while waiting on a full sink, so no
/// event is forwarded after cancellation. Returns `Ok` when cancelled or when the sink is
/// dropped, the first upstream or decoding error otherwise, and
/// [`BindingError::SubscriptionClosed`] when the upstream ends.
pub async fn forward_events<E, S>(
    upstream: S,
    sink: mpsc::Sender<DecodedEvent<E>>,
    cancel: CancellationToken,
) -> Result<(), BindingError>
where
    E: SolEvent,
    S: Stream<Item = LogResult>,
{
    futures::pin_mut!(upstream);

    loop {
        let next = tokio::select! {
            biased;
            // shutdown first
            _ = cancel.cancelled() => {
                tracing::info!("Watch for {} received shutdown signal", E::SIGNATURE);
                return Ok(());
            }
            next = upstream.next() => next,
        };

        let event = match next {
            Some(Ok(log)) => decode_event::<E>(log)?,
            Some(Err(err)) => return Err(err),
            None => {
                tracing::warn!("Log subscription for {} ended", E::SIGNATURE);
                return Err(BindingError::SubscriptionClosed);
            }
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::info!("Watch for {} received shutdown signal", E::SIGNATURE);
                return Ok(());
            }
            sent = sink.send(event) => {
                if sent.is_err() {
                    tracing::debug!("Sink for {} dropped, stopping watch", E::SIGNATURE);
                    return Ok(());
                }
            }
        }
    }
}

/// A running watch task
#[derive(Debug)]
pub struct WatchHandle {
    cancel: CancellationToken,
    task: JoinHandle<Result<(), BindingError>>,
}

impl WatchHandle {
    pub fn spawn<F>(cancel: CancellationToken, watch: F) -> Self
    where
        F: Future<Output = Result<(), BindingError>> + Send + 'static,
    {
        Self {
            cancel,
            task: tokio::spawn(watch),
        }
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Waits for the watch to end and returns how it ended
    pub async fn join(self) -> Result<(), BindingError> {
        self.task.await?
    }
}

/// Decoded events as a [`Stream`].
///
/// Yields events until the watch behind it ends, then its failure if it failed. Dropping the
/// stream cancels the watch.
pub struct EventStream<E> {
    events: ReceiverStream<DecodedEvent<E>>,
    handle: Option<WatchHandle>,
    _event: PhantomData<fn() -> E>,
}

impl<E> EventStream<E> {
    pub fn new(events: mpsc::Receiver<DecodedEvent<E>>, handle: WatchHandle) -> Self {
        Self {
            events: ReceiverStream::new(events),
            handle: Some(handle),
            _event: PhantomData,
        }
    }

    pub fn cancel(&self) {
        if let Some(handle) = &self.handle {
            handle.cancel();
        }
    }
}

impl<E> Stream for EventStream<E> {
    type Item = Result<DecodedEvent<E>, BindingError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        if let Some(event) = ready!(Pin::new(&mut this.events).poll_next(cx)) {
            return Poll::Ready(Some(Ok(event)));
        }

        // the queue only closes once the task dropped its sender, report how it ended
        let Some(handle) = this.handle.as_mut() else {
            return Poll::Ready(None);
        };
        let result = ready!(Pin::new(&mut handle.task).poll(cx));
        this.handle = None;

        match result {
            Ok(Ok(())) => Poll::Ready(None),
            Ok(Err(err)) => Poll::Ready(Some(Err(err))),
            Err(err) => Poll::Ready(Some(Err(err.into()))),
        }
    }
}

impl<E> Drop for EventStream<E> {
    fn drop(&mut self) {
        self.cancel();
    }
}
