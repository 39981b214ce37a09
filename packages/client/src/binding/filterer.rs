use std::time::Duration;

use alloy_primitives::B256;
use alloy_provider::Provider;
use alloy_rpc_types_eth::{Filter, Log};
use alloy_sol_types::SolEvent;
use taiko_bindings::ContractDescriptor;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::ContractBinding;
use crate::{
    error::BindingError,
    events::{
        backfill_logs, decode_event, forward_events, live_logs, pump, DecodedEvent,
        EventIterator, EventStream, WatchHandle,
    },
};

/// Block range of a past-events query, both ends inclusive
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterOpts {
    pub start: u64,
    /// Latest block at query time if unset
    pub end: Option<u64>,
}

impl FilterOpts {
    pub fn range(start: u64, end: u64) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }

    pub fn from_block(start: u64) -> Self {
        Self { start, end: None }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WatchOpts {
    /// Replay past events from this block before going live
    pub start: Option<u64>,
    /// Poll a log filter at this interval instead of subscribing, for http endpoints
    pub poll_interval: Option<Duration>,
}

/// Values to match against the indexed arguments of an event.
///
/// Each position accepts any of its values, all positions must match. An empty position
/// matches anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicFilter {
    topics: [Vec<B256>; 3],
}

impl TopicFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Matches the first indexed argument
    pub fn topic1<T: Into<B256>>(mut self, values: impl IntoIterator<Item = T>) -> Self {
        self.topics[0].extend(values.into_iter().map(Into::into));
        self
    }

    pub fn topic2<T: Into<B256>>(mut self, values: impl IntoIterator<Item = T>) -> Self {
        self.topics[1].extend(values.into_iter().map(Into::into));
        self
    }

    pub fn topic3<T: Into<B256>>(mut self, values: impl IntoIterator<Item = T>) -> Self {
        self.topics[2].extend(values.into_iter().map(Into::into));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.topics.iter().all(Vec::is_empty)
    }

    fn apply(&self, mut filter: Filter) -> Filter {
        let [topic1, topic2, topic3] = &self.topics;
        if !topic1.is_empty() {
            filter = filter.topic1(topic1.clone());
        }
        if !topic2.is_empty() {
            filter = filter.topic2(topic2.clone());
        }
        if !topic3.is_empty() {
            filter = filter.topic3(topic3.clone());
        }
        filter
    }
}

/// Event facet: filters past logs, watches live ones and decodes them into typed events
pub struct Filterer<'a, D, P> {
    binding: &'a ContractBinding<D, P>,
}

impl<'a, D, P> Filterer<'a, D, P>
where
    D: ContractDescriptor,
    P: Provider + Clone + 'static,
{
    pub(super) fn new(binding: &'a ContractBinding<D, P>) -> Self {
        Self { binding }
    }

    /// The log filter selecting `E` emitted by this contract
    pub fn event_filter<E: SolEvent>(&self, topics: &TopicFilter) -> Filter {
        topics.apply(
            Filter::new()
                .address(self.binding.address)
                .event_signature(E::SIGNATURE_HASH),
        )
    }

    /// Past events over `opts`, fetched by a background producer.
    ///
    /// Query failures are not returned here, they end the iteration and are available from
    /// [`EventIterator::error`]. Must be called within a tokio runtime.
    pub fn filter_logs<E: SolEvent>(
        &self,
        opts: FilterOpts,
        topics: &TopicFilter,
    ) -> EventIterator<E> {
        let settings = &self.binding.settings;
        let (tx, rx) = mpsc::channel(settings.event_buffer.max(1));
        let cancel = CancellationToken::new();

        let logs = backfill_logs(
            self.binding.provider.clone(),
            self.event_filter::<E>(topics),
            opts.start,
            opts.end,
            settings.backfill_chunk_size,
        );
        tokio::spawn(pump(logs, tx, cancel.clone()));

        EventIterator::new(rx, cancel)
    }

    /// Pushes every new `E` into `sink` until `cancel` fires, the sink is dropped or the log
    /// source fails.
    pub fn watch<E>(
        &self,
        opts: WatchOpts,
        topics: &TopicFilter,
        sink: mpsc::Sender<DecodedEvent<E>>,
        cancel: CancellationToken,
    ) -> WatchHandle
    where
        E: SolEvent + Send + 'static,
    {
        let logs = live_logs(
            self.binding.provider.clone(),
            self.event_filter::<E>(topics),
            opts,
            self.binding.settings.backfill_chunk_size,
        );

        tracing::info!(
            "Watching {} on {} at {}",
            E::SIGNATURE,
            D::name(),
            self.binding.address
        );

        WatchHandle::spawn(cancel.clone(), forward_events(logs, sink, cancel))
    }

    /// Same as [`Filterer::watch`], consumed as a stream
    pub fn subscribe<E>(
        &self,
        opts: WatchOpts,
        topics: &TopicFilter,
        cancel: CancellationToken,
    ) -> EventStream<E>
    where
        E: SolEvent + Send + 'static,
    {
        let (sink, events) = mpsc::channel(self.binding.settings.event_buffer.max(1));
        let handle = self.watch(opts, topics, sink, cancel);

        EventStream::new(events, handle)
    }

    pub fn parse_log<E: SolEvent>(&self, log: &Log) -> Result<DecodedEvent<E>, BindingError> {
        decode_event(log.clone())
    }
}
