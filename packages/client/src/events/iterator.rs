use std::marker::PhantomData;

use alloy_sol_types::SolEvent;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::{decode_event, DecodedEvent, LogResult};
use crate::error::BindingError;

/// Pull-based iterator over the logs a producer task pushes into a bounded queue.
///
/// The first failure, from the producer or from decoding a log, is latched: `next` yields
/// `None` from then on and [`EventIterator::error`] returns it. Dropping or closing the
/// iterator cancels the producer.
pub struct EventIterator<E> {
    rx: mpsc::Receiver<LogResult>,
    cancel: CancellationToken,
    failure: Option<BindingError>,
    done: bool,
    _event: PhantomData<fn() -> E>,
}

impl<E: SolEvent> EventIterator<E> {
    pub fn new(rx: mpsc::Receiver<LogResult>, cancel: CancellationToken) -> Self {
        Self {
            rx,
            cancel,
            failure: None,
            done: false,
            _event: PhantomData,
        }
    }

    /// The next event in delivery order, `None` once the producer is exhausted or failed
    pub async fn next(&mut self) -> Option<DecodedEvent<E>> {
        if self.done || self.failure.is_some() {
            return None;
        }

        match self.rx.recv().await {
            Some(Ok(log)) => match decode_event(log) {
                Ok(event) => Some(event),
                Err(err) => self.fail(err),
            },
            Some(Err(err)) => self.fail(err),
            None => {
                self.done = true;
                None
            }
        }
    }

    /// The failure that ended iteration, if any
    pub fn error(&self) -> Option<&BindingError> {
        self.failure.as_ref()
    }

    pub fn into_error(self) -> Option<BindingError> {
        let mut this = self;
        this.failure.take()
    }

    /// Stops the producer and ends iteration, buffered logs are discarded
    pub fn close(&mut self) {
        self.cancel.cancel();
        self.rx.close();
        self.done = true;
    }

    /// Drains the remaining events, returning the latched failure if iteration failed
    pub async fn collect(mut self) -> Result<Vec<DecodedEvent<E>>, BindingError> {
        let mut events = Vec::new();
        while let Some(event) = self.next().await {
            events.push(event);
        }

        match self.failure.take() {
            Some(err) => Err(err),
            None => Ok(events),
        }
    }

    fn fail(&mut self, err: BindingError) -> Option<DecodedEvent<E>> {
        tracing::warn!("Event iterator for {} failed: {}", E::SIGNATURE, err);
        self.cancel.cancel();
        self.failure = Some(err);
        None
    }
}

impl<E> Drop for EventIterator<E> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
