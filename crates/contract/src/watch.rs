//! Live event subscriptions.

use crate::{
    descriptor::EventSpec,
    event::{log_position, EventRecord, TopicSets},
    filter::EventIterator,
    transport::LogStream,
    BindError, Transport, TransportError,
};
use alloy_rpc_types_eth::Log;
use futures_util::StreamExt;
use tokio::{sync::mpsc, task::JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// Handle to a running watch task.
///
/// Dropping the handle stops the watch. The handle owns a child of the token
/// the watch was started with, so stopping it never cancels that token.
#[derive(Debug)]
pub struct Subscription {
    cancel: CancellationToken,
    handle: Option<JoinHandle<Result<(), BindError>>>,
}

impl Subscription {
    /// Stop the watch. Idempotent.
    pub fn unsubscribe(&self) {
        self.cancel.cancel();
    }

    /// Wait for the watch to end and return its terminal result.
    ///
    /// `Ok(())` means the watch was cancelled or its receiver was dropped.
    pub async fn join(mut self) -> Result<(), BindError> {
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };
        match handle.await {
            Ok(result) => result,
            Err(err) => Err(BindError::Aborted(err.to_string())),
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

pub(crate) struct WatchTask<T> {
    pub(crate) event: EventSpec,
    pub(crate) topics: TopicSets,
    pub(crate) stream: LogStream,
    pub(crate) backfill: Option<EventIterator<T>>,
    pub(crate) sink: mpsc::Sender<EventRecord>,
    pub(crate) cancel: CancellationToken,
}

impl<T: Transport + 'static> WatchTask<T> {
    pub(crate) fn spawn(self) -> Subscription {
        let cancel = self.cancel.clone();
        let handle = tokio::spawn(self.run());
        Subscription {
            cancel,
            handle: Some(handle),
        }
    }

    async fn run(mut self) -> Result<(), BindError> {
        debug!(event = self.event.name(), "Watch started");
        let mut last = None;

        if let Some(mut backfill) = self.backfill.take() {
            loop {
                let next = tokio::select! {
                    biased;
                    _ = self.cancel.cancelled() => return self.stopped("cancelled during backfill"),
                    next = backfill.next() => next,
                };
                match next {
                    Some(Ok(record)) => {
                        if !deliver(&self.cancel, &self.sink, record).await {
                            return self.stopped("delivery ended during backfill");
                        }
                    }
                    Some(Err(err)) => return Err(err),
                    None => break,
                }
            }
            last = backfill.last_position();
            debug!(?last, "Backfill complete, switching to live logs");
        }

        loop {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return self.stopped("cancelled"),
                item = self.stream.next() => match item {
                    Some(Ok(log)) => {
                        if !accept(&self.event, &self.topics, &log, last) {
                            trace!(block = ?log.block_number, "Skipping log");
                            continue;
                        }
                        let record = self.event.decode(&log)?;
                        last = log_position(&log).or(last);
                        if !deliver(&self.cancel, &self.sink, record).await {
                            return self.stopped("delivery ended");
                        }
                    }
                    Some(Err(err)) => return Err(err.into()),
                    None => return Err(TransportError::SubscriptionClosed.into()),
                },
            }
        }
    }

    fn stopped(&self, reason: &str) -> Result<(), BindError> {
        debug!(event = self.event.name(), reason, "Watch stopped");
        Ok(())
    }
}

/// Hand a record to the sink, racing cancellation. `false` if the watch should stop.
///
/// A full sink blocks here; cancellation still wins.
async fn deliver(
    cancel: &CancellationToken,
    sink: &mpsc::Sender<EventRecord>,
    record: EventRecord,
) -> bool {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => false,
        sent = sink.send(record) => sent.is_ok(),
    }
}

fn accept(event: &EventSpec, topics: &TopicSets, log: &Log, last: Option<(u64, u64)>) -> bool {
    if log.removed || !event.matches(log, topics) {
        return false;
    }
    match (log_position(log), last) {
        (Some(position), Some(last)) => position > last,
        _ => true,
    }
}
