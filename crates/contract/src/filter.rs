//! Pull-based iteration over historical events.

use crate::{
    descriptor::EventSpec,
    event::{log_position, EventRecord, TopicSets},
    options::{cancellable, FilterOptions},
    BindError, Transport, TransportError,
};
use alloy_primitives::Address;
use alloy_rpc_types_eth::Log;
use std::{collections::VecDeque, sync::Arc};
use tokio_retry::{strategy::ExponentialBackoff, Retry};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// Observable state of an [`EventIterator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IteratorState {
    /// More records may follow.
    Ready,
    /// The block range is drained, or the iterator was closed.
    Exhausted,
    /// Iteration stopped on an error, available from [`EventIterator::error`].
    Failed,
}

#[derive(Debug)]
enum Phase {
    Ready,
    Exhausted,
    Failed(BindError),
}

/// Single-pass cursor over the logs of one event in a block range.
///
/// The range is scanned in chunks of [`FilterOptions::chunk_size`] blocks.
/// Records come out in ascending `(block, log index)` order, each at most once.
pub struct EventIterator<T> {
    transport: Arc<T>,
    address: Address,
    event: EventSpec,
    topics: TopicSets,
    /// First block of the next chunk. `None` once the range is scanned.
    next_block: Option<u64>,
    to_block: Option<u64>,
    chunk_size: u64,
    retries: usize,
    cancel: Option<CancellationToken>,
    buffer: VecDeque<Log>,
    last: Option<(u64, u64)>,
    phase: Phase,
}

impl<T> std::fmt::Debug for EventIterator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventIterator")
            .field("address", &self.address)
            .field("event", &self.event.signature())
            .field("next_block", &self.next_block)
            .field("to_block", &self.to_block)
            .field("buffered", &self.buffer.len())
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

impl<T: Transport> EventIterator<T> {
    pub(crate) fn new(
        transport: Arc<T>,
        address: Address,
        event: EventSpec,
        topics: TopicSets,
        opts: &FilterOptions,
    ) -> Self {
        Self {
            transport,
            address,
            event,
            topics,
            next_block: Some(opts.from_block),
            to_block: opts.to_block,
            chunk_size: opts.chunk_size.max(1),
            retries: opts.retries,
            cancel: opts.cancel.clone(),
            buffer: VecDeque::new(),
            last: None,
            phase: Phase::Ready,
        }
    }

    pub const fn state(&self) -> IteratorState {
        match self.phase {
            Phase::Ready => IteratorState::Ready,
            Phase::Exhausted => IteratorState::Exhausted,
            Phase::Failed(_) => IteratorState::Failed,
        }
    }

    /// The error that stopped iteration, if any.
    pub const fn error(&self) -> Option<&BindError> {
        match &self.phase {
            Phase::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Advance to the next matching record.
    ///
    /// Returns `None` once the range is drained or after a failure; the
    /// failure itself is returned once as `Some(Err(..))` and stays available
    /// from [`error`](Self::error).
    pub async fn next(&mut self) -> Option<Result<EventRecord, BindError>> {
        loop {
            if !matches!(self.phase, Phase::Ready) {
                return None;
            }

            if let Some(log) = self.buffer.pop_front() {
                if !self.accept(&log) {
                    continue;
                }
                return match self.event.decode(&log) {
                    Ok(record) => {
                        self.last = log_position(&log).or(self.last);
                        Some(Ok(record))
                    }
                    Err(err) => Some(Err(self.fail(err))),
                };
            }

            match self.fetch_chunk().await {
                Ok(true) => {}
                Ok(false) => {
                    debug!(
                        event = self.event.name(),
                        address = %self.address,
                        "Event range drained"
                    );
                    self.phase = Phase::Exhausted;
                    return None;
                }
                Err(err) => return Some(Err(self.fail(err))),
            }
        }
    }

    /// Drain the iterator into a vector, stopping at the first error.
    pub async fn collect(mut self) -> Result<Vec<EventRecord>, BindError> {
        let mut records = Vec::new();
        while let Some(record) = self.next().await {
            records.push(record?);
        }
        Ok(records)
    }

    /// Release buffered logs. Safe to call in any state, any number of times.
    pub fn close(&mut self) {
        self.buffer.clear();
        if matches!(self.phase, Phase::Ready) {
            self.phase = Phase::Exhausted;
        }
    }

    /// Last `(block, log index)` yielded so far.
    pub(crate) const fn last_position(&self) -> Option<(u64, u64)> {
        self.last
    }

    fn accept(&self, log: &Log) -> bool {
        if log.removed || !self.event.matches(log, &self.topics) {
            return false;
        }
        match (log_position(log), self.last) {
            (Some(position), Some(last)) => position > last,
            _ => true,
        }
    }

    fn fail(&mut self, err: BindError) -> BindError {
        self.buffer.clear();
        self.phase = Phase::Failed(err.clone());
        err
    }

    /// Fetch the next chunk into the buffer. `Ok(false)` once the range is drained.
    async fn fetch_chunk(&mut self) -> Result<bool, BindError> {
        let to_block = match self.to_block {
            Some(block) => block,
            None => {
                let head = cancellable(self.cancel.as_ref(), self.transport.latest_block())
                    .await??;
                debug!(head, "Resolved event range end to head block");
                self.to_block = Some(head);
                head
            }
        };

        let Some(from_block) = self.next_block.filter(|block| *block <= to_block) else {
            self.next_block = None;
            return Ok(false);
        };

        let chunk_end = to_block.min(from_block.saturating_add(self.chunk_size - 1));
        debug!(
            event = self.event.name(),
            from = from_block,
            to = chunk_end,
            "Scanning chunk for events"
        );

        let filter = self
            .event
            .log_filter(self.address, &self.topics)
            .from_block(from_block)
            .to_block(chunk_end);

        let mut logs = cancellable(
            self.cancel.as_ref(),
            query_with_retry(&*self.transport, &filter, self.retries),
        )
        .await??;
        logs.sort_by_key(|log| (log.block_number, log.log_index));
        trace!(count = logs.len(), "Fetched logs");

        self.buffer.extend(logs);
        self.next_block = chunk_end.checked_add(1);
        Ok(true)
    }
}

/// `eth_getLogs` with `retries` extra attempts and exponential backoff.
pub(crate) async fn query_with_retry<T: Transport + ?Sized>(
    transport: &T,
    filter: &alloy_rpc_types_eth::Filter,
    retries: usize,
) -> Result<Vec<Log>, TransportError> {
    // 100ms, 200ms, 400ms, ...
    let strategy = ExponentialBackoff::from_millis(2).factor(50).take(retries);

    Retry::start(strategy, || async {
        transport.query_logs(filter).await.map_err(|err| {
            debug!(error = %err, "Log query failed");
            err
        })
    })
    .await
}
