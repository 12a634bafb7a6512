//! Per-operation options for calls, transactions, log queries and watches.

use crate::BindError;
use alloy_primitives::{Address, Bytes, TxHash, U256};
use alloy_rpc_types_eth::{BlockId, BlockNumberOrTag, TransactionRequest};
use std::{fmt, future::Future, pin::Pin, sync::Arc, time::Duration};
use tokio_util::sync::CancellationToken;

/// A function that signs a transaction request and returns signed bytes.
///
/// Allows for both local and remote signing implementations.
pub type SignerFn = Arc<
    dyn Fn(TransactionRequest) -> Pin<Box<dyn Future<Output = eyre::Result<Bytes>> + Send>>
        + Send
        + Sync,
>;

/// Default block span of a single `eth_getLogs` request.
///
/// Leaves a margin under the common 10,000 block provider limit.
pub const DEFAULT_CHUNK_SIZE: u64 = 9_500;

/// Options for a read-only call.
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    /// Caller address seen by the contract (`msg.sender`).
    pub from: Option<Address>,
    /// Block to read at. Defaults to latest.
    pub block: BlockId,
    pub cancel: Option<CancellationToken>,
}

impl CallOptions {
    pub const fn caller(mut self, from: Address) -> Self {
        self.from = Some(from);
        self
    }

    pub const fn at_block(mut self, number: u64) -> Self {
        self.block = BlockId::Number(BlockNumberOrTag::Number(number));
        self
    }

    /// Read against the pending state.
    pub const fn pending(mut self) -> Self {
        self.block = BlockId::Number(BlockNumberOrTag::Pending);
        self
    }

    pub fn with_cancel(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

/// Options for a state-changing transaction.
#[derive(Clone, Default)]
pub struct TransactOptions {
    /// Sender of the transaction.
    pub from: Address,
    /// Signs the request locally; without it the transport signs.
    pub signer: Option<SignerFn>,
    pub nonce: Option<u64>,
    /// Wei attached to the transaction.
    pub value: U256,
    pub gas_limit: Option<u64>,
    /// Legacy gas price. Ignored when EIP-1559 fee caps are set.
    pub gas_price: Option<u128>,
    pub max_fee_per_gas: Option<u128>,
    pub max_priority_fee_per_gas: Option<u128>,
    pub cancel: Option<CancellationToken>,
}

impl fmt::Debug for TransactOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransactOptions")
            .field("from", &self.from)
            .field("signer", &self.signer.is_some())
            .field("nonce", &self.nonce)
            .field("value", &self.value)
            .field("gas_limit", &self.gas_limit)
            .field("gas_price", &self.gas_price)
            .field("max_fee_per_gas", &self.max_fee_per_gas)
            .field("max_priority_fee_per_gas", &self.max_priority_fee_per_gas)
            .finish_non_exhaustive()
    }
}

impl TransactOptions {
    pub fn new(from: Address) -> Self {
        Self {
            from,
            ..Default::default()
        }
    }

    pub fn with_signer(mut self, signer: SignerFn) -> Self {
        self.signer = Some(signer);
        self
    }

    pub fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }

    pub fn with_nonce(mut self, nonce: u64) -> Self {
        self.nonce = Some(nonce);
        self
    }

    pub fn with_gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = Some(gas_limit);
        self
    }

    pub fn with_cancel(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Base request carrying sender, value, nonce and fee settings.
    pub(crate) fn request(&self) -> TransactionRequest {
        let mut request = TransactionRequest::default()
            .from(self.from)
            .value(self.value);

        if let Some(nonce) = self.nonce {
            request = request.nonce(nonce);
        }
        if let Some(gas_limit) = self.gas_limit {
            request = request.gas_limit(gas_limit);
        }
        if self.max_fee_per_gas.is_some() || self.max_priority_fee_per_gas.is_some() {
            request.max_fee_per_gas = self.max_fee_per_gas;
            request.max_priority_fee_per_gas = self.max_priority_fee_per_gas;
        } else if let Some(gas_price) = self.gas_price {
            request = request.gas_price(gas_price);
        }

        request
    }
}

/// Options for a historical event query.
#[derive(Debug, Clone)]
pub struct FilterOptions {
    pub from_block: u64,
    /// Last block of the range. Resolved to the head block when the query starts if absent.
    pub to_block: Option<u64>,
    /// Block span of each `eth_getLogs` request.
    pub chunk_size: u64,
    /// Extra attempts per chunk, with exponential backoff. Zero disables retries.
    pub retries: usize,
    pub cancel: Option<CancellationToken>,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            from_block: 0,
            to_block: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
            retries: 0,
            cancel: None,
        }
    }
}

impl FilterOptions {
    pub fn range(from_block: u64, to_block: u64) -> Self {
        Self {
            from_block,
            to_block: Some(to_block),
            ..Default::default()
        }
    }

    pub fn since(from_block: u64) -> Self {
        Self {
            from_block,
            ..Default::default()
        }
    }

    pub const fn with_chunk_size(mut self, chunk_size: u64) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub const fn with_retries(mut self, retries: usize) -> Self {
        self.retries = retries;
        self
    }

    pub fn with_cancel(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

/// Options for a live event watch.
#[derive(Debug, Clone)]
pub struct WatchOptions {
    /// Backfill from this block before delivering live logs.
    pub start: Option<u64>,
    pub poll_interval: Duration,
    /// Cancelling the token stops the watch cleanly.
    pub cancel: CancellationToken,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            start: None,
            poll_interval: Duration::from_secs(2),
            cancel: CancellationToken::new(),
        }
    }
}

impl WatchOptions {
    pub fn from_block(start: u64) -> Self {
        Self {
            start: Some(start),
            ..Default::default()
        }
    }

    pub const fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_cancel(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }
}

/// A submitted transaction. No receipt is awaited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingTransaction {
    pub tx_hash: TxHash,
    /// Nonce fixed on the request, when one was resolved before submission.
    pub nonce: Option<u64>,
}

/// Run `fut` unless `cancel` fires first.
pub(crate) async fn cancellable<F: Future>(
    cancel: Option<&CancellationToken>,
    fut: F,
) -> Result<F::Output, BindError> {
    match cancel {
        Some(token) => tokio::select! {
            biased;
            _ = token.cancelled() => Err(BindError::Cancelled),
            output = fut => Ok(output),
        },
        None => Ok(fut.await),
    }
}
