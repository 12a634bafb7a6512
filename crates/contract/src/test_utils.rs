//! Scripted in-memory transport and fixtures for tests.

use crate::{options::SignerFn, transport::LogStream, Transport, TransportError};
use alloy_primitives::{keccak256, Address, Bytes, LogData, Selector, TxHash, B256};
use alloy_rpc_types_eth::{BlockId, Filter, Log, TransactionRequest};
use async_trait::async_trait;
use futures_util::StreamExt;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};
use tokio::sync::mpsc;

/// A small token-like ABI exercising overloads, multi-value returns,
/// dynamic indexed fields, custom errors, a payable function and `receive`.
pub const TOKEN_ABI: &str = r#"[
  {"type":"constructor","inputs":[{"name":"_name","type":"string"},{"name":"_supply","type":"uint256"}],"stateMutability":"nonpayable"},
  {"type":"receive","stateMutability":"payable"},
  {"type":"function","name":"balanceOf","inputs":[{"name":"owner","type":"address"}],"outputs":[{"name":"","type":"uint256"}],"stateMutability":"view"},
  {"type":"function","name":"name","inputs":[],"outputs":[{"name":"","type":"string"}],"stateMutability":"view"},
  {"type":"function","name":"checkpoint","inputs":[],"outputs":[{"name":"submitter","type":"address"},{"name":"","type":"uint128"}],"stateMutability":"view"},
  {"type":"function","name":"transfer","inputs":[{"name":"to","type":"address"},{"name":"amount","type":"uint256"}],"outputs":[{"name":"","type":"bool"}],"stateMutability":"nonpayable"},
  {"type":"function","name":"safeTransfer","inputs":[{"name":"to","type":"address"}],"outputs":[],"stateMutability":"nonpayable"},
  {"type":"function","name":"safeTransfer","inputs":[{"name":"to","type":"address"},{"name":"data","type":"bytes"}],"outputs":[],"stateMutability":"nonpayable"},
  {"type":"function","name":"deposit","inputs":[],"outputs":[],"stateMutability":"payable"},
  {"type":"event","name":"Transfer","inputs":[{"name":"from","type":"address","indexed":true},{"name":"to","type":"address","indexed":true},{"name":"value","type":"uint256","indexed":false}],"anonymous":false},
  {"type":"event","name":"Memo","inputs":[{"name":"tag","type":"string","indexed":true},{"name":"body","type":"bytes","indexed":false}],"anonymous":false},
  {"type":"error","name":"InsufficientBalance","inputs":[{"name":"available","type":"uint256"},{"name":"required","type":"uint256"}]}
]"#;

/// Creation code paired with [`TOKEN_ABI`]. Only its bytes matter to tests.
pub const TOKEN_BYTECODE: &str = "0x6080604052348015600e575f5ffd5b50603e80601a5f395ff3fe";

/// A request observed by [`MockTransport`].
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Call {
        request: TransactionRequest,
        block: BlockId,
    },
    CodeAt(Address, BlockId),
    PendingNonce(Address),
    Submit(TransactionRequest),
    SubmitRaw(Bytes),
    LatestBlock,
    Logs(Filter),
    Stream(Filter),
}

type LiveItem = Result<Log, TransportError>;

#[derive(Debug, Default)]
struct MockState {
    calls: HashMap<Selector, Result<Bytes, TransportError>>,
    code: HashMap<Address, Bytes>,
    nonces: HashMap<Address, u64>,
    block_number: u64,
    logs: Vec<Log>,
    log_error: Option<TransportError>,
    submit_error: Option<TransportError>,
    live: Option<mpsc::UnboundedReceiver<LiveItem>>,
    requests: Vec<Request>,
}

/// Scripted transport that records every request.
///
/// Calls are answered by selector; unknown selectors return empty data, as a
/// node does for an address without code. Historical logs are filtered by
/// address and block range only, leaving topic matching to the caller.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn with_call_result(self, selector: impl Into<Selector>, data: impl Into<Bytes>) -> Self {
        self.state().calls.insert(selector.into(), Ok(data.into()));
        self
    }

    pub fn with_call_error(self, selector: impl Into<Selector>, error: TransportError) -> Self {
        self.state().calls.insert(selector.into(), Err(error));
        self
    }

    pub fn with_code(self, address: Address, code: impl Into<Bytes>) -> Self {
        self.state().code.insert(address, code.into());
        self
    }

    pub fn with_nonce(self, address: Address, nonce: u64) -> Self {
        self.state().nonces.insert(address, nonce);
        self
    }

    pub fn with_block_number(self, block_number: u64) -> Self {
        self.state().block_number = block_number;
        self
    }

    pub fn with_logs(self, logs: Vec<Log>) -> Self {
        self.state().logs.extend(logs);
        self
    }

    pub fn fail_log_queries(self, error: TransportError) -> Self {
        self.state().log_error = Some(error);
        self
    }

    pub fn reject_submissions(self, error: TransportError) -> Self {
        self.state().submit_error = Some(error);
        self
    }

    /// Channel feeding the next live log stream.
    ///
    /// The stream ends when the returned sender is dropped.
    pub fn live_logs(&self) -> mpsc::UnboundedSender<LiveItem> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.state().live = Some(rx);
        tx
    }

    pub fn requests(&self) -> Vec<Request> {
        self.state().requests.clone()
    }

    pub fn log_queries(&self) -> usize {
        self.count(|request| matches!(request, Request::Logs(_)))
    }

    pub fn block_number_queries(&self) -> usize {
        self.count(|request| matches!(request, Request::LatestBlock))
    }

    pub fn submissions(&self) -> usize {
        self.count(|request| matches!(request, Request::Submit(_) | Request::SubmitRaw(_)))
    }

    fn count(&self, predicate: impl Fn(&Request) -> bool) -> usize {
        self.state().requests.iter().filter(|r| predicate(r)).count()
    }

    fn record(&self, request: Request) -> MutexGuard<'_, MockState> {
        let mut state = self.state();
        state.requests.push(request);
        state
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn eth_call(
        &self,
        request: TransactionRequest,
        block: BlockId,
    ) -> Result<Bytes, TransportError> {
        let selector = request
            .input
            .input()
            .and_then(|data| data.get(..4))
            .map(Selector::from_slice);
        let state = self.record(Request::Call { request, block });
        match selector.and_then(|selector| state.calls.get(&selector)) {
            Some(result) => result.clone(),
            None => Ok(Bytes::new()),
        }
    }

    async fn code_at(&self, address: Address, block: BlockId) -> Result<Bytes, TransportError> {
        let state = self.record(Request::CodeAt(address, block));
        Ok(state.code.get(&address).cloned().unwrap_or_default())
    }

    async fn pending_nonce(&self, address: Address) -> Result<u64, TransportError> {
        let state = self.record(Request::PendingNonce(address));
        Ok(state.nonces.get(&address).copied().unwrap_or_default())
    }

    async fn submit_transaction(
        &self,
        request: TransactionRequest,
    ) -> Result<TxHash, TransportError> {
        let state = self.record(Request::Submit(request));
        if let Some(err) = &state.submit_error {
            return Err(err.clone());
        }
        Ok(keccak256(state.requests.len().to_be_bytes()))
    }

    async fn submit_raw_transaction(&self, raw: Bytes) -> Result<TxHash, TransportError> {
        let hash = keccak256(&raw);
        let state = self.record(Request::SubmitRaw(raw));
        if let Some(err) = &state.submit_error {
            return Err(err.clone());
        }
        Ok(hash)
    }

    async fn latest_block(&self) -> Result<u64, TransportError> {
        Ok(self.record(Request::LatestBlock).block_number)
    }

    async fn query_logs(&self, filter: &Filter) -> Result<Vec<Log>, TransportError> {
        let state = self.record(Request::Logs(filter.clone()));
        if let Some(err) = &state.log_error {
            return Err(err.clone());
        }

        let from = filter.get_from_block().unwrap_or_default();
        let to = filter.get_to_block().unwrap_or(u64::MAX);
        Ok(state
            .logs
            .iter()
            .filter(|log| filter.address.matches(&log.address()))
            .filter(|log| log.block_number.is_some_and(|block| block >= from && block <= to))
            .cloned()
            .collect())
    }

    async fn log_stream(
        &self,
        filter: &Filter,
        _poll_interval: Duration,
    ) -> Result<LogStream, TransportError> {
        let live = self.record(Request::Stream(filter.clone())).live.take();
        match live {
            Some(rx) => Ok(futures_util::stream::unfold(rx, |mut rx| async move {
                rx.recv().await.map(|item| (item, rx))
            })
            .boxed()),
            None => Ok(futures_util::stream::pending::<LiveItem>().boxed()),
        }
    }
}

/// A mined log at `(block, index)`.
pub fn mock_log(address: Address, topics: Vec<B256>, data: Bytes, block: u64, index: u64) -> Log {
    Log {
        inner: alloy_primitives::Log {
            address,
            data: LogData::new_unchecked(topics, data),
        },
        block_number: Some(block),
        log_index: Some(index),
        transaction_hash: Some(keccak256([block.to_be_bytes(), index.to_be_bytes()].concat())),
        ..Default::default()
    }
}

/// A signer that must never be reached.
pub fn panicking_signer() -> SignerFn {
    Arc::new(|_tx| Box::pin(async { panic!("signer should not be called") }))
}

/// A signer returning the request's calldata as the "signed" payload.
pub fn echo_signer() -> SignerFn {
    Arc::new(|tx: TransactionRequest| {
        Box::pin(async move { Ok(tx.input.input().cloned().unwrap_or_default()) })
    })
}
