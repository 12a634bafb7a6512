//! A contract descriptor attached to an address and a transport.

use crate::{
    descriptor::ContractDescriptor,
    error::{BindError, ContractCallError, EncodingError},
    event::EventRecord,
    filter::EventIterator,
    options::{
        cancellable, CallOptions, FilterOptions, PendingTransaction, TransactOptions,
        WatchOptions,
    },
    session::Session,
    value::CallOutput,
    watch::{Subscription, WatchTask},
    Transport, TransportError,
};
use alloy_dyn_abi::DynSolValue;
use alloy_primitives::{Address, Bytes, TxKind};
use alloy_rpc_types_eth::{Log, TransactionRequest};
use alloy_sol_types::{SolCall, SolEvent};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, trace};

/// Result of a deployment: the address is known before the transaction is mined.
pub struct Deployment<T> {
    pub address: Address,
    pub transaction: PendingTransaction,
    pub contract: BoundContract<T>,
}

impl<T> std::fmt::Debug for Deployment<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Deployment")
            .field("address", &self.address)
            .field("transaction", &self.transaction)
            .finish_non_exhaustive()
    }
}

/// Capability handle for one deployed contract.
///
/// Holds only shared handles, so clones are cheap and can be used from many
/// tasks at once.
pub struct BoundContract<T> {
    address: Address,
    descriptor: Arc<ContractDescriptor>,
    transport: Arc<T>,
}

impl<T> Clone for BoundContract<T> {
    fn clone(&self) -> Self {
        Self {
            address: self.address,
            descriptor: Arc::clone(&self.descriptor),
            transport: Arc::clone(&self.transport),
        }
    }
}

impl<T> std::fmt::Debug for BoundContract<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundContract")
            .field("name", &self.descriptor.name())
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

impl<T: Transport + 'static> BoundContract<T> {
    pub const fn new(address: Address, descriptor: Arc<ContractDescriptor>, transport: Arc<T>) -> Self {
        Self {
            address,
            descriptor,
            transport,
        }
    }

    /// Deploy a new instance and bind to its precomputed address.
    ///
    /// The nonce is resolved before submission, so the address
    /// `from.create(nonce)` is known as soon as the transaction is accepted.
    pub async fn deploy(
        descriptor: Arc<ContractDescriptor>,
        transport: Arc<T>,
        opts: &TransactOptions,
        args: &[DynSolValue],
    ) -> Result<Deployment<T>, BindError> {
        let code = descriptor.deploy_code(args, opts.value)?;

        let nonce = match opts.nonce {
            Some(nonce) => nonce,
            None => cancellable(opts.cancel.as_ref(), transport.pending_nonce(opts.from)).await??,
        };
        let opts = opts.clone().with_nonce(nonce);
        let address = opts.from.create(nonce);

        let label = format!("{} constructor", descriptor.name());
        let mut request = opts.request().input(code.into());
        request.to = Some(TxKind::Create);
        let transaction = submit(&*transport, &opts, &label, request).await?;
        debug!(contract = descriptor.name(), %address, nonce, "Deployment submitted");

        Ok(Deployment {
            address,
            transaction,
            contract: Self::new(address, descriptor, transport),
        })
    }

    pub const fn address(&self) -> Address {
        self.address
    }

    pub fn descriptor(&self) -> &ContractDescriptor {
        &self.descriptor
    }

    pub const fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    /// Bundle this contract with preset options.
    pub fn session(&self, call: CallOptions, transact: TransactOptions) -> Session<T> {
        Session::new(self.clone(), call, transact)
    }

    /// Invoke a read-only function and decode its outputs.
    pub async fn call(
        &self,
        opts: &CallOptions,
        method: &str,
        args: &[DynSolValue],
    ) -> Result<CallOutput, BindError> {
        let function = self.descriptor.function(method)?;
        let calldata = function.encode_input(args)?;

        let data = self.call_raw(opts, function.signature(), calldata).await?;
        if data.is_empty() && !function.outputs().is_empty() {
            return Err(self.empty_output(opts, function.signature()).await);
        }
        function.decode_output(&data)
    }

    /// Invoke a read-only function through a `sol!` call type.
    pub async fn call_typed<C: SolCall>(
        &self,
        opts: &CallOptions,
        call: &C,
    ) -> Result<C::Return, BindError> {
        let function = self.descriptor.function_by_selector(C::SELECTOR.into())?;

        let data = self
            .call_raw(opts, function.signature(), call.abi_encode().into())
            .await?;
        if data.is_empty() && !function.outputs().is_empty() {
            return Err(self.empty_output(opts, function.signature()).await);
        }
        C::abi_decode_returns(&data).map_err(|e| BindError::decode(function.signature(), e))
    }

    /// Submit a state-changing call. Does not wait for a receipt.
    pub async fn transact(
        &self,
        opts: &TransactOptions,
        method: &str,
        args: &[DynSolValue],
    ) -> Result<PendingTransaction, BindError> {
        let function = self.descriptor.function(method)?;
        if !opts.value.is_zero() && !function.is_payable() {
            return Err(EncodingError::NonPayable {
                method: function.signature().to_string(),
                value: opts.value,
            }
            .into());
        }
        let calldata = function.encode_input(args)?;

        let request = opts.request().to(self.address).input(calldata.into());
        submit(&*self.transport, opts, function.signature(), request).await
    }

    /// Submit a state-changing call through a `sol!` call type.
    pub async fn transact_typed<C: SolCall>(
        &self,
        opts: &TransactOptions,
        call: &C,
    ) -> Result<PendingTransaction, BindError> {
        let function = self.descriptor.function_by_selector(C::SELECTOR.into())?;
        if !opts.value.is_zero() && !function.is_payable() {
            return Err(EncodingError::NonPayable {
                method: function.signature().to_string(),
                value: opts.value,
            }
            .into());
        }

        let request = opts
            .request()
            .to(self.address)
            .input(Bytes::from(call.abi_encode()).into());
        submit(&*self.transport, opts, function.signature(), request).await
    }

    /// Submit arbitrary calldata, bypassing the ABI.
    pub async fn transact_raw(
        &self,
        opts: &TransactOptions,
        calldata: Bytes,
    ) -> Result<PendingTransaction, BindError> {
        let request = opts.request().to(self.address).input(calldata.into());
        submit(&*self.transport, opts, "raw transaction", request).await
    }

    /// Send plain value to the contract's `receive` or payable `fallback`.
    pub async fn transfer(&self, opts: &TransactOptions) -> Result<PendingTransaction, BindError> {
        if !self.descriptor.accepts_value_transfer() {
            return Err(EncodingError::NoReceive {
                contract: self.descriptor.name().to_string(),
            }
            .into());
        }

        let request = opts.request().to(self.address);
        submit(&*self.transport, opts, "transfer", request).await
    }

    /// Query historical logs of `event`, filtered by indexed values.
    ///
    /// `indexed` holds one set per indexed field, in declaration order; an
    /// empty set matches any value and trailing sets may be omitted.
    pub fn filter(
        &self,
        opts: &FilterOptions,
        event: &str,
        indexed: &[Vec<DynSolValue>],
    ) -> Result<EventIterator<T>, BindError> {
        let spec = self.descriptor.event(event)?;
        let topics = spec.topic_sets(indexed)?;

        Ok(EventIterator::new(
            Arc::clone(&self.transport),
            self.address,
            spec.clone(),
            topics,
            opts,
        ))
    }

    /// Push decoded `event` records into `sink` until cancelled or failed.
    ///
    /// The live filter is installed before any backfill runs, so no log
    /// emitted after this call returns is missed. The watch runs on a child of
    /// `opts.cancel`: cancelling the caller's token stops it, while dropping or
    /// unsubscribing the handle leaves the caller's token untouched.
    pub async fn watch(
        &self,
        opts: &WatchOptions,
        event: &str,
        indexed: &[Vec<DynSolValue>],
        sink: mpsc::Sender<EventRecord>,
    ) -> Result<Subscription, BindError> {
        let spec = self.descriptor.event(event)?;
        let topics = spec.topic_sets(indexed)?;

        let cancel = opts.cancel.child_token();
        let filter = spec.log_filter(self.address, &topics);
        let stream = cancellable(
            Some(&cancel),
            self.transport.log_stream(&filter, opts.poll_interval),
        )
        .await??;

        let backfill = match opts.start {
            Some(start) => {
                let head =
                    cancellable(Some(&cancel), self.transport.latest_block()).await??;
                let range = FilterOptions::range(start, head).with_cancel(cancel.clone());
                Some(EventIterator::new(
                    Arc::clone(&self.transport),
                    self.address,
                    spec.clone(),
                    topics.clone(),
                    &range,
                ))
            }
            None => None,
        };

        debug!(
            contract = self.descriptor.name(),
            event = spec.name(),
            start = ?opts.start,
            "Watching events"
        );

        let task = WatchTask {
            event: spec.clone(),
            topics,
            stream,
            backfill,
            sink,
            cancel,
        };
        Ok(task.spawn())
    }

    /// Decode a raw log as `event`.
    pub fn parse(&self, event: &str, log: &Log) -> Result<EventRecord, BindError> {
        self.descriptor.event(event)?.decode(log)
    }

    /// Decode a raw log through a `sol!` event type.
    pub fn parse_typed<E: SolEvent>(&self, log: &Log) -> Result<E, BindError> {
        E::decode_log(&log.inner)
            .map(|decoded| decoded.data)
            .map_err(|e| BindError::decode(E::SIGNATURE, e))
    }

    async fn call_raw(
        &self,
        opts: &CallOptions,
        method: &str,
        calldata: Bytes,
    ) -> Result<Bytes, BindError> {
        let mut request = TransactionRequest::default()
            .to(self.address)
            .input(calldata.into());
        if let Some(from) = opts.from {
            request = request.from(from);
        }

        trace!(method, address = %self.address, block = ?opts.block, "eth_call");
        cancellable(
            opts.cancel.as_ref(),
            self.transport.eth_call(request, opts.block),
        )
        .await?
        .map_err(|source| self.call_error(method, source))
    }

    fn call_error(&self, method: &str, source: TransportError) -> BindError {
        let reason = source
            .revert_data()
            .and_then(|data| self.descriptor.decode_revert(data));
        ContractCallError {
            method: method.to_string(),
            reason,
            source,
        }
        .into()
    }

    /// Empty return data: either nothing is deployed there, or the output is malformed.
    async fn empty_output(&self, opts: &CallOptions, method: &str) -> BindError {
        let code = cancellable(
            opts.cancel.as_ref(),
            self.transport.code_at(self.address, opts.block),
        )
        .await;
        match code {
            Ok(Ok(code)) if code.is_empty() => BindError::NoCode(self.address),
            Ok(Ok(_)) => BindError::decode(method, "empty return data"),
            Ok(Err(err)) => err.into(),
            Err(err) => err,
        }
    }
}

/// Sign (when a signer is set) and submit a transaction request.
async fn submit<T: Transport + ?Sized>(
    transport: &T,
    opts: &TransactOptions,
    method: &str,
    request: TransactionRequest,
) -> Result<PendingTransaction, BindError> {
    let nonce = request.nonce;

    let sent = match &opts.signer {
        Some(signer) => {
            let raw = cancellable(opts.cancel.as_ref(), (**signer)(request))
                .await?
                .map_err(|e| BindError::Signer {
                    method: method.to_string(),
                    reason: e.to_string(),
                })?;
            cancellable(opts.cancel.as_ref(), transport.submit_raw_transaction(raw)).await?
        }
        None => cancellable(opts.cancel.as_ref(), transport.submit_transaction(request)).await?,
    };

    let tx_hash = sent.map_err(|source| BindError::SubmissionFailed {
        method: method.to_string(),
        source,
    })?;
    debug!(method, %tx_hash, ?nonce, "Transaction submitted");

    Ok(PendingTransaction { tx_hash, nonce })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{
        echo_signer, mock_log, panicking_signer, MockTransport, Request, TOKEN_ABI,
        TOKEN_BYTECODE,
    };
    use alloy_primitives::{keccak256, U256};
    use alloy_rpc_types_eth::BlockId;
    use alloy_sol_types::sol;
    use std::time::Duration;
    use tokio::time::timeout;
    use tokio_util::sync::CancellationToken;

    sol! {
        interface IToken {
            function balanceOf(address owner) external view returns (uint256);
            function transfer(address to, uint256 amount) external returns (bool);
            event Transfer(address indexed from, address indexed to, uint256 value);
        }
    }

    const TOKEN: Address = Address::repeat_byte(0xcc);
    const SENDER: Address = Address::repeat_byte(0x5e);

    fn descriptor() -> Arc<ContractDescriptor> {
        Arc::new(ContractDescriptor::load("Token", TOKEN_ABI, Some(TOKEN_BYTECODE)).unwrap())
    }

    fn bind(transport: &MockTransport) -> BoundContract<MockTransport> {
        BoundContract::new(TOKEN, descriptor(), Arc::new(transport.clone()))
    }

    fn selector(method: &str) -> alloy_primitives::Selector {
        descriptor().function(method).unwrap().selector()
    }

    fn uint(value: u64) -> DynSolValue {
        DynSolValue::Uint(U256::from(value), 256)
    }

    fn word(value: u8) -> Vec<u8> {
        let mut word = vec![0u8; 32];
        word[31] = value;
        word
    }

    fn transfer_log(to: Address, value: u64, block: u64, index: u64) -> Log {
        mock_log(
            TOKEN,
            vec![
                IToken::Transfer::SIGNATURE_HASH,
                Address::ZERO.into_word(),
                to.into_word(),
            ],
            uint(value).abi_encode().into(),
            block,
            index,
        )
    }

    async fn recv_value(rx: &mut mpsc::Receiver<EventRecord>) -> U256 {
        let record = timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("timed out waiting for event")
            .expect("sink closed");
        record.get("value").unwrap().as_uint().unwrap().0
    }

    #[tokio::test]
    async fn test_call_decodes_canned_result() {
        let transport = MockTransport::new().with_call_result(selector("balanceOf"), word(0x2a));
        let contract = bind(&transport);

        let output = contract
            .call(
                &CallOptions::default(),
                "balanceOf",
                &[DynSolValue::Address(SENDER)],
            )
            .await
            .unwrap();
        assert_eq!(output.into_uint().unwrap(), U256::from(42));

        match &transport.requests()[..] {
            [Request::Call { request, block }] => {
                assert_eq!(request.to, Some(TxKind::Call(TOKEN)));
                assert_eq!(*block, BlockId::latest());
            }
            other => panic!("unexpected requests: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_call_typed_matches_dynamic_call() {
        let transport = MockTransport::new().with_call_result(selector("balanceOf"), word(7));
        let contract = bind(&transport);

        let typed = contract
            .call_typed(
                &CallOptions::default().pending(),
                &IToken::balanceOfCall { owner: SENDER },
            )
            .await
            .unwrap();
        assert_eq!(typed, U256::from(7));

        match &transport.requests()[..] {
            [Request::Call { block, .. }] => assert_eq!(*block, BlockId::pending()),
            other => panic!("unexpected requests: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_call_error_carries_custom_revert_reason() {
        let error = descriptor()
            .abi()
            .errors()
            .find(|error| error.name == "InsufficientBalance")
            .unwrap()
            .selector();
        let mut data = error.to_vec();
        data.extend(DynSolValue::Tuple(vec![uint(1), uint(5)]).abi_encode_params());

        let transport = MockTransport::new().with_call_error(
            selector("balanceOf"),
            TransportError::Rpc {
                code: 3,
                message: "execution reverted".to_string(),
                data: Some(data.into()),
            },
        );
        let contract = bind(&transport);

        let err = contract
            .call(
                &CallOptions::default(),
                "balanceOf",
                &[DynSolValue::Address(SENDER)],
            )
            .await
            .unwrap_err();
        match err {
            BindError::ContractCall(err) => {
                assert_eq!(err.method, "balanceOf(address)");
                assert_eq!(err.reason.as_deref(), Some("InsufficientBalance(1, 5)"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_empty_result_checks_for_code() {
        let transport = MockTransport::new();
        let err = bind(&transport)
            .call(&CallOptions::default(), "name", &[])
            .await
            .unwrap_err();
        assert_eq!(err, BindError::NoCode(TOKEN));

        let transport = MockTransport::new().with_code(TOKEN, vec![0x60, 0x80]);
        let err = bind(&transport)
            .call(&CallOptions::default(), "name", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, BindError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_value_on_non_payable_fails_before_io() {
        let transport = MockTransport::new();
        let opts = TransactOptions::new(SENDER)
            .with_value(U256::from(1))
            .with_signer(panicking_signer());

        let err = bind(&transport)
            .transact(&opts, "transfer", &[DynSolValue::Address(SENDER), uint(1)])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            BindError::Encoding(EncodingError::NonPayable { .. })
        ));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_bad_arguments_fail_before_io() {
        let transport = MockTransport::new();
        let err = bind(&transport)
            .transact(
                &TransactOptions::new(SENDER),
                "transfer",
                &[uint(1), DynSolValue::Address(SENDER)],
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            BindError::Encoding(EncodingError::ArgumentType { .. })
        ));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_transact_through_transport() {
        let transport = MockTransport::new();
        let contract = bind(&transport);
        let args = [DynSolValue::Address(SENDER), uint(9)];

        let pending = contract
            .transact(&TransactOptions::new(SENDER), "transfer", &args)
            .await
            .unwrap();
        assert!(pending.nonce.is_none());

        let expected = contract
            .descriptor()
            .function("transfer")
            .unwrap()
            .encode_input(&args)
            .unwrap();
        match &transport.requests()[..] {
            [Request::Submit(request)] => {
                assert_eq!(request.from, Some(SENDER));
                assert_eq!(request.to, Some(TxKind::Call(TOKEN)));
                assert_eq!(request.input.input(), Some(&expected));
            }
            other => panic!("unexpected requests: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_transact_typed_with_signer_sends_raw() {
        let transport = MockTransport::new();
        let contract = bind(&transport);
        let call = IToken::transferCall {
            to: SENDER,
            amount: U256::from(3),
        };

        let opts = TransactOptions::new(SENDER).with_signer(echo_signer());
        let pending = contract.transact_typed(&opts, &call).await.unwrap();

        assert_eq!(pending.tx_hash, keccak256(call.abi_encode()));
        assert_eq!(
            transport.requests(),
            vec![Request::SubmitRaw(call.abi_encode().into())]
        );
    }

    #[tokio::test]
    async fn test_rejected_submission_is_reported() {
        let transport = MockTransport::new().reject_submissions(TransportError::Rpc {
            code: -32000,
            message: "nonce too low".to_string(),
            data: None,
        });

        let err = bind(&transport)
            .transact(&TransactOptions::new(SENDER), "deposit", &[])
            .await
            .unwrap_err();
        match err {
            BindError::SubmissionFailed { method, source } => {
                assert_eq!(method, "deposit()");
                assert!(source.to_string().contains("nonce too low"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(transport.submissions(), 1);
    }

    #[tokio::test]
    async fn test_deploy_precomputes_address_from_nonce() {
        let transport = MockTransport::new().with_nonce(SENDER, 5);
        let args = [DynSolValue::String("Kroma".to_string()), uint(1_000)];

        let deployment = BoundContract::deploy(
            descriptor(),
            Arc::new(transport.clone()),
            &TransactOptions::new(SENDER),
            &args,
        )
        .await
        .unwrap();

        assert_eq!(deployment.address, SENDER.create(5));
        assert_eq!(deployment.contract.address(), deployment.address);
        assert_eq!(deployment.transaction.nonce, Some(5));

        let requests = transport.requests();
        assert_eq!(requests[0], Request::PendingNonce(SENDER));
        match &requests[1] {
            Request::Submit(request) => {
                assert_eq!(request.to, Some(TxKind::Create));
                assert_eq!(request.nonce, Some(5));
                let code = request.input.input().unwrap();
                assert!(code.starts_with(descriptor().bytecode().unwrap()));
            }
            other => panic!("unexpected request: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_deploy_without_bytecode() {
        let bare = Arc::new(ContractDescriptor::load("Token", TOKEN_ABI, None).unwrap());
        let transport = MockTransport::new();
        let err = BoundContract::deploy(
            bare,
            Arc::new(transport.clone()),
            &TransactOptions::new(SENDER),
            &[DynSolValue::String("Kroma".to_string()), uint(1)],
        )
        .await
        .unwrap_err();
        assert_eq!(err, BindError::MissingBytecode("Token".to_string()));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_transfer_requires_receive() {
        let transport = MockTransport::new();
        let opts = TransactOptions::new(SENDER).with_value(U256::from(10));
        bind(&transport).transfer(&opts).await.unwrap();
        match &transport.requests()[..] {
            [Request::Submit(request)] => {
                assert_eq!(request.value, Some(U256::from(10)));
                assert!(request.input.input().is_none());
            }
            other => panic!("unexpected requests: {other:?}"),
        }

        let abi = r#"[{"type":"function","name":"owner","inputs":[],"outputs":[{"name":"","type":"address"}],"stateMutability":"view"}]"#;
        let plain = Arc::new(ContractDescriptor::load("Plain", abi, None).unwrap());
        let transport = MockTransport::new();
        let contract = BoundContract::new(TOKEN, plain, Arc::new(transport.clone()));
        let err = contract.transfer(&opts).await.unwrap_err();
        assert!(matches!(
            err,
            BindError::Encoding(EncodingError::NoReceive { .. })
        ));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_parse_typed_agrees_with_dynamic_parse() {
        let contract = bind(&MockTransport::new());
        let log = transfer_log(SENDER, 11, 4, 2);

        let typed: IToken::Transfer = contract.parse_typed(&log).unwrap();
        let dynamic = contract.parse("Transfer", &log).unwrap();
        assert_eq!(typed.to, SENDER);
        assert_eq!(
            dynamic.get("value"),
            Some(&DynSolValue::Uint(typed.value, 256))
        );
    }

    #[tokio::test]
    async fn test_session_uses_preset_options() {
        let transport = MockTransport::new().with_call_result(selector("balanceOf"), word(1));
        let session = bind(&transport).session(
            CallOptions::default().at_block(77),
            TransactOptions::new(SENDER),
        );

        session
            .call("balanceOf", &[DynSolValue::Address(SENDER)])
            .await
            .unwrap();
        session.transact("deposit", &[]).await.unwrap();

        match &transport.requests()[..] {
            [Request::Call { block, .. }, Request::Submit(request)] => {
                assert_eq!(*block, BlockId::number(77));
                assert_eq!(request.from, Some(SENDER));
            }
            other => panic!("unexpected requests: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_watch_backfills_then_streams_without_duplicates() {
        let bob = Address::repeat_byte(0xb2);
        let transport = MockTransport::new()
            .with_block_number(10)
            .with_logs(vec![transfer_log(bob, 2, 10, 1), transfer_log(bob, 1, 3, 0)]);
        let live = transport.live_logs();
        live.send(Ok(transfer_log(bob, 2, 10, 1))).unwrap();
        live.send(Ok(transfer_log(bob, 3, 11, 0))).unwrap();

        let (sink, mut rx) = mpsc::channel(16);
        let subscription = bind(&transport)
            .watch(&WatchOptions::from_block(0), "Transfer", &[], sink)
            .await
            .unwrap();

        assert_eq!(recv_value(&mut rx).await, U256::from(1));
        assert_eq!(recv_value(&mut rx).await, U256::from(2));
        assert_eq!(recv_value(&mut rx).await, U256::from(3));

        subscription.unsubscribe();
        assert_eq!(subscription.join().await, Ok(()));

        let requests = transport.requests();
        let stream = requests
            .iter()
            .position(|r| matches!(r, Request::Stream(_)))
            .unwrap();
        let backfill = requests
            .iter()
            .position(|r| matches!(r, Request::Logs(_)))
            .unwrap();
        assert!(stream < backfill);
    }

    #[tokio::test]
    async fn test_watch_applies_indexed_filter() {
        let alice = Address::repeat_byte(0xa1);
        let bob = Address::repeat_byte(0xb2);
        let transport = MockTransport::new();
        let live = transport.live_logs();
        live.send(Ok(transfer_log(alice, 1, 1, 0))).unwrap();
        live.send(Ok(transfer_log(bob, 2, 2, 0))).unwrap();

        let (sink, mut rx) = mpsc::channel(16);
        let subscription = bind(&transport)
            .watch(
                &WatchOptions::default(),
                "Transfer",
                &[vec![], vec![DynSolValue::Address(bob)]],
                sink,
            )
            .await
            .unwrap();

        assert_eq!(recv_value(&mut rx).await, U256::from(2));
        drop(subscription);
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_watch_stops_on_decode_failure() {
        let transport = MockTransport::new();
        let live = transport.live_logs();
        let mut bogus = transfer_log(SENDER, 1, 1, 0);
        bogus.inner.data = alloy_primitives::LogData::new_unchecked(
            bogus.topics().to_vec(),
            Bytes::from_static(&[1, 2, 3]),
        );
        live.send(Ok(bogus)).unwrap();

        let (sink, _rx) = mpsc::channel(16);
        let subscription = bind(&transport)
            .watch(&WatchOptions::default(), "Transfer", &[], sink)
            .await
            .unwrap();
        let result = timeout(Duration::from_secs(5), subscription.join())
            .await
            .unwrap();
        assert!(matches!(result, Err(BindError::Decode { .. })));
    }

    #[tokio::test]
    async fn test_watch_ends_cleanly_when_receiver_dropped() {
        let transport = MockTransport::new();
        let live = transport.live_logs();

        let (sink, rx) = mpsc::channel(1);
        let subscription = bind(&transport)
            .watch(&WatchOptions::default(), "Transfer", &[], sink)
            .await
            .unwrap();
        drop(rx);
        live.send(Ok(transfer_log(SENDER, 1, 1, 0))).unwrap();

        let result = timeout(Duration::from_secs(5), subscription.join())
            .await
            .unwrap();
        assert_eq!(result, Ok(()));
    }

    #[tokio::test]
    async fn test_dropping_subscription_keeps_caller_token() {
        let transport = MockTransport::new().with_call_result(selector("balanceOf"), word(9));
        let _live = transport.live_logs();
        let contract = bind(&transport);
        let shared = CancellationToken::new();

        let (sink, _rx) = mpsc::channel(1);
        let subscription = contract
            .watch(
                &WatchOptions::default().with_cancel(shared.clone()),
                "Transfer",
                &[],
                sink,
            )
            .await
            .unwrap();
        drop(subscription);
        assert!(!shared.is_cancelled());

        let output = contract
            .call(
                &CallOptions::default().with_cancel(shared.clone()),
                "balanceOf",
                &[DynSolValue::Address(SENDER)],
            )
            .await
            .unwrap();
        assert_eq!(output, CallOutput::Value(uint(9)));
    }

    #[tokio::test]
    async fn test_caller_token_stops_watch() {
        let transport = MockTransport::new();
        let _live = transport.live_logs();
        let shared = CancellationToken::new();

        let (sink, _rx) = mpsc::channel(1);
        let subscription = bind(&transport)
            .watch(
                &WatchOptions::default().with_cancel(shared.clone()),
                "Transfer",
                &[],
                sink,
            )
            .await
            .unwrap();
        shared.cancel();
        let result = timeout(Duration::from_secs(5), subscription.join())
            .await
            .unwrap();
        assert_eq!(result, Ok(()));
    }

    #[tokio::test]
    async fn test_unsubscribe_frees_watch_blocked_on_full_sink() {
        let transport = MockTransport::new();
        let live = transport.live_logs();

        let (sink, mut rx) = mpsc::channel(1);
        let subscription = bind(&transport)
            .watch(&WatchOptions::default(), "Transfer", &[], sink)
            .await
            .unwrap();
        live.send(Ok(transfer_log(SENDER, 1, 1, 0))).unwrap();
        live.send(Ok(transfer_log(SENDER, 2, 2, 0))).unwrap();
        live.send(Ok(transfer_log(SENDER, 3, 3, 0))).unwrap();

        // The first record fills the sink; the task then parks on the second.
        tokio::time::sleep(Duration::from_millis(100)).await;

        subscription.unsubscribe();
        let result = timeout(Duration::from_secs(5), subscription.join())
            .await
            .unwrap();
        assert_eq!(result, Ok(()));

        assert_eq!(recv_value(&mut rx).await, U256::from(1));
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_watch_reports_closed_stream() {
        let transport = MockTransport::new();
        drop(transport.live_logs());

        let (sink, _rx) = mpsc::channel(1);
        let subscription = bind(&transport)
            .watch(&WatchOptions::default(), "Transfer", &[], sink)
            .await
            .unwrap();
        let result = timeout(Duration::from_secs(5), subscription.join())
            .await
            .unwrap();
        assert_eq!(
            result,
            Err(BindError::Transport(TransportError::SubscriptionClosed))
        );
    }
}
