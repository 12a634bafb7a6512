//! The seam between the façade and a JSON-RPC node.
//!
//! [`Transport`] is implemented for every [`Provider`], so any provider built
//! with `ProviderBuilder` (with or without a wallet) can back a bound
//! contract. Tests use the scripted transport in `test_utils`.

use crate::TransportError;
use alloy_primitives::{Address, Bytes, TxHash};
use alloy_provider::Provider;
use alloy_rpc_types_eth::{BlockId, Filter, Log, TransactionRequest};
use async_trait::async_trait;
use futures_util::{stream::BoxStream, StreamExt};
use std::time::Duration;

/// Stream of logs pushed by a live log watch.
pub type LogStream = BoxStream<'static, Result<Log, TransportError>>;

#[async_trait]
pub trait Transport: Send + Sync {
    /// `eth_call` at the given block.
    async fn eth_call(
        &self,
        request: TransactionRequest,
        block: BlockId,
    ) -> Result<Bytes, TransportError>;

    /// `eth_getCode` at the given block.
    async fn code_at(&self, address: Address, block: BlockId) -> Result<Bytes, TransportError>;

    /// Nonce of `address` including pending transactions.
    async fn pending_nonce(&self, address: Address) -> Result<u64, TransportError>;

    /// `eth_sendTransaction`: the node or the provider's wallet signs.
    async fn submit_transaction(
        &self,
        request: TransactionRequest,
    ) -> Result<TxHash, TransportError>;

    /// `eth_sendRawTransaction` with an already signed envelope.
    async fn submit_raw_transaction(&self, raw: Bytes) -> Result<TxHash, TransportError>;

    /// Current head block number.
    async fn latest_block(&self) -> Result<u64, TransportError>;

    /// `eth_getLogs` over the filter's block range.
    async fn query_logs(&self, filter: &Filter) -> Result<Vec<Log>, TransportError>;

    /// Install a live log filter and stream its matches.
    ///
    /// The filter must be installed when this returns, so logs emitted after
    /// the call are never missed.
    async fn log_stream(
        &self,
        filter: &Filter,
        poll_interval: Duration,
    ) -> Result<LogStream, TransportError>;
}

impl From<alloy_transport::TransportError> for TransportError {
    fn from(err: alloy_transport::TransportError) -> Self {
        match err.as_error_resp() {
            Some(payload) => Self::Rpc {
                code: payload.code,
                message: payload.message.to_string(),
                data: payload.as_revert_data(),
            },
            None => Self::Transport(err.to_string()),
        }
    }
}

#[async_trait]
impl<P> Transport for P
where
    P: Provider + Send + Sync,
{
    async fn eth_call(
        &self,
        request: TransactionRequest,
        block: BlockId,
    ) -> Result<Bytes, TransportError> {
        Ok(self.call(request).block(block).await?)
    }

    async fn code_at(&self, address: Address, block: BlockId) -> Result<Bytes, TransportError> {
        Ok(self.get_code_at(address).block_id(block).await?)
    }

    async fn pending_nonce(&self, address: Address) -> Result<u64, TransportError> {
        Ok(self.get_transaction_count(address).pending().await?)
    }

    async fn submit_transaction(
        &self,
        request: TransactionRequest,
    ) -> Result<TxHash, TransportError> {
        let pending = self.send_transaction(request).await?;
        Ok(*pending.tx_hash())
    }

    async fn submit_raw_transaction(&self, raw: Bytes) -> Result<TxHash, TransportError> {
        let pending = self.send_raw_transaction(&raw).await?;
        Ok(*pending.tx_hash())
    }

    async fn latest_block(&self) -> Result<u64, TransportError> {
        Ok(self.get_block_number().await?)
    }

    async fn query_logs(&self, filter: &Filter) -> Result<Vec<Log>, TransportError> {
        Ok(self.get_logs(filter).await?)
    }

    async fn log_stream(
        &self,
        filter: &Filter,
        poll_interval: Duration,
    ) -> Result<LogStream, TransportError> {
        let poller = self
            .watch_logs(filter)
            .await?
            .with_poll_interval(poll_interval);

        let stream = poller
            .into_stream()
            .flat_map(|logs| futures_util::stream::iter(logs.into_iter().map(Ok)));
        Ok(stream.boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_provider::ProviderBuilder;

    #[tokio::test]
    async fn test_unreachable_node_maps_to_transport_error() {
        let provider = ProviderBuilder::new().connect_http("http://127.0.0.1:1".parse().unwrap());
        let err = provider.latest_block().await.unwrap_err();
        assert!(matches!(err, TransportError::Transport(_)));
    }
}
