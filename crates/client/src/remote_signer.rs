//! Signing through a signer-proxy speaking `eth_signTransaction`.
//!
//! The proxy holds the key (HSM, KMS, enclave); this side only ships filled
//! requests and gets raw signed envelopes back.

use alloy_primitives::{Address, Bytes};
use alloy_rpc_types::eth::TransactionRequest;
use eyre::{bail, eyre, Result};
use serde::{Deserialize, Serialize};
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use tracing::debug;

/// Client for a signer-proxy bound to one account and chain.
#[derive(Debug, Clone)]
pub struct RemoteSigner {
    http: reqwest::Client,
    endpoint: String,
    account: Address,
    chain_id: u64,
    next_id: Arc<AtomicU64>,
}

impl RemoteSigner {
    pub fn new(endpoint: impl Into<String>, account: Address, chain_id: u64) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint, account, chain_id)
    }

    /// Reuse an existing HTTP client (timeouts, TLS settings).
    pub fn with_client(
        http: reqwest::Client,
        endpoint: impl Into<String>,
        account: Address,
        chain_id: u64,
    ) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            account,
            chain_id,
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    pub const fn address(&self) -> Address {
        self.account
    }

    pub const fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Have the proxy sign `tx` and return the raw envelope.
    ///
    /// `from` and `chain_id` are pinned to this signer's account and chain
    /// before the request leaves; a request naming another sender is refused.
    pub async fn sign_transaction(&self, tx: TransactionRequest) -> Result<Bytes> {
        let tx = self.pin(tx)?;
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = SignRequest {
            jsonrpc: "2.0",
            id,
            method: "eth_signTransaction",
            params: [tx],
        };

        debug!(endpoint = %self.endpoint, account = %self.account, id, "Requesting remote signature");
        let response = self.http.post(&self.endpoint).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            bail!("signer-proxy returned {status}: {text}");
        }

        signed_bytes(response.json().await?)
    }

    fn pin(&self, mut tx: TransactionRequest) -> Result<TransactionRequest> {
        match tx.from {
            Some(from) if from != self.account => {
                bail!("remote signer for {} cannot sign for {from}", self.account)
            }
            _ => tx.from = Some(self.account),
        }
        tx.chain_id = Some(self.chain_id);
        Ok(tx)
    }
}

/// Extract the raw transaction from a signer-proxy reply.
fn signed_bytes(reply: SignReply) -> Result<Bytes> {
    match reply {
        SignReply {
            result: Some(signed),
            ..
        } => signed
            .raw
            .parse()
            .map_err(|e| eyre!("signer-proxy returned malformed raw transaction: {e}")),
        SignReply {
            error: Some(error), ..
        } => bail!("JSON-RPC error {}: {}", error.code, error.message),
        SignReply { .. } => bail!("signer-proxy returned neither result nor error"),
    }
}

#[derive(Serialize)]
struct SignRequest {
    jsonrpc: &'static str,
    id: u64,
    method: &'static str,
    params: [TransactionRequest; 1],
}

#[derive(Deserialize)]
struct SignReply {
    result: Option<SignedTransaction>,
    error: Option<RpcFailure>,
}

#[derive(Deserialize)]
struct RpcFailure {
    code: i64,
    message: String,
}

/// `raw` is the RLP envelope, hex encoded.
#[derive(Deserialize)]
struct SignedTransaction {
    raw: String,
}
