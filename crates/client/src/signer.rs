//! Signer functions plugged into `TransactOptions`.

use crate::{ClientError, RemoteSigner, SignerFn};
use alloy_consensus::TxEnvelope;
use alloy_network::{eip2718::Encodable2718, EthereumWallet, TransactionBuilder};
use alloy_primitives::{Address, Bytes};
use alloy_provider::Provider;
use alloy_rpc_types::TransactionRequest;
use alloy_signer_local::PrivateKeySigner;
use std::{fmt, sync::Arc};
use tracing::trace;

/// Where transaction signatures come from.
#[derive(Clone)]
pub enum SignerSource {
    /// Hex-encoded private key held in process.
    Local { private_key: String },
    /// A signer-proxy answering `eth_signTransaction` for `address`.
    Remote { url: String, address: Address },
}

impl fmt::Debug for SignerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local { .. } => f.write_str("Local { .. }"),
            Self::Remote { url, address } => f
                .debug_struct("Remote")
                .field("url", url)
                .field("address", address)
                .finish(),
        }
    }
}

impl SignerSource {
    /// Build the signer function and return it with the sender address.
    pub fn into_signer_fn<P>(
        self,
        chain_id: u64,
        provider: P,
    ) -> Result<(Address, SignerFn), ClientError>
    where
        P: Provider + Clone + 'static,
    {
        match self {
            Self::Local { private_key } => {
                let signer: PrivateKeySigner = private_key
                    .parse()
                    .map_err(|e| ClientError::InvalidPrivateKey(format!("{e}")))?;
                let address = signer.address();
                Ok((address, local_signer_fn(signer, chain_id, provider)))
            }
            Self::Remote { url, address } => {
                let remote = RemoteSigner::new(url, address, chain_id);
                Ok((address, remote_signer_fn(remote, provider)))
            }
        }
    }
}

/// Create a SignerFn from a RemoteSigner and provider.
///
/// The provider is used to fill transaction fields (nonce, gas, fees) before
/// sending to the remote signer-proxy for signing.
pub fn remote_signer_fn<P>(remote: RemoteSigner, provider: P) -> SignerFn
where
    P: Provider + Clone + 'static,
{
    let from_address = remote.address();
    let chain_id = remote.chain_id();

    Arc::new(move |tx| {
        let remote = remote.clone();
        let provider = provider.clone();
        Box::pin(async move {
            let filled_tx = fill_transaction(tx, &provider, from_address, chain_id).await?;
            remote.sign_transaction(filled_tx).await
        })
    })
}

/// Create a SignerFn signing locally with `signer`.
///
/// The provider is used to fill transaction fields (nonce, gas, fees) before
/// signing.
pub fn local_signer_fn<P>(signer: PrivateKeySigner, chain_id: u64, provider: P) -> SignerFn
where
    P: Provider + Clone + 'static,
{
    let from_address = signer.address();
    let wallet = EthereumWallet::from(signer);

    Arc::new(move |tx: TransactionRequest| {
        let wallet = wallet.clone();
        let provider = provider.clone();
        Box::pin(async move {
            let filled_tx = fill_transaction(tx, &provider, from_address, chain_id).await?;

            let tx_envelope: TxEnvelope = filled_tx
                .build(&wallet)
                .await
                .map_err(|e| eyre::eyre!("{e}"))?;

            let mut encoded = Vec::new();
            tx_envelope.encode_2718(&mut encoded);
            Ok(Bytes::from(encoded))
        })
    })
}

/// Fill missing transaction fields using the provider.
///
/// Fields already set by the caller, such as a nonce resolved ahead of a
/// deployment, are left untouched.
async fn fill_transaction<P>(
    mut tx: TransactionRequest,
    provider: &P,
    from: Address,
    chain_id: u64,
) -> eyre::Result<TransactionRequest>
where
    P: Provider,
{
    if tx.from.is_none() {
        tx.from = Some(from);
    }

    if tx.chain_id.is_none() {
        tx.chain_id = Some(chain_id);
    }

    if tx.nonce.is_none() {
        let nonce = provider.get_transaction_count(from).pending().await?;
        tx.nonce = Some(nonce);
    }

    // Fees first: gas estimation may depend on them.
    if tx.gas_price.is_none()
        && (tx.max_fee_per_gas.is_none() || tx.max_priority_fee_per_gas.is_none())
    {
        let fee_estimate = provider.estimate_eip1559_fees().await?;
        if tx.max_fee_per_gas.is_none() {
            tx.max_fee_per_gas = Some(fee_estimate.max_fee_per_gas);
        }
        if tx.max_priority_fee_per_gas.is_none() {
            tx.max_priority_fee_per_gas = Some(fee_estimate.max_priority_fee_per_gas);
        }
    }

    if tx.gas.is_none() {
        let gas_estimate = provider.estimate_gas(tx.clone()).await?;
        // 20% headroom
        tx.gas = Some(gas_estimate + gas_estimate / 5);
    }

    trace!(nonce = ?tx.nonce, gas = ?tx.gas, "Filled transaction");
    Ok(tx)
}
