//! RPC providers and transaction signers for bound contracts.
//!
//! Providers returned here implement [`contract::Transport`] through the
//! blanket impl for alloy providers, so they can back a `BoundContract`
//! directly.

mod remote_signer;
mod signer;

pub use contract::SignerFn;
pub use remote_signer::RemoteSigner;
pub use signer::{local_signer_fn, remote_signer_fn, SignerSource};

use alloy_provider::{Provider, ProviderBuilder};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ClientError {
    /// Error parsing or validating URLs
    #[error("Invalid RPC URL: {0}")]
    InvalidUrl(String),

    /// Error connecting to the RPC endpoint
    #[error("Connection error: {0}")]
    Connection(String),

    /// Endpoint serves a different chain than configured
    #[error("Chain id mismatch: expected {expected}, endpoint reports {actual}")]
    ChainMismatch { expected: u64, actual: u64 },

    /// Error with private key
    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),
}

/// Convenience function to create an ethereum rpc provider from url.
pub fn create_provider(rpc_url: &str) -> Result<impl Provider + Clone, ClientError> {
    let url = rpc_url
        .parse()
        .map_err(|e| ClientError::InvalidUrl(format!("{e}")))?;
    Ok(ProviderBuilder::new().connect_http(url))
}

/// Query the endpoint's chain id, optionally checking it against `expected`.
pub async fn check_connection<P: Provider>(
    provider: &P,
    expected: Option<u64>,
) -> Result<u64, ClientError> {
    let actual = provider
        .get_chain_id()
        .await
        .map_err(|e| ClientError::Connection(e.to_string()))?;
    debug!(chain_id = actual, "Connected to RPC endpoint");

    match expected {
        Some(expected) if expected != actual => Err(ClientError::ChainMismatch { expected, actual }),
        _ => Ok(actual),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_url() {
        assert!(matches!(
            create_provider("not a url"),
            Err(ClientError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_check_connection_unreachable() {
        let provider = create_provider("http://127.0.0.1:1").unwrap();
        assert!(matches!(
            check_connection(&provider, Some(255)).await,
            Err(ClientError::Connection(_))
        ));
    }
}
