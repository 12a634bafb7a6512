//! Configuration types for Kroma contract bindings.
//!
//! This crate provides:
//! - Network configurations (mainnet, Sepolia, local devnet)
//! - L1 contract addresses for each network
//! - Errors raised while resolving configuration

pub mod network;

pub use network::{L1Config, L2Config, NetworkConfig, NetworkConfigBuilder, NetworkType};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown network `{0}`")]
    UnknownNetwork(String),

    #[error("no address configured for {contract} on {network:?}")]
    MissingAddress {
        contract: String,
        network: NetworkType,
    },
}
