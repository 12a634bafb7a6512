use alloy_primitives::Address;
use binding::{KromaContract, Layer};
use config::{NetworkConfig, NetworkType};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, path::Path, time::Duration};

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Top-level CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// L1 RPC endpoint url
    pub l1_rpc_url: String,

    /// L2 RPC endpoint url
    pub l2_rpc_url: String,

    /// Network whose defaults (chain ids, L1 addresses) apply
    #[serde(default = "default_network")]
    pub network: NetworkType,

    /// Contract address overrides, keyed by contract name
    #[serde(default)]
    pub contracts: BTreeMap<String, Address>,

    /// Serve Prometheus metrics on this port when set
    #[serde(default)]
    pub metrics_port: Option<u16>,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Poll interval for `watch`, in seconds
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Block span of each `eth_getLogs` request
    #[serde(default = "default_chunk_size")]
    pub chunk_size: u64,

    /// Signer-proxy endpoint used when no private key is given
    #[serde(default)]
    pub remote_signer_url: Option<String>,
}

const fn default_network() -> NetworkType {
    NetworkType::Mainnet
}

const fn default_poll_interval_secs() -> u64 {
    2
}

const fn default_chunk_size() -> u64 {
    contract::DEFAULT_CHUNK_SIZE
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> eyre::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;

        Ok(config)
    }

    pub const fn network_config(&self) -> NetworkConfig {
        NetworkConfig::from_network_type(self.network)
    }

    pub fn rpc_url(&self, layer: Layer) -> &str {
        match layer {
            Layer::L1 => &self.l1_rpc_url,
            Layer::L2 => &self.l2_rpc_url,
        }
    }

    pub const fn chain_id(&self, layer: Layer) -> u64 {
        let network = self.network_config();
        match layer {
            Layer::L1 => network.l1.chain_id,
            Layer::L2 => network.l2.chain_id,
        }
    }

    pub const fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Address of a contract: configured override, then L2 predeploy, then
    /// the network's L1 deployment.
    pub fn address_of(&self, contract: KromaContract) -> eyre::Result<Address> {
        if let Some(address) = self.contracts.get(contract.name()) {
            return Ok(*address);
        }
        if let Some(address) = contract.predeploy() {
            return Ok(address);
        }
        Ok(self.network_config().require_l1_contract(contract.name())?)
    }
}
