//! Network configuration for the Kroma rollup.
//!
//! Provides chain ids, block times and the L1 contract addresses for each
//! supported network. L2 contracts live at fixed predeploy addresses and are
//! not part of this table.

use crate::ConfigError;
use alloy_primitives::{address, Address};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Network type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkType {
    Mainnet,
    Sepolia,
    /// Local devnet deployed at the well-known `0x69…` addresses.
    Devnet,
}

impl FromStr for NetworkType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Self::Mainnet),
            "sepolia" | "testnet" => Ok(Self::Sepolia),
            "devnet" => Ok(Self::Devnet),
            _ => Err(ConfigError::UnknownNetwork(s.to_string())),
        }
    }
}

/// L1 (settlement layer) configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct L1Config {
    /// Chain ID
    pub chain_id: u64,
    /// Block time in seconds (12 for Ethereum)
    pub block_time_secs: u64,
    #[serde(default)]
    pub l2_output_oracle: Option<Address>,
    #[serde(default)]
    pub validator_pool: Option<Address>,
    #[serde(default)]
    pub l1_standard_bridge: Option<Address>,
    #[serde(default)]
    pub security_council: Option<Address>,
}

impl L1Config {
    /// Ethereum mainnet. Contract addresses must be supplied by the operator.
    pub const fn mainnet() -> Self {
        Self {
            chain_id: 1,
            block_time_secs: 12,
            l2_output_oracle: None,
            validator_pool: None,
            l1_standard_bridge: None,
            security_council: None,
        }
    }

    /// Ethereum Sepolia. Contract addresses must be supplied by the operator.
    pub const fn sepolia() -> Self {
        Self {
            chain_id: 11155111,
            block_time_secs: 12,
            l2_output_oracle: None,
            validator_pool: None,
            l1_standard_bridge: None,
            security_council: None,
        }
    }

    /// Local devnet L1 with the deterministic dev deployment.
    pub const fn devnet() -> Self {
        Self {
            chain_id: 900,
            block_time_secs: 12,
            l2_output_oracle: Some(address!("0x6900000000000000000000000000000000000004")),
            validator_pool: Some(address!("0x6900000000000000000000000000000000000005")),
            l1_standard_bridge: Some(address!("0x6900000000000000000000000000000000000007")),
            security_council: None,
        }
    }
}

/// L2 (Kroma) configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct L2Config {
    /// Chain ID
    pub chain_id: u64,
    /// Block time in seconds (2 for Kroma)
    pub block_time_secs: u64,
}

impl L2Config {
    /// Kroma mainnet.
    pub const fn mainnet() -> Self {
        Self {
            chain_id: 255,
            block_time_secs: 2,
        }
    }

    /// Kroma Sepolia.
    pub const fn sepolia() -> Self {
        Self {
            chain_id: 2358,
            block_time_secs: 2,
        }
    }

    pub const fn devnet() -> Self {
        Self {
            chain_id: 901,
            block_time_secs: 2,
        }
    }
}

/// Complete network configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub network_type: NetworkType,
    pub l1: L1Config,
    pub l2: L2Config,
}

impl NetworkConfig {
    pub const fn mainnet() -> Self {
        Self {
            network_type: NetworkType::Mainnet,
            l1: L1Config::mainnet(),
            l2: L2Config::mainnet(),
        }
    }

    pub const fn sepolia() -> Self {
        Self {
            network_type: NetworkType::Sepolia,
            l1: L1Config::sepolia(),
            l2: L2Config::sepolia(),
        }
    }

    pub const fn devnet() -> Self {
        Self {
            network_type: NetworkType::Devnet,
            l1: L1Config::devnet(),
            l2: L2Config::devnet(),
        }
    }

    /// Create configuration from network type.
    pub const fn from_network_type(network_type: NetworkType) -> Self {
        match network_type {
            NetworkType::Mainnet => Self::mainnet(),
            NetworkType::Sepolia => Self::sepolia(),
            NetworkType::Devnet => Self::devnet(),
        }
    }

    /// Configured L1 address of a contract, by contract name.
    pub fn l1_contract(&self, name: &str) -> Option<Address> {
        match name {
            "L2OutputOracle" => self.l1.l2_output_oracle,
            "ValidatorPool" => self.l1.validator_pool,
            "L1StandardBridge" => self.l1.l1_standard_bridge,
            "SecurityCouncil" => self.l1.security_council,
            _ => None,
        }
    }

    /// Like [`Self::l1_contract`], failing when the address is not configured.
    pub fn require_l1_contract(&self, name: &str) -> Result<Address, ConfigError> {
        self.l1_contract(name)
            .ok_or_else(|| ConfigError::MissingAddress {
                contract: name.to_string(),
                network: self.network_type,
            })
    }
}

/// Builder for custom network configurations.
#[derive(Debug, Clone)]
pub struct NetworkConfigBuilder {
    config: NetworkConfig,
}

impl NetworkConfigBuilder {
    /// Start from the defaults of a network.
    pub const fn new(network_type: NetworkType) -> Self {
        Self {
            config: NetworkConfig::from_network_type(network_type),
        }
    }

    pub const fn l1_chain_id(mut self, chain_id: u64) -> Self {
        self.config.l1.chain_id = chain_id;
        self
    }

    pub const fn l2_chain_id(mut self, chain_id: u64) -> Self {
        self.config.l2.chain_id = chain_id;
        self
    }

    /// Override the L2OutputOracle address.
    pub const fn l2_output_oracle(mut self, address: Address) -> Self {
        self.config.l1.l2_output_oracle = Some(address);
        self
    }

    /// Override the ValidatorPool address.
    pub const fn validator_pool(mut self, address: Address) -> Self {
        self.config.l1.validator_pool = Some(address);
        self
    }

    /// Override the L1StandardBridge address.
    pub const fn l1_standard_bridge(mut self, address: Address) -> Self {
        self.config.l1.l1_standard_bridge = Some(address);
        self
    }

    /// Override the SecurityCouncil address.
    pub const fn security_council(mut self, address: Address) -> Self {
        self.config.l1.security_council = Some(address);
        self
    }

    /// Build the network configuration.
    pub const fn build(self) -> NetworkConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mainnet_config() {
        let config = NetworkConfig::mainnet();
        assert_eq!(config.l1.chain_id, 1);
        assert_eq!(config.l2.chain_id, 255);
        assert_eq!(config.l2.block_time_secs, 2);
        assert_eq!(config.network_type, NetworkType::Mainnet);
        assert_eq!(config.l1_contract("L2OutputOracle"), None);
    }

    #[test]
    fn test_sepolia_config() {
        let config = NetworkConfig::sepolia();
        assert_eq!(config.l1.chain_id, 11155111);
        assert_eq!(config.l2.chain_id, 2358);
        assert_eq!(config.network_type, NetworkType::Sepolia);
    }

    #[test]
    fn test_devnet_addresses() {
        let config = NetworkConfig::devnet();
        assert_eq!(
            config.l1_contract("ValidatorPool"),
            Some(address!("0x6900000000000000000000000000000000000005"))
        );
        assert_eq!(config.l1_contract("SecurityCouncil"), None);
        assert_eq!(config.l1_contract("GasPriceOracle"), None);
    }

    #[test]
    fn test_custom_config_builder() {
        let oracle = address!("1111111111111111111111111111111111111111");

        let config = NetworkConfigBuilder::new(NetworkType::Sepolia)
            .l2_output_oracle(oracle)
            .l2_chain_id(7)
            .build();

        assert_eq!(config.l1_contract("L2OutputOracle"), Some(oracle));
        assert_eq!(config.l2.chain_id, 7);
        assert_eq!(config.network_type, NetworkType::Sepolia);
    }

    #[test]
    fn test_require_missing_address() {
        let err = NetworkConfig::mainnet()
            .require_l1_contract("L1StandardBridge")
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "no address configured for L1StandardBridge on Mainnet"
        );
    }

    #[test]
    fn test_deserialize_from_toml() {
        let config: NetworkConfig = toml::from_str(
            r#"
            network_type = "sepolia"

            [l1]
            chain_id = 11155111
            block_time_secs = 12
            validator_pool = "0x2222222222222222222222222222222222222222"

            [l2]
            chain_id = 2358
            block_time_secs = 2
            "#,
        )
        .unwrap();

        assert_eq!(config.network_type, NetworkType::Sepolia);
        assert_eq!(
            config.l1_contract("ValidatorPool"),
            Some(address!("2222222222222222222222222222222222222222"))
        );
        assert_eq!(config.l1.l2_output_oracle, None);
    }

    #[test]
    fn test_network_type_from_str() {
        assert_eq!("Mainnet".parse::<NetworkType>().unwrap(), NetworkType::Mainnet);
        assert_eq!("testnet".parse::<NetworkType>().unwrap(), NetworkType::Sepolia);
        assert!(matches!(
            "goerli".parse::<NetworkType>(),
            Err(ConfigError::UnknownNetwork(name)) if name == "goerli"
        ));
    }
}
