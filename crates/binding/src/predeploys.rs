//! L2 predeploy addresses.
//!
//! Every Kroma L2 genesis places these contracts at fixed addresses in the
//! `0x4200…` range. All of them except WETH9 sit behind a proxy.

use alloy_primitives::{address, Address};

pub const PROXY_ADMIN: Address = address!("0x4200000000000000000000000000000000000000");
pub const WETH9: Address = address!("0x4200000000000000000000000000000000000001");
pub const L1_BLOCK: Address = address!("0x4200000000000000000000000000000000000002");
pub const L2_TO_L1_MESSAGE_PASSER: Address =
    address!("0x4200000000000000000000000000000000000003");
pub const L2_CROSS_DOMAIN_MESSENGER: Address =
    address!("0x4200000000000000000000000000000000000004");
pub const GAS_PRICE_ORACLE: Address = address!("0x4200000000000000000000000000000000000005");
pub const PROTOCOL_VAULT: Address = address!("0x4200000000000000000000000000000000000006");
pub const L1_FEE_VAULT: Address = address!("0x4200000000000000000000000000000000000007");
pub const VALIDATOR_REWARD_VAULT: Address =
    address!("0x4200000000000000000000000000000000000008");
pub const L2_STANDARD_BRIDGE: Address = address!("0x4200000000000000000000000000000000000009");
pub const GOVERNANCE_TOKEN: Address = address!("0x4200000000000000000000000000000000000010");
pub const L2_ERC721_BRIDGE: Address = address!("0x420000000000000000000000000000000000000A");
pub const KROMA_MINTABLE_ERC20_FACTORY: Address =
    address!("0x420000000000000000000000000000000000000B");
pub const KROMA_MINTABLE_ERC721_FACTORY: Address =
    address!("0x420000000000000000000000000000000000000C");

/// All predeploys keyed by contract name.
pub const PREDEPLOYS: [(&str, Address); 14] = [
    ("ProxyAdmin", PROXY_ADMIN),
    ("WETH9", WETH9),
    ("L1Block", L1_BLOCK),
    ("L2ToL1MessagePasser", L2_TO_L1_MESSAGE_PASSER),
    ("L2CrossDomainMessenger", L2_CROSS_DOMAIN_MESSENGER),
    ("GasPriceOracle", GAS_PRICE_ORACLE),
    ("ProtocolVault", PROTOCOL_VAULT),
    ("L1FeeVault", L1_FEE_VAULT),
    ("ValidatorRewardVault", VALIDATOR_REWARD_VAULT),
    ("L2StandardBridge", L2_STANDARD_BRIDGE),
    ("GovernanceToken", GOVERNANCE_TOKEN),
    ("L2ERC721Bridge", L2_ERC721_BRIDGE),
    ("KromaMintableERC20Factory", KROMA_MINTABLE_ERC20_FACTORY),
    ("KromaMintableERC721Factory", KROMA_MINTABLE_ERC721_FACTORY),
];

/// Look up a predeploy by contract name.
pub fn by_name(name: &str) -> Option<Address> {
    PREDEPLOYS
        .iter()
        .find(|(predeploy, _)| *predeploy == name)
        .map(|(_, address)| *address)
}

/// Whether the predeploy at `address` sits behind a proxy.
pub fn is_proxied(address: Address) -> bool {
    address != WETH9
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_by_name() {
        assert_eq!(by_name("GasPriceOracle"), Some(GAS_PRICE_ORACLE));
        assert_eq!(
            by_name("KromaMintableERC721Factory"),
            Some(KROMA_MINTABLE_ERC721_FACTORY)
        );
        assert_eq!(by_name("OptimismPortal"), None);
    }

    #[test]
    fn test_only_weth_is_unproxied() {
        let unproxied: Vec<_> = PREDEPLOYS
            .iter()
            .filter(|(_, address)| !is_proxied(*address))
            .map(|(name, _)| *name)
            .collect();
        assert_eq!(unproxied, ["WETH9"]);
    }

    #[test]
    fn test_addresses_are_unique() {
        let mut addresses: Vec<_> = PREDEPLOYS.iter().map(|(_, a)| *a).collect();
        addresses.sort();
        addresses.dedup();
        assert_eq!(addresses.len(), PREDEPLOYS.len());
    }
}
