use crate::predeploys;
use alloy_primitives::Address;
use contract::{BindError, ContractDescriptor};
use std::{
    fmt,
    str::FromStr,
    sync::{Arc, OnceLock},
};
use thiserror::Error;

/// Chain a contract is deployed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    L1,
    L2,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown Kroma contract `{0}`")]
pub struct UnknownContract(pub String);

/// Kroma contracts with a shipped ABI and creation code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KromaContract {
    GasPriceOracle,
    KromaMintableERC20,
    KromaMintableERC20Factory,
    L1StandardBridge,
    L2OutputOracle,
    L2ToL1MessagePasser,
    SecurityCouncil,
    ValidatorPool,
    ValidatorRewardVault,
}

const COUNT: usize = KromaContract::ALL.len();

struct Artifact {
    abi: &'static str,
    bytecode: &'static str,
}

macro_rules! artifact {
    ($name:literal) => {
        Artifact {
            abi: include_str!(concat!("../artifacts/", $name, ".json")),
            bytecode: include_str!(concat!("../artifacts/", $name, ".bin")),
        }
    };
}

impl KromaContract {
    pub const ALL: [Self; 9] = [
        Self::GasPriceOracle,
        Self::KromaMintableERC20,
        Self::KromaMintableERC20Factory,
        Self::L1StandardBridge,
        Self::L2OutputOracle,
        Self::L2ToL1MessagePasser,
        Self::SecurityCouncil,
        Self::ValidatorPool,
        Self::ValidatorRewardVault,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::GasPriceOracle => "GasPriceOracle",
            Self::KromaMintableERC20 => "KromaMintableERC20",
            Self::KromaMintableERC20Factory => "KromaMintableERC20Factory",
            Self::L1StandardBridge => "L1StandardBridge",
            Self::L2OutputOracle => "L2OutputOracle",
            Self::L2ToL1MessagePasser => "L2ToL1MessagePasser",
            Self::SecurityCouncil => "SecurityCouncil",
            Self::ValidatorPool => "ValidatorPool",
            Self::ValidatorRewardVault => "ValidatorRewardVault",
        }
    }

    pub const fn layer(self) -> Layer {
        match self {
            Self::L1StandardBridge
            | Self::L2OutputOracle
            | Self::SecurityCouncil
            | Self::ValidatorPool => Layer::L1,
            Self::GasPriceOracle
            | Self::KromaMintableERC20
            | Self::KromaMintableERC20Factory
            | Self::L2ToL1MessagePasser
            | Self::ValidatorRewardVault => Layer::L2,
        }
    }

    /// Fixed L2 address for contracts deployed at genesis.
    pub const fn predeploy(self) -> Option<Address> {
        match self {
            Self::GasPriceOracle => Some(predeploys::GAS_PRICE_ORACLE),
            Self::KromaMintableERC20Factory => Some(predeploys::KROMA_MINTABLE_ERC20_FACTORY),
            Self::L2ToL1MessagePasser => Some(predeploys::L2_TO_L1_MESSAGE_PASSER),
            Self::ValidatorRewardVault => Some(predeploys::VALIDATOR_REWARD_VAULT),
            _ => None,
        }
    }

    const fn artifact(self) -> Artifact {
        match self {
            Self::GasPriceOracle => artifact!("GasPriceOracle"),
            Self::KromaMintableERC20 => artifact!("KromaMintableERC20"),
            Self::KromaMintableERC20Factory => artifact!("KromaMintableERC20Factory"),
            Self::L1StandardBridge => artifact!("L1StandardBridge"),
            Self::L2OutputOracle => artifact!("L2OutputOracle"),
            Self::L2ToL1MessagePasser => artifact!("L2ToL1MessagePasser"),
            Self::SecurityCouncil => artifact!("SecurityCouncil"),
            Self::ValidatorPool => artifact!("ValidatorPool"),
            Self::ValidatorRewardVault => artifact!("ValidatorRewardVault"),
        }
    }

    /// The contract's ABI as shipped, in JSON.
    pub const fn abi_json(self) -> &'static str {
        self.artifact().abi
    }

    /// Creation code as a `0x`-prefixed hex string.
    pub fn bytecode_hex(self) -> &'static str {
        self.artifact().bytecode.trim()
    }

    /// Parsed descriptor for the contract.
    ///
    /// Artifacts are parsed on first use and shared afterwards, so repeated
    /// lookups return the same descriptor.
    pub fn descriptor(self) -> Result<Arc<ContractDescriptor>, BindError> {
        static DESCRIPTORS: [OnceLock<Result<Arc<ContractDescriptor>, BindError>>; COUNT] =
            [const { OnceLock::new() }; COUNT];

        DESCRIPTORS[self as usize]
            .get_or_init(|| {
                let artifact = self.artifact();
                ContractDescriptor::load(self.name(), artifact.abi, Some(artifact.bytecode))
                    .map(Arc::new)
            })
            .clone()
    }
}

impl fmt::Display for KromaContract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for KromaContract {
    type Err = UnknownContract;

    /// Case-insensitive match on the contract name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|contract| contract.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownContract(s.to_string()))
    }
}

/// Assert that a typed interface covers exactly the functions and events of
/// the shipped artifact.
#[cfg(test)]
pub(crate) fn assert_interface(
    contract: KromaContract,
    functions: &[[u8; 4]],
    events: &[[u8; 32]],
) {
    let descriptor = contract.descriptor().unwrap();

    let mut shipped: Vec<_> = descriptor.functions().iter().map(|f| f.selector().0).collect();
    let mut typed = functions.to_vec();
    shipped.sort_unstable();
    typed.sort_unstable();
    assert_eq!(typed, shipped, "{contract} functions");

    let mut shipped: Vec<_> = descriptor.events().iter().map(|e| e.selector().0).collect();
    let mut typed = events.to_vec();
    shipped.sort_unstable();
    typed.sort_unstable();
    assert_eq!(typed, shipped, "{contract} events");
}
