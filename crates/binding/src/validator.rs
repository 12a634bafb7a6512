//! Validator set bindings.
//!
//! - ValidatorPool (L1 contract managing validator deposits and output bonds)
//! - ValidatorRewardVault (L2 predeploy accruing validator rewards)

use alloy_sol_types::sol;

sol! {
    /// ValidatorPool - L1 contract holding validator deposits and bonds
    interface IValidatorPool {
        /// Bond locked for an output
        #[derive(Debug, PartialEq, Eq)]
        struct Bond {
            uint128 amount;
            uint128 expiresAt;
        }

        /// Emitted when a challenger increases the bond of an output
        event BondIncreased(
            address indexed challenger,
            uint256 indexed outputIndex,
            uint128 amount
        );

        /// Emitted when a bond is created for a submitted output
        event Bonded(
            address indexed submitter,
            uint256 indexed outputIndex,
            uint128 amount,
            uint128 expiresAt
        );

        event Initialized(uint8 version);

        /// Emitted when an expired bond is released
        event Unbonded(
            uint256 indexed outputIndex,
            address indexed recipient,
            uint128 amount
        );

        function L2_ORACLE() external view returns (address);
        function MAX_UNBOND() external view returns (uint256);
        function MIN_BOND_AMOUNT() external view returns (uint256);
        function NON_PENALTY_PERIOD() external view returns (uint256);
        function PENALTY_PERIOD() external view returns (uint256);
        function PORTAL() external view returns (address);
        function ROUND_DURATION() external view returns (uint256);
        function TRUSTED_VALIDATOR() external view returns (address);
        function VAULT_REWARD_GAS_LIMIT() external view returns (uint64);

        /// Deposited balance of a validator
        function balanceOf(address _addr) external view returns (uint256);

        function createBond(uint256 _outputIndex, uint128 _amount, uint128 _expiresAt) external;

        /// Deposit ETH to become a validator
        function deposit() external payable;

        function getBond(uint256 _outputIndex) external view returns (Bond memory);

        function increaseBond(address _challenger, uint256 _outputIndex) external;

        function initialize() external;

        function isValidator(address _addr) external view returns (bool);

        /// Validator selected to submit the next output
        function nextValidator() external view returns (address);

        /// Release expired bonds, paying out rewards
        function unbond() external;

        function validatorCount() external view returns (uint256);

        function version() external view returns (string memory);

        /// Withdraw deposited ETH
        function withdraw(uint256 _amount) external;
    }

    /// ValidatorRewardVault - L2 predeploy accruing rewards for output submitters
    /// Address: 0x4200000000000000000000000000000000000008
    interface IValidatorRewardVault {
        /// Emitted when a validator is rewarded for an output
        event Rewarded(
            address indexed validator,
            uint256 indexed l2BlockNumber,
            uint256 amount
        );

        /// Emitted when the vault balance is withdrawn to L1
        event Withdrawal(uint256 value, address to, address from);

        function MIN_WITHDRAWAL_AMOUNT() external view returns (uint256);
        function RECIPIENT() external view returns (address);
        function REWARD_DIVIDER() external view returns (uint256);
        function VALIDATOR_POOL() external view returns (address);

        /// Accrued reward balance of a validator
        function balanceOf(address _addr) external view returns (uint256);

        function reward(
            address _validator,
            uint256 _l2BlockNumber,
            uint256 _penaltyNum,
            uint256 _penaltyDenom
        ) external;

        function totalProcessed() external view returns (uint256);
        function totalReserved() external view returns (uint256);
        function version() external view returns (string memory);

        /// Withdraw the caller's rewards to L1
        function withdraw() external;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{registry::assert_interface, KromaContract};
    use alloy_primitives::{Address, U256};
    use alloy_sol_types::{SolCall, SolValue};
    use contract::{
        test_utils::{MockTransport, Request},
        BoundContract, CallOptions, EncodingError, BindError, TransactOptions,
    };
    use std::sync::Arc;

    const POOL: Address = Address::repeat_byte(0x05);
    const VALIDATOR: Address = Address::repeat_byte(0x77);

    fn pool(transport: &MockTransport) -> BoundContract<MockTransport> {
        BoundContract::new(
            POOL,
            KromaContract::ValidatorPool.descriptor().unwrap(),
            Arc::new(transport.clone()),
        )
    }

    #[test]
    fn test_interfaces_match_artifacts() {
        assert_interface(
            KromaContract::ValidatorPool,
            IValidatorPool::IValidatorPoolCalls::SELECTORS,
            IValidatorPool::IValidatorPoolEvents::SELECTORS,
        );
        assert_interface(
            KromaContract::ValidatorRewardVault,
            IValidatorRewardVault::IValidatorRewardVaultCalls::SELECTORS,
            IValidatorRewardVault::IValidatorRewardVaultEvents::SELECTORS,
        );
    }

    #[tokio::test]
    async fn test_deposit_carries_value() {
        let transport = MockTransport::new();
        let opts = TransactOptions::new(VALIDATOR).with_value(U256::from(10u64.pow(18)));

        pool(&transport)
            .transact_typed(&opts, &IValidatorPool::depositCall {})
            .await
            .unwrap();

        let Some(Request::Submit(request)) = transport.requests().pop() else {
            panic!("expected a submission");
        };
        assert_eq!(request.value, Some(U256::from(10u64.pow(18))));
        assert_eq!(request.from, Some(VALIDATOR));
        assert_eq!(
            request.input.input().map(|data| data.to_vec()),
            Some(IValidatorPool::depositCall::SELECTOR.to_vec())
        );
    }

    #[tokio::test]
    async fn test_withdraw_rejects_value() {
        let transport = MockTransport::new();
        let opts = TransactOptions::new(VALIDATOR).with_value(U256::from(1));

        let err = pool(&transport)
            .transact_typed(
                &opts,
                &IValidatorPool::withdrawCall {
                    _amount: U256::from(5),
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            BindError::Encoding(EncodingError::NonPayable { .. })
        ));
        assert_eq!(transport.submissions(), 0);
    }

    #[tokio::test]
    async fn test_get_bond() {
        let bond = IValidatorPool::Bond {
            amount: 2 * 10u128.pow(17),
            expiresAt: 1_700_604_800,
        };
        let transport = MockTransport::new()
            .with_call_result(IValidatorPool::getBondCall::SELECTOR, bond.abi_encode());

        let fetched = pool(&transport)
            .call_typed(
                &CallOptions::default(),
                &IValidatorPool::getBondCall {
                    _outputIndex: U256::from(9),
                },
            )
            .await
            .unwrap();
        assert_eq!(fetched, bond);

        let dynamic = pool(&transport)
            .call(
                &CallOptions::default(),
                "getBond",
                &[alloy_dyn_abi::DynSolValue::Uint(U256::from(9), 256)],
            )
            .await
            .unwrap();
        let formatted = contract::format_value(&dynamic.into_value().unwrap());
        assert_eq!(formatted, "(200000000000000000, 1700604800)");
    }
}
