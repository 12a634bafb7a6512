//! Output and gas price oracle bindings.
//!
//! - L2OutputOracle (L1 contract holding checkpointed L2 output roots)
//! - GasPriceOracle (L2 predeploy exposing L1 fee parameters)

use alloy_sol_types::sol;

sol! {
    /// L2OutputOracle - L1 contract storing the L2 output roots submitted by validators
    interface IL2OutputOracle {
        /// Output root committed for an L2 block
        #[derive(Debug, PartialEq, Eq)]
        struct CheckpointOutput {
            address submitter;
            bytes32 outputRoot;
            uint128 timestamp;
            uint128 l2BlockNumber;
        }

        /// Emitted once the proxy has been initialized
        event Initialized(uint8 version);

        /// Emitted when an output is replaced after a successful challenge
        event OutputReplaced(uint256 indexed outputIndex, bytes32 newOutputRoot);

        /// Emitted when a validator submits a new output root
        event OutputSubmitted(
            bytes32 indexed outputRoot,
            uint256 indexed l2OutputIndex,
            uint256 indexed l2BlockNumber,
            uint256 l1Timestamp
        );

        function COLOSSEUM() external view returns (address);
        function FINALIZATION_PERIOD_SECONDS() external view returns (uint256);
        function L2_BLOCK_TIME() external view returns (uint256);
        function SUBMISSION_INTERVAL() external view returns (uint256);
        function VALIDATOR_POOL() external view returns (address);

        /// L2 timestamp for a given L2 block number
        function computeL2Timestamp(uint256 _l2BlockNumber) external view returns (uint256);

        /// Time at which an output becomes final
        function finalizedAt(uint256 _outputIndex) external view returns (uint256);

        /// Output stored at an index
        function getL2Output(uint256 _l2OutputIndex) external view returns (CheckpointOutput memory);

        /// First output checkpointing a block at or after the given L2 block
        function getL2OutputAfter(uint256 _l2BlockNumber) external view returns (CheckpointOutput memory);

        function getL2OutputIndexAfter(uint256 _l2BlockNumber) external view returns (uint256);

        function getSubmitter(uint256 _outputIndex) external view returns (address);

        function initialize(uint256 _startingBlockNumber, uint256 _startingTimestamp) external;

        function isFinalized(uint256 _outputIndex) external view returns (bool);

        /// Block number of the most recent output
        function latestBlockNumber() external view returns (uint256);

        function latestOutputIndex() external view returns (uint256);

        /// Next L2 block number an output is expected for
        function nextBlockNumber() external view returns (uint256);

        function nextOutputIndex() external view returns (uint256);

        /// Replace an output root; callable by the Colosseum only
        function replaceL2Output(
            uint256 _l2OutputIndex,
            bytes32 _newOutputRoot,
            address _submitter
        ) external;

        function startingBlockNumber() external view returns (uint256);
        function startingTimestamp() external view returns (uint256);

        /// Submit an output root; callable by the selected validator only
        function submitL2Output(
            bytes32 _outputRoot,
            uint256 _l2BlockNumber,
            bytes32 _l1BlockHash,
            uint256 _l1BlockNumber,
            uint256 _bondAmount
        ) external payable;

        function version() external view returns (string memory);
    }

    /// GasPriceOracle - L2 predeploy reporting the L1 data fee parameters
    /// Address: 0x4200000000000000000000000000000000000005
    interface IGasPriceOracle {
        function DECIMALS() external view returns (uint256);
        function baseFee() external view returns (uint256);
        function gasPrice() external view returns (uint256);

        /// L1 data fee for a serialized transaction
        function getL1Fee(bytes memory _data) external view returns (uint256);

        /// L1 gas used by a serialized transaction, overhead included
        function getL1GasUsed(bytes memory _data) external view returns (uint256);

        function l1BaseFee() external view returns (uint256);
        function overhead() external view returns (uint256);
        function scalar() external view returns (uint256);
        function version() external view returns (string memory);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{registry::assert_interface, KromaContract};
    use alloy_dyn_abi::DynSolValue;
    use alloy_primitives::{Address, B256, U256};
    use alloy_sol_types::{SolCall, SolValue};
    use contract::{test_utils::MockTransport, BoundContract, CallOptions, CallOutput};
    use std::sync::Arc;

    #[test]
    fn test_interfaces_match_artifacts() {
        assert_interface(
            KromaContract::L2OutputOracle,
            IL2OutputOracle::IL2OutputOracleCalls::SELECTORS,
            IL2OutputOracle::IL2OutputOracleEvents::SELECTORS,
        );
        assert_interface(
            KromaContract::GasPriceOracle,
            IGasPriceOracle::IGasPriceOracleCalls::SELECTORS,
            &[],
        );
    }

    #[test]
    fn test_submit_output_encodes_like_descriptor() {
        let root = B256::repeat_byte(0x11);
        let l1_hash = B256::repeat_byte(0x22);
        let typed = IL2OutputOracle::submitL2OutputCall {
            _outputRoot: root,
            _l2BlockNumber: U256::from(1800),
            _l1BlockHash: l1_hash,
            _l1BlockNumber: U256::from(42),
            _bondAmount: U256::from(10u64.pow(17)),
        }
        .abi_encode();

        let descriptor = KromaContract::L2OutputOracle.descriptor().unwrap();
        let dynamic = descriptor
            .function("submitL2Output")
            .unwrap()
            .encode_input(&[
                DynSolValue::FixedBytes(root, 32),
                DynSolValue::Uint(U256::from(1800), 256),
                DynSolValue::FixedBytes(l1_hash, 32),
                DynSolValue::Uint(U256::from(42), 256),
                DynSolValue::Uint(U256::from(10u64.pow(17)), 256),
            ])
            .unwrap();

        assert_eq!(dynamic, typed);
        assert!(descriptor.function("submitL2Output").unwrap().is_payable());
    }

    #[test]
    fn test_checkpoint_output_decodes_as_tuple() {
        let output = IL2OutputOracle::CheckpointOutput {
            submitter: Address::repeat_byte(0xaa),
            outputRoot: B256::repeat_byte(0x01),
            timestamp: 1_700_000_000,
            l2BlockNumber: 3600,
        };
        let encoded = output.abi_encode();

        let descriptor = KromaContract::L2OutputOracle.descriptor().unwrap();
        let decoded = descriptor
            .function("getL2Output")
            .unwrap()
            .decode_output(&encoded)
            .unwrap();

        let CallOutput::Value(DynSolValue::Tuple(fields)) = decoded else {
            panic!("expected a tuple, got {decoded:?}");
        };
        assert_eq!(fields[0], DynSolValue::Address(Address::repeat_byte(0xaa)));
        assert_eq!(fields[3], DynSolValue::Uint(U256::from(3600), 128));
    }

    #[tokio::test]
    async fn test_typed_call_through_bound_contract() {
        let oracle_address = Address::repeat_byte(0x04);
        let output = IL2OutputOracle::CheckpointOutput {
            submitter: Address::repeat_byte(0xaa),
            outputRoot: B256::repeat_byte(0x01),
            timestamp: 1_700_000_000,
            l2BlockNumber: 3600,
        };
        let transport = MockTransport::new()
            .with_call_result(IL2OutputOracle::getL2OutputCall::SELECTOR, output.abi_encode());
        let oracle = BoundContract::new(
            oracle_address,
            KromaContract::L2OutputOracle.descriptor().unwrap(),
            Arc::new(transport),
        );

        let fetched = oracle
            .call_typed(
                &CallOptions::default(),
                &IL2OutputOracle::getL2OutputCall {
                    _l2OutputIndex: U256::from(2),
                },
            )
            .await
            .unwrap();

        assert_eq!(fetched, output);
    }
}
