//! Bridge and withdrawal bindings.
//!
//! - L1StandardBridge (L1 side of the standard ETH/ERC20 bridge)
//! - L2ToL1MessagePasser (L2 predeploy for initiating withdrawals)

use alloy_sol_types::sol;

sol! {
    /// L1StandardBridge - L1 entry point for ETH and ERC20 deposits
    interface IL1StandardBridge {
        event ERC20BridgeFinalized(
            address indexed localToken,
            address indexed remoteToken,
            address indexed from,
            address to,
            uint256 amount,
            bytes extraData
        );

        event ERC20BridgeInitiated(
            address indexed localToken,
            address indexed remoteToken,
            address indexed from,
            address to,
            uint256 amount,
            bytes extraData
        );

        /// Emitted when an ETH withdrawal is finalized on L1
        event ETHBridgeFinalized(
            address indexed from,
            address indexed to,
            uint256 amount,
            bytes extraData
        );

        /// Emitted when an ETH deposit is initiated
        event ETHBridgeInitiated(
            address indexed from,
            address indexed to,
            uint256 amount,
            bytes extraData
        );

        function MESSENGER() external view returns (address);
        function OTHER_BRIDGE() external view returns (address);

        /// Deposit ERC20 tokens to the sender's address on L2
        function bridgeERC20(
            address _localToken,
            address _remoteToken,
            uint256 _amount,
            uint32 _minGasLimit,
            bytes calldata _extraData
        ) external;

        /// Deposit ERC20 tokens to a recipient on L2
        function bridgeERC20To(
            address _localToken,
            address _remoteToken,
            address _to,
            uint256 _amount,
            uint32 _minGasLimit,
            bytes calldata _extraData
        ) external;

        /// Deposit ETH to the sender's address on L2
        function bridgeETH(uint32 _minGasLimit, bytes calldata _extraData) external payable;

        /// Deposit ETH to a recipient on L2
        function bridgeETHTo(
            address _to,
            uint32 _minGasLimit,
            bytes calldata _extraData
        ) external payable;

        /// Amount of a local token deposited against a remote token
        function deposits(address, address) external view returns (uint256);

        function finalizeBridgeERC20(
            address _localToken,
            address _remoteToken,
            address _from,
            address _to,
            uint256 _amount,
            bytes calldata _extraData
        ) external;

        function finalizeBridgeETH(
            address _from,
            address _to,
            uint256 _amount,
            bytes calldata _extraData
        ) external payable;

        function version() external view returns (string memory);
    }

    /// L2ToL1MessagePasser - L2 predeploy contract for initiating withdrawals
    /// Address: 0x4200000000000000000000000000000000000003
    interface IL2ToL1MessagePasser {
        /// Emitted when a withdrawal is initiated on L2
        event MessagePassed(
            uint256 indexed nonce,
            address indexed sender,
            address indexed target,
            uint256 value,
            uint256 gasLimit,
            bytes data,
            bytes32 withdrawalHash
        );

        /// Emitted when the contract's ETH balance is burnt
        event WithdrawerBalanceBurnt(uint256 indexed amount);

        function MESSAGE_VERSION() external view returns (uint16);

        /// Burn the ETH held by the contract
        function burn() external;

        /// Initiate a withdrawal from L2 to L1
        function initiateWithdrawal(
            address _target,
            uint256 _gasLimit,
            bytes memory _data
        ) external payable;

        /// Current message nonce, with the message version in the top two bytes
        function messageNonce() external view returns (uint256);

        /// Whether a withdrawal hash has been sent
        function sentMessages(bytes32) external view returns (bool);

        function version() external view returns (string memory);
    }
}
