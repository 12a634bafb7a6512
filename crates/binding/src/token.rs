//! Bridged token bindings.
//!
//! - KromaMintableERC20 (L2 representation of an L1 token)
//! - KromaMintableERC20Factory (L2 predeploy creating such tokens)

use alloy_sol_types::sol;

sol! {
    /// KromaMintableERC20 - ERC20 the standard bridge can mint and burn
    interface IKromaMintableERC20 {
        /// Emitted when tokens are transferred
        event Transfer(address indexed from, address indexed to, uint256 value);

        /// Emitted when an allowance is set
        event Approval(address indexed owner, address indexed spender, uint256 value);

        /// Emitted when the bridge burns tokens on withdrawal
        event Burn(address indexed account, uint256 amount);

        /// Emitted when the bridge mints tokens on deposit
        event Mint(address indexed account, uint256 amount);

        function BRIDGE() external view returns (address);
        function REMOTE_TOKEN() external view returns (address);

        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
        function balanceOf(address account) external view returns (uint256);

        /// Burn tokens; callable by the bridge only
        function burn(address _from, uint256 _amount) external;

        function decimals() external view returns (uint8);
        function decreaseAllowance(address spender, uint256 subtractedValue) external returns (bool);
        function increaseAllowance(address spender, uint256 addedValue) external returns (bool);

        /// Mint tokens; callable by the bridge only
        function mint(address _to, uint256 _amount) external;

        function name() external view returns (string memory);
        function supportsInterface(bytes4 _interfaceId) external pure returns (bool);
        function symbol() external view returns (string memory);
        function totalSupply() external view returns (uint256);
        function transfer(address to, uint256 amount) external returns (bool);
        function transferFrom(address from, address to, uint256 amount) external returns (bool);
        function version() external view returns (string memory);
    }

    /// KromaMintableERC20Factory - L2 predeploy deploying bridged tokens
    /// Address: 0x420000000000000000000000000000000000000B
    interface IKromaMintableERC20Factory {
        /// Emitted when a new bridged token is created
        event KromaMintableERC20Created(
            address indexed localToken,
            address indexed remoteToken,
            address deployer
        );

        function BRIDGE() external view returns (address);

        /// Create a bridged token for an L1 token
        function createKromaMintableERC20(
            address _remoteToken,
            string memory _name,
            string memory _symbol
        ) external returns (address);

        function version() external view returns (string memory);
    }
}
