use ethers::contract::abigen;

abigen!(
    RlnRegistry,
    r#"[
        function MEMBERSHIP_DEPOSIT() external view returns (uint256)
        function register(uint256 pubkey) external payable
        event MemberRegistered(uint256 pubkey, uint256 index)
    ]"#
);
