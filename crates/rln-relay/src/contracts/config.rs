use ethers::types::Address;
use rln_types::{RlnError, RlnResult};

pub const GOERLI_CHAIN_ID: u64 = 5;

pub const GOERLI_START_BLOCK: u64 = 7_109_391;

pub const GOERLI_REGISTRY_ADDRESS: &str = "0x4252105670fe33d2947e8ead304969849e64f2a6";

#[derive(Clone, Debug)]
pub struct ContractConfig {
    pub rpc_url: String,
    pub registry_address: Address,
    pub chain_id: u64,
    pub start_block: Option<u64>,
    pub poll_interval_ms: u64,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:8545".to_string(),
            registry_address: Address::zero(),
            chain_id: 31337,
            start_block: None,
            poll_interval_ms: 7_000,
        }
    }
}

pub fn parse_address(s: &str) -> RlnResult<Address> {
    s.parse::<Address>()
        .map_err(|e| RlnError::Config(format!("Invalid registry address {}: {}", s, e)))
}
