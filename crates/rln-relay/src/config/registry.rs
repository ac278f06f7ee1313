use crate::contracts::{
    parse_address, ContractConfig, GOERLI_CHAIN_ID, GOERLI_REGISTRY_ADDRESS, GOERLI_START_BLOCK,
};
use rln_types::RlnResult;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub rpc_url: String,
    pub address: String,
    pub chain_id: u64,
    pub start_block: Option<u64>,
    pub poll_interval_ms: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:8545".to_string(),
            address: GOERLI_REGISTRY_ADDRESS.to_string(),
            chain_id: GOERLI_CHAIN_ID,
            start_block: Some(GOERLI_START_BLOCK),
            poll_interval_ms: 7_000,
        }
    }
}

impl RegistryConfig {
    pub fn contract_config(&self) -> RlnResult<ContractConfig> {
        Ok(ContractConfig {
            rpc_url: self.rpc_url.clone(),
            registry_address: parse_address(&self.address)?,
            chain_id: self.chain_id,
            start_block: self.start_block,
            poll_interval_ms: self.poll_interval_ms,
        })
    }
}
