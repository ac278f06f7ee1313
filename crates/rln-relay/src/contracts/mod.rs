mod bindings;
mod client;
mod config;
mod log_source;

pub use bindings::{MemberRegisteredFilter, RlnRegistry};
pub use client::RegistryClient;
pub use config::{
    parse_address, ContractConfig, GOERLI_CHAIN_ID, GOERLI_REGISTRY_ADDRESS, GOERLI_START_BLOCK,
};
pub use log_source::EthersLogSource;

#[cfg(test)]
mod tests;
