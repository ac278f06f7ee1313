use super::log_source::decode_log;
use super::*;
use crate::config::RegistryConfig;
use crate::sync::{commitment_from_u256, LogSource, MembershipEvent};
use ethers::abi::{encode, Token};
use ethers::contract::EthEvent;
use ethers::providers::{Http, Provider};
use ethers::types::{Bytes, Log, H256, U256, U64};
use rln_types::RlnError;
use std::sync::Arc;
use std::time::Duration;

fn registered_log(pubkey: u64, index: u64, block: u64, removed: bool) -> Log {
    Log {
        topics: vec![MemberRegisteredFilter::signature()],
        data: Bytes::from(encode(&[
            Token::Uint(U256::from(pubkey)),
            Token::Uint(U256::from(index)),
        ])),
        block_number: Some(U64::from(block)),
        removed: Some(removed),
        ..Default::default()
    }
}

#[test]
fn test_contract_config_default() {
    let config = ContractConfig::default();
    assert_eq!(config.chain_id, 31337);
    assert!(config.rpc_url.contains("localhost"));
    assert!(config.start_block.is_none());
}

#[test]
fn test_default_registry_is_goerli() {
    let config = RegistryConfig::default().contract_config().unwrap();
    assert_eq!(config.chain_id, GOERLI_CHAIN_ID);
    assert_eq!(config.start_block, Some(7_109_391));
    assert_eq!(
        hex::encode(config.registry_address.as_bytes()),
        "4252105670fe33d2947e8ead304969849e64f2a6"
    );
}

#[test]
fn test_parse_address_rejects_garbage() {
    assert!(parse_address("0x1234").is_err());
    assert!(parse_address("not-an-address").is_err());
}

#[test]
fn test_decode_registered_log() {
    let raw = decode_log(&registered_log(0xabcd, 7, 123, false));
    assert_eq!(raw.block_number, Some(123));
    assert!(!raw.removed);

    let event = MembershipEvent::try_from(raw).unwrap();
    assert_eq!(event.index, 7);
    assert_eq!(event.commitment, commitment_from_u256(U256::from(0xabcd)));
}

#[test]
fn test_decode_removed_log() {
    let raw = decode_log(&registered_log(1, 2, 50, true));
    assert!(raw.removed);
    assert_eq!(raw.block_number, Some(50));
}

#[test]
fn test_decode_foreign_log_has_no_args() {
    let mut log = registered_log(1, 2, 50, false);
    log.topics = vec![H256::repeat_byte(0x11)];
    let raw = decode_log(&log);
    assert!(raw.args.is_none());
    assert!(MembershipEvent::try_from(raw).is_err());
}

#[test]
fn test_registry_client_requires_connection() {
    let client = RegistryClient::new(ContractConfig::default());
    assert!(!client.is_connected());
    assert!(client.log_source().is_err());
}

#[tokio::test]
async fn test_subscribe_fails_without_rpc() {
    let provider = Provider::<Http>::try_from("http://127.0.0.1:1").unwrap();
    let source = EthersLogSource::new(
        Arc::new(provider),
        parse_address(GOERLI_REGISTRY_ADDRESS).unwrap(),
        Duration::from_millis(50),
    );
    assert!(matches!(source.subscribe().await, Err(RlnError::Network(_))));
}
