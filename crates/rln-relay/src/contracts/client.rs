use super::bindings::{MemberRegisteredFilter, RlnRegistry};
use super::config::ContractConfig;
use super::log_source::EthersLogSource;
use crate::sync::{commitment_from_u256, commitment_to_u256};
use ethers::{
    contract::parse_log,
    middleware::SignerMiddleware,
    providers::{Http, Middleware, Provider},
    signers::{LocalWallet, Signer},
    types::{Address, U256},
};
use rln_types::{Commitment, MemberRecord, RlnError, RlnResult};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub struct RegistryClient {
    config: ContractConfig,
    provider: Option<Arc<Provider<Http>>>,
    signer: Option<Arc<SignerMiddleware<Provider<Http>, LocalWallet>>>,
}

impl RegistryClient {
    pub fn new(config: ContractConfig) -> Self {
        Self {
            config,
            provider: None,
            signer: None,
        }
    }

    pub fn config(&self) -> &ContractConfig {
        &self.config
    }

    pub async fn connect(&mut self) -> RlnResult<()> {
        info!("Connecting to RPC: {}", self.config.rpc_url);

        let provider = Provider::<Http>::try_from(self.config.rpc_url.as_str())
            .map_err(|e| RlnError::Network(format!("Failed to create provider: {}", e)))?;

        let chain_id = provider
            .get_chainid()
            .await
            .map_err(|e| RlnError::Network(format!("Failed to get chain ID: {}", e)))?;

        if chain_id.as_u64() != self.config.chain_id {
            return Err(RlnError::Network(format!(
                "Chain ID mismatch: expected {}, got {}",
                self.config.chain_id,
                chain_id.as_u64()
            )));
        }

        self.provider = Some(Arc::new(provider));
        info!("Connected to chain {}", self.config.chain_id);
        Ok(())
    }

    pub fn set_wallet(&mut self, private_key: &str) -> RlnResult<Address> {
        let provider = self.provider()?;

        let wallet: LocalWallet = private_key
            .trim_start_matches("0x")
            .parse()
            .map_err(|e| RlnError::InvalidArgument(format!("Invalid private key: {}", e)))?;

        let wallet = wallet.with_chain_id(self.config.chain_id);
        let address = wallet.address();

        let client = SignerMiddleware::new((*provider).clone(), wallet);
        self.signer = Some(Arc::new(client));

        info!("Wallet set: {:?}", address);
        Ok(address)
    }

    pub fn is_connected(&self) -> bool {
        self.provider.is_some()
    }

    fn provider(&self) -> RlnResult<Arc<Provider<Http>>> {
        self.provider
            .clone()
            .ok_or_else(|| RlnError::Network("Not connected".into()))
    }

    pub async fn membership_deposit(&self) -> RlnResult<U256> {
        let registry = RlnRegistry::new(self.config.registry_address, self.provider()?);

        registry
            .membership_deposit()
            .call()
            .await
            .map_err(|e| RlnError::Contract(format!("Failed to read membership deposit: {}", e)))
    }

    /// Pays the deposit and registers `commitment`, returning the record the
    /// registry assigned.
    pub async fn register_member(&self, commitment: &Commitment) -> RlnResult<MemberRecord> {
        let signer = self
            .signer
            .as_ref()
            .ok_or_else(|| RlnError::InvalidArgument("No wallet configured".into()))?;

        let deposit = self.membership_deposit().await?;
        info!("Registering commitment {} with deposit {} wei", commitment, deposit);

        let registry = RlnRegistry::new(self.config.registry_address, signer.clone());
        let call = registry.register(commitment_to_u256(commitment)).value(deposit);
        let pending = call
            .send()
            .await
            .map_err(|e| RlnError::Contract(format!("Failed to register: {}", e)))?;

        let receipt = pending
            .await
            .map_err(|e| RlnError::Contract(format!("Registration transaction failed: {}", e)))?
            .ok_or_else(|| RlnError::Contract("No receipt for registration".into()))?;

        info!("Registration confirmed: {:?}", receipt.transaction_hash);

        let event = receipt
            .logs
            .iter()
            .find_map(|log| parse_log::<MemberRegisteredFilter>(log.clone()).ok())
            .ok_or_else(|| RlnError::Contract("Receipt has no MemberRegistered event".into()))?;

        if event.index > U256::from(u64::MAX) {
            return Err(RlnError::Contract(format!("Member index {} out of range", event.index)));
        }

        Ok(MemberRecord {
            index: event.index.as_u64(),
            commitment: commitment_from_u256(event.pubkey),
        })
    }

    pub fn log_source(&self) -> RlnResult<EthersLogSource> {
        Ok(EthersLogSource::new(
            self.provider()?,
            self.config.registry_address,
            Duration::from_millis(self.config.poll_interval_ms),
        ))
    }
}
