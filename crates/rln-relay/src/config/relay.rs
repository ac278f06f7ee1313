use super::logging::LoggingConfig;
use super::proof::ProofConfig;
use super::registry::RegistryConfig;
use super::sync::{EpochConfig, SyncConfig};
use super::types::LogLevel;
use crate::contracts::parse_address;
use rln_crypto::MAX_TREE_DEPTH;
use rln_types::{RlnError, RlnResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    pub registry: RegistryConfig,
    pub sync: SyncConfig,
    pub epoch: EpochConfig,
    pub proof: ProofConfig,
    pub logging: LoggingConfig,
}

impl RelayConfig {
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("rln-relay")
            .join("config.toml")
    }

    pub fn load(path: impl AsRef<Path>) -> RlnResult<Self> {
        let path = path.as_ref();

        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)
                .map_err(|e| RlnError::Config(format!("Failed to read config: {}", e)))?;

            toml::from_str(&contents)
                .map_err(|e| RlnError::Config(format!("Failed to parse config: {}", e)))?
        } else {
            info!("Config file not found, using defaults");
            Self::default()
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> RlnResult<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| RlnError::Config(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| RlnError::Config(format!("Failed to create config dir: {}", e)))?;
        }

        std::fs::write(path.as_ref(), contents)
            .map_err(|e| RlnError::Config(format!("Failed to write config: {}", e)))?;

        info!("Configuration saved to {:?}", path.as_ref());
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    pub(crate) fn apply_overrides_from<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(rpc) = var("RLN_RPC_URL") {
            self.registry.rpc_url = rpc;
        }

        if let Some(address) = var("RLN_REGISTRY_ADDRESS") {
            self.registry.address = address;
        }

        if let Some(chain_id) = var("RLN_CHAIN_ID").and_then(|s| s.parse().ok()) {
            self.registry.chain_id = chain_id;
        }

        if let Some(block) = var("RLN_START_BLOCK").and_then(|s| s.parse().ok()) {
            self.registry.start_block = Some(block);
        }

        if let Some(url) = var("MERKLE_PROOF_SERVICE_URL") {
            self.proof.service_url = url;
        }

        if let Some(level) = var("RLN_LOG_LEVEL") {
            self.logging.level = LogLevel::parse_lossy(&level);
        }

        if var("RLN_LOG_JSON").is_some() {
            self.logging.json = true;
        }
    }

    pub fn validate(&self) -> RlnResult<()> {
        if self.sync.block_range == 0 {
            return Err(RlnError::Config("sync.block_range cannot be 0".into()));
        }

        if self.sync.fetch_chunks == 0 {
            return Err(RlnError::Config("sync.fetch_chunks cannot be 0".into()));
        }

        if self.sync.root_window == 0 {
            return Err(RlnError::Config("sync.root_window cannot be 0".into()));
        }

        if self.sync.tree_depth == 0 || self.sync.tree_depth > MAX_TREE_DEPTH {
            return Err(RlnError::Config(format!(
                "sync.tree_depth must be between 1 and {}",
                MAX_TREE_DEPTH
            )));
        }

        if self.epoch.unit_secs == 0 {
            return Err(RlnError::Config("epoch.unit_secs cannot be 0".into()));
        }

        if self.registry.poll_interval_ms == 0 {
            return Err(RlnError::Config("registry.poll_interval_ms cannot be 0".into()));
        }

        parse_address(&self.registry.address)?;

        reqwest::Url::parse(&self.proof.service_url)
            .map_err(|e| RlnError::Config(format!("proof.service_url is not a URL: {}", e)))?;

        Ok(())
    }
}
