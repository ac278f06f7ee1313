mod logging;
mod proof;
mod registry;
mod relay;
mod sync;
mod types;

pub use logging::LoggingConfig;
pub use proof::ProofConfig;
pub use registry::RegistryConfig;
pub use relay::RelayConfig;
pub use sync::{EpochConfig, SyncConfig};
pub use types::LogLevel;

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config_validation() {
        let config = RelayConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.sync.block_range, 3000);
        assert_eq!(config.sync.fetch_chunks, 5);
        assert_eq!(config.sync.root_window, 5);
        assert_eq!(config.sync.tree_depth, 20);
        assert_eq!(config.epoch.unit_secs, 10);
    }

    #[test]
    fn test_zero_values_rejected() {
        let mut config = RelayConfig::default();
        config.sync.block_range = 0;
        assert!(config.validate().is_err());

        let mut config = RelayConfig::default();
        config.sync.fetch_chunks = 0;
        assert!(config.validate().is_err());

        let mut config = RelayConfig::default();
        config.epoch.unit_secs = 0;
        assert!(config.validate().is_err());

        let mut config = RelayConfig::default();
        config.sync.root_window = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_tree_depth_bounds() {
        let mut config = RelayConfig::default();
        config.sync.tree_depth = 33;
        assert!(config.validate().is_err());
        config.sync.tree_depth = 32;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_registry_address() {
        let mut config = RelayConfig::default();
        config.registry.address = "0xnope".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("RLN_RPC_URL", "https://rpc.example"),
            ("RLN_CHAIN_ID", "11155111"),
            ("RLN_START_BLOCK", "42"),
            ("RLN_LOG_LEVEL", "DEBUG"),
            ("RLN_LOG_JSON", "1"),
            ("MERKLE_PROOF_SERVICE_URL", "http://10.0.0.2:8645/debug/v1/merkleProof"),
        ]
        .into_iter()
        .collect();

        let mut config = RelayConfig::default();
        config.apply_overrides_from(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.registry.rpc_url, "https://rpc.example");
        assert_eq!(config.registry.chain_id, 11155111);
        assert_eq!(config.registry.start_block, Some(42));
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert!(config.logging.json);
        assert_eq!(
            config.proof.service_url,
            "http://10.0.0.2:8645/debug/v1/merkleProof"
        );
    }

    #[test]
    fn test_proof_service_url() {
        let mut config = RelayConfig::default();
        assert_eq!(
            config.proof.service_url,
            "http://localhost:8645/debug/v1/merkleProof"
        );

        config.proof.service_url = "not a url".into();
        assert!(config.validate().is_err());

        let parsed: RelayConfig =
            toml::from_str("[proof]\nservice_url = \"http://node:8645/proof\"\n").unwrap();
        assert_eq!(parsed.proof.service_url, "http://node:8645/proof");
        assert!(parsed.validate().is_ok());
    }

    #[test]
    fn test_unparsable_env_values_ignored() {
        let mut config = RelayConfig::default();
        config.apply_overrides_from(|key| match key {
            "RLN_CHAIN_ID" => Some("five".into()),
            "RLN_LOG_LEVEL" => Some("loud".into()),
            _ => None,
        });
        assert_eq!(config.registry.chain_id, 5);
        assert_eq!(config.logging.level, LogLevel::Info);
    }

    #[test]
    fn test_config_serialization() {
        let config = RelayConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("Failed to serialize");
        let parsed: RelayConfig = toml::from_str(&toml_str).expect("Failed to parse");
        assert_eq!(parsed.registry.address, config.registry.address);
        assert_eq!(parsed.sync.block_range, config.sync.block_range);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed: RelayConfig = toml::from_str("[sync]\nblock_range = 500\n").unwrap();
        assert_eq!(parsed.sync.block_range, 500);
        assert_eq!(parsed.sync.fetch_chunks, 5);
        assert_eq!(parsed.epoch.unit_secs, 10);
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir()
            .join(format!("rln-relay-config-{}", std::process::id()))
            .join("config.toml");
        let mut config = RelayConfig::default();
        config.sync.block_range = 1234;
        config.save(&path).unwrap();

        let loaded = RelayConfig::load(&path).unwrap();
        assert_eq!(loaded.sync.block_range, 1234);
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_log_level_display() {
        assert_eq!(LogLevel::Warn.to_string(), "warn");
        assert_eq!(LogLevel::parse_lossy("TRACE"), LogLevel::Trace);
    }
}
