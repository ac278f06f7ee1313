use super::commands::{ConfigAction, OutputFormat};
use super::utils::print_json;
use rln_relay::RelayConfig;
use rln_types::{RlnError, RlnResult};
use std::path::Path;

pub fn handle_config(
    config_path: &Path,
    config: &RelayConfig,
    action: Option<ConfigAction>,
    format: &OutputFormat,
) -> RlnResult<()> {
    match action {
        Some(ConfigAction::Show) | None => match format {
            OutputFormat::Json => {
                let value = serde_json::to_value(config)
                    .map_err(|e| RlnError::Serialization(e.to_string()))?;
                print_json(&value)?;
            }
            OutputFormat::Text => {
                if !config_path.exists() {
                    println!(
                        "\x1b[38;5;245mNo configuration file at {:?}, showing defaults\x1b[0m",
                        config_path
                    );
                }
                let rendered = toml::to_string_pretty(config)
                    .map_err(|e| RlnError::Serialization(e.to_string()))?;
                println!("{}", rendered);
            }
        },
        Some(ConfigAction::Init { force }) => {
            if config_path.exists() && !force {
                println!(
                    "\x1b[38;5;196m[-]\x1b[0m Configuration already exists at {:?} (use --force to overwrite)",
                    config_path
                );
                return Ok(());
            }
            RelayConfig::default().save(config_path)?;
            println!("\x1b[38;5;46m[+]\x1b[0m Wrote default configuration to {:?}", config_path);
        }
    }
    Ok(())
}
