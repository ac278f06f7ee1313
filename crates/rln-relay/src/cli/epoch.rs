use super::commands::OutputFormat;
use super::utils::print_json;
use rln_relay::RelayConfig;
use rln_types::{Epoch, RlnResult};
use serde_json::json;

pub fn show_epoch(config: &RelayConfig, at: Option<i64>, format: &OutputFormat) -> RlnResult<()> {
    let unit = config.epoch.unit_secs;
    let epoch = match at {
        Some(secs) => Epoch::from_unix_secs(secs, unit)?,
        None => Epoch::now(unit)?,
    };
    let encoded = hex::encode(epoch.to_bytes());

    match format {
        OutputFormat::Json => print_json(&json!({
            "epoch": epoch.value(),
            "unit_secs": unit,
            "bytes": encoded,
        }))?,
        OutputFormat::Text => {
            println!("{} ({}s per epoch)", epoch, unit);
            println!("  Bytes: 0x{}", encoded);
        }
    }
    Ok(())
}
