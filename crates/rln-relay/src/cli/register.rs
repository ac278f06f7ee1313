use super::commands::OutputFormat;
use super::utils::print_json;
use rln_relay::{RegistryClient, RelayConfig};
use rln_types::{Commitment, RlnError, RlnResult};
use serde_json::json;

pub async fn register_member(
    config: &RelayConfig,
    commitment: &str,
    format: &OutputFormat,
) -> RlnResult<()> {
    let commitment = Commitment::from_hex(commitment)?;
    let private_key = std::env::var("RLN_PRIVATE_KEY")
        .map_err(|_| RlnError::Config("RLN_PRIVATE_KEY is not set".into()))?;

    let mut client = RegistryClient::new(config.registry.contract_config()?);
    client.connect().await?;
    let wallet = client.set_wallet(&private_key)?;

    let record = client.register_member(&commitment).await?;

    match format {
        OutputFormat::Json => print_json(&json!({
            "wallet": format!("{:?}", wallet),
            "index": record.index,
            "commitment": record.commitment.to_hex(),
        }))?,
        OutputFormat::Text => {
            println!("\x1b[38;5;46m[+]\x1b[0m Membership registered");
            println!("  Wallet:     {:?}", wallet);
            println!("  Index:      {}", record.index);
            println!("  Commitment: 0x{}", record.commitment.to_hex());
        }
    }
    Ok(())
}
