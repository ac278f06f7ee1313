mod cli;

use clap::Parser;
use cli::{
    handle_config, handle_proof, init_logging, register_member, run_sync, show_epoch, Cli,
    Commands, ConfigAction,
};
use rln_relay::RelayConfig;
use rln_types::RlnResult;

#[tokio::main]
async fn main() -> RlnResult<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(RelayConfig::default_path);

    let config = match &cli.command {
        Commands::Config { action: Some(ConfigAction::Init { .. }) } => RelayConfig::default(),
        _ => RelayConfig::load(&config_path)?,
    };

    init_logging(&cli, &config.logging)?;

    match cli.command {
        Commands::Sync { from_block, follow } => {
            run_sync(&config, from_block, follow, &cli.format).await?;
        }
        Commands::Epoch { at } => {
            show_epoch(&config, at, &cli.format)?;
        }
        Commands::Proof { action } => {
            handle_proof(&config, action, &cli.format).await?;
        }
        Commands::Register { commitment } => {
            register_member(&config, &commitment, &cli.format).await?;
        }
        Commands::Config { action } => {
            handle_config(&config_path, &config, action, &cli.format)?;
        }
    }

    Ok(())
}
