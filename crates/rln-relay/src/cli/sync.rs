use super::commands::OutputFormat;
use super::utils::print_json;
use rln_crypto::PoseidonMerkleTree;
use rln_relay::{CancellationToken, MembershipSynchronizer, RegistryClient, RelayConfig};
use rln_types::{RlnError, RlnResult};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

pub async fn run_sync(
    config: &RelayConfig,
    from_block: Option<u64>,
    follow: bool,
    format: &OutputFormat,
) -> RlnResult<()> {
    let contract_config = config.registry.contract_config()?;
    let from_block = from_block.or(contract_config.start_block);

    let mut client = RegistryClient::new(contract_config);
    client.connect().await?;
    let source = Arc::new(client.log_source()?);

    let tree = PoseidonMerkleTree::new(config.sync.tree_depth)?;
    let mut synchronizer = MembershipSynchronizer::new(tree, source, config.sync.options())?;

    if follow {
        let (stop_tx, token) = CancellationToken::new();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Interrupt received, stopping sync");
            }
            let _ = stop_tx.send(true);
        });
        synchronizer.run(from_block, token).await?;
    } else {
        synchronizer.fetch_members(from_block).await?;
    }

    let root = synchronizer.current_root()?;
    let roots = synchronizer.roots();
    let stats = synchronizer.stats();

    match format {
        OutputFormat::Json => {
            let stats_value =
                serde_json::to_value(stats).map_err(|e| RlnError::Serialization(e.to_string()))?;
            print_json(&json!({
                "members": synchronizer.member_count(),
                "current_root": root.to_hex(),
                "valid_roots": roots.iter().map(|r| r.to_hex()).collect::<Vec<_>>(),
                "stats": stats_value,
            }))?;
        }
        OutputFormat::Text => {
            println!("\x1b[38;5;46m[+]\x1b[0m Membership synchronized");
            println!("  Members:       {}", synchronizer.member_count());
            println!("  Current root:  0x{}", root.to_hex());
            println!("  Last block:    {}", stats.last_block.map_or("-".to_string(), |b| b.to_string()));
            println!("  Batches:       {}", stats.batches);
            println!("  Insertions:    {}", stats.insertions);
            println!("  Removals:      {}", stats.removals);
            println!("  Reorgs:        {}", stats.reorgs);
            if stats.skipped_events > 0 || stats.failed_chunks > 0 {
                println!(
                    "\x1b[38;5;214m[!]\x1b[0m {} skipped event(s), {} failed chunk(s)",
                    stats.skipped_events, stats.failed_chunks
                );
            }
            println!();
            println!("Valid roots (oldest first):");
            for r in &roots {
                println!("  0x{}", r.to_hex());
            }
        }
    }

    Ok(())
}
