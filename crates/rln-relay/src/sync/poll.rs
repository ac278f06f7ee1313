use super::source::{LogSource, RawEvent};
use rln_types::RlnResult;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Forwards every event above `last_seen` to `tx`, one batch per tick.
///
/// A failed poll is logged and retried from the same block on the next tick.
/// Returns once the receiving side is dropped.
pub async fn poll_new_events<L>(
    source: Arc<L>,
    mut last_seen: u64,
    poll_interval: Duration,
    tx: mpsc::Sender<Vec<RawEvent>>,
) where
    L: LogSource + ?Sized,
{
    let mut ticker = interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut failures: u64 = 0;

    loop {
        tokio::select! {
            _ = tx.closed() => {
                debug!("Live event receiver dropped, stopping poller");
                break;
            }
            _ = ticker.tick() => {}
        }

        match poll_once(source.as_ref(), last_seen).await {
            Ok(None) => {}
            Ok(Some((head, events))) => {
                if failures > 0 {
                    info!("Registry polling recovered after {} failed attempt(s)", failures);
                    failures = 0;
                }
                last_seen = head;
                if events.is_empty() {
                    continue;
                }
                debug!("Polled {} live registry log(s) up to block {}", events.len(), head);
                if tx.send(events).await.is_err() {
                    break;
                }
            }
            Err(e) => {
                failures += 1;
                warn!(
                    "Registry poll above block {} failed (attempt {}): {}",
                    last_seen, failures, e
                );
            }
        }
    }
}

async fn poll_once<L>(source: &L, last_seen: u64) -> RlnResult<Option<(u64, Vec<RawEvent>)>>
where
    L: LogSource + ?Sized,
{
    let head = source.block_number().await?;
    if head <= last_seen {
        return Ok(None);
    }
    let events = source.query(Some(last_seen + 1), Some(head)).await?;
    Ok(Some((head, events)))
}
