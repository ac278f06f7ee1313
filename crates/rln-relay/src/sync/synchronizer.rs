use super::events::MembershipEvent;
use super::fetch::{fetch_events, FetchOptions};
use super::source::{LogSource, RawEvent};
use super::stats::{BatchReport, SyncStats};
use crate::cancellation::CancellationToken;
use crate::root_tracker::{MerkleRootTracker, DEFAULT_ROOT_BUFFER, DEFAULT_ROOT_WINDOW};
use rln_crypto::Accumulator;
use rln_types::{Commitment, MemberRecord, MerkleRoot, RlnError, RlnResult};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SyncOptions {
    pub fetch: FetchOptions,
    pub root_window: usize,
    pub root_buffer: usize,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            fetch: FetchOptions::default(),
            root_window: DEFAULT_ROOT_WINDOW,
            root_buffer: DEFAULT_ROOT_BUFFER,
        }
    }
}

/// Mirrors the registry's event log into a local accumulator.
///
/// Each batch is applied removals first, newest block to oldest, then
/// insertions oldest block to newest. Every removal rolls the root history
/// back to its block; every inserted block records the root it produced.
/// The synchronizer is the only writer of the accumulator, the member list
/// and the root history.
pub struct MembershipSynchronizer<A, L: ?Sized> {
    accumulator: A,
    source: Arc<L>,
    members: BTreeMap<u64, Commitment>,
    tracker: MerkleRootTracker,
    options: SyncOptions,
    stats: SyncStats,
    roots_tx: watch::Sender<Vec<MerkleRoot>>,
}

impl<A, L> MembershipSynchronizer<A, L>
where
    A: Accumulator,
    L: LogSource + ?Sized,
{
    pub fn new(accumulator: A, source: Arc<L>, options: SyncOptions) -> RlnResult<Self> {
        let initial_root = accumulator.merkle_root()?;
        let tracker =
            MerkleRootTracker::with_initial_root(options.root_window, options.root_buffer, initial_root);
        let (roots_tx, _) = watch::channel(tracker.roots());

        Ok(Self {
            accumulator,
            source,
            members: BTreeMap::new(),
            tracker,
            options,
            stats: SyncStats::default(),
            roots_tx,
        })
    }

    /// Receives the acceptance window after every applied batch.
    pub fn subscribe_roots(&self) -> watch::Receiver<Vec<MerkleRoot>> {
        self.roots_tx.subscribe()
    }

    /// Backfills history from `from_block` (genesis when `None`) up to the current head.
    pub async fn fetch_members(&mut self, from_block: Option<u64>) -> RlnResult<BatchReport> {
        let head = self.source.block_number().await?;
        info!(
            "Fetching membership events from block {} to {}",
            from_block.map_or_else(|| "genesis".to_string(), |b| b.to_string()),
            head
        );

        let outcome = fetch_events(self.source.as_ref(), from_block, head, self.options.fetch).await?;
        self.stats.failed_chunks += outcome.failed_chunks.len() as u64;
        if !outcome.failed_chunks.is_empty() {
            warn!(
                "{} chunk(s) failed during backfill; membership may be incomplete",
                outcome.failed_chunks.len()
            );
        }

        let report = self.ingest(outcome.events);
        self.stats.last_block = Some(self.stats.last_block.map_or(head, |b| b.max(head)));
        Ok(report)
    }

    /// Validates raw logs and applies the ones that carry what they should.
    pub fn ingest(&mut self, raw: Vec<RawEvent>) -> BatchReport {
        let mut skipped = 0;
        let events: Vec<MembershipEvent> = raw
            .into_iter()
            .filter_map(|event| match MembershipEvent::try_from(event) {
                Ok(event) => Some(event),
                Err(e) => {
                    warn!("{}", e);
                    skipped += 1;
                    None
                }
            })
            .collect();

        let mut report = self.process_events(events);
        report.skipped += skipped;
        self.stats.skipped_events += skipped as u64;
        report
    }

    pub fn process_events(&mut self, events: Vec<MembershipEvent>) -> BatchReport {
        let mut removals: BTreeMap<u64, Vec<MembershipEvent>> = BTreeMap::new();
        let mut insertions: BTreeMap<u64, Vec<MembershipEvent>> = BTreeMap::new();
        for event in events {
            let bucket = if event.removed {
                &mut removals
            } else {
                &mut insertions
            };
            bucket.entry(event.block_number).or_default().push(event);
        }

        let mut report = BatchReport::default();

        for (&block, events) in removals.iter().rev() {
            for event in events {
                if let Err(e) = self.accumulator.delete_member(event.index) {
                    warn!("Skipping removal of index {} at block {}: {}", event.index, block, e);
                    report.skipped += 1;
                    continue;
                }
                self.members.remove(&event.index);
                report.removed += 1;
                debug!("Removed member {} (block {})", event.index, block);
            }
            self.tracker.back_fill(block);
            self.stats.reorgs += 1;
        }

        for (&block, events) in &insertions {
            for event in events {
                if let Err(e) = self
                    .accumulator
                    .insert_members(event.index, std::slice::from_ref(&event.commitment))
                {
                    warn!("Skipping insertion of index {} at block {}: {}", event.index, block, e);
                    report.skipped += 1;
                    continue;
                }
                self.members.insert(event.index, event.commitment);
                report.inserted += 1;
                debug!("Inserted member {} (block {})", event.index, block);
            }
            if self.record_root(block) {
                report.roots_recorded += 1;
            }
        }

        self.stats.record(&report);
        if let Some(&block) = insertions.keys().next_back() {
            self.stats.last_block = Some(self.stats.last_block.map_or(block, |b| b.max(block)));
        }

        self.roots_tx.send_replace(self.tracker.roots());

        if !report.is_empty() {
            info!(
                "Applied batch: {} inserted, {} removed, {} skipped, {} member(s) total",
                report.inserted,
                report.removed,
                report.skipped,
                self.members.len()
            );
        }
        report
    }

    fn record_root(&mut self, block: u64) -> bool {
        let root = match self.accumulator.merkle_root() {
            Ok(root) => root,
            Err(e) => {
                warn!("Could not read root after block {}: {}", block, e);
                return false;
            }
        };

        match self.tracker.latest().map(|s| s.block_number) {
            Some(newest) if newest == block => self.tracker.amend_latest(block, root),
            Some(newest) if newest > block => {
                debug!("Block {} is behind newest snapshot {}, root not recorded", block, newest);
                false
            }
            _ => self.tracker.push_root(block, root).is_ok(),
        }
    }

    /// Backfills, then applies live batches until `cancel` fires or the
    /// subscription ends. A batch already received is always applied in full.
    pub async fn run(&mut self, from_block: Option<u64>, mut cancel: CancellationToken) -> RlnResult<()> {
        let mut live = self.source.subscribe().await?;
        self.fetch_members(from_block).await?;
        info!(
            "Initial sync complete: {} member(s), watching for new events",
            self.members.len()
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Membership sync stopping");
                    break;
                }
                batch = live.recv() => match batch {
                    Some(raw) => {
                        self.ingest(raw);
                    }
                    None => {
                        warn!("Live event subscription closed");
                        return Err(RlnError::Network("live event subscription closed".into()));
                    }
                },
            }
        }

        Ok(())
    }

    pub fn members(&self) -> Vec<MemberRecord> {
        self.members
            .iter()
            .map(|(&index, &commitment)| MemberRecord { index, commitment })
            .collect()
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn roots(&self) -> Vec<MerkleRoot> {
        self.tracker.roots()
    }

    pub fn tracker(&self) -> &MerkleRootTracker {
        &self.tracker
    }

    pub fn current_root(&self) -> RlnResult<MerkleRoot> {
        self.accumulator.merkle_root()
    }

    pub fn accumulator(&self) -> &A {
        &self.accumulator
    }

    pub fn stats(&self) -> &SyncStats {
        &self.stats
    }
}
