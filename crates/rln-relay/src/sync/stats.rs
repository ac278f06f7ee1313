use serde::Serialize;

/// Outcome of applying one batch of events.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub inserted: usize,
    pub removed: usize,
    pub skipped: usize,
    pub roots_recorded: usize,
}

impl BatchReport {
    pub fn is_empty(&self) -> bool {
        self.inserted == 0 && self.removed == 0 && self.skipped == 0
    }
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct SyncStats {
    pub batches: u64,
    pub insertions: u64,
    pub removals: u64,
    pub skipped_events: u64,
    pub failed_chunks: u64,
    pub reorgs: u64,
    pub last_block: Option<u64>,
}

impl SyncStats {
    pub fn record(&mut self, report: &BatchReport) {
        self.batches += 1;
        self.insertions += report.inserted as u64;
        self.removals += report.removed as u64;
        self.skipped_events += report.skipped as u64;
    }
}
