use super::source::{LogSource, RawEvent};
use futures::future::join_all;
use rln_types::{RlnError, RlnResult};
use tracing::{debug, warn};

pub const DEFAULT_BLOCK_RANGE: u64 = 3000;
pub const DEFAULT_FETCH_CHUNKS: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FetchOptions {
    pub block_range: u64,
    pub fetch_chunks: usize,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            block_range: DEFAULT_BLOCK_RANGE,
            fetch_chunks: DEFAULT_FETCH_CHUNKS,
        }
    }
}

#[derive(Debug, Default)]
pub struct FetchOutcome {
    pub events: Vec<RawEvent>,
    pub failed_chunks: Vec<RlnError>,
}

/// Splits `[from, to]` into non-overlapping inclusive windows of at most `width` blocks.
pub fn split_to_chunks(from: u64, to: u64, width: u64) -> Vec<(u64, u64)> {
    let width = width.max(1);
    let mut chunks = Vec::new();
    let mut left = from;
    while left <= to {
        let right = left.saturating_add(width - 1).min(to);
        chunks.push((left, right));
        match right.checked_add(1) {
            Some(next) => left = next,
            None => break,
        }
    }
    chunks
}

/// Pulls registry events for `[from_block, to_block]`.
///
/// Short ranges go out as one query whose failure is returned. Longer ranges
/// are split and fetched `fetch_chunks` at a time; a failed chunk is logged,
/// reported in the outcome and contributes no events.
pub async fn fetch_events<L>(
    source: &L,
    from_block: Option<u64>,
    to_block: u64,
    options: FetchOptions,
) -> RlnResult<FetchOutcome>
where
    L: LogSource + ?Sized,
{
    let from = match from_block {
        Some(from) if to_block.saturating_sub(from) >= options.block_range => from,
        _ => {
            let events = source.query(from_block, Some(to_block)).await?;
            debug!("Fetched {} event(s) in a single query", events.len());
            return Ok(FetchOutcome {
                events,
                failed_chunks: Vec::new(),
            });
        }
    };

    let chunks = split_to_chunks(from, to_block, options.block_range);
    debug!(
        "Fetching blocks {}..={} in {} chunk(s), {} at a time",
        from,
        to_block,
        chunks.len(),
        options.fetch_chunks
    );

    let mut outcome = FetchOutcome::default();
    for window in chunks.chunks(options.fetch_chunks.max(1)) {
        let results = join_all(
            window
                .iter()
                .map(|&(left, right)| source.query(Some(left), Some(right))),
        )
        .await;

        for (&(left, right), result) in window.iter().zip(results) {
            match result {
                Ok(mut events) => outcome.events.append(&mut events),
                Err(e) => {
                    let failure = RlnError::SyncChunkFailure {
                        from_block: left,
                        to_block: right,
                        reason: e.to_string(),
                    };
                    warn!("{}", failure);
                    outcome.failed_chunks.push(failure);
                }
            }
        }
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_exact_multiple() {
        assert_eq!(split_to_chunks(0, 8, 3), vec![(0, 2), (3, 5), (6, 8)]);
    }

    #[test]
    fn test_split_with_tail() {
        assert_eq!(
            split_to_chunks(100, 7100, 3000),
            vec![(100, 3099), (3100, 6099), (6100, 7100)]
        );
    }

    #[test]
    fn test_split_single_and_empty() {
        assert_eq!(split_to_chunks(5, 5, 10), vec![(5, 5)]);
        assert!(split_to_chunks(6, 5, 10).is_empty());
        assert_eq!(split_to_chunks(u64::MAX - 1, u64::MAX, 10), vec![(u64::MAX - 1, u64::MAX)]);
    }
}
