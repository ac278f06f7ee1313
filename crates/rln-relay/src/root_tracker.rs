use rln_types::{MerkleRoot, RlnError, RlnResult, RootSnapshot};
use std::collections::VecDeque;
use tracing::debug;

pub const DEFAULT_ROOT_WINDOW: usize = 5;
pub const DEFAULT_ROOT_BUFFER: usize = 10;

/// Recent accumulator roots keyed by block, oldest first.
///
/// `valid` is the window a verifier accepts. Snapshots pushed out of it move
/// into `buffer` so that a reorg which truncates the window can pull older
/// roots back in.
#[derive(Clone, Debug)]
pub struct MerkleRootTracker {
    window: usize,
    buffer_depth: usize,
    valid: VecDeque<RootSnapshot>,
    buffer: VecDeque<RootSnapshot>,
}

impl MerkleRootTracker {
    pub fn new(window: usize, buffer_depth: usize) -> Self {
        let window = window.max(1);
        Self {
            window,
            buffer_depth,
            valid: VecDeque::with_capacity(window + 1),
            buffer: VecDeque::with_capacity(buffer_depth + 1),
        }
    }

    /// Starts the history at block 0 with the root of an empty accumulator.
    pub fn with_initial_root(window: usize, buffer_depth: usize, root: MerkleRoot) -> Self {
        let mut tracker = Self::new(window, buffer_depth);
        tracker.valid.push_back(RootSnapshot {
            block_number: 0,
            root,
        });
        tracker
    }

    pub fn push_root(&mut self, block_number: u64, root: MerkleRoot) -> RlnResult<()> {
        if let Some(newest) = self.latest() {
            if block_number <= newest.block_number {
                return Err(RlnError::OutOfOrderRoot {
                    block: block_number,
                    newest: newest.block_number,
                });
            }
        }

        self.valid.push_back(RootSnapshot { block_number, root });
        while self.valid.len() > self.window {
            if let Some(evicted) = self.valid.pop_front() {
                self.buffer.push_back(evicted);
            }
        }
        while self.buffer.len() > self.buffer_depth {
            self.buffer.pop_front();
        }
        Ok(())
    }

    /// Replaces the root of the newest snapshot when it belongs to `block_number`.
    pub fn amend_latest(&mut self, block_number: u64, root: MerkleRoot) -> bool {
        match self.valid.back_mut() {
            Some(newest) if newest.block_number == block_number => {
                newest.root = root;
                true
            }
            _ => false,
        }
    }

    /// Drops every snapshot at or after `block_number`, then refills the
    /// window from the eviction buffer.
    pub fn back_fill(&mut self, block_number: u64) {
        let before = self.valid.len() + self.buffer.len();
        self.valid.retain(|s| s.block_number < block_number);
        self.buffer.retain(|s| s.block_number < block_number);

        let mut restored = 0;
        while self.valid.len() < self.window {
            match self.buffer.pop_back() {
                Some(snapshot) => {
                    self.valid.push_front(snapshot);
                    restored += 1;
                }
                None => break,
            }
        }

        let dropped = before - self.valid.len() - self.buffer.len();
        if dropped > 0 {
            debug!(
                "Rolled back {} root snapshot(s) from block {}, restored {} from buffer",
                dropped, block_number, restored
            );
        }
    }

    pub fn roots(&self) -> Vec<MerkleRoot> {
        self.valid.iter().map(|s| s.root).collect()
    }

    pub fn snapshots(&self) -> Vec<RootSnapshot> {
        self.valid.iter().copied().collect()
    }

    pub fn buffer(&self) -> Vec<MerkleRoot> {
        self.buffer.iter().map(|s| s.root).collect()
    }

    pub fn latest(&self) -> Option<RootSnapshot> {
        self.valid.back().or_else(|| self.buffer.back()).copied()
    }

    pub fn contains(&self, root: &MerkleRoot) -> bool {
        self.valid.iter().any(|s| &s.root == root)
    }

    pub fn len(&self) -> usize {
        self.valid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.valid.is_empty()
    }
}

impl Default for MerkleRootTracker {
    fn default() -> Self {
        Self::new(DEFAULT_ROOT_WINDOW, DEFAULT_ROOT_BUFFER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root(n: u8) -> MerkleRoot {
        MerkleRoot::from_bytes([n; 32])
    }

    fn blocks(tracker: &MerkleRootTracker) -> Vec<u64> {
        tracker.snapshots().iter().map(|s| s.block_number).collect()
    }

    #[test]
    fn test_push_and_evict() {
        let mut tracker = MerkleRootTracker::new(3, 2);
        for b in 1..=6u8 {
            tracker.push_root(u64::from(b), root(b)).unwrap();
        }

        assert_eq!(tracker.roots(), vec![root(4), root(5), root(6)]);
        assert_eq!(tracker.buffer(), vec![root(2), root(3)]);
        assert_eq!(tracker.latest().unwrap().block_number, 6);
        assert!(tracker.contains(&root(5)));
        assert!(!tracker.contains(&root(2)));
    }

    #[test]
    fn test_reorg_rollback() {
        let mut tracker = MerkleRootTracker::default();
        tracker.push_root(10, root(10)).unwrap();
        tracker.push_root(11, root(11)).unwrap();
        tracker.push_root(12, root(12)).unwrap();

        tracker.back_fill(11);
        assert_eq!(blocks(&tracker), vec![10]);

        tracker.push_root(11, root(0xaa)).unwrap();
        assert_eq!(tracker.roots(), vec![root(10), root(0xaa)]);
    }

    #[test]
    fn test_back_fill_noop() {
        let mut tracker = MerkleRootTracker::default();
        tracker.push_root(5, root(5)).unwrap();
        tracker.back_fill(6);
        assert_eq!(blocks(&tracker), vec![5]);

        let mut empty = MerkleRootTracker::default();
        empty.back_fill(1);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_back_fill_restores_from_buffer() {
        let mut tracker = MerkleRootTracker::new(3, 10);
        for b in 1..=6u8 {
            tracker.push_root(u64::from(b), root(b)).unwrap();
        }
        assert_eq!(blocks(&tracker), vec![4, 5, 6]);

        tracker.back_fill(5);
        assert_eq!(blocks(&tracker), vec![2, 3, 4]);
        assert_eq!(tracker.buffer(), vec![root(1)]);
    }

    #[test]
    fn test_back_fill_truncates_buffer_too() {
        let mut tracker = MerkleRootTracker::new(2, 10);
        for b in 1..=5u8 {
            tracker.push_root(u64::from(b), root(b)).unwrap();
        }
        tracker.back_fill(2);
        assert_eq!(blocks(&tracker), vec![1]);
        assert!(tracker.buffer().is_empty());
    }

    #[test]
    fn test_out_of_order_rejected() {
        let mut tracker = MerkleRootTracker::default();
        tracker.push_root(7, root(7)).unwrap();

        assert!(matches!(
            tracker.push_root(7, root(8)),
            Err(RlnError::OutOfOrderRoot { block: 7, newest: 7 })
        ));
        assert!(tracker.push_root(3, root(3)).is_err());
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn test_amend_latest() {
        let mut tracker = MerkleRootTracker::with_initial_root(5, 10, root(0));
        tracker.push_root(4, root(4)).unwrap();

        assert!(tracker.amend_latest(4, root(0x44)));
        assert!(!tracker.amend_latest(3, root(0x33)));
        assert_eq!(tracker.roots(), vec![root(0), root(0x44)]);
    }
}
