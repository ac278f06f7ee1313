use crate::root_tracker::{DEFAULT_ROOT_BUFFER, DEFAULT_ROOT_WINDOW};
use crate::sync::{FetchOptions, SyncOptions, DEFAULT_BLOCK_RANGE, DEFAULT_FETCH_CHUNKS};
use rln_types::{DEFAULT_EPOCH_UNIT_SECS, DEFAULT_TREE_DEPTH};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub block_range: u64,
    pub fetch_chunks: usize,
    pub root_window: usize,
    pub root_buffer: usize,
    pub tree_depth: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            block_range: DEFAULT_BLOCK_RANGE,
            fetch_chunks: DEFAULT_FETCH_CHUNKS,
            root_window: DEFAULT_ROOT_WINDOW,
            root_buffer: DEFAULT_ROOT_BUFFER,
            tree_depth: DEFAULT_TREE_DEPTH,
        }
    }
}

impl SyncConfig {
    pub fn options(&self) -> SyncOptions {
        SyncOptions {
            fetch: FetchOptions {
                block_range: self.block_range,
                fetch_chunks: self.fetch_chunks,
            },
            root_window: self.root_window,
            root_buffer: self.root_buffer,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct EpochConfig {
    pub unit_secs: u64,
}

impl Default for EpochConfig {
    fn default() -> Self {
        Self {
            unit_secs: DEFAULT_EPOCH_UNIT_SECS,
        }
    }
}
