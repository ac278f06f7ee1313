mod events;
mod fetch;
mod poll;
mod source;
mod stats;
mod synchronizer;

pub use events::{commitment_from_u256, commitment_to_u256, MembershipEvent};
pub use fetch::{fetch_events, split_to_chunks, FetchOptions, FetchOutcome, DEFAULT_BLOCK_RANGE, DEFAULT_FETCH_CHUNKS};
pub use poll::poll_new_events;
pub use source::{EventArgs, LogSource, RawEvent};
pub use stats::{BatchReport, SyncStats};
pub use synchronizer::{MembershipSynchronizer, SyncOptions};
