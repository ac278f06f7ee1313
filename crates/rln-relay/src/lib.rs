#![warn(clippy::all)]

pub mod cancellation;
pub mod config;
pub mod contracts;
pub mod proof;
pub mod root_tracker;
pub mod sync;

pub use cancellation::CancellationToken;
pub use config::{
    EpochConfig, LogLevel, LoggingConfig, ProofConfig, RegistryConfig, RelayConfig, SyncConfig,
};
pub use contracts::{ContractConfig, EthersLogSource, RegistryClient};
pub use proof::{
    HttpMerkleProofService, MerkleProofSource, ProofSession, ProvingEngine, RlnEncoder, RlnMessage,
};
pub use root_tracker::MerkleRootTracker;
pub use sync::{
    BatchReport, FetchOptions, LogSource, MembershipEvent, MembershipSynchronizer, RawEvent,
    SyncOptions, SyncStats,
};
