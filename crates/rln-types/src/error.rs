use thiserror::Error;

#[derive(Error, Debug)]
pub enum RlnError {
    #[error("Encoding range error: {0}")]
    EncodingRange(String),

    #[error("Malformed proof: expected {expected} bytes, got {actual}")]
    MalformedProof { expected: usize, actual: usize },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Sync chunk [{from_block}, {to_block}] failed: {reason}")]
    SyncChunkFailure {
        from_block: u64,
        to_block: u64,
        reason: String,
    },

    #[error("Event skipped: {0}")]
    EventApplicationSkipped(String),

    #[error("Root for block {block} is not newer than block {newest}")]
    OutOfOrderRoot { block: u64, newest: u64 },

    #[error("Accumulator error: {0}")]
    Accumulator(String),

    #[error("Proving engine error: {0}")]
    Engine(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Contract error: {0}")]
    Contract(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type RlnResult<T> = Result<T, RlnError>;
