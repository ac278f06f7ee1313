mod engine;
mod message;
mod service;
mod session;

pub use engine::ProvingEngine;
pub use message::{RlnEncoder, RlnMessage};
pub use service::{
    HttpMerkleProofService, MerkleProofResponse, MerkleProofSource, DEFAULT_PROOF_SERVICE_URL,
};
pub use session::ProofSession;
