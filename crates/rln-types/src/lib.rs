#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod codec;
pub mod epoch;
pub mod error;
pub mod membership;
pub mod proof;

pub use codec::{
    build_signal, deserialize_commitments, serialize_commitments, serialize_path_witness, serialize_roots,
    serialize_verification_payload, serialize_witness_input, uint_from_le_bytes, uint_to_le_bytes, UINT_FIELD_SIZE,
};
pub use epoch::{Epoch, DEFAULT_EPOCH_UNIT_SECS, EPOCH_INT_SIZE, EPOCH_SIZE};
pub use error::{RlnError, RlnResult};
pub use membership::{
    Commitment, IdentityCredential, MemberRecord, MerklePath, MerkleRoot, RootSnapshot,
    COMMITMENT_SIZE, CREDENTIAL_SIZE, ID_SECRET_HASH_SIZE, MERKLE_ROOT_SIZE,
};
pub use proof::{RateLimitProof, FIELD_ELEMENT_SIZE, PROOF_SIZE, ZK_PROOF_SIZE};

/// Depth of the on-chain membership tree used by deployed registries.
pub const DEFAULT_TREE_DEPTH: usize = 20;
