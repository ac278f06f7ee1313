#![deny(unsafe_code)]
#![warn(clippy::all)]

pub mod accumulator;
pub mod hash;
pub mod merkle;
pub mod poseidon;

pub use accumulator::Accumulator;
pub use hash::{hash_to_field, RLN_IDENTIFIER};
pub use merkle::{PoseidonMerkleTree, MAX_TREE_DEPTH};
pub use poseidon::{bytes_to_fr, canonical_config, fr_to_bytes, poseidon_hash2_fields};
