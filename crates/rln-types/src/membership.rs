use crate::error::{RlnError, RlnResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

pub const COMMITMENT_SIZE: usize = 32;

pub const MERKLE_ROOT_SIZE: usize = 32;

pub const ID_SECRET_HASH_SIZE: usize = 32;

/// `trapdoor | nullifier | secret_hash | commitment`
pub const CREDENTIAL_SIZE: usize = 4 * 32;

fn decode_hex_32(s: &str, what: &str) -> RlnResult<[u8; 32]> {
    let bytes = hex::decode(s.trim_start_matches("0x"))
        .map_err(|e| RlnError::InvalidArgument(format!("{} hex: {}", what, e)))?;
    if bytes.len() != 32 {
        return Err(RlnError::InvalidArgument(format!(
            "{} must be 32 bytes, got {}",
            what,
            bytes.len()
        )));
    }
    let mut arr = [0u8; 32];
    arr.copy_from_slice(&bytes);
    Ok(arr)
}

/// Identity commitment as a 32-byte little-endian field element.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Commitment(pub [u8; COMMITMENT_SIZE]);

impl Commitment {
    pub fn from_bytes(bytes: [u8; COMMITMENT_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; COMMITMENT_SIZE] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> RlnResult<Self> {
        decode_hex_32(s, "commitment").map(Self)
    }

    pub fn zero() -> Self {
        Self([0u8; COMMITMENT_SIZE])
    }
}

impl fmt::Debug for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Commitment({})", self.to_hex())
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MerkleRoot(pub [u8; MERKLE_ROOT_SIZE]);

impl MerkleRoot {
    pub fn from_bytes(bytes: [u8; MERKLE_ROOT_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; MERKLE_ROOT_SIZE] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> RlnResult<Self> {
        decode_hex_32(s, "merkle root").map(Self)
    }

    pub fn zero() -> Self {
        Self([0u8; MERKLE_ROOT_SIZE])
    }
}

impl fmt::Debug for MerkleRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MerkleRoot({})", self.to_hex())
    }
}

impl fmt::Display for MerkleRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Default for MerkleRoot {
    fn default() -> Self {
        Self::zero()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberRecord {
    pub index: u64,
    pub commitment: Commitment,
}

/// A root together with the block whose events produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootSnapshot {
    pub block_number: u64,
    pub root: MerkleRoot,
}

/// Authentication path of one leaf, sibling hashes from leaf to root.
/// `indexes[i]` is 1 when the path node at level `i` is a right child.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MerklePath {
    pub elements: Vec<[u8; 32]>,
    pub indexes: Vec<u8>,
}

impl MerklePath {
    pub fn depth(&self) -> usize {
        self.elements.len()
    }
}

/// Secret material for one membership. Wiped on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct IdentityCredential {
    trapdoor: [u8; 32],
    nullifier: [u8; 32],
    secret_hash: [u8; ID_SECRET_HASH_SIZE],
    #[zeroize(skip)]
    commitment: Commitment,
}

impl IdentityCredential {
    pub fn new(
        trapdoor: [u8; 32],
        nullifier: [u8; 32],
        secret_hash: [u8; ID_SECRET_HASH_SIZE],
        commitment: Commitment,
    ) -> Self {
        Self {
            trapdoor,
            nullifier,
            secret_hash,
            commitment,
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> RlnResult<Self> {
        if bytes.len() != CREDENTIAL_SIZE {
            return Err(RlnError::InvalidArgument(format!(
                "credential must be {} bytes, got {}",
                CREDENTIAL_SIZE,
                bytes.len()
            )));
        }
        let mut parts = bytes.chunks_exact(32).map(|chunk| {
            let mut arr = [0u8; 32];
            arr.copy_from_slice(chunk);
            arr
        });
        let mut next = || {
            parts
                .next()
                .ok_or_else(|| RlnError::Internal("credential chunking".into()))
        };

        Ok(Self {
            trapdoor: next()?,
            nullifier: next()?,
            secret_hash: next()?,
            commitment: Commitment(next()?),
        })
    }

    pub fn to_bytes(&self) -> [u8; CREDENTIAL_SIZE] {
        let mut out = [0u8; CREDENTIAL_SIZE];
        out[..32].copy_from_slice(&self.trapdoor);
        out[32..64].copy_from_slice(&self.nullifier);
        out[64..96].copy_from_slice(&self.secret_hash);
        out[96..].copy_from_slice(self.commitment.as_bytes());
        out
    }

    pub fn trapdoor(&self) -> &[u8; 32] {
        &self.trapdoor
    }

    pub fn nullifier(&self) -> &[u8; 32] {
        &self.nullifier
    }

    pub fn id_secret_hash(&self) -> &[u8; ID_SECRET_HASH_SIZE] {
        &self.secret_hash
    }

    pub fn commitment(&self) -> Commitment {
        self.commitment
    }
}

impl fmt::Debug for IdentityCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityCredential")
            .field("commitment", &self.commitment)
            .field("secrets", &"[REDACTED]")
            .finish()
    }
}
