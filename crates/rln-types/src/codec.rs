//! Fixed-width little-endian layouts shared with the proving engine and with
//! every other client of the protocol. Field order and widths here are part of
//! the wire contract.

use crate::epoch::EPOCH_SIZE;
use crate::error::{RlnError, RlnResult};
use crate::membership::{Commitment, MerklePath, MerkleRoot, COMMITMENT_SIZE, ID_SECRET_HASH_SIZE};
use crate::proof::RateLimitProof;

/// Width of every length/index prefix on the wire.
pub const UINT_FIELD_SIZE: usize = 8;

const MAX_UINT_WIDTH: usize = 16;

/// Encodes a non-negative integer into exactly `width` little-endian bytes.
pub fn uint_to_le_bytes(value: i128, width: usize) -> RlnResult<Vec<u8>> {
    if width == 0 || width > MAX_UINT_WIDTH {
        return Err(RlnError::EncodingRange(format!(
            "unsupported field width {}",
            width
        )));
    }
    if value < 0 {
        return Err(RlnError::EncodingRange(format!(
            "negative value {} for {}-byte field",
            value, width
        )));
    }

    let unsigned = value as u128;
    if width < MAX_UINT_WIDTH && unsigned >> (width * 8) != 0 {
        return Err(RlnError::EncodingRange(format!(
            "value {} does not fit in {} bytes",
            value, width
        )));
    }

    Ok(unsigned.to_le_bytes()[..width].to_vec())
}

/// Reads an unsigned little-endian integer spanning all of `bytes`.
pub fn uint_from_le_bytes(bytes: &[u8]) -> RlnResult<u128> {
    if bytes.len() > MAX_UINT_WIDTH {
        return Err(RlnError::EncodingRange(format!(
            "{}-byte field exceeds {} bytes",
            bytes.len(),
            MAX_UINT_WIDTH
        )));
    }

    Ok(bytes
        .iter()
        .rev()
        .fold(0u128, |acc, b| (acc << 8) | u128::from(*b)))
}

fn length_prefix(len: usize) -> RlnResult<Vec<u8>> {
    uint_to_le_bytes(len as i128, UINT_FIELD_SIZE)
}

/// The public signal is `payload || utf8(content_topic)`, unhashed.
pub fn build_signal(content_topic: &str, payload: &[u8]) -> Vec<u8> {
    let mut signal = Vec::with_capacity(payload.len() + content_topic.len());
    signal.extend_from_slice(payload);
    signal.extend_from_slice(content_topic.as_bytes());
    signal
}

/// `[ id_secret_hash<32> | index<8> | epoch<32> | signal_len<8> | signal<var> ]`
pub fn serialize_witness_input(
    id_secret_hash: &[u8; ID_SECRET_HASH_SIZE],
    index: i64,
    epoch: &[u8; EPOCH_SIZE],
    signal: &[u8],
) -> RlnResult<Vec<u8>> {
    let index_bytes = uint_to_le_bytes(i128::from(index), UINT_FIELD_SIZE)?;
    let signal_len = length_prefix(signal.len())?;

    let mut out = Vec::with_capacity(
        ID_SECRET_HASH_SIZE + UINT_FIELD_SIZE + EPOCH_SIZE + UINT_FIELD_SIZE + signal.len(),
    );
    out.extend_from_slice(id_secret_hash);
    out.extend_from_slice(&index_bytes);
    out.extend_from_slice(epoch);
    out.extend_from_slice(&signal_len);
    out.extend_from_slice(signal);
    Ok(out)
}

/// `[ proof<320> | signal_len<8> | signal<var> ]`
pub fn serialize_verification_payload(proof: &RateLimitProof, signal: &[u8]) -> RlnResult<Vec<u8>> {
    let proof_bytes = proof.to_bytes();
    let signal_len = length_prefix(signal.len())?;

    let mut out = Vec::with_capacity(proof_bytes.len() + UINT_FIELD_SIZE + signal.len());
    out.extend_from_slice(&proof_bytes);
    out.extend_from_slice(&signal_len);
    out.extend_from_slice(signal);
    Ok(out)
}

/// `[ count<8> | commitment_1<32> | commitment_2<32> | ... ]`
pub fn serialize_commitments(commitments: &[Commitment]) -> RlnResult<Vec<u8>> {
    let count = length_prefix(commitments.len())?;

    let mut out = Vec::with_capacity(UINT_FIELD_SIZE + commitments.len() * COMMITMENT_SIZE);
    out.extend_from_slice(&count);
    for commitment in commitments {
        out.extend_from_slice(commitment.as_bytes());
    }
    Ok(out)
}

/// Inverse of [`serialize_commitments`]; the count prefix must match the body.
pub fn deserialize_commitments(bytes: &[u8]) -> RlnResult<Vec<Commitment>> {
    if bytes.len() < UINT_FIELD_SIZE {
        return Err(RlnError::InvalidArgument(format!(
            "commitment batch shorter than its {}-byte count",
            UINT_FIELD_SIZE
        )));
    }
    let count = uint_from_le_bytes(&bytes[..UINT_FIELD_SIZE])?;
    let body = &bytes[UINT_FIELD_SIZE..];
    if body.len() % COMMITMENT_SIZE != 0 || (body.len() / COMMITMENT_SIZE) as u128 != count {
        return Err(RlnError::InvalidArgument(format!(
            "commitment batch declares {} entries but carries {} bytes",
            count,
            body.len()
        )));
    }

    Ok(body
        .chunks_exact(COMMITMENT_SIZE)
        .map(|chunk| {
            let mut arr = [0u8; COMMITMENT_SIZE];
            arr.copy_from_slice(chunk);
            Commitment::from_bytes(arr)
        })
        .collect())
}

/// `[ id_secret_hash<32> | path_elements | path_indexes | message_hash<32> | epoch<32> | rln_identifier_hash<32> ]`
///
/// Witness for a member whose path comes from a proof service instead of a
/// local tree. `path_elements` is `count<8> | element<32>...` and
/// `path_indexes` is `count<8> | index<1>...`. Both hashes are field elements.
pub fn serialize_path_witness(
    id_secret_hash: &[u8; ID_SECRET_HASH_SIZE],
    path: &MerklePath,
    message_hash: &[u8; 32],
    epoch: &[u8; EPOCH_SIZE],
    rln_identifier_hash: &[u8; 32],
) -> RlnResult<Vec<u8>> {
    if path.elements.len() != path.indexes.len() {
        return Err(RlnError::InvalidArgument(format!(
            "merkle path has {} elements but {} indexes",
            path.elements.len(),
            path.indexes.len()
        )));
    }
    if let Some(bad) = path.indexes.iter().find(|i| **i > 1) {
        return Err(RlnError::InvalidArgument(format!("merkle path index {} is not 0 or 1", bad)));
    }

    let depth = path.elements.len();
    let mut out = Vec::with_capacity(ID_SECRET_HASH_SIZE + 2 * UINT_FIELD_SIZE + depth * 33 + 96);
    out.extend_from_slice(id_secret_hash);
    out.extend_from_slice(&length_prefix(depth)?);
    for element in &path.elements {
        out.extend_from_slice(element);
    }
    out.extend_from_slice(&length_prefix(depth)?);
    out.extend_from_slice(&path.indexes);
    out.extend_from_slice(message_hash);
    out.extend_from_slice(epoch);
    out.extend_from_slice(rln_identifier_hash);
    Ok(out)
}

/// Candidate roots are sent as a plain concatenation; empty means root-agnostic.
pub fn serialize_roots(roots: &[MerkleRoot]) -> Vec<u8> {
    roots.iter().flat_map(|r| r.as_bytes().iter().copied()).collect()
}
