use crate::epoch::{Epoch, EPOCH_SIZE};
use crate::error::{RlnError, RlnResult};
use crate::membership::MerkleRoot;
use std::fmt;

pub const ZK_PROOF_SIZE: usize = 128;

pub const FIELD_ELEMENT_SIZE: usize = 32;

/// `zk_proof<128> | root | epoch | share_x | share_y | nullifier | rln_identifier`
pub const PROOF_SIZE: usize = ZK_PROOF_SIZE + 6 * FIELD_ELEMENT_SIZE;

const ROOT_OFFSET: usize = ZK_PROOF_SIZE;
const EPOCH_OFFSET: usize = ROOT_OFFSET + FIELD_ELEMENT_SIZE;
const SHARE_X_OFFSET: usize = EPOCH_OFFSET + EPOCH_SIZE;
const SHARE_Y_OFFSET: usize = SHARE_X_OFFSET + FIELD_ELEMENT_SIZE;
const NULLIFIER_OFFSET: usize = SHARE_Y_OFFSET + FIELD_ELEMENT_SIZE;
const RLN_IDENTIFIER_OFFSET: usize = NULLIFIER_OFFSET + FIELD_ELEMENT_SIZE;

/// A rate-limit proof with its public outputs. The fields are opaque to this
/// crate; only the proving engine interprets them.
#[derive(Clone, PartialEq, Eq)]
pub struct RateLimitProof {
    pub proof: [u8; ZK_PROOF_SIZE],
    pub merkle_root: MerkleRoot,
    pub epoch: [u8; EPOCH_SIZE],
    pub share_x: [u8; FIELD_ELEMENT_SIZE],
    pub share_y: [u8; FIELD_ELEMENT_SIZE],
    pub nullifier: [u8; FIELD_ELEMENT_SIZE],
    pub rln_identifier: [u8; FIELD_ELEMENT_SIZE],
}

fn field<const N: usize>(bytes: &[u8], offset: usize) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes[offset..offset + N]);
    out
}

impl RateLimitProof {
    /// Decodes the first [`PROOF_SIZE`] bytes. Trailing bytes are ignored.
    pub fn from_bytes(bytes: &[u8]) -> RlnResult<Self> {
        if bytes.len() < PROOF_SIZE {
            return Err(RlnError::MalformedProof {
                expected: PROOF_SIZE,
                actual: bytes.len(),
            });
        }

        Ok(Self {
            proof: field(bytes, 0),
            merkle_root: MerkleRoot::from_bytes(field(bytes, ROOT_OFFSET)),
            epoch: field(bytes, EPOCH_OFFSET),
            share_x: field(bytes, SHARE_X_OFFSET),
            share_y: field(bytes, SHARE_Y_OFFSET),
            nullifier: field(bytes, NULLIFIER_OFFSET),
            rln_identifier: field(bytes, RLN_IDENTIFIER_OFFSET),
        })
    }

    pub fn to_bytes(&self) -> [u8; PROOF_SIZE] {
        let mut out = [0u8; PROOF_SIZE];
        out[..ROOT_OFFSET].copy_from_slice(&self.proof);
        out[ROOT_OFFSET..EPOCH_OFFSET].copy_from_slice(self.merkle_root.as_bytes());
        out[EPOCH_OFFSET..SHARE_X_OFFSET].copy_from_slice(&self.epoch);
        out[SHARE_X_OFFSET..SHARE_Y_OFFSET].copy_from_slice(&self.share_x);
        out[SHARE_Y_OFFSET..NULLIFIER_OFFSET].copy_from_slice(&self.share_y);
        out[NULLIFIER_OFFSET..RLN_IDENTIFIER_OFFSET].copy_from_slice(&self.nullifier);
        out[RLN_IDENTIFIER_OFFSET..].copy_from_slice(&self.rln_identifier);
        out
    }

    pub fn epoch(&self) -> RlnResult<Epoch> {
        Epoch::from_bytes(&self.epoch)
    }
}

impl fmt::Debug for RateLimitProof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RateLimitProof")
            .field("merkle_root", &self.merkle_root)
            .field("epoch", &hex::encode(self.epoch))
            .field("nullifier", &hex::encode(self.nullifier))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample_bytes() -> [u8; PROOF_SIZE] {
        let mut raw = [0u8; PROOF_SIZE];
        for (i, b) in raw.iter_mut().enumerate() {
            *b = (i % 251) as u8;
        }
        raw
    }

    #[test]
    fn test_proof_size() {
        assert_eq!(PROOF_SIZE, 320);
        assert_eq!(RLN_IDENTIFIER_OFFSET + FIELD_ELEMENT_SIZE, PROOF_SIZE);
    }

    #[test]
    fn test_decode_zeroed_proof() {
        let proof = RateLimitProof::from_bytes(&[0u8; PROOF_SIZE]).unwrap();
        assert_eq!(proof.proof, [0u8; ZK_PROOF_SIZE]);
        assert_eq!(proof.merkle_root, MerkleRoot::zero());
        assert_eq!(proof.epoch, [0u8; 32]);
        assert_eq!(proof.share_x, [0u8; 32]);
        assert_eq!(proof.share_y, [0u8; 32]);
        assert_eq!(proof.nullifier, [0u8; 32]);
        assert_eq!(proof.rln_identifier, [0u8; 32]);
        assert_eq!(proof.epoch().unwrap(), Epoch(0));
    }

    #[test]
    fn test_decode_short_proof() {
        let err = RateLimitProof::from_bytes(&[0u8; 319]).unwrap_err();
        assert!(matches!(
            err,
            RlnError::MalformedProof {
                expected: 320,
                actual: 319
            }
        ));
        assert!(RateLimitProof::from_bytes(&[]).is_err());
    }

    #[test]
    fn test_decode_field_offsets() {
        let raw = sample_bytes();
        let proof = RateLimitProof::from_bytes(&raw).unwrap();

        assert_eq!(&proof.proof[..], &raw[0..128]);
        assert_eq!(&proof.merkle_root.as_bytes()[..], &raw[128..160]);
        assert_eq!(&proof.epoch[..], &raw[160..192]);
        assert_eq!(&proof.share_x[..], &raw[192..224]);
        assert_eq!(&proof.share_y[..], &raw[224..256]);
        assert_eq!(&proof.nullifier[..], &raw[256..288]);
        assert_eq!(&proof.rln_identifier[..], &raw[288..320]);
    }

    #[test]
    fn test_decode_ignores_trailing_bytes() {
        let mut long = sample_bytes().to_vec();
        long.extend_from_slice(&[0xee; 16]);
        let proof = RateLimitProof::from_bytes(&long).unwrap();
        assert_eq!(proof.to_bytes(), sample_bytes());
    }

    #[test]
    fn test_epoch_accessor() {
        let mut raw = [0u8; PROOF_SIZE];
        raw[EPOCH_OFFSET..SHARE_X_OFFSET].copy_from_slice(&Epoch(157_783_680).to_bytes());
        let proof = RateLimitProof::from_bytes(&raw).unwrap();
        assert_eq!(proof.epoch().unwrap(), Epoch(157_783_680));
    }

    proptest! {
        #[test]
        fn proof_bytes_round_trip(raw in proptest::collection::vec(any::<u8>(), PROOF_SIZE)) {
            let proof = RateLimitProof::from_bytes(&raw).unwrap();
            prop_assert_eq!(&proof.to_bytes()[..], &raw[..]);
        }
    }
}
