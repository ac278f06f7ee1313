use crate::poseidon::fr_to_bytes;
use ark_bn254::Fr;
use ark_ff::PrimeField;
use sha3::{Digest, Keccak256};

/// Application identifier bound into every proof made by this client.
pub const RLN_IDENTIFIER: &[u8] = b"zerokit/rln/010203040506070809";

/// Keccak-256 of `data`, read little-endian and reduced into the BN254 scalar field.
pub fn hash_to_field(data: &[u8]) -> [u8; 32] {
    let digest = Keccak256::digest(data);
    fr_to_bytes(&Fr::from_le_bytes_mod_order(&digest))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_hash_vector() {
        assert_eq!(
            hex::encode(hash_to_field(RLN_IDENTIFIER)),
            "a68c2b080816ce719780762877c5daae0b7554e460d3d48c9168926318c0d904"
        );
    }

    #[test]
    fn test_digest_above_modulus_is_reduced() {
        // keccak256("") read little-endian exceeds the field order
        assert_eq!(
            hex::encode(hash_to_field(b"")),
            "c3d246215e0c60b46f9d0abf4bf79b6f2b50b3505df786ca27ba754277e8db0f"
        );
    }

    #[test]
    fn test_distinct_inputs() {
        assert_ne!(hash_to_field(b"a"), hash_to_field(b"b"));
        assert_eq!(hash_to_field(b"a"), hash_to_field(b"a"));
    }
}
