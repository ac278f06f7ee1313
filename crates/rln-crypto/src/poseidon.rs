//! Poseidon over the BN254 scalar field.
//!
//! Width 3 (rate 2, capacity 1), 8 full and 57 partial rounds, x^5 S-box,
//! Grain LFSR round constants. The output is the first squeezed element.

use ark_bn254::Fr;
use ark_crypto_primitives::sponge::{
    poseidon::{find_poseidon_ark_and_mds, PoseidonConfig, PoseidonSponge},
    CryptographicSponge,
};
use ark_ff::{BigInteger, PrimeField};
use std::sync::OnceLock;

static CANONICAL_CONFIG: OnceLock<PoseidonConfig<Fr>> = OnceLock::new();

pub fn canonical_config() -> &'static PoseidonConfig<Fr> {
    CANONICAL_CONFIG.get_or_init(|| {
        let rate = 2;
        let full_rounds = 8;
        let partial_rounds = 57;

        let (ark, mds) =
            find_poseidon_ark_and_mds::<Fr>(Fr::MODULUS_BIT_SIZE as u64, rate, full_rounds, partial_rounds, 0);

        PoseidonConfig {
            full_rounds: full_rounds as usize,
            partial_rounds: partial_rounds as usize,
            alpha: 5,
            ark,
            mds,
            rate,
            capacity: 1,
        }
    })
}

pub fn poseidon_hash2_fields(left: Fr, right: Fr) -> Fr {
    let mut sponge = PoseidonSponge::new(canonical_config());
    sponge.absorb(&left);
    sponge.absorb(&right);
    let squeezed: Vec<Fr> = sponge.squeeze_field_elements(1);
    squeezed.first().copied().unwrap_or_default()
}

/// Little-endian canonical encoding.
pub fn fr_to_bytes(f: &Fr) -> [u8; 32] {
    let le = f.into_bigint().to_bytes_le();
    let mut bytes = [0u8; 32];
    let n = le.len().min(32);
    bytes[..n].copy_from_slice(&le[..n]);
    bytes
}

/// Reduces modulo the field order.
pub fn bytes_to_fr(bytes: &[u8; 32]) -> Fr {
    Fr::from_le_bytes_mod_order(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_order_sensitive() {
        let one = Fr::from(1u64);
        let two = Fr::from(2u64);

        assert_eq!(poseidon_hash2_fields(one, two), poseidon_hash2_fields(one, two));
        assert_ne!(poseidon_hash2_fields(one, two), poseidon_hash2_fields(two, one));
    }

    #[test]
    fn test_field_encoding_is_little_endian() {
        let value = Fr::from(0x0102_0304u64);
        let bytes = fr_to_bytes(&value);
        assert_eq!(&bytes[..4], &[0x04, 0x03, 0x02, 0x01]);
        assert!(bytes[4..].iter().all(|b| *b == 0));
        assert_eq!(bytes_to_fr(&bytes), value);
    }

    #[test]
    fn test_oversized_bytes_reduce() {
        let reduced = fr_to_bytes(&bytes_to_fr(&[0xff; 32]));
        assert_ne!(reduced, [0xff; 32]);
        assert_eq!(bytes_to_fr(&reduced), bytes_to_fr(&[0xff; 32]));
    }
}
