use async_trait::async_trait;
use rln_types::RlnResult;

/// The native prover. Inputs and outputs use the fixed binary layouts from
/// `rln_types::codec`; the engine owns its own tree state for root-less checks.
#[async_trait]
pub trait ProvingEngine: Send + Sync {
    fn generate_witness(&self, input: &[u8]) -> RlnResult<Vec<u8>>;

    async fn evaluate_witness(&self, witness: &[u8]) -> RlnResult<Vec<u8>>;

    /// Returns a 320-byte serialized proof.
    async fn prove_with_witness(&self, evaluated: &[u8], witness: &[u8]) -> RlnResult<Vec<u8>>;

    fn verify(&self, payload: &[u8]) -> RlnResult<bool>;

    /// `roots` is a concatenation of 32-byte roots; empty skips root matching.
    fn verify_with_roots(&self, payload: &[u8], roots: &[u8]) -> RlnResult<bool>;
}
