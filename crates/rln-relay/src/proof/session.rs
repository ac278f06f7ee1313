use super::engine::ProvingEngine;
use super::service::MerkleProofSource;
use chrono::{DateTime, Utc};
use rln_crypto::{hash_to_field, RLN_IDENTIFIER};
use rln_types::{
    serialize_path_witness, serialize_roots, serialize_verification_payload, serialize_witness_input,
    Commitment, Epoch, MerkleRoot, RateLimitProof, RlnError, RlnResult, EPOCH_SIZE,
    ID_SECRET_HASH_SIZE,
};
use std::sync::Arc;
use tracing::debug;

fn check_inputs(
    index: i64,
    epoch: &[u8],
    id_secret_hash: &[u8],
) -> RlnResult<([u8; EPOCH_SIZE], [u8; ID_SECRET_HASH_SIZE])> {
    let epoch: [u8; EPOCH_SIZE] = epoch.try_into().map_err(|_| {
        RlnError::InvalidArgument(format!("epoch must be {} bytes, got {}", EPOCH_SIZE, epoch.len()))
    })?;
    let id_secret_hash: [u8; ID_SECRET_HASH_SIZE] = id_secret_hash.try_into().map_err(|_| {
        RlnError::InvalidArgument(format!(
            "id secret hash must be {} bytes, got {}",
            ID_SECRET_HASH_SIZE,
            id_secret_hash.len()
        ))
    })?;
    if index < 0 {
        return Err(RlnError::InvalidArgument(format!(
            "membership index must be >= 0, got {}",
            index
        )));
    }
    Ok((epoch, id_secret_hash))
}

/// Proof generation and verification over a shared proving engine.
pub struct ProofSession<E: ?Sized> {
    engine: Arc<E>,
    epoch_unit_secs: u64,
}

impl<E: ?Sized> Clone for ProofSession<E> {
    fn clone(&self) -> Self {
        Self {
            engine: self.engine.clone(),
            epoch_unit_secs: self.epoch_unit_secs,
        }
    }
}

impl<E: ProvingEngine + ?Sized> ProofSession<E> {
    pub fn new(engine: Arc<E>, epoch_unit_secs: u64) -> Self {
        Self {
            engine,
            epoch_unit_secs,
        }
    }

    pub fn epoch_unit_secs(&self) -> u64 {
        self.epoch_unit_secs
    }

    pub fn engine(&self) -> &Arc<E> {
        &self.engine
    }

    /// Arguments are checked before the engine sees anything.
    pub async fn generate(
        &self,
        signal: &[u8],
        index: i64,
        epoch: &[u8],
        id_secret_hash: &[u8],
    ) -> RlnResult<RateLimitProof> {
        let (epoch, id_secret_hash) = check_inputs(index, epoch, id_secret_hash)?;

        let input = serialize_witness_input(&id_secret_hash, index, &epoch, signal)?;
        let witness = self.engine.generate_witness(&input)?;
        self.prove(index, &witness).await
    }

    /// Like [`Self::generate`], but the member's path comes from `service`
    /// instead of the engine's own tree.
    pub async fn generate_with_service<S>(
        &self,
        signal: &[u8],
        index: i64,
        epoch: &[u8],
        id_secret_hash: &[u8],
        commitment: &Commitment,
        service: &S,
    ) -> RlnResult<RateLimitProof>
    where
        S: MerkleProofSource + ?Sized,
    {
        let (epoch, id_secret_hash) = check_inputs(index, epoch, id_secret_hash)?;

        let message = serialize_witness_input(&id_secret_hash, index, &epoch, signal)?;
        let path = service.merkle_path(commitment).await?;
        debug!("Fetched depth-{} merkle path for {}", path.depth(), commitment);

        let witness = serialize_path_witness(
            &id_secret_hash,
            &path,
            &hash_to_field(&message),
            &epoch,
            &hash_to_field(RLN_IDENTIFIER),
        )?;
        self.prove(index, &witness).await
    }

    async fn prove(&self, index: i64, witness: &[u8]) -> RlnResult<RateLimitProof> {
        let evaluated = self.engine.evaluate_witness(witness).await?;
        let proof_bytes = self.engine.prove_with_witness(&evaluated, witness).await?;

        let proof = RateLimitProof::from_bytes(&proof_bytes)?;
        debug!("Generated proof for member {} at root {}", index, proof.merkle_root);
        Ok(proof)
    }

    /// Generates for the epoch containing `at`, or the current one.
    pub async fn generate_at(
        &self,
        signal: &[u8],
        index: i64,
        at: Option<DateTime<Utc>>,
        id_secret_hash: &[u8],
    ) -> RlnResult<RateLimitProof> {
        let at = at.unwrap_or_else(Utc::now);
        let epoch = Epoch::from_datetime(&at, self.epoch_unit_secs)?;
        self.generate(signal, index, &epoch.to_bytes(), id_secret_hash).await
    }

    /// Checks against the engine's own tree root.
    pub fn verify(&self, proof: &RateLimitProof, signal: &[u8]) -> RlnResult<bool> {
        let payload = serialize_verification_payload(proof, signal)?;
        self.engine.verify(&payload)
    }

    /// Accepts a proof made against any of `roots`; an empty set ignores the root.
    pub fn verify_against_roots(
        &self,
        proof: &RateLimitProof,
        signal: &[u8],
        roots: &[MerkleRoot],
    ) -> RlnResult<bool> {
        let payload = serialize_verification_payload(proof, signal)?;
        self.engine.verify_with_roots(&payload, &serialize_roots(roots))
    }

    pub fn verify_no_root(&self, proof: &RateLimitProof, signal: &[u8]) -> RlnResult<bool> {
        self.verify_against_roots(proof, signal, &[])
    }
}
