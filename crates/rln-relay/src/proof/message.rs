use super::engine::ProvingEngine;
use super::service::MerkleProofSource;
use super::session::ProofSession;
use chrono::{DateTime, Utc};
use rln_types::{build_signal, Epoch, IdentityCredential, MerkleRoot, RateLimitProof, RlnError, RlnResult};
use std::sync::Arc;
use tracing::debug;

/// An application message and the rate-limit proof riding along with it.
#[derive(Clone, Debug)]
pub struct RlnMessage {
    pub content_topic: String,
    pub payload: Vec<u8>,
    pub timestamp: Option<DateTime<Utc>>,
    pub rate_limit_proof: Option<RateLimitProof>,
}

impl RlnMessage {
    pub fn signal(&self) -> Vec<u8> {
        build_signal(&self.content_topic, &self.payload)
    }

    pub fn epoch(&self) -> RlnResult<Option<Epoch>> {
        self.rate_limit_proof.as_ref().map(|p| p.epoch()).transpose()
    }

    /// `Ok(false)` when the message carries no proof.
    pub fn verify<E: ProvingEngine + ?Sized>(
        &self,
        session: &ProofSession<E>,
        roots: &[MerkleRoot],
    ) -> RlnResult<bool> {
        match &self.rate_limit_proof {
            Some(proof) => session.verify_against_roots(proof, &self.signal(), roots),
            None => Ok(false),
        }
    }

    pub fn verify_no_root<E: ProvingEngine + ?Sized>(&self, session: &ProofSession<E>) -> RlnResult<bool> {
        self.verify(session, &[])
    }
}

/// Attaches a fresh proof to outgoing messages for one membership.
pub struct RlnEncoder<E: ?Sized> {
    session: ProofSession<E>,
    credential: IdentityCredential,
    index: i64,
    proof_service: Option<Arc<dyn MerkleProofSource>>,
}

impl<E: ProvingEngine + ?Sized> RlnEncoder<E> {
    pub fn new(session: ProofSession<E>, credential: IdentityCredential, index: i64) -> RlnResult<Self> {
        if index < 0 {
            return Err(RlnError::InvalidArgument("invalid membership index".into()));
        }
        Ok(Self {
            session,
            credential,
            index,
            proof_service: None,
        })
    }

    /// Fetch the member's path from `service` for every proof.
    pub fn with_proof_service(mut self, service: Arc<dyn MerkleProofSource>) -> Self {
        self.proof_service = Some(service);
        self
    }

    pub fn index(&self) -> i64 {
        self.index
    }

    pub async fn encode(
        &self,
        content_topic: &str,
        payload: &[u8],
        timestamp: Option<DateTime<Utc>>,
    ) -> RlnResult<RlnMessage> {
        let timestamp = timestamp.unwrap_or_else(Utc::now);
        let signal = build_signal(content_topic, payload);

        let epoch = Epoch::from_datetime(&timestamp, self.session.epoch_unit_secs())?.to_bytes();
        let secret = self.credential.id_secret_hash();

        let proof = match &self.proof_service {
            Some(service) => {
                self.session
                    .generate_with_service(
                        &signal,
                        self.index,
                        &epoch,
                        secret,
                        &self.credential.commitment(),
                        service.as_ref(),
                    )
                    .await?
            }
            None => self.session.generate(&signal, self.index, &epoch, secret).await?,
        };
        debug!("Attached proof for epoch {:?} to {}", proof.epoch().ok(), content_topic);

        Ok(RlnMessage {
            content_topic: content_topic.to_string(),
            payload: payload.to_vec(),
            timestamp: Some(timestamp),
            rate_limit_proof: Some(proof),
        })
    }
}
