use crate::sync::commitment_to_u256;
use async_trait::async_trait;
use reqwest::Client;
use rln_types::{Commitment, MerklePath, RlnError, RlnResult};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_PROOF_SERVICE_URL: &str = "http://localhost:8645/debug/v1/merkleProof";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Supplies the authentication path of a member when the caller keeps no
/// local copy of the membership tree.
#[async_trait]
pub trait MerkleProofSource: Send + Sync {
    async fn merkle_path(&self, commitment: &Commitment) -> RlnResult<MerklePath>;
}

/// Body of `GET <base>/<commitment>`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerkleProofResponse {
    pub path_elements: Vec<String>,
    pub path_indexes: Vec<serde_json::Value>,
}

impl TryFrom<MerkleProofResponse> for MerklePath {
    type Error = RlnError;

    fn try_from(response: MerkleProofResponse) -> Result<Self, Self::Error> {
        let elements = response
            .path_elements
            .iter()
            .map(|element| {
                let bytes = hex::decode(element.trim_start_matches("0x")).map_err(|e| {
                    RlnError::Serialization(format!("path element {:?}: {}", element, e))
                })?;
                <[u8; 32]>::try_from(bytes.as_slice()).map_err(|_| {
                    RlnError::Serialization(format!(
                        "path element must be 32 bytes, got {}",
                        bytes.len()
                    ))
                })
            })
            .collect::<RlnResult<Vec<_>>>()?;

        // Indexes arrive as decimal strings or as numbers
        let indexes = response
            .path_indexes
            .iter()
            .map(|value| {
                let parsed = match value {
                    serde_json::Value::String(s) => s.trim().parse::<u8>().ok(),
                    serde_json::Value::Number(n) => n.as_u64().and_then(|n| u8::try_from(n).ok()),
                    _ => None,
                };
                parsed
                    .filter(|i| *i <= 1)
                    .ok_or_else(|| RlnError::Serialization(format!("invalid path index {}", value)))
            })
            .collect::<RlnResult<Vec<_>>>()?;

        if elements.len() != indexes.len() {
            return Err(RlnError::Serialization(format!(
                "merkle proof has {} elements but {} indexes",
                elements.len(),
                indexes.len()
            )));
        }

        Ok(MerklePath { elements, indexes })
    }
}

/// Fetches Merkle paths from a node's debug endpoint.
pub struct HttpMerkleProofService {
    client: Client,
    base_url: String,
}

impl HttpMerkleProofService {
    pub fn new(base_url: impl Into<String>) -> RlnResult<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| RlnError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The commitment is addressed by its decimal integer value.
    pub fn path_url(&self, commitment: &Commitment) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            commitment_to_u256(commitment)
        )
    }
}

#[async_trait]
impl MerkleProofSource for HttpMerkleProofService {
    async fn merkle_path(&self, commitment: &Commitment) -> RlnResult<MerklePath> {
        let url = self.path_url(commitment);
        debug!("HTTP GET: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| RlnError::Network(format!("Merkle proof request failed: {}", e)))?
            .error_for_status()
            .map_err(|e| RlnError::Network(format!("Merkle proof service error: {}", e)))?;

        let body: MerkleProofResponse = response
            .json()
            .await
            .map_err(|e| RlnError::Serialization(format!("Invalid merkle proof response: {}", e)))?;

        MerklePath::try_from(body)
    }
}
