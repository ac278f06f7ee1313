use crate::proof::DEFAULT_PROOF_SERVICE_URL;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ProofConfig {
    /// Base URL of the Merkle path endpoint; the member's commitment is appended.
    pub service_url: String,
}

impl Default for ProofConfig {
    fn default() -> Self {
        Self {
            service_url: DEFAULT_PROOF_SERVICE_URL.to_string(),
        }
    }
}
