use super::commands::{OutputFormat, ProofAction};
use super::utils::{decode_hex, print_json};
use rln_relay::{HttpMerkleProofService, MerkleProofSource, RelayConfig};
use rln_types::{build_signal, Commitment, RateLimitProof, RlnResult};
use serde_json::json;

pub async fn handle_proof(
    config: &RelayConfig,
    action: ProofAction,
    format: &OutputFormat,
) -> RlnResult<()> {
    match action {
        ProofAction::Decode { proof } => {
            let bytes = decode_hex(&proof, "proof")?;
            let proof = RateLimitProof::from_bytes(&bytes)?;
            let epoch = proof.epoch()?;

            match format {
                OutputFormat::Json => print_json(&json!({
                    "proof": hex::encode(proof.proof),
                    "merkle_root": proof.merkle_root.to_hex(),
                    "epoch": epoch.value(),
                    "share_x": hex::encode(proof.share_x),
                    "share_y": hex::encode(proof.share_y),
                    "nullifier": hex::encode(proof.nullifier),
                    "rln_identifier": hex::encode(proof.rln_identifier),
                }))?,
                OutputFormat::Text => {
                    println!("Rate-limit proof");
                    println!("  Merkle root:    0x{}", proof.merkle_root.to_hex());
                    println!("  Epoch:          {}", epoch);
                    println!("  Share x:        0x{}", hex::encode(proof.share_x));
                    println!("  Share y:        0x{}", hex::encode(proof.share_y));
                    println!("  Nullifier:      0x{}", hex::encode(proof.nullifier));
                    println!("  RLN identifier: 0x{}", hex::encode(proof.rln_identifier));
                }
            }
        }
        ProofAction::Signal { topic, payload } => {
            let payload = decode_hex(&payload, "payload")?;
            let signal = hex::encode(build_signal(&topic, &payload));

            match format {
                OutputFormat::Json => print_json(&json!({ "signal": signal }))?,
                OutputFormat::Text => println!("0x{}", signal),
            }
        }
        ProofAction::Path { commitment } => {
            let commitment = Commitment::from_hex(&commitment)?;
            let service = HttpMerkleProofService::new(config.proof.service_url.clone())?;
            let path = service.merkle_path(&commitment).await?;
            let elements: Vec<String> = path.elements.iter().map(hex::encode).collect();

            match format {
                OutputFormat::Json => print_json(&json!({
                    "depth": path.depth(),
                    "path_elements": elements,
                    "path_indexes": path.indexes,
                }))?,
                OutputFormat::Text => {
                    println!("Merkle path from {}", service.base_url());
                    println!("  Depth: {}", path.depth());
                    for (level, (element, index)) in elements.iter().zip(&path.indexes).enumerate() {
                        println!("  {:>3}  {}  0x{}", level, index, element);
                    }
                }
            }
        }
    }
    Ok(())
}
