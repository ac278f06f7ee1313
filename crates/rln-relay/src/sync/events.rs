use super::source::RawEvent;
use ethers::types::U256;
use rln_types::{Commitment, RlnError, COMMITMENT_SIZE};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MembershipEvent {
    pub block_number: u64,
    pub removed: bool,
    pub index: u64,
    pub commitment: Commitment,
}

/// Registry commitments are field elements; the tree takes them little-endian.
pub fn commitment_from_u256(value: U256) -> Commitment {
    let mut bytes = [0u8; COMMITMENT_SIZE];
    value.to_little_endian(&mut bytes);
    Commitment::from_bytes(bytes)
}

pub fn commitment_to_u256(commitment: &Commitment) -> U256 {
    U256::from_little_endian(commitment.as_bytes())
}

impl TryFrom<RawEvent> for MembershipEvent {
    type Error = RlnError;

    fn try_from(raw: RawEvent) -> Result<Self, Self::Error> {
        let block_number = raw
            .block_number
            .ok_or_else(|| RlnError::EventApplicationSkipped("event has no block number".into()))?;
        let args = raw.args.ok_or_else(|| {
            RlnError::EventApplicationSkipped(format!("event at block {} has no args", block_number))
        })?;
        if args.index > U256::from(u64::MAX) {
            return Err(RlnError::EventApplicationSkipped(format!(
                "member index {} at block {} is out of range",
                args.index, block_number
            )));
        }

        Ok(Self {
            block_number,
            removed: raw.removed,
            index: args.index.as_u64(),
            commitment: commitment_from_u256(args.id_commitment),
        })
    }
}
