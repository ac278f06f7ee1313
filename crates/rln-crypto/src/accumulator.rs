use rln_types::{Commitment, MerkleRoot, RlnResult};

/// The membership set as the synchronizer sees it: an indexed tree of
/// commitments that can be written at arbitrary positions and cleared.
pub trait Accumulator: Send {
    /// Writes `commitments` at consecutive indices starting from `start`.
    fn insert_members(&mut self, start: u64, commitments: &[Commitment]) -> RlnResult<()>;

    /// Clears the leaf at `index`. Other indices are not shifted.
    fn delete_member(&mut self, index: u64) -> RlnResult<()>;

    fn merkle_root(&self) -> RlnResult<MerkleRoot>;

    /// One past the highest index ever written.
    fn next_index(&self) -> u64;

    fn insert_member(&mut self, commitment: &Commitment) -> RlnResult<u64> {
        let index = self.next_index();
        self.insert_members(index, std::slice::from_ref(commitment))?;
        Ok(index)
    }
}
