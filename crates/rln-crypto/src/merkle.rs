use crate::accumulator::Accumulator;
use crate::poseidon::{bytes_to_fr, fr_to_bytes, poseidon_hash2_fields};
use ark_bn254::Fr;
use rln_types::{deserialize_commitments, Commitment, MerkleRoot, RlnError, RlnResult};
use std::collections::HashMap;

pub const MAX_TREE_DEPTH: usize = 32;

/// Sparse Poseidon Merkle tree with a fixed depth. Only non-default nodes are
/// stored, so an empty depth-20 tree costs nothing and each write is O(depth).
pub struct PoseidonMerkleTree {
    depth: usize,
    nodes: HashMap<(usize, u64), Fr>,
    zero_values: Vec<Fr>,
    next_index: u64,
}

impl PoseidonMerkleTree {
    pub fn new(depth: usize) -> RlnResult<Self> {
        if depth == 0 || depth > MAX_TREE_DEPTH {
            return Err(RlnError::Accumulator(format!(
                "tree depth must be in 1..={}, got {}",
                MAX_TREE_DEPTH, depth
            )));
        }

        // Empty leaves are the zero element
        let mut zero_values = Vec::with_capacity(depth + 1);
        let mut current = Fr::from(0u64);
        zero_values.push(current);
        for _ in 0..depth {
            current = poseidon_hash2_fields(current, current);
            zero_values.push(current);
        }

        Ok(Self {
            depth,
            nodes: HashMap::new(),
            zero_values,
            next_index: 0,
        })
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn capacity(&self) -> u64 {
        1u64 << self.depth
    }

    pub fn leaf(&self, index: u64) -> [u8; 32] {
        fr_to_bytes(&self.node(0, index))
    }

    /// Applies a `count | commitments` batch starting at `start`.
    pub fn set_leaves_from_bytes(&mut self, start: u64, payload: &[u8]) -> RlnResult<()> {
        let commitments = deserialize_commitments(payload)?;
        self.insert_members(start, &commitments)
    }

    fn node(&self, level: usize, index: u64) -> Fr {
        self.nodes
            .get(&(level, index))
            .copied()
            .unwrap_or(self.zero_values[level])
    }

    fn store(&mut self, level: usize, index: u64, value: Fr) {
        if value == self.zero_values[level] {
            self.nodes.remove(&(level, index));
        } else {
            self.nodes.insert((level, index), value);
        }
    }

    fn check_index(&self, index: u64) -> RlnResult<()> {
        if index >= self.capacity() {
            return Err(RlnError::Accumulator(format!(
                "index {} exceeds tree capacity {}",
                index,
                self.capacity()
            )));
        }
        Ok(())
    }

    fn set_leaf(&mut self, index: u64, leaf: Fr) {
        self.store(0, index, leaf);

        let mut idx = index;
        for level in 0..self.depth {
            let sibling = idx ^ 1;
            let (left, right) = if idx % 2 == 0 {
                (self.node(level, idx), self.node(level, sibling))
            } else {
                (self.node(level, sibling), self.node(level, idx))
            };
            idx /= 2;
            let parent = poseidon_hash2_fields(left, right);
            self.store(level + 1, idx, parent);
        }
    }
}

impl Accumulator for PoseidonMerkleTree {
    fn insert_members(&mut self, start: u64, commitments: &[Commitment]) -> RlnResult<()> {
        if commitments.is_empty() {
            return Ok(());
        }
        let end = start
            .checked_add(commitments.len() as u64)
            .ok_or_else(|| RlnError::Accumulator("index overflow".into()))?;
        self.check_index(end - 1)?;

        for (offset, commitment) in commitments.iter().enumerate() {
            self.set_leaf(start + offset as u64, bytes_to_fr(commitment.as_bytes()));
        }
        self.next_index = self.next_index.max(end);
        Ok(())
    }

    fn delete_member(&mut self, index: u64) -> RlnResult<()> {
        self.check_index(index)?;
        let zero = self.zero_values[0];
        self.set_leaf(index, zero);
        Ok(())
    }

    fn merkle_root(&self) -> RlnResult<MerkleRoot> {
        Ok(MerkleRoot::from_bytes(fr_to_bytes(&self.node(self.depth, 0))))
    }

    fn next_index(&self) -> u64 {
        self.next_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rln_types::serialize_commitments;

    fn commitment(n: u8) -> Commitment {
        let mut bytes = [0u8; 32];
        bytes[0] = n;
        Commitment::from_bytes(bytes)
    }

    /// Dense recomputation used as a reference.
    fn dense_root(leaves: &[Fr], depth: usize) -> Fr {
        let mut level: Vec<Fr> = leaves.to_vec();
        level.resize(1usize << depth, Fr::from(0u64));
        while level.len() > 1 {
            level = level
                .chunks(2)
                .map(|pair| poseidon_hash2_fields(pair[0], pair[1]))
                .collect();
        }
        level[0]
    }

    #[test]
    fn test_empty_tree_root() {
        let tree = PoseidonMerkleTree::new(4).unwrap();
        let expected = dense_root(&[], 4);
        assert_eq!(tree.merkle_root().unwrap(), MerkleRoot::from_bytes(fr_to_bytes(&expected)));
        assert_ne!(tree.merkle_root().unwrap(), MerkleRoot::zero());
        assert_eq!(tree.next_index(), 0);
    }

    #[test]
    fn test_insert_matches_dense() {
        let mut tree = PoseidonMerkleTree::new(3).unwrap();
        let a = tree.insert_member(&commitment(1)).unwrap();
        let b = tree.insert_member(&commitment(2)).unwrap();
        let c = tree.insert_member(&commitment(3)).unwrap();
        assert_eq!((a, b, c), (0, 1, 2));

        let leaves: Vec<Fr> = (1..=3u64).map(Fr::from).collect();
        assert_eq!(
            tree.merkle_root().unwrap().as_bytes(),
            &fr_to_bytes(&dense_root(&leaves, 3))
        );
    }

    #[test]
    fn test_delete_clears_leaf() {
        let mut tree = PoseidonMerkleTree::new(3).unwrap();
        let empty = tree.merkle_root().unwrap();

        tree.insert_member(&commitment(9)).unwrap();
        assert_ne!(tree.merkle_root().unwrap(), empty);

        tree.delete_member(0).unwrap();
        assert_eq!(tree.merkle_root().unwrap(), empty);
        assert_eq!(tree.leaf(0), [0u8; 32]);
        // Deletion leaves the index allocator alone
        assert_eq!(tree.next_index(), 1);
    }

    #[test]
    fn test_sparse_writes() {
        let mut tree = PoseidonMerkleTree::new(4).unwrap();
        tree.insert_members(5, &[commitment(7)]).unwrap();
        assert_eq!(tree.next_index(), 6);
        assert_eq!(tree.leaf(5)[0], 7);

        let mut leaves = vec![Fr::from(0u64); 6];
        leaves[5] = Fr::from(7u64);
        assert_eq!(
            tree.merkle_root().unwrap().as_bytes(),
            &fr_to_bytes(&dense_root(&leaves, 4))
        );
    }

    #[test]
    fn test_capacity_enforced() {
        let mut tree = PoseidonMerkleTree::new(2).unwrap();
        tree.insert_members(0, &[commitment(1), commitment(2), commitment(3), commitment(4)])
            .unwrap();
        assert!(matches!(
            tree.insert_member(&commitment(5)),
            Err(RlnError::Accumulator(_))
        ));
        assert!(tree.delete_member(4).is_err());
        assert!(PoseidonMerkleTree::new(0).is_err());
        assert!(PoseidonMerkleTree::new(MAX_TREE_DEPTH + 1).is_err());
    }

    #[test]
    fn test_set_leaves_from_bytes() {
        let batch = vec![commitment(1), commitment(2)];
        let payload = serialize_commitments(&batch).unwrap();

        let mut from_bytes = PoseidonMerkleTree::new(4).unwrap();
        from_bytes.set_leaves_from_bytes(2, &payload).unwrap();

        let mut direct = PoseidonMerkleTree::new(4).unwrap();
        direct.insert_members(2, &batch).unwrap();

        assert_eq!(from_bytes.merkle_root().unwrap(), direct.merkle_root().unwrap());
    }

    proptest! {
        #[test]
        fn insert_then_delete_restores_root(values in proptest::collection::vec(1u8..=255, 1..8)) {
            let mut tree = PoseidonMerkleTree::new(3).unwrap();
            let empty = tree.merkle_root().unwrap();
            for v in &values {
                tree.insert_member(&commitment(*v)).unwrap();
            }
            for index in 0..values.len() as u64 {
                tree.delete_member(index).unwrap();
            }
            prop_assert_eq!(tree.merkle_root().unwrap(), empty);
        }
    }
}
