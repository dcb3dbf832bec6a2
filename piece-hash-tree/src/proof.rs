//! Inclusion proofs for single leaves.
//!
//! A [`LeafProof`] carries the leaf digest and its uncles, the siblings of
//! every node on the path from the leaf to the root, ordered bottom-up.

use bincode::{Decode, Encode};

use crate::{
    PieceTree, PieceTreeError,
    hash::{Digest, PieceHasher},
    index,
};

/// Proof that a leaf digest is part of a tree with a given root.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct LeafProof {
    /// Zero-based position of the proved leaf.
    pub(crate) leaf_index: u64,
    /// Real leaf count of the tree the proof was taken from.
    pub(crate) leaf_count: u64,
    /// The proved leaf digest.
    pub(crate) leaf: Digest,
    /// Sibling digests from the leaf level up to the root's children.
    pub(crate) uncles: Vec<Digest>,
}

impl PieceTree {
    /// Generate a proof for real leaf `leaf_index`.
    pub fn prove(&self, leaf_index: usize) -> Result<LeafProof, PieceTreeError> {
        if leaf_index >= self.leaf_count() {
            return Err(PieceTreeError::LeafOutOfRange {
                index: leaf_index,
                leaf_count: self.leaf_count(),
            });
        }

        let nodes = self.nodes();
        let mut position = index::first_leaf(nodes.len()) + leaf_index;
        let leaf = nodes[position];
        let mut uncles = Vec::with_capacity(self.num_layers() - 1);
        while let (Some(sibling), Some(parent)) =
            (index::sibling(position), index::parent(position))
        {
            uncles.push(nodes[sibling]);
            position = parent;
        }

        Ok(LeafProof {
            leaf_index: leaf_index as u64,
            leaf_count: self.leaf_count() as u64,
            leaf,
            uncles,
        })
    }
}

impl LeafProof {
    /// Position of the proved leaf.
    pub fn leaf_index(&self) -> u64 {
        self.leaf_index
    }

    /// Real leaf count of the proved tree.
    pub fn leaf_count(&self) -> u64 {
        self.leaf_count
    }

    /// The proved leaf digest.
    pub fn leaf(&self) -> &Digest {
        &self.leaf
    }

    /// Uncle digests, bottom-up.
    pub fn uncles(&self) -> &[Digest] {
        &self.uncles
    }

    /// Recompute the root implied by this proof.
    pub fn root<H: PieceHasher>(&self) -> Result<Digest, PieceTreeError> {
        if self.leaf_index >= self.leaf_count {
            return Err(PieceTreeError::InvalidProof(format!(
                "leaf index {} out of range (leaf count {})",
                self.leaf_index, self.leaf_count
            )));
        }
        let padded = usize::try_from(self.leaf_count)
            .ok()
            .and_then(index::checked_num_leafs)
            .ok_or(PieceTreeError::TooManyLeaves(self.leaf_count))?;
        let expected_uncles = index::num_layers(padded) - 1;
        if self.uncles.len() != expected_uncles {
            return Err(PieceTreeError::InvalidProof(format!(
                "expected {} uncles, got {}",
                expected_uncles,
                self.uncles.len()
            )));
        }

        let mut position = self.leaf_index;
        let mut digest = self.leaf;
        for uncle in &self.uncles {
            digest = if position % 2 == 0 {
                H::merge(&digest, uncle)
            } else {
                H::merge(uncle, &digest)
            };
            position /= 2;
        }
        Ok(digest)
    }

    /// Verify the proof against `expected_root`.
    pub fn verify<H: PieceHasher>(&self, expected_root: &Digest) -> Result<(), PieceTreeError> {
        let computed = self.root::<H>()?;
        if &computed != expected_root {
            return Err(PieceTreeError::InvalidProof(format!(
                "root hash mismatch: expected {}, got {}",
                hex::encode(expected_root),
                hex::encode(computed)
            )));
        }
        Ok(())
    }

    /// Encode to bytes using bincode.
    pub fn encode_to_vec(&self) -> Result<Vec<u8>, PieceTreeError> {
        let config = bincode::config::standard()
            .with_big_endian()
            .with_no_limit();
        bincode::encode_to_vec(self, config)
            .map_err(|e| PieceTreeError::InvalidProof(format!("encode error: {}", e)))
    }

    /// Decode from bytes using bincode.
    pub fn decode_from_slice(bytes: &[u8]) -> Result<Self, PieceTreeError> {
        let config = bincode::config::standard()
            .with_big_endian()
            .with_limit::<{ 1024 * 1024 }>();
        let (proof, consumed): (Self, _) = bincode::decode_from_slice(bytes, config)
            .map_err(|e| PieceTreeError::InvalidProof(format!("decode error: {}", e)))?;
        if consumed != bytes.len() {
            return Err(PieceTreeError::InvalidProof(format!(
                "{} trailing bytes after proof",
                bytes.len() - consumed
            )));
        }
        if proof.leaf_index >= proof.leaf_count {
            return Err(PieceTreeError::InvalidProof(format!(
                "leaf index {} out of range (leaf count {})",
                proof.leaf_index, proof.leaf_count
            )));
        }
        Ok(proof)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::{Sha256Hasher, TreeBuilder};

    fn tree(leaf_count: usize) -> PieceTree {
        TreeBuilder::<Sha256Hasher>::new()
            .build_piece_tree(leaf_count)
            .expect("tree should build")
    }

    #[test]
    fn test_proof_every_leaf() {
        for n in 1..=9 {
            let tree = tree(n);
            let root = *tree.root().expect("non-empty");
            for i in 0..n {
                let proof = tree.prove(i).expect("proof");
                assert_eq!(proof.leaf(), &Sha256Hasher::leaf(i as u64));
                assert_eq!(proof.uncles().len(), tree.num_layers() - 1);
                proof
                    .verify::<Sha256Hasher>(&root)
                    .expect("proof should verify");
            }
        }
    }

    #[test]
    fn test_single_leaf_proof_has_no_uncles() {
        let tree = tree(1);
        let proof = tree.prove(0).expect("proof");
        assert!(proof.uncles().is_empty());
        assert_eq!(proof.root::<Sha256Hasher>(), Ok(Sha256Hasher::leaf(0)));
    }

    #[test]
    fn test_proof_for_padding_is_rejected() {
        let tree = tree(3);
        assert_matches!(
            tree.prove(3),
            Err(PieceTreeError::LeafOutOfRange {
                index: 3,
                leaf_count: 3
            })
        );
    }

    #[test]
    fn test_tampered_uncle_fails() {
        let tree = tree(6);
        let root = *tree.root().expect("non-empty");
        let mut proof = tree.prove(4).expect("proof");
        proof.uncles[1][0] ^= 0x01;
        assert_matches!(
            proof.verify::<Sha256Hasher>(&root),
            Err(PieceTreeError::InvalidProof(_))
        );
    }

    #[test]
    fn test_wrong_uncle_count_fails() {
        let tree = tree(4);
        let mut proof = tree.prove(2).expect("proof");
        proof.uncles.pop();
        assert_matches!(
            proof.root::<Sha256Hasher>(),
            Err(PieceTreeError::InvalidProof(_))
        );
    }

    #[test]
    fn test_proof_encode_decode_roundtrip() {
        let tree = tree(5);
        let proof = tree.prove(2).expect("proof");
        let bytes = proof.encode_to_vec().expect("encode");
        let decoded = LeafProof::decode_from_slice(&bytes).expect("decode");
        assert_eq!(decoded, proof);
        decoded
            .verify::<Sha256Hasher>(tree.root().expect("non-empty"))
            .expect("decoded proof should verify");
    }

    #[test]
    fn test_decode_rejects_trailing_bytes() {
        let proof = tree(5).prove(2).expect("proof");
        let mut bytes = proof.encode_to_vec().expect("encode");
        bytes.push(0x00);
        assert_eq!(
            LeafProof::decode_from_slice(&bytes),
            Err(PieceTreeError::InvalidProof(
                "1 trailing bytes after proof".to_string()
            ))
        );
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert_matches!(
            LeafProof::decode_from_slice(&[0xff, 0x01]),
            Err(PieceTreeError::InvalidProof(_))
        );
    }
}
