//! Structural validation of a level-order node array.
//!
//! Pure function, recomputes every internal node from its children.

use crate::{
    PieceTreeError,
    hash::{Digest, PieceHasher, ZERO_DIGEST},
    index,
};

/// Check that `nodes` is the complete tree over `leaf_count` real leaves:
/// the right length, zero padding leaves, and every internal node equal to
/// the merge of its children.
///
/// Leaf contents are not checked, so trees built by
/// [`TreeBuilder::from_leaves`](crate::TreeBuilder::from_leaves) validate too.
pub fn validate_tree<H: PieceHasher>(
    nodes: &[Digest],
    leaf_count: usize,
) -> Result<(), PieceTreeError> {
    let expected_len = if leaf_count == 0 {
        0
    } else {
        let padded = index::checked_num_leafs(leaf_count)
            .ok_or(PieceTreeError::TooManyLeaves(leaf_count as u64))?;
        index::num_nodes(padded)
    };
    if nodes.len() != expected_len {
        return Err(PieceTreeError::InvalidTree(format!(
            "expected {} nodes for {} leaves, got {}",
            expected_len,
            leaf_count,
            nodes.len()
        )));
    }
    if nodes.is_empty() {
        return Ok(());
    }

    let first = index::first_leaf(nodes.len());
    if let Some(offset) = nodes[first + leaf_count..]
        .iter()
        .position(|digest| digest != &ZERO_DIGEST)
    {
        return Err(PieceTreeError::InvalidTree(format!(
            "padding leaf at index {} is not zero",
            first + leaf_count + offset
        )));
    }

    // deepest mismatch first
    for i in (0..first).rev() {
        let expected = H::merge(&nodes[index::left_child(i)], &nodes[index::right_child(i)]);
        if nodes[i] != expected {
            return Err(PieceTreeError::InvalidTree(format!(
                "node {} does not match its children",
                i
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Sha256Hasher, build_tree};

    #[test]
    fn test_built_trees_validate() {
        for n in 0..=17 {
            validate_tree::<Sha256Hasher>(&build_tree(n), n).expect("built tree is valid");
        }
    }

    #[test]
    fn test_wrong_length_rejected() {
        let nodes = build_tree(4);
        assert_eq!(
            validate_tree::<Sha256Hasher>(&nodes, 5),
            Err(PieceTreeError::InvalidTree(
                "expected 15 nodes for 5 leaves, got 7".into()
            ))
        );
    }

    #[test]
    fn test_mutated_internal_node_rejected() {
        let mut nodes = build_tree(5);
        nodes[2][31] ^= 0x80;
        assert_eq!(
            validate_tree::<Sha256Hasher>(&nodes, 5),
            Err(PieceTreeError::InvalidTree(
                "node 2 does not match its children".into()
            ))
        );
    }

    #[test]
    fn test_nonzero_padding_rejected() {
        let mut nodes = build_tree(3);
        nodes[6] = Sha256Hasher::leaf(3);
        assert_eq!(
            validate_tree::<Sha256Hasher>(&nodes, 3),
            Err(PieceTreeError::InvalidTree(
                "padding leaf at index 6 is not zero".into()
            ))
        );
    }
}
