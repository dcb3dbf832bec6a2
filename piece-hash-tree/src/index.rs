//! Level-order index arithmetic.
//!
//! Nodes live in a flat array, root at 0. The children of node `i` are at
//! `2i + 1` and `2i + 2`, so depth `d` starts at `2^d - 1`. In a tree with
//! `L` leaf slots (a power of two) there are `2L - 1` nodes and the leaves
//! occupy the last `L` of them.
//!
//! ```text
//!              0
//!        1           2
//!     3     4     5     6
//!    7 8   9 10 11 12 13 14
//! ```

/// Number of leaf slots needed for `leaf_count` real leaves: the next power
/// of two, and at least one.
///
/// Panics if the result does not fit a `usize`.
pub fn num_leafs(leaf_count: usize) -> usize {
    match checked_num_leafs(leaf_count) {
        Some(leafs) => leafs,
        None => panic!("leaf count {} has no power-of-two padding", leaf_count),
    }
}

/// Like [`num_leafs`] but returns `None` when the padded leaf count, or the
/// node count of the resulting tree, would overflow.
pub fn checked_num_leafs(leaf_count: usize) -> Option<usize> {
    let leafs = leaf_count.max(1).checked_next_power_of_two()?;
    leafs.checked_mul(2)?;
    Some(leafs)
}

/// Total number of nodes in a complete tree with `num_leafs` leaf slots.
pub fn num_nodes(num_leafs: usize) -> usize {
    debug_assert!(num_leafs.is_power_of_two());
    2 * num_leafs - 1
}

/// Index of the first leaf in a tree of `num_nodes` nodes.
pub fn first_leaf(num_nodes: usize) -> usize {
    num_nodes / 2
}

/// Number of levels, including the leaf level.
pub fn num_layers(num_leafs: usize) -> usize {
    debug_assert!(num_leafs.is_power_of_two());
    num_leafs.trailing_zeros() as usize + 1
}

/// Index of the first node at `depth` (root is depth 0).
pub fn layer_start(depth: usize) -> usize {
    (1usize << depth) - 1
}

/// Depth of node `index`.
pub fn depth_of(index: usize) -> usize {
    (usize::BITS - 1 - (index + 1).leading_zeros()) as usize
}

/// Parent of `index`. The root has no parent.
pub fn parent(index: usize) -> Option<usize> {
    if index == 0 {
        None
    } else {
        Some((index - 1) / 2)
    }
}

/// Sibling of `index`. The root has no sibling.
pub fn sibling(index: usize) -> Option<usize> {
    if index == 0 {
        None
    } else if index % 2 == 1 {
        Some(index + 1)
    } else {
        Some(index - 1)
    }
}

/// Left child of `index`.
pub fn left_child(index: usize) -> usize {
    2 * index + 1
}

/// Right child of `index`.
pub fn right_child(index: usize) -> usize {
    2 * index + 2
}

/// `true` if `index` is the left child of its parent.
pub fn is_left(index: usize) -> bool {
    index % 2 == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_num_leafs_rounds_up() {
        assert_eq!(num_leafs(0), 1);
        assert_eq!(num_leafs(1), 1);
        assert_eq!(num_leafs(2), 2);
        assert_eq!(num_leafs(3), 4);
        assert_eq!(num_leafs(4), 4);
        assert_eq!(num_leafs(5), 8);
        assert_eq!(num_leafs(1025), 2048);
    }

    #[test]
    fn test_checked_num_leafs_overflow() {
        assert_eq!(checked_num_leafs(usize::MAX), None);
        assert_eq!(checked_num_leafs(usize::MAX / 2 + 2), None);
        // 2^(bits-1) leaves fit but 2 * leafs - 1 nodes would not
        assert_eq!(checked_num_leafs(1usize << (usize::BITS - 1)), None);
        assert_eq!(checked_num_leafs(100), Some(128));
    }

    #[test]
    fn test_node_counts() {
        assert_eq!(num_nodes(1), 1);
        assert_eq!(num_nodes(4), 7);
        assert_eq!(first_leaf(7), 3);
        assert_eq!(first_leaf(1), 0);
        assert_eq!(num_layers(1), 1);
        assert_eq!(num_layers(8), 4);
    }

    #[test]
    fn test_layer_and_depth() {
        assert_eq!(layer_start(0), 0);
        assert_eq!(layer_start(1), 1);
        assert_eq!(layer_start(3), 7);
        assert_eq!(depth_of(0), 0);
        assert_eq!(depth_of(2), 1);
        assert_eq!(depth_of(3), 2);
        assert_eq!(depth_of(6), 2);
        assert_eq!(depth_of(7), 3);
        assert_eq!(depth_of(14), 3);
    }

    #[test]
    fn test_family() {
        assert_eq!(parent(0), None);
        assert_eq!(parent(1), Some(0));
        assert_eq!(parent(2), Some(0));
        assert_eq!(parent(9), Some(4));
        assert_eq!(sibling(0), None);
        assert_eq!(sibling(3), Some(4));
        assert_eq!(sibling(4), Some(3));
        assert_eq!(left_child(4), 9);
        assert_eq!(right_child(4), 10);
        assert!(is_left(9));
        assert!(!is_left(10));
        for i in 1..31 {
            let p = parent(i).expect("non-root");
            assert!(left_child(p) == i || right_child(p) == i);
        }
    }
}
