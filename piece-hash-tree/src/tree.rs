use std::{fmt, marker::PhantomData};

use log::{debug, trace};
use piece_tree_costs::{
    CostContext, CostResult, CostsExt, OperationCost, cost_return_on_error,
};

use crate::{
    PieceTreeError,
    hash::{DIGEST_LEN, Digest, PieceHasher, Sha256Hasher, ZERO_DIGEST},
    index,
};

/// Build the fixture tree for `leaf_count` generated leaves using SHA-256.
///
/// Returns every node in level order, root first, or an empty vector when
/// `leaf_count` is zero. See [`TreeBuilder::build`].
pub fn build_tree(leaf_count: usize) -> Vec<Digest> {
    TreeBuilder::<Sha256Hasher>::new().build(leaf_count)
}

/// Builds complete binary hash trees with deterministic leaves.
///
/// Real leaf `i` is `H::leaf(i)`. The leaf level is padded with
/// [`ZERO_DIGEST`] up to the next power of two and every internal node is
/// `H::merge(left, right)`.
pub struct TreeBuilder<H = Sha256Hasher> {
    _hasher: PhantomData<H>,
}

impl<H> fmt::Debug for TreeBuilder<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeBuilder")
            .field("hasher", &std::any::type_name::<H>())
            .finish()
    }
}

impl<H> Clone for TreeBuilder<H> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<H> Copy for TreeBuilder<H> {}

impl<H> Default for TreeBuilder<H> {
    fn default() -> Self {
        Self {
            _hasher: PhantomData,
        }
    }
}

impl<H: PieceHasher> TreeBuilder<H> {
    /// Create a builder for hasher `H`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the tree for `leaf_count` generated leaves and return its nodes
    /// in level order.
    ///
    /// The result has `2 * leaf_count.next_power_of_two() - 1` nodes, or none
    /// for zero leaves. Panics if that many nodes cannot be indexed.
    pub fn build(&self, leaf_count: usize) -> Vec<Digest> {
        match self.build_with_cost(leaf_count).map_ok(PieceTree::into_nodes).unwrap() {
            Ok(nodes) => nodes,
            Err(e) => panic!("cannot build tree of {} leaves: {}", leaf_count, e),
        }
    }

    /// Build the tree for `leaf_count` generated leaves.
    pub fn build_piece_tree(&self, leaf_count: usize) -> Result<PieceTree, PieceTreeError> {
        self.build_with_cost(leaf_count).unwrap()
    }

    /// Build from a signed count, rejecting negative values instead of
    /// clamping them.
    pub fn try_build(&self, leaf_count: i64) -> Result<PieceTree, PieceTreeError> {
        self.try_build_with_cost(leaf_count).unwrap()
    }

    /// [`try_build`](Self::try_build) with the hashing cost reported. A
    /// rejected count costs nothing.
    pub fn try_build_with_cost(&self, leaf_count: i64) -> CostResult<PieceTree, PieceTreeError> {
        let mut cost = OperationCost::default();
        if leaf_count < 0 {
            return Err(PieceTreeError::NegativeLeafCount(leaf_count)).wrap_with_cost(cost);
        }
        let Ok(leaf_count) = usize::try_from(leaf_count) else {
            return Err(PieceTreeError::TooManyLeaves(leaf_count as u64)).wrap_with_cost(cost);
        };
        let tree = cost_return_on_error!(&mut cost, self.build_with_cost(leaf_count));
        Ok(tree).wrap_with_cost(cost)
    }

    /// Build the tree for `leaf_count` generated leaves, reporting one
    /// `hash_byte_calls` per leaf and one `hash_node_calls` per internal node.
    pub fn build_with_cost(&self, leaf_count: usize) -> CostResult<PieceTree, PieceTreeError> {
        let mut cost = OperationCost::default();

        let mut nodes = match allocate(leaf_count) {
            Ok(nodes) => nodes,
            Err(e) => return Err(e).wrap_with_cost(cost),
        };
        if nodes.is_empty() {
            return Ok(PieceTree::empty()).wrap_with_cost(cost);
        }

        let first = index::first_leaf(nodes.len());
        for (position, slot) in nodes[first..first + leaf_count].iter_mut().enumerate() {
            *slot = H::leaf(position as u64);
        }
        cost.hash_byte_calls += leaf_count as u64;

        fill_internal_nodes::<H>(&mut nodes).unwrap_add_cost(&mut cost);

        let tree = PieceTree { nodes, leaf_count };
        debug!(
            "built piece tree: {} leaves, {} padded, {} nodes, {} hash calls",
            tree.leaf_count,
            tree.padded_leaf_count(),
            tree.len(),
            cost.total_hash_calls()
        );
        Ok(tree).wrap_with_cost(cost)
    }

    /// Build a tree over caller supplied leaf digests, padding with
    /// [`ZERO_DIGEST`].
    pub fn from_leaves(&self, leaves: &[Digest]) -> Result<PieceTree, PieceTreeError> {
        self.from_leaves_with_cost(leaves).unwrap()
    }

    /// [`from_leaves`](Self::from_leaves) with the hashing cost reported.
    /// Supplied leaves are not hashed, so only `hash_node_calls` is counted.
    pub fn from_leaves_with_cost(
        &self,
        leaves: &[Digest],
    ) -> CostResult<PieceTree, PieceTreeError> {
        let mut nodes = match allocate(leaves.len()) {
            Ok(nodes) => nodes,
            Err(e) => return Err(e).wrap_with_cost(OperationCost::default()),
        };
        if nodes.is_empty() {
            return Ok(PieceTree::empty()).wrap_with_cost(OperationCost::default());
        }
        let first = index::first_leaf(nodes.len());
        nodes[first..first + leaves.len()].copy_from_slice(leaves);
        fill_internal_nodes::<H>(&mut nodes).map(|()| {
            Ok(PieceTree {
                nodes,
                leaf_count: leaves.len(),
            })
        })
    }
}

/// Zeroed node storage for `leaf_count` leaves.
///
/// Fails with [`PieceTreeError::TooManyLeaves`] when the node count or its
/// size in bytes exceeds what a `Vec` can hold.
fn allocate(leaf_count: usize) -> Result<Vec<Digest>, PieceTreeError> {
    if leaf_count == 0 {
        return Ok(Vec::new());
    }
    let num_nodes = index::checked_num_leafs(leaf_count)
        .map(index::num_nodes)
        .filter(|num_nodes| {
            num_nodes
                .checked_mul(DIGEST_LEN)
                .is_some_and(|bytes| bytes <= isize::MAX as usize)
        })
        .ok_or(PieceTreeError::TooManyLeaves(leaf_count as u64))?;
    Ok(vec![ZERO_DIGEST; num_nodes])
}

/// Compute every internal node from its children, bottom-up. The leaf level
/// must already be populated.
fn fill_internal_nodes<H: PieceHasher>(nodes: &mut [Digest]) -> CostContext<()> {
    let first = index::first_leaf(nodes.len());
    let mut level_start = first;
    while level_start > 0 {
        let parent_start = level_start / 2;
        for i in parent_start..level_start {
            nodes[i] = H::merge(&nodes[index::left_child(i)], &nodes[index::right_child(i)]);
        }
        trace!(
            "hashed level {}: {} nodes",
            index::depth_of(parent_start),
            level_start - parent_start
        );
        level_start = parent_start;
    }
    ().wrap_with_cost(OperationCost::with_hash_node_calls(first as u64))
}

/// Root of `leaves` padded with [`ZERO_DIGEST`] to a power of two.
///
/// A single leaf is its own root; no leaves yield [`ZERO_DIGEST`].
pub fn merkle_root<H: PieceHasher>(leaves: &[Digest]) -> Digest {
    if leaves.is_empty() {
        return ZERO_DIGEST;
    }
    let mut level = leaves.to_vec();
    level.resize(index::num_leafs(leaves.len()), ZERO_DIGEST);
    let mut len = level.len();
    while len > 1 {
        for i in 0..len / 2 {
            level[i] = H::merge(&level[2 * i], &level[2 * i + 1]);
        }
        len /= 2;
    }
    level[0]
}

/// Root of a subtree of `blocks_per_piece` zero leaves, i.e. the digest of a
/// piece made entirely of padding.
pub fn pad_digest<H: PieceHasher>(blocks_per_piece: usize) -> Result<Digest, PieceTreeError> {
    if !blocks_per_piece.is_power_of_two() {
        return Err(PieceTreeError::InvalidPieceSize(blocks_per_piece));
    }
    let mut digest = ZERO_DIGEST;
    for _ in 0..blocks_per_piece.trailing_zeros() {
        digest = H::merge(&digest, &digest);
    }
    Ok(digest)
}

/// An immutable complete hash tree stored in level order.
///
/// Node `i` has children `2i + 1` and `2i + 2`; see [`crate::index`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceTree {
    nodes: Vec<Digest>,
    leaf_count: usize,
}

impl PieceTree {
    fn empty() -> Self {
        Self {
            nodes: Vec::new(),
            leaf_count: 0,
        }
    }

    /// Root digest, `None` for an empty tree.
    pub fn root(&self) -> Option<&Digest> {
        self.nodes.first()
    }

    /// All nodes in level order.
    pub fn nodes(&self) -> &[Digest] {
        &self.nodes
    }

    /// Consume the tree, returning its nodes in level order.
    pub fn into_nodes(self) -> Vec<Digest> {
        self.nodes
    }

    /// Total number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// `true` if the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of real (non-padding) leaves.
    pub fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    /// Number of leaf slots, including padding.
    pub fn padded_leaf_count(&self) -> usize {
        self.nodes.len().div_ceil(2)
    }

    /// Number of levels, 0 for an empty tree.
    pub fn num_layers(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            index::num_layers(self.padded_leaf_count())
        }
    }

    /// Node at level-order index `i`.
    pub fn node(&self, i: usize) -> Option<&Digest> {
        self.nodes.get(i)
    }

    /// Digest of leaf slot `position` (real or padding).
    pub fn leaf(&self, position: usize) -> Option<&Digest> {
        self.leaves().get(position)
    }

    /// The whole leaf level, padding included.
    pub fn leaves(&self) -> &[Digest] {
        &self.nodes[index::first_leaf(self.nodes.len())..]
    }

    /// Only the real leaves.
    pub fn real_leaves(&self) -> &[Digest] {
        &self.leaves()[..self.leaf_count]
    }

    /// `true` if node `i` is a padding leaf slot.
    pub fn is_padding(&self, i: usize) -> bool {
        let first = index::first_leaf(self.nodes.len());
        i < self.nodes.len() && i >= first + self.leaf_count
    }

    /// All nodes at `depth` (root is depth 0).
    pub fn layer(&self, depth: usize) -> Option<&[Digest]> {
        if depth >= self.num_layers() {
            return None;
        }
        Some(&self.nodes[index::layer_start(depth)..index::layer_start(depth + 1)])
    }

    /// The piece layer: one digest per piece of `blocks_per_piece` leaves,
    /// trimmed to pieces holding at least one real leaf.
    ///
    /// `blocks_per_piece` must be a power of two no larger than
    /// [`padded_leaf_count`](Self::padded_leaf_count).
    pub fn piece_layer(&self, blocks_per_piece: usize) -> Result<&[Digest], PieceTreeError> {
        if !blocks_per_piece.is_power_of_two() || blocks_per_piece > self.padded_leaf_count() {
            return Err(PieceTreeError::InvalidPieceSize(blocks_per_piece));
        }
        let depth = self.num_layers() - 1 - blocks_per_piece.trailing_zeros() as usize;
        let layer = self
            .layer(depth)
            .ok_or_else(|| PieceTreeError::InvalidTree(format!("missing layer {}", depth)))?;
        Ok(&layer[..self.leaf_count.div_ceil(blocks_per_piece)])
    }
}
