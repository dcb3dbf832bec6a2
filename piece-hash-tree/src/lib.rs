//! Deterministic Merkle hash trees for piece-layer verification fixtures.
//!
//! [`build_tree`] turns a leaf count into a complete binary hash tree stored
//! as a flat level-order array: root at index 0, the children of node `i` at
//! `2i + 1` and `2i + 2`, leaves in the last `next_power_of_two(n)` slots.
//!
//! - Leaf `i` is `H(i as big-endian u64)`.
//! - Leaf slots past the real leaf count hold [`ZERO_DIGEST`].
//! - Internal nodes are `H(left || right)`.
//!
//! Building the same leaf count twice yields byte-identical trees, so tests
//! can assert on node values at fixed indices.

#![warn(missing_docs)]

mod error;
pub(crate) mod hash;
pub mod index;
pub(crate) mod proof;
pub(crate) mod tree;
mod verify;
mod visualize;


pub use error::PieceTreeError;
#[cfg(feature = "blake3")]
pub use hash::Blake3Hasher;
pub use hash::{DIGEST_LEN, Digest, PieceHasher, Sha256Hasher, ZERO_DIGEST};
pub use piece_tree_costs::{CostContext, CostResult, OperationCost};
pub use proof::LeafProof;
pub use tree::{PieceTree, TreeBuilder, build_tree, merkle_root, pad_digest};
pub use verify::validate_tree;
pub use visualize::to_hex;
