use thiserror::Error;

/// Errors from piece hash tree operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PieceTreeError {
    #[error("leaf count must not be negative, got {0}")]
    NegativeLeafCount(i64),
    #[error("too many leaves: {0} does not fit a complete tree")]
    TooManyLeaves(u64),
    #[error("leaf index {index} out of range (leaf count {leaf_count})")]
    LeafOutOfRange { index: usize, leaf_count: usize },
    #[error("invalid piece size: {0} blocks per piece")]
    InvalidPieceSize(usize),
    #[error("invalid tree: {0}")]
    InvalidTree(String),
    #[error("invalid proof: {0}")]
    InvalidProof(String),
}
