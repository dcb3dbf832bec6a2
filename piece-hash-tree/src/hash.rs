//! Digest adapter.
//!
//! The tree only relies on a fixed 32-byte output and determinism, so every
//! hash function is reached through [`PieceHasher`]. Internal nodes are
//! `H(left || right)`; leaves of generated fixtures are
//! `H(position as big-endian u64)`.

use sha2::{Digest as _, Sha256};

/// A 32-byte node digest.
pub type Digest = [u8; 32];

/// Width of a [`Digest`] in bytes.
pub const DIGEST_LEN: usize = 32;

/// Fill value for padding leaves beyond the real leaf count.
///
/// Padding is identified by position, not by content: a real leaf whose
/// digest happened to be all zeroes would be indistinguishable.
pub const ZERO_DIGEST: Digest = [0u8; DIGEST_LEN];

/// A fixed-output-size hash function used to build piece trees.
pub trait PieceHasher {
    /// Hash an arbitrary byte string.
    fn digest(data: &[u8]) -> Digest;

    /// Combine two sibling digests: `H(left || right)`.
    fn merge(left: &Digest, right: &Digest) -> Digest {
        let mut input = [0u8; 2 * DIGEST_LEN];
        input[..DIGEST_LEN].copy_from_slice(left);
        input[DIGEST_LEN..].copy_from_slice(right);
        Self::digest(&input)
    }

    /// Deterministic digest of the generated leaf at `position`.
    fn leaf(position: u64) -> Digest {
        Self::digest(&position.to_be_bytes())
    }
}

/// SHA-256, the digest used by piece-layer (v2) trees.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hasher;

impl PieceHasher for Sha256Hasher {
    fn digest(data: &[u8]) -> Digest {
        Sha256::digest(data).into()
    }
}

/// Blake3 backed hasher.
#[cfg(feature = "blake3")]
#[derive(Debug, Clone, Copy, Default)]
pub struct Blake3Hasher;

#[cfg(feature = "blake3")]
impl PieceHasher for Blake3Hasher {
    fn digest(data: &[u8]) -> Digest {
        *blake3::hash(data).as_bytes()
    }

    fn merge(left: &Digest, right: &Digest) -> Digest {
        let mut hasher = blake3::Hasher::new();
        hasher.update(left);
        hasher.update(right);
        *hasher.finalize().as_bytes()
    }
}
