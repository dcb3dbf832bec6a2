//! Human readable dump of a piece tree, one level per line.

use std::{
    fmt,
    io::{self, Write},
};

use itertools::Itertools;

use crate::{PieceTree, hash::Digest, index};

const HEX_LEN: usize = 8;
const INDENT_SPACES: usize = 2;

/// Abbreviate a digest as `first8..last8` hex characters.
pub fn to_hex(digest: &Digest) -> String {
    let encoded = hex::encode(digest);
    let tail = encoded.len() - HEX_LEN;
    format!("{}..{}", &encoded[..HEX_LEN], &encoded[tail..])
}

impl PieceTree {
    /// Write the tree level by level, indenting each level by its depth.
    /// Padding leaves are shown as `pad`.
    pub fn visualize<W: Write>(&self, mut out: W) -> io::Result<()> {
        writeln!(
            out,
            "piece tree: {} leaves, {} slots",
            self.leaf_count(),
            self.padded_leaf_count()
        )?;
        for depth in 0..self.num_layers() {
            let start = index::layer_start(depth);
            let Some(layer) = self.layer(depth) else {
                break;
            };
            let line = layer
                .iter()
                .enumerate()
                .map(|(offset, digest)| {
                    if self.is_padding(start + offset) {
                        "pad".to_owned()
                    } else {
                        to_hex(digest)
                    }
                })
                .join(" ");
            writeln!(out, "{}{}", " ".repeat(INDENT_SPACES * depth), line)?;
        }
        out.flush()
    }
}

impl fmt::Display for PieceTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = Vec::new();
        self.visualize(&mut buf).map_err(|_| fmt::Error)?;
        f.write_str(&String::from_utf8_lossy(&buf))
    }
}
