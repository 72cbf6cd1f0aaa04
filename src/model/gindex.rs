//! Generalized indices: integer paths into a complete binary tree
//!
//! Index 1 is the root; the children of `g` are `2g` (left) and `2g + 1`
//! (right). Reading the binary form of an index after its leading 1 gives the
//! path from the root, one bit per level.

use crate::{Error, Result};
use std::fmt;

/// Deepest tree addressable by a `u64` generalized index
pub const MAX_DEPTH: u32 = 63;

/// A path from a tree's root to one of its nodes
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeneralizedIndex(u64);

impl GeneralizedIndex {
    /// The root of any tree
    pub const ROOT: GeneralizedIndex = GeneralizedIndex(1);

    pub const fn new(index: u64) -> Self {
        GeneralizedIndex(index)
    }

    pub fn get(&self) -> u64 {
        self.0
    }

    /// Number of edges between the root and the addressed node
    pub fn depth(&self) -> u32 {
        if self.0 == 0 {
            0
        } else {
            63 - self.0.leading_zeros()
        }
    }

    pub fn is_root(&self) -> bool {
        self.0 == 1
    }

    pub fn left(&self) -> Result<Self> {
        self.0
            .checked_mul(2)
            .map(GeneralizedIndex)
            .ok_or_else(|| Error::OutOfRange(format!("left child of {} overflows", self)))
    }

    pub fn right(&self) -> Result<Self> {
        self.0
            .checked_mul(2)
            .and_then(|g| g.checked_add(1))
            .map(GeneralizedIndex)
            .ok_or_else(|| Error::OutOfRange(format!("right child of {} overflows", self)))
    }

    pub fn parent(&self) -> Option<Self> {
        if self.0 <= 1 {
            None
        } else {
            Some(GeneralizedIndex(self.0 / 2))
        }
    }

    /// Append `inner`, a path relative to the node at `self`
    pub fn concat(&self, inner: GeneralizedIndex) -> Result<Self> {
        if self.0 == 0 || inner.0 == 0 {
            return Err(Error::OutOfRange("generalized index 0 has no path".into()));
        }
        let inner_depth = inner.depth();
        if self.depth() + inner_depth > MAX_DEPTH {
            return Err(Error::OutOfRange(format!(
                "concatenating {} and {} exceeds depth {}",
                self, inner, MAX_DEPTH
            )));
        }
        let offset = inner.0 - (1u64 << inner_depth);
        Ok(GeneralizedIndex((self.0 << inner_depth) | offset))
    }

    /// Path bits from the root downwards: `false` = left, `true` = right
    pub fn path(&self) -> impl Iterator<Item = bool> {
        let index = self.0;
        let depth = self.depth();
        (0..depth).rev().map(move |shift| (index >> shift) & 1 == 1)
    }
}

impl From<u64> for GeneralizedIndex {
    fn from(index: u64) -> Self {
        GeneralizedIndex(index)
    }
}

impl fmt::Display for GeneralizedIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for GeneralizedIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GeneralizedIndex({:#b})", self.0)
    }
}

/// Generalized index of local element `index` at the bottom of a `depth` tree
pub fn to_gindex(index: u64, depth: u32) -> Result<GeneralizedIndex> {
    if depth > MAX_DEPTH {
        return Err(Error::OutOfRange(format!(
            "depth {} exceeds maximum {}",
            depth, MAX_DEPTH
        )));
    }
    let anchor = 1u64 << depth;
    if index >= anchor {
        return Err(Error::OutOfRange(format!(
            "index {} does not fit in a tree of depth {}",
            index, depth
        )));
    }
    Ok(GeneralizedIndex(anchor | index))
}

/// Minimal depth `d` such that `2^d >= elem_count`
///
/// A single element is stored as the root itself, so `get_depth(1) == 0`.
/// An empty collection also has depth 0.
pub fn get_depth(elem_count: u64) -> u32 {
    if elem_count <= 1 {
        0
    } else {
        64 - (elem_count - 1).leading_zeros()
    }
}
