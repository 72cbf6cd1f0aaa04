//! Persistent binary Merkle tree
//!
//! This implements the storage layer underneath every view:
//! - Nodes are immutable and reference counted
//! - A rewrite at a generalized index rebuilds only the path to the root
//! - Unchanged subtrees, including cached zero subtrees, are shared
//! - The Merkle root is computed with a pluggable pair hasher

mod fill;
mod link;
mod node;
mod zero;

pub(crate) use fill::fill_repeat;
pub use fill::{subtree_fill_repeat, subtree_fill_to_length};
pub use link::Link;
pub use node::{NodeKind, TreeNode};
pub use zero::{prewarm, zero_node};
