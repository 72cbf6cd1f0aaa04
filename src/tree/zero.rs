//! Process-wide cache of all-zero subtrees

use super::node::TreeNode;
use crate::model::{Root, MAX_DEPTH};
use crate::{Error, Result};
use parking_lot::RwLock;
use tracing::debug;

/// `ZERO_CACHE[d]` is the zero subtree of depth `d`; entries are only appended
static ZERO_CACHE: RwLock<Vec<TreeNode>> = parking_lot::const_rwlock(Vec::new());

/// The canonical all-zero subtree of the given depth
///
/// Depth 0 is a zero leaf; depth `d` pairs two copies of depth `d - 1`. Every
/// call for the same depth returns the same allocation, so default trees built
/// from zero subtrees share structure freely.
pub fn zero_node(depth: u32) -> TreeNode {
    debug_assert!(depth <= MAX_DEPTH, "zero subtree deeper than any gindex");
    let depth = depth as usize;

    if let Some(node) = ZERO_CACHE.read().get(depth) {
        return node.clone();
    }

    let mut cache = ZERO_CACHE.write();
    if cache.is_empty() {
        cache.push(TreeNode::leaf(Root::ZERO));
    }
    let before = cache.len();
    while cache.len() <= depth {
        let below = cache[cache.len() - 1].clone();
        cache.push(TreeNode::pair(below.clone(), below));
    }
    if cache.len() != before {
        debug!(depth, cached = cache.len(), "extended zero subtree cache");
    }
    cache[depth].clone()
}

/// Populate the cache up to `depth` ahead of time
pub fn prewarm(depth: u32) -> Result<()> {
    if depth > MAX_DEPTH {
        return Err(Error::OutOfRange(format!(
            "zero cache depth {} exceeds maximum {}",
            depth, MAX_DEPTH
        )));
    }
    zero_node(depth);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::Sha256Hasher;

    #[test]
    fn test_zero_node_is_referentially_stable() {
        let a = zero_node(5);
        let b = zero_node(5);
        assert!(TreeNode::same_node(&a, &b));
    }

    #[test]
    fn test_zero_node_shape() {
        assert_eq!(zero_node(0).as_leaf(), Some(&Root::ZERO));
        let node = zero_node(3);
        let (left, right) = node.children().unwrap();
        assert!(TreeNode::same_node(left, right));
        assert!(TreeNode::same_node(left, &zero_node(2)));
    }

    #[test]
    fn test_zero_roots_match_known_values() {
        let h = Sha256Hasher;
        assert_eq!(zero_node(0).merkle_root(&h), Root::ZERO);
        assert_eq!(
            zero_node(1).merkle_root(&h).to_hex(),
            "f5a5fd42d16a20302798ef6ed309979b43003d2320d9f0e8ea9831a92759fb4b"
        );
        // Deep zero trees hash in O(depth) thanks to sharing
        let deep = zero_node(60).merkle_root(&h);
        assert_eq!(deep, zero_node(60).merkle_root(&h));
    }

    #[test]
    fn test_prewarm_bounds() {
        assert!(prewarm(10).is_ok());
        assert!(matches!(prewarm(MAX_DEPTH + 1), Err(Error::OutOfRange(_))));
    }
}
