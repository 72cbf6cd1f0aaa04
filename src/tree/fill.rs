//! Building complete trees from bottom-level nodes

use super::node::TreeNode;
use super::zero::zero_node;
use crate::model::MAX_DEPTH;
use crate::{Error, Result};

fn check_capacity(depth: u32, length: u64) -> Result<()> {
    if depth > MAX_DEPTH {
        return Err(Error::OutOfRange(format!(
            "depth {} exceeds maximum {}",
            depth, MAX_DEPTH
        )));
    }
    if length > 1u64 << depth {
        return Err(Error::OutOfRange(format!(
            "{} nodes do not fit in a tree of depth {}",
            length, depth
        )));
    }
    Ok(())
}

/// Build a `depth` tree whose first leaves are `elements` in order
///
/// At most `length` elements are used; the remaining bottom positions are
/// zero chunks (whole empty subtrees reuse the cached zero subtrees).
pub fn subtree_fill_to_length(
    elements: &[TreeNode],
    depth: u32,
    length: u64,
) -> Result<TreeNode> {
    check_capacity(depth, length)?;
    let count = (elements.len() as u64).min(length) as usize;
    Ok(fill_contents(&elements[..count], depth))
}

fn fill_contents(nodes: &[TreeNode], depth: u32) -> TreeNode {
    if nodes.is_empty() {
        return zero_node(depth);
    }
    if depth == 0 {
        return nodes[0].clone();
    }
    let half = 1u64 << (depth - 1);
    let split = if (nodes.len() as u64) <= half {
        nodes.len()
    } else {
        half as usize
    };
    let (left, right) = nodes.split_at(split);
    TreeNode::pair(fill_contents(left, depth - 1), fill_contents(right, depth - 1))
}

/// Build a `depth` tree with `length` copies of `bottom`, zero-padded
///
/// Complete subtrees of copies are shared, so the result has `O(depth)`
/// distinct nodes however large `length` is.
pub fn subtree_fill_repeat(bottom: &TreeNode, depth: u32, length: u64) -> Result<TreeNode> {
    check_capacity(depth, length)?;
    Ok(fill_repeat(bottom, depth, length))
}

/// Caller guarantees `length <= 2^depth` and `depth <= MAX_DEPTH`
pub(crate) fn fill_repeat(bottom: &TreeNode, depth: u32, length: u64) -> TreeNode {
    if length == 0 {
        return zero_node(depth);
    }
    if length == 1u64 << depth {
        return fill_full(bottom, depth);
    }
    // 0 < length < 2^depth, so depth >= 1
    let half = 1u64 << (depth - 1);
    if length <= half {
        TreeNode::pair(fill_repeat(bottom, depth - 1, length), zero_node(depth - 1))
    } else {
        TreeNode::pair(
            fill_full(bottom, depth - 1),
            fill_repeat(bottom, depth - 1, length - half),
        )
    }
}

fn fill_full(bottom: &TreeNode, depth: u32) -> TreeNode {
    (0..depth).fold(bottom.clone(), |node, _| TreeNode::pair(node.clone(), node))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::Blake3Hasher;
    use crate::model::{to_gindex, Root};

    fn leaf(byte: u8) -> TreeNode {
        TreeNode::leaf(Root::from_bytes([byte; 32]))
    }

    #[test]
    fn test_fill_to_length_pads_with_zero() {
        let nodes = vec![leaf(1), leaf(2), leaf(3)];
        let tree = subtree_fill_to_length(&nodes, 2, 3).unwrap();
        for (i, expected) in nodes.iter().enumerate() {
            assert_eq!(&tree.getter(to_gindex(i as u64, 2).unwrap()).unwrap(), expected);
        }
        assert_eq!(
            tree.getter(to_gindex(3, 2).unwrap()).unwrap(),
            TreeNode::leaf(Root::ZERO)
        );
    }

    #[test]
    fn test_fill_to_length_uses_at_most_length() {
        let nodes = vec![leaf(1), leaf(2), leaf(3)];
        let tree = subtree_fill_to_length(&nodes, 2, 1).unwrap();
        assert_eq!(tree.getter(to_gindex(0, 2).unwrap()).unwrap(), leaf(1));
        assert_eq!(tree.getter(to_gindex(1, 2).unwrap()).unwrap(), zero_node(0));
        // Empty right half is the shared zero subtree
        let (_, right) = tree.children().unwrap();
        assert!(TreeNode::same_node(right, &zero_node(1)));
    }

    #[test]
    fn test_fill_rejects_overflow() {
        let nodes = vec![leaf(1); 5];
        assert!(matches!(
            subtree_fill_to_length(&nodes, 2, 5),
            Err(Error::OutOfRange(_))
        ));
        assert!(matches!(
            subtree_fill_repeat(&leaf(1), 1, 3),
            Err(Error::OutOfRange(_))
        ));
    }

    #[test]
    fn test_fill_depth_zero() {
        let tree = subtree_fill_to_length(&[leaf(4)], 0, 1).unwrap();
        assert_eq!(tree, leaf(4));
        assert_eq!(subtree_fill_to_length(&[], 0, 0).unwrap(), zero_node(0));
    }

    #[test]
    fn test_fill_repeat_matches_explicit_fill() {
        let h = Blake3Hasher;
        for length in 0..=8u64 {
            let explicit = subtree_fill_to_length(&vec![leaf(6); length as usize], 3, length).unwrap();
            let repeated = subtree_fill_repeat(&leaf(6), 3, length).unwrap();
            assert_eq!(explicit, repeated, "length {}", length);
            assert_eq!(explicit.merkle_root(&h), repeated.merkle_root(&h));
        }
    }

    #[test]
    fn test_fill_repeat_shares_full_subtrees() {
        let tree = subtree_fill_repeat(&leaf(1), 4, 16).unwrap();
        let (left, right) = tree.children().unwrap();
        assert!(TreeNode::same_node(left, right));
    }
}
