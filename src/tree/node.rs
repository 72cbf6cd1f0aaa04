//! Immutable tree nodes

use super::link::Link;
use super::zero::zero_node;
use crate::hash::MerkleHasher;
use crate::model::{GeneralizedIndex, Root};
use crate::{Error, Result};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// The two shapes a node can take
///
/// Internal nodes always own exactly two children.
pub enum NodeKind {
    /// A 32-byte chunk
    Leaf(Root),
    /// A pair of subtrees
    Internal(TreeNode, TreeNode),
}

/// A node in a persistent binary Merkle tree
///
/// Cloning is a reference-count bump. Nodes are never modified after
/// construction: rewrites build new nodes along one path and share every
/// other subtree with the original tree.
#[derive(Clone)]
pub struct TreeNode(Arc<NodeKind>);

impl TreeNode {
    /// Create a leaf node
    pub fn leaf(root: Root) -> Self {
        TreeNode(Arc::new(NodeKind::Leaf(root)))
    }

    /// Create an internal node from two children
    pub fn pair(left: TreeNode, right: TreeNode) -> Self {
        TreeNode(Arc::new(NodeKind::Internal(left, right)))
    }

    /// The canonical all-zero subtree of the given depth
    pub fn zero(depth: u32) -> Self {
        zero_node(depth)
    }

    pub fn kind(&self) -> &NodeKind {
        &self.0
    }

    pub fn is_leaf(&self) -> bool {
        matches!(*self.0, NodeKind::Leaf(_))
    }

    /// Leaf contents, if this is a leaf
    pub fn as_leaf(&self) -> Option<&Root> {
        match &*self.0 {
            NodeKind::Leaf(root) => Some(root),
            NodeKind::Internal(..) => None,
        }
    }

    /// Left and right children, if this is an internal node
    pub fn children(&self) -> Option<(&TreeNode, &TreeNode)> {
        match &*self.0 {
            NodeKind::Leaf(_) => None,
            NodeKind::Internal(left, right) => Some((left, right)),
        }
    }

    /// Whether both handles point at the very same allocation
    pub fn same_node(a: &TreeNode, b: &TreeNode) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }

    /// Get the node at `gindex` below this one
    pub fn getter(&self, gindex: GeneralizedIndex) -> Result<TreeNode> {
        if gindex.get() == 0 {
            return Err(Error::OutOfRange("generalized index 0 addresses nothing".into()));
        }

        let mut node = self;
        for (level, go_right) in gindex.path().enumerate() {
            match node.kind() {
                NodeKind::Internal(left, right) => {
                    node = if go_right { right } else { left };
                }
                NodeKind::Leaf(_) => {
                    return Err(Error::OutOfRange(format!(
                        "generalized index {} runs past a leaf at depth {}",
                        gindex, level
                    )));
                }
            }
        }
        Ok(node.clone())
    }

    /// Prepare a rewrite of the subtree at `gindex`
    ///
    /// The path is validated here, so applying the returned link never fails.
    pub fn setter(&self, gindex: GeneralizedIndex) -> Result<Link> {
        Link::new(self, gindex)
    }

    /// Merkle root of this subtree under `hasher`
    ///
    /// Shared subtrees are hashed once per call.
    pub fn merkle_root<H: MerkleHasher + ?Sized>(&self, hasher: &H) -> Root {
        let mut memo = HashMap::new();
        self.merkle_root_memo(hasher, &mut memo)
    }

    fn merkle_root_memo<H: MerkleHasher + ?Sized>(
        &self,
        hasher: &H,
        memo: &mut HashMap<*const NodeKind, Root>,
    ) -> Root {
        match &*self.0 {
            NodeKind::Leaf(root) => *root,
            NodeKind::Internal(left, right) => {
                let key = Arc::as_ptr(&self.0);
                if let Some(root) = memo.get(&key) {
                    return *root;
                }
                let l = left.merkle_root_memo(hasher, memo);
                let r = right.merkle_root_memo(hasher, memo);
                let root = hasher.hash_pair(&l, &r);
                memo.insert(key, root);
                root
            }
        }
    }
}

impl PartialEq for TreeNode {
    fn eq(&self, other: &Self) -> bool {
        if TreeNode::same_node(self, other) {
            return true;
        }
        match (self.kind(), other.kind()) {
            (NodeKind::Leaf(a), NodeKind::Leaf(b)) => a == b,
            (NodeKind::Internal(al, ar), NodeKind::Internal(bl, br)) => al == bl && ar == br,
            _ => false,
        }
    }
}

impl Eq for TreeNode {}

impl fmt::Debug for TreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Subtrees can be exponentially large once expanded, so only the top is shown
        match self.kind() {
            NodeKind::Leaf(root) => write!(f, "Leaf({:?})", root),
            NodeKind::Internal(..) => write!(f, "Internal({:p})", Arc::as_ptr(&self.0)),
        }
    }
}
