//! Path rewrites: replace one subtree, share the rest

use super::node::{NodeKind, TreeNode};
use crate::model::GeneralizedIndex;
use crate::{Error, Result};

/// A prepared rewrite of the subtree at one generalized index
///
/// Holds the siblings met on the way down from the root. Applying the link to
/// a replacement node rebuilds only the internal nodes on that path; every
/// sibling is reused as-is. A link can be applied any number of times.
#[derive(Clone, Debug)]
pub struct Link {
    gindex: GeneralizedIndex,
    /// (went right, sibling) from the root downwards
    siblings: Vec<(bool, TreeNode)>,
}

impl Link {
    pub(crate) fn new(root: &TreeNode, gindex: GeneralizedIndex) -> Result<Self> {
        if gindex.get() == 0 {
            return Err(Error::OutOfRange("generalized index 0 addresses nothing".into()));
        }

        let mut siblings = Vec::with_capacity(gindex.depth() as usize);
        let mut node = root;
        for (level, go_right) in gindex.path().enumerate() {
            match node.kind() {
                NodeKind::Internal(left, right) => {
                    if go_right {
                        siblings.push((true, left.clone()));
                        node = right;
                    } else {
                        siblings.push((false, right.clone()));
                        node = left;
                    }
                }
                NodeKind::Leaf(_) => {
                    return Err(Error::OutOfRange(format!(
                        "generalized index {} runs past a leaf at depth {}",
                        gindex, level
                    )));
                }
            }
        }

        Ok(Link { gindex, siblings })
    }

    /// Where the replacement lands
    pub fn gindex(&self) -> GeneralizedIndex {
        self.gindex
    }

    /// Build the new root with `replacement` at this link's position
    pub fn apply(&self, replacement: TreeNode) -> TreeNode {
        self.siblings
            .iter()
            .rev()
            .fold(replacement, |node, (went_right, sibling)| {
                if *went_right {
                    TreeNode::pair(sibling.clone(), node)
                } else {
                    TreeNode::pair(node, sibling.clone())
                }
            })
    }

    /// Chain with a link prepared on the subtree this link replaces
    ///
    /// `inner` must come from `setter` on the node currently at
    /// `self.gindex()`; the result rewrites at the concatenated path.
    pub fn compose(&self, inner: &Link) -> Result<Link> {
        let gindex = self.gindex.concat(inner.gindex)?;
        let mut siblings = self.siblings.clone();
        siblings.extend(inner.siblings.iter().cloned());
        Ok(Link { gindex, siblings })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{to_gindex, Root};

    fn leaf(byte: u8) -> TreeNode {
        TreeNode::leaf(Root::from_bytes([byte; 32]))
    }

    #[test]
    fn test_apply_at_root_replaces_everything() {
        let tree = TreeNode::pair(leaf(1), leaf(2));
        let link = tree.setter(GeneralizedIndex::ROOT).unwrap();
        assert_eq!(link.apply(leaf(5)), leaf(5));
    }

    #[test]
    fn test_link_is_reusable() {
        let tree = TreeNode::pair(leaf(1), leaf(2));
        let link = tree.setter(GeneralizedIndex::new(3)).unwrap();
        let a = link.apply(leaf(7));
        let b = link.apply(leaf(8));
        assert_eq!(a, TreeNode::pair(leaf(1), leaf(7)));
        assert_eq!(b, TreeNode::pair(leaf(1), leaf(8)));
    }

    #[test]
    fn test_compose_matches_direct_setter() {
        let tree = TreeNode::pair(
            TreeNode::pair(leaf(1), leaf(2)),
            TreeNode::pair(leaf(3), leaf(4)),
        );
        let outer = tree.setter(GeneralizedIndex::new(3)).unwrap();
        let subtree = tree.getter(GeneralizedIndex::new(3)).unwrap();
        let inner = subtree.setter(GeneralizedIndex::new(2)).unwrap();

        let composed = outer.compose(&inner).unwrap();
        assert_eq!(composed.gindex(), to_gindex(2, 2).unwrap());

        let direct = tree.setter(to_gindex(2, 2).unwrap()).unwrap();
        assert_eq!(composed.apply(leaf(9)), direct.apply(leaf(9)));
    }
}
