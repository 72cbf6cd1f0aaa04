//! Change propagation from child views to their owners

use super::backed::BackedCell;
use crate::model::GeneralizedIndex;
use crate::tree::TreeNode;
use crate::Result;
use std::fmt;
use std::sync::Arc;

/// Callback fired with a view's new backing whenever that backing changes
///
/// Owners hand one hook to each child view they create. A hook is never
/// shared between two independently mutating children.
#[derive(Clone)]
pub struct Hook(Arc<dyn Fn(&TreeNode) -> Result<()> + Send + Sync>);

impl Hook {
    /// Wrap an arbitrary callback
    pub fn new(f: impl Fn(&TreeNode) -> Result<()> + Send + Sync + 'static) -> Self {
        Hook(Arc::new(f))
    }

    /// Hook that writes a child's backing into `owner` at `gindex`
    ///
    /// The continuation holds the owner's state, never the other way
    /// around, so hook chains cannot form cycles.
    pub(crate) fn into_owner(owner: BackedCell, gindex: GeneralizedIndex) -> Self {
        Hook::new(move |child_backing| owner.rewrite(gindex, child_backing.clone()))
    }

    pub fn invoke(&self, backing: &TreeNode) -> Result<()> {
        (self.0)(backing)
    }
}

impl fmt::Debug for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hook({:p})", Arc::as_ptr(&self.0))
    }
}
