//! Shared state of views that own their tree backing

use super::hook::Hook;
use crate::model::GeneralizedIndex;
use crate::tree::TreeNode;
use crate::Result;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::trace;

#[derive(Debug)]
struct BackedState {
    type_name: String,
    backing: TreeNode,
    hook: Option<Hook>,
}

/// The `(backing, hook)` pair of a composite view
///
/// Children created by the view receive hooks pointing back at this cell, so
/// a nested mutation lands here even while the owning view is borrowed
/// elsewhere. The lock is released before the cell's own hook fires, and a
/// failing hook puts the previous backing back.
#[derive(Debug)]
pub struct BackedCell {
    state: Arc<Mutex<BackedState>>,
}

impl BackedCell {
    pub fn new(type_name: impl Into<String>, backing: TreeNode, hook: Option<Hook>) -> Self {
        BackedCell {
            state: Arc::new(Mutex::new(BackedState {
                type_name: type_name.into(),
                backing,
                hook,
            })),
        }
    }

    pub fn get_backing(&self) -> TreeNode {
        self.state.lock().backing.clone()
    }

    /// Replace the backing, then notify the owner if hooked
    pub fn set_backing(&self, backing: TreeNode) -> Result<()> {
        let (previous, hook) = {
            let mut state = self.state.lock();
            let previous = std::mem::replace(&mut state.backing, backing.clone());
            (previous, state.hook.clone())
        };
        self.notify(previous, backing, hook)
    }

    /// Put `replacement` at `gindex` within the current backing
    ///
    /// The path is validated before anything is stored, so a failed rewrite
    /// leaves the cell unchanged.
    pub fn rewrite(&self, gindex: GeneralizedIndex, replacement: TreeNode) -> Result<()> {
        let (previous, backing, hook) = {
            let mut state = self.state.lock();
            let link = state.backing.setter(gindex)?;
            let backing = link.apply(replacement);
            let previous = std::mem::replace(&mut state.backing, backing.clone());
            trace!(
                gindex = gindex.get(),
                type_name = %state.type_name,
                hooked = state.hook.is_some(),
                "rewrote backing path"
            );
            (previous, backing, state.hook.clone())
        };
        self.notify(previous, backing, hook)
    }

    /// Fire the hook with `backing`, restoring `previous` if the owner refuses it
    fn notify(&self, previous: TreeNode, backing: TreeNode, hook: Option<Hook>) -> Result<()> {
        let hook = match hook {
            Some(hook) => hook,
            None => return Ok(()),
        };
        if let Err(err) = hook.invoke(&backing) {
            let mut state = self.state.lock();
            // Only undo our own write
            if TreeNode::same_node(&state.backing, &backing) {
                state.backing = previous;
            }
            trace!(type_name = %state.type_name, error = %err, "hook failed, backing restored");
            return Err(err);
        }
        Ok(())
    }

    /// Hook for a child view living at `gindex` below this cell
    pub fn child_hook(&self, gindex: GeneralizedIndex) -> Hook {
        Hook::into_owner(
            BackedCell {
                state: Arc::clone(&self.state),
            },
            gindex,
        )
    }
}
