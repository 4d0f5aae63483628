//! Mutation guard.
//!
//! Geometry of a node may only change while the tree is unsealed. A sealed
//! tree (one that has been laid out) is unsealed on request; a committed tree
//! can never be unsealed again, and asking for mutable geometry at that point
//! is a sequencing bug in the caller, so it panics.
//!
//! Mutable access is handed out as a [`MutationPermit`] that only lives for
//! the duration of the closure passed to
//! [`ShadowTree::with_mutable_geometry`]. The permit borrows the tree
//! exclusively, so a second permit for the same node cannot be taken while
//! the first is alive.

use std::ops::{Deref, DerefMut};

use taffy::NodeId;

use crate::config::DirtyFlags;
use crate::error::TreeError;
use crate::screen::ScreenState;
use crate::types::{EdgeInsets, LayoutBox};

use super::tree::{ShadowTree, TreePhase};

/// Scoped mutable access to one node's own `LayoutBox`.
pub struct MutationPermit<'a> {
    node: NodeId,
    layout_box: &'a mut LayoutBox,
}

impl MutationPermit<'_> {
    /// Node this permit was granted for.
    pub fn node(&self) -> NodeId {
        self.node
    }
}

impl Deref for MutationPermit<'_> {
    type Target = LayoutBox;

    fn deref(&self) -> &LayoutBox {
        self.layout_box
    }
}

impl DerefMut for MutationPermit<'_> {
    fn deref_mut(&mut self) -> &mut LayoutBox {
        self.layout_box
    }
}

impl ShadowTree {
    /// Make sure the tree accepts mutations, unsealing it if needed.
    ///
    /// # Panics
    ///
    /// If the tree has been committed.
    pub(crate) fn ensure_unsealed(&mut self) {
        match self.phase {
            TreePhase::Open => {}
            TreePhase::Sealed => {
                log::trace!("[screens] unsealing tree for mutation");
                self.phase = TreePhase::Open;
            }
            TreePhase::Committed => {
                panic!("[screens] attempted to mutate a committed tree; mutations are only allowed before commit")
            }
        }
    }

    /// Run `f` with mutable access to the geometry of `node`.
    ///
    /// Marks the node layout-dirty. Padding left negative by `f` is clamped
    /// back to zero.
    ///
    /// # Panics
    ///
    /// If the tree has been committed.
    pub fn with_mutable_geometry<R>(
        &mut self,
        node: NodeId,
        f: impl FnOnce(&mut MutationPermit<'_>) -> R,
    ) -> Result<R, TreeError> {
        self.node(node)?;
        self.ensure_unsealed();
        let entry = self.node_mut(node)?;

        let result = {
            let mut permit = MutationPermit {
                node,
                layout_box: &mut entry.layout_box,
            };
            f(&mut permit)
        };

        let padding = entry.layout_box.padding;
        if !padding.is_valid() {
            log::warn!(
                "[screens] clamping invalid padding {:?} on node {:?}",
                padding,
                node
            );
            entry.layout_box.padding =
                EdgeInsets::new(padding.top, padding.right, padding.bottom, padding.left);
        }
        entry.dirty |= DirtyFlags::LAYOUT;

        Ok(result)
    }

    /// Run `f` with mutable access to the committed state of a screen.
    ///
    /// Leaving a non-zero frame size behind supersedes the header estimate.
    ///
    /// # Panics
    ///
    /// If the tree has been committed.
    pub fn with_mutable_state<R>(
        &mut self,
        node: NodeId,
        f: impl FnOnce(&mut ScreenState) -> R,
    ) -> Result<R, TreeError> {
        if self.node(node)?.as_screen().is_none() {
            return Err(TreeError::NotAScreen(node));
        }
        self.ensure_unsealed();
        let entry = self.node_mut(node)?;
        let screen = entry.as_screen_mut().ok_or(TreeError::NotAScreen(node))?;
        let result = f(screen.state_mut());
        screen.supersede_if_measured();
        entry.dirty |= DirtyFlags::STATE;
        Ok(result)
    }
}
