//! Low-level Taffy integration via trait implementation on ShadowTree.
//!
//! Instead of mirroring the shadow tree into a `TaffyTree`, Taffy's layout
//! traits are implemented directly on [`ShadowTree`]. A NodeId's low bits are
//! the arena slot, so there is no translation map and no duplicate node
//! storage.
//!
//! Styles are built per node on demand: the node's own style, with padding
//! taken from its `LayoutBox` (where header compensation writes it) and
//! host-rendered nodes forced to `display: none`.

use taffy::geometry::Point;
use taffy::prelude::*;
use taffy::{
    compute_cached_layout, compute_flexbox_layout, compute_hidden_layout, compute_root_layout,
    round_layout, Cache, CacheTree, Layout, LayoutFlexboxContainer, LayoutInput, LayoutOutput,
    LayoutPartialTree, NodeId, RoundTree, RunMode, TraversePartialTree, TraverseTree,
};

use crate::engine::{slot_of, ShadowNode, ShadowTree, TreePhase};
use crate::error::TreeError;
use crate::types::offset_point;

// =============================================================================
// CHILD ITERATOR
// =============================================================================

/// Iterator that yields `NodeId` from a node's child list.
pub struct ChildIter<'a> {
    inner: std::slice::Iter<'a, NodeId>,
}

impl Iterator for ChildIter<'_> {
    type Item = NodeId;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().copied()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for ChildIter<'_> {}

// =============================================================================
// STYLE + OUTPUT
// =============================================================================

impl ShadowTree {
    /// Build the Taffy `Style` for the given node.
    fn build_style(&self, id: NodeId) -> Style {
        let Ok(node) = self.node(id) else {
            return Style::default();
        };

        let mut style = node.style().clone();
        style.padding = node.layout_box.padding.to_taffy();

        if node.is_laid_out_by_host() {
            style.display = Display::None;
        }

        style
    }

    /// Clear cached layouts of dirty nodes and everything above them.
    fn invalidate_dirty_caches(&mut self) {
        let dirty: Vec<NodeId> = self
            .live_nodes()
            .filter(|(_, node)| node.dirty.invalidates_layout())
            .map(|(id, _)| id)
            .collect();
        for id in dirty {
            let mut current = Some(id);
            while let Some(node_id) = current {
                self.cache_clear(node_id);
                current = self.node(node_id).ok().and_then(ShadowNode::parent);
            }
        }
    }

    /// Copy final layouts into each node's own box and reset dirty flags.
    ///
    /// Returns the number of live nodes written.
    fn write_output(&mut self) -> usize {
        let mut written = 0;
        for (slot, entry) in self.nodes.iter_mut().enumerate() {
            let Some(node) = entry else {
                continue;
            };
            let layout = &self.final_layout[slot];
            node.layout_box.width = layout.size.width;
            node.layout_box.height = layout.size.height;
            node.dirty = Default::default();
            written += 1;
        }
        written
    }

    /// Compute layout for every root with Taffy's flexbox algorithm.
    ///
    /// Rounds to the pixel grid, writes sizes into each node's `LayoutBox`
    /// and seals the tree. Returns the number of nodes laid out.
    pub fn compute_layout(&mut self, available: Size<AvailableSpace>) -> Result<usize, TreeError> {
        if self.phase() == TreePhase::Committed {
            return Err(TreeError::Committed);
        }

        self.invalidate_dirty_caches();

        let roots = self.roots();
        for &root in &roots {
            compute_root_layout(self, root, available);
        }
        for &root in &roots {
            round_layout(self, root);
        }

        let written = self.write_output();
        self.seal();
        log::trace!("[screens] laid out {} nodes from {} roots", written, roots.len());
        Ok(written)
    }

    /// Final (rounded) layout of a node from the last layout pass.
    pub fn layout(&self, id: NodeId) -> Result<&Layout, TreeError> {
        self.node(id)?;
        self.final_layout
            .get(slot_of(id))
            .ok_or(TreeError::UnknownNode(id))
    }

    /// Location of a node relative to its root.
    ///
    /// Each screen ancestor shifts its descendants by its content origin offset.
    pub fn absolute_location(&self, id: NodeId) -> Result<Point<f32>, TreeError> {
        let mut location = self.layout(id)?.location;
        let mut current = self.parent(id)?;
        while let Some(parent) = current {
            let parent_layout = self.layout(parent)?;
            location = offset_point(location, parent_layout.location);
            if let Ok(offset) = self.content_origin_offset(parent) {
                location = offset_point(location, offset);
            }
            current = self.parent(parent)?;
        }
        Ok(location)
    }
}

// =============================================================================
// TRAIT IMPLEMENTATIONS
// =============================================================================

impl TraversePartialTree for ShadowTree {
    type ChildIter<'a>
        = ChildIter<'a>
    where
        Self: 'a;

    fn child_ids(&self, parent_node_id: NodeId) -> Self::ChildIter<'_> {
        let children = match self.node(parent_node_id) {
            Ok(node) => node.children(),
            Err(_) => &[],
        };
        ChildIter {
            inner: children.iter(),
        }
    }

    fn child_count(&self, parent_node_id: NodeId) -> usize {
        self.node(parent_node_id)
            .map(|node| node.children().len())
            .unwrap_or(0)
    }

    fn get_child_id(&self, parent_node_id: NodeId, child_index: usize) -> NodeId {
        let children = match self.node(parent_node_id) {
            Ok(node) => node.children(),
            Err(_) => &[],
        };
        children[child_index]
    }
}

impl TraverseTree for ShadowTree {}

impl LayoutPartialTree for ShadowTree {
    type CoreContainerStyle<'a>
        = Style
    where
        Self: 'a;

    fn get_core_container_style(&self, node_id: NodeId) -> Self::CoreContainerStyle<'_> {
        self.build_style(node_id)
    }

    fn set_unrounded_layout(&mut self, node_id: NodeId, layout: &Layout) {
        let idx = slot_of(node_id);
        if idx < self.unrounded.len() {
            self.unrounded[idx] = *layout;
        }
    }

    fn compute_child_layout(&mut self, node_id: NodeId, inputs: LayoutInput) -> LayoutOutput {
        compute_cached_layout(self, node_id, inputs, |tree, node_id, inputs| {
            let hidden = tree
                .node(node_id)
                .map(ShadowNode::is_laid_out_by_host)
                .unwrap_or(true);

            if hidden {
                return compute_hidden_layout(tree, node_id);
            }

            // Screens and views are both flex containers; leaves are
            // containers without children.
            compute_flexbox_layout(tree, node_id, inputs)
        })
    }
}

impl CacheTree for ShadowTree {
    fn cache_get(
        &self,
        node_id: NodeId,
        known_dimensions: Size<Option<f32>>,
        available_space: Size<AvailableSpace>,
        run_mode: RunMode,
    ) -> Option<LayoutOutput> {
        self.cache
            .get(slot_of(node_id))
            .and_then(|cache: &Cache| cache.get(known_dimensions, available_space, run_mode))
    }

    fn cache_store(
        &mut self,
        node_id: NodeId,
        known_dimensions: Size<Option<f32>>,
        available_space: Size<AvailableSpace>,
        run_mode: RunMode,
        layout_output: LayoutOutput,
    ) {
        if let Some(cache) = self.cache.get_mut(slot_of(node_id)) {
            cache.store(known_dimensions, available_space, run_mode, layout_output);
        }
    }

    fn cache_clear(&mut self, node_id: NodeId) {
        if let Some(cache) = self.cache.get_mut(slot_of(node_id)) {
            cache.clear();
        }
    }
}

impl LayoutFlexboxContainer for ShadowTree {
    type FlexboxContainerStyle<'a>
        = Style
    where
        Self: 'a;
    type FlexboxItemStyle<'a>
        = Style
    where
        Self: 'a;

    fn get_flexbox_container_style(&self, node_id: NodeId) -> Self::FlexboxContainerStyle<'_> {
        self.build_style(node_id)
    }

    fn get_flexbox_child_style(&self, child_node_id: NodeId) -> Self::FlexboxItemStyle<'_> {
        self.build_style(child_node_id)
    }
}

impl RoundTree for ShadowTree {
    fn get_unrounded_layout(&self, node_id: NodeId) -> &Layout {
        &self.unrounded[slot_of(node_id)]
    }

    fn set_final_layout(&mut self, node_id: NodeId, layout: &Layout) {
        let idx = slot_of(node_id);
        if idx < self.final_layout.len() {
            self.final_layout[idx] = *layout;
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
