//! ShadowTree - arena of shadow nodes.
//!
//! Owns every node, their parent/child links, the committed state of screens
//! and the tree-wide seal phase. The low 32 bits of a `NodeId` are the arena
//! slot, which the layout bridge uses to hand nodes to taffy without
//! translation. The high 32 bits are the slot's generation.
//!
//! Discarding a subtree frees its slots and pushes them onto a free list;
//! `create_node` reuses them. Each reuse bumps the generation, so an id held
//! from before the discard is reported as discarded instead of aliasing the
//! new node.
//!
//! ```text
//! slot:        0         1         2
//! generation:  0         3         0
//! node:        Screen    (free)    View
//! free list:   [1]
//! ```
//!
//! # Phases
//!
//! ```text
//! Open ──compute_layout / seal──▶ Sealed ──commit──▶ Committed
//!   ▲                               │
//!   └────────── mutation ───────────┘
//! ```

use std::sync::Arc;

use taffy::geometry::Point;
use taffy::{Cache, Layout, NodeId};

use crate::bridge::HeaderHeightMeasurer;
use crate::config::{DirtyFlags, LayoutConfig};
use crate::error::TreeError;
use crate::screen::{compensate_header, CompensationState, ScreenState};
use crate::types::LayoutBox;

use super::node::ShadowNode;

const SLOT_BITS: u32 = 32;
const SLOT_MASK: u64 = (1 << SLOT_BITS) - 1;

/// Arena slot addressed by `id`.
pub(crate) fn slot_of(id: NodeId) -> usize {
    (u64::from(id) & SLOT_MASK) as usize
}

fn generation_of(id: NodeId) -> u32 {
    (u64::from(id) >> SLOT_BITS) as u32
}

fn make_id(slot: usize, generation: u32) -> NodeId {
    NodeId::from((u64::from(generation) << SLOT_BITS) | slot as u64)
}

/// Mutability phase of the whole tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreePhase {
    /// Under construction; nodes may be mutated freely.
    #[default]
    Open,
    /// Laid out; mutation requires an unseal, which is granted on request.
    Sealed,
    /// Final. Nothing may change any more.
    Committed,
}

/// Retained layout tree holding screens, header configs and plain views.
pub struct ShadowTree {
    /// Node per slot; `None` for freed slots.
    pub(crate) nodes: Vec<Option<ShadowNode>>,
    generations: Vec<u32>,
    free_slots: Vec<usize>,
    /// Per-node taffy layout cache.
    pub(crate) cache: Vec<Cache>,
    /// Layouts written by taffy during computation.
    pub(crate) unrounded: Vec<Layout>,
    /// Pixel-snapped layouts written by `round_layout`.
    pub(crate) final_layout: Vec<Layout>,
    pub(crate) phase: TreePhase,
    config: LayoutConfig,
    measurer: Option<Arc<dyn HeaderHeightMeasurer>>,
}

impl ShadowTree {
    /// Create an empty tree with no host measurement service attached.
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_slots: Vec::new(),
            cache: Vec::new(),
            unrounded: Vec::new(),
            final_layout: Vec::new(),
            phase: TreePhase::Open,
            config,
            measurer: None,
        }
    }

    /// Create an empty tree that measures headers through `measurer`.
    pub fn with_measurer(config: LayoutConfig, measurer: Arc<dyn HeaderHeightMeasurer>) -> Self {
        let mut tree = Self::new(config);
        tree.measurer = Some(measurer);
        tree
    }

    /// Attach or detach the host measurement service.
    pub fn set_measurer(&mut self, measurer: Option<Arc<dyn HeaderHeightMeasurer>>) {
        self.measurer = measurer;
    }

    pub fn measurer(&self) -> Option<&dyn HeaderHeightMeasurer> {
        self.measurer.as_deref()
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn phase(&self) -> TreePhase {
        self.phase
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.len() - self.free_slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // =========================================================================
    // NODE ACCESS
    // =========================================================================

    /// Resolve `id` to its slot, rejecting ids from before a discard.
    fn lookup(&self, id: NodeId) -> Result<usize, TreeError> {
        let slot = slot_of(id);
        let current = *self
            .generations
            .get(slot)
            .ok_or(TreeError::UnknownNode(id))?;
        let wanted = generation_of(id);
        if wanted < current {
            return Err(TreeError::Discarded(id));
        }
        match self.nodes.get(slot) {
            Some(Some(_)) if wanted == current => Ok(slot),
            _ => Err(TreeError::UnknownNode(id)),
        }
    }

    pub fn node(&self, id: NodeId) -> Result<&ShadowNode, TreeError> {
        let slot = self.lookup(id)?;
        self.nodes[slot].as_ref().ok_or(TreeError::UnknownNode(id))
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Result<&mut ShadowNode, TreeError> {
        let slot = self.lookup(id)?;
        self.nodes[slot].as_mut().ok_or(TreeError::UnknownNode(id))
    }

    /// Live nodes with their ids, in slot order.
    pub(crate) fn live_nodes(&self) -> impl Iterator<Item = (NodeId, &ShadowNode)> + '_ {
        self.nodes.iter().enumerate().filter_map(|(slot, entry)| {
            entry
                .as_ref()
                .map(|node| (make_id(slot, self.generations[slot]), node))
        })
    }

    pub fn children(&self, id: NodeId) -> Result<&[NodeId], TreeError> {
        Ok(self.node(id)?.children())
    }

    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>, TreeError> {
        Ok(self.node(id)?.parent())
    }

    pub fn layout_box(&self, id: NodeId) -> Result<&LayoutBox, TreeError> {
        Ok(self.node(id)?.layout_box())
    }

    /// Live nodes without a parent, in slot order.
    pub fn roots(&self) -> Vec<NodeId> {
        self.live_nodes()
            .filter(|(_, node)| node.parent.is_none())
            .map(|(id, _)| id)
            .collect()
    }

    // =========================================================================
    // COMMITTED STATE (read-only)
    // =========================================================================

    /// Committed state of a screen.
    pub fn state(&self, id: NodeId) -> Result<&ScreenState, TreeError> {
        self.node(id)?
            .as_screen()
            .map(|screen| screen.state())
            .ok_or(TreeError::NotAScreen(id))
    }

    /// Offset applied to a screen's children, derived from committed state.
    pub fn content_origin_offset(&self, id: NodeId) -> Result<Point<f32>, TreeError> {
        self.node(id)?
            .as_screen()
            .map(|screen| screen.content_origin_offset())
            .ok_or(TreeError::NotAScreen(id))
    }

    pub fn compensation_state(&self, id: NodeId) -> Result<CompensationState, TreeError> {
        self.node(id)?
            .as_screen()
            .map(|screen| screen.compensation())
            .ok_or(TreeError::NotAScreen(id))
    }

    // =========================================================================
    // STRUCTURE
    // =========================================================================

    /// Structural changes are a mutation window: a sealed tree is unsealed,
    /// a committed tree refuses.
    fn open_for_structure(&mut self) -> Result<(), TreeError> {
        if self.phase == TreePhase::Committed {
            return Err(TreeError::Committed);
        }
        self.ensure_unsealed();
        Ok(())
    }

    /// Add a node to the arena, reusing a freed slot if there is one.
    /// It starts detached (a root).
    pub fn create_node(&mut self, node: ShadowNode) -> Result<NodeId, TreeError> {
        self.open_for_structure()?;
        let slot = match self.free_slots.pop() {
            Some(slot) => {
                self.nodes[slot] = Some(node);
                slot
            }
            None => {
                self.nodes.push(Some(node));
                self.generations.push(0);
                self.cache.push(Cache::new());
                self.unrounded.push(Layout::with_order(0));
                self.final_layout.push(Layout::with_order(0));
                self.nodes.len() - 1
            }
        };
        Ok(make_id(slot, self.generations[slot]))
    }

    /// Destroy the node in `slot` and return the slot to the free list.
    fn release_slot(&mut self, slot: usize) -> Option<ShadowNode> {
        let node = self.nodes[slot].take()?;
        self.generations[slot] = self.generations[slot].wrapping_add(1);
        self.cache[slot] = Cache::new();
        self.unrounded[slot] = Layout::with_order(0);
        self.final_layout[slot] = Layout::with_order(0);
        self.free_slots.push(slot);
        Some(node)
    }

    /// Attach `child` as the last child of `parent`.
    ///
    /// When `parent` is a screen this is where header compensation runs.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        self.open_for_structure()?;
        self.node(parent)?;
        let existing_parent = self.node(child)?.parent;
        if let Some(existing) = existing_parent {
            return Err(TreeError::AlreadyAttached {
                child,
                parent: existing,
            });
        }
        if self.is_ancestor_or_self(child, parent) {
            return Err(TreeError::Cycle { child, parent });
        }

        {
            let child_node = self.node_mut(child)?;
            child_node.parent = Some(parent);
        }
        {
            let parent_node = self.node_mut(parent)?;
            parent_node.children.push(child);
            parent_node.dirty |= DirtyFlags::CHILDREN;
        }

        if self.node(parent)?.as_screen().is_some() {
            compensate_header(self, parent);
        }
        Ok(())
    }

    /// Detach `child` from `parent` and destroy the whole subtree.
    ///
    /// Ids of the destroyed nodes report [`TreeError::Discarded`] from now on.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        self.open_for_structure()?;
        let position = self
            .node(parent)?
            .children
            .iter()
            .position(|&c| c == child)
            .ok_or(TreeError::NotAChild { child, parent })?;

        {
            let parent_node = self.node_mut(parent)?;
            parent_node.children.remove(position);
            parent_node.dirty |= DirtyFlags::CHILDREN;
        }

        let mut stack = vec![child];
        let mut released = 0;
        while let Some(id) = stack.pop() {
            let slot = self.lookup(id)?;
            if let Some(node) = self.release_slot(slot) {
                stack.extend(node.children);
                released += 1;
            }
        }
        log::trace!("[screens] released {} nodes under {:?}", released, child);
        Ok(())
    }

    /// Replace a screen's committed state with a snapshot delivered by the host.
    ///
    /// From here on the screen ignores header estimates.
    pub fn update_state(&mut self, id: NodeId, state: ScreenState) -> Result<(), TreeError> {
        self.open_for_structure()?;
        let node = self.node_mut(id)?;
        let screen = node.as_screen_mut().ok_or(TreeError::NotAScreen(id))?;
        screen.replace_state(state);
        node.dirty |= DirtyFlags::STATE;
        log::debug!(
            "[screens] committed state for {:?}: {}x{}",
            id,
            state.frame_size.width,
            state.frame_size.height
        );
        Ok(())
    }

    fn is_ancestor_or_self(&self, candidate: NodeId, mut id: NodeId) -> bool {
        loop {
            if id == candidate {
                return true;
            }
            match self.node(id).ok().and_then(|n| n.parent) {
                Some(parent) => id = parent,
                None => return false,
            }
        }
    }

    // =========================================================================
    // PHASES
    // =========================================================================

    /// Seal the tree. Later mutations unseal it again.
    pub fn seal(&mut self) {
        if self.phase == TreePhase::Open {
            self.phase = TreePhase::Sealed;
        }
    }

    /// Commit the tree. It can never be mutated again.
    pub fn commit(&mut self) {
        self.phase = TreePhase::Committed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen::HeaderConfigProps;
    use taffy::Style;

    fn setup() -> ShadowTree {
        ShadowTree::new(LayoutConfig::default())
    }

    fn view(tree: &mut ShadowTree) -> NodeId {
        tree.create_node(ShadowNode::view(Style::default())).unwrap()
    }

    #[test]
    fn test_append_child_links_both_sides() {
        let mut tree = setup();
        let parent = view(&mut tree);
        let child = view(&mut tree);

        tree.append_child(parent, child).unwrap();

        assert_eq!(tree.children(parent).unwrap(), &[child]);
        assert_eq!(tree.parent(child).unwrap(), Some(parent));
        assert_eq!(tree.roots(), vec![parent]);
        assert!(tree.node(parent).unwrap().dirty().contains(DirtyFlags::CHILDREN));
    }

    #[test]
    fn test_append_rejects_second_parent() {
        let mut tree = setup();
        let a = view(&mut tree);
        let b = view(&mut tree);
        let child = view(&mut tree);
        tree.append_child(a, child).unwrap();

        assert_eq!(
            tree.append_child(b, child),
            Err(TreeError::AlreadyAttached { child, parent: a })
        );
    }

    #[test]
    fn test_append_rejects_cycles() {
        let mut tree = setup();
        let a = view(&mut tree);
        let b = view(&mut tree);
        tree.append_child(a, b).unwrap();

        assert_eq!(tree.append_child(b, a), Err(TreeError::Cycle { child: a, parent: b }));
        assert_eq!(tree.append_child(a, a), Err(TreeError::Cycle { child: a, parent: a }));
    }

    #[test]
    fn test_append_unknown_node() {
        let mut tree = setup();
        let a = view(&mut tree);
        let missing = NodeId::from(7usize);
        assert_eq!(tree.append_child(a, missing), Err(TreeError::UnknownNode(missing)));
    }

    #[test]
    fn test_remove_child_discards_subtree() {
        let mut tree = setup();
        let root = view(&mut tree);
        let mid = view(&mut tree);
        let leaf = view(&mut tree);
        tree.append_child(root, mid).unwrap();
        tree.append_child(mid, leaf).unwrap();

        tree.remove_child(root, mid).unwrap();

        assert!(tree.children(root).unwrap().is_empty());
        assert_eq!(tree.node(mid).err(), Some(TreeError::Discarded(mid)));
        assert_eq!(tree.node(leaf).err(), Some(TreeError::Discarded(leaf)));
        assert_eq!(tree.roots(), vec![root]);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.append_child(root, leaf), Err(TreeError::Discarded(leaf)));
    }

    #[test]
    fn test_freed_slots_are_reused() {
        let mut tree = setup();
        let root = view(&mut tree);
        let first = view(&mut tree);
        tree.append_child(root, first).unwrap();
        tree.remove_child(root, first).unwrap();

        for _ in 0..1000 {
            let child = view(&mut tree);
            tree.append_child(root, child).unwrap();
            tree.remove_child(root, child).unwrap();
        }

        assert_eq!(tree.len(), 1);
        assert_eq!(tree.nodes.len(), 2);
        assert_eq!(tree.cache.len(), 2);
        assert_eq!(tree.final_layout.len(), 2);
    }

    #[test]
    fn test_stale_id_does_not_alias_new_node() {
        let mut tree = setup();
        let root = view(&mut tree);
        let stale = view(&mut tree);
        tree.append_child(root, stale).unwrap();
        tree.remove_child(root, stale).unwrap();

        let fresh = tree
            .create_node(ShadowNode::header_config(HeaderConfigProps::default()))
            .unwrap();

        assert_eq!(slot_of(fresh), slot_of(stale));
        assert_ne!(fresh, stale);
        assert!(tree.node(fresh).unwrap().header_config_props().is_some());
        assert_eq!(tree.node(stale).err(), Some(TreeError::Discarded(stale)));
        assert_eq!(
            tree.remove_child(root, stale),
            Err(TreeError::NotAChild { child: stale, parent: root })
        );
    }

    #[test]
    fn test_remove_non_child() {
        let mut tree = setup();
        let a = view(&mut tree);
        let b = view(&mut tree);
        assert_eq!(
            tree.remove_child(a, b),
            Err(TreeError::NotAChild { child: b, parent: a })
        );
    }

    #[test]
    fn test_update_state_supersedes_screen() {
        let mut tree = setup();
        let screen = tree.create_node(ShadowNode::screen(Style::default())).unwrap();
        assert_eq!(
            tree.compensation_state(screen).unwrap(),
            CompensationState::Uninitialized
        );

        tree.update_state(screen, ScreenState::with_frame(390.0, 844.0))
            .unwrap();

        assert_eq!(
            tree.compensation_state(screen).unwrap(),
            CompensationState::Superseded
        );
        assert_eq!(tree.state(screen).unwrap().frame_size.width, 390.0);
        assert!(tree.node(screen).unwrap().dirty().contains(DirtyFlags::STATE));
    }

    #[test]
    fn test_state_of_non_screen() {
        let mut tree = setup();
        let header = tree
            .create_node(ShadowNode::header_config(HeaderConfigProps::default()))
            .unwrap();
        assert_eq!(tree.state(header), Err(TreeError::NotAScreen(header)));
        assert_eq!(
            tree.update_state(header, ScreenState::default()),
            Err(TreeError::NotAScreen(header))
        );
    }

    #[test]
    fn test_phases() {
        let mut tree = setup();
        assert_eq!(tree.phase(), TreePhase::Open);
        tree.seal();
        assert_eq!(tree.phase(), TreePhase::Sealed);

        // Structural change unseals.
        let a = view(&mut tree);
        assert_eq!(tree.phase(), TreePhase::Open);

        tree.commit();
        assert_eq!(tree.phase(), TreePhase::Committed);
        tree.seal();
        assert_eq!(tree.phase(), TreePhase::Committed);

        let b = NodeId::from(0usize);
        assert_eq!(tree.append_child(a, b), Err(TreeError::Committed));
        assert_eq!(
            tree.create_node(ShadowNode::view(Style::default())),
            Err(TreeError::Committed)
        );
    }

    #[test]
    fn test_reads_after_commit() {
        let mut tree = setup();
        let screen = tree
            .create_node(ShadowNode::screen_with_state(
                Style::default(),
                ScreenState::with_frame(100.0, 100.0),
            ))
            .unwrap();
        tree.commit();

        assert_eq!(tree.state(screen).unwrap().frame_size.height, 100.0);
        assert_eq!(tree.content_origin_offset(screen).unwrap(), Point::ZERO);
        assert!(tree.layout_box(screen).is_ok());
    }
}
