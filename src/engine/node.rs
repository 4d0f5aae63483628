//! ShadowNode - one element of the layout tree.
//!
//! Every node carries a declared component name, a taffy style, its own
//! `LayoutBox` and a kind-specific payload. The node's padding lives in the
//! `LayoutBox`, not in the style: layout always reads padding from the box so
//! that guarded mutations (header compensation) are what the flexbox pass
//! sees.

use taffy::{NodeId, Style};

use crate::config::DirtyFlags;
use crate::screen::{HeaderConfigProps, ScreenNode, ScreenState};
use crate::types::{
    EdgeInsets, LayoutBox, HEADER_CONFIG_COMPONENT_NAME, SCREEN_COMPONENT_NAME,
    VIEW_COMPONENT_NAME,
};

/// Kind-specific payload of a node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Plain flex container.
    View,
    /// Screen with committed state and header compensation.
    Screen(ScreenNode),
    /// Header configuration; rendered by the host, takes no space in the tree.
    HeaderConfig(HeaderConfigProps),
}

/// A node of the shadow tree.
#[derive(Debug, Clone)]
pub struct ShadowNode {
    component_name: String,
    kind: NodeKind,
    style: Style,
    pub(crate) children: Vec<NodeId>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) layout_box: LayoutBox,
    pub(crate) dirty: DirtyFlags,
}

impl ShadowNode {
    /// Create a node with an explicit component name and kind.
    pub fn new(component_name: impl Into<String>, kind: NodeKind, style: Style) -> Self {
        Self {
            component_name: component_name.into(),
            kind,
            style,
            children: Vec::new(),
            parent: None,
            layout_box: LayoutBox::default(),
            dirty: DirtyFlags::LAYOUT,
        }
    }

    pub fn view(style: Style) -> Self {
        Self::new(VIEW_COMPONENT_NAME, NodeKind::View, style)
    }

    /// A plain container declared under a custom component name.
    pub fn named(component_name: impl Into<String>, style: Style) -> Self {
        Self::new(component_name, NodeKind::View, style)
    }

    /// A screen with no committed state yet.
    pub fn screen(style: Style) -> Self {
        Self::new(SCREEN_COMPONENT_NAME, NodeKind::Screen(ScreenNode::new()), style)
    }

    /// A screen whose committed state is already known.
    pub fn screen_with_state(style: Style, state: ScreenState) -> Self {
        Self::new(
            SCREEN_COMPONENT_NAME,
            NodeKind::Screen(ScreenNode::from_committed(state)),
            style,
        )
    }

    pub fn header_config(props: HeaderConfigProps) -> Self {
        Self::new(
            HEADER_CONFIG_COMPONENT_NAME,
            NodeKind::HeaderConfig(props),
            Style::default(),
        )
    }

    /// Set the initial padding of the node's own box.
    pub fn with_padding(mut self, padding: EdgeInsets) -> Self {
        self.layout_box.padding = padding;
        self
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    pub fn component_name(&self) -> &str {
        &self.component_name
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn layout_box(&self) -> &LayoutBox {
        &self.layout_box
    }

    pub fn dirty(&self) -> DirtyFlags {
        self.dirty
    }

    pub fn as_screen(&self) -> Option<&ScreenNode> {
        match &self.kind {
            NodeKind::Screen(screen) => Some(screen),
            _ => None,
        }
    }

    pub(crate) fn as_screen_mut(&mut self) -> Option<&mut ScreenNode> {
        match &mut self.kind {
            NodeKind::Screen(screen) => Some(screen),
            _ => None,
        }
    }

    pub fn header_config_props(&self) -> Option<&HeaderConfigProps> {
        match &self.kind {
            NodeKind::HeaderConfig(props) => Some(props),
            _ => None,
        }
    }

    /// Header-config nodes are measured by the host, never by the tree.
    pub fn is_laid_out_by_host(&self) -> bool {
        matches!(self.kind, NodeKind::HeaderConfig(_))
    }
}
