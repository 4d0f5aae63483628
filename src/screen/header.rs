//! Header-config child: props and locator.

use taffy::NodeId;

use crate::engine::ShadowTree;

/// Props carried by a screen's header-config child.
///
/// Immutable once the child is attached; the screen only reads them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HeaderConfigProps {
    /// Header is not rendered at all.
    pub hidden: bool,
    /// Title font size in host units. Zero means "host default".
    pub title_font_size: i32,
    /// Title text; only its emptiness matters for measurement.
    pub title: String,
}

impl HeaderConfigProps {
    pub fn new(title: impl Into<String>, title_font_size: i32) -> Self {
        Self {
            hidden: false,
            title_font_size,
            title: title.into(),
        }
    }

    pub fn hidden() -> Self {
        Self {
            hidden: true,
            ..Self::default()
        }
    }
}

/// Find the first direct child of `node` declared as a header config.
///
/// Matches on the component name configured in [`crate::LayoutConfig`].
/// Returns `None` for unknown nodes and for nodes without children.
pub fn find_header_config_child(tree: &ShadowTree, node: NodeId) -> Option<NodeId> {
    let wanted = tree.config().header_config_component.as_str();
    tree.children(node)
        .ok()?
        .iter()
        .copied()
        .find(|&child| {
            tree.node(child)
                .map(|n| n.component_name() == wanted)
                .unwrap_or(false)
        })
}
