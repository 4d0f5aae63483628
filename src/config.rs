//! Layout configuration.
//!
//! Passed once when a tree is created and read by the screen node during
//! header compensation.

use bitflags::bitflags;

use crate::types::{Edge, HEADER_CONFIG_COMPONENT_NAME};

/// Tree-wide layout configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Component name the header locator matches children against.
    pub header_config_component: String,

    /// Edge of the screen's own box that receives the header height.
    pub header_edge: Edge,

    /// Whether screens estimate header height before the host has committed state.
    ///
    /// Hosts that lay the header out inside the tree itself turn this off.
    pub header_compensation: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            header_config_component: HEADER_CONFIG_COMPONENT_NAME.to_string(),
            header_edge: Edge::Bottom,
            header_compensation: true,
        }
    }
}

impl LayoutConfig {
    pub fn with_header_edge(mut self, edge: Edge) -> Self {
        self.header_edge = edge;
        self
    }

    pub fn with_header_config_component(mut self, name: impl Into<String>) -> Self {
        self.header_config_component = name.into();
        self
    }

    pub fn with_header_compensation(mut self, enabled: bool) -> Self {
        self.header_compensation = enabled;
        self
    }
}

// =============================================================================
// DIRTY FLAGS
// =============================================================================

bitflags! {
    /// What changed on a node since the last layout pass.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct DirtyFlags: u8 {
        /// Own box (padding) or style changed.
        const LAYOUT = 1 << 0;
        /// Children were attached or removed.
        const CHILDREN = 1 << 1;
        /// Committed state was replaced.
        const STATE = 1 << 2;
    }
}

impl DirtyFlags {
    /// Flags that invalidate cached layout of the node and its ancestors.
    pub fn invalidates_layout(self) -> bool {
        self.intersects(Self::LAYOUT | Self::CHILDREN)
    }
}
