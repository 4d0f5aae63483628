//! Screen layout node.
//!
//! A screen reserves room for a header that the host renders outside the
//! layout tree. Until the host has committed real state for the screen, the
//! tree has no idea how tall that header is, so when a child is attached the
//! screen:
//!
//! 1. looks for its header-config child,
//! 2. asks the host measurement bridge for an estimated header height (unless
//!    the header is hidden),
//! 3. writes that height into its own padding through the mutation guard.
//!
//! This happens once. A failed measurement is final (padding zero), and an
//! attachment that finds no header leaves the screen uninitialized. Once the
//! host delivers committed geometry the node is superseded.
//!
//! ```text
//! Uninitialized ──attach (header found)──▶ Compensated
//!       │                                       │
//!       └───────update_state / frame > 0────────┴──▶ Superseded
//! ```

mod header;

pub use header::{find_header_config_child, HeaderConfigProps};

use taffy::NodeId;
use taffy::geometry::{Point, Size};

use crate::bridge::find_header_height;
use crate::engine::ShadowTree;
use crate::types::{is_zero_size, EdgeInsets};

// =============================================================================
// COMMITTED STATE
// =============================================================================

/// State snapshot confirmed by the host surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenState {
    /// Frame size the host laid the screen out with.
    pub frame_size: Size<f32>,
    /// Offset applied to the screen's content (e.g. below a translucent header).
    pub content_offset: Point<f32>,
}

impl Default for ScreenState {
    fn default() -> Self {
        Self {
            frame_size: Size::ZERO,
            content_offset: Point::ZERO,
        }
    }
}

impl ScreenState {
    pub fn new(frame_size: Size<f32>, content_offset: Point<f32>) -> Self {
        Self {
            frame_size,
            content_offset,
        }
    }

    /// Snapshot with a frame size and no content offset.
    pub fn with_frame(width: f32, height: f32) -> Self {
        Self::new(Size { width, height }, Point::ZERO)
    }
}

// =============================================================================
// COMPENSATION STATE
// =============================================================================

/// One-shot header compensation lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum CompensationState {
    /// No committed geometry yet and no header estimate applied.
    #[default]
    Uninitialized,
    /// Estimated header height written into padding (possibly zero).
    Compensated { header_height: f32 },
    /// Host committed state has landed; estimates are ignored from now on.
    Superseded,
}

impl CompensationState {
    /// Whether attaching a child may still apply the header estimate.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Uninitialized)
    }
}

// =============================================================================
// SCREEN NODE
// =============================================================================

/// Screen-specific data of a shadow node.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScreenNode {
    state: ScreenState,
    compensation: CompensationState,
}

impl ScreenNode {
    /// A freshly instantiated screen with no committed state.
    pub fn new() -> Self {
        Self::default()
    }

    /// A screen created from state the host has already committed.
    ///
    /// An all-zero snapshot carries no host geometry, so such a screen still
    /// starts uninitialized.
    pub fn from_committed(state: ScreenState) -> Self {
        let compensation = if is_zero_size(state.frame_size) {
            CompensationState::Uninitialized
        } else {
            CompensationState::Superseded
        };
        Self {
            state,
            compensation,
        }
    }

    pub fn state(&self) -> &ScreenState {
        &self.state
    }

    pub fn compensation(&self) -> CompensationState {
        self.compensation
    }

    /// Origin offset of the screen's content, taken from committed state.
    pub fn content_origin_offset(&self) -> Point<f32> {
        self.state.content_offset
    }

    pub(crate) fn state_mut(&mut self) -> &mut ScreenState {
        &mut self.state
    }

    /// Real geometry written into committed state ends the estimate window.
    pub(crate) fn supersede_if_measured(&mut self) {
        if !is_zero_size(self.state.frame_size) {
            self.compensation = CompensationState::Superseded;
        }
    }

    pub(crate) fn replace_state(&mut self, state: ScreenState) {
        self.state = state;
        self.compensation = CompensationState::Superseded;
    }

    pub(crate) fn mark_compensated(&mut self, header_height: f32) {
        self.compensation = CompensationState::Compensated { header_height };
    }
}

// =============================================================================
// HEADER COMPENSATION
// =============================================================================

/// Apply the estimated header height to a screen's own padding.
///
/// Runs from the tree's child-attachment hook. Returns the height written
/// into padding, or `None` when nothing was changed: not a screen, already
/// compensated or superseded, committed frame already non-zero, compensation
/// disabled, or no header-config child.
pub fn compensate_header(tree: &mut ShadowTree, screen: NodeId) -> Option<f32> {
    if !tree.config().header_compensation {
        return None;
    }

    let screen_node = tree.node(screen).ok()?.as_screen()?;
    let pending = screen_node.compensation().is_pending()
        && is_zero_size(screen_node.state().frame_size);
    if !pending {
        return None;
    }

    // During creation children are not attached yet; no header, no padding.
    let header = find_header_config_child(tree, screen)?;
    let Some(props) = tree.node(header).ok()?.header_config_props().cloned() else {
        log::debug!(
            "[screens] child {:?} is named as a header config but carries no header props",
            header
        );
        return None;
    };

    let header_height = if props.hidden {
        0.0
    } else {
        find_header_height(
            tree.measurer(),
            props.title_font_size,
            props.title.is_empty(),
        )
        .unwrap_or(0.0)
    };

    let edge = tree.config().header_edge;
    let applied = tree.with_mutable_geometry(screen, |geometry| {
        geometry.padding = EdgeInsets::only(edge, header_height);
        geometry.padding.get(edge)
    });

    match applied {
        Ok(height) => {
            if let Ok(node) = tree.node_mut(screen) {
                if let Some(screen_node) = node.as_screen_mut() {
                    screen_node.mark_compensated(height);
                }
            }
            log::trace!(
                "[screens] screen {:?} reserved {} for its header",
                screen,
                height
            );
            Some(height)
        }
        Err(err) => {
            log::warn!("[screens] could not apply header padding: {err}");
            None
        }
    }
}
