//! Core types for screen-layout.
//!
//! Geometry primitives shared by the shadow tree, the screen node and the
//! layout bridge. Sizes and points are taffy's own types so they flow into
//! layout computation without conversion.

use taffy::geometry::{Point, Rect, Size};
use taffy::style::LengthPercentage;

// =============================================================================
// Component names
// =============================================================================

/// Declared component name of a screen node.
pub const SCREEN_COMPONENT_NAME: &str = "Screen";

/// Declared component name of the header-config child of a screen.
pub const HEADER_CONFIG_COMPONENT_NAME: &str = "ScreenStackHeaderConfig";

/// Declared component name of a plain container node.
pub const VIEW_COMPONENT_NAME: &str = "View";

// =============================================================================
// Edges
// =============================================================================

/// One side of a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Edge {
    Top,
    Right,
    #[default]
    Bottom,
    Left,
}

/// Per-edge insets (padding). Values are never negative.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EdgeInsets {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl EdgeInsets {
    pub const ZERO: Self = Self {
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
        left: 0.0,
    };

    /// Create insets, clamping negative (and NaN) values to zero.
    pub fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top: non_negative(top),
            right: non_negative(right),
            bottom: non_negative(bottom),
            left: non_negative(left),
        }
    }

    /// Insets that are zero everywhere except `edge`.
    pub fn only(edge: Edge, value: f32) -> Self {
        let mut insets = Self::ZERO;
        insets.set(edge, value);
        insets
    }

    /// Read the inset of a single edge.
    pub fn get(&self, edge: Edge) -> f32 {
        match edge {
            Edge::Top => self.top,
            Edge::Right => self.right,
            Edge::Bottom => self.bottom,
            Edge::Left => self.left,
        }
    }

    /// Overwrite the inset of a single edge.
    pub fn set(&mut self, edge: Edge, value: f32) {
        let value = non_negative(value);
        match edge {
            Edge::Top => self.top = value,
            Edge::Right => self.right = value,
            Edge::Bottom => self.bottom = value,
            Edge::Left => self.left = value,
        }
    }

    /// True when every edge is non-negative and finite.
    pub fn is_valid(&self) -> bool {
        [self.top, self.right, self.bottom, self.left]
            .iter()
            .all(|v| v.is_finite() && *v >= 0.0)
    }

    /// Convert to taffy padding.
    pub fn to_taffy(self) -> Rect<LengthPercentage> {
        Rect {
            top: LengthPercentage::Length(self.top),
            right: LengthPercentage::Length(self.right),
            bottom: LengthPercentage::Length(self.bottom),
            left: LengthPercentage::Length(self.left),
        }
    }
}

fn non_negative(value: f32) -> f32 {
    if value.is_nan() { 0.0 } else { value.max(0.0) }
}

// =============================================================================
// Layout box
// =============================================================================

/// A node's own box: last computed size plus the padding it lays children out with.
///
/// Width and height stay at zero until the first layout pass has run.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayoutBox {
    pub width: f32,
    pub height: f32,
    pub padding: EdgeInsets,
}

impl LayoutBox {
    pub fn with_padding(padding: EdgeInsets) -> Self {
        Self {
            padding,
            ..Self::default()
        }
    }

    pub fn size(&self) -> Size<f32> {
        Size {
            width: self.width,
            height: self.height,
        }
    }
}

/// True when both dimensions are zero.
pub fn is_zero_size(size: Size<f32>) -> bool {
    size.width == 0.0 && size.height == 0.0
}

/// Component-wise sum of two points.
pub fn offset_point(a: Point<f32>, b: Point<f32>) -> Point<f32> {
    Point {
        x: a.x + b.x,
        y: a.y + b.y,
    }
}
