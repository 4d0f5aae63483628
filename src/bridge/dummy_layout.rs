//! In-process header estimator.
//!
//! Estimates a header's height the same way a host does it natively: build a
//! throwaway app bar holding a toolbar with a title, lay it out, and read the
//! app bar's height. Here the throwaway tree is a `TaffyTree` and the title
//! is a leaf measured from its font size.
//!
//! ```text
//! AppBar (column, padding-top = status bar)
//! └── Toolbar (row, min-height, centered)
//!     └── Title (font size × line height)   -- omitted for empty titles
//! ```

use taffy::prelude::*;

use crate::error::MeasureError;

use super::HeaderHeightMeasurer;

/// Constants the estimator lays the dummy app bar out with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DummyLayoutMetrics {
    /// Minimum toolbar height.
    pub toolbar_min_height: f32,
    /// Title size used when the header does not set one (font size 0).
    pub default_title_font_size: i32,
    /// Line height as a multiple of the font size.
    pub title_line_height: f32,
    /// Vertical padding inside the toolbar, per edge.
    pub toolbar_vertical_padding: f32,
    /// Status bar inset above the toolbar.
    pub status_bar_height: f32,
    /// Width the dummy app bar is laid out in.
    pub window_width: f32,
}

impl Default for DummyLayoutMetrics {
    fn default() -> Self {
        Self {
            toolbar_min_height: 56.0,
            default_title_font_size: 20,
            title_line_height: 1.2,
            toolbar_vertical_padding: 0.0,
            status_bar_height: 0.0,
            window_width: 360.0,
        }
    }
}

/// [`HeaderHeightMeasurer`] that lays out a dummy app bar with Taffy.
#[derive(Debug, Clone, Default)]
pub struct DummyLayoutMeasurer {
    metrics: DummyLayoutMetrics,
}

impl DummyLayoutMeasurer {
    pub fn new(metrics: DummyLayoutMetrics) -> Self {
        Self { metrics }
    }

    pub fn metrics(&self) -> &DummyLayoutMetrics {
        &self.metrics
    }

    fn title_line_height(&self, font_size: i32) -> f32 {
        let font_size = if font_size > 0 {
            font_size
        } else {
            self.metrics.default_title_font_size
        };
        font_size as f32 * self.metrics.title_line_height
    }

    fn layout_app_bar(&self, font_size: i32, is_title_empty: bool) -> taffy::TaffyResult<f32> {
        let metrics = &self.metrics;
        // Leaf context is the title's line height.
        let mut tree: TaffyTree<f32> = TaffyTree::new();

        let mut toolbar_children = Vec::new();
        if !is_title_empty {
            let title = tree.new_leaf_with_context(
                Style::default(),
                self.title_line_height(font_size),
            )?;
            toolbar_children.push(title);
        }

        let toolbar = tree.new_with_children(
            Style {
                flex_direction: FlexDirection::Row,
                align_items: Some(AlignItems::Center),
                min_size: Size {
                    width: Dimension::Auto,
                    height: length(metrics.toolbar_min_height),
                },
                padding: Rect {
                    top: length(metrics.toolbar_vertical_padding),
                    right: zero(),
                    bottom: length(metrics.toolbar_vertical_padding),
                    left: zero(),
                },
                ..Default::default()
            },
            &toolbar_children,
        )?;

        let app_bar = tree.new_with_children(
            Style {
                flex_direction: FlexDirection::Column,
                size: Size {
                    width: length(metrics.window_width),
                    height: Dimension::Auto,
                },
                padding: Rect {
                    top: length(metrics.status_bar_height),
                    right: zero(),
                    bottom: zero(),
                    left: zero(),
                },
                ..Default::default()
            },
            &[toolbar],
        )?;

        let available = Size {
            width: AvailableSpace::Definite(metrics.window_width),
            height: AvailableSpace::MaxContent,
        };
        tree.compute_layout_with_measure(
            app_bar,
            available,
            |known_dimensions, _available_space, _node_id, line_height: Option<&mut f32>, _style| {
                match line_height {
                    Some(&mut height) => Size {
                        width: known_dimensions.width.unwrap_or(0.0),
                        height: known_dimensions.height.unwrap_or(height),
                    },
                    None => Size::ZERO,
                }
            },
        )?;

        Ok(tree.layout(app_bar)?.size.height)
    }
}

impl HeaderHeightMeasurer for DummyLayoutMeasurer {
    fn compute_dummy_layout(
        &self,
        font_size: i32,
        is_title_empty: bool,
    ) -> Result<f32, MeasureError> {
        self.layout_app_bar(font_size, is_title_empty)
            .map_err(|err| MeasureError::CallFailed(err.to_string()))
    }
}
