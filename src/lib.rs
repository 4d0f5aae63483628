//! # screen-layout
//!
//! Shadow layout tree for navigation screens whose header is drawn by the host.
//!
//! Built on [Taffy](https://github.com/DioxusLabs/taffy) for flexbox computation.
//!
//! ## Architecture
//!
//! A screen's header is not a layout child: the host renders it natively and
//! only the host knows its height. When a screen gains a header config child,
//! the tree asks the host for that height once and writes it into the
//! screen's own padding, so content is pushed clear of the header on the
//! very first layout pass, before the host has reported any real frame.
//!
//! ```text
//! append_child(screen, header) → find_header_height (host) → padding.bottom = h
//!                                                           → compute_layout
//! update_state(screen, frame)  → compensation superseded
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Geometry types (EdgeInsets, LayoutBox, Edge)
//! - [`engine`] - Shadow tree arena, nodes, mutation guard
//! - [`screen`] - Screen node, header config lookup, header compensation
//! - [`bridge`] - Host header-height measurement
//! - [`layout`] - Taffy integration for the shadow tree

pub mod bridge;
pub mod config;
pub mod engine;
pub mod error;
pub mod layout;
pub mod screen;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use bridge::{find_header_height, DummyLayoutMeasurer, DummyLayoutMetrics, HeaderHeightMeasurer};
pub use config::{DirtyFlags, LayoutConfig};
pub use engine::{MutationPermit, NodeKind, ShadowNode, ShadowTree, TreePhase};
pub use error::{MeasureError, TreeError};
pub use screen::{
    compensate_header, find_header_config_child, CompensationState, HeaderConfigProps,
    ScreenNode, ScreenState,
};

pub use taffy::NodeId;

/// Install `env_logger` as the global logger, honoring `RUST_LOG`.
///
/// Safe to call more than once; later calls are ignored.
///
/// ```
/// screen_layout::init_logging();
/// screen_layout::init_logging();
/// log::info!("[screens] logging ready");
/// ```
pub fn init_logging() {
    let _ = env_logger::try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_is_repeatable() {
        init_logging();
        init_logging();
        assert!(log::max_level() >= log::LevelFilter::Error);
    }
}
