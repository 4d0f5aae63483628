//! Layout Module
//!
//! Flexbox layout computation for the shadow tree using Taffy.
//!
//! # Architecture
//!
//! The layout module uses [Taffy](https://github.com/DioxusLabs/taffy) for
//! W3C-compliant flexbox computation. The bridge:
//!
//! 1. Implements Taffy's low-level traits directly on `ShadowTree`
//! 2. Builds each node's style with padding read from its own `LayoutBox`
//! 3. Hides host-rendered nodes (header configs) from the flex pass
//! 4. Writes computed sizes back into each node's `LayoutBox`
//!
//! # Example
//!
//! ```ignore
//! use screen_layout::{LayoutConfig, ShadowNode, ShadowTree};
//! use taffy::prelude::*;
//!
//! let mut tree = ShadowTree::new(LayoutConfig::default());
//! let root = tree.create_node(ShadowNode::view(Style::default()))?;
//! tree.compute_layout(Size {
//!     width: AvailableSpace::Definite(390.0),
//!     height: AvailableSpace::Definite(844.0),
//! })?;
//! ```

mod layout_tree;

pub use layout_tree::ChildIter;
