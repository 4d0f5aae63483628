//! Layout engine - shadow tree, nodes and the mutation guard.
//!
//! - Tree: arena of nodes, parent/child links, seal phase
//! - Node: component name, style, own `LayoutBox`, kind payload
//! - Guard: scoped, phase-checked mutable access to geometry and state
//!
//! # Architecture
//!
//! Nodes are not individually allocated objects. They live in one arena and
//! are addressed by `NodeId`, whose low bits are the arena slot:
//!
//! ```text
//! Index 0: Screen        (parent=None, children=[1, 2], padding.bottom=56)
//! Index 1: HeaderConfig  (parent=0,    hidden=false, title="Home")
//! Index 2: View          (parent=0,    flex_grow=1)
//! ```

mod guard;
mod node;
mod tree;

pub use guard::MutationPermit;
pub use node::{NodeKind, ShadowNode};
pub use tree::{ShadowTree, TreePhase};
pub(crate) use tree::slot_of;
