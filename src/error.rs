//! Error types.
//!
//! `MeasureError` covers everything that can go wrong while asking the host
//! for a header height. None of it escapes the bridge: each variant is logged
//! and turned into "unavailable". `TreeError` is returned by structural tree
//! operations that a caller can get wrong.

use taffy::NodeId;
use thiserror::Error;

/// Why a header height measurement was unavailable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeasureError {
    /// The host environment handle could not be obtained.
    #[error("failed to retrieve host environment")]
    EnvironmentUnavailable,

    /// The measurement service type is not registered with the host.
    #[error("failed to find measurement service `{0}`")]
    ServiceNotFound(String),

    /// The service exists but does not expose the measurement entry point.
    #[error("failed to resolve entry point `{0}`")]
    EntryPointNotFound(String),

    /// The service singleton could not be obtained or is absent.
    #[error("failed to retrieve measurement service instance, or the instance was absent")]
    InstanceUnavailable,

    /// The measurement call itself failed.
    #[error("measurement call failed: {0}")]
    CallFailed(String),

    /// The call returned a height that cannot be used as padding.
    #[error("measurement returned an invalid header height: {0}")]
    InvalidHeight(f32),
}

/// Misuse of the shadow tree's structural API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("unknown node {0:?}")]
    UnknownNode(NodeId),

    #[error("node {0:?} has been discarded")]
    Discarded(NodeId),

    #[error("node {child:?} already has parent {parent:?}")]
    AlreadyAttached { child: NodeId, parent: NodeId },

    #[error("node {child:?} is not a child of {parent:?}")]
    NotAChild { child: NodeId, parent: NodeId },

    #[error("attaching {child:?} to {parent:?} would create a cycle")]
    Cycle { child: NodeId, parent: NodeId },

    #[error("node {0:?} is not a screen")]
    NotAScreen(NodeId),

    #[error("tree has been committed and can no longer change")]
    Committed,
}
