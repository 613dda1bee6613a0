use crate::connection::{ConnectionState, End};
use crate::point::Point;
use crate::validate::ValidationError;
use thiserror::Error;

/// A broken model invariant, reported by
/// [`Network::check_invariants`](crate::Network::check_invariants).
///
/// The model never produces these through its own API; they indicate a
/// contract breach by a caller (or a bug).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvariantViolation {
    #[error("connector `{connector}` on node `{node}` does not point back to that node")]
    OrphanedConnector { node: String, connector: String },

    #[error("connector `{connector}` references a connection that does not reference it")]
    StaleAttachment { connector: String },

    #[error("{end} connector `{connector}` is not attached back to its connection")]
    EndpointNotAttached { end: End, connector: String },

    #[error("cached {end} hotspot {cached} differs from connector hotspot {live}")]
    StaleHotspot { end: End, cached: Point, live: Point },

    #[error("{end} connector `{connector}` is not on a node of this network")]
    DanglingEndpoint { end: End, connector: String },

    #[error("connection is {state:?} but should be fully attached")]
    Uncommitted { state: ConnectionState },
}

/// Failure of a [`NetworkEditor`](crate::NetworkEditor) command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    #[error("no connection drag is in progress")]
    NoActiveDrag,

    #[error("connection rejected: {0}")]
    Rejected(#[from] ValidationError),
}
