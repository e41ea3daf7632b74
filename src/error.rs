//! Error types for visualizer operations.
//!
//! Nothing in this crate is fatal: every variant describes a rejected user
//! action that leaves the model untouched, and is either swallowed by the
//! caller or shown to the user as a transient message.

use thiserror::Error;

use crate::graph::NodeId;

/// Result type alias for visualizer operations.
pub type VizResult<T> = Result<T, VizError>;

/// Reasons an operation was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VizError {
    /// A connection was attempted from a node to itself.
    #[error("cannot connect {node} to itself")]
    SelfLoop { node: NodeId },

    /// A node referenced by ID does not exist.
    #[error("unknown node: {node}")]
    UnknownNode { node: NodeId },

    /// The requested edge already exists.
    #[error("edge {from} -> {to} already exists")]
    DuplicateEdge { from: NodeId, to: NodeId },

    /// The user submitted an empty value.
    #[error("please enter a value")]
    EmptyInput,

    /// The user submitted something that is not an integer.
    #[error("'{input}' is not a valid number")]
    InvalidNumber { input: String },

    /// A binary tree child slot is already taken.
    #[error("{parent} already has a {side} child")]
    SlotOccupied { parent: NodeId, side: &'static str },

    /// A binary tree child would sit below the deepest allowed level.
    #[error("{parent} is at the maximum tree depth ({max_depth})")]
    DepthLimit { parent: NodeId, max_depth: u32 },

    /// A heap value cannot be represented exactly as a JavaScript number.
    #[error("{value} is outside the supported range")]
    OutOfRange { value: String },

    /// The active visualizer does not support drawing connections.
    #[error("connections are not supported by this visualizer")]
    ConnectionsUnsupported,

    /// A configuration value is out of range.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_user_facing() {
        let err = VizError::InvalidNumber { input: "abc".into() };
        assert_eq!(err.to_string(), "'abc' is not a valid number");

        let err = VizError::SelfLoop { node: NodeId(3) };
        assert_eq!(err.to_string(), "cannot connect Node(3) to itself");

        let err = VizError::SlotOccupied { parent: NodeId(0), side: "left" };
        assert_eq!(err.to_string(), "Node(0) already has a left child");
    }
}
