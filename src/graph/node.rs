//! Node type and related structures.
//!
//! Every visualizer draws nodes. Each node has:
//! - A stable unique identifier (valid for the node's whole lifetime)
//! - A display label
//! - A mutable position in world space
//! - Optional depth and child links, used only by tree-shaped structures

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::geometry::Point;

/// Stable node identifier.
///
/// This ID remains valid even after other nodes are removed from the graph.
/// It wraps a u32 for efficient storage and WebAssembly interop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Get the raw u32 value.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({})", self.0)
    }
}

impl From<u32> for NodeId {
    #[inline]
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<NodeId> for u32 {
    #[inline]
    fn from(id: NodeId) -> Self {
        id.0
    }
}

/// Which child slot of a binary tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

/// A drawable node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: NodeId,
    pub label: String,
    /// Centre of the node in world space.
    pub position: Point,
    /// Depth below the root, for trees and heaps.
    pub level: Option<u32>,
    pub parent: Option<NodeId>,
    pub left_child: Option<NodeId>,
    pub right_child: Option<NodeId>,
}

impl Node {
    /// A free-standing node with no tree links.
    pub fn new(id: NodeId, label: impl Into<String>, position: Point) -> Self {
        Self {
            id,
            label: label.into(),
            position,
            level: None,
            parent: None,
            left_child: None,
            right_child: None,
        }
    }

    /// The child stored in `side`, if any.
    pub fn child(&self, side: Side) -> Option<NodeId> {
        match side {
            Side::Left => self.left_child,
            Side::Right => self.right_child,
        }
    }

    pub(crate) fn set_child(&mut self, side: Side, child: Option<NodeId>) {
        match side {
            Side::Left => self.left_child = child,
            Side::Right => self.right_child = child,
        }
    }
}
