//! Graph data structures and operations.
//!
//! The node/edge model shared by every visualizer, backed by petgraph's
//! StableGraph, plus the cycle detector that keeps the "edges on a cycle"
//! set current after every edge-set change.

mod cycles;
mod edge;
mod model;
mod node;

pub use cycles::{CycleDetector, CycleReport};
pub use edge::{Edge, EdgeId, GraphKind};
pub use model::GraphModel;
pub use node::{Node, NodeId, Side};
