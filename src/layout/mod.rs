//! Layout algorithms for node placement.
//!
//! - `placement`: free-form graphs. New nodes go next to a source node along
//!   a direction or angle, pushed outward until they clear existing nodes.
//! - `tree`: binary trees and heaps. Positions come from (level, sibling)
//!   and never overlap by construction.

pub mod placement;
pub mod tree;

pub use placement::{Direction, LayoutEngine, Placement, PlacementConfig, PlacementRequest};
pub use tree::TreeLayoutConfig;
