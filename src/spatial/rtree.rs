//! R-tree based spatial index using the rstar crate.
//!
//! Provides O(log n) queries for:
//! - Pointer hit testing (nearest node within a radius)
//! - Placement occupancy (is anything within the proximity threshold?)

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use crate::geometry::Point;
use crate::graph::NodeId;

/// A node centre stored in the index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodePoint {
    pub id: NodeId,
    pub position: Point,
}

impl RTreeObject for NodePoint {
    type Envelope = AABB<[f32; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.position.x, self.position.y])
    }
}

impl PointDistance for NodePoint {
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        self.position.distance_squared(Point::new(point[0], point[1]))
    }
}

/// Spatial index over node centres in world space.
#[derive(Default)]
pub struct SpatialIndex {
    tree: RTree<NodePoint>,
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self { tree: RTree::new() }
    }

    pub fn insert(&mut self, id: NodeId, position: Point) {
        self.tree.insert(NodePoint { id, position });
    }

    /// Remove a node previously inserted at exactly `position`.
    ///
    /// Returns true if the node was found and removed.
    pub fn remove(&mut self, id: NodeId, position: Point) -> bool {
        self.tree.remove(&NodePoint { id, position }).is_some()
    }

    /// Move a node from `old` to `new`.
    pub fn relocate(&mut self, id: NodeId, old: Point, new: Point) {
        self.remove(id, old);
        self.insert(id, new);
    }

    /// Nearest node within `max_distance` of `point`.
    pub fn nearest_within(&self, point: Point, max_distance: f32) -> Option<NodeId> {
        let max_distance_sq = max_distance * max_distance;
        self.tree
            .nearest_neighbor(&[point.x, point.y])
            .filter(|p| p.distance_2(&[point.x, point.y]) <= max_distance_sq)
            .map(|p| p.id)
    }

    /// Whether any node sits within `radius` of `point`.
    pub fn is_occupied(&self, point: Point, radius: f32) -> bool {
        self.tree
            .locate_within_distance([point.x, point.y], radius * radius)
            .next()
            .is_some()
    }

    pub fn clear(&mut self) {
        self.tree = RTree::new();
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}
