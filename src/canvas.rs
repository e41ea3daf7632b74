//! The seam between pointer handling and the individual visualizers.
//!
//! Each visualizer exposes its content as a world-space `Scene` and says
//! which gestures it accepts. The drag controller and the frame builder only
//! talk to this trait.

use crate::error::{VizError, VizResult};
use crate::geometry::Point;
use crate::graph::{EdgeId, GraphModel, NodeId};

/// A node as the renderer needs it, in world space.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub id: NodeId,
    pub label: String,
    pub position: Point,
    pub highlighted: bool,
}

/// An edge as a straight segment between two node centres, in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneEdge {
    pub id: EdgeId,
    pub from: Point,
    pub to: Point,
    pub on_cycle: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub nodes: Vec<SceneNode>,
    pub edges: Vec<SceneEdge>,
}

/// Content that can be drawn and manipulated on the canvas.
pub trait CanvasModel {
    /// Everything currently drawable.
    fn scene(&self) -> Scene;

    /// Centre of a node that can be dragged by the user.
    fn draggable(&self, _id: NodeId) -> Option<Point> {
        None
    }

    /// Move a draggable node. Returns false when the node cannot move.
    fn drag_node_to(&mut self, _id: NodeId, _position: Point) -> bool {
        false
    }

    fn accepts_connections(&self) -> bool {
        false
    }

    /// Centre of a node a connection may start from.
    fn connection_anchor(&self, id: NodeId) -> Option<Point> {
        if self.accepts_connections() { self.draggable(id) } else { None }
    }

    /// Commit a connection gesture.
    fn connect(&mut self, _from: NodeId, _to: NodeId) -> VizResult<EdgeId> {
        Err(VizError::ConnectionsUnsupported)
    }

    /// Nearest node within `radius` of a world point.
    fn node_at(&self, point: Point, radius: f32) -> Option<NodeId> {
        let r2 = radius * radius;
        self.scene()
            .nodes
            .into_iter()
            .map(|n| (n.position.distance_squared(point), n.id))
            .filter(|&(d2, _)| d2 <= r2)
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, id)| id)
    }
}

impl CanvasModel for GraphModel {
    fn scene(&self) -> Scene {
        let nodes = self
            .nodes()
            .map(|n| SceneNode {
                id: n.id,
                label: n.label.clone(),
                position: n.position,
                highlighted: false,
            })
            .collect();

        let edges = self
            .edges()
            .into_iter()
            .filter_map(|e| {
                Some(SceneEdge {
                    id: e.id,
                    from: self.position(e.from)?,
                    to: self.position(e.to)?,
                    on_cycle: self.is_on_cycle(e.id),
                })
            })
            .collect();

        Scene { nodes, edges }
    }

    fn draggable(&self, id: NodeId) -> Option<Point> {
        self.position(id)
    }

    fn drag_node_to(&mut self, id: NodeId, position: Point) -> bool {
        self.set_position(id, position)
    }

    fn accepts_connections(&self) -> bool {
        true
    }

    fn connect(&mut self, from: NodeId, to: NodeId) -> VizResult<EdgeId> {
        self.add_edge(from, to)
    }

    fn node_at(&self, point: Point, radius: f32) -> Option<NodeId> {
        GraphModel::node_at(self, point, radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Vec<Point>);

    impl CanvasModel for Fixed {
        fn scene(&self) -> Scene {
            Scene {
                nodes: self
                    .0
                    .iter()
                    .enumerate()
                    .map(|(i, &position)| SceneNode {
                        id: NodeId(i as u32),
                        label: i.to_string(),
                        position,
                        highlighted: false,
                    })
                    .collect(),
                edges: Vec::new(),
            }
        }
    }

    #[test]
    fn test_defaults_refuse_gestures() {
        let mut fixed = Fixed(vec![Point::ORIGIN, Point::new(10.0, 0.0)]);
        assert_eq!(fixed.draggable(NodeId(0)), None);
        assert!(!fixed.drag_node_to(NodeId(0), Point::new(5.0, 5.0)));
        assert_eq!(fixed.connection_anchor(NodeId(0)), None);
        assert_eq!(fixed.connect(NodeId(0), NodeId(1)), Err(VizError::ConnectionsUnsupported));
    }

    #[test]
    fn test_default_hit_test_picks_nearest() {
        let fixed = Fixed(vec![Point::ORIGIN, Point::new(10.0, 0.0)]);
        assert_eq!(fixed.node_at(Point::new(7.0, 0.0), 5.0), Some(NodeId(1)));
        assert_eq!(fixed.node_at(Point::new(50.0, 0.0), 5.0), None);
    }

    #[test]
    fn test_graph_scene_carries_cycle_flags() {
        let mut model = GraphModel::default();
        let a = model.add_node(Point::ORIGIN, "a");
        let b = model.add_node(Point::new(100.0, 0.0), "b");
        let c = model.add_node(Point::new(0.0, 100.0), "c");
        model.add_edge(a, b).unwrap();
        model.add_edge(b, a).unwrap();
        model.add_edge(a, c).unwrap();

        let scene = model.scene();
        assert_eq!(scene.nodes.len(), 3);
        let flags: Vec<bool> = scene.edges.iter().map(|e| e.on_cycle).collect();
        assert_eq!(flags, vec![true, true, false]);
        assert_eq!(scene.edges[0].to, Point::new(100.0, 0.0));
    }
}
