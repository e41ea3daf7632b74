//! DragController - decides which single entity owns the current gesture.
//!
//! States:
//! - `Idle`
//! - `PanningCanvas`: pointer went down on empty canvas, moves pan the view
//! - `DraggingNode`: pointer went down on a node, moves reposition it
//! - `Connecting`: pointer went down on a node's connection handle, release
//!   over another node commits an edge
//!
//! A node-owned gesture never pans the canvas. Pointer-leave aborts the
//! gesture; an aborted connection never creates an edge.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::canvas::CanvasModel;
use crate::error::VizError;
use crate::geometry::Point;
use crate::graph::{EdgeId, NodeId};
use crate::viewport::ViewportController;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerKind {
    Down,
    Move,
    Up,
    Leave,
}

/// What the pointer is over, as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "camelCase")]
pub enum PointerTarget {
    Canvas,
    Node(NodeId),
    ConnectionHandle(NodeId),
}

impl PointerTarget {
    fn node(self) -> Option<NodeId> {
        match self {
            PointerTarget::Canvas => None,
            PointerTarget::Node(id) | PointerTarget::ConnectionHandle(id) => Some(id),
        }
    }
}

/// A normalized pointer event in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub screen: Point,
    pub target: PointerTarget,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, screen: Point, target: PointerTarget) -> Self {
        Self { kind, screen, target }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WheelEvent {
    pub screen: Point,
    pub delta_y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    PanningCanvas {
        /// Last pointer position in screen space.
        last: Point,
    },
    DraggingNode {
        id: NodeId,
        /// Node centre minus the world point that was grabbed.
        grab_offset: Point,
    },
    Connecting {
        from: NodeId,
        /// Pointer position in world space, for the preview line.
        cursor: Point,
    },
}

/// What handling an event did.
#[derive(Debug, Clone, PartialEq)]
pub enum DragOutcome {
    Ignored,
    GestureStarted,
    Panned,
    Zoomed,
    NodeMoved(NodeId),
    ConnectionStarted(NodeId),
    ConnectionPreview,
    Connected(EdgeId),
    ConnectionRejected(VizError),
    ConnectionAborted,
    GestureEnded,
}

impl DragOutcome {
    /// Whether the frame needs redrawing.
    pub fn changed(&self) -> bool {
        !matches!(self, DragOutcome::Ignored)
    }
}

#[derive(Debug, Clone, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == DragState::Idle
    }

    /// The in-progress connection: source node and cursor in world space.
    pub fn pending_connection(&self) -> Option<(NodeId, Point)> {
        match self.state {
            DragState::Connecting { from, cursor } => Some((from, cursor)),
            _ => None,
        }
    }

    /// Route one pointer event.
    pub fn pointer<M: CanvasModel + ?Sized>(
        &mut self,
        event: PointerEvent,
        viewport: &mut ViewportController,
        model: &mut M,
    ) -> DragOutcome {
        if !event.screen.is_finite() {
            return DragOutcome::Ignored;
        }
        match event.kind {
            PointerKind::Down => self.down(event, viewport, model),
            PointerKind::Move => self.moved(event, viewport, model),
            PointerKind::Up => self.up(event, model),
            PointerKind::Leave => self.abort(),
        }
    }

    /// Wheel zoom, honoured only when no gesture is active.
    pub fn wheel(&mut self, event: WheelEvent, viewport: &mut ViewportController) -> DragOutcome {
        if !self.is_idle() || !event.delta_y.is_finite() {
            return DragOutcome::Ignored;
        }
        viewport.zoom_by(event.screen, event.delta_y);
        DragOutcome::Zoomed
    }

    /// Drop the current gesture without committing anything.
    pub fn abort(&mut self) -> DragOutcome {
        let previous = std::mem::take(&mut self.state);
        match previous {
            DragState::Idle => DragOutcome::Ignored,
            DragState::Connecting { from, .. } => {
                debug!(from = from.raw(), "connection aborted");
                DragOutcome::ConnectionAborted
            }
            _ => DragOutcome::GestureEnded,
        }
    }

    // ===== Transitions =====

    fn down<M: CanvasModel + ?Sized>(
        &mut self,
        event: PointerEvent,
        viewport: &ViewportController,
        model: &M,
    ) -> DragOutcome {
        if !self.is_idle() {
            return DragOutcome::Ignored;
        }
        let world = viewport.to_world(event.screen);

        match event.target {
            PointerTarget::Canvas => {
                self.state = DragState::PanningCanvas { last: event.screen };
                DragOutcome::GestureStarted
            }
            PointerTarget::Node(id) => match model.draggable(id) {
                Some(centre) => {
                    self.state = DragState::DraggingNode {
                        id,
                        grab_offset: centre - world,
                    };
                    trace!(node = id.raw(), "node grabbed");
                    DragOutcome::GestureStarted
                }
                None => DragOutcome::Ignored,
            },
            PointerTarget::ConnectionHandle(id) => match model.connection_anchor(id) {
                Some(_) => {
                    self.state = DragState::Connecting { from: id, cursor: world };
                    debug!(from = id.raw(), "connection started");
                    DragOutcome::ConnectionStarted(id)
                }
                None => DragOutcome::Ignored,
            },
        }
    }

    fn moved<M: CanvasModel + ?Sized>(
        &mut self,
        event: PointerEvent,
        viewport: &mut ViewportController,
        model: &mut M,
    ) -> DragOutcome {
        match &mut self.state {
            DragState::Idle => DragOutcome::Ignored,
            DragState::PanningCanvas { last } => {
                let delta = event.screen - *last;
                *last = event.screen;
                viewport.pan(delta);
                DragOutcome::Panned
            }
            DragState::DraggingNode { id, grab_offset } => {
                let target = viewport.to_world(event.screen) + *grab_offset;
                if model.drag_node_to(*id, target) {
                    DragOutcome::NodeMoved(*id)
                } else {
                    DragOutcome::Ignored
                }
            }
            DragState::Connecting { cursor, .. } => {
                *cursor = viewport.to_world(event.screen);
                DragOutcome::ConnectionPreview
            }
        }
    }

    fn up<M: CanvasModel + ?Sized>(&mut self, event: PointerEvent, model: &mut M) -> DragOutcome {
        let previous = std::mem::take(&mut self.state);
        match previous {
            DragState::Idle => DragOutcome::Ignored,
            DragState::Connecting { from, .. } => match event.target.node() {
                Some(to) => match model.connect(from, to) {
                    Ok(edge) => DragOutcome::Connected(edge),
                    Err(err) => DragOutcome::ConnectionRejected(err),
                },
                None => {
                    debug!(from = from.raw(), "connection released over canvas");
                    DragOutcome::ConnectionAborted
                }
            },
            _ => DragOutcome::GestureEnded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphModel;
    use crate::layout::TreeLayoutConfig;
    use crate::structures::BinaryTree;

    fn down(x: f32, y: f32, target: PointerTarget) -> PointerEvent {
        PointerEvent::new(PointerKind::Down, Point::new(x, y), target)
    }

    fn moved(x: f32, y: f32) -> PointerEvent {
        PointerEvent::new(PointerKind::Move, Point::new(x, y), PointerTarget::Canvas)
    }

    fn up(x: f32, y: f32, target: PointerTarget) -> PointerEvent {
        PointerEvent::new(PointerKind::Up, Point::new(x, y), target)
    }

    fn setup() -> (DragController, ViewportController, GraphModel, NodeId, NodeId) {
        let mut model = GraphModel::default();
        let a = model.add_node(Point::new(100.0, 100.0), "a");
        let b = model.add_node(Point::new(300.0, 100.0), "b");
        (DragController::new(), ViewportController::new(), model, a, b)
    }

    #[test]
    fn test_canvas_drag_pans() {
        let (mut drag, mut viewport, mut model, ..) = setup();
        let outcome = drag.pointer(
            down(10.0, 10.0, PointerTarget::Canvas),
            &mut viewport,
            &mut model,
        );
        assert_eq!(outcome, DragOutcome::GestureStarted);
        assert!(matches!(drag.state(), DragState::PanningCanvas { .. }));

        assert_eq!(drag.pointer(moved(30.0, 15.0), &mut viewport, &mut model), DragOutcome::Panned);
        assert_eq!(viewport.offset(), Point::new(20.0, 5.0));

        drag.pointer(up(30.0, 15.0, PointerTarget::Canvas), &mut viewport, &mut model);
        assert!(drag.is_idle());
    }

    #[test]
    fn test_node_drag_moves_node_not_canvas() {
        let (mut drag, mut viewport, mut model, a, _) = setup();
        viewport.set_scale(2.0);

        // Node a sits at screen (200, 200); grab it 10px right of centre.
        drag.pointer(down(210.0, 200.0, PointerTarget::Node(a)), &mut viewport, &mut model);
        assert!(matches!(drag.state(), DragState::DraggingNode { id, .. } if id == a));

        let outcome = drag.pointer(moved(250.0, 260.0), &mut viewport, &mut model);
        assert_eq!(outcome, DragOutcome::NodeMoved(a));
        assert_eq!(viewport.offset(), Point::ORIGIN, "node drag must not pan");
        // Pointer world (125, 130) plus grab offset (-5, 0).
        assert_eq!(model.position(a), Some(Point::new(120.0, 130.0)));
    }

    #[test]
    fn test_connection_commits_edge_on_release_over_other_node() {
        let (mut drag, mut viewport, mut model, a, b) = setup();
        let started = drag.pointer(
            down(100.0, 100.0, PointerTarget::ConnectionHandle(a)),
            &mut viewport,
            &mut model,
        );
        assert_eq!(started, DragOutcome::ConnectionStarted(a));

        drag.pointer(moved(200.0, 120.0), &mut viewport, &mut model);
        assert_eq!(drag.pending_connection(), Some((a, Point::new(200.0, 120.0))));

        let outcome = drag.pointer(
            up(300.0, 100.0, PointerTarget::Node(b)),
            &mut viewport,
            &mut model,
        );
        assert!(matches!(outcome, DragOutcome::Connected(_)));
        assert_eq!(model.edge_count(), 1);
        assert!(drag.is_idle());
    }

    #[test]
    fn test_connection_to_self_rejected() {
        let (mut drag, mut viewport, mut model, a, _) = setup();
        drag.pointer(
            down(100.0, 100.0, PointerTarget::ConnectionHandle(a)),
            &mut viewport,
            &mut model,
        );
        let outcome = drag.pointer(
            up(100.0, 100.0, PointerTarget::Node(a)),
            &mut viewport,
            &mut model,
        );
        assert_eq!(outcome, DragOutcome::ConnectionRejected(VizError::SelfLoop { node: a }));
        assert_eq!(model.edge_count(), 0);
    }

    #[test]
    fn test_leave_aborts_connection() {
        let (mut drag, mut viewport, mut model, a, _) = setup();
        drag.pointer(
            down(100.0, 100.0, PointerTarget::ConnectionHandle(a)),
            &mut viewport,
            &mut model,
        );
        let leave = PointerEvent::new(
            PointerKind::Leave,
            Point::new(-5.0, 0.0),
            PointerTarget::Canvas,
        );
        assert_eq!(drag.pointer(leave, &mut viewport, &mut model), DragOutcome::ConnectionAborted);
        assert!(drag.is_idle());
        assert_eq!(model.edge_count(), 0);
    }

    #[test]
    fn test_release_over_canvas_commits_nothing() {
        let (mut drag, mut viewport, mut model, a, _) = setup();
        drag.pointer(
            down(100.0, 100.0, PointerTarget::ConnectionHandle(a)),
            &mut viewport,
            &mut model,
        );
        let outcome = drag.pointer(
            up(500.0, 500.0, PointerTarget::Canvas),
            &mut viewport,
            &mut model,
        );
        assert_eq!(outcome, DragOutcome::ConnectionAborted);
        assert_eq!(model.edge_count(), 0);
    }

    #[test]
    fn test_only_one_gesture_at_a_time() {
        let (mut drag, mut viewport, mut model, a, _) = setup();
        drag.pointer(down(0.0, 0.0, PointerTarget::Canvas), &mut viewport, &mut model);
        let second = drag.pointer(
            down(100.0, 100.0, PointerTarget::Node(a)),
            &mut viewport,
            &mut model,
        );
        assert_eq!(second, DragOutcome::Ignored);
        assert!(matches!(drag.state(), DragState::PanningCanvas { .. }));

        let wheel = WheelEvent {
            screen: Point::ORIGIN,
            delta_y: -500.0,
        };
        assert_eq!(drag.wheel(wheel, &mut viewport), DragOutcome::Ignored);
        assert_eq!(viewport.scale(), 1.0);
    }

    #[test]
    fn test_wheel_zooms_when_idle() {
        let (mut drag, mut viewport, ..) = setup();
        let wheel = WheelEvent {
            screen: Point::ORIGIN,
            delta_y: -500.0,
        };
        assert_eq!(drag.wheel(wheel, &mut viewport), DragOutcome::Zoomed);
        assert!((viewport.scale() - 1.5).abs() < 1e-5);
    }

    #[test]
    fn test_structural_nodes_are_not_draggable() {
        let mut tree = BinaryTree::new(TreeLayoutConfig::default());
        let root = tree.create_root(None);
        let mut viewport = ViewportController::new();
        let mut drag = DragController::new();

        let outcome = drag.pointer(
            down(0.0, 0.0, PointerTarget::Node(root)),
            &mut viewport,
            &mut tree,
        );
        assert_eq!(outcome, DragOutcome::Ignored);
        assert!(drag.is_idle());

        let outcome = drag.pointer(
            down(0.0, 0.0, PointerTarget::ConnectionHandle(root)),
            &mut viewport,
            &mut tree,
        );
        assert_eq!(outcome, DragOutcome::Ignored);
    }
}
