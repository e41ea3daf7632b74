//! One visualizer instance: its model, viewport, and gesture state.
//!
//! All three are created together and discarded together. Every mutation
//! happens synchronously inside one call; there is nothing to lock.

use tracing::debug;

use crate::canvas::CanvasModel;
use crate::drag::{DragController, DragOutcome, PointerEvent, WheelEvent};
use crate::error::{VizError, VizResult};
use crate::frame::Frame;
use crate::geometry::{Bounds, Point};
use crate::graph::{GraphModel, NodeId};
use crate::layout::{Direction, LayoutEngine, PlacementRequest};
use crate::viewport::{ViewportConfig, ViewportController};

/// Pointer hit radius in screen pixels.
pub const HIT_RADIUS_PX: f32 = 25.0;

pub struct Session<M> {
    model: M,
    viewport: ViewportController,
    drag: DragController,
}

impl<M: CanvasModel> Session<M> {
    pub fn new(model: M, viewport: ViewportConfig) -> Self {
        Self {
            model,
            viewport: ViewportController::with_config(viewport),
            drag: DragController::new(),
        }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Direct model access. Any gesture in progress is aborted first, so
    /// a half-finished connection never outlives an edit.
    pub fn model_mut(&mut self) -> &mut M {
        self.drag.abort();
        &mut self.model
    }

    pub fn viewport(&self) -> &ViewportController {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut ViewportController {
        &mut self.viewport
    }

    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    // ===== Input =====

    pub fn pointer(&mut self, event: PointerEvent) -> DragOutcome {
        self.drag.pointer(event, &mut self.viewport, &mut self.model)
    }

    pub fn wheel(&mut self, event: WheelEvent) -> DragOutcome {
        self.drag.wheel(event, &mut self.viewport)
    }

    /// Node under a screen point, using a fixed on-screen hit radius.
    pub fn node_at_screen(&self, screen: Point) -> Option<NodeId> {
        let world = self.viewport.to_world(screen);
        self.model.node_at(world, HIT_RADIUS_PX / self.viewport.scale())
    }

    // ===== Output =====

    pub fn frame(&self) -> Frame {
        Frame::build(&self.model, &self.viewport, &self.drag)
    }

    /// Bounding box of everything drawn, in world space.
    pub fn content_bounds(&self) -> Option<Bounds> {
        Bounds::enclosing(self.model.scene().nodes.into_iter().map(|n| n.position))
    }

    /// Centre the content in a screen of the given size. No-op when empty.
    pub fn fit_to_content(&mut self, width: f32, height: f32, padding: f32) -> bool {
        match self.content_bounds() {
            Some(bounds) => {
                self.viewport.fit_to_bounds(bounds, width, height, padding);
                true
            }
            None => false,
        }
    }
}

impl Session<GraphModel> {
    /// Add a node next to `source`, searching outward for a free spot.
    pub fn add_node_toward(
        &mut self,
        placement: &LayoutEngine,
        source: NodeId,
        request: PlacementRequest,
        label: impl Into<String>,
    ) -> VizResult<NodeId> {
        let origin = self
            .model
            .position(source)
            .ok_or(VizError::UnknownNode { node: source })?;
        let placed = placement.place(&self.model, origin, request);
        let id = self.model_mut().add_node(placed.position, label);
        debug!(source = source.raw(), node = id.raw(), attempts = placed.attempts, "node placed");
        Ok(id)
    }

    /// Add a node at a screen point (double-click on empty canvas).
    pub fn add_node_at_screen(
        &mut self,
        screen: Point,
        label: impl Into<String>,
    ) -> Option<NodeId> {
        if !screen.is_finite() {
            return None;
        }
        let world = self.viewport.to_world(screen);
        Some(self.model_mut().add_node(world, label))
    }

    /// Add the first node at `seed`, stepping aside if something is already there.
    pub fn create_root(
        &mut self,
        placement: &LayoutEngine,
        seed: Point,
        label: impl Into<String>,
    ) -> NodeId {
        let threshold = placement.config().occupancy_threshold;
        let position = if self.model.is_occupied(seed, threshold) {
            placement
                .place(&self.model, seed, PlacementRequest::Direction(Direction::Right))
                .position
        } else {
            seed
        };
        self.model_mut().add_node(position, label)
    }
}
