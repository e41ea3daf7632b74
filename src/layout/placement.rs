//! Collision-aware placement of a new node next to an existing one.
//!
//! A candidate is generated at `base_spacing` from the source along the
//! requested direction. While the candidate is within `occupancy_threshold`
//! of any existing node it is pushed further out by `retry_step`, up to
//! `max_attempts` candidates. When the budget runs out the last candidate is
//! used anyway: adding a node never fails.

use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, PI};
use tracing::{debug, warn};

use crate::geometry::Point;
use crate::graph::GraphModel;

/// Spacing constants for add-in-direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlacementConfig {
    /// Distance of the first candidate from the source node.
    pub base_spacing: f32,
    /// A candidate closer than this to an existing node is occupied.
    pub occupancy_threshold: f32,
    /// Extra distance added for every retry.
    pub retry_step: f32,
    /// Total candidates tried, including the first.
    pub max_attempts: u32,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            base_spacing: 100.0,
            occupancy_threshold: 60.0,
            retry_step: 50.0,
            max_attempts: 20,
        }
    }
}

/// One of the four add-node buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Angle in radians, screen convention (+y is down).
    pub fn angle(self) -> f32 {
        match self {
            Direction::Right => 0.0,
            Direction::Down => FRAC_PI_2,
            Direction::Left => PI,
            Direction::Up => -FRAC_PI_2,
        }
    }

    /// Axis-aligned unit vector. Exact, unlike `Point::from_angle(self.angle())`.
    pub fn unit(self) -> Point {
        match self {
            Direction::Right => Point::new(1.0, 0.0),
            Direction::Down => Point::new(0.0, 1.0),
            Direction::Left => Point::new(-1.0, 0.0),
            Direction::Up => Point::new(0.0, -1.0),
        }
    }
}

/// Where to put the new node relative to its source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum PlacementRequest {
    Direction(Direction),
    /// Free-form angle in radians.
    Angle(f32),
}

impl PlacementRequest {
    fn unit(self) -> Point {
        match self {
            PlacementRequest::Direction(d) => d.unit(),
            PlacementRequest::Angle(a) if a.is_finite() => Point::from_angle(a),
            PlacementRequest::Angle(_) => Direction::Right.unit(),
        }
    }
}

impl From<Direction> for PlacementRequest {
    fn from(d: Direction) -> Self {
        PlacementRequest::Direction(d)
    }
}

/// Outcome of a placement search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub position: Point,
    /// Candidates examined (1 when the first one was free).
    pub attempts: u32,
    /// True when every candidate was occupied and the last one was used.
    pub exhausted: bool,
}

/// Chooses positions for nodes added next to an existing node.
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    config: PlacementConfig,
}

impl LayoutEngine {
    pub fn new(config: PlacementConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlacementConfig {
        &self.config
    }

    /// Find a free spot near `source` in `model`.
    pub fn place(&self, model: &GraphModel, source: Point, request: PlacementRequest) -> Placement {
        self.search(source, request, |p| model.is_occupied(p, self.config.occupancy_threshold))
    }

    /// Core search with a caller-supplied occupancy test.
    pub fn search(
        &self,
        source: Point,
        request: PlacementRequest,
        is_occupied: impl Fn(Point) -> bool,
    ) -> Placement {
        let unit = request.unit();
        let max_attempts = self.config.max_attempts.max(1);

        let mut candidate = source;
        for attempt in 0..max_attempts {
            let distance = self.config.base_spacing + attempt as f32 * self.config.retry_step;
            candidate = source + unit * distance;
            if !is_occupied(candidate) {
                debug!(attempts = attempt + 1, x = candidate.x, y = candidate.y, "placement found");
                return Placement {
                    position: candidate,
                    attempts: attempt + 1,
                    exhausted: false,
                };
            }
        }

        warn!(attempts = max_attempts, "placement budget exhausted, using last candidate");
        Placement {
            position: candidate,
            attempts: max_attempts,
            exhausted: true,
        }
    }
}
