//! ViewportController - pan/zoom state and the screen <-> world transform.
//!
//! `world_to_screen(p) = offset + scale * p` and its exact inverse
//! `screen_to_world(p) = (p - offset) / scale`. The scale is always clamped
//! to the configured bounds, so inputs are never rejected.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::geometry::{Bounds, Point};

/// Configuration for pan/zoom behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewportConfig {
    /// Smallest allowed scale.
    pub min_scale: f32,
    /// Largest allowed scale.
    pub max_scale: f32,
    /// Scale change per unit of wheel delta. Negative so that scrolling up zooms in.
    pub wheel_sensitivity: f32,
    /// Scale change for a single zoom-in / zoom-out button press.
    pub button_step: f32,
    /// Keep the world point under the pointer fixed while wheel-zooming.
    pub anchor_zoom_at_pointer: bool,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            min_scale: 0.1,
            max_scale: 4.0,
            wheel_sensitivity: -0.001,
            button_step: 0.1,
            anchor_zoom_at_pointer: false,
        }
    }
}

impl ViewportConfig {
    /// Usable `(min, max)` scale bounds. A non-positive or non-finite minimum
    /// falls back to the default, and the maximum never drops below the minimum.
    pub fn scale_bounds(&self) -> (f32, f32) {
        let defaults = Self::default();
        let min = if self.min_scale.is_finite() && self.min_scale > 0.0 {
            self.min_scale
        } else {
            defaults.min_scale
        };
        let max = if self.max_scale.is_finite() {
            self.max_scale
        } else {
            defaults.max_scale
        };
        (min, max.max(min))
    }
}

/// Pan/zoom state for one visualizer instance.
#[derive(Debug, Clone)]
pub struct ViewportController {
    scale: f32,
    offset: Point,
    config: ViewportConfig,
    /// Bumped on every mutation; a frame rendered at an older revision is stale.
    revision: u64,
}

impl ViewportController {
    /// Identity transform with default bounds.
    pub fn new() -> Self {
        Self::with_config(ViewportConfig::default())
    }

    pub fn with_config(config: ViewportConfig) -> Self {
        let mut viewport = Self {
            scale: 1.0,
            offset: Point::ORIGIN,
            config,
            revision: 0,
        };
        viewport.scale = viewport.clamp_scale(1.0);
        viewport
    }

    #[inline]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    #[inline]
    pub fn offset(&self) -> Point {
        self.offset
    }

    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    // =========================================================================
    // Transform
    // =========================================================================

    /// Convert a screen-space point to world space.
    #[inline]
    pub fn to_world(&self, screen: Point) -> Point {
        (screen - self.offset) / self.scale
    }

    /// Convert a world-space point to screen space.
    #[inline]
    pub fn to_screen(&self, world: Point) -> Point {
        self.offset + world * self.scale
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Translate the view by a screen-space delta.
    pub fn pan(&mut self, delta: Point) {
        if !delta.is_finite() {
            return;
        }
        self.offset += delta;
        self.touch();
    }

    /// Apply a wheel delta at the given screen position.
    ///
    /// `scale = clamp(scale + wheel_delta * sensitivity)`. With
    /// `anchor_zoom_at_pointer` the offset is also adjusted so the world point
    /// under `anchor` stays put.
    pub fn zoom_by(&mut self, anchor: Point, wheel_delta: f32) {
        if !wheel_delta.is_finite() {
            return;
        }
        let target = self.scale + wheel_delta * self.config.wheel_sensitivity;
        if !target.is_finite() {
            return;
        }
        if self.config.anchor_zoom_at_pointer && anchor.is_finite() {
            self.set_scale_around(anchor, target);
        } else {
            self.set_scale(target);
        }
    }

    /// One button-press step towards the maximum scale.
    pub fn zoom_in(&mut self) {
        self.set_scale(self.scale + self.config.button_step);
    }

    /// One button-press step towards the minimum scale.
    pub fn zoom_out(&mut self) {
        self.set_scale(self.scale - self.config.button_step);
    }

    /// Set the scale directly (clamped), keeping the offset.
    pub fn set_scale(&mut self, scale: f32) {
        if !scale.is_finite() {
            return;
        }
        self.scale = self.clamp_scale(scale);
        self.touch();
    }

    fn set_scale_around(&mut self, anchor: Point, scale: f32) {
        let world = self.to_world(anchor);
        self.scale = self.clamp_scale(scale);
        self.offset = anchor - world * self.scale;
        self.touch();
    }

    /// Back to the identity transform.
    pub fn reset(&mut self) {
        self.scale = self.clamp_scale(1.0);
        self.offset = Point::ORIGIN;
        self.touch();
    }

    /// Centre `bounds` in a viewport of the given screen size, zooming out if
    /// needed so it fits (never zooming in past 1.0).
    pub fn fit_to_bounds(
        &mut self,
        bounds: Bounds,
        screen_width: f32,
        screen_height: f32,
        padding: f32,
    ) {
        let avail_w = (screen_width - 2.0 * padding).max(1.0);
        let avail_h = (screen_height - 2.0 * padding).max(1.0);
        let fit = (avail_w / bounds.width().max(1.0)).min(avail_h / bounds.height().max(1.0));
        self.scale = self.clamp_scale(fit.min(1.0));
        let screen_center = Point::new(screen_width / 2.0, screen_height / 2.0);
        self.offset = screen_center - bounds.center() * self.scale;
        self.touch();
    }

    #[inline]
    fn clamp_scale(&self, scale: f32) -> f32 {
        let (min, max) = self.config.scale_bounds();
        scale.clamp(min, max)
    }

    #[inline]
    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
        trace!(scale = self.scale, x = self.offset.x, y = self.offset.y, "viewport changed");
    }
}

impl Default for ViewportController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn assert_close(a: Point, b: Point) {
        let tol_x = 1e-3 * b.x.abs().max(1.0);
        let tol_y = 1e-3 * b.y.abs().max(1.0);
        assert!(
            (a.x - b.x).abs() < tol_x && (a.y - b.y).abs() < tol_y,
            "expected {b:?}, got {a:?}"
        );
    }

    #[test]
    fn test_identity_by_default() {
        let vp = ViewportController::new();
        assert_eq!(vp.scale(), 1.0);
        assert_eq!(vp.to_screen(Point::new(3.0, 4.0)), Point::new(3.0, 4.0));
    }

    #[test]
    fn test_transform_is_invertible() {
        let world_points = [
            Point::new(0.0, 0.0),
            Point::new(123.5, -77.25),
            Point::new(-1000.0, 2500.0),
        ];
        let offsets = [Point::new(0.0, 0.0), Point::new(-320.0, 45.5), Point::new(800.0, 600.0)];
        for &scale in &[0.1_f32, 0.37, 1.0, 2.5, 4.0] {
            for &offset in &offsets {
                let mut vp = ViewportController::new();
                vp.set_scale(scale);
                vp.pan(offset);
                for &p in &world_points {
                    assert_close(vp.to_world(vp.to_screen(p)), p);
                }
            }
        }
    }

    #[test]
    fn test_pan_adds_to_offset() {
        let mut vp = ViewportController::new();
        vp.pan(Point::new(10.0, -5.0));
        vp.pan(Point::new(2.0, 2.0));
        assert_eq!(vp.offset(), Point::new(12.0, -3.0));
    }

    #[test]
    fn test_wheel_zoom_direction_and_clamp() {
        let mut vp = ViewportController::new();
        // Scrolling up (negative deltaY) zooms in.
        vp.zoom_by(Point::ORIGIN, -100.0);
        assert!((vp.scale() - 1.1).abs() < 1e-6);

        vp.zoom_by(Point::ORIGIN, -1_000_000.0);
        assert_eq!(vp.scale(), 4.0);

        vp.zoom_by(Point::ORIGIN, 1_000_000.0);
        assert_eq!(vp.scale(), 0.1);
    }

    #[test]
    fn test_button_zoom_respects_bounds() {
        let mut vp = ViewportController::new();
        for _ in 0..100 {
            vp.zoom_out();
        }
        assert!((vp.scale() - 0.1).abs() < 1e-6);
        for _ in 0..100 {
            vp.zoom_in();
        }
        assert!((vp.scale() - 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_anchored_zoom_keeps_point_under_cursor() {
        let mut vp = ViewportController::with_config(ViewportConfig {
            anchor_zoom_at_pointer: true,
            ..Default::default()
        });
        vp.pan(Point::new(40.0, 30.0));
        let anchor = Point::new(200.0, 150.0);
        let before = vp.to_world(anchor);
        vp.zoom_by(anchor, -500.0);
        assert!(vp.scale() > 1.0);
        assert_close(vp.to_world(anchor), before);
    }

    #[test]
    fn test_non_finite_input_ignored() {
        let mut vp = ViewportController::new();
        vp.pan(Point::new(f32::NAN, 0.0));
        vp.zoom_by(Point::ORIGIN, f32::INFINITY);
        assert_eq!(vp.offset(), Point::ORIGIN);
        assert_eq!(vp.scale(), 1.0);
        assert_eq!(vp.revision(), 0);
    }

    #[test]
    fn test_inverted_bounds_do_not_panic() {
        let mut vp = ViewportController::with_config(ViewportConfig {
            min_scale: 3.0,
            max_scale: 2.0,
            ..Default::default()
        });
        assert_eq!(vp.scale(), 3.0);
        vp.zoom_out();
        vp.zoom_by(Point::ORIGIN, -500.0);
        assert_eq!(vp.scale(), 3.0);
    }

    #[test]
    fn test_non_finite_bounds_fall_back() {
        let config = ViewportConfig {
            min_scale: f32::NAN,
            max_scale: f32::INFINITY,
            wheel_sensitivity: f32::NAN,
            ..Default::default()
        };
        assert_eq!(config.scale_bounds(), (0.1, 4.0));

        let mut vp = ViewportController::with_config(config);
        vp.zoom_by(Point::ORIGIN, -100.0);
        assert_eq!(vp.scale(), 1.0);
        vp.set_scale(100.0);
        assert_eq!(vp.scale(), 4.0);
    }

    #[test]
    fn test_every_mutation_bumps_revision() {
        let mut vp = ViewportController::new();
        vp.pan(Point::new(1.0, 1.0));
        vp.zoom_in();
        vp.reset();
        assert_eq!(vp.revision(), 3);
    }

    #[test]
    fn test_fit_to_bounds_centres() {
        let mut vp = ViewportController::new();
        let bounds = Bounds {
            min: Point::new(-100.0, -50.0),
            max: Point::new(100.0, 50.0),
        };
        vp.fit_to_bounds(bounds, 800.0, 600.0, 20.0);
        assert_eq!(vp.scale(), 1.0);
        assert_close(vp.to_screen(Point::ORIGIN), Point::new(400.0, 300.0));

        let wide = Bounds {
            min: Point::new(0.0, 0.0),
            max: Point::new(4000.0, 100.0),
        };
        vp.fit_to_bounds(wide, 800.0, 600.0, 0.0);
        assert!((vp.scale() - 0.2).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn test_round_trip_holds_for_any_view(
            scale in 0.1f32..4.0,
            ox in -2000.0f32..2000.0,
            oy in -2000.0f32..2000.0,
            px in -5000.0f32..5000.0,
            py in -5000.0f32..5000.0,
        ) {
            let mut vp = ViewportController::new();
            vp.set_scale(scale);
            vp.pan(Point::new(ox, oy));
            let p = Point::new(px, py);
            let back = vp.to_world(vp.to_screen(p));
            // f32 error grows with the screen-space magnitude divided by scale.
            let tol = 1e-4 * (1.0 + p.x.abs().max(p.y.abs()) + ox.abs().max(oy.abs()) / scale);
            prop_assert!((back.x - p.x).abs() <= tol, "x: {} vs {}", back.x, p.x);
            prop_assert!((back.y - p.y).abs() <= tol, "y: {} vs {}", back.y, p.y);
        }
    }
}
