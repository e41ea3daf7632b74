//! Visualizer configuration.
//!
//! Every field has a default, so hosts pass only what they want to change:
//!
//! ```json
//! { "heapMode": "min", "viewport": { "maxScale": 2.0 } }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{VizError, VizResult};
use crate::geometry::Point;
use crate::heap::{HeapMode, MAX_SAFE_VALUE, PlaybackConfig};
use crate::layout::tree::MAX_TREE_DEPTH;
use crate::layout::{PlacementConfig, TreeLayoutConfig};
use crate::structures::ListConfig;
use crate::viewport::ViewportConfig;

/// First node created when a graph visualizer starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SeedNode {
    pub label: String,
    pub position: Point,
}

impl Default for SeedNode {
    fn default() -> Self {
        Self {
            label: "1".to_string(),
            position: Point::ORIGIN,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VizConfig {
    pub viewport: ViewportConfig,
    pub placement: PlacementConfig,
    pub tree: TreeLayoutConfig,
    pub playback: PlaybackConfig,
    pub list: ListConfig,
    pub heap_mode: HeapMode,
    /// Value the heap starts with.
    pub heap_seed: Option<i64>,
    /// Node the graph starts with.
    pub seed: Option<SeedNode>,
}

impl VizConfig {
    /// Reject values that would make the transform or layout degenerate.
    pub fn validate(&self) -> VizResult<()> {
        let v = &self.viewport;
        ensure(positive(v.min_scale), "viewport.minScale must be positive")?;
        ensure(
            v.max_scale.is_finite() && v.max_scale >= v.min_scale,
            "viewport.maxScale must be >= minScale",
        )?;
        ensure(v.wheel_sensitivity.is_finite(), "viewport.wheelSensitivity must be finite")?;
        ensure(positive(v.button_step), "viewport.buttonStep must be positive")?;

        let p = &self.placement;
        ensure(positive(p.base_spacing), "placement.baseSpacing must be positive")?;
        ensure(
            p.occupancy_threshold.is_finite() && p.occupancy_threshold >= 0.0,
            "placement.occupancyThreshold must not be negative",
        )?;
        ensure(positive(p.retry_step), "placement.retryStep must be positive")?;
        ensure(p.max_attempts > 0, "placement.maxAttempts must be at least 1")?;

        let t = &self.tree;
        ensure(positive(t.base_spacing), "tree.baseSpacing must be positive")?;
        ensure(positive(t.min_spacing), "tree.minSpacing must be positive")?;
        ensure(positive(t.level_height), "tree.levelHeight must be positive")?;
        ensure(t.origin.is_finite(), "tree.origin must be finite")?;
        ensure(
            (1..=MAX_TREE_DEPTH).contains(&t.max_depth),
            "tree.maxDepth must be between 1 and 62",
        )?;

        ensure(positive(self.list.spacing), "list.spacing must be positive")?;
        ensure(self.list.origin.is_finite(), "list.origin must be finite")?;

        if let Some(value) = self.heap_seed {
            ensure(
                (-MAX_SAFE_VALUE..=MAX_SAFE_VALUE).contains(&value),
                "heapSeed must be within +/-(2^53 - 1)",
            )?;
        }

        if let Some(seed) = &self.seed {
            ensure(seed.position.is_finite(), "seed.position must be finite")?;
        }
        Ok(())
    }
}

fn positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

fn ensure(condition: bool, message: &str) -> VizResult<()> {
    if condition {
        Ok(())
    } else {
        Err(VizError::InvalidConfig {
            message: message.to_string(),
        })
    }
}
