//! Structural layout for binary trees and heaps.
//!
//! Positions depend only on (level, sibling index), never on the positions
//! of other nodes, so no proximity search is needed. Every level is split
//! into `2^level` slots; the slot width shrinks with depth
//! (`spacing(level) = max(base / (level + 1), min)`) and the row is centred
//! under the origin.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Deepest level a slot can address: sibling indices must fit in a `u64`.
pub const MAX_TREE_DEPTH: u32 = 62;

/// Spacing constants for tree and heap layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TreeLayoutConfig {
    /// Horizontal spacing at the root level.
    pub base_spacing: f32,
    /// Floor for horizontal spacing at deep levels.
    pub min_spacing: f32,
    /// Vertical distance between levels.
    pub level_height: f32,
    /// World position of the root.
    pub origin: Point,
    /// Deepest level a binary tree may grow to (root is level 0).
    pub max_depth: u32,
}

impl Default for TreeLayoutConfig {
    fn default() -> Self {
        Self {
            base_spacing: 200.0,
            min_spacing: 80.0,
            level_height: 120.0,
            origin: Point::ORIGIN,
            max_depth: 16,
        }
    }
}

impl TreeLayoutConfig {
    /// Horizontal child offset at a level.
    pub fn spacing(&self, level: u32) -> f32 {
        (self.base_spacing / (level as f32 + 1.0)).max(self.min_spacing)
    }

    /// Width of one slot at a level: a node's two children sit
    /// `spacing(level)` either side of the slot centre.
    fn slot_width(&self, level: u32) -> f32 {
        2.0 * self.spacing(level)
    }

    /// World position of the `sibling`-th slot (0-based, left to right) at `level`.
    pub fn position(&self, level: u32, sibling: u64) -> Point {
        let slots = 2f64.powi(level.min(i32::MAX as u32) as i32);
        let centre = (slots - 1.0) / 2.0;
        let x = (sibling as f64 - centre) * f64::from(self.slot_width(level));
        let y = level as f32 * self.level_height;
        self.origin + Point::new(x as f32, y)
    }

    /// World position of the node at array index `index` of an implicit
    /// complete binary tree (heap layout).
    pub fn heap_index_position(&self, index: usize) -> Point {
        let (level, sibling) = heap_slot(index);
        self.position(level, sibling)
    }
}

/// (level, sibling) of a heap array index: level = floor(log2(i + 1)).
pub fn heap_slot(index: usize) -> (u32, u64) {
    let one_based = index as u64 + 1;
    let level = 63 - one_based.leading_zeros();
    let sibling = one_based - (1u64 << level);
    (level, sibling)
}

/// Slot of a child given its parent's slot, or `None` past `MAX_TREE_DEPTH`.
pub fn child_slot(parent_level: u32, parent_sibling: u64, right: bool) -> Option<(u32, u64)> {
    let level = parent_level.checked_add(1).filter(|&l| l <= MAX_TREE_DEPTH)?;
    let sibling = parent_sibling.checked_mul(2)?.checked_add(u64::from(right))?;
    Some((level, sibling))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heap_slot() {
        assert_eq!(heap_slot(0), (0, 0));
        assert_eq!(heap_slot(1), (1, 0));
        assert_eq!(heap_slot(2), (1, 1));
        assert_eq!(heap_slot(3), (2, 0));
        assert_eq!(heap_slot(6), (2, 3));
        assert_eq!(heap_slot(7), (3, 0));
    }

    #[test]
    fn test_spacing_shrinks_then_floors() {
        let config = TreeLayoutConfig::default();
        assert_eq!(config.spacing(0), 200.0);
        assert_eq!(config.spacing(1), 100.0);
        assert_eq!(config.spacing(3), 80.0);
        assert_eq!(config.spacing(10), 80.0);
    }

    #[test]
    fn test_root_and_children() {
        let config = TreeLayoutConfig::default();
        assert_eq!(config.heap_index_position(0), Point::new(0.0, 0.0));
        // Level 1 slot width is 200, centred: -100 and +100.
        assert_eq!(config.heap_index_position(1), Point::new(-100.0, 120.0));
        assert_eq!(config.heap_index_position(2), Point::new(100.0, 120.0));
    }

    #[test]
    fn test_child_slot_matches_heap_indices() {
        for parent in 0..31usize {
            let (level, sibling) = heap_slot(parent);
            assert_eq!(child_slot(level, sibling, false), Some(heap_slot(2 * parent + 1)));
            assert_eq!(child_slot(level, sibling, true), Some(heap_slot(2 * parent + 2)));
        }
    }

    #[test]
    fn test_deep_levels_do_not_overlap() {
        let config = TreeLayoutConfig::default();
        let positions: Vec<Point> = (0..63).map(|i| config.heap_index_position(i)).collect();
        for (i, a) in positions.iter().enumerate() {
            for b in &positions[i + 1..] {
                assert!(a.distance(*b) >= config.min_spacing, "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn test_child_slot_stops_at_max_depth() {
        let rightmost = (1u64 << (MAX_TREE_DEPTH - 1)) - 1;
        assert_eq!(
            child_slot(MAX_TREE_DEPTH - 1, rightmost, true),
            Some((MAX_TREE_DEPTH, (1u64 << MAX_TREE_DEPTH) - 1))
        );
        assert_eq!(child_slot(MAX_TREE_DEPTH, 0, false), None);
        assert_eq!(child_slot(0, u64::MAX, true), None);
    }

    #[test]
    fn test_very_deep_levels_keep_distinct_columns() {
        let config = TreeLayoutConfig::default();
        let xs: Vec<f32> = (62..66).map(|level| config.position(level, 0).x).collect();
        for pair in xs.windows(2) {
            assert!(pair[1] < pair[0], "levels share a column: {xs:?}");
        }
    }

    #[test]
    fn test_origin_offsets_every_slot() {
        let config = TreeLayoutConfig {
            origin: Point::new(400.0, 50.0),
            ..TreeLayoutConfig::default()
        };
        assert_eq!(config.position(0, 0), Point::new(400.0, 50.0));
        assert_eq!(config.position(1, 1), Point::new(500.0, 170.0));
    }
}
