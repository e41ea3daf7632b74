//! HeapEngine - array-backed binary heap that records its own animation.
//!
//! The value sequence is an implicit complete binary tree
//! (`parent(i) = (i - 1) / 2`, children `2i + 1` and `2i + 2`). Every
//! mutation returns the ordered list of steps that replays it, so the
//! caller can animate the change without the engine ever sleeping.

use serde::{Deserialize, Serialize};
use std::num::IntErrorKind;
use tracing::debug;

use crate::error::{VizError, VizResult};

/// Largest magnitude a heap value may have: JavaScript numbers stay exact
/// up to `2^53 - 1`.
pub const MAX_SAFE_VALUE: i64 = (1 << 53) - 1;

/// Ordering of the heap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeapMode {
    Min,
    #[default]
    Max,
}

impl HeapMode {
    /// Heap property for a parent/child pair.
    #[inline]
    pub fn holds(self, parent: i64, child: i64) -> bool {
        match self {
            HeapMode::Min => parent <= child,
            HeapMode::Max => parent >= child,
        }
    }

    /// True when `a` belongs strictly above `b`.
    #[inline]
    pub fn prefers(self, a: i64, b: i64) -> bool {
        match self {
            HeapMode::Min => a < b,
            HeapMode::Max => a > b,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            HeapMode::Min => HeapMode::Max,
            HeapMode::Max => HeapMode::Min,
        }
    }
}

/// One replayable unit of a heap mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum HeapStep {
    /// Value pushed onto the end of the sequence.
    Append { index: usize, value: i64 },
    /// Two slots were compared.
    Compare { a: usize, b: usize },
    /// Two slots exchanged values.
    Swap { a: usize, b: usize },
    /// The value at `from` (the last slot) moved to the root and the sequence shrank by one.
    ReplaceRoot { from: usize },
    /// Sequence emptied (start of a rebuild).
    Clear,
}

impl HeapStep {
    /// Apply this step to a display copy of the sequence.
    pub fn apply(&self, values: &mut Vec<i64>) {
        match *self {
            HeapStep::Append { value, .. } => values.push(value),
            HeapStep::Compare { .. } => {}
            HeapStep::Swap { a, b } => {
                if a < values.len() && b < values.len() {
                    values.swap(a, b);
                }
            }
            HeapStep::ReplaceRoot { from } => {
                if from < values.len() {
                    let last = values.swap_remove(from);
                    if from > 0 {
                        values[0] = last;
                    }
                }
            }
            HeapStep::Clear => values.clear(),
        }
    }
}

#[inline]
fn parent(i: usize) -> usize {
    (i - 1) / 2
}

/// Array-backed binary heap.
#[derive(Debug, Clone, Default)]
pub struct HeapEngine {
    values: Vec<i64>,
    mode: HeapMode,
}

impl HeapEngine {
    pub fn new(mode: HeapMode) -> Self {
        Self {
            values: Vec::new(),
            mode,
        }
    }

    pub fn mode(&self) -> HeapMode {
        self.mode
    }

    pub fn values(&self) -> &[i64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn peek(&self) -> Option<i64> {
        self.values.first().copied()
    }

    // ===== Mutations =====

    /// Append `value` and sift it up.
    pub fn insert(&mut self, value: i64) -> Vec<HeapStep> {
        let mut steps = Vec::new();
        self.push_and_sift_up(value, &mut steps);
        debug!(value, len = self.values.len(), "heap insert");
        steps
    }

    /// Insert several values one after another.
    pub fn insert_many(&mut self, values: &[i64]) -> Vec<HeapStep> {
        let mut steps = Vec::new();
        for &value in values {
            self.push_and_sift_up(value, &mut steps);
        }
        debug!(count = values.len(), len = self.values.len(), "heap batch insert");
        steps
    }

    /// Remove and return the root. `None` on an empty heap.
    pub fn extract_root(&mut self) -> Option<(i64, Vec<HeapStep>)> {
        let root = self.peek()?;
        let last_index = self.values.len() - 1;
        let mut steps = vec![HeapStep::ReplaceRoot { from: last_index }];
        HeapStep::ReplaceRoot { from: last_index }.apply(&mut self.values);

        self.sift_down(0, &mut steps);
        debug!(root, len = self.values.len(), "heap extract");
        Some((root, steps))
    }

    /// Switch ordering and rebuild by re-inserting every value, in its
    /// current positional order, into an empty sequence. Same mode is a no-op.
    pub fn set_mode(&mut self, mode: HeapMode) -> Vec<HeapStep> {
        if mode == self.mode {
            return Vec::new();
        }
        self.mode = mode;

        let previous = std::mem::take(&mut self.values);
        let mut steps = vec![HeapStep::Clear];
        for value in previous {
            self.push_and_sift_up(value, &mut steps);
        }
        debug!(?mode, len = self.values.len(), "heap rebuilt");
        steps
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    // ===== Sifting =====

    fn push_and_sift_up(&mut self, value: i64, steps: &mut Vec<HeapStep>) {
        let mut current = self.values.len();
        self.values.push(value);
        steps.push(HeapStep::Append { index: current, value });

        while current > 0 {
            let up = parent(current);
            steps.push(HeapStep::Compare { a: current, b: up });
            if !self.mode.prefers(self.values[current], self.values[up]) {
                break;
            }
            self.values.swap(current, up);
            steps.push(HeapStep::Swap { a: current, b: up });
            current = up;
        }
    }

    fn sift_down(&mut self, start: usize, steps: &mut Vec<HeapStep>) {
        let len = self.values.len();
        let mut current = start;
        loop {
            let left = 2 * current + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let child = if right < len && self.mode.prefers(self.values[right], self.values[left]) {
                right
            } else {
                left
            };

            steps.push(HeapStep::Compare { a: current, b: child });
            if self.mode.holds(self.values[current], self.values[child]) {
                break;
            }
            self.values.swap(current, child);
            steps.push(HeapStep::Swap { a: current, b: child });
            current = child;
        }
    }

    // ===== Validation =====

    /// Check the heap property for every non-root index.
    pub fn is_valid_heap(&self) -> bool {
        (1..self.values.len()).all(|i| self.mode.holds(self.values[parent(i)], self.values[i]))
    }

    /// Parse comma-separated integers. Every token is checked before anything
    /// is returned, so a single bad token rejects the whole input.
    pub fn parse_input(input: &str) -> VizResult<Vec<i64>> {
        let tokens: Vec<&str> = input
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect();
        if tokens.is_empty() {
            return Err(VizError::EmptyInput);
        }
        tokens.into_iter().map(parse_value).collect()
    }
}

fn parse_value(token: &str) -> VizResult<i64> {
    match token.parse::<i64>() {
        Ok(value) if (-MAX_SAFE_VALUE..=MAX_SAFE_VALUE).contains(&value) => Ok(value),
        Ok(_) => Err(VizError::OutOfRange {
            value: token.to_string(),
        }),
        Err(err) if matches!(err.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
            Err(VizError::OutOfRange {
                value: token.to_string(),
            })
        }
        Err(_) => Err(VizError::InvalidNumber {
            input: token.to_string(),
        }),
    }
}
