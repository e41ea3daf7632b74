//! Step-by-step playback of heap mutations.
//!
//! The player owns a display copy of the heap sequence. `load` resets it to
//! the snapshot taken before a mutation and queues that mutation's steps;
//! each `tick` applies one step and returns how long the host should wait
//! before the next tick. Loading new steps cancels whatever was playing.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::trace;

use super::engine::HeapStep;

/// Delays between playback ticks, in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlaybackConfig {
    /// Pause after a value is appended (new slot highlighted).
    pub append_ms: u32,
    /// Pause while two slots are compared.
    pub compare_ms: u32,
    /// Pause while two slots are highlighted as swapping.
    pub swap_ms: u32,
    /// Pause after a swap lands.
    pub settle_ms: u32,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            append_ms: 500,
            compare_ms: 800,
            swap_ms: 500,
            settle_ms: 300,
        }
    }
}

impl PlaybackConfig {
    fn delay_for(&self, step: &HeapStep) -> u32 {
        match step {
            HeapStep::Append { .. } => self.append_ms,
            HeapStep::Compare { .. } => self.compare_ms,
            HeapStep::Swap { .. } | HeapStep::ReplaceRoot { .. } => self.swap_ms + self.settle_ms,
            HeapStep::Clear => self.settle_ms,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackStatus {
    #[default]
    Idle,
    Playing,
    Paused,
}

/// Slots the renderer should emphasise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Highlight {
    pub active: Option<usize>,
    pub comparing: Option<(usize, usize)>,
    pub swapping: Option<(usize, usize)>,
}

impl Highlight {
    fn for_step(step: &HeapStep) -> Self {
        match *step {
            HeapStep::Append { index, .. } => Highlight {
                active: Some(index),
                ..Highlight::default()
            },
            HeapStep::Compare { a, b } => Highlight {
                comparing: Some((a, b)),
                ..Highlight::default()
            },
            HeapStep::Swap { a, b } => Highlight {
                swapping: Some((a, b)),
                ..Highlight::default()
            },
            HeapStep::ReplaceRoot { .. } => Highlight {
                active: Some(0),
                ..Highlight::default()
            },
            HeapStep::Clear => Highlight::default(),
        }
    }

    pub fn contains(&self, index: usize) -> bool {
        self.active == Some(index)
            || self.comparing.is_some_and(|(a, b)| a == index || b == index)
            || self.swapping.is_some_and(|(a, b)| a == index || b == index)
    }
}

/// Cooperative player for heap animation steps.
#[derive(Debug, Clone, Default)]
pub struct StepPlayer {
    config: PlaybackConfig,
    display: Vec<i64>,
    /// Engine state the queued steps end at.
    target: Vec<i64>,
    steps: VecDeque<HeapStep>,
    status: PlaybackStatus,
    highlight: Highlight,
}

impl StepPlayer {
    pub fn new(config: PlaybackConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Replace any in-flight playback.
    ///
    /// `before` is the sequence prior to the mutation, `after` the engine
    /// state it produced.
    pub fn load(&mut self, before: Vec<i64>, steps: Vec<HeapStep>, after: Vec<i64>) {
        if self.is_busy() {
            trace!(dropped = self.steps.len(), "playback superseded");
        }
        self.display = before;
        self.target = after;
        self.steps = steps.into();
        self.highlight = Highlight::default();
        self.status = if self.steps.is_empty() {
            self.display = self.target.clone();
            PlaybackStatus::Idle
        } else {
            PlaybackStatus::Playing
        };
    }

    /// Show `values` immediately with nothing queued.
    pub fn show(&mut self, values: Vec<i64>) {
        self.load(values.clone(), Vec::new(), values);
    }

    /// Apply the next step. Returns the delay in milliseconds before the
    /// following tick, or `None` when paused or done.
    pub fn tick(&mut self) -> Option<u32> {
        if self.status != PlaybackStatus::Playing {
            return None;
        }
        let Some(step) = self.steps.pop_front() else {
            self.highlight = Highlight::default();
            self.status = PlaybackStatus::Idle;
            return None;
        };
        step.apply(&mut self.display);
        self.highlight = Highlight::for_step(&step);
        let delay = self.config.delay_for(&step);
        trace!(?step, delay, remaining = self.steps.len(), "playback tick");
        Some(delay)
    }

    pub fn pause(&mut self) {
        if self.status == PlaybackStatus::Playing {
            self.status = PlaybackStatus::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.status == PlaybackStatus::Paused {
            self.status = PlaybackStatus::Playing;
        }
    }

    /// Drop the remaining steps and show the final state.
    pub fn cancel(&mut self) {
        self.steps.clear();
        self.display = self.target.clone();
        self.highlight = Highlight::default();
        self.status = PlaybackStatus::Idle;
    }

    /// Play every remaining step at once.
    pub fn finish(&mut self) {
        while let Some(step) = self.steps.pop_front() {
            step.apply(&mut self.display);
        }
        if self.display != self.target {
            self.display = self.target.clone();
        }
        self.highlight = Highlight::default();
        self.status = PlaybackStatus::Idle;
    }

    pub fn display(&self) -> &[i64] {
        &self.display
    }

    pub fn highlight(&self) -> Highlight {
        self.highlight
    }

    pub fn status(&self) -> PlaybackStatus {
        self.status
    }

    pub fn remaining(&self) -> usize {
        self.steps.len()
    }

    /// Steps not yet played, in order.
    pub fn queued(&self) -> impl Iterator<Item = &HeapStep> + '_ {
        self.steps.iter()
    }

    /// Playing or paused with steps still queued.
    pub fn is_busy(&self) -> bool {
        self.status != PlaybackStatus::Idle
    }
}
