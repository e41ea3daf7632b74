//! Binary heap engine and its animated playback.

mod animated;
mod engine;
mod player;

pub use animated::AnimatedHeap;
pub use engine::{HeapEngine, HeapMode, HeapStep, MAX_SAFE_VALUE};
pub use player::{Highlight, PlaybackConfig, PlaybackStatus, StepPlayer};
