//! Heap visualizer state: the engine, its playback, and tree positions.

use tracing::{debug, warn};

use super::engine::{HeapEngine, HeapMode, HeapStep};
use super::player::{PlaybackConfig, StepPlayer};
use crate::canvas::{CanvasModel, Scene, SceneEdge, SceneNode};
use crate::error::VizResult;
use crate::graph::{EdgeId, NodeId};
use crate::layout::TreeLayoutConfig;

/// Heap engine plus the animation that shows its last mutation.
///
/// The engine is always authoritative; the player only controls what is on
/// screen. Every mutation cancels the animation in flight before touching
/// the engine.
#[derive(Debug, Clone)]
pub struct AnimatedHeap {
    engine: HeapEngine,
    player: StepPlayer,
    layout: TreeLayoutConfig,
}

impl AnimatedHeap {
    pub fn new(mode: HeapMode, layout: TreeLayoutConfig, playback: PlaybackConfig) -> Self {
        Self {
            engine: HeapEngine::new(mode),
            player: StepPlayer::new(playback),
            layout,
        }
    }

    /// Start with `seed` already in place, without animation.
    pub fn seeded(mut self, seed: Option<i64>) -> Self {
        if let Some(value) = seed {
            self.engine.insert(value);
            self.player.show(self.engine.values().to_vec());
        }
        self
    }

    pub fn engine(&self) -> &HeapEngine {
        &self.engine
    }

    pub fn player(&self) -> &StepPlayer {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut StepPlayer {
        &mut self.player
    }

    pub fn mode(&self) -> HeapMode {
        self.engine.mode()
    }

    // ===== Mutations =====

    pub fn insert(&mut self, value: i64) {
        self.run(|engine| engine.insert(value));
    }

    /// Validate the whole comma-separated input, then insert every value.
    /// Returns how many values were inserted.
    pub fn insert_input(&mut self, input: &str) -> VizResult<usize> {
        let values = HeapEngine::parse_input(input).inspect_err(|err| {
            warn!(%err, "heap input rejected");
        })?;
        self.run(|engine| engine.insert_many(&values));
        Ok(values.len())
    }

    /// Remove the root. `None` (and no playback change) on an empty heap.
    pub fn extract_root(&mut self) -> Option<i64> {
        if self.engine.is_empty() {
            return None;
        }
        let mut root = None;
        self.run(|engine| match engine.extract_root() {
            Some((value, steps)) => {
                root = Some(value);
                steps
            }
            None => Vec::new(),
        });
        root
    }

    pub fn set_mode(&mut self, mode: HeapMode) {
        if mode == self.engine.mode() {
            return;
        }
        self.run(|engine| engine.set_mode(mode));
    }

    pub fn toggle_mode(&mut self) {
        self.set_mode(self.engine.mode().toggled());
    }

    pub fn clear(&mut self) {
        self.player.cancel();
        self.engine.clear();
        self.player.show(Vec::new());
        debug!("heap cleared");
    }

    fn run(&mut self, mutate: impl FnOnce(&mut HeapEngine) -> Vec<HeapStep>) {
        self.player.cancel();
        let before = self.engine.values().to_vec();
        let steps = mutate(&mut self.engine);
        self.player.load(before, steps, self.engine.values().to_vec());
    }
}

impl CanvasModel for AnimatedHeap {
    fn scene(&self) -> Scene {
        let values = self.player.display();
        let highlight = self.player.highlight();

        let nodes = values
            .iter()
            .enumerate()
            .map(|(i, value)| SceneNode {
                id: NodeId(i as u32),
                label: value.to_string(),
                position: self.layout.heap_index_position(i),
                highlighted: highlight.contains(i),
            })
            .collect();

        let edges = (1..values.len())
            .map(|i| SceneEdge {
                id: EdgeId((i - 1) as u32),
                from: self.layout.heap_index_position((i - 1) / 2),
                to: self.layout.heap_index_position(i),
                on_cycle: false,
            })
            .collect();

        Scene { nodes, edges }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VizError;
    use crate::heap::PlaybackStatus;

    fn heap() -> AnimatedHeap {
        AnimatedHeap::new(HeapMode::Max, TreeLayoutConfig::default(), PlaybackConfig::default())
    }

    #[test]
    fn test_seeded_heap_shows_seed() {
        let heap = heap().seeded(Some(50));
        assert_eq!(heap.engine().values(), &[50]);
        assert_eq!(heap.player().display(), &[50]);
        assert_eq!(heap.scene().nodes.len(), 1);
    }

    #[test]
    fn test_invalid_input_changes_nothing() {
        let mut heap = heap().seeded(Some(50));
        let err = heap.insert_input("1, x");
        assert_eq!(err, Err(VizError::InvalidNumber { input: "x".into() }));
        assert_eq!(heap.engine().values(), &[50]);
        assert!(!heap.player().is_busy());
    }

    #[test]
    fn test_new_mutation_cancels_playback() {
        let mut heap = heap();
        assert_eq!(heap.insert_input("5, 3, 8"), Ok(3));
        heap.player_mut().tick();
        assert!(heap.player().is_busy());

        heap.insert(1);
        // Display restarted from the full three-value state, not a half-played one.
        assert_eq!(heap.player().display(), &[8, 3, 5]);
        heap.player_mut().finish();
        assert_eq!(heap.player().display(), &[8, 3, 5, 1]);
    }

    #[test]
    fn test_extract_and_clear() {
        let mut heap = heap();
        heap.insert_input("5,3,8,1").unwrap();
        assert_eq!(heap.extract_root(), Some(8));
        heap.player_mut().finish();
        assert_eq!(heap.player().display(), &[5, 3, 1]);

        heap.clear();
        assert_eq!(heap.extract_root(), None);
        assert_eq!(heap.player().status(), PlaybackStatus::Idle);
        assert!(heap.scene().nodes.is_empty());
    }

    #[test]
    fn test_scene_edges_follow_parent_links() {
        let mut heap = heap();
        heap.insert_input("4,3,2,1").unwrap();
        heap.player_mut().finish();
        let scene = heap.scene();
        assert_eq!(scene.nodes.len(), 4);
        assert_eq!(scene.edges.len(), 3);
        let layout = TreeLayoutConfig::default();
        assert_eq!(scene.edges[2].from, layout.heap_index_position(1));
        assert_eq!(scene.edges[2].to, layout.heap_index_position(3));
    }

    #[test]
    fn test_toggle_mode() {
        let mut heap = heap();
        heap.insert_input("1,2,3").unwrap();
        heap.toggle_mode();
        assert_eq!(heap.mode(), HeapMode::Min);
        assert!(heap.engine().is_valid_heap());
        assert_eq!(heap.engine().peek(), Some(1));
    }
}
