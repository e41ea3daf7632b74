//! Render snapshot: everything the host draws for one frame, in screen space.

use serde::Serialize;

use crate::canvas::CanvasModel;
use crate::drag::DragController;
use crate::geometry::Point;
use crate::graph::{EdgeId, NodeId};
use crate::heap::{AnimatedHeap, HeapMode, HeapStep, Highlight, PlaybackStatus};
use crate::viewport::ViewportController;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameNode {
    pub id: NodeId,
    pub screen_position: Point,
    pub label: String,
    pub highlighted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameEdge {
    pub id: EdgeId,
    /// Start and end centres.
    pub screen_path: [Point; 2],
    pub is_on_cycle: bool,
}

/// Heap playback state shown next to the tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeapFrame {
    pub mode: HeapMode,
    /// Values as currently displayed (mid-animation values included).
    pub values: Vec<i64>,
    pub highlight: Highlight,
    pub status: PlaybackStatus,
    pub heap_steps: Vec<HeapStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    pub nodes: Vec<FrameNode>,
    pub edges: Vec<FrameEdge>,
    /// Preview line from the connection source to the pointer.
    pub pending_connection: Option<[Point; 2]>,
    pub scale: f32,
    pub offset: Point,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heap: Option<HeapFrame>,
}

impl Frame {
    /// Project the model's scene through the viewport.
    pub fn build<M: CanvasModel + ?Sized>(
        model: &M,
        viewport: &ViewportController,
        drag: &DragController,
    ) -> Self {
        let scene = model.scene();

        let nodes = scene
            .nodes
            .into_iter()
            .map(|n| FrameNode {
                id: n.id,
                screen_position: viewport.to_screen(n.position),
                label: n.label,
                highlighted: n.highlighted,
            })
            .collect();

        let edges = scene
            .edges
            .into_iter()
            .map(|e| FrameEdge {
                id: e.id,
                screen_path: [viewport.to_screen(e.from), viewport.to_screen(e.to)],
                is_on_cycle: e.on_cycle,
            })
            .collect();

        let pending_connection = drag.pending_connection().and_then(|(from, cursor)| {
            let start = model.connection_anchor(from)?;
            Some([viewport.to_screen(start), viewport.to_screen(cursor)])
        });

        Self {
            nodes,
            edges,
            pending_connection,
            scale: viewport.scale(),
            offset: viewport.offset(),
            heap: None,
        }
    }

    pub fn with_heap(mut self, heap: &AnimatedHeap) -> Self {
        let player = heap.player();
        self.heap = Some(HeapFrame {
            mode: heap.mode(),
            values: player.display().to_vec(),
            highlight: player.highlight(),
            status: player.status(),
            heap_steps: player.queued().copied().collect(),
        });
        self
    }

    pub fn cycle_edge_ids(&self) -> Vec<EdgeId> {
        self.edges.iter().filter(|e| e.is_on_cycle).map(|e| e.id).collect()
    }
}
