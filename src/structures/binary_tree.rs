//! Binary tree built one child at a time.
//!
//! Nodes and parent -> child edges live in a `GraphModel`; positions are
//! assigned from each node's (level, sibling) slot so the tree never
//! overlaps and never needs a proximity search.

use std::collections::HashMap;
use tracing::debug;

use crate::canvas::{CanvasModel, Scene};
use crate::error::{VizError, VizResult};
use crate::geometry::Point;
use crate::graph::{GraphModel, Node, NodeId, Side};
use crate::layout::TreeLayoutConfig;
use crate::layout::tree::{MAX_TREE_DEPTH, child_slot};

pub struct BinaryTree {
    model: GraphModel,
    layout: TreeLayoutConfig,
    root: Option<NodeId>,
    /// Sibling index of every node within its level.
    siblings: HashMap<NodeId, u64>,
}

impl BinaryTree {
    pub fn new(layout: TreeLayoutConfig) -> Self {
        Self {
            model: GraphModel::without_cycle_tracking(),
            layout,
            root: None,
            siblings: HashMap::new(),
        }
    }

    pub fn model(&self) -> &GraphModel {
        &self.model
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.model.node(id)
    }

    pub fn len(&self) -> usize {
        self.model.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Start a fresh tree, discarding any existing one.
    pub fn create_root(&mut self, label: Option<String>) -> NodeId {
        self.model.clear();
        self.siblings.clear();

        let position = self.layout.position(0, 0);
        let id = self.model.add_node(position, "");
        self.model.relabel_node(id, label.unwrap_or_else(|| default_label(id)));
        self.model.update_node(id, |node| node.level = Some(0));
        self.siblings.insert(id, 0);
        self.root = Some(id);
        debug!(root = id.raw(), "tree created");
        id
    }

    /// Add a child in an empty slot of `parent`.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        side: Side,
        label: Option<String>,
    ) -> VizResult<NodeId> {
        let parent_node = self
            .model
            .node(parent)
            .ok_or(VizError::UnknownNode { node: parent })?;
        if parent_node.child(side).is_some() {
            return Err(VizError::SlotOccupied {
                parent,
                side: side.as_str(),
            });
        }

        let parent_level = parent_node.level.unwrap_or(0);
        let parent_sibling = self.siblings.get(&parent).copied().unwrap_or(0);
        let Some((level, sibling)) = self.child_slot(parent_level, parent_sibling, side) else {
            debug!(parent = parent.raw(), level = parent_level, "tree depth limit reached");
            return Err(VizError::DepthLimit {
                parent,
                max_depth: self.max_depth(),
            });
        };

        let id = self.model.add_node(self.layout.position(level, sibling), "");
        self.model.relabel_node(id, label.unwrap_or_else(|| default_label(id)));
        self.model.update_node(id, |node| {
            node.level = Some(level);
            node.parent = Some(parent);
        });
        self.model.update_node(parent, |node| node.set_child(side, Some(id)));
        self.model.add_edge(parent, id)?;
        self.siblings.insert(id, sibling);

        debug!(parent = parent.raw(), child = id.raw(), side = side.as_str(), "child added");
        Ok(id)
    }

    /// Remove `id` and all its descendants. Unknown id is a no-op.
    pub fn remove_subtree(&mut self, id: NodeId) -> bool {
        let Some(node) = self.model.node(id) else {
            return false;
        };

        if let Some(parent) = node.parent {
            let side = self
                .model
                .node(parent)
                .and_then(|p| {
                [Side::Left, Side::Right]
                    .into_iter()
                    .find(|&s| p.child(s) == Some(id))
            });
            if let Some(side) = side {
                self.model.update_node(parent, |p| p.set_child(side, None));
            }
        }

        let mut doomed = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.model.node(current) {
                stack.extend(node.left_child);
                stack.extend(node.right_child);
            }
            doomed.push(current);
        }
        for node in &doomed {
            self.model.remove_node(*node);
            self.siblings.remove(node);
        }
        if self.root == Some(id) {
            self.root = None;
        }

        debug!(node = id.raw(), removed = doomed.len(), "subtree removed");
        true
    }

    pub fn relabel(&mut self, id: NodeId, label: impl Into<String>) -> bool {
        self.model.relabel_node(id, label)
    }

    pub fn children(&self, id: NodeId) -> (Option<NodeId>, Option<NodeId>) {
        self.model
            .node(id)
            .map(|n| (n.left_child, n.right_child))
            .unwrap_or_default()
    }

    /// Where a child in `side` of `parent` would be drawn.
    pub fn slot_position(&self, parent: NodeId, side: Side) -> Option<Point> {
        let level = self.model.node(parent)?.level?;
        let sibling = *self.siblings.get(&parent)?;
        let (level, sibling) = self.child_slot(level, sibling, side)?;
        Some(self.layout.position(level, sibling))
    }

    fn max_depth(&self) -> u32 {
        self.layout.max_depth.min(MAX_TREE_DEPTH)
    }

    fn child_slot(&self, level: u32, sibling: u64, side: Side) -> Option<(u32, u64)> {
        child_slot(level, sibling, side == Side::Right).filter(|&(l, _)| l <= self.max_depth())
    }
}

fn default_label(id: NodeId) -> String {
    (id.raw() + 1).to_string()
}

impl CanvasModel for BinaryTree {
    fn scene(&self) -> Scene {
        self.model.scene()
    }

    fn node_at(&self, point: Point, radius: f32) -> Option<NodeId> {
        self.model.node_at(point, radius)
    }
}
