//! Singly or doubly linked list drawn as a row.
//!
//! The list order is the only structural state. After every change node
//! positions are reassigned along the row and the next (and prev) edges are
//! rebuilt from the order, so edge geometry always follows node positions.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::canvas::{CanvasModel, Scene};
use crate::geometry::Point;
use crate::graph::{GraphModel, Node, NodeId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListConfig {
    /// Horizontal distance between consecutive nodes.
    pub spacing: f32,
    /// Draw prev pointers as well as next pointers.
    pub doubly: bool,
    /// Position of the head node.
    pub origin: Point,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            spacing: 120.0,
            doubly: false,
            origin: Point::ORIGIN,
        }
    }
}

pub struct LinkedList {
    model: GraphModel,
    order: Vec<NodeId>,
    config: ListConfig,
    next_label: u32,
}

impl LinkedList {
    pub fn new(config: ListConfig) -> Self {
        Self {
            model: GraphModel::without_cycle_tracking(),
            order: Vec::new(),
            config,
            next_label: 1,
        }
    }

    pub fn model(&self) -> &GraphModel {
        &self.model
    }

    pub fn is_doubly(&self) -> bool {
        self.config.doubly
    }

    /// Node ids from head to tail.
    pub fn order(&self) -> &[NodeId] {
        &self.order
    }

    pub fn labels(&self) -> Vec<&str> {
        self.order
            .iter()
            .filter_map(|&id| self.model.node(id).map(|n| n.label.as_str()))
            .collect()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.model.node(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    // ===== Mutations =====

    pub fn push_front(&mut self, label: Option<String>) -> NodeId {
        self.insert_at(0, label)
    }

    pub fn push_back(&mut self, label: Option<String>) -> NodeId {
        self.insert_at(self.order.len(), label)
    }

    /// Insert after `id`. `None` if `id` is not in the list.
    pub fn insert_after(&mut self, id: NodeId, label: Option<String>) -> Option<NodeId> {
        let index = self.index_of(id)?;
        Some(self.insert_at(index + 1, label))
    }

    /// Insert before `id`. `None` if `id` is not in the list.
    pub fn insert_before(&mut self, id: NodeId, label: Option<String>) -> Option<NodeId> {
        let index = self.index_of(id)?;
        Some(self.insert_at(index, label))
    }

    /// Unlink and delete a node. Unknown id is a no-op.
    pub fn remove(&mut self, id: NodeId) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        self.order.remove(index);
        self.model.remove_node(id);
        self.relink();
        debug!(node = id.raw(), len = self.order.len(), "list node removed");
        true
    }

    pub fn relabel(&mut self, id: NodeId, label: impl Into<String>) -> bool {
        self.model.relabel_node(id, label)
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.model.clear();
        self.next_label = 1;
    }

    fn index_of(&self, id: NodeId) -> Option<usize> {
        self.order.iter().position(|&n| n == id)
    }

    fn insert_at(&mut self, index: usize, label: Option<String>) -> NodeId {
        let label = label.unwrap_or_else(|| self.next_label.to_string());
        self.next_label += 1;

        let id = self.model.add_node(slot(&self.config, index), label);
        self.order.insert(index.min(self.order.len()), id);
        self.relink();
        debug!(node = id.raw(), index, len = self.order.len(), "list node inserted");
        id
    }

    /// Lay the row out again and rebuild every pointer edge from the order.
    fn relink(&mut self) {
        for (index, &id) in self.order.iter().enumerate() {
            self.model.set_position(id, slot(&self.config, index));
        }

        self.model.clear_edges();
        for pair in self.order.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if let Err(err) = self.model.add_edge(a, b) {
                warn!(%err, "next pointer not drawn");
            }
            if self.config.doubly {
                if let Err(err) = self.model.add_edge(b, a) {
                    warn!(%err, "prev pointer not drawn");
                }
            }
        }
    }
}

fn slot(config: &ListConfig, index: usize) -> Point {
    config.origin + Point::new(index as f32 * config.spacing, 0.0)
}

impl CanvasModel for LinkedList {
    fn scene(&self) -> Scene {
        self.model.scene()
    }

    fn node_at(&self, point: Point, radius: f32) -> Option<NodeId> {
        self.model.node_at(point, radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoints(list: &LinkedList) -> Vec<(NodeId, NodeId)> {
        list.model().edges().into_iter().map(|e| (e.from, e.to)).collect()
    }

    #[test]
    fn test_push_front_and_back() {
        let mut list = LinkedList::new(ListConfig::default());
        let b = list.push_back(None);
        let c = list.push_back(None);
        let a = list.push_front(Some("head".into()));

        assert_eq!(list.order(), &[a, b, c]);
        assert_eq!(list.labels(), vec!["head", "1", "2"]);
        assert_eq!(list.node(a).unwrap().position, Point::ORIGIN);
        assert_eq!(list.node(c).unwrap().position, Point::new(240.0, 0.0));
        assert_eq!(endpoints(&list), vec![(a, b), (b, c)]);
    }

    #[test]
    fn test_insert_relative_to_node() {
        let mut list = LinkedList::new(ListConfig::default());
        let a = list.push_back(None);
        let c = list.push_back(None);
        let b = list.insert_after(a, None).unwrap();
        let z = list.insert_before(a, None).unwrap();
        assert_eq!(list.order(), &[z, a, b, c]);
        assert_eq!(list.insert_after(NodeId(77), None), None);
        assert_eq!(list.model().edge_count(), 3);
    }

    #[test]
    fn test_remove_relinks_neighbours() {
        let mut list = LinkedList::new(ListConfig::default());
        let a = list.push_back(None);
        let b = list.push_back(None);
        let c = list.push_back(None);

        assert!(list.remove(b));
        assert_eq!(list.order(), &[a, c]);
        assert_eq!(endpoints(&list), vec![(a, c)]);
        assert_eq!(list.node(c).unwrap().position, Point::new(120.0, 0.0));
        assert!(!list.remove(b));
    }

    #[test]
    fn test_doubly_linked_has_back_pointers_without_cycle_flags() {
        let mut list = LinkedList::new(ListConfig {
            doubly: true,
            ..ListConfig::default()
        });
        let a = list.push_back(None);
        let b = list.push_back(None);
        list.push_back(None);

        assert_eq!(list.model().edge_count(), 4);
        assert!(endpoints(&list).contains(&(b, a)));
        assert!(list.model().cycle_edges().is_empty());
        assert!(list.scene().edges.iter().all(|e| !e.on_cycle));
    }

    #[test]
    fn test_relabel_and_clear() {
        let mut list = LinkedList::new(ListConfig::default());
        let a = list.push_back(None);
        assert!(list.relabel(a, "x"));
        assert_eq!(list.labels(), vec!["x"]);
        list.clear();
        assert!(list.is_empty());
        list.push_back(None);
        assert_eq!(list.labels(), vec!["1"]);
    }
}
