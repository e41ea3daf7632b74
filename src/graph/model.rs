//! GraphModel - owns nodes and directed edges for one visualizer.
//!
//! Topology lives in petgraph's StableGraph so node/edge indices survive
//! removals; stable `NodeId`/`EdgeId` values are mapped onto those indices.
//! Node centres are mirrored into an R-tree for hit testing and placement.
//! Every edge-set change re-runs the cycle detector before returning.

use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableGraph};
use petgraph::visit::{EdgeRef, IntoEdgeReferences};
use petgraph::{Directed, Direction};
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, warn};

use super::cycles::{CycleDetector, CycleReport};
use super::edge::{Edge, EdgeId, GraphKind};
use super::node::{Node, NodeId};
use crate::error::{VizError, VizResult};
use crate::geometry::{Bounds, Point};
use crate::spatial::SpatialIndex;

/// The node/edge store.
///
/// This struct manages:
/// - Graph topology via petgraph (node weight = node record, edge weight = stable id)
/// - ID mapping between stable IDs and internal indices
/// - The set of edges currently on a cycle
/// - Spatial index over node centres
pub struct GraphModel {
    graph: StableGraph<Node, EdgeId, Directed>,

    /// Map from stable NodeId to petgraph NodeIndex
    node_id_to_index: HashMap<NodeId, NodeIndex>,

    /// Map from stable EdgeId to petgraph EdgeIndex
    edge_id_to_index: HashMap<EdgeId, EdgeIndex>,

    next_node_id: u32,
    next_edge_id: u32,

    kind: GraphKind,

    /// Cycle tracking is off for structures whose back pointers are not cycles
    /// worth highlighting (doubly linked lists).
    track_cycles: bool,

    cycles: CycleReport,

    spatial: SpatialIndex,

    /// Bumped on every mutation.
    revision: u64,
}

impl GraphModel {
    /// Create an empty graph of the given kind.
    pub fn new(kind: GraphKind) -> Self {
        Self {
            graph: StableGraph::new(),
            node_id_to_index: HashMap::new(),
            edge_id_to_index: HashMap::new(),
            next_node_id: 0,
            next_edge_id: 0,
            kind,
            track_cycles: kind == GraphKind::Directed,
            cycles: CycleReport::default(),
            spatial: SpatialIndex::new(),
            revision: 0,
        }
    }

    /// A directed graph that never flags cycles.
    pub fn without_cycle_tracking() -> Self {
        let mut model = Self::new(GraphKind::Directed);
        model.track_cycles = false;
        model
    }

    pub fn kind(&self) -> GraphKind {
        self.kind
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    // =========================================================================
    // Node Operations
    // =========================================================================

    /// Add a node at the specified world position. Always succeeds.
    ///
    /// Non-finite coordinates are replaced with 0 so the R-tree mirror stays
    /// consistent with the graph.
    pub fn add_node(&mut self, position: Point, label: impl Into<String>) -> NodeId {
        let id = NodeId(self.next_node_id);
        self.next_node_id += 1;

        let position = if position.is_finite() {
            position
        } else {
            warn!(x = position.x, y = position.y, "non-finite node position, using 0");
            Point::new(finite_or_zero(position.x), finite_or_zero(position.y))
        };

        let index = self.graph.add_node(Node::new(id, label, position));
        self.node_id_to_index.insert(id, index);
        self.spatial.insert(id, position);

        self.touch();
        debug!(node = id.raw(), x = position.x, y = position.y, "node added");
        id
    }

    /// Remove a node and every edge touching it.
    ///
    /// Returns false (and changes nothing) if the node is unknown.
    pub fn remove_node(&mut self, id: NodeId) -> bool {
        let Some(index) = self.node_id_to_index.remove(&id) else {
            return false;
        };

        let incident: Vec<EdgeId> = self
            .graph
            .edges_directed(index, Direction::Outgoing)
            .chain(self.graph.edges_directed(index, Direction::Incoming))
            .map(|e| *e.weight())
            .collect();
        for edge_id in &incident {
            self.edge_id_to_index.remove(edge_id);
        }

        if let Some(node) = self.graph.remove_node(index) {
            self.spatial.remove(id, node.position);
        }

        self.touch();
        if !incident.is_empty() {
            self.recompute_cycles();
        }
        debug!(node = id.raw(), dropped_edges = incident.len(), "node removed");
        true
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.node_id_to_index.contains_key(&id)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.node_id_to_index.get(&id).map(|&index| &self.graph[index])
    }

    /// All nodes in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.graph.node_indices().map(move |index| &self.graph[index])
    }

    pub fn position(&self, id: NodeId) -> Option<Point> {
        self.node(id).map(|n| n.position)
    }

    /// Move a node to an absolute world position (used by drag).
    pub fn set_position(&mut self, id: NodeId, position: Point) -> bool {
        if !position.is_finite() {
            return false;
        }
        let Some(&index) = self.node_id_to_index.get(&id) else {
            return false;
        };
        let old = std::mem::replace(&mut self.graph[index].position, position);
        self.spatial.relocate(id, old, position);
        self.touch();
        true
    }

    /// Translate a node by a world-space delta.
    pub fn move_node(&mut self, id: NodeId, delta: Point) -> bool {
        match self.position(id) {
            Some(p) => self.set_position(id, p + delta),
            None => false,
        }
    }

    /// Replace a node's label. No structural effect.
    pub fn relabel_node(&mut self, id: NodeId, label: impl Into<String>) -> bool {
        let Some(&index) = self.node_id_to_index.get(&id) else {
            return false;
        };
        self.graph[index].label = label.into();
        self.touch();
        true
    }

    /// Edit tree links / level of a node. Position edits are re-synced with
    /// the spatial index.
    pub(crate) fn update_node<R>(
        &mut self,
        id: NodeId,
        f: impl FnOnce(&mut Node) -> R,
    ) -> Option<R> {
        let &index = self.node_id_to_index.get(&id)?;
        let before = self.graph[index].position;
        let result = f(&mut self.graph[index]);
        let after = self.graph[index].position;
        if before != after {
            self.spatial.relocate(id, before, after);
        }
        self.touch();
        Some(result)
    }

    // =========================================================================
    // Edge Operations
    // =========================================================================

    /// Connect two distinct existing nodes.
    ///
    /// Rejected when `from == to`, when either node is unknown, or when the
    /// edge already exists (either direction, for undirected graphs). On
    /// success the cycle set is recomputed.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId) -> VizResult<EdgeId> {
        let result = self.try_add_edge(from, to);
        if let Err(err) = &result {
            debug!(from = from.raw(), to = to.raw(), %err, "edge rejected");
        }
        result
    }

    fn try_add_edge(&mut self, from: NodeId, to: NodeId) -> VizResult<EdgeId> {
        if from == to {
            return Err(VizError::SelfLoop { node: from });
        }
        let &source = self
            .node_id_to_index
            .get(&from)
            .ok_or(VizError::UnknownNode { node: from })?;
        let &target = self
            .node_id_to_index
            .get(&to)
            .ok_or(VizError::UnknownNode { node: to })?;

        let duplicate = self.graph.find_edge(source, target).is_some()
            || (self.kind == GraphKind::Undirected
                && self.graph.find_edge(target, source).is_some());
        if duplicate {
            return Err(VizError::DuplicateEdge { from, to });
        }

        let id = EdgeId(self.next_edge_id);
        self.next_edge_id += 1;

        let index = self.graph.add_edge(source, target, id);
        self.edge_id_to_index.insert(id, index);

        self.touch();
        self.recompute_cycles();
        debug!(edge = id.raw(), from = from.raw(), to = to.raw(), "edge added");
        Ok(id)
    }

    /// Remove an edge. Unknown ids are a no-op.
    pub fn remove_edge(&mut self, id: EdgeId) -> bool {
        let Some(index) = self.edge_id_to_index.remove(&id) else {
            return false;
        };
        self.graph.remove_edge(index);
        self.touch();
        self.recompute_cycles();
        true
    }

    /// Remove every edge, keeping the nodes.
    pub fn clear_edges(&mut self) {
        if self.edge_id_to_index.is_empty() {
            return;
        }
        self.graph.clear_edges();
        self.edge_id_to_index.clear();
        self.touch();
        self.recompute_cycles();
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn edge(&self, id: EdgeId) -> Option<Edge> {
        let &index = self.edge_id_to_index.get(&id)?;
        let (source, target) = self.graph.edge_endpoints(index)?;
        Some(Edge {
            id,
            from: self.graph[source].id,
            to: self.graph[target].id,
        })
    }

    /// All edges, ordered by id.
    pub fn edges(&self) -> Vec<Edge> {
        let mut edges: Vec<Edge> = self
            .graph
            .edge_references()
            .map(|e| Edge {
                id: *e.weight(),
                from: self.graph[e.source()].id,
                to: self.graph[e.target()].id,
            })
            .collect();
        edges.sort_by_key(|e| e.id);
        edges
    }

    /// Successor node ids of `id`.
    pub fn neighbors(&self, id: NodeId) -> Vec<NodeId> {
        self.node_id_to_index
            .get(&id)
            .map(|&index| self.graph.neighbors(index).map(|n| self.graph[n].id).collect())
            .unwrap_or_default()
    }

    // =========================================================================
    // Cycles
    // =========================================================================

    /// Edges currently lying on at least one directed cycle.
    pub fn cycle_edges(&self) -> &BTreeSet<EdgeId> {
        &self.cycles.cycle_edges
    }

    pub fn is_on_cycle(&self, id: EdgeId) -> bool {
        self.cycles.cycle_edges.contains(&id)
    }

    pub fn cycle_report(&self) -> &CycleReport {
        &self.cycles
    }

    fn recompute_cycles(&mut self) {
        if !self.track_cycles {
            return;
        }
        self.cycles = CycleDetector::detect(&self.graph);
        debug!(flagged = self.cycles.cycle_edges.len(), "cycles recomputed");
    }

    // =========================================================================
    // Spatial Queries
    // =========================================================================

    /// Nearest node whose centre is within `radius` of a world point.
    pub fn node_at(&self, point: Point, radius: f32) -> Option<NodeId> {
        self.spatial.nearest_within(point, radius)
    }

    /// Whether any node centre lies within `radius` of a world point.
    pub fn is_occupied(&self, point: Point, radius: f32) -> bool {
        self.spatial.is_occupied(point, radius)
    }

    // =========================================================================
    // Utilities
    // =========================================================================

    /// Bounding box of all node centres.
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::enclosing(self.nodes().map(|n| n.position))
    }

    /// Drop all nodes and edges and restart id assignment.
    pub fn clear(&mut self) {
        self.graph.clear();
        self.node_id_to_index.clear();
        self.edge_id_to_index.clear();
        self.next_node_id = 0;
        self.next_edge_id = 0;
        self.cycles = CycleReport::default();
        self.spatial.clear();
        self.touch();
    }

    #[inline]
    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

impl Default for GraphModel {
    fn default() -> Self {
        Self::new(GraphKind::Directed)
    }
}

fn finite_or_zero(v: f32) -> f32 {
    if v.is_finite() { v } else { 0.0 }
}
