//! CycleDetector - which edges currently lie on a directed cycle.
//!
//! Runs after every edge-set change. The traversal is the classic
//! three-colour DFS (white = unvisited, gray = on the recursion stack,
//! black = finished): an edge into a gray node is a back edge and proves a
//! cycle. The DFS alone only marks the edges it happens to walk, which
//! depends on visiting order, so once a back edge is found the flagged set
//! is closed over strongly connected components: an edge `u -> v` lies on
//! some cycle exactly when `u` and `v` share a component.
//!
//! Both passes are O(V + E).

use petgraph::algo::tarjan_scc;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableGraph};
use petgraph::visit::{EdgeRef, IntoEdgeReferences, NodeIndexable};
use petgraph::Directed;
use std::collections::BTreeSet;

use super::edge::EdgeId;
use super::node::Node;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    Gray,
    Black,
}

/// One level of the explicit DFS stack.
struct DfsFrame {
    node: NodeIndex,
    out: Vec<(EdgeIndex, NodeIndex)>,
    cursor: usize,
}

/// Result of a cycle scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Every edge lying on at least one directed cycle.
    pub cycle_edges: BTreeSet<EdgeId>,
    /// Back edges seen by the DFS, in traversal order.
    pub back_edges: Vec<EdgeId>,
}

impl CycleReport {
    pub fn has_cycle(&self) -> bool {
        !self.back_edges.is_empty()
    }
}

/// Stateless detector over the graph model's topology.
pub struct CycleDetector;

impl CycleDetector {
    /// Scan the graph. Edge weights are the stable edge ids.
    pub fn detect(graph: &StableGraph<Node, EdgeId, Directed>) -> CycleReport {
        let back_edges = Self::back_edges(graph);
        if back_edges.is_empty() {
            return CycleReport::default();
        }

        let mut component = vec![usize::MAX; graph.node_bound()];
        for (c, members) in tarjan_scc(graph).into_iter().enumerate() {
            for node in members {
                component[node.index()] = c;
            }
        }

        let cycle_edges = graph
            .edge_references()
            .filter(|e| e.source() != e.target())
            .filter(|e| component[e.source().index()] == component[e.target().index()])
            .map(|e| *e.weight())
            .collect();

        CycleReport {
            cycle_edges,
            back_edges: back_edges.into_iter().map(|e| graph[e]).collect(),
        }
    }

    /// Iterative three-colour DFS from every unvisited node.
    fn back_edges(graph: &StableGraph<Node, EdgeId, Directed>) -> Vec<EdgeIndex> {
        let outgoing = |n: NodeIndex| -> Vec<(EdgeIndex, NodeIndex)> {
            graph.edges(n).map(|e| (e.id(), e.target())).collect()
        };

        let mut color = vec![Color::White; graph.node_bound()];
        let mut back = Vec::new();

        for start in graph.node_indices() {
            if color[start.index()] != Color::White {
                continue;
            }
            color[start.index()] = Color::Gray;
            let mut stack = vec![DfsFrame {
                node: start,
                out: outgoing(start),
                cursor: 0,
            }];

            while let Some(frame) = stack.last_mut() {
                let next = frame.out.get(frame.cursor).copied();
                match next {
                    Some((edge, target)) => {
                        frame.cursor += 1;
                        match color[target.index()] {
                            Color::White => {
                                color[target.index()] = Color::Gray;
                                stack.push(DfsFrame {
                                    node: target,
                                    out: outgoing(target),
                                    cursor: 0,
                                });
                            }
                            Color::Gray => back.push(edge),
                            Color::Black => {}
                        }
                    }
                    None => {
                        color[frame.node.index()] = Color::Black;
                        stack.pop();
                    }
                }
            }
        }

        back
    }
}
