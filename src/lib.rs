//! DS Viz - WASM Module
//!
//! Interaction and invariant engine for the data-structure visualizers:
//! graphs, binary trees, binary heaps and linked lists on a pannable,
//! zoomable canvas. Compiled to WebAssembly and exposed to JavaScript via
//! wasm-bindgen; the host forwards pointer/wheel events and draws the
//! frames it gets back.
//!
//! # Architecture
//!
//! - `viewport`: screen <-> world transform, pan and zoom
//! - `graph`: node/edge model on petgraph's StableGraph, cycle detection
//! - `spatial`: R-tree over node centres for hit testing and placement
//! - `layout`: collision-aware placement and structural tree layout
//! - `heap`: array-backed binary heap with step playback
//! - `structures`: binary tree and linked list built on the graph model
//! - `drag`: pointer gesture state machine
//! - `frame`: per-frame render snapshot

use js_sys::Float32Array;
use serde::Serialize;
use wasm_bindgen::prelude::*;

pub mod canvas;
pub mod config;
pub mod drag;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod graph;
pub mod heap;
pub mod layout;
pub mod session;
pub mod spatial;
pub mod structures;
pub mod viewport;

use config::VizConfig;
use drag::{PointerEvent, WheelEvent};
use geometry::Point;
use graph::{EdgeId, GraphKind, GraphModel, NodeId, Side};
use heap::{AnimatedHeap, HeapMode};
use layout::{Direction, LayoutEngine, PlacementRequest};
use session::Session;
use structures::{BinaryTree, LinkedList};

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    web_sys::console::log_1(&JsValue::from_str("dsviz: wasm module ready"));
}

// =============================================================================
// Shared helpers
// =============================================================================

/// Decode an optional JS config object; `undefined`/`null` means defaults.
fn load_config(config: JsValue) -> Result<VizConfig, JsError> {
    let config: VizConfig = if config.is_undefined() || config.is_null() {
        VizConfig::default()
    } else {
        serde_wasm_bindgen::from_value(config).map_err(|e| JsError::new(&e.to_string()))?
    };
    config.validate()?;
    Ok(config)
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsError> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsError::new(&e.to_string()))
}

fn decode_pointer(event: JsValue) -> Result<PointerEvent, JsError> {
    serde_wasm_bindgen::from_value(event)
        .map_err(|e| JsError::new(&format!("bad pointer event: {e}")))
}

fn parse_direction(direction: &str) -> Result<Direction, JsError> {
    match direction {
        "up" => Ok(Direction::Up),
        "down" => Ok(Direction::Down),
        "left" => Ok(Direction::Left),
        "right" => Ok(Direction::Right),
        other => Err(JsError::new(&format!("unknown direction '{other}'"))),
    }
}

fn parse_side(side: &str) -> Result<Side, JsError> {
    match side {
        "left" => Ok(Side::Left),
        "right" => Ok(Side::Right),
        other => Err(JsError::new(&format!("unknown side '{other}'"))),
    }
}

fn parse_mode(mode: &str) -> Result<HeapMode, JsError> {
    match mode {
        "min" => Ok(HeapMode::Min),
        "max" => Ok(HeapMode::Max),
        other => Err(JsError::new(&format!("unknown heap mode '{other}'"))),
    }
}

/// Flat [x0, y0, x1, y1, ...] world positions of every drawn node.
fn scene_positions<M: canvas::CanvasModel>(model: &M) -> Float32Array {
    let positions: Vec<f32> = model
        .scene()
        .nodes
        .iter()
        .flat_map(|n| [n.position.x, n.position.y])
        .collect();
    Float32Array::from(&positions[..])
}

// =============================================================================
// GraphVisualizer
// =============================================================================

/// Free-form directed or undirected graph with live cycle highlighting.
#[wasm_bindgen]
pub struct GraphVisualizer {
    session: Session<GraphModel>,
    placement: LayoutEngine,
    seed: Point,
}

#[wasm_bindgen]
impl GraphVisualizer {
    /// Create a graph visualizer. `config` is optional.
    #[wasm_bindgen(constructor)]
    pub fn new(directed: bool, config: JsValue) -> Result<GraphVisualizer, JsError> {
        let config = load_config(config)?;
        let kind = if directed { GraphKind::Directed } else { GraphKind::Undirected };
        let mut visualizer = Self {
            session: Session::new(GraphModel::new(kind), config.viewport),
            placement: LayoutEngine::new(config.placement),
            seed: config.seed.as_ref().map(|s| s.position).unwrap_or(Point::ORIGIN),
        };
        if let Some(seed) = config.seed {
            visualizer.session.create_root(&visualizer.placement, seed.position, seed.label);
        }
        Ok(visualizer)
    }

    // =========================================================================
    // Node Operations
    // =========================================================================

    /// Add a node at the seed position (or beside it when taken).
    #[wasm_bindgen(js_name = createRoot)]
    pub fn create_root(&mut self, label: String) -> u32 {
        self.session.create_root(&self.placement, self.seed, label).raw()
    }

    /// Add a node at a world position.
    #[wasm_bindgen(js_name = addNode)]
    pub fn add_node(&mut self, x: f32, y: f32, label: String) -> u32 {
        self.session.model_mut().add_node(Point::new(x, y), label).raw()
    }

    /// Add a node under a screen point (double-click).
    #[wasm_bindgen(js_name = addNodeAtScreen)]
    pub fn add_node_at_screen(
        &mut self,
        screen_x: f32,
        screen_y: f32,
        label: String,
    ) -> Option<u32> {
        self.session
            .add_node_at_screen(Point::new(screen_x, screen_y), label)
            .map(NodeId::raw)
    }

    /// Add a node next to `source` in one of "up", "down", "left", "right".
    #[wasm_bindgen(js_name = addNodeInDirection)]
    pub fn add_node_in_direction(
        &mut self,
        source: u32,
        direction: &str,
        label: String,
    ) -> Result<u32, JsError> {
        let request = PlacementRequest::Direction(parse_direction(direction)?);
        let id = self.session.add_node_toward(&self.placement, NodeId(source), request, label)?;
        Ok(id.raw())
    }

    /// Add a node next to `source` along `angle` radians (+y is down).
    #[wasm_bindgen(js_name = addNodeAtAngle)]
    pub fn add_node_at_angle(
        &mut self,
        source: u32,
        angle: f32,
        label: String,
    ) -> Result<u32, JsError> {
        let request = PlacementRequest::Angle(angle);
        let id = self.session.add_node_toward(&self.placement, NodeId(source), request, label)?;
        Ok(id.raw())
    }

    /// Remove a node and its edges. Returns false if it did not exist.
    #[wasm_bindgen(js_name = removeNode)]
    pub fn remove_node(&mut self, node_id: u32) -> bool {
        self.session.model_mut().remove_node(NodeId(node_id))
    }

    #[wasm_bindgen(js_name = setNodePosition)]
    pub fn set_node_position(&mut self, node_id: u32, x: f32, y: f32) -> bool {
        self.session.model_mut().set_position(NodeId(node_id), Point::new(x, y))
    }

    #[wasm_bindgen(js_name = moveNode)]
    pub fn move_node(&mut self, node_id: u32, dx: f32, dy: f32) -> bool {
        self.session.model_mut().move_node(NodeId(node_id), Point::new(dx, dy))
    }

    #[wasm_bindgen(js_name = relabelNode)]
    pub fn relabel_node(&mut self, node_id: u32, label: String) -> bool {
        self.session.model_mut().relabel_node(NodeId(node_id), label)
    }

    #[wasm_bindgen(js_name = nodeCount)]
    pub fn node_count(&self) -> u32 {
        self.session.model().node_count() as u32
    }

    /// Node nearest to a screen point, within the hit radius.
    #[wasm_bindgen(js_name = findNodeAt)]
    pub fn find_node_at(&self, screen_x: f32, screen_y: f32) -> Option<u32> {
        self.session
            .node_at_screen(Point::new(screen_x, screen_y))
            .map(NodeId::raw)
    }

    /// World positions as [x0, y0, x1, y1, ...].
    #[wasm_bindgen(js_name = getNodePositions)]
    pub fn get_node_positions(&self) -> Float32Array {
        scene_positions(self.session.model())
    }

    // =========================================================================
    // Edge Operations
    // =========================================================================

    /// Connect two nodes. Returns the edge ID, or undefined when rejected
    /// (self-loop, unknown endpoint, duplicate).
    #[wasm_bindgen(js_name = addEdge)]
    pub fn add_edge(&mut self, source: u32, target: u32) -> Option<u32> {
        self.session
            .model_mut()
            .add_edge(NodeId(source), NodeId(target))
            .ok()
            .map(EdgeId::raw)
    }

    #[wasm_bindgen(js_name = removeEdge)]
    pub fn remove_edge(&mut self, edge_id: u32) -> bool {
        self.session.model_mut().remove_edge(EdgeId(edge_id))
    }

    #[wasm_bindgen(js_name = edgeCount)]
    pub fn edge_count(&self) -> u32 {
        self.session.model().edge_count() as u32
    }

    /// IDs of edges lying on a directed cycle, ascending.
    #[wasm_bindgen(js_name = getCycleEdges)]
    pub fn get_cycle_edges(&self) -> Vec<u32> {
        self.session.model().cycle_edges().iter().map(|e| e.raw()).collect()
    }

    #[wasm_bindgen(js_name = isOnCycle)]
    pub fn is_on_cycle(&self, edge_id: u32) -> bool {
        self.session.model().is_on_cycle(EdgeId(edge_id))
    }

    /// Remove all nodes and edges.
    pub fn clear(&mut self) {
        self.session.model_mut().clear();
    }

    // =========================================================================
    // Input / View
    // =========================================================================

    /// Feed a `{ kind, screen: {x, y}, target: { kind, id? } }` pointer event.
    /// Returns true when the frame changed.
    #[wasm_bindgen(js_name = handlePointer)]
    pub fn handle_pointer(&mut self, event: JsValue) -> Result<bool, JsError> {
        Ok(self.session.pointer(decode_pointer(event)?).changed())
    }

    #[wasm_bindgen(js_name = handleWheel)]
    pub fn handle_wheel(&mut self, screen_x: f32, screen_y: f32, delta_y: f32) -> bool {
        let event = WheelEvent {
            screen: Point::new(screen_x, screen_y),
            delta_y,
        };
        self.session.wheel(event).changed()
    }

    #[wasm_bindgen(js_name = zoomIn)]
    pub fn zoom_in(&mut self) {
        self.session.viewport_mut().zoom_in();
    }

    #[wasm_bindgen(js_name = zoomOut)]
    pub fn zoom_out(&mut self) {
        self.session.viewport_mut().zoom_out();
    }

    #[wasm_bindgen(js_name = resetView)]
    pub fn reset_view(&mut self) {
        self.session.viewport_mut().reset();
    }

    #[wasm_bindgen(js_name = fitToContent)]
    pub fn fit_to_content(&mut self, width: f32, height: f32, padding: f32) -> bool {
        self.session.fit_to_content(width, height, padding)
    }

    pub fn scale(&self) -> f32 {
        self.session.viewport().scale()
    }

    /// Everything to draw, in screen space.
    pub fn frame(&self) -> Result<JsValue, JsError> {
        to_js(&self.session.frame())
    }
}

// =============================================================================
// TreeVisualizer
// =============================================================================

/// Binary tree grown one child slot at a time.
#[wasm_bindgen]
pub struct TreeVisualizer {
    session: Session<BinaryTree>,
}

#[wasm_bindgen]
impl TreeVisualizer {
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<TreeVisualizer, JsError> {
        let config = load_config(config)?;
        Ok(Self {
            session: Session::new(BinaryTree::new(config.tree), config.viewport),
        })
    }

    /// Start a new tree (discarding the current one). Returns the root ID.
    #[wasm_bindgen(js_name = createRoot)]
    pub fn create_root(&mut self, label: Option<String>) -> u32 {
        self.session.model_mut().create_root(label).raw()
    }

    #[wasm_bindgen(js_name = rootId)]
    pub fn root_id(&self) -> Option<u32> {
        self.session.model().root().map(NodeId::raw)
    }

    /// Add a child in the "left" or "right" slot of `parent`.
    #[wasm_bindgen(js_name = addChild)]
    pub fn add_child(
        &mut self,
        parent: u32,
        side: &str,
        label: Option<String>,
    ) -> Result<u32, JsError> {
        let side = parse_side(side)?;
        let id = self.session.model_mut().add_child(NodeId(parent), side, label)?;
        Ok(id.raw())
    }

    #[wasm_bindgen(js_name = removeSubtree)]
    pub fn remove_subtree(&mut self, node_id: u32) -> bool {
        self.session.model_mut().remove_subtree(NodeId(node_id))
    }

    #[wasm_bindgen(js_name = relabelNode)]
    pub fn relabel_node(&mut self, node_id: u32, label: String) -> bool {
        self.session.model_mut().relabel(NodeId(node_id), label)
    }

    #[wasm_bindgen(js_name = nodeCount)]
    pub fn node_count(&self) -> u32 {
        self.session.model().len() as u32
    }

    #[wasm_bindgen(js_name = getNodePositions)]
    pub fn get_node_positions(&self) -> Float32Array {
        scene_positions(self.session.model())
    }

    #[wasm_bindgen(js_name = findNodeAt)]
    pub fn find_node_at(&self, screen_x: f32, screen_y: f32) -> Option<u32> {
        self.session
            .node_at_screen(Point::new(screen_x, screen_y))
            .map(NodeId::raw)
    }

    #[wasm_bindgen(js_name = handlePointer)]
    pub fn handle_pointer(&mut self, event: JsValue) -> Result<bool, JsError> {
        Ok(self.session.pointer(decode_pointer(event)?).changed())
    }

    #[wasm_bindgen(js_name = handleWheel)]
    pub fn handle_wheel(&mut self, screen_x: f32, screen_y: f32, delta_y: f32) -> bool {
        let event = WheelEvent {
            screen: Point::new(screen_x, screen_y),
            delta_y,
        };
        self.session.wheel(event).changed()
    }

    #[wasm_bindgen(js_name = zoomIn)]
    pub fn zoom_in(&mut self) {
        self.session.viewport_mut().zoom_in();
    }

    #[wasm_bindgen(js_name = zoomOut)]
    pub fn zoom_out(&mut self) {
        self.session.viewport_mut().zoom_out();
    }

    #[wasm_bindgen(js_name = resetView)]
    pub fn reset_view(&mut self) {
        self.session.viewport_mut().reset();
    }

    #[wasm_bindgen(js_name = fitToContent)]
    pub fn fit_to_content(&mut self, width: f32, height: f32, padding: f32) -> bool {
        self.session.fit_to_content(width, height, padding)
    }

    pub fn frame(&self) -> Result<JsValue, JsError> {
        to_js(&self.session.frame())
    }
}

// =============================================================================
// HeapVisualizer
// =============================================================================

/// Binary heap with animated insert / extract.
///
/// Mutations return immediately; the host then calls `tick()` and waits the
/// returned number of milliseconds between calls until it returns undefined.
#[wasm_bindgen]
pub struct HeapVisualizer {
    session: Session<AnimatedHeap>,
}

#[wasm_bindgen]
impl HeapVisualizer {
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<HeapVisualizer, JsError> {
        let config = load_config(config)?;
        let heap = AnimatedHeap::new(config.heap_mode, config.tree, config.playback)
            .seeded(config.heap_seed);
        Ok(Self {
            session: Session::new(heap, config.viewport),
        })
    }

    /// Insert comma-separated integers ("5, 3, 8"). Nothing is inserted if any
    /// token is invalid. Returns how many values were inserted.
    pub fn insert(&mut self, input: &str) -> Result<u32, JsError> {
        let count = self.session.model_mut().insert_input(input)?;
        Ok(count as u32)
    }

    /// Remove the root and return it; undefined when the heap is empty.
    #[wasm_bindgen(js_name = extractRoot)]
    pub fn extract_root(&mut self) -> Option<f64> {
        self.session.model_mut().extract_root().map(|v| v as f64)
    }

    /// Switch to "min" or "max", rebuilding by re-insertion.
    #[wasm_bindgen(js_name = setMode)]
    pub fn set_mode(&mut self, mode: &str) -> Result<(), JsError> {
        let mode = parse_mode(mode)?;
        self.session.model_mut().set_mode(mode);
        Ok(())
    }

    #[wasm_bindgen(js_name = toggleMode)]
    pub fn toggle_mode(&mut self) {
        self.session.model_mut().toggle_mode();
    }

    pub fn mode(&self) -> String {
        match self.session.model().mode() {
            HeapMode::Min => "min".to_string(),
            HeapMode::Max => "max".to_string(),
        }
    }

    /// Empty the heap and stop playback.
    pub fn clear(&mut self) {
        self.session.model_mut().clear();
    }

    /// Heap contents in array order (final state, not the animated one).
    pub fn values(&self) -> Vec<f64> {
        self.session.model().engine().values().iter().map(|&v| v as f64).collect()
    }

    /// Advance playback one step. Returns the delay before the next tick in
    /// milliseconds, or undefined when paused or finished.
    pub fn tick(&mut self) -> Option<u32> {
        self.session.model_mut().player_mut().tick()
    }

    pub fn pause(&mut self) {
        self.session.model_mut().player_mut().pause();
    }

    pub fn resume(&mut self) {
        self.session.model_mut().player_mut().resume();
    }

    /// Jump playback to the end.
    pub fn finish(&mut self) {
        self.session.model_mut().player_mut().finish();
    }

    #[wasm_bindgen(js_name = isAnimating)]
    pub fn is_animating(&self) -> bool {
        self.session.model().player().is_busy()
    }

    #[wasm_bindgen(js_name = getNodePositions)]
    pub fn get_node_positions(&self) -> Float32Array {
        scene_positions(self.session.model())
    }

    #[wasm_bindgen(js_name = handlePointer)]
    pub fn handle_pointer(&mut self, event: JsValue) -> Result<bool, JsError> {
        Ok(self.session.pointer(decode_pointer(event)?).changed())
    }

    #[wasm_bindgen(js_name = handleWheel)]
    pub fn handle_wheel(&mut self, screen_x: f32, screen_y: f32, delta_y: f32) -> bool {
        let event = WheelEvent {
            screen: Point::new(screen_x, screen_y),
            delta_y,
        };
        self.session.wheel(event).changed()
    }

    #[wasm_bindgen(js_name = zoomIn)]
    pub fn zoom_in(&mut self) {
        self.session.viewport_mut().zoom_in();
    }

    #[wasm_bindgen(js_name = zoomOut)]
    pub fn zoom_out(&mut self) {
        self.session.viewport_mut().zoom_out();
    }

    #[wasm_bindgen(js_name = resetView)]
    pub fn reset_view(&mut self) {
        self.session.viewport_mut().reset();
    }

    /// Frame including heap playback state.
    pub fn frame(&self) -> Result<JsValue, JsError> {
        let heap = self.session.model();
        to_js(&self.session.frame().with_heap(heap))
    }
}

// =============================================================================
// LinkedListVisualizer
// =============================================================================

/// Singly or doubly linked list laid out as a row.
#[wasm_bindgen]
pub struct LinkedListVisualizer {
    session: Session<LinkedList>,
}

#[wasm_bindgen]
impl LinkedListVisualizer {
    /// `doubly` overrides `config.list.doubly`.
    #[wasm_bindgen(constructor)]
    pub fn new(doubly: bool, config: JsValue) -> Result<LinkedListVisualizer, JsError> {
        let mut config = load_config(config)?;
        config.list.doubly = doubly;
        let mut list = LinkedList::new(config.list);
        if let Some(seed) = config.seed {
            list.push_back(Some(seed.label));
        }
        Ok(Self {
            session: Session::new(list, config.viewport),
        })
    }

    #[wasm_bindgen(js_name = pushFront)]
    pub fn push_front(&mut self, label: Option<String>) -> u32 {
        self.session.model_mut().push_front(label).raw()
    }

    #[wasm_bindgen(js_name = pushBack)]
    pub fn push_back(&mut self, label: Option<String>) -> u32 {
        self.session.model_mut().push_back(label).raw()
    }

    #[wasm_bindgen(js_name = insertAfter)]
    pub fn insert_after(&mut self, node_id: u32, label: Option<String>) -> Option<u32> {
        self.session
            .model_mut()
            .insert_after(NodeId(node_id), label)
            .map(NodeId::raw)
    }

    #[wasm_bindgen(js_name = insertBefore)]
    pub fn insert_before(&mut self, node_id: u32, label: Option<String>) -> Option<u32> {
        self.session
            .model_mut()
            .insert_before(NodeId(node_id), label)
            .map(NodeId::raw)
    }

    pub fn remove(&mut self, node_id: u32) -> bool {
        self.session.model_mut().remove(NodeId(node_id))
    }

    #[wasm_bindgen(js_name = relabelNode)]
    pub fn relabel_node(&mut self, node_id: u32, label: String) -> bool {
        self.session.model_mut().relabel(NodeId(node_id), label)
    }

    /// Node IDs from head to tail.
    pub fn order(&self) -> Vec<u32> {
        self.session.model().order().iter().map(|id| id.raw()).collect()
    }

    pub fn len(&self) -> u32 {
        self.session.model().len() as u32
    }

    #[wasm_bindgen(js_name = isEmpty)]
    pub fn is_empty(&self) -> bool {
        self.session.model().is_empty()
    }

    pub fn clear(&mut self) {
        self.session.model_mut().clear();
    }

    #[wasm_bindgen(js_name = getNodePositions)]
    pub fn get_node_positions(&self) -> Float32Array {
        scene_positions(self.session.model())
    }

    #[wasm_bindgen(js_name = handlePointer)]
    pub fn handle_pointer(&mut self, event: JsValue) -> Result<bool, JsError> {
        Ok(self.session.pointer(decode_pointer(event)?).changed())
    }

    #[wasm_bindgen(js_name = handleWheel)]
    pub fn handle_wheel(&mut self, screen_x: f32, screen_y: f32, delta_y: f32) -> bool {
        let event = WheelEvent {
            screen: Point::new(screen_x, screen_y),
            delta_y,
        };
        self.session.wheel(event).changed()
    }

    #[wasm_bindgen(js_name = zoomIn)]
    pub fn zoom_in(&mut self) {
        self.session.viewport_mut().zoom_in();
    }

    #[wasm_bindgen(js_name = zoomOut)]
    pub fn zoom_out(&mut self) {
        self.session.viewport_mut().zoom_out();
    }

    #[wasm_bindgen(js_name = resetView)]
    pub fn reset_view(&mut self) {
        self.session.viewport_mut().reset();
    }

    pub fn frame(&self) -> Result<JsValue, JsError> {
        to_js(&self.session.frame())
    }
}

#[cfg(test)]
mod integration_tests {
    use super::*;
    use crate::drag::{DragOutcome, PointerKind, PointerTarget};
    use crate::error::VizError;
    use crate::heap::PlaybackStatus;
    use crate::layout::PlacementConfig;
    use crate::structures::ListConfig;
    use crate::viewport::ViewportConfig;

    fn pointer(kind: PointerKind, x: f32, y: f32, target: PointerTarget) -> PointerEvent {
        PointerEvent::new(kind, Point::new(x, y), target)
    }

    /// Draw A->B->C->A plus D->E with connection gestures, with the view
    /// panned and zoomed, and check the highlighted edges in the frame.
    #[test]
    fn test_gesture_built_graph_highlights_cycle() {
        let mut session = Session::new(GraphModel::default(), ViewportConfig::default());
        session.viewport_mut().set_scale(2.0);
        session.viewport_mut().pan(Point::new(50.0, 0.0));

        let names = ["A", "B", "C", "D", "E"];
        let ids: Vec<NodeId> = names
            .iter()
            .enumerate()
            .map(|(i, name)| session.model_mut().add_node(Point::new(i as f32 * 100.0, 0.0), *name))
            .collect();

        let mut connect = |from: NodeId, to: NodeId| {
            let start = session.viewport().to_screen(session.model().position(from).unwrap());
            let end = session.viewport().to_screen(session.model().position(to).unwrap());
            session.pointer(pointer(
                PointerKind::Down,
                start.x,
                start.y,
                PointerTarget::ConnectionHandle(from),
            ));
            session.pointer(pointer(PointerKind::Move, end.x, end.y, PointerTarget::Canvas));
            session.pointer(pointer(PointerKind::Up, end.x, end.y, PointerTarget::Node(to)))
        };

        let ab = connect(ids[0], ids[1]);
        let bc = connect(ids[1], ids[2]);
        let ca = connect(ids[2], ids[0]);
        let de = connect(ids[3], ids[4]);
        let duplicate = connect(ids[0], ids[1]);

        let edge = |outcome: DragOutcome| match outcome {
            DragOutcome::Connected(e) => e,
            other => panic!("expected a connection, got {other:?}"),
        };
        let (ab, bc, ca, de) = (edge(ab), edge(bc), edge(ca), edge(de));
        assert_eq!(
            duplicate,
            DragOutcome::ConnectionRejected(VizError::DuplicateEdge { from: ids[0], to: ids[1] })
        );

        let frame = session.frame();
        assert_eq!(frame.edges.len(), 4);
        assert_eq!(frame.cycle_edge_ids(), vec![ab, bc, ca]);
        assert!(!frame.cycle_edge_ids().contains(&de));
        assert_eq!(frame.nodes[1].screen_position, Point::new(250.0, 0.0));
    }

    #[test]
    fn test_removing_cycle_node_clears_highlight() {
        let mut session = Session::new(GraphModel::default(), ViewportConfig::default());
        let placement = LayoutEngine::new(PlacementConfig::default());
        let a = session.create_root(&placement, Point::ORIGIN, "A");
        let b = session
            .add_node_toward(&placement, a, PlacementRequest::Direction(Direction::Right), "B")
            .unwrap();
        let c = session
            .add_node_toward(&placement, b, PlacementRequest::Direction(Direction::Down), "C")
            .unwrap();

        let model = session.model_mut();
        model.add_edge(a, b).unwrap();
        model.add_edge(b, c).unwrap();
        model.add_edge(c, a).unwrap();
        assert_eq!(session.frame().cycle_edge_ids().len(), 3);

        session.model_mut().remove_node(b);
        let frame = session.frame();
        assert_eq!(frame.edges.len(), 1);
        assert!(frame.cycle_edge_ids().is_empty());
    }

    #[test]
    fn test_dragging_node_moves_edge_geometry() {
        let mut session = Session::new(GraphModel::default(), ViewportConfig::default());
        let a = session.model_mut().add_node(Point::new(0.0, 0.0), "A");
        let b = session.model_mut().add_node(Point::new(200.0, 0.0), "B");
        session.model_mut().add_edge(a, b).unwrap();

        session.pointer(pointer(PointerKind::Down, 200.0, 0.0, PointerTarget::Node(b)));
        session.pointer(pointer(PointerKind::Move, 200.0, 150.0, PointerTarget::Canvas));
        session.pointer(pointer(PointerKind::Up, 200.0, 150.0, PointerTarget::Canvas));

        let frame = session.frame();
        assert_eq!(frame.edges[0].screen_path[1], Point::new(200.0, 150.0));
        assert_eq!(session.viewport().offset(), Point::ORIGIN);
    }

    /// Insert 5, 3, 8, 1 into an empty max-heap one at a time, play every
    /// animation to the end, then extract the root.
    #[test]
    fn test_heap_end_to_end() {
        let mut session = Session::new(
            AnimatedHeap::new(HeapMode::Max, Default::default(), Default::default()),
            ViewportConfig::default(),
        );

        for value in [5, 3, 8, 1] {
            session.model_mut().insert(value);
            let mut ticks = 0;
            while let Some(delay) = session.model_mut().player_mut().tick() {
                assert!(delay > 0);
                ticks += 1;
            }
            assert!(ticks >= 1);
            assert_eq!(session.model().player().status(), PlaybackStatus::Idle);
        }
        assert_eq!(session.model().engine().values(), &[8, 3, 5, 1]);

        let frame = session.frame().with_heap(session.model());
        let labels: Vec<&str> = frame.nodes.iter().map(|n| n.label.as_str()).collect();
        assert_eq!(labels, vec!["8", "3", "5", "1"]);
        assert_eq!(frame.edges.len(), 3);

        assert_eq!(session.model_mut().extract_root(), Some(8));
        assert!(session.model().engine().is_valid_heap());
        assert_eq!(session.model().engine().len(), 3);
    }

    #[test]
    fn test_heap_rejects_bad_batch() {
        let mut heap = AnimatedHeap::new(HeapMode::Min, Default::default(), Default::default())
            .seeded(Some(50));
        assert_eq!(heap.insert_input(""), Err(VizError::EmptyInput));
        assert!(heap.insert_input("4, 2, nope").is_err());
        assert_eq!(heap.engine().values(), &[50]);
    }

    #[test]
    fn test_heap_canvas_pans_but_nodes_stay() {
        let mut session = Session::new(
            AnimatedHeap::new(HeapMode::Max, Default::default(), Default::default())
                .seeded(Some(1)),
            ViewportConfig::default(),
        );
        let outcome = session.pointer(pointer(
            PointerKind::Down,
            0.0,
            0.0,
            PointerTarget::Node(NodeId(0)),
        ));
        assert_eq!(outcome, DragOutcome::Ignored);

        session.pointer(pointer(PointerKind::Down, 10.0, 10.0, PointerTarget::Canvas));
        session.pointer(pointer(PointerKind::Move, 40.0, 10.0, PointerTarget::Canvas));
        session.pointer(pointer(PointerKind::Leave, 40.0, 10.0, PointerTarget::Canvas));
        assert_eq!(session.frame().nodes[0].screen_position, Point::new(30.0, 0.0));
    }

    #[test]
    fn test_tree_session() {
        let mut session = Session::new(
            BinaryTree::new(Default::default()),
            ViewportConfig::default(),
        );
        let root = session.model_mut().create_root(None);
        let left = session.model_mut().add_child(root, Side::Left, None).unwrap();
        session.model_mut().add_child(left, Side::Right, None).unwrap();
        assert!(matches!(
            session.model_mut().add_child(root, Side::Left, None),
            Err(VizError::SlotOccupied { .. })
        ));

        let frame = session.frame();
        assert_eq!(frame.nodes.len(), 3);
        assert_eq!(frame.edges.len(), 2);
        assert!(frame.cycle_edge_ids().is_empty());
        assert_eq!(session.node_at_screen(Point::new(-100.0, 120.0)), Some(left));
    }

    #[test]
    fn test_linked_list_session() {
        let config = ListConfig {
            doubly: true,
            ..ListConfig::default()
        };
        let mut session = Session::new(LinkedList::new(config), ViewportConfig::default());
        let a = session.model_mut().push_back(None);
        let b = session.model_mut().push_back(None);
        session.model_mut().insert_after(a, Some("mid".into()));

        let frame = session.frame();
        assert_eq!(frame.nodes.len(), 3);
        assert_eq!(frame.edges.len(), 4);
        assert!(frame.cycle_edge_ids().is_empty());
        assert_eq!(session.model().labels(), vec!["1", "mid", "2"]);
        assert_eq!(session.model().node(b).unwrap().position, Point::new(240.0, 0.0));
    }

    #[test]
    fn test_default_config_builds_undirected_session() {
        let config = VizConfig::default();
        assert!(config.validate().is_ok());
        let mut session = Session::new(GraphModel::new(GraphKind::Undirected), config.viewport);
        assert_eq!(session.viewport().scale(), 1.0);

        let a = session.model_mut().add_node(Point::ORIGIN, "a");
        let b = session.model_mut().add_node(Point::new(100.0, 0.0), "b");
        session.model_mut().add_edge(a, b).unwrap();
        assert!(session.model_mut().add_edge(b, a).is_err());
        assert!(session.frame().cycle_edge_ids().is_empty());
    }
}
