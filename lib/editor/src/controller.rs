//! The canvas interaction state machine.
//!
//! Translates pointer events into graph mutations. All transient editing
//! state lives here; the graph model itself stays a pure data store with
//! no temporal behavior. Rejected mutations (an invalid connection, a
//! node deleted mid-gesture) leave the graph untouched; the gesture
//! simply has no visible effect.

use crate::input::{PointerCapture, PointerEvent, PointerTarget};
use agentdeck_graph::{ConnectionId, GraphError, GraphModel, NodeId, Position};
use tracing::debug;

/// The current pointer interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionState {
    /// Nothing in progress.
    Idle,
    /// A node is being dragged. `grab_offset` is the vector from the
    /// node's origin to the pointer at press time, so the node does not
    /// jump under the cursor.
    DraggingNode {
        node_id: NodeId,
        grab_offset: (f64, f64),
    },
    /// A connection is being drawn from an output port; `cursor` tracks
    /// the live pointer position for the pending-edge projection.
    DrawingConnection {
        from_node: NodeId,
        from_port: usize,
        cursor: Position,
    },
}

/// The currently selected canvas element.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionTarget {
    /// A node is selected.
    Node(NodeId),
    /// A connection is selected.
    Connection(ConnectionId),
}

/// Transient view transform; never touches the graph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Canvas translation.
    pub pan: (f64, f64),
    /// Zoom factor, clamped to [`Viewport::MIN_ZOOM`]..[`Viewport::MAX_ZOOM`].
    pub zoom: f64,
}

impl Viewport {
    /// Smallest permitted zoom factor.
    pub const MIN_ZOOM: f64 = 0.25;
    /// Largest permitted zoom factor.
    pub const MAX_ZOOM: f64 = 4.0;

    /// Shifts the canvas translation.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan.0 += dx;
        self.pan.1 += dy;
    }

    /// Sets the zoom factor, clamped to the permitted range.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(Self::MIN_ZOOM, Self::MAX_ZOOM);
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            pan: (0.0, 0.0),
            zoom: 1.0,
        }
    }
}

/// The interaction controller for one open canvas.
pub struct CanvasController {
    state: InteractionState,
    selection: Option<SelectionTarget>,
    viewport: Viewport,
    capture: Box<dyn PointerCapture>,
}

impl CanvasController {
    /// Creates an idle controller over the given capture seam.
    #[must_use]
    pub fn new(capture: Box<dyn PointerCapture>) -> Self {
        Self {
            state: InteractionState::Idle,
            selection: None,
            viewport: Viewport::default(),
            capture,
        }
    }

    /// The current interaction state.
    #[must_use]
    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    /// The current selection, if any.
    #[must_use]
    pub fn selection(&self) -> Option<&SelectionTarget> {
        self.selection.as_ref()
    }

    /// The current viewport.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Mutable access to the viewport (pan/zoom affordances).
    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    /// Feeds one pointer event through the state machine.
    pub fn handle(&mut self, model: &mut GraphModel, event: PointerEvent) {
        match event {
            PointerEvent::Down { position, target } => self.on_down(model, position, target),
            PointerEvent::Move { position } => self.on_move(model, position),
            PointerEvent::Up { position: _, target } => self.on_up(model, target),
            PointerEvent::Cancel => self.cancel(),
        }
    }

    fn on_down(&mut self, model: &mut GraphModel, position: Position, target: PointerTarget) {
        if !matches!(self.state, InteractionState::Idle) {
            // Capture guarantees no second press reaches us mid-session.
            return;
        }
        match target {
            PointerTarget::NodeBody(node_id) => {
                let Some(node) = model.node(&node_id) else {
                    return;
                };
                let grab_offset = (
                    position.x - node.position.x,
                    position.y - node.position.y,
                );
                self.selection = Some(SelectionTarget::Node(node_id.clone()));
                self.state = InteractionState::DraggingNode {
                    node_id,
                    grab_offset,
                };
                self.capture.capture();
            }
            PointerTarget::OutputPort(from_node, from_port) => {
                if model.node(&from_node).is_some() {
                    self.state = InteractionState::DrawingConnection {
                        from_node,
                        from_port,
                        cursor: position,
                    };
                    self.capture.capture();
                }
            }
            PointerTarget::Connection(connection_id) => {
                self.selection = Some(SelectionTarget::Connection(connection_id));
            }
            PointerTarget::Canvas | PointerTarget::InputPort(..) => {
                self.selection = None;
            }
        }
    }

    fn on_move(&mut self, model: &mut GraphModel, position: Position) {
        match self.state.clone() {
            InteractionState::DraggingNode {
                node_id,
                grab_offset,
            } => {
                let target =
                    Position::new(position.x - grab_offset.0, position.y - grab_offset.1)
                        .clamped();
                if model.move_node(&node_id, target).is_err() {
                    debug!(node = %node_id, "dragged node vanished, ending drag");
                    self.end_session();
                }
            }
            InteractionState::DrawingConnection {
                from_node,
                from_port,
                ..
            } => {
                self.state = InteractionState::DrawingConnection {
                    from_node,
                    from_port,
                    cursor: position,
                };
            }
            InteractionState::Idle => {}
        }
    }

    fn on_up(&mut self, model: &mut GraphModel, target: PointerTarget) {
        match self.state.clone() {
            InteractionState::DraggingNode { .. } => self.end_session(),
            InteractionState::DrawingConnection {
                from_node,
                from_port,
                ..
            } => {
                if let PointerTarget::InputPort(to_node, to_port) = target {
                    match model.add_connection(&from_node, &to_node, from_port, to_port) {
                        Ok(connection_id) => {
                            debug!(connection = %connection_id, "connection created");
                        }
                        Err(error) => {
                            // Silently discarded: no partial edge, no dialog.
                            debug!(%error, "connection attempt discarded");
                        }
                    }
                }
                self.end_session();
            }
            InteractionState::Idle => {}
        }
    }

    /// Cancels any in-progress gesture without mutating the graph.
    pub fn cancel(&mut self) {
        self.end_session();
    }

    fn end_session(&mut self) {
        if !matches!(self.state, InteractionState::Idle) {
            self.capture.release();
            self.state = InteractionState::Idle;
        }
    }

    /// Selects a node or connection explicitly.
    pub fn select(&mut self, target: SelectionTarget) {
        self.selection = Some(target);
    }

    /// Clears the selection.
    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Deletes the current selection from the graph.
    ///
    /// # Errors
    ///
    /// Propagates `NodeNotFound`/`ConnectionNotFound` when the selected
    /// element has already gone; the selection is cleared either way.
    pub fn delete_selection(&mut self, model: &mut GraphModel) -> Result<(), GraphError> {
        match self.selection.take() {
            Some(SelectionTarget::Node(node_id)) => model.remove_node(&node_id).map(|_| ()),
            Some(SelectionTarget::Connection(connection_id)) => {
                model.remove_connection(&connection_id).map(|_| ())
            }
            None => Ok(()),
        }
    }
}

impl Drop for CanvasController {
    fn drop(&mut self) {
        // A torn-down editor must not leave host listeners registered.
        self.end_session();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::NullCapture;
    use agentdeck_graph::{ConnectionViolation, NodeKind};
    use std::cell::Cell;
    use std::rc::Rc;

    /// Counts capture/release balance for leak assertions.
    struct CountingCapture(Rc<Cell<i32>>);

    impl PointerCapture for CountingCapture {
        fn capture(&mut self) {
            self.0.set(self.0.get() + 1);
        }
        fn release(&mut self) {
            self.0.set(self.0.get() - 1);
        }
    }

    fn controller() -> CanvasController {
        CanvasController::new(Box::new(NullCapture))
    }

    fn counting_controller() -> (CanvasController, Rc<Cell<i32>>) {
        let count = Rc::new(Cell::new(0));
        (
            CanvasController::new(Box::new(CountingCapture(Rc::clone(&count)))),
            count,
        )
    }

    fn model_with_nodes(kinds: &[NodeKind]) -> (GraphModel, Vec<NodeId>) {
        let mut model = GraphModel::new();
        let ids = kinds
            .iter()
            .enumerate()
            .map(|(i, &kind)| {
                model
                    .add_node(kind, Position::new(i as f64 * 200.0, 100.0), None)
                    .expect("add node")
            })
            .collect();
        (model, ids)
    }

    fn press_body(controller: &mut CanvasController, model: &mut GraphModel, id: &NodeId, at: Position) {
        controller.handle(
            model,
            PointerEvent::Down {
                position: at,
                target: PointerTarget::NodeBody(id.clone()),
            },
        );
    }

    #[test]
    fn drag_applies_grab_offset() {
        let (mut model, ids) = model_with_nodes(&[NodeKind::Agent]);
        let mut controller = controller();
        // Node origin is (0, 100); grab it 10,5 inside the body.
        press_body(&mut controller, &mut model, &ids[0], Position::new(10.0, 105.0));
        controller.handle(
            &mut model,
            PointerEvent::Move {
                position: Position::new(60.0, 155.0),
            },
        );
        let node = model.node(&ids[0]).expect("node");
        assert_eq!(node.position, Position::new(50.0, 150.0));
    }

    #[test]
    fn drag_clamps_to_non_negative() {
        let (mut model, ids) = model_with_nodes(&[NodeKind::Agent]);
        let mut controller = controller();
        press_body(&mut controller, &mut model, &ids[0], Position::new(0.0, 100.0));
        controller.handle(
            &mut model,
            PointerEvent::Move {
                position: Position::new(-40.0, -40.0),
            },
        );
        let node = model.node(&ids[0]).expect("node");
        assert_eq!(node.position, Position::new(0.0, 0.0));
    }

    #[test]
    fn release_returns_to_idle() {
        let (mut model, ids) = model_with_nodes(&[NodeKind::Agent]);
        let (mut controller, count) = counting_controller();
        press_body(&mut controller, &mut model, &ids[0], Position::new(0.0, 100.0));
        assert!(matches!(
            controller.state(),
            InteractionState::DraggingNode { .. }
        ));
        assert_eq!(count.get(), 1);
        controller.handle(
            &mut model,
            PointerEvent::Up {
                position: Position::new(0.0, 100.0),
                target: PointerTarget::Canvas,
            },
        );
        assert_eq!(controller.state(), &InteractionState::Idle);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn connect_gesture_creates_connection() {
        let (mut model, ids) = model_with_nodes(&[NodeKind::Start, NodeKind::Agent]);
        let mut controller = controller();
        controller.handle(
            &mut model,
            PointerEvent::Down {
                position: Position::new(160.0, 130.0),
                target: PointerTarget::OutputPort(ids[0].clone(), 0),
            },
        );
        assert!(matches!(
            controller.state(),
            InteractionState::DrawingConnection { .. }
        ));
        controller.handle(
            &mut model,
            PointerEvent::Up {
                position: Position::new(200.0, 130.0),
                target: PointerTarget::InputPort(ids[1].clone(), 0),
            },
        );
        assert_eq!(controller.state(), &InteractionState::Idle);
        assert_eq!(model.connection_count(), 1);
    }

    #[test]
    fn rejected_connection_is_silently_discarded() {
        let (mut model, ids) = model_with_nodes(&[NodeKind::Start, NodeKind::Agent]);
        let mut controller = controller();
        // Occupy the agent's only input.
        model.connect(&ids[0], &ids[1]).expect("connect");
        controller.handle(
            &mut model,
            PointerEvent::Down {
                position: Position::default(),
                target: PointerTarget::OutputPort(ids[0].clone(), 0),
            },
        );
        controller.handle(
            &mut model,
            PointerEvent::Up {
                position: Position::default(),
                target: PointerTarget::InputPort(ids[1].clone(), 0),
            },
        );
        assert_eq!(controller.state(), &InteractionState::Idle);
        assert_eq!(model.connection_count(), 1);
    }

    #[test]
    fn release_over_canvas_discards_pending_connection() {
        let (mut model, ids) = model_with_nodes(&[NodeKind::Start]);
        let mut controller = controller();
        controller.handle(
            &mut model,
            PointerEvent::Down {
                position: Position::default(),
                target: PointerTarget::OutputPort(ids[0].clone(), 0),
            },
        );
        controller.handle(
            &mut model,
            PointerEvent::Up {
                position: Position::new(300.0, 300.0),
                target: PointerTarget::Canvas,
            },
        );
        assert_eq!(controller.state(), &InteractionState::Idle);
        assert_eq!(model.connection_count(), 0);
    }

    #[test]
    fn pending_connection_tracks_cursor() {
        let (mut model, ids) = model_with_nodes(&[NodeKind::Start]);
        let mut controller = controller();
        controller.handle(
            &mut model,
            PointerEvent::Down {
                position: Position::default(),
                target: PointerTarget::OutputPort(ids[0].clone(), 0),
            },
        );
        controller.handle(
            &mut model,
            PointerEvent::Move {
                position: Position::new(77.0, 33.0),
            },
        );
        match controller.state() {
            InteractionState::DrawingConnection { cursor, .. } => {
                assert_eq!(*cursor, Position::new(77.0, 33.0));
            }
            other => panic!("expected DrawingConnection, got {other:?}"),
        }
    }

    #[test]
    fn cancel_releases_capture_without_mutation() {
        let (mut model, ids) = model_with_nodes(&[NodeKind::Start]);
        let (mut controller, count) = counting_controller();
        controller.handle(
            &mut model,
            PointerEvent::Down {
                position: Position::default(),
                target: PointerTarget::OutputPort(ids[0].clone(), 0),
            },
        );
        controller.handle(&mut model, PointerEvent::Cancel);
        assert_eq!(controller.state(), &InteractionState::Idle);
        assert_eq!(count.get(), 0);
        assert_eq!(model.connection_count(), 0);
    }

    #[test]
    fn drop_mid_session_releases_capture() {
        let (mut model, ids) = model_with_nodes(&[NodeKind::Agent]);
        let (mut controller, count) = counting_controller();
        press_body(&mut controller, &mut model, &ids[0], Position::new(0.0, 100.0));
        assert_eq!(count.get(), 1);
        drop(controller);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn click_selects_and_canvas_click_clears() {
        let (mut model, ids) = model_with_nodes(&[NodeKind::Agent]);
        let mut controller = controller();
        press_body(&mut controller, &mut model, &ids[0], Position::new(0.0, 100.0));
        assert_eq!(
            controller.selection(),
            Some(&SelectionTarget::Node(ids[0].clone()))
        );
        controller.handle(
            &mut model,
            PointerEvent::Up {
                position: Position::new(0.0, 100.0),
                target: PointerTarget::NodeBody(ids[0].clone()),
            },
        );
        controller.handle(
            &mut model,
            PointerEvent::Down {
                position: Position::new(500.0, 500.0),
                target: PointerTarget::Canvas,
            },
        );
        assert_eq!(controller.selection(), None);
    }

    #[test]
    fn delete_selection_cascades() {
        let (mut model, ids) =
            model_with_nodes(&[NodeKind::Start, NodeKind::Agent, NodeKind::End]);
        model.connect(&ids[0], &ids[1]).expect("start -> agent");
        model.connect(&ids[1], &ids[2]).expect("agent -> end");
        let mut controller = controller();
        controller.select(SelectionTarget::Node(ids[1].clone()));
        controller.delete_selection(&mut model).expect("delete");
        assert_eq!(model.node_count(), 2);
        assert_eq!(model.connection_count(), 0);
        assert_eq!(controller.selection(), None);
    }

    #[test]
    fn connection_selection_deletes_only_the_edge() {
        let (mut model, ids) = model_with_nodes(&[NodeKind::Start, NodeKind::Agent]);
        let connection_id = model.connect(&ids[0], &ids[1]).expect("connect");
        let mut controller = controller();
        controller.handle(
            &mut model,
            PointerEvent::Down {
                position: Position::default(),
                target: PointerTarget::Connection(connection_id.clone()),
            },
        );
        controller.delete_selection(&mut model).expect("delete");
        assert_eq!(model.node_count(), 2);
        assert_eq!(model.connection_count(), 0);
    }

    #[test]
    fn self_loop_gesture_has_no_effect() {
        let (mut model, ids) = model_with_nodes(&[NodeKind::Agent]);
        let mut controller = controller();
        controller.handle(
            &mut model,
            PointerEvent::Down {
                position: Position::default(),
                target: PointerTarget::OutputPort(ids[0].clone(), 0),
            },
        );
        controller.handle(
            &mut model,
            PointerEvent::Up {
                position: Position::default(),
                target: PointerTarget::InputPort(ids[0].clone(), 0),
            },
        );
        assert_eq!(model.connection_count(), 0);
        // The violation is the self-loop rule specifically.
        let direct = model.add_connection(&ids[0], &ids[0], 0, 0);
        assert_eq!(
            direct,
            Err(GraphError::InvalidConnection(ConnectionViolation::SelfLoop {
                node_id: ids[0].clone(),
            }))
        );
    }

    #[test]
    fn viewport_zoom_is_clamped() {
        let mut controller = controller();
        controller.viewport_mut().set_zoom(10.0);
        assert_eq!(controller.viewport().zoom, Viewport::MAX_ZOOM);
        controller.viewport_mut().set_zoom(0.01);
        assert_eq!(controller.viewport().zoom, Viewport::MIN_ZOOM);
        controller.viewport_mut().pan_by(12.0, -4.0);
        assert_eq!(controller.viewport().pan, (12.0, -4.0));
    }
}
