//! Pure projection of editor state into draw primitives.
//!
//! The scene is rebuilt from the model and controller after each change
//! notification. Nothing here mutates anything: the host renders the
//! scene and resolves pointer positions back through [`hit_test`].

use agentdeck_editor::{CanvasController, InteractionState, PointerTarget, SelectionTarget};
use agentdeck_graph::{ConnectionId, GraphModel, Node, NodeId, NodeKind, Position, describe};

/// Width of a node box on the canvas.
pub const NODE_WIDTH: f64 = 160.0;
/// Height of a node box on the canvas.
pub const NODE_HEIGHT: f64 = 60.0;
/// Hit radius of a port anchor.
pub const PORT_RADIUS: f64 = 6.0;

/// A node box ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeView {
    pub id: NodeId,
    pub kind: NodeKind,
    pub label: &'static str,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub selected: bool,
    /// Number of input port anchors to draw on the left edge.
    pub inputs: usize,
    /// Number of output port anchors to draw on the right edge.
    pub outputs: usize,
}

/// A rendered connection path.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeView {
    pub id: ConnectionId,
    /// SVG-style cubic bezier path.
    pub path: String,
    pub selected: bool,
}

/// The connection being drawn, from its source port to the cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingEdgeView {
    pub path: String,
}

/// Advisory completeness indicator for the editor chrome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusView {
    pub complete: bool,
    pub issues: Vec<String>,
}

/// Everything the host needs to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub nodes: Vec<NodeView>,
    pub edges: Vec<EdgeView>,
    pub pending_edge: Option<PendingEdgeView>,
    pub status: StatusView,
    pub pan: (f64, f64),
    pub zoom: f64,
}

/// Anchor of an output port on the right edge of a node at `position`.
#[must_use]
pub fn output_anchor(position: Position, port: usize, outputs: usize) -> Position {
    let step = NODE_HEIGHT / (outputs.max(1) as f64 + 1.0);
    Position::new(
        position.x + NODE_WIDTH,
        position.y + step * (port as f64 + 1.0),
    )
}

/// Anchor of an input port on the left edge of a node at `position`.
#[must_use]
pub fn input_anchor(position: Position, port: usize, inputs: usize) -> Position {
    let step = NODE_HEIGHT / (inputs.max(1) as f64 + 1.0);
    Position::new(position.x, position.y + step * (port as f64 + 1.0))
}

/// Cubic bezier between two anchors, bulging horizontally.
#[must_use]
pub fn edge_path(from: Position, to: Position) -> String {
    let ctrl_offset = ((to.x - from.x).abs() / 2.0).max(50.0);
    format!(
        "M {} {} C {} {} {} {} {} {}",
        from.x,
        from.y,
        from.x + ctrl_offset,
        from.y,
        to.x - ctrl_offset,
        to.y,
        to.x,
        to.y
    )
}

/// Projects the current model and controller state into a scene.
#[must_use]
pub fn build(model: &GraphModel, controller: &CanvasController) -> Scene {
    let selection = controller.selection();

    let nodes = model
        .nodes()
        .map(|node| {
            let descriptor = describe(node.kind);
            NodeView {
                id: node.id.clone(),
                kind: node.kind,
                label: descriptor.label,
                x: node.position.x,
                y: node.position.y,
                width: NODE_WIDTH,
                height: NODE_HEIGHT,
                selected: selection == Some(&SelectionTarget::Node(node.id.clone())),
                inputs: descriptor.max_inputs,
                outputs: descriptor.max_outputs,
            }
        })
        .collect();

    let edges = model
        .connections()
        .filter_map(|connection| {
            let from = model.node(&connection.from_node)?;
            let to = model.node(&connection.to_node)?;
            let from_descriptor = describe(from.kind);
            let to_descriptor = describe(to.kind);
            let path = edge_path(
                output_anchor(
                    from.position,
                    connection.from_port,
                    from_descriptor.max_outputs,
                ),
                input_anchor(to.position, connection.to_port, to_descriptor.max_inputs),
            );
            Some(EdgeView {
                id: connection.id.clone(),
                path,
                selected: selection == Some(&SelectionTarget::Connection(connection.id.clone())),
            })
        })
        .collect();

    let pending_edge = match controller.state() {
        InteractionState::DrawingConnection {
            from_node,
            from_port,
            cursor,
        } => model.node(from_node).map(|node| {
            let outputs = describe(node.kind).max_outputs;
            PendingEdgeView {
                path: edge_path(output_anchor(node.position, *from_port, outputs), *cursor),
            }
        }),
        _ => None,
    };

    let report = model.validate();
    let viewport = controller.viewport();
    Scene {
        nodes,
        edges,
        pending_edge,
        status: StatusView {
            complete: report.is_complete,
            issues: report.messages(),
        },
        pan: viewport.pan,
        zoom: viewport.zoom,
    }
}

/// Resolves what the pointer at `position` is over.
///
/// Topmost node wins. Rendered connection paths report their own id from
/// the host's hitboxes, so only ports, node bodies, and bare canvas
/// resolve here.
#[must_use]
pub fn hit_test(model: &GraphModel, position: Position) -> PointerTarget {
    let nodes: Vec<&Node> = model.nodes().collect();
    for node in nodes.iter().rev() {
        let descriptor = describe(node.kind);
        for port in 0..descriptor.max_outputs {
            let anchor = output_anchor(node.position, port, descriptor.max_outputs);
            if distance(position, anchor) <= PORT_RADIUS {
                return PointerTarget::OutputPort(node.id.clone(), port);
            }
        }
        for port in 0..descriptor.max_inputs {
            let anchor = input_anchor(node.position, port, descriptor.max_inputs);
            if distance(position, anchor) <= PORT_RADIUS {
                return PointerTarget::InputPort(node.id.clone(), port);
            }
        }
        if position.x >= node.position.x
            && position.x <= node.position.x + NODE_WIDTH
            && position.y >= node.position.y
            && position.y <= node.position.y + NODE_HEIGHT
        {
            return PointerTarget::NodeBody(node.id.clone());
        }
    }
    PointerTarget::Canvas
}

fn distance(a: Position, b: Position) -> f64 {
    ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
}
