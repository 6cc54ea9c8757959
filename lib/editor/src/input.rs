//! Pointer input events and the capture seam.
//!
//! The host shell owns canvas geometry and hit-testing, so events arrive
//! here already resolved to a target. During a drag or connect session the
//! controller needs every move and release on the whole canvas, not just
//! those over the element where the gesture started; [`PointerCapture`]
//! abstracts the host's canvas-wide listener registration so the session
//! can be driven (and tested) without a real pointing device.

use agentdeck_graph::{ConnectionId, NodeId, Position};

/// What the pointer is over, as resolved by the host shell.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerTarget {
    /// Bare canvas.
    Canvas,
    /// The body of a node.
    NodeBody(NodeId),
    /// An indexed input port on a node.
    InputPort(NodeId, usize),
    /// An indexed output port on a node.
    OutputPort(NodeId, usize),
    /// A rendered connection path.
    Connection(ConnectionId),
}

/// A raw pointer event in canvas coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerEvent {
    /// Button pressed.
    Down {
        position: Position,
        target: PointerTarget,
    },
    /// Pointer moved.
    Move { position: Position },
    /// Button released.
    Up {
        position: Position,
        target: PointerTarget,
    },
    /// Escape or an explicit cancel affordance.
    Cancel,
}

/// Host-side registration of canvas-wide move/up listeners.
///
/// `capture` is invoked when a drag or connect session begins and
/// `release` when it ends, on every exit path including cancellation
/// and controller teardown, so listeners can never leak.
pub trait PointerCapture {
    /// Begin delivering canvas-wide move/up events.
    fn capture(&mut self);
    /// Stop delivering canvas-wide move/up events.
    fn release(&mut self);
}

/// A no-op capture for hosts that always deliver canvas-wide events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullCapture;

impl PointerCapture for NullCapture {
    fn capture(&mut self) {}
    fn release(&mut self) {}
}
