//! Canvas interaction layer for the agentdeck workflow editor.
//!
//! This crate turns raw pointer events into graph mutations through an
//! explicit state machine:
//!
//! - **Input**: targeted pointer events and the capture seam
//! - **Controller**: drag, connect, select, delete, viewport
//!
//! The controller holds all transient UI state; the graph model it drives
//! stays a pure, invariant-checked data store.

pub mod controller;
pub mod input;

pub use controller::{CanvasController, InteractionState, SelectionTarget, Viewport};
pub use input::{NullCapture, PointerCapture, PointerEvent, PointerTarget};
