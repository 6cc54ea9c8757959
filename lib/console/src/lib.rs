//! Host shell for the agentdeck workflow editor.
//!
//! This crate is the presentation layer over the editor core, kept
//! headless so it can be embedded and tested without a browser:
//!
//! - **Palette**: registry-driven toolbar entries and grid placement
//! - **Scene**: projection of model + controller state into draw
//!   primitives, plus hit-testing
//! - **Session**: one open workflow wired to its backend collaborators
//! - **Notices**: non-blocking notifications for the console chrome
//!
//! The shell holds read access only; every mutation goes through the
//! graph model's operations via the session and controller.

pub mod notice;
pub mod palette;
pub mod scene;
pub mod session;

pub use notice::Notice;
pub use palette::PaletteEntry;
pub use scene::{EdgeView, NodeView, PendingEdgeView, Scene, StatusView};
pub use session::{EditorSession, SessionError};
