//! Node palette for the editor toolbar.

use agentdeck_graph::{GraphError, GraphModel, NodeId, NodeKind, Position, describe};

const GRID_ORIGIN: (f64, f64) = (80.0, 80.0);
const GRID_X_STEP: f64 = 200.0;
const GRID_Y_STEP: f64 = 120.0;
const GRID_COLUMNS: usize = 3;

/// One toolbar entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteEntry {
    /// The kind this entry spawns.
    pub kind: NodeKind,
    /// Toolbar label.
    pub label: &'static str,
}

/// Returns the palette entries in toolbar order.
#[must_use]
pub fn entries() -> Vec<PaletteEntry> {
    NodeKind::ALL
        .iter()
        .map(|&kind| PaletteEntry {
            kind,
            label: describe(kind).label,
        })
        .collect()
}

/// Default position for the next spawned node.
///
/// New nodes step through a left-to-right grid so they never stack on
/// top of each other.
#[must_use]
pub fn default_position(existing_nodes: usize) -> Position {
    let column = existing_nodes % GRID_COLUMNS;
    let row = existing_nodes / GRID_COLUMNS;
    Position::new(
        GRID_ORIGIN.0 + column as f64 * GRID_X_STEP,
        GRID_ORIGIN.1 + row as f64 * GRID_Y_STEP,
    )
}

/// Adds a node of `kind` at the next grid position with its default
/// configuration.
///
/// # Errors
///
/// Propagates `DuplicateStart` when a second start node is requested.
pub fn spawn(model: &mut GraphModel, kind: NodeKind) -> Result<NodeId, GraphError> {
    model.add_node(kind, default_position(model.node_count()), None)
}
