//! Node types for the workflow canvas.

use crate::config::NodeConfig;
use crate::registry::NodeKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use ulid::Ulid;

/// A unique identifier for a node within a workflow.
///
/// Fresh ids are minted as `node_<ulid>`; ids loaded from persisted data
/// are preserved verbatim, whatever the backend stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Mints a new unique node id.
    #[must_use]
    pub fn generate() -> Self {
        Self(format!("node_{}", Ulid::new()))
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A position on the canvas, in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Position {
    /// Creates a position.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Clamps both coordinates to non-negative values.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            x: self.x.max(0.0),
            y: self.y.max(0.0),
        }
    }

    /// Rounds to the nearest integer coordinates (the wire representation).
    #[must_use]
    pub fn rounded(self) -> (i64, i64) {
        (self.x.round() as i64, self.y.round() as i64)
    }
}

/// A single step in a workflow graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Unique identifier within the workflow.
    pub id: NodeId,
    /// The node's kind; determines port cardinality and config shape.
    pub kind: NodeKind,
    /// Position on the canvas.
    pub position: Position,
    /// Kind-specific configuration.
    pub config: NodeConfig,
}

impl Node {
    /// Creates a node with a freshly minted id.
    #[must_use]
    pub fn new(kind: NodeKind, position: Position, config: NodeConfig) -> Self {
        Self::with_id(NodeId::generate(), kind, position, config)
    }

    /// Creates a node with a specific id (used when loading persisted
    /// data).
    #[must_use]
    pub fn with_id(id: NodeId, kind: NodeKind, position: Position, config: NodeConfig) -> Self {
        Self {
            id,
            kind,
            position,
            config,
        }
    }
}
