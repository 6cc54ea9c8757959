//! Directed connections between node ports.

use crate::node::NodeId;
use serde::{Deserialize, Serialize};
use std::fmt;
use ulid::Ulid;

/// A unique identifier for a connection within a workflow.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(String);

impl ConnectionId {
    /// Mints a new unique connection id.
    #[must_use]
    pub fn generate() -> Self {
        Self(format!("conn_{}", Ulid::new()))
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A directed link from one node's output port to another node's input
/// port.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    /// Unique identifier within the workflow.
    pub id: ConnectionId,
    /// The source node.
    pub from_node: NodeId,
    /// The destination node.
    pub to_node: NodeId,
    /// Index of the output port on the source node.
    pub from_port: usize,
    /// Index of the input port on the destination node.
    pub to_port: usize,
}

impl Connection {
    /// Creates a connection with a freshly minted id.
    #[must_use]
    pub fn new(from_node: NodeId, to_node: NodeId, from_port: usize, to_port: usize) -> Self {
        Self {
            id: ConnectionId::generate(),
            from_node,
            to_node,
            from_port,
            to_port,
        }
    }

    /// The endpoint tuple that identifies a distinct edge.
    #[must_use]
    pub fn endpoints(&self) -> (&NodeId, usize, &NodeId, usize) {
        (&self.from_node, self.from_port, &self.to_node, self.to_port)
    }
}
