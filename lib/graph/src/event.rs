//! Change notifications emitted by the graph model.
//!
//! Subscribers receive one event per successful mutation and redraw from
//! the model's current state. There is no implicit re-render trigger: the
//! model tells, the shell pulls.

use crate::connection::ConnectionId;
use crate::node::NodeId;

/// A single successful mutation of the graph model.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphChange {
    /// A node was added.
    NodeAdded { node_id: NodeId },
    /// A node's position changed (emitted at drag frequency).
    NodeMoved { node_id: NodeId },
    /// A node's configuration changed.
    NodeConfigUpdated { node_id: NodeId },
    /// A node and every connection incident to it were removed.
    NodeRemoved {
        node_id: NodeId,
        /// The connections removed by the cascade.
        cascaded: Vec<ConnectionId>,
    },
    /// A connection was added.
    ConnectionAdded { connection_id: ConnectionId },
    /// A connection was removed.
    ConnectionRemoved { connection_id: ConnectionId },
}
