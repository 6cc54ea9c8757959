//! The authoritative in-memory workflow graph.
//!
//! `GraphModel` exclusively owns the nodes and connections of the workflow
//! being edited. Mutations are invariant-checked and atomic: they either
//! fully apply (and emit a [`GraphChange`]) or fail without touching the
//! graph. The model holds no temporal state; all interaction state lives
//! in the editor layer.
//!
//! Storage is a petgraph `StableDiGraph` with id→index lookup maps, so
//! single-item updates (notably `move_node`, called at pointer-move
//! frequency) touch exactly one weight and the maps stay valid across
//! removals.

use crate::config::NodeConfig;
use crate::connection::{Connection, ConnectionId};
use crate::error::{ConnectionViolation, GraphError};
use crate::event::GraphChange;
use crate::node::{Node, NodeId, Position};
use crate::registry::{self, NodeKind};
use petgraph::Direction;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use serde_json::Value as JsonValue;
use std::collections::{HashMap, HashSet};
use std::sync::mpsc::{self, Receiver, Sender};

/// The mutable workflow graph.
#[derive(Debug, Default)]
pub struct GraphModel {
    graph: StableDiGraph<Node, Connection>,
    node_lookup: HashMap<NodeId, NodeIndex>,
    connection_lookup: HashMap<ConnectionId, EdgeIndex>,
    subscribers: Vec<Sender<GraphChange>>,
}

impl GraphModel {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to change notifications.
    ///
    /// One event arrives per successful mutation; the receiver should be
    /// drained on every frame. Dropped receivers are pruned on the next
    /// emit.
    pub fn subscribe(&mut self) -> Receiver<GraphChange> {
        let (sender, receiver) = mpsc::channel();
        self.subscribers.push(sender);
        receiver
    }

    fn emit(&mut self, change: &GraphChange) {
        self.subscribers
            .retain(|subscriber| subscriber.send(change.clone()).is_ok());
    }

    /// Adds a new node of `kind` at `position`.
    ///
    /// Uses the registry's default configuration when `config` is `None`.
    ///
    /// # Errors
    ///
    /// Fails with `DuplicateStart` if `kind` is `start` and the graph
    /// already has one, or `InvalidConfig` if an explicit config belongs
    /// to a different kind.
    pub fn add_node(
        &mut self,
        kind: NodeKind,
        position: Position,
        config: Option<NodeConfig>,
    ) -> Result<NodeId, GraphError> {
        let config = config.unwrap_or_else(|| registry::describe(kind).default_config());
        self.insert_node(Node::new(kind, position, config))
    }

    /// Inserts a fully formed node, preserving its id.
    ///
    /// The persistence layer loads through this, so persisted data is
    /// re-checked against the same invariants as live edits.
    ///
    /// # Errors
    ///
    /// Fails with `DuplicateNode` on id reuse, `DuplicateStart` on a
    /// second start node, or `InvalidConfig` on a kind/config mismatch.
    pub fn insert_node(&mut self, node: Node) -> Result<NodeId, GraphError> {
        if self.node_lookup.contains_key(&node.id) {
            return Err(GraphError::DuplicateNode { node_id: node.id });
        }
        if node.config.kind() != node.kind {
            return Err(GraphError::InvalidConfig {
                node_id: node.id.clone(),
                details: format!(
                    "configuration is for kind '{}', node is '{}'",
                    node.config.kind(),
                    node.kind
                ),
            });
        }
        if node.kind == NodeKind::Start && self.start_node().is_some() {
            return Err(GraphError::DuplicateStart);
        }

        let node_id = node.id.clone();
        let index = self.graph.add_node(node);
        self.node_lookup.insert(node_id.clone(), index);
        self.emit(&GraphChange::NodeAdded {
            node_id: node_id.clone(),
        });
        Ok(node_id)
    }

    /// Removes a node and, as a cascade, every connection incident to it.
    ///
    /// # Errors
    ///
    /// Fails with `NodeNotFound` if the id is unknown.
    pub fn remove_node(&mut self, node_id: &NodeId) -> Result<Node, GraphError> {
        let index = *self
            .node_lookup
            .get(node_id)
            .ok_or_else(|| GraphError::NodeNotFound {
                node_id: node_id.clone(),
            })?;

        let cascaded: Vec<ConnectionId> = self
            .graph
            .edges_directed(index, Direction::Outgoing)
            .chain(self.graph.edges_directed(index, Direction::Incoming))
            .map(|edge| edge.weight().id.clone())
            .collect();
        for connection_id in &cascaded {
            self.connection_lookup.remove(connection_id);
        }

        self.node_lookup.remove(node_id);
        let node = self
            .graph
            .remove_node(index)
            .ok_or_else(|| GraphError::NodeNotFound {
                node_id: node_id.clone(),
            })?;
        self.emit(&GraphChange::NodeRemoved {
            node_id: node_id.clone(),
            cascaded,
        });
        Ok(node)
    }

    /// Merges the fields of an object `patch` into the node's typed
    /// configuration.
    ///
    /// # Errors
    ///
    /// Fails with `NodeNotFound` if the id is unknown, or `InvalidConfig`
    /// if the patched value no longer fits the kind's shape (the node is
    /// left untouched).
    pub fn update_node_config(
        &mut self,
        node_id: &NodeId,
        patch: &JsonValue,
    ) -> Result<(), GraphError> {
        let index = *self
            .node_lookup
            .get(node_id)
            .ok_or_else(|| GraphError::NodeNotFound {
                node_id: node_id.clone(),
            })?;
        {
            let node = self
                .graph
                .node_weight_mut(index)
                .ok_or_else(|| GraphError::NodeNotFound {
                    node_id: node_id.clone(),
                })?;
            let merged = node
                .config
                .merged(patch)
                .map_err(|error| GraphError::InvalidConfig {
                    node_id: node_id.clone(),
                    details: error.to_string(),
                })?;
            node.config = merged;
        }
        self.emit(&GraphChange::NodeConfigUpdated {
            node_id: node_id.clone(),
        });
        Ok(())
    }

    /// Updates a node's position.
    ///
    /// Called at pointer-move frequency: one weight update, no structural
    /// validation.
    ///
    /// # Errors
    ///
    /// Fails with `NodeNotFound` if the id is unknown.
    pub fn move_node(&mut self, node_id: &NodeId, position: Position) -> Result<(), GraphError> {
        let index = *self
            .node_lookup
            .get(node_id)
            .ok_or_else(|| GraphError::NodeNotFound {
                node_id: node_id.clone(),
            })?;
        if let Some(node) = self.graph.node_weight_mut(index) {
            node.position = position;
        }
        self.emit(&GraphChange::NodeMoved {
            node_id: node_id.clone(),
        });
        Ok(())
    }

    /// Adds a connection between two ports after validating the
    /// structural invariants.
    ///
    /// # Errors
    ///
    /// Fails with `InvalidConnection` carrying the violated rule; the
    /// graph is unchanged.
    pub fn add_connection(
        &mut self,
        from_node: &NodeId,
        to_node: &NodeId,
        from_port: usize,
        to_port: usize,
    ) -> Result<ConnectionId, GraphError> {
        self.insert_connection(Connection::new(
            from_node.clone(),
            to_node.clone(),
            from_port,
            to_port,
        ))
    }

    /// Adds a connection on the default (first) ports.
    ///
    /// # Errors
    ///
    /// Same as [`GraphModel::add_connection`].
    pub fn connect(
        &mut self,
        from_node: &NodeId,
        to_node: &NodeId,
    ) -> Result<ConnectionId, GraphError> {
        self.add_connection(from_node, to_node, 0, 0)
    }

    /// Inserts a fully formed connection, preserving its id.
    ///
    /// Validation order: endpoints exist, no self-loop, port indices in
    /// range, no duplicate endpoint pair, destination port not occupied
    /// (for kinds accepting a single inbound edge per port).
    ///
    /// # Errors
    ///
    /// Fails with `InvalidConnection` carrying the violated rule.
    pub fn insert_connection(&mut self, connection: Connection) -> Result<ConnectionId, GraphError> {
        let from_index = *self.node_lookup.get(&connection.from_node).ok_or_else(|| {
            GraphError::InvalidConnection(ConnectionViolation::EndpointMissing {
                node_id: connection.from_node.clone(),
            })
        })?;
        let to_index = *self.node_lookup.get(&connection.to_node).ok_or_else(|| {
            GraphError::InvalidConnection(ConnectionViolation::EndpointMissing {
                node_id: connection.to_node.clone(),
            })
        })?;

        if connection.from_node == connection.to_node {
            return Err(GraphError::InvalidConnection(ConnectionViolation::SelfLoop {
                node_id: connection.from_node.clone(),
            }));
        }

        let from_descriptor = registry::describe(self.graph[from_index].kind);
        let to_descriptor = registry::describe(self.graph[to_index].kind);
        if connection.from_port >= from_descriptor.max_outputs {
            return Err(GraphError::InvalidConnection(
                ConnectionViolation::SourcePortOutOfRange {
                    node_id: connection.from_node.clone(),
                    port: connection.from_port,
                    max_outputs: from_descriptor.max_outputs,
                },
            ));
        }
        if connection.to_port >= to_descriptor.max_inputs {
            return Err(GraphError::InvalidConnection(
                ConnectionViolation::TargetPortOutOfRange {
                    node_id: connection.to_node.clone(),
                    port: connection.to_port,
                    max_inputs: to_descriptor.max_inputs,
                },
            ));
        }

        let duplicate = self
            .graph
            .edges_directed(to_index, Direction::Incoming)
            .any(|edge| {
                let existing = edge.weight();
                existing.from_node == connection.from_node
                    && existing.from_port == connection.from_port
                    && existing.to_port == connection.to_port
            });
        if duplicate {
            return Err(GraphError::InvalidConnection(ConnectionViolation::Duplicate));
        }

        if to_descriptor.max_inputs == 1 {
            let occupied = self
                .graph
                .edges_directed(to_index, Direction::Incoming)
                .any(|edge| edge.weight().to_port == connection.to_port);
            if occupied {
                return Err(GraphError::InvalidConnection(
                    ConnectionViolation::TargetPortOccupied {
                        node_id: connection.to_node.clone(),
                        port: connection.to_port,
                    },
                ));
            }
        }

        let connection_id = connection.id.clone();
        let edge_index = self.graph.add_edge(from_index, to_index, connection);
        self.connection_lookup
            .insert(connection_id.clone(), edge_index);
        self.emit(&GraphChange::ConnectionAdded {
            connection_id: connection_id.clone(),
        });
        Ok(connection_id)
    }

    /// Removes a connection.
    ///
    /// # Errors
    ///
    /// Fails with `ConnectionNotFound` if the id is unknown.
    pub fn remove_connection(
        &mut self,
        connection_id: &ConnectionId,
    ) -> Result<Connection, GraphError> {
        let index = self.connection_lookup.remove(connection_id).ok_or_else(|| {
            GraphError::ConnectionNotFound {
                connection_id: connection_id.clone(),
            }
        })?;
        let connection =
            self.graph
                .remove_edge(index)
                .ok_or_else(|| GraphError::ConnectionNotFound {
                    connection_id: connection_id.clone(),
                })?;
        self.emit(&GraphChange::ConnectionRemoved {
            connection_id: connection_id.clone(),
        });
        Ok(connection)
    }

    /// Returns a node by id.
    #[must_use]
    pub fn node(&self, node_id: &NodeId) -> Option<&Node> {
        let index = self.node_lookup.get(node_id)?;
        self.graph.node_weight(*index)
    }

    /// Returns a connection by id.
    #[must_use]
    pub fn connection(&self, connection_id: &ConnectionId) -> Option<&Connection> {
        let index = self.connection_lookup.get(connection_id)?;
        self.graph.edge_weight(*index)
    }

    /// Returns all nodes in the graph.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.graph.node_weights()
    }

    /// Returns all connections in the graph.
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.graph.edge_weights()
    }

    /// Returns the number of nodes in the graph.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of connections in the graph.
    #[must_use]
    pub fn connection_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns the start node, if one exists.
    #[must_use]
    pub fn start_node(&self) -> Option<&Node> {
        self.nodes().find(|node| node.kind == NodeKind::Start)
    }

    fn start_index(&self) -> Option<NodeIndex> {
        self.graph
            .node_indices()
            .find(|&index| self.graph[index].kind == NodeKind::Start)
    }

    /// Checks the soft completeness invariant without mutating anything.
    ///
    /// A graph is complete when it has a start node and every other node
    /// is reachable from it along connection direction. Advisory only: an
    /// incomplete graph can still be edited, saved, and handed to the
    /// backend.
    #[must_use]
    pub fn validate(&self) -> ValidationReport {
        let mut issues = Vec::new();
        match self.start_index() {
            None => issues.push(ValidationIssue::NoStartNode),
            Some(start) => {
                let mut reached = HashSet::new();
                let mut dfs = petgraph::visit::Dfs::new(&self.graph, start);
                while let Some(index) = dfs.next(&self.graph) {
                    reached.insert(index);
                }
                for index in self.graph.node_indices() {
                    if !reached.contains(&index) {
                        let node = &self.graph[index];
                        issues.push(ValidationIssue::UnreachableNode {
                            node_id: node.id.clone(),
                            kind: node.kind,
                        });
                    }
                }
            }
        }
        ValidationReport {
            is_complete: issues.is_empty(),
            issues,
        }
    }
}

/// The advisory result of checking the soft completeness invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// True when the graph has a start node and every other node is
    /// reachable from it.
    pub is_complete: bool,
    /// Issues found, one per offending node.
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// Renders the issues as human-readable strings.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.issues.iter().map(ToString::to_string).collect()
    }
}

/// A single completeness issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    /// The graph has no start node.
    NoStartNode,
    /// The node cannot be reached from the start node.
    UnreachableNode { node_id: NodeId, kind: NodeKind },
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoStartNode => write!(f, "workflow has no start node"),
            Self::UnreachableNode { node_id, kind } => {
                write!(
                    f,
                    "{kind} node '{node_id}' is not reachable from the start node"
                )
            }
        }
    }
}
