//! Wire schema for workflows.
//!
//! The JSON representation exchanged with the backend:
//!
//! ```json
//! {
//!   "id": "42",
//!   "name": "Triage inbox",
//!   "description": "",
//!   "nodes": [
//!     { "id": "node_…", "type": "start", "x": 80, "y": 80, "config": {} }
//!   ],
//!   "connections": [
//!     { "from": "node_…", "to": "node_…", "output_index": 0, "input_index": 0 }
//!   ]
//! }
//! ```
//!
//! Deserialization rebuilds the graph through the model's
//! invariant-checked operations, so data arriving from the network is
//! fully re-validated and a malformed document never yields a partial
//! workflow.

use agentdeck_core::WorkflowId;
use agentdeck_graph::{
    Connection, ConnectionViolation, GraphError, GraphModel, Node, NodeConfig, NodeId, NodeKind,
    Position, Workflow,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::fmt;
use std::str::FromStr;

/// A workflow as the backend stores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireWorkflow {
    /// Persisted id; omitted on create.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub nodes: Vec<WireNode>,
    #[serde(default)]
    pub connections: Vec<WireConnection>,
}

/// A node in the wire representation; positions are integers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireNode {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub x: i64,
    pub y: i64,
    #[serde(default = "empty_config")]
    pub config: JsonValue,
}

fn empty_config() -> JsonValue {
    JsonValue::Object(Map::new())
}

/// A directed connection in the wire representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireConnection {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub output_index: usize,
    #[serde(default)]
    pub input_index: usize,
}

/// Why a persisted workflow was rejected on load.
///
/// Persisted data is untrusted; a document that violates the structural
/// invariants is refused outright rather than silently repaired, which
/// could discard the user's data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedWorkflow {
    /// A connection references a node id absent from the node list.
    UnknownNode { node_id: String },
    /// Two nodes share the same id.
    DuplicateNodeId { node_id: String },
    /// A node names a kind that is not in the registry.
    UnknownKind { node_id: String, kind: String },
    /// A node's config does not fit its kind.
    NodeConfig { node_id: String, details: String },
    /// The document violates a structural invariant.
    Structure { details: String },
}

impl fmt::Display for MalformedWorkflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownNode { node_id } => {
                write!(
                    f,
                    "malformed workflow: connection references unknown node '{node_id}'"
                )
            }
            Self::DuplicateNodeId { node_id } => {
                write!(f, "malformed workflow: duplicate node id '{node_id}'")
            }
            Self::UnknownKind { node_id, kind } => {
                write!(
                    f,
                    "malformed workflow: node '{node_id}' has unknown kind '{kind}'"
                )
            }
            Self::NodeConfig { node_id, details } => {
                write!(
                    f,
                    "malformed workflow: node '{node_id}' has invalid config: {details}"
                )
            }
            Self::Structure { details } => write!(f, "malformed workflow: {details}"),
        }
    }
}

impl std::error::Error for MalformedWorkflow {}

/// Flattens a workflow into the wire schema, rounding node positions to
/// integers.
#[must_use]
pub fn serialize(workflow: &Workflow) -> WireWorkflow {
    let nodes = workflow
        .graph
        .nodes()
        .map(|node| {
            let (x, y) = node.position.rounded();
            WireNode {
                id: node.id.to_string(),
                kind: node.kind.as_str().to_string(),
                x,
                y,
                config: node.config.to_value(),
            }
        })
        .collect();
    let connections = workflow
        .graph
        .connections()
        .map(|connection| WireConnection {
            from: connection.from_node.to_string(),
            to: connection.to_node.to_string(),
            output_index: connection.from_port,
            input_index: connection.to_port,
        })
        .collect();
    WireWorkflow {
        id: workflow.id.as_ref().map(ToString::to_string),
        name: workflow.name.clone(),
        description: workflow.description.clone(),
        nodes,
        connections,
    }
}

/// Rebuilds a workflow from its wire representation.
///
/// # Errors
///
/// Fails with [`MalformedWorkflow`] when the document violates any
/// structural invariant; no partial workflow is returned.
pub fn deserialize(wire: &WireWorkflow) -> Result<Workflow, MalformedWorkflow> {
    let mut graph = GraphModel::new();

    for wire_node in &wire.nodes {
        let kind =
            NodeKind::from_str(&wire_node.kind).map_err(|_| MalformedWorkflow::UnknownKind {
                node_id: wire_node.id.clone(),
                kind: wire_node.kind.clone(),
            })?;
        let config = NodeConfig::from_value(kind, &wire_node.config).map_err(|error| {
            MalformedWorkflow::NodeConfig {
                node_id: wire_node.id.clone(),
                details: error.to_string(),
            }
        })?;
        let position = Position::new(wire_node.x as f64, wire_node.y as f64);
        let node = Node::with_id(NodeId::from(wire_node.id.as_str()), kind, position, config);
        graph.insert_node(node).map_err(|error| match error {
            GraphError::DuplicateNode { node_id } => MalformedWorkflow::DuplicateNodeId {
                node_id: node_id.to_string(),
            },
            other => MalformedWorkflow::Structure {
                details: other.to_string(),
            },
        })?;
    }

    for wire_connection in &wire.connections {
        let connection = Connection::new(
            NodeId::from(wire_connection.from.as_str()),
            NodeId::from(wire_connection.to.as_str()),
            wire_connection.output_index,
            wire_connection.input_index,
        );
        graph.insert_connection(connection).map_err(|error| match error {
            GraphError::InvalidConnection(ConnectionViolation::EndpointMissing { node_id }) => {
                MalformedWorkflow::UnknownNode {
                    node_id: node_id.to_string(),
                }
            }
            other => MalformedWorkflow::Structure {
                details: other.to_string(),
            },
        })?;
    }

    let id = match &wire.id {
        Some(raw) => Some(
            WorkflowId::from_str(raw).map_err(|error| MalformedWorkflow::Structure {
                details: error.to_string(),
            })?,
        ),
        None => None,
    };

    let mut workflow = Workflow::new(wire.name.clone()).with_description(wire.description.clone());
    workflow.id = id;
    workflow.graph = graph;
    Ok(workflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentdeck_graph::NodeKind;
    use serde_json::json;
    use std::collections::HashSet;

    fn sample_workflow() -> Workflow {
        let mut workflow = Workflow::new("Escalation").with_description("route urgent tickets");
        workflow.id = Some("31".parse().expect("workflow id"));
        let start = workflow
            .graph
            .add_node(NodeKind::Start, Position::new(80.4, 80.6), None)
            .expect("start");
        let decision = workflow
            .graph
            .add_node(NodeKind::Decision, Position::new(280.0, 80.0), None)
            .expect("decision");
        let agent = workflow
            .graph
            .add_node(NodeKind::Agent, Position::new(480.0, 40.0), None)
            .expect("agent");
        let end = workflow
            .graph
            .add_node(NodeKind::End, Position::new(480.0, 160.0), None)
            .expect("end");
        workflow
            .graph
            .update_node_config(&decision, &json!({ "condition": "priority == 'urgent'" }))
            .expect("decision config");
        workflow.graph.connect(&start, &decision).expect("edge");
        workflow
            .graph
            .add_connection(&decision, &agent, 0, 0)
            .expect("edge");
        workflow
            .graph
            .add_connection(&decision, &end, 1, 0)
            .expect("edge");
        workflow
    }

    #[test]
    fn roundtrip_preserves_structure() {
        let workflow = sample_workflow();
        let wire = serialize(&workflow);
        let restored = deserialize(&wire).expect("deserialize");

        assert_eq!(restored.id, workflow.id);
        assert_eq!(restored.name, workflow.name);
        assert_eq!(restored.description, workflow.description);
        assert_eq!(restored.graph.node_count(), workflow.graph.node_count());

        for node in workflow.graph.nodes() {
            let restored_node = restored.graph.node(&node.id).expect("node survives");
            assert_eq!(restored_node.kind, node.kind);
            assert_eq!(restored_node.config, node.config);
            // Positions come back integer-rounded.
            let (x, y) = node.position.rounded();
            assert_eq!(restored_node.position, Position::new(x as f64, y as f64));
        }

        let endpoints = |workflow: &Workflow| -> HashSet<(String, usize, String, usize)> {
            workflow
                .graph
                .connections()
                .map(|c| {
                    (
                        c.from_node.to_string(),
                        c.from_port,
                        c.to_node.to_string(),
                        c.to_port,
                    )
                })
                .collect()
        };
        assert_eq!(endpoints(&restored), endpoints(&workflow));
    }

    #[test]
    fn serialize_omits_absent_id() {
        let workflow = Workflow::new("Unsaved");
        let wire = serialize(&workflow);
        assert_eq!(wire.id, None);
        let json = serde_json::to_value(&wire).expect("to json");
        assert!(json.get("id").is_none());
    }

    #[test]
    fn port_indices_default_to_zero() {
        let raw = json!({
            "name": "Defaults",
            "description": "",
            "nodes": [
                { "id": "a", "type": "start", "x": 0, "y": 0, "config": {} },
                { "id": "b", "type": "agent", "x": 100, "y": 0, "config": {} }
            ],
            "connections": [ { "from": "a", "to": "b" } ]
        });
        let wire: WireWorkflow = serde_json::from_value(raw).expect("decode");
        assert_eq!(wire.connections[0].output_index, 0);
        assert_eq!(wire.connections[0].input_index, 0);
        let workflow = deserialize(&wire).expect("deserialize");
        assert_eq!(workflow.graph.connection_count(), 1);
    }

    #[test]
    fn missing_config_defaults_to_empty_object() {
        let raw = json!({
            "name": "No config",
            "nodes": [ { "id": "a", "type": "end", "x": 3, "y": 4 } ],
            "connections": []
        });
        let wire: WireWorkflow = serde_json::from_value(raw).expect("decode");
        let workflow = deserialize(&wire).expect("deserialize");
        assert_eq!(
            workflow.graph.node(&NodeId::from("a")).expect("node").kind,
            NodeKind::End
        );
    }

    #[test]
    fn dangling_connection_is_rejected() {
        let wire = WireWorkflow {
            id: None,
            name: "Broken".to_string(),
            description: String::new(),
            nodes: vec![WireNode {
                id: "a".to_string(),
                kind: "start".to_string(),
                x: 0,
                y: 0,
                config: json!({}),
            }],
            connections: vec![WireConnection {
                from: "a".to_string(),
                to: "x".to_string(),
                output_index: 0,
                input_index: 0,
            }],
        };
        let result = deserialize(&wire);
        assert_eq!(
            result.unwrap_err(),
            MalformedWorkflow::UnknownNode {
                node_id: "x".to_string(),
            }
        );
    }

    #[test]
    fn duplicate_node_ids_are_rejected() {
        let node = WireNode {
            id: "dup".to_string(),
            kind: "agent".to_string(),
            x: 0,
            y: 0,
            config: json!({}),
        };
        let wire = WireWorkflow {
            id: None,
            name: "Broken".to_string(),
            description: String::new(),
            nodes: vec![node.clone(), node],
            connections: Vec::new(),
        };
        assert_eq!(
            deserialize(&wire).unwrap_err(),
            MalformedWorkflow::DuplicateNodeId {
                node_id: "dup".to_string(),
            }
        );
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let wire = WireWorkflow {
            id: None,
            name: "Broken".to_string(),
            description: String::new(),
            nodes: vec![WireNode {
                id: "a".to_string(),
                kind: "tool".to_string(),
                x: 0,
                y: 0,
                config: json!({}),
            }],
            connections: Vec::new(),
        };
        assert!(matches!(
            deserialize(&wire).unwrap_err(),
            MalformedWorkflow::UnknownKind { .. }
        ));
    }

    #[test]
    fn second_start_node_is_rejected() {
        let wire = WireWorkflow {
            id: None,
            name: "Broken".to_string(),
            description: String::new(),
            nodes: vec![
                WireNode {
                    id: "s1".to_string(),
                    kind: "start".to_string(),
                    x: 0,
                    y: 0,
                    config: json!({}),
                },
                WireNode {
                    id: "s2".to_string(),
                    kind: "start".to_string(),
                    x: 10,
                    y: 10,
                    config: json!({}),
                },
            ],
            connections: Vec::new(),
        };
        assert!(matches!(
            deserialize(&wire).unwrap_err(),
            MalformedWorkflow::Structure { .. }
        ));
    }

    #[test]
    fn config_type_violation_is_rejected() {
        let wire = WireWorkflow {
            id: None,
            name: "Broken".to_string(),
            description: String::new(),
            nodes: vec![WireNode {
                id: "a".to_string(),
                kind: "agent".to_string(),
                x: 0,
                y: 0,
                config: json!({ "agent_id": 99 }),
            }],
            connections: Vec::new(),
        };
        assert!(matches!(
            deserialize(&wire).unwrap_err(),
            MalformedWorkflow::NodeConfig { .. }
        ));
    }
}
