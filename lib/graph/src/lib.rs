//! Workflow graph model for the agentdeck console.
//!
//! This crate owns the design-time representation of a workflow:
//!
//! - **Registry**: the static catalogue of node kinds and port cardinalities
//! - **Model**: the invariant-checked node/connection store
//! - **Configs**: statically typed per-kind node configuration
//! - **Events**: change notifications consumed by the rendering shell
//! - **Workflow**: the persisted aggregate around the graph

pub mod config;
pub mod connection;
pub mod error;
pub mod event;
pub mod model;
pub mod node;
pub mod registry;
pub mod workflow;

pub use config::{AgentConfig, DecisionConfig, EndConfig, InputConfig, NodeConfig, StartConfig};
pub use connection::{Connection, ConnectionId};
pub use error::{ConnectionViolation, GraphError};
pub use event::GraphChange;
pub use model::{GraphModel, ValidationIssue, ValidationReport};
pub use node::{Node, NodeId, Position};
pub use registry::{NodeKind, NodeTypeDescriptor, UnknownKind, describe};
pub use workflow::Workflow;
