//! Backend persistence and execution client for the agentdeck workflow
//! editor.
//!
//! This crate owns everything that crosses the process boundary:
//!
//! - **Wire**: the JSON workflow schema, with structural re-validation on
//!   load
//! - **Store**: the backend collaborator trait and its reqwest
//!   implementation
//! - **Adapter**: load/save between [`agentdeck_graph::Workflow`] and the
//!   wire schema
//! - **Trigger**: execution hand-off for persisted workflows
//!
//! Network operations are async and independent of the interaction state
//! machine; the editor keeps handling pointer events while a request is
//! in flight.

pub mod adapter;
pub mod config;
pub mod error;
pub mod execution;
pub mod store;
pub mod wire;

#[cfg(test)]
pub(crate) mod testing;

pub use adapter::PersistenceAdapter;
pub use config::ClientConfig;
pub use error::ClientError;
pub use execution::ExecutionTrigger;
pub use store::{
    AgentRef, ExecutionState, ExecutionStatus, HttpWorkflowStore, WorkflowStore, WorkflowSummary,
};
pub use wire::{MalformedWorkflow, WireConnection, WireNode, WireWorkflow};
