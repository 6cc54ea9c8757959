//! Conversion between the in-memory model and the persisted
//! representation.
//!
//! The adapter is the only place the editor touches the backend for
//! load/save. `save` serializes the workflow it is handed before the
//! request goes out; edits made while a request is in flight belong to
//! the next save. On a failed save the in-memory graph is never rolled
//! back, so a retry keeps the user's edits.

use crate::error::ClientError;
use crate::store::{WorkflowStore, WorkflowSummary};
use crate::wire;
use agentdeck_core::WorkflowId;
use agentdeck_graph::Workflow;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Loads and saves workflows through the backend collaborator.
#[derive(Clone)]
pub struct PersistenceAdapter {
    store: Arc<dyn WorkflowStore>,
}

impl PersistenceAdapter {
    /// Creates an adapter over a backend store.
    #[must_use]
    pub fn new(store: Arc<dyn WorkflowStore>) -> Self {
        Self { store }
    }

    /// Loads a workflow, re-validating its structure.
    ///
    /// # Errors
    ///
    /// Fails with `Malformed` when the persisted data violates the graph
    /// invariants (the editor must refuse to open rather than silently
    /// repair), or with a transport-class error when the fetch fails.
    #[instrument(skip(self), fields(workflow_id = %id))]
    pub async fn load(&self, id: &WorkflowId) -> Result<Workflow, ClientError> {
        let wire = self.store.fetch_workflow(id).await?;
        let workflow = wire::deserialize(&wire)?;
        debug!(
            nodes = workflow.graph.node_count(),
            connections = workflow.graph.connection_count(),
            "workflow loaded"
        );
        Ok(workflow)
    }

    /// Persists the workflow as passed: create when unsaved, update
    /// otherwise.
    ///
    /// Returns the persisted id; the caller records it on the workflow.
    ///
    /// # Errors
    ///
    /// Propagates backend failures; the in-memory workflow is untouched.
    pub async fn save(&self, workflow: &Workflow) -> Result<WorkflowId, ClientError> {
        let wire = wire::serialize(workflow);
        match &workflow.id {
            Some(id) => {
                self.store.update_workflow(id, &wire).await?;
                info!(workflow_id = %id, "workflow updated");
                Ok(id.clone())
            }
            None => {
                let id = self.store.create_workflow(&wire).await?;
                info!(workflow_id = %id, "workflow created");
                Ok(id)
            }
        }
    }

    /// Lists workflows for the console's index view.
    ///
    /// # Errors
    ///
    /// Propagates backend failures.
    pub async fn list(&self) -> Result<Vec<WorkflowSummary>, ClientError> {
        self.store.list_workflows().await
    }
}
