//! Execution hand-off for persisted workflows.

use crate::error::ClientError;
use crate::store::{ExecutionStatus, WorkflowStore};
use agentdeck_core::{ExecutionId, WorkflowId};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::{info, instrument};

/// Fires run requests for persisted workflows.
///
/// Stateless pass-through to the backend; never touches the graph model.
#[derive(Clone)]
pub struct ExecutionTrigger {
    store: Arc<dyn WorkflowStore>,
}

impl ExecutionTrigger {
    /// Creates a trigger over a backend store.
    #[must_use]
    pub fn new(store: Arc<dyn WorkflowStore>) -> Self {
        Self { store }
    }

    /// Starts a backend execution of a persisted workflow.
    ///
    /// # Errors
    ///
    /// Fails with `ExecutionRejected` when the backend refuses the
    /// workflow, surfaced distinctly from transport failures so the
    /// console can point at the advisory validation issues instead of
    /// implying a network problem.
    #[instrument(skip(self, input), fields(workflow_id = %workflow_id))]
    pub async fn execute(
        &self,
        workflow_id: &WorkflowId,
        input: Option<&JsonValue>,
    ) -> Result<ExecutionId, ClientError> {
        let execution_id = self.store.start_execution(workflow_id, input).await?;
        info!(execution_id = %execution_id, "execution started");
        Ok(execution_id)
    }

    /// Fetches the current status of an execution.
    ///
    /// # Errors
    ///
    /// Propagates backend failures.
    pub async fn status(&self, execution_id: &ExecutionId) -> Result<ExecutionStatus, ClientError> {
        self.store.fetch_execution(execution_id).await
    }
}
