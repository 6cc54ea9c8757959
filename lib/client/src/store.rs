//! Backend store trait and HTTP implementation.
//!
//! [`WorkflowStore`] is the collaborator contract the editor persists to
//! and executes through; [`HttpWorkflowStore`] implements it with reqwest
//! against the platform API:
//!
//! - `GET /workflows`: listing
//! - `GET /workflows/{id}`: wire workflow
//! - `POST /workflows`: create, returns the assigned id
//! - `PUT /workflows/{id}`: update
//! - `POST /workflows/{id}/execute`: start execution
//! - `GET /executions/{id}`: execution status
//! - `GET /agents`: agent picker entries

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::wire::WireWorkflow;
use agentdeck_core::{AgentId, ExecutionId, WorkflowId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::debug;

/// Listing entry for a workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowSummary {
    pub id: WorkflowId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default, rename = "nodes_count")]
    pub node_count: usize,
    #[serde(default, rename = "connections_count")]
    pub connection_count: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_version() -> u32 {
    1
}

fn default_active() -> bool {
    true
}

/// Reference to a platform agent, for the agent-node picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentRef {
    pub id: AgentId,
    pub name: String,
}

/// Lifecycle state of a workflow execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionState {
    Pending,
    Running,
    Completed,
    Failed,
}

/// Status of a workflow execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionStatus {
    pub id: ExecutionId,
    pub status: ExecutionState,
    #[serde(default)]
    pub error: Option<String>,
}

/// The backend collaborator the editor persists to and executes through.
#[async_trait]
pub trait WorkflowStore: Send + Sync {
    /// Fetches a persisted workflow.
    async fn fetch_workflow(&self, id: &WorkflowId) -> Result<WireWorkflow, ClientError>;

    /// Creates a workflow and returns the assigned id.
    async fn create_workflow(&self, wire: &WireWorkflow) -> Result<WorkflowId, ClientError>;

    /// Updates an existing workflow.
    async fn update_workflow(
        &self,
        id: &WorkflowId,
        wire: &WireWorkflow,
    ) -> Result<(), ClientError>;

    /// Lists active workflows.
    async fn list_workflows(&self) -> Result<Vec<WorkflowSummary>, ClientError>;

    /// Starts an execution, with an optional input payload.
    async fn start_execution(
        &self,
        id: &WorkflowId,
        input: Option<&JsonValue>,
    ) -> Result<ExecutionId, ClientError>;

    /// Fetches the status of an execution.
    async fn fetch_execution(&self, id: &ExecutionId) -> Result<ExecutionStatus, ClientError>;

    /// Lists agents for the agent-node picker.
    async fn list_agents(&self) -> Result<Vec<AgentRef>, ClientError>;
}

#[derive(Debug, Deserialize)]
struct CreateWorkflowResponse {
    id: WorkflowId,
}

#[derive(Debug, Deserialize)]
struct ExecuteResponse {
    execution_id: ExecutionId,
}

/// reqwest-backed implementation of [`WorkflowStore`].
#[derive(Debug, Clone)]
pub struct HttpWorkflowStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpWorkflowStore {
    /// Builds a store from configuration.
    ///
    /// # Errors
    ///
    /// Returns `Transport` if the HTTP client cannot be constructed.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|error| ClientError::Transport {
                details: error.to_string(),
            })?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn transport(error: reqwest::Error) -> ClientError {
    ClientError::Transport {
        details: error.to_string(),
    }
}

fn decode(error: reqwest::Error) -> ClientError {
    ClientError::Decode {
        details: error.to_string(),
    }
}

/// Maps a non-success response to the error taxonomy, consuming the body
/// for detail text.
async fn check(
    response: reqwest::Response,
    workflow_id: Option<&WorkflowId>,
) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let details = response.text().await.unwrap_or_default();
    match (status, workflow_id) {
        (reqwest::StatusCode::NOT_FOUND, Some(id)) => Err(ClientError::NotFound {
            workflow_id: id.clone(),
        }),
        _ => Err(ClientError::UnexpectedStatus {
            status: status.as_u16(),
            details,
        }),
    }
}

#[async_trait]
impl WorkflowStore for HttpWorkflowStore {
    async fn fetch_workflow(&self, id: &WorkflowId) -> Result<WireWorkflow, ClientError> {
        let response = self
            .client
            .get(self.url(&format!("/workflows/{id}")))
            .send()
            .await
            .map_err(transport)?;
        let response = check(response, Some(id)).await?;
        debug!(workflow_id = %id, "workflow fetched");
        response.json().await.map_err(decode)
    }

    async fn create_workflow(&self, wire: &WireWorkflow) -> Result<WorkflowId, ClientError> {
        let response = self
            .client
            .post(self.url("/workflows"))
            .json(wire)
            .send()
            .await
            .map_err(transport)?;
        let response = check(response, None).await?;
        let body: CreateWorkflowResponse = response.json().await.map_err(decode)?;
        debug!(workflow_id = %body.id, "workflow created");
        Ok(body.id)
    }

    async fn update_workflow(
        &self,
        id: &WorkflowId,
        wire: &WireWorkflow,
    ) -> Result<(), ClientError> {
        let response = self
            .client
            .put(self.url(&format!("/workflows/{id}")))
            .json(wire)
            .send()
            .await
            .map_err(transport)?;
        check(response, Some(id)).await?;
        debug!(workflow_id = %id, "workflow updated");
        Ok(())
    }

    async fn list_workflows(&self) -> Result<Vec<WorkflowSummary>, ClientError> {
        let response = self
            .client
            .get(self.url("/workflows"))
            .send()
            .await
            .map_err(transport)?;
        let response = check(response, None).await?;
        response.json().await.map_err(decode)
    }

    async fn start_execution(
        &self,
        id: &WorkflowId,
        input: Option<&JsonValue>,
    ) -> Result<ExecutionId, ClientError> {
        let mut request = self
            .client
            .post(self.url(&format!("/workflows/{id}/execute")));
        if let Some(input) = input {
            request = request.json(&serde_json::json!({ "input": input }));
        }
        let response = request.send().await.map_err(transport)?;
        let status = response.status();
        if status.is_client_error() {
            // The backend re-validated and said no; this is not a
            // transport problem.
            let details = response.text().await.unwrap_or_default();
            return Err(ClientError::ExecutionRejected {
                workflow_id: id.clone(),
                details,
            });
        }
        let response = check(response, Some(id)).await?;
        let body: ExecuteResponse = response.json().await.map_err(decode)?;
        debug!(workflow_id = %id, execution_id = %body.execution_id, "execution started");
        Ok(body.execution_id)
    }

    async fn fetch_execution(&self, id: &ExecutionId) -> Result<ExecutionStatus, ClientError> {
        let response = self
            .client
            .get(self.url(&format!("/executions/{id}")))
            .send()
            .await
            .map_err(transport)?;
        let response = check(response, None).await?;
        response.json().await.map_err(decode)
    }

    async fn list_agents(&self) -> Result<Vec<AgentRef>, ClientError> {
        let response = self
            .client
            .get(self.url("/agents"))
            .send()
            .await
            .map_err(transport)?;
        let response = check(response, None).await?;
        response.json().await.map_err(decode)
    }
}
