//! In-memory [`WorkflowStore`] for tests.

use crate::error::ClientError;
use crate::store::{
    AgentRef, ExecutionState, ExecutionStatus, WorkflowStore, WorkflowSummary,
};
use crate::wire::{WireConnection, WireNode, WireWorkflow};
use agentdeck_core::{ExecutionId, WorkflowId};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// A fake backend holding workflows and executions in maps.
pub(crate) struct InMemoryStore {
    workflows: Mutex<HashMap<String, WireWorkflow>>,
    executions: Mutex<HashMap<String, ExecutionStatus>>,
    next_id: AtomicU64,
    fail_saves: AtomicBool,
    reject_executions: AtomicBool,
}

impl InMemoryStore {
    pub(crate) fn new() -> Self {
        Self {
            workflows: Mutex::new(HashMap::new()),
            executions: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            fail_saves: AtomicBool::new(false),
            reject_executions: AtomicBool::new(false),
        }
    }

    /// Makes every subsequent save fail with a transport error.
    pub(crate) fn fail_saves(&self) {
        self.fail_saves.store(true, Ordering::SeqCst);
    }

    /// Makes every subsequent execution request a rejection.
    pub(crate) fn reject_executions(&self) {
        self.reject_executions.store(true, Ordering::SeqCst);
    }

    /// Stores a structurally broken document under `id`: its single
    /// connection references a node that is not in the node list.
    pub(crate) fn put_malformed(&self, id: &str) {
        let wire = WireWorkflow {
            id: Some(id.to_string()),
            name: "Broken".to_string(),
            description: String::new(),
            nodes: vec![WireNode {
                id: "a".to_string(),
                kind: "start".to_string(),
                x: 0,
                y: 0,
                config: serde_json::json!({}),
            }],
            connections: vec![WireConnection {
                from: "a".to_string(),
                to: "x".to_string(),
                output_index: 0,
                input_index: 0,
            }],
        };
        self.workflows
            .lock()
            .expect("lock")
            .insert(id.to_string(), wire);
    }

    fn transport() -> ClientError {
        ClientError::Transport {
            details: "injected failure".to_string(),
        }
    }
}

#[async_trait]
impl WorkflowStore for InMemoryStore {
    async fn fetch_workflow(&self, id: &WorkflowId) -> Result<WireWorkflow, ClientError> {
        self.workflows
            .lock()
            .expect("lock")
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| ClientError::NotFound {
                workflow_id: id.clone(),
            })
    }

    async fn create_workflow(&self, wire: &WireWorkflow) -> Result<WorkflowId, ClientError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(Self::transport());
        }
        let raw = self.next_id.fetch_add(1, Ordering::SeqCst).to_string();
        let mut stored = wire.clone();
        stored.id = Some(raw.clone());
        self.workflows
            .lock()
            .expect("lock")
            .insert(raw.clone(), stored);
        Ok(raw.parse().expect("workflow id"))
    }

    async fn update_workflow(
        &self,
        id: &WorkflowId,
        wire: &WireWorkflow,
    ) -> Result<(), ClientError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(Self::transport());
        }
        let mut workflows = self.workflows.lock().expect("lock");
        if !workflows.contains_key(id.as_str()) {
            return Err(ClientError::NotFound {
                workflow_id: id.clone(),
            });
        }
        let mut stored = wire.clone();
        stored.id = Some(id.to_string());
        workflows.insert(id.to_string(), stored);
        Ok(())
    }

    async fn list_workflows(&self) -> Result<Vec<WorkflowSummary>, ClientError> {
        let now = Utc::now();
        Ok(self
            .workflows
            .lock()
            .expect("lock")
            .values()
            .map(|wire| WorkflowSummary {
                id: wire
                    .id
                    .as_deref()
                    .unwrap_or_default()
                    .parse()
                    .expect("workflow id"),
                name: wire.name.clone(),
                description: Some(wire.description.clone()),
                version: 1,
                is_active: true,
                node_count: wire.nodes.len(),
                connection_count: wire.connections.len(),
                created_at: now,
                updated_at: now,
            })
            .collect())
    }

    async fn start_execution(
        &self,
        id: &WorkflowId,
        _input: Option<&JsonValue>,
    ) -> Result<ExecutionId, ClientError> {
        let known = self
            .workflows
            .lock()
            .expect("lock")
            .contains_key(id.as_str());
        if self.reject_executions.load(Ordering::SeqCst) || !known {
            return Err(ClientError::ExecutionRejected {
                workflow_id: id.clone(),
                details: "workflow failed server-side validation".to_string(),
            });
        }
        let raw = format!("exec_{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        let execution_id: ExecutionId = raw.parse().expect("execution id");
        self.executions.lock().expect("lock").insert(
            raw,
            ExecutionStatus {
                id: execution_id.clone(),
                status: ExecutionState::Pending,
                error: None,
            },
        );
        Ok(execution_id)
    }

    async fn fetch_execution(&self, id: &ExecutionId) -> Result<ExecutionStatus, ClientError> {
        self.executions
            .lock()
            .expect("lock")
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| ClientError::UnexpectedStatus {
                status: 404,
                details: "execution not found".to_string(),
            })
    }

    async fn list_agents(&self) -> Result<Vec<AgentRef>, ClientError> {
        Ok(vec![
            AgentRef {
                id: "agt_1".parse().expect("agent id"),
                name: "Researcher".to_string(),
            },
            AgentRef {
                id: "agt_2".parse().expect("agent id"),
                name: "Summarizer".to_string(),
            },
        ])
    }
}
