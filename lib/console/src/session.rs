//! The editor session: one open workflow and its collaborators.
//!
//! `EditorSession` wires the graph model, the interaction controller, and
//! the backend client together. Network operations are async and never
//! block pointer handling; their outcomes surface as notices. Dropping
//! the session tears everything down; an in-flight request's result is
//! simply ignored once the session is gone.

use crate::notice::Notice;
use crate::palette;
use crate::scene::{self, Scene};
use agentdeck_client::{
    AgentRef, ClientError, ExecutionTrigger, PersistenceAdapter, WorkflowStore,
};
use agentdeck_core::{ExecutionId, WorkflowId};
use agentdeck_editor::{CanvasController, PointerCapture, PointerEvent};
use agentdeck_graph::{GraphChange, NodeId, NodeKind, Workflow};
use rootcause::prelude::Report;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use std::sync::mpsc::Receiver;
use tracing::{debug, warn};

/// Errors that prevent an editor session from opening.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The persisted workflow is malformed. Opening is refused rather
    /// than silently repairing, since repair could discard the user's
    /// data.
    RefusedMalformed { details: String },
    /// The workflow could not be fetched.
    LoadFailed { details: String },
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RefusedMalformed { details } => {
                write!(f, "refusing to open malformed workflow: {details}")
            }
            Self::LoadFailed { details } => write!(f, "failed to load workflow: {details}"),
        }
    }
}

impl std::error::Error for SessionError {}

/// One open workflow editor.
pub struct EditorSession {
    workflow: Workflow,
    controller: CanvasController,
    adapter: PersistenceAdapter,
    trigger: ExecutionTrigger,
    store: Arc<dyn WorkflowStore>,
    changes: Receiver<GraphChange>,
    notices: VecDeque<Notice>,
}

impl EditorSession {
    /// Opens a session on a persisted workflow.
    ///
    /// # Errors
    ///
    /// Fails with `RefusedMalformed` when the persisted data violates
    /// the structural invariants, or `LoadFailed` when the fetch fails.
    pub async fn open(
        store: Arc<dyn WorkflowStore>,
        capture: Box<dyn PointerCapture>,
        id: &WorkflowId,
    ) -> Result<Self, Report<SessionError>> {
        let adapter = PersistenceAdapter::new(Arc::clone(&store));
        let workflow = match adapter.load(id).await {
            Ok(workflow) => workflow,
            Err(ClientError::Malformed { details }) => {
                warn!(workflow_id = %id, %details, "refusing to open malformed workflow");
                return Err(SessionError::RefusedMalformed { details }.into());
            }
            Err(error) => {
                return Err(SessionError::LoadFailed {
                    details: error.to_string(),
                }
                .into());
            }
        };
        Ok(Self::assemble(workflow, store, capture))
    }

    /// Starts a session on a new, unsaved workflow.
    #[must_use]
    pub fn create(
        name: impl Into<String>,
        store: Arc<dyn WorkflowStore>,
        capture: Box<dyn PointerCapture>,
    ) -> Self {
        Self::assemble(Workflow::new(name), store, capture)
    }

    fn assemble(
        mut workflow: Workflow,
        store: Arc<dyn WorkflowStore>,
        capture: Box<dyn PointerCapture>,
    ) -> Self {
        let changes = workflow.graph.subscribe();
        Self {
            workflow,
            controller: CanvasController::new(capture),
            adapter: PersistenceAdapter::new(Arc::clone(&store)),
            trigger: ExecutionTrigger::new(Arc::clone(&store)),
            store,
            changes,
            notices: VecDeque::new(),
        }
    }

    /// Read access to the open workflow.
    #[must_use]
    pub fn workflow(&self) -> &Workflow {
        &self.workflow
    }

    /// Read access to the interaction controller.
    #[must_use]
    pub fn controller(&self) -> &CanvasController {
        &self.controller
    }

    /// Feeds a pointer event through the interaction state machine.
    pub fn pointer(&mut self, event: PointerEvent) {
        self.controller.handle(&mut self.workflow.graph, event);
    }

    /// Adds a node from the palette at the next free grid position.
    ///
    /// Returns `None` when the graph rejects the node (a second start);
    /// the gesture has no visible effect.
    pub fn add_node(&mut self, kind: NodeKind) -> Option<NodeId> {
        match palette::spawn(&mut self.workflow.graph, kind) {
            Ok(node_id) => Some(node_id),
            Err(error) => {
                debug!(%error, "palette add discarded");
                None
            }
        }
    }

    /// Applies an inspector config patch to a node. Rejected patches are
    /// discarded without touching the node.
    pub fn update_config(&mut self, node_id: &NodeId, patch: &serde_json::Value) {
        if let Err(error) = self.workflow.graph.update_node_config(node_id, patch) {
            debug!(node = %node_id, %error, "config patch discarded");
        }
    }

    /// Deletes the current selection.
    pub fn delete_selection(&mut self) {
        if let Err(error) = self.controller.delete_selection(&mut self.workflow.graph) {
            debug!(%error, "delete discarded");
        }
    }

    /// Renames the workflow.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.workflow.name = name.into();
    }

    /// Updates the workflow description.
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.workflow.description = description.into();
    }

    /// Saves the workflow.
    ///
    /// On failure the graph keeps every edit and a notice is queued so
    /// the user can retry without re-entering anything.
    pub async fn save(&mut self) {
        match self.adapter.save(&self.workflow).await {
            Ok(id) => {
                self.workflow.id = Some(id.clone());
                self.notices.push_back(Notice::Saved { workflow_id: id });
            }
            Err(error) => {
                warn!(%error, "save failed");
                self.notices.push_back(Notice::SaveFailed {
                    details: error.to_string(),
                });
            }
        }
    }

    /// Hands the persisted workflow to the backend for execution.
    ///
    /// Returns the execution id on success. Rejections carry the current
    /// advisory issue list in their notice; transport failures surface
    /// separately.
    pub async fn execute(&mut self) -> Option<ExecutionId> {
        let Some(id) = self.workflow.id.clone() else {
            self.notices.push_back(Notice::SaveRequired);
            return None;
        };
        match self.trigger.execute(&id, None).await {
            Ok(execution_id) => {
                self.notices.push_back(Notice::ExecutionStarted {
                    execution_id: execution_id.clone(),
                });
                Some(execution_id)
            }
            Err(ClientError::ExecutionRejected { details, .. }) => {
                let issues = self.workflow.validate().messages();
                self.notices
                    .push_back(Notice::ExecutionRejected { details, issues });
                None
            }
            Err(error) => {
                warn!(%error, "execution request failed");
                self.notices.push_back(Notice::TransportFailure {
                    details: error.to_string(),
                });
                None
            }
        }
    }

    /// Agents available for the agent-node picker.
    ///
    /// Failures surface as a transport notice and an empty list.
    pub async fn available_agents(&mut self) -> Vec<AgentRef> {
        match self.store.list_agents().await {
            Ok(agents) => agents,
            Err(error) => {
                self.notices.push_back(Notice::TransportFailure {
                    details: error.to_string(),
                });
                Vec::new()
            }
        }
    }

    /// Drains pending change notifications (one per model mutation).
    pub fn drain_changes(&mut self) -> Vec<GraphChange> {
        self.changes.try_iter().collect()
    }

    /// Drains pending notices for the console chrome.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    /// Builds the current frame.
    #[must_use]
    pub fn scene(&self) -> Scene {
        scene::build(&self.workflow.graph, &self.controller)
    }
}
