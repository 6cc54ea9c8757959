//! The persisted workflow aggregate.
//!
//! A workflow is a named graph of nodes and connections: the unit of
//! persistence and execution. The graph model inside it owns all node and
//! connection state.

use crate::model::{GraphModel, ValidationReport};
use agentdeck_core::WorkflowId;

/// A named workflow under edit.
#[derive(Debug, Default)]
pub struct Workflow {
    /// Backend-assigned identifier; `None` until the first save.
    pub id: Option<WorkflowId>,
    /// Human-readable name.
    pub name: String,
    /// Description of what this workflow does.
    pub description: String,
    /// The node/connection graph.
    pub graph: GraphModel,
}

impl Workflow {
    /// Creates an empty, unsaved workflow.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: String::new(),
            graph: GraphModel::new(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Whether this workflow has been persisted.
    #[must_use]
    pub fn is_saved(&self) -> bool {
        self.id.is_some()
    }

    /// Runs the advisory completeness check on the graph.
    #[must_use]
    pub fn validate(&self) -> ValidationReport {
        self.graph.validate()
    }
}
