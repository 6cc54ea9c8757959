//! Error types for the backend client.
//!
//! The taxonomy keeps failure classes the console must react to
//! differently apart: transport problems are retryable notices, malformed
//! data refuses the editor, and an execution rejection points back at the
//! advisory validation issues.

use crate::wire::MalformedWorkflow;
use agentdeck_core::WorkflowId;
use std::fmt;

/// Errors from backend communication and wire conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The request never produced a usable response.
    Transport { details: String },
    /// The backend answered with an unexpected status.
    UnexpectedStatus { status: u16, details: String },
    /// The requested workflow does not exist.
    NotFound { workflow_id: WorkflowId },
    /// A response body could not be decoded.
    Decode { details: String },
    /// Persisted workflow data violates the graph's structural
    /// invariants.
    Malformed { details: String },
    /// The backend refused to execute the workflow.
    ExecutionRejected {
        workflow_id: WorkflowId,
        details: String,
    },
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport { details } => {
                write!(f, "backend request failed: {details}")
            }
            Self::UnexpectedStatus { status, details } => {
                write!(f, "unexpected status {status} from backend: {details}")
            }
            Self::NotFound { workflow_id } => {
                write!(f, "workflow not found: {workflow_id}")
            }
            Self::Decode { details } => {
                write!(f, "failed to decode backend response: {details}")
            }
            Self::Malformed { details } => {
                write!(f, "malformed workflow data: {details}")
            }
            Self::ExecutionRejected {
                workflow_id,
                details,
            } => {
                write!(f, "execution of workflow {workflow_id} rejected: {details}")
            }
        }
    }
}

impl std::error::Error for ClientError {}

impl From<MalformedWorkflow> for ClientError {
    fn from(error: MalformedWorkflow) -> Self {
        Self::Malformed {
            details: error.to_string(),
        }
    }
}
