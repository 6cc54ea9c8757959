//! User-facing notices from the editor session.
//!
//! Notices are non-blocking: they queue up for the console chrome to
//! render as transient toasts and never interrupt editing.

use agentdeck_core::{ExecutionId, WorkflowId};
use std::fmt;

/// A non-blocking notification for the console chrome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The workflow was saved.
    Saved { workflow_id: WorkflowId },
    /// A save failed; the in-memory graph keeps the edits for retry.
    SaveFailed { details: String },
    /// The workflow must be saved before it can be executed.
    SaveRequired,
    /// An execution was accepted by the backend.
    ExecutionStarted { execution_id: ExecutionId },
    /// The backend refused to run the workflow. The advisory issue list
    /// is attached so the user is pointed at what to fix rather than at
    /// the network.
    ExecutionRejected {
        details: String,
        issues: Vec<String>,
    },
    /// A backend request failed.
    TransportFailure { details: String },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Saved { workflow_id } => write!(f, "workflow {workflow_id} saved"),
            Self::SaveFailed { details } => write!(f, "save failed: {details}"),
            Self::SaveRequired => write!(f, "save the workflow before executing it"),
            Self::ExecutionStarted { execution_id } => {
                write!(f, "execution {execution_id} started")
            }
            Self::ExecutionRejected { details, issues } => {
                write!(f, "execution rejected: {details}")?;
                for issue in issues {
                    write!(f, "; {issue}")?;
                }
                Ok(())
            }
            Self::TransportFailure { details } => {
                write!(f, "backend request failed: {details}")
            }
        }
    }
}
