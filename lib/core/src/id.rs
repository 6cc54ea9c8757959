//! Strongly-typed identifiers for backend-owned entities.
//!
//! Workflows, executions, and agents are minted by the platform backend;
//! the console only carries their identifiers. Each id is an opaque
//! non-empty string behind a newtype, so a workflow id can never be passed
//! where an execution id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error returned when parsing an ID from a string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    /// The type of ID that failed to parse.
    pub id_type: &'static str,
    /// The reason for the parse failure.
    pub reason: String,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse {}: {}", self.id_type, self.reason)
    }
}

impl std::error::Error for ParseIdError {}

/// Macro to generate a strongly-typed ID wrapper around a backend string.
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Returns the id as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                if s.is_empty() {
                    return Err(ParseIdError {
                        id_type: stringify!($name),
                        reason: "id is empty".to_string(),
                    });
                }
                if s.chars().any(char::is_whitespace) {
                    return Err(ParseIdError {
                        id_type: stringify!($name),
                        reason: "id contains whitespace".to_string(),
                    });
                }
                Ok(Self(s.to_string()))
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(
    /// Unique identifier for a workflow definition.
    WorkflowId
);

define_id!(
    /// Unique identifier for a single execution (run) of a workflow.
    ExecutionId
);

define_id!(
    /// Unique identifier for a platform agent.
    AgentId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_backend_ids() {
        let id: WorkflowId = "42".parse().expect("should parse");
        assert_eq!(id.as_str(), "42");
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn parse_rejects_empty() {
        let result: Result<WorkflowId, _> = "".parse();
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.id_type, "WorkflowId");
    }

    #[test]
    fn parse_rejects_whitespace() {
        let result: Result<ExecutionId, _> = "exec 1".parse();
        assert!(result.is_err());
    }

    #[test]
    fn id_equality() {
        let id1: AgentId = "agt_1".parse().expect("should parse");
        let id2: AgentId = "agt_1".parse().expect("should parse");
        assert_eq!(id1, id2);
    }

    #[test]
    fn id_hash() {
        use std::collections::HashSet;

        let id1: WorkflowId = "wf_1".parse().expect("should parse");
        let id2: WorkflowId = "wf_2".parse().expect("should parse");

        let mut set = HashSet::new();
        set.insert(id1.clone());
        set.insert(id2);
        set.insert(id1); // duplicate

        assert_eq!(set.len(), 2);
    }

    #[test]
    fn id_serde_roundtrip() {
        let id: ExecutionId = "exec_7".parse().expect("should parse");
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, "\"exec_7\"");
        let parsed: ExecutionId = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(id, parsed);
    }
}
