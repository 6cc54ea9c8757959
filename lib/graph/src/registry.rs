//! Static catalogue of node kinds and their structural contracts.
//!
//! Every canvas node is one of the five kinds below. Port cardinalities
//! and default configurations come from here rather than from per-node
//! data, so a node can never claim ports its kind does not have.

use crate::config::NodeConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kind of a workflow node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// The single entry point of a workflow.
    Start,
    /// Run-time data injected into the pipeline.
    Input,
    /// A step delegated to a platform agent.
    Agent,
    /// A two-way branch on a condition.
    Decision,
    /// A terminal step.
    End,
}

impl NodeKind {
    /// All kinds, in palette order.
    pub const ALL: [NodeKind; 5] = [
        NodeKind::Start,
        NodeKind::Input,
        NodeKind::Agent,
        NodeKind::Decision,
        NodeKind::End,
    ];

    /// Returns the wire name of this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Input => "input",
            Self::Agent => "agent",
            Self::Decision => "decision",
            Self::End => "end",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(Self::Start),
            "input" => Ok(Self::Input),
            "agent" => Ok(Self::Agent),
            "decision" => Ok(Self::Decision),
            "end" => Ok(Self::End),
            other => Err(UnknownKind {
                kind: other.to_string(),
            }),
        }
    }
}

/// Error returned when a node kind name is not in the catalogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKind {
    /// The unrecognized kind name.
    pub kind: String,
}

impl fmt::Display for UnknownKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown node kind: '{}'", self.kind)
    }
}

impl std::error::Error for UnknownKind {}

/// Structural contract and display metadata for a node kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeTypeDescriptor {
    /// The kind this descriptor belongs to.
    pub kind: NodeKind,
    /// Palette and canvas label.
    pub label: &'static str,
    /// Number of indexed input ports.
    pub max_inputs: usize,
    /// Number of indexed output ports.
    pub max_outputs: usize,
}

impl NodeTypeDescriptor {
    /// Builds the default configuration for this kind.
    #[must_use]
    pub fn default_config(&self) -> NodeConfig {
        NodeConfig::default_for(self.kind)
    }
}

const START: NodeTypeDescriptor = NodeTypeDescriptor {
    kind: NodeKind::Start,
    label: "Start",
    max_inputs: 0,
    max_outputs: 1,
};

const INPUT: NodeTypeDescriptor = NodeTypeDescriptor {
    kind: NodeKind::Input,
    label: "Input",
    max_inputs: 1,
    max_outputs: 1,
};

const AGENT: NodeTypeDescriptor = NodeTypeDescriptor {
    kind: NodeKind::Agent,
    label: "Agent",
    max_inputs: 1,
    max_outputs: 1,
};

const DECISION: NodeTypeDescriptor = NodeTypeDescriptor {
    kind: NodeKind::Decision,
    label: "Decision",
    max_inputs: 1,
    max_outputs: 2,
};

const END: NodeTypeDescriptor = NodeTypeDescriptor {
    kind: NodeKind::End,
    label: "End",
    max_inputs: 1,
    max_outputs: 0,
};

/// Returns the structural contract for a node kind.
#[must_use]
pub fn describe(kind: NodeKind) -> &'static NodeTypeDescriptor {
    match kind {
        NodeKind::Start => &START,
        NodeKind::Input => &INPUT,
        NodeKind::Agent => &AGENT,
        NodeKind::Decision => &DECISION,
        NodeKind::End => &END,
    }
}
