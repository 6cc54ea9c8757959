//! Per-kind node configuration.
//!
//! Configuration is a tagged union keyed by node kind rather than loose
//! JSON: each kind has a statically known shape with serde defaults. The
//! inspector panel patches one field at a time, so updates go through a
//! JSON-object merge that re-decodes into the kind's type; a patch that
//! breaks the shape is rejected and the stored value stays typed.

use crate::registry::NodeKind;
use agentdeck_core::AgentId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// Configuration for a `start` node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StartConfig {}

/// Configuration for an `input` node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    /// Prompt shown when a run asks for this input.
    #[serde(default)]
    pub prompt: Option<String>,
}

/// Configuration for an `agent` node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// The platform agent this step delegates to.
    #[serde(default)]
    pub agent_id: Option<AgentId>,
}

/// Configuration for a `decision` node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecisionConfig {
    /// Expression evaluated to pick the branch.
    #[serde(default)]
    pub condition: String,
}

/// Configuration for an `end` node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EndConfig {}

/// A node's configuration, varying by kind.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeConfig {
    /// Start node configuration.
    Start(StartConfig),
    /// Input node configuration.
    Input(InputConfig),
    /// Agent node configuration.
    Agent(AgentConfig),
    /// Decision node configuration.
    Decision(DecisionConfig),
    /// End node configuration.
    End(EndConfig),
}

impl NodeConfig {
    /// Returns the kind this configuration belongs to.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Start(_) => NodeKind::Start,
            Self::Input(_) => NodeKind::Input,
            Self::Agent(_) => NodeKind::Agent,
            Self::Decision(_) => NodeKind::Decision,
            Self::End(_) => NodeKind::End,
        }
    }

    /// Builds the default configuration for a kind.
    #[must_use]
    pub fn default_for(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Start => Self::Start(StartConfig::default()),
            NodeKind::Input => Self::Input(InputConfig::default()),
            NodeKind::Agent => Self::Agent(AgentConfig::default()),
            NodeKind::Decision => Self::Decision(DecisionConfig::default()),
            NodeKind::End => Self::End(EndConfig::default()),
        }
    }

    /// Projects the configuration to its JSON object form (the wire
    /// `config` field).
    #[must_use]
    pub fn to_value(&self) -> JsonValue {
        let value = match self {
            Self::Start(config) => serde_json::to_value(config),
            Self::Input(config) => serde_json::to_value(config),
            Self::Agent(config) => serde_json::to_value(config),
            Self::Decision(config) => serde_json::to_value(config),
            Self::End(config) => serde_json::to_value(config),
        };
        value.unwrap_or_else(|_| JsonValue::Object(Map::new()))
    }

    /// Decodes a configuration for `kind` from its JSON object form.
    ///
    /// # Errors
    ///
    /// Returns an error if the value does not fit the kind's shape.
    pub fn from_value(kind: NodeKind, value: &JsonValue) -> Result<Self, serde_json::Error> {
        match kind {
            NodeKind::Start => serde_json::from_value(value.clone()).map(Self::Start),
            NodeKind::Input => serde_json::from_value(value.clone()).map(Self::Input),
            NodeKind::Agent => serde_json::from_value(value.clone()).map(Self::Agent),
            NodeKind::Decision => serde_json::from_value(value.clone()).map(Self::Decision),
            NodeKind::End => serde_json::from_value(value.clone()).map(Self::End),
        }
    }

    /// Returns this configuration with the fields of `patch` merged in.
    ///
    /// Only top-level object fields are merged; a non-object patch leaves
    /// the configuration unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the merged value no longer fits the kind's
    /// shape; the original configuration is untouched.
    pub fn merged(&self, patch: &JsonValue) -> Result<Self, serde_json::Error> {
        let mut value = self.to_value();
        if let (JsonValue::Object(base), JsonValue::Object(fields)) = (&mut value, patch) {
            for (key, field) in fields {
                base.insert(key.clone(), field.clone());
            }
        }
        Self::from_value(self.kind(), &value)
    }
}
