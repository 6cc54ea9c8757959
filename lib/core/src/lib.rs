//! Core domain types and utilities for the agentdeck console.
//!
//! This crate provides the foundational identifier types and error
//! handling shared by the workflow editor crates.

pub mod error;
pub mod id;

pub use error::Result;
pub use id::{AgentId, ExecutionId, ParseIdError, WorkflowId};
