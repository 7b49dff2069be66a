//! Errors raised while building or rewriting a physical plan.
//!
//! Every variant is detected synchronously at construction or mutation time.
//! None of them is retried at this layer:
//! - [`PlanError::SchemaIncompatible`]: the planner must reject the query or insert a coercion
//! - [`PlanError::ArityViolation`] and [`PlanError::InvalidHandle`]: optimizer programming errors
//! - [`PlanError::DanglingGraph`]: an internal consistency bug caught by verification

use crate::plan::{NodeId, PhysicalOpType};
use alloc::string::String;
use alloc::vec::Vec;
use thiserror::Error;

/// Plan construction and mutation errors.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlanError {
    /// Join or union inputs cannot be merged into one relation.
    #[error("schema incompatible: {reason}")]
    SchemaIncompatible { reason: String },

    /// A producer index outside the node's declared arity.
    #[error("arity violation on {kind} node {node}: producer index {index} with arity {arity}")]
    ArityViolation {
        node: NodeId,
        kind: PhysicalOpType,
        index: usize,
        arity: usize,
    },

    /// The producer/consumer graph no longer satisfies its invariants.
    #[error("dangling graph: {reason}")]
    DanglingGraph { reason: String },

    /// A handle whose slot was freed or that belongs to another plan.
    #[error("invalid node handle {0}")]
    InvalidHandle(NodeId),

    /// Attempted to free a node that other nodes still consume.
    #[error("node {node} is still consumed by {consumers:?}")]
    NodeInUse { node: NodeId, consumers: Vec<NodeId> },

    /// Schema or catalog error from the core crate.
    #[error(transparent)]
    Core(#[from] strata_core::Error),
}

impl PlanError {
    /// Creates a schema incompatibility error.
    pub fn schema_incompatible(reason: impl Into<String>) -> Self {
        PlanError::SchemaIncompatible {
            reason: reason.into(),
        }
    }

    /// Creates a dangling graph error.
    pub fn dangling(reason: impl Into<String>) -> Self {
        PlanError::DanglingGraph {
            reason: reason.into(),
        }
    }
}

/// Result alias for plan operations.
pub type Result<T> = core::result::Result<T, PlanError>;
