//! Physical plan graph.
//!
//! - `node`: handles, operator kinds and the common node attributes
//! - `op`: per-variant payloads
//! - `schema`: output schema derivation
//! - `graph`: the arena that owns nodes and keeps producer/consumer links in step
//! - `verify`: invariant checks
//! - `explain`: text rendering
//! - `frozen`: read-only plans for execution

mod explain;
mod frozen;
mod graph;
mod node;
mod op;
mod schema;
mod verify;

pub use explain::{explain, explain_schema};
pub use frozen::FrozenPlan;
pub use graph::PhysicalPlan;
pub use node::{NodeId, PhysicalNode, PhysicalOpType};
pub use op::{PhysicalOp, ProjectType, ScanOp, ScanType};
pub use schema::{derive_schema, join_schema, union_schema, SchemaRule};
