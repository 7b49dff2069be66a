//! Schema module for Strata.
//!
//! This module contains all schema-related definitions: columns, relation
//! schemas, tables and indices.

mod column;
mod index;
mod relation;
mod table;

pub use column::Column;
pub use index::IndexDef;
pub use relation::Schema;
pub use table::{Table, TableBuilder};
