//! Row structure for Strata.
//!
//! This module defines the `Row` struct which represents a single row in a table.

use crate::value::Value;
use alloc::vec::Vec;

/// Unique identifier for a row within its table.
pub type RowId = u64;

/// A row in a table.
#[derive(Clone, Debug, PartialEq)]
pub struct Row {
    /// Identifier for this row.
    id: RowId,
    /// Values stored in this row, indexed by column position.
    values: Vec<Value>,
}

impl Row {
    /// Creates a new row with the given ID and values.
    pub fn new(id: RowId, values: Vec<Value>) -> Self {
        Self { id, values }
    }

    /// Returns the row ID.
    #[inline]
    pub fn id(&self) -> RowId {
        self.id
    }

    /// Returns a reference to the values.
    #[inline]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Gets a value by column index.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Returns the number of values in this row.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if this row has no values.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
