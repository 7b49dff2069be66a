//! Relation schema: the ordered column list attached to tables and plan nodes.

use super::column::Column;
use crate::error::{Error, Result};
use alloc::format;
use alloc::vec::Vec;
use core::fmt;
use core::slice;

/// An ordered sequence of columns.
///
/// Equality is structural: same columns, same order, same names, types and
/// nullability. Use [`Schema::is_compatible_with`] for the looser check that
/// merging operators need.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Schema {
    columns: Vec<Column>,
}

impl Schema {
    /// Creates a schema from a list of columns.
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    /// Creates a schema with no columns.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Appends a column.
    pub fn push(&mut self, column: Column) {
        self.columns.push(column);
    }

    /// Returns the number of columns.
    #[inline]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if the schema has no columns.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Returns the columns.
    #[inline]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Gets a column by position.
    #[inline]
    pub fn column(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    /// Gets a column by name.
    pub fn get(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    /// Returns the position of the first column with the given name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name() == name)
    }

    /// Iterates the columns in order.
    pub fn iter(&self) -> slice::Iter<'_, Column> {
        self.columns.iter()
    }

    /// Returns true when both schemas have the same arity and pairwise-compatible types.
    pub fn is_compatible_with(&self, other: &Schema) -> bool {
        self.check_compatible(other).is_ok()
    }

    /// Like [`Schema::is_compatible_with`], reporting the first mismatch.
    pub fn check_compatible(&self, other: &Schema) -> Result<()> {
        if self.len() != other.len() {
            return Err(Error::schema_incompatible(format!(
                "column count {} vs {}",
                self.len(),
                other.len()
            )));
        }
        for (pos, (l, r)) in self.columns.iter().zip(other.columns.iter()).enumerate() {
            if !l.data_type().is_compatible_with(r.data_type()) {
                return Err(Error::schema_incompatible(format!(
                    "column {} has type {} on the left and {} on the right",
                    pos,
                    l.data_type(),
                    r.data_type()
                )));
            }
        }
        Ok(())
    }

    /// Returns `self` followed by `other`.
    pub fn concat(&self, other: &Schema) -> Schema {
        let mut columns = Vec::with_capacity(self.len() + other.len());
        columns.extend(self.columns.iter().cloned());
        columns.extend(other.columns.iter().cloned());
        Schema { columns }
    }

    /// Returns a copy with every column's nullability set to `nullable`.
    pub fn with_nullable(&self, nullable: bool) -> Schema {
        Schema {
            columns: self
                .columns
                .iter()
                .cloned()
                .map(|c| c.nullable(nullable))
                .collect(),
        }
    }
}

impl From<Vec<Column>> for Schema {
    fn from(columns: Vec<Column>) -> Self {
        Self::new(columns)
    }
}

impl FromIterator<Column> for Schema {
    fn from_iter<I: IntoIterator<Item = Column>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Schema {
    type Item = &'a Column;
    type IntoIter = slice::Iter<'a, Column>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, column) in self.columns.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", column)?;
        }
        f.write_str("]")
    }
}
