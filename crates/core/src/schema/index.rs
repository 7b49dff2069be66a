//! Index definition for Strata tables.
//!
//! A feature-store index groups rows by one or more key columns and orders each
//! key's rows by an optional event-time column, newest first.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

/// An index definition in a table schema.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexDef {
    /// Index name.
    name: String,
    /// Table name this index belongs to.
    table_name: String,
    /// Key columns, in key order.
    keys: Vec<String>,
    /// Event-time column ordering rows within a key.
    ts_column: Option<String>,
}

impl IndexDef {
    /// Creates a new index definition keyed by `keys`.
    pub fn new(name: impl Into<String>, table_name: impl Into<String>, keys: Vec<String>) -> Self {
        Self {
            name: name.into(),
            table_name: table_name.into(),
            keys,
            ts_column: None,
        }
    }

    /// Sets the event-time column.
    pub fn ts_column(mut self, ts_column: impl Into<String>) -> Self {
        self.ts_column = Some(ts_column.into());
        self
    }

    /// Returns the index name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the table name.
    #[inline]
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Returns the normalized name (table.index).
    pub fn normalized_name(&self) -> String {
        format!("{}.{}", self.table_name, self.name)
    }

    /// Returns the key columns.
    #[inline]
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Returns the event-time column, if any.
    #[inline]
    pub fn get_ts_column(&self) -> Option<&str> {
        self.ts_column.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec;

    #[test]
    fn test_index_def() {
        let idx = IndexDef::new("idx_card", "trans", vec!["card".into()]).ts_column("ts");

        assert_eq!(idx.name(), "idx_card");
        assert_eq!(idx.table_name(), "trans");
        assert_eq!(idx.normalized_name(), "trans.idx_card");
        assert_eq!(idx.keys(), &["card".to_string()]);
        assert_eq!(idx.get_ts_column(), Some("ts"));
    }
}
