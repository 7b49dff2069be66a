//! Storage contracts consumed by the query planner.

use alloc::boxed::Box;
use alloc::sync::Arc;
use strata_core::schema::{IndexDef, Schema};
use strata_core::{Result, Row};

/// Iterator over the rows of a table, borrowed from the handler.
pub type RowIter<'a> = Box<dyn Iterator<Item = &'a Row> + 'a>;

/// Access to one table: its physical schema and its rows.
///
/// Plan scan nodes hold an `Arc<dyn TableHandler>` and only read `schema()`
/// while planning; row iteration belongs to the execution engine.
pub trait TableHandler: Send + Sync {
    /// Database the table belongs to.
    fn db(&self) -> &str;

    /// Table name.
    fn name(&self) -> &str;

    /// Physical schema of the table.
    fn schema(&self) -> &Schema;

    /// Index definitions available for index scans.
    fn indexes(&self) -> &[IndexDef];

    /// Number of rows currently stored.
    fn count(&self) -> usize;

    /// Full scan in insertion order.
    fn scan(&self) -> RowIter<'_>;

    /// Scan ordered by the named index: ascending key, newest event time first within a key.
    fn scan_index(&self, index: &str) -> Result<RowIter<'_>>;

    /// Rows of a single key of the named index, newest event time first.
    fn scan_index_key(&self, index: &str, key: &[strata_core::Value]) -> Result<RowIter<'_>>;

    /// Looks up an index definition by name.
    fn index(&self, name: &str) -> Option<&IndexDef> {
        self.indexes().iter().find(|i| i.name() == name)
    }
}

/// Resolves table names to handlers.
pub trait Catalog {
    /// Returns the handler for `db.table`, if present.
    fn table(&self, db: &str, table: &str) -> Option<Arc<dyn TableHandler>>;

    /// Returns true if the database is known to this catalog.
    fn has_database(&self, db: &str) -> bool;
}
