//! In-memory catalog.
//!
//! This module provides the `MemCatalog` struct which maps `db.table` names to
//! shared table handlers.

use crate::handler::{Catalog, TableHandler};
use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec::Vec;
use strata_core::{Error, Result};
use tracing::debug;

/// Catalog of table handlers grouped by database.
#[derive(Default)]
pub struct MemCatalog {
    /// Database name → (table name → handler).
    databases: BTreeMap<String, BTreeMap<String, Arc<dyn TableHandler>>>,
}

impl MemCatalog {
    /// Creates a new empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty database; a no-op if it already exists.
    pub fn create_database(&mut self, db: impl Into<String>) {
        self.databases.entry(db.into()).or_default();
    }

    /// Registers a table handler under its own database and name.
    pub fn register(&mut self, handler: Arc<dyn TableHandler>) -> Result<()> {
        let tables = self.databases.entry(handler.db().to_string()).or_default();
        if tables.contains_key(handler.name()) {
            return Err(Error::invalid_schema(alloc::format!(
                "Table already exists: {}.{}",
                handler.db(),
                handler.name()
            )));
        }
        debug!(db = handler.db(), table = handler.name(), "registered table");
        tables.insert(handler.name().to_string(), handler);
        Ok(())
    }

    /// Drops a table from the catalog.
    pub fn drop_table(&mut self, db: &str, table: &str) -> Result<()> {
        self.databases
            .get_mut(db)
            .and_then(|tables| tables.remove(table))
            .map(|_| ())
            .ok_or_else(|| Error::table_not_found(db, table))
    }

    /// Returns the handler for `db.table` or a `TableNotFound` error.
    pub fn get(&self, db: &str, table: &str) -> Result<Arc<dyn TableHandler>> {
        self.table(db, table)
            .ok_or_else(|| Error::table_not_found(db, table))
    }

    /// Returns all table names of a database.
    pub fn table_names(&self, db: &str) -> Vec<&str> {
        self.databases
            .get(db)
            .map(|tables| tables.keys().map(|s| s.as_str()).collect())
            .unwrap_or_default()
    }
}

impl Catalog for MemCatalog {
    fn table(&self, db: &str, table: &str) -> Option<Arc<dyn TableHandler>> {
        self.databases.get(db).and_then(|t| t.get(table)).cloned()
    }

    fn has_database(&self, db: &str) -> bool {
        self.databases.contains_key(db)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mem_table::MemTableHandler;
    use strata_core::schema::TableBuilder;
    use strata_core::DataType;

    fn handler(db: &str, name: &str) -> Arc<dyn TableHandler> {
        let table = TableBuilder::new(db, name)
            .unwrap()
            .add_column("id", DataType::Int64)
            .unwrap()
            .build()
            .unwrap();
        Arc::new(MemTableHandler::new(table).unwrap())
    }

    #[test]
    fn test_register_and_lookup() {
        let mut catalog = MemCatalog::new();
        catalog.register(handler("db1", "t1")).unwrap();
        catalog.register(handler("db1", "t2")).unwrap();

        assert!(catalog.has_database("db1"));
        assert!(!catalog.has_database("db2"));
        assert_eq!(catalog.table_names("db1"), alloc::vec!["t1", "t2"]);
        assert_eq!(catalog.get("db1", "t1").unwrap().name(), "t1");
        assert!(catalog.table("db1", "t3").is_none());
    }

    #[test]
    fn test_duplicate_table() {
        let mut catalog = MemCatalog::new();
        catalog.register(handler("db1", "t1")).unwrap();
        assert!(catalog.register(handler("db1", "t1")).is_err());
    }

    #[test]
    fn test_drop_table() {
        let mut catalog = MemCatalog::new();
        catalog.create_database("db1");
        assert!(matches!(
            catalog.drop_table("db1", "t1"),
            Err(Error::TableNotFound { .. })
        ));
        catalog.register(handler("db1", "t1")).unwrap();
        catalog.drop_table("db1", "t1").unwrap();
        assert!(catalog.table_names("db1").is_empty());
    }
}
