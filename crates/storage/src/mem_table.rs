//! In-memory table handler.
//!
//! `MemTableHandler` keeps rows in insertion order and maintains one ordered
//! map per index definition. It backs tests, benches and embedded use.

use crate::handler::{RowIter, TableHandler};
use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::format;
use alloc::vec::Vec;
use strata_core::schema::{IndexDef, Schema, Table};
use strata_core::{Error, Result, Row, Value};
use tracing::debug;

/// Ordered index store: key values -> row positions, newest event time first.
#[derive(Debug, Default)]
struct IndexStore {
    key_positions: Vec<usize>,
    ts_position: Option<usize>,
    entries: BTreeMap<Vec<Value>, Vec<usize>>,
}

impl IndexStore {
    fn new(def: &IndexDef, schema: &Schema) -> Result<Self> {
        let key_positions = def
            .keys()
            .iter()
            .map(|k| {
                schema
                    .index_of(k)
                    .ok_or_else(|| Error::column_not_found(def.table_name(), k.as_str()))
            })
            .collect::<Result<Vec<_>>>()?;
        let ts_position = match def.get_ts_column() {
            Some(ts) => Some(
                schema
                    .index_of(ts)
                    .ok_or_else(|| Error::column_not_found(def.table_name(), ts))?,
            ),
            None => None,
        };
        Ok(Self {
            key_positions,
            ts_position,
            entries: BTreeMap::new(),
        })
    }

    fn key_of(&self, row: &Row) -> Vec<Value> {
        self.key_positions
            .iter()
            .map(|&p| row.get(p).cloned().unwrap_or(Value::Null))
            .collect()
    }

    fn add(&mut self, rows: &[Row], pos: usize) {
        let row = &rows[pos];
        let key = self.key_of(row);
        let ts_position = self.ts_position;
        let bucket = self.entries.entry(key).or_default();
        match ts_position {
            Some(ts) => {
                let ts_value = row.get(ts);
                // Keep the bucket sorted by event time descending; ties keep insertion order.
                let at = bucket
                    .iter()
                    .position(|&other| rows[other].get(ts) < ts_value)
                    .unwrap_or(bucket.len());
                bucket.insert(at, pos);
            }
            None => bucket.push(pos),
        }
    }
}

/// An in-memory table implementing [`TableHandler`].
pub struct MemTableHandler {
    table: Table,
    rows: Vec<Row>,
    indexes: BTreeMap<alloc::string::String, IndexStore>,
}

impl MemTableHandler {
    /// Creates an empty handler for the table definition.
    pub fn new(table: Table) -> Result<Self> {
        let mut indexes = BTreeMap::new();
        for def in table.indices() {
            indexes.insert(def.name().into(), IndexStore::new(def, table.schema())?);
        }
        Ok(Self {
            table,
            rows: Vec::new(),
            indexes,
        })
    }

    /// Returns the table definition.
    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Inserts a row after checking it against the schema.
    pub fn insert(&mut self, row: Row) -> Result<()> {
        self.check_row(&row)?;
        let pos = self.rows.len();
        self.rows.push(row);
        for store in self.indexes.values_mut() {
            store.add(&self.rows, pos);
        }
        Ok(())
    }

    fn check_row(&self, row: &Row) -> Result<()> {
        let schema = self.table.schema();
        if row.len() != schema.len() {
            return Err(Error::invalid_operation(format!(
                "row has {} values, table {} has {} columns",
                row.len(),
                self.table.name(),
                schema.len()
            )));
        }
        for (value, column) in row.values().iter().zip(schema.iter()) {
            match value.data_type() {
                None if !column.is_nullable() => {
                    return Err(Error::invalid_operation(format!(
                        "null value for non-nullable column {}",
                        column.name()
                    )))
                }
                Some(dt) if dt != column.data_type() => {
                    return Err(Error::type_mismatch(column.data_type(), dt))
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn store(&self, index: &str) -> Result<&IndexStore> {
        self.indexes
            .get(index)
            .ok_or_else(|| Error::index_not_found(self.table.name(), index))
    }
}

impl TableHandler for MemTableHandler {
    fn db(&self) -> &str {
        self.table.db()
    }

    fn name(&self) -> &str {
        self.table.name()
    }

    fn schema(&self) -> &Schema {
        self.table.schema()
    }

    fn indexes(&self) -> &[IndexDef] {
        self.table.indices()
    }

    fn count(&self) -> usize {
        self.rows.len()
    }

    fn scan(&self) -> RowIter<'_> {
        Box::new(self.rows.iter())
    }

    fn scan_index(&self, index: &str) -> Result<RowIter<'_>> {
        let store = self.store(index)?;
        debug!(table = self.table.name(), index, keys = store.entries.len(), "index scan");
        let rows = &self.rows;
        Ok(Box::new(
            store
                .entries
                .values()
                .flat_map(move |bucket| bucket.iter().map(move |&p| &rows[p])),
        ))
    }

    fn scan_index_key(&self, index: &str, key: &[Value]) -> Result<RowIter<'_>> {
        let store = self.store(index)?;
        let rows = &self.rows;
        match store.entries.get(key) {
            Some(bucket) => Ok(Box::new(bucket.iter().map(move |&p| &rows[p]))),
            None => Ok(Box::new(core::iter::empty())),
        }
    }
}
