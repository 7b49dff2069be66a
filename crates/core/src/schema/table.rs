//! Table definition for Strata schemas.

use super::column::Column;
use super::index::IndexDef;
use super::relation::Schema;
use crate::error::{Error, Result};
use crate::types::DataType;
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

/// A table definition: owning database, name, physical schema and indices.
#[derive(Clone, Debug, PartialEq)]
pub struct Table {
    db: String,
    name: String,
    schema: Schema,
    indices: Vec<IndexDef>,
}

impl Table {
    /// Returns the database name.
    #[inline]
    pub fn db(&self) -> &str {
        &self.db
    }

    /// Returns the table name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the physical schema.
    #[inline]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Returns the indices.
    #[inline]
    pub fn indices(&self) -> &[IndexDef] {
        &self.indices
    }

    /// Gets an index by name.
    pub fn get_index(&self, name: &str) -> Option<&IndexDef> {
        self.indices.iter().find(|i| i.name() == name)
    }
}

/// Builder for creating table definitions.
pub struct TableBuilder {
    db: String,
    name: String,
    columns: Vec<Column>,
    indices: Vec<IndexDef>,
}

impl TableBuilder {
    /// Creates a new table builder.
    pub fn new(db: impl Into<String>, name: impl Into<String>) -> Result<Self> {
        let db = db.into();
        let name = name.into();
        Self::check_naming_rules(&db)?;
        Self::check_naming_rules(&name)?;
        Ok(Self {
            db,
            name,
            columns: Vec::new(),
            indices: Vec::new(),
        })
    }

    /// Validates a name follows naming rules.
    fn check_naming_rules(name: &str) -> Result<()> {
        let mut chars = name.chars();
        match chars.next() {
            None => return Err(Error::invalid_schema("Name cannot be empty")),
            Some(first) if !first.is_ascii_alphabetic() && first != '_' => {
                return Err(Error::invalid_schema(format!(
                    "Name must start with letter or underscore: {}",
                    name
                )))
            }
            Some(_) => {}
        }
        if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(Error::invalid_schema(format!(
                "Name contains invalid characters: {}",
                name
            )));
        }
        Ok(())
    }

    /// Adds a non-nullable column to the table.
    pub fn add_column(self, name: impl Into<String>, data_type: DataType) -> Result<Self> {
        self.add(Column::new(name, data_type))
    }

    /// Adds a nullable column to the table.
    pub fn add_nullable_column(self, name: impl Into<String>, data_type: DataType) -> Result<Self> {
        self.add(Column::new(name, data_type).nullable(true))
    }

    fn add(mut self, column: Column) -> Result<Self> {
        Self::check_naming_rules(column.name())?;
        if self.columns.iter().any(|c| c.name() == column.name()) {
            return Err(Error::invalid_schema(format!(
                "Column already exists: {}",
                column.name()
            )));
        }
        self.columns.push(column);
        Ok(self)
    }

    /// Adds an index keyed by `keys`, ordered within a key by `ts_column` when given.
    pub fn add_index(mut self, name: impl Into<String>, keys: &[&str], ts_column: Option<&str>) -> Result<Self> {
        let name = name.into();
        Self::check_naming_rules(&name)?;
        if self.indices.iter().any(|i| i.name() == name) {
            return Err(Error::invalid_schema(format!("Index already exists: {}", name)));
        }
        if keys.is_empty() {
            return Err(Error::invalid_schema(format!("Index {} has no key columns", name)));
        }

        for key in keys {
            match self.columns.iter().find(|c| c.name() == *key) {
                None => return Err(Error::column_not_found(&self.name, *key)),
                Some(c) if !c.is_indexable() => {
                    return Err(Error::invalid_schema(format!(
                        "Column is not indexable: {}",
                        key
                    )))
                }
                Some(_) => {}
            }
        }

        let mut idx = IndexDef::new(name, &self.name, keys.iter().map(|k| k.to_string()).collect());
        if let Some(ts) = ts_column {
            match self.columns.iter().find(|c| c.name() == ts) {
                None => return Err(Error::column_not_found(&self.name, ts)),
                Some(c) if !matches!(c.data_type(), DataType::Timestamp | DataType::Int64) => {
                    return Err(Error::type_mismatch(DataType::Timestamp, c.data_type()))
                }
                Some(_) => {}
            }
            idx = idx.ts_column(ts);
        }
        self.indices.push(idx);
        Ok(self)
    }

    /// Builds the table definition.
    pub fn build(self) -> Result<Table> {
        if self.columns.is_empty() {
            return Err(Error::invalid_schema(format!(
                "Table {} has no columns",
                self.name
            )));
        }
        Ok(Table {
            db: self.db,
            name: self.name,
            schema: Schema::new(self.columns),
            indices: self.indices,
        })
    }
}
