//! Error types for Strata.

use crate::types::DataType;
use alloc::string::String;
use thiserror::Error;

/// Result type alias for Strata core operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Error types for schema, catalog and storage operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Type mismatch error.
    #[error("type mismatch: expected {expected}, got {got}")]
    TypeMismatch { expected: DataType, got: DataType },
    /// Two schemas cannot be merged into one relation.
    #[error("incompatible schemas: {message}")]
    SchemaIncompatible { message: String },
    /// Invalid schema definition.
    #[error("invalid schema: {message}")]
    InvalidSchema { message: String },
    /// Column not found.
    #[error("column {column} not found in table {table}")]
    ColumnNotFound { table: String, column: String },
    /// Table not found.
    #[error("table not found: {db}.{name}")]
    TableNotFound { db: String, name: String },
    /// Index not found.
    #[error("index {index} not found in table {table}")]
    IndexNotFound { table: String, index: String },
    /// Invalid operation.
    #[error("invalid operation: {message}")]
    InvalidOperation { message: String },
}

impl Error {
    /// Creates a type mismatch error.
    pub fn type_mismatch(expected: DataType, got: DataType) -> Self {
        Error::TypeMismatch { expected, got }
    }

    /// Creates a schema incompatibility error.
    pub fn schema_incompatible(message: impl Into<String>) -> Self {
        Error::SchemaIncompatible {
            message: message.into(),
        }
    }

    /// Creates an invalid schema error.
    pub fn invalid_schema(message: impl Into<String>) -> Self {
        Error::InvalidSchema {
            message: message.into(),
        }
    }

    /// Creates a column not found error.
    pub fn column_not_found(table: impl Into<String>, column: impl Into<String>) -> Self {
        Error::ColumnNotFound {
            table: table.into(),
            column: column.into(),
        }
    }

    /// Creates a table not found error.
    pub fn table_not_found(db: impl Into<String>, name: impl Into<String>) -> Self {
        Error::TableNotFound {
            db: db.into(),
            name: name.into(),
        }
    }

    /// Creates an index not found error.
    pub fn index_not_found(table: impl Into<String>, index: impl Into<String>) -> Self {
        Error::IndexNotFound {
            table: table.into(),
            index: index.into(),
        }
    }

    /// Creates an invalid operation error.
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Error::InvalidOperation {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_error_display() {
        let err = Error::type_mismatch(DataType::Int32, DataType::String);
        assert_eq!(err.to_string(), "type mismatch: expected int32, got string");

        let err = Error::table_not_found("db1", "t1");
        assert!(err.to_string().contains("db1.t1"));

        let err = Error::index_not_found("t1", "idx_card");
        assert!(err.to_string().contains("idx_card"));
    }

    #[test]
    fn test_error_constructors() {
        match Error::schema_incompatible("arity 1 vs 2") {
            Error::SchemaIncompatible { message } => assert_eq!(message, "arity 1 vs 2"),
            _ => panic!("Wrong error type"),
        }
    }
}
