//! Strata Core - Core types and schema definitions for the Strata feature store.
//!
//! This crate provides the foundational types shared by storage and query:
//!
//! - `DataType`: Supported column types (Bool, Int16/32/64, Float, Double, String, Timestamp, Date)
//! - `Value`: Runtime cell values
//! - `Row`: A row of values with an identifier
//! - `schema`: Schema definitions (Column, Schema, Table, IndexDef)
//! - `Error`: Error types for schema and catalog operations
//!
//! # Example
//!
//! ```rust
//! use strata_core::DataType;
//! use strata_core::schema::TableBuilder;
//!
//! let table = TableBuilder::new("db1", "trans")
//!     .unwrap()
//!     .add_column("card", DataType::String)
//!     .unwrap()
//!     .add_column("price", DataType::Int64)
//!     .unwrap()
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(table.schema().to_string(), "[card:string, price:int64]");
//! ```

#![no_std]

extern crate alloc;

mod error;
mod row;
pub mod schema;
mod types;
mod value;

pub use error::{Error, Result};
pub use row::{Row, RowId};
pub use types::DataType;
pub use value::Value;
