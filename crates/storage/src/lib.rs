//! Strata Storage - Table access contracts for the Strata query planner.
//!
//! This crate provides:
//!
//! - `TableHandler`: schema and row iteration (full scan or by named index) for one table
//! - `Catalog`: name resolution from `db.table` to a handler
//! - `MemTableHandler` / `MemCatalog`: in-memory implementations
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use strata_core::schema::TableBuilder;
//! use strata_core::{DataType, Row, Value};
//! use strata_storage::{Catalog, MemCatalog, MemTableHandler, TableHandler};
//!
//! let table = TableBuilder::new("db1", "trans")
//!     .unwrap()
//!     .add_column("card", DataType::String)
//!     .unwrap()
//!     .add_column("price", DataType::Int64)
//!     .unwrap()
//!     .build()
//!     .unwrap();
//! let mut handler = MemTableHandler::new(table).unwrap();
//! handler
//!     .insert(Row::new(1, vec![Value::from("c1"), Value::Int64(10)]))
//!     .unwrap();
//!
//! let mut catalog = MemCatalog::new();
//! catalog.register(Arc::new(handler)).unwrap();
//! assert_eq!(catalog.table("db1", "trans").unwrap().count(), 1);
//! ```

#![no_std]

extern crate alloc;

pub mod catalog;
pub mod handler;
pub mod mem_table;

pub use catalog::MemCatalog;
pub use handler::{Catalog, RowIter, TableHandler};
pub use mem_table::MemTableHandler;
