//! Strata Query - Physical query plans for the Strata feature store.
//!
//! This crate provides the plan layer between the logical planner and the
//! execution engine:
//!
//! - `ast`: Column references, expressions, sort keys and join types
//! - `plan`: The physical plan arena, its fourteen operator kinds and schema derivation
//! - `optimizer`: A runner for externally supplied physical passes
//! - `config`: Arena configuration
//! - `error`: Plan construction and mutation errors
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use strata_core::schema::{Column, Schema, TableBuilder};
//! use strata_core::DataType;
//! use strata_query::ast::Expr;
//! use strata_query::plan::PhysicalPlan;
//! use strata_storage::MemTableHandler;
//!
//! let table = TableBuilder::new("db1", "t1")
//!     .unwrap()
//!     .add_column("card", DataType::String)
//!     .unwrap()
//!     .add_column("price", DataType::Int64)
//!     .unwrap()
//!     .build()
//!     .unwrap();
//! let handler = Arc::new(MemTableHandler::new(table).unwrap());
//!
//! let mut plan = PhysicalPlan::new();
//! let scan = plan.scan_table(handler).unwrap();
//! let filter = plan
//!     .filter(scan, Expr::gt(Expr::column("t1", "price"), Expr::literal(10i64)))
//!     .unwrap();
//! let group = plan.group_by(filter, vec![Expr::column("t1", "card")]).unwrap();
//! let output = Schema::new(vec![
//!     Column::new("card", DataType::String),
//!     Column::new("total", DataType::Int64),
//! ]);
//! let agg = plan.aggregation(group, "agg_fn", output).unwrap();
//!
//! assert!(plan.node(group).unwrap().is_blocking());
//! let frozen = plan.freeze(agg).unwrap();
//! assert_eq!(frozen.post_order().unwrap().len(), 4);
//! assert!(frozen.explain().unwrap().starts_with("PROJECT(type=Aggregation"));
//! ```

#![no_std]

extern crate alloc;

pub mod ast;
pub mod config;
pub mod error;
pub mod optimizer;
pub mod plan;

pub use config::PlanConfig;
pub use error::{PlanError, Result};
