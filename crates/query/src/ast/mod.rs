//! AST module for the expressions referenced by plan nodes.

mod expr;
mod join;

pub use expr::{AggregateFunc, BinaryOp, ColumnRef, Expr, OrderBy, SortOrder, UnaryOp};
pub use join::JoinType;
