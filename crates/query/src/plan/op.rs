//! Operator variant payloads.

use super::node::PhysicalOpType;
use crate::ast::{Expr, JoinType, OrderBy};
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;
use strata_storage::TableHandler;

/// How a scan reads its table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScanType {
    /// Full table scan.
    Table,
    /// Scan ordered and grouped by the named index.
    Index(String),
}

impl ScanType {
    /// Returns the display name.
    pub fn name(&self) -> &'static str {
        match self {
            ScanType::Table => "TableScan",
            ScanType::Index(_) => "IndexScan",
        }
    }
}

/// Projection flavor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProjectType {
    /// One output row per input row.
    Row,
    /// One output row per window or group.
    Aggregation,
}

impl ProjectType {
    /// Returns the display name.
    pub fn name(&self) -> &'static str {
        match self {
            ProjectType::Row => "ProjectRow",
            ProjectType::Aggregation => "Aggregation",
        }
    }
}

/// A scan source: the table handler plus how to read it.
#[derive(Clone)]
pub struct ScanOp {
    pub table: Arc<dyn TableHandler>,
    pub scan_type: ScanType,
}

impl fmt::Debug for ScanOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScanOp")
            .field("table", &alloc::format!("{}.{}", self.table.db(), self.table.name()))
            .field("scan_type", &self.scan_type)
            .finish()
    }
}

/// Variant-specific attributes of a plan node.
#[derive(Clone, Debug)]
pub enum PhysicalOp {
    /// Leaf row source.
    Scan(ScanOp),
    /// Drops rows failing `condition`.
    Filter { condition: Expr },
    /// Groups rows by key expressions.
    GroupBy { groups: Vec<Expr> },
    /// Orders rows globally.
    SortBy { order: OrderBy },
    /// Projection through a compiled function referenced by name.
    Project {
        project_type: ProjectType,
        fn_name: String,
    },
    /// Relative row window `[start_offset, end_offset]` around the current row.
    Buffer { start_offset: i64, end_offset: i64 },
    /// Repeated per-partition iteration over the producer.
    Loops,
    /// Joins two inputs on `condition`.
    Join { join_type: JoinType, condition: Expr },
    /// Concatenates two compatible inputs; `is_all` keeps duplicates.
    Union { is_all: bool },
    /// Caps output at `limit` rows.
    Limit { limit: u32 },
    /// Renames the relation; columns are unchanged.
    Rename { name: String },
    /// Drops duplicate rows.
    Distinct,
}

impl PhysicalOp {
    /// Returns the operator kind tag.
    pub fn kind(&self) -> PhysicalOpType {
        match self {
            PhysicalOp::Scan(scan) => match scan.scan_type {
                ScanType::Table => PhysicalOpType::TableScan,
                ScanType::Index(_) => PhysicalOpType::IndexScan,
            },
            PhysicalOp::Filter { .. } => PhysicalOpType::Filter,
            PhysicalOp::GroupBy { .. } => PhysicalOpType::GroupBy,
            PhysicalOp::SortBy { .. } => PhysicalOpType::SortBy,
            PhysicalOp::Project { project_type, .. } => match project_type {
                ProjectType::Row => PhysicalOpType::RowProject,
                ProjectType::Aggregation => PhysicalOpType::Aggregation,
            },
            PhysicalOp::Buffer { .. } => PhysicalOpType::Buffer,
            PhysicalOp::Loops => PhysicalOpType::Loops,
            PhysicalOp::Join { .. } => PhysicalOpType::Join,
            PhysicalOp::Union { .. } => PhysicalOpType::Union,
            PhysicalOp::Limit { .. } => PhysicalOpType::Limit,
            PhysicalOp::Rename { .. } => PhysicalOpType::Rename,
            PhysicalOp::Distinct => PhysicalOpType::Distinct,
        }
    }

    /// Capability hook: no variant refuses to act as a sink today.
    pub fn consume(&self) -> bool {
        true
    }

    /// Capability hook: no variant refuses to act as a source today.
    pub fn produce(&self) -> bool {
        true
    }

    /// Returns the scan payload for scan nodes.
    pub fn as_scan(&self) -> Option<&ScanOp> {
        match self {
            PhysicalOp::Scan(scan) => Some(scan),
            _ => None,
        }
    }

    /// Returns the predicate of filter and join nodes.
    pub fn condition(&self) -> Option<&Expr> {
        match self {
            PhysicalOp::Filter { condition } | PhysicalOp::Join { condition, .. } => Some(condition),
            _ => None,
        }
    }

    /// Returns the function name of projection nodes.
    pub fn fn_name(&self) -> Option<&str> {
        match self {
            PhysicalOp::Project { fn_name, .. } => Some(fn_name.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for PhysicalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = self.kind().name();
        match self {
            PhysicalOp::Scan(scan) => {
                write!(f, "{}(type={}, table={}", kind, scan.scan_type.name(), scan.table.name())?;
                if let ScanType::Index(index) = &scan.scan_type {
                    write!(f, ", index={}", index)?;
                }
                f.write_str(")")
            }
            PhysicalOp::Filter { condition } => write!(f, "{}(condition={})", kind, condition),
            PhysicalOp::GroupBy { groups } => {
                write!(f, "{}(groups=[", kind)?;
                for (i, g) in groups.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", g)?;
                }
                f.write_str("])")
            }
            PhysicalOp::SortBy { order } => write!(f, "{}(order=[{}])", kind, order),
            PhysicalOp::Project {
                project_type,
                fn_name,
            } => write!(f, "{}(type={}, fn={})", kind, project_type.name(), fn_name),
            PhysicalOp::Buffer {
                start_offset,
                end_offset,
            } => write!(f, "{}(start={}, end={})", kind, start_offset, end_offset),
            PhysicalOp::Join {
                join_type,
                condition,
            } => write!(f, "{}(type={}, condition={})", kind, join_type, condition),
            PhysicalOp::Union { is_all } => write!(f, "{}(all={})", kind, is_all),
            PhysicalOp::Limit { limit } => write!(f, "{}(limit={})", kind, limit),
            PhysicalOp::Rename { name } => write!(f, "{}(name={})", kind, name),
            PhysicalOp::Loops | PhysicalOp::Distinct => f.write_str(kind),
        }
    }
}
