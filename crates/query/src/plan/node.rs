//! Plan node base: handles, operator tags and the common node attributes.

use super::op::PhysicalOp;
use core::fmt;
use strata_core::schema::Schema;

/// Stable handle to a node in a [`PhysicalPlan`](super::PhysicalPlan) arena.
///
/// A handle records the arena it came from and the generation of its slot, so a
/// handle to a freed node never aliases the node that later reuses the slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    pub(crate) plan: u32,
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl NodeId {
    /// Returns the slot index of this handle.
    #[inline]
    pub fn index(&self) -> usize {
        self.index as usize
    }

    /// Returns the slot generation of this handle.
    #[inline]
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

/// The fourteen physical operator kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PhysicalOpType {
    TableScan,
    IndexScan,
    Filter,
    GroupBy,
    SortBy,
    RowProject,
    Aggregation,
    Buffer,
    Loops,
    Join,
    Union,
    Limit,
    Rename,
    Distinct,
}

impl PhysicalOpType {
    /// All operator kinds, in declaration order.
    pub const ALL: [PhysicalOpType; 14] = [
        PhysicalOpType::TableScan,
        PhysicalOpType::IndexScan,
        PhysicalOpType::Filter,
        PhysicalOpType::GroupBy,
        PhysicalOpType::SortBy,
        PhysicalOpType::RowProject,
        PhysicalOpType::Aggregation,
        PhysicalOpType::Buffer,
        PhysicalOpType::Loops,
        PhysicalOpType::Join,
        PhysicalOpType::Union,
        PhysicalOpType::Limit,
        PhysicalOpType::Rename,
        PhysicalOpType::Distinct,
    ];

    /// Returns the operator name used in explain output.
    pub fn name(&self) -> &'static str {
        match self {
            PhysicalOpType::TableScan | PhysicalOpType::IndexScan => "SCAN",
            PhysicalOpType::Filter => "FILTER_BY",
            PhysicalOpType::GroupBy => "GROUP_BY",
            PhysicalOpType::SortBy => "SORT_BY",
            PhysicalOpType::RowProject | PhysicalOpType::Aggregation => "PROJECT",
            PhysicalOpType::Buffer => "BUFFER",
            PhysicalOpType::Loops => "LOOPS",
            PhysicalOpType::Join => "JOIN",
            PhysicalOpType::Union => "UNION",
            PhysicalOpType::Limit => "LIMIT",
            PhysicalOpType::Rename => "RENAME",
            PhysicalOpType::Distinct => "DISTINCT",
        }
    }

    /// Number of producers a node of this kind has.
    pub fn arity(&self) -> usize {
        match self {
            PhysicalOpType::TableScan | PhysicalOpType::IndexScan => 0,
            PhysicalOpType::Join | PhysicalOpType::Union => 2,
            _ => 1,
        }
    }

    /// Whether the operator must consume its whole input before emitting a row.
    pub fn is_blocking(&self) -> bool {
        // Distinct stays non-blocking until the dedup stage placement is settled.
        matches!(self, PhysicalOpType::GroupBy | PhysicalOpType::SortBy)
    }

    /// Whether output rows are computed when the consumer pulls them.
    pub fn is_lazy(&self) -> bool {
        matches!(self, PhysicalOpType::Join | PhysicalOpType::Union)
    }
}

impl fmt::Display for PhysicalOpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A node in the physical plan graph.
///
/// The common attributes are fixed at construction. Producer and consumer
/// links are only changed by the owning arena, which keeps both sides in step.
#[derive(Clone, Debug)]
pub struct PhysicalNode {
    pub(crate) kind: PhysicalOpType,
    pub(crate) is_blocking: bool,
    pub(crate) is_lazy: bool,
    pub(crate) output_schema: Schema,
    pub(crate) producers: alloc::vec::Vec<NodeId>,
    pub(crate) consumers: alloc::vec::Vec<NodeId>,
    pub(crate) op: PhysicalOp,
}

impl PhysicalNode {
    pub(crate) fn new(op: PhysicalOp, output_schema: Schema) -> Self {
        let kind = op.kind();
        Self {
            kind,
            is_blocking: kind.is_blocking(),
            is_lazy: kind.is_lazy(),
            output_schema,
            producers: alloc::vec::Vec::with_capacity(kind.arity()),
            consumers: alloc::vec::Vec::new(),
            op,
        }
    }

    /// Operator kind.
    #[inline]
    pub fn kind(&self) -> PhysicalOpType {
        self.kind
    }

    /// Whether this node must see its entire input before emitting output.
    #[inline]
    pub fn is_blocking(&self) -> bool {
        self.is_blocking
    }

    /// Whether this node computes rows on demand.
    #[inline]
    pub fn is_lazy(&self) -> bool {
        self.is_lazy
    }

    /// Output schema.
    #[inline]
    pub fn output_schema(&self) -> &Schema {
        &self.output_schema
    }

    /// Input nodes, in order.
    #[inline]
    pub fn producers(&self) -> &[NodeId] {
        &self.producers
    }

    /// Nodes taking this node as input. Order carries no meaning.
    #[inline]
    pub fn consumers(&self) -> &[NodeId] {
        &self.consumers
    }

    /// Variant payload.
    #[inline]
    pub fn op(&self) -> &PhysicalOp {
        &self.op
    }

    /// Whether a pass may treat this node as a sink for its producers' rows.
    pub fn consume(&self) -> bool {
        self.op.consume()
    }

    /// Whether a pass may treat this node as a row source for its consumers.
    pub fn produce(&self) -> bool {
        self.op.produce()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_table() {
        for kind in PhysicalOpType::ALL {
            let blocking = matches!(kind, PhysicalOpType::GroupBy | PhysicalOpType::SortBy);
            let lazy = matches!(kind, PhysicalOpType::Join | PhysicalOpType::Union);
            assert_eq!(kind.is_blocking(), blocking, "{:?}", kind);
            assert_eq!(kind.is_lazy(), lazy, "{:?}", kind);
        }
        assert!(!PhysicalOpType::Distinct.is_blocking());
    }

    #[test]
    fn test_arity() {
        assert_eq!(PhysicalOpType::TableScan.arity(), 0);
        assert_eq!(PhysicalOpType::IndexScan.arity(), 0);
        assert_eq!(PhysicalOpType::Union.arity(), 2);
        assert_eq!(PhysicalOpType::Limit.arity(), 1);
        assert_eq!(PhysicalOpType::ALL.iter().filter(|k| k.arity() == 1).count(), 10);
    }

    #[test]
    fn test_names() {
        assert_eq!(PhysicalOpType::IndexScan.name(), "SCAN");
        assert_eq!(PhysicalOpType::Filter.name(), "FILTER_BY");
        assert_eq!(PhysicalOpType::Aggregation.name(), "PROJECT");
        assert_eq!(PhysicalOpType::Union.name(), "UNION");
    }
}
