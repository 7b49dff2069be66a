//! Read-only plans handed to the execution engine.

use super::explain::explain;
use super::graph::PhysicalPlan;
use super::node::{NodeId, PhysicalNode};
use crate::error::Result;
use alloc::string::String;
use alloc::vec::Vec;

/// A verified plan with no mutation API.
///
/// `FrozenPlan` is `Send + Sync`, so one plan may be walked by several
/// executor threads at once.
#[derive(Debug)]
pub struct FrozenPlan {
    plan: PhysicalPlan,
    root: NodeId,
}

impl FrozenPlan {
    pub(crate) fn new(plan: PhysicalPlan, root: NodeId) -> Self {
        Self { plan, root }
    }

    /// Handle of the output node.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes in the plan.
    pub fn len(&self) -> usize {
        self.plan.len()
    }

    /// Always false: a frozen plan has at least its root.
    pub fn is_empty(&self) -> bool {
        self.plan.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Result<&PhysicalNode> {
        self.plan.node(id)
    }

    pub fn producers(&self, id: NodeId) -> Result<&[NodeId]> {
        self.plan.producers(id)
    }

    pub fn consumers(&self, id: NodeId) -> Result<&[NodeId]> {
        self.plan.consumers(id)
    }

    /// Execution order from the leaves up to the root.
    pub fn post_order(&self) -> Result<Vec<NodeId>> {
        self.plan.post_order(self.root)
    }

    pub fn explain(&self) -> Result<String> {
        explain(&self.plan, self.root)
    }

    /// Returns the mutable arena, e.g. to re-optimize after statistics change.
    pub fn thaw(self) -> PhysicalPlan {
        self.plan
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Expr;
    use crate::error::PlanError;
    use alloc::sync::Arc;
    use alloc::vec;
    use strata_core::schema::TableBuilder;
    use strata_core::DataType;
    use strata_storage::{MemTableHandler, TableHandler};

    fn assert_send_sync<T: Send + Sync>() {}

    fn table() -> Arc<dyn TableHandler> {
        let table = TableBuilder::new("db", "t")
            .unwrap()
            .add_column("a", DataType::Int64)
            .unwrap()
            .build()
            .unwrap();
        Arc::new(MemTableHandler::new(table).unwrap())
    }

    #[test]
    fn test_frozen_is_send_sync() {
        assert_send_sync::<FrozenPlan>();
    }

    #[test]
    fn test_freeze_and_thaw() {
        let mut plan = PhysicalPlan::new();
        let scan = plan.scan_table(table()).unwrap();
        let filter = plan.filter(scan, Expr::is_null(Expr::column("t", "a"))).unwrap();

        let frozen = plan.freeze(filter).unwrap();
        assert_eq!(frozen.root(), filter);
        assert_eq!(frozen.post_order().unwrap(), vec![scan, filter]);
        assert_eq!(frozen.consumers(scan).unwrap(), &[filter]);
        assert_eq!(frozen.explain().unwrap().lines().count(), 2);

        let mut plan = frozen.thaw();
        plan.limit(filter, 1).unwrap();
        assert_eq!(plan.len(), 3);
    }

    #[test]
    fn test_freeze_rejects_stale_root() {
        let mut plan = PhysicalPlan::new();
        let scan = plan.scan_table(table()).unwrap();
        let limit = plan.limit(scan, 1).unwrap();
        plan.remove(limit).unwrap();
        assert!(matches!(plan.freeze(limit), Err(PlanError::InvalidHandle(_))));
    }
}
