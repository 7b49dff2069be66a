//! Physical plan optimizer.
//!
//! The optimizer owns no rewrite rules of its own. Callers register
//! [`PhysicalPass`] implementations and the optimizer runs them in order,
//! checking the graph after each one when the plan is configured to.

mod pass;

pub use pass::{candidates, PhysicalPass};

use crate::error::Result;
use crate::plan::{NodeId, PhysicalPlan};
use alloc::boxed::Box;
use alloc::vec::Vec;
use tracing::{debug, warn};

/// Runs physical passes in registration order.
#[derive(Default)]
pub struct Optimizer {
    passes: Vec<Box<dyn PhysicalPass>>,
}

impl Optimizer {
    /// Creates an optimizer with no passes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an optimizer with custom passes.
    pub fn with_passes(passes: Vec<Box<dyn PhysicalPass>>) -> Self {
        Self { passes }
    }

    /// Appends a pass.
    pub fn add_pass(&mut self, pass: Box<dyn PhysicalPass>) -> &mut Self {
        self.passes.push(pass);
        self
    }

    /// Names of the registered passes, in order.
    pub fn pass_names(&self) -> Vec<&'static str> {
        self.passes.iter().map(|p| p.name()).collect()
    }

    /// Applies every pass to the plan under `root` and returns the final root.
    ///
    /// Stops at the first failing pass. With `verify_mutations` set, a pass
    /// that leaves the graph inconsistent fails the run with
    /// [`PlanError::DanglingGraph`](crate::error::PlanError::DanglingGraph).
    pub fn optimize(&self, plan: &mut PhysicalPlan, root: NodeId) -> Result<NodeId> {
        let mut root = root;
        for pass in &self.passes {
            root = pass.apply(plan, root)?;
            plan.node(root)?;
            debug!(pass = pass.name(), root = %root, nodes = plan.len(), "applied physical pass");

            if plan.config().verify_mutations {
                if let Err(err) = plan.verify() {
                    warn!(pass = pass.name(), "pass left the plan inconsistent");
                    return Err(err);
                }
            }
        }
        Ok(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Expr;
    use crate::error::PlanError;
    use crate::plan::PhysicalOpType;
    use alloc::sync::Arc;
    use alloc::vec;
    use strata_core::schema::TableBuilder;
    use strata_core::DataType;
    use strata_storage::{MemTableHandler, TableHandler};

    struct CapRows(u32);

    impl PhysicalPass for CapRows {
        fn apply(&self, plan: &mut PhysicalPlan, root: NodeId) -> Result<NodeId> {
            plan.limit(root, self.0)
        }

        fn name(&self) -> &'static str {
            "cap_rows"
        }
    }

    struct DropRoot;

    impl PhysicalPass for DropRoot {
        fn apply(&self, plan: &mut PhysicalPlan, root: NodeId) -> Result<NodeId> {
            plan.remove(root)?;
            Ok(root)
        }
    }

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
    fn test_passes_run_in_order() {
        let mut plan = PhysicalPlan::new();
        let scan = plan.scan_table(table()).unwrap();
        let mut optimizer = Optimizer::new();
        optimizer.add_pass(Box::new(CapRows(10))).add_pass(Box::new(CapRows(5)));
        assert_eq!(optimizer.pass_names(), vec!["cap_rows", "cap_rows"]);

        let root = optimizer.optimize(&mut plan, scan).unwrap();
        assert_eq!(plan.node(root).unwrap().kind(), PhysicalOpType::Limit);
        assert_eq!(plan.post_order(root).unwrap().len(), 3);
    }

    #[test]
    fn test_stale_root_fails_run() {
        let mut plan = PhysicalPlan::new();
        let scan = plan.scan_table(table()).unwrap();
        let filter = plan.filter(scan, Expr::literal(true)).unwrap();
        let passes: Vec<Box<dyn PhysicalPass>> = vec![Box::new(DropRoot), Box::new(CapRows(1))];
        let optimizer = Optimizer::with_passes(passes);
        assert_eq!(optimizer.pass_names(), vec!["unnamed", "cap_rows"]);

        let err = optimizer.optimize(&mut plan, filter).unwrap_err();
        assert_eq!(err, PlanError::InvalidHandle(filter));
    }

    #[test]
    fn test_candidates_cover_subtree() {
        let mut plan = PhysicalPlan::new();
        let scan = plan.scan_table(table()).unwrap();
        let distinct = plan.distinct(scan).unwrap();
        assert_eq!(candidates(&plan, distinct).unwrap(), vec![scan, distinct]);
    }
}
