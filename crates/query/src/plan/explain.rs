//! Indented text rendering of a plan, for logs and tests.

use super::graph::PhysicalPlan;
use super::node::NodeId;
use crate::error::{PlanError, Result};
use alloc::format;
use alloc::string::{String, ToString};
use core::fmt::Write;
use hashbrown::HashSet;

/// Renders the tree under `root`, one node per line, producers indented by
/// two spaces under their consumer.
///
/// ```text
/// PROJECT(type=Aggregation, fn=agg_fn)
///   GROUP_BY(groups=[t1.card])
///     FILTER_BY(condition=t1.price > 10)
///       SCAN(type=TableScan, table=t1)
/// ```
///
/// A node with several consumers is tagged with its handle where it is first
/// printed, and later visits print a `-> #3v0` back-reference instead of the
/// subtree. A cycle is reported as [`PlanError::DanglingGraph`].
pub fn explain(plan: &PhysicalPlan, root: NodeId) -> Result<String> {
    let mut out = String::new();
    let mut walk = Walk {
        plan,
        printed: HashSet::new(),
        path: HashSet::new(),
    };
    walk.write_node(root, 0, &mut out)?;
    Ok(out)
}

/// Renders the output schema of `id`, e.g. `[card:string, total:int64]`.
pub fn explain_schema(plan: &PhysicalPlan, id: NodeId) -> Result<String> {
    Ok(plan.node(id)?.output_schema().to_string())
}

struct Walk<'a> {
    plan: &'a PhysicalPlan,
    printed: HashSet<NodeId>,
    path: HashSet<NodeId>,
}

impl Walk<'_> {
    fn write_node(&mut self, id: NodeId, depth: usize, out: &mut String) -> Result<()> {
        if self.path.contains(&id) {
            return Err(PlanError::dangling(format!("cycle below {}", id)));
        }
        let node = self.plan.node(id)?;
        indent(depth, out);
        // Writing into a String cannot fail.
        if !self.printed.insert(id) {
            let _ = writeln!(out, "-> {}", id);
            return Ok(());
        }
        if node.consumers().len() > 1 {
            let _ = writeln!(out, "{} {}", node.op(), id);
        } else {
            let _ = writeln!(out, "{}", node.op());
        }
        self.path.insert(id);
        for &producer in node.producers() {
            self.write_node(producer, depth + 1, out)?;
        }
        self.path.remove(&id);
        Ok(())
    }
}

fn indent(depth: usize, out: &mut String) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Expr, JoinType, OrderBy};
    use crate::config::PlanConfig;
    use alloc::sync::Arc;
    use alloc::vec;
    use strata_core::schema::{Column, Schema, TableBuilder};
    use strata_core::DataType;
    use strata_storage::{MemTableHandler, TableHandler};

    fn table(name: &str) -> Arc<dyn TableHandler> {
        let table = TableBuilder::new("db", name)
            .unwrap()
            .add_column("card", DataType::String)
            .unwrap()
            .add_column("price", DataType::Int64)
            .unwrap()
            .build()
            .unwrap();
        Arc::new(MemTableHandler::new(table).unwrap())
    }

    #[test]
    fn test_explain_aggregation_pipeline() {
        let mut plan = PhysicalPlan::new();
        let scan = plan.scan_table(table("t1")).unwrap();
        let filter = plan
            .filter(scan, Expr::gt(Expr::column("t1", "price"), Expr::literal(10i64)))
            .unwrap();
        let group = plan.group_by(filter, vec![Expr::column("t1", "card")]).unwrap();
        let schema = Schema::new(vec![
            Column::new("card", DataType::String),
            Column::new("total", DataType::Int64),
        ]);
        let agg = plan.aggregation(group, "agg_fn", schema).unwrap();

        let expected = "\
PROJECT(type=Aggregation, fn=agg_fn)
  GROUP_BY(groups=[t1.card])
    FILTER_BY(condition=t1.price > 10)
      SCAN(type=TableScan, table=t1)
";
        assert_eq!(explain(&plan, agg).unwrap(), expected);
        assert_eq!(explain_schema(&plan, agg).unwrap(), "[card:string, total:int64]");
    }

    #[test]
    fn test_explain_binary() {
        let mut plan = PhysicalPlan::new();
        let a = plan.scan_table(table("a")).unwrap();
        let b = plan.scan_table(table("b")).unwrap();
        let join = plan
            .join(a, b, JoinType::Left, Expr::eq(Expr::column("a", "card"), Expr::column("b", "card")))
            .unwrap();
        let sort = plan.sort_by(join, OrderBy::desc(Expr::column("a", "price"))).unwrap();

        let expected = "\
SORT_BY(order=[a.price DESC])
  JOIN(type=LeftJoin, condition=a.card = b.card)
    SCAN(type=TableScan, table=a)
    SCAN(type=TableScan, table=b)
";
        assert_eq!(explain(&plan, sort).unwrap(), expected);
    }

    #[test]
    fn test_explain_prints_shared_nodes_once() {
        let mut plan = PhysicalPlan::new();
        let scan = plan.scan_table(table("t")).unwrap();
        let u1 = plan.union(scan, scan, true).unwrap();
        let u2 = plan.union(u1, u1, true).unwrap();

        let expected = format!(
            "UNION(all=true)\n  UNION(all=true) {u1}\n    SCAN(type=TableScan, table=t) {scan}\n    -> {scan}\n  -> {u1}\n"
        );
        assert_eq!(explain(&plan, u2).unwrap(), expected);
    }

    #[test]
    fn test_explain_stacked_unions_stay_linear() {
        let mut plan = PhysicalPlan::new();
        let mut top = plan.scan_table(table("t")).unwrap();
        for _ in 0..24 {
            top = plan.union(top, top, true).unwrap();
        }
        // One line per node plus one back-reference per union.
        assert_eq!(explain(&plan, top).unwrap().lines().count(), 25 + 24);
    }

    #[test]
    fn test_explain_reports_cycle() {
        let mut plan = PhysicalPlan::with_config(PlanConfig::new().verify_mutations(false));
        let scan = plan.scan_table(table("t")).unwrap();
        let distinct = plan.distinct(scan).unwrap();
        plan.update_producer(distinct, 0, distinct).unwrap();
        assert!(matches!(explain(&plan, distinct), Err(PlanError::DanglingGraph { .. })));
    }
}
