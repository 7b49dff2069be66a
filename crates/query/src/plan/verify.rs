//! Graph invariant checker.

use super::graph::PhysicalPlan;
use super::node::{NodeId, PhysicalNode};
use crate::error::{PlanError, Result};
use alloc::format;
use alloc::vec;
use hashbrown::HashMap;
use tracing::warn;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

impl PhysicalPlan {
    /// Checks arity, handle liveness, back-link symmetry and acyclicity.
    ///
    /// Returns [`PlanError::DanglingGraph`] describing the first violation.
    pub fn verify(&self) -> Result<()> {
        let result = self.check_links().and_then(|_| self.check_acyclic());
        if let Err(err) = &result {
            warn!(error = %err, nodes = self.len(), "plan verification failed");
        }
        result
    }

    fn check_links(&self) -> Result<()> {
        for (id, node) in self.iter() {
            let arity = node.kind().arity();
            if node.producers().len() != arity {
                return Err(PlanError::dangling(format!(
                    "{} node {} has {} producers, expected {}",
                    node.kind(),
                    id,
                    node.producers().len(),
                    arity
                )));
            }
            for &producer in node.producers() {
                let other = self.live(id, producer, "producer")?;
                let forward = count(node.producers(), producer);
                let backward = count(other.consumers(), id);
                if forward != backward {
                    return Err(PlanError::dangling(format!(
                        "{} lists {} as producer {} times but is listed as its consumer {} times",
                        id, producer, forward, backward
                    )));
                }
            }
            for &consumer in node.consumers() {
                let other = self.live(id, consumer, "consumer")?;
                if count(other.producers(), id) != count(node.consumers(), consumer) {
                    return Err(PlanError::dangling(format!(
                        "{} lists {} as consumer without a matching producer link",
                        id, consumer
                    )));
                }
            }
        }
        Ok(())
    }

    fn live(&self, from: NodeId, to: NodeId, role: &str) -> Result<&PhysicalNode> {
        self.get(to)
            .ok_or_else(|| PlanError::dangling(format!("{} links to stale {} {}", from, role, to)))
    }

    fn check_acyclic(&self) -> Result<()> {
        let mut marks: HashMap<NodeId, Mark> = HashMap::with_capacity(self.len());
        for (start, _) in self.iter() {
            if marks.contains_key(&start) {
                continue;
            }
            // (node, next producer position)
            let mut stack = vec![(start, 0usize)];
            marks.insert(start, Mark::Visiting);
            while let Some(top) = stack.last_mut() {
                let (id, next) = *top;
                if let Some(&producer) = self.node(id)?.producers().get(next) {
                    top.1 += 1;
                    match marks.get(&producer) {
                        Some(Mark::Visiting) => {
                            return Err(PlanError::dangling(format!(
                                "cycle through {} and its producer {}",
                                id, producer
                            )));
                        }
                        Some(Mark::Done) => {}
                        None => {
                            marks.insert(producer, Mark::Visiting);
                            stack.push((producer, 0));
                        }
                    }
                } else {
                    marks.insert(id, Mark::Done);
                    stack.pop();
                }
            }
        }
        Ok(())
    }
}

fn count(ids: &[NodeId], id: NodeId) -> usize {
    ids.iter().filter(|&&other| other == id).count()
}

#[cfg(test)]
mod tests {
    use crate::ast::Expr;
    use crate::config::PlanConfig;
    use crate::error::PlanError;
    use crate::plan::PhysicalPlan;
    use alloc::sync::Arc;
    use strata_core::schema::TableBuilder;
    use strata_core::DataType;
    use strata_storage::{MemTableHandler, TableHandler};

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
    fn test_valid_plan() {
        let mut plan = PhysicalPlan::new();
        let a = plan.scan_table(table()).unwrap();
        let b = plan.scan_table(table()).unwrap();
        let union = plan.union(a, b, false).unwrap();
        plan.distinct(union).unwrap();
        plan.verify().unwrap();
    }

    #[test]
    fn test_detects_cycle() {
        let mut plan = PhysicalPlan::with_config(PlanConfig::new().verify_mutations(false));
        let scan = plan.scan_table(table()).unwrap();
        let filter = plan.filter(scan, Expr::literal(true)).unwrap();
        let limit = plan.limit(filter, 1).unwrap();

        plan.update_producer(filter, 0, limit).unwrap();
        let err = plan.verify().unwrap_err();
        assert!(matches!(err, PlanError::DanglingGraph { .. }));
    }

    #[test]
    fn test_detects_self_loop() {
        let mut plan = PhysicalPlan::with_config(PlanConfig::new().verify_mutations(false));
        let scan = plan.scan_table(table()).unwrap();
        let loops = plan.loops(scan).unwrap();

        plan.update_producer(loops, 0, loops).unwrap();
        assert!(plan.verify().is_err());
    }
}
