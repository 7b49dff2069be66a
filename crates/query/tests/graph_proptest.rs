//! Property-based tests for producer/consumer link symmetry.
//!
//! Plans are built from random operator sequences, then rewired and pruned at
//! random. Whatever mix of successful and rejected mutations happens, every
//! producer link must be mirrored by exactly one consumer entry.

use proptest::prelude::*;
use std::sync::Arc;
use strata_core::schema::TableBuilder;
use strata_core::DataType;
use strata_query::ast::Expr;
use strata_query::plan::{NodeId, PhysicalPlan};
use strata_query::{PlanConfig, PlanError};
use strata_storage::{MemTableHandler, TableHandler};

fn table(name: &str) -> Arc<dyn TableHandler> {
    let table = TableBuilder::new("db", name)
        .unwrap()
        .add_column("a", DataType::Int64)
        .unwrap()
        .build()
        .unwrap();
    Arc::new(MemTableHandler::new(table).unwrap())
}

/// A construction step: operator selector plus two input picks.
fn build_strategy() -> impl Strategy<Value = Vec<(u8, usize, usize)>> {
    prop::collection::vec((0u8..5, any::<usize>(), any::<usize>()), 0..24)
}

/// A mutation: rewire (node, producer index, new producer) or remove (node).
#[derive(Clone, Debug)]
enum Mutation {
    Rewire(usize, usize, usize),
    Remove(usize),
}

fn mutation_strategy() -> impl Strategy<Value = Vec<Mutation>> {
    prop::collection::vec(
        prop_oneof![
            3 => (any::<usize>(), 0usize..3, any::<usize>()).prop_map(|(n, i, p)| Mutation::Rewire(n, i, p)),
            1 => any::<usize>().prop_map(Mutation::Remove),
        ],
        0..32,
    )
}

fn build(plan: &mut PhysicalPlan, steps: &[(u8, usize, usize)]) -> Vec<NodeId> {
    let mut nodes: Vec<NodeId> = (0..3).map(|i| plan.scan_table(table(&format!("t{}", i))).unwrap()).collect();
    for &(op, a, b) in steps {
        let left = nodes[a % nodes.len()];
        let right = nodes[b % nodes.len()];
        let id = match op {
            0 => plan.filter(left, Expr::literal(true)),
            1 => plan.union(left, right, a % 2 == 0),
            2 => plan.distinct(left),
            3 => plan.limit(left, 10),
            _ => plan.rename(left, "r"),
        }
        .unwrap();
        nodes.push(id);
    }
    nodes
}

fn assert_symmetric(plan: &PhysicalPlan) {
    for (id, node) in plan.iter() {
        assert_eq!(node.producers().len(), node.kind().arity());
        for &producer in node.producers() {
            let forward = node.producers().iter().filter(|&&p| p == producer).count();
            let backward = plan
                .consumers(producer)
                .unwrap()
                .iter()
                .filter(|&&c| c == id)
                .count();
            assert_eq!(forward, backward, "{} -> {}", id, producer);
        }
        for &consumer in node.consumers() {
            assert!(plan.producers(consumer).unwrap().contains(&id));
        }
    }
}

proptest! {
    /// Property: back-links mirror producer links after every accepted or rejected rewrite.
    #[test]
    fn links_stay_symmetric(steps in build_strategy(), mutations in mutation_strategy()) {
        let mut plan = PhysicalPlan::with_config(PlanConfig::new().verify_mutations(true));
        let mut nodes = build(&mut plan, &steps);
        assert_symmetric(&plan);

        for mutation in mutations {
            match mutation {
                Mutation::Rewire(n, index, p) => {
                    let node = nodes[n % nodes.len()];
                    let producer = nodes[p % nodes.len()];
                    let before = plan.producers(node).unwrap().to_vec();
                    match plan.update_producer(node, index, producer) {
                        Ok(()) => {
                            prop_assert_eq!(plan.producers(node).unwrap()[index], producer);
                        }
                        Err(PlanError::ArityViolation { .. }) | Err(PlanError::DanglingGraph { .. }) => {
                            prop_assert_eq!(plan.producers(node).unwrap(), &before[..]);
                        }
                        Err(other) => {
                            prop_assert!(false, "unexpected error {}", other);
                        }
                    }
                }
                Mutation::Remove(n) => {
                    let node = nodes[n % nodes.len()];
                    match plan.remove(node) {
                        Ok(_) => {
                            nodes.retain(|&id| id != node);
                            prop_assert!(!plan.contains(node));
                        }
                        Err(PlanError::NodeInUse { consumers, .. }) => {
                            prop_assert!(!consumers.is_empty());
                        }
                        Err(other) => {
                            prop_assert!(false, "unexpected error {}", other);
                        }
                    }
                }
            }
            assert_symmetric(&plan);
            prop_assert!(plan.verify().is_ok());
            if nodes.is_empty() {
                break;
            }
        }
        prop_assert_eq!(plan.len(), nodes.len());
    }

    /// Property: discarding every root empties the plan.
    #[test]
    fn discarding_roots_frees_everything(steps in build_strategy()) {
        let mut plan = PhysicalPlan::new();
        let nodes = build(&mut plan, &steps);
        let mut freed = 0;
        for root in plan.roots() {
            freed += plan.discard_subtree(root).unwrap();
        }
        prop_assert_eq!(freed, nodes.len());
        prop_assert!(plan.is_empty());
    }
}
