//! Benchmarks for plan construction, rewiring and verification.
//!
//! Plans are balanced union trees over single-column scans, so every size
//! exercises both unary and binary wiring.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use std::sync::Arc;
use strata_core::schema::TableBuilder;
use strata_core::DataType;
use strata_query::ast::Expr;
use strata_query::plan::{NodeId, PhysicalPlan};
use strata_query::PlanConfig;
use strata_storage::{MemTableHandler, TableHandler};

fn table() -> Arc<dyn TableHandler> {
    let table = TableBuilder::new("bench", "t")
        .unwrap()
        .add_column("a", DataType::Int64)
        .unwrap()
        .add_column("b", DataType::String)
        .unwrap()
        .build()
        .unwrap();
    Arc::new(MemTableHandler::new(table).unwrap())
}

/// Builds `leaves` filtered scans merged pairwise by unions. Returns the root.
fn build_plan(plan: &mut PhysicalPlan, handler: &Arc<dyn TableHandler>, leaves: usize) -> NodeId {
    let mut level: Vec<NodeId> = (0..leaves)
        .map(|i| {
            let scan = plan.scan_table(Arc::clone(handler)).unwrap();
            let cond = Expr::gt(Expr::column("t", "a"), Expr::literal(i as i64));
            plan.filter(scan, cond).unwrap()
        })
        .collect();
    while level.len() > 1 {
        level = level
            .chunks(2)
            .map(|pair| match pair {
                [l, r] => plan.union(*l, *r, true).unwrap(),
                [single] => plan.distinct(*single).unwrap(),
                _ => unreachable!(),
            })
            .collect();
    }
    level[0]
}

fn config(verify: bool) -> PlanConfig {
    PlanConfig::new().verify_mutations(verify).initial_capacity(4096)
}

fn bench_build(c: &mut Criterion) {
    let handler = table();
    let mut group = c.benchmark_group("plan_build");
    for leaves in [16usize, 256, 1024] {
        group.bench_with_input(BenchmarkId::from_parameter(leaves), &leaves, |b, &leaves| {
            b.iter(|| {
                let mut plan = PhysicalPlan::with_config(config(false));
                black_box(build_plan(&mut plan, &handler, leaves))
            })
        });
    }
    group.finish();
}

fn bench_update_producer(c: &mut Criterion) {
    let handler = table();
    let mut group = c.benchmark_group("update_producer");
    for verify in [false, true] {
        group.bench_function(if verify { "verified" } else { "unchecked" }, |b| {
            b.iter_batched(
                || {
                    let mut plan = PhysicalPlan::with_config(config(verify));
                    let root = build_plan(&mut plan, &handler, 256);
                    let spare = plan.scan_table(Arc::clone(&handler)).unwrap();
                    (plan, root, spare)
                },
                |(mut plan, root, spare)| {
                    plan.update_producer(root, 1, spare).unwrap();
                    black_box(plan)
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_traversal(c: &mut Criterion) {
    let handler = table();
    let mut plan = PhysicalPlan::with_config(config(false));
    let root = build_plan(&mut plan, &handler, 1024);

    c.bench_function("post_order_1024", |b| b.iter(|| black_box(plan.post_order(root).unwrap())));
    c.bench_function("verify_1024", |b| b.iter(|| black_box(plan.verify().unwrap())));
}

criterion_group!(benches, bench_build, bench_update_producer, bench_traversal);
criterion_main!(benches);
