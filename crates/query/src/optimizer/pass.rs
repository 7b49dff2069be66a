//! Physical pass trait.

use crate::error::Result;
use crate::plan::{NodeId, PhysicalPlan};
use alloc::vec::Vec;

/// A rewrite over a physical plan.
///
/// Passes mutate the arena only through its public API (`update_producer`,
/// `refresh_schema`, `remove` and the constructors), so producer/consumer
/// links stay symmetric whatever a pass does.
pub trait PhysicalPass {
    /// Rewrites the plan under `root` and returns the root of the result.
    fn apply(&self, plan: &mut PhysicalPlan, root: NodeId) -> Result<NodeId>;

    /// Returns the name of this pass.
    fn name(&self) -> &'static str {
        "unnamed"
    }
}

/// Nodes under `root`, bottom-up, whose capability hooks allow them to act as
/// both sink and source.
pub fn candidates(plan: &PhysicalPlan, root: NodeId) -> Result<Vec<NodeId>> {
    let order = plan.post_order(root)?;
    Ok(order
        .into_iter()
        .filter(|&id| plan.get(id).map_or(false, |n| n.consume() && n.produce()))
        .collect())
}
