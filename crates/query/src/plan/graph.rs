//! Plan arena: node ownership, construction and producer/consumer wiring.

use super::frozen::FrozenPlan;
use super::node::{NodeId, PhysicalNode};
use super::op::{PhysicalOp, ProjectType, ScanOp, ScanType};
use super::schema::derive_schema;
use crate::ast::{Expr, JoinType, OrderBy};
use crate::config::PlanConfig;
use crate::error::{PlanError, Result};
use alloc::format;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicU32, Ordering};
use hashbrown::HashSet;
use strata_core::schema::Schema;
use strata_storage::TableHandler;
use tracing::{debug, trace};

/// Plan id generator, so handles from one arena are rejected by another.
static NEXT_PLAN_ID: AtomicU32 = AtomicU32::new(1);

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<PhysicalNode>,
}

/// Arena owning every node of one physical plan.
///
/// Nodes refer to each other through [`NodeId`] handles. All link changes go
/// through the arena, which updates a node's producer list and the matching
/// consumer entry on the producer in the same call.
#[derive(Debug)]
pub struct PhysicalPlan {
    id: u32,
    slots: Vec<Slot>,
    free: Vec<u32>,
    len: usize,
    config: PlanConfig,
}

impl Default for PhysicalPlan {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicalPlan {
    /// Creates an empty plan with the default configuration.
    pub fn new() -> Self {
        Self::with_config(PlanConfig::default())
    }

    /// Creates an empty plan with the given configuration.
    pub fn with_config(config: PlanConfig) -> Self {
        Self {
            id: NEXT_PLAN_ID.fetch_add(1, Ordering::Relaxed),
            slots: Vec::with_capacity(config.initial_capacity),
            free: Vec::new(),
            len: 0,
            config,
        }
    }

    /// Returns the arena configuration.
    pub fn config(&self) -> &PlanConfig {
        &self.config
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the plan has no live nodes.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns true if `id` refers to a live node of this plan.
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Returns the node for `id`, or `None` for stale and foreign handles.
    pub fn get(&self, id: NodeId) -> Option<&PhysicalNode> {
        if id.plan != self.id {
            return None;
        }
        let slot = self.slots.get(id.index())?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_ref()
    }

    /// Returns the node for `id`.
    pub fn node(&self, id: NodeId) -> Result<&PhysicalNode> {
        self.get(id).ok_or(PlanError::InvalidHandle(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut PhysicalNode> {
        if id.plan != self.id {
            return Err(PlanError::InvalidHandle(id));
        }
        self.slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
            .ok_or(PlanError::InvalidHandle(id))
    }

    /// Input handles of `id`, in order.
    pub fn producers(&self, id: NodeId) -> Result<&[NodeId]> {
        Ok(self.node(id)?.producers())
    }

    /// Handles of the nodes consuming `id`.
    pub fn consumers(&self, id: NodeId) -> Result<&[NodeId]> {
        Ok(self.node(id)?.consumers())
    }

    /// Iterates over live nodes in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &PhysicalNode)> + '_ {
        let plan = self.id;
        self.slots.iter().enumerate().filter_map(move |(index, slot)| {
            slot.node.as_ref().map(|node| {
                let id = NodeId {
                    plan,
                    index: index as u32,
                    generation: slot.generation,
                };
                (id, node)
            })
        })
    }

    /// Nodes that no other node consumes.
    pub fn roots(&self) -> Vec<NodeId> {
        self.iter()
            .filter(|(_, node)| node.consumers.is_empty())
            .map(|(id, _)| id)
            .collect()
    }

    fn alloc(&mut self, node: PhysicalNode) -> NodeId {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            return NodeId {
                plan: self.id,
                index,
                generation: slot.generation,
            };
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        NodeId {
            plan: self.id,
            index,
            generation: 0,
        }
    }

    /// Derives the schema, allocates the node and wires its producers.
    ///
    /// Producers are validated before anything is allocated, so a failed
    /// construction leaves the arena untouched.
    fn insert(&mut self, op: PhysicalOp, producers: &[NodeId], explicit: Option<Schema>) -> Result<NodeId> {
        let inputs = producers
            .iter()
            .map(|&p| self.node(p).map(|n| n.output_schema()))
            .collect::<Result<Vec<_>>>()?;
        let schema = match derive_schema(&op, &inputs)? {
            Some(schema) => schema,
            None => explicit.unwrap_or_default(),
        };

        let kind = op.kind();
        let width = schema.len();
        let id = self.alloc(PhysicalNode::new(op, schema));
        for &producer in producers {
            self.add_producer(id, producer)?;
        }
        debug!(node = %id, kind = %kind, width, "created plan node");
        Ok(id)
    }

    /// Full table scan over `table`.
    pub fn scan_table(&mut self, table: Arc<dyn TableHandler>) -> Result<NodeId> {
        let op = PhysicalOp::Scan(ScanOp {
            table,
            scan_type: ScanType::Table,
        });
        self.insert(op, &[], None)
    }

    /// Scan of `table` through the named index.
    pub fn scan_index(&mut self, table: Arc<dyn TableHandler>, index: impl Into<String>) -> Result<NodeId> {
        let index = index.into();
        if table.index(&index).is_none() {
            return Err(strata_core::Error::index_not_found(table.name(), index).into());
        }
        let op = PhysicalOp::Scan(ScanOp {
            table,
            scan_type: ScanType::Index(index),
        });
        self.insert(op, &[], None)
    }

    /// Row filter.
    pub fn filter(&mut self, input: NodeId, condition: Expr) -> Result<NodeId> {
        self.insert(PhysicalOp::Filter { condition }, &[input], None)
    }

    /// Grouping by key expressions.
    pub fn group_by(&mut self, input: NodeId, groups: Vec<Expr>) -> Result<NodeId> {
        self.insert(PhysicalOp::GroupBy { groups }, &[input], None)
    }

    /// Global sort.
    pub fn sort_by(&mut self, input: NodeId, order: OrderBy) -> Result<NodeId> {
        self.insert(PhysicalOp::SortBy { order }, &[input], None)
    }

    /// Row projection through `fn_name`, producing `schema`.
    pub fn row_project(&mut self, input: NodeId, fn_name: impl Into<String>, schema: Schema) -> Result<NodeId> {
        let op = PhysicalOp::Project {
            project_type: ProjectType::Row,
            fn_name: fn_name.into(),
        };
        self.insert(op, &[input], Some(schema))
    }

    /// Aggregating projection through `fn_name`, producing `schema`.
    pub fn aggregation(&mut self, input: NodeId, fn_name: impl Into<String>, schema: Schema) -> Result<NodeId> {
        let op = PhysicalOp::Project {
            project_type: ProjectType::Aggregation,
            fn_name: fn_name.into(),
        };
        self.insert(op, &[input], Some(schema))
    }

    /// Window bounded by relative row offsets.
    pub fn buffer(&mut self, input: NodeId, start_offset: i64, end_offset: i64) -> Result<NodeId> {
        let op = PhysicalOp::Buffer {
            start_offset,
            end_offset,
        };
        self.insert(op, &[input], None)
    }

    /// Per-partition iteration.
    pub fn loops(&mut self, input: NodeId) -> Result<NodeId> {
        self.insert(PhysicalOp::Loops, &[input], None)
    }

    /// Join of `left` and `right`.
    ///
    /// Fails with [`PlanError::SchemaIncompatible`] when an equality in
    /// `condition` compares a left column with a right column of an
    /// incompatible type.
    pub fn join(&mut self, left: NodeId, right: NodeId, join_type: JoinType, condition: Expr) -> Result<NodeId> {
        let op = PhysicalOp::Join {
            join_type,
            condition,
        };
        self.insert(op, &[left, right], None)
    }

    /// Union of two inputs with compatible schemas.
    pub fn union(&mut self, left: NodeId, right: NodeId, is_all: bool) -> Result<NodeId> {
        self.insert(PhysicalOp::Union { is_all }, &[left, right], None)
    }

    /// Row count cap.
    pub fn limit(&mut self, input: NodeId, limit: u32) -> Result<NodeId> {
        self.insert(PhysicalOp::Limit { limit }, &[input], None)
    }

    /// Relation rename.
    pub fn rename(&mut self, input: NodeId, name: impl Into<String>) -> Result<NodeId> {
        self.insert(PhysicalOp::Rename { name: name.into() }, &[input], None)
    }

    /// Duplicate elimination.
    pub fn distinct(&mut self, input: NodeId) -> Result<NodeId> {
        self.insert(PhysicalOp::Distinct, &[input], None)
    }

    /// Appends `producer` to the inputs of `node`.
    ///
    /// Fails with [`PlanError::ArityViolation`] if `node` already has all the
    /// producers its kind takes.
    pub fn add_producer(&mut self, node: NodeId, producer: NodeId) -> Result<()> {
        self.node(producer)?;
        let target = self.node(node)?;
        let arity = target.kind.arity();
        if target.producers.len() >= arity {
            return Err(PlanError::ArityViolation {
                node,
                kind: target.kind,
                index: target.producers.len(),
                arity,
            });
        }
        self.link(node, producer)
    }

    /// Adds `consumer` as a consumer of `producer`.
    ///
    /// Same wiring as [`add_producer`](Self::add_producer), addressed from the
    /// producer side.
    pub fn add_consumer(&mut self, producer: NodeId, consumer: NodeId) -> Result<()> {
        self.add_producer(consumer, producer)
    }

    // Both handles are validated by the caller.
    fn link(&mut self, node: NodeId, producer: NodeId) -> Result<()> {
        self.node_mut(producer)?.consumers.push(node);
        self.node_mut(node)?.producers.push(producer);
        Ok(())
    }

    /// Removes one `node` entry from the consumers of `producer`.
    fn unlink(&mut self, node: NodeId, producer: NodeId) -> Result<()> {
        let consumers = &mut self.node_mut(producer)?.consumers;
        match consumers.iter().position(|&c| c == node) {
            Some(pos) => {
                consumers.remove(pos);
                Ok(())
            }
            None => Err(PlanError::dangling(format!(
                "{} is missing from the consumers of {}",
                node, producer
            ))),
        }
    }

    /// Replaces the producer of `node` at `index` with `new_producer`.
    ///
    /// Consumer back-links of the old and new producer are updated in the same
    /// call. The output schema of `node` is left as is; call
    /// [`refresh_schema`](Self::refresh_schema) when the rewrite changes the
    /// input shape.
    pub fn update_producer(&mut self, node: NodeId, index: usize, new_producer: NodeId) -> Result<()> {
        let target = self.node(node)?;
        let kind = target.kind;
        let arity = kind.arity();
        let old = match target.producers.get(index) {
            Some(&old) if index < arity => old,
            _ => {
                return Err(PlanError::ArityViolation {
                    node,
                    kind,
                    index,
                    arity,
                })
            }
        };
        self.node(new_producer)?;

        if self.config.verify_mutations && self.depends_on(new_producer, node)? {
            return Err(PlanError::dangling(format!(
                "producer {} of {} would create a cycle",
                new_producer, node
            )));
        }
        if old == new_producer {
            return Ok(());
        }

        self.unlink(node, old)?;
        self.node_mut(new_producer)?.consumers.push(node);
        self.node_mut(node)?.producers[index] = new_producer;
        debug!(node = %node, index, old = %old, new = %new_producer, "updated producer");

        if self.config.verify_mutations {
            self.verify()?;
        }
        Ok(())
    }

    /// Recomputes the output schema of `id` from its current producers.
    ///
    /// Projections keep the schema they were given. Returns true if the
    /// schema changed.
    pub fn refresh_schema(&mut self, id: NodeId) -> Result<bool> {
        let node = self.node(id)?;
        let inputs = node
            .producers
            .iter()
            .map(|&p| self.node(p).map(|n| n.output_schema()))
            .collect::<Result<Vec<_>>>()?;
        let Some(schema) = derive_schema(&node.op, &inputs)? else {
            return Ok(false);
        };

        let node = self.node_mut(id)?;
        if node.output_schema == schema {
            return Ok(false);
        }
        debug!(node = %id, from = %node.output_schema, to = %schema, "refreshed schema");
        node.output_schema = schema;
        Ok(true)
    }

    /// Returns true if `target` is `node` or one of its transitive producers.
    pub fn depends_on(&self, node: NodeId, target: NodeId) -> Result<bool> {
        self.node(node)?;
        let mut visited = HashSet::new();
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            if id == target {
                return Ok(true);
            }
            if visited.insert(id) {
                stack.extend_from_slice(self.node(id)?.producers());
            }
        }
        Ok(false)
    }

    /// Frees `id`, which must have no consumers, and unlinks it from its
    /// producers. Returns the detached node.
    pub fn remove(&mut self, id: NodeId) -> Result<PhysicalNode> {
        let node = self.detach(id)?;
        if self.config.verify_mutations {
            self.verify()?;
        }
        Ok(node)
    }

    /// Frees `root` and every producer left without consumers as a result.
    ///
    /// Nodes still consumed from outside the subtree survive. Returns the
    /// number of nodes freed.
    pub fn discard_subtree(&mut self, root: NodeId) -> Result<usize> {
        let mut pending = self.detach(root)?.producers;
        let mut freed = 1;
        while let Some(id) = pending.pop() {
            // Freed already through a repeated producer entry.
            if !self.contains(id) {
                continue;
            }
            if !self.node(id)?.consumers.is_empty() {
                continue;
            }
            pending.extend(self.detach(id)?.producers);
            freed += 1;
        }
        debug!(root = %root, freed, "discarded subtree");
        if self.config.verify_mutations {
            self.verify()?;
        }
        Ok(freed)
    }

    fn detach(&mut self, id: NodeId) -> Result<PhysicalNode> {
        let node = self.node(id)?;
        if !node.consumers.is_empty() {
            return Err(PlanError::NodeInUse {
                node: id,
                consumers: node.consumers.clone(),
            });
        }
        let producers = node.producers.clone();
        for producer in producers {
            self.unlink(id, producer)?;
        }

        let slot = &mut self.slots[id.index()];
        let node = slot.node.take().ok_or(PlanError::InvalidHandle(id))?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.len -= 1;
        debug!(node = %id, kind = %node.kind, "removed plan node");
        Ok(node)
    }

    /// Nodes reachable from `root`, producers before consumers, each once.
    pub fn post_order(&self, root: NodeId) -> Result<Vec<NodeId>> {
        self.node(root)?;
        let mut visited = HashSet::new();
        let mut order = Vec::new();
        let mut stack = vec![(root, false)];
        while let Some((id, expanded)) = stack.pop() {
            if expanded {
                order.push(id);
                continue;
            }
            if !visited.insert(id) {
                continue;
            }
            stack.push((id, true));
            for &producer in self.node(id)?.producers().iter().rev() {
                if !visited.contains(&producer) {
                    stack.push((producer, false));
                }
            }
        }
        trace!(root = %root, nodes = order.len(), "post-order walk");
        Ok(order)
    }

    /// Nodes reachable from `root`, consumers before producers, each once.
    pub fn pre_order(&self, root: NodeId) -> Result<Vec<NodeId>> {
        self.node(root)?;
        let mut visited = HashSet::new();
        let mut order = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            order.push(id);
            stack.extend(self.node(id)?.producers().iter().rev());
        }
        trace!(root = %root, nodes = order.len(), "pre-order walk");
        Ok(order)
    }

    /// Verifies the graph and hands it over as an immutable plan rooted at `root`.
    pub fn freeze(self, root: NodeId) -> Result<FrozenPlan> {
        self.node(root)?;
        self.verify()?;
        Ok(FrozenPlan::new(self, root))
    }
}
