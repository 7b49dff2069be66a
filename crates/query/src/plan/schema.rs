//! Output schema derivation rules, one per operator variant.

use super::op::PhysicalOp;
use crate::ast::{Expr, JoinType};
use crate::error::{PlanError, Result};
use alloc::format;
use strata_core::schema::Schema;

/// How a variant obtains its output schema.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchemaRule {
    /// Copied from the scanned table handler.
    Source,
    /// Copied from the single producer.
    Identity,
    /// Supplied by the planner at construction.
    Explicit,
    /// Left columns followed by right columns, nullability per join type.
    JoinConcat,
    /// Left schema after checking both sides are compatible.
    UnionLeft,
}

impl SchemaRule {
    /// Returns the rule a variant follows.
    pub fn of(op: &PhysicalOp) -> Self {
        match op {
            PhysicalOp::Scan(_) => SchemaRule::Source,
            PhysicalOp::Project { .. } => SchemaRule::Explicit,
            PhysicalOp::Join { .. } => SchemaRule::JoinConcat,
            PhysicalOp::Union { .. } => SchemaRule::UnionLeft,
            PhysicalOp::Filter { .. }
            | PhysicalOp::GroupBy { .. }
            | PhysicalOp::SortBy { .. }
            | PhysicalOp::Buffer { .. }
            | PhysicalOp::Loops
            | PhysicalOp::Limit { .. }
            | PhysicalOp::Rename { .. }
            | PhysicalOp::Distinct => SchemaRule::Identity,
        }
    }
}

/// Derives the output schema of `op` from its producers' schemas.
///
/// Returns `Ok(None)` for explicit-schema variants, whose schema is whatever the
/// planner supplied. An `inputs` slice that does not match the variant's arity
/// is reported as [`PlanError::DanglingGraph`].
pub fn derive_schema(op: &PhysicalOp, inputs: &[&Schema]) -> Result<Option<Schema>> {
    let kind = op.kind();
    if inputs.len() != kind.arity() {
        return Err(PlanError::dangling(format!(
            "{} takes {} inputs, got {}",
            kind,
            kind.arity(),
            inputs.len()
        )));
    }
    let schema = match op {
        PhysicalOp::Scan(scan) => scan.table.schema().clone(),
        PhysicalOp::Project { .. } => return Ok(None),
        PhysicalOp::Join {
            join_type,
            condition,
        } => join_schema(*join_type, condition, inputs[0], inputs[1])?,
        PhysicalOp::Union { .. } => union_schema(inputs[0], inputs[1])?,
        _ => inputs[0].clone(),
    };
    Ok(Some(schema))
}

/// Concatenates join inputs after checking equi-join key types.
///
/// Operands resolve by bare column name, in both orientations. A key pair is
/// rejected only when some orientation resolves and none is compatible.
pub fn join_schema(join_type: JoinType, condition: &Expr, left: &Schema, right: &Schema) -> Result<Schema> {
    for (a, b) in condition.equi_columns() {
        let orientations = [(&a.column, &b.column), (&b.column, &a.column)];
        let mut mismatch = None;
        let mut matched = false;
        for (l, r) in orientations {
            if let (Some(l), Some(r)) = (left.get(l), right.get(r)) {
                if l.data_type().is_compatible_with(r.data_type()) {
                    matched = true;
                    break;
                }
                mismatch.get_or_insert((l.data_type(), r.data_type()));
            }
        }
        // Keys that resolve to neither side are left to the expression compiler.
        if let (false, Some((l, r))) = (matched, mismatch) {
            return Err(PlanError::schema_incompatible(format!(
                "join key {} = {} compares {} with {}",
                a, b, l, r
            )));
        }
    }

    let left = if join_type.preserves_right() {
        left.with_nullable(true)
    } else {
        left.clone()
    };
    let right = if join_type.preserves_left() {
        right.with_nullable(true)
    } else {
        right.clone()
    };
    Ok(left.concat(&right))
}

/// Checks union inputs and returns the left schema.
pub fn union_schema(left: &Schema, right: &Schema) -> Result<Schema> {
    left.check_compatible(right).map_err(|e| match e {
        strata_core::Error::SchemaIncompatible { message } => PlanError::schema_incompatible(message),
        other => PlanError::Core(other),
    })?;
    Ok(left.clone())
}
