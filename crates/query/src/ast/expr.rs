//! Expression AST definitions.
//!
//! Plan nodes keep these as opaque references produced by the planner: the
//! plan never evaluates them, it only prints them and inspects column
//! references when validating joins.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use strata_core::Value;

/// Reference to a column of a named relation.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ColumnRef {
    /// Relation name (table or alias).
    pub relation: String,
    /// Column name.
    pub column: String,
}

impl ColumnRef {
    /// Creates a new column reference.
    pub fn new(relation: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            relation: relation.into(),
            column: column.into(),
        }
    }

    /// Returns the normalized name (relation.column).
    pub fn normalized_name(&self) -> String {
        alloc::format!("{}.{}", self.relation, self.column)
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.relation.is_empty() {
            f.write_str(&self.column)
        } else {
            write!(f, "{}.{}", self.relation, self.column)
        }
    }
}

/// Binary operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    // Logical
    And,
    Or,
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl BinaryOp {
    /// Returns the SQL symbol for this operator.
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Eq => "=",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::And => "AND",
            BinaryOp::Or => "OR",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
        }
    }
}

/// Unary operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Neg,
    IsNull,
    IsNotNull,
}

/// Aggregate functions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AggregateFunc {
    Count,
    Sum,
    Avg,
    Min,
    Max,
}

impl AggregateFunc {
    fn name(&self) -> &'static str {
        match self {
            AggregateFunc::Count => "count",
            AggregateFunc::Sum => "sum",
            AggregateFunc::Avg => "avg",
            AggregateFunc::Min => "min",
            AggregateFunc::Max => "max",
        }
    }
}

/// Expression AST node.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Column reference.
    Column(ColumnRef),
    /// Literal value.
    Literal(Value),
    /// Binary operation.
    BinaryOp {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },
    /// Unary operation.
    UnaryOp { op: UnaryOp, expr: Box<Expr> },
    /// Scalar function call, compiled elsewhere and referenced by name.
    Function { name: String, args: Vec<Expr> },
    /// Aggregate function.
    Aggregate {
        func: AggregateFunc,
        expr: Option<Box<Expr>>,
        distinct: bool,
    },
}

impl Expr {
    /// Creates a column reference expression.
    pub fn column(relation: impl Into<String>, column: impl Into<String>) -> Self {
        Expr::Column(ColumnRef::new(relation, column))
    }

    /// Creates a literal expression.
    pub fn literal(value: impl Into<Value>) -> Self {
        Expr::Literal(value.into())
    }

    fn binary(left: Expr, op: BinaryOp, right: Expr) -> Self {
        Expr::BinaryOp {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    /// Creates an equality expression.
    pub fn eq(left: Expr, right: Expr) -> Self {
        Self::binary(left, BinaryOp::Eq, right)
    }

    /// Creates a not-equal expression.
    pub fn ne(left: Expr, right: Expr) -> Self {
        Self::binary(left, BinaryOp::Ne, right)
    }

    /// Creates a less-than expression.
    pub fn lt(left: Expr, right: Expr) -> Self {
        Self::binary(left, BinaryOp::Lt, right)
    }

    /// Creates a less-than-or-equal expression.
    pub fn le(left: Expr, right: Expr) -> Self {
        Self::binary(left, BinaryOp::Le, right)
    }

    /// Creates a greater-than expression.
    pub fn gt(left: Expr, right: Expr) -> Self {
        Self::binary(left, BinaryOp::Gt, right)
    }

    /// Creates a greater-than-or-equal expression.
    pub fn ge(left: Expr, right: Expr) -> Self {
        Self::binary(left, BinaryOp::Ge, right)
    }

    /// Creates an AND expression.
    pub fn and(left: Expr, right: Expr) -> Self {
        Self::binary(left, BinaryOp::And, right)
    }

    /// Creates an OR expression.
    pub fn or(left: Expr, right: Expr) -> Self {
        Self::binary(left, BinaryOp::Or, right)
    }

    /// Creates a NOT expression.
    pub fn not(expr: Expr) -> Self {
        Expr::UnaryOp {
            op: UnaryOp::Not,
            expr: Box::new(expr),
        }
    }

    /// Creates an IS NULL expression.
    pub fn is_null(expr: Expr) -> Self {
        Expr::UnaryOp {
            op: UnaryOp::IsNull,
            expr: Box::new(expr),
        }
    }

    /// Creates a scalar function call.
    pub fn function(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Function {
            name: name.into(),
            args,
        }
    }

    /// Creates a COUNT(*) aggregate.
    pub fn count_star() -> Self {
        Expr::Aggregate {
            func: AggregateFunc::Count,
            expr: None,
            distinct: false,
        }
    }

    /// Creates a SUM aggregate.
    pub fn sum(expr: Expr) -> Self {
        Expr::Aggregate {
            func: AggregateFunc::Sum,
            expr: Some(Box::new(expr)),
            distinct: false,
        }
    }

    /// Splits a conjunction into its AND-ed terms.
    pub fn conjuncts(&self) -> Vec<&Expr> {
        let mut out = Vec::new();
        let mut stack = alloc::vec![self];
        while let Some(expr) = stack.pop() {
            match expr {
                Expr::BinaryOp {
                    left,
                    op: BinaryOp::And,
                    right,
                } => {
                    stack.push(right);
                    stack.push(left);
                }
                other => out.push(other),
            }
        }
        out
    }

    /// Returns the column pairs compared by `=` in the top-level conjunction.
    pub fn equi_columns(&self) -> Vec<(&ColumnRef, &ColumnRef)> {
        self.conjuncts()
            .into_iter()
            .filter_map(|term| match term {
                Expr::BinaryOp {
                    left,
                    op: BinaryOp::Eq,
                    right,
                } => match (left.as_ref(), right.as_ref()) {
                    (Expr::Column(l), Expr::Column(r)) => Some((l, r)),
                    _ => None,
                },
                _ => None,
            })
            .collect()
    }

    /// Collects every column referenced by this expression.
    pub fn columns(&self) -> Vec<&ColumnRef> {
        let mut out = Vec::new();
        self.collect_columns(&mut out);
        out
    }

    fn collect_columns<'a>(&'a self, out: &mut Vec<&'a ColumnRef>) {
        match self {
            Expr::Column(c) => out.push(c),
            Expr::Literal(_) => {}
            Expr::BinaryOp { left, right, .. } => {
                left.collect_columns(out);
                right.collect_columns(out);
            }
            Expr::UnaryOp { expr, .. } => expr.collect_columns(out),
            Expr::Function { args, .. } => args.iter().for_each(|a| a.collect_columns(out)),
            Expr::Aggregate { expr, .. } => {
                if let Some(e) = expr {
                    e.collect_columns(out);
                }
            }
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Column(c) => write!(f, "{}", c),
            Expr::Literal(v) => write!(f, "{}", v),
            Expr::BinaryOp { left, op, right } => {
                // Parenthesize nested binary operands so precedence survives printing.
                let wrap = |e: &Expr| matches!(e, Expr::BinaryOp { .. });
                if wrap(&**left) {
                    write!(f, "({})", left)?;
                } else {
                    write!(f, "{}", left)?;
                }
                write!(f, " {} ", op.symbol())?;
                if wrap(&**right) {
                    write!(f, "({})", right)
                } else {
                    write!(f, "{}", right)
                }
            }
            Expr::UnaryOp { op, expr } => match op {
                UnaryOp::Not => write!(f, "NOT {}", expr),
                UnaryOp::Neg => write!(f, "-{}", expr),
                UnaryOp::IsNull => write!(f, "{} IS NULL", expr),
                UnaryOp::IsNotNull => write!(f, "{} IS NOT NULL", expr),
            },
            Expr::Function { name, args } => {
                write!(f, "{}(", name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                f.write_str(")")
            }
            Expr::Aggregate {
                func,
                expr,
                distinct,
            } => {
                let d = if *distinct { "DISTINCT " } else { "" };
                match expr {
                    Some(e) => write!(f, "{}({}{})", func.name(), d, e),
                    None => write!(f, "{}({}*)", func.name(), d),
                }
            }
        }
    }
}

/// Sort order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Ordering specification: sort keys with their directions.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct OrderBy {
    pub keys: Vec<(Expr, SortOrder)>,
}

impl OrderBy {
    /// Creates an ordering from keys and directions.
    pub fn new(keys: Vec<(Expr, SortOrder)>) -> Self {
        Self { keys }
    }

    /// Creates a single-key ascending ordering.
    pub fn asc(expr: Expr) -> Self {
        Self::new(alloc::vec![(expr, SortOrder::Asc)])
    }

    /// Creates a single-key descending ordering.
    pub fn desc(expr: Expr) -> Self {
        Self::new(alloc::vec![(expr, SortOrder::Desc)])
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (expr, order)) in self.keys.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match order {
                SortOrder::Asc => write!(f, "{} ASC", expr)?,
                SortOrder::Desc => write!(f, "{} DESC", expr)?,
            }
        }
        Ok(())
    }
}
