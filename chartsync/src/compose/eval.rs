//! Tree-walking evaluator over bound series.
//!
//! The only names an expression can see are the series bound in the
//! environment; there are no built-ins.

use std::collections::HashMap;

use chartsync_core::{AlgebraicSeries, BinaryOp, Decimal, SyncError};

use super::parser::Expr;

/// Result of evaluating a sub-expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Value {
    Scalar(Decimal),
    Series(AlgebraicSeries),
}

impl Value {
    /// The series result of a complete expression.
    pub(crate) fn into_series(self) -> Result<AlgebraicSeries, SyncError> {
        match self {
            Self::Series(s) => Ok(s),
            Self::Scalar(_) => Err(SyncError::NotASeries),
        }
    }
}

pub(crate) type Env = HashMap<String, AlgebraicSeries>;

pub(crate) fn evaluate(expr: &Expr, env: &Env) -> Result<Value, SyncError> {
    match expr {
        Expr::Number(n) => Ok(Value::Scalar(*n)),
        Expr::Ident(name) => env
            .get(name)
            .cloned()
            .map(Value::Series)
            .ok_or_else(|| SyncError::UnknownIdentifier(name.clone())),
        Expr::Neg(inner) => Ok(match evaluate(inner, env)? {
            Value::Scalar(v) => Value::Scalar(BinaryOp::Sub.apply(Decimal::ZERO, v)),
            Value::Series(s) => Value::Series(-s),
        }),
        Expr::Binary { op, lhs, rhs } => {
            let l = evaluate(lhs, env)?;
            let r = evaluate(rhs, env)?;
            Ok(combine(*op, l, r))
        }
    }
}

fn combine(op: BinaryOp, lhs: Value, rhs: Value) -> Value {
    match (lhs, rhs) {
        (Value::Scalar(a), Value::Scalar(b)) => Value::Scalar(op.apply(a, b)),
        (Value::Series(a), Value::Series(b)) => Value::Series(a.zip_with(op, &b)),
        (Value::Series(a), Value::Scalar(b)) => Value::Series(a.apply_scalar(op, b)),
        (Value::Scalar(a), Value::Series(b)) => Value::Series(b.apply_reflected(op, a)),
    }
}
