//! Algebraic candle series.
//!
//! An [`AlgebraicSeries`] wraps strictly ascending candles and supports the
//! arithmetic operators `+ - * / // % **` against another series or a scalar.
//! Two series combine by an inner join on timestamp; a scalar applies to every
//! numeric field of every row. All operations return a new series.

/// Field-level arithmetic and decimal coercion.
pub mod numeric;
mod ops;

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Candle, ChartPoint};

/// The arithmetic operators available to composed instruments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `//`
    FloorDiv,
    /// `%`
    Rem,
    /// `**`
    Pow,
}

impl BinaryOp {
    /// Apply the operator to two fields, degrading failures to zero.
    #[must_use]
    pub fn apply(self, a: Decimal, b: Decimal) -> Decimal {
        let r = match self {
            Self::Add => numeric::add(a, b),
            Self::Sub => numeric::sub(a, b),
            Self::Mul => numeric::mul(a, b),
            Self::Div => numeric::div(a, b),
            Self::FloorDiv => numeric::floor_div(a, b),
            Self::Rem => numeric::rem(a, b),
            Self::Pow => numeric::pow(a, b),
        };
        r.or_zero()
    }

    /// Operator symbol as written in expressions.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::FloorDiv => "//",
            Self::Rem => "%",
            Self::Pow => "**",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// An ordered list of candles supporting elementwise arithmetic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlgebraicSeries {
    rows: Vec<Candle>,
}

impl AlgebraicSeries {
    /// Wrap candles that are already strictly ascending by timestamp.
    #[must_use]
    pub const fn new(rows: Vec<Candle>) -> Self {
        Self { rows }
    }

    /// Borrow the rows.
    #[must_use]
    pub fn rows(&self) -> &[Candle] {
        &self.rows
    }

    /// Take the rows.
    #[must_use]
    pub fn into_rows(self) -> Vec<Candle> {
        self.rows
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when there are no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Timestamp of the first row, if any.
    #[must_use]
    pub fn first_ts(&self) -> Option<i64> {
        self.rows.first().map(|c| c.ts)
    }

    /// Rows in the chart output shape.
    #[must_use]
    pub fn to_chart_points(&self) -> Vec<ChartPoint> {
        self.rows.iter().map(ChartPoint::from).collect()
    }

    /// `self OP other`, keeping only timestamps present in both series.
    ///
    /// Both inputs are walked once with two cursors; rows present on only one
    /// side are dropped, never padded or interpolated.
    #[must_use]
    pub fn zip_with(&self, op: BinaryOp, other: &Self) -> Self {
        let (a, b) = (&self.rows, &other.rows);
        let mut out = Vec::with_capacity(a.len().min(b.len()));
        let (mut i, mut j) = (0, 0);
        while i < a.len() && j < b.len() {
            let (l, r) = (&a[i], &b[j]);
            match l.ts.cmp(&r.ts) {
                core::cmp::Ordering::Less => i += 1,
                core::cmp::Ordering::Greater => j += 1,
                core::cmp::Ordering::Equal => {
                    let (lf, rf) = (l.fields(), r.fields());
                    let f = core::array::from_fn(|k| op.apply(lf[k], rf[k]));
                    out.push(Candle::from_fields(l.ts, f));
                    i += 1;
                    j += 1;
                }
            }
        }
        Self::new(out)
    }

    /// `self OP scalar` applied to the five numeric fields of every row.
    #[must_use]
    pub fn apply_scalar(&self, op: BinaryOp, scalar: Decimal) -> Self {
        self.map_fields(|v| op.apply(v, scalar))
    }

    /// `scalar OP self`: the reflected form, with the scalar on the left.
    #[must_use]
    pub fn apply_reflected(&self, op: BinaryOp, scalar: Decimal) -> Self {
        self.map_fields(|v| op.apply(scalar, v))
    }

    /// `self // other`.
    #[must_use]
    pub fn floor_div(&self, other: &Self) -> Self {
        self.zip_with(BinaryOp::FloorDiv, other)
    }

    /// `self ** other`.
    #[must_use]
    pub fn pow(&self, other: &Self) -> Self {
        self.zip_with(BinaryOp::Pow, other)
    }

    /// `self // scalar`.
    #[must_use]
    pub fn floor_div_scalar(&self, scalar: Decimal) -> Self {
        self.apply_scalar(BinaryOp::FloorDiv, scalar)
    }

    /// `self ** scalar`.
    #[must_use]
    pub fn pow_scalar(&self, scalar: Decimal) -> Self {
        self.apply_scalar(BinaryOp::Pow, scalar)
    }

    /// `scalar // self`.
    #[must_use]
    pub fn rfloor_div(&self, scalar: Decimal) -> Self {
        self.apply_reflected(BinaryOp::FloorDiv, scalar)
    }

    /// `scalar ** self`.
    #[must_use]
    pub fn rpow(&self, scalar: Decimal) -> Self {
        self.apply_reflected(BinaryOp::Pow, scalar)
    }

    fn map_fields(&self, f: impl Fn(Decimal) -> Decimal) -> Self {
        let rows = self
            .rows
            .iter()
            .map(|c| Candle::from_fields(c.ts, c.fields().map(&f)))
            .collect();
        Self::new(rows)
    }
}

impl From<Vec<Candle>> for AlgebraicSeries {
    fn from(rows: Vec<Candle>) -> Self {
        Self::new(rows)
    }
}

impl FromIterator<Candle> for AlgebraicSeries {
    fn from_iter<T: IntoIterator<Item = Candle>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
