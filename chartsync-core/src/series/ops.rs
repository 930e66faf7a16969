//! `std::ops` operator overloads for [`AlgebraicSeries`].
//!
//! `//` and `**` have no Rust operator and are exposed as inherent methods.

use core::ops::{Add, Div, Mul, Neg, Rem, Sub};

use rust_decimal::Decimal;

use super::{AlgebraicSeries, BinaryOp};

macro_rules! series_op {
    ($trait:ident, $method:ident, $op:expr) => {
        impl $trait<&AlgebraicSeries> for &AlgebraicSeries {
            type Output = AlgebraicSeries;
            fn $method(self, rhs: &AlgebraicSeries) -> AlgebraicSeries {
                self.zip_with($op, rhs)
            }
        }

        impl $trait<AlgebraicSeries> for AlgebraicSeries {
            type Output = AlgebraicSeries;
            fn $method(self, rhs: AlgebraicSeries) -> AlgebraicSeries {
                self.zip_with($op, &rhs)
            }
        }

        impl $trait<Decimal> for &AlgebraicSeries {
            type Output = AlgebraicSeries;
            fn $method(self, rhs: Decimal) -> AlgebraicSeries {
                self.apply_scalar($op, rhs)
            }
        }

        impl $trait<Decimal> for AlgebraicSeries {
            type Output = AlgebraicSeries;
            fn $method(self, rhs: Decimal) -> AlgebraicSeries {
                self.apply_scalar($op, rhs)
            }
        }

        impl $trait<&AlgebraicSeries> for Decimal {
            type Output = AlgebraicSeries;
            fn $method(self, rhs: &AlgebraicSeries) -> AlgebraicSeries {
                rhs.apply_reflected($op, self)
            }
        }

        impl $trait<AlgebraicSeries> for Decimal {
            type Output = AlgebraicSeries;
            fn $method(self, rhs: AlgebraicSeries) -> AlgebraicSeries {
                rhs.apply_reflected($op, self)
            }
        }
    };
}

series_op!(Add, add, BinaryOp::Add);
series_op!(Sub, sub, BinaryOp::Sub);
series_op!(Mul, mul, BinaryOp::Mul);
series_op!(Div, div, BinaryOp::Div);
series_op!(Rem, rem, BinaryOp::Rem);

impl Neg for &AlgebraicSeries {
    type Output = AlgebraicSeries;
    fn neg(self) -> AlgebraicSeries {
        self.apply_reflected(BinaryOp::Sub, Decimal::ZERO)
    }
}

impl Neg for AlgebraicSeries {
    type Output = Self;
    fn neg(self) -> Self {
        -&self
    }
}
