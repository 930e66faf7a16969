//! Field-level arithmetic with the degrade-to-zero policy.
//!
//! Every operator here is total: overflow, an undefined power, or a value that
//! cannot be represented as a decimal yields [`Decimal::ZERO`] for that field.
//! Callers that need strict validation must check their inputs upstream.

use rust_decimal::prelude::{FromPrimitive, MathematicalOps};
use rust_decimal::Decimal;

/// Divisor used in place of an exact zero by `/`, `//` and `%`.
pub const ZERO_DIVISOR_SUBSTITUTE: Decimal = Decimal::from_parts(1, 0, 0, false, 9);

/// Result of a fallible field operation before the zero-default is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coerced {
    /// The operation produced a representable value.
    Value(Decimal),
    /// The operation failed and the field degrades to zero.
    Degraded,
}

impl Coerced {
    /// The value, or zero when degraded.
    #[must_use]
    pub const fn or_zero(self) -> Decimal {
        match self {
            Self::Value(v) => v,
            Self::Degraded => Decimal::ZERO,
        }
    }

    /// Whether the zero-default was applied.
    #[must_use]
    pub const fn is_degraded(self) -> bool {
        matches!(self, Self::Degraded)
    }
}

impl From<Option<Decimal>> for Coerced {
    fn from(v: Option<Decimal>) -> Self {
        v.map_or(Self::Degraded, Self::Value)
    }
}

/// Coerce a float into a decimal field. Non-finite values degrade to zero.
#[must_use]
pub fn coerce_f64(v: f64) -> Coerced {
    if v.is_finite() {
        Decimal::from_f64(v).into()
    } else {
        Coerced::Degraded
    }
}

/// Coerce text into a decimal field, accepting plain and scientific notation.
#[must_use]
pub fn coerce_str(s: &str) -> Coerced {
    let s = s.trim();
    s.parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
        .into()
}

fn nonzero_divisor(b: Decimal) -> Decimal {
    if b.is_zero() { ZERO_DIVISOR_SUBSTITUTE } else { b }
}

/// `a + b`.
#[must_use]
pub fn add(a: Decimal, b: Decimal) -> Coerced {
    a.checked_add(b).into()
}

/// `a - b`.
#[must_use]
pub fn sub(a: Decimal, b: Decimal) -> Coerced {
    a.checked_sub(b).into()
}

/// `a * b`.
#[must_use]
pub fn mul(a: Decimal, b: Decimal) -> Coerced {
    a.checked_mul(b).into()
}

/// `a / b`, substituting [`ZERO_DIVISOR_SUBSTITUTE`] for a zero divisor.
#[must_use]
pub fn div(a: Decimal, b: Decimal) -> Coerced {
    a.checked_div(nonzero_divisor(b)).into()
}

/// `a // b`: the quotient truncated toward zero, so that
/// `a == (a // b) * b + a % b` holds with [`rem`].
#[must_use]
pub fn floor_div(a: Decimal, b: Decimal) -> Coerced {
    a.checked_div(nonzero_divisor(b)).map(|q| q.trunc()).into()
}

/// `a % b`, carrying the sign of the dividend.
#[must_use]
pub fn rem(a: Decimal, b: Decimal) -> Coerced {
    a.checked_rem(nonzero_divisor(b)).into()
}

/// `a ** b`.
///
/// Integer exponents are exact. A negative base with a fractional exponent
/// has no real result and degrades.
#[must_use]
pub fn pow(a: Decimal, b: Decimal) -> Coerced {
    if b.fract().is_zero() {
        let Ok(exp) = i64::try_from(b) else {
            return Coerced::Degraded;
        };
        return a.checked_powi(exp).into();
    }
    if a.is_sign_negative() && !a.is_zero() {
        return Coerced::Degraded;
    }
    a.checked_powd(b).into()
}
