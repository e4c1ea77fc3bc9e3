//! Numeric literals tagged with how they were written.
//!
//! `1/2` and `0.5` denote the same value but are displayed differently:
//! the first stays a fraction, the second stays a decimal. Arithmetic
//! mixing the two produces a decimal, mirroring how a floating literal
//! contaminates an otherwise exact expression.

use num_traits::{One, Zero};
use std::fmt;
use std::ops::{Add, Mul, Neg};
use std::str::FromStr;

use crate::{NumericError, Rational};

/// How a number was written, which decides how it is displayed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NumberKind {
    /// An integer or fraction (`3`, `1/2`).
    Exact,
    /// A decimal literal (`0.5`, `4.0`, `1e-3`).
    Decimal,
}

impl NumberKind {
    fn join(self, other: Self) -> Self {
        if self == Self::Decimal || other == Self::Decimal {
            Self::Decimal
        } else {
            Self::Exact
        }
    }
}

/// An exact rational value plus its [`NumberKind`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Number {
    value: Rational,
    kind: NumberKind,
}

impl Number {
    /// An exact number.
    #[must_use]
    pub fn exact(value: Rational) -> Self {
        Self {
            value,
            kind: NumberKind::Exact,
        }
    }

    /// A decimal number.
    #[must_use]
    pub fn decimal(value: Rational) -> Self {
        Self {
            value,
            kind: NumberKind::Decimal,
        }
    }

    /// An exact integer.
    #[must_use]
    pub fn integer(value: i64) -> Self {
        Self::exact(Rational::from(value))
    }

    /// An exact fraction.
    ///
    /// # Errors
    ///
    /// Returns [`NumericError::DivisionByZero`] if `denominator` is zero.
    pub fn fraction(numerator: i64, denominator: i64) -> Result<Self, NumericError> {
        Rational::from_i64(numerator, denominator).map(Self::exact)
    }

    /// Returns the exact value.
    #[must_use]
    pub fn value(&self) -> &Rational {
        &self.value
    }

    /// Returns how this number is displayed.
    #[must_use]
    pub fn kind(&self) -> NumberKind {
        self.kind
    }

    /// Returns true for decimal numbers.
    #[must_use]
    pub fn is_decimal(&self) -> bool {
        self.kind == NumberKind::Decimal
    }

    /// Returns true if the value is zero, whatever its kind.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    /// Returns true only for the exact integer one.
    #[must_use]
    pub fn is_one(&self) -> bool {
        self.kind == NumberKind::Exact && self.value.is_one()
    }

    /// Returns true if the value is negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.value.is_negative()
    }

    /// Returns the absolute value, keeping the kind.
    #[must_use]
    pub fn abs(&self) -> Self {
        Self {
            value: self.value.abs(),
            kind: self.kind,
        }
    }

    /// Raises to an integer power, keeping the kind.
    ///
    /// # Errors
    ///
    /// Returns [`NumericError::DivisionByZero`] for a negative power of zero.
    pub fn pow(&self, exp: i64) -> Result<Self, NumericError> {
        Ok(Self {
            value: self.value.pow(exp)?,
            kind: self.kind,
        })
    }

    /// Divides, joining kinds.
    ///
    /// # Errors
    ///
    /// Returns [`NumericError::DivisionByZero`] if `rhs` is zero.
    pub fn checked_div(&self, rhs: &Self) -> Result<Self, NumericError> {
        Ok(Self {
            value: self.value.checked_div(&rhs.value)?,
            kind: self.kind.join(rhs.kind),
        })
    }
}

impl Add for &Number {
    type Output = Number;

    fn add(self, rhs: Self) -> Self::Output {
        Number {
            value: &self.value + &rhs.value,
            kind: self.kind.join(rhs.kind),
        }
    }
}

impl Mul for &Number {
    type Output = Number;

    fn mul(self, rhs: Self) -> Self::Output {
        Number {
            value: &self.value * &rhs.value,
            kind: self.kind.join(rhs.kind),
        }
    }
}

impl Neg for &Number {
    type Output = Number;

    fn neg(self) -> Self::Output {
        Number {
            value: -&self.value,
            kind: self.kind,
        }
    }
}

/// Exact numbers print as `p` or `p/q`. Decimals print their expansion
/// when it terminates (always with a decimal point) and `p/qf` otherwise,
/// so that every number survives a `to_string`/`parse` round trip.
impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            NumberKind::Exact => write!(f, "{}", self.value),
            NumberKind::Decimal => match self.value.terminating_decimal() {
                Some(text) => f.write_str(&text),
                None => write!(f, "{}f", self.value),
            },
        }
    }
}

impl FromStr for Number {
    type Err = NumericError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(fraction) = s.strip_suffix('f') {
            return fraction.parse().map(Self::decimal);
        }
        let value: Rational = s.parse()?;
        if s.contains(['.', 'e', 'E']) {
            Ok(Self::decimal(value))
        } else {
            Ok(Self::exact(value))
        }
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Self::integer(value)
    }
}
