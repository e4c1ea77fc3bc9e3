//! Arbitrary precision integers.
//!
//! This module provides a wrapper around `dashu::IBig` with the
//! operations needed for exact rational arithmetic and fixed-point
//! evaluation.

use dashu::base::{Abs, BitTest, Signed as DashuSigned};
use dashu::integer::IBig;
use num_traits::{One, Zero};
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Rem, Sub};
use std::str::FromStr;

use crate::NumericError;

/// An arbitrary precision integer.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Integer(IBig);

impl Integer {
    /// Creates a new integer from an i64.
    #[must_use]
    pub fn new(value: i64) -> Self {
        Self(IBig::from(value))
    }

    /// Returns `10^exp`.
    #[must_use]
    pub fn pow10(exp: u32) -> Self {
        Self(IBig::from(10u8).pow(exp as usize))
    }

    /// Returns the absolute value.
    #[must_use]
    pub fn abs(&self) -> Self {
        Self(self.0.clone().abs())
    }

    /// Returns true if this integer is negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        DashuSigned::is_negative(&self.0)
    }

    /// Returns true if this integer is odd.
    #[must_use]
    pub fn is_odd(&self) -> bool {
        !(&self.0 % IBig::from(2u8)).is_zero()
    }

    /// Returns the number of bits needed to represent this integer.
    #[must_use]
    pub fn bit_len(&self) -> usize {
        self.0.bit_len()
    }

    /// Returns the number of decimal digits of `|self|` (1 for zero).
    #[must_use]
    pub fn decimal_len(&self) -> usize {
        self.abs().0.to_string().len()
    }

    /// Returns the inner `dashu::IBig`.
    #[must_use]
    pub fn into_inner(self) -> IBig {
        self.0
    }

    /// Returns a reference to the inner `dashu::IBig`.
    #[must_use]
    pub fn as_inner(&self) -> &IBig {
        &self.0
    }

    /// Attempts to convert to an i64.
    ///
    /// Returns `None` if the value doesn't fit in an i64.
    #[must_use]
    pub fn to_i64(&self) -> Option<i64> {
        self.0.clone().try_into().ok()
    }

    /// Computes self^exp for non-negative exp.
    #[must_use]
    pub fn pow(&self, exp: u32) -> Self {
        Self(self.0.pow(exp as usize))
    }

    /// Floor division by a positive divisor.
    ///
    /// Plain `/` truncates toward zero; this rounds toward negative infinity.
    ///
    /// # Errors
    ///
    /// Returns [`NumericError::DivisionByZero`] if `divisor` is zero.
    pub fn div_floor(&self, divisor: &Self) -> Result<Self, NumericError> {
        if divisor.is_zero() {
            return Err(NumericError::DivisionByZero);
        }
        let quotient = &self.0 / &divisor.0;
        let exact = (&quotient * &divisor.0) == self.0;
        if !exact && (self.is_negative() != divisor.is_negative()) {
            Ok(Self(quotient - IBig::ONE))
        } else {
            Ok(Self(quotient))
        }
    }

    /// Returns `floor(self^(1/k))` for non-negative `self` and `k >= 1`.
    ///
    /// Returns `None` for negative values or `k == 0`.
    #[must_use]
    pub fn floor_root(&self, k: u32) -> Option<Self> {
        if k == 0 || self.is_negative() {
            return None;
        }
        if self.is_zero() || k == 1 {
            return Some(self.clone());
        }

        // Newton iteration from an over-estimate decreases monotonically
        // until it reaches the floor of the root.
        let k_big = IBig::from(k);
        let k_minus_one = IBig::from(k - 1);
        let start_bits = self.bit_len().div_ceil(k as usize);
        let mut x = IBig::from(2u8).pow(start_bits);
        loop {
            let y = (&k_minus_one * &x + &self.0 / x.pow(k as usize - 1)) / &k_big;
            if y >= x {
                return Some(Self(x));
            }
            x = y;
        }
    }

    /// Returns the exact `k`-th root if `self` is a perfect `k`-th power.
    #[must_use]
    pub fn exact_root(&self, k: u32) -> Option<Self> {
        let root = self.floor_root(k)?;
        (root.pow(k) == *self).then_some(root)
    }
}

impl Zero for Integer {
    fn zero() -> Self {
        Self(IBig::ZERO)
    }

    fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl One for Integer {
    fn one() -> Self {
        Self(IBig::ONE)
    }

    fn is_one(&self) -> bool {
        self.0 == IBig::ONE
    }
}

impl fmt::Debug for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Integer({})", self.0)
    }
}

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Integer {
    type Err = NumericError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix('+').unwrap_or(s);
        let unsigned = digits.strip_prefix('-').unwrap_or(digits);
        if unsigned.is_empty() || !unsigned.bytes().all(|b| b.is_ascii_digit()) {
            return Err(NumericError::InvalidLiteral(s.to_string()));
        }
        IBig::from_str_radix(digits, 10)
            .map(Self)
            .map_err(|_| NumericError::InvalidLiteral(s.to_string()))
    }
}

// Arithmetic operations
impl Add for Integer {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Add<&Integer> for Integer {
    type Output = Self;

    fn add(self, rhs: &Integer) -> Self::Output {
        Self(self.0 + &rhs.0)
    }
}

impl Add for &Integer {
    type Output = Integer;

    fn add(self, rhs: Self) -> Self::Output {
        Integer(&self.0 + &rhs.0)
    }
}

impl Sub for Integer {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Sub for &Integer {
    type Output = Integer;

    fn sub(self, rhs: Self) -> Self::Output {
        Integer(&self.0 - &rhs.0)
    }
}

impl Mul for Integer {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Self(self.0 * rhs.0)
    }
}

impl Mul for &Integer {
    type Output = Integer;

    fn mul(self, rhs: Self) -> Self::Output {
        Integer(&self.0 * &rhs.0)
    }
}

/// Truncating division. Panics on a zero divisor, like the primitive types.
impl Div for Integer {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        Self(self.0 / rhs.0)
    }
}

impl Rem for Integer {
    type Output = Self;

    fn rem(self, rhs: Self) -> Self::Output {
        Self(self.0 % rhs.0)
    }
}

impl Neg for Integer {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Neg for &Integer {
    type Output = Integer;

    fn neg(self) -> Self::Output {
        Integer(-&self.0)
    }
}

impl From<i64> for Integer {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl From<u32> for Integer {
    fn from(value: u32) -> Self {
        Self(IBig::from(value))
    }
}

impl From<IBig> for Integer {
    fn from(value: IBig) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_ops() {
        let a = Integer::new(10);
        let b = Integer::new(3);

        assert_eq!((a.clone() + b.clone()).to_i64(), Some(13));
        assert_eq!((a.clone() - b.clone()).to_i64(), Some(7));
        assert_eq!((a.clone() * b.clone()).to_i64(), Some(30));
        assert_eq!((a.clone() / b.clone()).to_i64(), Some(3));
        assert_eq!((a % b).to_i64(), Some(1));
    }

    #[test]
    fn test_div_floor() {
        let seven = Integer::new(7);
        let two = Integer::new(2);
        assert_eq!(seven.div_floor(&two).unwrap().to_i64(), Some(3));
        assert_eq!((-seven).div_floor(&two).unwrap().to_i64(), Some(-4));
        assert_eq!(Integer::new(-8).div_floor(&two).unwrap().to_i64(), Some(-4));
        assert_eq!(
            Integer::new(1).div_floor(&Integer::new(0)),
            Err(NumericError::DivisionByZero)
        );
    }

    #[test]
    fn test_roots() {
        assert_eq!(Integer::new(99).floor_root(2).unwrap().to_i64(), Some(9));
        assert_eq!(Integer::new(100).exact_root(2).unwrap().to_i64(), Some(10));
        assert_eq!(Integer::new(27).exact_root(3).unwrap().to_i64(), Some(3));
        assert!(Integer::new(26).exact_root(3).is_none());
        assert!(Integer::new(-4).floor_root(2).is_none());
        assert_eq!(Integer::new(0).floor_root(5).unwrap().to_i64(), Some(0));
    }

    #[test]
    fn test_decimal_len() {
        assert_eq!(Integer::new(0).decimal_len(), 1);
        assert_eq!(Integer::new(-12345).decimal_len(), 5);
        assert_eq!(Integer::pow10(20).decimal_len(), 21);
    }

    #[test]
    fn test_parse() {
        let a: Integer = "123456789012345678901234567890".parse().unwrap();
        let b: Integer = "987654321098765432109876543210".parse().unwrap();
        assert_eq!((a + b).to_string(), "1111111110111111111011111111100");
        assert_eq!("-42".parse::<Integer>().unwrap().to_i64(), Some(-42));
        assert_eq!("+7".parse::<Integer>().unwrap().to_i64(), Some(7));
        assert!("4x".parse::<Integer>().is_err());
        assert!("".parse::<Integer>().is_err());
    }
}
