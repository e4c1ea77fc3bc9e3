//! Arbitrary precision rational numbers.
//!
//! Every value handled by the pipeline is ultimately one of these: exact
//! inputs stay exact, and transcendental results are rational
//! approximations at a known precision.

use dashu::base::{Abs, Inverse, Signed as DashuSigned, UnsignedAbs};
use dashu::integer::IBig;
use dashu::rational::RBig;
use num_traits::{One, Zero};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;

use crate::{Integer, NumericError};

/// An arbitrary precision rational number.
///
/// Rationals are always stored in lowest terms with a positive denominator.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Rational(RBig);

impl Rational {
    /// Creates a new rational from numerator and denominator.
    ///
    /// # Errors
    ///
    /// Returns [`NumericError::DivisionByZero`] if the denominator is zero.
    pub fn new(numerator: Integer, denominator: Integer) -> Result<Self, NumericError> {
        if denominator.is_zero() {
            return Err(NumericError::DivisionByZero);
        }
        let numerator = if denominator.is_negative() {
            -numerator
        } else {
            numerator
        };
        Ok(Self(RBig::from_parts(
            numerator.into_inner(),
            denominator.into_inner().unsigned_abs(),
        )))
    }

    /// Creates a rational from an integer (denominator = 1).
    #[must_use]
    pub fn from_integer(n: Integer) -> Self {
        Self(RBig::from(n.into_inner()))
    }

    /// Creates a rational from i64 numerator and denominator.
    ///
    /// # Errors
    ///
    /// Returns [`NumericError::DivisionByZero`] if the denominator is zero.
    pub fn from_i64(numerator: i64, denominator: i64) -> Result<Self, NumericError> {
        Self::new(Integer::new(numerator), Integer::new(denominator))
    }

    /// Returns `mantissa / 10^decimals`.
    #[must_use]
    pub fn scaled(mantissa: Integer, decimals: u32) -> Self {
        Self(RBig::from_parts(
            mantissa.into_inner(),
            Integer::pow10(decimals).into_inner().unsigned_abs(),
        ))
    }

    /// Returns `10^exp` for any integer exponent.
    #[must_use]
    pub fn pow10(exp: i64) -> Self {
        let places = u32::try_from(exp.unsigned_abs()).unwrap_or(u32::MAX);
        let magnitude = Self::from_integer(Integer::pow10(places));
        if exp < 0 {
            Self(magnitude.0.inv())
        } else {
            magnitude
        }
    }

    /// Returns the numerator.
    #[must_use]
    pub fn numerator(&self) -> Integer {
        Integer::from(self.0.numerator().clone())
    }

    /// Returns the denominator.
    #[must_use]
    pub fn denominator(&self) -> Integer {
        Integer::from(IBig::from(self.0.denominator().clone()))
    }

    /// Returns true if this rational is an integer.
    #[must_use]
    pub fn is_integer(&self) -> bool {
        self.0.denominator().is_one()
    }

    /// Converts to an integer if the denominator is 1.
    #[must_use]
    pub fn to_integer(&self) -> Option<Integer> {
        if self.is_integer() {
            Some(self.numerator())
        } else {
            None
        }
    }

    /// Returns the largest integer not greater than this value.
    #[must_use]
    pub fn floor(&self) -> Integer {
        // The denominator is positive, so this cannot fail.
        self.numerator()
            .div_floor(&self.denominator())
            .unwrap_or_else(|_| self.numerator())
    }

    /// Rounds to the nearest integer, ties away from zero.
    #[must_use]
    pub fn round_half_away(&self) -> Integer {
        let half = Self(RBig::from_parts(IBig::ONE, dashu::integer::UBig::from(2u8)));
        if self.is_negative() {
            -((-self) + &half).floor()
        } else {
            (self + &half).floor()
        }
    }

    /// Returns the absolute value.
    #[must_use]
    pub fn abs(&self) -> Self {
        Self(self.0.clone().abs())
    }

    /// Returns the reciprocal (1/x).
    ///
    /// # Errors
    ///
    /// Returns [`NumericError::DivisionByZero`] if the rational is zero.
    pub fn recip(&self) -> Result<Self, NumericError> {
        if self.is_zero() {
            return Err(NumericError::DivisionByZero);
        }
        Ok(Self(self.0.clone().inv()))
    }

    /// Divides by `rhs`.
    ///
    /// # Errors
    ///
    /// Returns [`NumericError::DivisionByZero`] if `rhs` is zero.
    pub fn checked_div(&self, rhs: &Self) -> Result<Self, NumericError> {
        if rhs.is_zero() {
            return Err(NumericError::DivisionByZero);
        }
        Ok(Self(&self.0 / &rhs.0))
    }

    /// Returns true if negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        DashuSigned::is_negative(&self.0)
    }

    /// Returns true if strictly positive.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        DashuSigned::is_positive(&self.0)
    }

    /// Returns a reference to the inner `dashu::RBig`.
    #[must_use]
    pub fn as_inner(&self) -> &RBig {
        &self.0
    }

    /// Computes `self^exp` for any integer exponent.
    ///
    /// # Errors
    ///
    /// Returns [`NumericError::DivisionByZero`] for a negative power of zero.
    pub fn pow(&self, exp: i64) -> Result<Self, NumericError> {
        let magnitude = usize::try_from(exp.unsigned_abs())
            .map_err(|_| NumericError::domain("pow", exp))?;
        let raised = Self(self.0.pow(magnitude));
        if exp < 0 {
            raised.recip()
        } else {
            Ok(raised)
        }
    }

    /// Returns the exact `k`-th root if numerator and denominator are both
    /// perfect `k`-th powers and the value is non-negative.
    #[must_use]
    pub fn exact_root(&self, k: u32) -> Option<Self> {
        let numerator = self.numerator().exact_root(k)?;
        let denominator = self.denominator().exact_root(k)?;
        Self::new(numerator, denominator).ok()
    }

    /// Returns `e` such that `10^e <= |self| < 10^(e + 1)`, or `None` for zero.
    #[must_use]
    pub fn decimal_exponent(&self) -> Option<i64> {
        if self.is_zero() {
            return None;
        }
        let magnitude = self.abs();
        let estimate = i64::try_from(self.numerator().decimal_len()).unwrap_or(i64::MAX)
            - i64::try_from(self.denominator().decimal_len()).unwrap_or(i64::MAX);
        let mut exp = estimate;
        while Self::pow10(exp) > magnitude {
            exp -= 1;
        }
        while Self::pow10(exp + 1) <= magnitude {
            exp += 1;
        }
        Some(exp)
    }

    /// Returns the decimal expansion if it terminates.
    ///
    /// The result always contains a decimal point (`4` is rendered `4.0`).
    #[must_use]
    pub fn terminating_decimal(&self) -> Option<String> {
        let mut rest = self.denominator();
        let two = Integer::new(2);
        let five = Integer::new(5);
        let (mut twos, mut fives) = (0u32, 0u32);
        while (rest.clone() % two.clone()).is_zero() {
            rest = rest / two.clone();
            twos += 1;
        }
        while (rest.clone() % five.clone()).is_zero() {
            rest = rest / five.clone();
            fives += 1;
        }
        if !rest.is_one() {
            return None;
        }

        let places = twos.max(fives);
        let scaled = (self.abs() * Self::from_integer(Integer::pow10(places))).numerator();
        let digits = format!("{:0>width$}", scaled.to_string(), width = places as usize + 1);
        let split = digits.len() - places as usize;
        let sign = if self.is_negative() { "-" } else { "" };
        let fraction = if places == 0 { "0" } else { &digits[split..] };
        Some(format!("{sign}{}.{fraction}", &digits[..split]))
    }
}

impl Zero for Rational {
    fn zero() -> Self {
        Self(RBig::ZERO)
    }

    fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl One for Rational {
    fn one() -> Self {
        Self(RBig::ONE)
    }

    fn is_one(&self) -> bool {
        self.0 == RBig::ONE
    }
}

impl fmt::Debug for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rational({})", self.0)
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_integer() {
            write!(f, "{}", self.numerator())
        } else {
            write!(f, "{}/{}", self.numerator(), self.denominator())
        }
    }
}

/// Parses `p`, `p/q`, and decimal literals such as `-0.9358e-3` exactly.
impl FromStr for Rational {
    type Err = NumericError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || NumericError::InvalidLiteral(s.to_string());
        let text = s.trim();

        if let Some((numerator, denominator)) = text.split_once('/') {
            let numerator: Integer = numerator.trim().parse().map_err(|_| invalid())?;
            let denominator: Integer = denominator.trim().parse().map_err(|_| invalid())?;
            return Self::new(numerator, denominator);
        }

        let (mantissa, exponent) = match text.find(['e', 'E']) {
            Some(at) => (&text[..at], &text[at + 1..]),
            None => (text, ""),
        };
        let exponent: i64 = if exponent.is_empty() {
            0
        } else {
            let exponent = exponent.strip_prefix('+').unwrap_or(exponent);
            exponent.parse().map_err(|_| invalid())?
        };

        let (sign, unsigned) = match mantissa.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", mantissa.strip_prefix('+').unwrap_or(mantissa)),
        };
        let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        if !whole.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let digits: Integer = format!("{sign}{whole}{fraction}")
            .parse()
            .map_err(|_| invalid())?;
        let fraction_len = i64::try_from(fraction.len()).map_err(|_| invalid())?;
        Ok(Self::from_integer(digits) * Self::pow10(exponent - fraction_len))
    }
}

// Arithmetic operations
impl Add for Rational {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Add<&Rational> for Rational {
    type Output = Self;

    fn add(self, rhs: &Rational) -> Self::Output {
        Self(self.0 + &rhs.0)
    }
}

impl Add for &Rational {
    type Output = Rational;

    fn add(self, rhs: Self) -> Self::Output {
        Rational(&self.0 + &rhs.0)
    }
}

impl Sub for Rational {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Sub<&Rational> for Rational {
    type Output = Self;

    fn sub(self, rhs: &Rational) -> Self::Output {
        Self(self.0 - &rhs.0)
    }
}

impl Sub for &Rational {
    type Output = Rational;

    fn sub(self, rhs: Self) -> Self::Output {
        Rational(&self.0 - &rhs.0)
    }
}

impl Mul for Rational {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Self(self.0 * rhs.0)
    }
}

impl Mul<&Rational> for Rational {
    type Output = Self;

    fn mul(self, rhs: &Rational) -> Self::Output {
        Self(self.0 * &rhs.0)
    }
}

impl Mul for &Rational {
    type Output = Rational;

    fn mul(self, rhs: Self) -> Self::Output {
        Rational(&self.0 * &rhs.0)
    }
}

impl Neg for Rational {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Neg for &Rational {
    type Output = Rational;

    fn neg(self) -> Self::Output {
        Rational(-&self.0)
    }
}

impl From<Integer> for Rational {
    fn from(n: Integer) -> Self {
        Self::from_integer(n)
    }
}

impl From<i64> for Rational {
    fn from(n: i64) -> Self {
        Self::from_integer(Integer::new(n))
    }
}
