//! Transcendental functions evaluated to a requested precision.
//!
//! Each function takes exact rational arguments and returns a rational
//! approximation. Internally the series run in fixed point: a value `v`
//! is represented by the integer `round(v * 10^w)` for a working width
//! `w` a few digits wider than the requested precision.

use dashu::integer::IBig;
use num_traits::{One, Zero};

use crate::{Integer, NumericError, Rational};

/// Extra digits carried by every fixed-point evaluation.
const SLACK_DIGITS: u32 = 10;

/// Largest argument accepted by [`exp`]; beyond it the result would have
/// tens of thousands of digits.
const EXP_ARGUMENT_LIMIT: i64 = 100_000;

/// Number of significant decimal digits an evaluation must deliver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Precision {
    digits: u32,
}

impl Precision {
    /// Digits added on top of a display precision before evaluating.
    pub const GUARD_DIGITS: u32 = 30;

    /// Creates a precision of at least one digit.
    #[must_use]
    pub fn new(digits: u32) -> Self {
        Self {
            digits: digits.max(1),
        }
    }

    /// The working precision used to display `significant` digits.
    #[must_use]
    pub fn for_display(significant: u32) -> Self {
        Self::new(significant.max(2) + Self::GUARD_DIGITS)
    }

    /// Returns the number of digits.
    #[must_use]
    pub fn digits(self) -> u32 {
        self.digits
    }

    fn widened(self, extra: i64) -> u32 {
        let extra = u32::try_from(extra.max(0)).unwrap_or(u32::MAX / 2);
        self.digits.saturating_add(SLACK_DIGITS).saturating_add(extra)
    }
}

/// Fixed-point arithmetic at `10^digits`.
struct Fixed {
    scale: IBig,
}

impl Fixed {
    fn new(digits: u32) -> Self {
        Self {
            scale: Integer::pow10(digits).into_inner(),
        }
    }

    fn one(&self) -> IBig {
        self.scale.clone()
    }

    fn from_rational(&self, value: &Rational) -> IBig {
        let numerator = value.numerator().into_inner() * &self.scale;
        numerator / value.denominator().into_inner()
    }

    fn to_rational(&self, value: IBig) -> Rational {
        // The scale is a power of ten and never zero.
        Rational::new(Integer::from(value), Integer::from(self.scale.clone()))
            .unwrap_or_else(|_| Rational::zero())
    }

    fn mul(&self, a: &IBig, b: &IBig) -> IBig {
        a * b / &self.scale
    }

    fn div(&self, a: &IBig, b: &IBig) -> IBig {
        a * &self.scale / b
    }

    fn sqrt(&self, value: &IBig) -> IBig {
        Integer::from(value * &self.scale)
            .floor_root(2)
            .map_or(IBig::ZERO, Integer::into_inner)
    }

    /// `atanh(z)` for `|z| < 1`, by the odd power series.
    fn atanh(&self, z: &IBig) -> IBig {
        let z2 = self.mul(z, z);
        let mut power = z.clone();
        let mut sum = IBig::ZERO;
        let mut k = 1u32;
        loop {
            let term = &power / IBig::from(k);
            if term.is_zero() {
                return sum;
            }
            sum += term;
            power = self.mul(&power, &z2);
            k += 2;
        }
    }

    /// `atan(1/n)` for an integer `n > 1`.
    fn atan_inverse(&self, n: u32) -> IBig {
        let n2 = IBig::from(n) * IBig::from(n);
        let mut power = &self.scale / IBig::from(n);
        let mut sum = IBig::ZERO;
        let mut k = 1u32;
        let mut positive = true;
        loop {
            let term = &power / IBig::from(k);
            if term.is_zero() {
                return sum;
            }
            if positive {
                sum += term;
            } else {
                sum -= term;
            }
            positive = !positive;
            power = &power / &n2;
            k += 2;
        }
    }

    fn pi(&self) -> IBig {
        // Machin: pi = 16 atan(1/5) - 4 atan(1/239)
        IBig::from(16u8) * self.atan_inverse(5) - IBig::from(4u8) * self.atan_inverse(239)
    }

    /// `atan(x)` for `|x| <= 1`.
    fn atan_unit(&self, x: &IBig) -> IBig {
        // Two argument halvings bring |x| below tan(pi/16).
        let one = self.one();
        let mut reduced = x.clone();
        for _ in 0..2 {
            let root = self.sqrt(&(&one + self.mul(&reduced, &reduced)));
            reduced = self.div(&reduced, &(&one + root));
        }

        let x2 = self.mul(&reduced, &reduced);
        let mut power = reduced;
        let mut sum = IBig::ZERO;
        let mut k = 1u32;
        let mut positive = true;
        loop {
            let term = &power / IBig::from(k);
            if term.is_zero() {
                break;
            }
            if positive {
                sum += term;
            } else {
                sum -= term;
            }
            positive = !positive;
            power = self.mul(&power, &x2);
            k += 2;
        }
        sum * IBig::from(4u8)
    }

    /// Taylor series of `sin` and `cos` for a reduced argument.
    fn sin_cos(&self, x: &IBig) -> (IBig, IBig) {
        let x2 = self.mul(x, x);

        let mut sin = x.clone();
        let mut term = x.clone();
        let mut n = 1u32;
        loop {
            term = -self.mul(&term, &x2) / IBig::from((n + 1) * (n + 2));
            if term.is_zero() {
                break;
            }
            sin += &term;
            n += 2;
        }

        let mut cos = self.one();
        let mut term = self.one();
        let mut n = 0u32;
        loop {
            term = -self.mul(&term, &x2) / IBig::from((n + 1) * (n + 2));
            if term.is_zero() {
                break;
            }
            cos += &term;
            n += 2;
        }
        (sin, cos)
    }
}

/// Rough `log10(|x|)`, exact to within one.
fn magnitude(x: &Rational) -> i64 {
    let len = |n: Integer| i64::try_from(n.decimal_len()).unwrap_or(i64::MAX / 4);
    len(x.numerator()) - len(x.denominator())
}

/// The constant pi.
#[must_use]
pub fn pi(precision: Precision) -> Rational {
    let fixed = Fixed::new(precision.widened(0));
    fixed.to_rational(fixed.pi())
}

/// Euler's number e.
#[must_use]
pub fn e(precision: Precision) -> Rational {
    // exp(1) is well inside the supported range.
    exp(&Rational::one(), precision).unwrap_or_else(|_| Rational::zero())
}

/// Square root.
///
/// Perfect squares are returned exactly.
///
/// # Errors
///
/// Returns [`NumericError::Domain`] for negative arguments.
pub fn sqrt(x: &Rational, precision: Precision) -> Result<Rational, NumericError> {
    if x.is_negative() {
        return Err(NumericError::domain("sqrt", x));
    }
    if x.is_zero() {
        return Ok(Rational::zero());
    }
    if let Some(root) = x.exact_root(2) {
        return Ok(root);
    }

    let digits = precision.widened(-magnitude(x) / 2 + 1);
    let fixed = Fixed::new(digits);
    let squared_scale = &fixed.scale * &fixed.scale;
    let radicand = x.numerator().into_inner() * squared_scale / x.denominator().into_inner();
    let root = Integer::from(radicand)
        .floor_root(2)
        .map_or(IBig::ZERO, Integer::into_inner);
    Ok(fixed.to_rational(root))
}

/// The exponential function.
///
/// # Errors
///
/// Returns [`NumericError::Domain`] when `|x|` is too large to represent.
pub fn exp(x: &Rational, precision: Precision) -> Result<Rational, NumericError> {
    if x.is_zero() {
        return Ok(Rational::one());
    }
    let magnitude_bound = x.abs().floor();
    if magnitude_bound > Integer::new(EXP_ARGUMENT_LIMIT) {
        return Err(NumericError::domain("exp", x));
    }

    // exp(|x|) = exp(|x| / 2^k)^(2^k), evaluated above one so that fixed
    // point keeps its relative precision while squaring.
    let halvings = u32::try_from(magnitude_bound.bit_len()).unwrap_or(u32::MAX) + 1;
    let fixed = Fixed::new(precision.widened(i64::from(halvings)));
    let divisor = Rational::from_integer(Integer::new(2).pow(halvings));
    let reduced = fixed.from_rational(&x.abs().checked_div(&divisor)?);

    let mut sum = fixed.one();
    let mut term = fixed.one();
    let mut n = 1u32;
    loop {
        term = fixed.mul(&term, &reduced) / IBig::from(n);
        if term.is_zero() {
            break;
        }
        sum += &term;
        n += 1;
    }
    for _ in 0..halvings {
        sum = fixed.mul(&sum, &sum);
    }

    let result = fixed.to_rational(sum);
    if x.is_negative() {
        result.recip()
    } else {
        Ok(result)
    }
}

/// The natural logarithm.
///
/// # Errors
///
/// Returns [`NumericError::Domain`] for non-positive arguments.
pub fn ln(x: &Rational, precision: Precision) -> Result<Rational, NumericError> {
    if !x.is_positive() {
        return Err(NumericError::domain("log", x));
    }
    if x.is_one() {
        return Ok(Rational::zero());
    }

    // x = m 2^e with 1 <= m < 2, ln x = e ln 2 + 2 atanh((m - 1) / (m + 1)).
    let two = Rational::from(2);
    let mut exponent = i64::try_from(x.numerator().bit_len()).unwrap_or(0)
        - i64::try_from(x.denominator().bit_len()).unwrap_or(0);
    let mut mantissa = x.checked_div(&two.pow(exponent)?)?;
    while mantissa >= two {
        mantissa = mantissa.checked_div(&two)?;
        exponent += 1;
    }
    while mantissa < Rational::one() {
        mantissa = &mantissa * &two;
        exponent -= 1;
    }

    let near_one = (x - &Rational::one()).abs();
    let digits = precision.widened((-magnitude(&near_one)).max(0) + 2);
    let fixed = Fixed::new(digits);

    let z = (&mantissa - &Rational::one()).checked_div(&(&mantissa + &Rational::one()))?;
    let ln_mantissa = fixed.atanh(&fixed.from_rational(&z)) * IBig::from(2u8);
    let third = Rational::from_i64(1, 3)?;
    let ln2 = fixed.atanh(&fixed.from_rational(&third)) * IBig::from(2u8);

    Ok(fixed.to_rational(IBig::from(exponent) * ln2 + ln_mantissa))
}

/// Returns `(sin x, cos x)`.
fn sin_cos(x: &Rational, precision: Precision) -> (Rational, Rational) {
    let fixed = Fixed::new(precision.widened(magnitude(x).max(0) + 2));
    let value = fixed.from_rational(x);
    let half_pi = fixed.pi() / IBig::from(2u8);

    // Nearest multiple of pi/2, leaving |r| <= pi/4.
    let two = IBig::from(2u8);
    let quarter = Integer::from(&two * &value + &half_pi)
        .div_floor(&Integer::from(&two * &half_pi))
        .unwrap_or_else(|_| Integer::zero());
    let reduced = &value - quarter.as_inner() * &half_pi;
    let four = IBig::from(4u8);
    let quadrant = i64::try_from((quarter.as_inner() % &four + &four) % &four).unwrap_or(0);

    let (s, c) = fixed.sin_cos(&reduced);
    let (sin, cos) = match quadrant {
        0 => (s, c),
        1 => (c, -s),
        2 => (-s, -c),
        _ => (-c, s),
    };
    (fixed.to_rational(sin), fixed.to_rational(cos))
}

/// Sine.
///
/// # Errors
///
/// Never fails; the signature matches the other functions.
pub fn sin(x: &Rational, precision: Precision) -> Result<Rational, NumericError> {
    Ok(sin_cos(x, precision).0)
}

/// Cosine.
///
/// # Errors
///
/// Never fails; the signature matches the other functions.
pub fn cos(x: &Rational, precision: Precision) -> Result<Rational, NumericError> {
    Ok(sin_cos(x, precision).1)
}

/// Tangent.
///
/// # Errors
///
/// Returns [`NumericError::Domain`] where the cosine vanishes.
pub fn tan(x: &Rational, precision: Precision) -> Result<Rational, NumericError> {
    let (sin, cos) = sin_cos(x, precision);
    if cos.is_zero() {
        return Err(NumericError::domain("tan", x));
    }
    sin.checked_div(&cos)
}

/// Inverse tangent.
///
/// # Errors
///
/// Never fails; the signature matches the other functions.
pub fn atan(x: &Rational, precision: Precision) -> Result<Rational, NumericError> {
    if x.is_zero() {
        return Ok(Rational::zero());
    }
    let fixed = Fixed::new(precision.widened((-magnitude(x)).max(0) + 2));
    let size = x.abs();
    let value = if size > Rational::one() {
        // atan(x) = pi/2 - atan(1/x) for x > 0
        let inverse = fixed.from_rational(&size.recip()?);
        fixed.pi() / IBig::from(2u8) - fixed.atan_unit(&inverse)
    } else {
        fixed.atan_unit(&fixed.from_rational(&size))
    };
    let result = fixed.to_rational(value);
    Ok(if x.is_negative() { -result } else { result })
}

/// Inverse sine.
///
/// # Errors
///
/// Returns [`NumericError::Domain`] outside `[-1, 1]`.
pub fn asin(x: &Rational, precision: Precision) -> Result<Rational, NumericError> {
    let size = x.abs();
    if size > Rational::one() {
        return Err(NumericError::domain("asin", x));
    }
    if size.is_one() {
        let half_pi = pi(precision).checked_div(&Rational::from(2))?;
        return Ok(if x.is_negative() { -half_pi } else { half_pi });
    }
    let inner = Precision::new(precision.digits() + 5);
    let cosine = sqrt(&(Rational::one() - x * x), inner)?;
    atan(&x.checked_div(&cosine)?, precision)
}

/// Inverse cosine.
///
/// # Errors
///
/// Returns [`NumericError::Domain`] outside `[-1, 1]`.
pub fn acos(x: &Rational, precision: Precision) -> Result<Rational, NumericError> {
    if x.abs() > Rational::one() {
        return Err(NumericError::domain("acos", x));
    }
    let inner = Precision::new(precision.digits() + 5);
    let half_pi = pi(inner).checked_div(&Rational::from(2))?;
    Ok(half_pi - asin(x, inner)?)
}

/// `(exp(x), exp(-x))` with enough digits to survive the cancellation in
/// `sinh` near zero.
fn exp_pair(x: &Rational, precision: Precision) -> Result<(Rational, Rational), NumericError> {
    let extra = u32::try_from((-magnitude(x)).max(0)).unwrap_or(0);
    let inner = Precision::new(precision.digits().saturating_add(extra) + 2);
    let grow = exp(x, inner)?;
    let shrink = grow.recip()?;
    Ok((grow, shrink))
}

/// Hyperbolic sine.
///
/// # Errors
///
/// Returns [`NumericError::Domain`] when `|x|` is too large to represent.
pub fn sinh(x: &Rational, precision: Precision) -> Result<Rational, NumericError> {
    if x.is_zero() {
        return Ok(Rational::zero());
    }
    let (grow, shrink) = exp_pair(x, precision)?;
    (grow - shrink).checked_div(&Rational::from(2))
}

/// Hyperbolic cosine.
///
/// # Errors
///
/// Returns [`NumericError::Domain`] when `|x|` is too large to represent.
pub fn cosh(x: &Rational, precision: Precision) -> Result<Rational, NumericError> {
    let (grow, shrink) = exp_pair(x, precision)?;
    (grow + shrink).checked_div(&Rational::from(2))
}

/// Hyperbolic tangent.
///
/// # Errors
///
/// Returns [`NumericError::Domain`] when `|x|` is too large to represent.
pub fn tanh(x: &Rational, precision: Precision) -> Result<Rational, NumericError> {
    if x.is_zero() {
        return Ok(Rational::zero());
    }
    let (grow, shrink) = exp_pair(x, precision)?;
    (&grow - &shrink).checked_div(&(grow + shrink))
}

/// `base^exponent` for a rational exponent.
///
/// Integer exponents are exact, as are rational exponents whose root
/// exists exactly (`8^(2/3) = 4`).
///
/// # Errors
///
/// Returns [`NumericError::DivisionByZero`] for non-positive powers of zero
/// and [`NumericError::Domain`] for non-integer powers of negative numbers.
pub fn powf(
    base: &Rational,
    exponent: &Rational,
    precision: Precision,
) -> Result<Rational, NumericError> {
    if let Some(n) = exponent.to_integer() {
        let n = n.to_i64().ok_or_else(|| NumericError::domain("pow", exponent))?;
        return base.pow(n);
    }
    if base.is_zero() {
        return if exponent.is_positive() {
            Ok(Rational::zero())
        } else {
            Err(NumericError::DivisionByZero)
        };
    }
    if base.is_negative() {
        return Err(NumericError::domain("pow", base));
    }

    let root_index = exponent.denominator().to_i64().and_then(|q| u32::try_from(q).ok());
    let power = exponent.numerator().to_i64();
    if let (Some(root_index), Some(power)) = (root_index, power) {
        if let Some(root) = base.exact_root(root_index) {
            return root.pow(power);
        }
        if root_index == 2 {
            return sqrt(&base.pow(power)?, precision);
        }
    }

    // exp(y ln b): an error in ln b is multiplied by |y ln b|.
    let extra = magnitude(exponent).max(0) + magnitude(base).abs() + 2;
    let inner = Precision::new(precision.widened(extra));
    let log = ln(base, inner)?;
    exp(&(exponent * &log), precision)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(num: i64, den: i64) -> Rational {
        Rational::from_i64(num, den).unwrap()
    }

    /// Asserts `|actual - expected| < 10^-digits`.
    fn assert_close(actual: &Rational, expected: &str, digits: i64) {
        let expected: Rational = expected.parse().unwrap();
        let error = (actual - &expected).abs();
        assert!(
            error < Rational::pow10(-digits),
            "{actual:?} differs from {expected:?} by more than 1e-{digits}"
        );
    }

    fn p() -> Precision {
        Precision::new(35)
    }

    #[test]
    fn test_constants() {
        assert_close(&pi(p()), "3.141592653589793238462643383279502884197", 34);
        assert_close(&e(p()), "2.718281828459045235360287471352662497757", 34);
    }

    #[test]
    fn test_sqrt() {
        assert_close(&sqrt(&Rational::from(2), p()).unwrap(), "1.41421356237309504880168872420969807857", 34);
        assert_close(&sqrt(&q(66, 100), p()).unwrap(), "0.8124038404635960360459883568266040348504", 34);
        assert_eq!(sqrt(&q(9, 4), p()).unwrap(), q(3, 2));
        assert!(matches!(sqrt(&Rational::from(-1), p()), Err(NumericError::Domain { .. })));
    }

    #[test]
    fn test_exp_and_ln() {
        assert_close(&exp(&Rational::from(-1), p()).unwrap(), "0.3678794411714423215955237701614608674458", 34);
        assert_close(&exp(&Rational::from(50), p()).unwrap(), "5184705528587072464087.453322933485384827", 12);
        assert_close(&ln(&Rational::from(2), p()).unwrap(), "0.6931471805599453094172321214581765680755", 34);
        assert_close(&ln(&Rational::from(10), p()).unwrap(), "2.302585092994045684017991454684364207601", 33);
        assert_close(&ln(&q(1, 10), p()).unwrap(), "-2.302585092994045684017991454684364207601", 33);
        assert!(ln(&Rational::zero(), p()).is_err());
    }

    #[test]
    fn test_ln_keeps_relative_precision_near_one() {
        let x = Rational::one() + Rational::pow10(-20);
        let value = ln(&x, p()).unwrap();
        // x - x^2/2 to well below the tolerance
        assert_close(&value, "9.99999999999999999995e-21", 55);
    }

    #[test]
    fn test_trig() {
        assert_close(&sin(&Rational::one(), p()).unwrap(), "0.8414709848078965066525023216302989996226", 34);
        assert_close(&cos(&Rational::one(), p()).unwrap(), "0.5403023058681397174009366074429766037323", 34);
        assert_close(&sin(&Rational::from(100), p()).unwrap(), "-0.506365641109758793656557610459785432065", 33);
        assert_close(&tan(&Rational::one(), p()).unwrap(), "1.557407724654902230506974807458360173087", 33);
    }

    #[test]
    fn test_inverse_trig() {
        assert_close(&atan(&Rational::from(2), p()).unwrap(), "1.10714871779409050301706546017853704007", 34);
        assert_close(&asin(&q(1, 2), p()).unwrap(), "0.5235987755982988730771072305465838140329", 34);
        assert_close(&acos(&q(3, 10), p()).unwrap(), "1.266103672779499111259318730412222275144", 33);
        assert!(asin(&Rational::from(2), p()).is_err());
    }

    #[test]
    fn test_hyperbolic() {
        assert_close(&sinh(&q(1, 2), p()).unwrap(), "0.5210953054937473616224256264114915591059", 34);
        assert_close(&tanh(&Rational::one(), p()).unwrap(), "0.7615941559557648881194582826047935904128", 34);
        assert_eq!(cosh(&Rational::zero(), p()).unwrap(), Rational::one());
    }

    #[test]
    fn test_powf() {
        assert_eq!(powf(&Rational::from(8), &q(2, 3), p()).unwrap(), Rational::from(4));
        assert_eq!(powf(&q(2, 3), &Rational::from(-2), p()).unwrap(), q(9, 4));
        assert_close(&powf(&Rational::from(2), &q(1, 3), p()).unwrap(), "1.25992104989487316476721060727822835057", 33);
        assert_close(&powf(&Rational::from(3), &q(5, 2), p()).unwrap(), "15.58845726811989564174701707355285130249", 32);
        assert_eq!(powf(&Rational::zero(), &q(-1, 2), p()), Err(NumericError::DivisionByZero));
        assert!(powf(&Rational::from(-8), &q(1, 3), p()).is_err());
    }
}
