//! Significant-digit rounding and decimal display.
//!
//! Results are displayed the way typeset derivations have always shown
//! them: fixed point for moderate magnitudes, `m \times 10^{e}` beyond,
//! trailing zeros dropped but never the last fractional digit.

use num_traits::Zero;

use crate::{Integer, Rational};

/// A value rounded to a number of significant digits.
///
/// Represents `±d.ddd × 10^exponent` where `digits` holds the `d`s.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignificantDecimal {
    negative: bool,
    digits: String,
    exponent: i64,
}

impl SignificantDecimal {
    /// Rounds `value` to `significant` digits, ties away from zero.
    #[must_use]
    pub fn round(value: &Rational, significant: u32) -> Self {
        let significant = significant.max(1);
        let Some(mut exponent) = value.decimal_exponent() else {
            return Self {
                negative: false,
                digits: "0".repeat(significant as usize),
                exponent: 0,
            };
        };

        let shift = i64::from(significant) - 1 - exponent;
        let mut mantissa = (value.abs() * Rational::pow10(shift)).round_half_away();
        if mantissa == Integer::pow10(significant) {
            mantissa = Integer::pow10(significant - 1);
            exponent += 1;
        }

        Self {
            negative: value.is_negative(),
            digits: mantissa.to_string(),
            exponent,
        }
    }

    /// Returns true if the rounded value is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.digits.bytes().all(|b| b == b'0')
    }

    /// The significant digits, leading digit first.
    #[must_use]
    pub fn digits(&self) -> &str {
        &self.digits
    }

    /// Decimal exponent of the leading digit.
    #[must_use]
    pub fn exponent(&self) -> i64 {
        self.exponent
    }

    /// The rounded value as an exact rational.
    #[must_use]
    pub fn to_rational(&self) -> Rational {
        let Ok(mantissa) = self.digits.parse::<Integer>() else {
            return Rational::zero();
        };
        let len = i64::try_from(self.digits.len()).unwrap_or(0);
        let magnitude = Rational::from_integer(mantissa) * Rational::pow10(self.exponent + 1 - len);
        if self.negative {
            -magnitude
        } else {
            magnitude
        }
    }

    /// Display form using fixed point when `min_fixed < exponent < max_fixed`.
    fn render(&self, max_fixed: i64) -> String {
        if self.is_zero() {
            return "0".to_string();
        }
        let min_fixed = (-(max_fixed / 3)).min(-5);
        let sign = if self.negative { "-" } else { "" };
        let trim = |fraction: &str| {
            let trimmed = fraction.trim_end_matches('0');
            if trimmed.is_empty() {
                "0".to_string()
            } else {
                trimmed.to_string()
            }
        };

        if min_fixed < self.exponent && self.exponent < max_fixed {
            let (whole, fraction) = if self.exponent >= 0 {
                let split = usize::try_from(self.exponent + 1).unwrap_or(0);
                let padded = format!("{:0<split$}", self.digits);
                let split = split.min(padded.len());
                (padded[..split].to_string(), padded[split..].to_string())
            } else {
                let zeros = usize::try_from(-self.exponent - 1).unwrap_or(0);
                ("0".to_string(), format!("{}{}", "0".repeat(zeros), self.digits))
            };
            format!("{sign}{whole}.{}", trim(&fraction))
        } else {
            let (lead, rest) = self.digits.split_at(1);
            format!("{sign}{lead}.{} \\times 10^{{{}}}", trim(rest), self.exponent)
        }
    }
}

/// Formats `value` rounded to `significant` digits as display markup.
///
/// Zero displays as `0`; every other value keeps at least one fractional
/// digit, so `11` at two digits displays as `11.0`.
#[must_use]
pub fn format_rounded(value: &Rational, significant: u32) -> String {
    let significant = significant.max(1);
    SignificantDecimal::round(value, significant).render(i64::from(significant))
}

/// Formats a result rounded to `significant` digits as display markup.
///
/// Like [`format_rounded`], except when the rounded integer part already
/// holds every significant digit and the value is exactly representable
/// with one more digit: the fractional digit is then kept, so `10.5` at
/// two digits displays as `10.5` while `10.4` displays as `10.0`.
#[must_use]
pub fn format_significant(value: &Rational, significant: u32) -> String {
    let significant = significant.max(1);
    let rounded = SignificantDecimal::round(value, significant);
    let max_fixed = i64::from(significant);
    if !rounded.is_zero() && rounded.exponent + 1 == max_fixed {
        let refined = SignificantDecimal::round(value, significant + 1);
        if refined.exponent == rounded.exponent && refined.to_rational() == *value {
            return refined.render(max_fixed);
        }
    }
    rounded.render(max_fixed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(text: &str) -> Rational {
        text.parse().unwrap()
    }

    #[test]
    fn test_round() {
        let rounded = SignificantDecimal::round(&r("0.0077349"), 2);
        assert_eq!(rounded.digits(), "77");
        assert_eq!(rounded.exponent(), -3);
        assert_eq!(rounded.to_rational(), r("0.0077"));

        let carried = SignificantDecimal::round(&r("9.96"), 2);
        assert_eq!(carried.digits(), "10");
        assert_eq!(carried.exponent(), 1);

        let tie = SignificantDecimal::round(&r("-8.85"), 2);
        assert_eq!(tie.to_rational(), r("-8.9"));
    }

    #[test]
    fn test_fixed_point_display() {
        assert_eq!(format_significant(&r("11"), 3), "11.0");
        assert_eq!(format_significant(&r("0.81240384"), 2), "0.81");
        assert_eq!(format_significant(&r("4"), 2), "4.0");
        assert_eq!(format_significant(&r("2.5"), 2), "2.5");
        assert_eq!(format_significant(&r("0.00773"), 2), "0.0077");
        assert_eq!(format_significant(&r("-1.25"), 2), "-1.3");
        assert_eq!(format_significant(&r("100"), 3), "100.0");
    }

    #[test]
    fn test_integer_part_full() {
        assert_eq!(format_significant(&r("10.5"), 2), "10.5");
        assert_eq!(format_significant(&r("11"), 2), "11.0");
        assert_eq!(format_significant(&r("10.96"), 2), "11.0");
    }

    #[test]
    fn test_integer_part_full_keeps_digit_count() {
        assert_eq!(format_significant(&r("123.456"), 3), "123.0");
        assert_eq!(format_significant(&r("10.4"), 2), "10.0");
        assert_eq!(format_significant(&r("47.25"), 2), "47.0");
        assert_eq!(format_significant(&r("12.5"), 2), "12.5");
    }

    #[test]
    fn test_plain_rounding_never_refines() {
        assert_eq!(format_rounded(&r("12.5"), 2), "13.0");
        assert_eq!(format_rounded(&r("10.5"), 2), "11.0");
        assert_eq!(format_rounded(&r("0.81240384"), 2), "0.81");
        assert_eq!(format_rounded(&r("6.25"), 2), "6.3");
        assert_eq!(format_rounded(&Rational::zero(), 2), "0");
    }

    #[test]
    fn test_scientific_display() {
        assert_eq!(format_significant(&r("123.456"), 2), "1.2 \\times 10^{2}");
        assert_eq!(format_significant(&r("8.85e-12"), 2), "8.9 \\times 10^{-12}");
        assert_eq!(format_significant(&r("3000"), 3), "3.0 \\times 10^{3}");
        assert_eq!(format_significant(&r("99.7"), 2), "1.0 \\times 10^{2}");
    }

    #[test]
    fn test_zero() {
        assert_eq!(format_significant(&Rational::zero(), 2), "0");
        assert!(SignificantDecimal::round(&Rational::zero(), 3).is_zero());
    }
}
