//! Property-based tests for exact arithmetic and significant-digit display.

#[cfg(test)]
mod tests {
    use num_traits::{One, Zero};
    use proptest::prelude::*;

    use crate::transcendental::{exp, ln, sqrt};
    use crate::{format_significant, Integer, Number, Precision, Rational, SignificantDecimal};

    // Strategy for generating small integers
    fn small_int() -> impl Strategy<Value = i64> {
        -1000i64..1000i64
    }

    // Strategy for generating non-zero integers
    fn non_zero_int() -> impl Strategy<Value = i64> {
        prop_oneof![(-1000i64..=-1i64), (1i64..=1000i64)]
    }

    fn rational(num: i64, den: i64) -> Rational {
        Rational::from_i64(num, den).unwrap()
    }

    proptest! {
        #[test]
        fn rational_add_commutative(
            num_a in small_int(),
            den_a in non_zero_int(),
            num_b in small_int(),
            den_b in non_zero_int()
        ) {
            let a = rational(num_a, den_a);
            let b = rational(num_b, den_b);
            prop_assert_eq!(a.clone() + b.clone(), b + a);
        }

        #[test]
        fn rational_distributive(
            num_a in small_int(),
            den_a in non_zero_int(),
            num_b in small_int(),
            den_b in non_zero_int(),
            num_c in small_int(),
            den_c in non_zero_int()
        ) {
            let a = rational(num_a, den_a);
            let b = rational(num_b, den_b);
            let c = rational(num_c, den_c);
            prop_assert_eq!(
                a.clone() * (b.clone() + c.clone()),
                a.clone() * b + a * c
            );
        }

        #[test]
        fn rational_multiplicative_inverse(num in non_zero_int(), den in non_zero_int()) {
            let a = rational(num, den);
            let inv = a.recip().unwrap();
            prop_assert!((a * inv).is_one());
        }

        #[test]
        fn floor_root_brackets_the_root(n in 0i64..1_000_000, k in 1u32..5) {
            let n = Integer::new(n);
            let root = n.floor_root(k).unwrap();
            let next = root.clone() + Integer::new(1);
            prop_assert!(root.pow(k) <= n);
            prop_assert!(next.pow(k) > n);
        }

        #[test]
        fn decimal_literals_parse_exactly(whole in 0u32..100_000, fraction in 0u32..1000) {
            let text = format!("{whole}.{fraction:03}");
            let parsed: Rational = text.parse().unwrap();
            let expected = rational(i64::from(whole) * 1000 + i64::from(fraction), 1000);
            prop_assert_eq!(parsed, expected);
        }

        #[test]
        fn number_text_round_trips(num in small_int(), den in non_zero_int(), decimal in any::<bool>()) {
            let value = rational(num, den);
            let number = if decimal { Number::decimal(value) } else { Number::exact(value) };
            let reparsed: Number = number.to_string().parse().unwrap();
            prop_assert_eq!(reparsed, number);
        }

        #[test]
        fn rounding_error_is_bounded(num in 1i64..10_000_000, den in 1i64..10_000, digits in 1u32..8) {
            let value = rational(num, den);
            let rounded = SignificantDecimal::round(&value, digits).to_rational();
            let exponent = value.decimal_exponent().unwrap();
            // |value - rounded| <= 0.5 ulp, one ulp being 10^(e - digits + 1)
            let ulp = Rational::pow10(exponent - i64::from(digits) + 1);
            let half = rational(1, 2);
            prop_assert!((value - rounded).abs() <= ulp * half);
        }

        #[test]
        fn display_never_loses_the_decimal_point(num in 1i64..1_000_000, den in 1i64..1000, digits in 1u32..6) {
            let text = format_significant(&rational(num, den), digits);
            prop_assert!(text.contains('.'));
        }

        #[test]
        fn sqrt_squares_back(num in 1i64..100_000, den in 1i64..1000) {
            let x = rational(num, den);
            let root = sqrt(&x, Precision::new(40)).unwrap();
            let error = (&root * &root - x.clone()).abs();
            prop_assert!(error <= x * Rational::pow10(-38));
        }

        #[test]
        fn ln_inverts_exp(num in -2000i64..2000) {
            let x = rational(num, 100);
            let precision = Precision::new(40);
            let back = ln(&exp(&x, precision).unwrap(), precision).unwrap();
            prop_assert!((back - x).abs() < Rational::pow10(-35));
        }
    }

    #[test]
    fn zero_has_no_exponent() {
        assert!(Rational::zero().decimal_exponent().is_none());
    }
}
