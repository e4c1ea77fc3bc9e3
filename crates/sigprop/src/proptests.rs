//! Property-based tests for the pipeline.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::{propagate, Digits, Equation, RenderOptions, UncertaintyCalculator, Variable};

    // A decimal literal with one to three fractional digits
    fn decimal() -> impl Strategy<Value = String> {
        (1i64..999, 1usize..4).prop_map(|(n, places)| {
            let text = format!("{n:0>width$}", width = places + 1);
            let (whole, fraction) = text.split_at(text.len() - places);
            format!("{whole}.{fraction}")
        })
    }

    // A value in [lo/1000, 1) with three fractional digits
    fn fraction(lo: i64) -> impl Strategy<Value = String> {
        (lo..1000).prop_map(|n| format!("0.{n:03}"))
    }

    fn options() -> impl Strategy<Value = RenderOptions> {
        (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
            |(unit, separate, insert, include_equation_number)| RenderOptions {
                last_unit: unit.then(|| "\\si{V}".to_string()),
                separate,
                insert,
                include_equation_number,
                legacy_end_marker: false,
            },
        )
    }

    /// Replaces every number in `text` by `#`.
    fn skeleton(text: &str) -> String {
        let mut out = String::new();
        let mut in_number = false;
        for c in text.chars() {
            if c.is_ascii_digit() || (in_number && c == '.') {
                if !in_number {
                    out.push('#');
                }
                in_number = true;
            } else {
                in_number = false;
                out.push(c);
            }
        }
        out
    }

    proptest! {
        #[test]
        fn output_is_deterministic(m in decimal(), x in decimal(), u in decimal(), options in options()) {
            let equation = Equation::new("y", "m*x + b");
            let variables = [
                Variable::new("m", m.as_str(), u.as_str(), "m"),
                Variable::new("x", x.as_str(), "0.1", "x"),
                Variable::new("b", "1.0", "0", "b"),
            ];
            let calculator = UncertaintyCalculator::new();
            let first = calculator.run(&equation, &variables, Digits::default(), &options).unwrap();
            let second = calculator.run(&equation, &variables, Digits::default(), &options).unwrap();
            prop_assert_eq!(first, second);
        }

        #[test]
        fn undefined_symbols_fail_for_every_option(options in options()) {
            let equation = Equation::new("y", "m*x + b");
            let variables = [
                Variable::new("m", "2", "0.1", "m"),
                Variable::new("x", "3", "0.1", "x"),
            ];
            let err = UncertaintyCalculator::new()
                .run(&equation, &variables, Digits::default(), &options)
                .unwrap_err();
            prop_assert!(err.to_string().contains("'b'"));
        }

        #[test]
        fn digits_only_change_numbers(x in fraction(100), u in fraction(10), mu in 1i64..8, sigma in 1i64..8) {
            let equation = Equation::new("A", "pi*r**2");
            let variables = [Variable::new("r", x.as_str(), u.as_str(), "r")];
            let coarse = propagate(&equation, &variables, Digits::new(2, 2).unwrap(), None, false, true, false).unwrap();
            let fine = propagate(&equation, &variables, Digits::new(mu, sigma).unwrap(), None, false, true, false).unwrap();
            prop_assert_eq!(skeleton(&coarse), skeleton(&fine));
        }
    }
}
