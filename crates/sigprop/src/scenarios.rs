//! End-to-end derivations.

#[cfg(test)]
mod tests {
    use crate::input::{parse_equation, parse_variables};
    use crate::{
        propagate, Digits, Equation, ErrorKind, PropagationError, RenderOptions,
        UncertaintyCalculator, Variable,
    };

    fn linear() -> (Equation, Vec<Variable>) {
        let equation = parse_equation(&["y", "m*x + b"]).unwrap();
        let variables = parse_variables([
            ("m = 2.5 +- 0.1", "m"),
            ("x = 4.0 +- 0.2", "x"),
            ("b = 1.0 +- 0.5", "b"),
        ])
        .unwrap();
        (equation, variables)
    }

    fn zeta() -> (Equation, Vec<Variable>) {
        let equation =
            parse_equation(&["\\zeta ", " (K*pi*eta*u*l)/(4*pi*phi*e_0*e_r)"]).unwrap();
        let variables = parse_variables([
            ("K = 4 +- 0", "K"),
            ("eta = 0.9358e-3 +- 0.0001/sqrt(3)", "\\eta"),
            ("u = 3.68e-5 +- 0.11e-5", "u"),
            ("l = 0.2256 +- 0.0019", "l"),
            ("phi = 100 +- 1/sqrt(3)", "\\varphi"),
            ("e_0 = 8.8541878128e-12 +- 0", "\\varepsilon_0"),
            ("e_r = 78.7 +- 0.1/sqrt(3)", "\\varepsilon_\\text{r}"),
        ])
        .unwrap();
        (equation, variables)
    }

    fn all_options() -> Vec<RenderOptions> {
        let mut options = Vec::new();
        for bits in 0..16u8 {
            options.push(RenderOptions {
                last_unit: (bits & 1 != 0).then(|| "\\text{V}".to_string()),
                separate: bits & 2 != 0,
                insert: bits & 4 != 0,
                include_equation_number: bits & 8 != 0,
                legacy_end_marker: false,
            });
        }
        options
    }

    #[test]
    fn linear_combined() {
        let (equation, variables) = linear();
        let out = propagate(
            &equation,
            &variables,
            Digits::new(3, 2).unwrap(),
            None,
            false,
            false,
            false,
        )
        .unwrap();

        let expected = concat!(
            "\\begin{equation*}\n",
            "\\begin{aligned}\n",
            "y&=b + m x=11.0\\\\\n",
            "\\\\\n",
            "\\frac{\\partial y }{\\partial m }&=x=4.0\\\\\n",
            "\\frac{\\partial y }{\\partial x }&=m=2.5\\\\\n",
            "\\frac{\\partial y }{\\partial b }&=1=1.0\\\\\n",
            "\\\\\n",
            "\\sigma_{y}&=\\sqrt{",
            "\\left(\\frac{\\partial y }{\\partial m } \\sigma_{m}\\right)^2+",
            "\\left(\\frac{\\partial y }{\\partial x } \\sigma_{x}\\right)^2+",
            "\\left(\\frac{\\partial y }{\\partial b } \\sigma_{b}\\right)^2}\\\\\n",
            "&=\\sqrt{\\left(0.4\\right)^2+\\left(0.5\\right)^2+\\left(0.5\\right)^2}\\\\\n",
            "&=0.81\\\\\n",
            "\\\\\n",
            "y&=11.0 \\pm 0.81\n",
            "\\end{aligned}\n",
            "\\end{equation*}\n",
        );
        assert_eq!(out, expected);
    }

    #[test]
    fn linear_separate_inserted_numbered_with_unit() {
        let (equation, variables) = linear();
        let out = propagate(
            &equation,
            &variables,
            Digits::new(3, 2).unwrap(),
            Some("\\si{V}".to_string()),
            true,
            true,
            true,
        )
        .unwrap();

        let expected = concat!(
            "\\begin{equation}\n",
            "y=b + m x=\\left(1.0\\right) + \\left(2.5\\right) \\times \\left(4.0\\right)=11.0\\ \\si{V}\n",
            "\\end{equation}\n",
            "\n",
            "\\begin{equation}\n",
            "\\begin{aligned}\n",
            "\\frac{\\partial y }{\\partial m }&=x=\\left(4.0\\right)=4.0\\\\\n",
            "\\frac{\\partial y }{\\partial x }&=m=\\left(2.5\\right)=2.5\\\\\n",
            "\\frac{\\partial y }{\\partial b }&=1=1=1.0\\\\\n",
            "\\end{aligned}\n",
            "\\end{equation}\n",
            "\n",
            "\\begin{equation}\n",
            "\\begin{aligned}\n",
            "\\sigma_{y}&=\\sqrt{",
            "\\left(\\frac{\\partial y }{\\partial m } \\sigma_{m}\\right)^2+",
            "\\left(\\frac{\\partial y }{\\partial x } \\sigma_{x}\\right)^2+",
            "\\left(\\frac{\\partial y }{\\partial b } \\sigma_{b}\\right)^2}\\\\\n",
            "&=\\sqrt{\\left(4.0 \\times 0.1\\right)^2+\\left(2.5 \\times 0.2\\right)^2+",
            "\\left(1.0 \\times 0.5\\right)^2}\\\\\n",
            "&=\\sqrt{\\left(0.4\\right)^2+\\left(0.5\\right)^2+\\left(0.5\\right)^2}\\\\\n",
            "&=0.81\\ \\si{V}\n",
            "\\end{aligned}\n",
            "\\end{equation}\n",
            "\n",
            "\\begin{equation}\n",
            "y=\\left (11.0 \\pm 0.81 \\right )\\ \\si{V}\n",
            "\\end{equation}\n",
        );
        assert_eq!(out, expected);
    }

    #[test]
    fn power_law() {
        let equation = Equation::new("E", "0.5 * m * v**2");
        let variables = [
            Variable::new("m", "10.0", "0.5", "m"),
            Variable::new("v", "5.0", "0.1", "v"),
        ];
        let out = propagate(
            &equation,
            &variables,
            Digits::new(3, 2).unwrap(),
            None,
            false,
            false,
            false,
        )
        .unwrap();

        assert!(out.contains("E&=0.5 m v^{2}=125.0\\\\\n"));
        assert!(out.contains("\\frac{\\partial E }{\\partial m }&=0.5 v^{2}=13.0\\\\\n"));
        assert!(out.contains("\\frac{\\partial E }{\\partial v }&=1.0 m v=50.0\\\\\n"));
        assert!(out.contains("&=\\sqrt{\\left(6.3\\right)^2+\\left(5.0\\right)^2}\\\\\n"));
        assert!(out.contains("E&=125.0 \\pm 8.0\n"));

        let inserted = propagate(
            &equation,
            &variables,
            Digits::new(3, 2).unwrap(),
            None,
            false,
            true,
            false,
        )
        .unwrap();
        assert!(inserted.contains("\\left(13.0 \\times 0.5\\right)^2"));
        assert!(inserted.contains("\\left(50.0 \\times 0.1\\right)^2"));
        assert!(!inserted.contains("12.5"));
    }

    #[test]
    fn zeta_potential_skips_exact_variables() {
        let (equation, variables) = zeta();
        let out = propagate(
            &equation,
            &variables,
            Digits::new(3, 3).unwrap(),
            Some("\\si{V}".to_string()),
            false,
            false,
            true,
        )
        .unwrap();

        assert!(out.starts_with("\\begin{equation}\n\\begin{aligned}\n\\zeta&="));
        assert_eq!(out.matches("\\frac{\\partial \\zeta }").count(), 5 * 2);
        assert!(!out.contains("\\partial K }"));
        assert!(!out.contains("\\partial \\varepsilon_0 }"));
        assert!(out.contains("\\sigma_{\\varepsilon_\\text{r}}\\right)^2}\\\\\n"));
        assert!(out.contains("\\right )\\ \\si{V}\n\\end{aligned}\n\\end{equation}\n"));
    }

    #[test]
    fn no_state_leaks_between_runs() {
        let calculator = UncertaintyCalculator::new();
        let digits = Digits::new(2, 2).unwrap();
        let options = RenderOptions::default();

        let (equation, variables) = zeta();
        let first = calculator.run(&equation, &variables, digits, &options).unwrap();
        assert!(first.contains("\\sigma_{\\eta}"));

        let equation = Equation::new("y", "x");
        let variables = [Variable::new("x", 1, 0.1, "x")];
        let second = calculator.run(&equation, &variables, digits, &options).unwrap();
        assert!(!second.contains("\\eta"));
        assert!(!second.contains("varphi"));
        assert!(second.contains("\\sigma_{y}&=\\sqrt{\\left(\\frac{\\partial y }{\\partial x } \\sigma_{x}\\right)^2}\\\\\n"));
        assert!(second.contains("y&=1.0 \\pm 0.1\n"));
    }

    #[test]
    fn zero_uncertainty_short_circuit() {
        let equation = Equation::new("y", "x");
        let variables = [Variable::new("x", 1, 0, "x")];
        for options in all_options().into_iter().filter(|o| o.last_unit.is_none()) {
            let out = UncertaintyCalculator::new()
                .run(&equation, &variables, Digits::new(2, 2).unwrap(), &options)
                .unwrap();
            assert!(out.contains("\\sigma_{y}&=0"), "{options:?}");
            assert!(!out.contains("\\sqrt"), "{options:?}");
        }
    }

    #[test]
    fn round_trip_rounding() {
        let equation = Equation::new("y", "x");
        let variables = [Variable::new("x", 10.5, 0, "x")];
        let coarse = propagate(&equation, &variables, Digits::new(2, 2).unwrap(), None, false, false, false)
            .unwrap();
        assert!(coarse.contains("y&=x=10.5\\\\\n"));
        assert!(coarse.contains("y&=10.5 \\pm 0\n"));

        let fine = propagate(&equation, &variables, Digits::new(4, 3).unwrap(), None, false, false, false)
            .unwrap();
        assert_eq!(fine, coarse);
    }

    #[test]
    fn full_integer_part_keeps_configured_digits() {
        let equation = Equation::new("y", "x");
        for (value, digits, shown) in [(123.456, 3, "123.0"), (10.4, 2, "10.0"), (47.25, 2, "47.0")] {
            let variables = [Variable::new("x", value, 0, "x")];
            let out = propagate(&equation, &variables, Digits::new(digits, 2).unwrap(), None, false, false, false)
                .unwrap();
            assert!(out.contains(&format!("y&=x={shown}\\\\\n")), "{value}");
            assert!(out.contains(&format!("y&={shown} \\pm 0\n")), "{value}");
        }
    }

    #[test]
    fn undefined_symbol_for_every_option() {
        let equation = Equation::new("y", "m*x + b");
        let variables = [
            Variable::new("m", 1, 0.1, "m"),
            Variable::new("x", 2, 0.1, "x"),
        ];
        for options in all_options() {
            let err = UncertaintyCalculator::new()
                .run(&equation, &variables, Digits::new(2, 2).unwrap(), &options)
                .unwrap_err();
            assert_eq!(err, PropagationError::UndefinedSymbol("b".to_string()));
            assert_eq!(err.kind(), ErrorKind::UndefinedSymbol);
        }
    }

    /// Lines of `text` that are not environment delimiters or spacing.
    fn content(text: &str) -> Vec<String> {
        text.lines()
            .filter(|line| {
                !line.starts_with("\\begin")
                    && !line.starts_with("\\end")
                    && !line.is_empty()
                    && *line != "\\\\"
            })
            .map(|line| line.replace("&=", "=").trim_end_matches("\\\\").to_string())
            .collect()
    }

    #[test]
    fn separate_mode_has_the_same_sections() {
        let (equation, variables) = zeta();
        for insert in [false, true] {
            let combined = propagate(&equation, &variables, Digits::default(), None, false, insert, false)
                .unwrap();
            let separate = propagate(&equation, &variables, Digits::default(), None, true, insert, false)
                .unwrap();
            assert_eq!(content(&combined), content(&separate));
        }
    }

    #[test]
    fn malformed_inputs_are_classified() {
        assert_eq!(
            parse_equation(&["y"]).unwrap_err().kind(),
            ErrorKind::Structural
        );
        assert_eq!(
            parse_variables([("x = 1", "x")]).unwrap_err().kind(),
            ErrorKind::Structural
        );
        assert_eq!(Digits::new(0, 1).unwrap_err().kind(), ErrorKind::Configuration);

        let equation = Equation::new("y", "x");
        let variables = [
            Variable::new("x", 1, 0.1, "x"),
            Variable::new("x", 1, 0.1, "x"),
        ];
        let err = propagate(&equation, &variables, Digits::default(), None, false, false, false)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Duplicate);
    }
}
