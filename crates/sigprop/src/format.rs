//! Formatting helpers shared by the parser and the renderer.

use sigprop_core::{ExprArena, ExprHandle, LabelMap, LatexPrinter, MulSymbol};
use sigprop_numeric::{format_rounded, format_significant, Rational};

/// Significant digits of every intermediate number in a derivation.
pub const INTERMEDIATE_DIGITS: u32 = 2;

/// Renders `expr` with display labels for its symbols.
#[must_use]
pub fn latex_symbol(arena: &ExprArena, labels: &LabelMap, expr: ExprHandle) -> String {
    LatexPrinter::new(arena).with_labels(labels).print(expr)
}

/// Renders `expr` with bracketed values in place of its symbols.
#[must_use]
pub fn latex_value(arena: &ExprArena, values: &LabelMap, expr: ExprHandle) -> String {
    LatexPrinter::new(arena)
        .with_labels(values)
        .with_mul_symbol(MulSymbol::Times)
        .print(expr)
}

/// Renders a plain numeric expression.
#[must_use]
pub fn latex_number(arena: &ExprArena, expr: ExprHandle) -> String {
    LatexPrinter::new(arena)
        .with_mul_symbol(MulSymbol::Times)
        .print(expr)
}

/// Renders `value` rounded to `digits` significant digits.
#[must_use]
pub fn rounded(value: &Rational, digits: u32) -> String {
    format_significant(value, digits)
}

/// Renders an intermediate value at [`INTERMEDIATE_DIGITS`].
///
/// Unlike [`rounded`], an intermediate never shows more than
/// [`INTERMEDIATE_DIGITS`] significant digits.
#[must_use]
pub fn intermediate(value: &Rational) -> String {
    format_rounded(value, INTERMEDIATE_DIGITS)
}

/// `\left(text\right)`.
#[must_use]
pub fn bracketed(text: &str) -> String {
    format!("\\left({text}\\right)")
}

/// The uncertainty label of a variable displayed as `label`.
#[must_use]
pub fn sigma_label(label: &str) -> String {
    format!("\\sigma_{{{label}}}")
}

/// `\frac{\partial result }{\partial variable }`.
#[must_use]
pub fn partial(result: &str, variable: &str) -> String {
    format!("\\frac{{\\partial {result} }}{{\\partial {variable} }}")
}

/// Appends the unit, separated by a thin space, when there is one.
#[must_use]
pub fn with_unit(value: &str, unit: Option<&str>) -> String {
    match unit {
        Some(unit) => format!("{value}\\ {unit}"),
        None => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigprop_core::{parse_expr, SymbolScope};

    #[test]
    fn test_intermediate_rounding() {
        assert_eq!(intermediate(&"0.4".parse().unwrap()), "0.4");
        assert_eq!(intermediate(&"0.81240384".parse().unwrap()), "0.81");
        assert_eq!(intermediate(&"4".parse().unwrap()), "4.0");
        assert_eq!(intermediate(&"0.00001".parse().unwrap()), "1.0 \\times 10^{-5}");
        assert_eq!(intermediate(&Rational::from(0)), "0");
    }

    #[test]
    fn test_intermediate_keeps_two_digits() {
        let value: Rational = "12.5".parse().unwrap();
        assert_eq!(intermediate(&value), "13.0");
        assert_eq!(rounded(&value, 2), "12.5");
        assert_eq!(rounded(&"123.456".parse().unwrap(), 3), "123.0");
    }

    #[test]
    fn test_markup_pieces() {
        assert_eq!(bracketed("4.0"), "\\left(4.0\\right)");
        assert_eq!(sigma_label("\\eta"), "\\sigma_{\\eta}");
        assert_eq!(partial("y", "m"), "\\frac{\\partial y }{\\partial m }");
        assert_eq!(with_unit("11.0", Some("\\si{V}")), "11.0\\ \\si{V}");
        assert_eq!(with_unit("11.0", None), "11.0");
    }

    #[test]
    fn test_latex_number_uses_times() {
        let mut arena = ExprArena::new();
        let expr = parse_expr(&mut arena, "2*pi", &SymbolScope::numeric()).unwrap();
        assert_eq!(latex_number(&arena, expr), "2 \\times \\pi");
        let expr = parse_expr(&mut arena, "0.9358e-3", &SymbolScope::numeric()).unwrap();
        assert_eq!(latex_number(&arena, expr), "0.0009358");
    }
}
