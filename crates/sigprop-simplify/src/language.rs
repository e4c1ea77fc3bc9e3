//! The expression language for egg-based simplification.
//!
//! Sums and products are binary here; n-ary arena nodes are folded into
//! chains on the way in. Named constants travel as reserved symbols that
//! cannot collide with user variables.

use egg::{define_language, Id, Symbol};
use sigprop_numeric::Number;

/// Symbol name standing for the circle constant.
pub const PI_SYMBOL: &str = "#pi";

/// Symbol name standing for Euler's number.
pub const E_SYMBOL: &str = "#E";

define_language! {
    /// The symbolic expression language for derivative simplification.
    pub enum PropLang {
        // Numeric literals
        Num(Number),
        // Variables and reserved constants
        Symbol(Symbol),

        // Basic arithmetic
        "+" = Add([Id; 2]),
        "-" = Sub([Id; 2]),
        "*" = Mul([Id; 2]),
        "/" = Div([Id; 2]),
        "neg" = Neg(Id),
        "^" = Pow([Id; 2]),
        "sqrt" = Sqrt(Id),

        // Trigonometric and hyperbolic functions
        "sin" = Sin(Id),
        "cos" = Cos(Id),
        "tan" = Tan(Id),
        "asin" = Asin(Id),
        "acos" = Acos(Id),
        "atan" = Atan(Id),
        "sinh" = Sinh(Id),
        "cosh" = Cosh(Id),
        "tanh" = Tanh(Id),

        // Exponential and logarithmic
        "exp" = Exp(Id),
        "ln" = Ln(Id),

        // Other functions
        "abs" = Abs(Id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egg::RecExpr;

    #[test]
    fn test_parse_expr() {
        let expr: RecExpr<PropLang> = "(+ 1/2 2.5)".parse().unwrap();
        assert_eq!(expr.as_ref().len(), 3);
        assert!(matches!(expr.as_ref()[0], PropLang::Num(_)));
        assert_eq!(expr.to_string(), "(+ 1/2 2.5)");
    }

    #[test]
    fn test_symbols_are_not_numbers() {
        let expr: RecExpr<PropLang> = "(* x_1 #pi)".parse().unwrap();
        assert!(!matches!(expr.as_ref()[0], PropLang::Num(_)));
        assert!(matches!(expr.as_ref()[1], PropLang::Symbol(s) if s.as_str() == PI_SYMBOL));
    }
}
