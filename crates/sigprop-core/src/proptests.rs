//! Property-based tests for canonical construction.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use sigprop_numeric::{Precision, Rational};

    use crate::{diff, evaluate, parse_expr, Bindings, ExprArena, ExprHandle, LatexPrinter, SymbolScope};

    const NAMES: [&str; 4] = ["a", "b", "x", "y"];

    // Strategy for a term: a small coefficient times one of the symbols
    fn term() -> impl Strategy<Value = (i64, usize)> {
        (-9i64..10, 0usize..NAMES.len())
    }

    fn build(arena: &mut ExprArena, terms: &[(i64, usize)]) -> Vec<ExprHandle> {
        terms
            .iter()
            .map(|&(c, s)| {
                let coeff = arena.integer(c);
                let symbol = arena.symbol(NAMES[s]);
                arena.mul([coeff, symbol])
            })
            .collect()
    }

    proptest! {
        #[test]
        fn sums_ignore_operand_order(terms in prop::collection::vec(term(), 1..6)) {
            let mut arena = ExprArena::new();
            let handles = build(&mut arena, &terms);
            let forward = arena.add(handles.clone());
            let backward = arena.add(handles.into_iter().rev());
            prop_assert_eq!(forward, backward);
        }

        #[test]
        fn products_ignore_grouping(exps in prop::collection::vec(0usize..NAMES.len(), 1..6)) {
            let mut arena = ExprArena::new();
            let symbols: Vec<ExprHandle> = exps.iter().map(|&s| arena.symbol(NAMES[s])).collect();
            let flat = arena.mul(symbols.clone());
            let mut nested = arena.integer(1);
            for symbol in symbols.into_iter().rev() {
                nested = arena.mul([symbol, nested]);
            }
            prop_assert_eq!(flat, nested);
        }

        #[test]
        fn printing_is_order_independent(terms in prop::collection::vec(term(), 1..6)) {
            let mut arena = ExprArena::new();
            let handles = build(&mut arena, &terms);
            let forward = arena.add(handles.clone());
            let printed = LatexPrinter::new(&arena).print(forward);

            let mut other = ExprArena::new();
            let mut reversed = terms.clone();
            reversed.reverse();
            let handles = build(&mut other, &reversed);
            let backward = other.add(handles);
            prop_assert_eq!(printed, LatexPrinter::new(&other).print(backward));
        }

        #[test]
        fn power_rule_holds(n in 1i64..8, x in -20i64..20) {
            let mut arena = ExprArena::new();
            let source = format!("x**{n}");
            let expr = parse_expr(&mut arena, &source, &SymbolScope::symbolic()).unwrap();
            let symbol = arena.symbol_id("x");
            let derived = diff(&mut arena, expr, symbol);

            let mut bindings = Bindings::new();
            bindings.insert(symbol, Rational::from(x));
            let value = evaluate(&arena, derived, &bindings, Precision::new(20)).unwrap();
            let expected = Rational::from(n) * Rational::from(x).pow(n - 1).unwrap();
            prop_assert_eq!(value, expected);
        }

        #[test]
        fn evaluation_matches_rational_arithmetic(a in -50i64..50, b in 1i64..50, c in -50i64..50) {
            let mut arena = ExprArena::new();
            let expr = parse_expr(&mut arena, "(a + c)/b - a*c", &SymbolScope::symbolic()).unwrap();
            let mut bindings = Bindings::new();
            for (name, value) in [("a", a), ("b", b), ("c", c)] {
                bindings.insert(arena.symbol_id(name), Rational::from(value));
            }
            let value = evaluate(&arena, expr, &bindings, Precision::new(20)).unwrap();
            let expected = Rational::from_i64(a + c, b).unwrap() - Rational::from(a * c);
            prop_assert_eq!(value, expected);
        }
    }
}
