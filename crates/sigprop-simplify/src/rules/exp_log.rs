//! Exponential, logarithmic and root simplification rules.

use egg::{rewrite, Rewrite};

use crate::language::PropLang;

/// Returns exponential and logarithmic rewrite rules.
#[must_use]
pub fn rules() -> Vec<Rewrite<PropLang, ()>> {
    vec![
        // exp(0) = 1, ln(1) = 0
        rewrite!("exp-zero"; "(exp 0)" => "1"),
        rewrite!("ln-one"; "(ln 1)" => "0"),

        // Inverses
        rewrite!("exp-ln"; "(exp (ln ?x))" => "?x"),
        rewrite!("ln-exp"; "(ln (exp ?x))" => "?x"),

        // exp(a + b) = exp(a) * exp(b)
        rewrite!("exp-add"; "(exp (+ ?a ?b))" => "(* (exp ?a) (exp ?b))"),
        rewrite!("exp-add-fold"; "(* (exp ?a) (exp ?b))" => "(exp (+ ?a ?b))"),
        rewrite!("exp-neg"; "(exp (neg ?a))" => "(/ 1 (exp ?a))"),

        // Roots
        rewrite!("sq-sqrt"; "(^ (sqrt ?x) 2)" => "?x"),
        rewrite!("sqrt-recip"; "(/ 1 (sqrt ?x))" => "(^ ?x -1/2)"),
        rewrite!("sqrt-div"; "(/ ?x (sqrt ?x))" => "(sqrt ?x)"),
        rewrite!("sqrt-sq"; "(sqrt (^ ?x 2))" => "(abs ?x)"),
    ]
}
