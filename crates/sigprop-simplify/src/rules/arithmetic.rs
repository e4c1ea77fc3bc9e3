//! Basic algebraic simplification rules.

use egg::{rewrite, Rewrite};

use crate::language::PropLang;

/// Returns basic arithmetic rewrite rules.
#[must_use]
pub fn rules() -> Vec<Rewrite<PropLang, ()>> {
    vec![
        // Additive identity
        rewrite!("add-zero"; "(+ ?a 0)" => "?a"),

        // Multiplicative identity and zero
        rewrite!("mul-one"; "(* ?a 1)" => "?a"),
        rewrite!("mul-zero"; "(* ?a 0)" => "0"),

        // Negation
        rewrite!("neg-neg"; "(neg (neg ?a))" => "?a"),
        rewrite!("neg-as-mul"; "(neg ?a)" => "(* -1 ?a)"),
        rewrite!("mul-as-neg"; "(* -1 ?a)" => "(neg ?a)"),
        rewrite!("sub-to-add"; "(- ?a ?b)" => "(+ ?a (neg ?b))"),
        rewrite!("add-to-sub"; "(+ ?a (neg ?b))" => "(- ?a ?b)"),

        // Commutativity
        rewrite!("add-comm"; "(+ ?a ?b)" => "(+ ?b ?a)"),
        rewrite!("mul-comm"; "(* ?a ?b)" => "(* ?b ?a)"),

        // Associativity
        rewrite!("add-assoc-l"; "(+ (+ ?a ?b) ?c)" => "(+ ?a (+ ?b ?c))"),
        rewrite!("add-assoc-r"; "(+ ?a (+ ?b ?c))" => "(+ (+ ?a ?b) ?c)"),
        rewrite!("mul-assoc-l"; "(* (* ?a ?b) ?c)" => "(* ?a (* ?b ?c))"),
        rewrite!("mul-assoc-r"; "(* ?a (* ?b ?c))" => "(* (* ?a ?b) ?c)"),

        // Distributivity and its reverse
        rewrite!("dist"; "(* ?a (+ ?b ?c))" => "(+ (* ?a ?b) (* ?a ?c))"),
        rewrite!("factor"; "(+ (* ?a ?b) (* ?a ?c))" => "(* ?a (+ ?b ?c))"),

        // Powers
        rewrite!("pow-one"; "(^ ?a 1)" => "?a"),
        rewrite!("pow-neg-one"; "(^ ?a -1)" => "(/ 1 ?a)"),
        rewrite!("recip"; "(/ 1 ?a)" => "(^ ?a -1)"),
        rewrite!("div-as-mul"; "(/ ?a ?b)" => "(* ?a (/ 1 ?b))"),
        rewrite!("mul-as-div"; "(* ?a (/ 1 ?b))" => "(/ ?a ?b)"),
        rewrite!("mul-same"; "(* ?a ?a)" => "(^ ?a 2)"),
        rewrite!("add-same"; "(+ ?a ?a)" => "(* 2 ?a)"),

        // Quotients
        rewrite!("div-one"; "(/ ?a 1)" => "?a"),
        rewrite!("div-neg"; "(/ (neg ?a) ?b)" => "(neg (/ ?a ?b))"),
        rewrite!("div-add"; "(+ (/ ?a ?c) (/ ?b ?c))" => "(/ (+ ?a ?b) ?c)"),
        rewrite!("neg-mul"; "(* (neg ?a) ?b)" => "(neg (* ?a ?b))"),
    ]
}
