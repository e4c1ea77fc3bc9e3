//! Trigonometric and hyperbolic simplification rules.

use egg::{rewrite, Rewrite};

use crate::language::PropLang;

/// Returns trigonometric rewrite rules.
#[must_use]
pub fn rules() -> Vec<Rewrite<PropLang, ()>> {
    vec![
        // Pythagorean identities
        rewrite!("pythag"; "(+ (^ (sin ?x) 2) (^ (cos ?x) 2))" => "1"),
        rewrite!("pythag-tan"; "(+ 1 (^ (tan ?x) 2))" => "(^ (cos ?x) -2)"),
        rewrite!("pythag-cos"; "(+ 1 (neg (^ (sin ?x) 2)))" => "(^ (cos ?x) 2)"),
        rewrite!("pythag-sin"; "(+ 1 (neg (^ (cos ?x) 2)))" => "(^ (sin ?x) 2)"),
        rewrite!("pythag-h"; "(+ (^ (cosh ?x) 2) (neg (^ (sinh ?x) 2)))" => "1"),

        // tan = sin/cos
        rewrite!("tan-def"; "(tan ?x)" => "(/ (sin ?x) (cos ?x))"),
        rewrite!("tan-fold"; "(/ (sin ?x) (cos ?x))" => "(tan ?x)"),
        rewrite!("tanh-fold"; "(/ (sinh ?x) (cosh ?x))" => "(tanh ?x)"),

        // Parity
        rewrite!("sin-neg"; "(sin (neg ?x))" => "(neg (sin ?x))"),
        rewrite!("cos-neg"; "(cos (neg ?x))" => "(cos ?x)"),
        rewrite!("tan-neg"; "(tan (neg ?x))" => "(neg (tan ?x))"),

        // Double angle
        rewrite!("sin-double-fold"; "(* 2 (* (sin ?x) (cos ?x)))" => "(sin (* 2 ?x))"),

        // Inverse function compositions
        rewrite!("sin-asin"; "(sin (asin ?x))" => "?x"),
        rewrite!("cos-acos"; "(cos (acos ?x))" => "?x"),
        rewrite!("tan-atan"; "(tan (atan ?x))" => "?x"),
    ]
}
