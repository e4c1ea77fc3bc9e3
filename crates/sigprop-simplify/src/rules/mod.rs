//! Simplification rules organized by category.
//!
//! Every rule is an identity over the reals wherever both sides are
//! defined. Rewrites that only hold for positive arguments (`ln(xy)`,
//! `sqrt(xy)`, `(x^a)^b`) are deliberately absent: derivative expressions
//! are evaluated at arbitrary measured values.

pub mod arithmetic;
pub mod exp_log;
pub mod trig;

use egg::Rewrite;

use crate::language::PropLang;

/// Collects all simplification rules.
#[must_use]
pub fn all_rules() -> Vec<Rewrite<PropLang, ()>> {
    let mut rules = Vec::new();
    rules.extend(arithmetic::rules());
    rules.extend(trig::rules());
    rules.extend(exp_log::rules());
    rules
}
