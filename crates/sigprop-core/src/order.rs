//! Canonical ordering of sum terms and product factors.
//!
//! The order is what makes output reproducible: `b + m x` prints the same
//! way no matter how the formula was written. Factors are grouped as
//! numbers, constants, symbols and powers of symbols (by name), sums, then
//! functions. Terms put numbers last and otherwise compare their
//! non-constant factors pairwise, higher powers first.

use smallvec::SmallVec;
use sigprop_numeric::{Number, Rational};
use std::cmp::Ordering;

use crate::arena::ExprArena;
use crate::expr::{ExprHandle, ExprNode};

/// Total structural order on expressions of one arena.
#[must_use]
pub fn structural(arena: &ExprArena, a: ExprHandle, b: ExprHandle) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }
    let (na, nb) = (arena.get(a), arena.get(b));
    na.variant_rank()
        .cmp(&nb.variant_rank())
        .then_with(|| match (na, nb) {
            (ExprNode::Number(x), ExprNode::Number(y)) => x.cmp(y),
            (ExprNode::Symbol(x), ExprNode::Symbol(y)) => {
                arena.symbol_name(*x).cmp(arena.symbol_name(*y))
            }
            (ExprNode::Constant(x), ExprNode::Constant(y)) => x.cmp(y),
            (ExprNode::Add(x), ExprNode::Add(y)) | (ExprNode::Mul(x), ExprNode::Mul(y)) => {
                lexicographic(x, y, |p, q| structural(arena, p, q))
            }
            (ExprNode::Pow { base: b1, exp: e1 }, ExprNode::Pow { base: b2, exp: e2 }) => {
                structural(arena, *b1, *b2).then_with(|| structural(arena, *e1, *e2))
            }
            (
                ExprNode::Function { func: f1, arg: a1 },
                ExprNode::Function { func: f2, arg: a2 },
            ) => f1.cmp(f2).then_with(|| structural(arena, *a1, *a2)),
            _ => Ordering::Equal,
        })
}

fn lexicographic(
    x: &[ExprHandle],
    y: &[ExprHandle],
    mut cmp: impl FnMut(ExprHandle, ExprHandle) -> Ordering,
) -> Ordering {
    for (&p, &q) in x.iter().zip(y) {
        let ord = cmp(p, q);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    x.len().cmp(&y.len())
}

/// Splits `x^e` into `(x, Some(e))` and anything else into `(x, None)`.
fn base_exp(arena: &ExprArena, h: ExprHandle) -> (ExprHandle, Option<ExprHandle>) {
    match arena.get(h) {
        ExprNode::Pow { base, exp } => (*base, Some(*exp)),
        _ => (h, None),
    }
}

fn factor_class(arena: &ExprArena, h: ExprHandle) -> u8 {
    let (base, _) = base_exp(arena, h);
    match arena.get(base) {
        ExprNode::Number(_) => 0,
        ExprNode::Constant(_) => 1,
        ExprNode::Symbol(_) | ExprNode::Mul(_) | ExprNode::Pow { .. } => 2,
        ExprNode::Add(_) => 3,
        ExprNode::Function { .. } => 4,
    }
}

/// Order of the factors of a product.
#[must_use]
pub fn compare_factors(arena: &ExprArena, a: ExprHandle, b: ExprHandle) -> Ordering {
    let (ba, ea) = base_exp(arena, a);
    let (bb, eb) = base_exp(arena, b);
    factor_class(arena, a)
        .cmp(&factor_class(arena, b))
        .then_with(|| structural(arena, ba, bb))
        .then_with(|| match (ea, eb) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(x), Some(y)) => structural(arena, x, y),
        })
}

/// Class of a factor inside a term; constants sort behind everything.
fn term_factor_class(arena: &ExprArena, h: ExprHandle) -> u8 {
    let (base, _) = base_exp(arena, h);
    match arena.get(base) {
        ExprNode::Symbol(_) | ExprNode::Mul(_) | ExprNode::Pow { .. } => 0,
        ExprNode::Add(_) => 1,
        ExprNode::Function { .. } => 2,
        ExprNode::Constant(_) | ExprNode::Number(_) => 3,
    }
}

/// Numeric exponent of a factor, one for a bare base.
fn numeric_exponent(arena: &ExprArena, h: ExprHandle) -> Option<Rational> {
    match base_exp(arena, h) {
        (_, None) => Some(Rational::from(1)),
        (_, Some(exp)) => arena.get(exp).as_number().map(|n| n.value().clone()),
    }
}

fn compare_term_factors(arena: &ExprArena, a: ExprHandle, b: ExprHandle) -> Ordering {
    let (ba, _) = base_exp(arena, a);
    let (bb, _) = base_exp(arena, b);
    term_factor_class(arena, a)
        .cmp(&term_factor_class(arena, b))
        .then_with(|| structural(arena, ba, bb))
        .then_with(
            || match (numeric_exponent(arena, a), numeric_exponent(arena, b)) {
                // higher powers first
                (Some(x), Some(y)) => y.cmp(&x),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => structural(arena, a, b),
            },
        )
}

/// Coefficient and factors of a term, constants moved behind the rest.
fn monomial(arena: &ExprArena, h: ExprHandle) -> (Option<&Number>, SmallVec<[ExprHandle; 4]>) {
    match arena.get(h) {
        ExprNode::Mul(factors) => {
            let (coeff, rest) = match arena.get(factors[0]).as_number() {
                Some(n) => (Some(n), &factors[1..]),
                None => (None, &factors[..]),
            };
            let mut rest: SmallVec<[ExprHandle; 4]> = rest.iter().copied().collect();
            rest.sort_by_key(|&f| term_factor_class(arena, f) == 3);
            (coeff, rest)
        }
        _ => (None, smallvec::smallvec![h]),
    }
}

/// Order of the terms of a sum.
#[must_use]
pub fn compare_terms(arena: &ExprArena, a: ExprHandle, b: ExprHandle) -> Ordering {
    match (arena.get(a).as_number(), arena.get(b).as_number()) {
        (Some(x), Some(y)) => return x.cmp(y),
        (Some(_), None) => return Ordering::Greater,
        (None, Some(_)) => return Ordering::Less,
        (None, None) => {}
    }

    let (ca, fa) = monomial(arena, a);
    let (cb, fb) = monomial(arena, b);
    for (&x, &y) in fa.iter().zip(&fb) {
        let ord = compare_term_factors(arena, x, y);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    // on a shared prefix the longer monomial comes first
    fb.len()
        .cmp(&fa.len())
        .then_with(|| ca.cmp(&cb))
        .then_with(|| structural(arena, a, b))
}
