//! Translation between arena expressions and e-graph terms.

use egg::{Id, RecExpr, Symbol};
use sigprop_core::{Constant, ExprArena, ExprHandle, ExprNode, Func};
use sigprop_numeric::{Integer, Number, Rational};

use crate::language::{PropLang, E_SYMBOL, PI_SYMBOL};

/// Builds the e-graph term for `expr`.
#[must_use]
pub fn to_rec_expr(arena: &ExprArena, expr: ExprHandle) -> RecExpr<PropLang> {
    let mut rec = RecExpr::default();
    push(arena, expr, &mut rec);
    rec
}

fn push(arena: &ExprArena, expr: ExprHandle, rec: &mut RecExpr<PropLang>) -> Id {
    match arena.get(expr) {
        ExprNode::Number(n) => rec.add(PropLang::Num(n.clone())),
        ExprNode::Symbol(id) => rec.add(PropLang::Symbol(Symbol::from(arena.symbol_name(*id)))),
        ExprNode::Constant(Constant::Pi) => rec.add(PropLang::Symbol(Symbol::from(PI_SYMBOL))),
        ExprNode::Constant(Constant::E) => rec.add(PropLang::Symbol(Symbol::from(E_SYMBOL))),
        ExprNode::Add(terms) => chain(arena, terms, rec, PropLang::Add),
        ExprNode::Mul(factors) => chain(arena, factors, rec, PropLang::Mul),
        ExprNode::Pow { base, exp } => {
            let b = push(arena, *base, rec);
            if arena.as_number(*exp) == Some(&half()) {
                return rec.add(PropLang::Sqrt(b));
            }
            let e = push(arena, *exp, rec);
            rec.add(PropLang::Pow([b, e]))
        }
        ExprNode::Function { func, arg } => {
            let a = push(arena, *arg, rec);
            rec.add(match func {
                Func::Abs => PropLang::Abs(a),
                Func::Acos => PropLang::Acos(a),
                Func::Asin => PropLang::Asin(a),
                Func::Atan => PropLang::Atan(a),
                Func::Cos => PropLang::Cos(a),
                Func::Cosh => PropLang::Cosh(a),
                Func::Exp => PropLang::Exp(a),
                Func::Log => PropLang::Ln(a),
                Func::Sin => PropLang::Sin(a),
                Func::Sinh => PropLang::Sinh(a),
                Func::Tan => PropLang::Tan(a),
                Func::Tanh => PropLang::Tanh(a),
            })
        }
    }
}

/// Folds an n-ary node into a left-leaning binary chain.
fn chain(
    arena: &ExprArena,
    operands: &[ExprHandle],
    rec: &mut RecExpr<PropLang>,
    node: fn([Id; 2]) -> PropLang,
) -> Id {
    let mut acc = push(arena, operands[0], rec);
    for &operand in &operands[1..] {
        let next = push(arena, operand, rec);
        acc = rec.add(node([acc, next]));
    }
    acc
}

fn half() -> Number {
    Number::exact(Rational::scaled(Integer::new(5), 1))
}

/// Rebuilds an extracted term in `arena`, canonicalising as it goes.
pub fn from_rec_expr(arena: &mut ExprArena, rec: &RecExpr<PropLang>) -> ExprHandle {
    let mut built: Vec<ExprHandle> = Vec::with_capacity(rec.as_ref().len());
    for node in rec.as_ref() {
        let at = |id: Id| built[usize::from(id)];
        let handle = match node {
            PropLang::Num(n) => arena.number(n.clone()),
            PropLang::Symbol(s) => match s.as_str() {
                PI_SYMBOL => arena.constant(Constant::Pi),
                E_SYMBOL => arena.constant(Constant::E),
                name => arena.symbol(name),
            },
            PropLang::Add([a, b]) => arena.add([at(*a), at(*b)]),
            PropLang::Sub([a, b]) => arena.sub(at(*a), at(*b)),
            PropLang::Mul([a, b]) => arena.mul([at(*a), at(*b)]),
            PropLang::Div([a, b]) => arena.div(at(*a), at(*b)),
            PropLang::Neg(a) => arena.neg(at(*a)),
            PropLang::Pow([a, b]) => arena.pow(at(*a), at(*b)),
            PropLang::Sqrt(a) => arena.sqrt(at(*a)),
            PropLang::Sin(a) => arena.func(Func::Sin, at(*a)),
            PropLang::Cos(a) => arena.func(Func::Cos, at(*a)),
            PropLang::Tan(a) => arena.func(Func::Tan, at(*a)),
            PropLang::Asin(a) => arena.func(Func::Asin, at(*a)),
            PropLang::Acos(a) => arena.func(Func::Acos, at(*a)),
            PropLang::Atan(a) => arena.func(Func::Atan, at(*a)),
            PropLang::Sinh(a) => arena.func(Func::Sinh, at(*a)),
            PropLang::Cosh(a) => arena.func(Func::Cosh, at(*a)),
            PropLang::Tanh(a) => arena.func(Func::Tanh, at(*a)),
            PropLang::Exp(a) => arena.func(Func::Exp, at(*a)),
            PropLang::Ln(a) => arena.func(Func::Log, at(*a)),
            PropLang::Abs(a) => arena.func(Func::Abs, at(*a)),
        };
        built.push(handle);
    }
    // the root of a RecExpr is its last node
    built[built.len() - 1]
}
