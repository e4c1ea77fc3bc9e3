//! Symbolic differentiation.

use hashbrown::HashMap;

use crate::arena::ExprArena;
use crate::expr::{ExprHandle, ExprNode, Func};
use crate::symbol::SymbolId;

/// Differentiates `expr` with respect to `symbol`.
///
/// The result is built through the canonical constructors, so constant
/// factors and vanishing terms are already folded away.
pub fn diff(arena: &mut ExprArena, expr: ExprHandle, symbol: SymbolId) -> ExprHandle {
    let before = arena.len();
    let derived = Differentiator {
        symbol,
        memo: HashMap::new(),
    }
    .run(arena, expr);
    log::trace!(
        "d/d{}: {} new nodes",
        arena.symbol_name(symbol),
        arena.len() - before
    );
    derived
}

struct Differentiator {
    symbol: SymbolId,
    memo: HashMap<ExprHandle, ExprHandle>,
}

impl Differentiator {
    fn run(&mut self, arena: &mut ExprArena, expr: ExprHandle) -> ExprHandle {
        if let Some(&done) = self.memo.get(&expr) {
            return done;
        }
        let result = if arena.contains_symbol(expr, self.symbol) {
            self.derive(arena, expr)
        } else {
            arena.integer(0)
        };
        self.memo.insert(expr, result);
        result
    }

    fn derive(&mut self, arena: &mut ExprArena, expr: ExprHandle) -> ExprHandle {
        match arena.get(expr).clone() {
            ExprNode::Symbol(_) => arena.integer(1),
            ExprNode::Number(_) | ExprNode::Constant(_) => arena.integer(0),
            ExprNode::Add(terms) => {
                let parts: Vec<ExprHandle> = terms.iter().map(|&t| self.run(arena, t)).collect();
                arena.add(parts)
            }
            ExprNode::Mul(factors) => {
                // product rule: sum over factors of f_i' * prod_{j != i} f_j
                let mut parts = Vec::with_capacity(factors.len());
                for (i, &factor) in factors.iter().enumerate() {
                    let d = self.run(arena, factor);
                    if arena.is_zero(d) {
                        continue;
                    }
                    let mut product: Vec<ExprHandle> = factors.to_vec();
                    product[i] = d;
                    parts.push(arena.mul(product));
                }
                arena.add(parts)
            }
            ExprNode::Pow { base, exp } => {
                let db = self.run(arena, base);
                if arena.contains_symbol(exp, self.symbol) {
                    // d(b^e) = b^e * (e' ln b + e b' / b)
                    let de = self.run(arena, exp);
                    let log_base = arena.func(Func::Log, base);
                    let first = arena.mul([de, log_base]);
                    let ratio = arena.div(db, base);
                    let second = arena.mul([exp, ratio]);
                    let inner = arena.add([first, second]);
                    arena.mul([expr, inner])
                } else {
                    // d(b^e) = e b^(e-1) b'
                    let minus_one = arena.integer(-1);
                    let lowered = arena.add([exp, minus_one]);
                    let power = arena.pow(base, lowered);
                    arena.mul([exp, power, db])
                }
            }
            ExprNode::Function { func, arg } => {
                let inner = self.run(arena, arg);
                let outer = outer_derivative(arena, func, arg);
                arena.mul([outer, inner])
            }
        }
    }
}

/// `f'(u)` for each elementary function.
fn outer_derivative(arena: &mut ExprArena, func: Func, u: ExprHandle) -> ExprHandle {
    let one = arena.integer(1);
    let two = arena.integer(2);
    let minus_one = arena.integer(-1);
    match func {
        Func::Sin => arena.func(Func::Cos, u),
        Func::Cos => {
            let sin = arena.func(Func::Sin, u);
            arena.neg(sin)
        }
        Func::Tan => {
            let tan = arena.func(Func::Tan, u);
            let square = arena.pow(tan, two);
            arena.add([one, square])
        }
        Func::Asin | Func::Acos => {
            let square = arena.pow(u, two);
            let rest = arena.sub(one, square);
            let root = arena.sqrt(rest);
            let recip = arena.pow(root, minus_one);
            if func == Func::Asin {
                recip
            } else {
                arena.neg(recip)
            }
        }
        Func::Atan => {
            let square = arena.pow(u, two);
            let rest = arena.add([one, square]);
            arena.pow(rest, minus_one)
        }
        Func::Sinh => arena.func(Func::Cosh, u),
        Func::Cosh => arena.func(Func::Sinh, u),
        Func::Tanh => {
            let tanh = arena.func(Func::Tanh, u);
            let square = arena.pow(tanh, two);
            arena.sub(one, square)
        }
        Func::Exp => arena.func(Func::Exp, u),
        Func::Log => arena.pow(u, minus_one),
        Func::Abs => {
            let abs = arena.func(Func::Abs, u);
            arena.div(u, abs)
        }
    }
}
