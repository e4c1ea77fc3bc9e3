//! Numeric evaluation.
//!
//! Evaluation is exact wherever the expression allows it (sums, products,
//! integer powers) and falls back to correctly rounded approximations at
//! the requested precision for constants, roots and transcendental
//! functions.

use hashbrown::HashMap;
use sigprop_numeric::transcendental as tr;
use sigprop_numeric::{Precision, Rational};

use crate::arena::ExprArena;
use crate::error::CoreError;
use crate::expr::{Constant, ExprHandle, ExprNode, Func};
use crate::symbol::SymbolId;

/// Numeric values of symbols.
pub type Bindings = HashMap<SymbolId, Rational>;

/// Evaluates `expr` with `bindings` at `precision` significant digits.
///
/// # Errors
///
/// Returns [`CoreError::UnboundSymbol`] for a symbol without a value and
/// [`CoreError::Numeric`] for division by zero or a function evaluated
/// outside its domain.
pub fn evaluate(
    arena: &ExprArena,
    expr: ExprHandle,
    bindings: &Bindings,
    precision: Precision,
) -> Result<Rational, CoreError> {
    let mut evaluator = Evaluator {
        arena,
        bindings,
        precision,
        memo: HashMap::new(),
    };
    evaluator.eval(expr)
}

struct Evaluator<'a> {
    arena: &'a ExprArena,
    bindings: &'a Bindings,
    precision: Precision,
    memo: HashMap<ExprHandle, Rational>,
}

impl Evaluator<'_> {
    fn eval(&mut self, expr: ExprHandle) -> Result<Rational, CoreError> {
        if let Some(value) = self.memo.get(&expr) {
            return Ok(value.clone());
        }
        let value = self.eval_node(expr)?;
        self.memo.insert(expr, value.clone());
        Ok(value)
    }

    fn eval_node(&mut self, expr: ExprHandle) -> Result<Rational, CoreError> {
        let p = self.precision;
        Ok(match self.arena.get(expr) {
            ExprNode::Number(n) => n.value().clone(),
            ExprNode::Symbol(id) => self
                .bindings
                .get(id)
                .cloned()
                .ok_or_else(|| CoreError::UnboundSymbol(self.arena.symbol_name(*id).to_string()))?,
            ExprNode::Constant(Constant::Pi) => tr::pi(p),
            ExprNode::Constant(Constant::E) => tr::e(p),
            ExprNode::Add(terms) => {
                let mut sum = Rational::from(0);
                for &term in terms {
                    sum = sum + self.eval(term)?;
                }
                sum
            }
            ExprNode::Mul(factors) => {
                let mut product = Rational::from(1);
                for &factor in factors {
                    product = product * self.eval(factor)?;
                }
                product
            }
            &ExprNode::Pow { base, exp } => {
                let b = self.eval(base)?;
                let exact = self
                    .arena
                    .as_number(exp)
                    .filter(|n| !n.is_decimal())
                    .and_then(|n| n.value().to_integer())
                    .and_then(|n| n.to_i64());
                match exact {
                    Some(k) => b.pow(k)?,
                    None => {
                        let e = self.eval(exp)?;
                        tr::powf(&b, &e, p)?
                    }
                }
            }
            &ExprNode::Function { func, arg } => {
                let x = self.eval(arg)?;
                match func {
                    Func::Abs => x.abs(),
                    Func::Acos => tr::acos(&x, p)?,
                    Func::Asin => tr::asin(&x, p)?,
                    Func::Atan => tr::atan(&x, p)?,
                    Func::Cos => tr::cos(&x, p)?,
                    Func::Cosh => tr::cosh(&x, p)?,
                    Func::Exp => tr::exp(&x, p)?,
                    Func::Log => tr::ln(&x, p)?,
                    Func::Sin => tr::sin(&x, p)?,
                    Func::Sinh => tr::sinh(&x, p)?,
                    Func::Tan => tr::tan(&x, p)?,
                    Func::Tanh => tr::tanh(&x, p)?,
                }
            }
        })
    }
}
