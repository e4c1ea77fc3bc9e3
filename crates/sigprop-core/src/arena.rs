//! Arena allocator for expression storage.
//!
//! All expressions are stored contiguously in a `Vec`, with hash-consing
//! ensuring each unique expression is stored exactly once. The public
//! constructors canonicalise as they build: numbers fold, like terms and
//! like bases combine, operands are ordered, and a handful of exact
//! identities (`exp(log u) = u`, `cos(pi) = -1`, ...) apply immediately.

use hashbrown::{HashMap, HashSet};
use smallvec::{smallvec, SmallVec};
use sigprop_numeric::{Integer, Number, Rational};

use crate::expr::{Constant, ExprHandle, ExprNode, Func};
use crate::order;
use crate::symbol::{SymbolId, SymbolTable};

/// Largest integer exponent folded into a number literal.
const MAX_FOLDED_EXPONENT: u64 = 10_000;

/// The main arena for storing expressions.
#[derive(Debug, Clone, Default)]
pub struct ExprArena {
    /// Storage for all expression nodes.
    nodes: Vec<ExprNode>,
    /// Interning table: maps node content to its handle.
    intern_map: HashMap<ExprNode, ExprHandle>,
    /// Symbol names and ids.
    symbols: SymbolTable,
}

impl ExprArena {
    /// Creates a new empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an arena with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            intern_map: HashMap::with_capacity(capacity),
            symbols: SymbolTable::new(),
        }
    }

    /// Interns an expression node, returning its handle.
    ///
    /// Callers are responsible for passing a canonical node.
    pub(crate) fn intern(&mut self, node: ExprNode) -> ExprHandle {
        if let Some(&handle) = self.intern_map.get(&node) {
            return handle;
        }

        let index = self.nodes.len();
        assert!(index < u32::MAX as usize, "Arena capacity exceeded");

        #[allow(clippy::cast_possible_truncation)]
        let handle = ExprHandle::new(index as u32);
        self.nodes.push(node.clone());
        self.intern_map.insert(node, handle);
        handle
    }

    /// Gets the node at the given handle.
    ///
    /// # Panics
    ///
    /// Panics if the handle is invalid.
    #[must_use]
    pub fn get(&self, handle: ExprHandle) -> &ExprNode {
        &self.nodes[handle.index() as usize]
    }

    /// Returns the number if `handle` is a numeric literal.
    #[must_use]
    pub fn as_number(&self, handle: ExprHandle) -> Option<&Number> {
        self.get(handle).as_number()
    }

    /// Returns true if `handle` is a zero literal of either kind.
    #[must_use]
    pub fn is_zero(&self, handle: ExprHandle) -> bool {
        self.as_number(handle).is_some_and(Number::is_zero)
    }

    /// Returns the number of nodes in the arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the arena is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // === Symbols ===

    /// Interns a symbol name, returning its id.
    pub fn symbol_id(&mut self, name: &str) -> SymbolId {
        self.symbols.intern(name)
    }

    /// Gets the name of a symbol.
    #[must_use]
    pub fn symbol_name(&self, id: SymbolId) -> &str {
        self.symbols.name(id)
    }

    // === Atoms ===

    /// Creates a symbol expression.
    pub fn symbol(&mut self, name: &str) -> ExprHandle {
        let id = self.symbols.intern(name);
        self.intern(ExprNode::Symbol(id))
    }

    /// Creates a number expression.
    pub fn number(&mut self, value: Number) -> ExprHandle {
        self.intern(ExprNode::Number(value))
    }

    /// Creates an exact integer expression.
    pub fn integer(&mut self, value: i64) -> ExprHandle {
        self.number(Number::integer(value))
    }

    /// Creates a named constant.
    pub fn constant(&mut self, constant: Constant) -> ExprHandle {
        self.intern(ExprNode::Constant(constant))
    }

    // === Canonical constructors ===

    /// Creates a sum.
    ///
    /// Nested sums are flattened, numbers folded into one trailing literal
    /// and terms that differ only in their coefficient combined.
    pub fn add(&mut self, terms: impl IntoIterator<Item = ExprHandle>) -> ExprHandle {
        let mut flat: Vec<ExprHandle> = Vec::new();
        for term in terms {
            match self.get(term) {
                ExprNode::Add(inner) => flat.extend(inner.iter().copied()),
                _ => flat.push(term),
            }
        }

        let mut constant: Option<Number> = None;
        let mut monomials: Vec<(ExprHandle, Number)> = Vec::new();
        let mut index: HashMap<ExprHandle, usize> = HashMap::new();
        for term in flat {
            if let ExprNode::Number(n) = self.get(term) {
                constant = Some(match constant {
                    Some(c) => &c + n,
                    None => n.clone(),
                });
                continue;
            }
            let (coeff, mono) = self.split_coefficient(term);
            if let Some(&i) = index.get(&mono) {
                monomials[i].1 = &monomials[i].1 + &coeff;
            } else {
                index.insert(mono, monomials.len());
                monomials.push((mono, coeff));
            }
        }

        let mut result: Vec<ExprHandle> = Vec::with_capacity(monomials.len() + 1);
        for (mono, coeff) in monomials {
            if coeff.is_zero() {
                continue;
            }
            if coeff.is_one() {
                result.push(mono);
            } else {
                let coeff = self.number(coeff);
                result.push(self.mul([coeff, mono]));
            }
        }
        if let Some(c) = constant {
            if !c.is_zero() || result.is_empty() {
                result.push(self.number(c));
            }
        }

        match result.len() {
            0 => self.integer(0),
            1 => result[0],
            _ => {
                result.sort_by(|&a, &b| order::compare_terms(self, a, b));
                self.intern(ExprNode::Add(result.into_iter().collect()))
            }
        }
    }

    /// Splits `c * m` into its numeric coefficient and the rest.
    fn split_coefficient(&mut self, term: ExprHandle) -> (Number, ExprHandle) {
        if let ExprNode::Mul(factors) = self.get(term) {
            if let Some(n) = self.as_number(factors[0]) {
                let n = n.clone();
                let rest: SmallVec<[ExprHandle; 4]> = factors[1..].iter().copied().collect();
                let mono = if rest.len() == 1 {
                    rest[0]
                } else {
                    self.intern(ExprNode::Mul(rest))
                };
                return (n, mono);
            }
        }
        (Number::integer(1), term)
    }

    /// Creates a product.
    ///
    /// Nested products are flattened, numbers folded into one leading
    /// coefficient and powers of a common base merged by adding exponents.
    /// A coefficient times a single sum is distributed.
    pub fn mul(&mut self, factors: impl IntoIterator<Item = ExprHandle>) -> ExprHandle {
        let one = self.integer(1);
        let mut flat: Vec<ExprHandle> = Vec::new();
        for factor in factors {
            match self.get(factor) {
                ExprNode::Mul(inner) => flat.extend(inner.iter().copied()),
                _ => flat.push(factor),
            }
        }

        let mut coeff = Number::integer(1);
        let mut bases: Vec<(ExprHandle, SmallVec<[ExprHandle; 2]>)> = Vec::new();
        let mut index: HashMap<ExprHandle, usize> = HashMap::new();
        for factor in flat {
            let (base, exp) = match self.get(factor) {
                ExprNode::Number(n) => {
                    coeff = &coeff * n;
                    continue;
                }
                ExprNode::Pow { base, exp } => (*base, *exp),
                _ => (factor, one),
            };
            if let Some(&i) = index.get(&base) {
                bases[i].1.push(exp);
            } else {
                index.insert(base, bases.len());
                bases.push((base, smallvec![exp]));
            }
        }
        if coeff.is_zero() {
            return self.integer(0);
        }

        let mut rebuilt: Vec<ExprHandle> = Vec::with_capacity(bases.len() + 1);
        let mut nested = false;
        for (base, exps) in bases {
            let exp = if exps.len() == 1 {
                exps[0]
            } else {
                self.add(exps)
            };
            let factor = self.pow(base, exp);
            match self.get(factor) {
                ExprNode::Number(n) => coeff = &coeff * n,
                ExprNode::Mul(_) => {
                    nested = true;
                    rebuilt.push(factor);
                }
                _ => rebuilt.push(factor),
            }
        }
        if nested {
            rebuilt.push(self.number(coeff));
            return self.mul(rebuilt);
        }
        if coeff.is_zero() {
            return self.integer(0);
        }
        if rebuilt.is_empty() {
            return self.number(coeff);
        }
        if coeff.is_one() && rebuilt.len() == 1 {
            return rebuilt[0];
        }
        if rebuilt.len() == 1 {
            if let ExprNode::Add(terms) = self.get(rebuilt[0]) {
                let terms = terms.to_vec();
                let coeff = self.number(coeff);
                let scaled: Vec<ExprHandle> = terms.into_iter().map(|t| self.mul([coeff, t])).collect();
                return self.add(scaled);
            }
        }

        rebuilt.sort_by(|&a, &b| order::compare_factors(self, a, b));
        if !coeff.is_one() {
            rebuilt.insert(0, self.number(coeff));
        }
        self.intern(ExprNode::Mul(rebuilt.into_iter().collect()))
    }

    /// Creates a power.
    pub fn pow(&mut self, base: ExprHandle, exp: ExprHandle) -> ExprHandle {
        let exp_number = self.as_number(exp).cloned();
        if let Some(e) = &exp_number {
            if e.is_zero() {
                return self.integer(1);
            }
            if e.is_one() {
                return base;
            }
        }

        let base_node = self.get(base).clone();
        match (&base_node, &exp_number) {
            (ExprNode::Number(b), _) if b.is_one() => return base,
            (ExprNode::Number(b), Some(e)) => {
                if let Some(value) = fold_power(b, e) {
                    return self.number(value);
                }
            }
            (ExprNode::Pow { base: inner, exp: inner_exp }, Some(e)) if is_exact_integer(e) => {
                let product = self.mul([*inner_exp, exp]);
                return self.pow(*inner, product);
            }
            (ExprNode::Mul(factors), Some(e)) if is_exact_integer(e) => {
                let powered: Vec<ExprHandle> = factors.iter().map(|&f| self.pow(f, exp)).collect();
                return self.mul(powered);
            }
            (ExprNode::Function { func: Func::Exp, arg }, Some(_)) => {
                let scaled = self.mul([exp, *arg]);
                return self.func(Func::Exp, scaled);
            }
            (ExprNode::Constant(Constant::E), _) => return self.func(Func::Exp, exp),
            _ => {}
        }
        self.intern(ExprNode::Pow { base, exp })
    }

    /// Applies a function.
    ///
    /// Exact special values are evaluated and a leading minus sign is
    /// pulled out of odd functions and dropped inside even ones.
    pub fn func(&mut self, func: Func, arg: ExprHandle) -> ExprHandle {
        if let Some(value) = self.special_value(func, arg) {
            return value;
        }
        if (func.is_odd() || func.is_even()) && self.is_negative_term(arg) {
            let positive = self.neg(arg);
            let inner = self.func(func, positive);
            return if func.is_odd() { self.neg(inner) } else { inner };
        }
        self.intern(ExprNode::Function { func, arg })
    }

    fn special_value(&mut self, func: Func, arg: ExprHandle) -> Option<ExprHandle> {
        let node = self.get(arg).clone();
        let value = match (func, &node) {
            (Func::Exp, ExprNode::Function { func: Func::Log, arg: inner })
            | (Func::Log, ExprNode::Function { func: Func::Exp, arg: inner }) => return Some(*inner),
            (Func::Abs, ExprNode::Function { func: Func::Abs, .. }) => return Some(arg),
            (Func::Abs, ExprNode::Number(n)) => return Some(self.number(n.abs())),
            (Func::Exp, ExprNode::Number(n)) if n.is_one() => return Some(self.constant(Constant::E)),
            (Func::Log, ExprNode::Constant(Constant::E)) => 1,
            (_, ExprNode::Number(n)) if n.is_zero() && !n.is_decimal() => match func {
                Func::Sin | Func::Tan | Func::Asin | Func::Atan | Func::Sinh | Func::Tanh => 0,
                Func::Cos | Func::Cosh | Func::Exp => 1,
                Func::Abs | Func::Acos | Func::Log => return None,
            },
            (Func::Log | Func::Acos, ExprNode::Number(n)) if n.is_one() => 0,
            (Func::Sin | Func::Tan, _) => {
                self.pi_multiple(arg)?;
                0
            }
            (Func::Cos, _) => {
                if self.pi_multiple(arg)?.is_odd() {
                    -1
                } else {
                    1
                }
            }
            _ => return None,
        };
        Some(self.integer(value))
    }

    /// Returns `k` if `handle` is `k * pi` for an integer `k`.
    fn pi_multiple(&self, handle: ExprHandle) -> Option<Integer> {
        match self.get(handle) {
            ExprNode::Constant(Constant::Pi) => Some(Integer::new(1)),
            ExprNode::Mul(factors) if factors.len() == 2 => {
                let k = self.as_number(factors[0]).filter(|n| !n.is_decimal())?;
                matches!(self.get(factors[1]), ExprNode::Constant(Constant::Pi))
                    .then(|| k.value().to_integer())
                    .flatten()
            }
            _ => None,
        }
    }

    /// Returns true for a negative number or a product with a negative
    /// coefficient.
    #[must_use]
    pub fn is_negative_term(&self, handle: ExprHandle) -> bool {
        match self.get(handle) {
            ExprNode::Number(n) => n.is_negative(),
            ExprNode::Mul(factors) => self.as_number(factors[0]).is_some_and(Number::is_negative),
            _ => false,
        }
    }

    // === Derived constructors ===

    /// Creates `-x`.
    pub fn neg(&mut self, arg: ExprHandle) -> ExprHandle {
        let minus_one = self.integer(-1);
        self.mul([minus_one, arg])
    }

    /// Creates `a - b`.
    pub fn sub(&mut self, a: ExprHandle, b: ExprHandle) -> ExprHandle {
        let negated = self.neg(b);
        self.add([a, negated])
    }

    /// Creates `a / b`.
    pub fn div(&mut self, a: ExprHandle, b: ExprHandle) -> ExprHandle {
        let minus_one = self.integer(-1);
        let recip = self.pow(b, minus_one);
        self.mul([a, recip])
    }

    /// Creates `sqrt(x)`, stored as `x^(1/2)`.
    pub fn sqrt(&mut self, arg: ExprHandle) -> ExprHandle {
        let half = self.number(Number::exact(Rational::scaled(Integer::new(5), 1)));
        self.pow(arg, half)
    }

    // === Queries ===

    /// Returns true if `symbol` occurs in `handle`.
    #[must_use]
    pub fn contains_symbol(&self, handle: ExprHandle, symbol: SymbolId) -> bool {
        match self.get(handle) {
            ExprNode::Symbol(id) => *id == symbol,
            node => node
                .children()
                .iter()
                .any(|&child| self.contains_symbol(child, symbol)),
        }
    }

    /// The symbols occurring in `handle`, sorted by name.
    #[must_use]
    pub fn free_symbols(&self, handle: ExprHandle) -> Vec<SymbolId> {
        let mut seen: HashSet<ExprHandle> = HashSet::new();
        let mut found: Vec<SymbolId> = Vec::new();
        let mut stack = vec![handle];
        while let Some(h) = stack.pop() {
            if !seen.insert(h) {
                continue;
            }
            match self.get(h) {
                ExprNode::Symbol(id) => found.push(*id),
                node => stack.extend(node.children()),
            }
        }
        found.sort_by(|&a, &b| self.symbol_name(a).cmp(self.symbol_name(b)));
        found.dedup();
        found
    }

    /// Number of nodes in the expression tree, shared subtrees counted
    /// once per occurrence.
    #[must_use]
    pub fn tree_size(&self, handle: ExprHandle) -> usize {
        1 + self
            .get(handle)
            .children()
            .iter()
            .map(|&child| self.tree_size(child))
            .sum::<usize>()
    }
}

fn is_exact_integer(n: &Number) -> bool {
    !n.is_decimal() && n.value().is_integer()
}

/// Folds `base^exp` into a literal when the result is rational.
fn fold_power(base: &Number, exp: &Number) -> Option<Number> {
    if base.is_zero() && exp.is_negative() {
        return None;
    }
    let decimal = base.is_decimal() || exp.is_decimal();
    let tag = |value: Rational| {
        if decimal {
            Number::decimal(value)
        } else {
            Number::exact(value)
        }
    };

    let value = exp.value();
    if let Some(n) = value.to_integer().and_then(|n| n.to_i64()) {
        if n.unsigned_abs() > MAX_FOLDED_EXPONENT {
            return None;
        }
        return base.value().pow(n).ok().map(tag);
    }
    if base.is_negative() {
        return None;
    }
    let q = u32::try_from(value.denominator().to_i64()?).ok()?;
    let p = value.numerator().to_i64()?;
    if p.unsigned_abs() > MAX_FOLDED_EXPONENT {
        return None;
    }
    let root = base.value().exact_root(q)?;
    root.pow(p).ok().map(tag)
}
