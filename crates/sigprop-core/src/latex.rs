//! LaTeX output.
//!
//! The printer walks canonical expressions and produces the markup used
//! in typeset derivations: `\frac` for quotients, `\sqrt` for roots,
//! `\sin {x}` with brackets folded away around simple arguments and
//! `\ln{\left(x \right)}` for logarithms. Symbols may be rendered through
//! a label map, which is how the same expression prints once with its
//! symbols and once with the measured values in their place.

use hashbrown::HashMap;
use sigprop_numeric::{format_significant, Integer, Number};

use crate::arena::ExprArena;
use crate::expr::{Constant, ExprHandle, ExprNode, Func};
use crate::symbol::SymbolId;

/// Display markup substituted for symbols.
pub type LabelMap = HashMap<SymbolId, String>;

/// Digits shown for decimal literals.
const DECIMAL_DIGITS: u32 = 15;

/// How adjacent factors of a product are joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MulSymbol {
    /// Juxtaposition: `m x`.
    #[default]
    Space,
    /// An explicit operator: `m \times x`.
    Times,
}

const GREEK: [&str; 35] = [
    "alpha", "beta", "gamma", "delta", "epsilon", "zeta", "eta", "theta", "iota", "kappa",
    "lambda", "mu", "nu", "xi", "pi", "rho", "sigma", "tau", "upsilon", "phi", "chi", "psi",
    "omega", "Gamma", "Delta", "Theta", "Lambda", "Xi", "Pi", "Sigma", "Upsilon", "Phi", "Psi",
    "Omega", "varepsilon",
];

/// Exponent of a power, either stored in the arena or computed while
/// printing (the positive exponent behind a `\frac{1}{...}`).
#[derive(Clone)]
enum Exponent {
    Number(Number),
    Expr(ExprHandle),
}

/// One factor of a numerator or denominator.
struct Part {
    text: String,
    is_sum: bool,
}

/// Renders expressions of one arena as LaTeX.
#[derive(Clone, Copy)]
pub struct LatexPrinter<'a> {
    arena: &'a ExprArena,
    labels: Option<&'a LabelMap>,
    mul_symbol: MulSymbol,
}

impl<'a> LatexPrinter<'a> {
    /// A printer using default symbol names and juxtaposed products.
    #[must_use]
    pub fn new(arena: &'a ExprArena) -> Self {
        Self {
            arena,
            labels: None,
            mul_symbol: MulSymbol::Space,
        }
    }

    /// Renders symbols found in `labels` with the given markup.
    #[must_use]
    pub fn with_labels(mut self, labels: &'a LabelMap) -> Self {
        self.labels = Some(labels);
        self
    }

    /// Sets the product separator.
    #[must_use]
    pub fn with_mul_symbol(mut self, mul_symbol: MulSymbol) -> Self {
        self.mul_symbol = mul_symbol;
        self
    }

    /// Renders `expr`.
    #[must_use]
    pub fn print(&self, expr: ExprHandle) -> String {
        match self.arena.get(expr) {
            ExprNode::Number(n) => self.number(n),
            ExprNode::Symbol(id) => self.symbol(*id),
            ExprNode::Constant(Constant::Pi) => "\\pi".to_string(),
            ExprNode::Constant(Constant::E) => "e".to_string(),
            ExprNode::Add(terms) => self.sum(terms),
            ExprNode::Mul(factors) => {
                let (negative, body) = self.product(factors);
                if negative {
                    format!("- {body}")
                } else {
                    body
                }
            }
            ExprNode::Pow { base, exp } => self.power(*base, &Exponent::Expr(*exp)),
            ExprNode::Function { func, arg } => self.function(*func, *arg, None),
        }
    }

    fn number(&self, n: &Number) -> String {
        if n.is_decimal() {
            let text = format_significant(n.value(), DECIMAL_DIGITS);
            return match self.mul_symbol {
                MulSymbol::Space => text.replace("\\times", "\\cdot"),
                MulSymbol::Times => text,
            };
        }
        let value = n.value();
        if value.is_integer() {
            return value.to_string();
        }
        let sign = if value.is_negative() { "- " } else { "" };
        format!(
            "{sign}\\frac{{{}}}{{{}}}",
            value.numerator().abs(),
            value.denominator()
        )
    }

    fn symbol(&self, id: SymbolId) -> String {
        if let Some(label) = self.labels.and_then(|labels| labels.get(&id)) {
            return label.clone();
        }
        default_symbol_name(self.arena.symbol_name(id))
    }

    fn sum(&self, terms: &[ExprHandle]) -> String {
        let mut ordered = terms.to_vec();
        // lead with a positive term when there is one: 1 - x, not - x + 1
        if self.arena.is_negative_term(ordered[0]) {
            if let Some(pos) = ordered.iter().position(|&t| !self.arena.is_negative_term(t)) {
                let term = ordered.remove(pos);
                ordered.insert(0, term);
            }
        }

        let mut out = self.print(ordered[0]);
        for &term in &ordered[1..] {
            let (negative, body) = self.signed(term);
            out.push_str(if negative { " - " } else { " + " });
            out.push_str(&body);
        }
        out
    }

    /// Sign and magnitude of a sum term.
    fn signed(&self, term: ExprHandle) -> (bool, String) {
        match self.arena.get(term) {
            ExprNode::Number(n) if n.is_negative() => (true, self.number(&n.abs())),
            ExprNode::Mul(factors) => self.product(factors),
            _ => (false, self.print(term)),
        }
    }

    /// Sign and magnitude of a product.
    fn product(&self, factors: &[ExprHandle]) -> (bool, String) {
        let (coeff, rest) = match self.arena.as_number(factors[0]) {
            Some(n) => (Some(n), &factors[1..]),
            None => (None, factors),
        };

        let mut numerator: Vec<Part> = Vec::new();
        let mut denominator: Vec<Part> = Vec::new();
        let negative = coeff.is_some_and(Number::is_negative);
        if let Some(c) = coeff.map(Number::abs) {
            if c.is_decimal() {
                numerator.push(Part::text(self.number(&c)));
            } else {
                let (num, den) = (c.value().numerator(), c.value().denominator());
                if num != Integer::new(1) {
                    numerator.push(Part::text(num.to_string()));
                }
                if den != Integer::new(1) {
                    denominator.push(Part::text(den.to_string()));
                }
            }
        }

        for &factor in rest {
            if let ExprNode::Pow { base, exp } = self.arena.get(factor) {
                if let Some(n) = self.arena.as_number(*exp).filter(|n| n.is_negative()) {
                    let positive = n.abs();
                    if positive.is_one() {
                        denominator.push(self.part(*base));
                    } else {
                        denominator.push(Part::text(self.power(*base, &Exponent::Number(positive))));
                    }
                    continue;
                }
            }
            numerator.push(self.part(factor));
        }

        let top = if numerator.is_empty() {
            "1".to_string()
        } else {
            self.join(numerator)
        };
        let body = if denominator.is_empty() {
            top
        } else {
            format!("\\frac{{{top}}}{{{}}}", self.join(denominator))
        };
        (negative, body)
    }

    fn part(&self, factor: ExprHandle) -> Part {
        Part {
            text: self.print(factor),
            is_sum: matches!(self.arena.get(factor), ExprNode::Add(_)),
        }
    }

    /// Joins factors, bracketing sums when there is more than one factor.
    fn join(&self, parts: Vec<Part>) -> String {
        let bracket = parts.len() > 1;
        let mut out = String::new();
        for (i, part) in parts.into_iter().enumerate() {
            let text = if bracket && part.is_sum {
                format!("\\left({}\\right)", part.text)
            } else {
                part.text
            };
            if i > 0 {
                out.push_str(match self.mul_symbol {
                    MulSymbol::Times => " \\times ",
                    // juxtaposed digits would read as one number
                    MulSymbol::Space if text.starts_with(|c: char| c.is_ascii_digit()) => {
                        " \\cdot "
                    }
                    MulSymbol::Space => " ",
                });
            }
            out.push_str(&text);
        }
        out
    }

    fn exponent_number<'e>(&'e self, exp: &'e Exponent) -> Option<&'e Number> {
        match exp {
            Exponent::Number(n) => Some(n),
            Exponent::Expr(h) => self.arena.as_number(*h),
        }
    }

    fn exponent_text(&self, exp: &Exponent) -> String {
        match exp {
            Exponent::Number(n) => self.number(n),
            Exponent::Expr(h) => self.print(*h),
        }
    }

    fn power(&self, base: ExprHandle, exp: &Exponent) -> String {
        if let Some(n) = self.exponent_number(exp) {
            if n.is_negative() {
                let positive = Exponent::Number(n.abs());
                return format!("\\frac{{1}}{{{}}}", self.power(base, &positive));
            }
            if n.is_one() {
                return self.print(base);
            }
            if !n.is_decimal() && n.value().numerator() == Integer::new(1) && !n.value().is_integer() {
                let index = n.value().denominator();
                return if index == Integer::new(2) {
                    format!("\\sqrt{{{}}}", self.print(base))
                } else {
                    format!("\\sqrt[{index}]{{{}}}", self.print(base))
                };
            }
        }

        let exp_text = self.exponent_text(exp);
        if let ExprNode::Function { func, arg } = self.arena.get(base) {
            if *func != Func::Exp {
                return self.function(*func, *arg, Some(&exp_text));
            }
        }
        format!("{}^{{{exp_text}}}", self.base(base))
    }

    fn base(&self, base: ExprHandle) -> String {
        let text = self.print(base);
        let bracket = match self.arena.get(base) {
            ExprNode::Number(n) => n.is_negative() || (!n.is_decimal() && !n.value().is_integer()),
            ExprNode::Symbol(_) => text.contains('^'),
            ExprNode::Constant(_) => false,
            ExprNode::Add(_) | ExprNode::Mul(_) | ExprNode::Pow { .. } | ExprNode::Function { .. } => {
                true
            }
        };
        if bracket {
            format!("\\left({text}\\right)")
        } else {
            text
        }
    }

    fn function(&self, func: Func, arg: ExprHandle, power: Option<&str>) -> String {
        let inner = self.print(arg);
        let raised = |body: String| match power {
            Some(p) => format!("{body}^{{{p}}}"),
            None => body,
        };
        let name = match func {
            Func::Exp => return raised(format!("e^{{{inner}}}")),
            Func::Abs => return raised(format!("\\left|{{{inner}}}\\right|")),
            Func::Log => return raised(format!("\\ln{{\\left({inner} \\right)}}")),
            Func::Sin => "\\sin",
            Func::Cos => "\\cos",
            Func::Tan => "\\tan",
            Func::Asin => "\\arcsin",
            Func::Acos => "\\arccos",
            Func::Atan => "\\arctan",
            Func::Sinh => "\\sinh",
            Func::Cosh => "\\cosh",
            Func::Tanh => "\\tanh",
        };
        let head = match power {
            Some(p) => format!("{name}^{{{p}}}"),
            None => name.to_string(),
        };
        if self.folds(arg) {
            format!("{head} {{{inner}}}")
        } else {
            format!("{head}{{\\left({inner} \\right)}}")
        }
    }

    /// Whether a function argument can drop its brackets.
    fn folds(&self, arg: ExprHandle) -> bool {
        match self.arena.get(arg) {
            ExprNode::Number(_) | ExprNode::Symbol(_) | ExprNode::Constant(_) => true,
            ExprNode::Add(_) | ExprNode::Function { .. } => false,
            ExprNode::Mul(factors) => !factors
                .iter()
                .any(|&f| matches!(self.arena.get(f), ExprNode::Function { .. })),
            ExprNode::Pow { base, .. } => matches!(
                self.arena.get(*base),
                ExprNode::Symbol(_) | ExprNode::Constant(_)
            ) || self
                .arena
                .as_number(*base)
                .is_some_and(|n| !n.is_negative() && (n.is_decimal() || n.value().is_integer())),
        }
    }
}

impl Part {
    fn text(text: String) -> Self {
        Self {
            text,
            is_sum: false,
        }
    }
}

/// Default markup for a symbol name: `x_1` becomes `x_{1}`, `I0` becomes
/// `I_{0}` and Greek letter names become their commands.
#[must_use]
pub fn default_symbol_name(name: &str) -> String {
    let greek = |part: &str| {
        if GREEK.contains(&part) {
            format!("\\{part}")
        } else {
            part.to_string()
        }
    };

    let split = match name.split_once('_') {
        Some((head, sub)) if !head.is_empty() && !sub.is_empty() => Some((head, sub)),
        _ => {
            let head = name.trim_end_matches(|c: char| c.is_ascii_digit());
            let is_letters = !head.is_empty() && head.chars().all(|c| c.is_ascii_alphabetic());
            (is_letters && head.len() < name.len()).then(|| name.split_at(head.len()))
        }
    };
    match split {
        Some((head, sub)) => format!("{}_{{{}}}", greek(head), greek(sub)),
        None => greek(name),
    }
}
