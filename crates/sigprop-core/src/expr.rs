//! Expression node types.
//!
//! Nodes only ever reach the arena through the canonicalising constructors
//! in [`crate::arena`], so every invariant listed on a variant holds for
//! any node obtained through a handle.

use smallvec::SmallVec;
use sigprop_numeric::Number;
use std::fmt;

use crate::symbol::SymbolId;

/// A handle to an expression in the arena.
///
/// Two handles from the same arena are equal if and only if they point to
/// structurally identical expressions, thanks to hash-consing.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExprHandle(u32);

impl ExprHandle {
    pub(crate) const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw index of this handle.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for ExprHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Expr({})", self.0)
    }
}

impl fmt::Display for ExprHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Named mathematical constants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Constant {
    /// Euler's number.
    E,
    /// The circle constant.
    Pi,
}

impl Constant {
    /// Name used in formula text.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::E => "E",
            Self::Pi => "pi",
        }
    }
}

/// Elementary functions of one argument.
///
/// Variants are declared in name order; the derived `Ord` is relied on
/// when ordering products.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Func {
    /// Absolute value.
    Abs,
    /// Inverse cosine.
    Acos,
    /// Inverse sine.
    Asin,
    /// Inverse tangent.
    Atan,
    /// Cosine.
    Cos,
    /// Hyperbolic cosine.
    Cosh,
    /// Natural exponential.
    Exp,
    /// Natural logarithm.
    Log,
    /// Sine.
    Sin,
    /// Hyperbolic sine.
    Sinh,
    /// Tangent.
    Tan,
    /// Hyperbolic tangent.
    Tanh,
}

impl Func {
    /// Every function, in name order.
    pub const ALL: [Func; 12] = [
        Func::Abs,
        Func::Acos,
        Func::Asin,
        Func::Atan,
        Func::Cos,
        Func::Cosh,
        Func::Exp,
        Func::Log,
        Func::Sin,
        Func::Sinh,
        Func::Tan,
        Func::Tanh,
    ];

    /// Canonical name in formula text.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Abs => "abs",
            Self::Acos => "acos",
            Self::Asin => "asin",
            Self::Atan => "atan",
            Self::Cos => "cos",
            Self::Cosh => "cosh",
            Self::Exp => "exp",
            Self::Log => "log",
            Self::Sin => "sin",
            Self::Sinh => "sinh",
            Self::Tan => "tan",
            Self::Tanh => "tanh",
        }
    }

    /// Looks a function up by any of its accepted spellings.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ln" => Some(Self::Log),
            "Abs" => Some(Self::Abs),
            "arcsin" => Some(Self::Asin),
            "arccos" => Some(Self::Acos),
            "arctan" => Some(Self::Atan),
            _ => Self::ALL.iter().copied().find(|f| f.name() == name),
        }
    }

    /// `f(-x) = -f(x)`.
    #[must_use]
    pub const fn is_odd(self) -> bool {
        matches!(
            self,
            Self::Sin | Self::Tan | Self::Asin | Self::Atan | Self::Sinh | Self::Tanh
        )
    }

    /// `f(-x) = f(x)`.
    #[must_use]
    pub const fn is_even(self) -> bool {
        matches!(self, Self::Cos | Self::Cosh | Self::Abs)
    }
}

/// An expression node stored in the arena.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExprNode {
    // === Atoms ===
    /// A numeric literal, exact or decimal.
    Number(Number),

    /// A symbolic variable.
    Symbol(SymbolId),

    /// A named constant.
    Constant(Constant),

    // === Compound Expressions ===
    /// Sum of expressions: a + b + c + ...
    ///
    /// Invariant: at least 2 terms, no nested sums, at most one number
    /// (last), no two terms differing only in their coefficient.
    Add(SmallVec<[ExprHandle; 4]>),

    /// Product of expressions: a * b * c * ...
    ///
    /// Invariant: at least 2 factors, no nested products, at most one
    /// number (first), no two factors sharing a base.
    Mul(SmallVec<[ExprHandle; 4]>),

    /// Power expression: base^exp.
    ///
    /// Division is `a * b^-1` and a square root is `x^(1/2)`.
    Pow {
        /// The base of the power.
        base: ExprHandle,
        /// The exponent.
        exp: ExprHandle,
    },

    /// A function application.
    Function {
        /// Which function.
        func: Func,
        /// The argument.
        arg: ExprHandle,
    },
}

impl ExprNode {
    /// Returns true if this node is an atom (no children).
    #[must_use]
    pub fn is_atom(&self) -> bool {
        matches!(
            self,
            ExprNode::Number(_) | ExprNode::Symbol(_) | ExprNode::Constant(_)
        )
    }

    /// Returns the number if this node is one.
    #[must_use]
    pub fn as_number(&self) -> Option<&Number> {
        match self {
            ExprNode::Number(n) => Some(n),
            _ => None,
        }
    }

    /// Returns the children of this node.
    #[must_use]
    pub fn children(&self) -> SmallVec<[ExprHandle; 4]> {
        match self {
            ExprNode::Number(_) | ExprNode::Symbol(_) | ExprNode::Constant(_) => SmallVec::new(),
            ExprNode::Add(args) | ExprNode::Mul(args) => args.clone(),
            ExprNode::Pow { base, exp } => smallvec::smallvec![*base, *exp],
            ExprNode::Function { arg, .. } => smallvec::smallvec![*arg],
        }
    }

    /// Position of the variant, used as the first key of structural order.
    pub(crate) fn variant_rank(&self) -> u8 {
        match self {
            ExprNode::Number(_) => 0,
            ExprNode::Constant(_) => 1,
            ExprNode::Symbol(_) => 2,
            ExprNode::Pow { .. } => 3,
            ExprNode::Mul(_) => 4,
            ExprNode::Add(_) => 5,
            ExprNode::Function { .. } => 6,
        }
    }
}
