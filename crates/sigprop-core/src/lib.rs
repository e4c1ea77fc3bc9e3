//! # sigprop-core
//!
//! Core expression engine for the sigprop uncertainty pipeline.
//!
//! This crate provides:
//! - Arena-allocated expression storage with hash-consing
//! - Canonicalising constructors that fold numbers, collect like terms and
//!   order operands, so structurally equal results share one handle
//! - A parser for the usual infix formula syntax (`0.5*m*v**2`)
//! - Symbolic differentiation and numeric evaluation
//! - LaTeX output with per-symbol display labels
//!
//! ## Design Principles
//!
//! - **Hash-Consing**: Every structurally unique expression stored exactly once
//! - **Canonical on construction**: there is no separate normalisation pass;
//!   an expression is in normal form the moment it has a handle
//! - **Cheap snapshots**: cloning an arena keeps every existing handle valid

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod arena;
pub mod diff;
pub mod error;
pub mod eval;
pub mod expr;
pub mod latex;
pub mod order;
pub mod parse;
pub mod symbol;

#[cfg(test)]
mod proptests;

pub use arena::ExprArena;
pub use diff::diff;
pub use error::CoreError;
pub use eval::{evaluate, Bindings};
pub use expr::{Constant, ExprHandle, ExprNode, Func};
pub use latex::{LabelMap, LatexPrinter, MulSymbol};
pub use parse::{parse_expr, SymbolScope};
pub use symbol::{SymbolId, SymbolTable};
