//! # sigprop-simplify
//!
//! Equality saturation-based simplification of partial derivatives.
//!
//! This crate uses the `egg` library to provide:
//! - Translation between arena expressions and e-graph terms
//! - Algebraic, trigonometric and exponential rewrite rules
//! - Cost functions for extraction
//!
//! Only rewrites that hold for every real value of the variables are used,
//! and an extracted term replaces the original only when its canonical
//! form is strictly smaller.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod convert;
pub mod cost;
pub mod engine;
pub mod language;
pub mod rules;

pub use engine::{SimplificationStats, Simplifier, SimplifierConfig};
pub use language::PropLang;
