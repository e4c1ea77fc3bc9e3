//! # sigprop
//!
//! First-order propagation of measurement uncertainty, rendered as the
//! complete LaTeX derivation of the result.
//!
//! Given `y = f(x_1, ..., x_n)` and a value and standard uncertainty for
//! every `x_i`, the pipeline computes
//!
//! ```text
//! sigma_y = sqrt( sum_i (df/dx_i * sigma_i)^2 )
//! ```
//!
//! and prints each step: the formula, every partial derivative, the
//! root-sum-of-squares and the final `y = mu ± sigma`.
//!
//! ## Pipeline
//!
//! Each stage consumes the snapshot produced by the previous one:
//!
//! 1. [`parsing::parse`] turns an [`Equation`] and its [`Variable`]s into a
//!    [`ParseState`]
//! 2. [`validation::validate`] rejects formulas that use undeclared names
//! 3. [`compute::compute`] differentiates, simplifies and evaluates into a
//!    [`ComputeState`]
//! 4. [`render::render`] prints both states as LaTeX
//!
//! [`UncertaintyCalculator`] runs all four.
//!
//! ## Quick Start
//!
//! ```rust
//! use sigprop::{propagate, Digits, Equation, Variable};
//!
//! let equation = Equation::new("y", "m*x + b");
//! let variables = [
//!     Variable::new("m", "2.5", "0.1", "m"),
//!     Variable::new("x", "4.0", "0.2", "x"),
//!     Variable::new("b", "1.0", "0.5", "b"),
//! ];
//! let digits = Digits::new(3, 2).unwrap();
//!
//! let latex = propagate(&equation, &variables, digits, None, false, false, false).unwrap();
//! assert!(latex.ends_with("y&=11.0 \\pm 0.81\n\\end{aligned}\n\\end{equation*}\n"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod calculator;
pub mod compute;
pub mod error;
pub mod format;
pub mod input;
pub mod model;
pub mod parsing;
pub mod render;
pub mod validation;

#[cfg(test)]
mod proptests;
#[cfg(test)]
mod scenarios;

pub use calculator::{propagate, UncertaintyCalculator};
pub use compute::{ComputeState, PartialDerivative};
pub use error::{ErrorKind, PropagationError};
pub use model::{Digits, Equation, LastUnit, NumericInput, Variable, MAX_DIGITS};
pub use parsing::{ParseState, ParsedVariable};
pub use render::RenderOptions;
pub use sigprop_simplify::SimplifierConfig;
