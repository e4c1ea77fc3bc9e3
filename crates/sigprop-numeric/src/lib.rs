//! # sigprop-numeric
//!
//! Exact numerics for the sigprop uncertainty pipeline.
//!
//! This crate wraps `dashu` to provide:
//! - Arbitrary precision integers (`Integer`) and rationals (`Rational`)
//! - Tagged literals (`Number`) remembering whether they were typed as
//!   exact values or as decimals
//! - Transcendental evaluation to a requested number of digits
//! - Significant-digit rounding and decimal display
//!
//! ## Numeric model
//!
//! Every quantity is held as an exact rational. Transcendental functions
//! return rational approximations whose relative error is below
//! `10^-digits`, so a chain of operations only loses precision at the
//! points where an irrational value enters. Rounding for display happens
//! once, at the very end.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod integer;
pub mod number;
pub mod rational;
pub mod sigfig;
pub mod transcendental;

#[cfg(test)]
mod proptests;

pub use error::NumericError;
pub use integer::Integer;
pub use number::{Number, NumberKind};
pub use rational::Rational;
pub use sigfig::{format_rounded, format_significant, SignificantDecimal};
pub use transcendental::Precision;
