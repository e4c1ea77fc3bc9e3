//! Typed inputs of a propagation run.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::PropagationError;

/// The formula whose uncertainty is propagated: `lhs = rhs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equation {
    /// Display markup for the result, e.g. `\zeta` or `v_{0}`.
    pub lhs: String,
    /// The formula in the declared variables, e.g. `m*x + b`.
    pub rhs: String,
}

impl Equation {
    /// Creates an equation.
    pub fn new(lhs: impl Into<String>, rhs: impl Into<String>) -> Self {
        Self {
            lhs: lhs.into(),
            rhs: rhs.into(),
        }
    }
}

/// A value or uncertainty as supplied by the caller.
///
/// Text is parsed as a numeric expression (`"0.9358e-3"`, `"1/sqrt(3)"`).
/// Integers stay exact, floats are read back through their shortest
/// decimal representation so `0.1` means exactly one tenth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericInput {
    /// An integer.
    Integer(i64),
    /// A floating point number.
    Float(f64),
    /// A numeric expression.
    Text(String),
}

impl NumericInput {
    /// The expression text handed to the parser.
    #[must_use]
    pub fn to_source(&self) -> String {
        match self {
            Self::Integer(n) => n.to_string(),
            Self::Float(x) => format!("{x:?}"),
            Self::Text(text) => text.clone(),
        }
    }
}

impl fmt::Display for NumericInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_source())
    }
}

impl From<&str> for NumericInput {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for NumericInput {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<i64> for NumericInput {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<i32> for NumericInput {
    fn from(n: i32) -> Self {
        Self::Integer(n.into())
    }
}

impl From<f64> for NumericInput {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

/// A measured quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    /// Identifier used in the formula.
    pub name: String,
    /// Best estimate.
    pub value: NumericInput,
    /// Standard uncertainty. Zero excludes the variable from propagation.
    pub uncertainty: NumericInput,
    /// Display markup, e.g. `\varepsilon_0` for `e_0`.
    pub latex_name: String,
}

impl Variable {
    /// Creates a variable.
    pub fn new(
        name: impl Into<String>,
        value: impl Into<NumericInput>,
        uncertainty: impl Into<NumericInput>,
        latex_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            uncertainty: uncertainty.into(),
            latex_name: latex_name.into(),
        }
    }
}

/// Largest accepted digit count.
pub const MAX_DIGITS: u32 = 1000;

/// Significant digits of the displayed mean and uncertainty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDigits")]
pub struct Digits {
    mu: u32,
    sigma: u32,
}

impl Digits {
    /// Creates a digit configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PropagationError::InvalidDigits`] unless both counts lie
    /// in `1..=MAX_DIGITS`.
    pub fn new(mu: i64, sigma: i64) -> Result<Self, PropagationError> {
        Ok(Self {
            mu: positive("mu", mu)?,
            sigma: positive("sigma", sigma)?,
        })
    }

    /// Digits of the mean.
    #[must_use]
    pub fn mu(self) -> u32 {
        self.mu
    }

    /// Digits of the uncertainty.
    #[must_use]
    pub fn sigma(self) -> u32 {
        self.sigma
    }
}

impl Default for Digits {
    fn default() -> Self {
        Self { mu: 3, sigma: 3 }
    }
}

fn positive(field: &'static str, value: i64) -> Result<u32, PropagationError> {
    u32::try_from(value)
        .ok()
        .filter(|n| (1..=MAX_DIGITS).contains(n))
        .ok_or_else(|| PropagationError::InvalidDigits {
            field,
            value: value.to_string(),
        })
}

/// Digit counts as they appear in a job file, where `2.5` or `-1` may
/// show up and must be rejected rather than truncated.
#[derive(Deserialize)]
struct RawDigits {
    mu: f64,
    sigma: f64,
}

impl TryFrom<RawDigits> for Digits {
    type Error = PropagationError;

    fn try_from(raw: RawDigits) -> Result<Self, Self::Error> {
        let integral = |field: &'static str, value: f64| {
            if value.fract() == 0.0 && value.abs() < 1e15 {
                #[allow(clippy::cast_possible_truncation)]
                let whole = value as i64;
                Ok(whole)
            } else {
                Err(PropagationError::InvalidDigits {
                    field,
                    value: value.to_string(),
                })
            }
        };
        Self::new(integral("mu", raw.mu)?, integral("sigma", raw.sigma)?)
    }
}

/// Unit markup attached to the final result, or `None` when dimensionless.
pub type LastUnit = Option<String>;
