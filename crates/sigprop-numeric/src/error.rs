//! Error type for numeric operations.

use thiserror::Error;

/// Failures raised by exact and approximate arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NumericError {
    /// A division (or negative power) of zero.
    #[error("division by zero")]
    DivisionByZero,

    /// A function evaluated outside of its real domain.
    #[error("{function} is undefined for {argument}")]
    Domain {
        /// Name of the function.
        function: &'static str,
        /// The offending argument, in display form.
        argument: String,
    },

    /// A literal that could not be read as a number.
    #[error("invalid numeric literal '{0}'")]
    InvalidLiteral(String),
}

impl NumericError {
    pub(crate) fn domain(function: &'static str, argument: impl ToString) -> Self {
        Self::Domain {
            function,
            argument: argument.to_string(),
        }
    }
}
