//! Error type for expression handling.

use sigprop_numeric::NumericError;
use thiserror::Error;

/// Failures raised while parsing or evaluating expressions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// The formula text is not well formed.
    #[error("syntax error at position {position}: {message}")]
    Syntax {
        /// What went wrong.
        message: String,
        /// Byte offset into the source text.
        position: usize,
    },

    /// An identifier that is not allowed in this context.
    #[error("unexpected identifier '{0}' in a numeric expression")]
    UnexpectedIdentifier(String),

    /// A symbol reached evaluation without a numeric value.
    #[error("symbol '{0}' has no numeric value")]
    UnboundSymbol(String),

    /// Arithmetic failure during evaluation.
    #[error(transparent)]
    Numeric(#[from] NumericError),
}
