//! Error type for the propagation pipeline.

use sigprop_core::CoreError;
use thiserror::Error;

/// Failures of a pipeline run.
///
/// Every failure is reported before any markup is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropagationError {
    /// An equation given as a sequence did not hold a label and a formula.
    #[error("equation must contain exactly two entries (lhs, rhs), got {0}")]
    EquationShape(usize),

    /// A textual variable definition is not of the form `name = ...`.
    #[error("invalid variable definition: '{0}'")]
    VariableDefinition(String),

    /// A textual variable definition is not of the form `value +- uncertainty`.
    #[error("invalid value/uncertainty format: '{0}'")]
    ValueFormat(String),

    /// A variable name that cannot be used as a symbol.
    #[error("'{0}' is not a valid variable name")]
    InvalidName(String),

    /// Two variables share a name.
    #[error("variable '{0}' is defined more than once")]
    DuplicateVariable(String),

    /// A value or uncertainty that is not a numeric expression.
    #[error("invalid {field} for variable '{name}': {source}")]
    InvalidNumber {
        /// The variable.
        name: String,
        /// `value` or `uncertainty`.
        field: &'static str,
        /// Why it was rejected.
        source: CoreError,
    },

    /// The right-hand side is not a well-formed formula.
    #[error("invalid equation '{rhs}': {source}")]
    InvalidEquation {
        /// The formula text.
        rhs: String,
        /// Why it was rejected.
        source: CoreError,
    },

    /// The formula uses a name that no variable declares.
    #[error("Symbol '{0}' used in equation but not defined in variables.")]
    UndefinedSymbol(String),

    /// A digit count that is not an integer between 1 and
    /// [`MAX_DIGITS`](crate::model::MAX_DIGITS).
    #[error("{field} must be an integer from 1 to {max} (got {value})", max = crate::model::MAX_DIGITS)]
    InvalidDigits {
        /// `mu` or `sigma`.
        field: &'static str,
        /// The rejected value, as given.
        value: String,
    },

    /// The formula or a derivative could not be evaluated at the given
    /// values (division by zero, logarithm of a negative number, ...).
    #[error("evaluation failed: {0}")]
    Evaluation(#[source] CoreError),

    /// A symbol reached evaluation without a value. Validation rules this
    /// out, so it indicates a bug.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Coarse classification of a [`PropagationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed equation or variable definitions.
    Structural,
    /// A variable defined twice.
    Duplicate,
    /// The formula references an undeclared name.
    UndefinedSymbol,
    /// Invalid digit counts.
    Configuration,
    /// The numbers do not admit evaluation.
    Evaluation,
    /// Broken internal invariant.
    Internal,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Structural => "structural error",
            Self::Duplicate => "duplicate definition",
            Self::UndefinedSymbol => "undefined symbol",
            Self::Configuration => "configuration error",
            Self::Evaluation => "evaluation error",
            Self::Internal => "internal consistency error",
        })
    }
}

impl PropagationError {
    /// The class of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EquationShape(_)
            | Self::VariableDefinition(_)
            | Self::ValueFormat(_)
            | Self::InvalidName(_)
            | Self::InvalidNumber { .. }
            | Self::InvalidEquation { .. } => ErrorKind::Structural,
            Self::DuplicateVariable(_) => ErrorKind::Duplicate,
            Self::UndefinedSymbol(_) => ErrorKind::UndefinedSymbol,
            Self::InvalidDigits { .. } => ErrorKind::Configuration,
            Self::Evaluation(_) => ErrorKind::Evaluation,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Maps an evaluation failure, treating a missing binding as internal.
    pub(crate) fn from_evaluation(error: CoreError) -> Self {
        match error {
            CoreError::UnboundSymbol(name) => {
                Self::Internal(format!("symbol '{name}' has no numeric value"))
            }
            other => Self::Evaluation(other),
        }
    }
}
