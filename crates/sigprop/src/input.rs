//! The historical textual input forms.
//!
//! Older job descriptions give the equation as a `[label, formula]` pair
//! and each variable as `"name = value +- uncertainty"` next to its
//! display label. These helpers turn them into the typed model.

use crate::error::PropagationError;
use crate::model::{Equation, Variable};

/// Builds an [`Equation`] from a `[lhs, rhs]` sequence, trimming both.
///
/// # Errors
///
/// Returns [`PropagationError::EquationShape`] unless exactly two entries
/// are given.
pub fn parse_equation<S: AsRef<str>>(raw: &[S]) -> Result<Equation, PropagationError> {
    match raw {
        [lhs, rhs] => Ok(Equation::new(lhs.as_ref().trim(), rhs.as_ref().trim())),
        _ => Err(PropagationError::EquationShape(raw.len())),
    }
}

/// Builds a [`Variable`] from `"name = value +- uncertainty"`.
///
/// # Errors
///
/// Returns [`PropagationError::VariableDefinition`] when the text does not
/// contain exactly one `=`, and [`PropagationError::ValueFormat`] when the
/// right side does not contain exactly one `+-`.
pub fn parse_variable(definition: &str, latex_name: &str) -> Result<Variable, PropagationError> {
    let [name, numbers] = split_exact::<2>(definition, "=")
        .ok_or_else(|| PropagationError::VariableDefinition(definition.to_string()))?;
    let [value, uncertainty] = split_exact::<2>(numbers, "+-")
        .ok_or_else(|| PropagationError::ValueFormat(definition.to_string()))?;
    Ok(Variable::new(
        name.trim(),
        value.trim(),
        uncertainty.trim(),
        latex_name,
    ))
}

/// Builds variables from `(definition, latex_name)` pairs.
///
/// # Errors
///
/// Fails on the first malformed definition, see [`parse_variable`].
pub fn parse_variables<I, D, L>(raw: I) -> Result<Vec<Variable>, PropagationError>
where
    I: IntoIterator<Item = (D, L)>,
    D: AsRef<str>,
    L: AsRef<str>,
{
    raw.into_iter()
        .map(|(definition, latex_name)| parse_variable(definition.as_ref(), latex_name.as_ref()))
        .collect()
}

fn split_exact<'a, const N: usize>(text: &'a str, separator: &str) -> Option<[&'a str; N]> {
    let parts: Vec<&str> = text.split(separator).collect();
    parts.try_into().ok()
}
